use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::engine::calculator::{CalculatorSettings, DEFAULT_COMPLETE_WEIGHT_THRESHOLD};

const THRESHOLD_VAR: &str = "GRADEBOOK_COMPLETE_WEIGHT_THRESHOLD";

/// Deployment stage the gradebook service runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Process configuration, read from the environment after `.env` is applied.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub grading: GradingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            environment: AppEnvironment::parse(&var_or("APP_ENV", "development")),
            server: ServerConfig::from_env()?,
            telemetry: TelemetryConfig {
                log_level: var_or("APP_LOG_LEVEL", "info"),
            },
            grading: GradingConfig::from_env()?,
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// HTTP bind address.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_port = var_or("APP_PORT", "3000");
        let port = raw_port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(raw_port.clone()))?;

        Ok(Self {
            host: var_or("APP_HOST", "127.0.0.1"),
            port,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Log filter handed to `telemetry::init`.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Engine tunables exposed to operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradingConfig {
    /// Graded weight at which a course counts as complete, within (0, 1].
    pub complete_weight_threshold: f64,
}

impl GradingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let complete_weight_threshold = match env::var(THRESHOLD_VAR) {
            Ok(raw) => parse_threshold(&raw)?,
            Err(_) => DEFAULT_COMPLETE_WEIGHT_THRESHOLD,
        };
        Ok(Self {
            complete_weight_threshold,
        })
    }

    pub fn calculator_settings(&self) -> CalculatorSettings {
        CalculatorSettings {
            complete_weight_threshold: self.complete_weight_threshold,
        }
    }
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            complete_weight_threshold: DEFAULT_COMPLETE_WEIGHT_THRESHOLD,
        }
    }
}

fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 && value <= 1.0 => Ok(value),
        _ => Err(ConfigError::InvalidThreshold(raw.to_string())),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort(String),
    InvalidHost { source: std::net::AddrParseError },
    InvalidThreshold(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort(raw) => {
                write!(f, "APP_PORT must be a port number (found '{raw}')")
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must be 'localhost' or an IPv4/IPv6 address")
            }
            ConfigError::InvalidThreshold(raw) => write!(
                f,
                "{THRESHOLD_VAR} must be a number in (0, 1] (found '{raw}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort(_) | ConfigError::InvalidThreshold(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            THRESHOLD_VAR,
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.grading, GradingConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        env::set_var("APP_ENV", "CI");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        assert_eq!(config.environment, AppEnvironment::Test);
        reset_env();
    }

    #[test]
    fn rejects_unparseable_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "70000");
        match AppConfig::load() {
            Err(ConfigError::InvalidPort(raw)) => assert_eq!(raw, "70000"),
            other => panic!("expected invalid port, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn threshold_override_is_bounded() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var(THRESHOLD_VAR, "0.95");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.grading.calculator_settings().complete_weight_threshold,
            0.95
        );

        for raw in ["1.5", "0", "most"] {
            env::set_var(THRESHOLD_VAR, raw);
            match AppConfig::load() {
                Err(ConfigError::InvalidThreshold(found)) => assert_eq!(found, raw),
                other => panic!("expected invalid threshold for {raw}, got {other:?}"),
            }
        }
        reset_env();
    }
}
