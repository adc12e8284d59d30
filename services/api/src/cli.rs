use crate::demo::{run_demo, run_grade_report, DemoArgs, GradeReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use gradebook::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Gradebook",
    about = "Project weighted course grades from partial coursework",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a course snapshot or gradebook export from disk
    Grade {
        #[command(subcommand)]
        command: GradeCommand,
    },
    /// Walk through a sample course as coursework is graded
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum GradeCommand {
    /// Print the projected grade with per-category detail
    Report(GradeReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Grade {
            command: GradeCommand::Report(args),
        } => run_grade_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
