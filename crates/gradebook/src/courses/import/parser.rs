use super::normalizer::normalize_category;
use crate::engine::{Assignment, AssignmentId, Score, ScoreStatistics};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Row-level failure with the 1-based line it came from.
#[derive(Debug)]
pub(crate) enum RowError {
    Csv(csv::Error),
    Invalid { line: usize, reason: String },
}

impl From<csv::Error> for RowError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub(crate) fn parse_assignments<R: Read>(reader: R) -> Result<Vec<Assignment>, RowError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut assignments = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        // Quoted fields may span lines, so the row number is not enough.
        let line = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or_default();
        let row: GradebookRow = record.deserialize(Some(&headers))?;
        assignments.push(row.into_assignment(line)?);
    }

    Ok(assignments)
}

#[derive(Debug, Deserialize)]
struct GradebookRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Earned", default, deserialize_with = "empty_string_as_none")]
    earned: Option<String>,
    #[serde(rename = "Max")]
    max: String,
    #[serde(rename = "Due", default, deserialize_with = "empty_string_as_none")]
    due: Option<String>,
    #[serde(
        rename = "Class Mean",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    class_mean: Option<String>,
    #[serde(
        rename = "Class Std Dev",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    class_std_dev: Option<String>,
}

impl GradebookRow {
    fn into_assignment(self, line: usize) -> Result<Assignment, RowError> {
        if self.id.trim().is_empty() {
            return Err(RowError::Invalid {
                line,
                reason: "missing assignment ID".to_string(),
            });
        }

        let max_points = parse_number(&self.max, "Max", line)?;
        let score = match self.earned.as_deref() {
            Some(raw) => Score::Graded {
                earned: parse_number(raw, "Earned", line)?,
            },
            None => Score::Ungraded,
        };

        let due_date = match self.due.as_deref() {
            Some(raw) => Some(parse_date(raw).ok_or_else(|| RowError::Invalid {
                line,
                reason: format!("Due '{raw}' is not a YYYY-MM-DD date"),
            })?),
            None => None,
        };

        let statistics = match (self.class_mean.as_deref(), self.class_std_dev.as_deref()) {
            (Some(mean), Some(std_dev)) => Some(ScoreStatistics {
                mean: parse_number(mean, "Class Mean", line)?,
                std_dev: parse_number(std_dev, "Class Std Dev", line)?,
            }),
            _ => None,
        };

        Ok(Assignment {
            id: AssignmentId(self.id),
            title: self.title,
            category: normalize_category(&self.category),
            score,
            max_points,
            due_date,
            statistics,
            substitution: None,
        })
    }
}

fn parse_number(raw: &str, column: &str, line: usize) -> Result<f64, RowError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| RowError::Invalid {
            line,
            reason: format!("{column} '{raw}' is not a number"),
        })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
