use crate::infra::{load_snapshot, InMemoryCourseRepository};
use crate::routes::ProjectionSummary;
use clap::Args;
use gradebook::config::AppConfig;
use gradebook::courses::{
    CourseId, CourseSnapshot, GradeProjection, GradeProjector, GradebookImporter,
    GradebookService,
};
use gradebook::engine::{
    Assignment, BestOfPolicy, CalculatorSettings, CategoryGroup, ClobberPolicy, ClobberRule,
    ConfigWarning, CourseConfig, DistributionMethod, DropPolicy, GradeReportSummary,
    Normalization, ScoreSubstitution, SimpleAverageSummary, StandardPolicyEngine,
};
use gradebook::error::AppError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print each projection as JSON instead of a text summary.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct GradeReportArgs {
    /// Course snapshot JSON (`{"assignments": [...], "config": {...}}`)
    #[arg(long, conflicts_with = "csv", required_unless_present = "csv")]
    pub(crate) course: Option<PathBuf>,
    /// Gradebook CSV export (ID, Title, Category, Earned, Max, ...)
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Course config JSON applied to a CSV export
    #[arg(long, requires = "csv")]
    pub(crate) config: Option<PathBuf>,
    /// Print the full projection as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_grade_report(args: GradeReportArgs) -> Result<(), AppError> {
    let GradeReportArgs {
        course,
        csv,
        config,
        json,
    } = args;

    let snapshot = load_course(course.as_deref(), csv.as_deref(), config.as_deref())?;
    let settings = AppConfig::load()?.grading.calculator_settings();

    let warnings = match &snapshot.config {
        Some(config) => config.validate()?,
        None => Vec::new(),
    };
    let projection = GradeProjector::new(StandardPolicyEngine::new(), settings)
        .project(&snapshot.assignments, snapshot.config.as_ref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&projection)?);
        return Ok(());
    }

    println!("Grade report ({} assignments)", snapshot.assignments.len());
    for line in warning_lines(&warnings) {
        println!("{line}");
    }
    for line in projection_lines(&ProjectionSummary::from(&projection)) {
        println!("{line}");
    }
    Ok(())
}

fn load_course(
    course: Option<&Path>,
    csv: Option<&Path>,
    config: Option<&Path>,
) -> Result<CourseSnapshot, AppError> {
    match (course, csv) {
        (Some(path), _) => load_snapshot(path),
        (None, Some(path)) => {
            let assignments = GradebookImporter::from_path(path)?;
            let config = match config {
                Some(path) => {
                    let raw = std::fs::read_to_string(path)?;
                    let config = serde_json::from_str::<CourseConfig>(&raw)?;
                    Some(GradebookImporter::align_config(config))
                }
                None => None,
            };
            Ok(CourseSnapshot {
                assignments,
                config,
            })
        }
        (None, None) => Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "either --course or --csv is required",
        ))),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryCourseRepository::default());
    let service = GradebookService::new(repository, CalculatorSettings::default());
    let course_id = CourseId("stats-101".to_string());
    let config = demo_config();

    println!("Gradebook demo: {}", course_id.0);
    for (label, assignments) in demo_stages() {
        let saved = service.save_course(course_id.clone(), assignments, Some(config.clone()))?;
        let projection = service.project(&course_id)?;

        println!("\n== {label} ({} assignments)", saved.assignment_count);
        for line in warning_lines(&saved.warnings) {
            println!("{line}");
        }
        if args.json {
            println!("{}", serde_json::to_string_pretty(&projection)?);
            continue;
        }
        for line in projection_lines(&ProjectionSummary::from(&projection)) {
            println!("{line}");
        }
        if let GradeProjection::Weighted(report) = &projection {
            for substitution in &report.substitutions {
                println!(
                    "  {} replaced {} ({:.1} -> {:.1} pts)",
                    substitution.source_title,
                    substitution.target_id.0,
                    substitution.original_score,
                    substitution.new_score
                );
            }
        }
    }

    Ok(())
}

fn demo_config() -> CourseConfig {
    let mut config = CourseConfig::default();
    config.weights.insert("midterm".to_string(), 0.3);
    config.weights.insert("final".to_string(), 0.4);
    config.category_groups.push(CategoryGroup {
        name: "Practice".to_string(),
        categories: vec!["homework".to_string(), "quiz".to_string()],
        total_weight: 0.3,
        distribution_method: DistributionMethod::Proportional,
    });
    config
        .drop_policies
        .insert("homework".to_string(), DropPolicy::lowest(1));
    config.clobber_policies.push(ClobberPolicy {
        name: "best-two-quizzes".to_string(),
        rule: ClobberRule::BestOf(BestOfPolicy {
            category: "quiz".to_string(),
            count: 2,
        }),
    });
    config.clobber_policies.push(ClobberPolicy {
        name: "final-replaces-midterm".to_string(),
        rule: ClobberRule::Substitution(ScoreSubstitution {
            source_category: "final".to_string(),
            target_category: "midterm".to_string(),
            source_assignment: None,
            target_assignment: None,
            normalization: Normalization::Percentage,
            threshold: 0.05,
            source_weight_reduction: 0.0,
        }),
    });
    config
}

fn demo_stages() -> Vec<(&'static str, Vec<Assignment>)> {
    let coursework = vec![
        Assignment::graded("hw1", "Homework 1", "homework", 9.0, 10.0),
        Assignment::graded("hw2", "Homework 2", "homework", 6.0, 10.0),
        Assignment::graded("hw3", "Homework 3", "homework", 10.0, 10.0),
        Assignment::graded("q1", "Quiz 1", "quiz", 7.0, 10.0),
        Assignment::graded("q2", "Quiz 2", "quiz", 9.0, 10.0),
        Assignment::graded("q3", "Quiz 3", "quiz", 8.0, 10.0),
    ];

    let mut week_four = coursework.clone();
    week_four.push(Assignment::ungraded("mt", "Midterm", "midterm", 100.0));

    let mut midterm = coursework.clone();
    midterm.push(Assignment::graded("mt", "Midterm", "midterm", 68.0, 100.0));
    midterm.push(Assignment::ungraded("fin", "Final Exam", "final", 100.0));

    let mut finals = coursework;
    finals.push(Assignment::graded("mt", "Midterm", "midterm", 68.0, 100.0));
    finals.push(Assignment::graded("fin", "Final Exam", "final", 91.0, 100.0));

    vec![
        ("Week four", week_four),
        ("After the midterm", midterm),
        ("After the final", finals),
    ]
}

fn warning_lines(warnings: &[ConfigWarning]) -> Vec<String> {
    warnings
        .iter()
        .map(|warning| format!("warning: {}", warning.summary()))
        .collect()
}

pub(crate) fn projection_lines(summary: &ProjectionSummary) -> Vec<String> {
    match summary {
        ProjectionSummary::Weighted(summary) => weighted_lines(summary),
        ProjectionSummary::Simple(summary) => simple_lines(summary),
    }
}

fn weighted_lines(summary: &GradeReportSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Weighted grade {} | {} ({}% of {}% graded)",
        summary.weighted_average_label,
        summary.completion_label,
        summary.graded_weight_pct,
        summary.configured_weight_pct
    )];

    for category in &summary.categories {
        let status = if category.is_future {
            "no work yet".to_string()
        } else {
            format!("{}/{} graded", category.graded_count, category.total_count)
        };
        lines.push(format!(
            "- {} | weight {}% | average {} | {}",
            category.category, category.weight_pct, category.average_label, status
        ));
        if !category.dropped.is_empty() {
            lines.push(format!("    dropped: {}", category.dropped.join(", ")));
        }
    }

    if !summary.applied_policies.is_empty() {
        lines.push(format!("Policies applied: {}", summary.applied_policies.join(", ")));
    }
    for note in &summary.review_notes {
        lines.push(format!("Needs review: {note}"));
    }
    lines
}

fn simple_lines(summary: &SimpleAverageSummary) -> Vec<String> {
    vec![format!(
        "Simple average {} | {} | {}/{} graded",
        summary.average_label, summary.points_label, summary.graded_count, summary.total_count
    )]
}
