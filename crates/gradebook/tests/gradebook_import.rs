use gradebook::courses::{GradeProjection, GradeProjector, GradebookImporter};
use gradebook::engine::{Assignment, CompletionLevel, CourseConfig, Score};

fn stats_course() -> (Vec<Assignment>, CourseConfig) {
    let data = include_bytes!("../fixtures/stats_101.csv");
    let assignments = GradebookImporter::from_reader(&data[..]).expect("fixture imports");
    let config: CourseConfig =
        serde_json::from_str(include_str!("../fixtures/stats_101_config.json"))
            .expect("fixture config parses");
    (assignments, config)
}

fn weighted(projection: GradeProjection) -> gradebook::engine::GradeReport {
    match projection {
        GradeProjection::Weighted(report) => report,
        other => panic!("expected weighted projection, got {other:?}"),
    }
}

#[test]
fn importer_normalizes_export_categories() {
    let (assignments, _) = stats_course();

    assert_eq!(assignments.len(), 8);
    let categories: Vec<&str> = assignments
        .iter()
        .map(|assignment| assignment.category.as_str())
        .collect();
    assert!(categories.contains(&"final_exam"));
    assert!(categories.contains(&"homework"));
    let final_exam = assignments
        .iter()
        .find(|assignment| assignment.id.0 == "fin")
        .expect("final present");
    assert_eq!(final_exam.score, Score::Ungraded);
}

#[test]
fn imported_course_projects_partial_grade() {
    let (assignments, config) = stats_course();
    assert!(config.validate().expect("valid config").is_empty());

    let report = weighted(
        GradeProjector::default()
            .project(&assignments, Some(&config))
            .expect("projection"),
    );

    let average = report.weighted_average;
    assert!((average - 72.5).abs() < 1e-6, "got {average}");
    assert!((report.total_weight_graded - 0.6).abs() < 1e-9);
    assert!(!report.has_all_categories);
    assert_eq!(report.future_categories().count(), 0);
    assert!(report.substitutions.is_empty());

    let homework = report.category("homework").expect("homework detail");
    assert!((homework.weight - 0.18).abs() < 1e-9);
    assert_eq!(homework.dropped.len(), 1);
    assert_eq!(homework.dropped[0].id.0, "hw3");

    let final_exam = report.category("final_exam").expect("final detail");
    assert!(!final_exam.is_future);
    assert!(final_exam.average.is_none());

    let summary = report.summary();
    assert_eq!(summary.completion, CompletionLevel::InProgress);
    assert_eq!(summary.weighted_average_label, "72.5%");
    assert_eq!(summary.graded_weight_pct, 60.0);
}

#[test]
fn graded_final_replaces_weak_midterm() {
    let (mut assignments, config) = stats_course();
    for assignment in assignments.iter_mut() {
        if assignment.id.0 == "fin" {
            *assignment = Assignment::graded("fin", "Final Exam", "final_exam", 92.0, 100.0)
                .with_statistics(75.0, 8.5);
        }
    }

    let report = weighted(
        GradeProjector::default()
            .project(&assignments, Some(&config))
            .expect("projection"),
    );

    assert_eq!(report.applied_policies, vec!["final-replaces-midterm"]);
    let substitution = &report.substitutions[0];
    assert_eq!(substitution.target_id.0, "mt");
    assert!((substitution.original_score - 62.0).abs() < 1e-9);
    assert!((substitution.new_score - 90.0).abs() < 1e-9);

    let average = report.weighted_average;
    assert!((average - 79.5 / 0.9).abs() < 1e-6, "got {average}");
    assert!(!report.has_all_categories);
    let project = report.category("project").expect("project detail");
    assert!(project.average.is_none());
    assert_eq!(project.total_count, 1);
}
