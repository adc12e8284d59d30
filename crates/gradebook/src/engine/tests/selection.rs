use super::common::*;
use crate::engine::{select_for_category, Assignment, BestOfPolicy, DropPolicy};

fn ids(assignments: &[&Assignment]) -> Vec<String> {
    assignments
        .iter()
        .map(|assignment| assignment.id.0.clone())
        .collect()
}

#[test]
fn drop_lowest_removes_weakest_score() {
    let assignments = homework();
    let members: Vec<&Assignment> = assignments.iter().collect();

    let selection = select_for_category(&members, Some(&DropPolicy::lowest(1)), None);

    assert_eq!(ids(&selection.dropped), vec!["hw3"]);
    assert_eq!(ids(&selection.kept), vec!["hw1", "hw2"]);
}

#[test]
fn best_of_keeps_highest_scores_best_first() {
    let assignments = homework();
    let members: Vec<&Assignment> = assignments.iter().collect();
    let policy = BestOfPolicy {
        category: "homework".to_string(),
        count: 2,
    };

    let selection = select_for_category(&members, None, Some(&policy));

    assert_eq!(ids(&selection.kept), vec!["hw2", "hw1"]);
    assert_eq!(ids(&selection.dropped), vec!["hw3"]);
}

#[test]
fn drop_policy_always_keeps_one_graded_score() {
    let assignments = homework();
    let members: Vec<&Assignment> = assignments.iter().collect();

    let selection = select_for_category(&members, Some(&DropPolicy::lowest(10)), None);

    assert_eq!(ids(&selection.kept), vec!["hw2"]);
    assert_eq!(selection.dropped.len(), 2);
}

#[test]
fn disabled_drop_policy_keeps_everything() {
    let assignments = homework();
    let members: Vec<&Assignment> = assignments.iter().collect();
    let policy = DropPolicy {
        enabled: false,
        count: 2,
    };

    let selection = select_for_category(&members, Some(&policy), None);

    assert_eq!(selection.kept.len(), 3);
    assert!(selection.dropped.is_empty());
}

#[test]
fn best_of_takes_precedence_over_drop_policy() {
    let assignments = homework();
    let members: Vec<&Assignment> = assignments.iter().collect();
    let policy = BestOfPolicy {
        category: "homework".to_string(),
        count: 1,
    };

    let selection = select_for_category(&members, Some(&DropPolicy::lowest(1)), Some(&policy));

    assert_eq!(ids(&selection.kept), vec!["hw2"]);
    assert_eq!(selection.dropped.len(), 2);
}

#[test]
fn best_of_selection_is_idempotent() {
    let assignments = homework();
    let members: Vec<&Assignment> = assignments.iter().collect();
    let policy = BestOfPolicy {
        category: "homework".to_string(),
        count: 2,
    };

    let first = select_for_category(&members, None, Some(&policy));
    let second = select_for_category(&first.kept, None, Some(&policy));

    assert_eq!(ids(&second.kept), ids(&first.kept));
    assert!(second.dropped.is_empty());
}

#[test]
fn best_of_count_zero_still_keeps_one() {
    let assignments = homework();
    let members: Vec<&Assignment> = assignments.iter().collect();
    let policy = BestOfPolicy {
        category: "homework".to_string(),
        count: 0,
    };

    let selection = select_for_category(&members, None, Some(&policy));

    assert_eq!(ids(&selection.kept), vec!["hw2"]);
}

#[test]
fn ungraded_work_is_neither_kept_nor_dropped() {
    let mut assignments = homework();
    assignments.push(ungraded("hw4", "homework", 10.0));
    let members: Vec<&Assignment> = assignments.iter().collect();

    let selection = select_for_category(&members, Some(&DropPolicy::lowest(1)), None);

    assert_eq!(selection.kept.len() + selection.dropped.len(), 3);
    assert!(!ids(&selection.kept).contains(&"hw4".to_string()));
    assert!(!ids(&selection.dropped).contains(&"hw4".to_string()));
}

#[test]
fn ties_keep_recorded_order() {
    let assignments = vec![
        graded("q1", "quiz", 4.0, 5.0),
        graded("q2", "quiz", 8.0, 10.0),
        graded("q3", "quiz", 2.0, 5.0),
    ];
    let members: Vec<&Assignment> = assignments.iter().collect();

    let selection = select_for_category(&members, Some(&DropPolicy::lowest(1)), None);

    assert_eq!(ids(&selection.kept), vec!["q1", "q2"]);
}

#[test]
fn category_without_grades_selects_nothing() {
    let assignments = vec![ungraded("final", "final", 100.0)];
    let members: Vec<&Assignment> = assignments.iter().collect();

    let selection = select_for_category(&members, Some(&DropPolicy::lowest(1)), None);

    assert!(selection.kept.is_empty());
    assert!(selection.dropped.is_empty());
}
