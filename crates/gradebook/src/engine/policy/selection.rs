use std::cmp::Ordering;

use super::super::course_config::{BestOfPolicy, DropPolicy};
use super::super::domain::Assignment;

/// Graded work split into what counts toward a category and what was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    pub kept: Vec<&'a Assignment>,
    pub dropped: Vec<&'a Assignment>,
}

/// Decide which graded assignments in a category count.
///
/// `best_of` wins over a drop policy when both are configured. Both keep at
/// least one graded assignment. Ungraded records are ignored; the input is
/// never reordered.
pub fn select_for_category<'a>(
    assignments: &[&'a Assignment],
    drop_policy: Option<&DropPolicy>,
    best_of: Option<&BestOfPolicy>,
) -> Selection<'a> {
    let mut graded: Vec<&'a Assignment> = assignments
        .iter()
        .copied()
        .filter(|assignment| assignment.is_graded())
        .collect();

    if graded.is_empty() {
        return Selection {
            kept: Vec::new(),
            dropped: Vec::new(),
        };
    }

    if let Some(best_of) = best_of {
        // Vec::sort_by is stable, so ties keep their recorded order.
        graded.sort_by(|a, b| by_ratio(b, a));
        let keep = best_of.count.max(1).min(graded.len());
        let dropped = graded.split_off(keep);
        return Selection {
            kept: graded,
            dropped,
        };
    }

    match drop_policy {
        Some(policy) if policy.is_active() => {
            graded.sort_by(|a, b| by_ratio(a, b));
            let drop_count = policy.count.min(graded.len() - 1);
            let kept = graded.split_off(drop_count);
            Selection {
                kept,
                dropped: graded,
            }
        }
        _ => Selection {
            kept: graded,
            dropped: Vec::new(),
        },
    }
}

fn by_ratio(a: &Assignment, b: &Assignment) -> Ordering {
    let left = a.ratio().unwrap_or(0.0);
    let right = b.ratio().unwrap_or(0.0);
    left.total_cmp(&right)
}
