use std::collections::BTreeMap;

use serde::Serialize;

use super::super::domain::{Student, StudentStatus};

/// Placement counts for a single admission cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchStat {
    pub batch_year: i32,
    pub total_students: usize,
    pub placed_students: usize,
    pub placement_percentage: f64,
}

/// Dashboard headline numbers plus the batch-wise breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementSummary {
    pub total_students: usize,
    pub placed_students: usize,
    pub placement_percentage: f64,
    pub batch_wise_stats: Vec<BatchStat>,
}

fn percentage(placed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        placed as f64 / total as f64 * 100.0
    }
}

/// Derive the overall summary from a student snapshot. Only `PLACED` counts
/// as placed; interns stay in the denominator without moving the needle.
/// Batch rows come out ascending by year.
pub fn placement_summary(students: &[Student]) -> PlacementSummary {
    let mut batches: BTreeMap<i32, (usize, usize)> = BTreeMap::new();
    let mut placed_students = 0usize;

    for student in students {
        let entry = batches.entry(student.batch_year).or_default();
        entry.0 += 1;
        if student.current_status == StudentStatus::Placed {
            entry.1 += 1;
            placed_students += 1;
        }
    }

    let batch_wise_stats = batches
        .into_iter()
        .map(|(batch_year, (total, placed))| BatchStat {
            batch_year,
            total_students: total,
            placed_students: placed,
            placement_percentage: percentage(placed, total),
        })
        .collect();

    PlacementSummary {
        total_students: students.len(),
        placed_students,
        placement_percentage: percentage(placed_students, students.len()),
        batch_wise_stats,
    }
}
