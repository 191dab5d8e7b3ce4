use std::collections::BTreeMap;

use serde::Serialize;

use super::super::domain::PlacementRecord;

/// Branch → year → placement records. `BTreeMap` keeps branches
/// alphabetical and years ascending without a separate sort pass.
pub type BranchYearMatrix = BTreeMap<String, BTreeMap<i32, Vec<PlacementRecord>>>;

/// Group placement records by their denormalized branch, then batch year.
pub fn branch_year_matrix(records: &[PlacementRecord]) -> BranchYearMatrix {
    let mut matrix = BranchYearMatrix::new();
    for record in records {
        matrix
            .entry(record.branch.clone())
            .or_default()
            .entry(record.batch_year)
            .or_default()
            .push(record.clone());
    }
    matrix
}

/// Placement count for one branch, summed across years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchTotal {
    pub branch: String,
    pub placements: usize,
}

/// Placement count for one batch year, summed across branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearTotal {
    pub year: i32,
    pub placements: usize,
}

/// Flatten the matrix into a branch-totals table.
pub fn branch_totals(matrix: &BranchYearMatrix) -> Vec<BranchTotal> {
    matrix
        .iter()
        .map(|(branch, years)| BranchTotal {
            branch: branch.clone(),
            placements: years.values().map(Vec::len).sum(),
        })
        .collect()
}

/// Flatten the matrix into a year-totals table, ascending by year.
pub fn year_totals(matrix: &BranchYearMatrix) -> Vec<YearTotal> {
    let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
    for years in matrix.values() {
        for (year, records) in years {
            *by_year.entry(*year).or_default() += records.len();
        }
    }
    by_year
        .into_iter()
        .map(|(year, placements)| YearTotal { year, placements })
        .collect()
}
