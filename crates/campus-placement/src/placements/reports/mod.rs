//! Read-only aggregation over entity snapshots. Every function here is pure
//! and idempotent: inputs are borrowed, never mutated, and empty input
//! yields zeroed/empty output rather than an error.

mod branch_year;
mod companies;
mod export;
mod filter;
mod summary;

pub use branch_year::{branch_totals, branch_year_matrix, year_totals, BranchTotal, BranchYearMatrix, YearTotal};
pub use companies::{company_stats, sort_company_stats, CompanySortKey, CompanyStat, SortDirection};
pub use export::company_stats_csv;
pub use filter::{filter_records, PlacementRecordView, RecordFilter};
pub use summary::{placement_summary, BatchStat, PlacementSummary};
