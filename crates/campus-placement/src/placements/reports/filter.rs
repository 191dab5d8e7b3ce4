use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::domain::{Company, CompanyId, PlacementRecord, RecordId, Student, StudentId};

/// Caller-selected narrowing of the placement record table. Year and
/// company are exact matches, `search` is a case-insensitive substring over
/// student name, company name, and position; all present filters must hold.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordFilter {
    #[serde(default)]
    pub batch_year: Option<i32>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

/// Placement record row with student and company names resolved for
/// display and export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementRecordView {
    pub record_id: RecordId,
    pub student_name: String,
    pub company_name: String,
    pub position: String,
    pub salary_package: String,
    pub placement_date: NaiveDate,
    pub internship: bool,
    pub batch_year: i32,
    pub branch: String,
}

// Callers pass an already-lowercased needle.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Resolve names and apply the filter. Records pointing at students or
/// companies missing from the snapshot keep an empty name rather than
/// dropping the row.
pub fn filter_records(
    records: &[PlacementRecord],
    students: &[Student],
    companies: &[Company],
    filter: &RecordFilter,
) -> Vec<PlacementRecordView> {
    let student_names: HashMap<StudentId, &str> = students
        .iter()
        .map(|student| (student.id, student.name.as_str()))
        .collect();
    let company_names: HashMap<CompanyId, &str> = companies
        .iter()
        .map(|company| (company.id, company.name.as_str()))
        .collect();

    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|needle| !needle.is_empty())
        .map(str::to_lowercase);

    records
        .iter()
        .filter_map(|record| {
            let student_name = student_names
                .get(&record.student_id)
                .copied()
                .unwrap_or_default();
            let company_name = company_names
                .get(&record.company_id)
                .copied()
                .unwrap_or_default();

            if let Some(year) = filter.batch_year {
                if record.batch_year != year {
                    return None;
                }
            }
            if let Some(company) = filter.company.as_deref() {
                if company_name != company {
                    return None;
                }
            }
            if let Some(needle) = search.as_deref() {
                let hit = contains_ignore_case(student_name, needle)
                    || contains_ignore_case(company_name, needle)
                    || contains_ignore_case(&record.position, needle);
                if !hit {
                    return None;
                }
            }

            Some(PlacementRecordView {
                record_id: record.id,
                student_name: student_name.to_string(),
                company_name: company_name.to_string(),
                position: record.position.clone(),
                salary_package: record.salary_package.clone(),
                placement_date: record.placement_date,
                internship: record.internship,
                batch_year: record.batch_year,
                branch: record.branch.clone(),
            })
        })
        .collect()
}
