use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::super::domain::{Application, Company, CompanyId, PlacementRecord, Visit, VisitId};

/// Recruiting funnel counts for one company. `conversion_rate` is `None`
/// when the company has no applications; rendered and exported as "N/A".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyStat {
    pub company_id: CompanyId,
    pub name: String,
    pub total_visits: usize,
    pub total_applications: usize,
    pub total_placements: usize,
    pub conversion_rate: Option<f64>,
}

impl CompanyStat {
    pub fn conversion_label(&self) -> String {
        match self.conversion_rate {
            Some(rate) => format!("{rate:.2}%"),
            None => "N/A".to_string(),
        }
    }
}

/// Build per-company funnel stats. Applications attribute to a company
/// through the visit they target; rows come out in the companies'
/// insertion order, ready for [`sort_company_stats`].
pub fn company_stats(
    companies: &[Company],
    visits: &[Visit],
    applications: &[Application],
    records: &[PlacementRecord],
) -> Vec<CompanyStat> {
    let visit_company: HashMap<VisitId, CompanyId> = visits
        .iter()
        .map(|visit| (visit.id, visit.company_id))
        .collect();

    companies
        .iter()
        .map(|company| {
            let total_visits = visits
                .iter()
                .filter(|visit| visit.company_id == company.id)
                .count();
            let total_applications = applications
                .iter()
                .filter(|application| {
                    visit_company.get(&application.visit_id) == Some(&company.id)
                })
                .count();
            let total_placements = records
                .iter()
                .filter(|record| record.company_id == company.id)
                .count();
            let conversion_rate = (total_applications > 0)
                .then(|| total_placements as f64 / total_applications as f64 * 100.0);

            CompanyStat {
                company_id: company.id,
                name: company.name.clone(),
                total_visits,
                total_applications,
                total_placements,
                conversion_rate,
            }
        })
        .collect()
}

/// Column the caller wants the company table ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanySortKey {
    Name,
    Visits,
    Applications,
    Placements,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

/// Stable sort: equal keys keep their insertion order.
pub fn sort_company_stats(
    stats: &mut [CompanyStat],
    key: CompanySortKey,
    direction: SortDirection,
) {
    let compare = |a: &CompanyStat, b: &CompanyStat| -> Ordering {
        match key {
            CompanySortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            CompanySortKey::Visits => a.total_visits.cmp(&b.total_visits),
            CompanySortKey::Applications => a.total_applications.cmp(&b.total_applications),
            CompanySortKey::Placements => a.total_placements.cmp(&b.total_placements),
        }
    };

    match direction {
        SortDirection::Ascending => stats.sort_by(compare),
        SortDirection::Descending => stats.sort_by(|a, b| compare(b, a)),
    }
}
