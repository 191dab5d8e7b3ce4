use serde::{Deserialize, Serialize};

use super::domain::{Student, Visit};

/// Verdict produced by [`evaluate`]. `is_eligible` holds exactly when
/// `reasons` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub is_eligible: bool,
    pub reasons: Vec<String>,
}

impl EligibilityReport {
    fn from_reasons(reasons: Vec<String>) -> Self {
        Self {
            is_eligible: reasons.is_empty(),
            reasons,
        }
    }
}

/// Check a student against a visit's criteria. Every rule runs; all failing
/// reasons are collected so the caller can surface them together. Pure, and
/// re-run server-side on every apply regardless of any earlier verdict the
/// client may hold.
pub fn evaluate(student: &Student, visit: &Visit) -> EligibilityReport {
    let mut reasons = Vec::new();

    if student.batch_year != visit.batch_year {
        reasons.push(format!(
            "Your batch year ({}) doesn't match the requirement ({})",
            student.batch_year, visit.batch_year
        ));
    }

    if student.cgpa < visit.eligibility_criteria {
        reasons.push(format!(
            "Your CGPA ({}) is below the required minimum ({})",
            student.cgpa, visit.eligibility_criteria
        ));
    }

    EligibilityReport::from_reasons(reasons)
}
