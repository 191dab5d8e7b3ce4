use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier for a student profile.
    StudentId
);
id_type!(
    /// Identifier for an academic department.
    DepartmentId
);
id_type!(
    /// Identifier for a recruiting company.
    CompanyId
);
id_type!(
    /// Identifier for a scheduled company visit (opportunity).
    VisitId
);
id_type!(
    /// Identifier for a submitted application.
    ApplicationId
);
id_type!(
    /// Identifier for an immutable placement record.
    RecordId
);

/// Where a student currently stands in the placement season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentStatus {
    NotPlaced,
    Placed,
    Intern,
}

impl StudentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            StudentStatus::NotPlaced => "NOT_PLACED",
            StudentStatus::Placed => "PLACED",
            StudentStatus::Intern => "INTERN",
        }
    }
}

/// Student profile as saved from the portal. Profiles are never deleted;
/// `current_status` is the only field the lifecycle manager mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub roll_number: String,
    pub batch_year: i32,
    pub department_id: DepartmentId,
    pub cgpa: f64,
    pub phone_number: String,
    pub resume_url: String,
    pub current_status: StudentStatus,
}

/// Academic department reference data, admin-managed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
}

/// Recruiting company, admin-managed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub description: String,
    pub website: String,
    pub contact_email: String,
    pub contact_phone: String,
}

/// A scheduled recruiting visit with its application window and criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub id: VisitId,
    pub company_id: CompanyId,
    pub visit_date: NaiveDate,
    pub application_deadline: NaiveDateTime,
    /// Comma-delimited role names as entered by the admin.
    pub job_positions: String,
    /// Free-form package string, e.g. "10 LPA".
    pub salary_package: String,
    /// Minimum CGPA required of applicants.
    pub eligibility_criteria: f64,
    /// The single cohort eligible for this visit.
    pub batch_year: i32,
    pub is_active: bool,
}

impl Visit {
    /// Individual role names, trimmed, empty segments dropped.
    pub fn positions(&self) -> Vec<&str> {
        self.job_positions
            .split(',')
            .map(str::trim)
            .filter(|position| !position.is_empty())
            .collect()
    }
}

/// Review state of an application. `Pending` is the only initial state;
/// `Selected` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Selected => "SELECTED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }
}

/// A student's request to be considered for a visit. At most one exists per
/// (student, visit) pair; `applied_on` is set at creation and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub student_id: StudentId,
    pub visit_id: VisitId,
    pub status: ApplicationStatus,
    pub applied_on: NaiveDateTime,
    /// Reviewer feedback, attached only when the application is rejected.
    pub feedback: Option<String>,
}

/// Append-only record of a successful placement, derived from a selected
/// application. Batch and branch are denormalized from the student at
/// creation time so reports survive later profile edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub id: RecordId,
    pub student_id: StudentId,
    pub company_id: CompanyId,
    pub position: String,
    pub salary_package: String,
    pub placement_date: NaiveDate,
    pub internship: bool,
    pub batch_year: i32,
    pub branch: String,
}
