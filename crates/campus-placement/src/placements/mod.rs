//! Placement domain: entities, eligibility rules, application lifecycle,
//! and the reporting aggregator.

pub mod applications;
pub mod domain;
pub mod eligibility;
pub mod reports;

pub use domain::{
    Application, ApplicationId, ApplicationStatus, Company, CompanyId, Department, DepartmentId,
    PlacementRecord, RecordId, Student, StudentId, StudentStatus, Visit, VisitId,
};
pub use eligibility::{evaluate, EligibilityReport};
