use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::super::domain::{
    Application, ApplicationId, Company, CompanyId, Department, DepartmentId, PlacementRecord,
    Student, StudentId, Visit, VisitId,
};

/// Storage abstraction over the portal's persistence layer so the lifecycle
/// service can be exercised in isolation. Implementations must make
/// `insert_application` a serialized check-then-insert on the
/// (student, visit) pair, and `commit_decision` a single atomic unit.
pub trait PlacementRepository: Send + Sync {
    fn student(&self, id: StudentId) -> Result<Option<Student>, RepositoryError>;
    fn department(&self, id: DepartmentId) -> Result<Option<Department>, RepositoryError>;
    fn company(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError>;
    fn visit(&self, id: VisitId) -> Result<Option<Visit>, RepositoryError>;
    fn application(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn application_for_pair(
        &self,
        student_id: StudentId,
        visit_id: VisitId,
    ) -> Result<Option<Application>, RepositoryError>;

    fn students(&self) -> Result<Vec<Student>, RepositoryError>;
    fn companies(&self) -> Result<Vec<Company>, RepositoryError>;
    fn visits(&self) -> Result<Vec<Visit>, RepositoryError>;
    fn applications(&self) -> Result<Vec<Application>, RepositoryError>;
    fn records(&self) -> Result<Vec<PlacementRecord>, RepositoryError>;

    /// Store a new application. Fails with [`RepositoryError::Conflict`] if
    /// any application for the same (student, visit) pair already exists;
    /// under concurrent calls for one pair, at most one insert may succeed.
    fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError>;

    /// Apply a review decision as one atomic unit: the updated application,
    /// plus the placement record and student status flip when the decision
    /// was a selection. Either everything lands or nothing does.
    fn commit_decision(
        &self,
        application: Application,
        record: Option<PlacementRecord>,
        student: Option<Student>,
    ) -> Result<(), RepositoryError>;

    /// Delete a company. Fails with [`RepositoryError::CompanyInUse`] while
    /// any visit or placement record still references it.
    fn remove_company(&self, id: CompanyId) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("company is still referenced by visits or placement records")]
    CompanyInUse,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing outbound notification hooks (mail or portal banners for
/// the excluded UI layer).
pub trait NoticePublisher: Send + Sync {
    fn publish(&self, notice: PlacementNotice) -> Result<(), NoticeError>;
}

/// Notification payload emitted when an application is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementNotice {
    pub template: String,
    pub application_id: ApplicationId,
    pub details: BTreeMap<String, String>,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NoticeError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub student_id: StudentId,
    pub visit_id: VisitId,
    pub status: &'static str,
    pub applied_on: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl Application {
    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id,
            student_id: self.student_id,
            visit_id: self.visit_id,
            status: self.status.label(),
            applied_on: self.applied_on,
            feedback: self.feedback.clone(),
        }
    }
}
