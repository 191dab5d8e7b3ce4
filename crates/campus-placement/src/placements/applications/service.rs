use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::info;

use super::super::domain::{
    Application, ApplicationId, ApplicationStatus, CompanyId, DepartmentId, PlacementRecord,
    RecordId, Student, StudentId, StudentStatus, VisitId,
};
use super::super::eligibility::{evaluate, EligibilityReport};
use super::repository::{
    NoticeError, NoticePublisher, PlacementNotice, PlacementRepository, RepositoryError,
};

/// Service gating every apply action and driving applications through their
/// review lifecycle. This is the single source of truth for application
/// state; no caller may fabricate an "applied" status on its own.
pub struct PlacementService<R, N> {
    repository: Arc<R>,
    notices: Arc<N>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    ApplicationId(APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

fn next_record_id() -> RecordId {
    RecordId(RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// Admin verdict on a pending application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Selected { internship: bool },
    Rejected { feedback: Option<String> },
}

impl<R, N> PlacementService<R, N>
where
    R: PlacementRepository + 'static,
    N: NoticePublisher + 'static,
{
    pub fn new(repository: Arc<R>, notices: Arc<N>) -> Self {
        Self {
            repository,
            notices,
        }
    }

    /// Evaluate a student against a visit without applying. The same check
    /// runs again inside [`PlacementService::apply`]; this variant exists so
    /// the portal can render a warning before the student commits.
    pub fn eligibility(
        &self,
        student_id: StudentId,
        visit_id: VisitId,
    ) -> Result<EligibilityReport, PlacementServiceError> {
        let student = self
            .repository
            .student(student_id)?
            .ok_or(PlacementServiceError::UnknownStudent(student_id))?;
        let visit = self
            .repository
            .visit(visit_id)?
            .ok_or(PlacementServiceError::UnknownVisit(visit_id))?;

        Ok(evaluate(&student, &visit))
    }

    /// Submit an application for a visit, enforcing the one-per-pair
    /// invariant, eligibility, the deadline, and the active flag.
    pub fn apply(
        &self,
        student_id: StudentId,
        visit_id: VisitId,
        now: NaiveDateTime,
    ) -> Result<Application, PlacementServiceError> {
        let student = self
            .repository
            .student(student_id)?
            .ok_or(PlacementServiceError::UnknownStudent(student_id))?;
        let visit = self
            .repository
            .visit(visit_id)?
            .ok_or(PlacementServiceError::UnknownVisit(visit_id))?;

        if self
            .repository
            .application_for_pair(student_id, visit_id)?
            .is_some()
        {
            return Err(PlacementServiceError::AlreadyApplied);
        }

        // Deadline and active-flag checks run before eligibility so an
        // expired window reports as such even for ineligible students.
        if now > visit.application_deadline {
            return Err(PlacementServiceError::DeadlinePassed);
        }

        if !visit.is_active {
            return Err(PlacementServiceError::VisitInactive);
        }

        let report = evaluate(&student, &visit);
        if !report.is_eligible {
            return Err(PlacementServiceError::NotEligible {
                reasons: report.reasons,
            });
        }

        let application = Application {
            id: next_application_id(),
            student_id,
            visit_id,
            status: ApplicationStatus::Pending,
            applied_on: now,
            feedback: None,
        };

        // The repository re-checks the pair under its own lock; a concurrent
        // apply that lost the race surfaces here as a conflict.
        match self.repository.insert_application(application) {
            Ok(stored) => {
                info!(student = %student_id, visit = %visit_id, "application submitted");
                Ok(stored)
            }
            Err(RepositoryError::Conflict) => Err(PlacementServiceError::AlreadyApplied),
            Err(other) => Err(other.into()),
        }
    }

    /// Resolve a pending application. Selection creates exactly one
    /// placement record and flips the student's status in the same
    /// repository commit as the application update.
    pub fn decide(
        &self,
        application_id: ApplicationId,
        decision: Decision,
        now: NaiveDateTime,
    ) -> Result<Application, PlacementServiceError> {
        let mut application = self
            .repository
            .application(application_id)?
            .ok_or(PlacementServiceError::UnknownApplication(application_id))?;

        if application.status != ApplicationStatus::Pending {
            return Err(PlacementServiceError::InvalidTransition {
                current: application.status,
            });
        }

        match decision {
            Decision::Rejected { feedback } => {
                application.status = ApplicationStatus::Rejected;
                application.feedback = feedback;
                self.repository
                    .commit_decision(application.clone(), None, None)?;
                info!(application = %application_id, "application rejected");
                Ok(application)
            }
            Decision::Selected { internship } => {
                let mut student = self
                    .repository
                    .student(application.student_id)?
                    .ok_or(PlacementServiceError::UnknownStudent(application.student_id))?;
                let visit = self
                    .repository
                    .visit(application.visit_id)?
                    .ok_or(PlacementServiceError::UnknownVisit(application.visit_id))?;
                let company = self
                    .repository
                    .company(visit.company_id)?
                    .ok_or(PlacementServiceError::UnknownCompany(visit.company_id))?;
                let branch = self
                    .repository
                    .department(student.department_id)?
                    .ok_or(PlacementServiceError::UnknownDepartment(
                        student.department_id,
                    ))?
                    .name;

                let record = PlacementRecord {
                    id: next_record_id(),
                    student_id: student.id,
                    company_id: company.id,
                    position: visit.job_positions.clone(),
                    salary_package: visit.salary_package.clone(),
                    placement_date: now.date(),
                    internship,
                    batch_year: student.batch_year,
                    branch,
                };

                application.status = ApplicationStatus::Selected;
                student.current_status = if internship {
                    StudentStatus::Intern
                } else {
                    StudentStatus::Placed
                };

                self.repository.commit_decision(
                    application.clone(),
                    Some(record),
                    Some(student),
                )?;
                info!(application = %application_id, company = %company.name, "candidate selected");

                // The decision is committed at this point; a failed notice
                // surfaces to the caller but does not undo it.
                let mut details = BTreeMap::new();
                details.insert("company".to_string(), company.name.clone());
                details.insert("position".to_string(), visit.job_positions.clone());
                self.notices.publish(PlacementNotice {
                    template: "candidate_selected".to_string(),
                    application_id,
                    details,
                })?;

                Ok(application)
            }
        }
    }

    /// Fetch an application for API responses.
    pub fn get(
        &self,
        application_id: ApplicationId,
    ) -> Result<Application, PlacementServiceError> {
        self.repository
            .application(application_id)?
            .ok_or(PlacementServiceError::UnknownApplication(application_id))
    }

    /// Admin listing, optionally narrowed to one status.
    pub fn applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, PlacementServiceError> {
        let mut applications = self.repository.applications()?;
        if let Some(status) = status {
            applications.retain(|application| application.status == status);
        }
        Ok(applications)
    }

    /// Every application a student has submitted.
    pub fn student_applications(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<Application>, PlacementServiceError> {
        let mut applications = self.repository.applications()?;
        applications.retain(|application| application.student_id == student_id);
        Ok(applications)
    }
}

/// Error raised by the placement service. Every variant is recoverable by
/// the caller; the UI shows the message and lets the student retry
/// elsewhere.
#[derive(Debug, thiserror::Error)]
pub enum PlacementServiceError {
    #[error("you have already applied for this opportunity")]
    AlreadyApplied,
    #[error("not eligible: {}", .reasons.join("; "))]
    NotEligible { reasons: Vec<String> },
    #[error("the application deadline has passed")]
    DeadlinePassed,
    #[error("this visit is not accepting applications")]
    VisitInactive,
    #[error("application has already been reviewed as {}", .current.label())]
    InvalidTransition { current: ApplicationStatus },
    #[error("student {0} not found")]
    UnknownStudent(StudentId),
    #[error("visit {0} not found")]
    UnknownVisit(VisitId),
    #[error("application {0} not found")]
    UnknownApplication(ApplicationId),
    #[error("company {0} not found")]
    UnknownCompany(CompanyId),
    #[error("department {0} not found")]
    UnknownDepartment(DepartmentId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notice(#[from] NoticeError),
}
