use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::placements::applications::repository::{
    NoticeError, NoticePublisher, PlacementNotice, PlacementRepository, RepositoryError,
};
use crate::placements::applications::{placement_router, PlacementService};
use crate::placements::domain::{
    Application, ApplicationId, Company, CompanyId, Department, DepartmentId, PlacementRecord,
    Student, StudentId, StudentStatus, Visit, VisitId,
};

pub(super) fn department() -> Department {
    Department {
        id: DepartmentId(1),
        name: "Computer Science".to_string(),
    }
}

pub(super) fn company() -> Company {
    Company {
        id: CompanyId(1),
        name: "Helios Labs".to_string(),
        description: "Product engineering".to_string(),
        website: "https://helioslabs.example".to_string(),
        contact_email: "talent@helioslabs.example".to_string(),
        contact_phone: "040-1234567".to_string(),
    }
}

pub(super) fn student(id: u64, batch_year: i32, cgpa: f64) -> Student {
    Student {
        id: StudentId(id),
        name: "Asha Verma".to_string(),
        roll_number: format!("CS21B{id:03}"),
        batch_year,
        department_id: DepartmentId(1),
        cgpa,
        phone_number: "9876543210".to_string(),
        resume_url: "https://cdn.example.edu/resumes/asha.pdf".to_string(),
        current_status: StudentStatus::NotPlaced,
    }
}

/// Visit with a deadline far enough out that wall-clock "now" inside the
/// router handlers always lands inside the window.
pub(super) fn visit(id: u64, batch_year: i32, minimum_cgpa: f64) -> Visit {
    Visit {
        id: VisitId(id),
        company_id: CompanyId(1),
        visit_date: NaiveDate::from_ymd_opt(2999, 2, 10).expect("valid date"),
        application_deadline: NaiveDate::from_ymd_opt(2999, 2, 1)
            .expect("valid date")
            .and_hms_opt(23, 59, 59)
            .expect("valid time"),
        job_positions: "Software Engineer, Data Analyst".to_string(),
        salary_package: "10 LPA".to_string(),
        eligibility_criteria: minimum_cgpa,
        batch_year,
        is_active: true,
    }
}

/// Visit whose application window closed on 2025-02-01.
pub(super) fn expired_visit(id: u64, batch_year: i32, minimum_cgpa: f64) -> Visit {
    let mut visit = visit(id, batch_year, minimum_cgpa);
    visit.visit_date = NaiveDate::from_ymd_opt(2025, 2, 10).expect("valid date");
    visit.application_deadline = NaiveDate::from_ymd_opt(2025, 2, 1)
        .expect("valid date")
        .and_hms_opt(23, 59, 59)
        .expect("valid time");
    visit
}

/// Fixed "now" inside the expired visit's window.
pub(super) fn during_window() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 15)
        .expect("valid date")
        .and_hms_opt(10, 0, 0)
        .expect("valid time")
}

/// Fixed "now" after the expired visit's deadline has lapsed.
pub(super) fn after_deadline() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 2, 2)
        .expect("valid date")
        .and_hms_opt(0, 0, 1)
        .expect("valid time")
}

#[derive(Default)]
struct State {
    students: BTreeMap<StudentId, Student>,
    departments: BTreeMap<DepartmentId, Department>,
    companies: BTreeMap<CompanyId, Company>,
    visits: BTreeMap<VisitId, Visit>,
    applications: BTreeMap<ApplicationId, Application>,
    records: Vec<PlacementRecord>,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    state: Arc<Mutex<State>>,
}

impl MemoryRepository {
    pub(super) fn seed_student(&self, student: Student) {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state.students.insert(student.id, student);
    }

    pub(super) fn seed_department(&self, department: Department) {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state.departments.insert(department.id, department);
    }

    pub(super) fn seed_company(&self, company: Company) {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state.companies.insert(company.id, company);
    }

    pub(super) fn seed_visit(&self, visit: Visit) {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state.visits.insert(visit.id, visit);
    }
}

impl PlacementRepository for MemoryRepository {
    fn student(&self, id: StudentId) -> Result<Option<Student>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state.students.get(&id).cloned())
    }

    fn department(&self, id: DepartmentId) -> Result<Option<Department>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state.departments.get(&id).cloned())
    }

    fn company(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state.companies.get(&id).cloned())
    }

    fn visit(&self, id: VisitId) -> Result<Option<Visit>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state.visits.get(&id).cloned())
    }

    fn application(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state.applications.get(&id).cloned())
    }

    fn application_for_pair(
        &self,
        student_id: StudentId,
        visit_id: VisitId,
    ) -> Result<Option<Application>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state
            .applications
            .values()
            .find(|application| {
                application.student_id == student_id && application.visit_id == visit_id
            })
            .cloned())
    }

    fn students(&self) -> Result<Vec<Student>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state.students.values().cloned().collect())
    }

    fn companies(&self) -> Result<Vec<Company>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state.companies.values().cloned().collect())
    }

    fn visits(&self) -> Result<Vec<Visit>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state.visits.values().cloned().collect())
    }

    fn applications(&self) -> Result<Vec<Application>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state.applications.values().cloned().collect())
    }

    fn records(&self) -> Result<Vec<PlacementRecord>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state.records.clone())
    }

    fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        let duplicate = state.applications.values().any(|existing| {
            existing.student_id == application.student_id
                && existing.visit_id == application.visit_id
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        state.applications.insert(application.id, application.clone());
        Ok(application)
    }

    fn commit_decision(
        &self,
        application: Application,
        record: Option<PlacementRecord>,
        student: Option<Student>,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        if !state.applications.contains_key(&application.id) {
            return Err(RepositoryError::NotFound);
        }
        state.applications.insert(application.id, application);
        if let Some(record) = record {
            state.records.push(record);
        }
        if let Some(student) = student {
            state.students.insert(student.id, student);
        }
        Ok(())
    }

    fn remove_company(&self, id: CompanyId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        if !state.companies.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        let referenced = state.visits.values().any(|visit| visit.company_id == id)
            || state.records.iter().any(|record| record.company_id == id);
        if referenced {
            return Err(RepositoryError::CompanyInUse);
        }
        state.companies.remove(&id);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotices {
    events: Arc<Mutex<Vec<PlacementNotice>>>,
}

impl MemoryNotices {
    pub(super) fn events(&self) -> Vec<PlacementNotice> {
        self.events.lock().expect("notice mutex poisoned").clone()
    }
}

impl NoticePublisher for MemoryNotices {
    fn publish(&self, notice: PlacementNotice) -> Result<(), NoticeError> {
        self.events
            .lock()
            .expect("notice mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl PlacementRepository for UnavailableRepository {
    fn student(&self, _id: StudentId) -> Result<Option<Student>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn department(&self, _id: DepartmentId) -> Result<Option<Department>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn company(&self, _id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn visit(&self, _id: VisitId) -> Result<Option<Visit>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn application(&self, _id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn application_for_pair(
        &self,
        _student_id: StudentId,
        _visit_id: VisitId,
    ) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn students(&self) -> Result<Vec<Student>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn companies(&self) -> Result<Vec<Company>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn visits(&self) -> Result<Vec<Visit>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn applications(&self) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn records(&self) -> Result<Vec<PlacementRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_application(
        &self,
        _application: Application,
    ) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn commit_decision(
        &self,
        _application: Application,
        _record: Option<PlacementRecord>,
        _student: Option<Student>,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove_company(&self, _id: CompanyId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Service over a seeded repository: one department, one company, one
/// eligible student (id 1), and one open visit (id 10).
pub(super) fn build_service() -> (
    Arc<PlacementService<MemoryRepository, MemoryNotices>>,
    Arc<MemoryRepository>,
    Arc<MemoryNotices>,
) {
    let repository = Arc::new(MemoryRepository::default());
    repository.seed_department(department());
    repository.seed_company(company());
    repository.seed_student(student(1, 2025, 8.2));
    repository.seed_visit(visit(10, 2025, 7.5));

    let notices = Arc::new(MemoryNotices::default());
    let service = Arc::new(PlacementService::new(repository.clone(), notices.clone()));
    (service, repository, notices)
}

pub(super) fn router_with_service(
    service: Arc<PlacementService<MemoryRepository, MemoryNotices>>,
) -> axum::Router {
    placement_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
