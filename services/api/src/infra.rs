use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Local};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use campus_placement::placements::applications::{
    NoticeError, NoticePublisher, PlacementNotice, PlacementRepository, RepositoryError,
};
use campus_placement::placements::domain::{
    Application, ApplicationId, Company, CompanyId, Department, DepartmentId, PlacementRecord,
    Student, StudentId, StudentStatus, Visit, VisitId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) repository: Arc<InMemoryPlacementRepository>,
}

#[derive(Default)]
struct PortalState {
    students: BTreeMap<StudentId, Student>,
    departments: BTreeMap<DepartmentId, Department>,
    companies: BTreeMap<CompanyId, Company>,
    visits: BTreeMap<VisitId, Visit>,
    applications: BTreeMap<ApplicationId, Application>,
    records: Vec<PlacementRecord>,
}

/// Store backing local runs. One mutex serializes every access, which is
/// what makes the pair check-then-insert and the decision commit atomic.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPlacementRepository {
    state: Arc<Mutex<PortalState>>,
}

impl InMemoryPlacementRepository {
    pub(crate) fn seed_student(&self, student: Student) {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state.students.insert(student.id, student);
    }

    pub(crate) fn seed_department(&self, department: Department) {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state.departments.insert(department.id, department);
    }

    pub(crate) fn seed_company(&self, company: Company) {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state.companies.insert(company.id, company);
    }

    pub(crate) fn seed_visit(&self, visit: Visit) {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state.visits.insert(visit.id, visit);
    }
}

impl PlacementRepository for InMemoryPlacementRepository {
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
        state
            .applications
            .insert(application.id, application.clone());
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

/// Publisher that records notices and mirrors them into the log. The real
/// mail adapter lives behind the same trait.
#[derive(Default, Clone)]
pub(crate) struct LoggingNoticePublisher {
    events: Arc<Mutex<Vec<PlacementNotice>>>,
}

impl LoggingNoticePublisher {
    pub(crate) fn events(&self) -> Vec<PlacementNotice> {
        self.events.lock().expect("notice mutex poisoned").clone()
    }
}

impl NoticePublisher for LoggingNoticePublisher {
    fn publish(&self, notice: PlacementNotice) -> Result<(), NoticeError> {
        info!(template = %notice.template, application = %notice.application_id, "notice published");
        self.events
            .lock()
            .expect("notice mutex poisoned")
            .push(notice);
        Ok(())
    }
}

/// Populate the store with a small recruiting season so the HTTP surface
/// and CLI demo have something to show. Visit deadlines are pinned relative
/// to the wall clock so the apply window is open whenever this runs.
pub(crate) fn seed_demo_data(repository: &InMemoryPlacementRepository) {
    let deadline = Local::now().naive_local() + Duration::days(30);
    let visit_date = deadline.date() + Duration::days(9);

    for (id, name) in [(1, "Computer Science"), (2, "Electronics")] {
        repository.seed_department(Department {
            id: DepartmentId(id),
            name: name.to_string(),
        });
    }

    let companies = [
        (1, "Helios Labs", "https://helioslabs.example"),
        (2, "Nimbus Systems", "https://nimbus.example"),
        (3, "Meridian Analytics", "https://meridian.example"),
    ];
    for (id, name, website) in companies {
        repository.seed_company(Company {
            id: CompanyId(id),
            name: name.to_string(),
            description: format!("{name} campus recruiting"),
            website: website.to_string(),
            contact_email: format!("talent@{}", website.trim_start_matches("https://")),
            contact_phone: "040-1234567".to_string(),
        });
    }

    let students = [
        (1, "Asha Verma", "CS21B001", 2025, 1, 8.6),
        (2, "Rohan Iyer", "CS21B014", 2025, 1, 7.1),
        (3, "Meera Nair", "EC21B007", 2025, 2, 9.1),
        (4, "Kabir Shah", "CS22B003", 2026, 1, 8.0),
    ];
    for (id, name, roll, batch, department, cgpa) in students {
        repository.seed_student(Student {
            id: StudentId(id),
            name: name.to_string(),
            roll_number: roll.to_string(),
            batch_year: batch,
            department_id: DepartmentId(department),
            cgpa,
            phone_number: "9876543210".to_string(),
            resume_url: format!("https://cdn.example.edu/resumes/{roll}.pdf"),
            current_status: StudentStatus::NotPlaced,
        });
    }

    let visits = [
        (10, 1, "Software Engineer, Platform Engineer", "12 LPA", 7.5, 2025),
        (11, 2, "Data Analyst", "10 LPA", 8.0, 2025),
        (12, 3, "Business Analyst", "9 LPA", 7.0, 2026),
    ];
    for (id, company, positions, package, cutoff, batch) in visits {
        repository.seed_visit(Visit {
            id: VisitId(id),
            company_id: CompanyId(company),
            visit_date,
            application_deadline: deadline,
            job_positions: positions.to_string(),
            salary_package: package.to_string(),
            eligibility_criteria: cutoff,
            batch_year: batch,
            is_active: true,
        });
    }
}
