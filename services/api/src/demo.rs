use std::sync::Arc;

use chrono::Local;
use clap::Args;

use campus_placement::error::AppError;
use campus_placement::placements::applications::{
    Decision, PlacementRepository, PlacementService, PlacementServiceError,
};
use campus_placement::placements::domain::{StudentId, VisitId};
use campus_placement::placements::reports::{
    branch_totals, branch_year_matrix, company_stats, company_stats_csv, placement_summary,
    sort_company_stats, year_totals,
};

use crate::cli::{direction, SortColumn};
use crate::infra::{seed_demo_data, InMemoryPlacementRepository, LoggingNoticePublisher};

#[derive(Args, Debug, Default)]
pub(crate) struct SeasonReportArgs {
    /// Sort the company table by this column
    #[arg(long, value_enum)]
    pub(crate) sort: Option<SortColumn>,
    /// Sort descending instead of ascending
    #[arg(long)]
    pub(crate) desc: bool,
    /// Print the company table as CSV instead of aligned text
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the aggregate report at the end of the demo
    #[arg(long)]
    pub(crate) skip_reports: bool,
}

type DemoService = PlacementService<InMemoryPlacementRepository, LoggingNoticePublisher>;

fn build_demo_service() -> (
    Arc<DemoService>,
    Arc<InMemoryPlacementRepository>,
    Arc<LoggingNoticePublisher>,
) {
    let repository = Arc::new(InMemoryPlacementRepository::default());
    seed_demo_data(&repository);
    let notices = Arc::new(LoggingNoticePublisher::default());
    let service = Arc::new(PlacementService::new(repository.clone(), notices.clone()));
    (service, repository, notices)
}

/// Walk the seeded season through a few applications and reviews so the
/// aggregates have something to count.
fn play_season(service: &DemoService) -> Result<(), AppError> {
    let now = Local::now().naive_local();

    let first = service.apply(StudentId(1), VisitId(10), now)?;
    service.decide(first.id, Decision::Selected { internship: false }, now)?;

    let second = service.apply(StudentId(3), VisitId(11), now)?;
    service.decide(second.id, Decision::Selected { internship: false }, now)?;

    // Left pending on purpose so the funnel shows an open application.
    service.apply(StudentId(4), VisitId(12), now)?;

    Ok(())
}

pub(crate) fn run_season_report(args: SeasonReportArgs) -> Result<(), AppError> {
    let (service, repository, _notices) = build_demo_service();
    play_season(&service)?;

    let students = repository.students().map_err(PlacementServiceError::from)?;
    let companies = repository
        .companies()
        .map_err(PlacementServiceError::from)?;
    let visits = repository.visits().map_err(PlacementServiceError::from)?;
    let applications = repository
        .applications()
        .map_err(PlacementServiceError::from)?;
    let records = repository.records().map_err(PlacementServiceError::from)?;

    let summary = placement_summary(&students);
    println!("Placement summary");
    println!(
        "- {} students | {} placed | {:.1}% placement rate",
        summary.total_students, summary.placed_students, summary.placement_percentage
    );
    for batch in &summary.batch_wise_stats {
        println!(
            "- batch {}: {}/{} placed ({:.1}%)",
            batch.batch_year,
            batch.placed_students,
            batch.total_students,
            batch.placement_percentage
        );
    }

    let mut stats = company_stats(&companies, &visits, &applications, &records);
    if let Some(sort) = args.sort {
        sort_company_stats(&mut stats, sort.into_key(), direction(args.desc));
    }

    println!("\nCompany statistics");
    if args.csv {
        print!("{}", company_stats_csv(&stats)?);
    } else {
        for stat in &stats {
            println!(
                "- {}: {} visits | {} applications | {} placements | conversion {}",
                stat.name,
                stat.total_visits,
                stat.total_applications,
                stat.total_placements,
                stat.conversion_label()
            );
        }
    }

    let matrix = branch_year_matrix(&records);
    println!("\nBranch and year breakdown");
    for total in branch_totals(&matrix) {
        println!("- {}: {} placement(s)", total.branch, total.placements);
    }
    for total in year_totals(&matrix) {
        println!("- {}: {} placement(s)", total.year, total.placements);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let (service, repository, notices) = build_demo_service();
    let now = Local::now().naive_local();

    println!("Campus placement engine demo");

    // An ineligible student sees every failing criterion at once.
    let report = service.eligibility(StudentId(2), VisitId(11))?;
    println!(
        "- eligibility probe for student 2 on visit 11: eligible = {}",
        report.is_eligible
    );
    for reason in &report.reasons {
        println!("  * {reason}");
    }

    let application = service.apply(StudentId(1), VisitId(10), now)?;
    println!(
        "- student 1 applied to visit 10 (application {}, status {})",
        application.id,
        application.status.label()
    );

    match service.apply(StudentId(1), VisitId(10), now) {
        Err(PlacementServiceError::AlreadyApplied) => {
            println!("- duplicate apply rejected: already applied")
        }
        other => println!("- unexpected duplicate apply outcome: {other:?}"),
    }

    let decided = service.decide(application.id, Decision::Selected { internship: false }, now)?;
    println!(
        "- admin selected application {} (status {})",
        decided.id,
        decided.status.label()
    );
    println!("- {} selection notice(s) dispatched", notices.events().len());

    match service.decide(application.id, Decision::Selected { internship: false }, now) {
        Err(PlacementServiceError::InvalidTransition { current }) => println!(
            "- second review rejected: application already {}",
            current.label()
        ),
        other => println!("- unexpected re-review outcome: {other:?}"),
    }

    if !args.skip_reports {
        let students = repository.students().map_err(PlacementServiceError::from)?;
        let summary = placement_summary(&students);
        println!(
            "\n{} of {} students placed ({:.1}%)",
            summary.placed_students, summary.total_students, summary.placement_percentage
        );
    }

    Ok(())
}
