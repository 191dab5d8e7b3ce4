use super::companies::CompanyStat;

/// Encode the company-stats table as CSV for the admin export download.
/// Undefined conversion rates come out as "N/A", matching the dashboard.
pub fn company_stats_csv(stats: &[CompanyStat]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Company",
        "Total Visits",
        "Total Applications",
        "Total Placements",
        "Conversion Rate",
    ])?;

    for stat in stats {
        writer.write_record([
            stat.name.as_str(),
            &stat.total_visits.to_string(),
            &stat.total_applications.to_string(),
            &stat.total_placements.to_string(),
            &stat.conversion_label(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
