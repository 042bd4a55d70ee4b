use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::models::comparison::REPORT_HEADERS;
use crate::models::ComparisonReport;
use crate::utils::format::format_cell;
use crate::utils::Table;

/// Errors writing report artifacts
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Chart error: {0}")]
    Chart(String),
}

/// Write the report as CSV: header row, one row per asset, absent values as empty cells
pub fn write_csv<W: Write>(report: &ComparisonReport, writer: W) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(REPORT_HEADERS)?;
    for row in &report.rows {
        wtr.write_record([
            row.name.clone(),
            format_cell(row.past_price),
            format_cell(row.current_price),
            format_cell(row.change_pct),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Overwrite `path` with the CSV rendering of `report`
pub fn save_csv(report: &ComparisonReport, path: &Path) -> Result<(), ReportError> {
    let file = File::create(path)?;
    write_csv(report, file)
}

/// Fixed-width text table of the report
pub fn render_table(report: &ComparisonReport) -> Table {
    let mut table = Table::new(&REPORT_HEADERS);

    let cell = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string());
    for row in &report.rows {
        table.add_row(vec![
            row.name.clone(),
            cell(row.past_price),
            cell(row.current_price),
            cell(row.change_pct),
        ]);
    }

    table
}
