//! CSV export for projection tables.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::model::report::ProjectionReport;
use crate::model::types::{PeriodRow, ProjectionResult};

/// Column header for a single projection table.
pub const HEADER: &str = "period,electricity_price,capacity_price,activation_price,\
                          capacity_revenue,activation_revenue,charging_cost,\
                          net_revenue,cumulative_cash_flow";

fn header_fields() -> impl Iterator<Item = &'static str> {
    HEADER.split(',').map(str::trim)
}

fn row_fields(r: &PeriodRow) -> [String; 9] {
    [
        r.period.to_string(),
        format!("{:.4}", r.electricity_price),
        format!("{:.4}", r.capacity_price),
        format!("{:.4}", r.activation_price),
        format!("{:.2}", r.capacity_revenue),
        format!("{:.2}", r.activation_revenue),
        format!("{:.2}", r.charging_cost),
        format!("{:.2}", r.net_revenue),
        format!("{:.2}", r.cumulative_cash_flow),
    ]
}

/// Exports one projection to a CSV file at the given path.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_csv(result: &ProjectionResult, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_csv(result, io::BufWriter::new(file))
}

/// Writes one projection as CSV to any writer.
///
/// Writes a header row followed by one row per period. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `result` - Projection whose period rows are written
/// * `writer` - Destination, e.g. a file or an in-memory buffer
///
/// # Returns
///
/// `Ok(())` once every row is written and the writer is flushed.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv(result: &ProjectionResult, writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(header_fields())?;
    for r in &result.rows {
        wtr.write_record(&row_fields(r))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Exports every scenario of a report to one CSV file.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_report_csv(report: &ProjectionReport, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_report_csv(report, io::BufWriter::new(file))
}

/// Writes every scenario of a report as CSV with a leading `scenario` column.
///
/// Scenarios appear in report order, each with its periods in order.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_report_csv(report: &ProjectionReport, writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(std::iter::once("scenario").chain(header_fields()))?;
    for result in &report.results {
        for r in &result.rows {
            let fields = row_fields(r);
            wtr.write_record(
                std::iter::once(result.scenario.as_str()).chain(fields.iter().map(String::as_str)),
            )?;
        }
    }
    wtr.flush()?;
    Ok(())
}
