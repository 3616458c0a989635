//! Output formatting and persistence for reports.
//!
//! Supports pretty-printing, JSON rendering and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

use crate::engine::report::Report;

/// A report stamped with when and how it was produced.
#[derive(Debug, Serialize)]
pub struct ReportDocument {
    pub generated_at: DateTime<Utc>,
    pub decimal_places: u32,
    pub views: Report,
}

impl ReportDocument {
    pub fn new(views: Report, decimal_places: u32) -> Self {
        Self {
            generated_at: Utc::now(),
            decimal_places,
            views,
        }
    }
}

/// One CSV row per view.
#[derive(Serialize)]
struct ViewRow<'a> {
    generated_at: DateTime<Utc>,
    view: &'a str,
    value: Option<Decimal>,
    credits_used: Decimal,
    quality_points: Decimal,
    courses: usize,
}

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(document: &ReportDocument) {
    debug!("{:#?}", document);
}

pub fn to_json_string(document: &ReportDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Appends every view of `document` as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_report(path: &str, document: &ReportDocument) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending report rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    for (view, result) in &document.views.views {
        writer.serialize(ViewRow {
            generated_at: document.generated_at,
            view,
            value: result.value,
            credits_used: result.credits_used,
            quality_points: result.quality_points,
            courses: result.courses,
        })?;
    }
    writer.flush()?;

    Ok(())
}
