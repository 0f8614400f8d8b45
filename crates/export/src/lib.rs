//! # Export Serializer
//!
//! Renders a filtered view as CSV for the dashboard's download button. Every
//! record field is written, prices as their exact decimal text, so reading
//! the file back through the store loader reproduces the same rows.

pub mod error;

pub use error::ExportError;

use core_types::OrderRecord;
use serde::Serialize;

pub const CSV_MIME_TYPE: &str = "text/csv";
pub const DEFAULT_FILE_NAME: &str = "filtered_ecommerce_data.csv";

/// A serialized export plus what the download sink needs to offer it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub body: String,
}

/// Serializes `rows` to CSV with a header row.
///
/// An empty `rows` still produces the header line.
pub fn serialize(rows: &[&OrderRecord]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    // Written by hand so that a header-only file comes out for an empty view.
    writer.write_record(OrderRecord::COLUMNS)?;
    for record in rows {
        writer.serialize(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Serializes `rows` and wraps them for download under `file_name`.
pub fn export(rows: &[&OrderRecord], file_name: &str) -> Result<ExportArtifact, ExportError> {
    let body = serialize(rows)?;
    tracing::info!(
        file_name,
        rows = rows.len(),
        bytes = body.len(),
        "Prepared CSV export."
    );
    Ok(ExportArtifact {
        file_name: file_name.to_string(),
        mime_type: CSV_MIME_TYPE.to_string(),
        body,
    })
}
