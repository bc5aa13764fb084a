// src/export/csv.rs
// =============================================================================
// CSV export. Every field is wrapped in double quotes and embedded quotes are
// doubled, so titles and descriptions with commas survive a spreadsheet.
//
// One row per result, in the order the results were produced:
//   URL, Status, Status Text, Response Time (ms), Redirected, Redirect URL,
//   Page Title, Meta Description, Canonical URL, Error
//
// Absent values are empty strings; a failed probe has an empty Status.
// Newlines inside a field (meta descriptions have them) stay inside the
// quotes, so a CSV reader sees one record per result.
//
// Rust concepts:
// - Generic writer: W: Write lets the same code fill a file or a Vec<u8>
// - `::csv` refers to the crate, since this module is also called csv
// =============================================================================

use ::csv::{QuoteStyle, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::checker::ProbeResult;
use crate::Result;

/// Column headers, in order.
pub const CSV_HEADER: [&str; 10] = [
    "URL",
    "Status",
    "Status Text",
    "Response Time (ms)",
    "Redirected",
    "Redirect URL",
    "Page Title",
    "Meta Description",
    "Canonical URL",
    "Error",
];

// Same order as CSV_HEADER
fn row(result: &ProbeResult) -> [String; 10] {
    [
        result.url.clone(),
        result.status.map(|s| s.to_string()).unwrap_or_default(),
        result.status_text.clone(),
        result.response_time_ms.to_string(),
        if result.redirected { "Yes" } else { "No" }.to_string(),
        result.redirect_url.clone().unwrap_or_default(),
        result.page_title.clone().unwrap_or_default(),
        result.meta_description.clone().unwrap_or_default(),
        result.canonical.clone().unwrap_or_default(),
        result.error.clone().unwrap_or_default(),
    ]
}

/// Writes the header and one row per result to `writer`.
pub fn write_csv<W: Write>(results: &[ProbeResult], writer: W) -> Result<()> {
    // QuoteStyle::Always quotes every field, even plain numbers
    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    csv.write_record(CSV_HEADER)?;
    for result in results {
        csv.write_record(row(result))?;
    }
    // The writer buffers; flush so errors surface here and not on drop
    csv.flush()?;
    Ok(())
}

/// The whole export as one string (handy for tests and piping).
pub fn to_csv_string(results: &[ProbeResult]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(results, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Creates (or truncates) `path` and writes the export to it.
pub fn write_csv_file(results: &[ProbeResult], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_csv(results, file)?;
    info!("Wrote {} result(s) to {}", results.len(), path.display());
    Ok(())
}
