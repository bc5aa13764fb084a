// src/export/mod.rs
// =============================================================================
// Writes results out for other tools:
// - csv: one quoted row per result, every field
// - text: just the working URLs, one per line
// =============================================================================

mod csv;
mod text;

pub use self::csv::{to_csv_string, write_csv, write_csv_file, CSV_HEADER};
pub use self::text::{plain_text_urls, to_plain_text, write_plain_text_file};
