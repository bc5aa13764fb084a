// src/export/text.rs
// =============================================================================
// Plain-text export: the URLs that work (2xx/3xx), one per line. When a URL
// redirected, the redirect target is written instead of the original.
//
// This is the list to feed into the next tool (a sitemap, a crawler seed).
// Broken and failed URLs are left out, so the file never needs cleaning.
// =============================================================================

use std::path::Path;
use tracing::info;

use crate::checker::ProbeResult;
use crate::Result;

/// Working URLs in input order. Borrows from `results`, nothing is copied.
pub fn plain_text_urls(results: &[ProbeResult]) -> Vec<&str> {
    results
        .iter()
        .filter(|result| result.is_ok())
        .map(ProbeResult::effective_url)
        .collect()
}

pub fn to_plain_text(results: &[ProbeResult]) -> String {
    plain_text_urls(results).join("\n")
}

pub fn write_plain_text_file(results: &[ProbeResult], path: &Path) -> Result<()> {
    let urls = plain_text_urls(results);
    let mut content = urls.join("\n");
    // Trailing newline only when there is at least one line
    if !content.is_empty() {
        content.push('\n');
    }
    std::fs::write(path, content)?;
    info!("Wrote {} URL(s) to {}", urls.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_only_working_urls_with_redirect_targets() {
        let results = vec![
            ProbeResult::responded("https://a.com", 200, "OK", Duration::ZERO),
            ProbeResult::responded("http://b.com", 200, "OK", Duration::ZERO)
                .with_redirect("https://www.b.com/"),
            ProbeResult::responded("https://c.com", 304, "Not Modified", Duration::ZERO),
            ProbeResult::responded("https://d.com", 404, "Not Found", Duration::ZERO),
            ProbeResult::responded("https://e.com", 500, "Internal Server Error", Duration::ZERO),
            ProbeResult::failed("https://f.com", "Connection failed", Duration::ZERO),
        ];

        assert_eq!(
            to_plain_text(&results),
            "https://a.com\nhttps://www.b.com/\nhttps://c.com"
        );
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        let results = vec![ProbeResult::responded("https://a.com", 200, "OK", Duration::ZERO)];

        write_plain_text_file(&results, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "https://a.com\n");
    }
}
