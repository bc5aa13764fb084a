// src/batch/classify.rs
// =============================================================================
// Views over a finished result list: status buckets, per-host groups and a
// summary line. All of these are recomputed from the results on demand;
// nothing here is stored.
// =============================================================================

use std::collections::BTreeMap;

use crate::checker::{ProbeResult, StatusClass};

/// Group name for results whose URL has no parseable host.
pub const UNKNOWN_HOST: &str = "Unknown";

/// Counts per status class plus timing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub success: usize,
    pub redirect: usize,
    pub client_error: usize,
    pub server_error: usize,
    pub failed: usize,
    pub other: usize,
    /// Mean HEAD time over results that got a response
    pub average_response_ms: Option<u64>,
}

impl Summary {
    /// Results that are neither 2xx nor 3xx
    pub fn problems(&self) -> usize {
        self.client_error + self.server_error + self.failed + self.other
    }

    /// Count for one status class
    pub fn count(&self, class: StatusClass) -> usize {
        match class {
            StatusClass::Success => self.success,
            StatusClass::Redirect => self.redirect,
            StatusClass::ClientError => self.client_error,
            StatusClass::ServerError => self.server_error,
            StatusClass::Failed => self.failed,
            StatusClass::Other => self.other,
        }
    }

    /// (class, count) pairs in display order, one per class
    pub fn counts(&self) -> impl Iterator<Item = (StatusClass, usize)> + '_ {
        StatusClass::ALL
            .into_iter()
            .map(move |class| (class, self.count(class)))
    }
}

/// Splits results into status buckets, keeping input order inside each.
pub fn buckets(results: &[ProbeResult]) -> BTreeMap<StatusClass, Vec<&ProbeResult>> {
    let mut buckets: BTreeMap<StatusClass, Vec<&ProbeResult>> = BTreeMap::new();
    for result in results {
        buckets.entry(result.class()).or_default().push(result);
    }
    buckets
}

/// Results in one status bucket.
pub fn by_class(results: &[ProbeResult], class: StatusClass) -> Vec<&ProbeResult> {
    results.iter().filter(|result| result.class() == class).collect()
}

/// Groups results by hostname; unparseable URLs land under "Unknown".
pub fn group_by_host(results: &[ProbeResult]) -> BTreeMap<String, Vec<&ProbeResult>> {
    let mut groups: BTreeMap<String, Vec<&ProbeResult>> = BTreeMap::new();
    for result in results {
        let host = result.host().unwrap_or_else(|| UNKNOWN_HOST.to_string());
        groups.entry(host).or_default().push(result);
    }
    groups
}

pub fn summarize(results: &[ProbeResult]) -> Summary {
    let mut summary = Summary {
        total: results.len(),
        ..Summary::default()
    };

    let mut timed = 0u64;
    let mut total_ms = 0u64;

    for result in results {
        match result.class() {
            StatusClass::Success => summary.success += 1,
            StatusClass::Redirect => summary.redirect += 1,
            StatusClass::ClientError => summary.client_error += 1,
            StatusClass::ServerError => summary.server_error += 1,
            StatusClass::Failed => summary.failed += 1,
            StatusClass::Other => summary.other += 1,
        }

        if !result.is_failed() {
            timed += 1;
            total_ms = total_ms.saturating_add(result.response_time_ms);
        }
    }

    if timed > 0 {
        summary.average_response_ms = Some(total_ms / timed);
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample() -> Vec<ProbeResult> {
        vec![
            ProbeResult::responded("https://a.com/1", 200, "OK", Duration::from_millis(100)),
            ProbeResult::responded("https://a.com/2", 301, "Moved Permanently", Duration::from_millis(200)),
            ProbeResult::responded("https://b.com/", 404, "Not Found", Duration::from_millis(300)),
            ProbeResult::responded("https://b.com/x", 503, "Service Unavailable", Duration::from_millis(400)),
            ProbeResult::failed("https://c.com/", "Request timed out after 10s", Duration::from_secs(10)),
            ProbeResult::failed("garbage", "Invalid URL", Duration::ZERO),
        ]
    }

    #[test]
    fn test_buckets_cover_every_result() {
        let results = sample();
        let buckets = buckets(&results);

        assert_eq!(buckets[&StatusClass::Success].len(), 1);
        assert_eq!(buckets[&StatusClass::Redirect].len(), 1);
        assert_eq!(buckets[&StatusClass::ClientError].len(), 1);
        assert_eq!(buckets[&StatusClass::ServerError].len(), 1);
        assert_eq!(buckets[&StatusClass::Failed].len(), 2);
        assert!(!buckets.contains_key(&StatusClass::Other));

        let total: usize = buckets.values().map(Vec::len).sum();
        assert_eq!(total, results.len());
    }

    #[test]
    fn test_by_class_keeps_order() {
        let results = sample();
        let failed = by_class(&results, StatusClass::Failed);
        assert_eq!(failed[0].url, "https://c.com/");
        assert_eq!(failed[1].url, "garbage");
    }

    #[test]
    fn test_group_by_host_with_unknown() {
        let results = sample();
        let groups = group_by_host(&results);

        assert_eq!(groups["a.com"].len(), 2);
        assert_eq!(groups["b.com"].len(), 2);
        assert_eq!(groups["c.com"].len(), 1);
        assert_eq!(groups[UNKNOWN_HOST].len(), 1);
    }

    #[test]
    fn test_summary_counts_and_average() {
        let summary = summarize(&sample());

        assert_eq!(summary.total, 6);
        assert_eq!(summary.success, 1);
        assert_eq!(summary.redirect, 1);
        assert_eq!(summary.client_error, 1);
        assert_eq!(summary.server_error, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.problems(), 4);
        // Failed probes do not count towards timing
        assert_eq!(summary.average_response_ms, Some(250));
    }

    #[test]
    fn test_counts_match_buckets() {
        let results = sample();
        let summary = summarize(&results);
        let buckets = buckets(&results);

        for (class, count) in summary.counts() {
            let expected = buckets.get(&class).map_or(0, Vec::len);
            assert_eq!(count, expected, "{}", class.label());
        }
        assert_eq!(summary.counts().map(|(_, count)| count).sum::<usize>(), summary.total);
    }

    #[test]
    fn test_summary_of_nothing() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_response_ms, None);
    }
}
