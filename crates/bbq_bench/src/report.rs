//! Benchmark results and cross-backend fingerprints.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use bbq_lookup::{Backend, Entry};
use serde::Serialize;

/// Order-independent digest of one query's result set.
///
/// Two backends that return the same multiset of entries produce the same
/// fingerprint regardless of visiting order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Fingerprint {
    pub count: usize,
    sum: u64,
    xor: u64,
}

impl Fingerprint {
    pub fn add(&mut self, entry: &Entry<'_, String>) {
        let mut hasher = DefaultHasher::new();
        entry.value.hash(&mut hasher);
        for coord in entry
            .bounding_box
            .min()
            .to_array()
            .into_iter()
            .chain(entry.bounding_box.max().to_array())
        {
            coord.to_bits().hash(&mut hasher);
        }
        let digest = hasher.finish();
        self.count += 1;
        self.sum = self.sum.wrapping_add(digest);
        self.xor ^= digest;
    }
}

/// Timings and totals for one backend.
#[derive(Debug, Clone, Serialize)]
pub struct BackendReport {
    pub backend: Backend,
    pub insert_ms: f64,
    pub query_ms: f64,
    pub remove_ms: f64,
    pub total_hits: usize,
    #[serde(skip)]
    pub fingerprints: Vec<Fingerprint>,
}

impl BackendReport {
    #[must_use]
    pub fn queries_per_second(&self) -> f64 {
        if self.query_ms <= 0.0 {
            return f64::INFINITY;
        }
        self.fingerprints.len() as f64 / (self.query_ms / 1000.0)
    }
}

/// A full benchmark run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub count: usize,
    pub queries: usize,
    pub seed: u64,
    pub grid_cells_per_axis: usize,
    pub backends: Vec<BackendReport>,
    /// Indices of queries on which backends disagreed.
    pub mismatches: Vec<usize>,
}

impl RunReport {
    /// Compare every backend's fingerprints against the first backend's.
    #[must_use]
    pub fn find_mismatches(backends: &[BackendReport]) -> Vec<usize> {
        let Some((reference, rest)) = backends.split_first() else {
            return Vec::new();
        };
        (0..reference.fingerprints.len())
            .filter(|&query| {
                rest.iter()
                    .any(|other| other.fingerprints.get(query) != reference.fingerprints.get(query))
            })
            .collect()
    }

    /// Render a plain-text summary table.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} entries, {} queries, seed {}, grid {}³\n",
            self.count, self.queries, self.seed, self.grid_cells_per_axis
        );
        out.push_str(&format!(
            "{:<8}{:>12}{:>12}{:>12}{:>14}{:>12}\n",
            "backend", "insert ms", "query ms", "remove ms", "queries/s", "hits"
        ));
        for report in &self.backends {
            out.push_str(&format!(
                "{:<8}{:>12.2}{:>12.2}{:>12.2}{:>14.0}{:>12}\n",
                report.backend.name(),
                report.insert_ms,
                report.query_ms,
                report.remove_ms,
                report.queries_per_second(),
                report.total_hits
            ));
        }
        if self.mismatches.is_empty() {
            out.push_str("all backends agree\n");
        } else {
            out.push_str(&format!(
                "{} queries disagree across backends\n",
                self.mismatches.len()
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use bbq_math::{BoundingBox, DVec3};

    use super::*;

    fn report(backend: Backend, fingerprints: Vec<Fingerprint>) -> BackendReport {
        BackendReport {
            backend,
            insert_ms: 1.0,
            query_ms: 2.0,
            remove_ms: 0.5,
            total_hits: fingerprints.iter().map(|f| f.count).sum(),
            fingerprints,
        }
    }

    #[test]
    fn test_fingerprint_ignores_order() {
        let a = "a".to_string();
        let b = "b".to_string();
        let unit = BoundingBox::new(DVec3::ZERO, DVec3::ONE).unwrap();

        let mut forward = Fingerprint::default();
        forward.add(&Entry::new(unit, &a));
        forward.add(&Entry::new(unit, &b));

        let mut backward = Fingerprint::default();
        backward.add(&Entry::new(unit, &b));
        backward.add(&Entry::new(unit, &a));

        assert_eq!(forward, backward);
        assert_eq!(forward.count, 2);
    }

    #[test]
    fn test_fingerprint_sees_duplicates() {
        let a = "a".to_string();
        let unit = BoundingBox::new(DVec3::ZERO, DVec3::ONE).unwrap();
        let mut once = Fingerprint::default();
        once.add(&Entry::new(unit, &a));
        let mut twice = once;
        twice.add(&Entry::new(unit, &a));
        assert_ne!(once, twice);
    }

    #[test]
    fn test_find_mismatches() {
        let mut odd = Fingerprint::default();
        odd.count = 1;
        let backends = vec![
            report(Backend::List, vec![Fingerprint::default(), Fingerprint::default()]),
            report(Backend::Tree, vec![Fingerprint::default(), odd]),
        ];
        assert_eq!(RunReport::find_mismatches(&backends), vec![1]);
    }

    #[test]
    fn test_report_json_omits_fingerprints() {
        let run = RunReport {
            count: 1,
            queries: 1,
            seed: 42,
            grid_cells_per_axis: 16,
            backends: vec![report(Backend::Grid, vec![Fingerprint::default()])],
            mismatches: Vec::new(),
        };
        let json = serde_json::to_value(&run).unwrap();
        assert_eq!(json["backends"][0]["backend"], "grid");
        assert!(json["backends"][0].get("fingerprints").is_none());
        assert!(run.summary().contains("all backends agree"));
    }
}
