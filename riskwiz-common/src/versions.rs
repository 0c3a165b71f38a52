//! Dataset version registry
//!
//! Holds the version identifiers of every upstream data source feeding the
//! dashboard. The snapshot is fixed at construction (versions change on
//! deploy, never per request) and its digest feeds the request fingerprint,
//! so a dataset upgrade invalidates all previously cached results without
//! an explicit cache flush.

use crate::types::DatasetVersion;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Digest length kept from the SHA-256 hex string. A cache-key component,
/// not a security boundary.
const DIGEST_HEX_LEN: usize = 16;

/// Immutable snapshot of upstream dataset versions
///
/// Constructed once at startup and injected wherever the current versions
/// or their digest are needed. Reading an unconfigured source is a
/// configuration bug caught at startup, not here.
#[derive(Debug, Clone)]
pub struct DatasetVersionRegistry {
    /// BTreeMap so iteration order (and therefore the digest) is stable
    versions: BTreeMap<String, String>,
    digest: String,
}

impl DatasetVersionRegistry {
    /// Build a registry from source/version pairs
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let versions: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(source, version)| (source.into(), version.into()))
            .collect();
        let digest = compute_digest(&versions);
        Self { versions, digest }
    }

    /// Current version snapshot, keyed by source name
    pub fn current(&self) -> &BTreeMap<String, String> {
        &self.versions
    }

    /// Snapshot as the wire-level list carried in result metadata
    pub fn entries(&self) -> Vec<DatasetVersion> {
        self.versions
            .iter()
            .map(|(source, version)| DatasetVersion {
                source: source.clone(),
                version: version.clone(),
            })
            .collect()
    }

    /// Short deterministic digest of the snapshot
    ///
    /// Stable across repeated calls within a process lifetime; changes
    /// whenever any source's version changes.
    pub fn hash(&self) -> &str {
        &self.digest
    }
}

impl Default for DatasetVersionRegistry {
    /// The dataset versions of the current deployment
    fn default() -> Self {
        Self::new([
            ("baseline_model", "cmip6-2024.2"),
            ("reanalysis", "era5-2025.06"),
            ("exposure_layer", "exp-3.1.0"),
            ("connectivity_graph", "congraph-1.8"),
            ("observation_feed", "obs-2025-07-28"),
        ])
    }
}

fn compute_digest(versions: &BTreeMap<String, String>) -> String {
    let mut hasher = Sha256::new();
    for (source, version) in versions {
        hasher.update(source.as_bytes());
        hasher.update(b"=");
        hasher.update(version.as_bytes());
        hasher.update(b"\n");
    }
    let hex = format!("{:x}", hasher.finalize());
    hex[..DIGEST_HEX_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_across_calls() {
        let registry = DatasetVersionRegistry::default();
        let first = registry.hash().to_string();
        assert_eq!(registry.hash(), first);
        assert_eq!(first.len(), DIGEST_HEX_LEN);
    }

    #[test]
    fn digest_is_independent_of_insertion_order() {
        let a = DatasetVersionRegistry::new([("alpha", "1"), ("beta", "2")]);
        let b = DatasetVersionRegistry::new([("beta", "2"), ("alpha", "1")]);
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn digest_changes_when_any_version_changes() {
        let base = DatasetVersionRegistry::new([("alpha", "1"), ("beta", "2")]);
        let bumped = DatasetVersionRegistry::new([("alpha", "1"), ("beta", "3")]);
        let added = DatasetVersionRegistry::new([("alpha", "1"), ("beta", "2"), ("gamma", "1")]);
        assert_ne!(base.hash(), bumped.hash());
        assert_ne!(base.hash(), added.hash());
    }

    #[test]
    fn entries_are_sorted_by_source() {
        let registry = DatasetVersionRegistry::new([("beta", "2"), ("alpha", "1")]);
        let entries = registry.entries();
        assert_eq!(entries[0].source, "alpha");
        assert_eq!(entries[1].source, "beta");
    }

    #[test]
    fn default_registry_covers_all_sources() {
        let registry = DatasetVersionRegistry::default();
        for source in [
            "baseline_model",
            "reanalysis",
            "exposure_layer",
            "connectivity_graph",
            "observation_feed",
        ] {
            assert!(registry.current().contains_key(source), "missing {source}");
        }
    }
}
