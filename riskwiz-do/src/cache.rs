//! Fingerprint-keyed result cache
//!
//! Time-bounded store of validated dashboard results. Expiry is lazy: an
//! entry past its deadline is removed when a read observes it, and no
//! background sweep runs. There is no size bound; growth over a process
//! lifetime is bounded only by the fingerprint space, which is a known
//! and accepted limitation for a deployment-cycled service.

use riskwiz_common::types::DashboardResult;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Default entry lifetime: one hour
pub const DEFAULT_TTL: Duration = Duration::from_millis(3_600_000);

struct CacheEntry {
    value: DashboardResult,
    expires_at: Instant,
}

/// Shared mutable cache, one entry per fingerprint
///
/// Concurrent misses for the same fingerprint may both dispatch and both
/// write; last writer wins. No single-flight guarantee is made.
pub struct ResultCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a fingerprint, treating an expired entry as absent
    ///
    /// Observing an expired entry removes it as a side effect of the read.
    pub async fn get(&self, key: &str) -> Option<DashboardResult> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if Instant::now() <= entry.expires_at => Some(entry.value.clone()),
            Some(_) => {
                debug!(key, "Cache entry expired; removing on read");
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a result under its fingerprint with the default TTL
    ///
    /// Overwriting an existing entry resets its TTL clock.
    pub async fn set(&self, key: &str, value: DashboardResult) {
        self.set_with_ttl(key, value, DEFAULT_TTL).await;
    }

    /// Store a result with an explicit TTL
    pub async fn set_with_ttl(&self, key: &str, value: DashboardResult, ttl: Duration) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Number of stored entries, expired or not
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use riskwiz_common::types::{
        BaselineEstimate, ConfidenceLevel, DashboardResult, DatasetVersion, DriftDirection,
        DriftMagnitude, NodeDrift, ResolvedLocation, ResultMetadata, RiskChain, RiskNode,
        RiskNodeKind, SpilloverSummary, TEMPERATURE_UNIT,
    };

    fn sample_result() -> DashboardResult {
        DashboardResult {
            location: ResolvedLocation {
                key: "geo_1".into(),
                name: "Geo 1".into(),
                region_profile: "coastal lowland".into(),
            },
            baseline: BaselineEstimate {
                value: 1.9,
                unit: TEMPERATURE_UNIT.into(),
                confidence: ConfidenceLevel::Medium,
            },
            risk_chain: RiskChain {
                nodes: vec![RiskNode {
                    id: "hz-heat".into(),
                    label: "Heat".into(),
                    kind: RiskNodeKind::Hazard,
                    severity: 0.6,
                    drift: NodeDrift {
                        direction: DriftDirection::Rising,
                        magnitude: DriftMagnitude::Moderate,
                    },
                }],
                spillover: SpilloverSummary {
                    score: 0.3,
                    summary: "limited cross-system exposure".into(),
                },
            },
            metadata: ResultMetadata {
                as_of: Utc::now(),
                dataset_versions: vec![DatasetVersion {
                    source: "baseline_model".into(),
                    version: "cmip6-2024.2".into(),
                }],
                provenance: "test fixture".into(),
            },
        }
    }

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let cache = ResultCache::new();
        let stored = sample_result();
        cache.set("fp-1", stored.clone()).await;
        let got = cache.get("fp-1").await.expect("entry should be present");
        assert_eq!(got, stored);
    }

    #[tokio::test]
    async fn absent_key_is_absent() {
        let cache = ResultCache::new();
        assert!(cache.get("fp-missing").await.is_none());
    }

    #[tokio::test]
    async fn expired_entry_is_absent_and_removed_on_read() {
        let cache = ResultCache::new();
        cache
            .set_with_ttl("fp-1", sample_result(), Duration::from_millis(20))
            .await;
        assert_eq!(cache.len().await, 1);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(cache.get("fp-1").await.is_none());
        // Lazy removal happened as a side effect of the read
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn overwrite_resets_ttl() {
        let cache = ResultCache::new();
        cache
            .set_with_ttl("fp-1", sample_result(), Duration::from_millis(80))
            .await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Rewrite before expiry; clock restarts
        cache
            .set_with_ttl("fp-1", sample_result(), Duration::from_millis(80))
            .await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        // 100ms past the first write, 50ms past the second
        assert!(cache.get("fp-1").await.is_some());
    }

    #[tokio::test]
    async fn entries_are_independent() {
        let cache = ResultCache::new();
        cache.set("fp-1", sample_result()).await;
        cache
            .set_with_ttl("fp-2", sample_result(), Duration::from_millis(10))
            .await;

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get("fp-1").await.is_some());
        assert!(cache.get("fp-2").await.is_none());
    }
}
