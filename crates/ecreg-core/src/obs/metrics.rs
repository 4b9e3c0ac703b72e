use crate::obs::sink::{RegistryEvent, RegistrySink};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

///
/// RegistryMetrics
/// In-memory counters for one registry. Install it as the registry's sink
/// and read it back with [`RegistryMetrics::report`].
///

#[derive(Debug, Default)]
pub struct RegistryMetrics {
    lookup_hits: AtomicU64,
    lookup_misses: AtomicU64,
    metadata_missing: AtomicU64,
    classes_synthesized: AtomicU64,
    classes_registered: AtomicU64,
    schemas_created: AtomicU64,
    instances_created: AtomicU64,
    max_depth: AtomicU64,
    instances_by_class: Mutex<BTreeMap<String, u64>>,
}

impl RegistryMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn report(&self) -> MetricsReport {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);

        MetricsReport {
            ops: MetricsOps {
                lookup_hits: load(&self.lookup_hits),
                lookup_misses: load(&self.lookup_misses),
                metadata_missing: load(&self.metadata_missing),
                classes_synthesized: load(&self.classes_synthesized),
                classes_registered: load(&self.classes_registered),
                schemas_created: load(&self.schemas_created),
                instances_created: load(&self.instances_created),
                max_synthesized_depth: load(&self.max_depth),
            },
            instances_by_class: self
                .instances_by_class
                .lock()
                .map(|counts| counts.clone())
                .unwrap_or_default(),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl RegistrySink for RegistryMetrics {
    fn record(&self, event: RegistryEvent<'_>) {
        match event {
            RegistryEvent::LookupHit { .. } => Self::bump(&self.lookup_hits),
            RegistryEvent::LookupMiss { .. } => Self::bump(&self.lookup_misses),
            RegistryEvent::MetadataMissing { .. } => Self::bump(&self.metadata_missing),
            RegistryEvent::ClassSynthesized { depth, .. } => {
                Self::bump(&self.classes_synthesized);
                self.max_depth
                    .fetch_max(u64::try_from(depth).unwrap_or(u64::MAX), Ordering::Relaxed);
            }
            RegistryEvent::ClassRegistered { .. } => Self::bump(&self.classes_registered),
            RegistryEvent::SchemaCreated { .. } => Self::bump(&self.schemas_created),
            RegistryEvent::InstanceCreated { class } => {
                Self::bump(&self.instances_created);

                if let Ok(mut counts) = self.instances_by_class.lock() {
                    let entry = counts.entry(class.to_string()).or_default();
                    *entry = entry.saturating_add(1);
                }
            }
        }
    }
}

///
/// MetricsReport
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct MetricsReport {
    pub ops: MetricsOps,
    pub instances_by_class: BTreeMap<String, u64>,
}

///
/// MetricsOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct MetricsOps {
    // Lookups
    pub lookup_hits: u64,
    pub lookup_misses: u64,
    pub metadata_missing: u64,

    // Synthesis
    pub classes_synthesized: u64,
    pub classes_registered: u64,
    pub schemas_created: u64,
    pub max_synthesized_depth: u64,

    // Entities
    pub instances_created: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_accumulate_into_report() {
        let metrics = RegistryMetrics::new();
        metrics.record(RegistryEvent::LookupMiss { class: "S:Leaf" });
        metrics.record(RegistryEvent::ClassSynthesized {
            class: "S:Root",
            schema: "S",
            depth: 0,
        });
        metrics.record(RegistryEvent::ClassSynthesized {
            class: "S:Leaf",
            schema: "S",
            depth: 2,
        });
        metrics.record(RegistryEvent::InstanceCreated { class: "S:Leaf" });
        metrics.record(RegistryEvent::InstanceCreated { class: "S:Leaf" });

        let report = metrics.report();
        assert_eq!(report.ops.lookup_misses, 1);
        assert_eq!(report.ops.classes_synthesized, 2);
        assert_eq!(report.ops.max_synthesized_depth, 2);
        assert_eq!(report.ops.instances_created, 2);
        assert_eq!(report.instances_by_class.get("S:Leaf"), Some(&2));
    }
}
