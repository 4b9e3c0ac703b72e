use crate::{
    key::ClassKey,
    metadata::{ClassDescriptor, MetadataCache, MetadataProvider},
};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Schema used by the three-level fixture chain.
pub(crate) const CHAIN_SCHEMA: &str = "S";

///
/// CountingProvider
///
/// Stand-in for an external metadata store that counts every `find`.
///

#[derive(Default)]
pub(crate) struct CountingProvider {
    descriptors: HashMap<ClassKey, Arc<ClassDescriptor>>,
    calls: AtomicUsize,
}

impl CountingProvider {
    pub(crate) fn with(descriptors: &[ClassDescriptor]) -> Self {
        Self {
            descriptors: descriptors
                .iter()
                .map(|d| (ClassKey::new(&d.ec_class), Arc::new(d.clone())))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetadataProvider for CountingProvider {
    fn find(&self, full_name: &str) -> Option<Arc<ClassDescriptor>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.descriptors.get(&ClassKey::new(full_name)).cloned()
    }
}

/// `S:Root` ← `S:Mid` ← `S:Leaf`.
pub(crate) fn chain_descriptors() -> Vec<ClassDescriptor> {
    vec![
        ClassDescriptor::new("S:Root"),
        ClassDescriptor::new("S:Mid").with_base("S:Root"),
        ClassDescriptor::new("S:Leaf").with_base("S:Mid"),
    ]
}

/// Metadata cache preloaded with `descriptors`.
pub(crate) fn cache_with(descriptors: &[ClassDescriptor]) -> Arc<MetadataCache> {
    let cache = MetadataCache::new();
    for descriptor in descriptors {
        cache.add(&descriptor.ec_class, descriptor.clone());
    }

    Arc::new(cache)
}
