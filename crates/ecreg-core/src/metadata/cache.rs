use crate::{
    key::ClassKey,
    metadata::{ClassDescriptor, MetadataError, MetadataProvider, SchemaDocument},
};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

///
/// MetadataCache
///
/// Process-lifetime descriptor cache keyed by normalized full name.
/// Optionally fronts an external provider: misses fall through to it and
/// hits are kept. Nothing is ever evicted.
///

#[derive(Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<ClassKey, Arc<ClassDescriptor>>>,
    source: Option<Arc<dyn MetadataProvider>>,
}

impl MetadataCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache that consults `source` on a miss.
    #[must_use]
    pub fn with_source(source: Arc<dyn MetadataProvider>) -> Self {
        Self {
            entries: RwLock::default(),
            source: Some(source),
        }
    }

    /// Insert or overwrite the descriptor stored under `full_name`.
    /// Last write wins; contents are not validated.
    pub fn add(&self, full_name: &str, descriptor: impl Into<Arc<ClassDescriptor>>) {
        self.write()
            .insert(ClassKey::new(full_name), descriptor.into());
    }

    /// Cache-only lookup. Never consults the source.
    #[must_use]
    pub fn get(&self, full_name: &str) -> Option<Arc<ClassDescriptor>> {
        self.read().get(&ClassKey::new(full_name)).cloned()
    }

    #[must_use]
    pub fn contains(&self, full_name: &str) -> bool {
        self.read().contains_key(&ClassKey::new(full_name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Add every class described by `document`. Returns the number added.
    pub fn load_document(&self, document: &SchemaDocument) -> Result<usize, MetadataError> {
        let descriptors = document.descriptors()?;
        let count = descriptors.len();

        let mut entries = self.write();
        for descriptor in descriptors {
            entries.insert(ClassKey::new(&descriptor.ec_class), Arc::new(descriptor));
        }

        Ok(count)
    }

    /// Parse a JSON schema document and add its classes.
    pub fn load_json(&self, json: &str) -> Result<usize, MetadataError> {
        let document = SchemaDocument::from_json(json)?;

        self.load_document(&document)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ClassKey, Arc<ClassDescriptor>>> {
        self.entries
            .read()
            .expect("metadata cache RwLock poisoned while acquiring read lock")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ClassKey, Arc<ClassDescriptor>>> {
        self.entries
            .write()
            .expect("metadata cache RwLock poisoned while acquiring write lock")
    }
}

impl MetadataProvider for MetadataCache {
    fn find(&self, full_name: &str) -> Option<Arc<ClassDescriptor>> {
        if let Some(found) = self.get(full_name) {
            return Some(found);
        }

        let fetched = self.source.as_ref()?.find(full_name)?;

        // another caller may have cached it meanwhile; keep the first copy
        let mut entries = self.write();
        let cached = entries
            .entry(ClassKey::new(full_name))
            .or_insert(fetched);

        Some(Arc::clone(cached))
    }
}
