//! Schemas: named groupings that synthesized classes attach to.

use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

///
/// Schema
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Schema {
    name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,

    /// Set when the registry created this entry because a class referenced
    /// a schema nobody had registered yet.
    #[serde(default)]
    placeholder: bool,
}

impl Schema {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            placeholder: false,
        }
    }

    /// Minimal stand-in for a schema that has not been registered.
    #[must_use]
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            placeholder: true,
            ..Self::new(name)
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

///
/// SchemaDirectory
///
/// Lookup capability over registered schemas. Names are case-insensitive.
/// The registry calls in while holding its class lock, so implementations
/// must not call back into the registry.
///

pub trait SchemaDirectory: Send + Sync {
    fn register_schema(&self, schema: Arc<Schema>);

    fn get_registered_schema(&self, name: &str) -> Option<Arc<Schema>>;
}

///
/// Schemas
///
/// In-memory schema directory. The first registration of a name wins,
/// except that a real schema replaces a placeholder.
///

#[derive(Default)]
pub struct Schemas {
    entries: RwLock<HashMap<String, Arc<Schema>>>,
}

impl Schemas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered schema names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .read()
            .values()
            .map(|schema| schema.name().to_string())
            .collect();
        names.sort();

        names
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Schema>>> {
        self.entries
            .read()
            .expect("schema directory RwLock poisoned while acquiring read lock")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Schema>>> {
        self.entries
            .write()
            .expect("schema directory RwLock poisoned while acquiring write lock")
    }
}

impl SchemaDirectory for Schemas {
    fn register_schema(&self, schema: Arc<Schema>) {
        let key = schema.name().to_lowercase();
        let mut entries = self.write();

        match entries.get(&key) {
            Some(existing) if existing.is_placeholder() && !schema.is_placeholder() => {
                tracing::debug!(schema = schema.name(), "replacing placeholder schema");
                entries.insert(key, schema);
            }
            Some(_) => {}
            None => {
                entries.insert(key, schema);
            }
        }
    }

    fn get_registered_schema(&self, name: &str) -> Option<Arc<Schema>> {
        self.read().get(&name.to_lowercase()).cloned()
    }
}
