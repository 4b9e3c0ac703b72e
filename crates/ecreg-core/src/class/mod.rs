//! Runtime class records.
//!
//! A class is a plain data record stored in an arena and addressed by
//! [`ClassId`]. Parent links are ids into the same arena, so an inheritance
//! chain is walked by index, never through generated types. Construction
//! behavior lives in a capability table parallel to the arena.

mod synth;

pub(crate) use synth::ClassSynthesizer;

use crate::{
    entity::ConstructHook,
    error::RegistryError,
    key::{self, ClassKey, ClassName},
    metadata::ClassDescriptor,
    schema::Schema,
};
use derive_more::Display;
use std::{collections::HashMap, fmt, sync::Arc};

///
/// ClassId
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("#{_0}")]
pub struct ClassId(usize);

impl ClassId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

///
/// EntityClass
///
/// Immutable record for one registered class. Created once, shared by the
/// registry and every entity it produces.
///

#[derive(Debug)]
pub struct EntityClass {
    id: ClassId,
    name: ClassName,
    schema: Arc<Schema>,
    parent: Option<ClassId>,
    /// Ids from the root of the chain down to this class.
    lineage: Vec<ClassId>,
    descriptor: Option<Arc<ClassDescriptor>>,
}

impl EntityClass {
    #[must_use]
    pub const fn id(&self) -> ClassId {
        self.id
    }

    #[must_use]
    pub const fn name(&self) -> &ClassName {
        &self.name
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        self.name.full_name()
    }

    #[must_use]
    pub fn key(&self) -> ClassKey {
        self.name.key()
    }

    #[must_use]
    pub const fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    #[must_use]
    pub const fn parent(&self) -> Option<ClassId> {
        self.parent
    }

    #[must_use]
    pub fn lineage(&self) -> &[ClassId] {
        &self.lineage
    }

    /// Number of ancestors above this class.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.lineage.len().saturating_sub(1)
    }

    /// Metadata this class was synthesized from; `None` for classes
    /// registered from code.
    #[must_use]
    pub const fn descriptor(&self) -> Option<&Arc<ClassDescriptor>> {
        self.descriptor.as_ref()
    }

    /// True when `other` is this class or one of its ancestors.
    #[must_use]
    pub fn is_subclass_of(&self, other: &Self) -> bool {
        self.lineage.contains(&other.id)
    }
}

///
/// ClassDefinition
///
/// Input for registering a class: where it lives, what it extends, and an
/// optional construction hook.
///

#[derive(Clone)]
pub struct ClassDefinition {
    name: ClassName,
    schema: Arc<Schema>,
    parent: Option<ClassId>,
    descriptor: Option<Arc<ClassDescriptor>>,
    hook: Option<Arc<dyn ConstructHook>>,
}

impl ClassDefinition {
    #[must_use]
    pub fn new(schema: Arc<Schema>, class: impl Into<String>) -> Self {
        Self {
            name: ClassName::new(schema.name(), class),
            schema,
            parent: None,
            descriptor: None,
            hook: None,
        }
    }

    #[must_use]
    pub fn extends(mut self, parent: &EntityClass) -> Self {
        self.parent = Some(parent.id);
        self
    }

    #[must_use]
    pub fn with_hook(mut self, hook: Arc<dyn ConstructHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    #[must_use]
    pub(crate) fn with_descriptor(mut self, descriptor: Arc<ClassDescriptor>) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    #[must_use]
    pub const fn name(&self) -> &ClassName {
        &self.name
    }

    // same schema and same parent; descriptors and hooks are not compared
    fn is_equivalent_to(&self, class: &EntityClass) -> bool {
        key::same_name(self.schema.name(), class.schema.name()) && self.parent == class.parent
    }
}

impl fmt::Debug for ClassDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDefinition")
            .field("name", &self.name)
            .field("schema", &self.schema.name())
            .field("parent", &self.parent)
            .field("has_hook", &self.hook.is_some())
            .finish_non_exhaustive()
    }
}

///
/// Insertion
///

pub(crate) enum Insertion {
    Created(Arc<EntityClass>),
    Existing(Arc<EntityClass>),
    Conflict(Arc<EntityClass>),
}

///
/// ClassTable
///
/// Arena of class records, the normalized-name index over it, and the
/// per-record construction hooks.
///

#[derive(Default)]
pub(crate) struct ClassTable {
    records: Vec<Arc<EntityClass>>,
    hooks: Vec<Option<Arc<dyn ConstructHook>>>,
    index: HashMap<ClassKey, ClassId>,
}

impl ClassTable {
    pub(crate) fn lookup(&self, key: &ClassKey) -> Option<&Arc<EntityClass>> {
        self.index.get(key).and_then(|id| self.get(*id))
    }

    pub(crate) fn get(&self, id: ClassId) -> Option<&Arc<EntityClass>> {
        self.records.get(id.0)
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Arc<EntityClass>> {
        self.records.iter()
    }

    /// Records from `id` up to the root, leaf first.
    pub(crate) fn chain(&self, id: ClassId) -> Vec<Arc<EntityClass>> {
        let Some(class) = self.get(id) else {
            return Vec::new();
        };

        class
            .lineage
            .iter()
            .rev()
            .filter_map(|ancestor| self.get(*ancestor).cloned())
            .collect()
    }

    /// Records and hooks from the root down to `id`.
    pub(crate) fn construction_chain(
        &self,
        id: ClassId,
    ) -> Vec<(Arc<EntityClass>, Option<Arc<dyn ConstructHook>>)> {
        let Some(class) = self.get(id) else {
            return Vec::new();
        };

        class
            .lineage
            .iter()
            .filter_map(|ancestor| {
                let record = self.get(*ancestor)?;
                let hook = self.hooks.get(ancestor.0).cloned().flatten();

                Some((Arc::clone(record), hook))
            })
            .collect()
    }

    /// Insert a definition unless its name is already taken. `adopt_schema`
    /// runs only once the insert is certain to succeed, and its result is
    /// the schema the new record links to.
    pub(crate) fn insert_with(
        &mut self,
        definition: ClassDefinition,
        adopt_schema: impl FnOnce(&Arc<Schema>) -> Arc<Schema>,
    ) -> Result<Insertion, RegistryError> {
        let key = definition.name.key();

        if let Some(existing) = self.lookup(&key) {
            let existing = Arc::clone(existing);

            return Ok(if definition.is_equivalent_to(&existing) {
                Insertion::Existing(existing)
            } else {
                Insertion::Conflict(existing)
            });
        }

        let id = ClassId(self.records.len());
        let mut lineage = match definition.parent {
            Some(parent) => self
                .get(parent)
                .map(|record| record.lineage.clone())
                .ok_or_else(|| RegistryError::BaseNotRegistered {
                    class: definition.name.full_name(),
                    base: parent.to_string(),
                })?,
            None => Vec::new(),
        };
        lineage.push(id);

        // the record takes the adopted schema's spelling of its name
        let schema = adopt_schema(&definition.schema);
        let name = ClassName::new(schema.name(), definition.name.class());

        let class = Arc::new(EntityClass {
            id,
            name,
            schema,
            parent: definition.parent,
            lineage,
            descriptor: definition.descriptor,
        });

        self.records.push(Arc::clone(&class));
        self.hooks.push(definition.hook);
        self.index.insert(key, id);

        Ok(Insertion::Created(class))
    }
}
