//! The class registry: normalized name → class map, metadata-driven
//! synthesis on a miss, and entity materialization.


use crate::{
    class::{ClassDefinition, ClassSynthesizer, ClassTable, EntityClass, Insertion},
    config::RegistryConfig,
    entity::{Entity, EntityProps},
    error::{ClassNotFoundReason, RegistryError},
    key::ClassKey,
    metadata::MetadataProvider,
    obs::sink::{RegistryEvent, RegistrySink},
    schema::{Schema, SchemaDirectory, Schemas},
};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

///
/// Registration
///
/// Outcome of inserting a definition: the class now registered under its
/// name, and whether this call created it.
///

pub(crate) struct Registration {
    pub(crate) class: Arc<EntityClass>,
    pub(crate) created: bool,
}

impl Registration {
    const fn created(class: Arc<EntityClass>) -> Self {
        Self {
            class,
            created: true,
        }
    }

    const fn existing(class: Arc<EntityClass>) -> Self {
        Self {
            class,
            created: false,
        }
    }
}

///
/// ClassRegistry
///
/// Session-scoped registry context. Build one per session (or per test) and
/// pass it by reference to whatever needs classes or entities; it holds no
/// global state.
///
/// The class map sits behind a registry-scoped lock. Synthesis re-checks the
/// map under the write lock, so racing callers all observe the one record
/// that won.
///

pub struct ClassRegistry {
    metadata: Arc<dyn MetadataProvider>,
    schemas: Arc<dyn SchemaDirectory>,
    classes: RwLock<ClassTable>,
    config: RegistryConfig,
    sink: Option<Arc<dyn RegistrySink>>,
}

impl ClassRegistry {
    /// Create an empty registry over `metadata` with a private schema
    /// directory and default config.
    #[must_use]
    pub fn new(metadata: Arc<dyn MetadataProvider>) -> Self {
        Self {
            metadata,
            schemas: Arc::new(Schemas::new()),
            classes: RwLock::default(),
            config: RegistryConfig::default(),
            sink: None,
        }
    }

    #[must_use]
    pub fn with_schemas(mut self, schemas: Arc<dyn SchemaDirectory>) -> Self {
        self.schemas = schemas;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn metrics_sink(mut self, sink: Arc<dyn RegistrySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    #[must_use]
    pub const fn metadata(&self) -> &Arc<dyn MetadataProvider> {
        &self.metadata
    }

    #[must_use]
    pub const fn schemas(&self) -> &Arc<dyn SchemaDirectory> {
        &self.schemas
    }

    ///
    /// LOOKUP
    ///

    /// Map lookup only; never synthesizes.
    #[must_use]
    pub fn lookup_class(&self, full_name: &str) -> Option<Arc<EntityClass>> {
        self.read().lookup(&ClassKey::new(full_name)).cloned()
    }

    #[must_use]
    pub fn is_class_registered(&self, schema: &str, class: &str) -> bool {
        self.read().lookup(&ClassKey::from_parts(schema, class)).is_some()
    }

    /// Registered class for `full_name`, synthesizing it (and any missing
    /// ancestors) from metadata when absent.
    pub fn get_class(&self, full_name: &str) -> Result<Arc<EntityClass>, RegistryError> {
        self.resolve(full_name, &mut Vec::new())
    }

    /// Records from `class` up to its root, leaf first.
    #[must_use]
    pub fn class_chain(&self, class: &EntityClass) -> Vec<Arc<EntityClass>> {
        self.read().chain(class.id())
    }

    /// Snapshot of every registered class in registration order.
    #[must_use]
    pub fn classes(&self) -> Vec<Arc<EntityClass>> {
        self.read().iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    ///
    /// REGISTRATION
    ///

    /// Register a class defined in code. Re-registering an equivalent
    /// definition returns the existing class. The class links to the
    /// directory's schema of the same name, which is the definition's own
    /// schema if none was registered.
    pub fn register_ec_class(
        &self,
        definition: ClassDefinition,
    ) -> Result<Arc<EntityClass>, RegistryError> {
        self.insert_definition(definition)
            .map(|registration| registration.class)
    }

    pub fn register_schema(&self, schema: Schema) {
        self.schemas.register_schema(Arc::new(schema));
    }

    #[must_use]
    pub fn get_registered_schema(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get_registered_schema(name)
    }

    ///
    /// ENTITIES
    ///

    /// Materialize an entity from persisted props. The only supported way to
    /// turn property data into a live entity.
    pub fn create_instance<C>(
        &self,
        props: EntityProps,
        context: C,
    ) -> Result<Entity<C>, RegistryError> {
        if !props.has_class_identity() {
            return Err(RegistryError::BadArgument(
                "entity props carry no classFullName".to_string(),
            ));
        }

        let class = self.get_class(&props.class_full_name)?;
        let chain = self.read().construction_chain(class.id());

        let entity = Entity::construct(&chain, props, context, self.config.normalize_property_names)
            .ok_or_else(|| {
                RegistryError::class_not_found(class.full_name(), ClassNotFoundReason::Unresolved)
            })?;

        self.record(RegistryEvent::InstanceCreated {
            class: entity.class_full_name(),
        });

        Ok(entity)
    }

    ///
    /// RESOLUTION
    ///

    // `trail` holds the keys of classes whose bases are being resolved.
    fn resolve(
        &self,
        full_name: &str,
        trail: &mut Vec<ClassKey>,
    ) -> Result<Arc<EntityClass>, RegistryError> {
        if let Some(class) = self.lookup_class(full_name) {
            tracing::trace!(class = full_name, "class lookup hit");
            self.record(RegistryEvent::LookupHit { class: full_name });

            return Ok(class);
        }

        self.record(RegistryEvent::LookupMiss { class: full_name });
        self.generate_class(full_name, trail)
    }

    fn generate_class(
        &self,
        full_name: &str,
        trail: &mut Vec<ClassKey>,
    ) -> Result<Arc<EntityClass>, RegistryError> {
        let key = ClassKey::new(full_name);

        if trail.contains(&key) {
            return Err(RegistryError::class_not_found(
                full_name,
                ClassNotFoundReason::Cycle(key.to_string()),
            ));
        }
        if trail.len() > self.config.max_inheritance_depth {
            return Err(RegistryError::class_not_found(
                full_name,
                ClassNotFoundReason::DepthExceeded(self.config.max_inheritance_depth),
            ));
        }

        let Some(descriptor) = self.metadata.find(full_name) else {
            tracing::debug!(class = full_name, "no metadata for class");
            self.record(RegistryEvent::MetadataMissing { class: full_name });

            return Err(RegistryError::metadata_not_found(full_name));
        };

        let name = descriptor
            .class_name()
            .map_err(|_| RegistryError::metadata_not_found(full_name))?;

        // a descriptor filed under another class would register that class,
        // never the one asked for
        if name.key() != key {
            return Err(RegistryError::class_not_found(
                full_name,
                ClassNotFoundReason::Unresolved,
            ));
        }

        if let Some(base) = descriptor.primary_base() {
            trail.push(key);
            let resolved = self.resolve(base, trail);
            trail.pop();

            resolved?;
        }

        ClassSynthesizer::new(self).synthesize(&descriptor)
    }

    ///
    /// CRATE HELPERS
    ///

    /// Insert `definition`, linking a new record to the directory's schema
    /// of the same name. The definition's own schema is registered first
    /// when the directory has none, and only once the insert will succeed.
    pub(crate) fn insert_definition(
        &self,
        definition: ClassDefinition,
    ) -> Result<Registration, RegistryError> {
        let full_name = definition.name().full_name();
        let insertion = self
            .write()
            .insert_with(definition, |schema| self.adopt_schema(schema))?;

        match insertion {
            Insertion::Created(class) => {
                self.record(RegistryEvent::ClassRegistered { class: &full_name });

                Ok(Registration::created(class))
            }
            Insertion::Existing(class) => Ok(Registration::existing(class)),
            Insertion::Conflict(existing) => {
                if self.config.strict_registration {
                    return Err(RegistryError::ClassConflict(full_name));
                }

                tracing::warn!(
                    class = %full_name,
                    existing = %existing.name(),
                    "class already registered with a different definition; keeping existing"
                );

                Ok(Registration::existing(existing))
            }
        }
    }

    // runs under the class table write lock: lock order is classes, then
    // schemas
    fn adopt_schema(&self, schema: &Arc<Schema>) -> Arc<Schema> {
        if let Some(existing) = self.schemas.get_registered_schema(schema.name()) {
            return existing;
        }

        self.schemas.register_schema(Arc::clone(schema));
        if schema.is_placeholder() {
            tracing::debug!(schema = schema.name(), "created placeholder schema");
            self.record(RegistryEvent::SchemaCreated {
                schema: schema.name(),
            });
        }

        self.schemas
            .get_registered_schema(schema.name())
            .unwrap_or_else(|| Arc::clone(schema))
    }

    pub(crate) fn record(&self, event: RegistryEvent<'_>) {
        if let Some(sink) = &self.sink {
            sink.record(event);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ClassTable> {
        self.classes
            .read()
            .expect("class registry RwLock poisoned while acquiring read lock")
    }

    fn write(&self) -> RwLockWriteGuard<'_, ClassTable> {
        self.classes
            .write()
            .expect("class registry RwLock poisoned while acquiring write lock")
    }
}
