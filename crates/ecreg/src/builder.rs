use crate::Error;
use ecreg_core::{
    config::RegistryConfig,
    metadata::{ClassDescriptor, MetadataCache, MetadataProvider, SchemaDocument},
    obs::RegistrySink,
    registry::ClassRegistry,
    schema::{Schema, SchemaDirectory, Schemas},
};
use std::{path::Path, sync::Arc};

///
/// RegistryBuilder
///
/// Wires configuration, schema documents, an optional external metadata
/// source and an optional metrics sink into a ready `ClassRegistry`.
///
/// Schema documents are validated as they are added, so `build` cannot fail.
///

#[derive(Default)]
pub struct RegistryBuilder {
    config: RegistryConfig,
    source: Option<Arc<dyn MetadataProvider>>,
    schemas: Vec<Schema>,
    descriptors: Vec<ClassDescriptor>,
    directory: Option<Arc<dyn SchemaDirectory>>,
    sink: Option<Arc<dyn RegistrySink>>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config_toml(self, source: &str) -> Result<Self, Error> {
        let config = RegistryConfig::from_toml_str(source)?;

        Ok(self.config(config))
    }

    pub fn config_file(self, path: impl AsRef<Path>) -> Result<Self, Error> {
        let config = RegistryConfig::load(path)?;

        Ok(self.config(config))
    }

    /// External store consulted when the local metadata has no entry.
    #[must_use]
    pub fn metadata_source(mut self, source: Arc<dyn MetadataProvider>) -> Self {
        self.source = Some(source);
        self
    }

    /// Share a schema directory with other registries.
    #[must_use]
    pub fn schema_directory(mut self, directory: Arc<dyn SchemaDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn schema_document(mut self, document: &SchemaDocument) -> Result<Self, Error> {
        let descriptors = document.descriptors()?;

        tracing::debug!(
            schema = %document.name,
            classes = descriptors.len(),
            "loaded schema document"
        );

        self.schemas.push(document.schema());
        self.descriptors.extend(descriptors);

        Ok(self)
    }

    pub fn schema_json(self, json: &str) -> Result<Self, Error> {
        let document = SchemaDocument::from_json(json)?;

        self.schema_document(&document)
    }

    #[must_use]
    pub fn metrics_sink(mut self, sink: Arc<dyn RegistrySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    #[must_use]
    pub fn build(self) -> ClassRegistry {
        let cache = match self.source {
            Some(source) => MetadataCache::with_source(source),
            None => MetadataCache::new(),
        };
        for descriptor in self.descriptors {
            let full_name = descriptor.ec_class.clone();
            cache.add(&full_name, descriptor);
        }

        let directory: Arc<dyn SchemaDirectory> = match self.directory {
            Some(directory) => directory,
            None => Arc::new(Schemas::new()),
        };
        for schema in self.schemas {
            directory.register_schema(Arc::new(schema));
        }

        let registry = ClassRegistry::new(Arc::new(cache))
            .with_schemas(directory)
            .with_config(self.config);

        match self.sink {
            Some(sink) => registry.metrics_sink(sink),
            None => registry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    const PLANT: &str = r#"{
        "name": "Plant",
        "classes": {
            "Equipment": {},
            "Pump": { "baseClasses": ["Equipment"] }
        }
    }"#;

    #[test]
    fn documents_register_real_schemas() {
        let registry = RegistryBuilder::new()
            .schema_json(PLANT)
            .expect("document should load")
            .build();

        let pump = registry.get_class("plant.pump").expect("pump should resolve");
        assert_eq!(pump.full_name(), "Plant:Pump");
        assert!(!pump.schema().is_placeholder());
    }

    #[test]
    fn config_is_applied() {
        let registry = RegistryBuilder::new()
            .config_toml("[registry]\nmax_inheritance_depth = 3\n")
            .expect("config should parse")
            .build();

        assert_eq!(registry.config().max_inheritance_depth, 3);
    }

    #[test]
    fn invalid_config_maps_to_config_kind() {
        let err = RegistryBuilder::new()
            .config_toml("[registry]\nmax_inheritance_depth = 0\n")
            .err()
            .expect("zero depth should fail");

        assert_eq!(err.kind, ErrorKind::Config);
    }

    #[test]
    fn external_source_backs_the_document_cache() {
        let source = MetadataCache::new();
        source.add("Ext:Thing", ClassDescriptor::new("Ext:Thing"));

        let registry = RegistryBuilder::new()
            .metadata_source(Arc::new(source))
            .build();

        registry.get_class("Ext:Thing").expect("source should be consulted");
        assert!(
            registry
                .get_registered_schema("Ext")
                .is_some_and(|schema| schema.is_placeholder())
        );
    }
}
