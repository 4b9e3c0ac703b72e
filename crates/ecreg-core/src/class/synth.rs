use crate::{
    class::{ClassDefinition, EntityClass},
    error::RegistryError,
    metadata::ClassDescriptor,
    obs::sink::RegistryEvent,
    registry::ClassRegistry,
    schema::Schema,
};
use std::sync::Arc;

///
/// ClassSynthesizer
///
/// Turns one descriptor into one registered class. The primary base must
/// already be registered; resolving it is the registry's job.
///

pub(crate) struct ClassSynthesizer<'a> {
    registry: &'a ClassRegistry,
}

impl<'a> ClassSynthesizer<'a> {
    pub(crate) const fn new(registry: &'a ClassRegistry) -> Self {
        Self { registry }
    }

    pub(crate) fn synthesize(
        &self,
        descriptor: &Arc<ClassDescriptor>,
    ) -> Result<Arc<EntityClass>, RegistryError> {
        // identity
        let name = descriptor
            .class_name()
            .map_err(|_| RegistryError::metadata_not_found(&descriptor.ec_class))?;

        // owning schema; a placeholder is registered only if the directory
        // still has none when the class is inserted
        let schema = self
            .registry
            .get_registered_schema(name.schema())
            .unwrap_or_else(|| Arc::new(Schema::placeholder(name.schema())));

        // parent; secondary bases are not chained
        let parent = descriptor
            .primary_base()
            .map(|base| {
                self.registry
                    .lookup_class(base)
                    .ok_or_else(|| RegistryError::BaseNotRegistered {
                        class: name.full_name(),
                        base: base.to_string(),
                    })
            })
            .transpose()?;

        let mut definition =
            ClassDefinition::new(schema, name.class()).with_descriptor(Arc::clone(descriptor));
        if let Some(parent) = &parent {
            definition = definition.extends(parent);
        }

        let registration = self.registry.insert_definition(definition)?;
        let class = registration.class;

        // another caller may have inserted the same class first
        if !registration.created {
            return Ok(class);
        }

        tracing::debug!(
            class = %class.name(),
            parent = ?parent.as_ref().map(|p| p.full_name()),
            depth = class.depth(),
            "synthesized class"
        );
        let full_name = class.full_name();
        self.registry.record(RegistryEvent::ClassSynthesized {
            class: &full_name,
            schema: class.schema().name(),
            depth: class.depth(),
        });

        Ok(class)
    }
}
