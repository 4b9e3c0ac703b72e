//! Metrics sink boundary.
//!
//! Registry code MUST NOT touch counters directly. All instrumentation
//! flows through `RegistryEvent` and `RegistrySink`.

///
/// RegistryEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegistryEvent<'a> {
    /// `get_class` found the class already registered.
    LookupHit { class: &'a str },

    /// `get_class` had to fall back to metadata-driven generation.
    LookupMiss { class: &'a str },

    MetadataMissing { class: &'a str },

    ClassSynthesized {
        class: &'a str,
        schema: &'a str,
        depth: usize,
    },

    /// A class was added to the map, synthesized or registered from code.
    ClassRegistered { class: &'a str },

    SchemaCreated { schema: &'a str },

    InstanceCreated { class: &'a str },
}

///
/// RegistrySink
///
/// Some events are recorded while the registry holds its class lock, so
/// sinks must not call back into the registry.
///

pub trait RegistrySink: Send + Sync {
    fn record(&self, event: RegistryEvent<'_>);
}
