//! Core runtime for ecreg: class keys, the metadata cache, the schema
//! directory, class synthesis, and the class registry that turns persisted
//! property data into live entities.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod class;
pub mod config;
pub mod entity;
pub mod error;
pub mod key;
pub mod metadata;
pub mod obs;
pub mod registry;
pub mod schema;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Canonical separator between the schema and class parts of a full name.
pub const FULL_NAME_SEPARATOR: char = ':';

/// Alternate separator accepted on input and canonicalized to `:`.
pub const ALT_FULL_NAME_SEPARATOR: char = '.';

/// Default upper bound on the length of a base-class chain.
pub const DEFAULT_MAX_INHERITANCE_DEPTH: usize = 64;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or config loaders are re-exported here.
///

pub mod prelude {
    pub use crate::{
        class::{ClassDefinition, ClassId, EntityClass},
        entity::{ConstructHook, Entity, EntityProps},
        key::{ClassKey, ClassName},
        metadata::{ClassDescriptor, MetadataCache, MetadataProvider, PropertyDescriptor},
        registry::ClassRegistry,
        schema::{Schema, SchemaDirectory, Schemas},
    };
}
