//! Class metadata as delivered by the external schema store.
//!
//! This layer never synthesizes anything. It holds descriptors, answers
//! lookups by normalized full name, and parses schema documents.

mod cache;
mod document;

pub use cache::MetadataCache;
pub use document::{ClassDocument, SchemaDocument};

use crate::key::{self, ClassName, KeyError};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use thiserror::Error as ThisError;

///
/// MetadataError
///

#[derive(Debug, ThisError)]
pub enum MetadataError {
    #[error("invalid schema document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("schema document has an empty name")]
    EmptySchemaName,

    #[error("schema document '{schema}' declares an unnamed class")]
    EmptyClassName { schema: String },
}

///
/// MetadataProvider
///
/// Read side of a metadata store, keyed by class full name.
/// Implementations must treat the name case-insensitively.
///

pub trait MetadataProvider: Send + Sync {
    fn find(&self, full_name: &str) -> Option<Arc<ClassDescriptor>>;
}

///
/// ClassDescriptor
///
/// Structural description of one class. Only `ec_class` and the primary
/// base are read by the registry; properties are carried through untouched.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDescriptor {
    /// Full name of the described class (`schema:class`).
    #[serde(default)]
    pub ec_class: String,

    /// Ordered base class full names; the first is the primary base.
    #[serde(default)]
    pub base_classes: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyDescriptor>,
}

impl ClassDescriptor {
    #[must_use]
    pub fn new(ec_class: impl Into<String>) -> Self {
        Self {
            ec_class: ec_class.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_classes.push(base.into());
        self
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, property: PropertyDescriptor) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    /// The base class used for constructor chaining. Secondary bases are
    /// ignored.
    #[must_use]
    pub fn primary_base(&self) -> Option<&str> {
        self.base_classes
            .first()
            .map(|base| base.trim())
            .filter(|base| !base.is_empty())
    }

    /// Parse the descriptor's own identity.
    pub fn class_name(&self) -> Result<ClassName, KeyError> {
        ClassName::parse(&self.ec_class)
    }

    /// Declared property name matching `name` case-insensitively.
    #[must_use]
    pub fn declared_property(&self, name: &str) -> Option<&str> {
        self.properties
            .keys()
            .find(|declared| key::same_name(declared, name))
            .map(String::as_str)
    }
}

///
/// PropertyDescriptor
///
/// Schema-defined property description. Opaque to the registry apart from
/// the declared name it is stored under.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primitive_type: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PropertyDescriptor {
    #[must_use]
    pub fn primitive(primitive_type: impl Into<String>) -> Self {
        Self {
            primitive_type: Some(primitive_type.into()),
            extra: BTreeMap::new(),
        }
    }
}
