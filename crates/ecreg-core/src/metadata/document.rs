use crate::{
    FULL_NAME_SEPARATOR,
    key::ClassName,
    metadata::{ClassDescriptor, MetadataError, PropertyDescriptor},
    schema::Schema,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// SchemaDocument
///
/// One schema as persisted by the metadata store: its name, an optional
/// alias, and the classes it declares keyed by bare class name.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default)]
    pub classes: BTreeMap<String, ClassDocument>,
}

///
/// ClassDocument
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDocument {
    /// Base classes; bare names refer to the enclosing schema.
    #[serde(default)]
    pub base_classes: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyDescriptor>,
}

impl SchemaDocument {
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        let document: Self = serde_json::from_str(json)?;
        if document.name.trim().is_empty() {
            return Err(MetadataError::EmptySchemaName);
        }

        Ok(document)
    }

    /// The schema record this document registers.
    #[must_use]
    pub fn schema(&self) -> Schema {
        let schema = Schema::new(self.name.trim());

        match &self.alias {
            Some(alias) => schema.with_alias(alias),
            None => schema,
        }
    }

    /// Expand the document into fully-qualified class descriptors.
    pub fn descriptors(&self) -> Result<Vec<ClassDescriptor>, MetadataError> {
        let schema = self.name.trim();
        if schema.is_empty() {
            return Err(MetadataError::EmptySchemaName);
        }

        self.classes
            .iter()
            .map(|(class, doc)| {
                let class = class.trim();
                if class.is_empty() {
                    return Err(MetadataError::EmptyClassName {
                        schema: schema.to_string(),
                    });
                }

                Ok(ClassDescriptor {
                    ec_class: ClassName::new(schema, class).full_name(),
                    base_classes: doc
                        .base_classes
                        .iter()
                        .map(|base| qualify(schema, base))
                        .collect(),
                    properties: doc.properties.clone(),
                })
            })
            .collect()
    }
}

// qualify
// bare base names belong to the enclosing schema
fn qualify(schema: &str, base: &str) -> String {
    let base = base.trim();

    if ClassName::parse(base).is_ok() {
        base.to_string()
    } else {
        format!("{schema}{FULL_NAME_SEPARATOR}{base}")
    }
}
