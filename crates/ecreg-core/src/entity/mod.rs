//! Entities: persisted property data bound to a registered class.

use crate::{class::EntityClass, key};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, sync::Arc};

///
/// ConstructHook
///
/// Class-specific construction step. Hooks along a class chain run root
/// first, after the shared property handling.
///

pub trait ConstructHook: Send + Sync {
    fn construct(&self, class: &EntityClass, props: &mut EntityProps);
}

///
/// EntityProps
///
/// Property bag for one entity as persisted. `classFullName` names the class;
/// everything else is carried in `properties`.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityProps {
    #[serde(default)]
    pub class_full_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(flatten)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl EntityProps {
    #[must_use]
    pub fn new(class_full_name: impl Into<String>) -> Self {
        Self {
            class_full_name: class_full_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// True when the props name a class at all.
    #[must_use]
    pub fn has_class_identity(&self) -> bool {
        !self.class_full_name.trim().is_empty()
    }

    /// Property lookup: exact name first, then case-insensitive.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.properties.get(name).or_else(|| {
            self.properties
                .iter()
                .find(|(existing, _)| key::same_name(existing, name))
                .map(|(_, value)| value)
        })
    }

    pub fn set(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.properties.insert(name.into(), value);
    }

    // rename keys that match a declared property to its declared casing
    fn normalize_names(&mut self, chain: &[Arc<EntityClass>]) {
        let renames: Vec<(String, String)> = self
            .properties
            .keys()
            .filter_map(|key| {
                chain
                    .iter()
                    .filter_map(|class| class.descriptor())
                    .find_map(|descriptor| descriptor.declared_property(key))
                    .filter(|declared| *declared != key.as_str())
                    .map(|declared| (key.clone(), declared.to_string()))
            })
            .collect();

        for (from, to) in renames {
            if self.properties.contains_key(&to) {
                continue;
            }
            if let Some(value) = self.properties.remove(&from) {
                self.properties.insert(to, value);
            }
        }
    }
}

///
/// Entity
///
/// A live entity. `C` is the owning context handed through construction;
/// the registry never looks inside it.
///

#[derive(Clone)]
pub struct Entity<C> {
    class: Arc<EntityClass>,
    props: EntityProps,
    context: C,
}

impl<C> Entity<C> {
    /// Shared construction for every class: canonical class name, declared
    /// property casing, then hooks from the root down.
    pub(crate) fn construct(
        chain: &[(Arc<EntityClass>, Option<Arc<dyn ConstructHook>>)],
        mut props: EntityProps,
        context: C,
        normalize_property_names: bool,
    ) -> Option<Self> {
        let (class, _) = chain.last()?;
        let class = Arc::clone(class);

        props.class_full_name = class.full_name();

        if normalize_property_names {
            let classes: Vec<Arc<EntityClass>> =
                chain.iter().map(|(class, _)| Arc::clone(class)).collect();
            props.normalize_names(&classes);
        }

        for (ancestor, hook) in chain {
            if let Some(hook) = hook {
                hook.construct(ancestor, &mut props);
            }
        }

        Some(Self {
            class,
            props,
            context,
        })
    }

    #[must_use]
    pub const fn class(&self) -> &Arc<EntityClass> {
        &self.class
    }

    #[must_use]
    pub fn class_full_name(&self) -> &str {
        &self.props.class_full_name
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.props.id.as_deref()
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&serde_json::Value> {
        self.props.get(name)
    }

    #[must_use]
    pub const fn props(&self) -> &EntityProps {
        &self.props
    }

    #[must_use]
    pub const fn context(&self) -> &C {
        &self.context
    }

    /// True when this entity's class is `class` or derives from it.
    #[must_use]
    pub fn is_instance_of(&self, class: &EntityClass) -> bool {
        self.class.is_subclass_of(class)
    }

    #[must_use]
    pub fn into_parts(self) -> (EntityProps, C) {
        (self.props, self.context)
    }
}

impl<C> fmt::Debug for Entity<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("class", self.class.name())
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn props_round_trip_camel_case_with_flattened_properties() {
        let props = EntityProps::from_json(
            r#"{ "classFullName": "S:Leaf", "id": "0x1", "userLabel": "pump 7", "rank": 3 }"#,
        )
        .expect("props should parse");

        assert_eq!(props.class_full_name, "S:Leaf");
        assert_eq!(props.id.as_deref(), Some("0x1"));
        assert_eq!(props.properties.len(), 2);
        assert_eq!(props.get("UserLabel"), Some(&json!("pump 7")));

        let value = serde_json::to_value(&props).expect("props should serialize");
        assert_eq!(value["classFullName"], json!("S:Leaf"));
        assert_eq!(value["rank"], json!(3));
    }

    #[test]
    fn missing_class_name_has_no_identity() {
        let props = EntityProps::from_json(r#"{ "rank": 1 }"#).expect("props should parse");

        assert!(!props.has_class_identity());
        assert!(!EntityProps::new("  ").has_class_identity());
        assert!(EntityProps::new("S:Root").has_class_identity());
    }

    #[test]
    fn exact_property_name_wins_over_case_insensitive_match() {
        let props = EntityProps::new("S:Root")
            .with_property("label", json!("lower"))
            .with_property("Label", json!("declared"));

        assert_eq!(props.get("Label"), Some(&json!("declared")));
        assert_eq!(props.get("label"), Some(&json!("lower")));
    }

    #[test]
    fn property_lookup_folds_non_ascii_names() {
        let props = EntityProps::new("S:Root").with_property("Größe", json!(3));

        assert_eq!(props.get("GRÖSSE"), None);
        assert_eq!(props.get("größe"), Some(&json!(3)));
        assert_eq!(props.get("GRÖßE"), Some(&json!(3)));
    }
}
