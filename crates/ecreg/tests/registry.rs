use ecreg::prelude::*;
use serde_json::json;
use std::sync::{Arc, Mutex};

const CORE: &str = include_str!("fixtures/core.json");
const PLANT: &str = include_str!("fixtures/plant.json");
const PUMP_PROPS: &str = include_str!("fixtures/pump_props.json");

fn plant_registry() -> ClassRegistry {
    RegistryBuilder::new()
        .schema_json(CORE)
        .expect("core schema should load")
        .schema_json(PLANT)
        .expect("plant schema should load")
        .build()
}

#[test]
fn persisted_props_become_a_live_entity() {
    let registry = plant_registry();
    let props = EntityProps::from_json(PUMP_PROPS).expect("props fixture should parse");

    let entity = registry
        .create_instance(props, "session")
        .expect("pump should materialize");

    assert_eq!(entity.class_full_name(), "Plant:Pump");
    assert_eq!(entity.id(), Some("0x20000000001"));
    assert_eq!(registry.len(), 3, "element, equipment and pump");

    let chain: Vec<String> = registry
        .class_chain(entity.class())
        .iter()
        .map(|class| class.full_name())
        .collect();
    assert_eq!(chain, vec!["Plant:Pump", "Plant:Equipment", "Core:Element"]);

    let keys: Vec<&str> = entity
        .props()
        .properties
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["FlowRate", "Tag", "UserLabel", "lastInspected"]);
    assert_eq!(entity.property("userlabel"), Some(&json!("P-101")));
}

#[test]
fn sibling_classes_share_synthesized_ancestors() {
    let registry = plant_registry();

    let pump = registry.get_class("Plant:Pump").expect("pump");
    let valve = registry.get_class("Plant:Valve").expect("valve");

    assert_eq!(pump.parent(), valve.parent());
    assert_eq!(registry.len(), 4);
    assert!(pump.schema().alias() == Some("pl"));
}

#[test]
fn missing_ancestor_schema_surfaces_metadata_not_found() {
    let registry = RegistryBuilder::new()
        .schema_json(PLANT)
        .expect("plant schema should load")
        .build();

    let err: Error = registry
        .get_class("Plant:Pump")
        .expect_err("core metadata is absent")
        .into();

    assert_eq!(err.kind, ErrorKind::MetaDataNotFound);
    assert!(err.message.contains("Core:Element"), "got: {}", err.message);
    assert!(registry.is_empty());
}

#[test]
fn empty_class_name_is_a_bad_argument() {
    let registry = plant_registry();

    let err: Error = registry
        .create_instance(EntityProps::new("  "), ())
        .expect_err("blank class name")
        .into();

    assert_eq!(err.kind, ErrorKind::BadArgument);
    assert!(registry.is_empty());
}

#[test]
fn metrics_report_serializes() {
    let metrics = Arc::new(RegistryMetrics::new());
    let registry = RegistryBuilder::new()
        .schema_json(CORE)
        .expect("core schema should load")
        .schema_json(PLANT)
        .expect("plant schema should load")
        .metrics_sink(metrics.clone())
        .build();

    registry
        .create_instance(EntityProps::new("Plant:Valve"), ())
        .expect("valve");

    let report = metrics.report();
    assert_eq!(report.ops.classes_synthesized, 3);
    assert_eq!(report.ops.schemas_created, 0, "both schemas were registered up front");

    let json = serde_json::to_value(&report).expect("report should serialize");
    assert_eq!(json["instances_by_class"]["Plant:Valve"], 1);
}

#[derive(Default)]
struct Audit {
    constructed: Mutex<Vec<String>>,
}

impl ConstructHook for Audit {
    fn construct(&self, class: &EntityClass, props: &mut EntityProps) {
        if let Ok(mut constructed) = self.constructed.lock() {
            constructed.push(props.class_full_name.clone());
        }
        if props.get("Tag").is_none() {
            props.set("Tag", json!(format!("{}-auto", class.name().class())));
        }
    }
}

#[test]
fn code_registered_hook_runs_for_synthesized_subclasses() {
    let registry = plant_registry();
    let audit = Arc::new(Audit::default());

    let element = registry.get_class("Core:Element").expect("element");
    let plant = registry
        .get_registered_schema("Plant")
        .expect("plant schema registered by the builder");
    registry
        .register_ec_class(
            ClassDefinition::new(plant, "Equipment")
                .extends(&element)
                .with_hook(audit.clone()),
        )
        .expect("equipment from code");

    let entity = registry
        .create_instance(EntityProps::new("Plant:Valve"), ())
        .expect("valve");

    assert_eq!(
        *audit.constructed.lock().expect("audit log"),
        vec!["Plant:Valve".to_string()]
    );
    assert_eq!(entity.property("Tag"), Some(&json!("Equipment-auto")));
}

#[test]
fn strictness_comes_from_config() {
    let registry = RegistryBuilder::new()
        .config_toml("[registry]\nstrict_registration = false\n")
        .expect("config")
        .schema_json(CORE)
        .expect("core")
        .schema_json(PLANT)
        .expect("plant")
        .build();

    let pump = registry.get_class("Plant:Pump").expect("pump");
    let core = registry.get_registered_schema("Core").expect("core schema");

    let kept = registry
        .register_ec_class(ClassDefinition::new(core, "Element").extends(&pump))
        .expect("lenient registry keeps the existing class");

    assert_eq!(kept.full_name(), "Core:Element");
    assert_eq!(kept.parent(), None);
}
