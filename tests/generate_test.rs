use exemplar::adapters::generator::ValueGenerator;
use exemplar::adapters::json_schema::model_schema_for;
use exemplar::adapters::value_source::FakeSource;
use exemplar::config::GeneratorSettings;
use exemplar::domain::{ExemplarError, GenerateError, ModelSchema};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

#[derive(JsonSchema, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(dead_code)]
enum Role {
    Admin,
    User,
    Guest,
}

#[derive(JsonSchema, Deserialize)]
#[allow(dead_code)]
struct Address {
    city: String,
    #[schemars(range(min = 1001, max = 9998))]
    zip_code: i64,
}

#[derive(JsonSchema, Deserialize)]
#[allow(dead_code)]
struct User {
    #[schemars(range(min = 100, max = 999))]
    id: i64,
    #[schemars(length(min = 5, max = 15))]
    name: String,
    #[serde(default)]
    age: Option<i64>,
    active: bool,
    tags: Vec<String>,
    metadata: HashMap<String, Value>,
    address: Address,
    coordinates: (f64, f64),
    role: Role,
}

#[derive(JsonSchema, Deserialize)]
#[allow(dead_code)]
struct RootList(Vec<User>);

#[derive(JsonSchema, Deserialize)]
#[allow(dead_code)]
struct StrictConstraints {
    #[schemars(length(equal = 10))]
    exact_length: String,
    #[schemars(range(min = 42, max = 42))]
    exact_value: i64,
}

#[derive(JsonSchema, Deserialize)]
#[allow(dead_code)]
struct Broken {
    #[schemars(length(min = 10, max = 3))]
    name: String,
}

// An empty struct reads as a model only when unknown fields are denied
#[derive(JsonSchema, Deserialize)]
#[serde(deny_unknown_fields)]
struct EmptyModel {}

#[derive(JsonSchema, Deserialize)]
struct OpenEmpty {}

fn keys(value: &Value) -> BTreeSet<String> {
    value.as_object().unwrap().keys().cloned().collect()
}

#[test]
fn test_user_example_respects_declared_types() {
    let model = model_schema_for::<User>().unwrap();
    let generator = ValueGenerator::default();

    for seed in 0..30 {
        let value = generator.generate(&model, &mut FakeSource::seeded(seed)).unwrap();

        let id = value["id"].as_i64().unwrap();
        assert!((100..=999).contains(&id));

        let name_len = value["name"].as_str().unwrap().chars().count();
        assert!((5..=15).contains(&name_len));

        assert!(value["age"].is_null() || value["age"].is_i64());
        assert!(value["active"].is_boolean());
        assert!(value["tags"].as_array().unwrap().iter().all(Value::is_string));
        assert!(value["metadata"].is_object());

        let zip = value["address"]["zip_code"].as_i64().unwrap();
        assert!(zip > 1000 && zip < 9999);

        assert_eq!(value["coordinates"].as_array().unwrap().len(), 2);
        assert!(["admin", "user", "guest"].contains(&value["role"].as_str().unwrap()));
    }
}

#[test]
fn test_generated_user_deserializes_back() {
    let model = model_schema_for::<User>().unwrap();
    let value = ValueGenerator::default()
        .generate(&model, &mut FakeSource::seeded(99))
        .unwrap();

    let user: User = serde_json::from_value(value).unwrap();
    assert!((100..=999).contains(&user.id));
}

#[test]
fn test_keys_are_stable_across_calls() {
    let model = model_schema_for::<User>().unwrap();
    let generator = ValueGenerator::default();

    let first = generator.generate(&model, &mut FakeSource::seeded(1)).unwrap();
    let second = generator.generate(&model, &mut FakeSource::seeded(2)).unwrap();

    assert_eq!(keys(&first), keys(&second));
    assert_eq!(keys(&first["address"]), keys(&second["address"]));
    assert_eq!(
        keys(&first),
        [
            "id", "name", "age", "active", "tags", "metadata", "address", "coordinates", "role"
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    );
}

#[test]
fn test_root_list_is_bare_array() {
    let model = model_schema_for::<RootList>().unwrap();
    assert!(matches!(model, ModelSchema::Root { .. }));

    let value = ValueGenerator::default()
        .generate(&model, &mut FakeSource::seeded(5))
        .unwrap();
    let users = value.as_array().unwrap();
    assert!(!users.is_empty());
    assert!(users.iter().all(|u| u["address"]["city"].is_string()));
}

#[test]
fn test_exact_constraints_from_derived_schema() {
    let model = model_schema_for::<StrictConstraints>().unwrap();
    let generator = ValueGenerator::default();

    for seed in 0..10 {
        let value = generator.generate(&model, &mut FakeSource::seeded(seed)).unwrap();
        assert_eq!(value["exact_length"].as_str().unwrap().chars().count(), 10);
        assert_eq!(value["exact_value"], Value::from(42));
    }
}

#[test]
fn test_empty_model_is_empty_object() {
    let model = model_schema_for::<EmptyModel>().unwrap();
    let value = ValueGenerator::default()
        .generate(&model, &mut FakeSource::seeded(0))
        .unwrap();
    assert_eq!(value, Value::Object(Default::default()));
}

#[test]
fn test_open_empty_struct_is_free_form_map() {
    let model = model_schema_for::<OpenEmpty>().unwrap();
    match &model {
        ModelSchema::Root { root, .. } => assert_eq!(root.shape.label(), "map"),
        other => panic!("expected a root-wrapped map, got {:?}", other),
    }

    let value = ValueGenerator::default()
        .generate(&model, &mut FakeSource::seeded(0))
        .unwrap();
    let entries = value.as_object().unwrap();
    assert!((1..=3).contains(&entries.len()));
}

#[test]
fn test_contradiction_surfaces_through_convenience_api() {
    let err = exemplar::generate_with::<Broken>(&GeneratorSettings::default(), &mut FakeSource::seeded(0))
        .unwrap_err();

    match err {
        ExemplarError::Generate(GenerateError::ContradictoryConstraint { path, .. }) => {
            assert_eq!(path, "name")
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_optional_never_null_when_disabled() {
    let settings = GeneratorSettings {
        null_probability: 0.0,
        ..GeneratorSettings::default()
    };

    for seed in 0..10 {
        let value = exemplar::generate_with::<User>(&settings, &mut FakeSource::seeded(seed)).unwrap();
        assert!(value["age"].is_i64());
    }
}

#[test]
fn test_unseeded_generate() {
    let value = exemplar::generate::<Address>().unwrap();
    assert!(value["city"].is_string());
}

#[test]
fn test_derived_shapes() {
    let model = model_schema_for::<User>().unwrap();
    let ModelSchema::Fields { name, fields } = model else {
        panic!("expected a field model");
    };
    assert_eq!(name.as_deref(), Some("User"));

    let shape = |field: &str| {
        fields
            .iter()
            .find(|f| f.name == field)
            .map(|f| f.node.shape.label())
            .unwrap()
    };
    assert_eq!(shape("tags"), "list");
    assert_eq!(shape("coordinates"), "tuple");
    assert_eq!(shape("metadata"), "map");
    assert_eq!(shape("address"), "model");
    assert!(fields.iter().find(|f| f.name == "age").unwrap().node.optional);
}
