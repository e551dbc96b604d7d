//! JSON Schema extraction.
//!
//! This is the only place that inspects declared types. Rust types are
//! reflected through [`schemars`], schema files (JSON or YAML, draft-07 or
//! 2020-12 style) are read as-is, and both end up as an explicit
//! [`ModelSchema`] for the generator.
//!
//! ## Mapping
//!
//! | JSON Schema                                   | Shape                     |
//! |-----------------------------------------------|---------------------------|
//! | `string` + `minLength`/`maxLength`            | `Str` + length bounds     |
//! | `integer` / `number` + `minimum`, `maximum`,  | `Int` / `Float` + bounds  |
//! | `exclusiveMinimum`, `exclusiveMaximum`        |                           |
//! | `enum` / `const`                              | `Enum`                    |
//! | `type: [T, "null"]`, `anyOf [.., {null}]`     | optional node             |
//! | `anyOf` / `oneOf` without null                | `Union`                   |
//! | `array` with `items` schema                   | `List` + item count bounds|
//! | `array` with `items` list / `prefixItems`     | `Tuple`                   |
//! | `object` with `properties`                    | nested `Model`            |
//! | other `object`                                | `Map`                     |
//! | `$ref` to a model / to anything else          | `Model` / root-wrapped    |
//! | `true`, `{}`                                  | `Any`                     |
//!
//! A Rust struct with no fields derives as a bare `{"type": "object"}` and is
//! therefore generated as a free-form map. Deriving it with
//! `#[serde(deny_unknown_fields)]` adds `additionalProperties: false`, which
//! makes it an empty model that generates `{}`.

use crate::adapters::generator::{next_down, next_up};
use crate::domain::{Constraint, ConstraintKind, Field, ModelSchema, SchemaError, SchemaNode, Shape};
use schemars::JsonSchema;
use serde_json::{Map, Value};
use std::path::Path;

type Object = Map<String, Value>;

/// Build the model description of a Rust type from its derived `JsonSchema`.
pub fn model_schema_for<T: JsonSchema>() -> Result<ModelSchema, SchemaError> {
    let root = schemars::schema_for!(T);
    let document = serde_json::to_value(&root)?;
    SchemaExtractor::from_document(&document)
}

/// Read a schema document from a `.json`, `.yaml` or `.yml` file.
pub fn load_schema_file(path: &Path) -> Result<Value, SchemaError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let content = std::fs::read_to_string(path)?;

    let document = match ext.as_str() {
        "json" => serde_json::from_str(&content)?,
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        _ => return Err(SchemaError::UnsupportedFormat(path.display().to_string())),
    };
    tracing::debug!("Loaded schema document from {}", path.display());
    Ok(document)
}

/// Walks one schema document, resolving local `$ref`s against it.
pub struct SchemaExtractor<'a> {
    document: &'a Value,
    /// References currently being expanded, innermost last
    active: Vec<String>,
}

impl<'a> SchemaExtractor<'a> {
    fn new(document: &'a Value) -> Self {
        Self {
            document,
            active: Vec::new(),
        }
    }

    /// Extract the model described by the document's root schema.
    pub fn from_document(document: &'a Value) -> Result<ModelSchema, SchemaError> {
        let mut extractor = Self::new(document);
        let name = title_of(document);
        extractor.model(document, name, "")
    }

    /// Extract a model from the document's `definitions` / `$defs` by name.
    pub fn definition(document: &'a Value, name: &str) -> Result<ModelSchema, SchemaError> {
        let reference = ["definitions", "$defs"]
            .iter()
            .map(|section| format!("#/{}/{}", section, name))
            .find(|r| document.pointer(&r[1..]).is_some())
            .ok_or_else(|| SchemaError::UnresolvedReference(name.to_string()))?;

        let mut extractor = Self::new(document);
        let target = extractor.resolve(&reference)?;
        extractor.active.push(reference.clone());
        let model = extractor.model(target, Some(name.to_string()), "");
        extractor.active.pop();
        model
    }

    fn model(&mut self, schema: &'a Value, name: Option<String>, path: &str) -> Result<ModelSchema, SchemaError> {
        if let Some(obj) = schema.as_object() {
            if is_model(obj) {
                return self.fields_model(obj, name, path);
            }
        }
        Ok(ModelSchema::Root {
            name,
            root: Box::new(self.node(schema, path)?),
        })
    }

    fn fields_model(&mut self, obj: &'a Object, name: Option<String>, path: &str) -> Result<ModelSchema, SchemaError> {
        let mut fields = Vec::new();
        if let Some(properties) = obj.get("properties") {
            let properties = properties.as_object().ok_or_else(|| SchemaError::Invalid {
                path: display_path(path),
                reason: "'properties' must be an object".to_string(),
            })?;
            for (field_name, field_schema) in properties {
                let field_path = child_path(path, field_name);
                fields.push(Field::new(field_name.clone(), self.node(field_schema, &field_path)?));
            }
        }
        Ok(ModelSchema::Fields { name, fields })
    }

    /// Translate one schema into a node.
    pub fn node(&mut self, schema: &'a Value, path: &str) -> Result<SchemaNode, SchemaError> {
        let obj = match schema {
            Value::Bool(true) => return Ok(SchemaNode::any()),
            Value::Bool(false) => return Ok(SchemaNode::unsupported("schema `false` admits no value")),
            Value::Object(obj) => obj,
            _ => {
                return Err(SchemaError::Invalid {
                    path: display_path(path),
                    reason: format!("expected an object or boolean schema, found {}", schema),
                })
            }
        };

        let mut node = self.shape_node(obj, path)?;
        if node.default.is_none() {
            node.default = obj.get("default").cloned();
        }
        Ok(node)
    }

    fn shape_node(&mut self, obj: &'a Object, path: &str) -> Result<SchemaNode, SchemaError> {
        if let Some(reference) = obj.get("$ref") {
            let reference = reference.as_str().ok_or_else(|| SchemaError::Invalid {
                path: display_path(path),
                reason: "'$ref' must be a string".to_string(),
            })?;
            return self.reference_node(reference, path);
        }

        if let Some(all_of) = obj.get("allOf").and_then(Value::as_array) {
            return match all_of.as_slice() {
                [single] => self.node(single, path),
                _ => Ok(SchemaNode::unsupported(format!(
                    "allOf with {} members",
                    all_of.len()
                ))),
            };
        }

        for keyword in ["anyOf", "oneOf"] {
            if let Some(variants) = obj.get(keyword).and_then(Value::as_array) {
                return self.alternatives_node(variants, path);
            }
        }

        if let Some(members) = obj.get("enum") {
            let members = members.as_array().ok_or_else(|| SchemaError::Invalid {
                path: display_path(path),
                reason: "'enum' must be an array".to_string(),
            })?;
            return Ok(enum_node(members.clone()));
        }

        if let Some(constant) = obj.get("const") {
            return Ok(enum_node(vec![constant.clone()]));
        }

        match obj.get("type") {
            Some(Value::String(ty)) => self.typed_node(ty, obj, path),
            Some(Value::Array(types)) => {
                let mut nullable = false;
                let mut variants = Vec::new();
                for ty in types {
                    match ty.as_str() {
                        Some("null") => nullable = true,
                        Some(ty) => variants.push(self.typed_node(ty, obj, path)?),
                        None => {
                            return Err(SchemaError::Invalid {
                                path: display_path(path),
                                reason: format!("type entry {} is not a string", ty),
                            })
                        }
                    }
                }
                Ok(combine(variants, nullable))
            }
            Some(other) => Err(SchemaError::Invalid {
                path: display_path(path),
                reason: format!("'type' must be a string or array, found {}", other),
            }),
            None if obj.contains_key("properties") => self.typed_node("object", obj, path),
            None if obj.contains_key("items") || obj.contains_key("prefixItems") => {
                self.typed_node("array", obj, path)
            }
            None => Ok(SchemaNode::any()),
        }
    }

    fn typed_node(&mut self, ty: &str, obj: &'a Object, path: &str) -> Result<SchemaNode, SchemaError> {
        let node = match ty {
            "string" => {
                warn_ignored(obj, &["pattern"], path);
                with_length(SchemaNode::string(), obj, "minLength", "maxLength")
            }
            "integer" => {
                warn_ignored(obj, &["multipleOf"], path);
                with_numeric(SchemaNode::int(), obj)
            }
            "number" => {
                warn_ignored(obj, &["multipleOf"], path);
                with_numeric(SchemaNode::float(), obj)
            }
            "boolean" => SchemaNode::boolean(),
            "null" => SchemaNode::enumeration([Value::Null]),
            "array" => self.array_node(obj, path)?,
            "object" => {
                if is_model(obj) {
                    let model = self.fields_model(obj, title_of_object(obj), path)?;
                    SchemaNode::model(model)
                } else {
                    self.map_node(obj, path)?
                }
            }
            other => SchemaNode::unsupported(format!("unknown type '{}'", other)),
        };
        Ok(node)
    }

    fn array_node(&mut self, obj: &'a Object, path: &str) -> Result<SchemaNode, SchemaError> {
        let positional = match (obj.get("prefixItems"), obj.get("items")) {
            (Some(Value::Array(prefix)), _) => Some(prefix),
            (_, Some(Value::Array(items))) => Some(items),
            _ => None,
        };

        if let Some(elements) = positional {
            let mut nodes = Vec::with_capacity(elements.len());
            for (i, element) in elements.iter().enumerate() {
                nodes.push(self.node(element, &format!("{}[{}]", path, i))?);
            }
            return Ok(SchemaNode::tuple(nodes));
        }

        let items = match obj.get("items") {
            Some(items) => self.node(items, &format!("{}[]", path))?,
            None => SchemaNode::any(),
        };
        Ok(with_length(SchemaNode::list(items), obj, "minItems", "maxItems"))
    }

    fn map_node(&mut self, obj: &'a Object, path: &str) -> Result<SchemaNode, SchemaError> {
        let key = match obj.get("propertyNames") {
            Some(names) => {
                let mut key = self.node(names, &format!("{}{{key}}", path))?;
                // Object keys are always strings
                if matches!(key.shape, Shape::Any) {
                    key = SchemaNode::string();
                }
                key
            }
            None => SchemaNode::string(),
        };
        let value = match obj.get("additionalProperties") {
            Some(additional) => self.node(additional, &format!("{}{{}}", path))?,
            None => SchemaNode::any(),
        };
        Ok(with_length(
            SchemaNode::map(key, value),
            obj,
            "minProperties",
            "maxProperties",
        ))
    }

    fn alternatives_node(&mut self, variants: &'a [Value], path: &str) -> Result<SchemaNode, SchemaError> {
        let mut nullable = false;
        let mut nodes = Vec::new();
        for variant in variants {
            if is_null_schema(variant) {
                nullable = true;
            } else {
                nodes.push(self.node(variant, path)?);
            }
        }
        Ok(combine(nodes, nullable))
    }

    fn reference_node(&mut self, reference: &str, path: &str) -> Result<SchemaNode, SchemaError> {
        if self.active.iter().any(|r| r == reference) {
            return Err(SchemaError::RecursiveReference(reference.to_string()));
        }
        let target = self.resolve(reference)?;
        let name = reference.rsplit('/').next().map(str::to_string);

        self.active.push(reference.to_string());
        let model = self.model(target, name, path);
        self.active.pop();

        Ok(SchemaNode::model(model?))
    }

    fn resolve(&self, reference: &str) -> Result<&'a Value, SchemaError> {
        reference
            .strip_prefix('#')
            .and_then(|pointer| self.document.pointer(pointer))
            .ok_or_else(|| SchemaError::UnresolvedReference(reference.to_string()))
    }
}

/// An object schema describes a model when it declares properties (even none)
/// or forbids additional ones; otherwise it is a free-form mapping.
fn is_model(obj: &Object) -> bool {
    if obj.contains_key("properties") {
        return true;
    }
    let is_object = obj.get("type").and_then(Value::as_str) == Some("object");
    is_object && obj.get("additionalProperties") == Some(&Value::Bool(false))
}

fn is_null_schema(schema: &Value) -> bool {
    match schema {
        Value::Object(obj) => {
            obj.get("type").and_then(Value::as_str) == Some("null")
                || obj.get("const") == Some(&Value::Null)
                || obj.get("enum") == Some(&Value::Array(vec![Value::Null]))
        }
        _ => false,
    }
}

/// Collapse the non-null alternatives of a schema into one node.
fn combine(mut variants: Vec<SchemaNode>, nullable: bool) -> SchemaNode {
    let node = match variants.len() {
        0 => SchemaNode::enumeration([Value::Null]),
        1 => variants.remove(0),
        _ => SchemaNode::union(variants),
    };
    if nullable && !node_is_null_only(&node) {
        node.optional()
    } else {
        node
    }
}

fn node_is_null_only(node: &SchemaNode) -> bool {
    matches!(&node.shape, Shape::Enum { members } if members == &[Value::Null])
}

/// `null` inside an enum marks the node optional rather than being a member.
fn enum_node(members: Vec<Value>) -> SchemaNode {
    let nullable = members.iter().any(Value::is_null);
    if !nullable || members.iter().all(Value::is_null) {
        return SchemaNode::enumeration(members);
    }
    SchemaNode::enumeration(members.into_iter().filter(|m| !m.is_null())).optional()
}

fn with_length(mut node: SchemaNode, obj: &Object, min_key: &str, max_key: &str) -> SchemaNode {
    if let Some(min) = obj.get(min_key).and_then(Value::as_f64) {
        node = node.with(Constraint::new(ConstraintKind::MinLength, min));
    }
    if let Some(max) = obj.get(max_key).and_then(Value::as_f64) {
        node = node.with(Constraint::new(ConstraintKind::MaxLength, max));
    }
    node
}

/// Numeric bounds in both the draft-6+ form (numeric `exclusiveMinimum`)
/// and the draft-4 form (boolean flag next to `minimum`).
fn with_numeric(mut node: SchemaNode, obj: &Object) -> SchemaNode {
    let flag = |key: &str| obj.get(key).and_then(Value::as_bool).unwrap_or(false);
    let lower = |key: &str| obj.get(key).and_then(|v| bound_value(v, true));
    let upper = |key: &str| obj.get(key).and_then(|v| bound_value(v, false));

    if let Some(min) = lower("minimum") {
        node = node.with(if flag("exclusiveMinimum") {
            Constraint::gt(min)
        } else {
            Constraint::ge(min)
        });
    }
    if let Some(max) = upper("maximum") {
        node = node.with(if flag("exclusiveMaximum") {
            Constraint::lt(max)
        } else {
            Constraint::le(max)
        });
    }
    if let Some(min) = lower("exclusiveMinimum") {
        node = node.with(Constraint::gt(min));
    }
    if let Some(max) = upper("exclusiveMaximum") {
        node = node.with(Constraint::lt(max));
    }
    node
}

/// Numeric bound as f64. Integer literals beyond 2^53 that do not convert
/// exactly are moved one step inward, so the stored bound is never looser
/// than the declared one.
fn bound_value(value: &Value, lower: bool) -> Option<f64> {
    let exact = match (value.as_i64(), value.as_u64()) {
        (Some(i), _) => i128::from(i),
        (None, Some(u)) => i128::from(u),
        _ => return value.as_f64(),
    };
    let approx = exact as f64;
    let converted = approx as i128;
    Some(if lower && converted < exact {
        next_up(approx)
    } else if !lower && converted > exact {
        next_down(approx)
    } else {
        approx
    })
}

fn warn_ignored(obj: &Object, keywords: &[&str], path: &str) {
    for keyword in keywords {
        if obj.contains_key(*keyword) {
            tracing::warn!(
                "Ignoring unsupported '{}' at '{}'; generated values may not satisfy it",
                keyword,
                display_path(path)
            );
        }
    }
}

fn title_of(schema: &Value) -> Option<String> {
    schema.as_object().and_then(title_of_object)
}

fn title_of_object(obj: &Object) -> Option<String> {
    obj.get("title").and_then(Value::as_str).map(str::to_string)
}

fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}
