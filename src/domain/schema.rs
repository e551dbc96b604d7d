//! Explicit schema description consumed by the generator.
//!
//! A [`ModelSchema`] is built once, either by hand or by the JSON Schema
//! extractor in [`crate::adapters::json_schema`], and then treated as
//! read-only input. Nothing in here performs reflection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of validation bound attached to a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Minimum number of characters (strings) or elements (collections)
    MinLength,
    /// Maximum number of characters (strings) or elements (collections)
    MaxLength,
    /// Greater than or equal
    Ge,
    /// Strictly greater than
    Gt,
    /// Less than or equal
    Le,
    /// Strictly less than
    Lt,
}

/// A single validation bound.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub bound: f64,
}

impl Constraint {
    pub fn new(kind: ConstraintKind, bound: f64) -> Self {
        Self { kind, bound }
    }

    pub fn min_length(bound: usize) -> Self {
        Self::new(ConstraintKind::MinLength, bound as f64)
    }

    pub fn max_length(bound: usize) -> Self {
        Self::new(ConstraintKind::MaxLength, bound as f64)
    }

    pub fn ge(bound: f64) -> Self {
        Self::new(ConstraintKind::Ge, bound)
    }

    pub fn gt(bound: f64) -> Self {
        Self::new(ConstraintKind::Gt, bound)
    }

    pub fn le(bound: f64) -> Self {
        Self::new(ConstraintKind::Le, bound)
    }

    pub fn lt(bound: f64) -> Self {
        Self::new(ConstraintKind::Lt, bound)
    }
}

/// Length constraints folded to their tightest form.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LengthBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl LengthBounds {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Numeric constraints folded to their tightest form per operator.
///
/// `ge` and `gt` are both kept: which one wins depends on whether the value
/// is integral, so the generator resolves them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericBounds {
    pub ge: Option<f64>,
    pub gt: Option<f64>,
    pub le: Option<f64>,
    pub lt: Option<f64>,
}

impl NumericBounds {
    pub fn is_empty(&self) -> bool {
        self.ge.is_none() && self.gt.is_none() && self.le.is_none() && self.lt.is_none()
    }
}

fn tighter(current: Option<f64>, candidate: f64, pick: fn(f64, f64) -> f64) -> Option<f64> {
    Some(current.map_or(candidate, |c| pick(c, candidate)))
}

/// Structural category of a schema node.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Str,
    Int,
    Float,
    Bool,
    /// Any JSON value
    Any,
    /// Serialized member values of an enumeration
    Enum { members: Vec<Value> },
    List { items: Box<SchemaNode> },
    Map {
        key: Box<SchemaNode>,
        value: Box<SchemaNode>,
    },
    Tuple { elements: Vec<SchemaNode> },
    /// A nested model, either field based or root-wrapped
    Model { model: Box<ModelSchema> },
    /// Exactly one of several alternatives
    Union { variants: Vec<SchemaNode> },
    /// Something the extractor could not map to a known shape
    Unsupported { reason: String },
}

impl Shape {
    /// Short human readable name used in logs and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Shape::Str => "str",
            Shape::Int => "int",
            Shape::Float => "float",
            Shape::Bool => "bool",
            Shape::Any => "any",
            Shape::Enum { .. } => "enum",
            Shape::List { .. } => "list",
            Shape::Map { .. } => "map",
            Shape::Tuple { .. } => "tuple",
            Shape::Model { .. } => "model",
            Shape::Union { .. } => "union",
            Shape::Unsupported { .. } => "unsupported",
        }
    }
}

/// One field's declared type plus its metadata.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SchemaNode {
    pub shape: Shape,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl SchemaNode {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            constraints: Vec::new(),
            optional: false,
            default: None,
        }
    }

    pub fn string() -> Self {
        Self::new(Shape::Str)
    }

    pub fn int() -> Self {
        Self::new(Shape::Int)
    }

    pub fn float() -> Self {
        Self::new(Shape::Float)
    }

    pub fn boolean() -> Self {
        Self::new(Shape::Bool)
    }

    pub fn any() -> Self {
        Self::new(Shape::Any)
    }

    pub fn enumeration<I, V>(members: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(Shape::Enum {
            members: members.into_iter().map(Into::into).collect(),
        })
    }

    pub fn list(items: SchemaNode) -> Self {
        Self::new(Shape::List {
            items: Box::new(items),
        })
    }

    pub fn map(key: SchemaNode, value: SchemaNode) -> Self {
        Self::new(Shape::Map {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    pub fn tuple(elements: Vec<SchemaNode>) -> Self {
        Self::new(Shape::Tuple { elements })
    }

    pub fn model(model: ModelSchema) -> Self {
        Self::new(Shape::Model {
            model: Box::new(model),
        })
    }

    pub fn union(variants: Vec<SchemaNode>) -> Self {
        Self::new(Shape::Union { variants })
    }

    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::new(Shape::Unsupported {
            reason: reason.into(),
        })
    }

    /// Attach a constraint.
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Mark the node as accepting an explicit absence (`null`).
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Fold `min_length`/`max_length` constraints, keeping the tighter bound.
    pub fn length_bounds(&self) -> LengthBounds {
        self.constraints
            .iter()
            .fold(LengthBounds::default(), |mut acc, c| {
                match c.kind {
                    ConstraintKind::MinLength => acc.min = tighter(acc.min, c.bound, f64::max),
                    ConstraintKind::MaxLength => acc.max = tighter(acc.max, c.bound, f64::min),
                    _ => {}
                }
                acc
            })
    }

    /// Fold numeric constraints, keeping the tighter bound per operator.
    pub fn numeric_bounds(&self) -> NumericBounds {
        self.constraints
            .iter()
            .fold(NumericBounds::default(), |mut acc, c| {
                match c.kind {
                    ConstraintKind::Ge => acc.ge = tighter(acc.ge, c.bound, f64::max),
                    ConstraintKind::Gt => acc.gt = tighter(acc.gt, c.bound, f64::max),
                    ConstraintKind::Le => acc.le = tighter(acc.le, c.bound, f64::min),
                    ConstraintKind::Lt => acc.lt = tighter(acc.lt, c.bound, f64::min),
                    _ => {}
                }
                acc
            })
    }
}

/// A named field of a model, in declaration order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Field {
    pub name: String,
    pub node: SchemaNode,
}

impl Field {
    pub fn new(name: impl Into<String>, node: SchemaNode) -> Self {
        Self {
            name: name.into(),
            node,
        }
    }
}

/// A model definition: either a mapping of named fields, or a root-wrapped
/// model whose whole serialized form is a single inner value.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSchema {
    Fields {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        fields: Vec<Field>,
    },
    Root {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        root: Box<SchemaNode>,
    },
}

impl ModelSchema {
    pub fn fields(name: impl Into<String>, fields: Vec<Field>) -> Self {
        ModelSchema::Fields {
            name: Some(name.into()),
            fields,
        }
    }

    pub fn root(name: impl Into<String>, root: SchemaNode) -> Self {
        ModelSchema::Root {
            name: Some(name.into()),
            root: Box::new(root),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ModelSchema::Fields { name, .. } | ModelSchema::Root { name, .. } => name.as_deref(),
        }
    }
}
