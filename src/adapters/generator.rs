use crate::config::GeneratorSettings;
use crate::domain::{
    GenerateError, LengthBounds, ModelSchema, NumericBounds, SchemaNode, Shape, ValueSource,
};
use serde_json::{json, Map, Value};

type GenResult = Result<Value, GenerateError>;

/// Appended when realistic text is shorter than a `min_length` bound and the
/// source hands back an empty word.
const FILLER_WORD: &str = "lorem";

/// Redraw budget per requested map entry before giving up on distinct keys.
const KEY_ATTEMPTS_PER_ENTRY: usize = 10;

/// Upper bound on up-front list allocation; longer lists grow as they fill.
const PREALLOCATE_LIMIT: usize = 64;

/// Produces example values from schema nodes.
///
/// The generator holds no state besides its settings; every call borrows a
/// [`ValueSource`] for the duration of that call only. Recursion depth follows
/// the schema nesting depth.
#[derive(Debug, Clone, Default)]
pub struct ValueGenerator {
    settings: GeneratorSettings,
}

impl ValueGenerator {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generate one example for a whole model.
    ///
    /// Field based models become an ordered JSON object; root-wrapped models
    /// return their inner value without an enclosing object.
    pub fn generate(&self, model: &ModelSchema, source: &mut dyn ValueSource) -> GenResult {
        tracing::debug!(
            "Generating example for model {}",
            model.name().unwrap_or("<anonymous>")
        );
        self.generate_model(model, "", source)
    }

    /// Generate one example for a single schema node.
    pub fn generate_node(&self, node: &SchemaNode, source: &mut dyn ValueSource) -> GenResult {
        self.generate_value(node, "", source)
    }

    fn generate_model(&self, model: &ModelSchema, path: &str, source: &mut dyn ValueSource) -> GenResult {
        match model {
            ModelSchema::Root { root, .. } => self.generate_value(root, path, source),
            ModelSchema::Fields { fields, .. } => {
                let mut result = Map::new();
                for field in fields {
                    let field_path = child_path(path, &field.name);
                    let value = self.generate_value(&field.node, &field_path, source)?;
                    result.insert(field.name.clone(), value);
                }
                Ok(Value::Object(result))
            }
        }
    }

    fn generate_value(&self, node: &SchemaNode, path: &str, source: &mut dyn ValueSource) -> GenResult {
        tracing::trace!(path, shape = node.shape.label(), optional = node.optional, "dispatch");

        if node.optional && self.emit_null(source) {
            return Ok(Value::Null);
        }

        match &node.shape {
            Shape::Model { model } => self.generate_model(model, path, source),
            Shape::Enum { members } => {
                if members.is_empty() {
                    return Err(GenerateError::unsupported(
                        display_path(path),
                        "enum declares no members",
                    ));
                }
                Ok(members[pick_index(source, members.len())].clone())
            }
            Shape::Union { variants } => {
                if variants.is_empty() {
                    return Err(GenerateError::unsupported(
                        display_path(path),
                        "union declares no variants",
                    ));
                }
                let variant = &variants[pick_index(source, variants.len())];
                self.generate_value(variant, path, source)
            }
            Shape::List { items } => self.generate_list(node, items, path, source),
            Shape::Map { key, value } => self.generate_map(node, key, value, path, source),
            Shape::Tuple { elements } => {
                let mut values = Vec::with_capacity(elements.len());
                for (i, element) in elements.iter().enumerate() {
                    values.push(self.generate_value(element, &format!("{}[{}]", path, i), source)?);
                }
                Ok(Value::Array(values))
            }
            Shape::Int => self.generate_int(node, path, source),
            Shape::Float => self.generate_float(node, path, source),
            Shape::Str => self.generate_string(node, path, source),
            Shape::Bool => Ok(json!(source.boolean())),
            Shape::Any => self.generate_any(source),
            Shape::Unsupported { reason } => {
                Err(GenerateError::unsupported(display_path(path), reason.clone()))
            }
        }
    }

    fn emit_null(&self, source: &mut dyn ValueSource) -> bool {
        let p = self.settings.null_probability;
        if p <= 0.0 {
            false
        } else if p >= 1.0 {
            true
        } else {
            source.random_float(0.0, 1.0) < p
        }
    }

    fn generate_list(
        &self,
        node: &SchemaNode,
        items: &SchemaNode,
        path: &str,
        source: &mut dyn ValueSource,
    ) -> GenResult {
        let (min, max) = self.collection_len(
            node,
            self.settings.list_min_len,
            self.settings.list_max_len,
            path,
        )?;
        let count = draw_len(source, min, max);
        let item_path = format!("{}[]", path);

        let mut values = Vec::with_capacity(count.min(PREALLOCATE_LIMIT));
        for _ in 0..count {
            values.push(self.generate_value(items, &item_path, source)?);
        }
        Ok(Value::Array(values))
    }

    fn generate_map(
        &self,
        node: &SchemaNode,
        key: &SchemaNode,
        value: &SchemaNode,
        path: &str,
        source: &mut dyn ValueSource,
    ) -> GenResult {
        let (min, max) = self.collection_len(
            node,
            self.settings.map_min_len,
            self.settings.map_max_len,
            path,
        )?;
        let count = draw_len(source, min, max);
        let key_path = format!("{}{{key}}", path);
        let value_path = format!("{}{{}}", path);

        let mut result = Map::new();
        let mut attempts = count.saturating_mul(KEY_ATTEMPTS_PER_ENTRY);
        while result.len() < count && attempts > 0 {
            attempts -= 1;
            let k = self.generate_key(key, &key_path, source)?;
            if result.contains_key(&k) {
                continue;
            }
            let v = self.generate_value(value, &value_path, source)?;
            result.insert(k, v);
        }

        if result.len() < min {
            return Err(GenerateError::contradictory(
                display_path(path),
                format!(
                    "key shape yields only {} distinct keys, at least {} required",
                    result.len(),
                    min
                ),
            ));
        }
        if result.len() < count {
            tracing::warn!(
                "Map at '{}' produced {} of {} requested entries",
                display_path(path),
                result.len(),
                count
            );
        }
        Ok(Value::Object(result))
    }

    /// JSON object keys are strings; plain string keys use a single word.
    fn generate_key(
        &self,
        key: &SchemaNode,
        path: &str,
        source: &mut dyn ValueSource,
    ) -> Result<String, GenerateError> {
        if key.shape == Shape::Str && key.constraints.is_empty() && !key.optional {
            return Ok(source.word());
        }
        Ok(match self.generate_value(key, path, source)? {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    /// Resolve the element count range of a sequence or mapping.
    fn collection_len(
        &self,
        node: &SchemaNode,
        default_min: usize,
        default_max: usize,
        path: &str,
    ) -> Result<(usize, usize), GenerateError> {
        let (min, max) = resolve_length_bounds(node.length_bounds(), path)?;
        Ok(match (min, max) {
            (None, None) => (default_min, default_max),
            (Some(min), None) => (min, default_max.max(min)),
            (None, Some(max)) => (default_min.min(max), max),
            (Some(min), Some(max)) => (min, max),
        })
    }

    fn generate_int(&self, node: &SchemaNode, path: &str, source: &mut dyn ValueSource) -> GenResult {
        let (lower, upper) = resolve_numeric_bounds(node.numeric_bounds(), path)?;

        // Whole-number arithmetic in i128 stays exact beyond 2^53
        let lower = lower.map(|b| match b {
            Bound::Inclusive(v) => v.ceil() as i128,
            Bound::Exclusive(v) => (v.floor() as i128).saturating_add(1),
        });
        let upper = upper.map(|b| match b {
            Bound::Inclusive(v) => v.floor() as i128,
            Bound::Exclusive(v) => (v.ceil() as i128).saturating_sub(1),
        });
        if lower.is_some_and(|l| l > i128::from(i64::MAX))
            || upper.is_some_and(|u| u < i128::from(i64::MIN))
        {
            return Err(GenerateError::contradictory(
                display_path(path),
                "bounds lie outside the 64-bit integer range",
            ));
        }
        let lower = lower.map(clamp_i64);
        let upper = upper.map(clamp_i64);

        let span = self.settings.int_max.saturating_sub(self.settings.int_min);
        let (low, high) = match (lower, upper) {
            (None, None) => (self.settings.int_min, self.settings.int_max),
            (Some(l), None) => (l, l.saturating_add(span)),
            (None, Some(u)) => (u.saturating_sub(span), u),
            (Some(l), Some(u)) => {
                if l > u {
                    return Err(GenerateError::contradictory(
                        display_path(path),
                        format!("no integer lies between the bounds ({} > {})", l, u),
                    ));
                }
                (l, u)
            }
        };

        if low == high {
            return Ok(json!(low));
        }
        Ok(json!(source.random_int(low, high)))
    }

    fn generate_float(&self, node: &SchemaNode, path: &str, source: &mut dyn ValueSource) -> GenResult {
        let (lower, upper) = resolve_numeric_bounds(node.numeric_bounds(), path)?;

        let lower = lower.map(|b| match b {
            Bound::Inclusive(v) => v,
            Bound::Exclusive(v) => next_up(v),
        });
        let upper = upper.map(|b| match b {
            Bound::Inclusive(v) => v,
            Bound::Exclusive(v) => next_down(v),
        });

        let span = self.settings.float_max - self.settings.float_min;
        let (low, high) = match (lower, upper) {
            (None, None) => (self.settings.float_min, self.settings.float_max),
            (Some(l), None) => (l, (l + span).min(f64::MAX)),
            (None, Some(u)) => ((u - span).max(f64::MIN), u),
            (Some(l), Some(u)) => {
                if l > u {
                    return Err(GenerateError::contradictory(
                        display_path(path),
                        format!("lower bound {} exceeds upper bound {}", l, u),
                    ));
                }
                (l, u)
            }
        };
        if !low.is_finite() || !high.is_finite() {
            return Err(GenerateError::contradictory(
                display_path(path),
                "no finite value satisfies the bounds",
            ));
        }

        if low == high {
            return Ok(json!(low));
        }
        let drawn = source.random_float(low, high);
        Ok(json!(self.round_within(drawn, low, high)))
    }

    /// Round to the configured precision unless that would leave `[low, high]`.
    fn round_within(&self, value: f64, low: f64, high: f64) -> f64 {
        if !self.settings.round_floats {
            return value;
        }
        let factor = 10f64.powi(self.settings.float_decimals as i32);
        let rounded = (value * factor).round() / factor;
        if rounded.is_finite() && rounded >= low && rounded <= high {
            rounded
        } else {
            tracing::trace!(value, low, high, "rounded float falls outside bounds, keeping raw draw");
            value
        }
    }

    fn generate_string(&self, node: &SchemaNode, path: &str, source: &mut dyn ValueSource) -> GenResult {
        let bounds = node.length_bounds();
        if bounds.is_empty() {
            return Ok(json!(source.sentence()));
        }

        let (min, max) = resolve_length_bounds(bounds, path)?;
        let min = min.unwrap_or(0);
        let max = max.unwrap_or(usize::MAX);

        let text = source.sentence();
        Ok(json!(fit_text(text, min, max, source)))
    }

    fn generate_any(&self, source: &mut dyn ValueSource) -> GenResult {
        Ok(match source.random_int(0, 3) {
            0 => json!(source.word()),
            1 => json!(source.random_int(self.settings.int_min, self.settings.int_max)),
            2 => {
                let (low, high) = (self.settings.float_min, self.settings.float_max);
                let drawn = source.random_float(low, high);
                json!(self.round_within(drawn, low, high))
            }
            _ => json!(source.sentence()),
        })
    }
}

/// Pad `text` with realistic words up to `min` characters, then truncate to
/// at most `max` characters.
fn fit_text(mut text: String, min: usize, max: usize, source: &mut dyn ValueSource) -> String {
    let mut len = text.chars().count();
    while len < min {
        let word = source.word();
        let word = if word.is_empty() { FILLER_WORD.to_string() } else { word };
        if len > 0 {
            text.push(' ');
            len += 1;
        }
        len += word.chars().count();
        text.push_str(&word);
    }
    if len > max {
        text = text.chars().take(max).collect();
    }
    text
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Bound {
    Inclusive(f64),
    Exclusive(f64),
}

impl Bound {
    fn value(self) -> f64 {
        match self {
            Bound::Inclusive(v) | Bound::Exclusive(v) => v,
        }
    }
}

/// Pick the tighter of an inclusive and an exclusive bound on the same side.
/// `prefer_greater` selects the lower-bound semantics.
fn tighter_bound(inclusive: Option<f64>, exclusive: Option<f64>, prefer_greater: bool) -> Option<Bound> {
    match (inclusive, exclusive) {
        (None, None) => None,
        (Some(i), None) => Some(Bound::Inclusive(i)),
        (None, Some(e)) => Some(Bound::Exclusive(e)),
        (Some(i), Some(e)) => {
            let exclusive_wins = if prefer_greater { e >= i } else { e <= i };
            Some(if exclusive_wins {
                Bound::Exclusive(e)
            } else {
                Bound::Inclusive(i)
            })
        }
    }
}

/// Combine `ge`/`gt` and `le`/`lt` into one bound per side, rejecting NaN and
/// infinite bounds no finite value can meet. Infinite bounds that every
/// finite value meets are dropped.
fn resolve_numeric_bounds(
    bounds: NumericBounds,
    path: &str,
) -> Result<(Option<Bound>, Option<Bound>), GenerateError> {
    let all = [bounds.ge, bounds.gt, bounds.le, bounds.lt];
    if all.iter().flatten().any(|b| b.is_nan()) {
        return Err(GenerateError::contradictory(display_path(path), "bound is not a number"));
    }

    let lower = tighter_bound(bounds.ge, bounds.gt, true);
    let upper = tighter_bound(bounds.le, bounds.lt, false);

    let lower = match lower {
        Some(b) if b.value() == f64::INFINITY => {
            return Err(GenerateError::contradictory(
                display_path(path),
                "lower bound is +infinity",
            ))
        }
        Some(b) if b.value() == f64::NEG_INFINITY => None,
        other => other,
    };
    let upper = match upper {
        Some(b) if b.value() == f64::NEG_INFINITY => {
            return Err(GenerateError::contradictory(
                display_path(path),
                "upper bound is -infinity",
            ))
        }
        Some(b) if b.value() == f64::INFINITY => None,
        other => other,
    };

    Ok((lower, upper))
}

/// Convert folded length bounds to character/element counts.
fn resolve_length_bounds(
    bounds: LengthBounds,
    path: &str,
) -> Result<(Option<usize>, Option<usize>), GenerateError> {
    if [bounds.min, bounds.max].iter().flatten().any(|b| b.is_nan()) {
        return Err(GenerateError::contradictory(display_path(path), "length bound is not a number"));
    }

    let min = bounds.min.map(|m| m.max(0.0).ceil() as usize);
    let max = match bounds.max {
        Some(m) if m < 0.0 => {
            return Err(GenerateError::contradictory(
                display_path(path),
                format!("max_length {} is negative", m),
            ))
        }
        Some(m) => Some(m.floor() as usize),
        None => None,
    };

    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(GenerateError::contradictory(
                display_path(path),
                format!("min_length {} is greater than max_length {}", min, max),
            ));
        }
    }
    Ok((min, max))
}

fn clamp_i64(v: i128) -> i64 {
    v.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

fn draw_len(source: &mut dyn ValueSource, min: usize, max: usize) -> usize {
    if min >= max {
        return min;
    }
    let high = i64::try_from(max).unwrap_or(i64::MAX);
    let low = i64::try_from(min).unwrap_or(high);
    source.random_int(low, high).clamp(low, high) as usize
}

fn pick_index(source: &mut dyn ValueSource, len: usize) -> usize {
    let last = i64::try_from(len - 1).unwrap_or(i64::MAX);
    source.random_int(0, last).clamp(0, last) as usize
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

/// Smallest f64 greater than `v`.
pub(crate) fn next_up(v: f64) -> f64 {
    if v.is_nan() || v == f64::INFINITY {
        return v;
    }
    if v == 0.0 {
        return f64::from_bits(1);
    }
    let bits = v.to_bits();
    if v > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Largest f64 smaller than `v`.
pub(crate) fn next_down(v: f64) -> f64 {
    -next_up(-v)
}
