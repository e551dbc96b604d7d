//! # Exemplar - example data from data-model schemas
//!
//! Exemplar turns a data-model schema into a plausible example JSON value that
//! respects the declared constraints. It is meant for fixtures, documentation
//! samples and smoke tests against APIs.
//!
//! ## Features
//!
//! - **Nested models**: optional fields, enums, unions and root-wrapped models
//! - **Collections**: lists, maps and fixed-arity tuples with item count bounds
//! - **Constraints**: `min_length`/`max_length`, `ge`/`gt`/`le`/`lt`, with
//!   contradictions reported instead of silently clamped
//! - **Schema sources**: Rust types deriving `JsonSchema`, or JSON/YAML schema files
//! - **Reproducible**: inject a seeded [`FakeSource`] for deterministic output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use exemplar::adapters::value_source::FakeSource;
//! use schemars::JsonSchema;
//!
//! #[derive(JsonSchema)]
//! struct Address {
//!     city: String,
//!     #[schemars(range(min = 1001, max = 9998))]
//!     zip_code: u32,
//! }
//!
//! fn main() -> Result<(), exemplar::domain::ExemplarError> {
//!     let example = exemplar::generate_with::<Address>(
//!         &Default::default(),
//!         &mut FakeSource::seeded(7),
//!     )?;
//!     println!("{}", example);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Exemplar follows Hexagonal Architecture:
//! - **Domain**: Schema model, errors and the `ValueSource` port
//! - **Adapters**: Generator, JSON Schema extraction, faker-backed source, output
//! - **Config**: Generator settings and validation

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;

use crate::adapters::generator::ValueGenerator;
use crate::adapters::json_schema::model_schema_for;
use crate::adapters::value_source::FakeSource;
use crate::config::GeneratorSettings;
use crate::domain::{ExemplarError, GenerateError, ModelSchema, ValueSource};
use schemars::JsonSchema;
use serde_json::Value;

/// Generate one example for `T` with default settings and an entropy-seeded source.
pub fn generate<T: JsonSchema>() -> Result<Value, ExemplarError> {
    generate_with::<T>(&GeneratorSettings::default(), &mut FakeSource::from_entropy())
}

/// Generate one example for `T` with explicit settings and randomness.
pub fn generate_with<T: JsonSchema>(
    settings: &GeneratorSettings,
    source: &mut dyn ValueSource,
) -> Result<Value, ExemplarError> {
    let model = model_schema_for::<T>()?;
    let generator = ValueGenerator::new(settings.clone());
    Ok(generator.generate(&model, source)?)
}

/// Generate `count` examples of `model`.
///
/// A count of one yields the bare value; any other count yields a JSON array.
pub fn generate_many(
    generator: &ValueGenerator,
    model: &ModelSchema,
    count: usize,
    source: &mut dyn ValueSource,
) -> Result<Value, GenerateError> {
    if count == 1 {
        return generator.generate(model, source);
    }
    let values = (0..count)
        .map(|_| generator.generate(model, source))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(values))
}
