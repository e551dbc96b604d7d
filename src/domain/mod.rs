pub mod error;
pub mod schema;

pub use error::{ExemplarError, GenerateError, SchemaError};
pub use schema::{
    Constraint, ConstraintKind, Field, LengthBounds, ModelSchema, NumericBounds, SchemaNode, Shape,
};

/// Source of realistic text and random draws used by the generator.
///
/// The generator depends only on this narrow capability set, so any faker
/// backend (or a scripted source in tests) can stand behind it.
pub trait ValueSource {
    /// A single realistic word
    fn word(&mut self) -> String;
    /// A short realistic sentence
    fn sentence(&mut self) -> String;
    /// Uniform integer in `[low, high]`
    fn random_int(&mut self, low: i64, high: i64) -> i64;
    /// Uniform float in `[low, high]`
    fn random_float(&mut self, low: f64, high: f64) -> f64;
    /// Fair coin flip
    fn boolean(&mut self) -> bool;
}
