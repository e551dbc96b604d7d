pub mod generator;
pub mod json_schema;
pub mod output;
pub mod value_source;
