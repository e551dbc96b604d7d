use thiserror::Error;

use crate::config::{GeneratorSettings, Settings};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Inverted range {field}: min {min} is greater than max {max}")]
    InvertedRange { field: String, min: String, max: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_generator(&settings.generator) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_generator(generator: &GeneratorSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !(0.0..=1.0).contains(&generator.null_probability) {
            errors.push(ValidationError::InvalidValue {
                field: "generator.null_probability".to_string(),
                reason: format!("{} is outside [0, 1]", generator.null_probability),
            });
        }

        if generator.int_min > generator.int_max {
            errors.push(Self::inverted("generator.int", generator.int_min, generator.int_max));
        }

        if !generator.float_min.is_finite() || !generator.float_max.is_finite() {
            errors.push(ValidationError::InvalidValue {
                field: "generator.float_min/float_max".to_string(),
                reason: "Float range bounds must be finite".to_string(),
            });
        } else if generator.float_min > generator.float_max {
            errors.push(Self::inverted(
                "generator.float",
                generator.float_min,
                generator.float_max,
            ));
        }

        // f64 carries about 15 significant decimal digits
        if generator.float_decimals > 15 {
            errors.push(ValidationError::InvalidValue {
                field: "generator.float_decimals".to_string(),
                reason: "At most 15 decimal places are supported".to_string(),
            });
        }

        if generator.list_min_len > generator.list_max_len {
            errors.push(Self::inverted(
                "generator.list_len",
                generator.list_min_len,
                generator.list_max_len,
            ));
        }

        if generator.map_min_len > generator.map_max_len {
            errors.push(Self::inverted(
                "generator.map_len",
                generator.map_min_len,
                generator.map_max_len,
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn inverted(field: &str, min: impl ToString, max: impl ToString) -> ValidationError {
        ValidationError::InvertedRange {
            field: field.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(ConfigValidator::validate(&Settings::default()).is_ok());
    }

    #[test]
    fn test_probability_out_of_range() {
        let mut settings = Settings::default();
        settings.generator.null_probability = 1.5;

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("null_probability"));
    }

    #[test]
    fn test_collects_every_inverted_range() {
        let mut settings = Settings::default();
        settings.generator.int_min = 10;
        settings.generator.int_max = 1;
        settings.generator.list_min_len = 4;
        settings.generator.list_max_len = 2;
        settings.generator.map_min_len = 9;
        settings.generator.map_max_len = 0;

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::InvertedRange {
            field: "generator.int".to_string(),
            min: "10".to_string(),
            max: "1".to_string(),
        }));
    }

    #[test]
    fn test_non_finite_float_range() {
        let mut settings = Settings::default();
        settings.generator.float_max = f64::INFINITY;

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidValue { .. }));
    }
}
