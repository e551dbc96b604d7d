use clap::Parser;
use std::path::PathBuf;

/// Exemplar - generate example JSON data from a schema
#[derive(Parser, Debug, Clone)]
#[command(name = "exemplar", version, about, long_about = None)]
pub struct Cli {
    /// JSON Schema document (.json, .yaml or .yml)
    pub schema: PathBuf,

    /// Path to the configuration file
    #[arg(short, long, env = "EXEMPLAR_CONFIG", default_value = "exemplar.toml")]
    pub config: PathBuf,

    /// Number of examples to generate; more than one emits a JSON array
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,

    /// Seed for reproducible output
    #[arg(long, env = "EXEMPLAR_SEED")]
    pub seed: Option<u64>,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Generate for a named entry of `$defs`/`definitions` instead of the document root
    #[arg(short, long)]
    pub model: Option<String>,

    /// Probability that an optional field is emitted as null
    #[arg(long, env = "EXEMPLAR_NULL_PROBABILITY")]
    pub null_probability: Option<f64>,

    /// Print the extracted model schema instead of generating data
    #[arg(long)]
    pub print_schema: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["exemplar", "user.schema.json"]);
        assert_eq!(cli.schema, PathBuf::from("user.schema.json"));
        assert_eq!(cli.config, PathBuf::from("exemplar.toml"));
        assert_eq!(cli.count, 1);
        assert!(cli.seed.is_none());
        assert!(cli.output.is_none());
        assert!(cli.model.is_none());
        assert!(cli.null_probability.is_none());
        assert!(!cli.print_schema);
    }

    #[test]
    fn test_cli_with_args() {
        let cli = Cli::parse_from([
            "exemplar",
            "schema.yaml",
            "--config",
            "custom.toml",
            "--count",
            "3",
            "--seed",
            "42",
            "--output",
            "dummy_data.json",
            "--model",
            "Address",
            "--null-probability",
            "0.25",
            "--print-schema",
        ]);
        assert_eq!(cli.schema, PathBuf::from("schema.yaml"));
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.count, 3);
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.output, Some(PathBuf::from("dummy_data.json")));
        assert_eq!(cli.model, Some("Address".to_string()));
        assert_eq!(cli.null_probability, Some(0.25));
        assert!(cli.print_schema);
    }

    #[test]
    fn test_cli_requires_schema() {
        assert!(Cli::try_parse_from(["exemplar"]).is_err());
    }
}
