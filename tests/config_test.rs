use exemplar::cli::Cli;
use exemplar::config::{GeneratorSettings, Settings};
use clap::Parser;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_generator_settings() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("exemplar.toml");

    let exemplar_toml = r#"
[generator]
null_probability = 0.1
int_min = -50
int_max = 50
list_min_len = 0
list_max_len = 2
round_floats = false
"#;
    fs::write(&path, exemplar_toml)?;

    let settings = Settings::from_path(&path)?;

    assert_eq!(settings.generator.null_probability, 0.1);
    assert_eq!(settings.generator.int_min, -50);
    assert_eq!(settings.generator.int_max, 50);
    assert_eq!(settings.generator.list_min_len, 0);
    assert_eq!(settings.generator.list_max_len, 2);
    assert!(!settings.generator.round_floats);
    // Untouched keys keep their defaults
    assert_eq!(settings.generator.map_max_len, GeneratorSettings::default().map_max_len);
    assert_eq!(settings.generator.float_decimals, 2);

    Ok(())
}

#[test]
fn test_missing_file_uses_defaults() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let settings = Settings::from_path(&temp_dir.path().join("absent.toml"))?;

    assert_eq!(settings, Settings::default());
    Ok(())
}

#[test]
fn test_invalid_settings_are_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("exemplar.toml");
    fs::write(
        &path,
        r#"
[generator]
null_probability = 1.5
int_min = 10
int_max = 0
"#,
    )?;

    let err = Settings::from_path(&path).unwrap_err().to_string();
    assert!(err.contains("Configuration validation failed"));
    assert!(err.contains("generator.null_probability"));
    assert!(err.contains("generator.int"));

    Ok(())
}

#[test]
fn test_cli_overrides_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("custom.toml");
    fs::write(&path, "[generator]\nnull_probability = 0.9\n")?;

    let cli = Cli::parse_from([
        "exemplar",
        "schema.json",
        "--config",
        path.to_str().unwrap(),
        "--null-probability",
        "0.0",
    ]);
    let settings = Settings::new_with_cli(&cli)?;

    assert_eq!(settings.generator.null_probability, 0.0);
    Ok(())
}
