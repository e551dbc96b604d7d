use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::io::Write;
use std::path::Path;

/// Render a value as JSON indented by four spaces.
pub fn to_pretty_json(value: &Value) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write rendered JSON to `path`, or to stdout when no path is given.
pub fn write_json(value: &Value, path: Option<&Path>) -> anyhow::Result<()> {
    let rendered = to_pretty_json(value)?;
    match path {
        Some(path) => {
            std::fs::write(path, format!("{}\n", rendered))?;
            tracing::info!("Wrote generated data to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", rendered)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_four_space_indent() {
        let rendered = to_pretty_json(&json!({ "a": [1, 2] })).unwrap();
        assert_eq!(rendered, "{\n    \"a\": [\n        1,\n        2\n    ]\n}");
    }

    #[test]
    fn test_preserves_key_order() {
        let rendered = to_pretty_json(&json!({ "zeta": 1, "alpha": 2 })).unwrap();
        assert!(rendered.find("zeta").unwrap() < rendered.find("alpha").unwrap());
    }

    #[test]
    fn test_write_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dummy_data.json");

        write_json(&json!(["x"]), Some(&path)).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, json!(["x"]));
    }
}
