//! TOML file parsing shared by the configuration and model loaders.

use anyhow::{Context, Result};
use std::path::Path;

/// Read and deserialize a TOML file.
///
/// Both the read and the parse failure name the file in their context.
///
/// ```rust,no_run
/// use provgen::config::{GeneratorConfig, parse_config};
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let config: GeneratorConfig = parse_config(Path::new("provgen.toml"))?;
/// println!("{} system properties", config.system_properties.len());
/// # Ok(())
/// # }
/// ```
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Debug, serde::Deserialize)]
    struct Properties {
        properties: BTreeMap<String, String>,
    }

    #[test]
    fn test_parse_config() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("props.toml");
        std::fs::write(&path, "[properties]\n\"app.stage\" = \"prod\"\n").unwrap();

        let parsed: Properties = parse_config(&path).unwrap();
        assert_eq!(parsed.properties.get("app.stage").map(String::as_str), Some("prod"));
    }

    #[test]
    fn test_parse_error_names_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("broken.toml");
        std::fs::write(&path, "properties = {").unwrap();

        let err = parse_config::<Properties>(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_config::<Properties>(Path::new("/nonexistent/provgen.toml")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read config file"));
    }
}
