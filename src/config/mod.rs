//! Generator configuration.
//!
//! Configuration is optional. It is read from the first of:
//!
//! 1. the path given with `--config`;
//! 2. the path in the `PROVGEN_CONFIG` environment variable;
//! 3. `provgen.toml` in the working directory, if it exists.
//!
//! Without any of these the built-in defaults apply.
//!
//! ```toml
//! expand_names = true
//!
//! [system_properties]
//! "app.stage" = "prod"
//!
//! [[domains]]
//! name = "vault"
//! qualifier = "com.acme.VaultSecret"
//! prefix = "Vault"
//! ```
//!
//! Domains listed here replace built-in domains of the same name and are
//! added otherwise.

mod parser;

pub use parser::parse_config;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
use crate::core::ProvgenError;
use crate::domain::Domain;

fn default_expand_names() -> bool {
    true
}

/// Contents of `provgen.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Additional or overriding configuration domains
    #[serde(default)]
    pub domains: Vec<Domain>,

    /// Values behind `${sys.name}` in qualifier names
    #[serde(default)]
    pub system_properties: BTreeMap<String, String>,

    /// Whether qualifier names are expanded before grouping
    #[serde(default = "default_expand_names")]
    pub expand_names: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            system_properties: BTreeMap::new(),
            expand_names: true,
        }
    }
}

impl GeneratorConfig {
    /// Load the configuration, honouring an explicit path first.
    ///
    /// An explicit path (flag or environment variable) must exist; the
    /// working-directory file is only used when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = Self::explicit_path(explicit) {
            debug!("Loading configuration from {}", path.display());
            return Self::load_from(&path);
        }

        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            debug!("Loading configuration from {}", local.display());
            return Self::load_from(&local);
        }

        debug!("No configuration file, using defaults");
        Ok(Self::default())
    }

    fn explicit_path(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit.map(Path::to_path_buf).or_else(|| {
            std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()).map(PathBuf::from)
        })
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Self = parse_config(path)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ProvgenError> {
        for (i, domain) in self.domains.iter().enumerate() {
            if domain.name.is_empty() || domain.qualifier.is_empty() {
                return Err(ProvgenError::ConfigError {
                    message: format!("domain #{} needs a name and a qualifier", i + 1),
                });
            }
            if self.domains[..i].iter().any(|d| d.name == domain.name) {
                return Err(ProvgenError::ConfigError {
                    message: format!("domain '{}' is declared more than once", domain.name),
                });
            }
        }
        Ok(())
    }

    /// Built-in domains merged with the configured ones.
    pub fn domains(&self) -> Vec<Domain> {
        let mut domains = Domain::builtins();
        for configured in &self.domains {
            match domains.iter_mut().find(|d| d.name == configured.name) {
                Some(existing) => *existing = configured.clone(),
                None => domains.push(configured.clone()),
            }
        }
        domains
    }

    /// The domains named in `names`, or every domain when `names` is empty.
    pub fn select_domains(&self, names: &[String]) -> Result<Vec<Domain>> {
        let domains = self.domains();
        if names.is_empty() {
            return Ok(domains);
        }

        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            match domains.iter().find(|d| &d.name == name) {
                Some(domain) => selected.push(domain.clone()),
                None => {
                    let known: Vec<&str> = domains.iter().map(|d| d.name.as_str()).collect();
                    bail!("Unknown domain '{name}' (known domains: {})", known.join(", "));
                }
            }
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config: GeneratorConfig = toml::from_str("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert!(config.expand_names);
        let names: Vec<String> = config.domains().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["env", "sys", "ssm", "cli"]);
    }

    #[test]
    fn test_load_explicit() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "custom.toml",
            r#"
                expand_names = false

                [system_properties]
                "app.stage" = "prod"

                [[domains]]
                name = "env"
                qualifier = "com.acme.Env"
                prefix = "Environment"

                [[domains]]
                name = "vault"
                qualifier = "com.acme.VaultSecret"
                prefix = "Vault"
            "#,
        );

        let config = GeneratorConfig::load(Some(&path)).unwrap();
        assert!(!config.expand_names);
        assert_eq!(config.system_properties.get("app.stage").map(String::as_str), Some("prod"));

        let domains = config.domains();
        assert_eq!(domains.len(), 5);
        assert_eq!(domains[0].qualifier, "com.acme.Env");
        assert_eq!(domains[4].name, "vault");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.toml", "expand_name = true\n");
        let err = GeneratorConfig::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("expand_name"));
    }

    #[test]
    fn test_duplicate_domain_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "dup.toml",
            r#"
                [[domains]]
                name = "x"
                qualifier = "X"
                prefix = "X"

                [[domains]]
                name = "x"
                qualifier = "Y"
                prefix = "Y"
            "#,
        );
        let err = GeneratorConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    #[serial]
    fn test_env_var_path() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "from-env.toml", "[system_properties]\nregion = \"eu\"\n");

        // SAFETY: serialized with every other test touching the environment
        unsafe { std::env::set_var(CONFIG_ENV_VAR, &path) };
        let config = GeneratorConfig::load(None);
        unsafe { std::env::remove_var(CONFIG_ENV_VAR) };

        assert_eq!(config.unwrap().system_properties.get("region").map(String::as_str), Some("eu"));
    }

    #[test]
    fn test_select_domains() {
        let config = GeneratorConfig::default();
        let selected = config.select_domains(&["cli".to_string(), "env".to_string()]).unwrap();
        assert_eq!(selected.len(), 2);
        assert!(selected[0].multi_valued);

        let err = config.select_domains(&["nope".to_string()]).unwrap_err();
        assert!(err.to_string().contains("known domains: env, sys, ssm, cli"));
    }
}
