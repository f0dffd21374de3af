//! Helpers shared by the subcommands.

use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::model::{GraphModel, load_model};

/// Output format for commands with machine-readable output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, coloured text
    #[default]
    Text,
    /// A single JSON document on stdout
    Json,
}

/// Load the model file or directory named on the command line.
pub fn load_model_arg(path: &Path) -> Result<GraphModel> {
    if !path.exists() {
        bail!("Model path {} does not exist", path.display());
    }
    load_model(path)
}

/// Names of the components matching any of `patterns`, in name order.
///
/// No patterns selects every component. Patterns that match nothing are an
/// error so that typos do not silently produce empty output.
pub fn select_components(model: &GraphModel, patterns: &[String]) -> Result<Vec<String>> {
    let components: Vec<&str> = model.components().map(|c| c.name.as_str()).collect();
    if patterns.is_empty() {
        if components.is_empty() {
            bail!("The model declares no components");
        }
        return Ok(components.into_iter().map(str::to_string).collect());
    }

    let mut compiled = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        let glob = glob::Pattern::new(pattern)
            .with_context(|| format!("Invalid component pattern '{pattern}'"))?;
        compiled.push(glob);
    }

    let selected: Vec<String> = components
        .into_iter()
        .filter(|name| compiled.iter().any(|glob| glob.matches(name)))
        .map(str::to_string)
        .collect();
    if selected.is_empty() {
        bail!("No component matches {}", patterns.join(", "));
    }
    Ok(selected)
}
