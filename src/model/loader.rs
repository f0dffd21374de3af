//! Loading models from TOML.
//!
//! A model is one TOML file with a `[[types]]` array, or a directory of such
//! files. Directory entries are read in path order so the merged model does
//! not depend on filesystem iteration order.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use super::GraphModel;
use super::decl::TypeDecl;
use crate::core::ProvgenError;

/// On-disk shape of a model file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelFile {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

/// Parse the contents of one model file.
///
/// `file` is only used to label errors.
pub fn parse_model(content: &str, file: &str) -> Result<ModelFile, ProvgenError> {
    toml::from_str(content).map_err(|e| ProvgenError::ModelParseError {
        file: file.to_string(),
        reason: e.to_string(),
    })
}

/// Load a model from a file or a directory of `*.toml` files.
///
/// The returned model includes the builtin JDK types; user declarations with
/// the same name replace them. Declaring the same type twice across user
/// files is an error.
pub fn load_model(path: &Path) -> Result<GraphModel> {
    let files = model_files(path)?;
    let mut model = GraphModel::with_builtins();
    let mut declared_in: HashMap<String, PathBuf> = HashMap::new();

    for file in files {
        let content = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read model file: {}", file.display()))?;
        let parsed = parse_model(&content, &file.display().to_string())?;
        debug!("Loaded {} type(s) from {}", parsed.types.len(), file.display());

        for decl in parsed.types {
            if let Some(previous) = declared_in.get(&decl.name) {
                return Err(ProvgenError::ModelParseError {
                    file: file.display().to_string(),
                    reason: format!(
                        "type '{}' is already declared in {}",
                        decl.name,
                        previous.display()
                    ),
                }
                .into());
            }
            declared_in.insert(decl.name.clone(), file.clone());
            model.insert(decl);
        }
    }

    Ok(model)
}

fn model_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("model path does not exist: {}", path.display()),
        ))
        .with_context(|| format!("Failed to load model from {}", path.display()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to scan {}", path.display()))?;
        let is_toml = entry.path().extension().is_some_and(|ext| ext == "toml");
        if entry.file_type().is_file() && is_toml {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
