//! `provgen generate`: provider specifications for every component and domain.
//!
//! ```bash
//! provgen generate model/ --component 'com.acme.*' --domain env --format json
//! ```

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::common::{OutputFormat, load_model_arg, select_components};
use crate::config::GeneratorConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Diagnostics, Severity};
use crate::generator::{CollectingSink, Generator, PassSummary, ProviderSpec};

#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Model file or directory of model files
    model: PathBuf,

    /// Component glob pattern; repeatable, defaults to every component
    #[arg(long = "component", value_name = "GLOB")]
    components: Vec<String>,

    /// Domain name; repeatable, defaults to every domain
    #[arg(long = "domain", value_name = "NAME")]
    domains: Vec<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Result of one component/domain pass.
#[derive(Debug, Serialize)]
struct PassReport {
    component: String,
    domain: String,
    summary: PassSummary,
    providers: Vec<ProviderSpec>,
}

#[derive(Debug, Serialize)]
struct GenerateReport {
    passes: Vec<PassReport>,
    diagnostics: Vec<Diagnostic>,
}

impl GenerateCommand {
    pub fn execute(self, config: &GeneratorConfig) -> Result<()> {
        let model = load_model_arg(&self.model)?;
        let components = select_components(&model, &self.components)?;
        let domains = config.select_domains(&self.domains)?;
        let generator = Generator::from_config(&model, config);

        let mut diagnostics = Diagnostics::new();
        let mut passes = Vec::new();

        for component in &components {
            // Structural errors end this root only.
            let sites = match generator.collect_sites(component) {
                Ok(sites) => sites,
                Err(e) => {
                    diagnostics.error(&e.to_string(), Some(component));
                    continue;
                }
            };

            for domain in &domains {
                let mut sink = CollectingSink::default();
                match generator.generate(&sites, domain, &mut sink, &mut diagnostics) {
                    Ok(summary) => passes.push(PassReport {
                        component: component.clone(),
                        domain: domain.name.clone(),
                        summary,
                        providers: sink.into_specs(),
                    }),
                    Err(e) => diagnostics.error(&e.to_string(), Some(component)),
                }
            }
        }

        let errors = diagnostics.count(Severity::Error);
        match self.format {
            OutputFormat::Json => {
                let report = GenerateReport {
                    passes,
                    diagnostics: diagnostics.into_vec(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => print_text(&passes, &diagnostics),
        }

        if errors > 0 {
            bail!("Generation reported {errors} error(s)");
        }
        Ok(())
    }
}

fn print_text(passes: &[PassReport], diagnostics: &Diagnostics) {
    for pass in passes.iter().filter(|p| !p.providers.is_empty()) {
        println!("{} {}", pass.component.bold(), format!("[{}]", pass.domain).cyan());
        for spec in &pass.providers {
            let policy = if spec.required {
                "required".red()
            } else if spec.nullable {
                "nullable".yellow()
            } else {
                "defaulted".green()
            };
            let default = spec
                .default_value
                .as_ref()
                .map(|d| format!(" = \"{d}\""))
                .unwrap_or_default();
            println!(
                "  {} {} {}{} ({policy})",
                spec.method_name.bold(),
                spec.provided_type,
                spec.name,
                default
            );
            println!("      {}", spec.expression.dimmed());
        }
    }

    for diagnostic in diagnostics.iter() {
        eprintln!("{}", diagnostic.colored());
    }

    let providers: usize = passes.iter().map(|p| p.summary.providers).sum();
    println!(
        "{} provider(s), {} warning(s), {} error(s)",
        providers,
        diagnostics.count(Severity::Warning),
        diagnostics.count(Severity::Error)
    );
}
