//! `provgen sites`: the injection sites reachable from each component.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::common::{OutputFormat, load_model_arg, select_components};
use crate::sites::{InjectionSite, collect_sites};

#[derive(Args, Debug)]
pub struct SitesCommand {
    /// Model file or directory of model files
    model: PathBuf,

    /// Component glob pattern; repeatable, defaults to every component
    #[arg(long = "component", value_name = "GLOB")]
    components: Vec<String>,

    /// Only list qualified sites
    #[arg(long)]
    qualified: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ComponentSites {
    component: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    sites: Vec<InjectionSite>,
}

impl SitesCommand {
    pub fn execute(self) -> Result<()> {
        let model = load_model_arg(&self.model)?;
        let components = select_components(&model, &self.components)?;

        let mut reports = Vec::with_capacity(components.len());
        for component in components {
            let report = match collect_sites(&model, &component) {
                Ok(mut sites) => {
                    if self.qualified {
                        sites.retain(|s| s.qualifier.is_some());
                    }
                    ComponentSites {
                        component,
                        error: None,
                        sites,
                    }
                }
                Err(e) => ComponentSites {
                    component,
                    error: Some(e.to_string()),
                    sites: Vec::new(),
                },
            };
            reports.push(report);
        }

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
            OutputFormat::Text => {
                for report in &reports {
                    println!("{} ({} site(s))", report.component.bold(), report.sites.len());
                    if let Some(error) = &report.error {
                        eprintln!("  {} {error}", "error:".red().bold());
                    }
                    for site in &report.sites {
                        println!("  {site}");
                    }
                }
            }
        }

        let failed = reports.iter().filter(|r| r.error.is_some()).count();
        if failed > 0 {
            bail!("{failed} component(s) could not be walked");
        }
        Ok(())
    }
}
