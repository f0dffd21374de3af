//! `provgen tree`: the injection graph of one component as a tree.
//!
//! ```text
//! com.acme.AppComponent [component]
//! ├── com.acme.DbModule [module]
//! │   └── com.acme.Pool
//! └── com.acme.Service
//!     └── com.acme.Service
//!         └── (circular reference)
//! ```

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::common::{load_model_arg, select_components};
use crate::walker::InjectionGraph;

#[derive(Args, Debug)]
pub struct TreeCommand {
    /// Model file or directory of model files
    model: PathBuf,

    /// Component glob pattern; repeatable, defaults to every component
    #[arg(long = "component", value_name = "GLOB")]
    components: Vec<String>,
}

impl TreeCommand {
    pub fn execute(self) -> Result<()> {
        let model = load_model_arg(&self.model)?;
        let components = select_components(&model, &self.components)?;

        let mut failed = 0;
        for component in &components {
            match InjectionGraph::from_walk(&model, component) {
                Ok(graph) => {
                    print!("{}", graph.to_tree_string(component));
                    if graph.has_cycles() {
                        println!("{}", "(graph contains cycles)".yellow());
                    }
                }
                Err(e) => {
                    eprintln!("{} {component}: {e}", "error:".red().bold());
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            bail!("{failed} component(s) could not be walked");
        }
        Ok(())
    }
}
