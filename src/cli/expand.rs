//! `provgen expand`: expand a qualifier name template.
//!
//! `env.*` variables come from the process environment and `sys.*`
//! variables from `[system_properties]` in the configuration.

use anyhow::Result;
use clap::Args;

use crate::config::GeneratorConfig;
use crate::domain::{EnvironmentSource, MapSource};
use crate::template::expand_name;

#[derive(Args, Debug)]
pub struct ExpandCommand {
    /// Template such as `db.${env.STAGE:-dev}.url`
    template: String,
}

impl ExpandCommand {
    pub fn execute(self, config: &GeneratorConfig) -> Result<()> {
        let sys = MapSource::new(config.system_properties.clone());
        let expanded = expand_name(&self.template, &EnvironmentSource, &sys)?;
        println!("{expanded}");
        Ok(())
    }
}
