//! Expansion of `${env.X}` / `${sys.x}` references in qualifier names.

use super::{TemplateHandler, parse_with};
use crate::core::ProvgenError;
use crate::domain::ValueSource;

const ENV_PREFIX: &str = "env.";
const SYS_PREFIX: &str = "sys.";

/// Expands a name template into a concrete name.
///
/// Variables are namespaced: `env.NAME` reads the environment source and
/// `sys.name` reads the system-properties source.
pub struct NameExpander<'a> {
    env: &'a dyn ValueSource,
    sys: &'a dyn ValueSource,
    output: String,
}

impl<'a> NameExpander<'a> {
    pub fn new(env: &'a dyn ValueSource, sys: &'a dyn ValueSource) -> Self {
        Self {
            env,
            sys,
            output: String::new(),
        }
    }

    fn lookup(&self, variable: &str) -> Result<Option<String>, ProvgenError> {
        if let Some(name) = variable.strip_prefix(ENV_PREFIX) {
            Ok(self.env.lookup(name))
        } else if let Some(name) = variable.strip_prefix(SYS_PREFIX) {
            Ok(self.sys.lookup(name))
        } else {
            Err(ProvgenError::UnresolvedVariable {
                variable: variable.to_string(),
                reason: "expected an 'env.' or 'sys.' prefix".to_string(),
            })
        }
    }

    /// Consume the expander, returning the expanded text.
    pub fn finish(self) -> String {
        self.output
    }
}

impl TemplateHandler for NameExpander<'_> {
    type Error = ProvgenError;

    fn on_text(&mut self, _offset: usize, text: &str) -> Result<(), Self::Error> {
        self.output.push_str(text);
        Ok(())
    }

    fn on_variable_expression(&mut self, _offset: usize, name: &str) -> Result<(), Self::Error> {
        match self.lookup(name)? {
            Some(value) => {
                self.output.push_str(&value);
                Ok(())
            }
            None => Err(ProvgenError::UnresolvedVariable {
                variable: name.to_string(),
                reason: "no value is set and no default was given".to_string(),
            }),
        }
    }

    fn on_variable_expression_with_default_value(
        &mut self,
        _offset: usize,
        name: &str,
        default_value: &str,
    ) -> Result<(), Self::Error> {
        let value = self.lookup(name)?.unwrap_or_else(|| default_value.to_string());
        self.output.push_str(&value);
        Ok(())
    }
}

/// Expand `template` using the given environment and system-property sources.
pub fn expand_name(
    template: &str,
    env: &dyn ValueSource,
    sys: &dyn ValueSource,
) -> Result<String, ProvgenError> {
    let mut expander = NameExpander::new(env, sys);
    parse_with(template, &mut expander).map_err(|e| match e {
        ProvgenError::TemplateSyntax {
            source,
            ..
        } => ProvgenError::TemplateSyntax {
            template: template.to_string(),
            source,
        },
        other => other,
    })?;
    Ok(expander.finish())
}
