//! Configuration domains.
//!
//! A domain is one family of externally-sourced values: environment
//! variables, system properties, remote parameter-store entries or
//! command-line options. Each domain is identified by its qualifier
//! annotation; injection sites carrying that qualifier belong to it.

mod source;

pub use source::{EnvironmentSource, MapSource, ValueSource};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{LIST_TYPE, STRING_TYPE};
use crate::model::{Annotation, TypeRef};

/// One configuration domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Domain {
    /// Short name used on the command line, e.g. `env`
    pub name: String,
    /// Qualifier annotation type, fully qualified or simple
    pub qualifier: String,
    /// Fragment inserted into generated method names, e.g. `Env`
    pub prefix: String,
    /// Whether one parameter may carry several values (repeatable options)
    #[serde(default)]
    pub multi_valued: bool,
}

impl Domain {
    pub fn new(
        name: impl Into<String>,
        qualifier: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            qualifier: qualifier.into(),
            prefix: prefix.into(),
            multi_valued: false,
        }
    }

    #[must_use]
    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    /// The built-in domain catalogue.
    pub fn builtins() -> Vec<Domain> {
        vec![
            Domain::new("env", "EnvironmentVariable", "Env"),
            Domain::new("sys", "SystemProperty", "Sys"),
            Domain::new("ssm", "AwsSsmParameter", "Ssm"),
            Domain::new("cli", "OptionParameter", "Cli").multi_valued(),
        ]
    }

    /// Whether `annotation` is this domain's qualifier.
    pub fn matches(&self, annotation: &Annotation) -> bool {
        annotation.is_type(&self.qualifier)
    }

    /// The type a lookup in this domain produces for a `target` representation.
    ///
    /// Multi-valued domains produce `List<String>` for list targets; every
    /// other lookup produces a `String`.
    pub fn source_type_for(&self, target: &TypeRef) -> TypeRef {
        if self.multi_valued && target.is_named(LIST_TYPE) {
            TypeRef::generic(LIST_TYPE, vec![TypeRef::declared(STRING_TYPE)])
        } else {
            TypeRef::string()
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (@{})", self.name, self.qualifier)
    }
}
