//! Value sources.
//!
//! A value source answers one question: does a value exist for this name,
//! and if so what is it. Environment variables and system properties are
//! provided here; remote stores implement the same trait elsewhere.

use std::collections::BTreeMap;

/// Key → value lookup with existence as the only other outcome.
pub trait ValueSource {
    fn lookup(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentSource;

impl ValueSource for EnvironmentSource {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed map of values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSource {
    values: BTreeMap<String, String>,
}

impl MapSource {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self {
            values,
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl ValueSource for MapSource {
    fn lookup(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

impl<T: ValueSource + ?Sized> ValueSource for &T {
    fn lookup(&self, name: &str) -> Option<String> {
        (**self).lookup(name)
    }
}
