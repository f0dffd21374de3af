use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::model::TypeRef;
use crate::sites::InjectionSite;

/// A domain-qualified site with its name resolved.
///
/// The name is the qualifier name after expansion; the site itself is left
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSite<'s> {
    pub site: &'s InjectionSite,
    pub name: String,
    pub default_value: Option<String>,
}

impl<'s> ConfigSite<'s> {
    pub fn new(site: &'s InjectionSite, name: impl Into<String>) -> Self {
        Self {
            site,
            name: name.into(),
            default_value: site.default_value().map(str::to_string),
        }
    }

    /// A site demands a value when it tolerates neither null nor absence.
    pub fn is_required(&self) -> bool {
        !self.site.nullable && self.default_value.is_none()
    }

    pub fn is_nullable(&self) -> bool {
        self.site.nullable
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.site.provided_type
    }

    pub fn element(&self) -> &str {
        &self.site.element
    }

    pub fn parameter_key(&self) -> ParameterKey {
        ParameterKey::new(self.name.clone())
    }

    pub fn representation_key(&self) -> RepresentationKey {
        RepresentationKey::new(self.type_ref().clone(), self.name.clone(), self.default_value.clone())
    }
}

/// A logical parameter, identified by name alone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ParameterKey {
    pub name: String,
}

impl ParameterKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
        }
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One physical binding of a parameter: a (type, name, default) triple.
///
/// Ordered by name, then default value with `None` first, then the textual
/// form of the type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepresentationKey {
    pub type_ref: TypeRef,
    pub name: String,
    pub default_value: Option<String>,
}

impl RepresentationKey {
    pub fn new(type_ref: TypeRef, name: impl Into<String>, default_value: Option<String>) -> Self {
        Self {
            type_ref,
            name: name.into(),
            default_value,
        }
    }

    pub fn parameter_key(&self) -> ParameterKey {
        ParameterKey::new(self.name.clone())
    }

    /// The same name and default at another type.
    pub fn with_type(&self, type_ref: TypeRef) -> Self {
        Self {
            type_ref,
            name: self.name.clone(),
            default_value: self.default_value.clone(),
        }
    }
}

impl Ord for RepresentationKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.default_value.cmp(&other.default_value))
            .then_with(|| self.type_ref.to_string().cmp(&other.type_ref.to_string()))
    }
}

impl PartialOrd for RepresentationKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RepresentationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.type_ref, self.name)?;
        if let Some(default) = &self.default_value {
            write!(f, " (default \"{default}\")")?;
        }
        Ok(())
    }
}

/// Aggregate policy over every site of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterMetadata {
    /// Any site demands a value
    pub required: bool,
    /// Every site tolerates null
    pub nullable: bool,
}

/// Aggregate over every site of one representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RepresentationMetadata {
    /// Every site tolerates null
    pub nullable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_representation_order() {
        let int = TypeRef::parse("int").unwrap();
        let mut keys = vec![
            RepresentationKey::new(TypeRef::string(), "PORT", Some("80".to_string())),
            RepresentationKey::new(int.clone(), "PORT", None),
            RepresentationKey::new(TypeRef::string(), "HOST", None),
            RepresentationKey::new(TypeRef::string(), "PORT", None),
        ];
        keys.sort();

        let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "java.lang.String HOST",
                "int PORT",
                "java.lang.String PORT",
                "java.lang.String PORT (default \"80\")",
            ]
        );
    }
}
