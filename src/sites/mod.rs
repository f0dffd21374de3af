//! Injection sites.
//!
//! An [`InjectionSite`] is one place in the graph that consumes a value: a
//! component provision result, a provides-method parameter, an injected
//! constructor or method parameter, or an injected field. Sites are created
//! once while walking and never change afterwards.
//!
//! Each site records how its declared type relates to the value it receives
//! (its [`ProvisionStyle`]), the qualifier it carries, and whether it
//! tolerates `null`.

mod collector;

pub use collector::{SiteCollector, collect_sites};

use serde::Serialize;
use std::fmt;

use crate::constants::{LAZY_TYPES, OPTIONAL_TYPE, PROVIDER_TYPES};
use crate::core::ProvgenError;
use crate::model::{Annotation, TypeRef};

/// Where in the graph a site was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiteKind {
    ComponentProvisionResult,
    ModuleStaticProvidesParameter,
    ModuleInstanceProvidesParameter,
    InjectConstructorParameter,
    InjectMethodParameter,
    InjectField,
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ComponentProvisionResult => "component provision result",
            Self::ModuleStaticProvidesParameter => "static provides parameter",
            Self::ModuleInstanceProvidesParameter => "provides parameter",
            Self::InjectConstructorParameter => "constructor parameter",
            Self::InjectMethodParameter => "method parameter",
            Self::InjectField => "field",
        };
        f.write_str(name)
    }
}

/// How a declared type relates to the value it provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProvisionStyle {
    /// A primitive; never null
    Primitive,
    /// `Optional<T>`; provides `T`, implicitly nullable
    Optional,
    /// `Provider<T>`; provides `T`
    Provider,
    /// `Lazy<T>`; provides `T`
    Lazy,
    /// Any other type, provided as declared
    Verbatim,
}

impl ProvisionStyle {
    /// Classify `declared`, returning its style and the provided type.
    pub fn classify(declared: &TypeRef) -> (Self, &TypeRef) {
        if declared.is_primitive() {
            return (Self::Primitive, declared);
        }
        if let Some(inner) = declared.single_arg_of(&[OPTIONAL_TYPE]) {
            return (Self::Optional, inner);
        }
        if let Some(inner) = declared.single_arg_of(PROVIDER_TYPES) {
            return (Self::Provider, inner);
        }
        if let Some(inner) = declared.single_arg_of(LAZY_TYPES) {
            return (Self::Lazy, inner);
        }
        (Self::Verbatim, declared)
    }

    /// Whether the style alone makes a site nullable.
    pub fn is_implicitly_nullable(self) -> bool {
        self == Self::Optional
    }
}

/// One consumption point in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjectionSite {
    /// Human-readable identity of the declaring element, for messages
    pub element: String,
    pub kind: SiteKind,
    pub style: ProvisionStyle,
    pub declared_type: TypeRef,
    pub provided_type: TypeRef,
    /// The single qualifier annotation, if any
    pub qualifier: Option<Annotation>,
    pub annotations: Vec<Annotation>,
    pub nullable: bool,
}

impl InjectionSite {
    /// Build a site from its declaring element and declared type.
    ///
    /// Fails when the site carries more than one qualifier, or when a
    /// primitive site is explicitly marked nullable.
    pub fn new(
        element: impl Into<String>,
        kind: SiteKind,
        declared_type: &TypeRef,
        annotations: &[Annotation],
    ) -> Result<Self, ProvgenError> {
        let element = element.into();
        let (style, provided_type) = ProvisionStyle::classify(declared_type);

        let mut qualifiers = annotations.iter().filter(|a| a.qualifier);
        let qualifier = qualifiers.next().cloned();
        if qualifiers.next().is_some() {
            return Err(ProvgenError::DuplicateQualifier {
                element,
            });
        }

        let explicitly_nullable = annotations.iter().any(Annotation::is_nullable);
        if explicitly_nullable && style == ProvisionStyle::Primitive {
            return Err(ProvgenError::NullablePrimitive {
                element,
                type_name: declared_type.to_string(),
            });
        }

        Ok(Self {
            element,
            kind,
            style,
            declared_type: declared_type.clone(),
            provided_type: provided_type.clone(),
            qualifier,
            annotations: annotations.to_vec(),
            nullable: explicitly_nullable || style.is_implicitly_nullable(),
        })
    }

    /// The qualifier's name, if the site is qualified and the name is present.
    pub fn qualifier_name(&self) -> Option<&str> {
        self.qualifier.as_ref().and_then(|q| q.name.as_deref())
    }

    /// The qualifier's default value, if any.
    pub fn default_value(&self) -> Option<&str> {
        self.qualifier.as_ref().and_then(|q| q.default_value.as_deref())
    }
}

impl fmt::Display for InjectionSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.element, self.kind, self.declared_type)?;
        if let Some(qualifier) = &self.qualifier {
            write!(f, " {qualifier}")?;
        }
        if self.nullable {
            f.write_str(" nullable")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(text: &str) -> TypeRef {
        TypeRef::parse(text).unwrap()
    }

    #[test]
    fn test_classify() {
        let cases = [
            ("int", ProvisionStyle::Primitive, "int"),
            ("java.util.Optional<java.lang.String>", ProvisionStyle::Optional, "java.lang.String"),
            ("javax.inject.Provider<a.B>", ProvisionStyle::Provider, "a.B"),
            ("jakarta.inject.Provider<a.B>", ProvisionStyle::Provider, "a.B"),
            ("dagger.Lazy<java.lang.Integer>", ProvisionStyle::Lazy, "java.lang.Integer"),
            ("java.util.List<java.lang.String>", ProvisionStyle::Verbatim, "java.util.List<java.lang.String>"),
            ("java.util.Optional", ProvisionStyle::Verbatim, "java.util.Optional"),
        ];
        for (declared, style, provided) in cases {
            let declared = ty(declared);
            let (actual_style, actual_provided) = ProvisionStyle::classify(&declared);
            assert_eq!(actual_style, style, "{declared}");
            assert_eq!(actual_provided.to_string(), provided);
        }
    }

    #[test]
    fn test_optional_is_implicitly_nullable() {
        let site = InjectionSite::new(
            "a.B.c",
            SiteKind::InjectField,
            &ty("java.util.Optional<java.lang.String>"),
            &[Annotation::qualifier("EnvironmentVariable", "HOST", None)],
        )
        .unwrap();
        assert!(site.nullable);
        assert_eq!(site.provided_type, TypeRef::string());
        assert_eq!(site.qualifier_name(), Some("HOST"));
    }

    #[test]
    fn test_explicit_nullable() {
        let site = InjectionSite::new(
            "a.B.c",
            SiteKind::InjectField,
            &TypeRef::string(),
            &[Annotation::marker("javax.annotation.Nullable")],
        )
        .unwrap();
        assert!(site.nullable);
        assert!(site.qualifier.is_none());
    }

    #[test]
    fn test_nullable_primitive_rejected() {
        let err = InjectionSite::new(
            "a.B(int port)",
            SiteKind::InjectConstructorParameter,
            &ty("int"),
            &[Annotation::marker("Nullable")],
        )
        .unwrap_err();
        assert!(matches!(err, ProvgenError::NullablePrimitive { .. }));
    }

    #[test]
    fn test_duplicate_qualifier_rejected() {
        let err = InjectionSite::new(
            "a.B.c",
            SiteKind::InjectField,
            &TypeRef::string(),
            &[
                Annotation::qualifier("EnvironmentVariable", "A", None),
                Annotation::qualifier("SystemProperty", "a", None),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ProvgenError::DuplicateQualifier { .. }));
    }
}
