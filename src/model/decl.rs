//! Declarations of the host dependency-injection model.
//!
//! These are the read-only inputs the walker traverses: components, modules
//! and injectable classes, their members, and the annotations on those
//! members. Qualifier annotations are decoded at this boundary into a fixed
//! `{ name, default_value }` shape so the rest of the generator never looks
//! annotation values up by key.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::TypeRef;
use crate::constants::NULLABLE_ANNOTATION;

/// The structural role of a declared type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// A component root: includes modules and exposes provision methods
    Component,
    /// A module: includes modules and declares provides methods
    Module,
    /// An enum type; implicitly offers a static `valueOf(String)`
    Enum,
    /// Any other class or interface
    #[default]
    Class,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Component => "component",
            Self::Module => "module",
            Self::Enum => "enum",
            Self::Class => "class",
        };
        f.write_str(name)
    }
}

/// Member visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

/// An annotation instance on a member or parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Annotation {
    /// Annotation type name, fully qualified or simple
    #[serde(rename = "type")]
    pub annotation_type: String,
    /// Whether the annotation type is a qualifier
    #[serde(default)]
    pub qualifier: bool,
    /// Decoded qualifier name (the annotation's `value`)
    #[serde(default)]
    pub name: Option<String>,
    /// Decoded qualifier default value
    #[serde(default)]
    pub default_value: Option<String>,
}

impl Annotation {
    /// A marker annotation without values.
    pub fn marker(annotation_type: impl Into<String>) -> Self {
        Self {
            annotation_type: annotation_type.into(),
            qualifier: false,
            name: None,
            default_value: None,
        }
    }

    /// A qualifier annotation with a name and optional default value.
    pub fn qualifier(
        annotation_type: impl Into<String>,
        name: impl Into<String>,
        default_value: Option<&str>,
    ) -> Self {
        Self {
            annotation_type: annotation_type.into(),
            qualifier: true,
            name: Some(name.into()),
            default_value: default_value.map(str::to_string),
        }
    }

    /// The annotation type name after the last `.`.
    pub fn simple_name(&self) -> &str {
        self.annotation_type.rsplit('.').next().unwrap_or(&self.annotation_type)
    }

    /// Whether this annotation's type is `type_name`, by full or simple name.
    pub fn is_type(&self, type_name: &str) -> bool {
        self.annotation_type == type_name || self.simple_name() == type_name
    }

    /// Whether this is a `@Nullable` annotation from any package.
    pub fn is_nullable(&self) -> bool {
        self.simple_name() == NULLABLE_ANNOTATION
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.simple_name())?;
        match (&self.name, &self.default_value) {
            (Some(name), Some(default)) => write!(f, "(\"{name}\", default=\"{default}\")"),
            (Some(name), None) => write!(f, "(\"{name}\")"),
            _ => Ok(()),
        }
    }
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl ParameterDecl {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            annotations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

fn void() -> TypeRef {
    TypeRef::Void
}

/// A method or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default = "void")]
    pub returns: TypeRef,
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub visibility: Visibility,
    /// Annotated as a provides method
    #[serde(default)]
    pub provides: bool,
    /// Annotated for injection
    #[serde(default)]
    pub inject: bool,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl MethodDecl {
    /// A public, concrete, instance method with no parameters.
    pub fn new(name: impl Into<String>, returns: TypeRef) -> Self {
        Self {
            name: name.into(),
            returns,
            parameters: Vec::new(),
            is_static: false,
            is_abstract: false,
            visibility: Visibility::Public,
            provides: false,
            inject: false,
            annotations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterDecl) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn provides(mut self) -> Self {
        self.provides = true;
        self
    }

    #[must_use]
    pub fn inject(mut self) -> Self {
        self.inject = true;
        self
    }

    #[must_use]
    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    #[must_use]
    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// `name(Type a, Type b)`, used to identify the member in messages.
    pub fn signature(&self) -> String {
        let params: Vec<String> =
            self.parameters.iter().map(|p| format!("{} {}", p.type_ref, p.name)).collect();
        format!("{}({})", self.name, params.join(", "))
    }

    /// Name and parameter types; methods with equal keys override each other.
    pub fn override_key(&self) -> (&str, Vec<&TypeRef>) {
        (self.name.as_str(), self.parameters.iter().map(|p| &p.type_ref).collect())
    }

    /// Whether this method is a static factory `name(java.lang.String)`
    /// returning `owner`.
    pub fn is_string_factory(&self, name: &str, owner: &str) -> bool {
        self.name == name
            && self.is_static
            && self.is_public()
            && self.parameters.len() == 1
            && self.parameters[0].type_ref.is_string()
            && self.returns.is_named(owner)
    }
}

/// A field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub inject: bool,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl FieldDecl {
    /// An injected instance field.
    pub fn injected(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            inject: true,
            is_static: false,
            annotations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    /// Fully qualified type name
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    /// Modules included by a component or module
    #[serde(default)]
    pub modules: Vec<String>,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub constructors: Vec<MethodDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modules: Vec::new(),
            superclass: None,
            is_abstract: false,
            constructors: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn component(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Component)
    }

    pub fn module(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Module)
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.modules.push(module.into());
        self
    }

    #[must_use]
    pub fn with_superclass(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub fn with_constructor(mut self, constructor: MethodDecl) -> Self {
        self.constructors.push(constructor);
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    /// The type itself as a reference.
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::declared(self.name.clone())
    }

    /// Zero-argument, non-void methods; the provision methods of a component.
    pub fn provision_methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods.iter().filter(|m| m.parameters.is_empty() && !m.returns.is_void())
    }

    /// Public, concrete, provider-annotated methods with a non-void return.
    pub fn provides_methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods
            .iter()
            .filter(|m| m.provides && m.is_public() && !m.is_abstract && !m.returns.is_void())
    }

    pub fn inject_constructors(&self) -> impl Iterator<Item = &MethodDecl> {
        self.constructors.iter().filter(|c| c.inject)
    }

    pub fn inject_methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods.iter().filter(|m| m.inject && !m.is_static)
    }

    pub fn inject_fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.fields.iter().filter(|f| f.inject && !f.is_static)
    }

    /// A public constructor taking exactly one `java.lang.String`.
    pub fn has_string_constructor(&self) -> bool {
        !self.is_abstract
            && self.constructors.iter().any(|c| {
                c.is_public() && c.parameters.len() == 1 && c.parameters[0].type_ref.is_string()
            })
    }

    /// A public static `name(java.lang.String)` factory returning this type.
    ///
    /// Enums always offer `valueOf(String)`.
    pub fn has_string_factory(&self, method_name: &str) -> bool {
        if self.kind == TypeKind::Enum && method_name == crate::constants::VALUE_OF_METHOD {
            return true;
        }
        self.methods.iter().any(|m| m.is_string_factory(method_name, &self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_names() {
        let nullable = Annotation::marker("javax.annotation.Nullable");
        assert!(nullable.is_nullable());
        assert_eq!(nullable.simple_name(), "Nullable");

        let env = Annotation::qualifier("com.example.EnvironmentVariable", "PORT", Some("8080"));
        assert!(env.is_type("EnvironmentVariable"));
        assert!(env.is_type("com.example.EnvironmentVariable"));
        assert!(!env.is_type("SystemProperty"));
        assert_eq!(env.to_string(), "@EnvironmentVariable(\"PORT\", default=\"8080\")");
    }

    #[test]
    fn test_method_filters() {
        let decl = TypeDecl::module("m.M")
            .with_method(MethodDecl::new("a", TypeRef::string()).provides())
            .with_method(MethodDecl::new("b", TypeRef::string()).provides().abstract_())
            .with_method(MethodDecl::new("c", TypeRef::Void).provides())
            .with_method(MethodDecl::new("d", TypeRef::string()).provides().static_())
            .with_method(MethodDecl::new("e", TypeRef::string()));

        let names: Vec<&str> = decl.provides_methods().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["a", "d"]);
    }

    #[test]
    fn test_string_factories() {
        let uuid = TypeDecl::class("java.util.UUID").with_method(
            MethodDecl::new("fromString", TypeRef::declared("java.util.UUID"))
                .static_()
                .with_parameter(ParameterDecl::new("s", TypeRef::string())),
        );
        assert!(uuid.has_string_factory("fromString"));
        assert!(!uuid.has_string_factory("valueOf"));

        let color = TypeDecl::new("a.Color", TypeKind::Enum);
        assert!(color.has_string_factory("valueOf"));
    }

    #[test]
    fn test_signature() {
        let method = MethodDecl::new("port", TypeRef::Void)
            .with_parameter(ParameterDecl::new("value", TypeRef::parse("int").unwrap()));
        assert_eq!(method.signature(), "port(int value)");

        let renamed = MethodDecl::new("port", TypeRef::Void)
            .with_parameter(ParameterDecl::new("other", TypeRef::parse("int").unwrap()));
        assert_eq!(method.override_key(), renamed.override_key());
        assert_ne!(method.signature(), renamed.signature());
    }

    #[test]
    fn test_deserialize_declaration() {
        let decl: TypeDecl = toml::from_str(
            r#"
name = "com.example.AppModule"
kind = "module"
modules = ["com.example.Other"]

[[methods]]
name = "port"
returns = "int"
static = true
provides = true

[[methods.parameters]]
name = "raw"
type = "java.lang.String"
annotations = [{ type = "EnvironmentVariable", qualifier = true, name = "PORT" }]
"#,
        )
        .unwrap();

        assert_eq!(decl.kind, TypeKind::Module);
        assert_eq!(decl.modules, vec!["com.example.Other".to_string()]);
        let method = &decl.methods[0];
        assert!(method.is_static);
        assert_eq!(method.parameters[0].annotations[0].name.as_deref(), Some("PORT"));
    }
}
