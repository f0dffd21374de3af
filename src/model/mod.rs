//! The host dependency-injection model.
//!
//! A [`GraphModel`] is an index of [`TypeDecl`]s keyed by fully qualified
//! name. It is the read-only snapshot the walker traverses and the conversion
//! resolver inspects. Models are usually loaded from TOML files with
//! [`load_model`], but can be built in code for tests and embedding.
//!
//! # Example
//!
//! ```rust
//! use provgen::model::{GraphModel, MethodDecl, TypeDecl, TypeRef};
//!
//! let mut model = GraphModel::with_builtins();
//! model.insert(
//!     TypeDecl::component("com.example.App")
//!         .with_module("com.example.AppModule")
//!         .with_method(MethodDecl::new("server", TypeRef::declared("com.example.Server"))),
//! );
//! model.insert(TypeDecl::module("com.example.AppModule"));
//!
//! assert_eq!(model.components().count(), 1);
//! assert!(model.get("java.lang.Integer").is_some());
//! ```

mod builtins;
mod decl;
mod loader;
mod types;

pub use builtins::builtin_types;
pub use decl::{
    Annotation, FieldDecl, MethodDecl, ParameterDecl, TypeDecl, TypeKind, Visibility,
};
pub use loader::{ModelFile, load_model, parse_model};
pub use types::{PrimitiveKind, TypeRef, WildcardBound};

use std::collections::{BTreeMap, HashSet};

/// Index of declared types.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    types: BTreeMap<String, TypeDecl>,
}

impl GraphModel {
    /// An empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// A model pre-seeded with the builtin JDK types.
    pub fn with_builtins() -> Self {
        let mut model = Self::new();
        for decl in builtin_types() {
            model.insert(decl);
        }
        model
    }

    /// Insert a declaration, replacing any previous one with the same name.
    ///
    /// Returns the replaced declaration.
    pub fn insert(&mut self, decl: TypeDecl) -> Option<TypeDecl> {
        self.types.insert(decl.name.clone(), decl)
    }

    pub fn get(&self, name: &str) -> Option<&TypeDecl> {
        self.types.get(name)
    }

    /// The declaration behind a type reference, if it names a declared type.
    pub fn resolve(&self, type_ref: &TypeRef) -> Option<&TypeDecl> {
        type_ref.erasure_name().and_then(|name| self.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All declarations in name order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.types.values()
    }

    /// All component declarations in name order.
    pub fn components(&self) -> impl Iterator<Item = &TypeDecl> {
        self.types.values().filter(|t| t.kind == TypeKind::Component)
    }

    /// The type followed by its declared superclasses, nearest first.
    ///
    /// The chain stops at the first superclass the model does not declare,
    /// and at any repeated name.
    pub fn lineage(&self, name: &str) -> Vec<&TypeDecl> {
        let mut lineage = Vec::new();
        let mut seen = HashSet::new();
        let mut next = self.get(name);

        while let Some(decl) = next {
            if !seen.insert(decl.name.as_str()) {
                break;
            }
            lineage.push(decl);
            next = decl.superclass.as_deref().and_then(|s| self.get(s));
        }

        lineage
    }

    /// The declared name closest to `name`, for "did you mean" hints.
    pub fn closest_name(&self, name: &str) -> Option<String> {
        self.types
            .keys()
            .map(|candidate| (strsim::jaro_winkler(name, candidate), candidate))
            .filter(|(score, _)| *score > 0.85)
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, candidate)| candidate.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lineage_follows_superclasses() {
        let mut model = GraphModel::new();
        model.insert(TypeDecl::module("a.Child").with_superclass("a.Parent"));
        model.insert(TypeDecl::class("a.Parent").with_superclass("java.lang.Object"));

        let names: Vec<&str> = model.lineage("a.Child").iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a.Child", "a.Parent"]);
    }

    #[test]
    fn test_lineage_stops_on_cycle() {
        let mut model = GraphModel::new();
        model.insert(TypeDecl::class("a.A").with_superclass("a.B"));
        model.insert(TypeDecl::class("a.B").with_superclass("a.A"));

        assert_eq!(model.lineage("a.A").len(), 2);
    }

    #[test]
    fn test_closest_name() {
        let mut model = GraphModel::new();
        model.insert(TypeDecl::module("com.example.AppModule"));
        model.insert(TypeDecl::module("com.example.Other"));

        assert_eq!(
            model.closest_name("com.example.AppModul").as_deref(),
            Some("com.example.AppModule")
        );
        assert_eq!(model.closest_name("zzz"), None);
    }

    #[test]
    fn test_user_declaration_replaces_builtin() {
        let mut model = GraphModel::with_builtins();
        let replaced = model.insert(TypeDecl::class("java.util.UUID"));
        assert!(replaced.is_some());
        assert!(!model.get("java.util.UUID").unwrap().has_string_factory("fromString"));
    }
}
