//! provgen - configuration provider generator for dependency-injection graphs
//!
//! provgen walks the injection graph reachable from a component, finds every
//! injection site carrying a configuration qualifier (environment variable,
//! system property, parameter-store entry, command-line option), groups
//! those sites by parameter name and emits one provider per distinct
//! `(type, name, default)` combination.
//!
//! # Pipeline
//!
//! 1. [`model`] - the read-only type model, loaded from TOML
//! 2. [`walker`] - breadth-first walk from a component root
//! 3. [`sites`] - injection sites recorded during the walk
//! 4. [`grouping`] - per-domain parameter and representation tables
//! 5. [`convert`] - string-to-type conversion strategies
//! 6. [`generator`] - provider specifications handed to a sink
//!
//! Supporting modules:
//! - [`template`] - `${env.X:-default}` name templates
//! - [`domain`] - configuration domains and value sources
//! - [`naming`] - generated method names
//! - [`diagnostics`] - warnings and errors reported by a pass
//! - [`config`] - `provgen.toml`
//! - [`cli`] - the `provgen` command
//!
//! # Example
//!
//! ```rust
//! use provgen::domain::Domain;
//! use provgen::diagnostics::Diagnostics;
//! use provgen::generator::{CollectingSink, Generator};
//! use provgen::model::{Annotation, GraphModel, MethodDecl, TypeDecl, TypeRef};
//!
//! let mut model = GraphModel::with_builtins();
//! model.insert(TypeDecl::component("app.App").with_method(
//!     MethodDecl::new("port", TypeRef::parse("int")?)
//!         .with_annotation(Annotation::qualifier("EnvironmentVariable", "PORT", Some("8080"))),
//! ));
//!
//! let env = Domain::builtins().remove(0);
//! let mut sink = CollectingSink::default();
//! let mut diagnostics = Diagnostics::new();
//! Generator::new(&model).run("app.App", &env, &mut sink, &mut diagnostics)?;
//!
//! assert!(sink.specs().iter().any(|s| s.expression == "Integer.parseInt(value)"));
//! # Ok::<(), provgen::core::ProvgenError>(())
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod convert;
pub mod core;
pub mod diagnostics;
pub mod domain;
pub mod generator;
pub mod grouping;
pub mod model;
pub mod naming;
pub mod sites;
pub mod template;
pub mod walker;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
