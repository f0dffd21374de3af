//! Conversion of looked-up strings into requested types.
//!
//! Every configuration lookup yields a `String` (or, for multi-valued
//! domains, a `List<String>`). A representation of any other type needs a
//! conversion from that source type. The [`ConversionResolver`] asks an
//! ordered chain of [`ConversionStrategy`] implementations and returns the
//! first match as a structured [`Conversion`]; turning that descriptor into
//! source text is the job of a [`ConversionRenderer`].
//!
//! The default chain, in order:
//!
//! | strategy | matches |
//! |---|---|
//! | identity | target equals source |
//! | primitive | `String` to any primitive, and to `Character` |
//! | valueOf | static `valueOf(String)` on the target |
//! | fromString | static `fromString(String)` on the target |
//! | constructor | public `String` constructor on the target |
//! | list | `List<String>` to `List<T>`, converting each element |
//!
//! No match is not an error here; callers decide what a missing conversion
//! means.

mod render;

pub use render::{ConversionRenderer, JavaRenderer, generate_conversion_expr};

use serde::Serialize;

use crate::constants::{FROM_STRING_METHOD, LIST_TYPE, VALUE_OF_METHOD};
use crate::model::{GraphModel, PrimitiveKind, TypeRef};

/// How a source value becomes the target value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum Conversion {
    /// The value is used as is
    Identity,
    /// Parse into a primitive
    ParsePrimitive { primitive: PrimitiveKind },
    /// `Target.valueOf(value)`
    ValueOf { target: TypeRef },
    /// `Target.fromString(value)`
    FromString { target: TypeRef },
    /// `new Target(value)`
    Constructor { target: TypeRef },
    /// Convert each element of a list
    EachElement {
        element_type: TypeRef,
        element: Box<Conversion>,
    },
}

impl Conversion {
    /// Short tag naming the strategy.
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::ParsePrimitive {
                ..
            } => "primitive",
            Self::ValueOf {
                ..
            } => "valueOf",
            Self::FromString {
                ..
            } => "fromString",
            Self::Constructor {
                ..
            } => "constructor",
            Self::EachElement {
                ..
            } => "list",
        }
    }
}

/// One link in the conversion chain.
pub trait ConversionStrategy {
    fn name(&self) -> &'static str;

    /// The conversion from `source` to `target`, if this strategy applies.
    ///
    /// `resolver` gives access to the model and to the whole chain for
    /// strategies that convert recursively.
    fn convert(
        &self,
        resolver: &ConversionResolver<'_>,
        target: &TypeRef,
        source: &TypeRef,
    ) -> Option<Conversion>;
}

pub struct IdentityStrategy;

impl ConversionStrategy for IdentityStrategy {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn convert(&self, _: &ConversionResolver<'_>, target: &TypeRef, source: &TypeRef) -> Option<Conversion> {
        (target == source).then_some(Conversion::Identity)
    }
}

pub struct PrimitiveStrategy;

impl ConversionStrategy for PrimitiveStrategy {
    fn name(&self) -> &'static str {
        "primitive"
    }

    fn convert(&self, _: &ConversionResolver<'_>, target: &TypeRef, source: &TypeRef) -> Option<Conversion> {
        if !source.is_string() {
            return None;
        }
        match target {
            TypeRef::Primitive(kind) => Some(Conversion::ParsePrimitive {
                primitive: *kind,
            }),
            // Character has no valueOf(String); it shares the char parse
            _ if target.is_named(PrimitiveKind::Char.boxed_name()) => {
                Some(Conversion::ParsePrimitive {
                    primitive: PrimitiveKind::Char,
                })
            }
            _ => None,
        }
    }
}

/// A static `name(String)` factory on the target type.
pub struct FactoryStrategy {
    method_name: &'static str,
}

impl FactoryStrategy {
    pub fn value_of() -> Self {
        Self {
            method_name: VALUE_OF_METHOD,
        }
    }

    pub fn from_string() -> Self {
        Self {
            method_name: FROM_STRING_METHOD,
        }
    }
}

impl ConversionStrategy for FactoryStrategy {
    fn name(&self) -> &'static str {
        self.method_name
    }

    fn convert(
        &self,
        resolver: &ConversionResolver<'_>,
        target: &TypeRef,
        source: &TypeRef,
    ) -> Option<Conversion> {
        if !source.is_string() || !target.type_args().is_empty() {
            return None;
        }
        let decl = resolver.model().resolve(target)?;
        if !decl.has_string_factory(self.method_name) {
            return None;
        }
        let target = target.clone();
        Some(if self.method_name == VALUE_OF_METHOD {
            Conversion::ValueOf {
                target,
            }
        } else {
            Conversion::FromString {
                target,
            }
        })
    }
}

pub struct ConstructorStrategy;

impl ConversionStrategy for ConstructorStrategy {
    fn name(&self) -> &'static str {
        "constructor"
    }

    fn convert(
        &self,
        resolver: &ConversionResolver<'_>,
        target: &TypeRef,
        source: &TypeRef,
    ) -> Option<Conversion> {
        if !source.is_string() || !target.type_args().is_empty() {
            return None;
        }
        let decl = resolver.model().resolve(target)?;
        decl.has_string_constructor().then(|| Conversion::Constructor {
            target: target.clone(),
        })
    }
}

/// `List<S>` to `List<T>` where `S` converts to `T`.
///
/// Only lists with exactly one concrete type argument qualify; raw and
/// wildcard lists never convert.
pub struct ListStrategy;

impl ConversionStrategy for ListStrategy {
    fn name(&self) -> &'static str {
        "list"
    }

    fn convert(
        &self,
        resolver: &ConversionResolver<'_>,
        target: &TypeRef,
        source: &TypeRef,
    ) -> Option<Conversion> {
        let element_target = target.single_arg_of(&[LIST_TYPE])?;
        let element_source = source.single_arg_of(&[LIST_TYPE])?;
        if element_target.is_wildcard() || element_target.is_primitive() {
            return None;
        }
        let element = resolver.resolve(element_target, element_source)?;
        Some(Conversion::EachElement {
            element_type: element_target.clone(),
            element: Box::new(element),
        })
    }
}

/// Ordered chain of conversion strategies over one model.
pub struct ConversionResolver<'g> {
    model: &'g GraphModel,
    strategies: Vec<Box<dyn ConversionStrategy>>,
}

impl<'g> ConversionResolver<'g> {
    /// The default chain.
    pub fn new(model: &'g GraphModel) -> Self {
        Self {
            model,
            strategies: vec![
                Box::new(IdentityStrategy),
                Box::new(PrimitiveStrategy),
                Box::new(FactoryStrategy::value_of()),
                Box::new(FactoryStrategy::from_string()),
                Box::new(ConstructorStrategy),
                Box::new(ListStrategy),
            ],
        }
    }

    /// Append a strategy after the existing ones.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Box<dyn ConversionStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn model(&self) -> &'g GraphModel {
        self.model
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// The first conversion any strategy offers.
    pub fn resolve(&self, target: &TypeRef, source: &TypeRef) -> Option<Conversion> {
        self.strategies.iter().find_map(|s| s.convert(self, target, source))
    }
}
