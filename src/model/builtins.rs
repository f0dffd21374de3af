//! JDK types every model knows about.
//!
//! Conversion strategies inspect declarations for `valueOf(String)`,
//! `fromString(String)` and `String` constructors. The common library types
//! are pre-declared here so models only need to describe their own types.

use super::decl::{MethodDecl, ParameterDecl, TypeDecl};
use super::types::{PrimitiveKind, TypeRef};
use crate::constants::{FROM_STRING_METHOD, STRING_TYPE, VALUE_OF_METHOD};

fn string_factory(owner: &str, method_name: &str) -> MethodDecl {
    MethodDecl::new(method_name, TypeRef::declared(owner))
        .static_()
        .with_parameter(ParameterDecl::new("s", TypeRef::string()))
}

fn string_constructor(owner: &str) -> MethodDecl {
    MethodDecl::new("<init>", TypeRef::declared(owner))
        .with_parameter(ParameterDecl::new("s", TypeRef::string()))
}

/// Declarations for the builtin JDK types.
pub fn builtin_types() -> Vec<TypeDecl> {
    let mut types = vec![TypeDecl::class(STRING_TYPE)];

    // Character has no valueOf(String)
    for kind in PrimitiveKind::ALL {
        let boxed = kind.boxed_name();
        let mut decl = TypeDecl::class(boxed);
        if kind != PrimitiveKind::Char {
            decl = decl.with_method(string_factory(boxed, VALUE_OF_METHOD));
        }
        types.push(decl);
    }

    for name in ["java.math.BigDecimal", "java.math.BigInteger", "java.net.URI"] {
        types.push(TypeDecl::class(name).with_constructor(string_constructor(name)));
    }

    types.push(
        TypeDecl::class("java.util.UUID")
            .with_method(string_factory("java.util.UUID", FROM_STRING_METHOD)),
    );

    types
}
