//! Type references.
//!
//! Declarations in the host model refer to types by their Java-like textual
//! form (`int`, `java.util.List<java.lang.Integer>`, `java.util.List<?>`).
//! [`TypeRef`] is the parsed, structural form of such a reference. Its
//! [`Display`](fmt::Display) output is the canonical textual form, which is
//! also what the generator uses to order representations deterministically.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::STRING_TYPE;
use crate::core::ProvgenError;

/// The eight primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
}

impl PrimitiveKind {
    /// All primitive kinds in declaration order.
    pub const ALL: [PrimitiveKind; 8] = [
        Self::Boolean,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Char,
    ];

    /// The source keyword, e.g. `int`.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
        }
    }

    /// The boxed counterpart, e.g. `java.lang.Integer`.
    pub const fn boxed_name(self) -> &'static str {
        match self {
            Self::Boolean => "java.lang.Boolean",
            Self::Byte => "java.lang.Byte",
            Self::Short => "java.lang.Short",
            Self::Int => "java.lang.Integer",
            Self::Long => "java.lang.Long",
            Self::Float => "java.lang.Float",
            Self::Double => "java.lang.Double",
            Self::Char => "java.lang.Character",
        }
    }

    /// Look up a primitive kind by keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Bound of a wildcard type argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    /// `? extends T`
    Extends(TypeRef),
    /// `? super T`
    Super(TypeRef),
}

/// A reference to a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    /// `void`
    Void,
    /// A primitive type
    Primitive(PrimitiveKind),
    /// A class or interface type with optional type arguments
    Declared {
        name: String,
        args: Vec<TypeRef>,
    },
    /// A wildcard type argument, `?` when the bound is `None`
    Wildcard(Option<Box<WildcardBound>>),
    /// An array type
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// A declared type without type arguments.
    pub fn declared(name: impl Into<String>) -> Self {
        Self::Declared {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A declared type with type arguments.
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self::Declared {
            name: name.into(),
            args,
        }
    }

    /// `java.lang.String`
    pub fn string() -> Self {
        Self::declared(STRING_TYPE)
    }

    /// Parse the textual form of a type reference.
    pub fn parse(text: &str) -> Result<Self, ProvgenError> {
        let mut parser = TypeParser {
            text,
            pos: 0,
        };
        let parsed = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos != text.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(parsed)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    /// Whether this is exactly `java.lang.String`.
    pub fn is_string(&self) -> bool {
        matches!(self, Self::Declared { name, args } if name == STRING_TYPE && args.is_empty())
    }

    /// The declared type name without type arguments.
    pub fn erasure_name(&self) -> Option<&str> {
        match self {
            Self::Declared {
                name,
                ..
            } => Some(name),
            _ => None,
        }
    }

    /// The type arguments of a declared type (empty for anything else).
    pub fn type_args(&self) -> &[TypeRef] {
        match self {
            Self::Declared {
                args,
                ..
            } => args,
            _ => &[],
        }
    }

    /// Whether this is a declared type named `name`, ignoring type arguments.
    pub fn is_named(&self, name: &str) -> bool {
        self.erasure_name() == Some(name)
    }

    /// The sole type argument of a declared type named one of `names`.
    pub fn single_arg_of(&self, names: &[&str]) -> Option<&TypeRef> {
        match self {
            Self::Declared {
                name,
                args,
            } if args.len() == 1 && names.contains(&name.as_str()) => args.first(),
            _ => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard(_))
    }

    /// The unqualified name: `java.util.List<X>` → `List`, `int` → `int`.
    pub fn simple_name(&self) -> String {
        match self {
            Self::Void => "void".to_string(),
            Self::Primitive(kind) => kind.keyword().to_string(),
            Self::Declared {
                name,
                ..
            } => name.rsplit('.').next().unwrap_or(name).to_string(),
            Self::Wildcard(_) => "?".to_string(),
            Self::Array(component) => format!("{}[]", component.simple_name()),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => f.write_str("void"),
            Self::Primitive(kind) => f.write_str(kind.keyword()),
            Self::Declared {
                name,
                args,
            } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Self::Wildcard(None) => f.write_str("?"),
            Self::Wildcard(Some(bound)) => match bound.as_ref() {
                WildcardBound::Extends(t) => write!(f, "? extends {t}"),
                WildcardBound::Super(t) => write!(f, "? super {t}"),
            },
            Self::Array(component) => write!(f, "{component}[]"),
        }
    }
}

impl FromStr for TypeRef {
    type Err = ProvgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = ProvgenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

struct TypeParser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn error(&self, reason: &str) -> ProvgenError {
        ProvgenError::InvalidTypeRef {
            text: self.text.to_string(),
            reason: format!("{reason} at offset {}", self.pos),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn identifier(&mut self) -> Result<&'a str, ProvgenError> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '$' || c == '.' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let text: &'a str = self.text;
        let ident = &text[start..self.pos];
        if ident.is_empty() || ident.starts_with('.') || ident.ends_with('.') {
            return Err(self.error("expected type name"));
        }
        Ok(ident)
    }

    fn parse_type(&mut self) -> Result<TypeRef, ProvgenError> {
        self.skip_whitespace();

        let mut parsed = if self.eat('?') {
            self.parse_wildcard()?
        } else {
            let name = self.identifier()?.to_string();
            if name == "void" {
                TypeRef::Void
            } else if let Some(kind) = PrimitiveKind::from_keyword(&name) {
                TypeRef::Primitive(kind)
            } else {
                let mut args = Vec::new();
                if self.eat('<') {
                    loop {
                        args.push(self.parse_type()?);
                        if self.eat(',') {
                            continue;
                        }
                        if self.eat('>') {
                            break;
                        }
                        return Err(self.error("expected ',' or '>'"));
                    }
                }
                TypeRef::Declared {
                    name,
                    args,
                }
            }
        };

        while self.eat('[') {
            if !self.eat(']') {
                return Err(self.error("expected ']'"));
            }
            parsed = TypeRef::Array(Box::new(parsed));
        }

        Ok(parsed)
    }

    fn parse_wildcard(&mut self) -> Result<TypeRef, ProvgenError> {
        self.skip_whitespace();
        let rest = &self.text[self.pos..];
        for (keyword, extends) in [("extends", true), ("super", false)] {
            let follows_keyword = rest
                .strip_prefix(keyword)
                .is_some_and(|after| after.starts_with(char::is_whitespace));
            if follows_keyword {
                self.pos += keyword.len();
                let bound = self.parse_type()?;
                let bound = if extends {
                    WildcardBound::Extends(bound)
                } else {
                    WildcardBound::Super(bound)
                };
                return Ok(TypeRef::Wildcard(Some(Box::new(bound))));
            }
        }
        Ok(TypeRef::Wildcard(None))
    }
}
