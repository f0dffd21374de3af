//! Generated-name utilities.
//!
//! Provider method names are a stable function of the domain prefix, the
//! parameter name, the provided type and the default value, e.g.
//! `provideEnvDatabaseUrlAsIntWithDefault1a2b3c4d`.

use sha2::{Digest, Sha256};

use crate::constants::SIGNATURE_HEX_LEN;
use crate::model::{TypeRef, WildcardBound};

/// Convert an upper-snake name to upper camel case.
///
/// Any character that is not ASCII alphanumeric separates words, so
/// `DATABASE_URL`, `database.url` and `database-url` all become
/// `DatabaseUrl`.
pub fn upper_camel(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Uppercase the first character and drop anything not alphanumeric.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars().filter(char::is_ascii_alphanumeric);
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.collect::<String>(),
        None => String::new(),
    }
}

/// First [`SIGNATURE_HEX_LEN`] hex characters of the SHA-256 digest of `text`.
pub fn short_signature(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut signature = hex::encode(digest);
    signature.truncate(SIGNATURE_HEX_LEN);
    signature
}

/// Upper-camel rendering of a type's simple names.
///
/// `int` → `Int`, `java.util.List<java.lang.Integer>` → `ListOfInteger`,
/// `java.util.Map<K, V>` → `MapOfKAndV`, `byte[]` → `ByteArray`.
pub fn type_fragment(type_ref: &TypeRef) -> String {
    match type_ref {
        TypeRef::Void => "Void".to_string(),
        TypeRef::Primitive(kind) => capitalize(kind.keyword()),
        TypeRef::Declared {
            args,
            ..
        } => {
            let base = capitalize(&type_ref.simple_name());
            if args.is_empty() {
                base
            } else {
                let args: Vec<String> = args.iter().map(type_fragment).collect();
                format!("{base}Of{}", args.join("And"))
            }
        }
        TypeRef::Wildcard(None) => "Any".to_string(),
        TypeRef::Wildcard(Some(bound)) => match bound.as_ref() {
            WildcardBound::Extends(t) => format!("Extends{}", type_fragment(t)),
            WildcardBound::Super(t) => format!("Super{}", type_fragment(t)),
        },
        TypeRef::Array(component) => format!("{}Array", type_fragment(component)),
    }
}

/// The provider method name for one representation.
pub fn provider_method_name(
    prefix: &str,
    name: &str,
    type_ref: &TypeRef,
    default_value: Option<&str>,
) -> String {
    let mut method = format!("provide{prefix}{}", upper_camel(name));
    if !type_ref.is_string() {
        method.push_str("As");
        method.push_str(&type_fragment(type_ref));
    }
    if let Some(default) = default_value {
        method.push_str("WithDefault");
        method.push_str(&short_signature(default));
    }
    method
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_camel() {
        assert_eq!(upper_camel("DATABASE_URL"), "DatabaseUrl");
        assert_eq!(upper_camel("database.url"), "DatabaseUrl");
        assert_eq!(upper_camel("/prod/db-password"), "ProdDbPassword");
        assert_eq!(upper_camel("PORT"), "Port");
        assert_eq!(upper_camel("__X__"), "X");
        assert_eq!(upper_camel(""), "");
    }

    #[test]
    fn test_short_signature_is_stable() {
        // sha256("hello") = 2cf24dba5fb0a30e...
        assert_eq!(short_signature("hello"), "2cf24dba");
        assert_eq!(short_signature("hello"), short_signature("hello"));
        assert_ne!(short_signature("8080"), short_signature("8081"));
        assert_eq!(short_signature("").len(), SIGNATURE_HEX_LEN);
    }

    #[test]
    fn test_type_fragment() {
        let cases = [
            ("int", "Int"),
            ("java.lang.Integer", "Integer"),
            ("java.math.BigDecimal", "BigDecimal"),
            ("java.util.List<java.lang.Integer>", "ListOfInteger"),
            ("java.util.Map<java.lang.String, java.lang.Long>", "MapOfStringAndLong"),
            ("byte[]", "ByteArray"),
        ];
        for (text, fragment) in cases {
            assert_eq!(type_fragment(&TypeRef::parse(text).unwrap()), fragment);
        }
    }

    #[test]
    fn test_provider_method_name() {
        let string = TypeRef::string();
        let int = TypeRef::parse("int").unwrap();

        assert_eq!(provider_method_name("Env", "DATABASE_URL", &string, None), "provideEnvDatabaseUrl");
        assert_eq!(provider_method_name("Env", "PORT", &int, None), "provideEnvPortAsInt");
        assert_eq!(
            provider_method_name("Sys", "app.port", &int, Some("hello")),
            "provideSysAppPortAsIntWithDefault2cf24dba"
        );
    }
}
