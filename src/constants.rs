//! Well-known names used throughout the provgen codebase.
//!
//! The generator targets a Java-style dependency-injection host, so the type
//! and annotation names it recognises are collected here instead of being
//! scattered as string literals.

/// The lookup type of every single-valued configuration domain.
pub const STRING_TYPE: &str = "java.lang.String";

/// The list type recognised for elementwise conversion.
pub const LIST_TYPE: &str = "java.util.List";

/// Wrapper that makes an injection site implicitly nullable.
pub const OPTIONAL_TYPE: &str = "java.util.Optional";

/// Provider wrappers, unwrapped to their type argument.
pub const PROVIDER_TYPES: &[&str] = &["javax.inject.Provider", "jakarta.inject.Provider"];

/// Lazy wrappers, unwrapped to their type argument.
pub const LAZY_TYPES: &[&str] = &["dagger.Lazy"];

/// Simple name of the annotation that marks a site explicitly nullable.
pub const NULLABLE_ANNOTATION: &str = "Nullable";

/// Name of the static factory tried by the `valueOf` conversion strategy.
pub const VALUE_OF_METHOD: &str = "valueOf";

/// Name of the static factory tried by the `fromString` conversion strategy.
pub const FROM_STRING_METHOD: &str = "fromString";

/// Number of hex characters kept from a default value's digest.
pub const SIGNATURE_HEX_LEN: usize = 8;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "PROVGEN_CONFIG";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "provgen.toml";

/// Message of the runtime failure when an empty string is converted to `char`.
pub const EMPTY_CHAR_MESSAGE: &str = "cannot convert empty string to char";

/// Name of the raw lookup value in rendered conversion expressions.
pub const LOOKUP_VALUE_EXPR: &str = "value";
