//! Error handling for provgen
//!
//! This module provides the error types used across the generator and the
//! user-facing error reporting used by the CLI. Two layers exist:
//! 1. [`ProvgenError`] - strongly-typed failures raised by the library
//! 2. [`ErrorContext`] - wrapper that adds details and suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Structural**: the dependency-injection graph does not have the expected
//!   shape ([`ProvgenError::NotAComponent`], [`ProvgenError::NotAModule`],
//!   [`ProvgenError::MalformedQualifier`], ...). These abort the current
//!   component root.
//! - **Templates**: [`ProvgenError::TemplateSyntax`] and
//!   [`ProvgenError::UnresolvedVariable`] abort one name expansion.
//! - **Conversion**: [`ProvgenError::ConversionUnavailable`] and
//!   [`ProvgenError::ProviderNameCollision`] skip one provider.
//! - **Input**: model and configuration files that cannot be read or parsed.
//!
//! Conflicting nullability or requiredness across injection sites is never an
//! error; it is reported as a warning diagnostic (see [`crate::diagnostics`]).
//!
//! # Examples
//!
//! ```rust,no_run
//! use provgen::core::{ProvgenError, user_friendly_error};
//!
//! let error = ProvgenError::NotAModule {
//!     type_name: "com.example.Helper".to_string(),
//!     referenced_by: "com.example.AppComponent".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::template::TemplateSyntaxError;

/// The main error type for provgen operations
///
/// # Structural errors
/// - [`NotAComponent`] - walk root is not a component
/// - [`NotAModule`] - a module reference points at a non-module type
/// - [`UnknownType`] - a referenced component or module is missing from the model
/// - [`MalformedQualifier`] - a configuration qualifier lacks its name
/// - [`DuplicateQualifier`] - more than one qualifier on one injection site
/// - [`NullablePrimitive`] - a primitive injection site marked nullable
///
/// # Name and conversion errors
/// - [`TemplateSyntax`] - malformed name template
/// - [`UnresolvedVariable`] - a template variable has no value and no default
/// - [`ConversionUnavailable`] - no strategy converts the lookup value
/// - [`ProviderNameCollision`] - two representations map to one provider method name
///
/// [`NotAComponent`]: ProvgenError::NotAComponent
/// [`NotAModule`]: ProvgenError::NotAModule
/// [`UnknownType`]: ProvgenError::UnknownType
/// [`MalformedQualifier`]: ProvgenError::MalformedQualifier
/// [`DuplicateQualifier`]: ProvgenError::DuplicateQualifier
/// [`NullablePrimitive`]: ProvgenError::NullablePrimitive
/// [`TemplateSyntax`]: ProvgenError::TemplateSyntax
/// [`UnresolvedVariable`]: ProvgenError::UnresolvedVariable
/// [`ConversionUnavailable`]: ProvgenError::ConversionUnavailable
/// [`ProviderNameCollision`]: ProvgenError::ProviderNameCollision
#[derive(Error, Debug)]
pub enum ProvgenError {
    /// The walk root is not annotated as a component
    #[error("Type '{type_name}' is not a component")]
    NotAComponent {
        /// The type that was used as a walk root
        type_name: String,
    },

    /// A module reference points at a type that is not a module
    ///
    /// # Fields
    /// - `type_name`: the referenced type
    /// - `referenced_by`: the component or module holding the reference
    #[error("Type '{type_name}' referenced by '{referenced_by}' is not a module")]
    NotAModule {
        /// The referenced type
        type_name: String,
        /// The component or module holding the reference
        referenced_by: String,
    },

    /// A component or module reference names a type the model does not contain
    #[error("Type '{type_name}' referenced by '{referenced_by}' is not declared")]
    UnknownType {
        /// The missing type
        type_name: String,
        /// The declaration holding the reference
        referenced_by: String,
        /// Closest declared type name, if any
        suggestion: Option<String>,
    },

    /// A configuration qualifier does not carry a name
    #[error("Qualifier @{annotation} on {element} has no name")]
    MalformedQualifier {
        /// The qualifier annotation type
        annotation: String,
        /// The injection site element
        element: String,
    },

    /// More than one qualifier annotation on a single injection site
    #[error("Injection site {element} has more than one qualifier")]
    DuplicateQualifier {
        /// The injection site element
        element: String,
    },

    /// A primitive-typed injection site is explicitly marked nullable
    #[error("Injection site {element} has primitive type {type_name} but is marked nullable")]
    NullablePrimitive {
        /// The injection site element
        element: String,
        /// The primitive type
        type_name: String,
    },

    /// Malformed name template
    #[error("Invalid name template '{template}': {source}")]
    TemplateSyntax {
        /// The template text
        template: String,
        /// Parser error with offset
        #[source]
        source: TemplateSyntaxError,
    },

    /// A template variable could not be resolved
    #[error("Cannot resolve variable '{variable}': {reason}")]
    UnresolvedVariable {
        /// The variable expression name, e.g. `env.STAGE`
        variable: String,
        /// Why resolution failed
        reason: String,
    },

    /// No conversion exists from the lookup type to the requested type
    #[error("Cannot convert {source_type} to {target_type} for parameter '{name}'")]
    ConversionUnavailable {
        /// The qualifier name
        name: String,
        /// The lookup type
        source_type: String,
        /// The requested type
        target_type: String,
    },

    /// Two representations produce the same provider method name
    #[error("Provider method {method_name} for {representation} collides with {previous}")]
    ProviderNameCollision {
        /// The generated method name
        method_name: String,
        /// The representation that was skipped
        representation: String,
        /// The representation that kept the name
        previous: String,
    },

    /// A type reference could not be parsed
    #[error("Invalid type reference '{text}': {reason}")]
    InvalidTypeRef {
        /// The unparsed text
        text: String,
        /// Why parsing failed
        reason: String,
    },

    /// The dependency-injection model file is invalid
    #[error("Invalid model file {file}: {reason}")]
    ModelParseError {
        /// Path of the offending file
        file: String,
        /// Specific reason
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl ProvgenError {
    /// Whether this error indicates a malformed dependency graph.
    ///
    /// Structural errors abort the pass for the current component root.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::NotAComponent { .. }
                | Self::NotAModule { .. }
                | Self::UnknownType { .. }
                | Self::MalformedQualifier { .. }
                | Self::DuplicateQualifier { .. }
                | Self::NullablePrimitive { .. }
        )
    }
}

impl From<TemplateSyntaxError> for ProvgenError {
    fn from(source: TemplateSyntaxError) -> Self {
        Self::TemplateSyntax {
            template: String::new(),
            source,
        }
    }
}

impl Clone for ProvgenError {
    fn clone(&self) -> Self {
        match self {
            Self::NotAComponent {
                type_name,
            } => Self::NotAComponent {
                type_name: type_name.clone(),
            },
            Self::NotAModule {
                type_name,
                referenced_by,
            } => Self::NotAModule {
                type_name: type_name.clone(),
                referenced_by: referenced_by.clone(),
            },
            Self::UnknownType {
                type_name,
                referenced_by,
                suggestion,
            } => Self::UnknownType {
                type_name: type_name.clone(),
                referenced_by: referenced_by.clone(),
                suggestion: suggestion.clone(),
            },
            Self::MalformedQualifier {
                annotation,
                element,
            } => Self::MalformedQualifier {
                annotation: annotation.clone(),
                element: element.clone(),
            },
            Self::DuplicateQualifier {
                element,
            } => Self::DuplicateQualifier {
                element: element.clone(),
            },
            Self::NullablePrimitive {
                element,
                type_name,
            } => Self::NullablePrimitive {
                element: element.clone(),
                type_name: type_name.clone(),
            },
            Self::TemplateSyntax {
                template,
                source,
            } => Self::TemplateSyntax {
                template: template.clone(),
                source: source.clone(),
            },
            Self::UnresolvedVariable {
                variable,
                reason,
            } => Self::UnresolvedVariable {
                variable: variable.clone(),
                reason: reason.clone(),
            },
            Self::ConversionUnavailable {
                name,
                source_type,
                target_type,
            } => Self::ConversionUnavailable {
                name: name.clone(),
                source_type: source_type.clone(),
                target_type: target_type.clone(),
            },
            Self::ProviderNameCollision {
                method_name,
                representation,
                previous,
            } => Self::ProviderNameCollision {
                method_name: method_name.clone(),
                representation: representation.clone(),
                previous: previous.clone(),
            },
            Self::InvalidTypeRef {
                text,
                reason,
            } => Self::InvalidTypeRef {
                text: text.clone(),
                reason: reason.clone(),
            },
            Self::ModelParseError {
                file,
                reason,
            } => Self::ModelParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show the main message in red, optional details in
/// yellow and an optional suggestion in green.
///
/// ```rust,no_run
/// use provgen::core::{ErrorContext, ProvgenError};
///
/// let context = ErrorContext::new(ProvgenError::NotAComponent {
///     type_name: "com.example.Helper".to_string(),
/// })
/// .with_suggestion("Pass a type declared with kind = \"component\"");
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ProvgenError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestion or details.
    #[must_use]
    pub fn new(error: ProvgenError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining why the error occurred.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with suggestions
///
/// Recognizes [`ProvgenError`], [`std::io::Error`] and [`toml::de::Error`];
/// anything else keeps its full cause chain in the message.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(provgen_error) = error.downcast_ref::<ProvgenError>() {
        return create_error_context(provgen_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::NotFound {
            return ErrorContext::new(ProvgenError::Other {
                message: error_chain_message(&error),
            })
            .with_suggestion("Check that the model file or directory exists and the path is correct");
        }
    }

    if error.downcast_ref::<toml::de::Error>().is_some() {
        return ErrorContext::new(ProvgenError::Other {
            message: error_chain_message(&error),
        })
        .with_suggestion("Check the TOML syntax. Verify quotes, brackets, and table headers")
        .with_details("Model and configuration files are TOML documents");
    }

    ErrorContext::new(ProvgenError::Other {
        message: error_chain_message(&error),
    })
}

fn error_chain_message(error: &anyhow::Error) -> String {
    let mut message = error.to_string();

    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

/// Attach tailored suggestions to specific [`ProvgenError`] variants.
fn create_error_context(error: ProvgenError) -> ErrorContext {
    match &error {
        ProvgenError::NotAComponent {
            type_name,
        } => {
            let details = format!("'{type_name}' must be declared with kind = \"component\" to be walked");
            ErrorContext::new(error)
                .with_suggestion("Select component roots with --component, or fix the declaration's kind")
                .with_details(details)
        }

        ProvgenError::NotAModule {
            referenced_by,
            ..
        } => {
            let suggestion = format!("Remove the reference from '{referenced_by}' or declare the type with kind = \"module\"");
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Components and modules may only include types declared as modules")
        }

        ProvgenError::UnknownType {
            suggestion,
            ..
        } => {
            let hint = match suggestion {
                Some(name) => format!("Did you mean '{name}'?"),
                None => "Declare the type in the model file".to_string(),
            };
            ErrorContext::new(error).with_suggestion(hint)
        }

        ProvgenError::MalformedQualifier {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Add a `name` to the qualifier annotation")
            .with_details("Configuration qualifiers identify the external value by name"),

        ProvgenError::NullablePrimitive {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use the boxed type or java.util.Optional for nullable values"),

        ProvgenError::TemplateSyntax {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Variables use ${NAME} or ${NAME:-default}; a bare '$' is literal text"),

        _ => ErrorContext::new(error),
    }
}
