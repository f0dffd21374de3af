//! Name template parsing.
//!
//! Qualifier names may embed variable expressions that are expanded before the
//! names are grouped into parameters. This module implements the template
//! grammar and streams the segments it finds into a caller-supplied
//! [`TemplateHandler`]:
//!
//! - literal text runs
//! - `${NAME}` variable expressions
//! - `${NAME:-default}` variable expressions with a default value
//!
//! A `$` that is not followed by `{` is ordinary text. Parsing stops at the
//! first syntax error; no partial recovery is attempted.
//!
//! # Examples
//!
//! ```rust
//! use provgen::template::{TemplateEvent, tokenize};
//!
//! let events = tokenize("db.${env.STAGE:-dev}.url").unwrap();
//! assert_eq!(
//!     events,
//!     vec![
//!         TemplateEvent::Text { offset: 0, text: "db.".into() },
//!         TemplateEvent::VariableWithDefault {
//!             offset: 3,
//!             name: "env.STAGE".into(),
//!             default_value: "dev".into(),
//!         },
//!         TemplateEvent::Text { offset: 20, text: ".url".into() },
//!     ]
//! );
//! ```

mod expander;

pub use expander::{NameExpander, expand_name};

use thiserror::Error;

/// Message reported when `${` has no matching `}`.
pub const UNCLOSED_VARIABLE_EXPRESSION: &str = "Unclosed variable expression";

/// Message reported for a `:` operator other than `:-`.
pub const INVALID_VARIABLE_EXPRESSION: &str = "Invalid variable expression";

/// A malformed name template.
///
/// `offset` is the byte offset of the `$` that opens the offending expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at offset {offset}")]
pub struct TemplateSyntaxError {
    /// Human-readable description of the problem
    pub message: String,
    /// Byte offset into the template
    pub offset: usize,
}

impl TemplateSyntaxError {
    fn new(message: &str, offset: usize) -> Self {
        Self {
            message: message.to_string(),
            offset,
        }
    }
}

/// Receives template segments in source order.
///
/// Every callback gets the byte offset at which its segment starts. Handlers
/// may fail; the first handler error aborts parsing and is returned from
/// [`parse_with`].
pub trait TemplateHandler {
    /// Error type produced by the handler.
    type Error: From<TemplateSyntaxError>;

    /// A literal text run.
    fn on_text(&mut self, offset: usize, text: &str) -> Result<(), Self::Error>;

    /// A `${NAME}` expression.
    fn on_variable_expression(&mut self, offset: usize, name: &str) -> Result<(), Self::Error>;

    /// A `${NAME:-default}` expression.
    fn on_variable_expression_with_default_value(
        &mut self,
        offset: usize,
        name: &str,
        default_value: &str,
    ) -> Result<(), Self::Error>;
}

/// One parsed template segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateEvent {
    /// Literal text
    Text {
        offset: usize,
        text: String,
    },
    /// `${NAME}`
    Variable {
        offset: usize,
        name: String,
    },
    /// `${NAME:-default}`
    VariableWithDefault {
        offset: usize,
        name: String,
        default_value: String,
    },
}

/// Handler that records every event it receives.
#[derive(Debug, Default)]
pub struct EventCollector {
    pub events: Vec<TemplateEvent>,
}

impl TemplateHandler for EventCollector {
    type Error = TemplateSyntaxError;

    fn on_text(&mut self, offset: usize, text: &str) -> Result<(), Self::Error> {
        self.events.push(TemplateEvent::Text {
            offset,
            text: text.to_string(),
        });
        Ok(())
    }

    fn on_variable_expression(&mut self, offset: usize, name: &str) -> Result<(), Self::Error> {
        self.events.push(TemplateEvent::Variable {
            offset,
            name: name.to_string(),
        });
        Ok(())
    }

    fn on_variable_expression_with_default_value(
        &mut self,
        offset: usize,
        name: &str,
        default_value: &str,
    ) -> Result<(), Self::Error> {
        self.events.push(TemplateEvent::VariableWithDefault {
            offset,
            name: name.to_string(),
            default_value: default_value.to_string(),
        });
        Ok(())
    }
}

/// Parse `template`, reporting segments to `handler`.
pub fn parse_with<H: TemplateHandler>(template: &str, handler: &mut H) -> Result<(), H::Error> {
    let bytes = template.as_bytes();

    if bytes.is_empty() {
        return handler.on_text(0, "");
    }

    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' || bytes.get(i + 1) != Some(&b'{') {
            i += 1;
            continue;
        }

        if text_start < i {
            handler.on_text(text_start, &template[text_start..i])?;
        }

        let expression_start = i;
        let name_start = i + 2;
        let mut j = name_start;
        while j < bytes.len() && bytes[j] != b':' && bytes[j] != b'}' {
            j += 1;
        }

        if j == bytes.len() {
            return Err(TemplateSyntaxError::new(UNCLOSED_VARIABLE_EXPRESSION, expression_start)
                .into());
        }

        let name = &template[name_start..j];

        if bytes[j] == b'}' {
            handler.on_variable_expression(expression_start, name)?;
            i = j + 1;
        } else {
            // `:` must be followed by `-`
            if bytes.get(j + 1) != Some(&b'-') {
                return Err(TemplateSyntaxError::new(INVALID_VARIABLE_EXPRESSION, expression_start)
                    .into());
            }

            let default_start = j + 2;
            let Some(close) = template[default_start..].find('}') else {
                return Err(TemplateSyntaxError::new(
                    UNCLOSED_VARIABLE_EXPRESSION,
                    expression_start,
                )
                .into());
            };
            let default_end = default_start + close;

            handler.on_variable_expression_with_default_value(
                expression_start,
                name,
                &template[default_start..default_end],
            )?;
            i = default_end + 1;
        }

        text_start = i;
    }

    if text_start < bytes.len() {
        handler.on_text(text_start, &template[text_start..])?;
    }

    Ok(())
}

/// Parse `template` into a list of events.
pub fn tokenize(template: &str) -> Result<Vec<TemplateEvent>, TemplateSyntaxError> {
    let mut collector = EventCollector::default();
    parse_with(template, &mut collector)?;
    Ok(collector.events)
}

/// Whether `template` contains at least one `${` expression opener.
pub fn has_expressions(template: &str) -> bool {
    template.contains("${")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(offset: usize, text: &str) -> TemplateEvent {
        TemplateEvent::Text {
            offset,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_plain_text_is_single_event() {
        let events = tokenize("hello world").unwrap();
        assert_eq!(events, vec![text(0, "hello world")]);
    }

    #[test]
    fn test_empty_template_yields_empty_text() {
        let events = tokenize("").unwrap();
        assert_eq!(events, vec![text(0, "")]);
    }

    #[test]
    fn test_mixed_template() {
        let events = tokenize("hello ${WORLD} ${STUFF:-default value} foobar").unwrap();
        assert_eq!(
            events,
            vec![
                text(0, "hello "),
                TemplateEvent::Variable {
                    offset: 6,
                    name: "WORLD".to_string(),
                },
                text(14, " "),
                TemplateEvent::VariableWithDefault {
                    offset: 15,
                    name: "STUFF".to_string(),
                    default_value: "default value".to_string(),
                },
                text(38, " foobar"),
            ]
        );
    }

    #[test]
    fn test_unclosed_expression() {
        let err = tokenize("hello ${WORLD").unwrap_err();
        assert_eq!(err.message, "Unclosed variable expression");
        assert_eq!(err.offset, 6);
    }

    #[test]
    fn test_unclosed_default_value() {
        let err = tokenize("hello ${WORLD:-oops").unwrap_err();
        assert_eq!(err.message, UNCLOSED_VARIABLE_EXPRESSION);
        assert_eq!(err.offset, 6);
    }

    #[test]
    fn test_invalid_colon_operators() {
        for template in ["hello ${WORLD:} foobar", "hello ${WORLD:+} foobar", "hello ${WORLD:"] {
            let err = tokenize(template).unwrap_err();
            assert_eq!(err.message, "Invalid variable expression", "template: {template}");
            assert_eq!(err.offset, 6, "template: {template}");
        }
    }

    #[test]
    fn test_bare_dollar_is_text() {
        let events = tokenize("hello $WORLD $STUFF foobar").unwrap();
        let joined: String = events
            .iter()
            .map(|e| match e {
                TemplateEvent::Text {
                    text,
                    ..
                } => text.as_str(),
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(joined, "hello $WORLD $STUFF foobar");
    }

    #[test]
    fn test_trailing_dollar() {
        let events = tokenize("price$").unwrap();
        assert_eq!(events, vec![text(0, "price$")]);
    }

    #[test]
    fn test_adjacent_expressions() {
        let events = tokenize("${A}${B:-x}").unwrap();
        assert_eq!(
            events,
            vec![
                TemplateEvent::Variable {
                    offset: 0,
                    name: "A".to_string(),
                },
                TemplateEvent::VariableWithDefault {
                    offset: 4,
                    name: "B".to_string(),
                    default_value: "x".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_default_value_may_contain_colons() {
        let events = tokenize("${URL:-http://localhost:8080}").unwrap();
        assert_eq!(
            events,
            vec![TemplateEvent::VariableWithDefault {
                offset: 0,
                name: "URL".to_string(),
                default_value: "http://localhost:8080".to_string(),
            }]
        );
    }

    #[test]
    fn test_error_display_includes_offset() {
        let err = tokenize("x ${Y").unwrap_err();
        assert_eq!(err.to_string(), "Unclosed variable expression at offset 2");
    }
}
