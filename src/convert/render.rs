use super::{Conversion, ConversionResolver};
use crate::constants::EMPTY_CHAR_MESSAGE;
use crate::model::{GraphModel, PrimitiveKind, TypeRef};

/// Lowers a [`Conversion`] into source text for one backend.
pub trait ConversionRenderer {
    /// An expression converting `value` according to `conversion`.
    fn render(&self, conversion: &Conversion, value: &str) -> String;
}

/// Renders conversions as Java expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaRenderer;

impl JavaRenderer {
    fn type_name(target: &TypeRef) -> String {
        target.erasure_name().map_or_else(|| target.to_string(), str::to_string)
    }

    fn parse_primitive(kind: PrimitiveKind, value: &str) -> String {
        match kind {
            PrimitiveKind::Boolean => format!("Boolean.parseBoolean({value})"),
            PrimitiveKind::Byte => format!("Byte.parseByte({value})"),
            PrimitiveKind::Short => format!("Short.parseShort({value})"),
            PrimitiveKind::Int => format!("Integer.parseInt({value})"),
            PrimitiveKind::Long => format!("Long.parseLong({value})"),
            PrimitiveKind::Float => format!("Float.parseFloat({value})"),
            PrimitiveKind::Double => format!("Double.parseDouble({value})"),
            PrimitiveKind::Char => format!(
                "((java.util.function.Function<String, Character>) s -> {{ \
                 if (s.isEmpty()) throw new IllegalArgumentException(\"{EMPTY_CHAR_MESSAGE}\"); \
                 return s.charAt(0); }}).apply({value})"
            ),
        }
    }

    fn render_at(&self, conversion: &Conversion, value: &str, depth: usize) -> String {
        match conversion {
            Conversion::Identity => value.to_string(),
            Conversion::ParsePrimitive {
                primitive,
            } => Self::parse_primitive(*primitive, value),
            Conversion::ValueOf {
                target,
            } => format!("{}.valueOf({value})", Self::type_name(target)),
            Conversion::FromString {
                target,
            } => format!("{}.fromString({value})", Self::type_name(target)),
            Conversion::Constructor {
                target,
            } => format!("new {}({value})", Self::type_name(target)),
            Conversion::EachElement {
                element,
                ..
            } => {
                let item = format!("e{depth}");
                let caught = format!("x{depth}");
                let converted = self.render_at(element, &item, depth + 1);
                format!(
                    "{value}.stream().map({item} -> {{ try {{ return {converted}; }} \
                     catch (RuntimeException {caught}) {{ throw {caught}; }} \
                     catch (Exception {caught}) {{ throw new IllegalArgumentException({caught}); }} }})\
                     .collect(java.util.stream.Collectors.toList())"
                )
            }
        }
    }
}

impl ConversionRenderer for JavaRenderer {
    fn render(&self, conversion: &Conversion, value: &str) -> String {
        self.render_at(conversion, value, 0)
    }
}

/// A Java expression converting `value` of type `source` to `target`, if
/// any strategy of the default chain applies.
pub fn generate_conversion_expr(
    model: &GraphModel,
    target: &TypeRef,
    source: &TypeRef,
    value: &str,
) -> Option<String> {
    let conversion = ConversionResolver::new(model).resolve(target, source)?;
    Some(JavaRenderer.render(&conversion, value))
}
