//! Error types for value conversion
use thiserror::Error;

/// Result type for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors raised while converting values to and from strings.
///
/// Three kinds are kept apart so callers can tell bad data from a missing
/// binding from a defect in registration code:
/// - [`ConvertError::Conversion`]: the input text is malformed for the target.
/// - [`ConvertError::NoConverter`]: nothing is bound for the requested type.
/// - [`ConvertError::UnsupportedType`]: a converter was handed a value or a
///   target it can never produce. Not expected to be caught or retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// Malformed input for the target type
    #[error("cannot convert '{text}' to {target}: {reason}{}", position_suffix(.position))]
    Conversion {
        /// The offending text (or the rendered value when encoding)
        text: String,
        /// Canonical name of the target type
        target: String,
        /// Why the conversion failed
        reason: String,
        /// Byte offset of the first offending character, when known
        position: Option<usize>,
    },

    /// No converter is registered for the type
    #[error("no converter registered for type '{type_name}'")]
    NoConverter {
        /// Canonical name of the type
        type_name: String,
    },

    /// A converter received a type it does not handle
    #[error("converter '{converter}' does not support type '{type_name}'")]
    UnsupportedType {
        /// Name of the converter that rejected the type
        converter: &'static str,
        /// Canonical name of the rejected type
        type_name: String,
    },
}

fn position_suffix(position: &Option<usize>) -> String {
    position.map_or_else(String::new, |p| format!(" (at offset {p})"))
}

impl ConvertError {
    /// Malformed-input error without a target name yet.
    ///
    /// The registry fills in the target via [`ConvertError::with_context`]
    /// when the converter did not.
    pub fn conversion(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Conversion {
            text: text.into(),
            target: String::new(),
            reason: reason.into(),
            position: None,
        }
    }

    /// Missing-binding error.
    pub fn no_converter(type_name: impl Into<String>) -> Self {
        Self::NoConverter {
            type_name: type_name.into(),
        }
    }

    /// Programming-error signal for a converter/type mismatch.
    pub fn unsupported(converter: &'static str, type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            converter,
            type_name: type_name.into(),
        }
    }

    /// Attach a position hint to a conversion error.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn at(self, offset: usize) -> Self {
        match self {
            Self::Conversion {
                text,
                target,
                reason,
                ..
            } => Self::Conversion {
                text,
                target,
                reason,
                position: Some(offset),
            },
            other => other,
        }
    }

    /// Fill in the text and target of a conversion error if they are empty.
    ///
    /// Used by the registry so every conversion error that leaves it names
    /// both the input and the type it was converted against.
    #[must_use]
    pub fn with_context(self, text: &str, target: &str) -> Self {
        match self {
            Self::Conversion {
                text: own_text,
                target: own_target,
                reason,
                position,
            } => Self::Conversion {
                text: if own_text.is_empty() {
                    text.to_string()
                } else {
                    own_text
                },
                target: if own_target.is_empty() {
                    target.to_string()
                } else {
                    own_target
                },
                reason,
                position,
            },
            other => other,
        }
    }

    /// True for malformed-input errors.
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion { .. })
    }

    /// True when no converter was registered for the type.
    pub fn is_no_converter(&self) -> bool {
        matches!(self, Self::NoConverter { .. })
    }

    /// True for converter/type mismatches.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedType { .. })
    }

    /// Position hint of a conversion error.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Conversion { position, .. } => *position,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_conversion_message_with_position() {
        let err = ConvertError::conversion("12x", "unexpected character")
            .at(2)
            .with_context("ignored", "i32");
        assert_eq!(
            err.to_string(),
            "cannot convert '12x' to i32: unexpected character (at offset 2)"
        );
        assert_eq!(err.position(), Some(2));
        assert!(err.is_conversion());
    }

    #[test]
    fn test_context_does_not_override_converter_details() {
        let err = ConvertError::Conversion {
            text: "abc".into(),
            target: "locale".into(),
            reason: "bad".into(),
            position: None,
        }
        .with_context("other", "i64");

        match err {
            ConvertError::Conversion { text, target, .. } => {
                assert_eq!(text, "abc");
                assert_eq!(target, "locale");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_kinds_are_distinct() {
        let missing = ConvertError::no_converter("geo.Point");
        let defect = ConvertError::unsupported("numeric", "locale");

        assert!(missing.is_no_converter());
        assert!(!missing.is_conversion());
        assert!(defect.is_unsupported());
        assert_eq!(defect.at(3).position(), None);
        assert_eq!(
            missing.to_string(),
            "no converter registered for type 'geo.Point'"
        );
    }
}
