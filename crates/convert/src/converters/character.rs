//! `char` <-> one-character string
use crate::converter::StringConverter;
use crate::error::{ConvertError, ConvertResult};
use crate::types::ValueType;
use crate::value::Value;

/// Single Unicode scalar value. Empty text is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharConverter;

impl StringConverter for CharConverter {
    fn name(&self) -> &'static str {
        "char"
    }

    fn to_string(&self, value: &Value) -> ConvertResult<String> {
        match value {
            Value::Char(c) => Ok(c.to_string()),
            other => Err(ConvertError::unsupported(
                self.name(),
                other.value_type().name(),
            )),
        }
    }

    fn from_string(&self, text: &str, target: &ValueType) -> ConvertResult<Option<Value>> {
        if *target != ValueType::Char {
            return Err(ConvertError::unsupported(self.name(), target.name()));
        }
        let mut chars = text.char_indices();
        let Some((_, c)) = chars.next() else {
            return Ok(None);
        };
        if let Some((offset, _)) = chars.next() {
            return Err(ConvertError::conversion(text, "expected a single character").at(offset));
        }
        Ok(Some(Value::Char(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_character() {
        assert_eq!(
            CharConverter.from_string("é", &ValueType::Char).unwrap(),
            Some(Value::Char('é'))
        );
        assert_eq!(CharConverter.to_string(&Value::Char('x')).unwrap(), "x");
    }

    #[test]
    fn test_empty_is_absent() {
        assert_eq!(CharConverter.from_string("", &ValueType::Char).unwrap(), None);
    }

    #[test]
    fn test_multiple_characters_rejected_at_second() {
        let err = CharConverter.from_string("éx", &ValueType::Char).unwrap_err();
        assert!(err.is_conversion());
        // 'é' is two bytes long.
        assert_eq!(err.position(), Some(2));
    }
}
