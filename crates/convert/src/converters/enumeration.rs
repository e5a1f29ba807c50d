//! Enum constants <-> name or declaration index
use crate::converter::StringConverter;
use crate::error::{ConvertError, ConvertResult};
use crate::types::{EnumType, ValueType};
use crate::value::{EnumValue, Value};

/// Shared fallback converter for every enumeration.
///
/// The encoding mode comes from the [`EnumType`](crate::EnumType) itself:
/// nominal enums use the exact constant name, ordinal enums the decimal
/// declaration index.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumConverter;

fn parse_ordinal(text: &str) -> ConvertResult<usize> {
    if let Some(bad) = text.bytes().position(|b| !b.is_ascii_digit()) {
        return Err(ConvertError::conversion(text, "expected a declaration index").at(bad));
    }
    text.parse()
        .map_err(|_| ConvertError::conversion(text, "declaration index out of range").at(0))
}

impl StringConverter for EnumConverter {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn to_string(&self, value: &Value) -> ConvertResult<String> {
        match value {
            Value::Enum(constant) if constant.enum_type().is_ordinal() => {
                Ok(constant.index().to_string())
            }
            Value::Enum(constant) => Ok(constant.name().to_string()),
            other => Err(ConvertError::unsupported(
                self.name(),
                other.value_type().name(),
            )),
        }
    }

    fn from_string(&self, text: &str, target: &ValueType) -> ConvertResult<Option<Value>> {
        let ValueType::Enum(ty) = target else {
            return Err(ConvertError::unsupported(self.name(), target.name()));
        };
        if text.is_empty() {
            return Ok(None);
        }

        decode(ty, text)
            .map(|constant| Some(Value::Enum(constant)))
            .map_err(|e| e.with_context(text, ty.name()))
    }
}

fn decode(ty: &EnumType, text: &str) -> ConvertResult<EnumValue> {
    let index = if ty.is_ordinal() {
        parse_ordinal(text)?
    } else {
        ty.index_of(text)
            .ok_or_else(|| ConvertError::conversion(text, "unknown constant"))?
    };
    EnumValue::new(ty.clone(), index).ok_or_else(|| {
        ConvertError::conversion(
            text,
            format!("index out of range for {} constants", ty.len()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConvertibleEnum;
    use rstest::rstest;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Priority {
        Low,
        Normal,
        High,
    }

    impl ConvertibleEnum for Priority {
        const TYPE_NAME: &'static str = "jobs.Priority";
        const ORDINAL: bool = true;

        fn variants() -> &'static [Self] {
            &[Self::Low, Self::Normal, Self::High]
        }

        fn name(self) -> &'static str {
            match self {
                Self::Low => "Low",
                Self::Normal => "Normal",
                Self::High => "High",
            }
        }
    }

    fn colors() -> EnumType {
        EnumType::dynamic("shop.Color", ["Red", "Green", "Blue"], false)
    }

    #[test]
    fn test_nominal_round_trip() {
        let ty = colors();
        let target = ValueType::Enum(ty.clone());
        let decoded = EnumConverter.from_string("Green", &target).unwrap().unwrap();
        assert_eq!(decoded, Value::Enum(EnumValue::new(ty, 1).unwrap()));
        assert_eq!(EnumConverter.to_string(&decoded).unwrap(), "Green");
    }

    #[rstest]
    #[case("green")]
    #[case("Purple")]
    #[case(" Red")]
    fn test_nominal_unknown_name_is_an_error(#[case] text: &str) {
        let err = EnumConverter
            .from_string(text, &ValueType::Enum(colors()))
            .unwrap_err();
        assert!(err.is_conversion());
        assert!(err.to_string().contains("shop.Color"));
    }

    #[test]
    fn test_ordinal_round_trips_every_constant() {
        let target = ValueType::Enum(Priority::enum_type());
        for variant in Priority::variants() {
            let value = Value::Enum(EnumValue::from_variant(*variant).unwrap());
            let text = EnumConverter.to_string(&value).unwrap();
            let back = EnumConverter.from_string(&text, &target).unwrap();
            assert_eq!(back, Some(value));
        }
    }

    #[rstest]
    #[case("3", None)]
    #[case("-1", Some(0))]
    #[case("High", Some(0))]
    #[case("1x", Some(1))]
    #[case("99999999999999999999999", Some(0))]
    fn test_ordinal_rejects_bad_index(#[case] text: &str, #[case] offset: Option<usize>) {
        let err = EnumConverter
            .from_string(text, &ValueType::Enum(Priority::enum_type()))
            .unwrap_err();
        assert!(err.is_conversion());
        assert_eq!(err.position(), offset);
    }

    #[test]
    fn test_empty_is_absent_in_both_modes() {
        assert_eq!(
            EnumConverter
                .from_string("", &ValueType::Enum(colors()))
                .unwrap(),
            None
        );
        assert_eq!(
            EnumConverter
                .from_string("", &ValueType::Enum(Priority::enum_type()))
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_non_enum_target_is_unsupported() {
        assert!(EnumConverter
            .from_string("Red", &ValueType::Text)
            .unwrap_err()
            .is_unsupported());
    }
}
