//! `bool` <-> `true` / `false`
use crate::converter::StringConverter;
use crate::error::{ConvertError, ConvertResult};
use crate::types::ValueType;
use crate::value::Value;

/// Tokens decoded as `true`, compared ASCII case-insensitively.
const TRUTHY: [&str; 4] = ["true", "yes", "1", "on"];

/// Boolean converter.
///
/// Decoding is total: any text that is not a truthy token, the empty string
/// included, is `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl StringConverter for BooleanConverter {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn to_string(&self, value: &Value) -> ConvertResult<String> {
        match value {
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(ConvertError::unsupported(
                self.name(),
                other.value_type().name(),
            )),
        }
    }

    fn from_string(&self, text: &str, target: &ValueType) -> ConvertResult<Option<Value>> {
        if *target != ValueType::Bool {
            return Err(ConvertError::unsupported(self.name(), target.name()));
        }
        let truthy = TRUTHY.iter().any(|t| t.eq_ignore_ascii_case(text));
        Ok(Some(Value::Bool(truthy)))
    }
}
