//! Value types <-> canonical type names
use std::sync::Arc;

use crate::converter::StringConverter;
use crate::error::{ConvertError, ConvertResult};
use crate::registry::TypeCatalog;
use crate::types::ValueType;
use crate::value::Value;

/// Resolves dotted type names through a [`TypeCatalog`].
///
/// Lenient: a name the catalog does not know decodes to `None` rather than
/// an error.
#[derive(Debug, Clone)]
pub struct TypeNameConverter {
    catalog: Arc<TypeCatalog>,
}

impl TypeNameConverter {
    #[must_use]
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self { catalog }
    }
}

impl StringConverter for TypeNameConverter {
    fn name(&self) -> &'static str {
        "type"
    }

    fn to_string(&self, value: &Value) -> ConvertResult<String> {
        match value {
            Value::TypeName(ty) => Ok(ty.name().to_string()),
            other => Err(ConvertError::unsupported(
                self.name(),
                other.value_type().name(),
            )),
        }
    }

    fn from_string(&self, text: &str, target: &ValueType) -> ConvertResult<Option<Value>> {
        if *target != ValueType::TypeName {
            return Err(ConvertError::unsupported(self.name(), target.name()));
        }
        if text.is_empty() {
            return Ok(None);
        }
        let found = self.catalog.lookup(text);
        if found.is_none() {
            tracing::trace!(type_name = text, "unknown type name");
        }
        Ok(found.map(Value::TypeName))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> TypeNameConverter {
        TypeNameConverter::new(Arc::new(TypeCatalog::with_builtins()))
    }

    #[test]
    fn test_known_names_round_trip() {
        let converter = converter();
        let value = converter
            .from_string("datetime", &ValueType::TypeName)
            .unwrap();
        assert_eq!(value, Some(Value::TypeName(ValueType::DateTime)));
        assert_eq!(
            converter.to_string(&Value::TypeName(ValueType::number())).unwrap(),
            "number"
        );
    }

    #[test]
    fn test_unknown_and_empty_are_absent() {
        let converter = converter();
        assert_eq!(
            converter.from_string("geo.Point", &ValueType::TypeName).unwrap(),
            None
        );
        assert_eq!(converter.from_string("", &ValueType::TypeName).unwrap(), None);
    }
}
