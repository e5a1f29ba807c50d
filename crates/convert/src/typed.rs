//! Typed conveniences over the registry
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use url::Url;

use crate::error::{ConvertError, ConvertResult};
use crate::registry::ConverterRegistry;
use crate::scalar::{Charset, Locale};
use crate::types::{ConvertibleEnum, ValueType};
use crate::value::{EnumValue, Value};

/// A Rust type with a fixed [`ValueType`].
pub trait Convertible: Sized {
    fn value_type() -> ValueType;

    fn into_value(self) -> Value;

    /// Unwrap the matching variant.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_convertible {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Convertible for $ty {
                fn value_type() -> ValueType {
                    ValueType::$kind
                }

                fn into_value(self) -> Value {
                    Value::$kind(self)
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$kind(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_convertible! {
    String => Text,
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    DateTime<Utc> => DateTime,
    ValueType => TypeName,
    Locale => Locale,
    Tz => TimeZone,
    Charset => Charset,
    Url => Uri,
    PathBuf => Path,
}

fn mismatch(type_name: &str) -> ConvertError {
    ConvertError::unsupported("registry", type_name)
}

impl ConverterRegistry {
    /// Decode `text` as a `T`.
    ///
    /// ```
    /// use tether_convert::ConverterRegistry;
    ///
    /// let registry = ConverterRegistry::with_builtins();
    /// assert_eq!(registry.decode::<i32>("0x10").unwrap(), Some(16));
    /// assert_eq!(registry.decode::<bool>("yes").unwrap(), Some(true));
    /// ```
    pub fn decode<T: Convertible>(&self, text: &str) -> ConvertResult<Option<T>> {
        let target = T::value_type();
        match self.as_object(Some(text), &target)? {
            Some(value) => T::from_value(value)
                .map(Some)
                .ok_or_else(|| mismatch(target.name())),
            None => Ok(None),
        }
    }

    /// Encode a `T`.
    pub fn encode<T: Convertible>(&self, value: T) -> ConvertResult<String> {
        self.encode_value(&value.into_value())
    }

    /// Decode `text` as a constant of the Rust enum `E`.
    pub fn decode_enum<E: ConvertibleEnum>(&self, text: &str) -> ConvertResult<Option<E>> {
        let target = ValueType::Enum(E::enum_type());
        match self.as_object(Some(text), &target)? {
            Some(Value::Enum(constant)) => constant
                .to_variant::<E>()
                .map(Some)
                .ok_or_else(|| mismatch(E::TYPE_NAME)),
            Some(_) => Err(mismatch(E::TYPE_NAME)),
            None => Ok(None),
        }
    }

    /// Encode a constant of the Rust enum `E`.
    pub fn encode_enum<E: ConvertibleEnum>(&self, variant: E) -> ConvertResult<String> {
        let constant = EnumValue::from_variant(variant).ok_or_else(|| mismatch(E::TYPE_NAME))?;
        self.encode_value(&Value::Enum(constant))
    }
}
