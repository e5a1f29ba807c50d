//! In-memory values
use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use url::Url;

use crate::scalar::{Charset, Locale};
use crate::types::{ConvertibleEnum, CustomType, EnumType, ValueType};

/// A user-defined value carried by [`Value::Custom`].
///
/// Implementations describe their runtime type and support equality across
/// the trait object boundary; [`custom_eq`] implements the latter for any
/// `PartialEq` type.
pub trait CustomValue: fmt::Debug + Send + Sync + 'static {
    /// Runtime type of this value.
    fn custom_type(&self) -> CustomType;

    fn as_any(&self) -> &dyn Any;

    /// Equality against another custom value of any type.
    fn eq_value(&self, other: &dyn CustomValue) -> bool;
}

/// `eq_value` for custom values that implement `PartialEq`.
pub fn custom_eq<T: PartialEq + 'static>(this: &T, other: &dyn CustomValue) -> bool {
    other
        .as_any()
        .downcast_ref::<T>()
        .is_some_and(|other| other == this)
}

/// One constant of an enumeration.
#[derive(Clone, PartialEq, Eq)]
pub struct EnumValue {
    ty: EnumType,
    index: usize,
}

impl EnumValue {
    /// Constant at `index`, or `None` when out of range.
    pub fn new(ty: EnumType, index: usize) -> Option<Self> {
        (index < ty.len()).then_some(Self { ty, index })
    }

    /// Wrap a Rust enum constant.
    pub fn from_variant<E: ConvertibleEnum>(variant: E) -> Option<Self> {
        Self::new(E::enum_type(), variant.ordinal()?)
    }

    pub fn enum_type(&self) -> &EnumType {
        &self.ty
    }

    /// Declaration index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Constant name.
    pub fn name(&self) -> &str {
        self.ty.constant(self.index).unwrap_or_default()
    }

    /// Back to the Rust enum, if this constant belongs to `E`.
    pub fn to_variant<E: ConvertibleEnum>(&self) -> Option<E> {
        if !self.ty.is::<E>() {
            return None;
        }
        E::variants().get(self.index).copied()
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.ty.name(), self.name())
    }
}

/// A single atomic value.
#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    DateTime(DateTime<Utc>),
    TypeName(ValueType),
    Locale(Locale),
    TimeZone(Tz),
    Charset(Charset),
    Uri(Url),
    Path(PathBuf),
    Enum(EnumValue),
    Custom(Arc<dyn CustomValue>),
}

impl Value {
    /// Wrap a custom value.
    pub fn custom<T: CustomValue>(value: T) -> Self {
        Self::Custom(Arc::new(value))
    }

    /// Runtime type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Text(_) => ValueType::Text,
            Self::Bool(_) => ValueType::Bool,
            Self::Char(_) => ValueType::Char,
            Self::I8(_) => ValueType::I8,
            Self::I16(_) => ValueType::I16,
            Self::I32(_) => ValueType::I32,
            Self::I64(_) => ValueType::I64,
            Self::F32(_) => ValueType::F32,
            Self::F64(_) => ValueType::F64,
            Self::DateTime(_) => ValueType::DateTime,
            Self::TypeName(_) => ValueType::TypeName,
            Self::Locale(_) => ValueType::Locale,
            Self::TimeZone(_) => ValueType::TimeZone,
            Self::Charset(_) => ValueType::Charset,
            Self::Uri(_) => ValueType::Uri,
            Self::Path(_) => ValueType::Path,
            Self::Enum(v) => ValueType::Enum(v.enum_type().clone()),
            Self::Custom(v) => ValueType::Custom(v.custom_type()),
        }
    }

    /// Borrow a custom value as its concrete type.
    pub fn downcast_custom<T: CustomValue>(&self) -> Option<&T> {
        match self {
            Self::Custom(v) => v.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::TypeName(a), Self::TypeName(b)) => a == b,
            (Self::Locale(a), Self::Locale(b)) => a == b,
            (Self::TimeZone(a), Self::TimeZone(b)) => a == b,
            (Self::Charset(a), Self::Charset(b)) => a == b,
            (Self::Uri(a), Self::Uri(b)) => a == b,
            (Self::Path(a), Self::Path(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => a.eq_value(&**b),
            _ => false,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Self::Enum(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Suit {
        Hearts,
        Spades,
    }

    impl ConvertibleEnum for Suit {
        const TYPE_NAME: &'static str = "cards.Suit";

        fn variants() -> &'static [Self] {
            &[Self::Hearts, Self::Spades]
        }

        fn name(self) -> &'static str {
            match self {
                Self::Hearts => "Hearts",
                Self::Spades => "Spades",
            }
        }
    }

    #[test]
    fn test_enum_value_round_trips_through_variant() {
        let value = EnumValue::from_variant(Suit::Spades).unwrap();
        assert_eq!(value.index(), 1);
        assert_eq!(value.name(), "Spades");
        assert_eq!(value.to_variant::<Suit>(), Some(Suit::Spades));
        assert_eq!(format!("{value:?}"), "cards.Suit::Spades");
    }

    #[test]
    fn test_enum_value_rejects_out_of_range_index() {
        assert!(EnumValue::new(Suit::enum_type(), 2).is_none());
    }

    #[test]
    fn test_variant_of_other_enum_is_not_recovered() {
        let dynamic = EnumType::dynamic("cards.Suit", ["Hearts", "Spades"], false);
        let value = EnumValue::new(dynamic, 0).unwrap();
        assert_eq!(value.to_variant::<Suit>(), None);
    }

    #[test]
    fn test_value_type_of_builtins() {
        assert_eq!(Value::I64(1).value_type(), ValueType::I64);
        assert_eq!(Value::from("x").value_type(), ValueType::Text);
        assert_ne!(Value::I32(1), Value::I64(1));
    }
}
