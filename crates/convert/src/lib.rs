//! # tether-convert
//!
//! Converts single values to and from their canonical string form.
//!
//! A [`ConverterRegistry`] binds [`ValueType`]s to [`StringConverter`]s and
//! resolves them on demand: exact bindings first, then types that convert
//! themselves, then converters bound under an abstract supertype, and finally
//! the shared enum converter.
//!
//! ```
//! use tether_convert::{ConverterRegistry, Value, ValueType};
//!
//! let registry = ConverterRegistry::with_builtins();
//!
//! let instant = registry
//!     .as_object(Some("-0043-03-15T00:00:00Z"), &ValueType::DateTime)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(
//!     registry.as_string(Some(&instant)).unwrap().as_deref(),
//!     Some("-0043-03-15T00:00:00Z")
//! );
//!
//! assert_eq!(
//!     registry.as_object(Some("1e3"), &ValueType::I16).unwrap(),
//!     Some(Value::I16(1000))
//! );
//! ```

pub mod converter;
pub mod converters;
pub mod error;
pub mod registry;
pub mod scalar;
pub mod typed;
pub mod types;
pub mod value;

pub use converter::{ConverterProvider, StringConverter};
pub use error::{ConvertError, ConvertResult};
pub use registry::{ConverterRegistry, RegistryStats, TypeCatalog};
pub use scalar::{Charset, Locale};
pub use typed::Convertible;
pub use types::{
    AbstractType, ConverterFactory, ConvertibleEnum, CustomType, CustomTypeBuilder, EnumType,
    TypeKey, ValueType,
};
pub use value::{CustomValue, EnumValue, Value, custom_eq};
