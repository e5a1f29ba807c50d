//! Built-in converters
//!
//! Each converter owns one grammar and holds no mutable state. The
//! [`BuiltinProvider`] binds them to their value types; the enum converter is
//! not part of it because the registry uses it as the fallback for every
//! enumeration.

mod boolean;
mod character;
mod datetime;
mod enumeration;
mod identifier;
mod numeric;
mod path;
mod type_name;

use std::sync::Arc;

pub use boolean::BooleanConverter;
pub use character::CharConverter;
pub use datetime::DateTimeConverter;
pub use enumeration::EnumConverter;
pub use identifier::{CharsetConverter, LocaleConverter, TimeZoneConverter, UriConverter};
pub use numeric::NumberConverter;
pub use path::PathConverter;
pub use type_name::TypeNameConverter;

use crate::converter::{ConverterProvider, StringConverter};
use crate::registry::TypeCatalog;
use crate::types::ValueType;

/// Bindings every registry built with
/// [`ConverterRegistry::with_builtins`](crate::ConverterRegistry::with_builtins)
/// starts from.
///
/// Numeric kinds are served by one converter bound under the `number`
/// abstract type.
#[derive(Debug, Clone)]
pub struct BuiltinProvider {
    catalog: Arc<TypeCatalog>,
}

impl BuiltinProvider {
    /// Provider whose type-name converter resolves through `catalog`.
    #[must_use]
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self { catalog }
    }
}

fn bind(
    ty: ValueType,
    converter: impl StringConverter + 'static,
) -> (ValueType, Arc<dyn StringConverter>) {
    (ty, Arc::new(converter))
}

impl ConverterProvider for BuiltinProvider {
    fn converters(&self) -> Vec<(ValueType, Arc<dyn StringConverter>)> {
        vec![
            bind(ValueType::Bool, BooleanConverter),
            bind(ValueType::Char, CharConverter),
            bind(ValueType::number(), NumberConverter),
            bind(ValueType::DateTime, DateTimeConverter),
            bind(
                ValueType::TypeName,
                TypeNameConverter::new(Arc::clone(&self.catalog)),
            ),
            bind(ValueType::Locale, LocaleConverter),
            bind(ValueType::TimeZone, TimeZoneConverter),
            bind(ValueType::Charset, CharsetConverter),
            bind(ValueType::Uri, UriConverter),
            bind(ValueType::Path, PathConverter),
        ]
    }
}
