//! Canonical type names known to a registry
use dashmap::DashMap;

use crate::types::ValueType;

/// Directory of value types by canonical name.
///
/// Backs the `type` converter and [`ConverterRegistry::catalog`]. Every type
/// the registry binds or declares is recorded here.
///
/// [`ConverterRegistry::catalog`]: crate::ConverterRegistry::catalog
#[derive(Debug, Default)]
pub struct TypeCatalog {
    types: DashMap<String, ValueType>,
}

impl TypeCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding every built-in kind and the `number` abstract type.
    #[must_use]
    pub fn with_builtins() -> Self {
        let catalog = Self::new();
        for ty in &ValueType::BUILTINS {
            catalog.record(ty);
        }
        catalog.record(&ValueType::number());
        catalog
    }

    /// Record a type under its canonical name.
    ///
    /// A different type with the same name replaces the earlier one.
    pub fn record(&self, ty: &ValueType) {
        let name = ty.name().to_string();
        if let Some(previous) = self.types.insert(name, ty.clone())
            && previous != *ty
        {
            tracing::debug!(type_name = %ty, "type name now refers to a different type");
        }
    }

    /// Type registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<ValueType> {
        self.types.get(name).map(|entry| entry.value().clone())
    }

    /// Every known name, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EnumType;

    #[test]
    fn test_builtins_are_known() {
        let catalog = TypeCatalog::with_builtins();
        assert_eq!(catalog.lookup("i64"), Some(ValueType::I64));
        assert_eq!(catalog.lookup("number"), Some(ValueType::number()));
        assert_eq!(catalog.len(), ValueType::BUILTINS.len() + 1);
        assert!(catalog.names().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_later_record_wins() {
        let catalog = TypeCatalog::new();
        let first = ValueType::from(EnumType::dynamic("shop.Color", ["Red"], false));
        let second = ValueType::from(EnumType::dynamic("shop.Color", ["Red"], false));
        catalog.record(&first);
        catalog.record(&second);
        assert_eq!(catalog.lookup("shop.Color"), Some(second));
        assert_eq!(catalog.len(), 1);
    }
}
