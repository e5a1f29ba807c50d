//! Converter registry: binds value types to converters and resolves them.

mod catalog;

pub use catalog::TypeCatalog;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, trace};

use crate::converter::{ConverterProvider, StringConverter};
use crate::converters::{BuiltinProvider, EnumConverter};
use crate::error::{ConvertError, ConvertResult};
use crate::types::{AbstractType, TypeKey, ValueType};
use crate::value::Value;

/// Name reported in errors raised by the registry itself.
const REGISTRY: &str = "registry";

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

/// Converter bound under an abstract type.
struct AbstractBinding {
    ty: AbstractType,
    converter: Arc<dyn StringConverter>,
}

/// Snapshot of registry counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Concrete types with a converter in the concrete map
    pub concrete_bindings: usize,
    /// Abstract types with a converter
    pub abstract_bindings: usize,
    /// Times the abstract map was scanned for a concrete type
    pub abstract_scans: u64,
    /// Self-converting types bound on first use
    pub self_bindings: u64,
}

// ---------------------------------------------------------------------------
// ConverterRegistry
// ---------------------------------------------------------------------------

/// Directory of string converters keyed by value type.
///
/// A concrete type resolves, in order, to:
/// 1. its entry in the concrete map;
/// 2. a fresh converter from its self-converter factory, bound permanently;
/// 3. the first abstract binding (in registration order) for one of its
///    supertypes, memoized into the concrete map;
/// 4. the shared enum converter, if it is an enumeration.
///
/// Lookups of bound types only read a shard of the concrete map. Steps 2 and
/// 3 run under a single bind lock and re-check the concrete map first, so a
/// type is bound at most once even when many threads race on it.
///
/// Share it with `Arc`; every method takes `&self`.
pub struct ConverterRegistry {
    concrete: DashMap<TypeKey, Arc<dyn StringConverter>>,
    abstracts: RwLock<IndexMap<TypeKey, AbstractBinding>>,
    /// Concrete keys memoized from an abstract binding, by abstract key
    derived: DashMap<TypeKey, TypeKey>,
    enum_fallback: Arc<dyn StringConverter>,
    catalog: Arc<TypeCatalog>,
    // Lock order: bind_lock, then abstracts, then map shards.
    bind_lock: Mutex<()>,
    abstract_scans: AtomicU64,
    self_bindings: AtomicU64,
}

impl ConverterRegistry {
    /// A registry with no bindings besides the enum fallback.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            concrete: DashMap::new(),
            abstracts: RwLock::new(IndexMap::new()),
            derived: DashMap::new(),
            enum_fallback: Arc::new(EnumConverter),
            catalog: Arc::new(TypeCatalog::with_builtins()),
            bind_lock: Mutex::new(()),
            abstract_scans: AtomicU64::new(0),
            self_bindings: AtomicU64::new(0),
        }
    }

    /// A registry pre-populated from [`BuiltinProvider`].
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::empty();
        registry.register_provider(&BuiltinProvider::new(Arc::clone(&registry.catalog)));
        registry
    }

    // -- registration -------------------------------------------------------

    /// Bind `converter` to `ty`.
    ///
    /// Concrete types go to the concrete map; a second binding replaces the
    /// first. Abstract types go to the abstract map and are only consulted
    /// when a concrete subtype is resolved. Replacing an abstract binding
    /// keeps its position in the scan order and drops every concrete
    /// binding memoized from the old converter.
    pub fn register(&self, ty: &ValueType, converter: Arc<dyn StringConverter>) {
        self.catalog.record(ty);
        let _guard = self.bind_lock.lock();
        match ty {
            ValueType::Abstract(abstract_ty) => self.register_abstract(abstract_ty, converter),
            concrete => self.register_concrete(concrete, converter),
        }
    }

    /// Bind the converter produced by `factory` to `ty`.
    pub fn register_with<F>(&self, ty: &ValueType, factory: F)
    where
        F: FnOnce() -> Arc<dyn StringConverter>,
    {
        self.register(ty, factory());
    }

    /// Apply every binding of `provider`, in order.
    pub fn register_provider(&self, provider: &dyn ConverterProvider) {
        for (ty, converter) in provider.converters() {
            self.register(&ty, converter);
        }
    }

    /// Make `ty` known to the catalog without binding a converter.
    pub fn declare(&self, ty: &ValueType) {
        self.catalog.record(ty);
    }

    fn register_concrete(&self, ty: &ValueType, converter: Arc<dyn StringConverter>) {
        let key = ty.key();
        let name = converter.name();
        self.derived.remove(&key);
        if self.concrete.insert(key, converter).is_some() {
            info!(type_name = %ty, converter = name, "converter binding overridden");
        } else {
            debug!(type_name = %ty, converter = name, "converter bound");
        }
    }

    fn register_abstract(&self, ty: &AbstractType, converter: Arc<dyn StringConverter>) {
        let key = ty.key();
        let name = converter.name();
        let binding = AbstractBinding {
            ty: ty.clone(),
            converter,
        };
        if self.abstracts.write().insert(key, binding).is_none() {
            debug!(abstract_type = ty.name(), converter = name, "abstract converter bound");
            return;
        }

        let stale: Vec<TypeKey> = self
            .derived
            .iter()
            .filter(|entry| *entry.value() == key)
            .map(|entry| *entry.key())
            .collect();
        for concrete in &stale {
            self.derived.remove(concrete);
            self.concrete.remove(concrete);
        }
        info!(
            abstract_type = ty.name(),
            converter = name,
            dropped = stale.len(),
            "abstract converter binding overridden"
        );
    }

    // -- resolution ---------------------------------------------------------

    /// Converter for `ty`, binding it on first use.
    ///
    /// Abstract types never resolve: they are binding keys, not targets.
    pub fn resolve(&self, ty: &ValueType) -> Option<Arc<dyn StringConverter>> {
        if let Some(converter) = self.lookup(ty.key()) {
            return Some(converter);
        }
        if ty.is_abstract() {
            return None;
        }
        if ty.is_enum() {
            trace!(type_name = %ty, "using enum fallback converter");
            return Some(Arc::clone(&self.enum_fallback));
        }
        self.bind(ty)
    }

    fn lookup(&self, key: TypeKey) -> Option<Arc<dyn StringConverter>> {
        self.concrete.get(&key).map(|entry| Arc::clone(entry.value()))
    }

    fn bind(&self, ty: &ValueType) -> Option<Arc<dyn StringConverter>> {
        let key = ty.key();
        let _guard = self.bind_lock.lock();
        // Another thread may have bound it while we waited.
        if let Some(converter) = self.lookup(key) {
            return Some(converter);
        }

        if let Some(factory) = ty.self_converter() {
            let converter = factory();
            self.concrete.insert(key, Arc::clone(&converter));
            self.self_bindings.fetch_add(1, Ordering::Relaxed);
            self.catalog.record(ty);
            debug!(type_name = %ty, converter = converter.name(), "self-converting type bound");
            return Some(converter);
        }

        let supertypes = ty.supertypes();
        if supertypes.is_empty() {
            return None;
        }
        self.abstract_scans.fetch_add(1, Ordering::Relaxed);
        let found = self
            .abstracts
            .read()
            .iter()
            .find(|(abstract_key, _)| supertypes.iter().any(|s| s.key() == **abstract_key))
            .map(|(abstract_key, binding)| {
                (*abstract_key, binding.ty.clone(), Arc::clone(&binding.converter))
            });

        let (abstract_key, abstract_ty, converter) = found?;
        self.concrete.insert(key, Arc::clone(&converter));
        self.derived.insert(key, abstract_key);
        self.catalog.record(ty);
        debug!(
            type_name = %ty,
            abstract_type = abstract_ty.name(),
            converter = converter.name(),
            "converter bound through abstract type"
        );
        Some(converter)
    }

    // -- conversion ---------------------------------------------------------

    /// Decode `text` as a value of `target`.
    ///
    /// Absent text is an absent value and reaches no converter. `Text`
    /// targets get the raw string back.
    pub fn as_object(
        &self,
        text: Option<&str>,
        target: &ValueType,
    ) -> ConvertResult<Option<Value>> {
        let Some(text) = text else {
            return Ok(None);
        };
        if *target == ValueType::Text {
            return Ok(Some(Value::Text(text.to_string())));
        }
        if target.is_abstract() {
            return Err(ConvertError::unsupported(REGISTRY, target.name()));
        }
        let converter = self
            .resolve(target)
            .ok_or_else(|| ConvertError::no_converter(target.name()))?;
        converter
            .from_string(text, target)
            .map_err(|e| e.with_context(text, target.name()))
    }

    /// Encode a value, resolving the converter from its runtime type.
    pub fn as_string(&self, value: Option<&Value>) -> ConvertResult<Option<String>> {
        value.map(|v| self.encode_value(v)).transpose()
    }

    /// Encode a present value.
    pub fn encode_value(&self, value: &Value) -> ConvertResult<String> {
        if let Value::Text(text) = value {
            return Ok(text.clone());
        }
        let ty = value.value_type();
        let converter = self
            .resolve(&ty)
            .ok_or_else(|| ConvertError::no_converter(ty.name()))?;
        converter.to_string(value)
    }

    // -- introspection ------------------------------------------------------

    /// Whether values of `ty` can be converted, binding it if needed.
    pub fn has_converter(&self, ty: &ValueType) -> bool {
        *ty == ValueType::Text || self.resolve(ty).is_some()
    }

    /// Whether `ty` currently has an entry in the concrete map.
    ///
    /// Unlike [`has_converter`](Self::has_converter) this never binds.
    pub fn is_bound(&self, ty: &ValueType) -> bool {
        self.concrete.contains_key(&ty.key())
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            concrete_bindings: self.concrete.len(),
            abstract_bindings: self.abstracts.read().len(),
            abstract_scans: self.abstract_scans.load(Ordering::Relaxed),
            self_bindings: self.self_bindings.load(Ordering::Relaxed),
        }
    }

    /// Types known by canonical name.
    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("stats", &self.stats())
            .field("catalog", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default)]
    struct Shouting;

    impl StringConverter for Shouting {
        fn name(&self) -> &'static str {
            "shouting"
        }

        fn to_string(&self, value: &Value) -> ConvertResult<String> {
            match value {
                Value::Bool(b) => Ok(b.to_string().to_uppercase()),
                other => Err(ConvertError::unsupported(self.name(), other.value_type().name())),
            }
        }

        fn from_string(&self, text: &str, _target: &ValueType) -> ConvertResult<Option<Value>> {
            Ok(Some(Value::Bool(text == "TRUE")))
        }
    }

    #[test]
    fn test_absent_text_is_absent_value() {
        let registry = ConverterRegistry::empty();
        assert_eq!(registry.as_object(None, &ValueType::I32).unwrap(), None);
        assert_eq!(registry.as_string(None).unwrap(), None);
    }

    #[test]
    fn test_text_passes_through() {
        let registry = ConverterRegistry::empty();
        assert_eq!(
            registry.as_object(Some("as is"), &ValueType::Text).unwrap(),
            Some(Value::from("as is"))
        );
        assert_eq!(
            registry.as_string(Some(&Value::from("as is"))).unwrap(),
            Some("as is".to_string())
        );
        assert!(registry.has_converter(&ValueType::Text));
    }

    #[test]
    fn test_unbound_type_is_no_converter() {
        let registry = ConverterRegistry::empty();
        let err = registry.as_object(Some("1"), &ValueType::I32).unwrap_err();
        assert!(err.is_no_converter());
        assert!(!registry.has_converter(&ValueType::Bool));
    }

    #[test]
    fn test_abstract_target_is_unsupported() {
        let registry = ConverterRegistry::with_builtins();
        let err = registry
            .as_object(Some("1"), &ValueType::number())
            .unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_override_replaces_binding() {
        let registry = ConverterRegistry::with_builtins();
        registry.register(&ValueType::Bool, Arc::new(Shouting));
        assert_eq!(
            registry.as_string(Some(&Value::Bool(true))).unwrap(),
            Some("TRUE".to_string())
        );
    }

    #[test]
    fn test_replacing_abstract_binding_drops_memoized_subtypes() {
        let registry = ConverterRegistry::with_builtins();
        registry.as_object(Some("7"), &ValueType::I32).unwrap();
        assert!(registry.is_bound(&ValueType::I32));

        registry.register_with(&ValueType::number(), || Arc::new(Shouting));
        assert!(!registry.is_bound(&ValueType::I32));
        assert_eq!(registry.resolve(&ValueType::I32).map(|c| c.name()), Some("shouting"));
    }

    #[test]
    fn test_explicit_binding_survives_abstract_replacement() {
        let registry = ConverterRegistry::with_builtins();
        registry.register(&ValueType::I64, Arc::new(Shouting));
        registry.register(&ValueType::number(), Arc::new(Shouting));
        assert!(registry.is_bound(&ValueType::I64));
    }

    #[test]
    fn test_conversion_errors_name_input_and_target() {
        let registry = ConverterRegistry::with_builtins();
        let err = registry
            .as_object(Some("soon"), &ValueType::DateTime)
            .unwrap_err();
        match err {
            ConvertError::Conversion { text, target, .. } => {
                assert_eq!(text, "soon");
                assert_eq!(target, "datetime");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
