//! Runtime type descriptors
//!
//! A [`ValueType`] names the type a string is converted into. Built-in kinds
//! are plain variants; enumerations, custom types and abstract types carry a
//! shared descriptor. Identity is a [`TypeKey`]: two descriptors are the same
//! type only when their keys match, never because their names or variants
//! happen to agree.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::converter::StringConverter;
use crate::value::CustomValue;

/// Identity of a value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// Built-in kind, keyed by its canonical name
    Builtin(&'static str),
    /// A Rust type (enum, custom value, or trait object for abstract types)
    Rust(TypeId),
    /// A type defined at runtime; the id is unique for the process
    Dynamic(u64),
}

static NEXT_DYNAMIC_ID: AtomicU64 = AtomicU64::new(1);

fn next_dynamic_key() -> TypeKey {
    TypeKey::Dynamic(NEXT_DYNAMIC_ID.fetch_add(1, Ordering::Relaxed))
}

/// Factory producing a fresh converter instance.
pub type ConverterFactory = Arc<dyn Fn() -> Arc<dyn StringConverter> + Send + Sync>;

// ---------------------------------------------------------------------------
// ValueType
// ---------------------------------------------------------------------------

/// Runtime descriptor of a value type.
#[derive(Clone)]
pub enum ValueType {
    /// Plain string; converted by identity, never through a converter
    Text,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    /// UTC instant with seconds precision on the wire
    DateTime,
    /// A value type used as a value (`type` on the wire)
    TypeName,
    Locale,
    TimeZone,
    Charset,
    Uri,
    Path,
    Enum(EnumType),
    Custom(CustomType),
    /// Supertype key for abstract bindings; never materialized as a value
    Abstract(AbstractType),
}

impl ValueType {
    /// Every built-in concrete kind, in declaration order.
    pub const BUILTINS: [Self; 16] = [
        Self::Text,
        Self::Bool,
        Self::Char,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::F32,
        Self::F64,
        Self::DateTime,
        Self::TypeName,
        Self::Locale,
        Self::TimeZone,
        Self::Charset,
        Self::Uri,
        Self::Path,
    ];

    /// The built-in abstract supertype of every numeric kind.
    pub fn number() -> Self {
        Self::Abstract(AbstractType::number())
    }

    /// Canonical name.
    pub fn name(&self) -> &str {
        match self {
            Self::Enum(ty) => ty.name(),
            Self::Custom(ty) => ty.name(),
            Self::Abstract(ty) => ty.name(),
            builtin => builtin.builtin_name(),
        }
    }

    /// Identity key.
    pub fn key(&self) -> TypeKey {
        match self {
            Self::Enum(ty) => ty.key(),
            Self::Custom(ty) => ty.key(),
            Self::Abstract(ty) => ty.key(),
            builtin => TypeKey::Builtin(builtin.builtin_name()),
        }
    }

    // Separate from `name()` so the key borrows nothing from `self`.
    fn builtin_name(&self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::DateTime => "datetime",
            Self::TypeName => "type",
            Self::Locale => "locale",
            Self::TimeZone => "timezone",
            Self::Charset => "charset",
            Self::Uri => "uri",
            Self::Path => "path",
            Self::Enum(_) | Self::Custom(_) | Self::Abstract(_) => "",
        }
    }

    /// Look up a built-in concrete kind or the `number` abstract type by name.
    pub fn builtin(name: &str) -> Option<Self> {
        if name == AbstractType::NUMBER {
            return Some(Self::number());
        }
        Self::BUILTINS.iter().find(|ty| ty.name() == name).cloned()
    }

    /// True for abstract supertypes.
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Abstract(_))
    }

    /// True for enumerations.
    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }

    /// True for the six numeric kinds.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::F32 | Self::F64
        )
    }

    /// Abstract types this type is assignable to, in declaration order.
    pub fn supertypes(&self) -> Vec<AbstractType> {
        match self {
            ty if ty.is_numeric() => vec![AbstractType::number()],
            Self::Custom(ty) => ty.supertypes().to_vec(),
            _ => Vec::new(),
        }
    }

    /// Factory for a type that converts itself, if it declares one.
    pub fn self_converter(&self) -> Option<&ConverterFactory> {
        match self {
            Self::Custom(ty) => ty.self_converter(),
            _ => None,
        }
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ValueType {}

impl Hash for ValueType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum(ty) => write!(f, "Enum({})", ty.name()),
            Self::Custom(ty) => write!(f, "Custom({})", ty.name()),
            Self::Abstract(ty) => write!(f, "Abstract({})", ty.name()),
            builtin => f.write_str(builtin.name()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<EnumType> for ValueType {
    fn from(ty: EnumType) -> Self {
        Self::Enum(ty)
    }
}

impl From<CustomType> for ValueType {
    fn from(ty: CustomType) -> Self {
        Self::Custom(ty)
    }
}

impl From<AbstractType> for ValueType {
    fn from(ty: AbstractType) -> Self {
        Self::Abstract(ty)
    }
}

// ---------------------------------------------------------------------------
// AbstractType
// ---------------------------------------------------------------------------

/// Supertype under which a single converter serves many concrete types.
#[derive(Clone)]
pub struct AbstractType {
    key: TypeKey,
    name: Arc<str>,
}

impl AbstractType {
    /// Canonical name of the built-in numeric supertype.
    pub const NUMBER: &'static str = "number";

    /// The built-in numeric supertype.
    pub fn number() -> Self {
        Self {
            key: TypeKey::Builtin(Self::NUMBER),
            name: Arc::from(Self::NUMBER),
        }
    }

    /// Abstract type identified by a Rust type, usually a trait object.
    ///
    /// ```
    /// use tether_convert::AbstractType;
    ///
    /// trait Shape {}
    /// let shape = AbstractType::of::<dyn Shape>("geo.Shape");
    /// assert_eq!(shape.name(), "geo.Shape");
    /// ```
    pub fn of<T: ?Sized + 'static>(name: impl Into<Arc<str>>) -> Self {
        Self {
            key: TypeKey::Rust(TypeId::of::<T>()),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }
}

impl PartialEq for AbstractType {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for AbstractType {}

impl fmt::Debug for AbstractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AbstractType").field(&self.name).finish()
    }
}

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// A Rust enum with a string encoding.
///
/// ```
/// use tether_convert::ConvertibleEnum;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Level { Low, High }
///
/// impl ConvertibleEnum for Level {
///     const TYPE_NAME: &'static str = "app.Level";
///
///     fn variants() -> &'static [Self] {
///         &[Self::Low, Self::High]
///     }
///
///     fn name(self) -> &'static str {
///         match self {
///             Self::Low => "Low",
///             Self::High => "High",
///         }
///     }
/// }
///
/// assert_eq!(Level::High.ordinal(), Some(1));
/// ```
pub trait ConvertibleEnum: Copy + PartialEq + Send + Sync + 'static {
    /// Canonical dotted type name.
    const TYPE_NAME: &'static str;

    /// Encode as declaration index instead of constant name.
    const ORDINAL: bool = false;

    /// Every constant, in declaration order.
    fn variants() -> &'static [Self];

    /// Constant name.
    fn name(self) -> &'static str;

    /// Declaration index, `None` if `variants()` omits this constant.
    fn ordinal(self) -> Option<usize> {
        Self::variants().iter().position(|v| *v == self)
    }

    /// Runtime descriptor for this enum.
    fn enum_type() -> EnumType {
        EnumType::of::<Self>()
    }
}

struct EnumInner {
    key: TypeKey,
    name: String,
    constants: Vec<String>,
    ordinal: bool,
}

/// Descriptor of an enumeration: its constants and encoding mode.
#[derive(Clone)]
pub struct EnumType {
    inner: Arc<EnumInner>,
}

impl EnumType {
    /// Descriptor of a Rust enum.
    pub fn of<E: ConvertibleEnum>() -> Self {
        Self {
            inner: Arc::new(EnumInner {
                key: TypeKey::Rust(TypeId::of::<E>()),
                name: E::TYPE_NAME.to_string(),
                constants: E::variants().iter().map(|v| v.name().to_string()).collect(),
                ordinal: E::ORDINAL,
            }),
        }
    }

    /// Enumeration defined at runtime.
    ///
    /// Each call creates a new type, even for identical names and constants.
    pub fn dynamic<I, S>(name: impl Into<String>, constants: I, ordinal: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: Arc::new(EnumInner {
                key: next_dynamic_key(),
                name: name.into(),
                constants: constants.into_iter().map(Into::into).collect(),
                ordinal,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn key(&self) -> TypeKey {
        self.inner.key
    }

    /// Whether the wire form is the declaration index.
    pub fn is_ordinal(&self) -> bool {
        self.inner.ordinal
    }

    /// Constant names in declaration order.
    pub fn constants(&self) -> &[String] {
        &self.inner.constants
    }

    /// Number of constants.
    pub fn len(&self) -> usize {
        self.inner.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.constants.is_empty()
    }

    /// Index of the constant with exactly this name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.inner.constants.iter().position(|c| c == name)
    }

    /// Name of the constant at `index`.
    pub fn constant(&self, index: usize) -> Option<&str> {
        self.inner.constants.get(index).map(String::as_str)
    }

    /// True when this descriptor was built from the Rust enum `E`.
    pub fn is<E: ConvertibleEnum>(&self) -> bool {
        self.inner.key == TypeKey::Rust(TypeId::of::<E>())
    }
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        self.inner.key == other.inner.key
    }
}

impl Eq for EnumType {}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumType")
            .field("name", &self.inner.name)
            .field("constants", &self.inner.constants)
            .field("ordinal", &self.inner.ordinal)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Custom types
// ---------------------------------------------------------------------------

struct CustomInner {
    key: TypeKey,
    name: String,
    supertypes: Vec<AbstractType>,
    self_converter: Option<ConverterFactory>,
}

/// Descriptor of a user-defined value type.
///
/// Built with [`CustomType::builder`]; the builder is the only place where a
/// type declares which abstract types it is assignable to and whether it is
/// its own converter.
#[derive(Clone)]
pub struct CustomType {
    inner: Arc<CustomInner>,
}

impl CustomType {
    /// Start describing the custom value type `T`.
    pub fn builder<T: CustomValue>(name: impl Into<String>) -> CustomTypeBuilder<T> {
        CustomTypeBuilder {
            name: name.into(),
            supertypes: Vec::new(),
            self_converter: None,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn key(&self) -> TypeKey {
        self.inner.key
    }

    pub fn supertypes(&self) -> &[AbstractType] {
        &self.inner.supertypes
    }

    pub fn self_converter(&self) -> Option<&ConverterFactory> {
        self.inner.self_converter.as_ref()
    }

    /// True when this descriptor describes the Rust type `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.inner.key == TypeKey::Rust(TypeId::of::<T>())
    }
}

impl PartialEq for CustomType {
    fn eq(&self, other: &Self) -> bool {
        self.inner.key == other.inner.key
    }
}

impl Eq for CustomType {}

impl fmt::Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomType")
            .field("name", &self.inner.name)
            .field("supertypes", &self.inner.supertypes)
            .field("self_converting", &self.inner.self_converter.is_some())
            .finish()
    }
}

/// Builder for [`CustomType`].
pub struct CustomTypeBuilder<T> {
    name: String,
    supertypes: Vec<AbstractType>,
    self_converter: Option<ConverterFactory>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: CustomValue> CustomTypeBuilder<T> {
    /// Declare `T` assignable to an abstract type.
    #[must_use = "builder methods must be chained or built"]
    pub fn assignable_to(mut self, supertype: AbstractType) -> Self {
        if !self.supertypes.contains(&supertype) {
            self.supertypes.push(supertype);
        }
        self
    }

    pub fn build(self) -> CustomType {
        CustomType {
            inner: Arc::new(CustomInner {
                key: TypeKey::Rust(TypeId::of::<T>()),
                name: self.name,
                supertypes: self.supertypes,
                self_converter: self.self_converter,
            }),
        }
    }
}

impl<T: CustomValue + StringConverter + Default> CustomTypeBuilder<T> {
    /// Declare that `T` converts itself.
    ///
    /// The registry binds a fresh `T::default()` on first use; no data
    /// instance is ever used as a converter.
    #[must_use = "builder methods must be chained or built"]
    pub fn self_converting(mut self) -> Self {
        let factory: ConverterFactory = Arc::new(|| -> Arc<dyn StringConverter> {
            Arc::new(T::default())
        });
        self.self_converter = Some(factory);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Tri {
        A,
        B,
        C,
    }

    impl ConvertibleEnum for Tri {
        const TYPE_NAME: &'static str = "test.Tri";

        fn variants() -> &'static [Self] {
            &[Self::A, Self::B, Self::C]
        }

        fn name(self) -> &'static str {
            match self {
                Self::A => "A",
                Self::B => "B",
                Self::C => "C",
            }
        }
    }

    #[test]
    fn test_builtin_lookup_by_name() {
        for ty in &ValueType::BUILTINS {
            assert_eq!(ValueType::builtin(ty.name()).as_ref(), Some(ty));
        }
        assert_eq!(ValueType::builtin("number"), Some(ValueType::number()));
        assert_eq!(ValueType::builtin("geo.Point"), None);
    }

    #[test]
    fn test_numeric_kinds_declare_number_supertype() {
        assert_eq!(ValueType::I16.supertypes(), vec![AbstractType::number()]);
        assert!(ValueType::Bool.supertypes().is_empty());
        assert!(ValueType::number().is_abstract());
    }

    #[test]
    fn test_rust_enum_descriptor() {
        let ty = Tri::enum_type();
        assert_eq!(ty.name(), "test.Tri");
        assert_eq!(ty.constants(), ["A", "B", "C"]);
        assert_eq!(ty.index_of("B"), Some(1));
        assert_eq!(ty.constant(2), Some("C"));
        assert!(!ty.is_ordinal());
        assert!(ty.is::<Tri>());
        // A second descriptor for the same enum is the same type.
        assert_eq!(ty, EnumType::of::<Tri>());
    }

    #[test]
    fn test_dynamic_enums_are_distinct_by_identity() {
        let first = EnumType::dynamic("shop.Color", ["Red", "Green"], false);
        let second = EnumType::dynamic("shop.Color", ["Red", "Green"], false);
        assert_ne!(first, second);
        assert_eq!(first, first.clone());
        assert_ne!(ValueType::from(first), ValueType::from(second));
    }
}
