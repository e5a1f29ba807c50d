//! The converter contract
use std::sync::Arc;

use crate::error::ConvertResult;
use crate::types::ValueType;
use crate::value::Value;

/// Bidirectional conversion between values and their canonical strings.
///
/// Implementations are stateless and shared across threads; the registry
/// hands out one `Arc` to every caller. A converter asked to handle a value
/// or target type it does not own returns
/// [`ConvertError::UnsupportedType`](crate::ConvertError::UnsupportedType).
pub trait StringConverter: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Encode a value. Pure: no locale or time zone is consulted.
    fn to_string(&self, value: &Value) -> ConvertResult<String>;

    /// Decode `text` into a value of `target`.
    ///
    /// `Ok(None)` means the text denotes an absent value (for most
    /// converters, the empty string).
    fn from_string(&self, text: &str, target: &ValueType) -> ConvertResult<Option<Value>>;
}

/// A bundle of bindings contributed to a registry in one call.
pub trait ConverterProvider {
    /// Type/converter pairs, applied in order.
    fn converters(&self) -> Vec<(ValueType, Arc<dyn StringConverter>)>;
}
