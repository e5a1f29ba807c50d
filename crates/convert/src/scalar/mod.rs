//! Scalar value types without a suitable ecosystem representation
mod charset;
mod locale;

pub use charset::Charset;
pub use locale::Locale;
