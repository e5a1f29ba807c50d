//! Identifier-like values whose canonical text is their `Display` form
use std::str::FromStr;

use chrono_tz::Tz;
use url::Url;

use crate::converter::StringConverter;
use crate::error::{ConvertError, ConvertResult};
use crate::scalar::{Charset, Locale};
use crate::types::ValueType;
use crate::value::Value;

/// Defines a converter for a `Value` variant that encodes through `Display`
/// and decodes through `$parse`. Empty text is absent.
macro_rules! identifier_converter {
    ($(#[$meta:meta])* $converter:ident, $name:literal, $kind:ident, $parse:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $converter;

        impl StringConverter for $converter {
            fn name(&self) -> &'static str {
                $name
            }

            fn to_string(&self, value: &Value) -> ConvertResult<String> {
                match value {
                    Value::$kind(v) => Ok(v.to_string()),
                    other => Err(ConvertError::unsupported(
                        self.name(),
                        other.value_type().name(),
                    )),
                }
            }

            fn from_string(
                &self,
                text: &str,
                target: &ValueType,
            ) -> ConvertResult<Option<Value>> {
                if *target != ValueType::$kind {
                    return Err(ConvertError::unsupported(self.name(), target.name()));
                }
                if text.is_empty() {
                    return Ok(None);
                }
                $parse(text)
                    .map(|v| Some(Value::$kind(v)))
                    .map_err(|e| e.with_context(text, target.name()))
            }
        }
    };
}

fn parse_time_zone(text: &str) -> ConvertResult<Tz> {
    Tz::from_str(text).map_err(|_| ConvertError::conversion(text, "unknown time zone id"))
}

fn parse_uri(text: &str) -> ConvertResult<Url> {
    Url::parse(text).map_err(|e| ConvertError::conversion(text, e.to_string()))
}

identifier_converter!(
    /// `language-COUNTRY` locale tags.
    LocaleConverter,
    "locale",
    Locale,
    Locale::from_str
);

identifier_converter!(
    /// IANA time zone ids such as `Europe/Berlin`.
    TimeZoneConverter,
    "timezone",
    TimeZone,
    parse_time_zone
);

identifier_converter!(
    /// Character set names; aliases decode to the canonical name.
    CharsetConverter,
    "charset",
    Charset,
    Charset::from_str
);

identifier_converter!(
    /// Absolute URIs. Relative references are rejected.
    ///
    /// Decoding normalizes the URI, so the encoded text is not always the
    /// input byte for byte: the scheme and host are lowercased and an empty
    /// path on a hierarchical URI becomes `/` (`https://Example.COM` encodes
    /// as `https://example.com/`).
    UriConverter,
    "uri",
    Uri,
    parse_uri
);
