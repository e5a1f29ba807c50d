//! Filesystem paths <-> forward-slash text
use std::path::{MAIN_SEPARATOR, PathBuf};

use crate::converter::StringConverter;
use crate::error::{ConvertError, ConvertResult};
use crate::types::ValueType;
use crate::value::Value;

/// Path converter.
///
/// The wire form always separates components with `/`; on platforms with a
/// different separator the two are swapped in each direction. Paths that are
/// not valid UTF-8 cannot be encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathConverter;

impl StringConverter for PathConverter {
    fn name(&self) -> &'static str {
        "path"
    }

    fn to_string(&self, value: &Value) -> ConvertResult<String> {
        let Value::Path(path) = value else {
            return Err(ConvertError::unsupported(
                self.name(),
                value.value_type().name(),
            ));
        };
        let text = path.to_str().ok_or_else(|| {
            ConvertError::conversion(path.display().to_string(), "path is not valid UTF-8")
                .with_context("", "path")
        })?;
        Ok(if MAIN_SEPARATOR == '/' {
            text.to_string()
        } else {
            text.replace(MAIN_SEPARATOR, "/")
        })
    }

    fn from_string(&self, text: &str, target: &ValueType) -> ConvertResult<Option<Value>> {
        if *target != ValueType::Path {
            return Err(ConvertError::unsupported(self.name(), target.name()));
        }
        if text.is_empty() {
            return Ok(None);
        }
        let native = if MAIN_SEPARATOR == '/' {
            PathBuf::from(text)
        } else {
            PathBuf::from(text.replace('/', &MAIN_SEPARATOR.to_string()))
        };
        Ok(Some(Value::Path(native)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_round_trip() {
        let value = PathConverter
            .from_string("var/log/app.log", &ValueType::Path)
            .unwrap()
            .unwrap();
        let Value::Path(path) = &value else {
            panic!("expected a path");
        };
        assert_eq!(path, &Path::new("var").join("log").join("app.log"));
        assert_eq!(PathConverter.to_string(&value).unwrap(), "var/log/app.log");
    }

    #[test]
    fn test_empty_is_absent() {
        assert_eq!(PathConverter.from_string("", &ValueType::Path).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_cannot_be_encoded() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = PathBuf::from(OsStr::from_bytes(b"bad\xFFname"));
        let err = PathConverter.to_string(&Value::Path(path)).unwrap_err();
        assert!(err.is_conversion());
    }
}
