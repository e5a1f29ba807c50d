//! Language/country locale tags
use std::fmt;
use std::str::FromStr;

use crate::error::{ConvertError, ConvertResult};

/// A `language-COUNTRY` locale tag such as `en-US`.
///
/// The language is stored lowercase and the country uppercase. Parsing also
/// accepts `_` as the separator (`en_US`), but the canonical form always uses
/// `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    country: Option<String>,
}

impl Locale {
    /// Build a locale from its parts, validating and normalizing case.
    pub fn new(language: &str, country: Option<&str>) -> ConvertResult<Self> {
        let text = match country {
            Some(country) => format!("{language}-{country}"),
            None => language.to_string(),
        };
        text.parse()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    fn parse_tag(text: &str) -> ConvertResult<Self> {
        let bytes = text.as_bytes();
        let language_end = bytes
            .iter()
            .position(|b| *b == b'-' || *b == b'_')
            .unwrap_or(bytes.len());

        if let Some(bad) = bytes[..language_end]
            .iter()
            .position(|b| !b.is_ascii_alphabetic())
        {
            return Err(ConvertError::conversion(text, "language must be alphabetic").at(bad));
        }
        if !(2..=8).contains(&language_end) {
            return Err(
                ConvertError::conversion(text, "language must have 2 to 8 letters").at(0),
            );
        }
        let language = text[..language_end].to_ascii_lowercase();

        if language_end == bytes.len() {
            return Ok(Self {
                language,
                country: None,
            });
        }

        let country_start = language_end + 1;
        let country = &text[country_start..];
        let valid = match country.len() {
            2 => country.bytes().all(|b| b.is_ascii_alphabetic()),
            3 => country.bytes().all(|b| b.is_ascii_digit()),
            _ => false,
        };
        if !valid {
            return Err(ConvertError::conversion(
                text,
                "country must be two letters or a three-digit region code",
            )
            .at(country_start));
        }

        Ok(Self {
            language,
            country: Some(country.to_ascii_uppercase()),
        })
    }
}

impl FromStr for Locale {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_tag(s)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}-{country}", self.language),
            None => f.write_str(&self.language),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en-US", "en", Some("US"))]
    #[case("en_us", "en", Some("US"))]
    #[case("DE-de", "de", Some("DE"))]
    #[case("fr", "fr", None)]
    #[case("es-419", "es", Some("419"))]
    fn test_parse_and_normalize(
        #[case] input: &str,
        #[case] language: &str,
        #[case] country: Option<&str>,
    ) {
        let locale: Locale = input.parse().unwrap();
        assert_eq!(locale.language(), language);
        assert_eq!(locale.country(), country);
    }

    #[rstest]
    #[case("e", 0)]
    #[case("en-USA", 3)]
    #[case("en-", 3)]
    #[case("e1-US", 1)]
    #[case("en-U1", 3)]
    fn test_reject_malformed(#[case] input: &str, #[case] offset: usize) {
        let err = input.parse::<Locale>().unwrap_err();
        assert!(err.is_conversion());
        assert_eq!(err.position(), Some(offset));
    }

    #[test]
    fn test_display_uses_hyphen() {
        let locale = Locale::new("pt", Some("br")).unwrap();
        assert_eq!(locale.to_string(), "pt-BR");
    }
}
