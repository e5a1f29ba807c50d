//! Registered character set names

use std::fmt;
use std::str::FromStr;

use crate::error::ConvertError;

/// A registered character set, identified by its canonical name.
///
/// Only the name travels through conversion; no transcoding happens here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Charset {
    name: &'static str,
}

/// `(canonical name, aliases)`; lookups are ASCII case-insensitive.
const REGISTRY: &[(&str, &[&str])] = &[
    ("UTF-8", &["utf8", "unicode-1-1-utf-8"]),
    (
        "US-ASCII",
        &["ascii", "us", "iso646-us", "ansi_x3.4-1968", "cp367", "csascii"],
    ),
    (
        "ISO-8859-1",
        &["latin1", "l1", "iso8859_1", "iso_8859_1", "iso8859-1", "cp819", "8859_1"],
    ),
    ("ISO-8859-2", &["latin2", "l2", "iso8859_2", "iso8859-2"]),
    ("ISO-8859-5", &["cyrillic", "iso8859_5", "iso8859-5"]),
    ("ISO-8859-15", &["latin9", "l9", "iso8859_15", "iso8859-15"]),
    ("UTF-16", &["utf16", "unicode"]),
    ("UTF-16BE", &["utf_16be", "x-utf-16be"]),
    ("UTF-16LE", &["utf_16le", "x-utf-16le"]),
    ("UTF-32", &["utf32"]),
    ("UTF-32BE", &["utf_32be"]),
    ("UTF-32LE", &["utf_32le"]),
    ("windows-1250", &["cp1250"]),
    ("windows-1251", &["cp1251"]),
    ("windows-1252", &["cp1252"]),
    ("KOI8-R", &["koi8_r", "koi8"]),
    ("Shift_JIS", &["sjis", "shift-jis", "ms_kanji", "x-sjis"]),
    ("EUC-JP", &["eucjp", "x-euc-jp"]),
    ("EUC-KR", &["euckr", "ksc5601"]),
    ("GBK", &["cp936", "windows-936"]),
    ("GB18030", &["gb18030-2022"]),
    ("Big5", &["big-5", "csbig5"]),
];

impl Charset {
    pub const UTF_8: Self = Self { name: "UTF-8" };
    pub const US_ASCII: Self = Self { name: "US-ASCII" };
    pub const ISO_8859_1: Self = Self { name: "ISO-8859-1" };
    pub const UTF_16: Self = Self { name: "UTF-16" };

    /// Look up a charset by canonical name or alias.
    pub fn for_name(name: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|(canonical, aliases)| {
                canonical.eq_ignore_ascii_case(name)
                    || aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
            })
            .map(|(canonical, _)| Self { name: canonical })
    }

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Canonical names of every registered charset.
    pub fn available() -> impl Iterator<Item = &'static str> {
        REGISTRY.iter().map(|(canonical, _)| *canonical)
    }
}

impl FromStr for Charset {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::for_name(s).ok_or_else(|| ConvertError::conversion(s, "unsupported charset"))
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
