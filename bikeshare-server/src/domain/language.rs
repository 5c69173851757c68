//! Feed language codes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing an invalid language code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid language code: {reason}")]
pub struct InvalidLanguage {
    reason: &'static str,
}

/// A two-letter language code as used for the keys of a GBFS feed directory.
///
/// Codes are stored lowercase. Any well-formed code is accepted, so asking
/// for a language the directory does not carry is a lookup miss rather than
/// a parse error.
///
/// # Examples
///
/// ```
/// use bikeshare_server::domain::Language;
///
/// let fr = Language::parse("FR").unwrap();
/// assert_eq!(fr, Language::FR);
/// assert_eq!(fr.as_str(), "fr");
///
/// assert!(Language::parse("french").is_err());
/// assert!(Language::parse("f1").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Language([u8; 2]);

impl Language {
    pub const EN: Language = Language(*b"en");
    pub const FR: Language = Language(*b"fr");
    pub const ES: Language = Language(*b"es");

    /// Languages offered to the language selector, in display order.
    pub const SUPPORTED: [Language; 3] = [Language::EN, Language::FR, Language::ES];

    /// Parse a language code, ignoring ASCII case.
    pub fn parse(s: &str) -> Result<Self, InvalidLanguage> {
        let bytes = s.trim().as_bytes();

        if bytes.len() != 2 {
            return Err(InvalidLanguage {
                reason: "must be exactly 2 characters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(InvalidLanguage {
                reason: "must be ASCII letters",
            });
        }

        Ok(Language([
            bytes[0].to_ascii_lowercase(),
            bytes[1].to_ascii_lowercase(),
        ]))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only lowercase ASCII letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }

    /// Whether this language is one the selector offers.
    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED.contains(self)
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::EN
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Language({})", self.as_str())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Language::parse(&s).map_err(serde::de::Error::custom)
    }
}
