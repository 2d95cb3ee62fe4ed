//! Supported conversation languages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::GramError;

/// A supported language: BCP-47 tag plus the name shown to users and
/// embedded in prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub tag: &'static str,
    pub name: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    Language {
        tag: "en-IN",
        name: "English",
    },
    Language {
        tag: "hi-IN",
        name: "हिन्दी (Hindi)",
    },
    Language {
        tag: "bn-IN",
        name: "বাংলা (Bengali)",
    },
    Language {
        tag: "mr-IN",
        name: "मराठी (Marathi)",
    },
    Language {
        tag: "ta-IN",
        name: "தமிழ் (Tamil)",
    },
    Language {
        tag: "te-IN",
        name: "తెలుగు (Telugu)",
    },
    Language {
        tag: "gu-IN",
        name: "ગુજરાતી (Gujarati)",
    },
];

/// A language tag known to be in [`LANGUAGES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct LanguageTag(&'static str);

impl LanguageTag {
    pub const ENGLISH: LanguageTag = LanguageTag("en-IN");
    pub const HINDI: LanguageTag = LanguageTag("hi-IN");

    pub fn parse(tag: &str) -> Result<Self, GramError> {
        LANGUAGES
            .iter()
            .find(|lang| lang.tag.eq_ignore_ascii_case(tag.trim()))
            .map(|lang| Self(lang.tag))
            .ok_or_else(|| GramError::UnknownLanguage(tag.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Display name, e.g. `हिन्दी (Hindi)`.
    pub fn name(&self) -> &'static str {
        LANGUAGES
            .iter()
            .find(|lang| lang.tag == self.0)
            .map(|lang| lang.name)
            .unwrap_or(self.0)
    }

    /// The part before the region, e.g. `hi` for `hi-IN`.
    pub fn primary_subtag(&self) -> &'static str {
        self.0.split('-').next().unwrap_or(self.0)
    }
}

impl Default for LanguageTag {
    fn default() -> Self {
        Self::ENGLISH
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for LanguageTag {
    type Err = GramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LanguageTag {
    type Error = GramError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

// Equivalent to `#[serde(try_from = "String")]`; written by hand because the
// derive would require `'de: 'static` for the `&'static str` field.
impl<'de> Deserialize<'de> for LanguageTag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::try_from(value).map_err(serde::de::Error::custom)
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        tag.0.to_string()
    }
}
