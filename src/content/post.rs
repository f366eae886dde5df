//! Article and audience models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Front-matter placeholder the CMS writes for an unset field
pub const UNDEFINED_PLACEHOLDER: &str = "undefined";

/// Reader type an article is written for.
///
/// Unknown values are kept verbatim in [`Audience::Other`] so that new
/// audiences authored in the CMS show up as their own group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Audience {
    Buyer,
    Accountant,
    Developer,
    Lawyer,
    ExistingPropertyOwner,
    General,
    Other(String),
}

impl Audience {
    /// Parse an exact audience value. Never fails: unrecognized values become
    /// [`Audience::Other`].
    pub fn parse(value: &str) -> Self {
        match value {
            "BUYER" => Audience::Buyer,
            "ACCOUNTANT" => Audience::Accountant,
            "DEVELOPER" => Audience::Developer,
            "LAWYER" => Audience::Lawyer,
            "EXISTING_PROPERTY_OWNER" => Audience::ExistingPropertyOwner,
            "GENERAL" => Audience::General,
            other => Audience::Other(other.to_string()),
        }
    }

    /// Normalize a raw front-matter value: absent, blank and the
    /// `"undefined"` placeholder all mean [`Audience::General`]
    pub fn from_front_matter(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some(UNDEFINED_PLACEHOLDER) => Audience::General,
            Some(v) => Audience::parse(v),
        }
    }

    /// The raw value as written in front-matter
    pub fn as_str(&self) -> &str {
        match self {
            Audience::Buyer => "BUYER",
            Audience::Accountant => "ACCOUNTANT",
            Audience::Developer => "DEVELOPER",
            Audience::Lawyer => "LAWYER",
            Audience::ExistingPropertyOwner => "EXISTING_PROPERTY_OWNER",
            Audience::General => "GENERAL",
            Audience::Other(s) => s,
        }
    }
}

impl Default for Audience {
    fn default() -> Self {
        Audience::General
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Audience {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Audience {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Audience::parse(&raw))
    }
}

/// An article from the content directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// File name without extension
    pub slug: String,

    /// Article title (falls back to the slug)
    pub title: String,

    pub description: String,

    /// Publication date; `None` when missing or unparseable
    pub pub_date: Option<DateTime<Utc>>,

    pub hero_image: Option<String>,

    /// Raw MDX body
    pub content: String,

    /// Categories in authored order
    pub categories: Vec<String>,

    pub audience: Audience,

    pub featured: bool,

    /// Full source file path
    #[serde(skip)]
    pub full_source: PathBuf,

    /// Custom front-matter fields
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(slug: String, title: String) -> Self {
        Self {
            slug,
            title,
            description: String::new(),
            pub_date: None,
            hero_image: None,
            content: String::new(),
            categories: Vec::new(),
            audience: Audience::General,
            featured: false,
            full_source: PathBuf::new(),
            extra: HashMap::new(),
        }
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_parse() {
        assert_eq!(Audience::parse("LAWYER"), Audience::Lawyer);
        assert_eq!(
            Audience::parse("EXISTING_PROPERTY_OWNER"),
            Audience::ExistingPropertyOwner
        );
        // exact match only
        assert_eq!(Audience::parse("lawyer"), Audience::Other("lawyer".into()));
        assert_eq!(Audience::parse("INVESTOR").as_str(), "INVESTOR");
    }

    #[test]
    fn test_audience_from_front_matter() {
        assert_eq!(Audience::from_front_matter(None), Audience::General);
        assert_eq!(Audience::from_front_matter(Some("")), Audience::General);
        assert_eq!(
            Audience::from_front_matter(Some("undefined")),
            Audience::General
        );
        assert_eq!(Audience::from_front_matter(Some(" BUYER ")), Audience::Buyer);
    }

    #[test]
    fn test_audience_serializes_as_raw_value() {
        let json = serde_json::to_string(&Audience::ExistingPropertyOwner).unwrap();
        assert_eq!(json, "\"EXISTING_PROPERTY_OWNER\"");
        let back: Audience = serde_json::from_str("\"INVESTOR\"").unwrap();
        assert_eq!(back, Audience::Other("INVESTOR".into()));
    }
}
