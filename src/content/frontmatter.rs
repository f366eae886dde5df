//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;

use super::DocumentError;

/// Accept any YAML scalar as an optional string.
///
/// Editors sometimes write `title: 2024` or `heroImage: null`; both should
/// survive deserialization instead of rejecting the whole document. Lists and
/// mappings are logged and treated as absent.
fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_string(Value::deserialize(deserializer)?))
}

fn scalar_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s),
        Value::Tagged(tagged) => scalar_string(tagged.value),
        other @ (Value::Sequence(_) | Value::Mapping(_)) => {
            tracing::warn!("Ignoring non-scalar front-matter value: {:?}", other);
            None
        }
    }
}

/// Categories are authored as a comma-separated string, but a YAML list is
/// accepted too
fn comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let categories = match Value::deserialize(deserializer)? {
        Value::Sequence(items) => items
            .into_iter()
            .filter_map(scalar_string)
            .flat_map(|item| split_categories(&item))
            .collect(),
        value => scalar_string(value)
            .map(|s| split_categories(&s))
            .unwrap_or_default(),
    };
    Ok(categories)
}

/// `featured` is a boolean, but the CMS has written it as a string before.
/// Anything unrecognizable counts as not featured.
fn bool_like<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let featured = match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "on" | "1"
        ),
        Value::Null => false,
        other => {
            tracing::warn!("Ignoring unrecognized featured value: {:?}", other);
            false
        }
    };
    Ok(featured)
}

/// Split a comma-separated category field, trimming items and dropping blanks
pub(crate) fn split_categories(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Raw front-matter of an article, before normalization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "optional_scalar")]
    pub title: Option<String>,
    #[serde(deserialize_with = "optional_scalar")]
    pub description: Option<String>,
    #[serde(rename = "pubDate", deserialize_with = "optional_scalar")]
    pub pub_date: Option<String>,
    #[serde(rename = "heroImage", deserialize_with = "optional_scalar")]
    pub hero_image: Option<String>,
    #[serde(deserialize_with = "comma_list")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "optional_scalar")]
    pub audience: Option<String>,
    #[serde(deserialize_with = "bool_like")]
    pub featured: bool,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), DocumentError> {
        match split_front_matter(content)? {
            Some((yaml, body)) => {
                if yaml.trim().is_empty() {
                    return Ok((FrontMatter::default(), body));
                }
                let fm = serde_yaml::from_str::<FrontMatter>(yaml)?;
                Ok((fm, body))
            }
            None => Ok((FrontMatter::default(), content)),
        }
    }

    /// Parse the publication date, interpreting offset-less values in `tz`
    pub fn parse_pub_date(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        self.pub_date
            .as_deref()
            .and_then(|s| parse_date_string(s, tz))
    }
}

/// Locate a leading `---` block. Returns `(yaml, body)` or `None` when the
/// document has no front-matter at all.
pub(crate) fn split_front_matter(content: &str) -> Result<Option<(&str, &str)>, DocumentError> {
    let content = content.trim_start_matches('\u{feff}').trim_start();
    if !content.starts_with("---") {
        return Ok(None);
    }

    let Some(newline) = content.find('\n') else {
        return Err(DocumentError::UnterminatedFrontMatter);
    };

    // `---- ` or `--- text` is a horizontal rule, not a delimiter
    if !content[3..newline].trim().is_empty() {
        return Ok(None);
    }

    let rest = &content[newline + 1..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);
            return Ok(Some((yaml, body)));
        }
        offset += line.len();
    }

    Err(DocumentError::UnterminatedFrontMatter)
}

/// Parse a date string in various formats
pub(crate) fn parse_date_string(s: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // RFC 3339 carries its own offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%d",
        "%Y/%m/%d",
    ];

    for fmt in formats {
        let naive = NaiveDateTime::parse_from_str(s, fmt).ok().or_else(|| {
            NaiveDate::parse_from_str(s, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });

        if let Some(naive) = naive {
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }

    None
}
