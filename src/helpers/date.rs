//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Format a date in W3C datetime format, as used by sitemaps
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Format date in full format (like "January 1, 2024")
pub fn full_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%B %-d, %Y").to_string()
}

/// Short numeric date (like "2024-01-01"), or a dash for undated articles
pub fn short_date<Tz: TimeZone>(date: Option<&DateTime<Tz>>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "----------".to_string(),
    }
}
