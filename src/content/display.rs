//! Human-readable labels for categories and audiences

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Categories offered in navigation even when no article uses them yet
pub const PREDEFINED_CATEGORIES: [&str; 8] = [
    "glossary/definition",
    "educational/how-to",
    "problem/solution",
    "market-analysis",
    "legal-education",
    "technical",
    "industry-analysis",
    "professional-guidance",
];

lazy_static! {
    static ref CATEGORY_NAMES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("glossary/definition", "Glossary/Definition");
        m.insert("educational/how-to", "Educational/How-To");
        m.insert("problem/solution", "Problem/Solution");
        m.insert("market-analysis", "Market Analysis");
        m.insert("legal-education", "Legal Education");
        m.insert("technical", "Technical");
        m.insert("industry-analysis", "Industry Analysis");
        m.insert("professional-guidance", "Professional Guidance");
        // Legacy role categories
        m.insert("general", "General Information");
        m.insert("buyer", "For Buyers");
        m.insert("accountant", "For Accountants");
        m.insert("developer", "For Developers");
        m.insert("lawyer", "For Legal Professionals");
        m.insert("property-owner", "For Property Owners");
        m
    };
    static ref AUDIENCE_NAMES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("BUYER", "Property Buyers");
        m.insert("ACCOUNTANT", "Accountants");
        m.insert("DEVELOPER", "Property Developers");
        m.insert("LAWYER", "Legal Professionals");
        m.insert("EXISTING_PROPERTY_OWNER", "Existing Property Owners");
        m.insert("GENERAL", "General");
        m
    };
}

/// Label for a category, e.g. `market-analysis` -> `Market Analysis`.
/// Unknown categories get `/` -> ` & ` and `-` -> ` `.
pub fn category_display_name(category: &str) -> String {
    match CATEGORY_NAMES.get(category) {
        Some(name) => name.to_string(),
        None => category.replace('/', " & ").replace('-', " "),
    }
}

/// Label for an audience, e.g. `LAWYER` -> `Legal Professionals`.
/// Unknown audiences get `_` -> ` `.
pub fn audience_display_name(audience: &str) -> String {
    match AUDIENCE_NAMES.get(audience) {
        Some(name) => name.to_string(),
        None => audience.replace('_', " "),
    }
}
