//! Amazon Prime title details

use super::fields::{present, text_or, to_text};
use super::netflix::season_entries;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reshaped Prime title document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimeDetails {
    pub title: String,
    pub year: String,
    /// Language names joined with ", "
    pub languages: String,
    /// "Movie" or "Series"
    pub category: String,
}

impl PrimeDetails {
    /// Reshape a Prime title document
    pub fn from_document(doc: &Value) -> Self {
        let category = if season_entries(doc).is_some() {
            "Series"
        } else {
            "Movie"
        };

        Self {
            title: text_or(doc, "title", "Unknown"),
            year: text_or(doc, "year", "Unknown"),
            languages: join_languages(doc.get("lang")),
            category: category.to_string(),
        }
    }
}

/// `lang` entries are either plain names or `{"l": name}` objects
fn join_languages(lang: Option<&Value>) -> String {
    let entries = match lang {
        None | Some(Value::Null) => return "Unknown".to_string(),
        Some(Value::Array(entries)) => entries,
        Some(_) => return "Unknown".to_string(),
    };

    let joined = entries
        .iter()
        .map(|entry| match entry {
            Value::String(name) => name.clone(),
            other => present(other, "l").map_or_else(|| to_text(other), to_text),
        })
        .collect::<Vec<_>>()
        .join(", ");

    if joined.is_empty() {
        "Unknown".to_string()
    } else {
        joined
    }
}
