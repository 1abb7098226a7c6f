//! Netflix title details

use super::fields::{
    CAST_FIELDS, EPISODE_COUNT_FIELDS, SEASON_ID_FIELDS, SEASON_NUMBER_FIELDS, first_present,
    leading_int, present, text_or, to_text,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One season of a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: String,
    pub number: String,
    pub episode_count: u32,
}

/// Reshaped Netflix title document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetflixDetails {
    pub title: String,
    pub year: String,
    pub language: String,
    /// "Movie" or "Series"
    pub category: String,
    pub genre: String,
    pub cast: String,
    pub description: String,
    pub rating: String,
    #[serde(rename = "match")]
    pub match_score: String,
    pub runtime: String,
    pub quality: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasons: Option<Vec<Season>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_warning: Option<String>,
}

/// Season entries of a title document, if it describes a series
pub fn season_entries(doc: &Value) -> Option<&Vec<Value>> {
    doc.get("season")
        .and_then(Value::as_array)
        .filter(|seasons| !seasons.is_empty())
}

/// Id and number of the season at `index`, defaulting to its 1-based position
pub fn season_identity(season: &Value, index: usize) -> (String, String) {
    let position = (index + 1).to_string();
    let id = first_present(season, &SEASON_ID_FIELDS).map_or_else(|| position.clone(), to_text);
    let number = first_present(season, &SEASON_NUMBER_FIELDS).map_or(position, to_text);
    (id, number)
}

/// Episode count stated by the season entry itself, 0 when unknown
pub fn stated_episode_count(season: &Value) -> u32 {
    let declared = first_present(season, &EPISODE_COUNT_FIELDS)
        .and_then(leading_int)
        .filter(|count| *count > 0)
        .and_then(|count| u32::try_from(count).ok());

    declared
        .or_else(|| {
            season
                .get("episodes")
                .and_then(Value::as_array)
                .map(|episodes| u32::try_from(episodes.len()).unwrap_or(u32::MAX))
        })
        .unwrap_or(0)
}

/// Number of entries in an `episodes.php` body, if it parses
pub fn count_listed_episodes(body: &str) -> Option<u32> {
    let doc: Value = serde_json::from_str(body).ok()?;
    doc.get("episodes")
        .and_then(Value::as_array)
        .map(|episodes| u32::try_from(episodes.len()).unwrap_or(u32::MAX))
}

fn unescape_genre(genre: &str) -> String {
    genre.replace("&amp;", "&").replace("&quot;", "\"")
}

impl NetflixDetails {
    /// Reshape a title document whose `status` is `"y"`
    ///
    /// `seasons` is passed in already resolved because episode counts may
    /// need extra upstream calls.
    pub fn from_document(doc: &Value, seasons: Option<Vec<Season>>) -> Self {
        let category = if seasons.is_some() { "Series" } else { "Movie" };
        let optional = |field: &str| present(doc, field).map(to_text);

        Self {
            title: text_or(doc, "title", "Unknown"),
            year: text_or(doc, "year", "Unknown"),
            language: text_or(doc, "d_lang", "Unknown"),
            category: category.to_string(),
            genre: present(doc, "genre")
                .map(|genre| unescape_genre(&to_text(genre)))
                .unwrap_or_else(|| "Unknown".to_string()),
            cast: first_present(doc, &CAST_FIELDS).map_or_else(|| "Unknown".to_string(), to_text),
            description: text_or(doc, "desc", "No description available"),
            rating: text_or(doc, "ua", "Not rated"),
            match_score: text_or(doc, "match", "N/A"),
            runtime: text_or(doc, "runtime", "Unknown"),
            quality: text_or(doc, "hdsd", "Unknown"),
            creator: optional("creator"),
            director: optional("director"),
            seasons,
            content_warning: optional("m_reason"),
        }
    }
}
