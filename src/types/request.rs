//! Request type definitions
//!
//! Bodies and query strings accepted by the HTTP API.

use serde::{Deserialize, Serialize};

/// `POST .../mark` body
///
/// A missing `ids` field is treated as an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkRequest {
    /// Ids to flag as seen
    #[serde(default)]
    pub ids: Vec<String>,
}

impl MarkRequest {
    /// Create a mark request
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// `?id=` query of the metadata lookups
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupQuery {
    /// Upstream title id
    pub id: Option<String>,
}

impl LookupQuery {
    /// Non-empty id, if one was supplied
    pub fn id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
