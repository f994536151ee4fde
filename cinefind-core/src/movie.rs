//! Fully detailed movie record shared by search and storage.

use serde::{Deserialize, Serialize};

use crate::storage::StorageError;

/// Sentinel stored in any descriptive field the remote service did not supply.
pub const UNKNOWN: &str = "unknown";

/// A fully enriched movie as produced by the detail endpoint.
///
/// Every descriptive field holds [`UNKNOWN`] when the remote response omits it.
/// Identifier, title and year are always present; title and year are empty only
/// when the remote body was malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// External identifier (IMDb id)
    pub imdb_id: String,
    /// Display title
    pub title: String,
    /// Release year, possibly a range such as "2019–2021"
    pub year: String,
    /// Content rating (PG-13, R, ...)
    pub rated: String,
    /// Release date as reported remotely
    pub released: String,
    /// Runtime, e.g. "136 min"
    pub runtime: String,
    /// Comma separated genre list
    pub genre: String,
    /// Director(s), comma separated
    pub director: String,
    /// Writer(s), comma separated
    pub writer: String,
    /// Main cast, comma separated
    pub actors: String,
    /// Plot synopsis
    pub plot: String,
    /// Poster image URL
    pub poster: String,
    /// Aggregate rating on a 0-10 scale, as text
    pub imdb_rating: String,
    /// Media type (movie, series, episode)
    pub media_type: String,
}

impl MovieRecord {
    /// Creates the sentinel record used when a detail lookup fails.
    ///
    /// Only the identifier carries real data.
    pub fn unknown(imdb_id: impl Into<String>) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            title: UNKNOWN.to_string(),
            year: UNKNOWN.to_string(),
            rated: UNKNOWN.to_string(),
            released: UNKNOWN.to_string(),
            runtime: UNKNOWN.to_string(),
            genre: UNKNOWN.to_string(),
            director: UNKNOWN.to_string(),
            writer: UNKNOWN.to_string(),
            actors: UNKNOWN.to_string(),
            plot: UNKNOWN.to_string(),
            poster: UNKNOWN.to_string(),
            imdb_rating: UNKNOWN.to_string(),
            media_type: UNKNOWN.to_string(),
        }
    }

    /// True when this is a failed-lookup placeholder rather than real data.
    pub fn is_unknown(&self) -> bool {
        self.title == UNKNOWN && self.year == UNKNOWN && self.plot == UNKNOWN
    }

    /// Genres split out of the comma separated list.
    pub fn genres(&self) -> Vec<&str> {
        split_list(&self.genre)
    }

    /// Cast members split out of the comma separated list.
    pub fn cast(&self) -> Vec<&str> {
        split_list(&self.actors)
    }

    /// Case-insensitive substring match against any cast member.
    pub fn has_cast_member(&self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.cast()
            .iter()
            .any(|member| member.to_lowercase().contains(&needle))
    }

    /// Numeric rating when the remote value parses.
    pub fn rating(&self) -> Option<f32> {
        self.imdb_rating.parse().ok()
    }

    /// Checks the record is fit for persistence.
    ///
    /// # Errors
    ///
    /// - `StorageError::InvalidRecord` - If the identifier or title is missing, or
    ///   the record is a failed-lookup placeholder
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.imdb_id.trim().is_empty() {
            return Err(StorageError::InvalidRecord {
                reason: "missing identifier".to_string(),
            });
        }
        if self.title.trim().is_empty() {
            return Err(StorageError::InvalidRecord {
                reason: format!("record {} has no title", self.imdb_id),
            });
        }
        if self.is_unknown() {
            return Err(StorageError::InvalidRecord {
                reason: format!("record {} was never enriched", self.imdb_id),
            });
        }
        Ok(())
    }
}

fn split_list(value: &str) -> Vec<&str> {
    if value == UNKNOWN {
        return Vec::new();
    }
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}
