//! Catalog media model.
//!
//! Records are deserialized straight from the AniList `Media` object and are
//! treated as read-only snapshots afterwards.

use serde::{Deserialize, Serialize};

const NO_DESCRIPTION: &str = "No description available.";

/// A single title with language variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

impl AnimeTitle {
    /// Returns the best available display title, preferring English.
    pub fn display(&self) -> &str {
        self.english
            .as_deref()
            .or(self.romaji.as_deref())
            .or(self.native.as_deref())
            .unwrap_or("Unknown")
    }
}

/// Cover art in the sizes AniList serves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImage {
    pub extra_large: Option<String>,
    pub large: Option<String>,
    pub medium: Option<String>,
}

impl CoverImage {
    /// The largest available size.
    pub fn best(&self) -> Option<&str> {
        self.extra_large
            .as_deref()
            .or(self.large.as_deref())
            .or(self.medium.as_deref())
    }
}

/// Airing status of a title (AniList `MediaStatus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaStatus {
    Finished,
    Releasing,
    NotYetReleased,
    Cancelled,
    Hiatus,
    #[serde(other)]
    Unknown,
}

impl MediaStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Finished => "Finished",
            Self::Releasing => "Airing",
            Self::NotYetReleased => "Not Yet Aired",
            Self::Cancelled => "Cancelled",
            Self::Hiatus => "On Hiatus",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An anime record as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anime {
    pub id: u64,
    #[serde(default)]
    pub id_mal: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: AnimeTitle,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cover_image: CoverImage,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub average_score: Option<u32>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<MediaStatus>,
}

impl Anime {
    /// Description with markup stripped, or a placeholder when there is none.
    pub fn clean_description(&self) -> String {
        let raw = self.description.as_deref().unwrap_or_default();
        let cleaned = decode_entities(&strip_tags(raw));
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            cleaned.to_string()
        }
    }

    /// Wide artwork for detail views: the banner, falling back to the cover.
    pub fn banner_or_cover(&self) -> Option<&str> {
        self.banner_image
            .as_deref()
            .or(self.cover_image.extra_large.as_deref())
            .or_else(|| self.cover_image.best())
    }

    pub fn score_label(&self) -> String {
        match self.average_score {
            Some(score) => format!("{score}%"),
            None => "N/A".to_string(),
        }
    }

    pub fn episodes_label(&self) -> String {
        match self.episodes {
            Some(n) => n.to_string(),
            None => "?".to_string(),
        }
    }
}

/// A signed-in user as shown in the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub avatar_url: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Remove anything between `<` and `>` (inclusive). An unterminated tag runs
/// to the end of the input.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn decode_entities(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
