use serde::Deserialize;

use crate::media::Anime;
use crate::query::AnimePage;

// ── GraphQL response wrappers ────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQLErrorMessage>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLErrorMessage {
    pub message: String,
    pub status: Option<u16>,
}

/// Join every error message the way the API reports them, comma separated.
pub fn join_error_messages(errors: &[GraphQLErrorMessage]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Page queries ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PageResponse {
    #[serde(rename = "Page")]
    pub page: PageData,
}

#[derive(Debug, Deserialize)]
pub struct PageData {
    #[serde(rename = "pageInfo")]
    pub page_info: Option<PageInfo>,
    #[serde(default)]
    pub media: Vec<Anime>,
}

#[derive(Debug, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "hasNextPage")]
    pub has_next_page: Option<bool>,
}

impl PageResponse {
    pub fn into_anime_page(self) -> AnimePage {
        let has_next_page = self
            .page
            .page_info
            .and_then(|info| info.has_next_page)
            .unwrap_or(false);
        AnimePage {
            media: self.page.media,
            has_next_page,
        }
    }
}

// ── Single media ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MediaResponse {
    #[serde(rename = "Media")]
    pub media: Option<Anime>,
}

// ── Genres ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenreCollectionResponse {
    #[serde(rename = "GenreCollection")]
    pub genre_collection: Vec<Option<String>>,
}

impl GenreCollectionResponse {
    pub fn into_genres(self) -> Vec<String> {
        self.genre_collection.into_iter().flatten().collect()
    }
}
