use std::collections::HashMap;

use reqwest::{Client, StatusCode};

use super::error::AniListError;
use super::types::{
    join_error_messages, GenreCollectionResponse, GraphQLResponse, MediaResponse, PageResponse,
};
use crate::media::Anime;
use crate::query::{AnimePage, BrowseQuery, MediaSort, PER_PAGE};
use crate::traits::CatalogService;

macro_rules! anime_fields {
    () => {
        r#"
fragment AnimeFields on Media {
    id
    idMal
    title { romaji english native }
    description(asHtml: false)
    genres
    coverImage { extraLarge large medium }
    bannerImage
    averageScore
    episodes
    status
}
"#
    };
}

const BROWSE_QUERY: &str = concat!(
    r#"
query ($page: Int, $perPage: Int, $search: String, $genre: String, $sort: [MediaSort]) {
    Page(page: $page, perPage: $perPage) {
        pageInfo { hasNextPage }
        media(search: $search, genre: $genre, type: ANIME, sort: $sort) {
            ...AnimeFields
        }
    }
}
"#,
    anime_fields!()
);

const BY_IDS_QUERY: &str = concat!(
    r#"
query ($ids: [Int], $perPage: Int) {
    Page(page: 1, perPage: $perPage) {
        media(id_in: $ids, type: ANIME) {
            ...AnimeFields
        }
    }
}
"#,
    anime_fields!()
);

const GET_ANIME_QUERY: &str = concat!(
    r#"
query ($id: Int) {
    Media(id: $id, type: ANIME) {
        ...AnimeFields
    }
}
"#,
    anime_fields!()
);

const GENRE_COLLECTION_QUERY: &str = r#"
query {
    GenreCollection
}
"#;

/// AniList GraphQL catalog client. Anonymous: every query used here is public.
#[derive(Debug, Clone)]
pub struct AniListClient {
    api_url: String,
    per_page: u32,
    http: Client,
}

impl AniListClient {
    /// Client against a GraphQL endpoint, normally `https://graphql.anilist.co`.
    pub fn with_endpoint(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            per_page: PER_PAGE,
            http: Client::new(),
        }
    }

    /// Override the page size. AniList caps pages at 50 items.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, PER_PAGE);
        self
    }

    async fn graphql_request<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, AniListError> {
        tracing::debug!(operation, "AniList GraphQL request");

        let resp = self
            .http
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            tracing::warn!(operation, ?retry_after, "AniList rate limit hit");
            return Err(AniListError::RateLimited { retry_after });
        }

        let body = resp.text().await?;

        if !status.is_success() {
            let status_code = status.as_u16();
            tracing::warn!(operation, status = status_code, "AniList API error");
            // Failed queries still carry a GraphQL error list worth surfacing.
            if let Ok(parsed) = serde_json::from_str::<GraphQLResponse<serde_json::Value>>(&body) {
                if let Some(errors) = parsed.errors.filter(|e| !e.is_empty()) {
                    return Err(AniListError::GraphQl(join_error_messages(&errors)));
                }
            }
            return Err(AniListError::Api {
                status: status_code,
                message: body,
            });
        }

        tracing::debug!(operation, status = %status, "AniList response received");
        let parsed: GraphQLResponse<T> =
            serde_json::from_str(&body).map_err(|e| AniListError::Parse(e.to_string()))?;

        if let Some(errors) = parsed.errors.filter(|e| !e.is_empty()) {
            let message = join_error_messages(&errors);
            tracing::warn!(operation, %message, "AniList GraphQL errors");
            return Err(AniListError::GraphQl(message));
        }

        parsed
            .data
            .ok_or_else(|| AniListError::Parse("response carries no data".into()))
    }

    /// Popularity-sorted title search.
    pub async fn search(&self, search: &str, page: u32) -> Result<AnimePage, AniListError> {
        let query = BrowseQuery {
            search: search.to_string(),
            ..Default::default()
        };
        self.browse_page(&query, page).await
    }

    /// What is trending right now.
    pub async fn trending(&self, page: u32) -> Result<AnimePage, AniListError> {
        let query = BrowseQuery {
            sort: MediaSort::Trending,
            ..Default::default()
        };
        self.browse_page(&query, page).await
    }

    async fn browse_page(&self, query: &BrowseQuery, page: u32) -> Result<AnimePage, AniListError> {
        let resp: PageResponse = self
            .graphql_request(
                "Browse",
                BROWSE_QUERY,
                query.variables(page.max(1), self.per_page),
            )
            .await?;
        Ok(resp.into_anime_page())
    }

    async fn by_ids_chunk(&self, ids: &[u64]) -> Result<Vec<Anime>, AniListError> {
        let resp: PageResponse = self
            .graphql_request(
                "AnimeByIds",
                BY_IDS_QUERY,
                serde_json::json!({ "ids": ids, "perPage": ids.len() }),
            )
            .await?;
        Ok(resp.page.media)
    }
}

impl CatalogService for AniListClient {
    type Error = AniListError;

    async fn browse(&self, query: &BrowseQuery, page: u32) -> Result<AnimePage, AniListError> {
        self.browse_page(query, page).await
    }

    async fn by_ids(&self, ids: &[u64]) -> Result<Vec<Anime>, AniListError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let chunks = ids
            .chunks(PER_PAGE as usize)
            .map(|chunk| self.by_ids_chunk(chunk));
        let fetched = futures::future::try_join_all(chunks).await?;

        // `id_in` does not preserve the requested order.
        let mut by_id: HashMap<u64, Anime> = fetched
            .into_iter()
            .flatten()
            .map(|anime| (anime.id, anime))
            .collect();
        let ordered: Vec<Anime> = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        if ordered.len() < ids.len() {
            tracing::debug!(
                requested = ids.len(),
                returned = ordered.len(),
                "some IDs are no longer in the catalog"
            );
        }
        Ok(ordered)
    }

    async fn get(&self, id: u64) -> Result<Option<Anime>, AniListError> {
        let result: Result<MediaResponse, _> = self
            .graphql_request("GetAnime", GET_ANIME_QUERY, serde_json::json!({ "id": id }))
            .await;
        match result {
            Ok(resp) => Ok(resp.media),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn genres(&self) -> Result<Vec<String>, AniListError> {
        let resp: GenreCollectionResponse = self
            .graphql_request(
                "GenreCollection",
                GENRE_COLLECTION_QUERY,
                serde_json::json!({}),
            )
            .await?;
        Ok(resp.into_genres())
    }
}
