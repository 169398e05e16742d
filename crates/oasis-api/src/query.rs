//! Browse parameters shared by the catalog client and the feed.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::media::Anime;

/// Page size used for every paginated catalog request.
pub const PER_PAGE: u32 = 50;

/// Genres offered in the filter bar.
pub const ANIME_GENRES: &[&str] = &[
    "Action",
    "Adventure",
    "Comedy",
    "Drama",
    "Ecchi",
    "Fantasy",
    "Horror",
    "Mahou Shoujo",
    "Mecha",
    "Music",
    "Mystery",
    "Psychological",
    "Romance",
    "Sci-Fi",
    "Slice of Life",
    "Sports",
    "Supernatural",
    "Thriller",
];

/// Sort orders offered in the filter bar (AniList `MediaSort` subset).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaSort {
    #[default]
    #[serde(rename = "POPULARITY_DESC")]
    Popularity,
    #[serde(rename = "SCORE_DESC")]
    Score,
    #[serde(rename = "TRENDING_DESC")]
    Trending,
    #[serde(rename = "START_DATE_DESC")]
    Newest,
    #[serde(rename = "EPISODES_DESC")]
    MostEpisodes,
}

impl MediaSort {
    pub const ALL: &[MediaSort] = &[
        Self::Popularity,
        Self::Score,
        Self::Trending,
        Self::Newest,
        Self::MostEpisodes,
    ];

    /// Convert to the AniList GraphQL `MediaSort` enum value.
    pub fn to_anilist_str(self) -> &'static str {
        match self {
            Self::Popularity => "POPULARITY_DESC",
            Self::Score => "SCORE_DESC",
            Self::Trending => "TRENDING_DESC",
            Self::Newest => "START_DATE_DESC",
            Self::MostEpisodes => "EPISODES_DESC",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Popularity => "Popularity",
            Self::Score => "Score",
            Self::Trending => "Trending",
            Self::Newest => "Newest",
            Self::MostEpisodes => "Most Episodes",
        }
    }
}

impl std::fmt::Display for MediaSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MediaSort {
    type Err = String;

    /// Accepts the AniList wire name (`SCORE_DESC`) or the label (`score`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|sort| {
                sort.to_anilist_str().eq_ignore_ascii_case(needle)
                    || sort.label().eq_ignore_ascii_case(needle)
                    || sort.label().replace(' ', "-").eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| format!("unknown sort order: {s}"))
    }
}

/// The filter bar state: free-text search, genre and sort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseQuery {
    pub search: String,
    pub genre: String,
    pub sort: MediaSort,
}

impl BrowseQuery {
    /// GraphQL variables for a page of this query. Empty search and genre are
    /// left out so AniList applies no filter for them.
    pub fn variables(&self, page: u32, per_page: u32) -> serde_json::Value {
        let mut vars = serde_json::json!({
            "page": page,
            "perPage": per_page,
            "sort": [self.sort.to_anilist_str()],
        });
        let search = self.search.trim();
        if !search.is_empty() {
            vars["search"] = serde_json::json!(search);
        }
        let genre = self.genre.trim();
        if !genre.is_empty() {
            vars["genre"] = serde_json::json!(genre);
        }
        vars
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, Default)]
pub struct AnimePage {
    pub media: Vec<Anime>,
    pub has_next_page: bool,
}
