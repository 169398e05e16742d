use thiserror::Error;

/// Errors from the AniList GraphQL client.
#[derive(Debug, Error)]
pub enum AniListError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("AniList API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("rate limited by AniList (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl AniListError {
    /// Whether the catalog reported the requested record as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status == 404,
            Self::GraphQl(message) => message.contains("Not Found"),
            _ => false,
        }
    }
}
