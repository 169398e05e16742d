use oasis_api::{AniListClient, BrowseQuery, MediaSort};
use oasis_core::config::AppConfig;
use oasis_core::feed::Feed;
use oasis_core::session::UserSession;
use oasis_core::storage::Storage;
use oasis_core::theme::Theme;
use oasis_core::watchlist::Watchlist;
use oasis_core::OasisError;

/// Everything a command needs: config, local state and the catalog client.
pub struct App {
    pub config: AppConfig,
    pub store: Storage,
    pub watchlist: Watchlist,
    pub theme: Theme,
    pub session: UserSession,
    pub client: AniListClient,
}

impl App {
    /// Open the on-disk database named by the config.
    pub fn open(config: AppConfig) -> Result<Self, OasisError> {
        let db_path = AppConfig::ensure_db_path()?;
        tracing::debug!(path = %db_path.display(), "opening database");
        let store = Storage::open(&db_path)?;
        Self::with_store(config, store)
    }

    pub fn with_store(config: AppConfig, store: Storage) -> Result<Self, OasisError> {
        let watchlist = Watchlist::load(&store)?;
        let theme = Theme::load(&store, config.appearance.theme)?;
        let session = UserSession::restore(&store)?;
        let client = AniListClient::with_endpoint(config.catalog.api_url.clone())
            .with_per_page(config.catalog.per_page);
        Ok(Self {
            config,
            store,
            watchlist,
            theme,
            session,
            client,
        })
    }

    /// A fresh feed over the catalog. Without an explicit sort the
    /// configured default applies.
    pub fn feed(
        &self,
        search: String,
        genre: String,
        sort: Option<MediaSort>,
    ) -> Feed<AniListClient> {
        let query = BrowseQuery {
            search,
            genre,
            sort: sort.unwrap_or(self.config.browse.default_sort),
        };
        Feed::with_query(self.client.clone(), query)
    }
}
