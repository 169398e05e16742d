use clap::{Parser, Subcommand};
use oasis_api::MediaSort;
use oasis_core::theme::ThemeMode;

/// Browse, search and bookmark anime from the AniList catalog.
#[derive(Parser, Debug)]
#[command(name = "oasis", version)]
pub struct Cli {
    /// GraphQL endpoint to use instead of the configured one
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// What is trending right now
    Trending {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Search and filter the catalog
    Browse {
        /// Title search
        #[arg(short, long, default_value = "")]
        search: String,

        /// Genre filter, e.g. "Slice of Life"
        #[arg(short, long, default_value = "")]
        genre: String,

        /// POPULARITY_DESC, SCORE_DESC, TRENDING_DESC, START_DATE_DESC, EPISODES_DESC
        /// (or popularity, score, trending, newest, most-episodes)
        #[arg(long)]
        sort: Option<MediaSort>,

        /// How many pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Show the watchlist instead of the catalog
        #[arg(long)]
        watchlist: bool,
    },

    /// Details for one title
    Show { id: u64 },

    /// List genres
    Genres {
        /// Ask the catalog instead of using the built-in list
        #[arg(long)]
        remote: bool,
    },

    /// Manage bookmarked titles
    Watchlist {
        #[command(subcommand)]
        action: Option<WatchlistAction>,
    },

    /// Show or change light/dark mode
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Sign in with an identity provider credential (JWT)
    Login { credential: String },

    /// Forget the signed-in user
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Interactive browsing prompt
    Interactive,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum WatchlistAction {
    /// List bookmarked titles (default)
    List,
    Add { id: u64 },
    Remove { id: u64 },
    Toggle { id: u64 },
    Clear,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ThemeAction {
    /// Print the current mode (default)
    Show,
    Toggle,
    Set { mode: ThemeMode },
}
