//! One-shot subcommands.

use std::io::Write;

use oasis_api::{Anime, CatalogService, MediaSort, ANIME_GENRES};
use oasis_core::feed::{Feed, FeedStatus};
use oasis_core::watchlist::WatchlistChange;
use oasis_core::OasisError;

use crate::app::App;
use crate::cli::{ThemeAction, WatchlistAction};
use crate::format;

fn print_cards<W: Write>(app: &App, items: &[Anime], out: &mut W) -> Result<(), OasisError> {
    for anime in items {
        writeln!(out, "{}", format::card_line(anime, app.watchlist.contains(anime.id)))?;
    }
    Ok(())
}

fn print_feed_footer<C: CatalogService, W: Write>(
    feed: &Feed<C>,
    out: &mut W,
) -> Result<(), OasisError> {
    match feed.status() {
        FeedStatus::Ready if feed.has_next_page() && !feed.is_watchlist_only() => {
            writeln!(out, "-- page {}, more available --", feed.page())?;
        }
        status => {
            if let Some(message) = status.message() {
                writeln!(out, "{message}")?;
            }
        }
    }
    Ok(())
}

pub async fn trending<W: Write>(app: &App, page: u32, out: &mut W) -> Result<(), OasisError> {
    let result = app.client.trending(page.max(1)).await;
    let page_data = result.map_err(OasisError::catalog)?;
    print_cards(app, &page_data.media, out)?;
    if page_data.has_next_page {
        writeln!(out, "-- page {}, more available --", page.max(1))?;
    }
    Ok(())
}

pub async fn browse<W: Write>(
    app: &App,
    search: String,
    genre: String,
    sort: Option<MediaSort>,
    pages: u32,
    watchlist_only: bool,
    out: &mut W,
) -> Result<(), OasisError> {
    let mut feed = app.feed(search, genre, sort);
    if watchlist_only {
        feed.toggle_watchlist_view();
    }

    feed.reload(&app.watchlist).await?;
    for _ in 1..pages.max(1) {
        if !feed.load_more().await? {
            break;
        }
    }

    print_cards(app, feed.items(), out)?;
    print_feed_footer(&feed, out)
}

pub async fn show<W: Write>(app: &App, id: u64, out: &mut W) -> Result<(), OasisError> {
    let result = app.client.get(id).await;
    match result.map_err(OasisError::catalog)? {
        Some(anime) => write!(out, "{}", format::detail(&anime, app.watchlist.contains(id)))?,
        None => writeln!(out, "No anime with ID {id}.")?,
    }
    Ok(())
}

pub async fn genres<W: Write>(app: &App, remote: bool, out: &mut W) -> Result<(), OasisError> {
    let genres = if remote {
        let result = app.client.genres().await;
        result.map_err(OasisError::catalog)?
    } else {
        ANIME_GENRES.iter().map(|g| g.to_string()).collect()
    };
    for genre in genres {
        writeln!(out, "{genre}")?;
    }
    Ok(())
}

pub async fn watchlist<W: Write>(
    app: &mut App,
    action: WatchlistAction,
    out: &mut W,
) -> Result<(), OasisError> {
    match action {
        WatchlistAction::List => {
            if app.watchlist.is_empty() {
                writeln!(out, "{}", FeedStatus::EmptyWatchlist.message().unwrap_or_default())?;
                return Ok(());
            }
            let result = app.client.by_ids(app.watchlist.ids()).await;
            let items = result.map_err(OasisError::catalog)?;
            print_cards(app, &items, out)?;
            let missing = app.watchlist.len().saturating_sub(items.len());
            if missing > 0 {
                writeln!(out, "({missing} bookmarked titles are no longer in the catalog)")?;
            }
        }
        WatchlistAction::Add { id } => {
            if app.watchlist.add(&app.store, id)? {
                writeln!(out, "Added {id} to the watchlist.")?;
            } else {
                writeln!(out, "{id} is already on the watchlist.")?;
            }
        }
        WatchlistAction::Remove { id } => {
            if app.watchlist.remove(&app.store, id)? {
                writeln!(out, "Removed {id} from the watchlist.")?;
            } else {
                writeln!(out, "{id} is not on the watchlist.")?;
            }
        }
        WatchlistAction::Toggle { id } => match app.watchlist.toggle(&app.store, id)? {
            WatchlistChange::Added => writeln!(out, "Added {id} to the watchlist.")?,
            WatchlistChange::Removed => writeln!(out, "Removed {id} from the watchlist.")?,
        },
        WatchlistAction::Clear => {
            let count = app.watchlist.len();
            app.watchlist.clear(&app.store)?;
            writeln!(out, "Cleared {count} titles from the watchlist.")?;
        }
    }
    Ok(())
}

pub fn theme<W: Write>(app: &mut App, action: ThemeAction, out: &mut W) -> Result<(), OasisError> {
    match action {
        ThemeAction::Show => writeln!(out, "{}", app.theme.mode())?,
        ThemeAction::Toggle => {
            let mode = app.theme.toggle(&app.store)?;
            writeln!(out, "{mode}")?;
        }
        ThemeAction::Set { mode } => {
            app.theme.set(&app.store, mode)?;
            writeln!(out, "{mode}")?;
        }
    }
    Ok(())
}

pub fn login<W: Write>(app: &mut App, credential: &str, out: &mut W) -> Result<(), OasisError> {
    let user = app.session.sign_in(&app.store, credential)?;
    writeln!(out, "Signed in as {}.", user.name)?;
    Ok(())
}

pub fn logout<W: Write>(app: &mut App, out: &mut W) -> Result<(), OasisError> {
    app.session.sign_out(&app.store)?;
    writeln!(out, "Signed out.")?;
    Ok(())
}

pub fn whoami<W: Write>(app: &App, out: &mut W) -> Result<(), OasisError> {
    match app.session.current() {
        Some(user) => {
            writeln!(out, "{}", user.name)?;
            if !user.avatar_url.is_empty() {
                writeln!(out, "{}", user.avatar_url)?;
            }
        }
        None => writeln!(out, "Not signed in.")?,
    }
    Ok(())
}
