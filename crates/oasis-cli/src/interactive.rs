//! Line-oriented browse prompt.
//!
//! Plain text searches the catalog after the debounce delay; a burst of
//! lines (e.g. a paste) issues one request for the last one. Lines starting
//! with `:` are commands.

use std::io::Write;

use oasis_api::{CatalogService, MediaSort};
use oasis_core::debounce::{DebounceTicket, Debouncer};
use oasis_core::feed::{Feed, FeedStatus, FilterChange};
use oasis_core::watchlist::WatchlistChange;
use oasis_core::OasisError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::app::App;
use crate::format;

const HELP: &str = "\
<text>            search titles (empty line clears the search)
:genre <name>     filter by genre (:genre none to clear)
:sort <order>     popularity, score, trending, newest, most-episodes
:more             load the next page
:watchlist        switch between the catalog and the watchlist
:toggle <id>      bookmark or unbookmark a title
:show <id>        details for one title
:theme            toggle light/dark
:help             this text
:quit             leave";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Search(String),
    Genre(String),
    Sort(MediaSort),
    More,
    Watchlist,
    Toggle(u64),
    Show(u64),
    Theme,
    Help,
    Quit,
}

fn parse_line(line: &str) -> Result<Action, String> {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Action::Search(line.to_string()));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    let id = || {
        arg.parse::<u64>()
            .map_err(|_| format!(":{name} needs a numeric ID"))
    };

    match name {
        "genre" | "g" => {
            if arg.is_empty() || arg.eq_ignore_ascii_case("none") {
                Ok(Action::Genre(String::new()))
            } else {
                Ok(Action::Genre(arg.to_string()))
            }
        }
        "sort" | "s" => arg.parse().map(Action::Sort),
        "more" | "m" => Ok(Action::More),
        "watchlist" | "w" => Ok(Action::Watchlist),
        "toggle" | "t" => id().map(Action::Toggle),
        "show" => id().map(Action::Show),
        "theme" => Ok(Action::Theme),
        "help" | "h" | "?" => Ok(Action::Help),
        "quit" | "q" | "exit" => Ok(Action::Quit),
        other => Err(format!("unknown command :{other} (try :help)")),
    }
}

struct Session<'a, C, W> {
    app: &'a mut App,
    feed: Feed<C>,
    out: W,
}

impl<C: CatalogService, W: Write> Session<'_, C, W> {
    async fn reload(&mut self) -> Result<(), OasisError> {
        let result = self.feed.reload(&self.app.watchlist).await;
        if let Err(e) = result {
            tracing::debug!(error = %e, "reload failed");
        }
        self.render(0)
    }

    /// Print the header, the cards from `from` onward and the status line.
    fn render(&mut self, from: usize) -> Result<(), OasisError> {
        if from == 0 {
            writeln!(
                self.out,
                "{}",
                format::header(self.app.theme.mode(), self.app.session.current())
            )?;
            let query = self.feed.query();
            let view = if self.feed.is_watchlist_only() {
                "watchlist".to_string()
            } else {
                format!(
                    "search: {:?}  genre: {}  sort: {}",
                    query.search,
                    if query.genre.is_empty() { "All" } else { query.genre.as_str() },
                    query.sort
                )
            };
            writeln!(self.out, "{view}")?;
        }

        for anime in self.feed.items().iter().skip(from) {
            let line = format::card_line(anime, self.app.watchlist.contains(anime.id));
            writeln!(self.out, "{line}")?;
        }

        match self.feed.status() {
            FeedStatus::Ready if !self.feed.is_watchlist_only() => {
                writeln!(self.out, "-- page {}, :more for the next --", self.feed.page())?;
            }
            status => {
                if let Some(message) = status.message() {
                    writeln!(self.out, "{message}")?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }

    async fn apply(&mut self, change: FilterChange) -> Result<(), OasisError> {
        if self.feed.apply_filters(change) {
            self.reload().await?;
        }
        Ok(())
    }

    /// Apply a settled search unless a newer one arrived while it was queued.
    async fn settle_search(
        &mut self,
        debouncer: &Debouncer,
        ticket: DebounceTicket,
        text: String,
    ) -> Result<(), OasisError> {
        if debouncer.is_current(ticket) {
            self.apply(FilterChange {
                search: Some(text),
                ..Default::default()
            })
            .await?;
        }
        Ok(())
    }

    /// Run one command. Returns `false` to leave the prompt.
    async fn handle(&mut self, action: Action) -> Result<bool, OasisError> {
        match action {
            // Searches go through the debouncer; see `run`.
            Action::Search(_) => {}
            Action::Genre(genre) => {
                self.apply(FilterChange {
                    genre: Some(genre),
                    ..Default::default()
                })
                .await?;
            }
            Action::Sort(sort) => {
                self.apply(FilterChange {
                    sort: Some(sort),
                    ..Default::default()
                })
                .await?;
            }
            Action::More => {
                let before = self.feed.items().len();
                match self.feed.load_more().await {
                    Ok(true) => self.render(before)?,
                    Ok(false) => writeln!(self.out, "Nothing more to load.")?,
                    Err(_) => self.render(before)?,
                }
            }
            Action::Watchlist => {
                self.feed.toggle_watchlist_view();
                self.reload().await?;
            }
            Action::Toggle(id) => {
                let change = self.app.watchlist.toggle(&self.app.store, id)?;
                match change {
                    WatchlistChange::Added => writeln!(self.out, "Added {id} to the watchlist.")?,
                    WatchlistChange::Removed => {
                        writeln!(self.out, "Removed {id} from the watchlist.")?
                    }
                }
                if self.feed.is_watchlist_only() {
                    self.reload().await?;
                }
            }
            Action::Show(id) => {
                let result = self.feed.catalog().get(id).await;
                match result {
                    Ok(Some(anime)) => {
                        let text = format::detail(&anime, self.app.watchlist.contains(id));
                        write!(self.out, "{text}")?;
                    }
                    Ok(None) => writeln!(self.out, "No anime with ID {id}.")?,
                    Err(e) => {
                        tracing::warn!(error = %e, id, "detail request failed");
                        writeln!(self.out, "{}", FeedStatus::Error.message().unwrap_or_default())?;
                    }
                }
            }
            Action::Theme => {
                let mode = self.app.theme.toggle(&self.app.store)?;
                writeln!(self.out, "Theme: {mode}")?;
            }
            Action::Help => writeln!(self.out, "{HELP}")?,
            Action::Quit => return Ok(false),
        }
        self.out.flush()?;
        Ok(true)
    }
}

/// Run the prompt on stdin/stdout until `:quit` or end of input.
pub async fn run(app: &mut App) -> Result<(), OasisError> {
    let feed = app.feed(String::new(), String::new(), None);
    let debouncer = Debouncer::new(app.config.browse.debounce());
    let input = BufReader::new(tokio::io::stdin());
    drive(app, feed, debouncer, input, std::io::stdout()).await
}

async fn drive<C, R, W>(
    app: &mut App,
    feed: Feed<C>,
    debouncer: Debouncer,
    input: R,
    out: W,
) -> Result<(), OasisError>
where
    C: CatalogService,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = Session { app, feed, out };
    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<(DebounceTicket, String)>();
    let mut lines = input.lines();

    session.reload().await?;
    writeln!(session.out, "Type to search, :help for commands.")?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line) {
                    Ok(Action::Search(text)) => {
                        let ticket = debouncer.trigger();
                        let debouncer = debouncer.clone();
                        let tx = settled_tx.clone();
                        tokio::spawn(async move {
                            if debouncer.settle(ticket).await {
                                let _ = tx.send((ticket, text));
                            }
                        });
                    }
                    Ok(action) => {
                        if !session.handle(action).await? {
                            return Ok(());
                        }
                    }
                    Err(message) => writeln!(session.out, "{message}")?,
                }
            }
            Some((ticket, text)) = settled_rx.recv() => {
                session.settle_search(&debouncer, ticket, text).await?;
            }
        }
    }

    // End of input: a search typed just before it still runs.
    drop(settled_tx);
    while let Some((ticket, text)) = settled_rx.recv().await {
        session.settle_search(&debouncer, ticket, text).await?;
    }
    Ok(())
}
