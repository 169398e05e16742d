//! Plain-text views of catalog records.

use oasis_api::{Anime, User};
use oasis_core::theme::ThemeMode;

/// One grid card as a single line.
pub fn card_line(anime: &Anime, watchlisted: bool) -> String {
    let mark = if watchlisted { '*' } else { ' ' };
    let mut line = format!(
        "[{mark}] {:>7}  {}  | {} | {} eps",
        anime.id,
        anime.title.display(),
        anime.score_label(),
        anime.episodes_label()
    );
    if let Some(status) = anime.status {
        line.push_str(" | ");
        line.push_str(status.label());
    }
    line
}

/// The detail panel.
pub fn detail(anime: &Anime, watchlisted: bool) -> String {
    let mut out = String::new();
    out.push_str(anime.title.display());
    out.push('\n');

    let alternates: Vec<&str> = [&anime.title.romaji, &anime.title.native]
        .into_iter()
        .filter_map(|t| t.as_deref())
        .filter(|t| *t != anime.title.display())
        .collect();
    if !alternates.is_empty() {
        out.push_str(&alternates.join(" / "));
        out.push('\n');
    }

    out.push('\n');
    let status = anime.status.map(|s| s.label()).unwrap_or("Unknown");
    out.push_str(&format!("Status:    {status}\n"));
    out.push_str(&format!("Episodes:  {}\n", anime.episodes_label()));
    out.push_str(&format!("Score:     {}\n", anime.score_label()));
    if !anime.genres.is_empty() {
        out.push_str(&format!("Genres:    {}\n", anime.genres.join(", ")));
    }
    if let Some(image) = anime.banner_or_cover() {
        out.push_str(&format!("Image:     {image}\n"));
    }
    out.push_str(&format!("AniList:   https://anilist.co/anime/{}\n", anime.id));
    if let Some(mal) = anime.id_mal {
        out.push_str(&format!("MAL:       https://myanimelist.net/anime/{mal}\n"));
    }
    out.push_str(&format!(
        "Watchlist: {}\n",
        if watchlisted { "yes" } else { "no" }
    ));
    out.push('\n');
    out.push_str(&anime.clean_description());
    out.push('\n');
    out
}

pub fn header(theme: ThemeMode, user: Option<&User>) -> String {
    match user {
        Some(user) => format!("Anime Oasis [{theme}]  signed in as {}", user.name),
        None => format!("Anime Oasis [{theme}]  not signed in"),
    }
}
