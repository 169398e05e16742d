pub mod anilist;
pub mod identity;
pub mod media;
pub mod query;
pub mod traits;

pub use anilist::{AniListClient, AniListError};
pub use identity::{decode_credential, IdentityError};
pub use media::{Anime, AnimeTitle, CoverImage, MediaStatus, User};
pub use query::{AnimePage, BrowseQuery, MediaSort, ANIME_GENRES, PER_PAGE};
pub use traits::CatalogService;
