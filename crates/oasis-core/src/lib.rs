pub mod config;
pub mod debounce;
pub mod error;
pub mod feed;
pub mod session;
pub mod storage;
pub mod theme;
pub mod watchlist;

pub use error::OasisError;
