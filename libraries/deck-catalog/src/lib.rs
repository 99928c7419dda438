//! Deck Player Catalog Client
//!
//! HTTP implementation of [`deck_core::CatalogProvider`] against a video
//! catalog that speaks the Data API v3 wire format.
//!
//! # Features
//!
//! - **Playlists**: page through a playlist's items and collect video ids
//! - **Track details**: title, channel, localized title and the best thumbnail
//! - **Error mapping**: HTTP failures become [`CatalogError`], which converts
//!   into [`deck_core::DeckError`] at the provider boundary
//!
//! # Example
//!
//! ```ignore
//! use deck_catalog::{CatalogConfig, VideoCatalog};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = VideoCatalog::new(CatalogConfig::new("my-api-key"))?;
//!
//!     let ids = catalog.playlist_items("PL123").await?;
//!     println!("Playlist has {} videos", ids.len());
//!
//!     let details = catalog.track_details(&ids[0]).await?;
//!     println!("{} - {}", details.artist, details.title);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::VideoCatalog;
pub use error::{CatalogError, Result};
pub use types::{
    CatalogConfig, ContentDetails, Localized, PlaylistItem, PlaylistItemsResponse, Snippet,
    Thumbnail, Thumbnails, Video, VideoListResponse, DEFAULT_BASE_URL,
};
