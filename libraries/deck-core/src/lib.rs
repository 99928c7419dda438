//! Deck Player Core
//!
//! Platform-agnostic core types, traits, and error handling for Deck Player.
//!
//! This crate provides the foundational building blocks shared by the queue
//! engine, the catalog client and the shells that drive them.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackId`, `TrackDetails`, `ValidatedTrack`, `Track`
//! - **Core Traits**: `CatalogProvider`
//! - **Error Handling**: Unified `DeckError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use deck_core::{Track, TrackDetails, TrackId, ValidatedTrack};
//!
//! let details = TrackDetails::new("Artist", "Song", "https://img.example/cover.jpg");
//! let validated = ValidatedTrack::valid(TrackId::new("abc123"), details);
//!
//! let track = Track::from(&validated);
//! assert_eq!(track.title, "Song");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{DeckError, Result};
pub use traits::CatalogProvider;
pub use types::{Track, TrackDetails, TrackId, ValidatedTrack};
