//! Facesearch Bot - Telegram front end for a face-search service
//!
//! Receives photos from Telegram, uploads them to the search service and
//! replies with the ranked matches as a photo album.

pub mod bot;
pub mod cli;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use bot::Bot;
pub use core::{decode, format_results, DecodeError};
pub use models::{MatchRecord, PresentableItem};
