//! Core library for quotabar.
//!
//! Turns a subscription usage snapshot into fixed-width progress bars:
//!
//! - [`usage`]: endpoint response types, credentials and the HTTP fetcher
//! - [`window`]: fill/time fractions for a rolling quota window
//! - [`render`]: bar styles (ascii, unicode, braille, minimal)
//! - [`cache`]: fetch and output cache tiers behind [`cache::CacheStore`]
//! - [`config`]: render settings and the persisted config cycler

pub mod cache;
pub mod config;
pub mod error;
pub mod render;
pub mod usage;
pub mod window;

pub use error::UsageError;
