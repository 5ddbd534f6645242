//! Spotify Web API implementation of [`AlbumCatalog`].
//!
//! [`SpotifyClient`] talks to two hosts: the accounts service, which turns
//! the long-lived refresh token into short-lived access tokens, and the Web
//! API proper. Both base URLs are configurable.
//!
//! [`AlbumCatalog`]: rankbot_core::catalog::AlbumCatalog

mod client;
pub mod error;
mod model;
mod token;

pub use client::{SpotifyClient, SpotifyConfig};
pub use error::{Error, Result};

#[cfg(test)]
mod tests;
