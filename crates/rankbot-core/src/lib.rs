//! Core types and trait definitions for the album ranking bot.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The storage backend, the catalog client and the chat front-end all depend
//! on it; it depends on nothing proprietary.

pub mod album;
pub mod catalog;
pub mod error;
pub mod matching;
pub mod reconcile;
pub mod stats;
pub mod store;
pub mod text;

pub use error::{Error, Result};
