//! # tunarr-client
//!
//! HTTP client for the Tunarr server's channel/program API.
//!
//! This crate provides:
//! - [`TunarrClient`], an async `reqwest`-backed client
//! - One method per remote operation: channel listing, the per-channel
//!   movie/show pagers, media source listing, program search
//! - Typed, re-keyed result envelopes ready for tool output
//!
//! Shape validation of every response body lives in `tunarr-core`; this
//! crate owns transport concerns only.

pub mod client;

pub use client::{
    ChannelList, MediaSourceList, MoviesPage, SearchResults, ShowsPage, TunarrClient,
};
