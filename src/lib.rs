//! On-demand article ingestion for a user's subscribed Atom/RSS feeds.
//!
//! Articles are never stored: each read resolves the feed through the
//! directory, fetches its document once and parses it fresh.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod services;
pub mod sources;
pub mod storage;
