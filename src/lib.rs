//! Personal portfolio site: typed store access, page controllers, image
//! ingestion and the HTTP surface that serves them.

pub mod config;
pub mod content;
pub mod db;
pub mod ingest;
pub mod listing;
pub mod logging;
pub mod pages;
pub mod server;
