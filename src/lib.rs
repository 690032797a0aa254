//! # Leadboard
//!
//! A lead-management service: a SQLite-backed list of sales leads with filtering,
//! pagination, sorting, and funnel statistics over HTTP. Usable both as a
//! standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! leadboard = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use leadboard::server::{AppState, create_router};
//! use leadboard::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/leadboard.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store)));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the CLI module and its HTTP client. Disable with
//!   `default-features = false`.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod query;
pub mod server;
pub mod store;
pub mod types;
