//! # proglog
//!
//! An in-memory, append-only commit log served over HTTP.
//!
//! Records are appended to a single [`Log`] and receive a dense, zero-based
//! offset; any record can then be read back by that offset.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  JSON over HTTP  ┌──────────────────────┐
//! │  LogClient / │ ───────────────▶ │  api::http (axum)    │
//! │  any client  │                  │   POST /  GET /      │
//! └──────────────┘                  └──────────┬───────────┘
//!                                              │ Arc<Log>
//!                                   ┌──────────▼───────────┐
//!                                   │  log::Log            │
//!                                   │  Mutex<Vec<Record>>  │
//!                                   └──────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ### Start a server
//! ```bash
//! proglog-server serve --bind 127.0.0.1:8080
//! ```
//!
//! ### Use the CLI
//! ```bash
//! proglog produce hello
//! proglog consume 0
//! ```

pub mod api;
pub mod common;
pub mod log;

// Re-export commonly used types
pub use api::{LogClient, LogServer};
pub use common::{Config, Error, Result};
pub use log::{Log, Record};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
