//! Common utilities and types shared across proglog

pub mod config;
pub mod error;
pub mod metrics;
pub mod tracing_middleware;

pub use config::Config;
pub use error::{Error, Result};
pub use metrics::MetricsRegistry;
pub use tracing_middleware::{request_tracing_middleware, REQUEST_ID_HEADER, UNMATCHED_ROUTE};
