//! HTTP surface of the log: router and handlers, server runner, and client

pub mod client;
pub mod http;
pub mod server;
pub mod types;

pub use client::LogClient;
pub use http::{create_router, AppState};
pub use server::LogServer;
pub use types::{ConsumeRequest, ConsumeResponse, ProduceRequest, ProduceResponse};
