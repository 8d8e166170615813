//! The commit log: an ordered, offset-indexed, append-only record store

pub mod record;
pub mod store;

pub use record::Record;
pub use store::Log;
