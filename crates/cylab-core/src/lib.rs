//! cylab-core: Test-record store, statistics, filtering, and CSV export.
//!
//! This crate holds the session-scoped record store and the pure functions
//! that derive display views from it. Nothing here knows about presentation.

pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod model;
pub mod statistics;
pub mod store;

pub use error::{CsvError, RecordError};
pub use model::TestRecord;
pub use store::RecordStore;
