//! Stint Storage Layer
//!
//! SQLite-backed key/value records for tracker state.
//! Every record write replaces the previous value wholesale.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
