//! Rolling history of recent uploads
//!
//! The log (newest first, at most `capacity` entries) lives under `user_history_logs` in the
//! durable scope. Each entry's rows are stored separately under `rows_<id>`, and are deleted
//! when their entry is evicted.

pub mod store;

pub use store::{ActiveDataset, DEFAULT_HISTORY_CAPACITY, HistoryStore};
