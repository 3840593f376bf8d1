//! Data models for equipment datasets and user sessions.
//!
//! - [`EquipmentRecord`] - One parsed CSV row
//! - [`SummaryStatistics`] - Aggregates derived from a list of records
//! - [`DatasetEntry`] - A retained upload in the history log
//! - [`Session`] - Token/profile pair plus the storage scope holding it
//!
//! Field names follow the persisted JSON layout, so records written by one
//! version of the app can be read back byte-for-byte.

pub mod dataset;
pub mod equipment;
pub mod session;

pub use dataset::DatasetEntry;
pub use equipment::{EquipmentRecord, SummaryStatistics};
pub use session::{AuthTokens, Session, UserId, UserProfile};
