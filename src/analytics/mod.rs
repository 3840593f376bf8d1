//! Aggregation over parsed equipment rows

pub mod summary;

pub use summary::summarize;
