//! Request history: an append-only JSONL log of backend requests and the
//! aggregation behind `seo-research history`.

pub mod logger;
pub mod reporter;

pub use logger::{RequestLog, RequestLogEntry};
pub use reporter::{HistoryStats, compute_stats};
