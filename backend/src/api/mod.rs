//! HTTP API module.

pub mod logs;
pub mod server;
pub mod types;

pub use logs::{LogEntry, LogLevel, LOG_BROADCASTER};
pub use server::{router, start_server};
pub use types::*;
