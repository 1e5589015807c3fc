//! Request history module.
//!
//! - `log`: in-memory `HistoryLog`
//! - `store`: `HistoryStore` trait for the durable side-store

mod log;
mod store;

pub use log::HistoryLog;
pub use store::HistoryStore;
