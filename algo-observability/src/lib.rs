pub mod logger;
pub mod rotating_file;
pub mod transaction_log;

pub use logger::TransactionLogger;
pub use transaction_log::{ServiceMarker, TransactionLogEntry};
