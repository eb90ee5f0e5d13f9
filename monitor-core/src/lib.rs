pub mod aggregate;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod filter;
pub mod paginate;
pub mod record;
pub mod schedule;
pub mod store;
pub mod view;

#[cfg(test)]
mod tests;

pub use error::{MonitorError, Result};
pub use record::{BackupKind, BackupRecord, JobStatus};
pub use store::RecordStore;
