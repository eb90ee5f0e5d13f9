mod dashboard;
mod export;
mod policies;
mod schedule;
mod summary;

// Summary commands
pub use summary::run_summary;

// Policy table commands
pub use policies::run_list;

// Schedule commands
pub use schedule::run_schedule;

// Export commands
pub use export::{run_export, write_export};

// Dashboard commands
pub use dashboard::run_dashboard;
