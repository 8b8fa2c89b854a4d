//! Command-line argument parsing and handling.

pub mod definition;
pub mod query;
pub mod utils;

// Re-export commonly used items
pub use definition::Args;
pub use query::resolve_query;
pub use utils::determine_log_level;
