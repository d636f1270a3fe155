//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `audit` - Audit log viewer
//! - `core` - Core commands (init) and shared utilities (open_db)
//! - `expenses` - Expense commands (add, list, update, delete)
//! - `import` - CSV import and export
//! - `reports` - Aggregates and the forecast
//! - `serve` - Web server command

pub mod audit;
pub mod core;
pub mod expenses;
pub mod import;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use audit::*;
pub use core::*;
pub use expenses::*;
pub use import::*;
pub use reports::*;
pub use serve::*;

/// Actor recorded in the audit log for CLI commands
pub const CLI_ACTOR: &str = "cli";

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
