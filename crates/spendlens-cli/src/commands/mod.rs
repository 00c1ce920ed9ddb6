//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `common` - Shared utilities (engine/config loading, input reading, JSON output)
//! - `text` - Single-description commands (categorize, keywords)
//! - `reports` - Report commands (totals, spent, average, balance, budget, trends, month, top, search)
//! - `recurring` - Recurring charge detection

pub mod common;
pub mod recurring;
pub mod reports;
pub mod text;

// Re-export command functions for main.rs
pub use common::*;
pub use recurring::*;
pub use reports::*;
pub use text::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
