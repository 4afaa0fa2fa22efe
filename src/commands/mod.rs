//! CLI command handlers.

mod serve;
mod stats;
mod zotero;

pub use serve::run_serve_command;
pub use stats::run_stats_command;
pub use zotero::run_zotero_command;

use anyhow::Result;
use serde::Serialize;

/// Prints a value to stdout as pretty JSON.
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
