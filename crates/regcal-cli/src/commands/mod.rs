//! CLI subcommand implementations.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

pub mod events;
pub mod export;
pub mod parse;

/// Reads the schedule text from a file, or from stdin when the path is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read schedule text from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schedule file: {}", path.display()))
}
