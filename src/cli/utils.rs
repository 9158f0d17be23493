//! Convenience helpers shared across command handlers.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use badgepress::ConfigError;

/// Read the attendee document from a file, or stdin for `None` or `-`.
pub fn read_input(from: Option<&Path>) -> Result<String> {
    match from {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => read_stdin(),
    }
}

/// Read the entire stdin stream into memory.
pub fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read from stdin")?;
    Ok(buffer)
}

/// Clap-friendly parser for a strictly positive resize factor.
pub fn parse_resize(input: &str) -> Result<f64, String> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| format!("'{input}' is not a number"))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::Resize(value).to_string());
    }
    Ok(value)
}
