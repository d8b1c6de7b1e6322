use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Write `records` to `path` as an indented JSON array, replacing any existing file
pub fn write_json<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("Failed to serialize records")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
