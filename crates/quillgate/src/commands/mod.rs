//! Command implementations.

use std::io::Read;

use anyhow::Context;
use camino::Utf8Path;

pub mod info;
pub mod judge;
pub mod prompt;
pub mod revise;
pub mod score;
#[cfg(feature = "mcp")]
pub mod serve;
pub mod stats;

/// Read a file, or stdin when `path` is `-`, and validate its size against
/// the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    if path.as_str() == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("failed to read stdin")?;
        quillgate_core::check_input_size(&content, max_bytes).context("stdin rejected")?;
        return Ok(content);
    }

    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    std::fs::read_to_string(path.as_std_path()).with_context(|| format!("failed to read {path}"))
}
