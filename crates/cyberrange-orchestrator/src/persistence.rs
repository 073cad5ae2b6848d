//! Optional, write-once result persistence.

use std::path::{Path, PathBuf};

use cyberrange_types::{RangeError, Result};
use cyberrange_types::EvaluationResult;

/// Writes `result` to `{dir}/eval_{id}.json`, creating `dir` if needed.
/// Never reads the file back; this crate has no persistence layer beyond
/// this single append-only write per evaluation.
pub fn persist_result(result: &EvaluationResult, dir: &Path, id: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(RangeError::Io)?;
    let path = dir.join(format!("eval_{id}.json"));
    let file = std::fs::File::create(&path).map_err(RangeError::Io)?;
    serde_json::to_writer_pretty(file, result).map_err(RangeError::Serialization)?;
    Ok(path)
}
