//! Atomic artifact writer.
//!
//! Every changed artifact is first staged into a temporary file inside the
//! destination directory. Only when all staging succeeded are the temp
//! files renamed over their targets, in the order given (leaf modules
//! before the index that imports them). A failure while staging leaves the
//! previous artifacts untouched; temp files are removed on drop.

use crate::error::WriteError;
use ds_core::emitter::Artifact;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Outcome of one write pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    pub dir: PathBuf,
    /// Files replaced or created, in persist order.
    pub written: Vec<String>,
    /// Files whose bytes already matched.
    pub unchanged: Vec<String>,
}

impl WriteReport {
    pub fn changed(&self) -> bool {
        !self.written.is_empty()
    }
}

/// Write `artifacts` into `dir`, creating it if needed.
pub fn write_artifacts(artifacts: &[Artifact], dir: &Path) -> Result<WriteReport, WriteError> {
    fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut report = WriteReport {
        dir: dir.to_path_buf(),
        ..WriteReport::default()
    };
    let mut staged: Vec<(&str, NamedTempFile, PathBuf)> = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        let target = dir.join(&artifact.file_name);
        let bytes = artifact.contents.as_bytes();
        if fs::read(&target).is_ok_and(|current| current == bytes) {
            report.unchanged.push(artifact.file_name.clone());
            continue;
        }
        let tmp = stage(dir, bytes).map_err(|source| WriteError::Stage {
            file: artifact.file_name.clone(),
            source,
        })?;
        staged.push((artifact.file_name.as_str(), tmp, target));
    }

    for (name, tmp, target) in staged {
        tmp.persist(&target).map_err(|e| WriteError::Persist {
            file: name.to_string(),
            source: e.error,
        })?;
        log::debug!("wrote {}", target.display());
        report.written.push(name.to_string());
    }

    Ok(report)
}

fn stage(dir: &Path, bytes: &[u8]) -> std::io::Result<NamedTempFile> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".tokens-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}
