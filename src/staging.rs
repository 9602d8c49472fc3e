use crate::config::Config;
use crate::util::{ensure_dir, sanitize_file_name};
use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An upload written to disk under its original file name.
///
/// The engine detects formats by extension, so the bytes must reach it as a
/// real file carrying the submitted name. The backing directory is removed
/// when this value drops, on every exit path.
pub struct StagedUpload {
    path: PathBuf,
    file_name: String,
    _dir: TempDir,
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

pub fn stage_bytes(cfg: &Config, submitted_name: &str, bytes: &[u8]) -> Result<StagedUpload> {
    let file_name = accept_file_name(cfg, submitted_name)?;

    let work_dir = Path::new(&cfg.paths.work_dir);
    ensure_dir(work_dir)?;

    let dir = tempfile::Builder::new()
        .prefix("upload-")
        .tempdir_in(work_dir)
        .with_context(|| format!("create staging dir in {}", work_dir.display()))?;

    let path = dir.path().join(&file_name);
    std::fs::write(&path, bytes)
        .with_context(|| format!("write staged upload: {}", path.display()))?;

    Ok(StagedUpload {
        path,
        file_name,
        _dir: dir,
    })
}

/// Validate a client-supplied name down to a bare file name.
pub fn accept_file_name(cfg: &Config, submitted: &str) -> Result<String> {
    if cfg.security.reject_url_inputs && looks_like_url(submitted) {
        return Err(anyhow!("URL inputs are disabled: {submitted}"));
    }
    sanitize_file_name(submitted)
        .ok_or_else(|| anyhow!("unusable file name: {submitted:?}"))
}

fn looks_like_url(s: &str) -> bool {
    let s = s.to_ascii_lowercase();
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("file://")
}
