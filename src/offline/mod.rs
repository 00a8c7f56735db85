//! Offline shell cache
//!
//! Keeps the application shell and static assets available without
//! network: assets are precached into a versioned cache directory,
//! stale cache versions are cleaned on activation, and reads are
//! cache-first with a source fallback. Not data-bearing - the
//! persistence core only needs the app to boot offline.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, StoreError};

/// Cache of shell assets under a versioned directory
pub struct ShellCache {
    /// Where the live app shell assets are read from
    source_root: PathBuf,
    /// Parent directory holding one subdirectory per cache version
    cache_root: PathBuf,
    /// Active cache version name, e.g. "offline-invoice-cache-v1"
    version: String,
}

impl ShellCache {
    /// Create a shell cache handle
    pub fn new(source_root: &Path, cache_root: &Path, version: &str) -> Self {
        Self {
            source_root: source_root.to_path_buf(),
            cache_root: cache_root.to_path_buf(),
            version: version.to_string(),
        }
    }

    /// Active versioned cache directory
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_root.join(&self.version)
    }

    /// Active cache version name
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Precache the listed assets into the versioned cache directory.
    ///
    /// All-or-nothing: every asset is read before anything is written,
    /// so a partially installed shell never looks complete. Returns
    /// the number of assets cached.
    pub fn install(&self, assets: &[&str]) -> Result<usize> {
        let mut contents = Vec::with_capacity(assets.len());
        for asset in assets {
            let rel = sanitize(asset)?;
            let bytes = fs::read(self.source_root.join(&rel))?;
            contents.push((rel, bytes));
        }

        for (rel, bytes) in &contents {
            let target = self.cache_dir().join(rel);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, bytes)?;
        }

        info!(version = %self.version, count = contents.len(), "shell assets precached");
        Ok(contents.len())
    }

    /// Remove cache directories of other versions.
    ///
    /// Returns how many stale versions were deleted.
    pub fn activate(&self) -> Result<usize> {
        if !self.cache_root.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in fs::read_dir(&self.cache_root)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir()
                && path.file_name().and_then(|n| n.to_str()) != Some(self.version.as_str())
            {
                fs::remove_dir_all(&path)?;
                removed += 1;
            }
        }

        if removed > 0 {
            info!(version = %self.version, removed, "stale cache versions cleaned");
        }
        Ok(removed)
    }

    /// Cache-first read of an asset.
    ///
    /// On a cache miss the source tree is read instead and the bytes
    /// are cached for next time.
    pub fn fetch(&self, asset: &str) -> Result<Vec<u8>> {
        let rel = sanitize(asset)?;
        let cached = self.cache_dir().join(&rel);

        if let Ok(bytes) = fs::read(&cached) {
            return Ok(bytes);
        }

        debug!(asset, "cache miss, reading source");
        let bytes = fs::read(self.source_root.join(&rel))?;

        if let Some(parent) = cached.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&cached, &bytes)?;
        Ok(bytes)
    }

    /// Whether an asset is present in the active cache
    pub fn is_cached(&self, asset: &str) -> bool {
        sanitize(asset)
            .map(|rel| self.cache_dir().join(rel).is_file())
            .unwrap_or(false)
    }
}

/// Reject absolute paths and parent components in asset names
fn sanitize(asset: &str) -> Result<PathBuf> {
    let path = Path::new(asset);
    let ok = path.components().all(|c| matches!(c, Component::Normal(_)))
        && !path.as_os_str().is_empty();
    if !ok {
        return Err(StoreError::InvalidInput(format!(
            "invalid asset path: {asset}"
        )));
    }
    Ok(path.to_path_buf())
}
