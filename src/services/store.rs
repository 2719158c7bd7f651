//! Bucket storage helpers.
//!
//! Unlike the fetch core these are lenient: a failing object is logged and
//! skipped, and re-running the batch picks it up again.

use crate::error::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Object storage addressed by bucket + key.
pub trait ObjectStore {
    fn upload(&self, local: &Path, bucket: &str, key: &str) -> Result<()>;
    fn delete(&self, bucket: &str, key: &str) -> Result<()>;
    fn exists(&self, bucket: &str, key: &str) -> Result<bool>;
    fn download(&self, bucket: &str, key: &str, local: &Path) -> Result<()>;
}

/// Buckets are directories under `root`, keys are `/`-separated paths inside them.
pub struct LocalFsStore {
    root: PathBuf,
}

impl LocalFsStore {
    pub fn with_root(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, op: &str, bucket: &str, key: &str) -> Result<PathBuf> {
        if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == ".." || bucket == "." {
            return Err(RawfetchError::storage_error(
                op,
                &format!("invalid bucket name {bucket:?}"),
            ));
        }
        let mut path = self.root.join(bucket);
        let mut segments = 0;
        for segment in key.split('/').filter(|s| !s.is_empty()) {
            if segment == ".." || segment == "." || segment.contains('\\') {
                return Err(RawfetchError::storage_error(
                    op,
                    &format!("invalid object key {key:?}"),
                ));
            }
            path.push(segment);
            segments += 1;
        }
        if segments == 0 {
            return Err(RawfetchError::storage_error(op, "empty object key"));
        }
        Ok(path)
    }
}

impl ObjectStore for LocalFsStore {
    fn upload(&self, local: &Path, bucket: &str, key: &str) -> Result<()> {
        let target = self.path_for("upload", bucket, key)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(local, &target).map_err(|e| {
            RawfetchError::storage_error("upload", &format!("{}: {e}", local.display()))
        })?;
        Ok(())
    }

    fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        let target = self.path_for("delete", bucket, key)?;
        if target.is_file() {
            fs::remove_file(target)?;
        }
        Ok(())
    }

    fn exists(&self, bucket: &str, key: &str) -> Result<bool> {
        Ok(self.path_for("exists", bucket, key)?.is_file())
    }

    fn download(&self, bucket: &str, key: &str, local: &Path) -> Result<()> {
        let source = self.path_for("download", bucket, key)?;
        if !source.is_file() {
            return Err(RawfetchError::storage_error(
                "download",
                &format!("{bucket}/{key} not found"),
            ));
        }
        fs::copy(&source, local)?;
        Ok(())
    }
}

/// Join a destination prefix and a local relative path into an object key.
pub fn object_key(destination: &str, relative: &Path) -> String {
    let rel: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let prefix = destination.trim_end_matches('/');
    if prefix.is_empty() {
        rel.join("/")
    } else if rel.is_empty() {
        prefix.to_string()
    } else {
        format!("{}/{}", prefix, rel.join("/"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub uploaded: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

/// Mirror `local_dir` into `bucket` under `destination`.
///
/// The object named exactly `destination` is deleted first. Files whose key
/// already exists are skipped without a transfer.
pub fn copy_to_bucket(
    store: &dyn ObjectStore,
    local_dir: &Path,
    bucket: &str,
    destination: &str,
) -> SyncReport {
    let mut report = SyncReport::default();

    if let Err(e) = store.delete(bucket, destination) {
        tracing::error!(error = %e, "unable to delete {}", destination);
    }

    for entry in WalkDir::new(local_dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!(error = %e, "unable to read local entry");
                if let Some(path) = e.path() {
                    report.failed.push(path.display().to_string());
                }
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(local_dir).unwrap_or(entry.path());
        let key = object_key(destination, relative);

        tracing::info!("searching {} in {}", key, bucket);
        match store.exists(bucket, &key) {
            Ok(true) => {
                tracing::info!("path found in bucket, skipping {}", key);
                report.skipped.push(key);
                continue;
            }
            Ok(false) => {}
            // A failed lookup counts as "not there yet".
            Err(e) => tracing::debug!(error = %e, "lookup failed for {}", key),
        }

        tracing::info!("uploading {}", key);
        match store.upload(entry.path(), bucket, &key) {
            Ok(()) => report.uploaded.push(key),
            Err(e) => {
                tracing::error!(error = %e, "failed to copy {} to bucket {}", key, bucket);
                report.failed.push(key);
            }
        }
    }

    report
}

/// Download `destination/name` into `local_dir/name`.
///
/// Failures are logged as warnings and reported as `false`.
pub fn download_object(
    store: &dyn ObjectStore,
    bucket: &str,
    destination: &str,
    local_dir: &Path,
    name: &str,
) -> bool {
    let key = object_key(destination, Path::new(name));
    let target = local_dir.join(name);
    tracing::info!("downloading {} from {} to {}", key, bucket, target.display());

    let parent = target.parent().unwrap_or(local_dir);
    let result = fs::create_dir_all(parent)
        .map_err(RawfetchError::from)
        .and_then(|_| store.download(bucket, &key, &target));
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "unable to download {}", key);
            false
        }
    }
}
