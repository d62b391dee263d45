//! # Pipeline Items
//!
//! An [`Item`] is the unit handed from stage to stage. It carries an opaque
//! payload and the scoped temporary directories that were created on its
//! behalf while it travelled through the pipeline.
//!
//! Directory cleanup is explicit: whoever owns the item at the end of its
//! useful life calls [`Item::release_temp_dirs`]. Dropping an item leaves its
//! directories on disk.

use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::PipelineError;

/// Data passed between the stages of a pipeline
#[derive(Debug, Default)]
pub struct Item<T> {
    /// Caller-defined payload, never inspected by the pipeline
    pub payload: T,
    /// `None` until the first directory is created, and again after release
    temp_dirs: Option<Vec<PathBuf>>,
}

impl<T> Item<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            temp_dirs: None,
        }
    }

    /// Directories currently owned by this item, in creation order.
    pub fn temp_dirs(&self) -> &[PathBuf] {
        self.temp_dirs.as_deref().unwrap_or(&[])
    }

    pub fn has_temp_dirs(&self) -> bool {
        self.temp_dirs.is_some()
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Create a uniquely named directory tied to this item.
    ///
    /// `base_dir` is trimmed first; a blank base means the system temp
    /// directory. The returned path is absolute and is recorded so that
    /// [`release_temp_dirs`](Self::release_temp_dirs) can remove it later.
    /// Nothing is recorded when creation fails.
    ///
    /// `prefix` must be a plain name. A prefix containing a path separator
    /// (such as `../x`) is rejected, since it would place the directory
    /// outside `base_dir`.
    pub fn create_temp_dir(
        &mut self,
        base_dir: &str,
        prefix: &str,
    ) -> Result<PathBuf, PipelineError> {
        let base = resolve_base_dir(base_dir)?;
        if !is_plain_prefix(prefix) {
            return Err(PipelineError::DirectoryCreation {
                path: base,
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("prefix {prefix:?} is not a plain directory name"),
                ),
            });
        }

        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(&base)
            .map_err(|source| PipelineError::DirectoryCreation {
                path: base.clone(),
                source,
            })?
            .keep();

        self.temp_dirs.get_or_insert_with(Vec::new).push(dir.clone());
        Ok(dir)
    }

    /// Remove every directory created through this item.
    ///
    /// Removal is best-effort: failures are logged at debug level and skipped.
    /// The item is left without recorded directories and may create new ones.
    pub fn release_temp_dirs(&mut self) {
        let Some(dirs) = self.temp_dirs.take() else {
            return;
        };

        for dir in dirs {
            if let Err(e) = std::fs::remove_dir_all(&dir) {
                debug!(path = %dir.display(), error = %e, "Failed to remove temp directory");
            }
        }
    }
}

impl<T> From<T> for Item<T> {
    fn from(payload: T) -> Self {
        Self::new(payload)
    }
}

fn resolve_base_dir(base_dir: &str) -> Result<PathBuf, PipelineError> {
    let trimmed = base_dir.trim();
    let base = if trimmed.is_empty() {
        std::env::temp_dir()
    } else {
        PathBuf::from(trimmed)
    };

    std::path::absolute(&base).map_err(|source| PipelineError::DirectoryCreation {
        path: base.clone(),
        source,
    })
}

fn is_plain_prefix(prefix: &str) -> bool {
    !prefix.chars().any(std::path::is_separator)
}
