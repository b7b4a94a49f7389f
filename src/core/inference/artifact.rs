//! Model artifact loading.
//!
//! A [`ModelArtifact`] is the immutable byte image of a trained model. Files are
//! memory-mapped read-only; the file handle is closed as soon as the mapping
//! exists. Models that are already in memory (embedded with `include_bytes!`,
//! downloaded by the host) are wrapped without copying them to disk.

use crate::core::errors::{DetectorError, DetectorResult};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

enum ArtifactBytes {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

/// Immutable model bytes plus where they came from.
pub struct ModelArtifact {
    name: String,
    path: Option<PathBuf>,
    bytes: ArtifactBytes,
}

impl std::fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("len", &self.len())
            .field("mapped", &self.is_mapped())
            .finish()
    }
}

impl ModelArtifact {
    /// Memory-maps the model file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::ModelLoad`] when the file cannot be opened or
    /// mapped, or when it is empty.
    pub fn open(path: impl AsRef<Path>) -> DetectorResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            DetectorError::model_load_error(
                path,
                "failed to open model file",
                Some("verify the model file exists and is readable"),
                Some(e),
            )
        })?;

        let len = file
            .metadata()
            .map_err(|e| {
                DetectorError::model_load_error(
                    path,
                    "failed to read model file metadata",
                    None,
                    Some(e),
                )
            })?
            .len();
        if len == 0 {
            return Err(DetectorError::model_load_error(
                path,
                "model file is empty",
                Some("re-export the model or check the packaged asset"),
                None::<std::io::Error>,
            ));
        }

        // SAFETY: the mapping is read-only and never exposed mutably. The model
        // file is a packaged asset that is not rewritten while the detector runs.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| {
            DetectorError::model_load_error(path, "failed to map model file", None, Some(e))
        })?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown_model")
            .to_string();
        debug!("mapped model '{}' ({} bytes) from {}", name, len, path.display());

        Ok(Self {
            name,
            path: Some(path.to_path_buf()),
            bytes: ArtifactBytes::Mapped(mmap),
        })
    }

    /// Wraps model bytes that are already in memory.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::ModelLoad`] when `bytes` is empty.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> DetectorResult<Self> {
        let name = name.into();
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(DetectorError::model_load_error(
                &name,
                "model bytes are empty",
                None,
                None::<std::io::Error>,
            ));
        }
        Ok(Self {
            name,
            path: None,
            bytes: ArtifactBytes::Owned(bytes),
        })
    }

    /// The model bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.bytes {
            ArtifactBytes::Mapped(mmap) => &mmap[..],
            ArtifactBytes::Owned(bytes) => &bytes[..],
        }
    }

    /// Size of the model in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Always false for a successfully loaded artifact.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name derived from the file stem, or the name given to `from_bytes`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source path, if the artifact was loaded from a file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether the bytes are backed by a memory map.
    pub fn is_mapped(&self) -> bool {
        matches!(self.bytes, ArtifactBytes::Mapped(_))
    }

    /// Path if present, otherwise the name; used to label load errors.
    pub(crate) fn label(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.name))
    }
}
