use bincode::{deserialize, serialize};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use crate::error::ReviewResult;

/// Snapshot file holding one serialized value.
///
/// Binary format (bincode) with gzip compression. Saves go to a temporary
/// file that is then renamed over the snapshot, so a crash mid-write leaves
/// the previous snapshot intact.
pub struct SnapshotStorage {
    path: PathBuf,
}

impl SnapshotStorage {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Load the stored value; a missing file yields `T::default()`.
    ///
    /// A file that cannot be decoded (e.g. after a format change) is copied
    /// to `*.bin.bak` and treated as empty.
    pub fn load<T: DeserializeOwned + Default>(&self) -> ReviewResult<T> {
        if !self.path.exists() {
            debug!("Snapshot {:?} does not exist, starting empty", self.path);
            return Ok(T::default());
        }

        let start = std::time::Instant::now();
        let data = std::fs::read(&self.path)?;

        let mut decoder = GzDecoder::new(&data[..]);
        let mut decoded = Vec::new();
        if let Err(e) = decoder.read_to_end(&mut decoded) {
            return self.discard_incompatible(&e.to_string());
        }

        let value: T = match deserialize(&decoded) {
            Ok(value) => value,
            Err(e) => return self.discard_incompatible(&e.to_string()),
        };

        info!(
            "Loaded snapshot {:?}: {} bytes in {:?}",
            self.path,
            data.len(),
            start.elapsed()
        );
        Ok(value)
    }

    fn discard_incompatible<T: Default>(&self, error: &str) -> ReviewResult<T> {
        let backup_path = self.path.with_extension("bin.bak");
        if let Err(backup_err) = std::fs::copy(&self.path, &backup_path) {
            warn!(
                "Failed to backup incompatible snapshot {:?}: {}. Starting empty.",
                self.path, backup_err
            );
        } else {
            warn!(
                "Snapshot {:?} is unreadable ({}). Backed up to {:?} and starting empty.",
                self.path, error, backup_path
            );
        }
        Ok(T::default())
    }

    pub fn save<T: Serialize + ?Sized>(&self, value: &T) -> ReviewResult<()> {
        let start = std::time::Instant::now();

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let serialized = serialize(value)?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&serialized)?;
        let encoded = encoder.finish()?;
        let encoded_len = encoded.len();

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, encoded)?;
        std::fs::rename(&temp_path, &self.path)?;

        info!(
            "Saved snapshot {:?}: {} bytes in {:?}",
            self.path,
            encoded_len,
            start.elapsed()
        );
        Ok(())
    }

    pub fn size(&self) -> ReviewResult<u64> {
        if self.path.exists() {
            Ok(std::fs::metadata(&self.path)?.len())
        } else {
            Ok(0)
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Delete the snapshot file if present
    pub fn clear(&self) -> ReviewResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            info!("Removed snapshot {:?}", self.path);
        }
        Ok(())
    }
}
