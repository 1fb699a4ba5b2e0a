//! # File Backend
//!
//! One JSON file per key under a data directory.
//!
//! ## Atomic Replace
//! ```text
//! set("cart", json)
//!    │
//!    ├── write  <dir>/.cart.<uuid>.tmp   (write_all + sync_all)
//!    ├── rename .cart.<uuid>.tmp → cart.json
//!    └── on any failure: remove the temp file, cart.json untouched
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::{check_key, KeyValueStore};
use crate::error::StoreResult;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Uses `dir` as the data directory. It is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        check_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    async fn write_and_rename(tmp: &Path, target: &Path, value: &str) -> std::io::Result<()> {
        let mut file = fs::File::create(tmp).await?;
        file.write_all(value.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(tmp, target).await
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let target = self.path_for(key)?;
        fs::create_dir_all(&self.dir).await?;

        let tmp = self
            .dir
            .join(format!(".{key}.{}.tmp", uuid::Uuid::new_v4().simple()));

        if let Err(err) = Self::write_and_rename(&tmp, &target, value).await {
            if let Err(cleanup) = fs::remove_file(&tmp).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(path = %tmp.display(), error = %cleanup, "Could not remove temp file");
                }
            }
            return Err(err.into());
        }

        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
