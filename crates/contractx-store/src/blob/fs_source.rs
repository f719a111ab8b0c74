#![allow(clippy::result_large_err)]

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use contractx_core::errors::{ExError, ExErrorKind};
use contractx_core::ports::{BlobSource, PortResult};

use crate::errors::{io_error, Result};

/// Blob source rooted at a directory; blob names are relative paths under it
#[derive(Debug, Clone)]
pub struct FsBlobSource {
    root: PathBuf,
}

impl FsBlobSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let plain = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("blob_resolve")
                .with_message(format!("Invalid blob name '{}'", name)));
        }
        Ok(self.root.join(relative))
    }

    /// Store `content` under `name`, replacing any previous blob
    pub async fn put(&self, name: &str, content: &[u8]) -> Result<()> {
        let target = self.resolve(name)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create_blob_dir", e))?;
        }

        let temp = target.with_extension("tmp");
        tokio::fs::write(&temp, content)
            .await
            .map_err(|e| io_error("write_blob_temp", e))?;
        tokio::fs::rename(&temp, &target)
            .await
            .map_err(|e| io_error("rename_blob_temp", e))?;
        Ok(())
    }
}

#[async_trait]
impl BlobSource for FsBlobSource {
    async fn read(&self, name: &str) -> PortResult<Option<Vec<u8>>> {
        let path = self.resolve(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read_blob", e)),
        }
    }
}
