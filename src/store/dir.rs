use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use log::debug;

use crate::error::{Error, ErrorKind, Result};

use super::ObjectStore;

const OP_WRITE_FILE: &str = "fs:write";

/// Stores objects as files below `root`, one path segment per `/` in the key.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let rel = Path::new(key);
        let plain = !key.is_empty() && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(Error::api(
                OP_WRITE_FILE,
                ErrorKind::Terminal,
                format!("{}: key does not map to a path below the output directory", key),
            ));
        }

        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl ObjectStore for DirStore {
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, body).await?;

        debug!("wrote {}", path.display());
        Ok(())
    }
}
