use crate::domain::ports::BlobStore;
use crate::utils::error::{EtlError, Result};
use std::path::{Component, Path, PathBuf};

/// Blob store rooted at a directory: objects live at `<root>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        let relative = Path::new(bucket).join(key);
        // keys must stay inside the root
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(EtlError::storage(format!(
                "Refusing object path outside storage root: {}/{}",
                bucket, key
            )));
        }
        Ok(Path::new(&self.base_path).join(relative))
    }
}

impl BlobStore for LocalStorage {
    async fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let full_path = self.object_path(bucket, key)?;
        let data = tokio::fs::read(&full_path).await?;
        Ok(data)
    }

    async fn write_object(&self, bucket: &str, key: &str, data: &[u8]) -> Result<()> {
        let full_path = self.object_path(bucket, key)?;

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}
