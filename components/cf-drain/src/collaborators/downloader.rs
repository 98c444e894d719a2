// Local crates
use crate::provisioner::errors::DrainError;

// External crates
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::instrument;

/// Supplies release artifacts (the syslog forwarder binary) by asset name.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Returns the local filesystem path of the named asset.
    async fn download(&self, asset_name: &str) -> Result<PathBuf, DrainError>;
}

/// [`Downloader`] serving assets already present in a local directory.
#[derive(Debug, Clone)]
pub struct AssetDirectory {
    root: PathBuf,
}

impl AssetDirectory {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl Downloader for AssetDirectory {
    #[instrument(
        name = "cf_drain_assets::download",
        target = "collaborators::downloader",
        level = "debug",
        skip(self)
    )]
    async fn download(&self, asset_name: &str) -> Result<PathBuf, DrainError> {
        let path = self.root.join(asset_name);

        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {
                tracing::debug!(asset = %path.display(), "Forwarder asset located");
                Ok(path)
            }
            _ => {
                tracing::error!(asset = %path.display(), "Forwarder asset missing");
                Err(DrainError::AssetNotFound {
                    name: asset_name.to_string(),
                    dir: self.root.clone(),
                })
            }
        }
    }
}
