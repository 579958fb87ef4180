use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use crate::plugin_system::error::PluginError;

/// Resolves a source location reference to plugin source text.
///
/// Acquisition is a collaborator, not part of the lifecycle core: any
/// failure here surfaces as [`PluginError::Acquisition`], distinct from
/// loading failures.
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn fetch(&self, location: &Path) -> Result<String, PluginError>;
}

/// Default filesystem-backed source.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsTextSource;

#[async_trait]
impl TextSource for FsTextSource {
    async fn fetch(&self, location: &Path) -> Result<String, PluginError> {
        fs::read_to_string(location)
            .await
            .map_err(|source| PluginError::Acquisition {
                path: location.to_path_buf(),
                source,
            })
    }
}
