use crate::core::steam::RemoteMetadata;
use crate::models::error::SError;
use crate::models::paths::CachePaths;
use camino::Utf8PathBuf;
use tracing::{debug, info};

/// On-disk cache of workshop preview images, one file per mod folder.
pub struct CoverCache {
    paths: CachePaths,
    app_id: String,
}

impl CoverCache {
    pub fn new(paths: CachePaths, app_id: impl Into<String>) -> Self {
        Self {
            paths,
            app_id: app_id.into(),
        }
    }

    /// Returns the cached cover for `folder`, downloading it on a miss.
    pub fn get_or_download(
        &self,
        folder: &str,
        remote: &dyn RemoteMetadata,
    ) -> Result<Utf8PathBuf, SError> {
        if !is_plain_folder_name(folder) {
            return Err(SError::InvalidFolder(folder.to_string()));
        }
        let path = self.paths.cover_file(&self.app_id, folder);
        if path.exists() {
            debug!("cover cache hit for {folder}");
            return Ok(path);
        }

        let url = remote
            .fetch_cover_url(folder)?
            .ok_or_else(|| SError::NetworkError(format!("no preview for {folder}")))?;
        let bytes = remote.download(&url)?;
        if bytes.is_empty() {
            return Err(SError::NetworkError(format!("empty preview for {folder}")));
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write next to the target and rename so a torn download never
        // looks like a cache hit.
        let partial = path.with_extension("part");
        std::fs::write(&partial, &bytes)?;
        std::fs::rename(&partial, &path)?;

        info!("cached cover for {folder} ({} bytes)", bytes.len());
        Ok(path)
    }
}

/// A single path component naming a workshop folder.
fn is_plain_folder_name(folder: &str) -> bool {
    !folder.is_empty()
        && folder != "."
        && folder != ".."
        && !folder.contains(['/', '\\', '\0'])
}
