use std::path::{Path, PathBuf};

use crate::api::{ClientError, GalleryApi};

/// Every download is saved under this name, whatever the source URL.
pub const DOWNLOAD_FILE_NAME: &str = "emoji.png";

/// Fetches `url` and writes it to `dir/emoji.png`, replacing any earlier download.
pub async fn download<A: GalleryApi + ?Sized>(api: &A, url: &str, dir: &Path) -> Result<PathBuf, ClientError> {
    let bytes = api.fetch_image(url).await?;
    let path = dir.join(DOWNLOAD_FILE_NAME);
    tokio::fs::write(&path, &bytes).await?;
    tracing::info!(url, path = %path.display(), size = bytes.len(), "emoji downloaded");
    Ok(path)
}
