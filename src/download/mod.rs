use crate::http::HttpClient;
use crate::runtime::Runtime;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Path the archive is streamed to before it is moved into place.
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// Downloads `url` to `dest` with retry support.
///
/// The body is written to `<dest>.part` and renamed once complete, so `dest`
/// never holds a truncated archive. A failed attempt leaves no partial file.
#[tracing::instrument(skip(runtime, http_client))]
pub async fn download_file<R: Runtime>(
    runtime: &R,
    url: &str,
    dest: &Path,
    http_client: &HttpClient,
) -> Result<u64> {
    info!("Downloading {}...", url);

    let temp_path = partial_path(dest);
    let result = http_client
        .download_file(url, || {
            runtime
                .create_file(&temp_path)
                .with_context(|| format!("Failed to create temporary file at {:?}", temp_path))
        })
        .await;

    let bytes = match result {
        Ok(bytes) => bytes,
        Err(e) => {
            if runtime.exists(&temp_path)
                && let Err(cleanup) = runtime.remove_file(&temp_path)
            {
                debug!("Failed to remove {:?}: {}", temp_path, cleanup);
            }
            return Err(e);
        }
    };

    runtime
        .rename(&temp_path, dest)
        .with_context(|| format!("Failed to move download into {:?}", dest))?;

    info!("Download complete: {} bytes", bytes);
    Ok(bytes)
}
