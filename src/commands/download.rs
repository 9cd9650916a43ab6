use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;

use crate::{
    archive::ZipExtractor,
    download::download_file,
    http::HttpClient,
    notice::{Notice, NoticeSink},
    resolver::{Platform, Resolver},
    runtime::Runtime,
    session::Session,
};

use super::{Reported, config::Config, detect::print_detection, require_url};

/// What to download.
#[derive(Debug, Clone, Default)]
pub struct DownloadRequest {
    /// Explicit version; wins over a detected one.
    pub version: Option<String>,
    /// Explicit platform; wins over a detected bitness.
    pub platform: Option<Platform>,
    /// Run detection and apply it before the explicit values.
    pub use_detected: bool,
    /// Unpack the archive into `<output>/<version>_<platform>/`.
    pub extract: bool,
}

/// Download the ChromeDriver archive for the requested selection.
///
/// Returns the path of the saved archive.
#[tracing::instrument(skip(config, http_client, sink))]
pub async fn download<R: Runtime>(
    config: &Config<R>,
    http_client: &HttpClient,
    request: DownloadRequest,
    sink: &dyn NoticeSink,
) -> Result<PathBuf> {
    let mut session = Session::open();

    if request.use_detected {
        let detected = session
            .detect(config.client_hints_source(), config.user_agent.as_deref())
            .await
            .cloned()
            .unwrap_or_default();
        print_detection(&detected);
        if let Some((applied, _)) = session.use_detected_info()
            && !applied.is_empty()
        {
            sink.show(&Notice::success("Detected info applied", applied.summary()));
        }
    }

    let resolver = session.resolver_mut();
    if let Some(version) = &request.version {
        resolver.set_version(version);
    }
    if let Some(platform) = request.platform {
        resolver.set_platform(platform);
    }

    let url = require_url(session.resolver(), &config.base_url, sink)?;
    let file_name = session.resolver().archive_file_name();
    let dest = config.output_dir.join(&file_name);

    sink.show(&Notice::info(
        "Download started",
        format!("Downloading {}", file_name.trim_end_matches(".zip")),
    ));

    let result = fetch(config, http_client, &url, &dest, request.extract).await;
    session.close();

    match result {
        Ok(extracted) => {
            println!("{}", dest.display());
            for path in &extracted {
                println!("{}", path.display());
            }
            sink.show(&Notice::success("Download complete", file_name));
            Ok(dest)
        }
        Err(e) => {
            report_failure(session.resolver_mut(), &e, sink);
            Err(e.context(Reported))
        }
    }
}

/// Records the failure in the selection's error slot and shows the slot's
/// message as a "Download failed" notice.
fn report_failure(resolver: &mut Resolver, error: &anyhow::Error, sink: &dyn NoticeSink) {
    resolver.record_error(format!("{:#}", error));
    if let Some(message) = resolver.error() {
        sink.show(&Notice::destructive("Download failed", message));
    }
}

/// Downloads `url` to `dest` and optionally unpacks it next to it.
/// Returns the extracted files (empty without extraction).
async fn fetch<R: Runtime>(
    config: &Config<R>,
    http_client: &HttpClient,
    url: &str,
    dest: &std::path::Path,
    extract: bool,
) -> Result<Vec<PathBuf>> {
    let runtime = &config.runtime;
    runtime
        .create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", config.output_dir))?;

    download_file(runtime, url, dest, http_client).await?;

    if !extract {
        return Ok(Vec::new());
    }

    let extract_to = dest.with_extension("");
    info!("Extracting {:?} to {:?}", dest, extract_to);
    let extracted = ZipExtractor.extract(runtime, dest, &extract_to)?;
    debug!("Extracted {:?}", extracted);
    Ok(extracted)
}
