use crate::runtime::Runtime;
use anyhow::{Context, Result, bail};
use log::debug;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use zip::ZipArchive;

/// Extractor for .zip archives
pub struct ZipExtractor;

impl ZipExtractor {
    /// Unpacks `archive_path` into `extract_to`, stripping a single shared
    /// top-level directory. Returns the extracted file paths in archive order.
    #[tracing::instrument(skip(self, runtime))]
    pub fn extract<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<Vec<PathBuf>> {
        debug!("Extracting zip archive to {:?}...", extract_to);
        let mut reader = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;

        // ZipArchive needs Read + Seek; Runtime::open only gives Read
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .with_context(|| format!("Failed to read archive {:?}", archive_path))?;
        let mut archive = ZipArchive::new(std::io::Cursor::new(buffer))
            .with_context(|| format!("Failed to parse ZIP archive {:?}", archive_path))?;

        if archive.len() == 0 {
            bail!("Archive {:?} is empty", archive_path);
        }

        let entries = (0..archive.len())
            .map(|i| {
                let entry = archive
                    .by_index(i)
                    .with_context(|| format!("Failed to read ZIP entry {}", i))?;
                Ok((entry.enclosed_name(), entry.is_dir()))
            })
            .collect::<Result<Vec<_>>>()?;
        let root = shared_root(
            entries
                .iter()
                .filter_map(|(name, is_dir)| name.as_deref().map(|name| (name, *is_dir))),
        );
        debug!("Shared top-level directory: {:?}", root);

        runtime.create_dir_all(extract_to)?;
        let mut extracted = Vec::new();

        for (i, (name, _)) in entries.into_iter().enumerate() {
            let Some(name) = name else {
                debug!("Skipping entry {} with unsafe path", i);
                continue;
            };
            let relative = match &root {
                Some(root) => name.strip_prefix(root).unwrap_or(name.as_path()).to_path_buf(),
                None => name,
            };
            if relative.as_os_str().is_empty() {
                continue;
            }

            let mut entry = archive
                .by_index(i)
                .with_context(|| format!("Failed to read ZIP entry {}", i))?;
            let full_path = extract_to.join(&relative);

            if entry.is_dir() {
                runtime.create_dir_all(&full_path)?;
                continue;
            }

            if let Some(parent) = full_path.parent() {
                runtime.create_dir_all(parent)?;
            }
            let mut dest_file = runtime.create_file(&full_path)?;
            std::io::copy(&mut entry, &mut dest_file)
                .with_context(|| format!("Failed to extract file {:?}", full_path))?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode()
                && let Err(e) = runtime.set_permissions(&full_path, mode)
            {
                debug!("Failed to set permissions on {:?}: {}", full_path, e);
            }

            extracted.push(full_path);
        }

        debug!("Extracted {} file(s)", extracted.len());
        Ok(extracted)
    }
}

/// The top-level directory every entry lives in, if there is exactly one.
fn shared_root<'a>(entries: impl Iterator<Item = (&'a Path, bool)>) -> Option<PathBuf> {
    let mut root: Option<PathBuf> = None;
    for (path, is_dir) in entries {
        let mut components = path.components();
        let first = match components.next()? {
            Component::Normal(part) => PathBuf::from(part),
            _ => return None,
        };
        // A top-level file means there is no wrapping directory
        if components.next().is_none() && !is_dir {
            return None;
        }
        match &root {
            Some(existing) if *existing != first => return None,
            Some(_) => {}
            None => root = Some(first),
        }
    }
    root
}
