use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::progress::ProgressEvent;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("download failed for {url}: HTTP {status}")]
    DownloadStatus { url: String, status: u16 },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Per-file download lifecycle sink: initiate, throttle-free percent
/// updates, done. Aggregation and throttling live with the consumer.
pub type EventSink<'a> = &'a mut dyn FnMut(ProgressEvent);

/// Resolve a model file by name, checking local locations before downloading.
///
/// Resolution order:
/// 1. User cache directory (platform-specific)
/// 2. `local_dir`, when configured (interactive variant only)
/// 3. Download from URL to cache, reporting lifecycle events
pub fn resolve(
    name: &str,
    url: &str,
    local_dir: Option<&Path>,
    events: Option<EventSink<'_>>,
) -> Result<PathBuf, ModelResolveError> {
    let cache_dir = model_cache_dir()?;
    let cached_path = cache_dir.join(name);
    if cached_path.exists() {
        log::debug!("model {name} found in cache");
        return Ok(cached_path);
    }

    if let Some(dir) = local_dir {
        let local_path = dir.join(name);
        if local_path.exists() {
            log::debug!("model {name} found in local dir {}", dir.display());
            return Ok(local_path);
        }
    }

    fs::create_dir_all(&cache_dir).map_err(ModelResolveError::CacheDir)?;
    download(name, url, &cached_path, events)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/murmur/models/`
/// - Linux: `$XDG_CACHE_HOME/murmur/models/` or `~/.cache/murmur/models/`
/// - Windows: `%LOCALAPPDATA%/murmur/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("murmur").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("murmur").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn download(
    name: &str,
    url: &str,
    dest: &Path,
    mut events: Option<EventSink<'_>>,
) -> Result<(), ModelResolveError> {
    if let Some(sink) = events.as_mut() {
        sink(ProgressEvent::initiate(name));
    }

    let response = reqwest::blocking::get(url).map_err(|e| ModelResolveError::Download {
        url: url.to_string(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ModelResolveError::DownloadStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let total = response.content_length().unwrap_or(0);

    // Buffer the body before touching the filesystem, so a network failure
    // never leaves a temp file behind.
    let bytes = response.bytes().map_err(|e| ModelResolveError::Download {
        url: url.to_string(),
        source: e,
    })?;

    persist(name, &bytes, total, dest, &mut events)?;

    if let Some(sink) = events.as_mut() {
        sink(ProgressEvent::done(name));
    }

    Ok(())
}

/// Write the model bytes next to `dest` and rename into place. A failure at
/// any step removes the temp file; either `dest` appears complete or nothing
/// is left on disk.
fn persist(
    name: &str,
    bytes: &[u8],
    total: u64,
    dest: &Path,
    events: &mut Option<EventSink<'_>>,
) -> Result<(), ModelResolveError> {
    let temp_path = dest.with_extension("part");
    let mut file = fs::File::create(&temp_path).map_err(|e| ModelResolveError::Write {
        path: temp_path.clone(),
        source: e,
    })?;

    let written = (|| {
        // Report progress per 1MB chunk to bound callback frequency
        let chunk_size = 1024 * 1024;
        let mut downloaded: u64 = 0;
        for chunk in bytes.chunks(chunk_size) {
            file.write_all(chunk).map_err(|e| ModelResolveError::Write {
                path: temp_path.clone(),
                source: e,
            })?;
            downloaded += chunk.len() as u64;
            if let Some(sink) = events.as_mut() {
                // Without Content-Length the percent stays at 0.
                let percent = if total > 0 {
                    (downloaded as f64 * 100.0 / total as f64) as f32
                } else {
                    0.0
                };
                sink(ProgressEvent::progress(name, percent));
            }
        }
        file.flush().map_err(|e| ModelResolveError::Write {
            path: temp_path.clone(),
            source: e,
        })
    })();
    drop(file);

    let renamed = written.and_then(|()| {
        fs::rename(&temp_path, dest).map_err(|e| ModelResolveError::Write {
            path: dest.to_path_buf(),
            source: e,
        })
    });

    if renamed.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    renamed
}
