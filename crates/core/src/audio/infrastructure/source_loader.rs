use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::audio::domain::audio_buffer::AudioBuffer;

use super::wav_decoder;

#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("audio file not found: {0}")]
    NotFound(PathBuf),
    #[error("audio fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("audio fetch failed for {url}: HTTP {status}")]
    FetchStatus { url: String, status: u16 },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode audio: {0}")]
    Decode(String),
    #[error("audio resample failed: {0}")]
    Resample(String),
}

/// A source is remote iff it carries an HTTP(S) scheme; everything else is
/// treated as a local path.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Resolve an audio source (URL or local path) into a mono 16 kHz buffer.
///
/// `on_status` receives coarse phase messages (download vs. processing)
/// before each blocking step; there is no fine-grained progress here.
pub fn acquire(
    source: &str,
    mut on_status: impl FnMut(&str),
) -> Result<AudioBuffer, AcquireError> {
    let bytes = if is_remote(source) {
        on_status("Downloading audio from source...");
        fetch_bytes(source)?
    } else {
        on_status("Loading local audio file...");
        let path = Path::new(source);
        if !path.exists() {
            return Err(AcquireError::NotFound(path.to_path_buf()));
        }
        fs::read(path).map_err(|e| AcquireError::Read {
            path: path.to_path_buf(),
            source: e,
        })?
    };

    on_status("Processing audio (resampling & converting)...");
    let samples = wav_decoder::decode(&bytes)?;
    log::debug!("acquired {} samples from {source}", samples.len());

    Ok(AudioBuffer::new(samples))
}

fn fetch_bytes(url: &str) -> Result<Vec<u8>, AcquireError> {
    let response = reqwest::blocking::get(url).map_err(|e| AcquireError::Fetch {
        url: url.to_string(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AcquireError::FetchStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().map_err(|e| AcquireError::Fetch {
        url: url.to_string(),
        source: e,
    })?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::infrastructure::wav_decoder::synth_wav;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/sample.wav"));
        assert!(is_remote("http://example.com/sample.wav"));
        assert!(!is_remote("/tmp/sample.wav"));
        assert!(!is_remote("sample.wav"));
    }

    #[test]
    fn test_acquire_missing_local_file_is_not_found() {
        let result = acquire("/nonexistent/sample.wav", |_| {});
        assert!(matches!(result, Err(AcquireError::NotFound(_))));
    }

    #[test]
    fn test_acquire_local_wav_reports_statuses_in_order() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("sample.wav");
        fs::write(&path, synth_wav(16_000, 1, 1600, |_, _| 0)).unwrap();

        let mut statuses = Vec::new();
        let buffer = acquire(path.to_str().unwrap(), |msg| statuses.push(msg.to_string()))
            .unwrap();

        assert_eq!(buffer.len(), 1600);
        assert_eq!(statuses.len(), 2);
        assert!(statuses[0].contains("Loading local"));
        assert!(statuses[1].contains("Processing"));
    }

    #[test]
    fn test_acquire_invalid_bytes_is_decode_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("garbage.wav");
        fs::write(&path, b"definitely not a wav").unwrap();

        let result = acquire(path.to_str().unwrap(), |_| {});
        assert!(matches!(result, Err(AcquireError::Decode(_))));
    }

    #[test]
    fn test_acquire_stereo_44khz_yields_mono_16khz() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("stereo.wav");
        // Half a second of 44.1 kHz stereo.
        fs::write(&path, synth_wav(44_100, 2, 22_050, |_, _| 1024)).unwrap();

        let buffer = acquire(path.to_str().unwrap(), |_| {}).unwrap();
        assert!(
            (buffer.len() as i64 - 8_000).abs() <= 1,
            "expected ~8000 samples, got {}",
            buffer.len()
        );
    }
}
