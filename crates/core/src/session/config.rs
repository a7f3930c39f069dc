use std::path::PathBuf;

use crate::recognition::domain::speech_recognizer::TranscribeOptions;
use crate::shared::constants::{
    CHUNK_LENGTH_S, LANGUAGE, STRIDE_LENGTH_S, WHISPER_MODEL_NAME, WHISPER_MODEL_URL,
};

/// Per-session configuration, passed into the driver at construction.
/// Nothing here is read from process-wide mutable state.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub model_name: String,
    pub model_url: String,
    pub language: String,
    pub translate: bool,
    pub chunk_length_s: u32,
    pub stride_length_s: u32,
    /// Whether a configured local model directory may satisfy model
    /// resolution before downloading. Off for the batch CLI, on for the
    /// interactive variant.
    pub allow_local_models: bool,
    pub local_model_dir: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model_name: WHISPER_MODEL_NAME.to_string(),
            model_url: WHISPER_MODEL_URL.to_string(),
            language: LANGUAGE.to_string(),
            translate: false,
            chunk_length_s: CHUNK_LENGTH_S,
            stride_length_s: STRIDE_LENGTH_S,
            allow_local_models: false,
            local_model_dir: None,
        }
    }
}

impl SessionConfig {
    pub fn transcribe_options(&self) -> TranscribeOptions {
        TranscribeOptions {
            language: self.language.clone(),
            translate: self.translate,
            chunk_length_s: self.chunk_length_s,
            stride_length_s: self.stride_length_s,
            with_timestamps: true,
        }
    }

    /// The model directory the resolver may consult locally, honoring the
    /// `allow_local_models` policy.
    pub fn effective_local_dir(&self) -> Option<PathBuf> {
        if self.allow_local_models {
            self.local_model_dir.clone()
        } else {
            None
        }
    }
}
