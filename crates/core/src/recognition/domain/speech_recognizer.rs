use thiserror::Error;

use crate::audio::domain::audio_buffer::AudioBuffer;
use crate::audio::domain::transcript::TranscriptOutput;
use crate::shared::constants::{CHUNK_LENGTH_S, LANGUAGE, STRIDE_LENGTH_S};

#[derive(Error, Debug)]
pub enum RecognizeError {
    #[error("failed to load speech model: {0}")]
    ModelLoad(String),
    #[error("transcription failed: {0}")]
    Inference(String),
}

/// Inference-time windowing and decoding options. Fixed constants in this
/// application, not user-exposed flags.
#[derive(Clone, Debug)]
pub struct TranscribeOptions {
    pub language: String,
    pub translate: bool,
    /// Nominal audio window length in seconds. The whisper engine windows
    /// audio internally at this size and takes no parameter for it; the
    /// field documents the pipeline's framing and is not consumed by
    /// [`SpeechRecognizer`] implementations.
    pub chunk_length_s: u32,
    /// Nominal overlap between adjacent windows in seconds. Like
    /// `chunk_length_s`, informational only for the whisper backend.
    pub stride_length_s: u32,
    pub with_timestamps: bool,
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self {
            language: LANGUAGE.to_string(),
            translate: false,
            chunk_length_s: CHUNK_LENGTH_S,
            stride_length_s: STRIDE_LENGTH_S,
            with_timestamps: true,
        }
    }
}

/// Domain interface for speech-to-text transcription.
pub trait SpeechRecognizer: Send {
    fn transcribe(
        &self,
        audio: &AudioBuffer,
        options: &TranscribeOptions,
    ) -> Result<TranscriptOutput, RecognizeError>;
}
