pub const WHISPER_MODEL_NAME: &str = "ggml-tiny.bin";
pub const WHISPER_MODEL_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-tiny.bin";

/// Sample both binaries fall back to when no source is given.
pub const DEFAULT_AUDIO_URL: &str =
    "https://huggingface.co/datasets/Xenova/transformers.js-docs/resolve/main/jfk.wav";

/// Sample rate the model expects; all acquired audio is resampled to this.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

pub const CHUNK_LENGTH_S: u32 = 30;
pub const STRIDE_LENGTH_S: u32 = 5;
pub const LANGUAGE: &str = "en";
