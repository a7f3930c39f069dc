use std::time::Instant;

use crate::audio::domain::transcript::TranscriptOutput;
use crate::progress::ProgressItem;

/// Snapshot of where the transcription run currently is.
///
/// One value per run, owned by the session driver; the presentation layer
/// only receives clones. Transitions run strictly forward through the
/// variants in order, except that any state may jump to `Failed`.
/// `Completed` and `Failed` are terminal.
#[derive(Clone, Debug)]
pub enum SessionState {
    Idle,
    LoadingModel {
        /// In-flight downloads, discovery order.
        items: Vec<ProgressItem>,
        /// Throttled one-line summary of `items`.
        summary: String,
    },
    LoadingAudio {
        message: String,
    },
    Transcribing {
        started: Instant,
    },
    Completed {
        transcript: TranscriptOutput,
        elapsed_seconds: f64,
    },
    Failed {
        message: String,
    },
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }

    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::LoadingModel { .. } => "loading_model",
            Self::LoadingAudio { .. } => "loading_audio",
            Self::Transcribing { .. } => "transcribing",
            Self::Completed { .. } => "completed",
            Self::Failed { .. } => "failed",
        }
    }
}
