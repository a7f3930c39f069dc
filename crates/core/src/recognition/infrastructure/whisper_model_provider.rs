use std::path::PathBuf;

use crate::progress::ProgressEvent;
use crate::recognition::domain::model_provider::ModelProvider;
use crate::recognition::domain::speech_recognizer::{RecognizeError, SpeechRecognizer};

use super::model_resolver;
use super::whisper_recognizer::WhisperRecognizer;

/// Default [`ModelProvider`]: resolves the ggml weights (cache, optional
/// local directory, or download) and loads them into a whisper context.
pub struct WhisperModelProvider {
    model_name: String,
    model_url: String,
    local_dir: Option<PathBuf>,
}

impl WhisperModelProvider {
    pub fn new(
        model_name: impl Into<String>,
        model_url: impl Into<String>,
        local_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            model_url: model_url.into(),
            local_dir,
        }
    }
}

impl ModelProvider for WhisperModelProvider {
    fn provide(
        &self,
        events: &mut dyn FnMut(ProgressEvent),
    ) -> Result<Box<dyn SpeechRecognizer>, RecognizeError> {
        let model_path = model_resolver::resolve(
            &self.model_name,
            &self.model_url,
            self.local_dir.as_deref(),
            Some(events),
        )
        .map_err(|e| RecognizeError::ModelLoad(e.to_string()))?;

        let recognizer = WhisperRecognizer::new(&model_path)?;
        Ok(Box::new(recognizer))
    }
}
