use crate::progress::ProgressEvent;

use super::speech_recognizer::{RecognizeError, SpeechRecognizer};

/// Seam between the session driver and model acquisition. Implementations
/// resolve the model files (downloading if needed, reporting lifecycle
/// events per file) and construct a ready recognizer.
pub trait ModelProvider: Send {
    fn provide(
        &self,
        events: &mut dyn FnMut(ProgressEvent),
    ) -> Result<Box<dyn SpeechRecognizer>, RecognizeError>;
}
