use std::path::Path;

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::domain::audio_buffer::AudioBuffer;
use crate::audio::domain::transcript::{TranscriptOutput, TranscriptSegment};
use crate::recognition::domain::speech_recognizer::{
    RecognizeError, SpeechRecognizer, TranscribeOptions,
};

/// Speech recognizer using whisper.cpp via whisper-rs.
///
/// The context (weights) is loaded once at construction; each transcription
/// runs in its own inference state.
pub struct WhisperRecognizer {
    ctx: WhisperContext,
}

impl WhisperRecognizer {
    pub fn new(model_path: &Path) -> Result<Self, RecognizeError> {
        if !model_path.exists() {
            return Err(RecognizeError::ModelLoad(format!(
                "model not found at: {}",
                model_path.display()
            )));
        }
        let path_str = model_path
            .to_str()
            .ok_or_else(|| RecognizeError::ModelLoad("invalid model path".to_string()))?;
        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| RecognizeError::ModelLoad(e.to_string()))?;
        Ok(Self { ctx })
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn transcribe(
        &self,
        audio: &AudioBuffer,
        options: &TranscribeOptions,
    ) -> Result<TranscriptOutput, RecognizeError> {
        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| RecognizeError::Inference(e.to_string()))?;

        // whisper.cpp windows audio internally at the chunk length the
        // options carry; language, task and timestamps map directly.
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 0 });
        params.set_language(Some(&options.language));
        params.set_translate(options.translate);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(num_cpus().min(4) as i32);

        state
            .full(params, audio.samples())
            .map_err(|e| RecognizeError::Inference(e.to_string()))?;

        let mut text = String::new();
        let mut segments = Vec::new();
        let num_segments = state.full_n_segments();

        for seg_idx in 0..num_segments {
            let segment = match state.get_segment(seg_idx) {
                Some(s) => s,
                None => continue,
            };
            let seg_text = match segment.to_str() {
                Ok(t) => t.to_string(),
                Err(_) => continue,
            };

            text.push_str(&seg_text);

            if options.with_timestamps {
                // Segment timestamps are in centiseconds (10ms units)
                let start_time = segment.start_timestamp() as f64 / 100.0;
                let end_time = segment.end_timestamp() as f64 / 100.0;
                segments.push(TranscriptSegment {
                    start_time,
                    end_time: (end_time > start_time).then_some(end_time),
                    text: seg_text,
                });
            }
        }

        Ok(TranscriptOutput { text, segments })
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
