use std::time::Instant;

use crate::audio::infrastructure::source_loader;
use crate::progress::ProgressAggregator;
use crate::recognition::domain::model_provider::ModelProvider;
use crate::recognition::infrastructure::whisper_model_provider::WhisperModelProvider;
use crate::session::config::SessionConfig;
use crate::session::state::SessionState;

const FALLBACK_ERROR: &str = "Unknown error occurred";

/// Drives one transcription run through its states, pushing a snapshot to
/// `on_state` on every visible change. Single attempt, no retries; any
/// failed step ends the run in `Failed`.
pub struct Session {
    config: SessionConfig,
    provider: Box<dyn ModelProvider>,
}

impl Session {
    pub fn new(config: SessionConfig, provider: Box<dyn ModelProvider>) -> Self {
        Self { config, provider }
    }

    /// Construct with the whisper-backed provider implied by the config.
    pub fn with_default_provider(config: SessionConfig) -> Self {
        let provider = WhisperModelProvider::new(
            config.model_name.clone(),
            config.model_url.clone(),
            config.effective_local_dir(),
        );
        Self::new(config, Box::new(provider))
    }

    pub fn run(&self, source: &str, mut on_state: impl FnMut(SessionState)) {
        on_state(SessionState::Idle);
        if let Err(message) = self.drive(source, &mut on_state) {
            let message = if message.is_empty() {
                FALLBACK_ERROR.to_string()
            } else {
                message
            };
            log::warn!("session failed: {message}");
            on_state(SessionState::Failed { message });
        }
    }

    fn drive(
        &self,
        source: &str,
        on_state: &mut dyn FnMut(SessionState),
    ) -> Result<(), String> {
        // 1. Model
        let mut aggregator = ProgressAggregator::new();
        on_state(SessionState::LoadingModel {
            items: Vec::new(),
            summary: aggregator.render(),
        });
        let recognizer = self
            .provider
            .provide(&mut |event| {
                if let Some(summary) = aggregator.observe(&event) {
                    on_state(SessionState::LoadingModel {
                        items: aggregator.items().to_vec(),
                        summary,
                    });
                }
            })
            .map_err(|e| e.to_string())?;
        log::info!("model {} ready", self.config.model_name);

        // 2. Audio
        on_state(SessionState::LoadingAudio {
            message: "Preparing audio...".to_string(),
        });
        let audio = source_loader::acquire(source, |message| {
            on_state(SessionState::LoadingAudio {
                message: message.to_string(),
            });
        })
        .map_err(|e| e.to_string())?;
        log::info!("audio ready: {:.2}s at 16kHz mono", audio.duration());

        // 3. Inference
        let started = Instant::now();
        on_state(SessionState::Transcribing { started });
        let output = recognizer
            .transcribe(&audio, &self.config.transcribe_options())
            .map_err(|e| e.to_string())?;

        let elapsed_seconds = round_to_hundredths(started.elapsed().as_secs_f64());
        on_state(SessionState::Completed {
            transcript: output.trimmed(),
            elapsed_seconds,
        });
        Ok(())
    }
}

fn round_to_hundredths(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::audio::domain::audio_buffer::AudioBuffer;
    use crate::audio::domain::transcript::{TranscriptOutput, TranscriptSegment};
    use crate::audio::infrastructure::wav_decoder::synth_wav;
    use crate::progress::ProgressEvent;
    use crate::recognition::domain::speech_recognizer::{
        RecognizeError, SpeechRecognizer, TranscribeOptions,
    };

    struct StubRecognizer {
        output: TranscriptOutput,
    }

    impl SpeechRecognizer for StubRecognizer {
        fn transcribe(
            &self,
            _audio: &AudioBuffer,
            _options: &TranscribeOptions,
        ) -> Result<TranscriptOutput, RecognizeError> {
            Ok(self.output.clone())
        }
    }

    struct StubProvider {
        events: Vec<ProgressEvent>,
        error: Option<String>,
        output: TranscriptOutput,
    }

    impl StubProvider {
        fn ok(output: TranscriptOutput) -> Self {
            Self {
                events: vec![
                    ProgressEvent::initiate("model.bin"),
                    ProgressEvent::progress("model.bin", 50.0),
                    ProgressEvent::done("model.bin"),
                ],
                error: None,
                output,
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                events: Vec::new(),
                error: Some(message.to_string()),
                output: TranscriptOutput::default(),
            }
        }
    }

    impl crate::recognition::domain::model_provider::ModelProvider for StubProvider {
        fn provide(
            &self,
            events: &mut dyn FnMut(ProgressEvent),
        ) -> Result<Box<dyn SpeechRecognizer>, RecognizeError> {
            for event in &self.events {
                events(event.clone());
            }
            if let Some(message) = &self.error {
                return Err(RecognizeError::ModelLoad(message.clone()));
            }
            Ok(Box::new(StubRecognizer {
                output: self.output.clone(),
            }))
        }
    }

    fn raw_output() -> TranscriptOutput {
        TranscriptOutput {
            text: " hello world ".to_string(),
            segments: vec![
                TranscriptSegment {
                    start_time: 0.0,
                    end_time: Some(1.0),
                    text: " hello ".to_string(),
                },
                TranscriptSegment {
                    start_time: 1.0,
                    end_time: Some(2.0),
                    text: " world ".to_string(),
                },
            ],
        }
    }

    fn temp_wav() -> (tempfile::TempDir, String) {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("sample.wav");
        fs::write(&path, synth_wav(16_000, 1, 1600, |_, _| 0)).unwrap();
        let source = path.to_str().unwrap().to_string();
        (tmp, source)
    }

    fn collect_states(session: &Session, source: &str) -> Vec<SessionState> {
        let mut states = Vec::new();
        session.run(source, |state| states.push(state));
        states
    }

    #[test]
    fn test_successful_run_walks_states_forward() {
        let session = Session::new(
            SessionConfig::default(),
            Box::new(StubProvider::ok(raw_output())),
        );
        let (_tmp, source) = temp_wav();

        let states = collect_states(&session, &source);
        let labels: Vec<&str> = states.iter().map(|s| s.label()).collect();

        assert_eq!(labels.first(), Some(&"idle"));
        assert_eq!(labels.last(), Some(&"completed"));
        // Strictly forward: each phase appears as a contiguous block in order.
        let mut dedup = labels.clone();
        dedup.dedup();
        assert_eq!(
            dedup,
            vec![
                "idle",
                "loading_model",
                "loading_audio",
                "transcribing",
                "completed"
            ]
        );
    }

    #[test]
    fn test_completed_carries_trimmed_transcript_and_elapsed() {
        let session = Session::new(
            SessionConfig::default(),
            Box::new(StubProvider::ok(raw_output())),
        );
        let (_tmp, source) = temp_wav();

        let states = collect_states(&session, &source);
        match states.last() {
            Some(SessionState::Completed {
                transcript,
                elapsed_seconds,
            }) => {
                assert_eq!(transcript.text, "hello world");
                assert_eq!(transcript.segments.len(), 2);
                assert_eq!(transcript.segments[0].text, "hello");
                assert_eq!(transcript.segments[0].span(), "00:00.00 -> 00:01.00");
                assert_eq!(transcript.segments[1].span(), "00:01.00 -> 00:02.00");
                // Rounded to two decimals.
                let scaled = elapsed_seconds * 100.0;
                assert!((scaled - scaled.round()).abs() < 1e-9);
            }
            other => panic!("expected Completed, got {other:?}"),
        }
    }

    #[test]
    fn test_model_load_failure_goes_to_failed() {
        let session = Session::new(
            SessionConfig::default(),
            Box::new(StubProvider::failing("weights are corrupt")),
        );
        let (_tmp, source) = temp_wav();

        let states = collect_states(&session, &source);
        match states.last() {
            Some(SessionState::Failed { message }) => {
                assert!(message.contains("weights are corrupt"))
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(states.iter().all(|s| s.label() != "loading_audio"));
    }

    #[test]
    fn test_audio_failure_never_reaches_transcribing() {
        let session = Session::new(
            SessionConfig::default(),
            Box::new(StubProvider::ok(raw_output())),
        );

        let states = collect_states(&session, "/nonexistent/missing.wav");
        match states.last() {
            Some(SessionState::Failed { message }) => {
                assert!(message.contains("not found"), "message: {message}")
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(states.iter().any(|s| s.label() == "loading_audio"));
        assert!(states.iter().all(|s| s.label() != "transcribing"));
        assert!(states.iter().all(|s| s.label() != "completed"));
    }

    #[test]
    fn test_remote_fetch_failure_goes_to_failed() {
        let session = Session::new(
            SessionConfig::default(),
            Box::new(StubProvider::ok(raw_output())),
        );

        // Nothing listens on port 1; the fetch fails without leaving the host.
        let states = collect_states(&session, "http://127.0.0.1:1/sample.wav");
        match states.last() {
            Some(SessionState::Failed { message }) => {
                assert!(message.contains("fetch failed"), "message: {message}")
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(states.iter().all(|s| s.label() != "transcribing"));
    }

    #[test]
    fn test_model_progress_snapshots_reach_observer() {
        let session = Session::new(
            SessionConfig::default(),
            Box::new(StubProvider::ok(raw_output())),
        );
        let (_tmp, source) = temp_wav();

        let states = collect_states(&session, &source);
        let summaries: Vec<&str> = states
            .iter()
            .filter_map(|s| match s {
                SessionState::LoadingModel { summary, .. } => Some(summary.as_str()),
                _ => None,
            })
            .collect();

        assert_eq!(summaries.first(), Some(&"Loading model components..."));
        assert!(summaries.iter().any(|s| s.contains("model 0%")));
        assert_eq!(summaries.last(), Some(&"Loaded model.bin"));
    }
}
