use std::io::{self, Write};
use std::process;

use clap::Parser;

use murmur_core::audio::domain::transcript::TranscriptOutput;
use murmur_core::session::{Session, SessionConfig, SessionState};
use murmur_core::shared::constants::DEFAULT_AUDIO_URL;

/// Transcribe the bundled sample recording and print the transcript with
/// timestamps.
#[derive(Parser)]
#[command(name = "murmur")]
struct Cli {}

fn main() {
    env_logger::init();
    let _cli = Cli::parse();

    // Batch policy: fixed remote sample, no local model directories.
    let config = SessionConfig {
        allow_local_models: false,
        ..SessionConfig::default()
    };
    let session = Session::with_default_provider(config);

    let mut status = StatusLine::new();
    let mut outcome: Option<SessionState> = None;

    session.run(DEFAULT_AUDIO_URL, |state| {
        log::debug!("session state: {}", state.label());
        match &state {
            SessionState::Idle => {}
            SessionState::LoadingModel { summary, .. } => status.set(summary),
            SessionState::LoadingAudio { message } => status.set(message),
            SessionState::Transcribing { .. } => status.set("Transcribing (inference)..."),
            SessionState::Completed { .. } | SessionState::Failed { .. } => status.clear(),
        }
        if state.is_terminal() {
            outcome = Some(state);
        }
    });

    match outcome {
        Some(SessionState::Completed {
            transcript,
            elapsed_seconds,
        }) => {
            print_transcript(&transcript, elapsed_seconds);
        }
        Some(SessionState::Failed { message }) => {
            eprintln!("Error: {message}");
            process::exit(1);
        }
        // The driver always ends in a terminal state.
        _ => {
            eprintln!("Error: session ended without a result");
            process::exit(1);
        }
    }
}

fn print_transcript(transcript: &TranscriptOutput, elapsed_seconds: f64) {
    println!("Transcription complete in {elapsed_seconds:.2}s");
    println!();
    println!("Transcript:");
    println!("  {}", transcript.text);

    if !transcript.segments.is_empty() {
        println!();
        println!("Segments:");
        for segment in &transcript.segments {
            println!("  [{}] {}", segment.span(), segment.text);
        }
    }
}

/// One-line status display, rewritten in place on stderr.
struct StatusLine {
    dirty: bool,
}

impl StatusLine {
    fn new() -> Self {
        Self { dirty: false }
    }

    fn set(&mut self, message: &str) {
        // \x1b[K clears the remainder of a previously longer line.
        eprint!("\r\x1b[K{message}");
        let _ = io::stderr().flush();
        self.dirty = true;
    }

    fn clear(&mut self) {
        if self.dirty {
            eprint!("\r\x1b[K");
            let _ = io::stderr().flush();
            self.dirty = false;
        }
    }
}
