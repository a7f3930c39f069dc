mod app;
mod session_worker;

use clap::Parser;

use app::App;
use murmur_core::shared::constants::DEFAULT_AUDIO_URL;

/// Interactive transcription UI. Transcribes one audio source and shows
/// live model/audio/inference progress.
#[derive(Parser)]
#[command(name = "murmur-desktop")]
struct Cli {
    /// Audio source: local file path or URL. Defaults to the sample recording.
    source: Option<String>,
}

fn main() -> iced::Result {
    env_logger::init();

    let cli = Cli::parse();
    let source = cli.source.unwrap_or_else(|| DEFAULT_AUDIO_URL.to_string());

    iced::application(move || App::new(source.clone()), App::update, App::view)
        .title("Murmur \u{2014} Transcription")
        .theme(App::theme)
        .subscription(App::subscription)
        .window(iced::window::Settings {
            size: iced::Size::new(560.0, 640.0),
            ..Default::default()
        })
        .run()
}
