use std::time::Duration;

use crossbeam_channel::Receiver;
use iced::widget::{column, container, progress_bar, row, scrollable, text};
use iced::{Element, Length, Subscription, Task, Theme};

use murmur_core::audio::domain::transcript::TranscriptOutput;
use murmur_core::progress::{short_file_name, ProgressItem};
use murmur_core::session::{SessionConfig, SessionState};

use crate::session_worker;

#[derive(Debug, Clone)]
pub enum Message {
    /// Timer tick: drain pending session snapshots and redraw.
    Poll,
}

pub struct App {
    source: String,
    state: SessionState,
    updates: Receiver<SessionState>,
}

impl App {
    pub fn new(source: String) -> (Self, Task<Message>) {
        // Interactive policy: a ./models directory may satisfy model
        // resolution before any download happens.
        let config = SessionConfig {
            allow_local_models: true,
            local_model_dir: std::env::current_dir().ok().map(|d| d.join("models")),
            ..SessionConfig::default()
        };
        let updates = session_worker::spawn(config, source.clone());

        (
            Self {
                source,
                state: SessionState::Idle,
                updates,
            },
            Task::none(),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Poll => {
                while let Ok(state) = self.updates.try_recv() {
                    self.state = state;
                }
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let header = column![
            text("Murmur").size(22),
            text(self.source.as_str()).size(12),
        ]
        .spacing(4);

        let body: Element<'_, Message> = match &self.state {
            SessionState::Idle => text("Starting...").size(14).into(),
            SessionState::LoadingModel { items, summary } => model_panel(items, summary),
            SessionState::LoadingAudio { message } => text(message.as_str()).size(14).into(),
            SessionState::Transcribing { started } => text(format!(
                "Transcribing... ({:.0}s)",
                started.elapsed().as_secs_f64()
            ))
            .size(14)
            .into(),
            SessionState::Completed {
                transcript,
                elapsed_seconds,
            } => transcript_panel(transcript, *elapsed_seconds),
            SessionState::Failed { message } => error_panel(message),
        };

        container(column![header, body].spacing(16))
            .padding(20)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn subscription(&self) -> Subscription<Message> {
        // Terminal states never change again; stop polling.
        if self.state.is_terminal() {
            Subscription::none()
        } else {
            iced::time::every(Duration::from_millis(100)).map(|_| Message::Poll)
        }
    }
}

fn model_panel<'a>(items: &'a [ProgressItem], summary: &'a str) -> Element<'a, Message> {
    if items.is_empty() {
        return text(summary).size(14).into();
    }

    let rows = items.iter().map(|item| {
        row![
            text(short_file_name(&item.file))
                .size(13)
                .width(Length::FillPortion(2)),
            progress_bar(0.0..=100.0, item.percent)
                .girth(10)
                .length(Length::FillPortion(3)),
            text(format!("{:.0}%", item.percent))
                .size(13)
                .width(Length::Fixed(48.0)),
        ]
        .spacing(10)
        .into()
    });

    column![
        text("Loading model").size(14),
        column(rows.collect::<Vec<_>>()).spacing(8),
    ]
    .spacing(10)
    .into()
}

fn transcript_panel(transcript: &TranscriptOutput, elapsed_seconds: f64) -> Element<'_, Message> {
    let segments = transcript.segments.iter().map(|segment| {
        row![
            text(segment.span()).size(12).width(Length::Fixed(160.0)),
            text(segment.text.as_str()).size(13),
        ]
        .spacing(10)
        .into()
    });

    let content = column![
        text(format!("Transcription complete in {elapsed_seconds:.2}s")).size(14),
        container(text(transcript.text.as_str()).size(15)).padding(12),
        column(segments.collect::<Vec<_>>()).spacing(6),
    ]
    .spacing(14);

    scrollable(content).height(Length::Fill).into()
}

fn error_panel(message: &str) -> Element<'_, Message> {
    // Stays on screen: the interactive variant does not exit on failure.
    container(text(message).size(14))
        .padding(14)
        .width(Length::Fill)
        .style(|theme: &Theme| {
            let palette = theme.extended_palette();
            container::Style {
                background: Some(palette.danger.weak.color.into()),
                text_color: Some(palette.danger.weak.text),
                border: iced::border::rounded(6.0),
                ..container::Style::default()
            }
        })
        .into()
}
