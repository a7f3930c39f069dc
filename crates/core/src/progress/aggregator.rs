use std::time::{Duration, Instant};

use super::event::{ProgressEvent, ProgressPhase};

/// Minimum time between visible re-renders driven by `Progress` events.
/// `Initiate` and `Done` always render immediately.
const RENDER_INTERVAL: Duration = Duration::from_millis(100);

/// Current percent for one in-flight download.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressItem {
    pub file: String,
    pub percent: f32,
}

/// Folds an unordered stream of per-file download events into a stable,
/// throttled status summary.
///
/// Entries keep discovery order so the rendered line does not reshuffle as
/// concurrent downloads interleave. The table is always updated; only the
/// visible re-render is throttled.
#[derive(Debug, Default)]
pub struct ProgressAggregator {
    items: Vec<ProgressItem>,
    last_render: Option<Instant>,
    last_done: Option<String>,
}

impl ProgressAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event and return the summary to display, if a re-render
    /// is due now.
    pub fn observe(&mut self, event: &ProgressEvent) -> Option<String> {
        self.observe_at(event, Instant::now())
    }

    /// Same as [`observe`](Self::observe) with an explicit clock, so the
    /// throttle rule can be tested without sleeping.
    pub fn observe_at(&mut self, event: &ProgressEvent, now: Instant) -> Option<String> {
        match event.phase {
            ProgressPhase::Initiate => {
                if self.position(&event.file).is_none() {
                    self.items.push(ProgressItem {
                        file: event.file.clone(),
                        percent: 0.0,
                    });
                }
            }
            ProgressPhase::Progress => match self.position(&event.file) {
                Some(idx) => self.items[idx].percent = event.percent,
                None => self.items.push(ProgressItem {
                    file: event.file.clone(),
                    percent: event.percent,
                }),
            },
            ProgressPhase::Done => {
                if let Some(idx) = self.position(&event.file) {
                    self.items.remove(idx);
                }
                self.last_done = Some(event.file.clone());
            }
        }

        let elapsed_enough = self
            .last_render
            .map_or(true, |last| now.duration_since(last) >= RENDER_INTERVAL);
        if event.phase != ProgressPhase::Progress || elapsed_enough {
            self.last_render = Some(now);
            Some(self.render())
        } else {
            None
        }
    }

    /// Render the current table. Pure: calling twice without an intervening
    /// event yields the same string.
    pub fn render(&self) -> String {
        if self.items.is_empty() {
            return match &self.last_done {
                Some(file) => format!("Loaded {file}"),
                None => "Loading model components...".to_string(),
            };
        }

        let parts: Vec<String> = self
            .items
            .iter()
            .map(|item| format!("{} {:.0}%", short_file_name(&item.file), item.percent))
            .collect();
        format!("Downloading: {}", parts.join(" | "))
    }

    /// Current in-flight downloads, in discovery order.
    pub fn items(&self) -> &[ProgressItem] {
        &self.items
    }

    pub fn is_idle(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, file: &str) -> Option<usize> {
        self.items.iter().position(|item| item.file == file)
    }
}

/// Shorten a resource identifier for display: last path segment, extension
/// stripped. "onnx/decoder_model_merged.onnx" -> "decoder_model_merged".
pub fn short_file_name(file: &str) -> &str {
    let name = file.rsplit('/').next().unwrap_or(file);
    name.split('.').next().unwrap_or(name)
}
