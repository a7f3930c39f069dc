/// A timestamped span of the transcript, in chronological order as produced
/// by the inference stage. `end_time` is `None` when the model could not
/// place the end of the final span.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptSegment {
    pub start_time: f64,
    pub end_time: Option<f64>,
    pub text: String,
}

impl TranscriptSegment {
    /// Display form of the segment's time range, e.g. "00:00.00 -> 00:01.00".
    pub fn span(&self) -> String {
        format!(
            "{} -> {}",
            format_timestamp(Some(self.start_time)),
            format_timestamp(self.end_time)
        )
    }
}

/// Full transcription result: the complete text plus its ordered segments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TranscriptOutput {
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
}

impl TranscriptOutput {
    /// Trim surrounding whitespace from the full text and every segment.
    /// The model emits spans with leading spaces.
    pub fn trimmed(self) -> Self {
        Self {
            text: self.text.trim().to_string(),
            segments: self
                .segments
                .into_iter()
                .map(|segment| TranscriptSegment {
                    text: segment.text.trim().to_string(),
                    ..segment
                })
                .collect(),
        }
    }
}

/// Format seconds as `mm:ss.ss`; unknown timestamps render as "...".
pub fn format_timestamp(t: Option<f64>) -> String {
    match t {
        Some(t) => {
            let mins = (t / 60.0).floor() as u64;
            let secs = t - (mins as f64) * 60.0;
            format!("{mins:02}:{secs:05.2}")
        }
        None => "...".to_string(),
    }
}
