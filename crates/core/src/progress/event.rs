/// Lifecycle phase of one model component download.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressPhase {
    Initiate,
    Progress,
    Done,
}

/// One lifecycle notification for one named resource during model loading.
///
/// Events for a given `file` arrive in order initiate -> progress* -> done.
/// Events for different files interleave arbitrarily.
#[derive(Clone, Debug)]
pub struct ProgressEvent {
    pub file: String,
    pub phase: ProgressPhase,
    /// Percent complete in [0, 100]. Only meaningful for `Progress` events.
    pub percent: f32,
}

impl ProgressEvent {
    pub fn initiate(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            phase: ProgressPhase::Initiate,
            percent: 0.0,
        }
    }

    pub fn progress(file: impl Into<String>, percent: f32) -> Self {
        Self {
            file: file.into(),
            phase: ProgressPhase::Progress,
            percent,
        }
    }

    pub fn done(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            phase: ProgressPhase::Done,
            percent: 100.0,
        }
    }
}
