use std::thread;

use crossbeam_channel::Receiver;

use murmur_core::session::{Session, SessionConfig, SessionState};

/// Run one transcription session on a background thread. State snapshots
/// arrive on the returned channel; the channel closes when the run reaches
/// a terminal state.
pub fn spawn(config: SessionConfig, source: String) -> Receiver<SessionState> {
    let (tx, rx) = crossbeam_channel::unbounded::<SessionState>();

    thread::spawn(move || {
        let session = Session::with_default_provider(config);
        session.run(&source, |state| {
            log::debug!("session state: {}", state.label());
            let _ = tx.send(state);
        });
    });

    rx
}
