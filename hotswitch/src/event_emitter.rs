use crate::core::{CandidateList, SwitchSession};
use crate::platform::SessionHost;
use hotswitch_ipc::{CandidateInfo, SessionEvent};
use std::sync::mpsc as std_mpsc;

/// Session host that publishes what the switcher shows as events.
/// Events go from the main thread to the tokio thread over std::sync::mpsc,
/// where they are broadcast to event-socket subscribers.
pub struct EventEmitter {
    tx: std_mpsc::Sender<SessionEvent>,
}

impl EventEmitter {
    pub fn new(tx: std_mpsc::Sender<SessionEvent>) -> Self {
        Self { tx }
    }

    fn emit(&self, event: SessionEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::debug!("Failed to emit event (no receivers?): {}", e);
        }
    }
}

impl SessionHost for EventEmitter {
    fn present(&self, candidates: &CandidateList, selected: usize) {
        tracing::info!(
            "Presenting switcher: {} candidates, selected {}",
            candidates.len(),
            selected
        );
        self.emit(SessionEvent::SessionPresented {
            candidates: candidates_to_info(candidates),
            selected,
        });
    }

    fn update_selection(&self, selected: usize) {
        tracing::debug!("Selection changed to {}", selected);
        self.emit(SessionEvent::SelectionChanged { selected });
    }

    fn dismiss(&self) {
        tracing::info!("Dismissing switcher");
        self.emit(SessionEvent::SessionDismissed);
    }
}

pub fn candidates_to_info(candidates: &CandidateList) -> Vec<CandidateInfo> {
    candidates
        .iter()
        .enumerate()
        .map(|(index, h)| CandidateInfo {
            app_id: h.id.to_string(),
            name: h.name.clone(),
            pid: h.pid,
            icon_path: h.icon_path.clone(),
            is_pinned: candidates.is_pinned(index),
        })
        .collect()
}

/// Snapshot sent to a new subscriber that asked for one.
pub fn create_snapshot(session: Option<&SwitchSession>) -> SessionEvent {
    match session {
        Some(session) => SessionEvent::Snapshot {
            candidates: candidates_to_info(session.candidates()),
            selected: Some(session.cursor()),
        },
        None => SessionEvent::Snapshot {
            candidates: vec![],
            selected: None,
        },
    }
}
