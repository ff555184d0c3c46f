use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use super::{compute_order, ApplicationHandle, CandidateList, Config, RecencyTracker};
use crate::effect::Effect;
use crate::platform::ApplicationRegistry;

/// Transition requests produced by the input classifier (or IPC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRequest {
    Open,
    CycleForward,
    CycleBackward,
    Commit,
    Cancel,
}

/// Where the session stands, as seen from the event tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Closed,
    /// `Open` was posted but the main queue has not handled it yet
    Opening,
    Open,
}

/// Session phase shared between the switcher and the input classifier.
///
/// The classifier moves it to `Opening` when it posts `Open` and back to
/// `Closed` when it posts `Commit` or `Cancel`. The switcher settles it
/// once requests are handled, and also closes it when IPC ends a session.
#[derive(Debug, Clone, Default)]
pub struct SharedSessionPhase(Arc<AtomicU8>);

const PHASE_CLOSED: u8 = 0;
const PHASE_OPENING: u8 = 1;
const PHASE_OPEN: u8 = 2;

impl SharedSessionPhase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> SessionPhase {
        match self.0.load(Ordering::Acquire) {
            PHASE_OPENING => SessionPhase::Opening,
            PHASE_OPEN => SessionPhase::Open,
            _ => SessionPhase::Closed,
        }
    }

    pub fn is_active(&self) -> bool {
        self.get() != SessionPhase::Closed
    }

    pub fn begin_open(&self) {
        self.0.store(PHASE_OPENING, Ordering::Release);
    }

    pub fn end_gesture(&self) {
        self.0.store(PHASE_CLOSED, Ordering::Release);
    }

    fn mark_open(&self) {
        self.0.store(PHASE_OPEN, Ordering::Release);
    }

    /// Only a pending open is dropped; a newer gesture may already own the phase.
    fn mark_refused(&self) {
        let _ = self.0.compare_exchange(
            PHASE_OPENING,
            PHASE_CLOSED,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Only an open session is closed, so a queued close never clobbers a
    /// gesture that started after it.
    fn mark_closed(&self) {
        let _ = self.0.compare_exchange(
            PHASE_OPEN,
            PHASE_CLOSED,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

/// An open switch session: a fixed candidate list and a cursor into it.
#[derive(Debug, Clone)]
pub struct SwitchSession {
    candidates: CandidateList,
    cursor: usize,
}

impl SwitchSession {
    /// Returns None for an empty list; a session always has a selection.
    pub fn new(candidates: CandidateList) -> Option<Self> {
        if candidates.is_empty() {
            return None;
        }
        Some(Self {
            candidates,
            cursor: 0,
        })
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> &ApplicationHandle {
        &self.candidates[self.cursor]
    }

    pub fn cycle_forward(&mut self) {
        self.cursor = (self.cursor + 1) % self.candidates.len();
    }

    pub fn cycle_backward(&mut self) {
        let len = self.candidates.len() as isize;
        self.cursor = (self.cursor as isize - 1).rem_euclid(len) as usize;
    }
}

/// Session lifecycle: `Closed` (no session) or `Open` (a session exists).
///
/// Transitions return the effects to execute rather than performing them,
/// so the state machine itself never touches the host or the registry
/// except to read the running-app snapshot on open.
#[derive(Debug, Default)]
pub struct Switcher {
    session: Option<SwitchSession>,
    phase: SharedSessionPhase,
}

impl Switcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&SwitchSession> {
        self.session.as_ref()
    }

    /// Handle for the input classifier to read the session phase.
    pub fn phase(&self) -> SharedSessionPhase {
        self.phase.clone()
    }

    pub fn handle<R: ApplicationRegistry>(
        &mut self,
        request: SessionRequest,
        registry: &R,
        config: &Config,
        recency: &RecencyTracker,
    ) -> Vec<Effect> {
        match request {
            SessionRequest::Open => {
                if self.is_open() {
                    tracing::debug!("Open requested while a session is already open");
                    self.phase.mark_open();
                    return vec![];
                }
                let running = registry.list_running();
                self.open(&running, config, recency)
            }
            SessionRequest::CycleForward => self.cycle_forward(),
            SessionRequest::CycleBackward => self.cycle_backward(),
            SessionRequest::Commit => self.commit(),
            SessionRequest::Cancel => self.cancel(),
        }
    }

    /// Closed -> Open. Refused silently when nothing is running.
    pub fn open(
        &mut self,
        running: &[ApplicationHandle],
        config: &Config,
        recency: &RecencyTracker,
    ) -> Vec<Effect> {
        let candidates = compute_order(running, &config.pinned, recency);
        let Some(session) = SwitchSession::new(candidates) else {
            tracing::debug!("No candidates, switch session not opened");
            self.phase.mark_refused();
            return vec![];
        };

        tracing::info!(
            "Switch session opened with {} candidates",
            session.candidates().len()
        );
        let effect = Effect::Present {
            candidates: session.candidates().clone(),
            selected: session.cursor(),
        };
        self.session = Some(session);
        self.phase.mark_open();
        vec![effect]
    }

    pub fn cycle_forward(&mut self) -> Vec<Effect> {
        let Some(session) = self.session.as_mut() else {
            return vec![];
        };
        session.cycle_forward();
        tracing::debug!("Selection -> {} ({})", session.cursor(), session.selected().id);
        vec![Effect::UpdateSelection {
            selected: session.cursor(),
        }]
    }

    pub fn cycle_backward(&mut self) -> Vec<Effect> {
        let Some(session) = self.session.as_mut() else {
            return vec![];
        };
        session.cycle_backward();
        tracing::debug!("Selection -> {} ({})", session.cursor(), session.selected().id);
        vec![Effect::UpdateSelection {
            selected: session.cursor(),
        }]
    }

    /// Open -> Closed, activating the selected app.
    pub fn commit(&mut self) -> Vec<Effect> {
        let Some(session) = self.session.take() else {
            return vec![];
        };
        self.phase.mark_closed();
        let selected = session.selected().clone();
        tracing::info!("Switching to {} ({})", selected.name, selected.id);
        let id = selected.id.clone();
        vec![
            Effect::Activate(selected),
            Effect::RecordActivation(id),
            Effect::Dismiss,
        ]
    }

    /// Open -> Closed without activating anything.
    pub fn cancel(&mut self) -> Vec<Effect> {
        if self.session.take().is_none() {
            return vec![];
        }
        self.phase.mark_closed();
        tracing::info!("Switch session cancelled");
        vec![Effect::Dismiss]
    }
}
