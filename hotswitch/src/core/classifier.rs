use hotswitch_ipc::ModifierKey;

use super::{ModifierSetting, SessionRequest, SharedSessionPhase};
use crate::macos::keycode;

/// Modifier flags carried by a keyboard event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub cmd: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn contains(&self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::Option => self.alt,
            ModifierKey::Command => self.cmd,
        }
    }
}

/// Events seen by the event tap, already decoded from the platform event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapEvent {
    /// The OS disabled the tap (timeout or user input)
    TapDisabled,
    FlagsChanged { modifiers: Modifiers },
    KeyDown { key_code: u16, modifiers: Modifiers },
    KeyUp { key_code: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Drop the event; no application sees it
    Consume,
    /// Forward the event unmodified
    PassThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub decision: Decision,
    /// Request to post to the main queue, if any
    pub request: Option<SessionRequest>,
    /// The tap must be re-enabled before returning
    pub reenable_tap: bool,
}

impl Classification {
    fn pass() -> Self {
        Self {
            decision: Decision::PassThrough,
            request: None,
            reenable_tap: false,
        }
    }

    fn pass_with(request: SessionRequest) -> Self {
        Self {
            decision: Decision::PassThrough,
            request: Some(request),
            reenable_tap: false,
        }
    }

    fn consume(request: SessionRequest) -> Self {
        Self {
            decision: Decision::Consume,
            request: Some(request),
            reenable_tap: false,
        }
    }
}

/// Key codes the switcher reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    pub cycle: u16,
    pub cancel: u16,
    pub forward: Vec<u16>,
    pub backward: Vec<u16>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            cycle: keycode::TAB,
            cancel: keycode::ESCAPE,
            forward: vec![keycode::RIGHT],
            backward: vec![keycode::LEFT],
        }
    }
}

/// Decides for every keyboard event whether the switcher owns it.
///
/// Runs synchronously inside the tap callback. It tracks whether the
/// configured modifier is held and reads the session phase shared with the
/// switcher. A session counts as active while an `Open` is pending or the
/// switcher has one open, so requests posted behind `Open` stay in order.
pub struct InputClassifier {
    modifier: ModifierSetting,
    session: SharedSessionPhase,
    keys: KeyMap,
    modifier_held: bool,
}

impl InputClassifier {
    pub fn new(modifier: ModifierSetting, session: SharedSessionPhase, keys: KeyMap) -> Self {
        Self {
            modifier,
            session,
            keys,
            modifier_held: false,
        }
    }

    pub fn is_modifier_held(&self) -> bool {
        self.modifier_held
    }

    pub fn is_session_active(&self) -> bool {
        self.session.is_active()
    }

    pub fn classify(&mut self, event: &TapEvent) -> Classification {
        match *event {
            TapEvent::TapDisabled => Classification {
                reenable_tap: true,
                ..Classification::pass()
            },
            TapEvent::FlagsChanged { modifiers } => self.flags_changed(modifiers),
            TapEvent::KeyDown {
                key_code,
                modifiers,
            } => self.key_down(key_code, modifiers),
            TapEvent::KeyUp { .. } => Classification::pass(),
        }
    }

    fn flags_changed(&mut self, modifiers: Modifiers) -> Classification {
        let held = modifiers.contains(self.modifier.get());

        if held && !self.modifier_held {
            self.modifier_held = true;
        } else if !held && self.modifier_held {
            self.modifier_held = false;
            if self.is_session_active() {
                self.session.end_gesture();
                return Classification::pass_with(SessionRequest::Commit);
            }
        }
        Classification::pass()
    }

    fn key_down(&mut self, key_code: u16, modifiers: Modifiers) -> Classification {
        if self.modifier_held && key_code == self.keys.cycle {
            if !self.is_session_active() {
                // Opening press selects the first candidate; it does not cycle.
                self.session.begin_open();
                return Classification::consume(SessionRequest::Open);
            }
            let request = if modifiers.shift {
                SessionRequest::CycleBackward
            } else {
                SessionRequest::CycleForward
            };
            return Classification::consume(request);
        }

        if !self.is_session_active() {
            return Classification::pass();
        }

        if key_code == self.keys.cancel {
            self.session.end_gesture();
            return Classification::consume(SessionRequest::Cancel);
        }
        if self.keys.forward.contains(&key_code) {
            return Classification::consume(SessionRequest::CycleForward);
        }
        if self.keys.backward.contains(&key_code) {
            return Classification::consume(SessionRequest::CycleBackward);
        }

        Classification::pass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SessionPhase;

    fn alt() -> Modifiers {
        Modifiers {
            alt: true,
            ..Default::default()
        }
    }

    fn alt_shift() -> Modifiers {
        Modifiers {
            alt: true,
            shift: true,
            ..Default::default()
        }
    }

    fn classifier() -> InputClassifier {
        classifier_with(SharedSessionPhase::new())
    }

    fn classifier_with(session: SharedSessionPhase) -> InputClassifier {
        InputClassifier::new(
            ModifierSetting::new(ModifierKey::Option),
            session,
            KeyMap::default(),
        )
    }

    fn press_modifier(c: &mut InputClassifier) -> Classification {
        c.classify(&TapEvent::FlagsChanged { modifiers: alt() })
    }

    fn release_modifier(c: &mut InputClassifier) -> Classification {
        c.classify(&TapEvent::FlagsChanged {
            modifiers: Modifiers::default(),
        })
    }

    fn key(c: &mut InputClassifier, key_code: u16, modifiers: Modifiers) -> Classification {
        c.classify(&TapEvent::KeyDown {
            key_code,
            modifiers,
        })
    }

    #[test]
    fn test_tap_disabled_reenables_and_passes() {
        let mut c = classifier();
        let result = c.classify(&TapEvent::TapDisabled);
        assert_eq!(result.decision, Decision::PassThrough);
        assert!(result.reenable_tap);
        assert_eq!(result.request, None);
    }

    #[test]
    fn test_tap_disabled_keeps_session() {
        let mut c = classifier();
        press_modifier(&mut c);
        key(&mut c, keycode::TAB, alt());
        c.classify(&TapEvent::TapDisabled);
        assert!(c.is_session_active());
        assert!(c.is_modifier_held());
    }

    #[test]
    fn test_flags_changed_passes_through() {
        let mut c = classifier();
        let result = press_modifier(&mut c);
        assert_eq!(result, Classification::pass());
        assert!(c.is_modifier_held());
    }

    #[test]
    fn test_first_tab_opens_then_cycles() {
        let mut c = classifier();
        press_modifier(&mut c);

        let first = key(&mut c, keycode::TAB, alt());
        assert_eq!(first.decision, Decision::Consume);
        assert_eq!(first.request, Some(SessionRequest::Open));

        let second = key(&mut c, keycode::TAB, alt());
        assert_eq!(second.decision, Decision::Consume);
        assert_eq!(second.request, Some(SessionRequest::CycleForward));

        let third = key(&mut c, keycode::TAB, alt_shift());
        assert_eq!(third.request, Some(SessionRequest::CycleBackward));
    }

    #[test]
    fn test_release_commits() {
        let mut c = classifier();
        press_modifier(&mut c);
        key(&mut c, keycode::TAB, alt());

        let result = release_modifier(&mut c);
        assert_eq!(result.decision, Decision::PassThrough);
        assert_eq!(result.request, Some(SessionRequest::Commit));
        assert!(!c.is_session_active());
        assert!(!c.is_modifier_held());
    }

    #[test]
    fn test_release_without_session_is_silent() {
        let mut c = classifier();
        press_modifier(&mut c);
        let result = release_modifier(&mut c);
        assert_eq!(result, Classification::pass());
    }

    #[test]
    fn test_tab_without_modifier_passes() {
        let mut c = classifier();
        let result = key(&mut c, keycode::TAB, Modifiers::default());
        assert_eq!(result, Classification::pass());
    }

    #[test]
    fn test_other_modifier_does_not_trigger() {
        let mut c = classifier();
        c.classify(&TapEvent::FlagsChanged {
            modifiers: Modifiers {
                cmd: true,
                ..Default::default()
            },
        });
        assert!(!c.is_modifier_held());
        let result = key(
            &mut c,
            keycode::TAB,
            Modifiers {
                cmd: true,
                ..Default::default()
            },
        );
        assert_eq!(result, Classification::pass());
    }

    #[test]
    fn test_modifier_setting_read_on_each_event() {
        let setting = ModifierSetting::new(ModifierKey::Option);
        let mut c = InputClassifier::new(
            setting.clone(),
            SharedSessionPhase::new(),
            KeyMap::default(),
        );
        setting.set(ModifierKey::Command);

        let cmd = Modifiers {
            cmd: true,
            ..Default::default()
        };
        c.classify(&TapEvent::FlagsChanged { modifiers: cmd });
        assert!(c.is_modifier_held());
        assert_eq!(
            key(&mut c, keycode::TAB, cmd).request,
            Some(SessionRequest::Open)
        );
    }

    #[test]
    fn test_escape_cancels_open_session() {
        let mut c = classifier();
        press_modifier(&mut c);
        key(&mut c, keycode::TAB, alt());

        let result = key(&mut c, keycode::ESCAPE, alt());
        assert_eq!(result.decision, Decision::Consume);
        assert_eq!(result.request, Some(SessionRequest::Cancel));

        // Releasing after a cancel does not commit
        assert_eq!(release_modifier(&mut c).request, None);
    }

    #[test]
    fn test_escape_without_session_passes() {
        let mut c = classifier();
        press_modifier(&mut c);
        assert_eq!(key(&mut c, keycode::ESCAPE, alt()), Classification::pass());
    }

    #[test]
    fn test_arrows_cycle_open_session() {
        let mut c = classifier();
        press_modifier(&mut c);
        key(&mut c, keycode::TAB, alt());

        let right = key(&mut c, keycode::RIGHT, alt());
        assert_eq!(right.decision, Decision::Consume);
        assert_eq!(right.request, Some(SessionRequest::CycleForward));

        let left = key(&mut c, keycode::LEFT, alt());
        assert_eq!(left.decision, Decision::Consume);
        assert_eq!(left.request, Some(SessionRequest::CycleBackward));
    }

    #[test]
    fn test_arrows_without_session_pass() {
        let mut c = classifier();
        assert_eq!(
            key(&mut c, keycode::RIGHT, Modifiers::default()),
            Classification::pass()
        );
        assert_eq!(
            key(&mut c, keycode::LEFT, Modifiers::default()),
            Classification::pass()
        );
    }

    #[test]
    fn test_unrelated_key_passes_during_session() {
        let mut c = classifier();
        press_modifier(&mut c);
        key(&mut c, keycode::TAB, alt());
        assert_eq!(key(&mut c, keycode::SPACE, alt()), Classification::pass());
    }

    #[test]
    fn test_key_up_always_passes() {
        let mut c = classifier();
        press_modifier(&mut c);
        key(&mut c, keycode::TAB, alt());
        let result = c.classify(&TapEvent::KeyUp {
            key_code: keycode::TAB,
        });
        assert_eq!(result, Classification::pass());
    }

    #[test]
    fn test_new_gesture_after_commit_opens_again() {
        let mut c = classifier();
        press_modifier(&mut c);
        key(&mut c, keycode::TAB, alt());
        release_modifier(&mut c);

        press_modifier(&mut c);
        assert_eq!(
            key(&mut c, keycode::TAB, alt()).request,
            Some(SessionRequest::Open)
        );
    }

    #[test]
    fn test_pending_open_counts_as_session() {
        let phase = SharedSessionPhase::new();
        let mut c = classifier_with(phase.clone());
        press_modifier(&mut c);
        key(&mut c, keycode::TAB, alt());
        assert_eq!(phase.get(), SessionPhase::Opening);

        assert_eq!(
            key(&mut c, keycode::RIGHT, alt()).request,
            Some(SessionRequest::CycleForward)
        );
    }

    #[test]
    fn test_closed_phase_reopens_while_held() {
        let phase = SharedSessionPhase::new();
        let mut c = classifier_with(phase.clone());
        press_modifier(&mut c);
        key(&mut c, keycode::TAB, alt());

        // The switcher closed the session behind the classifier's back
        phase.end_gesture();

        assert_eq!(key(&mut c, keycode::ESCAPE, alt()), Classification::pass());
        assert_eq!(key(&mut c, keycode::RIGHT, alt()), Classification::pass());
        let tab = key(&mut c, keycode::TAB, alt());
        assert_eq!(tab.decision, Decision::Consume);
        assert_eq!(tab.request, Some(SessionRequest::Open));
    }

    #[test]
    fn test_release_after_external_close_is_silent() {
        let phase = SharedSessionPhase::new();
        let mut c = classifier_with(phase.clone());
        press_modifier(&mut c);
        key(&mut c, keycode::TAB, alt());
        phase.end_gesture();

        assert_eq!(release_modifier(&mut c), Classification::pass());
    }
}
