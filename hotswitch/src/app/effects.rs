use crate::core::RecencyTracker;
use crate::effect::Effect;
use crate::platform::{ApplicationRegistry, SessionHost};

/// Execute side effects in order.
pub fn execute_effects<R: ApplicationRegistry, H: SessionHost>(
    effects: Vec<Effect>,
    registry: &R,
    host: &H,
    recency: &mut RecencyTracker,
) {
    for effect in effects {
        match effect {
            Effect::Present {
                candidates,
                selected,
            } => {
                host.present(&candidates, selected);
            }
            Effect::UpdateSelection { selected } => {
                host.update_selection(selected);
            }
            Effect::Dismiss => {
                host.dismiss();
            }
            Effect::Activate(app) => {
                if !registry.activate(&app) {
                    tracing::warn!("Activation of {} was refused", app.id);
                }
            }
            Effect::RecordActivation(id) => {
                // Recorded even if activation was refused: the user chose this app.
                recency.record(&id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AppId, CandidateList};
    use crate::platform::mock::{create_test_app, HostCall, MockApplicationRegistry, MockSessionHost};

    #[test]
    fn test_effects_run_in_order() {
        let registry = MockApplicationRegistry::new();
        let host = MockSessionHost::new();
        let mut recency = RecencyTracker::new();
        let candidates = CandidateList::from(vec![create_test_app("a"), create_test_app("b")]);

        execute_effects(
            vec![
                Effect::Present {
                    candidates,
                    selected: 0,
                },
                Effect::UpdateSelection { selected: 1 },
                Effect::Activate(create_test_app("b")),
                Effect::RecordActivation(AppId::new("b")),
                Effect::Dismiss,
            ],
            &registry,
            &host,
            &mut recency,
        );

        assert_eq!(
            *host.calls.borrow(),
            vec![
                HostCall::Present {
                    ids: vec![AppId::new("a"), AppId::new("b")],
                    selected: 0
                },
                HostCall::UpdateSelection(1),
                HostCall::Dismiss,
            ]
        );
        assert_eq!(registry.activated_ids(), vec![AppId::new("b")]);
        assert!(recency.last_activated(&AppId::new("b")).is_some());
        assert!(recency.last_activated(&AppId::new("a")).is_none());
    }

    #[test]
    fn test_refused_activation_still_records() {
        let mut registry = MockApplicationRegistry::new();
        registry.refuse_activation = true;
        let host = MockSessionHost::new();
        let mut recency = RecencyTracker::new();

        execute_effects(
            vec![
                Effect::Activate(create_test_app("a")),
                Effect::RecordActivation(AppId::new("a")),
            ],
            &registry,
            &host,
            &mut recency,
        );

        assert_eq!(registry.activated_ids(), vec![AppId::new("a")]);
        assert_eq!(recency.len(), 1);
        assert!(host.calls.borrow().is_empty());
    }
}
