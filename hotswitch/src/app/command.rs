use crate::core::{compute_order, AppId, Config, RecencyTracker, Switcher};
use crate::effect::{CommandResult, Effect};
use crate::platform::ApplicationRegistry;
use hotswitch_ipc::{AppInfo, Command, Response, StateInfo};

/// Pure function: processes a command and returns a response with effects.
/// Only the configuration and the switcher are mutated here; activation and
/// rendering happen when the effects are executed.
pub fn process_command<R: ApplicationRegistry>(
    cmd: &Command,
    switcher: &mut Switcher,
    config: &mut Config,
    recency: &RecencyTracker,
    registry: &R,
) -> CommandResult {
    match cmd {
        Command::Pin { app_id } => match parse_app_id(app_id) {
            Ok(id) => {
                if !config.pinned.pin(id) {
                    tracing::debug!("{} is already pinned", app_id);
                }
                CommandResult::ok()
            }
            Err(e) => CommandResult::error(e),
        },
        Command::Unpin { app_id } => {
            if config.pinned.unpin(&AppId::from(app_id.as_str())) {
                CommandResult::ok()
            } else {
                CommandResult::error(format!("{} is not pinned", app_id))
            }
        }
        Command::TogglePin { app_id } => match parse_app_id(app_id) {
            Ok(id) => {
                let pinned = config.pinned.toggle(id);
                tracing::info!(
                    "{} {}",
                    if pinned { "Pinned" } else { "Unpinned" },
                    app_id
                );
                CommandResult::ok()
            }
            Err(e) => CommandResult::error(e),
        },
        Command::MovePin { app_id, index } => {
            match config
                .pinned
                .move_to(&AppId::from(app_id.as_str()), *index)
            {
                Ok(()) => CommandResult::ok(),
                Err(e) => CommandResult::error(e),
            }
        }
        Command::SetPinned { app_ids } => {
            let ids: Result<Vec<AppId>, String> =
                app_ids.iter().map(|id| parse_app_id(id)).collect();
            match ids {
                Ok(ids) => {
                    config.pinned.replace(ids);
                    CommandResult::ok()
                }
                Err(e) => CommandResult::error(e),
            }
        }
        Command::ListPinned => CommandResult::with_response(Response::Pinned {
            app_ids: config.pinned.iter().map(|id| id.to_string()).collect(),
        }),
        Command::SetModifier { modifier } => {
            config.modifier.set(*modifier);
            tracing::info!("Switcher shortcut is now {}", modifier.shortcut_description());
            CommandResult::ok()
        }
        Command::ListApps => {
            let running = registry.list_running();
            let order = compute_order(&running, &config.pinned, recency);
            let apps = order
                .iter()
                .enumerate()
                .map(|(index, h)| AppInfo {
                    app_id: h.id.to_string(),
                    name: h.name.clone(),
                    pid: h.pid,
                    icon_path: h.icon_path.clone(),
                    is_pinned: order.is_pinned(index),
                    last_activated: recency.last_activated_secs(&h.id),
                })
                .collect();
            CommandResult::with_response(Response::Apps { apps })
        }
        Command::GetState => {
            let modifier = config.modifier.get();
            let session = switcher.session();
            CommandResult::with_response(Response::State {
                state: StateInfo {
                    modifier,
                    shortcut: modifier.shortcut_description(),
                    session_open: session.is_some(),
                    selected_index: session.map(|s| s.cursor()),
                    candidate_count: session.map_or(0, |s| s.candidates().len()),
                    pinned_count: config.pinned.len(),
                    running_count: registry.list_running().len(),
                },
            })
        }
        Command::SwitchTo { app_id } => {
            let id = AppId::from(app_id.as_str());
            let Some(handle) = registry.list_running().into_iter().find(|h| h.id == id) else {
                return CommandResult::error(format!("{} is not running", app_id));
            };
            // A session open at this point is abandoned, not committed.
            let mut effects = switcher.cancel();
            effects.push(Effect::Activate(handle));
            effects.push(Effect::RecordActivation(id));
            CommandResult::ok_with_effects(effects)
        }
        Command::CancelSession => CommandResult::ok_with_effects(switcher.cancel()),
        Command::Quit => CommandResult::ok_with_effects(switcher.cancel()),
    }
}

fn parse_app_id(app_id: &str) -> Result<AppId, String> {
    let trimmed = app_id.trim();
    if trimmed.is_empty() {
        return Err("App id must not be empty".to_string());
    }
    Ok(AppId::from(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SessionRequest;
    use crate::platform::mock::{create_test_app, MockApplicationRegistry};
    use hotswitch_ipc::ModifierKey;
    use std::time::{Duration, UNIX_EPOCH};

    struct Fixture {
        switcher: Switcher,
        config: Config,
        recency: RecencyTracker,
        registry: MockApplicationRegistry,
    }

    impl Fixture {
        fn new(ids: &[&str]) -> Self {
            Self {
                switcher: Switcher::new(),
                config: Config::new(),
                recency: RecencyTracker::new(),
                registry: MockApplicationRegistry::new()
                    .with_apps(ids.iter().map(|id| create_test_app(id)).collect()),
            }
        }

        fn run(&mut self, cmd: Command) -> CommandResult {
            process_command(
                &cmd,
                &mut self.switcher,
                &mut self.config,
                &self.recency,
                &self.registry,
            )
        }

        fn open(&mut self) {
            self.switcher.handle(
                SessionRequest::Open,
                &self.registry,
                &self.config,
                &self.recency,
            );
        }

        fn pinned(&self) -> Vec<&str> {
            self.config.pinned.iter().map(|id| id.as_str()).collect()
        }
    }

    fn is_ok(result: &CommandResult) -> bool {
        matches!(result.response, Response::Ok)
    }

    #[test]
    fn test_pin_and_unpin() {
        let mut f = Fixture::new(&[]);
        assert!(is_ok(&f.run(Command::Pin {
            app_id: "com.apple.Safari".into()
        })));
        assert!(is_ok(&f.run(Command::Pin {
            app_id: "com.apple.Safari".into()
        })));
        assert_eq!(f.pinned(), vec!["com.apple.Safari"]);

        assert!(is_ok(&f.run(Command::Unpin {
            app_id: "com.apple.Safari".into()
        })));
        assert!(f.pinned().is_empty());

        let result = f.run(Command::Unpin {
            app_id: "com.apple.Safari".into(),
        });
        assert!(matches!(result.response, Response::Error { .. }));
    }

    #[test]
    fn test_pin_rejects_empty_id() {
        let mut f = Fixture::new(&[]);
        let result = f.run(Command::Pin {
            app_id: "  ".into(),
        });
        assert!(matches!(result.response, Response::Error { .. }));
        assert!(f.pinned().is_empty());
    }

    #[test]
    fn test_toggle_pin() {
        let mut f = Fixture::new(&[]);
        f.run(Command::TogglePin { app_id: "a".into() });
        assert_eq!(f.pinned(), vec!["a"]);
        f.run(Command::TogglePin { app_id: "a".into() });
        assert!(f.pinned().is_empty());
    }

    #[test]
    fn test_move_and_list_pinned() {
        let mut f = Fixture::new(&[]);
        f.run(Command::SetPinned {
            app_ids: vec!["a".into(), "b".into(), "c".into(), "a".into()],
        });
        assert_eq!(f.pinned(), vec!["a", "b", "c"]);

        assert!(is_ok(&f.run(Command::MovePin {
            app_id: "c".into(),
            index: 0
        })));
        match f.run(Command::ListPinned).response {
            Response::Pinned { app_ids } => assert_eq!(app_ids, vec!["c", "a", "b"]),
            other => panic!("unexpected response: {:?}", other),
        }

        let result = f.run(Command::MovePin {
            app_id: "zzz".into(),
            index: 0,
        });
        assert!(matches!(result.response, Response::Error { .. }));
    }

    #[test]
    fn test_set_modifier_updates_shared_setting() {
        let mut f = Fixture::new(&[]);
        let tap_view = f.config.modifier.clone();
        f.run(Command::SetModifier {
            modifier: ModifierKey::Command,
        });
        assert_eq!(tap_view.get(), ModifierKey::Command);
    }

    #[test]
    fn test_list_apps_in_switcher_order() {
        let mut f = Fixture::new(&["a", "b", "c"]);
        f.config.pinned.pin("c".into());
        f.recency
            .record_at(&"b".into(), UNIX_EPOCH + Duration::from_secs(42));

        match f.run(Command::ListApps).response {
            Response::Apps { apps } => {
                let ids: Vec<&str> = apps.iter().map(|a| a.app_id.as_str()).collect();
                assert_eq!(ids, vec!["c", "b", "a"]);
                assert!(apps[0].is_pinned);
                assert_eq!(apps[1].last_activated, Some(42));
                assert_eq!(apps[2].last_activated, None);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_get_state() {
        let mut f = Fixture::new(&["a", "b"]);
        f.config.pinned.pin("gone".into());
        f.open();
        f.switcher.cycle_forward();

        match f.run(Command::GetState).response {
            Response::State { state } => {
                assert_eq!(state.modifier, ModifierKey::Option);
                assert_eq!(state.shortcut, "⌥Tab");
                assert!(state.session_open);
                assert_eq!(state.selected_index, Some(1));
                assert_eq!(state.candidate_count, 2);
                assert_eq!(state.pinned_count, 1);
                assert_eq!(state.running_count, 2);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_switch_to_running_app() {
        let mut f = Fixture::new(&["a", "b"]);
        let result = f.run(Command::SwitchTo { app_id: "b".into() });
        assert!(is_ok(&result));
        assert_eq!(
            result.effects,
            vec![
                Effect::Activate(create_test_app("b")),
                Effect::RecordActivation(AppId::new("b")),
            ]
        );
    }

    #[test]
    fn test_switch_to_cancels_open_session() {
        let mut f = Fixture::new(&["a", "b"]);
        f.open();
        let result = f.run(Command::SwitchTo { app_id: "a".into() });
        assert!(!f.switcher.is_open());
        assert_eq!(result.effects[0], Effect::Dismiss);
        assert_eq!(result.effects.len(), 3);
    }

    #[test]
    fn test_switch_to_unknown_app() {
        let mut f = Fixture::new(&["a"]);
        let result = f.run(Command::SwitchTo { app_id: "x".into() });
        assert!(matches!(result.response, Response::Error { .. }));
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_cancel_session() {
        let mut f = Fixture::new(&["a"]);
        assert!(f.run(Command::CancelSession).effects.is_empty());

        f.open();
        let result = f.run(Command::CancelSession);
        assert_eq!(result.effects, vec![Effect::Dismiss]);
        assert!(!f.switcher.is_open());
    }
}
