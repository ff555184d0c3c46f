use crate::core::{
    Config, RecencyTracker, RegistryEvent, SessionRequest, SharedSessionPhase, Switcher,
};
use crate::event_emitter::create_snapshot;
use crate::platform::{ApplicationRegistry, SessionHost};
use hotswitch_ipc::{Command, Response, SessionEvent};

use super::command::process_command;
use super::effects::execute_effects;

/// Everything owned by the UI execution context.
/// Session requests, registry notifications and IPC commands all funnel
/// through here, one at a time, in arrival order.
pub struct Context<R: ApplicationRegistry, H: SessionHost> {
    registry: R,
    host: H,
    config: Config,
    recency: RecencyTracker,
    switcher: Switcher,
}

impl<R: ApplicationRegistry, H: SessionHost> Context<R, H> {
    pub fn new(registry: R, host: H, config: Config) -> Self {
        Self {
            registry,
            host,
            config,
            recency: RecencyTracker::new(),
            switcher: Switcher::new(),
        }
    }

    /// Phase handle for the input classifier. The switcher keeps it current,
    /// including when IPC commands close the session.
    pub fn session_phase(&self) -> SharedSessionPhase {
        self.switcher.phase()
    }

    /// Apply a request from the input classifier.
    pub fn handle_session_request(&mut self, request: SessionRequest) {
        tracing::debug!("Session request: {:?}", request);
        let effects = self
            .switcher
            .handle(request, &self.registry, &self.config, &self.recency);
        execute_effects(effects, &self.registry, &self.host, &mut self.recency);
    }

    /// Keep the recency tracker in step with the workspace.
    pub fn handle_registry_event(&mut self, event: RegistryEvent) {
        match event {
            RegistryEvent::Launched(app) | RegistryEvent::Activated(app) => {
                self.recency.record(&app.id);
            }
            RegistryEvent::Terminated(id) => {
                self.recency.remove(&id);
            }
        }
    }

    /// Process an IPC command and execute its effects.
    pub fn handle_command(&mut self, cmd: &Command) -> Response {
        let result = process_command(
            cmd,
            &mut self.switcher,
            &mut self.config,
            &self.recency,
            &self.registry,
        );
        execute_effects(
            result.effects,
            &self.registry,
            &self.host,
            &mut self.recency,
        );
        result.response
    }

    pub fn snapshot(&self) -> SessionEvent {
        create_snapshot(self.switcher.session())
    }
}
