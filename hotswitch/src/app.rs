mod channels;
mod command;
mod context;
mod effects;

use std::cell::RefCell;

use anyhow::{bail, Context as _, Result};
use core_foundation::runloop::CFRunLoop;
use dispatch::Queue;
use objc2_foundation::MainThreadMarker;
use tokio::sync::mpsc;

use crate::core::{Config, KeyMap, RegistryEvent, SessionRequest};
use crate::event_emitter::EventEmitter;
use crate::macos::{self, SwitcherTap};
use crate::pid::PidFile;
use crate::platform::{ApplicationRegistry, MacOSApplicationRegistry};
use hotswitch_ipc::{Command, Response};

use channels::{create_channels, SnapshotRequest};
use context::Context;

type MainContext = Context<MacOSApplicationRegistry, EventEmitter>;

thread_local! {
    // Only ever touched from blocks running on the main dispatch queue.
    static CONTEXT: RefCell<Option<MainContext>> = const { RefCell::new(None) };
}

fn with_context<T>(f: impl FnOnce(&mut MainContext) -> T) -> Option<T> {
    CONTEXT.with(|cell| match cell.try_borrow_mut() {
        Ok(mut guard) => guard.as_mut().map(f),
        Err(_) => {
            tracing::error!("Main context is already borrowed, dropping work item");
            None
        }
    })
}

/// Marshal a classifier request onto the main queue. Requests are never
/// coalesced; they run in the order the tap produced them.
fn post_session_request(request: SessionRequest) {
    Queue::main().exec_async(move || {
        with_context(|ctx| ctx.handle_session_request(request));
    });
}

fn post_registry_event(event: RegistryEvent) {
    Queue::main().exec_async(move || {
        with_context(|ctx| ctx.handle_registry_event(event));
    });
}

pub(crate) fn post_command(cmd: Command, resp_tx: mpsc::Sender<Response>) {
    Queue::main().exec_async(move || {
        tracing::debug!("Received IPC command: {:?}", cmd);
        let response = with_context(|ctx| ctx.handle_command(&cmd)).unwrap_or(Response::Error {
            message: "Daemon is not ready".to_string(),
        });
        let _ = resp_tx.blocking_send(response);

        // Stop after the response is on its way
        if matches!(cmd, Command::Quit) {
            tracing::info!("Quit requested");
            CFRunLoop::get_main().stop();
        }
    });
}

pub(crate) fn post_snapshot_request(resp_tx: SnapshotRequest) {
    Queue::main().exec_async(move || {
        if let Some(snapshot) = with_context(|ctx| ctx.snapshot()) {
            let _ = resp_tx.send(snapshot);
        }
    });
}

pub struct App {}

impl App {
    pub fn run() -> Result<()> {
        if !macos::is_trusted() {
            tracing::warn!("Accessibility permission not granted, requesting...");
            macos::is_trusted_with_prompt();
            bail!("Please grant Accessibility permission and restart");
        }

        let _pid_file = PidFile::acquire()?;

        let mtm =
            MainThreadMarker::new().context("hotswitch must be started on the main thread")?;

        let (tokio_channels, session_event_tx) = create_channels();

        let config = Config::new();
        let shortcut = config.modifier.get().shortcut_description();
        let registry = MacOSApplicationRegistry::new(mtm);
        let _subscription = registry.subscribe(Box::new(post_registry_event));

        let modifier = config.modifier.clone();
        let emitter = EventEmitter::new(session_event_tx);
        let context = Context::new(registry, emitter, config);

        let mut tap = SwitcherTap::new(
            modifier,
            context.session_phase(),
            KeyMap::default(),
            post_session_request,
        );

        CONTEXT.with(|cell| {
            *cell.borrow_mut() = Some(context);
        });

        if let Err(e) = tap.start() {
            tracing::error!("Failed to start switcher event tap: {}", e);
            bail!("Failed to start switcher event tap: {}", e);
        }

        std::thread::Builder::new()
            .name("hotswitch-ipc".to_string())
            .spawn(move || match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(channels::run_async(tokio_channels)),
                Err(e) => tracing::error!("Failed to start tokio runtime: {}", e),
            })
            .context("Failed to spawn IPC thread")?;

        tracing::info!("hotswitch ready, shortcut {}", shortcut);
        tracing::info!("Entering CFRunLoop");
        CFRunLoop::run_current();
        tracing::info!("CFRunLoop exited");

        tap.stop();
        CONTEXT.with(|cell| cell.borrow_mut().take());
        Ok(())
    }
}
