use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;

use anyhow::Result;
use tokio::sync::{mpsc, oneshot};

use crate::ipc::{EventBroadcaster, EventServer, IpcServer};
use hotswitch_ipc::{Command, Response, SessionEvent};

pub type IpcCommandWithResponse = (Command, mpsc::Sender<Response>);

pub type SnapshotRequest = oneshot::Sender<SessionEvent>;

pub struct TokioChannels {
    session_event_rx: std_mpsc::Receiver<SessionEvent>,
}

/// Returns the tokio side and the sender the main-thread event emitter
/// writes session events to.
pub fn create_channels() -> (TokioChannels, std_mpsc::Sender<SessionEvent>) {
    // Channel: session events (main thread -> tokio)
    let (session_event_tx, session_event_rx) = std_mpsc::channel::<SessionEvent>();
    (TokioChannels { session_event_rx }, session_event_tx)
}

pub async fn run_async(channels: TokioChannels) {
    tracing::info!("Tokio runtime started");
    if let Err(e) = serve(channels).await {
        tracing::error!("IPC setup failed: {}", e);
    }
    tracing::info!("Tokio runtime exiting");
}

async fn serve(channels: TokioChannels) -> Result<()> {
    let TokioChannels { session_event_rx } = channels;

    // Channel for IPC server (tokio internal)
    let (ipc_server_tx, mut ipc_rx) = mpsc::channel::<IpcCommandWithResponse>(256);

    // Channel: snapshot requests from event subscribers
    let (snapshot_request_tx, mut snapshot_request_rx) = mpsc::channel::<SnapshotRequest>(16);

    let broadcaster = EventBroadcaster::new(256);

    let ipc_server = IpcServer::bind(ipc_server_tx)?;
    tokio::spawn(async move {
        if let Err(e) = ipc_server.run().await {
            tracing::error!("IPC server error: {}", e);
        }
    });

    let event_server = EventServer::bind(broadcaster.subscribe(), snapshot_request_tx)?;
    tokio::spawn(async move {
        if let Err(e) = event_server.run().await {
            tracing::error!("Event server error: {}", e);
        }
    });

    // Forward session events from the main thread to the broadcast channel
    let forwarder = broadcaster.clone();
    std::thread::Builder::new()
        .name("hotswitch-events".to_string())
        .spawn(move || {
            while let Ok(event) = session_event_rx.recv() {
                forwarder.send(event);
            }
        })?;

    // Both sockets accept connections now, so the script can talk to us
    if let Some(path) = init_script_path() {
        tokio::spawn(run_init_script(path));
    }

    loop {
        tokio::select! {
            Some((cmd, resp_tx)) = ipc_rx.recv() => {
                super::post_command(cmd, resp_tx);
            }
            Some(snapshot_req) = snapshot_request_rx.recv() => {
                super::post_snapshot_request(snapshot_req);
            }
            else => break,
        }
    }

    Ok(())
}

fn init_script_path() -> Option<PathBuf> {
    let path = dirs::home_dir()?.join(".config/hotswitch/init");
    path.is_file().then_some(path)
}

async fn run_init_script(path: PathBuf) {
    tracing::info!("Running init script {:?}", path);
    let status = tokio::process::Command::new("sh")
        .arg(&path)
        .stdin(std::process::Stdio::null())
        .status()
        .await;
    match status {
        Ok(status) if status.success() => tracing::info!("Init script finished"),
        Ok(status) => tracing::warn!("Init script exited with {}", status),
        Err(e) => tracing::error!("Failed to run init script {:?}: {}", path, e),
    }
}
