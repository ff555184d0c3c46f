use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, mpsc, oneshot};

use super::EVENT_SOCKET_PATH;
use hotswitch_ipc::{SessionEvent, SubscribeRequest};

/// Streams session events to out-of-process renderers.
pub struct EventServer {
    socket_path: PathBuf,
    listener: UnixListener,
    event_rx: broadcast::Receiver<SessionEvent>,
    snapshot_tx: mpsc::Sender<oneshot::Sender<SessionEvent>>,
}

impl EventServer {
    pub fn bind(
        event_rx: broadcast::Receiver<SessionEvent>,
        snapshot_tx: mpsc::Sender<oneshot::Sender<SessionEvent>>,
    ) -> Result<Self> {
        Self::bind_at(Path::new(EVENT_SOCKET_PATH), event_rx, snapshot_tx)
    }

    pub fn bind_at(
        socket_path: &Path,
        event_rx: broadcast::Receiver<SessionEvent>,
        snapshot_tx: mpsc::Sender<oneshot::Sender<SessionEvent>>,
    ) -> Result<Self> {
        if socket_path.exists() {
            std::fs::remove_file(socket_path)?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind {:?}", socket_path))?;
        tracing::info!("Event server listening on {:?}", socket_path);

        Ok(Self {
            socket_path: socket_path.to_path_buf(),
            listener,
            event_rx,
            snapshot_tx,
        })
    }

    pub async fn run(self) -> Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, _addr)) => {
                    let event_rx = self.event_rx.resubscribe();
                    let snapshot_tx = self.snapshot_tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_connection(stream, event_rx, snapshot_tx).await
                        {
                            // Only log if it's not a normal disconnection
                            if !e.to_string().contains("connection reset")
                                && !e.to_string().contains("Broken pipe")
                            {
                                tracing::debug!("Event subscriber disconnected: {}", e);
                            }
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Event server accept error: {}", e);
                }
            }
        }
    }

    async fn handle_connection(
        stream: UnixStream,
        mut event_rx: broadcast::Receiver<SessionEvent>,
        snapshot_tx: mpsc::Sender<oneshot::Sender<SessionEvent>>,
    ) -> Result<()> {
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut line = String::new();

        // Read subscribe request
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            return Ok(()); // EOF
        }

        let request: SubscribeRequest = serde_json::from_str(line.trim()).unwrap_or_default();
        tracing::debug!("New event subscriber (snapshot: {})", request.snapshot);

        if request.snapshot {
            let (resp_tx, resp_rx) = oneshot::channel();
            if snapshot_tx.send(resp_tx).await.is_ok() {
                if let Ok(snapshot) = resp_rx.await {
                    write_event(&mut writer, &snapshot).await?;
                }
            }
        }

        loop {
            match event_rx.recv().await {
                Ok(event) => write_event(&mut writer, &event).await?,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event subscriber lagged by {} messages", n);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    break;
                }
            }
        }

        Ok(())
    }
}

async fn write_event<W: AsyncWrite + Unpin>(writer: &mut W, event: &SessionEvent) -> Result<()> {
    let json = serde_json::to_string(event)?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

impl Drop for EventServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

/// Event broadcaster that holds the sender side of the broadcast channel
#[derive(Clone)]
pub struct EventBroadcaster {
    event_tx: broadcast::Sender<SessionEvent>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(capacity);
        Self { event_tx }
    }

    /// Get a receiver for the event server
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Send an event to all subscribers
    pub fn send(&self, event: SessionEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.event_tx.send(event);
    }
}
