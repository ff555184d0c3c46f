use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;

use super::SOCKET_PATH;
use hotswitch_ipc::{Command, Response};

pub struct IpcServer {
    socket_path: PathBuf,
    listener: UnixListener,
    cmd_tx: mpsc::Sender<(Command, mpsc::Sender<Response>)>,
}

impl IpcServer {
    /// Bind the command socket, replacing a stale socket file.
    pub fn bind(cmd_tx: mpsc::Sender<(Command, mpsc::Sender<Response>)>) -> Result<Self> {
        Self::bind_at(Path::new(SOCKET_PATH), cmd_tx)
    }

    pub fn bind_at(
        socket_path: &Path,
        cmd_tx: mpsc::Sender<(Command, mpsc::Sender<Response>)>,
    ) -> Result<Self> {
        if socket_path.exists() {
            std::fs::remove_file(socket_path)?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind {:?}", socket_path))?;
        tracing::info!("IPC server listening on {:?}", socket_path);

        Ok(Self {
            socket_path: socket_path.to_path_buf(),
            listener,
            cmd_tx,
        })
    }

    pub async fn run(&self) -> Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, _addr)) => {
                    let cmd_tx = self.cmd_tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_connection(stream, cmd_tx).await {
                            tracing::error!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Accept error: {}", e);
                }
            }
        }
    }

    async fn handle_connection(
        stream: UnixStream,
        cmd_tx: mpsc::Sender<(Command, mpsc::Sender<Response>)>,
    ) -> Result<()> {
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut line = String::new();

        loop {
            line.clear();
            let n = reader.read_line(&mut line).await?;
            if n == 0 {
                break; // EOF
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<Command>(line) {
                Ok(cmd) => {
                    tracing::debug!("Received command: {:?}", cmd);
                    let (resp_tx, mut resp_rx) = mpsc::channel(1);

                    if cmd_tx.send((cmd, resp_tx)).await.is_err() {
                        Response::Error {
                            message: "Internal error: command channel closed".to_string(),
                        }
                    } else {
                        resp_rx.recv().await.unwrap_or(Response::Error {
                            message: "Internal error: no response".to_string(),
                        })
                    }
                }
                Err(e) => Response::Error {
                    message: format!("Invalid command: {}", e),
                },
            };

            let response_json = serde_json::to_string(&response)?;
            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        Ok(())
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}
