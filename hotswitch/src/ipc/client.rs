use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;

use anyhow::{Context, Result};

use super::{EVENT_SOCKET_PATH, SOCKET_PATH};
use hotswitch_ipc::{Command, Response, SessionEvent, SubscribeRequest};

pub struct IpcClient {
    stream: UnixStream,
}

impl IpcClient {
    pub fn connect() -> Result<Self> {
        let stream =
            UnixStream::connect(SOCKET_PATH).context("Failed to connect to hotswitch daemon")?;
        Ok(Self { stream })
    }

    pub fn send(&mut self, cmd: &Command) -> Result<Response> {
        let json = serde_json::to_string(cmd)?;
        writeln!(self.stream, "{}", json)?;
        self.stream.flush()?;

        let mut reader = BufReader::new(&self.stream);
        let mut line = String::new();
        reader.read_line(&mut line)?;
        if line.is_empty() {
            anyhow::bail!("Daemon closed the connection");
        }

        let response: Response = serde_json::from_str(&line)?;
        Ok(response)
    }
}

/// Client for subscribing to session events
pub struct EventClient {
    reader: BufReader<UnixStream>,
}

impl EventClient {
    pub fn connect(request: &SubscribeRequest) -> Result<Self> {
        let mut stream = UnixStream::connect(EVENT_SOCKET_PATH)
            .context("Failed to connect to hotswitch event server")?;

        let json = serde_json::to_string(request)?;
        writeln!(stream, "{}", json)?;
        stream.flush()?;

        let reader = BufReader::new(stream);
        Ok(Self { reader })
    }

    /// Read the next event (blocking). `None` once the daemon hangs up.
    pub fn next_event(&mut self) -> Result<Option<SessionEvent>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let event: SessionEvent = serde_json::from_str(&line)?;
        Ok(Some(event))
    }
}

/// Subscribe and print events to stdout as JSON lines
pub fn subscribe_and_print(snapshot: bool) -> Result<()> {
    let request = SubscribeRequest { snapshot };
    let mut client = EventClient::connect(&request)?;

    while let Some(event) = client.next_event()? {
        let json = serde_json::to_string(&event)?;
        println!("{}", json);
    }

    Ok(())
}
