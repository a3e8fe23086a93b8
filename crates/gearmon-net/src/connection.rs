//! The admin protocol connection.
//!
//! One [`AdminConnection`] owns one TCP stream to one gearmand server and
//! is used for plain request/response round-trips: write `COMMAND\n`, read
//! record lines until the `.` sentinel line, hand back the raw blob.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

use gearmon_types::Endpoint;

use crate::error::NetError;

/// Admin command that lists per-function queue counters.
pub const CMD_STATUS: &str = "STATUS";
/// Admin command that lists registered workers.
pub const CMD_WORKERS: &str = "WORKERS";

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
/// Default per-read deadline on an open connection.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(10);

/// gearmand emits whole newline-terminated lines, but a single read may
/// return a truncated chunk; lines are reassembled through a small buffer.
const READ_CHUNK: usize = 128;

/// A client connection speaking the gearmand admin dialect.
///
/// The connection is opened once, used for sequential command/response
/// round-trips, and released by [`AdminConnection::close`] (idempotent) or
/// on drop. Any protocol-level failure invalidates the connection; further
/// commands return [`NetError::NotConnected`].
pub struct AdminConnection {
    endpoint: Endpoint,
    stream: Option<BufReader<TcpStream>>,
    io_timeout: Duration,
}

impl AdminConnection {
    /// Open a TCP connection to the endpoint, failing if the socket cannot
    /// be established within `connect_timeout`. No retries.
    pub async fn connect(
        endpoint: Endpoint,
        connect_timeout: Duration,
    ) -> Result<Self, NetError> {
        tracing::debug!(endpoint = %endpoint, "connecting to gearmand");
        let connect_fut = TcpStream::connect((endpoint.host.as_str(), endpoint.port));
        let stream = match timeout(connect_timeout, connect_fut).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(NetError::Connect {
                    endpoint: endpoint.to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(NetError::ConnectTimeout {
                    endpoint: endpoint.to_string(),
                    timeout_secs: connect_timeout.as_secs(),
                })
            }
        };

        Ok(Self {
            endpoint,
            stream: Some(BufReader::with_capacity(READ_CHUNK, stream)),
            io_timeout: DEFAULT_IO_TIMEOUT,
        })
    }

    /// Override the per-read deadline.
    pub fn with_io_timeout(mut self, io_timeout: Duration) -> Self {
        self.io_timeout = io_timeout;
        self
    }

    /// The endpoint this connection talks to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Whether the connection is still usable.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Send one command and read the response blob.
    ///
    /// Record lines are returned concatenated in arrival order, newlines
    /// included; the terminating `.` line is excluded. A command the server
    /// does not recognize yields an `ERR unknown_command ...` line, which is
    /// returned as ordinary response text.
    pub async fn send_command(&mut self, command: &str) -> Result<String, NetError> {
        match self.exchange(command).await {
            Ok(blob) => Ok(blob),
            Err(err) => {
                // The stream position is unknown after a failed exchange.
                self.stream = None;
                Err(err)
            }
        }
    }

    /// Fetch the raw `STATUS` listing.
    pub async fn fetch_status(&mut self) -> Result<String, NetError> {
        self.send_command(CMD_STATUS).await
    }

    /// Fetch the raw `WORKERS` listing.
    pub async fn fetch_workers(&mut self) -> Result<String, NetError> {
        self.send_command(CMD_WORKERS).await
    }

    /// Release the connection. Idempotent.
    pub async fn close(&mut self) {
        if let Some(reader) = self.stream.take() {
            let mut stream = reader.into_inner();
            let _ = stream.shutdown().await;
            tracing::debug!(endpoint = %self.endpoint, "connection closed");
        }
    }

    async fn exchange(&mut self, command: &str) -> Result<String, NetError> {
        let reader = self.stream.as_mut().ok_or(NetError::NotConnected)?;

        reader.get_mut().write_all(command.as_bytes()).await?;
        reader.get_mut().write_all(b"\n").await?;
        reader.get_mut().flush().await?;

        let mut blob = String::new();
        let mut line = String::new();
        loop {
            line.clear();
            let n = timeout(self.io_timeout, reader.read_line(&mut line))
                .await
                .map_err(|_| NetError::ReadTimeout)??;
            if n == 0 {
                return Err(NetError::ConnectionClosed);
            }
            // The sentinel is a line that is exactly ".": a dot inside a
            // record field does not terminate the response.
            if line == ".\n" {
                break;
            }
            blob.push_str(&line);
        }
        Ok(blob)
    }
}

impl std::fmt::Debug for AdminConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConnection")
            .field("endpoint", &self.endpoint)
            .field("open", &self.is_open())
            .finish()
    }
}
