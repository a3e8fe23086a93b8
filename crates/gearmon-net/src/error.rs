use thiserror::Error;

/// Errors from the admin protocol client.
#[derive(Debug, Error)]
pub enum NetError {
    /// The TCP connection could not be established.
    #[error("connect to {endpoint} failed: {source}")]
    Connect {
        endpoint: String,
        source: std::io::Error,
    },

    /// The connect attempt did not complete within the configured timeout.
    #[error("connect to {endpoint} timed out after {timeout_secs}s")]
    ConnectTimeout { endpoint: String, timeout_secs: u64 },

    /// A command was issued on a connection that is not open.
    #[error("connection not open")]
    NotConnected,

    /// The remote closed the stream before the sentinel line arrived.
    #[error("connection closed mid-response")]
    ConnectionClosed,

    /// A read did not complete within the I/O deadline.
    #[error("read timed out")]
    ReadTimeout,

    /// An I/O error on the open stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_connect_timeout() {
        let err = NetError::ConnectTimeout {
            endpoint: "queue01:4730".to_string(),
            timeout_secs: 3,
        };
        assert_eq!(err.to_string(), "connect to queue01:4730 timed out after 3s");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broke");
        let err: NetError = io_err.into();
        assert!(matches!(err, NetError::Io(_)));
        assert!(err.to_string().contains("pipe broke"));
    }
}
