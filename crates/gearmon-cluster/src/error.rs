use gearmon_net::NetError;
use thiserror::Error;

/// Why one host contributed nothing to a cluster poll.
///
/// Connection and protocol failures are handled identically at the
/// aggregation boundary: the host is skipped, the poll continues.
#[derive(Debug, Error)]
pub enum PollError {
    /// The admin connection failed to open or broke mid-exchange.
    #[error(transparent)]
    Net(#[from] NetError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_error_is_transparent() {
        let err: PollError = NetError::NotConnected.into();
        assert_eq!(err.to_string(), "connection not open");
    }
}
