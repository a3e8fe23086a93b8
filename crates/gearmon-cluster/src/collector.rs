//! Per-host collection: one connection, two commands, one parsed report.

use std::time::Duration;

use async_trait::async_trait;

use gearmon_net::AdminConnection;
use gearmon_report::HostReport;
use gearmon_types::Endpoint;

use crate::error::PollError;

/// Produces one [`HostReport`] per endpoint.
///
/// The trait seam exists so the cluster fold can be exercised with canned
/// reports; production code uses [`AdminCollector`].
#[async_trait]
pub trait HostCollector: Send + Sync {
    async fn collect(&self, endpoint: &Endpoint) -> Result<HostReport, PollError>;
}

/// Collects over a live admin connection.
///
/// The connection is a scoped resource: opened, used for exactly two
/// sequential round-trips, and closed on every exit path before the
/// result is returned.
pub struct AdminCollector {
    marker: String,
    connect_timeout: Duration,
    io_timeout: Duration,
}

impl AdminCollector {
    pub fn new(marker: impl Into<String>, connect_timeout: Duration, io_timeout: Duration) -> Self {
        Self {
            marker: marker.into(),
            connect_timeout,
            io_timeout,
        }
    }

    async fn fetch_raw(conn: &mut AdminConnection) -> Result<(String, String), PollError> {
        let raw_status = conn.fetch_status().await?;
        let raw_workers = conn.fetch_workers().await?;
        Ok((raw_status, raw_workers))
    }
}

#[async_trait]
impl HostCollector for AdminCollector {
    async fn collect(&self, endpoint: &Endpoint) -> Result<HostReport, PollError> {
        let mut conn = AdminConnection::connect(endpoint.clone(), self.connect_timeout)
            .await?
            .with_io_timeout(self.io_timeout);

        let outcome = Self::fetch_raw(&mut conn).await;
        conn.close().await;
        let (raw_status, raw_workers) = outcome?;

        Ok(HostReport::parse(&raw_status, &raw_workers, &self.marker))
    }
}
