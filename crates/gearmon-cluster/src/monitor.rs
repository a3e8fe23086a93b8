//! Drives a full cluster poll.

use std::sync::Arc;
use std::time::Duration;

use gearmon_net::connection::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_IO_TIMEOUT};
use gearmon_types::{Endpoint, EndpointParseError};

use crate::collector::{AdminCollector, HostCollector};
use crate::snapshot::{aggregate, ClusterSnapshot, HostOutcome};
use crate::transform::JobTransform;

/// Configuration for a cluster monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Endpoints to poll, in order.
    pub endpoints: Vec<Endpoint>,
    /// Substring that classifies a function into the marked bucket.
    pub marker: String,
    /// Timeout for establishing each host connection.
    pub connect_timeout: Duration,
    /// Per-read deadline on open connections.
    pub io_timeout: Duration,
}

impl MonitorConfig {
    pub fn new(endpoints: Vec<Endpoint>, marker: impl Into<String>) -> Self {
        Self {
            endpoints,
            marker: marker.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }

    /// Build a config from `host[:port]` strings as supplied by the
    /// enclosing tool.
    pub fn from_host_strings<S: AsRef<str>>(
        hosts: &[S],
        marker: impl Into<String>,
    ) -> Result<Self, EndpointParseError> {
        let endpoints = hosts
            .iter()
            .map(|h| h.as_ref().parse())
            .collect::<Result<Vec<Endpoint>, _>>()?;
        Ok(Self::new(endpoints, marker))
    }
}

/// Polls every configured endpoint and folds the results.
///
/// Hosts are polled sequentially in list order; each host's failure is
/// isolated, logged, and recorded on the snapshot without affecting the
/// others.
pub struct ClusterMonitor {
    endpoints: Vec<Endpoint>,
    collector: Arc<dyn HostCollector>,
    transform: Option<Arc<dyn JobTransform>>,
}

impl ClusterMonitor {
    /// Create a monitor that collects over live admin connections.
    pub fn new(config: MonitorConfig) -> Self {
        let collector = Arc::new(AdminCollector::new(
            config.marker.clone(),
            config.connect_timeout,
            config.io_timeout,
        ));
        Self {
            endpoints: config.endpoints,
            collector,
            transform: None,
        }
    }

    /// Create a monitor with a custom collector (used by tests).
    pub fn with_collector(endpoints: Vec<Endpoint>, collector: Arc<dyn HostCollector>) -> Self {
        Self {
            endpoints,
            collector,
            transform: None,
        }
    }

    /// Install the per-host job map transform.
    pub fn with_transform(mut self, transform: Arc<dyn JobTransform>) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Poll every endpoint once and aggregate.
    pub async fn poll(&self) -> ClusterSnapshot {
        let mut outcomes = Vec::with_capacity(self.endpoints.len());

        for endpoint in &self.endpoints {
            let result = match self.collector.collect(endpoint).await {
                Ok(mut report) => {
                    tracing::debug!(
                        endpoint = %endpoint,
                        functions = report.jobs.len(),
                        skipped = report.skipped.len(),
                        "host polled"
                    );
                    if let Some(transform) = &self.transform {
                        report.jobs = transform.transform(report.jobs);
                    }
                    Ok(report)
                }
                Err(err) => {
                    tracing::warn!(endpoint = %endpoint, %err, "host poll failed, excluding from aggregates");
                    Err(err)
                }
            };
            outcomes.push(HostOutcome {
                endpoint: endpoint.clone(),
                result,
            });
        }

        aggregate(outcomes)
    }
}
