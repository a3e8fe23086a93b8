//! Polls a fleet of gearmand servers and folds per-host reports into
//! cluster-wide totals.
//!
//! [`ClusterMonitor`] drives the whole pipeline: per endpoint it runs the
//! client + parser round-trip through a [`HostCollector`], applies the
//! optional [`JobTransform`] to the host's job map, and collects each
//! host's outcome (report or failure) into a list. The pure
//! [`aggregate`] fold then combines the successful reports into a
//! [`ClusterSnapshot`] with metric-specific rules: job `total`/`running`
//! sum across hosts while job `available` takes the max; worker `total`
//! takes the max while `running`/`queued` sum, with worker `available`
//! recomputed as `total - running` in a final pass.
//!
//! A host that cannot be reached is excluded from every aggregate and
//! listed under [`ClusterSnapshot::failures`]; partial cluster visibility
//! beats total failure.

pub mod collector;
pub mod error;
pub mod monitor;
pub mod snapshot;
pub mod transform;

pub use collector::{AdminCollector, HostCollector};
pub use error::PollError;
pub use monitor::{ClusterMonitor, MonitorConfig};
pub use snapshot::{aggregate, ClusterSnapshot, HostFailure, HostOutcome};
pub use transform::JobTransform;
