//! Core data model for the gearmon cluster queue monitor.
//!
//! Defines the endpoint addressing type and the counter records produced by
//! the per-host parser and the cluster aggregator. Everything here is plain
//! data: no I/O, no parsing of wire text.

pub mod endpoint;
pub mod status;

pub use endpoint::{Endpoint, EndpointParseError, DEFAULT_PORT};
pub use status::{JobMap, JobStatus, WorkerBucket, WorkerClass, WorkerTable};
