//! Parses raw gearmand admin listings into per-host counters.
//!
//! One host poll yields two text blobs: the `WORKERS` listing (one line per
//! registered worker) and the `STATUS` listing (one tab-separated line per
//! function). Parsing is a two-step pipeline with an explicit handoff:
//!
//! 1. [`WorkerPass`] walks the worker listing and sizes the two
//!    classification buckets (`total`, `available`).
//! 2. [`WorkerPass::apply_status`] consumes the pass by value and walks the
//!    status listing, recording per-function [`JobStatus`] entries and
//!    attributing each function's running/queued counts to its bucket.
//!
//! Ordering matters: the job pass depletes `available` slots the worker
//! pass counted. Taking the pass by exclusive ownership makes that
//! dependency a compile-time fact instead of a call-order convention.
//!
//! Parsing is fail-soft throughout: a malformed line is skipped, logged,
//! and recorded on the report; it never aborts the host's parse.

pub mod error;
pub mod report;

pub use error::ParseError;
pub use report::{HostReport, WorkerPass};
