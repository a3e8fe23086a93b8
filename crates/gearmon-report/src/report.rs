//! The two-pass host parser.

use gearmon_types::{JobMap, JobStatus, WorkerClass, WorkerTable};

use crate::error::ParseError;

/// Literal separator between peer address and function list in a
/// `WORKERS` record.
const WORKER_SEPARATOR: &str = " : ";

/// Output of the worker-registration pass over a `WORKERS` listing.
///
/// Holds the two classification buckets with `total` and `available`
/// sized from worker registrations. Consumed by value by
/// [`WorkerPass::apply_status`], which is the only way to proceed to the
/// job pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerPass {
    workers: WorkerTable,
}

impl WorkerPass {
    /// Walk the raw `WORKERS` listing.
    ///
    /// Each well-formed line is `peer : functionList`; a worker with a
    /// non-empty function list contributes one `total` and one `available`
    /// slot to the bucket its function list classifies into. Lines without
    /// the separator are short or garbled wire output and are skipped
    /// silently.
    pub fn parse(raw_workers: &str, marker: &str) -> Self {
        let mut workers = WorkerTable::default();
        for line in raw_workers.lines() {
            let Some((_peer, functions)) = line.split_once(WORKER_SEPARATOR) else {
                continue;
            };
            if functions.is_empty() {
                continue;
            }
            let bucket = workers.get_mut(WorkerClass::classify(functions, marker));
            bucket.total += 1;
            bucket.available += 1;
        }
        Self { workers }
    }

    /// The buckets as sized by the worker pass.
    pub fn workers(&self) -> &WorkerTable {
        &self.workers
    }

    /// Walk the raw `STATUS` listing and produce the finished report.
    ///
    /// Each well-formed line is `function\ttotal\trunning\tavailable`. Per
    /// line: a [`JobStatus`] entry is recorded verbatim, and the function's
    /// bucket is updated (`running += running`, `available -= running`,
    /// `queued += total - running`). `available` can go negative when a
    /// worker deregistered between the two admin commands; the value is
    /// kept as observed and a warning is logged.
    ///
    /// Malformed numeric fields skip the line (collected in
    /// [`HostReport::skipped`]); an empty function name skips silently.
    pub fn apply_status(self, raw_status: &str, marker: &str) -> HostReport {
        let mut workers = self.workers;
        let mut jobs = JobMap::new();
        let mut skipped = Vec::new();
        let mut warned_negative = false;

        for (idx, line) in raw_status.lines().enumerate() {
            let line_no = idx + 1;
            let mut fields = line.splitn(4, '\t');
            let name = fields.next().unwrap_or("");
            if name.is_empty() {
                continue;
            }

            let parsed = parse_count(fields.next(), "total", line_no)
                .and_then(|total| {
                    parse_count(fields.next(), "running", line_no).map(|running| (total, running))
                })
                .and_then(|(total, running)| {
                    parse_count(fields.next(), "available", line_no)
                        .map(|available| (total, running, available))
                });
            let (total, running, available) = match parsed {
                Ok(counts) => counts,
                Err(err) => {
                    tracing::warn!(line = %line, %err, "skipping malformed status line");
                    skipped.push(err);
                    continue;
                }
            };

            jobs.insert(name.to_string(), JobStatus::new(total, running, available));

            let class = WorkerClass::classify(name, marker);
            let bucket = workers.get_mut(class);
            bucket.running += running;
            bucket.available -= running;
            bucket.queued += total - running;

            if bucket.available < 0 && !warned_negative {
                tracing::warn!(
                    %class,
                    available = bucket.available,
                    "worker registrations undercount running jobs"
                );
                warned_negative = true;
            }
        }

        HostReport {
            jobs,
            workers,
            skipped,
        }
    }
}

/// Parsed view of one host: per-function job counters plus the two worker
/// buckets, frozen at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostReport {
    /// Per-function queue counters, keyed by function name.
    pub jobs: JobMap,
    /// The two classification buckets after both passes.
    pub workers: WorkerTable,
    /// Status lines dropped by fail-soft parsing.
    pub skipped: Vec<ParseError>,
}

impl HostReport {
    /// Run both passes over the raw listings from one host.
    pub fn parse(raw_status: &str, raw_workers: &str, marker: &str) -> Self {
        WorkerPass::parse(raw_workers, marker).apply_status(raw_status, marker)
    }
}

fn parse_count(
    field: Option<&str>,
    name: &'static str,
    line_no: usize,
) -> Result<i64, ParseError> {
    let raw = field.ok_or(ParseError::MissingField {
        line_no,
        field: name,
    })?;
    let trimmed = raw.trim();
    trimmed.parse().map_err(|_| ParseError::InvalidCount {
        line_no,
        field: name,
        value: trimmed.to_string(),
    })
}
