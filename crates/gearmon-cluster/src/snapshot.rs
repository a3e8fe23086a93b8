//! The cluster-wide fold and its result snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use gearmon_report::HostReport;
use gearmon_types::{Endpoint, JobMap, WorkerClass, WorkerTable};

use crate::error::PollError;

/// What one host contributed to a poll: its parsed report, or the reason
/// it was excluded.
#[derive(Debug)]
pub struct HostOutcome {
    pub endpoint: Endpoint,
    pub result: Result<HostReport, PollError>,
}

/// A host that was excluded from the poll, with the rendered reason.
#[derive(Debug, Clone, Serialize)]
pub struct HostFailure {
    pub endpoint: String,
    pub reason: String,
}

/// Point-in-time view of the whole fleet, valid as of construction.
///
/// Re-polling means building a new snapshot; nothing here refreshes.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterSnapshot {
    /// Cluster-wide per-function counters.
    pub jobs: JobMap,
    /// Cluster-wide worker buckets.
    pub workers: WorkerTable,
    /// Per-server job maps for drill-down, keyed by `host:port`.
    pub server_jobs: BTreeMap<String, JobMap>,
    /// Per-server worker tables for drill-down, keyed by `host:port`.
    pub server_workers: BTreeMap<String, WorkerTable>,
    /// Hosts excluded from this poll.
    pub failures: Vec<HostFailure>,
    /// When the poll ran.
    pub polled_at: DateTime<Utc>,
}

/// Fold per-host outcomes into a snapshot.
///
/// Combination rules per metric:
/// - job `total` and `running` sum across hosts; job `available` takes
///   the max (capable-worker counts overlap between servers).
/// - worker `total` takes the max while `running` and `queued` sum; this
///   deliberately breaks the per-bucket identity mid-fold, so `available`
///   is recomputed as `total - running` in a final pass over every class.
///
/// Failed hosts contribute nothing anywhere except [`ClusterSnapshot::failures`].
/// The fold is order-independent: sum and max are commutative.
pub fn aggregate(outcomes: Vec<HostOutcome>) -> ClusterSnapshot {
    let mut jobs = JobMap::new();
    let mut workers = WorkerTable::default();
    let mut server_jobs = BTreeMap::new();
    let mut server_workers = BTreeMap::new();
    let mut failures = Vec::new();

    for outcome in outcomes {
        let key = outcome.endpoint.to_string();
        let report = match outcome.result {
            Ok(report) => report,
            Err(err) => {
                failures.push(HostFailure {
                    endpoint: key,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        for (name, status) in &report.jobs {
            let entry = jobs.entry(name.clone()).or_default();
            entry.total += status.total;
            entry.running += status.running;
            entry.available = entry.available.max(status.available);
        }

        for (class, bucket) in report.workers.iter() {
            let agg = workers.get_mut(class);
            agg.total = agg.total.max(bucket.total);
            agg.running += bucket.running;
            agg.queued += bucket.queued;
        }

        server_jobs.insert(key.clone(), report.jobs);
        server_workers.insert(key, report.workers);
    }

    // Restore `available + running == total` at cluster level after mixing
    // max-combined totals with summed running counts.
    for class in WorkerClass::ALL {
        let agg = workers.get_mut(class);
        agg.available = agg.total - agg.running;
    }

    ClusterSnapshot {
        jobs,
        workers,
        server_jobs,
        server_workers,
        failures,
        polled_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gearmon_net::NetError;
    use gearmon_types::{JobStatus, WorkerBucket};

    fn report(jobs: &[(&str, i64, i64, i64)], marked: WorkerBucket, other: WorkerBucket) -> HostReport {
        HostReport {
            jobs: jobs
                .iter()
                .map(|&(name, t, r, a)| (name.to_string(), JobStatus::new(t, r, a)))
                .collect(),
            workers: WorkerTable { marked, other },
            skipped: Vec::new(),
        }
    }

    fn ok_outcome(host: &str, report: HostReport) -> HostOutcome {
        HostOutcome {
            endpoint: Endpoint::new(host, 4730),
            result: Ok(report),
        }
    }

    fn two_host_outcomes() -> Vec<HostOutcome> {
        let host_a = report(
            &[("facer_x", 5, 2, 3), ("resize", 1, 1, 2)],
            WorkerBucket { total: 3, running: 2, available: 1, queued: 3 },
            WorkerBucket { total: 2, running: 1, available: 1, queued: 0 },
        );
        let host_b = report(
            &[("facer_x", 2, 1, 4)],
            WorkerBucket { total: 5, running: 1, available: 4, queued: 1 },
            WorkerBucket::default(),
        );
        vec![ok_outcome("a", host_a), ok_outcome("b", host_b)]
    }

    #[test]
    fn test_job_fold_sum_and_max() {
        let snapshot = aggregate(two_host_outcomes());

        let facer = snapshot.jobs["facer_x"];
        assert_eq!(facer.total, 7); // 5 + 2
        assert_eq!(facer.running, 3); // 2 + 1
        assert_eq!(facer.available, 4); // max(3, 4)

        // A function present on only one host aggregates as-is.
        assert_eq!(snapshot.jobs["resize"], JobStatus::new(1, 1, 2));
    }

    #[test]
    fn test_worker_fold_max_total_sum_rest() {
        let snapshot = aggregate(two_host_outcomes());

        let marked = snapshot.workers.marked;
        assert_eq!(marked.total, 5); // max(3, 5)
        assert_eq!(marked.running, 3); // 2 + 1
        assert_eq!(marked.queued, 4); // 3 + 1
        assert_eq!(marked.available, 2); // recomputed: 5 - 3
    }

    #[test]
    fn test_cluster_identity_after_final_pass() {
        let snapshot = aggregate(two_host_outcomes());
        for (_, bucket) in snapshot.workers.iter() {
            assert_eq!(bucket.available + bucket.running, bucket.total);
        }
    }

    #[test]
    fn test_per_server_maps_keyed_by_endpoint() {
        let snapshot = aggregate(two_host_outcomes());
        assert_eq!(snapshot.server_jobs.len(), 2);
        assert!(snapshot.server_jobs.contains_key("a:4730"));
        assert!(snapshot.server_workers.contains_key("b:4730"));
        assert_eq!(snapshot.server_jobs["b:4730"]["facer_x"].total, 2);
    }

    #[test]
    fn test_failed_host_excluded_without_corrupting() {
        let mut outcomes = two_host_outcomes();
        outcomes.insert(
            1,
            HostOutcome {
                endpoint: Endpoint::new("down", 4730),
                result: Err(NetError::NotConnected.into()),
            },
        );
        let snapshot = aggregate(outcomes);

        // Aggregates over the remaining hosts are unaffected.
        assert_eq!(snapshot.jobs["facer_x"].total, 7);
        assert_eq!(snapshot.workers.marked.total, 5);
        assert_eq!(snapshot.server_jobs.len(), 2);
        assert!(!snapshot.server_jobs.contains_key("down:4730"));

        assert_eq!(snapshot.failures.len(), 1);
        assert_eq!(snapshot.failures[0].endpoint, "down:4730");
        assert_eq!(snapshot.failures[0].reason, "connection not open");
    }

    #[test]
    fn test_empty_outcomes() {
        let snapshot = aggregate(Vec::new());
        assert!(snapshot.jobs.is_empty());
        assert!(snapshot.server_jobs.is_empty());
        assert!(snapshot.server_workers.is_empty());
        assert!(snapshot.failures.is_empty());
        assert_eq!(snapshot.workers.marked, WorkerBucket::default());
        assert_eq!(snapshot.workers.other, WorkerBucket::default());
    }

    #[test]
    fn test_fold_is_order_independent() {
        let forward = aggregate(two_host_outcomes());
        let mut reversed_outcomes = two_host_outcomes();
        reversed_outcomes.reverse();
        let reversed = aggregate(reversed_outcomes);

        assert_eq!(forward.jobs, reversed.jobs);
        assert_eq!(forward.workers, reversed.workers);
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = aggregate(two_host_outcomes());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["jobs"]["facer_x"]["total"].is_number());
        assert!(json["server_workers"]["a:4730"]["marked"]["queued"].is_number());
        assert!(json["polled_at"].is_string());
    }
}
