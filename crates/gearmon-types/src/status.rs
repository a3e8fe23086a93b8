use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-function queue counters as reported by one server (or aggregated
/// across the cluster).
///
/// `total` counts every queued job for the function, including the
/// `running` ones. `available` is the number of workers capable of the
/// function that the server knows about.
///
/// Counts are signed: the parser deliberately lets derived values go
/// negative rather than papering over inconsistent server output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub total: i64,
    pub running: i64,
    pub available: i64,
}

impl JobStatus {
    pub fn new(total: i64, running: i64, available: i64) -> Self {
        Self {
            total,
            running,
            available,
        }
    }
}

/// Per-function job counters keyed by function name.
///
/// A `BTreeMap` keeps iteration order deterministic for display and
/// serialization.
pub type JobMap = BTreeMap<String, JobStatus>;

/// Aggregate counters for one worker classification on one host (or for
/// the cluster after folding).
///
/// On a single fully-parsed host `available + running == total`. The
/// cluster fold combines `total` with `max` but `running` with `sum`, so
/// the identity only holds again after the aggregator's final
/// `available = total - running` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerBucket {
    /// Worker slots capable of this classification.
    pub total: i64,
    /// Slots currently executing a job of this classification.
    pub running: i64,
    /// Idle capable slots.
    pub available: i64,
    /// Jobs of this classification waiting, not yet running.
    pub queued: i64,
}

/// The two worker classifications.
///
/// A function name containing the configured marker substring is `Marked`;
/// everything else is `Other`. Matching is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerClass {
    Marked,
    Other,
}

impl WorkerClass {
    /// Classify a function name against the marker substring.
    pub fn classify(function_name: &str, marker: &str) -> Self {
        if function_name.contains(marker) {
            WorkerClass::Marked
        } else {
            WorkerClass::Other
        }
    }

    /// Both classifications, in display order.
    pub const ALL: [WorkerClass; 2] = [WorkerClass::Marked, WorkerClass::Other];
}

impl fmt::Display for WorkerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerClass::Marked => write!(f, "marked"),
            WorkerClass::Other => write!(f, "other"),
        }
    }
}

/// One [`WorkerBucket`] per classification.
///
/// Exactly two buckets exist, so this is a fixed struct rather than a map;
/// [`WorkerTable::get`] / [`WorkerTable::get_mut`] index it by class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerTable {
    pub marked: WorkerBucket,
    pub other: WorkerBucket,
}

impl WorkerTable {
    pub fn get(&self, class: WorkerClass) -> &WorkerBucket {
        match class {
            WorkerClass::Marked => &self.marked,
            WorkerClass::Other => &self.other,
        }
    }

    pub fn get_mut(&mut self, class: WorkerClass) -> &mut WorkerBucket {
        match class {
            WorkerClass::Marked => &mut self.marked,
            WorkerClass::Other => &mut self.other,
        }
    }

    /// Iterate over `(class, bucket)` pairs in display order.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (WorkerClass, &'a WorkerBucket)> + 'a {
        WorkerClass::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_substring() {
        assert_eq!(WorkerClass::classify("facer_resize", "facer"), WorkerClass::Marked);
        assert_eq!(WorkerClass::classify("resize_facer", "facer"), WorkerClass::Marked);
        assert_eq!(WorkerClass::classify("thumbnail", "facer"), WorkerClass::Other);
    }

    #[test]
    fn test_classify_case_sensitive() {
        assert_eq!(WorkerClass::classify("Facer_job", "facer"), WorkerClass::Other);
    }

    #[test]
    fn test_table_indexing() {
        let mut table = WorkerTable::default();
        table.get_mut(WorkerClass::Marked).total = 3;
        table.get_mut(WorkerClass::Other).queued = 7;
        assert_eq!(table.get(WorkerClass::Marked).total, 3);
        assert_eq!(table.get(WorkerClass::Other).queued, 7);
        assert_eq!(table.marked.total, 3);
    }

    #[test]
    fn test_table_iter_order() {
        let table = WorkerTable::default();
        let classes: Vec<WorkerClass> = table.iter().map(|(c, _)| c).collect();
        assert_eq!(classes, vec![WorkerClass::Marked, WorkerClass::Other]);
    }

    #[test]
    fn test_serde_shapes() {
        let mut jobs = JobMap::new();
        jobs.insert("resize".to_string(), JobStatus::new(5, 2, 3));
        let json = serde_json::to_string(&jobs).unwrap();
        assert!(json.contains("\"resize\""));
        assert!(json.contains("\"total\":5"));

        let class_json = serde_json::to_string(&WorkerClass::Marked).unwrap();
        assert_eq!(class_json, "\"marked\"");
    }
}
