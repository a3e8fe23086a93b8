//! Output rendering for the admin CLI.
//!
//! Table mode prints column-aligned summaries; JSON mode serializes the
//! whole snapshot for machine consumption.

use std::io::Write;

use gearmon_cluster::ClusterSnapshot;
use gearmon_types::{JobMap, WorkerTable};

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Column-aligned tables.
    Table,
    /// The full snapshot as pretty-printed JSON.
    Json,
}

/// Print the snapshot in the requested format.
pub fn print_snapshot<W: Write>(
    out: &mut W,
    snapshot: &ClusterSnapshot,
    format: OutputFormat,
    per_server: bool,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(out, "{json}")
        }
        OutputFormat::Table => print_tables(out, snapshot, per_server),
    }
}

fn print_tables<W: Write>(
    out: &mut W,
    snapshot: &ClusterSnapshot,
    per_server: bool,
) -> std::io::Result<()> {
    writeln!(out, "polled at {}", snapshot.polled_at.format("%Y-%m-%d %H:%M:%S UTC"))?;

    writeln!(out, "\n== cluster functions ==")?;
    print_job_table(out, &snapshot.jobs)?;

    writeln!(out, "\n== cluster workers ==")?;
    print_worker_table(out, &snapshot.workers)?;

    if per_server {
        for (server, jobs) in &snapshot.server_jobs {
            writeln!(out, "\n== {server} functions ==")?;
            print_job_table(out, jobs)?;
        }
        for (server, workers) in &snapshot.server_workers {
            writeln!(out, "\n== {server} workers ==")?;
            print_worker_table(out, workers)?;
        }
    }

    for failure in &snapshot.failures {
        writeln!(out, "\nunreachable: {} ({})", failure.endpoint, failure.reason)?;
    }
    Ok(())
}

fn print_job_table<W: Write>(out: &mut W, jobs: &JobMap) -> std::io::Result<()> {
    let mut rows = vec![row(&["FUNCTION", "TOTAL", "RUNNING", "AVAILABLE"])];
    for (name, status) in jobs {
        rows.push(vec![
            name.clone(),
            status.total.to_string(),
            status.running.to_string(),
            status.available.to_string(),
        ]);
    }
    print_aligned(out, &rows)
}

fn print_worker_table<W: Write>(out: &mut W, workers: &WorkerTable) -> std::io::Result<()> {
    let mut rows = vec![row(&["CLASS", "TOTAL", "RUNNING", "AVAILABLE", "QUEUED"])];
    for (class, bucket) in workers.iter() {
        rows.push(vec![
            class.to_string(),
            bucket.total.to_string(),
            bucket.running.to_string(),
            bucket.available.to_string(),
            bucket.queued.to_string(),
        ]);
    }
    print_aligned(out, &rows)
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// Left-align every column to its widest cell, two spaces between columns.
fn print_aligned<W: Write>(out: &mut W, rows: &[Vec<String>]) -> std::io::Result<()> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for r in rows {
        for (i, cell) in r.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    for r in rows {
        let mut line = String::new();
        for (i, cell) in r.iter().enumerate() {
            if i + 1 < r.len() {
                line.push_str(&format!("{cell:<width$}  ", width = widths[i]));
            } else {
                line.push_str(cell);
            }
        }
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gearmon_cluster::{aggregate, HostOutcome};
    use gearmon_report::HostReport;
    use gearmon_types::{Endpoint, JobStatus, WorkerBucket};

    fn sample_snapshot() -> ClusterSnapshot {
        let mut jobs = JobMap::new();
        jobs.insert("facer_detect".to_string(), JobStatus::new(5, 2, 3));
        jobs.insert("resize".to_string(), JobStatus::new(1, 0, 2));
        let report = HostReport {
            jobs,
            workers: WorkerTable {
                marked: WorkerBucket { total: 3, running: 2, available: 1, queued: 3 },
                other: WorkerBucket { total: 2, running: 0, available: 2, queued: 1 },
            },
            skipped: Vec::new(),
        };
        aggregate(vec![HostOutcome {
            endpoint: Endpoint::new("queue01", 4730),
            result: Ok(report),
        }])
    }

    #[test]
    fn test_table_output_aligned() {
        let mut buf = Vec::new();
        print_snapshot(&mut buf, &sample_snapshot(), OutputFormat::Table, false).unwrap();
        let output = String::from_utf8(buf).unwrap();

        assert!(output.contains("== cluster functions =="));
        assert!(output.contains("facer_detect"));
        assert!(output.contains("== cluster workers =="));
        assert!(output.contains("marked"));
        assert!(!output.contains("queue01 functions"));
    }

    #[test]
    fn test_table_output_per_server() {
        let mut buf = Vec::new();
        print_snapshot(&mut buf, &sample_snapshot(), OutputFormat::Table, true).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("== queue01:4730 functions =="));
        assert!(output.contains("== queue01:4730 workers =="));
    }

    #[test]
    fn test_json_output_parses() {
        let mut buf = Vec::new();
        print_snapshot(&mut buf, &sample_snapshot(), OutputFormat::Json, false).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["jobs"]["facer_detect"]["total"], 5);
        assert_eq!(parsed["workers"]["marked"]["running"], 2);
    }

    #[test]
    fn test_aligned_columns() {
        let rows = vec![
            row(&["A", "LONGHEADER"]),
            row(&["longer", "x"]),
        ];
        let mut buf = Vec::new();
        print_aligned(&mut buf, &rows).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        // Second column starts at the same offset in both lines.
        assert_eq!(lines[0].find("LONGHEADER"), lines[1].find('x'));
    }
}
