use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use gearmon_cluster::{ClusterMonitor, JobTransform, MonitorConfig};
use gearmon_logging::LogConfig;
use gearmon_types::JobMap;

mod render;

/// Point-in-time queue and worker summary for a gearmand fleet.
#[derive(Parser, Debug)]
#[command(name = "gearmon-admin", version, about)]
struct Args {
    /// Servers to poll, as host[:port] (port defaults to 4730)
    #[arg(required = true)]
    hosts: Vec<String>,

    /// Substring that classifies a function into the marked worker bucket
    #[arg(short, long, default_value = "facer")]
    marker: String,

    /// Connect timeout per host, in seconds
    #[arg(long, default_value_t = 3)]
    connect_timeout: u64,

    /// Read deadline on open connections, in seconds
    #[arg(long, default_value_t = 10)]
    io_timeout: u64,

    /// Strip this prefix from function names for display
    #[arg(long)]
    strip_prefix: Option<String>,

    /// Also print the per-server drill-down tables
    #[arg(long)]
    per_server: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: render::OutputFormat,

    /// Log level filter
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Drops a configured prefix from every function name.
struct StripPrefix(String);

impl JobTransform for StripPrefix {
    fn transform(&self, jobs: JobMap) -> JobMap {
        jobs.into_iter()
            .map(|(name, status)| {
                let name = name.strip_prefix(&self.0).unwrap_or(&name).to_string();
                (name, status)
            })
            .collect()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let _guard = gearmon_logging::init_logging(&LogConfig {
        level: args.log_level.clone(),
        ..LogConfig::default()
    });

    let mut config = MonitorConfig::from_host_strings(&args.hosts, args.marker.clone())
        .context("invalid host list")?;
    config.connect_timeout = Duration::from_secs(args.connect_timeout);
    config.io_timeout = Duration::from_secs(args.io_timeout);

    let mut monitor = ClusterMonitor::new(config);
    if let Some(prefix) = args.strip_prefix {
        monitor = monitor.with_transform(Arc::new(StripPrefix(prefix)));
    }

    tracing::info!(hosts = args.hosts.len(), "polling cluster");
    let snapshot = monitor.poll().await;

    render::print_snapshot(
        &mut std::io::stdout().lock(),
        &snapshot,
        args.format,
        args.per_server,
    )?;

    // Mirror the partial-failure state in the exit code: results were
    // printed, but the operator should notice missing hosts.
    if !snapshot.failures.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
