use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use graphlet_census::{EdgeListLoader, EnsembleRunner, LogObserver, RunConfig};

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

fn parse_args() -> Result<PathBuf> {
    let mut args = env::args().skip(1);
    let config = args.next().unwrap_or_else(|| "config.json".to_string());
    if let Some(extra) = args.next() {
        anyhow::bail!("Unexpected extra argument: {extra}");
    }
    Ok(PathBuf::from(config))
}

fn main() -> Result<()> {
    init_logging();
    let config_path = parse_args()?;
    let config = RunConfig::from_path(&config_path)?;
    let ensemble = config.ensemble_config()?;

    let input = config.resolve_input(&config_path);
    let load_start = Instant::now();
    let graph = EdgeListLoader::from_path(&input)
        .with_context(|| format!("load input graph {:?}", input))?;
    info!("Graph created from file: {:?}", input);
    info!(
        "Nodes: {}, edges: {}, modes: {} ({:.2?})",
        graph.node_count(),
        graph.edge_count(),
        graph.mode_count(),
        load_start.elapsed()
    );
    if ensemble.runs() > 1 {
        info!("Counts are averaged over {} randomized/sampled runs", ensemble.runs());
    }

    let summary = EnsembleRunner::new(ensemble)
        .with_observer(Arc::new(LogObserver))
        .run(&graph)?;

    info!(
        "{} graphlet classes over {} run(s)",
        summary.entries.len(),
        summary.runs
    );
    for (rank, entry) in summary.top(config.top).iter().enumerate() {
        info!(
            "#{} mean {:.3} (total {}): {}",
            rank + 1,
            entry.mean,
            entry.total,
            entry.representative
        );
    }
    Ok(())
}
