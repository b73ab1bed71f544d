//! AMT transform CLI
//!
//! Reads a loaded release snapshot (JSON), transforms it and writes one
//! record per line.
//!
//! Usage:
//!   amt-transform --snapshot graph.json \
//!     --release NCTS_SCT_RF2_DISTRIBUTION_32506021000036107-20240331-SNAPSHOT.zip \
//!     [--config transform.yaml] [--out records.ndjson]
//!
//! Log level follows `RUST_LOG` (default `info`); logs go to stderr.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use medserve_transform::{
    ConceptGraphBuilder, GraphSnapshot, NdjsonSink, ReleaseVersion, TransformConfig,
    TransformDriver,
};

/// Transform an AMT release into medication records
#[derive(Parser, Debug)]
#[command(name = "amt-transform", version)]
struct Args {
    /// Loaded concept graph snapshot (JSON)
    #[arg(long)]
    snapshot: PathBuf,

    /// Release distribution file name the snapshot was loaded from
    #[arg(long)]
    release: String,

    /// Run configuration (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file, stdout when omitted
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    // Reject a bad release identifier before loading anything
    let release = ReleaseVersion::from_path(std::path::Path::new(&args.release))?;
    info!(release = %release.stamp(), "Release identified");

    let config = match &args.config {
        Some(path) => TransformConfig::from_yaml(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TransformConfig::default(),
    };

    let reader = BufReader::new(
        File::open(&args.snapshot)
            .with_context(|| format!("opening snapshot {}", args.snapshot.display()))?,
    );
    let snapshot: GraphSnapshot = serde_json::from_reader(reader)
        .with_context(|| format!("parsing snapshot {}", args.snapshot.display()))?;
    let graph = ConceptGraphBuilder::from_snapshot(snapshot).build()?;

    let writer: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut sink = NdjsonSink::new(writer);

    let report = TransformDriver::new(&graph, release, config).run(&mut sink)?;

    for bucket in &report.buckets {
        info!(
            concepts = bucket.concepts,
            records = bucket.records_created,
            "{}",
            bucket.kind.code()
        );
    }
    if !report.diagnostics.is_empty() {
        warn!("{} diagnostics raised during the run", report.diagnostics.len());
    }
    info!(
        records = report.records_created,
        batches = report.batches,
        written = sink.written(),
        "Done"
    );
    Ok(())
}
