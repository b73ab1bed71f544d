//! File-based run: snapshot JSON and YAML config in, NDJSON out

mod common;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use common::*;
use medserve_transform::{
    ConceptGraphBuilder, ErrorKind, GraphSnapshot, NdjsonSink, ReleaseVersion, TransformConfig,
    TransformDriver,
};

fn write_snapshot(dir: &Path) -> std::path::PathBuf {
    let graph = paracetamol_graph();
    let mut concepts: Vec<_> = graph.iter().cloned().collect();
    concepts.sort_by_key(|c| c.id);
    let snapshot = GraphSnapshot {
        concepts,
        ..GraphSnapshot::default()
    };

    let path = dir.join("snapshot.json");
    serde_json::to_writer(BufWriter::new(File::create(&path).unwrap()), &snapshot).unwrap();
    path
}

#[test]
fn test_run_from_files() {
    let dir = TempDir::new().unwrap();
    let snapshot_path = write_snapshot(dir.path());

    let config_path = dir.path().join("transform.yaml");
    fs::write(
        &config_path,
        "version: 1\nprogress_interval: 2\nemit_empty_batches: true\n",
    )
    .unwrap();
    let config = TransformConfig::from_yaml(&config_path).unwrap();
    assert_eq!(config.progress_interval, 2);

    let release = ReleaseVersion::from_path(&dir.path().join(RELEASE_FILE)).unwrap();

    let snapshot: GraphSnapshot =
        serde_json::from_reader(BufReader::new(File::open(&snapshot_path).unwrap())).unwrap();
    let graph = ConceptGraphBuilder::from_snapshot(snapshot).build().unwrap();

    let out_path = dir.path().join("records.ndjson");
    let mut sink = NdjsonSink::new(BufWriter::new(File::create(&out_path).unwrap()));
    let report = TransformDriver::new(&graph, release, config)
        .run(&mut sink)
        .unwrap();
    assert_eq!(report.records_created, 7);
    assert_eq!(report.batches, 7);
    drop(sink);

    let output = fs::read_to_string(&out_path).unwrap();
    assert_eq!(output.lines().count(), 7);
    let first: serde_json::Value = serde_json::from_str(output.lines().next().unwrap()).unwrap();
    assert_eq!(first["id"], "1001");
    assert_eq!(
        first["source"]["version"],
        "http://snomed.info/sct?version=http%3A%2F%2Fsnomed.info%2Fsct%2F32506021000036107%2Fversion%2F20240331"
    );
}

#[test]
fn test_invalid_release_identifier() {
    let err = ReleaseVersion::from_path(Path::new(
        "/data/NCTS_SCT_RF2_DISTRIBUTION_32506021000036107-2024033-SNAPSHOT.zip",
    ))
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidReleaseIdentifier);

    let err = ReleaseVersion::from_path(Path::new("/data/snapshot.zip")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidReleaseIdentifier);
}

#[test]
fn test_config_rejects_unknown_version() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("transform.yaml");
    fs::write(&path, "version: 2\n").unwrap();
    assert!(TransformConfig::from_yaml(&path).is_err());
}
