//! Pack containment relationships stated on branded packs

mod common;

use pretty_assertions::assert_eq;

use common::back_stitch::*;
use common::*;
use medserve_transform::{
    CollectingSink, ErrorKind, TransformConfig, TransformDriver, TransformEngine,
};

#[test]
fn test_subpack_resolves_to_branded_pack() {
    let graph = back_stitch_graph();
    let mut engine = TransformEngine::new(&graph, release(), &TransformConfig::default());

    engine.ensure(graph.concept(TPP_OUTER).unwrap()).unwrap();
    let records = engine.take_batch();
    assert_unique_ids(&records);

    let outer = find_record(&records, TPP_OUTER).as_package().unwrap();
    assert_eq!(outer.contents.len(), 1);
    let content = &outer.contents[0];
    assert_eq!(content.item.reference.reference, "Medication/3003");
    assert_eq!(content.item.medication_kind, "BPG");
    assert_eq!(content.amount.value, 3.0);

    // The resolved pack is materialized, the unbranded one only through MPP_OUTER
    assert!(engine.is_created(TPP_SUB));
    assert!(engine.is_created(MPP_SUB));
}

#[test]
fn test_unbranded_subpack_is_not_rewritten() {
    let graph = back_stitch_graph();
    let mut engine = TransformEngine::new(&graph, release(), &TransformConfig::default());

    engine.ensure(graph.concept(MPP_OUTER).unwrap()).unwrap();
    let records = engine.take_batch();

    let outer = find_record(&records, MPP_OUTER).as_package().unwrap();
    assert_eq!(outer.contents[0].item.reference.reference, "Medication/3001");
    assert!(!engine.is_created(TPP_SUB));
}

#[test]
fn test_containered_subpack_is_not_rewritten() {
    let graph = back_stitch_graph();
    let mut engine = TransformEngine::new(&graph, release(), &TransformConfig::default());

    engine.ensure(graph.concept(CTPP_OUTER).unwrap()).unwrap();
    let records = engine.take_batch();

    let outer = find_record(&records, CTPP_OUTER).as_package().unwrap();
    assert_eq!(outer.contents[0].item.reference.reference, "Medication/3005");
}

#[test]
fn test_full_run_with_back_stitch() {
    let graph = back_stitch_graph();
    let mut sink = CollectingSink::new();
    let report = TransformDriver::new(&graph, release(), TransformConfig::default())
        .run(&mut sink)
        .unwrap();

    assert_unique_ids(sink.records());
    assert_record_set(
        sink.records(),
        &[MPP_SUB, MPP_OUTER, TPP_SUB, TPP_OUTER, CTPP_SUB, CTPP_OUTER],
    );
    assert_eq!(report.records_created, 6);
}

#[test]
fn test_ambiguous_back_stitch_is_fatal() {
    let graph = ambiguous_back_stitch_graph();
    let mut engine = TransformEngine::new(&graph, release(), &TransformConfig::default());

    let err = engine
        .ensure(graph.concept(TPP_OUTER).unwrap())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ModelInconsistency);
    assert_eq!(err.concept_id, Some(TPP_OUTER));
    assert!(err.message.contains("ambiguous back-stitch"), "{}", err.message);
}

#[test]
fn test_ambiguous_back_stitch_aborts_run() {
    let graph = ambiguous_back_stitch_graph();
    let mut sink = CollectingSink::new();
    let err = TransformDriver::new(&graph, release(), TransformConfig::default())
        .run(&mut sink)
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::ModelInconsistency);
    assert!(!sink.is_finished());
}

#[test]
fn test_subpack_without_containered_pack_is_fatal() {
    let graph = unresolvable_back_stitch_graph();
    let mut engine = TransformEngine::new(&graph, release(), &TransformConfig::default());

    // No package below TPP_OUTER restates the subpack, so nothing to resolve against
    let err = engine
        .ensure(graph.concept(TPP_OUTER).unwrap())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ModelInconsistency);
    assert_eq!(err.concept_id, Some(TPP_OUTER));
    assert!(err.message.contains("ambiguous back-stitch"), "{}", err.message);
    assert!(!engine.is_created(TPP_SUB));
}
