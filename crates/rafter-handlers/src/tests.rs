//! Cross-module scenarios: the contracts every handler must honour,
//! exercised end to end through the in-memory reference handlers.

use serde_json::json;

use crate::discovery::{Catalog, HandlerType, RoleId};
use crate::error::HandlerError;
use crate::handler::{
    DataHandler, FrameConfig, FrameSink, FrameSource, Resolution, Sink, TableSource,
};
use crate::params::Reconstruct;
use crate::test_support::{
    MemDistributionSink, MemDistributionSource, MemFrameSink, MemFrameSource, MemTableSink,
    MemTableSource,
};

fn frame_source() -> MemFrameSource {
    MemFrameSource::new(
        FrameConfig::new(Resolution::isotropic(2.5), "um"),
        vec![vec![0.0, 1.0], vec![2.0, 3.0]],
    )
}

// ---------------------------------------------------------------------------
// Lifecycle contract
// ---------------------------------------------------------------------------

#[test]
fn every_handler_is_constructed_inactive() {
    assert!(!frame_source().is_active());
    assert!(!MemFrameSink::new(FrameConfig::default()).is_active());
    assert!(!MemTableSource::new(Vec::new()).is_active());
    assert!(!MemTableSink::new().is_active());
    assert!(!MemDistributionSource::new(vec![0.0], vec![10.0], false)
        .expect("valid shape")
        .is_active());
    assert!(!MemDistributionSink::new().is_active());
}

#[test]
fn activate_then_deactivate_restores_inactive() {
    let mut source = frame_source();
    source.activate().expect("activation succeeds");
    assert!(source.is_active());
    source.deactivate().expect("deactivation succeeds");
    assert!(!source.is_active());
    source.deactivate().expect("repeat deactivation is safe");
}

#[test]
fn reads_are_guarded_by_the_lifecycle() {
    let source = frame_source();
    assert!(matches!(
        source.get_frame(0),
        Err(HandlerError::InactiveState { .. })
    ));
    assert!(matches!(
        source.frame_metadata(0, "timestamp"),
        Err(HandlerError::InactiveState { .. })
    ));
}

// ---------------------------------------------------------------------------
// Reconstruction contract
// ---------------------------------------------------------------------------

#[test]
fn capture_while_active_fails_capture_while_inactive_round_trips() {
    let mut source = frame_source();
    source.activate().expect("activation succeeds");
    assert!(matches!(
        source.capture(),
        Err(HandlerError::CaptureActive)
    ));
    source.deactivate().expect("deactivation succeeds");

    let captured = source.capture().expect("inactive capture succeeds");
    let rebuilt = MemFrameSource::restore(captured.clone()).expect("restore succeeds");
    assert_eq!(
        rebuilt.capture().expect("re-capture succeeds"),
        captured,
        "reconstructed handler must describe itself identically"
    );
}

#[test]
fn resolution_survives_the_reconstruction_boundary() {
    let captured = frame_source().capture().expect("capture succeeds");
    assert_eq!(
        captured.get("resolution").expect("resolution key"),
        &json!(2.5)
    );
    assert_eq!(
        captured.get("resolution_units").expect("units key"),
        &json!("um")
    );

    let rebuilt = MemFrameSource::restore(captured).expect("restore succeeds");
    assert_eq!(rebuilt.resolution(), &Resolution::Isotropic(2.5));
    assert_eq!(rebuilt.resolution_units(), "um");
}

#[test]
fn reconstruction_transports_data_not_live_state() {
    // The mapping is plain data: any transport that preserves it will do.
    let description = frame_source().capture().expect("capture succeeds");
    let encoded = serde_json::to_string(&description).expect("mapping encodes");
    let decoded: crate::params::ParamMap =
        serde_json::from_str(&encoded).expect("mapping survives transport");
    let mut rebuilt = MemFrameSource::restore(decoded).expect("restore succeeds");
    assert!(!rebuilt.is_active());

    let scope = rebuilt.scope().expect("activation succeeds");
    assert_eq!(scope.get_frame(1).expect("frame 1"), vec![2.0, 3.0]);
}

#[test]
fn sink_capture_describes_configuration_only() {
    let mut sink = MemFrameSink::new(FrameConfig::new(Resolution::isotropic(2.5), "um"));
    {
        let mut scope = sink.scope().expect("activation succeeds");
        scope
            .record_frame(vec![9.0], 0, None)
            .expect("write succeeds");
    }
    let captured = sink.capture().expect("capture succeeds");
    let rebuilt = MemFrameSink::restore(captured).expect("restore succeeds");
    let source = rebuilt.make_source().expect("paired source builds");
    assert!(source.is_empty(), "written data is live output, not a parameter");
}

// ---------------------------------------------------------------------------
// Table contract
// ---------------------------------------------------------------------------

#[test]
fn lazy_table_sequence_matches_direct_reads() {
    let mut source = MemTableSource::new(vec![
        (String::from("positions"), json!([[0, 1], [2, 3]])),
        (String::from("angles"), json!([0.0, 90.0])),
    ]);
    let scope = source.scope().expect("activation succeeds");
    let names = scope.table_names().expect("names enumerate");
    assert_eq!(names, vec!["positions", "angles"]);

    let yielded: Vec<_> = scope
        .iter_tables()
        .expect("source is active")
        .collect::<Result<_, _>>()
        .expect("reads succeed");
    assert_eq!(yielded.len(), names.len());
    for (name, table) in names.iter().zip(&yielded) {
        assert_eq!(table, &scope.read_table(name).expect("direct read"));
    }
}

// ---------------------------------------------------------------------------
// Metadata policy
// ---------------------------------------------------------------------------

#[test]
fn metadata_misses_error_at_both_levels() {
    let mut global = crate::metadata::MetaStore::new();
    global.insert("instrument", json!("TOMCAT"));
    let mut source = frame_source().with_metadata(global);
    let scope = source.scope().expect("activation succeeds");

    assert_eq!(
        scope.metadata("instrument").expect("set at construction"),
        json!("TOMCAT")
    );
    assert!(matches!(
        scope.metadata("wavelength"),
        Err(HandlerError::KeyNotFound { .. })
    ));
    assert!(matches!(
        scope.frame_metadata(0, "timestamp"),
        Err(HandlerError::KeyNotFound { .. })
    ));
}

// ---------------------------------------------------------------------------
// Discovery scenario
// ---------------------------------------------------------------------------

#[test]
fn discovery_filters_two_descendants_down_to_one() {
    let mut catalog = Catalog::new();
    catalog
        .register::<MemFrameSource>()
        .expect("register frame source");
    catalog
        .register::<MemTableSource>()
        .expect("register table source");

    let unfiltered = catalog.discover(RoleId::Source, None);
    let unfiltered_ids: Vec<&str> = unfiltered.iter().map(|d| d.id()).collect();
    assert_eq!(unfiltered_ids, vec!["memframesource", "memtablesource"]);

    let filtered = catalog.discover(RoleId::Source, Some(&[RoleId::Table]));
    let filtered_ids: Vec<&str> = filtered.iter().map(|d| d.id()).collect();
    assert_eq!(filtered_ids, vec!["memtablesource"]);
}

#[test]
fn reference_handlers_are_available_by_default() {
    assert!(MemFrameSource::available());
    assert_eq!(MemFrameSink::id(), "memframesink");
}
