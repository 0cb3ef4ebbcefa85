//! Integration tests for the ID mapper against BfRt metadata
//!
//! These tests push complete pipelines (P4Info plus `bf-rt.json` plus
//! `context.json`) through the public mapper API and check lookups,
//! failure handling and concurrent access.

use bfrt::{BfRtError, BfRtId, BfRtInfo, BfRtObject, BfRtResult, BfStatus, DriverMetadata};
use bfrt_id_mapper::{
    BfrtIdMapper, ErrorCode, IdMapperConfig, IdMapperError, IndirectionParser, IndirectionRef,
    MapperRegistry,
};
use p4rt_types::{DeviceTarget, ObjectClass, P4Info, PipeScope};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::NamedTempFile;

const P4INFO_JSON: &str = r#"{
  "pkgInfo": { "name": "tna_ecmp", "arch": "tna" },
  "tables": [
    { "preamble": { "id": 33572104, "name": "Ingress.fwd" } },
    { "preamble": { "id": 33572105, "name": "Ingress.ecmp" }, "implementationId": 285227860 },
    { "preamble": { "id": 33572106, "name": "Ingress.p4info_only" } }
  ],
  "actions": [
    { "preamble": { "id": 16800567, "name": "Ingress.set_port" } },
    { "preamble": { "id": 16800568, "name": "NoAction" } }
  ],
  "actionProfiles": [
    { "preamble": { "id": 285227860, "name": "Ingress.ecmp_ap" }, "tableIds": [ 33572105 ], "withSelector": true }
  ],
  "counters": [
    { "preamble": { "id": 302009236, "name": "Ingress.cnt" } }
  ],
  "digests": [
    { "preamble": { "id": 385924725, "name": "IngressDeparser.learn" } }
  ]
}"#;

const BFRT_JSON: &str = r#"{
  "schema_version": "1.0.0",
  "tables": [
    {
      "name": "pipe.Ingress.fwd",
      "id": 49389765,
      "table_type": "MatchAction_Direct",
      "size": 1024,
      "action_specs": [
        { "name": "Ingress.set_port", "id": 22310000 },
        { "name": "NoAction", "id": 21257015 }
      ]
    },
    {
      "name": "pipe.Ingress.ecmp",
      "id": 49389766,
      "table_type": "MatchAction_Indirect_Selector",
      "action_specs": [ { "name": "Ingress.set_port", "id": 22310000 } ]
    },
    { "name": "pipe.Ingress.ecmp_ap", "id": 37829461, "table_type": "Action" },
    { "name": "pipe.Ingress.ecmp_sel", "id": 37829462, "table_type": "Selector" },
    { "name": "pipe.Ingress.ecmp_sel_get_member", "id": 37829463, "table_type": "SelectorGetMember" },
    { "name": "pipe.Ingress.cnt", "id": 37829464, "table_type": "Counter" },
    { "name": "pipe.Ingress.bfrt_only", "id": 49389767, "table_type": "MatchAction_Direct" },
    { "name": "port", "id": 4294967040, "table_type": "PortConfigure" }
  ],
  "learn_filters": [
    { "name": "pipe.IngressDeparser.learn", "id": 402184575 }
  ]
}"#;

const CONTEXT_JSON: &str = r#"{
  "program_name": "tna_ecmp",
  "tables": [
    {
      "name": "pipe.Ingress.ecmp",
      "table_type": "match",
      "action_data_table_refs": [ { "name": "Ingress.ecmp_ap" } ],
      "selection_table_refs": [ { "name": "Ingress.ecmp_sel" } ]
    },
    {
      "name": "pipe.Ingress.fwd",
      "table_type": "match",
      "action_data_table_refs": [],
      "selection_table_refs": []
    }
  ]
}"#;

/// Mock driver metadata for testing
///
/// Serves objects from an in-memory table and counts queries. Can be
/// switched into a failing mode to simulate an unreadable driver.
#[derive(Default)]
pub struct MockDriver {
    objects: HashMap<ObjectClass, Vec<BfRtObject>>,
    queries: AtomicUsize,
    failure: Mutex<Option<BfStatus>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, class: ObjectClass, id: BfRtId, name: &str) -> Self {
        self.objects
            .entry(class)
            .or_default()
            .push(BfRtObject::new(id, name));
        self
    }

    pub fn fail_with(&self, status: BfStatus) {
        *self.failure.lock().unwrap() = Some(status);
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl DriverMetadata for MockDriver {
    fn objects(&self, class: ObjectClass) -> BfRtResult<Vec<BfRtObject>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = *self.failure.lock().unwrap() {
            return Err(BfRtError::from_status(status));
        }
        Ok(self.objects.get(&class).cloned().unwrap_or_default())
    }
}

/// Parser that returns fixed associations regardless of input.
struct FixedParser(Vec<IndirectionRef>);

impl IndirectionParser for FixedParser {
    fn parse(&self, _descriptor: &str) -> Vec<IndirectionRef> {
        self.0.clone()
    }
}

fn load_fixture() -> (P4Info, BfRtInfo) {
    (
        P4Info::from_json(P4INFO_JSON).unwrap(),
        BfRtInfo::from_json(BFRT_JSON).unwrap(),
    )
}

fn p4info_from(json: &str) -> P4Info {
    P4Info::from_json(json).unwrap()
}

fn profile_selector_p4info() -> P4Info {
    p4info_from(
        r#"{
          "actionProfiles": [ { "preamble": { "id": 5, "name": "ap1" }, "withSelector": true } ],
          "externs": [
            {
              "externTypeId": 130,
              "externTypeName": "ActionSelector",
              "instances": [ { "preamble": { "id": 6, "name": "sel1" } } ]
            }
          ]
        }"#,
    )
}

fn profile_selector_driver() -> MockDriver {
    MockDriver::new()
        .with(ObjectClass::ActionProfile, 500, "ap1")
        .with(ObjectClass::ActionSelector, 600, "sel1")
}

// ============================================================================
// Primary ID translation
// ============================================================================

#[test]
fn test_single_table_scenario() {
    let p4info = p4info_from(r#"{ "tables": [ { "preamble": { "id": 10, "name": "t1" } } ] }"#);
    let driver = MockDriver::new().with(ObjectClass::Table, 77, "t1");

    let mapper = BfrtIdMapper::create_instance(0);
    mapper.push_pipeline_info(&p4info, &driver).unwrap();

    assert_eq!(mapper.get_bfrt_id(10).unwrap(), 77);
    assert_eq!(mapper.get_p4info_id(77).unwrap(), 10);
    assert_eq!(
        mapper.get_bfrt_id(99).unwrap_err(),
        IdMapperError::not_found("P4Info ID 99")
    );
    assert_eq!(mapper.get_p4info_id(10).unwrap_err().code(), ErrorCode::NotFound);
}

#[test]
fn test_bfrt_json_pipeline() {
    let (p4info, bfrt_info) = load_fixture();
    let mapper = BfrtIdMapper::create_instance(0);
    mapper.push_pipeline_info(&p4info, &bfrt_info).unwrap();

    let expected = [
        (33572104, 49389765), // Ingress.fwd
        (33572105, 49389766), // Ingress.ecmp
        (16800567, 22310000), // Ingress.set_port
        (16800568, 21257015), // NoAction
        (285227860, 37829461), // Ingress.ecmp_ap
        (302009236, 37829464), // Ingress.cnt
        (385924725, 402184575), // IngressDeparser.learn
    ];
    for (p4info_id, bfrt_id) in expected {
        assert_eq!(mapper.get_bfrt_id(p4info_id).unwrap(), bfrt_id);
        assert_eq!(mapper.get_p4info_id(bfrt_id).unwrap(), p4info_id);
    }

    assert_eq!(mapper.snapshot().len(), expected.len());
}

#[test]
fn test_bijection_holds_for_every_entry() {
    let (p4info, bfrt_info) = load_fixture();
    let mapper = BfrtIdMapper::create_instance(0);
    mapper.push_pipeline_info(&p4info, &bfrt_info).unwrap();

    let snapshot = mapper.snapshot();
    for (p4info_id, bfrt_id) in &snapshot.p4info_to_bfrt {
        assert_eq!(
            mapper.get_p4info_id(mapper.get_bfrt_id(*p4info_id).unwrap()).unwrap(),
            *p4info_id
        );
        assert_eq!(
            mapper.get_bfrt_id(mapper.get_p4info_id(*bfrt_id).unwrap()).unwrap(),
            *bfrt_id
        );
    }
}

#[test]
fn test_unjoined_objects_skipped() {
    let (p4info, bfrt_info) = load_fixture();
    let mapper = BfrtIdMapper::create_instance(0);
    mapper.push_pipeline_info(&p4info, &bfrt_info).unwrap();

    // Ingress.p4info_only has no driver table.
    assert!(mapper.get_bfrt_id(33572106).unwrap_err().is_not_found());
    // pipe.Ingress.bfrt_only and the fixed port table have no P4Info object.
    assert!(mapper.get_p4info_id(49389767).unwrap_err().is_not_found());
    assert!(mapper.get_p4info_id(4294967040).unwrap_err().is_not_found());
    assert!(!mapper.is_stale());
}

#[test]
fn test_names_never_join_across_classes() {
    let p4info = p4info_from(
        r#"{
          "tables": [ { "preamble": { "id": 10, "name": "shared" } } ],
          "counters": [ { "preamble": { "id": 20, "name": "other" } } ]
        }"#,
    );
    let driver = MockDriver::new()
        .with(ObjectClass::Counter, 77, "shared")
        .with(ObjectClass::Counter, 78, "different");

    let mapper = BfrtIdMapper::create_instance(0);
    mapper.push_pipeline_info(&p4info, &driver).unwrap();

    assert!(mapper.get_bfrt_id(10).is_err());
    assert!(mapper.get_bfrt_id(20).is_err());
    assert!(mapper.snapshot().is_empty());
}

#[test]
fn test_exact_names_config() {
    let (p4info, bfrt_info) = load_fixture();
    let mapper = BfrtIdMapper::create_instance_with_config(0, IdMapperConfig::exact_names());
    mapper.push_pipeline_info(&p4info, &bfrt_info).unwrap();

    // Actions carry no pipeline prefix in bf-rt.json, tables do.
    assert_eq!(mapper.get_bfrt_id(16800567).unwrap(), 22310000);
    assert!(mapper.get_bfrt_id(33572104).is_err());
}

#[test]
fn test_ambiguous_driver_name_skipped() {
    let p4info = p4info_from(
        r#"{ "tables": [
            { "preamble": { "id": 10, "name": "Ingress.t" } },
            { "preamble": { "id": 11, "name": "Ingress.u" } }
        ] }"#,
    );
    let driver = MockDriver::new()
        .with(ObjectClass::Table, 100, "pipe0.Ingress.t")
        .with(ObjectClass::Table, 200, "pipe1.Ingress.t")
        .with(ObjectClass::Table, 300, "pipe0.Ingress.u");

    let mapper = BfrtIdMapper::create_instance(0);
    mapper.push_pipeline_info(&p4info, &driver).unwrap();

    assert!(mapper.get_bfrt_id(10).unwrap_err().is_not_found());
    assert_eq!(mapper.get_bfrt_id(11).unwrap(), 300);
}

#[test]
fn test_action_short_name_not_joined() {
    let p4info =
        p4info_from(r#"{ "actions": [ { "preamble": { "id": 2, "name": "set_port" } } ] }"#);
    let driver = MockDriver::new().with(ObjectClass::Action, 100, "Ingress.set_port");

    let mapper = BfrtIdMapper::create_instance(0);
    mapper.push_pipeline_info(&p4info, &driver).unwrap();

    assert!(mapper.get_bfrt_id(2).unwrap_err().is_not_found());
    assert!(mapper.get_p4info_id(100).unwrap_err().is_not_found());
}

#[test]
fn test_exact_action_name_wins() {
    let p4info = p4info_from(
        r#"{ "actions": [
            { "preamble": { "id": 1, "name": "Ingress.set_port" } },
            { "preamble": { "id": 2, "name": "set_port" } }
        ] }"#,
    );
    let driver = MockDriver::new().with(ObjectClass::Action, 100, "Ingress.set_port");

    let mapper = BfrtIdMapper::create_instance(0);
    mapper.push_pipeline_info(&p4info, &driver).unwrap();

    assert_eq!(mapper.get_bfrt_id(1).unwrap(), 100);
    assert_eq!(mapper.get_p4info_id(100).unwrap(), 1);
    assert!(mapper.get_bfrt_id(2).unwrap_err().is_not_found());
    assert!(!mapper.is_stale());
    assert_eq!(mapper.generation(), 1);
}

#[test]
fn test_stripped_table_name_yields_to_exact_match() {
    let p4info = p4info_from(
        r#"{ "tables": [
            { "preamble": { "id": 10, "name": "Ingress.t" } },
            { "preamble": { "id": 11, "name": "t" } }
        ] }"#,
    );
    let driver = MockDriver::new().with(ObjectClass::Table, 200, "Ingress.t");

    let mapper = BfrtIdMapper::create_instance(0);
    mapper.push_pipeline_info(&p4info, &driver).unwrap();

    assert_eq!(mapper.get_bfrt_id(10).unwrap(), 200);
    assert!(mapper.get_bfrt_id(11).unwrap_err().is_not_found());
    assert!(!mapper.is_stale());
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn test_conflicting_pipeline_marks_stale() {
    let mapper = BfrtIdMapper::create_instance(0);
    let good = p4info_from(r#"{ "tables": [ { "preamble": { "id": 10, "name": "t1" } } ] }"#);
    let driver = MockDriver::new()
        .with(ObjectClass::Table, 77, "t1")
        .with(ObjectClass::Table, 77, "t2");
    mapper.push_pipeline_info(&good, &driver).unwrap();
    assert_eq!(mapper.generation(), 1);

    // Two P4Info tables resolve to the same BfRt table.
    let bad = p4info_from(
        r#"{ "tables": [
            { "preamble": { "id": 10, "name": "t1" } },
            { "preamble": { "id": 11, "name": "t2" } }
        ] }"#,
    );
    let err = mapper.push_pipeline_info(&bad, &driver).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParam);
    assert!(mapper.is_stale());
    assert_eq!(mapper.generation(), 1);

    mapper.push_pipeline_info(&good, &driver).unwrap();
    assert!(!mapper.is_stale());
    assert_eq!(mapper.generation(), 2);
    assert_eq!(mapper.get_bfrt_id(10).unwrap(), 77);
}

#[test]
fn test_zero_p4info_id_rejected() {
    let mapper = BfrtIdMapper::create_instance(0);
    let p4info = p4info_from(r#"{ "tables": [ { "preamble": { "id": 0, "name": "t1" } } ] }"#);
    let driver = MockDriver::new().with(ObjectClass::Table, 77, "t1");

    let err = mapper.push_pipeline_info(&p4info, &driver).unwrap_err();
    assert!(matches!(err, IdMapperError::InvalidPipeline { .. }));
    assert!(mapper.is_stale());
    assert_eq!(mapper.generation(), 0);
}

#[test]
fn test_driver_failure_propagates() {
    let (p4info, _) = load_fixture();
    let driver = MockDriver::new();
    driver.fail_with(BfStatus::NotReady);

    let mapper = BfrtIdMapper::create_instance(0);
    let err = mapper.push_pipeline_info(&p4info, &driver).unwrap_err();
    assert_eq!(
        err,
        IdMapperError::Driver(BfRtError::from_status(BfStatus::NotReady))
    );
    assert_eq!(err.code(), ErrorCode::Unavailable);
    assert!(mapper.is_stale());
    assert!(driver.query_count() >= 1);
}

// ============================================================================
// Indirection
// ============================================================================

#[test]
fn test_profile_selector_scenario() {
    let p4info = profile_selector_p4info();
    let driver = profile_selector_driver();
    let parser = FixedParser(vec![IndirectionRef {
        table: "t".to_string(),
        action_profile: "ap1".to_string(),
        action_selector: "sel1".to_string(),
    }]);

    let mapper =
        BfrtIdMapper::create_instance_with_parser(0, IdMapperConfig::default(), Box::new(parser));
    mapper.push_pipeline_info(&p4info, &driver).unwrap();
    assert_eq!(mapper.get_bfrt_id(5).unwrap(), 500);
    assert_eq!(mapper.get_bfrt_id(6).unwrap(), 600);

    mapper
        .build_action_profile_mapping(&p4info, &driver, "")
        .unwrap();
    assert_eq!(mapper.get_action_selector_id(500).unwrap(), 600);
    assert_eq!(mapper.get_action_profile_id(600).unwrap(), 500);
    assert!(mapper.get_action_selector_id(999).unwrap_err().is_not_found());
}

#[test]
fn test_context_json_indirection() {
    let (p4info, bfrt_info) = load_fixture();
    let mapper = BfrtIdMapper::create_instance(0);
    mapper.push_pipeline_info(&p4info, &bfrt_info).unwrap();
    mapper
        .build_action_profile_mapping(&p4info, &bfrt_info, CONTEXT_JSON)
        .unwrap();

    // The selector is folded into the P4Info profile and only found by its
    // BfRt name.
    assert_eq!(mapper.get_action_selector_id(37829461).unwrap(), 37829462);
    assert_eq!(mapper.get_action_profile_id(37829462).unwrap(), 37829461);

    // Only primary table entries have a device target.
    assert!(mapper.get_device_target(37829461).is_ok());
    assert!(mapper.get_device_target(37829462).unwrap_err().is_not_found());
}

#[test]
fn test_indirection_independent_of_primary() {
    let (p4info, bfrt_info) = load_fixture();
    let mapper = BfrtIdMapper::create_instance(0);
    mapper.push_pipeline_info(&p4info, &bfrt_info).unwrap();

    // Mapped by the primary table, but no descriptor was pushed.
    assert!(mapper.get_p4info_id(37829461).is_ok());
    assert!(mapper.get_action_selector_id(37829461).unwrap_err().is_not_found());
    assert!(mapper.get_action_profile_id(37829462).unwrap_err().is_not_found());

    // Mapped table IDs are never indirection keys.
    mapper
        .build_action_profile_mapping(&p4info, &bfrt_info, CONTEXT_JSON)
        .unwrap();
    assert!(mapper.get_action_selector_id(49389765).is_err());
}

#[test]
fn test_malformed_descriptor_is_not_fatal() {
    let (p4info, bfrt_info) = load_fixture();
    let mapper = BfrtIdMapper::create_instance(0);
    mapper.push_pipeline_info(&p4info, &bfrt_info).unwrap();

    mapper
        .build_action_profile_mapping(&p4info, &bfrt_info, "{ truncated")
        .unwrap();
    assert!(mapper.snapshot().action_profile_to_selector.is_empty());
    assert!(!mapper.is_stale());
    assert_eq!(mapper.get_bfrt_id(33572104).unwrap(), 49389765);
}

#[test]
fn test_primary_push_clears_indirection() {
    let (p4info, bfrt_info) = load_fixture();
    let mapper = BfrtIdMapper::create_instance(0);
    mapper
        .push_forwarding_pipeline(&p4info, &bfrt_info, Some(CONTEXT_JSON))
        .unwrap();
    assert!(mapper.get_action_selector_id(37829461).is_ok());

    mapper.push_pipeline_info(&p4info, &bfrt_info).unwrap();
    assert!(mapper.get_action_selector_id(37829461).is_err());
}

#[test]
fn test_forwarding_pipeline_without_descriptor() {
    let (p4info, bfrt_info) = load_fixture();
    let mapper = BfrtIdMapper::create_instance(0);
    mapper
        .push_forwarding_pipeline(&p4info, &bfrt_info, None)
        .unwrap();

    assert_eq!(mapper.generation(), 1);
    assert!(mapper.snapshot().action_profile_to_selector.is_empty());
}

// ============================================================================
// Device target and registry
// ============================================================================

#[test]
fn test_device_target() {
    let (p4info, bfrt_info) = load_fixture();
    let registry = MapperRegistry::new();
    let mapper = registry.attach(3).unwrap();
    mapper.push_pipeline_info(&p4info, &bfrt_info).unwrap();

    let target = mapper.get_device_target(49389765).unwrap();
    assert_eq!(target, DeviceTarget::all_pipes(3));
    assert_eq!(target.pipe, PipeScope::All);
    assert_eq!(target.to_string(), "dev 3 pipe all");

    assert!(mapper.get_device_target(49389767).unwrap_err().is_not_found());
}

#[test]
fn test_registry_devices_independent() {
    let (p4info, bfrt_info) = load_fixture();
    let registry = MapperRegistry::new();
    let first = registry.attach(0).unwrap();
    let second = registry.attach(1).unwrap();

    first.push_pipeline_info(&p4info, &bfrt_info).unwrap();
    assert!(first.get_bfrt_id(33572104).is_ok());
    assert!(second.get_bfrt_id(33572104).is_err());
    assert_eq!(second.generation(), 0);

    registry.detach(0).unwrap();
    // Detached mappers stay usable by their holders.
    assert!(first.get_bfrt_id(33572104).is_ok());
    assert_eq!(registry.units(), vec![1]);
}

#[test]
fn test_load_from_files() {
    let mut p4info_file = NamedTempFile::new().unwrap();
    p4info_file.write_all(P4INFO_JSON.as_bytes()).unwrap();
    let mut bfrt_file = NamedTempFile::new().unwrap();
    bfrt_file.write_all(BFRT_JSON.as_bytes()).unwrap();

    let p4info = P4Info::from_file(p4info_file.path()).unwrap();
    let bfrt_info = BfRtInfo::from_file(bfrt_file.path()).unwrap();

    let mapper = BfrtIdMapper::create_instance(0);
    mapper.push_pipeline_info(&p4info, &bfrt_info).unwrap();
    assert_eq!(mapper.get_bfrt_id(33572104).unwrap(), 49389765);
}

#[test]
fn test_snapshot_serializes() {
    let p4info = p4info_from(r#"{ "tables": [ { "preamble": { "id": 10, "name": "t1" } } ] }"#);
    let driver = MockDriver::new().with(ObjectClass::Table, 77, "t1");
    let mapper = BfrtIdMapper::create_instance(2);
    mapper.push_pipeline_info(&p4info, &driver).unwrap();

    let value = serde_json::to_value(mapper.snapshot()).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "device_id": 2,
            "generation": 1,
            "stale": false,
            "p4info_to_bfrt": { "10": 77 },
            "action_profile_to_selector": {}
        })
    );
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_readers() {
    let (p4info, bfrt_info) = load_fixture();
    let mapper = Arc::new(BfrtIdMapper::create_instance(0));
    mapper
        .push_forwarding_pipeline(&p4info, &bfrt_info, Some(CONTEXT_JSON))
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let mapper = Arc::clone(&mapper);
            thread::spawn(move || {
                for _ in 0..1000 {
                    assert_eq!(mapper.get_bfrt_id(33572104).unwrap(), 49389765);
                    assert_eq!(mapper.get_p4info_id(22310000).unwrap(), 16800567);
                    assert_eq!(mapper.get_action_selector_id(37829461).unwrap(), 37829462);
                    assert_eq!(mapper.get_action_profile_id(37829462).unwrap(), 37829461);
                    assert_eq!(
                        mapper.get_device_target(49389765).unwrap(),
                        DeviceTarget::all_pipes(0)
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_readers_never_see_mixed_generations() {
    let p4info_a =
        p4info_from(r#"{ "tables": [ { "preamble": { "id": 10, "name": "t1" } },
                                     { "preamble": { "id": 11, "name": "t2" } } ] }"#);
    let driver_a = MockDriver::new()
        .with(ObjectClass::Table, 100, "t1")
        .with(ObjectClass::Table, 101, "t2");
    let p4info_b =
        p4info_from(r#"{ "tables": [ { "preamble": { "id": 20, "name": "t1" } },
                                     { "preamble": { "id": 21, "name": "t2" } } ] }"#);
    let driver_b = MockDriver::new()
        .with(ObjectClass::Table, 200, "t1")
        .with(ObjectClass::Table, 201, "t2");

    let mapper = Arc::new(BfrtIdMapper::create_instance(0));
    mapper.push_pipeline_info(&p4info_a, &driver_a).unwrap();

    let done = Arc::new(AtomicBool::new(false));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let mapper = Arc::clone(&mapper);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::SeqCst) {
                    let snapshot = mapper.snapshot();
                    let pairs: Vec<_> = snapshot.p4info_to_bfrt.into_iter().collect();
                    assert!(
                        pairs == vec![(10, 100), (11, 101)] || pairs == vec![(20, 200), (21, 201)],
                        "torn read: {:?}",
                        pairs
                    );
                    assert!(!snapshot.stale);
                }
            })
        })
        .collect();

    for round in 0..200 {
        if round % 2 == 0 {
            mapper.push_pipeline_info(&p4info_b, &driver_b).unwrap();
        } else {
            mapper.push_pipeline_info(&p4info_a, &driver_a).unwrap();
        }
    }
    done.store(true, Ordering::SeqCst);

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(mapper.generation(), 201);
}
