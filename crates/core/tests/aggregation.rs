mod common;

use common::{TYPES, ZOO};
use protoweave_api::{File, TypeName};
use protoweave_core::protobuf::{FileScope, convert};
use protoweave_core::{AstAggregator, CompilerEvent, CompilerEvents, DescriptorFilter};
use protoweave_ingest::{EventBus, EventSink, InMemoryEventBus, IngestError, RunId};
use std::sync::Arc;

fn events() -> Vec<CompilerEvent> {
    let request = common::request();
    CompilerEvents::new(
        request.pool(),
        request.files_to_generate(),
        DescriptorFilter::accept_all(),
    )
    .collect()
}

fn aggregate(run: &str, events: &[CompilerEvent]) -> AstAggregator {
    let aggregator = AstAggregator::in_memory(RunId::new(run));
    for event in events {
        aggregator.apply(event).unwrap();
    }
    aggregator
}

#[test]
fn test_aggregated_file_matches_direct_conversion() {
    let aggregator = aggregate("r1", &events());
    let files = aggregator.files().unwrap();
    assert_eq!(files.len(), 1);

    let pool = common::pool();
    let descriptor = pool.get_file_by_name(ZOO).unwrap();
    let expected = convert::source_file(&FileScope::of(&descriptor), &DescriptorFilter::accept_all());
    assert_eq!(files[0], expected);
    assert_eq!(
        files[0].header.options.len(),
        1,
        "file options are collected once"
    );
}

#[test]
fn test_aggregated_types_equal_discovered_ones() {
    let all = events();
    let aggregator = aggregate("r1", &all);
    let file = aggregator.file(&File::new(ZOO)).unwrap().unwrap();
    for event in &all {
        if let CompilerEvent::TypeDiscovered { message, .. } = event {
            assert_eq!(file.message(&message.name.type_url()), Some(message));
        }
        if let CompilerEvent::EnumDiscovered { enum_type, .. } = event {
            assert_eq!(file.enum_type(&enum_type.name.type_url()), Some(enum_type));
        }
        if let CompilerEvent::ServiceDiscovered { service, .. } = event {
            assert_eq!(file.service(&service.name.type_url()), Some(service));
        }
    }
}

#[test]
fn test_replay_into_fresh_aggregates_is_idempotent() {
    let all = events();
    let zoo_events: Vec<CompilerEvent> = all
        .iter()
        .filter(|e| e.file().path == ZOO)
        .cloned()
        .collect();
    let first = aggregate("r1", &zoo_events).files().unwrap();
    let second = aggregate("r2", &zoo_events).files().unwrap();
    assert_eq!(first, second);

    let replayed = aggregate("r3", &[zoo_events.clone(), zoo_events].concat());
    assert_eq!(replayed.files().unwrap(), first);
}

#[test]
fn test_dependencies_are_kept_apart() {
    let aggregator = aggregate("r1", &events());
    let dependencies = aggregator.dependencies().unwrap();
    assert_eq!(dependencies.len(), 1);
    assert_eq!(dependencies[0].file(), &File::new(TYPES));
    assert!(aggregator.file(&File::new(TYPES)).unwrap().is_none());
}

#[test]
fn test_events_out_of_order_are_rejected() {
    let all = events();
    let type_entered = all
        .iter()
        .find(|e| matches!(e, CompilerEvent::TypeEntered { .. }))
        .unwrap();

    let aggregator = AstAggregator::in_memory(RunId::new("r1"));
    assert!(matches!(
        aggregator.apply(type_entered),
        Err(IngestError::Invariant(_))
    ));

    let file_entered = all
        .iter()
        .find(|e| matches!(e, CompilerEvent::FileEntered { .. }))
        .unwrap();
    aggregator.apply(file_entered).unwrap();
    let error = aggregator.apply(type_entered).unwrap_err();
    assert!(error.to_string().contains("acme.Zoo"));

    let stray_field = CompilerEvent::FieldExited {
        file: File::new(ZOO),
        type_name: TypeName::new("acme", "Zoo"),
        field: "name".to_string(),
    };
    assert!(matches!(
        aggregator.apply(&stray_field),
        Err(IngestError::Invariant(_))
    ));
}

#[test]
fn test_aggregation_through_the_bus() {
    let run = RunId::new("bus-run");
    let bus: InMemoryEventBus<CompilerEvent> = InMemoryEventBus::new();
    let aggregator = Arc::new(AstAggregator::in_memory(run.clone()));
    bus.open(&run).unwrap();
    bus.subscribe(&run, aggregator.clone()).unwrap();
    for event in events() {
        bus.publish(&run, event).unwrap();
    }
    assert!(bus.close(&run));

    let direct = aggregate("direct", &events());
    assert_eq!(aggregator.files().unwrap(), direct.files().unwrap());
    assert_eq!(aggregator.dependencies().unwrap(), direct.dependencies().unwrap());

    aggregator.clear();
    assert!(aggregator.files().unwrap().is_empty());
}
