mod common;

use common::{TYPES, ZOO};
use protoweave_api::{
    CallCardinality, FieldType, File, OptionValue, PrimitiveType, Type, TypeName,
};
use protoweave_core::{CompilerEvent, CompilerEvents, Declaration, DescriptorFilter};
use std::collections::HashSet;

fn events(filter: DescriptorFilter) -> Vec<CompilerEvent> {
    let request = common::request();
    CompilerEvents::new(request.pool(), request.files_to_generate(), filter).collect()
}

fn zoo_name() -> TypeName {
    TypeName::new("acme", "Zoo")
}

fn position(events: &[CompilerEvent], predicate: impl Fn(&CompilerEvent) -> bool) -> usize {
    events
        .iter()
        .position(predicate)
        .expect("the event is present")
}

fn names_type(event: &CompilerEvent, name: &TypeName) -> bool {
    use CompilerEvent::*;
    match event {
        TypeDiscovered { message, .. } => &message.name == name,
        TypeEntered { type_name, .. }
        | TypeOptionDiscovered { type_name, .. }
        | TypeExited { type_name, .. }
        | OneofGroupEntered { type_name, .. }
        | OneofOptionDiscovered { type_name, .. }
        | OneofGroupExited { type_name, .. }
        | FieldEntered { type_name, .. }
        | FieldOptionDiscovered { type_name, .. }
        | FieldExited { type_name, .. } => type_name == name,
        _ => false,
    }
}

#[test]
fn test_sequence_is_deterministic() {
    let first = events(DescriptorFilter::accept_all());
    let second = events(DescriptorFilter::accept_all());
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_no_event_is_emitted_twice() {
    let all = events(DescriptorFilter::accept_all());
    let distinct: HashSet<String> = all
        .iter()
        .map(|e| serde_json::to_string(e).unwrap())
        .collect();
    assert_eq!(distinct.len(), all.len());
}

#[test]
fn test_equal_elements_of_a_repeated_option_stay_apart() {
    let all = events(DescriptorFilter::accept_all());
    let animal = zoo_name().nested("Animal");
    let options: Vec<(usize, &OptionValue)> = all
        .iter()
        .filter_map(|e| match e {
            CompilerEvent::FieldOptionDiscovered {
                type_name,
                field,
                option,
                ..
            } if *type_name == animal && field == "name" => Some((option.element, &option.value)),
            _ => None,
        })
        .collect();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].0, 0);
    assert_eq!(options[1].0, 1);
    assert_eq!(options[0].1, options[1].1);
}

#[test]
fn test_dependencies_come_first_and_whole() {
    let all = events(DescriptorFilter::accept_all());
    match &all[0] {
        CompilerEvent::DependencyDiscovered { file, content } => {
            assert_eq!(file, &File::new(TYPES));
            assert!(content.message(&TypeName::new("acme", "Address").type_url()).is_some());
        }
        other => panic!("unexpected first event {}", other.kind()),
    }
    assert_eq!(all.iter().filter(|e| e.is_dependency()).count(), 1);
    assert!(matches!(&all[1], CompilerEvent::FileEntered { header } if header.file.path == ZOO));
    assert!(matches!(all.last(), Some(CompilerEvent::FileExited { file }) if file.path == ZOO));
}

#[test]
fn test_file_options_follow_file_entered() {
    let all = events(DescriptorFilter::accept_all());
    match &all[2] {
        CompilerEvent::FileOptionDiscovered { option, .. } => {
            assert_eq!(option.name, "java_package");
            assert_eq!(option.value, OptionValue::String("com.acme".to_string()));
        }
        other => panic!("unexpected event {}", other.kind()),
    }
}

#[test]
fn test_message_events_are_nested() {
    let all = events(DescriptorFilter::accept_all());
    let zoo = zoo_name();
    let animal = zoo.nested("Animal");

    let discovered = position(&all, |e| {
        matches!(e, CompilerEvent::TypeDiscovered { message, .. } if message.name == zoo)
    });
    let entered = position(&all, |e| {
        matches!(e, CompilerEvent::TypeEntered { type_name, .. } if *type_name == zoo)
    });
    let exited = position(&all, |e| {
        matches!(e, CompilerEvent::TypeExited { type_name, .. } if *type_name == zoo)
    });
    assert_eq!(entered, discovered + 1);

    for (i, event) in all.iter().enumerate() {
        if names_type(event, &zoo) && i != discovered && i != entered && i != exited {
            assert!(entered < i && i < exited, "{} escapes Zoo", event.kind());
        }
    }

    let oneof_exited = position(&all, |e| matches!(e, CompilerEvent::OneofGroupExited { .. }));
    let animal_entered = position(&all, |e| {
        matches!(e, CompilerEvent::TypeEntered { type_name, .. } if *type_name == animal)
    });
    let animal_exited = position(&all, |e| {
        matches!(e, CompilerEvent::TypeExited { type_name, .. } if *type_name == animal)
    });
    let status = position(&all, |e| {
        matches!(e, CompilerEvent::EnumDiscovered { enum_type, .. } if enum_type.name == zoo.nested("Status"))
    });
    assert!(oneof_exited < animal_entered);
    assert!(animal_entered < animal_exited && animal_exited < status && status < exited);

    let size = position(&all, |e| {
        matches!(e, CompilerEvent::EnumDiscovered { enum_type, .. } if enum_type.name.simple_name == "Size")
    });
    let service = position(&all, |e| matches!(e, CompilerEvent::ServiceDiscovered { .. }));
    assert!(exited < size && size < service);
}

#[test]
fn test_plain_fields_precede_oneofs() {
    let all = events(DescriptorFilter::accept_all());
    let zoo = zoo_name();
    let fields: Vec<(&str, Option<&str>)> = all
        .iter()
        .filter_map(|e| match e {
            CompilerEvent::FieldEntered {
                type_name, field, ..
            } if *type_name == zoo => Some((field.name.as_str(), field.enclosing_oneof.as_deref())),
            _ => None,
        })
        .collect();
    assert_eq!(
        fields,
        vec![
            ("name", None),
            ("animals", None),
            ("by_name", None),
            ("motto", None),
            ("address", None),
            ("city", Some("location")),
            ("zone", Some("location")),
        ]
    );
}

#[test]
fn test_synthetic_oneofs_and_map_entries_are_hidden() {
    let all = events(DescriptorFilter::accept_all());
    let groups: Vec<&str> = all
        .iter()
        .filter_map(|e| match e {
            CompilerEvent::OneofGroupEntered { group, .. } => Some(group.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(groups, vec!["location"]);

    let types: Vec<String> = all
        .iter()
        .filter_map(|e| match e {
            CompilerEvent::TypeDiscovered { message, .. } => Some(message.name.qualified_name()),
            _ => None,
        })
        .collect();
    assert_eq!(types, vec!["acme.Zoo", "acme.Zoo.Animal"]);
}

#[test]
fn test_discovered_type_is_complete() {
    let all = events(DescriptorFilter::accept_all());
    let zoo = all
        .iter()
        .find_map(|e| match e {
            CompilerEvent::TypeDiscovered { message, .. } if message.name == zoo_name() => {
                Some(message.clone())
            }
            _ => None,
        })
        .unwrap();

    assert_eq!(zoo.file, File::new(ZOO));
    assert_eq!(zoo.nested_types, vec![zoo_name().nested("Animal")]);
    assert_eq!(zoo.nested_enums, vec![zoo_name().nested("Status")]);
    assert_eq!(zoo.doc.leading_comment, " A zoo.\n");
    assert_eq!(zoo.span.start_line, 5);
    assert_eq!(zoo.options[0].name, "deprecated");
    assert_eq!(zoo.options[0].value, OptionValue::Bool(true));

    let name = zoo.field("name").unwrap();
    assert_eq!(name.doc.leading_comment, " The name.\n");
    assert_eq!(name.options.len(), 1);
    assert_eq!(name.order_of_declaration, 0);

    let animal = Type::Message(zoo_name().nested("Animal"));
    assert_eq!(zoo.field("animals").unwrap().field_type, FieldType::List(animal.clone()));
    assert_eq!(
        zoo.field("by_name").unwrap().field_type,
        FieldType::Map {
            key: PrimitiveType::String,
            value: animal
        }
    );
    assert_eq!(
        zoo.field("zone").unwrap().field_type,
        FieldType::Single(Type::Primitive(PrimitiveType::Int32))
    );
    assert_eq!(
        zoo.field("address").unwrap().field_type,
        FieldType::Single(Type::Message(TypeName::new("acme", "Address")))
    );
    assert_eq!(zoo.field("city").unwrap().order_of_declaration, 3);
}

#[test]
fn test_enum_and_service_bursts() {
    let all = events(DescriptorFilter::accept_all());
    let start = position(&all, |e| {
        matches!(e, CompilerEvent::EnumDiscovered { enum_type, .. } if enum_type.name.simple_name == "Size")
    });
    let kinds: Vec<&str> = all[start..start + 8].iter().map(CompilerEvent::kind).collect();
    assert_eq!(
        kinds,
        vec![
            "EnumDiscovered",
            "EnumEntered",
            "EnumConstantEntered",
            "EnumConstantExited",
            "EnumConstantEntered",
            "EnumConstantExited",
            "EnumExited",
            "ServiceDiscovered",
        ]
    );

    let rpcs: Vec<(String, CallCardinality)> = all
        .iter()
        .filter_map(|e| match e {
            CompilerEvent::RpcEntered { rpc, .. } => Some((rpc.name.clone(), rpc.cardinality)),
            _ => None,
        })
        .collect();
    assert_eq!(
        rpcs,
        vec![
            ("Visit".to_string(), CallCardinality::Unary),
            ("Watch".to_string(), CallCardinality::Bidirectional),
        ]
    );
}

#[test]
fn test_filter_excludes_declarations_with_their_children() {
    let filter = DescriptorFilter::new(|d| {
        !matches!(d, Declaration::Message(m) if m.name() == "Animal")
            && !matches!(d, Declaration::Field(f) if f.name() == "city")
    });
    let all = events(filter);
    let animal = zoo_name().nested("Animal");

    assert!(!all.iter().any(|e| names_type(e, &animal)));
    assert!(!all.iter().any(|e| matches!(
        e,
        CompilerEvent::EnumDiscovered { enum_type, .. } if enum_type.name.simple_name == "Kind"
    )));
    assert!(!all.iter().any(|e| matches!(
        e,
        CompilerEvent::FieldEntered { field, .. } if field.name == "city"
    )));

    let zoo = all
        .iter()
        .find_map(|e| match e {
            CompilerEvent::TypeDiscovered { message, .. } => Some(message),
            _ => None,
        })
        .unwrap();
    assert!(zoo.nested_types.is_empty());
    assert!(zoo.field("city").is_none());
    assert_eq!(zoo.oneof("location").unwrap().fields.len(), 1);
}

#[test]
fn test_rejected_file_produces_only_dependencies() {
    let filter = DescriptorFilter::new(|d| !matches!(d, Declaration::File(_)));
    let all = events(filter);
    assert_eq!(all.len(), 1);
    assert!(all[0].is_dependency());
}
