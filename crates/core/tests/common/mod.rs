#![allow(dead_code)]

use prost_reflect::DescriptorPool;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::source_code_info::Location;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FieldOptions, FileDescriptorProto, FileDescriptorSet, FileOptions, MessageOptions,
    MethodDescriptorProto, OneofDescriptorProto, ServiceDescriptorProto, SourceCodeInfo,
    UninterpretedOption,
};
use protoweave_api::File;
use protoweave_core::CodeGenerationRequest;

pub const ZOO: &str = "acme/zoo.proto";
pub const TYPES: &str = "acme/types.proto";

fn field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

fn typed(name: &str, number: i32, ty: Type, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..field(name, number, ty)
    }
}

fn repeated(mut field: FieldDescriptorProto) -> FieldDescriptorProto {
    field.label = Some(Label::Repeated as i32);
    field
}

fn in_oneof(mut field: FieldDescriptorProto, index: i32) -> FieldDescriptorProto {
    field.oneof_index = Some(index);
    field
}

fn enum_type(name: &str, values: &[&str]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_string()),
        value: values
            .iter()
            .enumerate()
            .map(|(i, v)| EnumValueDescriptorProto {
                name: Some(v.to_string()),
                number: Some(i as i32),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn oneof(name: &str) -> OneofDescriptorProto {
    OneofDescriptorProto {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

fn location(path: Vec<i32>, span: Vec<i32>, leading: &str) -> Location {
    Location {
        path,
        span,
        leading_comments: Some(leading.to_string()),
        trailing_comments: None,
        leading_detached_comments: Vec::new(),
    }
}

/// `acme/types.proto`: `message Address { string street = 1; }`
pub fn types_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(TYPES.to_string()),
        package: Some("acme".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("Address".to_string()),
            field: vec![field("street", 1, Type::String)],
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// `acme/zoo.proto`, roughly:
///
/// ```proto
/// option java_package = "com.acme";
///
/// // A zoo.
/// message Zoo {
///     option deprecated = true;
///     string name = 1 [deprecated = true];
///     repeated Animal animals = 2;
///     map<string, Animal> by_name = 3;
///     oneof location {
///         string city = 4;
///         int32 zone = 5;
///     }
///     optional string motto = 6;
///     Address address = 7;
///     message Animal {
///         // Carries the same uninterpreted option twice.
///         string name = 1;
///         Kind kind = 2;
///         enum Kind { KIND_UNKNOWN = 0; CAT = 1; }
///     }
///     enum Status { OPEN = 0; CLOSED = 1; }
/// }
///
/// enum Size { SMALL = 0; LARGE = 1; }
///
/// service ZooService {
///     rpc Visit(Zoo) returns (Zoo);
///     rpc Watch(stream Zoo) returns (stream Zoo);
/// }
/// ```
pub fn zoo_file() -> FileDescriptorProto {
    let by_name_entry = DescriptorProto {
        name: Some("ByNameEntry".to_string()),
        field: vec![
            field("key", 1, Type::String),
            typed("value", 2, Type::Message, ".acme.Zoo.Animal"),
        ],
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    };
    let tag = UninterpretedOption {
        identifier_value: Some("cat".to_string()),
        ..Default::default()
    };
    let animal = DescriptorProto {
        name: Some("Animal".to_string()),
        field: vec![
            FieldDescriptorProto {
                options: Some(FieldOptions {
                    uninterpreted_option: vec![tag.clone(), tag],
                    ..Default::default()
                }),
                ..field("name", 1, Type::String)
            },
            typed("kind", 2, Type::Enum, ".acme.Zoo.Animal.Kind"),
        ],
        enum_type: vec![enum_type("Kind", &["KIND_UNKNOWN", "CAT"])],
        ..Default::default()
    };
    let mut motto = in_oneof(field("motto", 6, Type::String), 1);
    motto.proto3_optional = Some(true);

    let zoo = DescriptorProto {
        name: Some("Zoo".to_string()),
        field: vec![
            FieldDescriptorProto {
                options: Some(FieldOptions {
                    deprecated: Some(true),
                    ..Default::default()
                }),
                ..field("name", 1, Type::String)
            },
            repeated(typed("animals", 2, Type::Message, ".acme.Zoo.Animal")),
            repeated(typed("by_name", 3, Type::Message, ".acme.Zoo.ByNameEntry")),
            in_oneof(field("city", 4, Type::String), 0),
            in_oneof(field("zone", 5, Type::Int32), 0),
            motto,
            typed("address", 7, Type::Message, ".acme.Address"),
        ],
        nested_type: vec![animal, by_name_entry],
        enum_type: vec![enum_type("Status", &["OPEN", "CLOSED"])],
        oneof_decl: vec![oneof("location"), oneof("_motto")],
        options: Some(MessageOptions {
            deprecated: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    };

    let service = ServiceDescriptorProto {
        name: Some("ZooService".to_string()),
        method: vec![
            MethodDescriptorProto {
                name: Some("Visit".to_string()),
                input_type: Some(".acme.Zoo".to_string()),
                output_type: Some(".acme.Zoo".to_string()),
                ..Default::default()
            },
            MethodDescriptorProto {
                name: Some("Watch".to_string()),
                input_type: Some(".acme.Zoo".to_string()),
                output_type: Some(".acme.Zoo".to_string()),
                client_streaming: Some(true),
                server_streaming: Some(true),
                ..Default::default()
            },
        ],
        ..Default::default()
    };

    FileDescriptorProto {
        name: Some(ZOO.to_string()),
        package: Some("acme".to_string()),
        syntax: Some("proto3".to_string()),
        dependency: vec![TYPES.to_string()],
        message_type: vec![zoo],
        enum_type: vec![enum_type("Size", &["SMALL", "LARGE"])],
        service: vec![service],
        options: Some(FileOptions {
            java_package: Some("com.acme".to_string()),
            ..Default::default()
        }),
        source_code_info: Some(SourceCodeInfo {
            location: vec![
                location(vec![4, 0], vec![4, 0, 20, 1], " A zoo.\n"),
                location(vec![4, 0, 2, 0], vec![6, 4, 40], " The name.\n"),
            ],
        }),
        ..Default::default()
    }
}

pub fn pool() -> DescriptorPool {
    DescriptorPool::from_file_descriptor_set(FileDescriptorSet {
        file: vec![types_file(), zoo_file()],
    })
    .expect("fixture descriptors are valid")
}

pub fn request() -> CodeGenerationRequest {
    CodeGenerationRequest::from_pool(pool(), [ZOO]).expect("fixture request is valid")
}

pub fn zoo() -> File {
    File::new(ZOO)
}
