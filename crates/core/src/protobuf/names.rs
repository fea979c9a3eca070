use prost_reflect::{EnumDescriptor, Kind, MessageDescriptor, ServiceDescriptor};
use protoweave_api::{PrimitiveType, ServiceName, Type, TypeName};

pub fn message_name(desc: &MessageDescriptor) -> TypeName {
    let mut nesting = Vec::new();
    let mut parent = desc.parent_message();
    while let Some(p) = parent {
        nesting.push(p.name().to_string());
        parent = p.parent_message();
    }
    nesting.reverse();
    TypeName {
        nesting_type_names: nesting,
        ..TypeName::new(desc.package_name(), desc.name())
    }
}

pub fn enum_name(desc: &EnumDescriptor) -> TypeName {
    match desc.parent_message() {
        Some(parent) => message_name(&parent).nested(desc.name()),
        None => TypeName::new(desc.package_name(), desc.name()),
    }
}

pub fn service_name(desc: &ServiceDescriptor) -> ServiceName {
    ServiceName::new(desc.package_name(), desc.name())
}

pub fn primitive(kind: &Kind) -> Option<PrimitiveType> {
    let primitive = match kind {
        Kind::Double => PrimitiveType::Double,
        Kind::Float => PrimitiveType::Float,
        Kind::Int64 => PrimitiveType::Int64,
        Kind::Uint64 => PrimitiveType::Uint64,
        Kind::Int32 => PrimitiveType::Int32,
        Kind::Fixed64 => PrimitiveType::Fixed64,
        Kind::Fixed32 => PrimitiveType::Fixed32,
        Kind::Bool => PrimitiveType::Bool,
        Kind::String => PrimitiveType::String,
        Kind::Bytes => PrimitiveType::Bytes,
        Kind::Uint32 => PrimitiveType::Uint32,
        Kind::Sfixed32 => PrimitiveType::Sfixed32,
        Kind::Sfixed64 => PrimitiveType::Sfixed64,
        Kind::Sint32 => PrimitiveType::Sint32,
        Kind::Sint64 => PrimitiveType::Sint64,
        Kind::Message(_) | Kind::Enum(_) => return None,
    };
    Some(primitive)
}

pub fn value_type(kind: &Kind) -> Type {
    match kind {
        Kind::Message(desc) => Type::Message(message_name(desc)),
        Kind::Enum(desc) => Type::Enum(enum_name(desc)),
        other => Type::Primitive(primitive(other).unwrap_or(PrimitiveType::Bytes)),
    }
}

/// Proto name of a kind, e.g. `int32` or `acme.Zoo`.
pub fn kind_name(kind: &Kind) -> String {
    match kind {
        Kind::Message(desc) => desc.full_name().to_string(),
        Kind::Enum(desc) => desc.full_name().to_string(),
        other => primitive(other)
            .map(|p| p.proto_name().to_string())
            .unwrap_or_default(),
    }
}
