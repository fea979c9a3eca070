use super::names::{enum_name, message_name, primitive, service_name, value_type};
use super::options::options_of;
use crate::filter::{Declaration, DescriptorFilter};
use crate::location::{options_field, LocationPath, Locations};
use prost_reflect::{
    EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FileDescriptor, Kind,
    MessageDescriptor, MethodDescriptor, OneofDescriptor, ServiceDescriptor,
};
use protoweave_api::{
    CallCardinality, EnumConstant, EnumType, Field, FieldType, File, MessageType, OneofGroup,
    PrimitiveType, ProtoFileHeader, ProtoOption, ProtoSourceFile, Rpc, Service, SyntaxVersion,
};

/// What every conversion within one file needs to know.
#[derive(Debug)]
pub struct FileScope {
    pub descriptor: FileDescriptor,
    pub file: File,
    pub locations: Locations,
}

impl FileScope {
    pub fn of(descriptor: &FileDescriptor) -> Self {
        Self {
            descriptor: descriptor.clone(),
            file: File::new(descriptor.name()),
            locations: Locations::of(descriptor.file_descriptor_proto()),
        }
    }

    pub fn header(&self) -> ProtoFileHeader {
        ProtoFileHeader {
            file: self.file.clone(),
            package: self.descriptor.package_name().to_string(),
            syntax: SyntaxVersion::parse(self.descriptor.file_descriptor_proto().syntax()),
            options: self.options(
                &self.descriptor.options(),
                &LocationPath::file(),
                options_field::FILE,
            ),
        }
    }

    fn options(
        &self,
        options: &prost_reflect::DynamicMessage,
        path: &LocationPath,
        field: i32,
    ) -> Vec<ProtoOption> {
        options_of(options, path, field, &self.locations)
    }

    pub fn message_options(&self, desc: &MessageDescriptor, path: &LocationPath) -> Vec<ProtoOption> {
        self.options(&desc.options(), path, options_field::MESSAGE)
    }

    pub fn field_options(&self, desc: &FieldDescriptor, path: &LocationPath) -> Vec<ProtoOption> {
        self.options(&desc.options(), path, options_field::FIELD)
    }

    pub fn oneof_options(&self, desc: &OneofDescriptor, path: &LocationPath) -> Vec<ProtoOption> {
        self.options(&desc.options(), path, options_field::ONEOF)
    }

    pub fn enum_options(&self, desc: &EnumDescriptor, path: &LocationPath) -> Vec<ProtoOption> {
        self.options(&desc.options(), path, options_field::ENUM)
    }

    pub fn constant_options(
        &self,
        desc: &EnumValueDescriptor,
        path: &LocationPath,
    ) -> Vec<ProtoOption> {
        self.options(&desc.options(), path, options_field::ENUM_VALUE)
    }

    pub fn service_options(&self, desc: &ServiceDescriptor, path: &LocationPath) -> Vec<ProtoOption> {
        self.options(&desc.options(), path, options_field::SERVICE)
    }

    pub fn rpc_options(&self, desc: &MethodDescriptor, path: &LocationPath) -> Vec<ProtoOption> {
        self.options(&desc.options(), path, options_field::METHOD)
    }
}

/// A oneof generated by protoc for a proto3 `optional` field.
pub fn is_synthetic(oneof: &OneofDescriptor) -> bool {
    oneof
        .fields()
        .all(|f| f.field_descriptor_proto().proto3_optional())
}

/// The oneof a field really belongs to, ignoring synthetic ones.
pub fn real_oneof(field: &FieldDescriptor) -> Option<OneofDescriptor> {
    field.containing_oneof().filter(|o| !is_synthetic(o))
}

/// Messages nested into the given one with their positional indexes, map entries excluded.
pub fn nested_messages(desc: &MessageDescriptor) -> Vec<(usize, MessageDescriptor)> {
    desc.child_messages()
        .enumerate()
        .filter(|(_, m)| !m.is_map_entry())
        .collect()
}

/// Fields of a message which are not members of a oneof group, with their indexes.
pub fn plain_fields(desc: &MessageDescriptor) -> Vec<(usize, FieldDescriptor)> {
    desc.fields()
        .enumerate()
        .filter(|(_, f)| real_oneof(f).is_none())
        .collect()
}

/// Real oneof groups of a message, with their indexes.
pub fn real_oneofs(desc: &MessageDescriptor) -> Vec<(usize, OneofDescriptor)> {
    desc.oneofs()
        .enumerate()
        .filter(|(_, o)| !is_synthetic(o))
        .collect()
}

/// Fields of a oneof group, with their indexes among the fields of the message.
pub fn oneof_fields(
    message: &MessageDescriptor,
    oneof: &OneofDescriptor,
) -> Vec<(usize, FieldDescriptor)> {
    message
        .fields()
        .enumerate()
        .filter(|(_, f)| {
            f.containing_oneof()
                .is_some_and(|o| o.name() == oneof.name())
        })
        .collect()
}

pub fn field_type(desc: &FieldDescriptor) -> FieldType {
    let kind = desc.kind();
    if desc.is_map() {
        if let Kind::Message(entry) = &kind {
            let key = primitive(&entry.map_entry_key_field().kind()).unwrap_or(PrimitiveType::String);
            let value = value_type(&entry.map_entry_value_field().kind());
            return FieldType::Map { key, value };
        }
    }
    if desc.is_list() {
        FieldType::List(value_type(&kind))
    } else {
        FieldType::Single(value_type(&kind))
    }
}

pub fn field(
    scope: &FileScope,
    desc: &FieldDescriptor,
    index: usize,
    path: &LocationPath,
) -> Field {
    Field {
        name: desc.name().to_string(),
        number: desc.number(),
        order_of_declaration: u32::try_from(index).unwrap_or(u32::MAX),
        declaring_type: message_name(&desc.parent_message()),
        enclosing_oneof: real_oneof(desc).map(|o| o.name().to_string()),
        field_type: field_type(desc),
        options: scope.field_options(desc, path),
        doc: scope.locations.doc(path),
        span: scope.locations.span(path),
    }
}

pub fn oneof_group(
    scope: &FileScope,
    message: &MessageDescriptor,
    message_path: &LocationPath,
    desc: &OneofDescriptor,
    index: usize,
    filter: &DescriptorFilter,
) -> OneofGroup {
    let path = &message_path.oneof(index);
    OneofGroup {
        name: desc.name().to_string(),
        fields: oneof_fields(message, desc)
            .into_iter()
            .filter(|(_, f)| filter.accepts(Declaration::Field(f)))
            .map(|(i, f)| field(scope, &f, i, &message_path.field(i)))
            .collect(),
        options: scope.oneof_options(desc, path),
        doc: scope.locations.doc(path),
        span: scope.locations.span(path),
    }
}

/// Builds the complete message type, with members that pass the filter.
pub fn message_type(
    scope: &FileScope,
    desc: &MessageDescriptor,
    path: &LocationPath,
    filter: &DescriptorFilter,
) -> MessageType {
    let name = message_name(desc);
    MessageType {
        file: scope.file.clone(),
        declaring_type: name.declaring_type(),
        fields: plain_fields(desc)
            .into_iter()
            .filter(|(_, f)| filter.accepts(Declaration::Field(f)))
            .map(|(i, f)| field(scope, &f, i, &path.field(i)))
            .collect(),
        oneofs: real_oneofs(desc)
            .into_iter()
            .filter(|(_, o)| filter.accepts(Declaration::Oneof(o)))
            .map(|(i, o)| oneof_group(scope, desc, path, &o, i, filter))
            .collect(),
        nested_types: nested_messages(desc)
            .into_iter()
            .filter(|(_, m)| filter.accepts(Declaration::Message(m)))
            .map(|(_, m)| message_name(&m))
            .collect(),
        nested_enums: desc
            .child_enums()
            .filter(|e| filter.accepts(Declaration::Enum(e)))
            .map(|e| enum_name(&e))
            .collect(),
        options: scope.message_options(desc, path),
        doc: scope.locations.doc(path),
        span: scope.locations.span(path),
        name,
    }
}

pub fn enum_constant(
    scope: &FileScope,
    desc: &EnumValueDescriptor,
    index: usize,
    path: &LocationPath,
) -> EnumConstant {
    EnumConstant {
        name: desc.name().to_string(),
        number: desc.number(),
        order_of_declaration: u32::try_from(index).unwrap_or(u32::MAX),
        options: scope.constant_options(desc, path),
        doc: scope.locations.doc(path),
        span: scope.locations.span(path),
    }
}

pub fn enum_type(
    scope: &FileScope,
    desc: &EnumDescriptor,
    path: &LocationPath,
    filter: &DescriptorFilter,
) -> EnumType {
    let name = enum_name(desc);
    EnumType {
        file: scope.file.clone(),
        declaring_type: name.declaring_type(),
        constants: desc
            .values()
            .enumerate()
            .filter(|(_, v)| filter.accepts(Declaration::EnumValue(v)))
            .map(|(i, v)| enum_constant(scope, &v, i, &path.enum_value(i)))
            .collect(),
        options: scope.enum_options(desc, path),
        doc: scope.locations.doc(path),
        span: scope.locations.span(path),
        name,
    }
}

pub fn rpc(scope: &FileScope, desc: &MethodDescriptor, path: &LocationPath) -> Rpc {
    Rpc {
        name: desc.name().to_string(),
        service: service_name(&desc.parent_service()),
        request_type: message_name(&desc.input()),
        response_type: message_name(&desc.output()),
        cardinality: CallCardinality::from_streaming(
            desc.is_client_streaming(),
            desc.is_server_streaming(),
        ),
        options: scope.rpc_options(desc, path),
        doc: scope.locations.doc(path),
        span: scope.locations.span(path),
    }
}

pub fn service(
    scope: &FileScope,
    desc: &ServiceDescriptor,
    path: &LocationPath,
    filter: &DescriptorFilter,
) -> Service {
    Service {
        name: service_name(desc),
        file: scope.file.clone(),
        rpcs: desc
            .methods()
            .enumerate()
            .filter(|(_, m)| filter.accepts(Declaration::Method(m)))
            .map(|(i, m)| rpc(scope, &m, &path.method(i)))
            .collect(),
        options: scope.service_options(desc, path),
        doc: scope.locations.doc(path),
        span: scope.locations.span(path),
    }
}

/// Builds the whole record of a file at once, nested declarations included.
pub fn source_file(scope: &FileScope, filter: &DescriptorFilter) -> ProtoSourceFile {
    let mut file = ProtoSourceFile::new(scope.header());
    for (i, desc) in scope.descriptor.messages().enumerate() {
        if filter.accepts(Declaration::Message(&desc)) {
            collect_message(scope, &desc, &LocationPath::message(i), filter, &mut file);
        }
    }
    for (i, desc) in scope.descriptor.enums().enumerate() {
        if filter.accepts(Declaration::Enum(&desc)) {
            let e = enum_type(scope, &desc, &LocationPath::enum_type(i), filter);
            file.enums.insert(e.name.type_url(), e);
        }
    }
    for (i, desc) in scope.descriptor.services().enumerate() {
        if filter.accepts(Declaration::Service(&desc)) {
            let s = service(scope, &desc, &LocationPath::service(i), filter);
            file.services.insert(s.name.type_url(), s);
        }
    }
    file
}

/// Adds the message, then its nested messages and enums, depth first.
fn collect_message(
    scope: &FileScope,
    desc: &MessageDescriptor,
    path: &LocationPath,
    filter: &DescriptorFilter,
    file: &mut ProtoSourceFile,
) {
    let message = message_type(scope, desc, path, filter);
    file.types.insert(message.name.type_url(), message);
    for (i, nested) in nested_messages(desc) {
        if filter.accepts(Declaration::Message(&nested)) {
            collect_message(scope, &nested, &path.nested_message(i), filter, file);
        }
    }
    for (i, nested) in desc.child_enums().enumerate() {
        if filter.accepts(Declaration::Enum(&nested)) {
            let e = enum_type(scope, &nested, &path.nested_enum(i), filter);
            file.enums.insert(e.name.type_url(), e);
        }
    }
}
