use super::{Doc, File, ProtoOption, Span, TypeName};
use serde::{Deserialize, Serialize};

/// Scalar types of the protobuf language.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Bytes,
    Uint32,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

impl PrimitiveType {
    pub fn proto_name(&self) -> &'static str {
        match self {
            PrimitiveType::Double => "double",
            PrimitiveType::Float => "float",
            PrimitiveType::Int64 => "int64",
            PrimitiveType::Uint64 => "uint64",
            PrimitiveType::Int32 => "int32",
            PrimitiveType::Fixed64 => "fixed64",
            PrimitiveType::Fixed32 => "fixed32",
            PrimitiveType::Bool => "bool",
            PrimitiveType::String => "string",
            PrimitiveType::Bytes => "bytes",
            PrimitiveType::Uint32 => "uint32",
            PrimitiveType::Sfixed32 => "sfixed32",
            PrimitiveType::Sfixed64 => "sfixed64",
            PrimitiveType::Sint32 => "sint32",
            PrimitiveType::Sint64 => "sint64",
        }
    }
}

/// Type of a single value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Primitive(PrimitiveType),
    Message(TypeName),
    Enum(TypeName),
}

impl Type {
    pub fn is_message(&self) -> bool {
        matches!(self, Type::Message(_))
    }

    pub fn message_name(&self) -> Option<&TypeName> {
        match self {
            Type::Message(name) => Some(name),
            _ => None,
        }
    }
}

/// Type of a field, which also carries its cardinality.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Single(Type),
    List(Type),
    Map { key: PrimitiveType, value: Type },
}

impl FieldType {
    /// Type of the values stored in the field.
    pub fn value_type(&self) -> &Type {
        match self {
            FieldType::Single(t) | FieldType::List(t) => t,
            FieldType::Map { value, .. } => value,
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, FieldType::Single(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FieldType::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, FieldType::Map { .. })
    }

    /// Name of the message type if the field holds exactly one message.
    pub fn single_message(&self) -> Option<&TypeName> {
        match self {
            FieldType::Single(Type::Message(name)) => Some(name),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub number: u32,
    pub order_of_declaration: u32,
    pub declaring_type: TypeName,
    /// Name of the oneof group the field belongs to.
    pub enclosing_oneof: Option<String>,
    pub field_type: FieldType,
    pub options: Vec<ProtoOption>,
    pub doc: Doc,
    pub span: Span,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OneofGroup {
    pub name: String,
    pub fields: Vec<Field>,
    pub options: Vec<ProtoOption>,
    pub doc: Doc,
    pub span: Span,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageType {
    pub name: TypeName,
    pub file: File,
    pub declaring_type: Option<TypeName>,
    /// Fields that are not members of any oneof group, in declaration order.
    pub fields: Vec<Field>,
    pub oneofs: Vec<OneofGroup>,
    pub nested_types: Vec<TypeName>,
    pub nested_enums: Vec<TypeName>,
    pub options: Vec<ProtoOption>,
    pub doc: Doc,
    pub span: Span,
}

impl MessageType {
    /// Every field of the message, oneof members included, in declaration order.
    pub fn all_fields(&self) -> Vec<&Field> {
        let mut all: Vec<&Field> = self
            .fields
            .iter()
            .chain(self.oneofs.iter().flat_map(|o| o.fields.iter()))
            .collect();
        all.sort_by_key(|f| f.order_of_declaration);
        all
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .chain(self.oneofs.iter().flat_map(|o| o.fields.iter()))
            .find(|f| f.name == name)
    }

    pub fn oneof(&self, name: &str) -> Option<&OneofGroup> {
        self.oneofs.iter().find(|o| o.name == name)
    }

    pub fn oneof_mut(&mut self, name: &str) -> Option<&mut OneofGroup> {
        self.oneofs.iter_mut().find(|o| o.name == name)
    }

    /// Copy of the message without any members, used as the starting point of aggregation.
    pub fn skeleton(&self) -> MessageType {
        MessageType {
            fields: Vec::new(),
            oneofs: Vec::new(),
            nested_types: Vec::new(),
            nested_enums: Vec::new(),
            options: Vec::new(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, order: u32, oneof: Option<&str>) -> Field {
        Field {
            name: name.to_string(),
            number: order + 1,
            order_of_declaration: order,
            declaring_type: TypeName::new("acme", "Order"),
            enclosing_oneof: oneof.map(str::to_string),
            field_type: FieldType::Single(Type::Primitive(PrimitiveType::String)),
            options: Vec::new(),
            doc: Doc::default(),
            span: Span::default(),
        }
    }

    #[test]
    fn test_all_fields_keeps_declaration_order() {
        let message = MessageType {
            name: TypeName::new("acme", "Order"),
            file: File::new("acme/order.proto"),
            declaring_type: None,
            fields: vec![field("id", 0, None), field("note", 3, None)],
            oneofs: vec![OneofGroup {
                name: "payment".to_string(),
                fields: vec![field("card", 1, Some("payment")), field("cash", 2, Some("payment"))],
                options: Vec::new(),
                doc: Doc::default(),
                span: Span::default(),
            }],
            nested_types: Vec::new(),
            nested_enums: Vec::new(),
            options: Vec::new(),
            doc: Doc::default(),
            span: Span::default(),
        };

        let names: Vec<&str> = message.all_fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "card", "cash", "note"]);
        assert_eq!(message.field("cash").map(|f| f.number), Some(3));
        assert!(message.skeleton().all_fields().is_empty());
    }

    #[test]
    fn test_field_type_value_type() {
        let map = FieldType::Map {
            key: PrimitiveType::String,
            value: Type::Message(TypeName::new("acme", "Item")),
        };
        assert!(map.is_map());
        assert!(map.value_type().is_message());
        assert_eq!(map.single_message(), None);
    }
}
