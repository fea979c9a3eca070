use super::names::kind_name;
use crate::location::{LocationPath, Locations};
use prost_reflect::{DynamicMessage, Kind, MapKey, ReflectMessage, Value};
use protoweave_api::{OptionValue, ProtoOption};

struct SetOption<'a> {
    name: String,
    number: u32,
    kind: Kind,
    is_list: bool,
    value: &'a Value,
}

/// Converts every option set in an options message.
///
/// Standard options come first, then custom ones, each group ordered by field number.
/// An element of a repeated option becomes an option of its own.
pub fn options_of(
    options: &DynamicMessage,
    declaration: &LocationPath,
    options_field: i32,
    locations: &Locations,
) -> Vec<ProtoOption> {
    let mut standard: Vec<SetOption<'_>> = options
        .fields()
        .map(|(field, value)| SetOption {
            name: field.name().to_string(),
            number: field.number(),
            kind: field.kind(),
            is_list: field.is_list(),
            value,
        })
        .collect();
    standard.sort_by_key(|o| o.number);

    let mut custom: Vec<SetOption<'_>> = options
        .extensions()
        .map(|(ext, value)| SetOption {
            name: ext.name().to_string(),
            number: ext.number(),
            kind: ext.kind(),
            is_list: ext.is_list(),
            value,
        })
        .collect();
    custom.sort_by_key(|o| o.number);

    let mut result = Vec::new();
    for option in standard.into_iter().chain(custom) {
        let path = declaration.option(options_field, option.number);
        let doc = locations.doc(&path);
        let span = locations.span(&path);
        let option_type = kind_name(&option.kind);
        let values: Vec<OptionValue> = match (option.is_list, option.value) {
            (true, Value::List(items)) => items
                .iter()
                .map(|item| option_value(item, &option.kind))
                .collect(),
            (_, value) => vec![option_value(value, &option.kind)],
        };
        for (element, value) in values.into_iter().enumerate() {
            result.push(ProtoOption {
                name: option.name.clone(),
                number: option.number,
                option_type: option_type.clone(),
                value,
                element,
                doc: doc.clone(),
                span,
            });
        }
    }
    result
}

pub fn option_value(value: &Value, kind: &Kind) -> OptionValue {
    match value {
        Value::Bool(b) => OptionValue::Bool(*b),
        Value::I32(n) => OptionValue::Int(i64::from(*n)),
        Value::I64(n) => OptionValue::Int(*n),
        Value::U32(n) => OptionValue::Uint(u64::from(*n)),
        Value::U64(n) => OptionValue::Uint(*n),
        Value::F32(f) => OptionValue::Float(f64::from(*f)),
        Value::F64(f) => OptionValue::Float(*f),
        Value::String(s) => OptionValue::String(s.clone()),
        Value::Bytes(b) => OptionValue::Bytes(b.to_vec()),
        Value::EnumNumber(number) => {
            let name = match kind {
                Kind::Enum(desc) => desc
                    .get_value(*number)
                    .map(|v| v.name().to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            };
            OptionValue::Enum {
                name,
                number: *number,
            }
        }
        Value::Message(message) => {
            let mut fields: Vec<_> = message.fields().collect();
            fields.sort_by_key(|(field, _)| field.number());
            OptionValue::Message {
                type_name: message.descriptor().full_name().to_string(),
                fields: fields
                    .into_iter()
                    .map(|(field, v)| (field.name().to_string(), option_value(v, &field.kind())))
                    .collect(),
            }
        }
        Value::List(items) => {
            OptionValue::List(items.iter().map(|item| option_value(item, kind)).collect())
        }
        Value::Map(entries) => {
            let value_kind = match kind {
                Kind::Message(entry) => entry.map_entry_value_field().kind(),
                other => other.clone(),
            };
            let mut rendered: Vec<(String, OptionValue)> = entries
                .iter()
                .map(|(key, v)| (map_key(key), option_value(v, &value_kind)))
                .collect();
            rendered.sort_by(|a, b| a.0.cmp(&b.0));
            OptionValue::Map(rendered)
        }
    }
}

fn map_key(key: &MapKey) -> String {
    match key {
        MapKey::Bool(b) => b.to_string(),
        MapKey::I32(n) => n.to_string(),
        MapKey::I64(n) => n.to_string(),
        MapKey::U32(n) => n.to_string(),
        MapKey::U64(n) => n.to_string(),
        MapKey::String(s) => s.clone(),
    }
}
