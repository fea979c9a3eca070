//! Positions of declarations inside a proto file.
//!
//! A [`LocationPath`] addresses a declaration by the field numbers of `descriptor.proto`
//! and the positional index of the declaration, the same way `SourceCodeInfo` does.
//! It is only a lookup key: once docs and spans are extracted it is dropped.

use protoweave_api::{Doc, Span};
use prost_types::source_code_info::Location;
use prost_types::FileDescriptorProto;
use std::collections::HashMap;

const FILE_MESSAGE_TYPE: i32 = 4;
const FILE_ENUM_TYPE: i32 = 5;
const FILE_SERVICE: i32 = 6;
const MESSAGE_FIELD: i32 = 2;
const MESSAGE_NESTED_TYPE: i32 = 3;
const MESSAGE_ENUM_TYPE: i32 = 4;
const MESSAGE_ONEOF: i32 = 8;
const ENUM_VALUE: i32 = 2;
const SERVICE_METHOD: i32 = 2;

/// Number of the `options` field in the descriptor of each kind of declaration.
pub mod options_field {
    pub const FILE: i32 = 8;
    pub const MESSAGE: i32 = 7;
    pub const FIELD: i32 = 8;
    pub const ONEOF: i32 = 2;
    pub const ENUM: i32 = 3;
    pub const ENUM_VALUE: i32 = 3;
    pub const SERVICE: i32 = 3;
    pub const METHOD: i32 = 4;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LocationPath(Vec<i32>);

impl LocationPath {
    /// Path of the file itself.
    pub fn file() -> Self {
        Self(Vec::new())
    }

    pub fn message(index: usize) -> Self {
        Self(vec![FILE_MESSAGE_TYPE, to_i32(index)])
    }

    pub fn enum_type(index: usize) -> Self {
        Self(vec![FILE_ENUM_TYPE, to_i32(index)])
    }

    pub fn service(index: usize) -> Self {
        Self(vec![FILE_SERVICE, to_i32(index)])
    }

    pub fn nested_message(&self, index: usize) -> Self {
        self.child(MESSAGE_NESTED_TYPE, to_i32(index))
    }

    pub fn nested_enum(&self, index: usize) -> Self {
        self.child(MESSAGE_ENUM_TYPE, to_i32(index))
    }

    pub fn field(&self, index: usize) -> Self {
        self.child(MESSAGE_FIELD, to_i32(index))
    }

    pub fn oneof(&self, index: usize) -> Self {
        self.child(MESSAGE_ONEOF, to_i32(index))
    }

    pub fn enum_value(&self, index: usize) -> Self {
        self.child(ENUM_VALUE, to_i32(index))
    }

    pub fn method(&self, index: usize) -> Self {
        self.child(SERVICE_METHOD, to_i32(index))
    }

    /// Path of an option set on the declaration with this path.
    pub fn option(&self, options_field: i32, option_number: u32) -> Self {
        self.child(options_field, i32::try_from(option_number).unwrap_or(i32::MAX))
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    fn child(&self, field: i32, index: i32) -> Self {
        let mut path = self.0.clone();
        path.push(field);
        path.push(index);
        Self(path)
    }
}

fn to_i32(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

/// The `SourceCodeInfo` of a file, indexed by path.
#[derive(Debug, Clone, Default)]
pub struct Locations {
    by_path: HashMap<Vec<i32>, Location>,
}

impl Locations {
    pub fn of(file: &FileDescriptorProto) -> Self {
        let mut by_path = HashMap::new();
        if let Some(info) = &file.source_code_info {
            for location in &info.location {
                by_path
                    .entry(location.path.clone())
                    .or_insert_with(|| location.clone());
            }
        }
        Self { by_path }
    }

    pub fn get(&self, path: &LocationPath) -> Option<&Location> {
        self.by_path.get(path.as_slice())
    }

    /// Documentation of the declaration; empty if the file has no such location.
    pub fn doc(&self, path: &LocationPath) -> Doc {
        self.get(path)
            .map(|l| Doc {
                leading_comment: l.leading_comments.clone().unwrap_or_default(),
                trailing_comment: l.trailing_comments.clone().unwrap_or_default(),
                detached_comments: l.leading_detached_comments.clone(),
            })
            .unwrap_or_default()
    }

    /// One-based span of the declaration; zero if the file has no such location.
    pub fn span(&self, path: &LocationPath) -> Span {
        self.get(path).map(span_of).unwrap_or_default()
    }
}

/// Converts a zero-based `[start line, start column, (end line,) end column]` span.
fn span_of(location: &Location) -> Span {
    let one_based = |n: i32| u32::try_from(n).unwrap_or(0) + 1;
    match location.span.as_slice() {
        [start_line, start_column, end_line, end_column] => Span {
            start_line: one_based(*start_line),
            start_column: one_based(*start_column),
            end_line: one_based(*end_line),
            end_column: one_based(*end_column),
        },
        [line, start_column, end_column] => Span {
            start_line: one_based(*line),
            start_column: one_based(*start_column),
            end_line: one_based(*line),
            end_column: one_based(*end_column),
        },
        _ => Span::default(),
    }
}
