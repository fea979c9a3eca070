use serde::{Deserialize, Serialize};

/// Documentation attached to a declaration in a proto file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Doc {
    pub leading_comment: String,
    pub trailing_comment: String,
    pub detached_comments: Vec<String>,
}

impl Doc {
    pub fn is_empty(&self) -> bool {
        self.leading_comment.is_empty()
            && self.trailing_comment.is_empty()
            && self.detached_comments.is_empty()
    }
}

/// One-based position of a declaration in its proto file.
///
/// A zero span means the position is unknown.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Span {
    pub fn is_known(&self) -> bool {
        self.start_line > 0
    }
}

/// An option set on a file, a type, a field, a oneof, an enum constant, a service or an RPC.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProtoOption {
    pub name: String,
    pub number: u32,
    /// Proto type of the option field, e.g. `bool` or `acme.Validation`.
    pub option_type: String,
    pub value: OptionValue,
    /// Position of the value among the elements of a repeated option, `0` otherwise.
    #[serde(default)]
    pub element: usize,
    pub doc: Doc,
    pub span: Span,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Enum {
        name: String,
        number: i32,
    },
    Message {
        type_name: String,
        fields: Vec<(String, OptionValue)>,
    },
    List(Vec<OptionValue>),
    Map(Vec<(String, OptionValue)>),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a field of a message value.
    pub fn field(&self, name: &str) -> Option<&OptionValue> {
        match self {
            OptionValue::Message { fields, .. } => {
                fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
            }
            _ => None,
        }
    }
}

/// Finds an option by its name in a list of options.
pub fn find_option<'a>(options: &'a [ProtoOption], name: &str) -> Option<&'a ProtoOption> {
    options.iter().find(|opt| opt.name == name)
}
