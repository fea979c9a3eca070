use super::{EnumType, MessageType, ProtoOption, Service};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Path of a proto file, either relative to its source root or absolute.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct File {
    pub path: String,
}

impl File {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.path)
    }

    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    pub fn is_absolute(&self) -> bool {
        self.as_path().is_absolute()
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<&Path> for File {
    fn from(path: &Path) -> Self {
        Self::new(path.to_string_lossy().into_owned())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxVersion {
    #[default]
    Proto2,
    Proto3,
    Editions,
}

impl SyntaxVersion {
    /// Parses the `syntax` value of a file descriptor.
    ///
    /// Anything unrecognized, including an empty string, means proto2.
    pub fn parse(syntax: &str) -> Self {
        match syntax {
            "proto3" => SyntaxVersion::Proto3,
            "editions" => SyntaxVersion::Editions,
            _ => SyntaxVersion::Proto2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProtoFileHeader {
    pub file: File,
    pub package: String,
    pub syntax: SyntaxVersion,
    pub options: Vec<ProtoOption>,
}

/// Aggregated record of a proto file.
///
/// Types and enums are kept in flat tables keyed by type URL, nested declarations
/// included. Nesting is expressed through names, never through references.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProtoSourceFile {
    pub header: ProtoFileHeader,
    pub types: IndexMap<String, MessageType>,
    pub enums: IndexMap<String, EnumType>,
    pub services: IndexMap<String, Service>,
}

impl ProtoSourceFile {
    pub fn new(header: ProtoFileHeader) -> Self {
        Self {
            header,
            types: IndexMap::new(),
            enums: IndexMap::new(),
            services: IndexMap::new(),
        }
    }

    pub fn file(&self) -> &File {
        &self.header.file
    }

    pub fn message(&self, type_url: &str) -> Option<&MessageType> {
        self.types.get(type_url)
    }

    pub fn enum_type(&self, type_url: &str) -> Option<&EnumType> {
        self.enums.get(type_url)
    }

    pub fn service(&self, type_url: &str) -> Option<&Service> {
        self.services.get(type_url)
    }

    /// Messages declared at the top level of the file, in declaration order.
    pub fn top_level_types(&self) -> impl Iterator<Item = &MessageType> {
        self.types.values().filter(|t| t.declaring_type.is_none())
    }
}
