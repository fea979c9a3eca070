use crate::error::TypeSystemError;
use protoweave_api::{
    EnumType, Field, File, MessageType, ProtoFileHeader, ProtoSourceFile, Service, ServiceName,
    Type, TypeName,
};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Absolute locations of the proto files passed to the compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtoFileList {
    files: Vec<PathBuf>,
}

impl ProtoFileList {
    pub fn new(files: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            files: files.into_iter().collect(),
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Finds the compiled file whose path ends with the given relative path.
    ///
    /// Paths are compared by components, so `b.proto` does not match `ab.proto`.
    pub fn find(&self, relative: &Path) -> Option<&Path> {
        self.files
            .iter()
            .find(|f| f.ends_with(relative))
            .map(PathBuf::as_path)
    }
}

/// A message or an enum found by name.
#[derive(Debug, Clone, Copy)]
pub enum MessageOrEnum<'a> {
    Message(&'a MessageType),
    Enum(&'a EnumType),
}

impl MessageOrEnum<'_> {
    pub fn file(&self) -> &File {
        match self {
            MessageOrEnum::Message(m) => &m.file,
            MessageOrEnum::Enum(e) => &e.file,
        }
    }
}

/// Declarations that carry the file they are declared in.
pub trait Declared {
    fn declared_in(&self) -> &File;
}

impl Declared for MessageType {
    fn declared_in(&self) -> &File {
        &self.file
    }
}

impl Declared for EnumType {
    fn declared_in(&self) -> &File {
        &self.file
    }
}

impl Declared for Service {
    fn declared_in(&self) -> &File {
        &self.file
    }
}

/// Read-only index over the proto files of a compilation, dependencies included.
///
/// Lookups scan the files one by one; a compilation rarely has enough files for an
/// additional index to pay off.
#[derive(Debug, Clone, Default)]
pub struct TypeSystem {
    compiled_files: ProtoFileList,
    files: IndexMap<File, ProtoSourceFile>,
}

impl TypeSystem {
    pub fn new(
        compiled_files: ProtoFileList,
        files: impl IntoIterator<Item = ProtoSourceFile>,
    ) -> Self {
        let files = files
            .into_iter()
            .map(|f| (f.header.file.clone(), f))
            .collect();
        Self {
            compiled_files,
            files,
        }
    }

    pub fn compiled_files(&self) -> &ProtoFileList {
        &self.compiled_files
    }

    pub fn files(&self) -> impl Iterator<Item = &ProtoSourceFile> {
        self.files.values()
    }

    pub fn file(&self, file: &File) -> Option<&ProtoSourceFile> {
        self.files.get(file)
    }

    pub fn find_message(&self, name: &TypeName) -> Option<(&MessageType, &ProtoFileHeader)> {
        let url = name.type_url();
        self.files
            .values()
            .find_map(|f| f.types.get(&url).map(|t| (t, &f.header)))
    }

    pub fn find_enum(&self, name: &TypeName) -> Option<(&EnumType, &ProtoFileHeader)> {
        let url = name.type_url();
        self.files
            .values()
            .find_map(|f| f.enums.get(&url).map(|e| (e, &f.header)))
    }

    pub fn find_message_or_enum(
        &self,
        name: &TypeName,
    ) -> Option<(MessageOrEnum<'_>, &ProtoFileHeader)> {
        self.find_message(name)
            .map(|(m, h)| (MessageOrEnum::Message(m), h))
            .or_else(|| {
                self.find_enum(name)
                    .map(|(e, h)| (MessageOrEnum::Enum(e), h))
            })
    }

    pub fn find_service(&self, name: &ServiceName) -> Option<(&Service, &ProtoFileHeader)> {
        let url = name.type_url();
        self.files
            .values()
            .find_map(|f| f.services.get(&url).map(|s| (s, &f.header)))
    }

    /// Header of the file declaring the given message or enum type.
    pub fn find_header(&self, ty: &Type) -> Result<Option<&ProtoFileHeader>, TypeSystemError> {
        match ty {
            Type::Message(name) => Ok(self.find_message(name).map(|(_, h)| h)),
            Type::Enum(name) => Ok(self.find_enum(name).map(|(_, h)| h)),
            Type::Primitive(p) => Err(TypeSystemError::NotAMessageOrEnum(
                p.proto_name().to_string(),
            )),
        }
    }

    pub fn message(&self, name: &TypeName) -> Result<&MessageType, TypeSystemError> {
        self.find_message(name)
            .map(|(m, _)| m)
            .ok_or_else(|| not_found("Message type", name.qualified_name()))
    }

    pub fn enum_type(&self, name: &TypeName) -> Result<&EnumType, TypeSystemError> {
        self.find_enum(name)
            .map(|(e, _)| e)
            .ok_or_else(|| not_found("Enum type", name.qualified_name()))
    }

    pub fn message_or_enum(&self, name: &TypeName) -> Result<MessageOrEnum<'_>, TypeSystemError> {
        self.find_message_or_enum(name)
            .map(|(d, _)| d)
            .ok_or_else(|| not_found("Message or enum type", name.qualified_name()))
    }

    pub fn service(&self, name: &ServiceName) -> Result<&Service, TypeSystemError> {
        self.find_service(name)
            .map(|(s, _)| s)
            .ok_or_else(|| not_found("Service", name.qualified_name()))
    }

    /// Resolves a dotted field path, e.g. `address.city`, starting from the given message.
    ///
    /// Every segment but the last must be a singular message field.
    pub fn resolve<'a>(
        &'a self,
        field_path: &str,
        message: &'a MessageType,
    ) -> Result<&'a Field, TypeSystemError> {
        let mut current = message;
        let mut segments = field_path.split('.').peekable();
        while let Some(segment) = segments.next() {
            let field = current
                .field(segment)
                .ok_or_else(|| TypeSystemError::NoSuchField {
                    message: current.name.qualified_name(),
                    field: segment.to_string(),
                })?;
            if segments.peek().is_none() {
                return Ok(field);
            }
            let next = field.field_type.single_message().ok_or_else(|| {
                TypeSystemError::NotAMessageField {
                    path: field_path.to_string(),
                    field: field.name.clone(),
                }
            })?;
            current = self
                .find_message(next)
                .map(|(m, _)| m)
                .ok_or_else(|| TypeSystemError::UnknownType(next.qualified_name()))?;
        }
        Err(TypeSystemError::NoSuchField {
            message: message.name.qualified_name(),
            field: field_path.to_string(),
        })
    }

    /// Absolute path of the file declaring the given declaration, if it is known.
    pub fn absolute_file_of(&self, declaration: &dyn Declared) -> Option<PathBuf> {
        let file = declaration.declared_in();
        if file.is_absolute() {
            return Some(file.to_path_buf());
        }
        self.compiled_files
            .find(file.as_path())
            .map(Path::to_path_buf)
    }
}

fn not_found(kind: &'static str, name: String) -> TypeSystemError {
    TypeSystemError::NotFound { kind, name }
}
