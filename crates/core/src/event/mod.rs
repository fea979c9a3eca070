//! Lifecycle events of a compiled schema.
//!
//! Every event names the declaration it belongs to in full (file, type, member), so a
//! consumer never has to remember which declaration was entered last.

mod translator;

pub use translator::CompilerEvents;

use protoweave_api::{
    EnumConstant, EnumType, Field, File, MessageType, OneofGroup, ProtoFileHeader, ProtoOption,
    ProtoSourceFile, Rpc, Service, ServiceName, TypeName,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CompilerEvent {
    /// A file the compiled files depend on, converted as a whole.
    DependencyDiscovered {
        file: File,
        content: ProtoSourceFile,
    },

    FileEntered {
        header: ProtoFileHeader,
    },
    FileOptionDiscovered {
        file: File,
        option: ProtoOption,
    },
    FileExited {
        file: File,
    },

    /// A message type with all its members, ahead of the events of the members.
    TypeDiscovered {
        file: File,
        message: MessageType,
    },
    TypeEntered {
        file: File,
        type_name: TypeName,
    },
    TypeOptionDiscovered {
        file: File,
        type_name: TypeName,
        option: ProtoOption,
    },
    TypeExited {
        file: File,
        type_name: TypeName,
    },

    OneofGroupEntered {
        file: File,
        type_name: TypeName,
        group: OneofGroup,
    },
    OneofOptionDiscovered {
        file: File,
        type_name: TypeName,
        group: String,
        option: ProtoOption,
    },
    OneofGroupExited {
        file: File,
        type_name: TypeName,
        group: String,
    },

    FieldEntered {
        file: File,
        type_name: TypeName,
        field: Field,
    },
    FieldOptionDiscovered {
        file: File,
        type_name: TypeName,
        field: String,
        option: ProtoOption,
    },
    FieldExited {
        file: File,
        type_name: TypeName,
        field: String,
    },

    EnumDiscovered {
        file: File,
        enum_type: EnumType,
    },
    EnumEntered {
        file: File,
        type_name: TypeName,
    },
    EnumOptionDiscovered {
        file: File,
        type_name: TypeName,
        option: ProtoOption,
    },
    EnumConstantEntered {
        file: File,
        type_name: TypeName,
        constant: EnumConstant,
    },
    EnumConstantOptionDiscovered {
        file: File,
        type_name: TypeName,
        constant: String,
        option: ProtoOption,
    },
    EnumConstantExited {
        file: File,
        type_name: TypeName,
        constant: String,
    },
    EnumExited {
        file: File,
        type_name: TypeName,
    },

    ServiceDiscovered {
        file: File,
        service: Service,
    },
    ServiceEntered {
        file: File,
        service: ServiceName,
    },
    ServiceOptionDiscovered {
        file: File,
        service: ServiceName,
        option: ProtoOption,
    },
    RpcEntered {
        file: File,
        service: ServiceName,
        rpc: Rpc,
    },
    RpcOptionDiscovered {
        file: File,
        service: ServiceName,
        rpc: String,
        option: ProtoOption,
    },
    RpcExited {
        file: File,
        service: ServiceName,
        rpc: String,
    },
    ServiceExited {
        file: File,
        service: ServiceName,
    },
}

impl CompilerEvent {
    /// The file the event belongs to.
    pub fn file(&self) -> &File {
        use CompilerEvent::*;
        match self {
            FileEntered { header } => &header.file,
            DependencyDiscovered { file, .. }
            | FileOptionDiscovered { file, .. }
            | FileExited { file }
            | TypeDiscovered { file, .. }
            | TypeEntered { file, .. }
            | TypeOptionDiscovered { file, .. }
            | TypeExited { file, .. }
            | OneofGroupEntered { file, .. }
            | OneofOptionDiscovered { file, .. }
            | OneofGroupExited { file, .. }
            | FieldEntered { file, .. }
            | FieldOptionDiscovered { file, .. }
            | FieldExited { file, .. }
            | EnumDiscovered { file, .. }
            | EnumEntered { file, .. }
            | EnumOptionDiscovered { file, .. }
            | EnumConstantEntered { file, .. }
            | EnumConstantOptionDiscovered { file, .. }
            | EnumConstantExited { file, .. }
            | EnumExited { file, .. }
            | ServiceDiscovered { file, .. }
            | ServiceEntered { file, .. }
            | ServiceOptionDiscovered { file, .. }
            | RpcEntered { file, .. }
            | RpcOptionDiscovered { file, .. }
            | RpcExited { file, .. }
            | ServiceExited { file, .. } => file,
        }
    }

    pub fn kind(&self) -> &'static str {
        use CompilerEvent::*;
        match self {
            DependencyDiscovered { .. } => "DependencyDiscovered",
            FileEntered { .. } => "FileEntered",
            FileOptionDiscovered { .. } => "FileOptionDiscovered",
            FileExited { .. } => "FileExited",
            TypeDiscovered { .. } => "TypeDiscovered",
            TypeEntered { .. } => "TypeEntered",
            TypeOptionDiscovered { .. } => "TypeOptionDiscovered",
            TypeExited { .. } => "TypeExited",
            OneofGroupEntered { .. } => "OneofGroupEntered",
            OneofOptionDiscovered { .. } => "OneofOptionDiscovered",
            OneofGroupExited { .. } => "OneofGroupExited",
            FieldEntered { .. } => "FieldEntered",
            FieldOptionDiscovered { .. } => "FieldOptionDiscovered",
            FieldExited { .. } => "FieldExited",
            EnumDiscovered { .. } => "EnumDiscovered",
            EnumEntered { .. } => "EnumEntered",
            EnumOptionDiscovered { .. } => "EnumOptionDiscovered",
            EnumConstantEntered { .. } => "EnumConstantEntered",
            EnumConstantOptionDiscovered { .. } => "EnumConstantOptionDiscovered",
            EnumConstantExited { .. } => "EnumConstantExited",
            EnumExited { .. } => "EnumExited",
            ServiceDiscovered { .. } => "ServiceDiscovered",
            ServiceEntered { .. } => "ServiceEntered",
            ServiceOptionDiscovered { .. } => "ServiceOptionDiscovered",
            RpcEntered { .. } => "RpcEntered",
            RpcOptionDiscovered { .. } => "RpcOptionDiscovered",
            RpcExited { .. } => "RpcExited",
            ServiceExited { .. } => "ServiceExited",
        }
    }

    pub fn is_dependency(&self) -> bool {
        matches!(self, CompilerEvent::DependencyDiscovered { .. })
    }
}
