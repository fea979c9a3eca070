pub mod context;
pub mod error;
pub mod plugin;
pub mod render;
pub mod type_system;

pub use context::CodegenContext;
pub use error::{RenderError, TypeSystemError};
pub use plugin::{Plugin, PluginHandle, PluginInfo, Renderer};
pub use render::{
    FileBoundary, Indent, InsertionPoint, InsertionPointPrinter, ProtocInsertionPoint,
    ProtocScope, SourceAtLine, SourceAtPoint, SourceFile, SourceFileSet, TextCoordinates,
};
pub use type_system::{Declared, MessageOrEnum, ProtoFileList, TypeSystem};
