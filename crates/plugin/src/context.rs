use crate::render::Indent;
use crate::type_system::TypeSystem;
use protoweave_api::{Compilation, File, ProtoSourceFile};
use protoweave_ingest::RunId;
use std::sync::Arc;

/// What renderers get to know about the compilation they generate code for.
#[derive(Debug, Clone)]
pub struct CodegenContext {
    pub run_id: RunId,
    pub type_system: Arc<TypeSystem>,
    pub compilation: Compilation,
    pub indent: Indent,
    files_to_generate: Vec<File>,
}

impl CodegenContext {
    pub fn new(
        run_id: RunId,
        type_system: Arc<TypeSystem>,
        files_to_generate: Vec<File>,
        compilation: Compilation,
    ) -> Self {
        Self {
            run_id,
            type_system,
            compilation,
            indent: Indent::default(),
            files_to_generate,
        }
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    /// Files passed to the compiler for generation, without their dependencies.
    pub fn files_to_generate(&self) -> impl Iterator<Item = &ProtoSourceFile> {
        self.files_to_generate
            .iter()
            .filter_map(|f| self.type_system.file(f))
    }
}
