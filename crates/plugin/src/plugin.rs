use crate::context::CodegenContext;
use crate::error::RenderError;
use crate::render::SourceFileSet;
use protoweave_api::Language;
use protoweave_ingest::RunId;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Metadata for a plugin (plugin's own information).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PluginInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: Option<String>,
}

/// An extension of the code generation.
///
/// A plugin contributes renderers. They are invoked in the order the plugin lists them,
/// after the plugins registered before this one.
pub trait Plugin: Send + Sync {
    fn info(&self) -> PluginInfo;

    fn renderers(&self) -> Vec<Arc<dyn Renderer>>;
}

/// Edits the generated files of one language.
///
/// A renderer may only read the type system. It changes text through insertion points,
/// [`crate::render::SourceFile::overwrite`], or by creating and deleting whole files.
pub trait Renderer: Send + Sync {
    fn name(&self) -> String;

    fn language(&self) -> Language;

    fn render(&self, ctx: &CodegenContext, sources: &mut SourceFileSet) -> Result<(), RenderError>;

    /// Renders the files of the renderer's language and merges the changes back.
    fn render_sources(
        &self,
        ctx: &CodegenContext,
        sources: &mut SourceFileSet,
    ) -> Result<(), RenderError> {
        let language = self.language();
        let mut subset = sources.subset_where(|f| language.matches(f.relative_path()));
        debug!(
            "renderer {} got {} {} file(s)",
            self.name(),
            subset.len(),
            language
        );
        self.render(ctx, &mut subset)?;
        sources.merge_back(subset);
        Ok(())
    }
}

/// A plugin together with the run it was registered with.
pub struct PluginHandle {
    pub metadata: PluginInfo,
    pub instance: Arc<dyn Plugin>,
    run: OnceLock<RunId>,
}

impl PluginHandle {
    pub fn new(instance: Arc<dyn Plugin>) -> Self {
        Self {
            metadata: instance.info(),
            instance,
            run: OnceLock::new(),
        }
    }

    /// Binds the plugin to a run.
    ///
    /// Registering again with the same run is allowed. Registering with another run fails
    /// and returns the run the plugin is already bound to.
    pub fn register(&self, run_id: &RunId) -> Result<(), RunId> {
        let bound = self.run.get_or_init(|| run_id.clone());
        if bound == run_id {
            Ok(())
        } else {
            Err(bound.clone())
        }
    }

    pub fn registered_run(&self) -> Option<&RunId> {
        self.run.get()
    }
}

impl std::fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHandle")
            .field("metadata", &self.metadata)
            .field("run", &self.run.get())
            .finish()
    }
}
