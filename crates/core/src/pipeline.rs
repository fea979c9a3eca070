//! The code generation run: from the compiler request to the written sources.
//!
//! A [`Pipeline`] goes through its [`Stage`]s once, in order:
//! the request is loaded, the compiled file list is resolved, the plugins are registered
//! with the run, the compiler events are published and aggregated into the type system,
//! the renderers edit the source sets, and the changed files are written.
//!
//! Renderers only see what the events produced, so declarations rejected by the
//! [`DescriptorFilter`] are absent from their type system.

use crate::aggregate::AstAggregator;
use crate::error::{CoreError, Result};
use crate::event::{CompilerEvent, CompilerEvents};
use crate::filter::DescriptorFilter;
use crate::request::CodeGenerationRequest;
use protoweave_api::{Compilation, ProtoSourceFile};
use protoweave_ingest::{DynEventBus, InMemoryEventBus, RunId};
use protoweave_plugin::{
    CodegenContext, Indent, Plugin, PluginHandle, ProtoFileList, SourceFileSet, TypeSystem,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where the pipeline reads its input and writes its output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    /// Serialized `CodeGeneratorRequest`.
    pub request: Option<PathBuf>,
    /// Absolute paths of the proto files passed to the compiler.
    pub compiled_proto: Vec<PathBuf>,
    pub source_roots: Vec<PathBuf>,
    /// Output roots, one per source root. The source roots are used when empty.
    pub target_roots: Vec<PathBuf>,
    pub indent_size: Option<usize>,
}

impl PipelineParams {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn indent(&self) -> Indent {
        self.indent_size.map(Indent::new).unwrap_or_default()
    }

    fn check_roots(&self) -> Result<()> {
        let sources = self.source_roots.len();
        let targets = self.target_roots.len();
        if sources == 0 && targets != 1 {
            return Err(CoreError::InvalidParams(
                "when not providing a source directory, only one target directory must be present"
                    .to_string(),
            ));
        }
        if sources != 0 && targets != 0 && sources != targets {
            return Err(CoreError::InvalidParams(format!(
                "mismatched number of directories: given {sources} source directories \
                 and {targets} target directories"
            )));
        }
        Ok(())
    }

    /// Reads the source sets. Source roots that do not exist are skipped.
    pub fn source_sets(&self) -> Result<Vec<SourceFileSet>> {
        self.check_roots()?;
        if self.source_roots.is_empty() {
            return Ok(self
                .target_roots
                .iter()
                .take(1)
                .map(SourceFileSet::empty)
                .collect());
        }
        let targets = if self.target_roots.is_empty() {
            &self.source_roots
        } else {
            &self.target_roots
        };
        let mut sets = Vec::new();
        for (source, target) in self.source_roots.iter().zip(targets) {
            if source.exists() {
                sets.push(SourceFileSet::create(source, target)?);
            } else {
                debug!("source root {} does not exist", source.display());
            }
        }
        Ok(sets)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    LoadRequest,
    /// Resolves the compiled proto files; the type system itself is filled from the events.
    BuildTypeSystem,
    AssembleExtensions,
    EmitEvents,
    InvokeExtensions,
    PersistSources,
    Done,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: RunId,
    /// Aggregated files to generate, in request order.
    pub generated_files: Vec<ProtoSourceFile>,
    pub dependency_files: Vec<ProtoSourceFile>,
    /// Number of events published.
    pub events: u64,
    /// Number of source files written or deleted.
    pub written: usize,
}

pub struct PipelineBuilder {
    id: Option<String>,
    params: PipelineParams,
    request: Option<CodeGenerationRequest>,
    plugins: Vec<Arc<PluginHandle>>,
    filter: DescriptorFilter,
    compilation: Compilation,
    bus: Option<DynEventBus<CompilerEvent>>,
}

impl PipelineBuilder {
    fn new() -> Self {
        Self {
            id: None,
            params: PipelineParams::default(),
            request: None,
            plugins: Vec::new(),
            filter: DescriptorFilter::accept_all(),
            compilation: Compilation::from_env(),
            bus: None,
        }
    }

    /// Run id; a random one is generated when not given.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn params(mut self, params: PipelineParams) -> Self {
        self.params = params;
        self
    }

    /// Uses an already loaded request instead of reading `params.request`.
    pub fn request(mut self, request: CodeGenerationRequest) -> Self {
        self.request = Some(request);
        self
    }

    pub fn plugin(self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugin_handle(Arc::new(PluginHandle::new(plugin)))
    }

    pub fn plugin_handle(mut self, handle: Arc<PluginHandle>) -> Self {
        self.plugins.push(handle);
        self
    }

    pub fn filter(mut self, filter: DescriptorFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn compilation(mut self, compilation: Compilation) -> Self {
        self.compilation = compilation;
        self
    }

    /// Shares an event bus with other pipelines. Each pipeline gets a bus of its own
    /// when not given.
    pub fn event_bus(mut self, bus: DynEventBus<CompilerEvent>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            id: RunId::new(
                self.id
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            ),
            params: self.params,
            request: self.request,
            plugins: self.plugins,
            filter: self.filter,
            compilation: self.compilation,
            bus: self
                .bus
                .unwrap_or_else(|| Arc::new(InMemoryEventBus::new())),
            stage: Stage::Idle,
        }
    }
}

pub struct Pipeline {
    id: RunId,
    params: PipelineParams,
    request: Option<CodeGenerationRequest>,
    plugins: Vec<Arc<PluginHandle>>,
    filter: DescriptorFilter,
    compilation: Compilation,
    bus: DynEventBus<CompilerEvent>,
    stage: Stage,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn id(&self) -> &RunId {
        &self.id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn run(&mut self) -> Result<RunReport> {
        self.run_with(|_| {})
    }

    /// Runs the pipeline, calling `after_compile` once the sources are written and
    /// before the run scope is torn down.
    pub fn run_with(&mut self, after_compile: impl FnOnce(&CodegenContext)) -> Result<RunReport> {
        if self.stage != Stage::Idle {
            return Err(CoreError::InvalidParams(format!(
                "pipeline {} has already run",
                self.id
            )));
        }
        info!("starting code generation run {}", self.id);
        let aggregator = Arc::new(AstAggregator::in_memory(self.id.clone()));
        let result = self.execute(&aggregator, after_compile);

        self.bus.close(&self.id);
        aggregator.clear();
        match &result {
            Ok(report) => info!(
                "run {} finished: {} event(s), {} file(s) written",
                self.id, report.events, report.written
            ),
            Err(e) => warn!("run {} failed at {:?}: {}", self.id, self.stage, e),
        }
        result
    }

    fn advance(&mut self, stage: Stage) {
        debug!("run {}: {:?} -> {:?}", self.id, self.stage, stage);
        self.stage = stage;
    }

    fn execute(
        &mut self,
        aggregator: &Arc<AstAggregator>,
        after_compile: impl FnOnce(&CodegenContext),
    ) -> Result<RunReport> {
        self.advance(Stage::LoadRequest);
        let request = match self.request.take() {
            Some(request) => request,
            None => {
                let path = self.params.request.as_deref().ok_or_else(|| {
                    CoreError::InvalidParams("no code generator request given".to_string())
                })?;
                CodeGenerationRequest::from_file(path)?
            }
        };
        debug!(
            "files to generate: {:?}, parameter: {:?}",
            request.files_to_generate(),
            request.parameter()
        );

        self.advance(Stage::BuildTypeSystem);
        let compiled = ProtoFileList::new(self.params.compiled_proto.iter().cloned());
        self.check_compiled(&compiled, &request);

        self.advance(Stage::AssembleExtensions);
        for handle in &self.plugins {
            handle
                .register(&self.id)
                .map_err(|registered| CoreError::ConflictingRegistration {
                    plugin: handle.metadata.id.clone(),
                    registered,
                    requested: self.id.clone(),
                })?;
        }
        let mut sources = self.params.source_sets()?;

        self.advance(Stage::EmitEvents);
        self.bus.open(&self.id)?;
        self.bus.subscribe(&self.id, aggregator.clone())?;
        let mut events = 0;
        for event in CompilerEvents::new(
            request.pool(),
            request.files_to_generate(),
            self.filter.clone(),
        ) {
            self.bus.publish(&self.id, event)?;
            events += 1;
        }
        debug!("published {events} event(s)");
        let generated_files = aggregator.files()?;
        let dependency_files = aggregator.dependencies()?;
        let type_system = Arc::new(TypeSystem::new(
            compiled,
            generated_files.iter().chain(&dependency_files).cloned(),
        ));
        let ctx = CodegenContext::new(
            self.id.clone(),
            type_system,
            request.files_to_generate().to_vec(),
            self.compilation,
        )
        .with_indent(self.params.indent());

        self.advance(Stage::InvokeExtensions);
        for handle in &self.plugins {
            for renderer in handle.instance.renderers() {
                debug!("rendering with {}", renderer.name());
                for set in sources.iter_mut() {
                    renderer.render_sources(&ctx, set)?;
                }
            }
        }

        self.advance(Stage::PersistSources);
        let mut written = 0;
        for set in &sources {
            written += set.write()?;
        }

        after_compile(&ctx);
        self.advance(Stage::Done);
        Ok(RunReport {
            run_id: self.id.clone(),
            generated_files,
            dependency_files,
            events,
            written,
        })
    }

    fn check_compiled(&self, compiled: &ProtoFileList, request: &CodeGenerationRequest) {
        if compiled.files().is_empty() {
            return;
        }
        for file in request.files_to_generate() {
            if compiled.find(file.as_path()).is_none() {
                let message = self.compilation.warning(
                    file.as_path(),
                    0,
                    0,
                    "the file is not among the compiled proto files",
                );
                warn!("{}", message);
            }
        }
    }
}
