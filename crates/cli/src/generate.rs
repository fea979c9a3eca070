use crate::markers::MarkerPlugin;
use anyhow::{Context, anyhow};
use clap::Args;
use protoweave_api::Language;
use protoweave_core::{Pipeline, PipelineParams};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Serialized CodeGeneratorRequest
    #[arg(long, value_name = "FILE")]
    request: Option<PathBuf>,

    /// Absolute path of a proto file passed to protoc
    #[arg(long = "compiled-proto", value_name = "PATH")]
    compiled_proto: Vec<PathBuf>,

    /// Directory with the generated sources to process
    #[arg(long = "source-root", value_name = "DIR")]
    source_roots: Vec<PathBuf>,

    /// Directory to write the processed sources to, one per source root
    #[arg(long = "target-root", value_name = "DIR")]
    target_roots: Vec<PathBuf>,

    /// JSON file with the pipeline parameters; flags are added on top of it
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,

    /// Spaces per indentation level
    #[arg(long, value_name = "N")]
    indent: Option<usize>,

    /// Print file boundary markers into the files of the given language
    #[arg(long = "print-markers", value_name = "LANGUAGE")]
    print_markers: Option<String>,
}

impl RunArgs {
    fn params(&self) -> anyhow::Result<PipelineParams> {
        let mut params = match &self.params {
            Some(path) => PipelineParams::from_json_file(path)
                .with_context(|| format!("cannot read parameters from {}", path.display()))?,
            None => PipelineParams::default(),
        };
        if self.request.is_some() {
            params.request = self.request.clone();
        }
        params.compiled_proto.extend(self.compiled_proto.iter().cloned());
        params.source_roots.extend(self.source_roots.iter().cloned());
        params.target_roots.extend(self.target_roots.iter().cloned());
        if self.indent.is_some() {
            params.indent_size = self.indent;
        }
        Ok(params)
    }
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let params = args.params()?;
    let mut builder = Pipeline::builder().params(params);
    if let Some(name) = &args.print_markers {
        let language =
            Language::by_name(name).ok_or_else(|| anyhow!("unknown language `{name}`"))?;
        builder = builder.plugin(Arc::new(MarkerPlugin::new(language)));
    }

    let mut pipeline = builder.build();
    info!("running pipeline {}", pipeline.id());
    let report = pipeline.run()?;
    info!(
        "generated {} file(s) with {} dependency file(s); {} event(s), {} source file(s) written",
        report.generated_files.len(),
        report.dependency_files.len(),
        report.events,
        report.written
    );
    Ok(())
}
