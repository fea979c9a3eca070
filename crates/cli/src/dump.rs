use anyhow::Context;
use protoweave_core::{AstAggregator, CodeGenerationRequest, CompilerEvents, DescriptorFilter};
use std::path::Path;
use tracing::debug;

/// Aggregates the events of the request and prints the files as a JSON array.
pub fn run(request: &Path, dependencies: bool) -> anyhow::Result<()> {
    let request = CodeGenerationRequest::from_file(request)
        .with_context(|| format!("cannot load request {}", request.display()))?;
    let aggregator = AstAggregator::in_memory("dump".into());
    for event in CompilerEvents::new(
        request.pool(),
        request.files_to_generate(),
        DescriptorFilter::accept_all(),
    ) {
        aggregator.apply(&event)?;
    }
    debug!(
        "aggregated {} file(s) of {}",
        request.files_to_generate().len(),
        request.pool().files().len()
    );

    let mut files = aggregator.files()?;
    if dependencies {
        files.extend(aggregator.dependencies()?);
    }
    println!("{}", serde_json::to_string_pretty(&files)?);
    Ok(())
}
