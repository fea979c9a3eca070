pub mod aggregate;
pub mod error;
pub mod event;
pub mod filter;
pub mod location;
pub mod logging;
pub mod pipeline;
pub mod protobuf;
pub mod request;

pub use aggregate::AstAggregator;
pub use error::{CoreError, Result};
pub use event::{CompilerEvent, CompilerEvents};
pub use filter::{Declaration, DescriptorFilter};
pub use location::{LocationPath, Locations};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineParams, RunReport, Stage};
pub use request::CodeGenerationRequest;
