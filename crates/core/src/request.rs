//! Loading of the protoc `CodeGeneratorRequest`.

use crate::error::{CoreError, Result};
use prost::Message;
use prost_reflect::DescriptorPool;
use protoweave_api::File;
use std::path::Path;
use tracing::debug;

/// `google.protobuf.compiler.CodeGeneratorRequest` with the files left encoded.
///
/// Decoding the files through `prost_types` would drop the custom options, which are
/// unknown fields of the option messages. `DescriptorPool` keeps them when it decodes
/// the bytes itself.
#[derive(Clone, PartialEq, ::prost::Message)]
struct RawCodeGeneratorRequest {
    #[prost(string, repeated, tag = "1")]
    file_to_generate: Vec<String>,
    #[prost(string, optional, tag = "2")]
    parameter: Option<String>,
    #[prost(bytes, repeated, tag = "15")]
    proto_file: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
struct RawFileDescriptorSet {
    #[prost(bytes, repeated, tag = "1")]
    file: Vec<Vec<u8>>,
}

/// The compiled descriptors and the names of the files to generate code for.
#[derive(Debug, Clone)]
pub struct CodeGenerationRequest {
    files_to_generate: Vec<File>,
    parameter: Option<String>,
    pool: DescriptorPool,
}

impl CodeGenerationRequest {
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let raw = RawCodeGeneratorRequest::decode(bytes)?;
        let set = RawFileDescriptorSet {
            file: raw.proto_file,
        };
        let pool = DescriptorPool::decode(set.encode_to_vec().as_slice())?;
        debug!(
            "decoded request with {} file(s), {} to generate",
            pool.files().len(),
            raw.file_to_generate.len()
        );
        let mut request = Self::from_pool(pool, raw.file_to_generate)?;
        request.parameter = raw.parameter;
        Ok(request)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    /// Fails if a file to generate is not in the pool.
    pub fn from_pool(
        pool: DescriptorPool,
        files_to_generate: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        let files_to_generate: Vec<File> = files_to_generate
            .into_iter()
            .map(File::new)
            .collect();
        if let Some(unknown) = files_to_generate
            .iter()
            .find(|f| pool.get_file_by_name(&f.path).is_none())
        {
            return Err(CoreError::UnknownFile(unknown.path.clone()));
        }
        Ok(Self {
            files_to_generate,
            parameter: None,
            pool,
        })
    }

    pub fn files_to_generate(&self) -> &[File] {
        &self.files_to_generate
    }

    /// The `--<plugin>_opt` value passed to protoc, if any.
    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }

    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }
}
