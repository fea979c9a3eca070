//! Conversion of `prost-reflect` descriptors into the AST model.

pub mod convert;
pub mod names;
pub mod options;

pub use convert::FileScope;
