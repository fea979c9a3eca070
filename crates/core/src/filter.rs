use prost_reflect::{
    EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FileDescriptor, MessageDescriptor,
    MethodDescriptor, OneofDescriptor, ServiceDescriptor,
};
use std::sync::Arc;

/// A descriptor offered to a [`DescriptorFilter`].
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'a> {
    File(&'a FileDescriptor),
    Message(&'a MessageDescriptor),
    Field(&'a FieldDescriptor),
    Oneof(&'a OneofDescriptor),
    Enum(&'a EnumDescriptor),
    EnumValue(&'a EnumValueDescriptor),
    Service(&'a ServiceDescriptor),
    Method(&'a MethodDescriptor),
}

impl Declaration<'_> {
    /// Fully qualified name of the declaration; the file name for a file.
    pub fn full_name(&self) -> &str {
        match self {
            Declaration::File(d) => d.name(),
            Declaration::Message(d) => d.full_name(),
            Declaration::Field(d) => d.full_name(),
            Declaration::Oneof(d) => d.full_name(),
            Declaration::Enum(d) => d.full_name(),
            Declaration::EnumValue(d) => d.full_name(),
            Declaration::Service(d) => d.full_name(),
            Declaration::Method(d) => d.full_name(),
        }
    }
}

/// Decides which declarations produce events. A rejected declaration is skipped
/// together with everything declared inside it.
#[derive(Clone)]
pub struct DescriptorFilter(Arc<dyn Fn(&Declaration<'_>) -> bool + Send + Sync>);

impl DescriptorFilter {
    pub fn new(predicate: impl Fn(&Declaration<'_>) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    pub fn accept_all() -> Self {
        Self::new(|_| true)
    }

    pub fn accepts(&self, declaration: Declaration<'_>) -> bool {
        (self.0)(&declaration)
    }
}

impl Default for DescriptorFilter {
    fn default() -> Self {
        Self::accept_all()
    }
}

impl std::fmt::Debug for DescriptorFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DescriptorFilter")
    }
}
