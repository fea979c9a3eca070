//! Folds compiler events into per-file AST records.

use crate::event::CompilerEvent;
use protoweave_api::{
    EnumType, File, MessageType, ProtoSourceFile, Service, ServiceName, TypeName,
};
use protoweave_ingest::{
    DynAggregateStore, Envelope, InMemoryAggregateStore, IngestError, RunId, Subscriber,
};
use std::sync::Arc;
use tracing::trace;

pub type FileStore = DynAggregateStore<File, ProtoSourceFile>;

/// Builds the AST of one run from its events.
///
/// Files to generate are assembled declaration by declaration. Dependencies arrive whole
/// and are kept in a store of their own.
///
/// A handler that cannot find the declaration an event refers to fails with
/// [`IngestError::Invariant`]: the events were not published in the order they were made.
pub struct AstAggregator {
    run_id: RunId,
    files: FileStore,
    dependencies: FileStore,
}

impl AstAggregator {
    pub fn new(run_id: RunId, files: FileStore, dependencies: FileStore) -> Self {
        Self {
            run_id,
            files,
            dependencies,
        }
    }

    /// An aggregator backed by fresh in-memory stores.
    pub fn in_memory(run_id: RunId) -> Self {
        Self::new(
            run_id,
            Arc::new(InMemoryAggregateStore::new()),
            Arc::new(InMemoryAggregateStore::new()),
        )
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Aggregated files to generate, in the order they were entered.
    pub fn files(&self) -> Result<Vec<ProtoSourceFile>, IngestError> {
        Ok(self
            .files
            .all(&self.run_id)?
            .into_iter()
            .map(|(_, f)| f)
            .collect())
    }

    pub fn dependencies(&self) -> Result<Vec<ProtoSourceFile>, IngestError> {
        Ok(self
            .dependencies
            .all(&self.run_id)?
            .into_iter()
            .map(|(_, f)| f)
            .collect())
    }

    pub fn file(&self, file: &File) -> Result<Option<ProtoSourceFile>, IngestError> {
        self.files.load(&self.run_id, file)
    }

    /// Drops everything aggregated for the run.
    pub fn clear(&self) {
        self.files.clear(&self.run_id);
        self.dependencies.clear(&self.run_id);
    }

    pub fn apply(&self, event: &CompilerEvent) -> Result<(), IngestError> {
        use CompilerEvent::*;
        trace!("aggregating {} of {}", event.kind(), event.file());
        match event {
            DependencyDiscovered { file, content } => {
                self.dependencies
                    .save(&self.run_id, file.clone(), content.clone())
            }
            FileEntered { header } => {
                let mut header = header.clone();
                header.options.clear();
                self.files
                    .save(&self.run_id, header.file.clone(), ProtoSourceFile::new(header))
            }
            FileOptionDiscovered { file, option } => self.update(file, |f| {
                f.header.options.push(option.clone());
                Ok(())
            }),
            FileExited { file } => self.update(file, |_| Ok(())),

            TypeDiscovered { file, message } => self.update(file, |f| {
                if let Some(parent) = &message.declaring_type {
                    message_mut(f, parent)?.nested_types.push(message.name.clone());
                }
                f.types.insert(message.name.type_url(), message.skeleton());
                Ok(())
            }),
            TypeEntered { file, type_name } | TypeExited { file, type_name } => {
                self.update(file, |f| message_mut(f, type_name).map(|_| ()))
            }
            TypeOptionDiscovered {
                file,
                type_name,
                option,
            } => self.update(file, |f| {
                message_mut(f, type_name)?.options.push(option.clone());
                Ok(())
            }),

            OneofGroupEntered {
                file,
                type_name,
                group,
            } => self.update(file, |f| {
                let mut group = group.clone();
                group.fields.clear();
                group.options.clear();
                message_mut(f, type_name)?.oneofs.push(group);
                Ok(())
            }),
            OneofOptionDiscovered {
                file,
                type_name,
                group,
                option,
            } => self.update(file, |f| {
                let message = message_mut(f, type_name)?;
                let oneof = message
                    .oneof_mut(group)
                    .ok_or_else(|| missing("oneof", &format!("{type_name}.{group}")))?;
                oneof.options.push(option.clone());
                Ok(())
            }),
            OneofGroupExited {
                file,
                type_name,
                group,
            } => self.update(file, |f| {
                message_mut(f, type_name)?
                    .oneof(group)
                    .map(|_| ())
                    .ok_or_else(|| missing("oneof", &format!("{type_name}.{group}")))
            }),

            FieldEntered {
                file,
                type_name,
                field,
            } => self.update(file, |f| {
                let mut field = field.clone();
                field.options.clear();
                let message = message_mut(f, type_name)?;
                match field.enclosing_oneof.clone() {
                    Some(group) => message
                        .oneof_mut(&group)
                        .ok_or_else(|| missing("oneof", &format!("{type_name}.{group}")))?
                        .fields
                        .push(field),
                    None => message.fields.push(field),
                }
                Ok(())
            }),
            FieldOptionDiscovered {
                file,
                type_name,
                field,
                option,
            } => self.update(file, |f| {
                let message = message_mut(f, type_name)?;
                let target = message
                    .fields
                    .iter_mut()
                    .chain(message.oneofs.iter_mut().flat_map(|o| o.fields.iter_mut()))
                    .find(|candidate| candidate.name == *field)
                    .ok_or_else(|| missing("field", &format!("{type_name}.{field}")))?;
                target.options.push(option.clone());
                Ok(())
            }),
            FieldExited {
                file,
                type_name,
                field,
            } => self.update(file, |f| {
                message_mut(f, type_name)?
                    .field(field)
                    .map(|_| ())
                    .ok_or_else(|| missing("field", &format!("{type_name}.{field}")))
            }),

            EnumDiscovered { file, enum_type } => self.update(file, |f| {
                if let Some(parent) = &enum_type.declaring_type {
                    message_mut(f, parent)?.nested_enums.push(enum_type.name.clone());
                }
                f.enums.insert(enum_type.name.type_url(), enum_type.skeleton());
                Ok(())
            }),
            EnumEntered { file, type_name } | EnumExited { file, type_name } => {
                self.update(file, |f| enum_mut(f, type_name).map(|_| ()))
            }
            EnumOptionDiscovered {
                file,
                type_name,
                option,
            } => self.update(file, |f| {
                enum_mut(f, type_name)?.options.push(option.clone());
                Ok(())
            }),
            EnumConstantEntered {
                file,
                type_name,
                constant,
            } => self.update(file, |f| {
                let mut constant = constant.clone();
                constant.options.clear();
                enum_mut(f, type_name)?.constants.push(constant);
                Ok(())
            }),
            EnumConstantOptionDiscovered {
                file,
                type_name,
                constant,
                option,
            } => self.update(file, |f| {
                let enum_type = enum_mut(f, type_name)?;
                let target = enum_type
                    .constants
                    .iter_mut()
                    .find(|c| c.name == *constant)
                    .ok_or_else(|| missing("enum constant", &format!("{type_name}.{constant}")))?;
                target.options.push(option.clone());
                Ok(())
            }),
            EnumConstantExited {
                file,
                type_name,
                constant,
            } => self.update(file, |f| {
                enum_mut(f, type_name)?
                    .constant(constant)
                    .map(|_| ())
                    .ok_or_else(|| missing("enum constant", &format!("{type_name}.{constant}")))
            }),

            ServiceDiscovered { file, service } => self.update(file, |f| {
                f.services
                    .insert(service.name.type_url(), service.skeleton());
                Ok(())
            }),
            ServiceEntered { file, service } | ServiceExited { file, service } => {
                self.update(file, |f| service_mut(f, service).map(|_| ()))
            }
            ServiceOptionDiscovered {
                file,
                service,
                option,
            } => self.update(file, |f| {
                service_mut(f, service)?.options.push(option.clone());
                Ok(())
            }),
            RpcEntered { file, service, rpc } => self.update(file, |f| {
                let mut rpc = rpc.clone();
                rpc.options.clear();
                service_mut(f, service)?.rpcs.push(rpc);
                Ok(())
            }),
            RpcOptionDiscovered {
                file,
                service,
                rpc,
                option,
            } => self.update(file, |f| {
                let target = service_mut(f, service)?
                    .rpcs
                    .iter_mut()
                    .find(|r| r.name == *rpc)
                    .ok_or_else(|| missing("rpc", &format!("{service}.{rpc}")))?;
                target.options.push(option.clone());
                Ok(())
            }),
            RpcExited { file, service, rpc } => self.update(file, |f| {
                service_mut(f, service)?
                    .rpc(rpc)
                    .map(|_| ())
                    .ok_or_else(|| missing("rpc", &format!("{service}.{rpc}")))
            }),
        }
    }

    fn update(
        &self,
        file: &File,
        mut mutation: impl FnMut(&mut ProtoSourceFile) -> Result<(), IngestError>,
    ) -> Result<(), IngestError> {
        self.files
            .update(&self.run_id, file, &mut mutation)
            .map_err(|e| match e {
                IngestError::UnknownRun(_) | IngestError::Storage(_) => {
                    missing("file", &file.path)
                }
                other => other,
            })
    }
}

impl Subscriber<CompilerEvent> for AstAggregator {
    fn on_event(&self, envelope: &Envelope<CompilerEvent>) -> Result<(), IngestError> {
        if envelope.run_id != self.run_id {
            return Err(IngestError::Delivery(format!(
                "event of run {} delivered to the aggregator of run {}",
                envelope.run_id, self.run_id
            )));
        }
        self.apply(&envelope.payload)
    }
}

fn missing(kind: &str, name: &str) -> IngestError {
    IngestError::Invariant(format!("{kind} `{name}` was not entered"))
}

fn message_mut<'a>(
    file: &'a mut ProtoSourceFile,
    name: &TypeName,
) -> Result<&'a mut MessageType, IngestError> {
    file.types
        .get_mut(&name.type_url())
        .ok_or_else(|| missing("message", &name.qualified_name()))
}

fn enum_mut<'a>(
    file: &'a mut ProtoSourceFile,
    name: &TypeName,
) -> Result<&'a mut EnumType, IngestError> {
    file.enums
        .get_mut(&name.type_url())
        .ok_or_else(|| missing("enum", &name.qualified_name()))
}

fn service_mut<'a>(
    file: &'a mut ProtoSourceFile,
    name: &ServiceName,
) -> Result<&'a mut Service, IngestError> {
    file.services
        .get_mut(&name.type_url())
        .ok_or_else(|| missing("service", &name.qualified_name()))
}

