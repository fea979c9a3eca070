use super::CompilerEvent;
use crate::filter::{Declaration, DescriptorFilter};
use crate::location::LocationPath;
use crate::protobuf::FileScope;
use crate::protobuf::convert::{self, nested_messages};
use prost_reflect::{DescriptorPool, EnumDescriptor, FileDescriptor, MessageDescriptor, ServiceDescriptor};
use protoweave_api::{Field, File, TypeName};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::trace;

enum Work {
    Dependency(FileDescriptor),
    File(FileDescriptor),
    Message {
        scope: Arc<FileScope>,
        desc: MessageDescriptor,
        path: LocationPath,
    },
    Enum {
        scope: Arc<FileScope>,
        desc: EnumDescriptor,
        path: LocationPath,
    },
    Service {
        scope: Arc<FileScope>,
        desc: ServiceDescriptor,
        path: LocationPath,
    },
    Emit(CompilerEvent),
}

/// Lazy sequence of the events of a descriptor pool.
///
/// Dependencies come first, one [`CompilerEvent::DependencyDiscovered`] each, then the
/// files to generate in the order they were requested. A declaration is converted only
/// when its turn comes, so at most the events of one declaration are held at a time.
///
/// Declarations are always visited by their position in the descriptor, which makes
/// the sequence the same on every run over the same pool and filter.
pub struct CompilerEvents {
    filter: DescriptorFilter,
    work: Vec<Work>,
    ready: VecDeque<CompilerEvent>,
}

impl CompilerEvents {
    pub fn new(pool: &DescriptorPool, files_to_generate: &[File], filter: DescriptorFilter) -> Self {
        let requested: HashSet<&str> = files_to_generate.iter().map(|f| f.path.as_str()).collect();
        let dependencies = pool
            .files()
            .filter(|f| !requested.contains(f.name()))
            .map(Work::Dependency);
        let compiled = files_to_generate
            .iter()
            .filter_map(|f| pool.get_file_by_name(&f.path))
            .map(Work::File);

        let mut work: Vec<Work> = dependencies.chain(compiled).collect();
        work.reverse();
        Self {
            filter,
            work,
            ready: VecDeque::new(),
        }
    }

    fn expand(&mut self, work: Work) {
        match work {
            Work::Dependency(desc) => self.dependency(&desc),
            Work::File(desc) => self.file(&desc),
            Work::Message { scope, desc, path } => self.message(scope, &desc, path),
            Work::Enum { scope, desc, path } => self.enum_type(&scope, &desc, &path),
            Work::Service { scope, desc, path } => self.service(&scope, &desc, &path),
            Work::Emit(event) => self.ready.push_back(event),
        }
    }

    fn dependency(&mut self, desc: &FileDescriptor) {
        let scope = FileScope::of(desc);
        let content = convert::source_file(&scope, &DescriptorFilter::accept_all());
        self.ready.push_back(CompilerEvent::DependencyDiscovered {
            file: scope.file.clone(),
            content,
        });
    }

    fn file(&mut self, desc: &FileDescriptor) {
        if !self.filter.accepts(Declaration::File(desc)) {
            trace!("file {} filtered out", desc.name());
            return;
        }
        let scope = Arc::new(FileScope::of(desc));
        let header = scope.header();
        let file = header.file.clone();
        let options = header.options.clone();
        self.ready.push_back(CompilerEvent::FileEntered { header });
        for option in options {
            self.ready.push_back(CompilerEvent::FileOptionDiscovered {
                file: file.clone(),
                option,
            });
        }

        let mut children = Vec::new();
        for (i, message) in desc.messages().enumerate() {
            if self.filter.accepts(Declaration::Message(&message)) {
                children.push(Work::Message {
                    scope: scope.clone(),
                    desc: message,
                    path: LocationPath::message(i),
                });
            }
        }
        for (i, enum_type) in desc.enums().enumerate() {
            if self.filter.accepts(Declaration::Enum(&enum_type)) {
                children.push(Work::Enum {
                    scope: scope.clone(),
                    desc: enum_type,
                    path: LocationPath::enum_type(i),
                });
            }
        }
        for (i, service) in desc.services().enumerate() {
            if self.filter.accepts(Declaration::Service(&service)) {
                children.push(Work::Service {
                    scope: scope.clone(),
                    desc: service,
                    path: LocationPath::service(i),
                });
            }
        }
        self.schedule(children, CompilerEvent::FileExited { file });
    }

    fn message(&mut self, scope: Arc<FileScope>, desc: &MessageDescriptor, path: LocationPath) {
        let message = convert::message_type(&scope, desc, &path, &self.filter);
        let file = scope.file.clone();
        let type_name = message.name.clone();

        self.ready.push_back(CompilerEvent::TypeDiscovered {
            file: file.clone(),
            message: message.clone(),
        });
        self.ready.push_back(CompilerEvent::TypeEntered {
            file: file.clone(),
            type_name: type_name.clone(),
        });
        for option in message.options {
            self.ready.push_back(CompilerEvent::TypeOptionDiscovered {
                file: file.clone(),
                type_name: type_name.clone(),
                option,
            });
        }
        for field in message.fields {
            self.field(&file, &type_name, field);
        }
        for group in message.oneofs {
            let name = group.name.clone();
            let fields = group.fields.clone();
            let options = group.options.clone();
            self.ready.push_back(CompilerEvent::OneofGroupEntered {
                file: file.clone(),
                type_name: type_name.clone(),
                group,
            });
            for option in options {
                self.ready.push_back(CompilerEvent::OneofOptionDiscovered {
                    file: file.clone(),
                    type_name: type_name.clone(),
                    group: name.clone(),
                    option,
                });
            }
            for field in fields {
                self.field(&file, &type_name, field);
            }
            self.ready.push_back(CompilerEvent::OneofGroupExited {
                file: file.clone(),
                type_name: type_name.clone(),
                group: name,
            });
        }

        let mut children = Vec::new();
        for (i, nested) in nested_messages(desc) {
            if self.filter.accepts(Declaration::Message(&nested)) {
                children.push(Work::Message {
                    scope: scope.clone(),
                    desc: nested,
                    path: path.nested_message(i),
                });
            }
        }
        for (i, nested) in desc.child_enums().enumerate() {
            if self.filter.accepts(Declaration::Enum(&nested)) {
                children.push(Work::Enum {
                    scope: scope.clone(),
                    desc: nested,
                    path: path.nested_enum(i),
                });
            }
        }
        self.schedule(children, CompilerEvent::TypeExited { file, type_name });
    }

    fn field(&mut self, file: &File, type_name: &TypeName, field: Field) {
        let name = field.name.clone();
        let options = field.options.clone();
        self.ready.push_back(CompilerEvent::FieldEntered {
            file: file.clone(),
            type_name: type_name.clone(),
            field,
        });
        for option in options {
            self.ready.push_back(CompilerEvent::FieldOptionDiscovered {
                file: file.clone(),
                type_name: type_name.clone(),
                field: name.clone(),
                option,
            });
        }
        self.ready.push_back(CompilerEvent::FieldExited {
            file: file.clone(),
            type_name: type_name.clone(),
            field: name,
        });
    }

    fn enum_type(&mut self, scope: &FileScope, desc: &EnumDescriptor, path: &LocationPath) {
        let enum_type = convert::enum_type(scope, desc, path, &self.filter);
        let file = scope.file.clone();
        let type_name = enum_type.name.clone();
        let options = enum_type.options.clone();
        let constants = enum_type.constants.clone();

        self.ready.push_back(CompilerEvent::EnumDiscovered {
            file: file.clone(),
            enum_type,
        });
        self.ready.push_back(CompilerEvent::EnumEntered {
            file: file.clone(),
            type_name: type_name.clone(),
        });
        for option in options {
            self.ready.push_back(CompilerEvent::EnumOptionDiscovered {
                file: file.clone(),
                type_name: type_name.clone(),
                option,
            });
        }
        for constant in constants {
            let name = constant.name.clone();
            let options = constant.options.clone();
            self.ready.push_back(CompilerEvent::EnumConstantEntered {
                file: file.clone(),
                type_name: type_name.clone(),
                constant,
            });
            for option in options {
                self.ready
                    .push_back(CompilerEvent::EnumConstantOptionDiscovered {
                        file: file.clone(),
                        type_name: type_name.clone(),
                        constant: name.clone(),
                        option,
                    });
            }
            self.ready.push_back(CompilerEvent::EnumConstantExited {
                file: file.clone(),
                type_name: type_name.clone(),
                constant: name,
            });
        }
        self.ready
            .push_back(CompilerEvent::EnumExited { file, type_name });
    }

    fn service(&mut self, scope: &FileScope, desc: &ServiceDescriptor, path: &LocationPath) {
        let service = convert::service(scope, desc, path, &self.filter);
        let file = scope.file.clone();
        let name = service.name.clone();
        let options = service.options.clone();
        let rpcs = service.rpcs.clone();

        self.ready.push_back(CompilerEvent::ServiceDiscovered {
            file: file.clone(),
            service,
        });
        self.ready.push_back(CompilerEvent::ServiceEntered {
            file: file.clone(),
            service: name.clone(),
        });
        for option in options {
            self.ready.push_back(CompilerEvent::ServiceOptionDiscovered {
                file: file.clone(),
                service: name.clone(),
                option,
            });
        }
        for rpc in rpcs {
            let rpc_name = rpc.name.clone();
            let options = rpc.options.clone();
            self.ready.push_back(CompilerEvent::RpcEntered {
                file: file.clone(),
                service: name.clone(),
                rpc,
            });
            for option in options {
                self.ready.push_back(CompilerEvent::RpcOptionDiscovered {
                    file: file.clone(),
                    service: name.clone(),
                    rpc: rpc_name.clone(),
                    option,
                });
            }
            self.ready.push_back(CompilerEvent::RpcExited {
                file: file.clone(),
                service: name.clone(),
                rpc: rpc_name,
            });
        }
        self.ready.push_back(CompilerEvent::ServiceExited {
            file,
            service: name,
        });
    }

    /// Queues children in declaration order, followed by the closing event.
    fn schedule(&mut self, children: Vec<Work>, exit: CompilerEvent) {
        self.work.push(Work::Emit(exit));
        self.work.extend(children.into_iter().rev());
    }
}

impl Iterator for CompilerEvents {
    type Item = CompilerEvent;

    fn next(&mut self) -> Option<CompilerEvent> {
        loop {
            if let Some(event) = self.ready.pop_front() {
                return Some(event);
            }
            let work = self.work.pop()?;
            self.expand(work);
        }
    }
}
