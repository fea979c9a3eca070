use super::{Doc, File, ProtoOption, ServiceName, Span, TypeName};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CallCardinality {
    Unary,
    ClientStreaming,
    ServerStreaming,
    Bidirectional,
}

impl CallCardinality {
    pub fn from_streaming(client_streaming: bool, server_streaming: bool) -> Self {
        match (client_streaming, server_streaming) {
            (false, false) => CallCardinality::Unary,
            (true, false) => CallCardinality::ClientStreaming,
            (false, true) => CallCardinality::ServerStreaming,
            (true, true) => CallCardinality::Bidirectional,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Rpc {
    pub name: String,
    pub service: ServiceName,
    pub request_type: TypeName,
    pub response_type: TypeName,
    pub cardinality: CallCardinality,
    pub options: Vec<ProtoOption>,
    pub doc: Doc,
    pub span: Span,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Service {
    pub name: ServiceName,
    pub file: File,
    pub rpcs: Vec<Rpc>,
    pub options: Vec<ProtoOption>,
    pub doc: Doc,
    pub span: Span,
}

impl Service {
    pub fn rpc(&self, name: &str) -> Option<&Rpc> {
        self.rpcs.iter().find(|r| r.name == name)
    }

    pub fn skeleton(&self) -> Service {
        Service {
            rpcs: Vec::new(),
            options: Vec::new(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinality_from_streaming_flags() {
        assert_eq!(CallCardinality::from_streaming(false, false), CallCardinality::Unary);
        assert_eq!(
            CallCardinality::from_streaming(true, false),
            CallCardinality::ClientStreaming
        );
        assert_eq!(
            CallCardinality::from_streaming(false, true),
            CallCardinality::ServerStreaming
        );
        assert_eq!(
            CallCardinality::from_streaming(true, true),
            CallCardinality::Bidirectional
        );
    }
}
