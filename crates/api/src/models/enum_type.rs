use super::{Doc, File, ProtoOption, Span, TypeName};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EnumConstant {
    pub name: String,
    /// Numbers may repeat when the enum allows aliases.
    pub number: i32,
    pub order_of_declaration: u32,
    pub options: Vec<ProtoOption>,
    pub doc: Doc,
    pub span: Span,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: TypeName,
    pub file: File,
    pub declaring_type: Option<TypeName>,
    pub constants: Vec<EnumConstant>,
    pub options: Vec<ProtoOption>,
    pub doc: Doc,
    pub span: Span,
}

impl EnumType {
    pub fn constant(&self, name: &str) -> Option<&EnumConstant> {
        self.constants.iter().find(|c| c.name == name)
    }

    pub fn skeleton(&self) -> EnumType {
        EnumType {
            constants: Vec::new(),
            options: Vec::new(),
            ..self.clone()
        }
    }
}
