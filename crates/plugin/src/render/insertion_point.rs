use protoweave_api::TypeName;

/// Where in a text an insertion point marker belongs.
///
/// Lines and columns are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextCoordinates {
    StartOfFile,
    EndOfFile,
    /// Before the line with the given index.
    Line(usize),
    /// At the given character of the line.
    LineAndColumn { line: usize, column: usize },
    Nowhere,
}

/// A named place in generated code where renderers may add more code.
pub trait InsertionPoint: Send + Sync {
    fn label(&self) -> String;

    /// Text of the comment which marks the point on a line of its own.
    fn code_line(&self) -> String {
        format!("INSERT:'{}'", self.label())
    }

    /// Marker of the point placed inside a line.
    fn representation_in_code(&self) -> String {
        format!("/* INSERT:'{}' */", self.label())
    }

    /// Finds the places in the text where the point should be marked.
    fn locate(&self, text: &str) -> Vec<TextCoordinates>;
}

/// Points at the very beginning or end of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileBoundary {
    Start,
    End,
}

impl InsertionPoint for FileBoundary {
    fn label(&self) -> String {
        match self {
            FileBoundary::Start => "file_start".to_string(),
            FileBoundary::End => "file_end".to_string(),
        }
    }

    fn locate(&self, _text: &str) -> Vec<TextCoordinates> {
        match self {
            FileBoundary::Start => vec![TextCoordinates::StartOfFile],
            FileBoundary::End => vec![TextCoordinates::EndOfFile],
        }
    }
}

/// Scopes of the insertion points protoc writes into generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocScope {
    OuterClassScope,
    ClassScope,
    BuilderScope,
    EnumScope,
    MessageImplements,
    BuilderImplements,
}

impl ProtocScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocScope::OuterClassScope => "outer_class_scope",
            ProtocScope::ClassScope => "class_scope",
            ProtocScope::BuilderScope => "builder_scope",
            ProtocScope::EnumScope => "enum_scope",
            ProtocScope::MessageImplements => "message_implements",
            ProtocScope::BuilderImplements => "builder_implements",
        }
    }
}

/// An insertion point emitted by protoc itself, e.g.
/// `// @@protoc_insertion_point(class_scope:acme.Zoo)`.
///
/// These points are already present in the generated code, so they are never located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocInsertionPoint {
    scope: ProtocScope,
    type_name: Option<TypeName>,
}

impl ProtocInsertionPoint {
    pub fn outer_class_scope() -> Self {
        Self {
            scope: ProtocScope::OuterClassScope,
            type_name: None,
        }
    }

    pub fn for_type(scope: ProtocScope, type_name: TypeName) -> Self {
        Self {
            scope,
            type_name: Some(type_name),
        }
    }
}

impl InsertionPoint for ProtocInsertionPoint {
    fn label(&self) -> String {
        match &self.type_name {
            Some(name) => format!("{}:{}", self.scope.as_str(), name.qualified_name()),
            None => self.scope.as_str().to_string(),
        }
    }

    fn code_line(&self) -> String {
        format!("@@protoc_insertion_point({})", self.label())
    }

    fn representation_in_code(&self) -> String {
        self.code_line()
    }

    fn locate(&self, _text: &str) -> Vec<TextCoordinates> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protoc_markers() {
        let point =
            ProtocInsertionPoint::for_type(ProtocScope::ClassScope, TypeName::new("acme", "Zoo"));
        assert_eq!(point.code_line(), "@@protoc_insertion_point(class_scope:acme.Zoo)");
        assert_eq!(
            ProtocInsertionPoint::outer_class_scope().code_line(),
            "@@protoc_insertion_point(outer_class_scope)"
        );
        assert!(point.locate("anything").is_empty());
    }

    #[test]
    fn test_default_markers_use_label() {
        assert_eq!(FileBoundary::End.code_line(), "INSERT:'file_end'");
        assert_eq!(
            FileBoundary::Start.representation_in_code(),
            "/* INSERT:'file_start' */"
        );
    }
}
