pub mod at_line;
pub mod at_point;
pub mod insertion_point;
pub mod printer;
pub mod source_file;
pub mod source_set;

pub use at_line::SourceAtLine;
pub use at_point::SourceAtPoint;
pub use insertion_point::{
    FileBoundary, InsertionPoint, ProtocInsertionPoint, ProtocScope, TextCoordinates,
};
pub use printer::InsertionPointPrinter;
pub use source_file::{DEFAULT_INDENT_SIZE, Indent, SourceFile};
pub use source_set::SourceFileSet;
