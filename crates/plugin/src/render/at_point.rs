use super::source_file::SourceFile;
use crate::error::RenderError;

/// Adds code inside lines, right after the inline markers of an insertion point.
///
/// The marker stays in place, so the code added last ends up first after it.
pub enum SourceAtPoint<'a> {
    /// The point is not present in the file.
    NoOp,
    Specific {
        file: &'a mut SourceFile,
        marker: String,
    },
}

impl SourceAtPoint<'_> {
    pub fn add(&mut self, code_fragment: &str) -> Result<(), RenderError> {
        let SourceAtPoint::Specific { file, marker } = self else {
            return Ok(());
        };
        if code_fragment.contains('\n') || code_fragment.contains('\r') {
            return Err(RenderError::MultilineCode(code_fragment.to_string()));
        }
        let updated = file
            .lines()
            .iter()
            .map(|line| insert_after_markers(line, marker, code_fragment))
            .collect();
        file.update_lines(updated);
        Ok(())
    }

    pub fn is_no_op(&self) -> bool {
        matches!(self, SourceAtPoint::NoOp)
    }
}

fn insert_after_markers(line: &str, marker: &str, fragment: &str) -> String {
    let mut result = String::with_capacity(line.len() + fragment.len());
    let mut rest = line;
    while let Some(pos) = rest.find(marker) {
        let end = pos + marker.len();
        result.push_str(&rest[..end]);
        result.push_str(fragment);
        rest = &rest[end..];
    }
    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::insertion_point::{InsertionPoint, TextCoordinates};

    struct Point(&'static str);

    impl InsertionPoint for Point {
        fn label(&self) -> String {
            self.0.to_string()
        }

        fn locate(&self, _text: &str) -> Vec<TextCoordinates> {
            Vec::new()
        }
    }

    #[test]
    fn test_last_insertion_comes_first_after_marker() {
        let mut file = SourceFile::new("a.java", "int x = /* INSERT:'init' */;");
        file.at_inline(&Point("init")).add("A").unwrap();
        file.at_inline(&Point("init")).add("B").unwrap();
        assert_eq!(file.code(), "int x = /* INSERT:'init' */BA;");
    }

    #[test]
    fn test_every_occurrence_in_a_line() {
        let mut file = SourceFile::new("a.java", "f(/* INSERT:'arg' */, /* INSERT:'arg' */)");
        file.at_inline(&Point("arg")).add("1").unwrap();
        assert_eq!(file.code(), "f(/* INSERT:'arg' */1, /* INSERT:'arg' */1)");
    }

    #[test]
    fn test_line_separator_in_fragment_is_rejected() {
        let mut file = SourceFile::new("a.java", "/* INSERT:'arg' */");
        let result = file.at_inline(&Point("arg")).add("a\nb");
        assert!(matches!(result, Err(RenderError::MultilineCode(_))));
        assert!(!file.changed());
    }

    #[test]
    fn test_unknown_point_is_a_no_op() {
        let text = "class A {}\n";
        let mut file = SourceFile::new("a.java", text);
        let mut at = file.at_inline(&Point("missing"));
        assert!(at.is_no_op());
        at.add("whatever").unwrap();
        assert_eq!(file.code(), text);
        assert!(!file.changed());
    }
}
