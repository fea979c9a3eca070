use super::source_file::{Indent, SourceFile};
use crate::error::RenderError;

/// Adds whole lines of code after the lines holding an insertion point marker.
pub struct SourceAtLine<'a> {
    file: &'a mut SourceFile,
    marker: String,
    indent: Indent,
    level: usize,
}

impl<'a> SourceAtLine<'a> {
    pub(crate) fn new(file: &'a mut SourceFile, marker: String) -> Self {
        Self {
            file,
            marker,
            indent: Indent::default(),
            level: 0,
        }
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    /// Indents every added line by the given number of levels.
    pub fn with_extra_indentation(mut self, level: i32) -> Result<Self, RenderError> {
        self.level = usize::try_from(level).map_err(|_| RenderError::NegativeIndent(level))?;
        Ok(self)
    }

    /// Inserts the lines after each occurrence of the marker, below the lines added
    /// there by earlier calls.
    ///
    /// A line containing `\n` is split, and only its first part gets the indentation.
    pub fn add<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefix = self.indent.at_level(self.level);
        let code: Vec<String> = lines
            .into_iter()
            .map(|line| format!("{prefix}{}", line.as_ref()))
            .collect();
        if code.is_empty() {
            return;
        }
        let new_lines: Vec<String> = code.join("\n").split('\n').map(str::to_string).collect();

        let source = self.file.tagged_lines();
        let mut updated = Vec::with_capacity(source.len() + new_lines.len());
        let mut found = false;
        let mut rest = source.into_iter().peekable();
        while let Some(line) = rest.next() {
            let marked = line.0.contains(&self.marker);
            updated.push(line);
            if marked {
                // Lines added here by earlier calls stay above the new ones.
                while let Some(earlier) = rest.next_if(|(_, origin)| {
                    origin.as_deref() == Some(self.marker.as_str())
                }) {
                    updated.push(earlier);
                }
                updated.extend(
                    new_lines
                        .iter()
                        .map(|l| (l.clone(), Some(self.marker.clone()))),
                );
                found = true;
            }
        }
        if found {
            self.file.update_tagged(updated);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::insertion_point::{InsertionPoint, TextCoordinates};

    struct Point;

    impl InsertionPoint for Point {
        fn label(&self) -> String {
            "members".to_string()
        }

        fn locate(&self, _text: &str) -> Vec<TextCoordinates> {
            Vec::new()
        }
    }

    #[test]
    fn test_successive_insertions_keep_call_order() {
        let mut file = SourceFile::new("Zoo.java", "class Zoo {\n// INSERT:'members'\n}");
        file.at(&Point).add(["x"]);
        file.at(&Point).add(["y"]);
        assert_eq!(file.code(), "class Zoo {\n// INSERT:'members'\nx\ny\n}");
    }

    #[test]
    fn test_repeated_marker_gets_code_after_each_occurrence() {
        let mut file = SourceFile::new("a.java", "// INSERT:'members'\nA\n// INSERT:'members'\nB");
        file.at(&Point).add(["1", "2"]);
        assert_eq!(
            file.lines(),
            &["// INSERT:'members'", "1", "2", "A", "// INSERT:'members'", "1", "2", "B"]
        );
    }

    #[test]
    fn test_successive_insertions_at_repeated_marker() {
        let mut file = SourceFile::new("a.java", "// INSERT:'members'\nA\n// INSERT:'members'\nB");
        file.at(&Point).add(["1"]);
        file.at(&Point).add(["2", "3"]);
        assert_eq!(
            file.lines(),
            &[
                "// INSERT:'members'",
                "1",
                "2",
                "3",
                "A",
                "// INSERT:'members'",
                "1",
                "2",
                "3",
                "B"
            ]
        );
    }

    struct Other;

    impl InsertionPoint for Other {
        fn label(&self) -> String {
            "other".to_string()
        }

        fn locate(&self, _text: &str) -> Vec<TextCoordinates> {
            Vec::new()
        }
    }

    #[test]
    fn test_marker_added_between_calls_gets_code_right_after_it() {
        let mut file = SourceFile::new("a.java", "// INSERT:'members'\nA\n// INSERT:'other'\nB");
        file.at(&Point).add(["x"]);
        file.at(&Other).add(["// INSERT:'members'"]);
        file.at(&Point).add(["y"]);
        assert_eq!(
            file.lines(),
            &[
                "// INSERT:'members'",
                "x",
                "y",
                "A",
                "// INSERT:'other'",
                "// INSERT:'members'",
                "y",
                "B"
            ]
        );
    }

    #[test]
    fn test_overwrite_forgets_earlier_insertions() {
        let mut file = SourceFile::new("a.java", "// INSERT:'members'\nA");
        file.at(&Point).add(["x"]);
        file.overwrite("// INSERT:'members'\nx");
        file.at(&Point).add(["y"]);
        assert_eq!(file.lines(), &["// INSERT:'members'", "y", "x"]);
    }

    #[test]
    fn test_extra_indentation() {
        let mut file = SourceFile::new("a.java", "// INSERT:'members'");
        file.at(&Point)
            .with_extra_indentation(2)
            .unwrap()
            .add(["int x;", "int y;"]);
        assert_eq!(file.lines()[1], "        int x;");
        assert_eq!(file.lines()[2], "        int y;");

        let err = file.at(&Point).with_extra_indentation(-1).err();
        assert!(matches!(err, Some(RenderError::NegativeIndent(-1))));
    }

    #[test]
    fn test_missing_marker_leaves_file_unchanged() {
        let mut file = SourceFile::new("a.java", "class A {}\n");
        file.at(&Point).add(["x"]);
        assert_eq!(file.code(), "class A {}\n");
        assert!(!file.changed());
    }
}
