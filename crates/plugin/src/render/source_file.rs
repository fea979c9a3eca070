use super::at_line::SourceAtLine;
use super::at_point::SourceAtPoint;
use super::insertion_point::InsertionPoint;
use std::path::{Path, PathBuf};

/// Number of spaces in one level of indentation unless configured otherwise.
pub const DEFAULT_INDENT_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent {
    pub size: usize,
}

impl Indent {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    pub fn at_level(&self, level: usize) -> String {
        " ".repeat(self.size * level)
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT_SIZE)
    }
}

/// Text of a generated file, held in memory while renderers edit it.
///
/// The text is kept as lines split on `\n`, so joining them back restores it exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    relative_path: PathBuf,
    lines: Vec<String>,
    changed: bool,
    created: bool,
    /// For each line, the whole-line marker whose insertion added it.
    origins: Vec<Option<String>>,
}

impl SourceFile {
    pub fn new(relative_path: impl Into<PathBuf>, code: &str) -> Self {
        let lines = split_lines(code);
        Self {
            relative_path: relative_path.into(),
            origins: vec![None; lines.len()],
            lines,
            changed: false,
            created: false,
        }
    }

    pub(crate) fn created(relative_path: impl Into<PathBuf>, code: &str) -> Self {
        Self {
            created: true,
            ..Self::new(relative_path, code)
        }
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    pub fn code(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Replaces the whole text of the file.
    pub fn overwrite(&mut self, code: &str) {
        let lines = split_lines(code);
        self.origins = vec![None; lines.len()];
        self.update_lines(lines);
    }

    /// Tells if the file was created or edited since it was read.
    pub fn changed(&self) -> bool {
        self.changed || self.created
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Replaces the lines, keeping their origins only if no line was added or removed.
    pub(crate) fn update_lines(&mut self, lines: Vec<String>) {
        if lines.len() != self.origins.len() {
            self.origins = vec![None; lines.len()];
        }
        if lines != self.lines {
            self.lines = lines;
            self.changed = true;
        }
    }

    pub(crate) fn tagged_lines(&self) -> Vec<(String, Option<String>)> {
        self.lines
            .iter()
            .cloned()
            .zip(self.origins.iter().cloned())
            .collect()
    }

    pub(crate) fn update_tagged(&mut self, tagged: Vec<(String, Option<String>)>) {
        let (lines, origins): (Vec<String>, Vec<Option<String>>) = tagged.into_iter().unzip();
        self.origins = origins;
        if lines != self.lines {
            self.lines = lines;
            self.changed = true;
        }
    }

    /// Prepares adding whole lines after every line marked with the point.
    pub fn at<'a>(&'a mut self, point: &dyn InsertionPoint) -> SourceAtLine<'a> {
        SourceAtLine::new(self, point.code_line())
    }

    /// Prepares adding code right after every inline marker of the point.
    ///
    /// If the file has no such marker, the returned value ignores everything added to it.
    pub fn at_inline<'a>(&'a mut self, point: &dyn InsertionPoint) -> SourceAtPoint<'a> {
        let marker = point.representation_in_code();
        if self.lines.iter().any(|line| line.contains(&marker)) {
            SourceAtPoint::Specific { file: self, marker }
        } else {
            SourceAtPoint::NoOp
        }
    }
}

fn split_lines(code: &str) -> Vec<String> {
    code.split('\n').map(str::to_string).collect()
}
