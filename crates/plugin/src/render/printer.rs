use super::insertion_point::{InsertionPoint, TextCoordinates};
use super::source_file::SourceFile;
use super::source_set::SourceFileSet;
use crate::context::CodegenContext;
use crate::error::RenderError;
use crate::plugin::Renderer;
use protoweave_api::Language;
use std::cmp::Reverse;
use std::sync::Arc;

/// Prints the markers of insertion points into the files of one language.
///
/// A point located at a line becomes a comment line of its own; a point located at a
/// column becomes its inline marker. Markers are printed from the end of a file to its
/// start, so coordinates found in the original text stay valid.
pub struct InsertionPointPrinter {
    language: Language,
    points: Vec<Arc<dyn InsertionPoint>>,
}

impl InsertionPointPrinter {
    pub fn new(language: Language, points: Vec<Arc<dyn InsertionPoint>>) -> Self {
        Self { language, points }
    }

    fn print(&self, file: &mut SourceFile) {
        let code = file.code();
        let mut located: Vec<(TextCoordinates, &dyn InsertionPoint)> = self
            .points
            .iter()
            .flat_map(|point| {
                point
                    .locate(&code)
                    .into_iter()
                    .map(move |coords| (coords, point.as_ref()))
            })
            .filter(|(coords, _)| *coords != TextCoordinates::Nowhere)
            .collect();
        if located.is_empty() {
            return;
        }
        let line_count = file.lines().len();
        located.sort_by_key(|(coords, _)| Reverse(position(*coords, line_count)));

        let mut lines = file.tagged_lines();
        for (coords, point) in located {
            let comment = (self.language.comment(&point.code_line()), None);
            match coords {
                TextCoordinates::StartOfFile => lines.insert(0, comment),
                TextCoordinates::EndOfFile => {
                    // Text ending with a newline keeps it after the marker.
                    let at = match lines.last() {
                        Some((last, _)) if last.is_empty() => lines.len() - 1,
                        _ => lines.len(),
                    };
                    lines.insert(at, comment);
                }
                TextCoordinates::Line(index) => lines.insert(index.min(lines.len()), comment),
                TextCoordinates::LineAndColumn { line, column } => {
                    if let Some((target, _)) = lines.get_mut(line) {
                        let at = byte_offset(target, column);
                        target.insert_str(at, &point.representation_in_code());
                    }
                }
                TextCoordinates::Nowhere => {}
            }
        }
        file.update_tagged(lines);
    }
}

impl Renderer for InsertionPointPrinter {
    fn name(&self) -> String {
        format!("insertion-point-printer:{}", self.language)
    }

    fn language(&self) -> Language {
        self.language.clone()
    }

    fn render(&self, _ctx: &CodegenContext, sources: &mut SourceFileSet) -> Result<(), RenderError> {
        for file in sources.iter_mut() {
            self.print(file);
        }
        Ok(())
    }
}

/// Orders coordinates from the top of a file to its bottom.
///
/// Within a line, inline markers come after the start of the line, so going backwards
/// they are printed before a comment line is inserted above them.
fn position(coords: TextCoordinates, line_count: usize) -> (usize, usize) {
    match coords {
        TextCoordinates::StartOfFile => (0, 0),
        TextCoordinates::Line(line) => (line, 1),
        TextCoordinates::LineAndColumn { line, column } => (line, column + 2),
        TextCoordinates::EndOfFile | TextCoordinates::Nowhere => (line_count, usize::MAX),
    }
}

fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}
