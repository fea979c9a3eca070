use std::borrow::Cow;
use std::fmt;
use std::path::Path;

/// How a language writes a comment that spans the rest of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentSyntax {
    Line(&'static str),
    Block {
        open: &'static str,
        close: &'static str,
    },
}

impl CommentSyntax {
    pub fn comment(&self, text: &str) -> String {
        match self {
            CommentSyntax::Line(start) => format!("{start} {text}"),
            CommentSyntax::Block { open, close } => format!("{open} {text} {close}"),
        }
    }
}

/// Target language of generated source files.
///
/// A language knows the file extensions it owns and how to write a line comment, which
/// is what renderers need to scope their work and to print insertion point markers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language {
    name: Cow<'static, str>,
    extensions: &'static [&'static str],
    comment: CommentSyntax,
}

const SLASHES: CommentSyntax = CommentSyntax::Line("//");
const HASH: CommentSyntax = CommentSyntax::Line("#");

impl Language {
    pub const JAVA: Language = Language::predefined("java", &["java"], SLASHES);
    pub const KOTLIN: Language = Language::predefined("kotlin", &["kt", "kts"], SLASHES);
    pub const TYPESCRIPT: Language = Language::predefined("typescript", &["ts"], SLASHES);
    pub const JAVASCRIPT: Language = Language::predefined("javascript", &["js"], SLASHES);
    pub const RUST: Language = Language::predefined("rust", &["rs"], SLASHES);
    pub const GO: Language = Language::predefined("go", &["go"], SLASHES);
    pub const PYTHON: Language = Language::predefined("python", &["py", "pyi"], HASH);
    pub const CPP: Language =
        Language::predefined("cpp", &["cc", "cpp", "cxx", "h", "hpp"], SLASHES);
    /// Matches every file regardless of its extension.
    pub const ANY: Language = Language::predefined("any", &[], SLASHES);

    const fn predefined(
        name: &'static str,
        extensions: &'static [&'static str],
        comment: CommentSyntax,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            extensions,
            comment,
        }
    }

    pub fn new(
        name: impl Into<Cow<'static, str>>,
        extensions: &'static [&'static str],
        comment: CommentSyntax,
    ) -> Self {
        Self {
            name: name.into(),
            extensions,
            comment,
        }
    }

    /// Map a file extension to one of the predefined languages.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        [
            Self::JAVA,
            Self::KOTLIN,
            Self::TYPESCRIPT,
            Self::JAVASCRIPT,
            Self::RUST,
            Self::GO,
            Self::PYTHON,
            Self::CPP,
        ]
        .into_iter()
        .find(|lang| lang.extensions.contains(&ext.as_str()))
    }

    pub fn by_name(name: &str) -> Option<Self> {
        [
            Self::JAVA,
            Self::KOTLIN,
            Self::TYPESCRIPT,
            Self::JAVASCRIPT,
            Self::RUST,
            Self::GO,
            Self::PYTHON,
            Self::CPP,
            Self::ANY,
        ]
        .into_iter()
        .find(|lang| lang.name.eq_ignore_ascii_case(name))
    }

    /// Tells if a file with the given path is written in this language.
    pub fn matches(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Wraps the text into a comment that takes the rest of a line.
    pub fn comment(&self, text: &str) -> String {
        self.comment.comment(text)
    }

    pub fn comment_syntax(&self) -> CommentSyntax {
        self.comment
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl AsRef<str> for Language {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_by_extension() {
        assert!(Language::JAVA.matches(Path::new("src/acme/Zoo.java")));
        assert!(!Language::JAVA.matches(Path::new("src/acme/zoo.kt")));
        assert!(Language::KOTLIN.matches(Path::new("build.gradle.KTS")));
        assert!(Language::ANY.matches(Path::new("README")));
    }

    #[test]
    fn test_comment_syntax() {
        assert_eq!(Language::JAVA.comment("INSERT:'x'"), "// INSERT:'x'");
        assert_eq!(Language::PYTHON.comment("INSERT:'x'"), "# INSERT:'x'");
        let css = Language::new(
            "css",
            &["css"],
            CommentSyntax::Block {
                open: "/*",
                close: "*/",
            },
        );
        assert_eq!(css.comment("x"), "/* x */");
    }

    #[test]
    fn test_lookup() {
        assert_eq!(Language::from_extension("RS"), Some(Language::RUST));
        assert_eq!(Language::from_extension("proto"), None);
        assert_eq!(Language::by_name("Kotlin"), Some(Language::KOTLIN));
    }
}
