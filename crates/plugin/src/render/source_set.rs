use super::source_file::SourceFile;
use crate::error::RenderError;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Generated files read from one root and written to another (or the same) root.
///
/// Files are keyed by their path relative to the roots.
#[derive(Debug, Clone)]
pub struct SourceFileSet {
    input_root: Option<PathBuf>,
    output_root: PathBuf,
    files: IndexMap<PathBuf, SourceFile>,
    deleted: BTreeSet<PathBuf>,
}

impl SourceFileSet {
    /// Reads every regular file under the root. The files are written back to the same root.
    pub fn from_root(root: impl Into<PathBuf>) -> Result<Self, RenderError> {
        let root = root.into();
        Self::create(root.clone(), root)
    }

    pub fn create(
        input_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
    ) -> Result<Self, RenderError> {
        let input_root = input_root.into();
        let files = read_files(&input_root)?;
        debug!(
            "read {} source file(s) from {}",
            files.len(),
            input_root.display()
        );
        Ok(Self {
            input_root: Some(input_root),
            output_root: output_root.into(),
            files,
            deleted: BTreeSet::new(),
        })
    }

    /// A set with no files, for an output root that has no inputs.
    pub fn empty(output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: None,
            output_root: output_root.into(),
            files: IndexMap::new(),
            deleted: BTreeSet::new(),
        }
    }

    pub fn input_root(&self) -> Option<&Path> {
        self.input_root.as_deref()
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SourceFile> {
        self.files.values_mut()
    }

    pub fn find_file(&self, path: &Path) -> Option<&SourceFile> {
        self.files.get(path)
    }

    pub fn find_file_mut(&mut self, path: &Path) -> Option<&mut SourceFile> {
        self.files.get_mut(path)
    }

    pub fn file(&self, path: &Path) -> Result<&SourceFile, RenderError> {
        self.files
            .get(path)
            .ok_or_else(|| RenderError::FileNotFound(path.to_path_buf()))
    }

    pub fn file_mut(&mut self, path: &Path) -> Result<&mut SourceFile, RenderError> {
        self.files
            .get_mut(path)
            .ok_or_else(|| RenderError::FileNotFound(path.to_path_buf()))
    }

    pub fn create_file(
        &mut self,
        path: impl Into<PathBuf>,
        code: &str,
    ) -> Result<&mut SourceFile, RenderError> {
        let path = path.into();
        if self.files.contains_key(&path) {
            return Err(RenderError::AlreadyExists(path));
        }
        self.deleted.remove(&path);
        let file = SourceFile::created(path.clone(), code);
        Ok(self.files.entry(path).or_insert(file))
    }

    pub fn delete(&mut self, path: &Path) -> Result<(), RenderError> {
        self.files
            .shift_remove(path)
            .ok_or_else(|| RenderError::FileNotFound(path.to_path_buf()))?;
        self.deleted.insert(path.to_path_buf());
        Ok(())
    }

    /// Copies the files matching the predicate into a new set with the same roots.
    ///
    /// Changes made to the subset become visible here after [`SourceFileSet::merge_back`].
    pub fn subset_where(&self, predicate: impl Fn(&SourceFile) -> bool) -> SourceFileSet {
        SourceFileSet {
            input_root: self.input_root.clone(),
            output_root: self.output_root.clone(),
            files: self
                .files
                .iter()
                .filter(|(_, f)| predicate(f))
                .map(|(p, f)| (p.clone(), f.clone()))
                .collect(),
            deleted: BTreeSet::new(),
        }
    }

    pub fn merge_back(&mut self, subset: SourceFileSet) {
        for path in subset.deleted {
            self.files.shift_remove(&path);
            self.deleted.insert(path);
        }
        for (path, file) in subset.files {
            self.deleted.remove(&path);
            self.files.insert(path, file);
        }
    }

    /// Writes created and changed files to the output root and removes deleted ones.
    ///
    /// Returns the number of files written. Files are written one by one; a failure
    /// leaves the files written before it in place.
    pub fn write(&self) -> Result<usize, RenderError> {
        for path in &self.deleted {
            let target = self.output_root.join(path);
            match fs::remove_file(&target) {
                Ok(()) => trace!("deleted {}", target.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(RenderError::io(target, e)),
            }
        }
        let mut written = 0;
        for file in self.files.values().filter(|f| f.changed()) {
            let target = self.output_root.join(file.relative_path());
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| RenderError::io(parent, e))?;
            }
            fs::write(&target, file.code()).map_err(|e| RenderError::io(&target, e))?;
            trace!("wrote {}", target.display());
            written += 1;
        }
        debug!(
            "wrote {} file(s) to {}",
            written,
            self.output_root.display()
        );
        Ok(written)
    }
}

fn read_files(root: &Path) -> Result<IndexMap<PathBuf, SourceFile>, RenderError> {
    let mut files = IndexMap::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| RenderError::io(root, e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let code = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::InvalidData => RenderError::NotUtf8(path.to_path_buf()),
            _ => RenderError::io(path, e),
        })?;
        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        files.insert(relative.clone(), SourceFile::new(relative, &code));
    }
    Ok(files)
}
