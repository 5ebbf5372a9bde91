pub mod ast;
mod parser;

use crate::debugger::error::Error;
use crate::debugger::source::ast::File;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Position in a source text. Line is 1-based, column is 1-based byte offset inside a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: u64,
    pub column: u64,
}

/// Maps byte offsets into line/column positions.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    pub fn position(&self, offset: usize) -> Position {
        let line_idx = self
            .starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.starts.get(line_idx).copied().unwrap_or_default();
        Position {
            line: line_idx as u64 + 1,
            column: (offset - line_start) as u64 + 1,
        }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}

/// Parsed source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    syntax: Rc<File>,
    lines: LineIndex,
}

impl SourceFile {
    /// Parse source text of file `name`.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, Error> {
        let name = name.into();
        let syntax = parser::parse(text).map_err(|errors| Error::SourceParsing {
            file: name.clone(),
            reason: errors.join("; "),
        })?;
        Ok(Self {
            name,
            syntax: Rc::new(syntax),
            lines: LineIndex::new(text),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn syntax(&self) -> &File {
        &self.syntax
    }

    /// Package name of a file.
    pub fn package(&self) -> &str {
        &self.syntax.package.name
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }
}

/// Source of parsed files.
pub trait SourceProvider {
    fn parse(&self, filename: &str) -> Result<SourceFile, Error>;
}

impl<T: SourceProvider + ?Sized> SourceProvider for &T {
    fn parse(&self, filename: &str) -> Result<SourceFile, Error> {
        (**self).parse(filename)
    }
}

/// Reads source files from file system. Relative file names are resolved against root
/// directory if it is set.
#[derive(Debug, Clone, Default)]
pub struct FsSource {
    root: Option<PathBuf>,
}

impl FsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn path(&self, filename: &str) -> PathBuf {
        let path = Path::new(filename);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl SourceProvider for FsSource {
    fn parse(&self, filename: &str) -> Result<SourceFile, Error> {
        let path = self.path(filename);
        if !path.exists() {
            return Err(Error::SourceNotFound(path));
        }
        let text = std::fs::read_to_string(&path)?;
        SourceFile::parse(filename, &text)
    }
}
