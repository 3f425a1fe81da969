//! Project-wide documentation collection
//!
//! A [`Project`] owns the list of source files and drives each of them through
//! the tokenizer, the section parser and the section builder. Type declarations
//! from every file end up in one [`TypeRegistry`], which is what lets a
//! renderer link a type name to the document of the file that declares it.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use super::path::{PathError, PathResolver};
use super::registry::TypeRegistry;
use super::section::{ParseOptions, Section, SectionBuilder};
use crate::lexer::{LexError, Lexer};
use crate::parser::{ParseError, SectionParser};

/// Errors that stop a project from being set up or parsed
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("source path must be absolute: {}", .0.display())]
    RelativeSource(PathBuf),

    #[error("invalid root: {0}")]
    Root(#[from] PathError),

    #[error(transparent)]
    File(#[from] FileError),
}

/// A failure while processing one source file
#[derive(Error, Debug)]
#[error("{}: {}", .path.display(), .kind)]
pub struct FileError {
    pub path: PathBuf,
    #[source]
    pub kind: FileErrorKind,
}

impl FileError {
    /// Line the failure refers to, when known
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match &self.kind {
            FileErrorKind::Parse(e) => e.line(),
            FileErrorKind::Io(_) | FileErrorKind::Path(_) => None,
        }
    }
}

/// What went wrong with a file
#[derive(Error, Debug)]
pub enum FileErrorKind {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<LexError> for FileErrorKind {
    fn from(e: LexError) -> Self {
        Self::Parse(e.into())
    }
}

/// The parsed form of one source file
#[derive(Debug, Clone, Serialize)]
pub struct SourceUnit {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Root-relative name, `/`-separated
    pub name: String,
    pub sections: Vec<Section>,
    /// Human readable file size
    pub size: String,
}

impl SourceUnit {
    /// Path of the document generated for this unit
    #[must_use]
    pub fn output_path(&self) -> String {
        PathResolver::output_path(&self.name)
    }
}

/// A link from a unit to the document declaring a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeLink {
    /// The type name as declared
    pub name: String,
    /// Href relative to the linking document
    pub href: String,
}

/// Everything produced by a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectDoc {
    /// Parsed files, in source order
    pub units: Vec<SourceUnit>,
    /// Every type declared across the units
    pub types: TypeRegistry,
}

impl ProjectDoc {
    /// Look up a unit by its root-relative name
    pub fn unit(&self, name: &str) -> Option<&SourceUnit> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Links to types declared in other files, as seen from unit `from`
    pub fn links_from(&self, from: &str) -> Vec<TypeLink> {
        self.types
            .iter()
            .filter(|d| d.file != from)
            .map(|d| TypeLink {
                name: d.name.clone(),
                href: PathResolver::link(from, &d.file),
            })
            .collect()
    }
}

/// A set of source files sharing a root directory
#[derive(Debug, Clone)]
pub struct Project {
    sources: Vec<PathBuf>,
    resolver: PathResolver,
    options: ParseOptions,
}

impl Project {
    /// Create a project. Every source path must be absolute.
    pub fn new(
        sources: Vec<PathBuf>,
        root: impl AsRef<Path>,
        options: ParseOptions,
    ) -> Result<Self, ProjectError> {
        if let Some(relative) = sources.iter().find(|p| !p.is_absolute()) {
            return Err(ProjectError::RelativeSource(relative.clone()));
        }
        Ok(Self {
            sources,
            resolver: PathResolver::new(root)?,
            options,
        })
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Parse every source, stopping at the first failure
    pub fn parse(&self) -> Result<ProjectDoc, ProjectError> {
        let mut doc = ProjectDoc::default();
        for path in &self.sources {
            let unit = self.parse_file(path, &mut doc.types)?;
            doc.units.push(unit);
        }
        tracing::debug!(
            files = doc.units.len(),
            types = doc.types.len(),
            "parsed project"
        );
        Ok(doc)
    }

    /// Parse every source, collecting failures instead of stopping.
    ///
    /// A file that fails contributes neither a unit nor any types.
    pub fn parse_lenient(&self) -> (ProjectDoc, Vec<FileError>) {
        let mut doc = ProjectDoc::default();
        let mut failures = Vec::new();
        for path in &self.sources {
            match self.parse_file(path, &mut doc.types) {
                Ok(unit) => doc.units.push(unit),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e.kind, "skipping file");
                    failures.push(e);
                }
            }
        }
        tracing::debug!(
            files = doc.units.len(),
            failed = failures.len(),
            types = doc.types.len(),
            "parsed project"
        );
        (doc, failures)
    }

    /// Parse one file, adding its types to `registry` only if it succeeds
    pub fn parse_file(&self, path: &Path, registry: &mut TypeRegistry) -> Result<SourceUnit, FileError> {
        self.parse_file_inner(path, registry).map_err(|kind| FileError {
            path: path.to_path_buf(),
            kind,
        })
    }

    fn parse_file_inner(&self, path: &Path, registry: &mut TypeRegistry) -> Result<SourceUnit, FileErrorKind> {
        let name = self.resolver.relative(path)?;
        let source = std::fs::read_to_string(path)?;
        let tokens = Lexer::tokenize(&source)?;
        let token_count = tokens.len();

        let file = File::open(path)?;
        let size = file.metadata()?.len();

        let mut scratch = TypeRegistry::new();
        let events = SectionParser::new(tokens, BufReader::new(file), name.as_str())
            .verify_against(&source)
            .parse(&mut scratch)?;
        let sections = SectionBuilder::new(self.options).build(&events);
        registry
            .merge(scratch)
            .map_err(|e| FileErrorKind::Parse(e.into()))?;

        tracing::debug!(
            file = %name,
            tokens = token_count,
            lines = events.len(),
            sections = sections.len(),
            "parsed file"
        );
        Ok(SourceUnit {
            path: path.to_path_buf(),
            name,
            sections,
            size: format_file_size(size),
        })
    }
}

/// Format a byte count with the largest unit that keeps the value at or
/// above one, to at most two decimals
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut order = 0;
    while size >= 1024.0 && order + 1 < UNITS.len() {
        order += 1;
        size /= 1024.0;
    }

    let value = format!("{size:.2}");
    let value = value.trim_end_matches('0').trim_end_matches('.');
    format!("{value} {}", UNITS[order])
}
