//! Documentation model
//!
//! Sections, the type registry, root-relative paths and the project run that
//! ties them together.

mod path;
mod project;
mod registry;
mod section;

pub use path::{PathError, PathResolver};
pub use project::{
    format_file_size, FileError, FileErrorKind, Project, ProjectDoc, ProjectError, SourceUnit,
    TypeLink,
};
pub use registry::{RegistryError, TypeDeclaration, TypeKind, TypeRegistry};
pub use section::{
    is_directive, strip_comment_markers, ParseOptions, Section, SectionBuilder, SectionLayout,
};
