//! Curtsy Core - annotated-source documentation engine
//!
//! This crate provides the core functionality:
//! - Lexer: Tokenization of C# style source code
//! - Parser: Classification of each line as comment or code, and discovery
//!   of type declarations
//! - Doc: Sections, the cross-file type registry and project runs
//! - Config: `curtsy.toml` loading
//!
//! Rendering is left to the caller: a [`ProjectDoc`] carries everything a
//! renderer needs.

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lexer module - tokenization of annotated source
pub mod lexer;

/// Parser module - turns tokens into classified lines
pub mod parser;

/// Documentation model - sections, type registry, paths and projects
pub mod doc;

/// Run configuration
pub mod config;

/// Convenience re-export of lexer
pub use lexer::Lexer;

/// Convenience re-export of parser
pub use parser::{parse_source, SectionParser};

/// Convenience re-export of the documentation model
pub use doc::{
    Project, ProjectDoc, Section, SectionBuilder, SectionLayout, SourceUnit, TypeRegistry,
};

/// Convenience re-export of configuration
pub use config::DocConfig;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn source_to_sections() {
        let mut registry = TypeRegistry::new();
        let events = parse_source(
            "// Entry point.\nclass Program {\n}\n",
            "Program.cs",
            &mut registry,
        )
        .unwrap();
        let sections = SectionBuilder::default().build(&events);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].docs, "Entry point.");
        assert_eq!(sections[1].code, "class Program {\n}");
        assert_eq!(registry.len(), 1);
    }
}
