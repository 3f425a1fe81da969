//! Run configuration (`curtsy.toml`) parsing and validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::doc::{ParseOptions, SectionLayout};

/// Name of the configuration file looked up by the CLI.
pub const CONFIG_FILE: &str = "curtsy.toml";

/// Errors that can occur when loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid source pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("failed to expand source pattern: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// The contents of a `curtsy.toml` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocConfig {
    /// Root directory for relative names, relative to the config file.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Glob patterns selecting the sources, relative to the config file.
    #[serde(default)]
    pub sources: Vec<String>,

    /// How lines are grouped into sections.
    #[serde(default)]
    pub layout: SectionLayout,

    /// Keep going past files that fail to parse.
    #[serde(default)]
    pub keep_going: bool,

    /// Drop preprocessor directives from the docs.
    #[serde(default = "default_true")]
    pub discard_directives: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            root: None,
            sources: Vec::new(),
            layout: SectionLayout::default(),
            keep_going: false,
            discard_directives: true,
        }
    }
}

impl DocConfig {
    /// Load a configuration from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid("source patterns cannot be empty"));
        }
        if self.root.as_ref().is_some_and(|r| r.as_os_str().is_empty()) {
            return Err(ConfigError::Invalid("root cannot be empty"));
        }
        for pattern in &self.sources {
            glob::Pattern::new(pattern).map_err(|source| ConfigError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Parser options carried by this configuration.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            layout: self.layout,
            discard_directives: self.discard_directives,
        }
    }

    /// Root directory, resolved against `base`.
    pub fn resolve_root(&self, base: &Path) -> PathBuf {
        match &self.root {
            Some(root) => base.join(root),
            None => base.to_path_buf(),
        }
    }

    /// Expand the source patterns against `base`, in pattern order.
    ///
    /// Matches within one pattern are sorted; a file matched by two patterns
    /// is listed once.
    pub fn resolve_sources(&self, base: &Path) -> Result<Vec<PathBuf>, ConfigError> {
        let mut sources: Vec<PathBuf> = Vec::new();
        for pattern in &self.sources {
            let full = base.join(pattern);
            let full = full.to_string_lossy();
            let entries = glob::glob(&full).map_err(|source| ConfigError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;

            let mut matched = Vec::new();
            for entry in entries {
                let path = entry?;
                if path.is_file() && !sources.contains(&path) {
                    matched.push(path);
                }
            }
            matched.sort();
            tracing::debug!(pattern = %pattern, files = matched.len(), "expanded source pattern");
            sources.extend(matched);
        }
        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parse_empty_config() {
        let config = DocConfig::parse("").unwrap();
        assert!(config.sources.is_empty());
        assert_eq!(config.layout, SectionLayout::Alternating);
        assert!(config.discard_directives);
        assert!(!config.keep_going);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
root = "src"
sources = ["src/**/*.cs", "tools/*.cs"]
layout = "paired"
keep_going = true
discard_directives = false
"#;
        let config = DocConfig::parse(toml).unwrap();
        assert_eq!(config.root, Some(PathBuf::from("src")));
        assert_eq!(config.sources.len(), 2);
        assert_eq!(
            config.parse_options(),
            ParseOptions {
                layout: SectionLayout::Paired,
                discard_directives: false,
            }
        );
        assert!(config.keep_going);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            DocConfig::parse("sorces = []"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            DocConfig::parse("layout = \"docco\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            DocConfig::parse("sources = [\"\"]"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DocConfig::parse("sources = [\"src/[*.cs\"]"),
            Err(ConfigError::Pattern { .. })
        ));
    }

    #[test]
    fn resolve_sources_expands_globs() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        fs::write(dir.path().join("src/b.cs"), "").unwrap();
        fs::write(dir.path().join("src/a.cs"), "").unwrap();
        fs::write(dir.path().join("src/nested/c.cs"), "").unwrap();
        fs::write(dir.path().join("src/notes.txt"), "").unwrap();

        let config = DocConfig::parse("sources = [\"src/*.cs\", \"src/**/*.cs\"]").unwrap();
        let sources = config.resolve_sources(dir.path()).unwrap();
        let names: Vec<_> = sources
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["src/a.cs", "src/b.cs", "src/nested/c.cs"]);
    }

    #[test]
    fn resolve_root_is_relative_to_base() {
        let config = DocConfig::parse("root = \"src\"").unwrap();
        assert_eq!(config.resolve_root(Path::new("/p")), PathBuf::from("/p/src"));
        assert_eq!(
            DocConfig::default().resolve_root(Path::new("/p")),
            PathBuf::from("/p")
        );
    }
}
