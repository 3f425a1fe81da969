//! Resolution of command-line arguments and `curtsy.toml` into a project

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use curtsy_core::config::CONFIG_FILE;
use curtsy_core::doc::ParseOptions;
use curtsy_core::{DocConfig, Project, SectionLayout};

/// Options shared by every command that parses sources
#[derive(clap::Args, Debug, Default)]
pub struct InputArgs {
    /// Source files to parse (defaults to the sources listed in curtsy.toml)
    pub files: Vec<PathBuf>,

    /// Directory that source names are made relative to
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Section layout: alternating or paired
    #[arg(long)]
    pub layout: Option<SectionLayout>,

    /// Keep going past files that fail to parse
    #[arg(short = 'k', long)]
    pub keep_going: bool,

    /// Keep preprocessor directives in the docs
    #[arg(long)]
    pub keep_directives: bool,
}

/// A project plus the run settings that came with it
pub struct Input {
    pub project: Project,
    pub keep_going: bool,
}

impl InputArgs {
    /// Build the project for this invocation, relative to `cwd`
    pub fn resolve(&self, cwd: &Path) -> Result<Input> {
        let (config, base) = self.load_config(cwd)?;

        let sources = if self.files.is_empty() {
            let sources = config
                .resolve_sources(&base)
                .context("failed to expand source patterns")?;
            if sources.is_empty() {
                anyhow::bail!("no source files given and none matched by {CONFIG_FILE}");
            }
            sources
        } else {
            self.files.iter().map(|f| cwd.join(f)).collect()
        };

        let root = match &self.root {
            Some(root) => cwd.join(root),
            None => config.resolve_root(&base),
        };

        let mut options: ParseOptions = config.parse_options();
        if let Some(layout) = self.layout {
            options.layout = layout;
        }
        if self.keep_directives {
            options.discard_directives = false;
        }

        tracing::debug!(
            files = sources.len(),
            root = %root.display(),
            layout = %options.layout,
            "resolved input"
        );
        let project = Project::new(sources, &root, options)?;
        Ok(Input {
            project,
            keep_going: self.keep_going || config.keep_going,
        })
    }

    /// The explicit config file, or `curtsy.toml` in `cwd` when present
    fn load_config(&self, cwd: &Path) -> Result<(DocConfig, PathBuf)> {
        let path = match &self.config {
            Some(path) => cwd.join(path),
            None => {
                let default = cwd.join(CONFIG_FILE);
                if !default.is_file() {
                    return Ok((DocConfig::default(), cwd.to_path_buf()));
                }
                default
            }
        };

        let config = DocConfig::from_path(&path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        let base = path.parent().map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
        tracing::debug!(config = %path.display(), "loaded configuration");
        Ok((config, base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_files_are_made_absolute() {
        let dir = TempDir::new().unwrap();
        let args = InputArgs {
            files: vec![PathBuf::from("a.cs")],
            ..InputArgs::default()
        };
        let input = args.resolve(dir.path()).unwrap();
        assert_eq!(input.project.sources(), &[dir.path().join("a.cs")]);
        assert!(!input.keep_going);
    }

    #[test]
    fn config_supplies_sources_and_flags_override() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/A.cs"), "class A {}\n").unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "root = \"src\"\nsources = [\"src/*.cs\"]\nkeep_going = true\n",
        )
        .unwrap();

        let args = InputArgs {
            layout: Some(SectionLayout::Paired),
            ..InputArgs::default()
        };
        let input = args.resolve(dir.path()).unwrap();
        assert!(input.keep_going);
        assert_eq!(input.project.sources().len(), 1);
        assert_eq!(input.project.resolver().root(), dir.path().join("src"));

        let doc = input.project.parse().unwrap();
        assert_eq!(doc.units[0].name, "A.cs");
    }

    #[test]
    fn nothing_to_parse_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(InputArgs::default().resolve(dir.path()).is_err());
    }
}
