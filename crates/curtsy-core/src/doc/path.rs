//! Root-relative paths and links between generated documents
//!
//! All paths handed out here use `/` as the separator regardless of platform,
//! since they end up as registry keys and as hrefs.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Path resolution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("root path cannot be empty")]
    EmptyRoot,

    #[error("path cannot be empty")]
    EmptyPath,

    /// The path lives on a different volume than the root
    #[error("'{path}' cannot be made relative to '{root}'")]
    Unrelated { path: PathBuf, root: PathBuf },
}

/// Produces paths relative to a fixed root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Create a resolver for `root`, which is treated as a directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, PathError> {
        let root = root.as_ref();
        if root.as_os_str().is_empty() {
            return Err(PathError::EmptyRoot);
        }
        Ok(Self {
            root: normalize(root),
        })
    }

    /// The normalized root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `path` relative to the root, `/`-separated.
    ///
    /// Relative inputs are taken as relative to the root. Paths outside the
    /// root climb out of it with `..` segments.
    pub fn relative(&self, path: impl AsRef<Path>) -> Result<String, PathError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(PathError::EmptyPath);
        }
        let path = if path.is_relative() {
            normalize(&self.root.join(path))
        } else {
            normalize(path)
        };

        let root: Vec<Component<'_>> = self.root.components().collect();
        let target: Vec<Component<'_>> = path.components().collect();

        if let (Some(Component::Prefix(a)), Some(Component::Prefix(b))) = (root.first(), target.first()) {
            if a != b {
                return Err(PathError::Unrelated {
                    path,
                    root: self.root.clone(),
                });
            }
        }

        let common = root
            .iter()
            .zip(&target)
            .take_while(|(a, b)| a == b)
            .count();

        let mut segments: Vec<String> = Vec::new();
        segments.extend(root[common..].iter().map(|_| "..".to_string()));
        segments.extend(
            target[common..]
                .iter()
                .map(|c| c.as_os_str().to_string_lossy().into_owned()),
        );
        Ok(segments.join("/"))
    }

    /// Document path for a root-relative source path: extension replaced by
    /// `.html`, lowercased
    #[must_use]
    pub fn output_path(relative: &str) -> String {
        let (dir, file) = match relative.rsplit_once('/') {
            Some((dir, file)) => (Some(dir), file),
            None => (None, relative),
        };
        let stem = match file.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => file,
        };
        let output = match dir {
            Some(dir) => format!("{dir}/{stem}.html"),
            None => format!("{stem}.html"),
        };
        output.to_lowercase()
    }

    /// Href from the document of `from` to the document of `to`, both
    /// root-relative source paths
    #[must_use]
    pub fn link(from: &str, to: &str) -> String {
        let depth = from.matches('/').count();
        format!("{}{}", "../".repeat(depth), Self::output_path(to))
    }
}

/// Lexically resolve `.` and `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `..` above the filesystem root stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }
    parts.iter().collect()
}
