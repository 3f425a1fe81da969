//! Registry of type declarations found while parsing
//!
//! Types are keyed by (name, file). The key is weak on purpose: namespaces and
//! partial types are not tracked, so two same-named types declared in one file
//! collide and are reported as duplicates rather than silently merged. Fixing
//! this would require a namespace stack during parsing.

use std::collections::HashMap;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// The kind of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Struct,
    Enum,
    Interface,
    Delegate,
}

impl TypeKind {
    /// The keyword that declares this kind
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Interface => "interface",
            Self::Delegate => "delegate",
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A type declaration discovered in a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDeclaration {
    /// Type name, including any generic parameter block (`Foo<T>`)
    pub name: String,
    /// The kind of declaration
    pub kind: TypeKind,
    /// Root-relative path of the declaring file
    pub file: String,
    /// 1-indexed line of the declaration
    pub line: usize,
}

/// Registry errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error(
        "duplicate type '{name}' in {file}: declared at line {first_line} and again at line {second_line}"
    )]
    DuplicateType {
        name: String,
        file: String,
        first_line: usize,
        second_line: usize,
    },
}

/// Append-only store of type declarations, in insertion order
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    declarations: Vec<TypeDeclaration>,
    /// (name, file) -> index into `declarations`
    index: HashMap<(String, String), usize>,
}

impl TypeRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration.
    ///
    /// Fails if a type with the same name was already registered for `file`.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        kind: TypeKind,
    ) -> Result<(), RegistryError> {
        self.insert(TypeDeclaration {
            name: name.into(),
            kind,
            file: file.into(),
            line,
        })
    }

    fn insert(&mut self, declaration: TypeDeclaration) -> Result<(), RegistryError> {
        let key = (declaration.name.clone(), declaration.file.clone());
        if let Some(&existing) = self.index.get(&key) {
            return Err(self.duplicate(existing, &declaration));
        }

        tracing::trace!(
            name = %declaration.name,
            kind = %declaration.kind,
            file = %declaration.file,
            line = declaration.line,
            "registered type"
        );
        self.index.insert(key, self.declarations.len());
        self.declarations.push(declaration);
        Ok(())
    }

    fn duplicate(&self, existing: usize, declaration: &TypeDeclaration) -> RegistryError {
        RegistryError::DuplicateType {
            name: declaration.name.clone(),
            file: declaration.file.clone(),
            first_line: self.declarations[existing].line,
            second_line: declaration.line,
        }
    }

    /// Move every declaration of `other` into this registry.
    ///
    /// Either all declarations are added or, on the first conflicting key,
    /// none are.
    pub fn merge(&mut self, other: TypeRegistry) -> Result<(), RegistryError> {
        for declaration in &other.declarations {
            let key = (declaration.name.clone(), declaration.file.clone());
            if let Some(&existing) = self.index.get(&key) {
                return Err(self.duplicate(existing, declaration));
            }
        }
        for declaration in other.declarations {
            self.insert(declaration)?;
        }
        Ok(())
    }

    /// Look up a declaration by its key
    #[must_use]
    pub fn get(&self, name: &str, file: &str) -> Option<&TypeDeclaration> {
        self.index
            .get(&(name.to_string(), file.to_string()))
            .map(|&i| &self.declarations[i])
    }

    /// All declarations, in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, TypeDeclaration> {
        self.declarations.iter()
    }

    /// Declarations made in one file
    pub fn in_file<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a TypeDeclaration> + 'a {
        self.declarations.iter().filter(move |d| d.file == file)
    }

    /// Number of registered declarations
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns true if nothing has been registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl<'a> IntoIterator for &'a TypeRegistry {
    type Item = &'a TypeDeclaration;
    type IntoIter = std::slice::Iter<'a, TypeDeclaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for TypeRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
