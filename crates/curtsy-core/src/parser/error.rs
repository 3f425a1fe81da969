//! Parser error types for the section parser

use crate::doc::RegistryError;
use crate::lexer::LexError;
use thiserror::Error;

/// Errors raised while turning a file into line events
#[derive(Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("unexpected end of input after '{keyword}' at line {line}")]
    MalformedDeclaration { keyword: &'static str, line: usize },

    #[error(transparent)]
    DuplicateType(#[from] RegistryError),

    /// The token pass and the line pass disagree on the number of lines
    #[error("source changed between passes: line {line} does not match the token stream")]
    LineMismatch { line: usize },

    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Line the error refers to, when known
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Lex(LexError::UnterminatedLiteral { location, .. }) => Some(location.line),
            Self::MalformedDeclaration { line, .. } | Self::LineMismatch { line } => Some(*line),
            Self::DuplicateType(RegistryError::DuplicateType { second_line, .. }) => {
                Some(*second_line)
            }
            Self::Io(_) => None,
        }
    }
}
