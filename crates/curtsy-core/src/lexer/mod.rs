//! Tokenizer for annotated source files
//!
//! The tokenizer turns source text into a flat sequence of [`Token`]s:
//! - Words (identifiers, keywords, numbers and operator runs)
//! - Structural punctuation: `{ } < > ( ) [ ]`
//! - String, verbatim string and character literals, kept whole
//! - Line and block comments, kept whole
//! - One canonical newline token per physical line break
//!
//! Non-newline whitespace only separates tokens. The output is consumed once
//! by the section parser, which needs the newline tokens to stay in step with
//! the raw lines of the file.

mod location;
mod token;

pub use location::{LineIndex, Location};
pub use token::{Token, TokenKind, NEWLINE};

use logos::Logos;
use thiserror::Error;
use token::Lexeme;

/// The kind of literal that was left open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    Char,
    BlockComment,
}

impl std::fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string literal"),
            Self::Char => write!(f, "character literal"),
            Self::BlockComment => write!(f, "block comment"),
        }
    }
}

/// Lexer error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unterminated {kind} starting at {location}")]
    UnterminatedLiteral { kind: LiteralKind, location: Location },
}

/// The Curtsy tokenizer
pub struct Lexer<'source> {
    source: &'source str,
    /// Tokens produced so far
    tokens: Vec<Token>,
    /// Word currently being accumulated
    word: String,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source code
    #[must_use]
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            tokens: Vec::with_capacity(512),
            word: String::new(),
        }
    }

    /// Tokenize the entire source
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
        Lexer::new(source).run()
    }

    /// Run the lexer to the end of the source
    pub fn run(mut self) -> Result<Vec<Token>, LexError> {
        let source = self.source;
        let mut lexemes = Lexeme::lexer(source);

        while let Some(lexeme) = lexemes.next() {
            let span = lexemes.span();
            match lexeme {
                Ok(Lexeme::Newline) => {
                    self.flush();
                    self.tokens.push(Token::newline());
                }
                Ok(Lexeme::Whitespace) => self.flush(),
                Ok(Lexeme::Quote | Lexeme::VerbatimQuote) => {
                    self.flush();
                    let len = scan_delimited(lexemes.remainder(), '"')
                        .ok_or_else(|| self.unterminated(LiteralKind::String, span.start))?;
                    self.push(&source[span.start..span.end + len]);
                    lexemes.bump(len);
                }
                Ok(Lexeme::Apostrophe) => {
                    self.flush();
                    let len = scan_delimited(lexemes.remainder(), '\'')
                        .ok_or_else(|| self.unterminated(LiteralKind::Char, span.start))?;
                    self.push(&source[span.start..span.end + len]);
                    lexemes.bump(len);
                }
                Ok(Lexeme::BlockCommentStart) => {
                    self.flush();
                    let len = lexemes
                        .remainder()
                        .find("*/")
                        .map(|i| i + 2)
                        .ok_or_else(|| self.unterminated(LiteralKind::BlockComment, span.start))?;
                    self.push(&source[span.start..span.end + len]);
                    lexemes.bump(len);
                }
                Ok(Lexeme::LineCommentStart) => {
                    self.flush();
                    let rest = lexemes.remainder();
                    let (body, consumed) = match rest.find('\n') {
                        Some(i) => (i, i + 1),
                        None => (rest.len(), rest.len()),
                    };
                    let comment = source[span.start..span.end + body].trim_end_matches('\r');
                    self.push(comment);
                    self.tokens.push(Token::newline());
                    lexemes.bump(consumed);
                }
                Ok(Lexeme::Bracket) => {
                    self.flush();
                    self.push(lexemes.slice());
                }
                // Every character is covered by some lexeme; anything logos
                // still rejects is treated as part of a word.
                Ok(Lexeme::Word | Lexeme::Slash | Lexeme::At) | Err(()) => {
                    self.word.push_str(lexemes.slice());
                }
            }
        }

        self.flush();
        Ok(self.tokens)
    }

    /// Push the pending word, if any
    fn flush(&mut self) {
        if !self.word.is_empty() {
            let word = std::mem::take(&mut self.word);
            self.tokens.push(Token::new(word));
        }
    }

    fn push(&mut self, text: &str) {
        if !text.is_empty() {
            self.tokens.push(Token::new(text));
        }
    }

    fn unterminated(&self, kind: LiteralKind, offset: usize) -> LexError {
        LexError::UnterminatedLiteral {
            kind,
            location: LineIndex::new(self.source).location(offset),
        }
    }
}

/// Length of `rest` up to and including the first unescaped `delimiter`.
///
/// A backslash escapes the next character unless it is itself escaped.
fn scan_delimited(rest: &str, delimiter: char) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        if c == delimiter && !escaped {
            return Some(i + c.len_utf8());
        }
        escaped = c == '\\' && !escaped;
    }
    None
}
