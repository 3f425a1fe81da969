//! Section parser
//!
//! The parser walks the token stream of a file and, every time it consumes a
//! line break, reads the matching raw line from a second reader over the same
//! file. Tokens drop whitespace, so the raw line is what ends up in the output.
//!
//! Each physical line becomes a [`LineEvent`] classified as comment or code.
//! Along the way, type declarations (`class`, `struct`, `enum`, `interface`,
//! `delegate`) are recognized and added to a [`TypeRegistry`].

mod error;

pub use error::ParseError;

use std::collections::VecDeque;
use std::io::{BufRead, Lines};

use crate::doc::{TypeKind, TypeRegistry};
use crate::lexer::{Lexer, Token};

/// Classification of a physical line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Comment,
    Code,
}

/// One classified physical line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEvent {
    pub kind: LineKind,
    /// Raw text of the line, without its terminator
    pub text: String,
    /// 1-indexed line number
    pub line: usize,
}

impl LineEvent {
    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.kind == LineKind::Comment
    }
}

/// Parses one file into line events, registering the types it declares
pub struct SectionParser<'source, R> {
    tokens: VecDeque<Token>,
    lines: Lines<R>,
    /// Text the tokens were produced from, checked line by line when set
    expected: Option<std::str::Lines<'source>>,
    /// Root-relative path used for registry keys
    file: String,
    /// Number of lines emitted so far
    line: usize,
    in_comment: bool,
    at_line_start: bool,
    events: Vec<LineEvent>,
}

impl<'source, R: BufRead> SectionParser<'source, R> {
    /// Create a parser over `tokens`, re-reading raw lines from `reader`.
    ///
    /// `reader` must yield the same text the tokens were produced from.
    pub fn new(tokens: Vec<Token>, reader: R, file: impl Into<String>) -> Self {
        Self {
            tokens: tokens.into(),
            lines: reader.lines(),
            expected: None,
            file: file.into(),
            line: 0,
            in_comment: false,
            at_line_start: true,
            events: Vec::new(),
        }
    }

    /// Fail with [`ParseError::LineMismatch`] on the first re-read line that
    /// differs from the corresponding line of `source`
    #[must_use]
    pub fn verify_against(mut self, source: &'source str) -> Self {
        self.expected = Some(source.lines());
        self
    }

    /// Consume the token stream and return one event per physical line
    pub fn parse(mut self, registry: &mut TypeRegistry) -> Result<Vec<LineEvent>, ParseError> {
        while let Some(token) = self.advance()? {
            if !token.is_newline() && !self.in_comment {
                self.declaration(token.as_str(), registry)?;
            }
        }

        // The last line has no newline token when the file lacks a final terminator
        if let Some(text) = self.lines.next() {
            self.push_event(text?)?;
        }
        if self.lines.next().is_some() {
            return Err(ParseError::LineMismatch {
                line: self.line + 1,
            });
        }

        tracing::debug!(
            file = %self.file,
            lines = self.line,
            comments = self.events.iter().filter(|e| e.is_comment()).count(),
            "classified lines"
        );
        Ok(self.events)
    }

    /// Recognize a type declaration introduced by `keyword`
    fn declaration(&mut self, keyword: &str, registry: &mut TypeRegistry) -> Result<(), ParseError> {
        match keyword {
            "class" => {
                let (name, line) = self.type_name("class")?;
                self.register(registry, name, line, TypeKind::Class)?;
            }
            "struct" => {
                // `where T : struct` ends a line or opens a body; not a declaration
                let constraint = match self.tokens.front() {
                    None => return Err(self.malformed("struct")),
                    Some(next) => next == "{" || next.is_newline(),
                };
                if !constraint {
                    let (name, line) = self.type_name("struct")?;
                    self.register(registry, name, line, TypeKind::Struct)?;
                }
            }
            "enum" => {
                let (name, line) = self.peek_name("enum")?;
                self.register(registry, name, line, TypeKind::Enum)?;
            }
            "interface" => {
                let (name, line) = self.peek_name("interface")?;
                self.register(registry, name, line, TypeKind::Interface)?;
            }
            "delegate" => {
                self.skip_trivia()?;
                let next = self.next("delegate")?;
                if next == "{" || next == "(" {
                    // anonymous delegate
                    return Ok(());
                }
                self.skip_generic("delegate")?;
                let (name, line) = self.peek_name("delegate")?;
                self.register(registry, name, line, TypeKind::Delegate)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn register(
        &self,
        registry: &mut TypeRegistry,
        name: String,
        line: usize,
        kind: TypeKind,
    ) -> Result<(), ParseError> {
        // Punctuation in name position means the keyword was used as a
        // constraint (`where T : class` followed by `{`), not a declaration.
        if name.starts_with(['{', '}', '(', ')', '<', '>', '[', ']']) {
            return Ok(());
        }
        registry.add(name, self.file.as_str(), line, kind)?;
        Ok(())
    }

    /// Name token plus any generic parameter block, and the name's line
    fn type_name(&mut self, keyword: &'static str) -> Result<(String, usize), ParseError> {
        self.skip_trivia()?;
        let line = self.line + 1;
        let mut name = self.next(keyword)?.as_str().to_string();
        name.push_str(&self.skip_generic(keyword)?);
        Ok((name, line))
    }

    /// Next significant token, left in the stream for the main loop
    fn peek_name(&mut self, keyword: &'static str) -> Result<(String, usize), ParseError> {
        self.skip_trivia()?;
        match self.tokens.front() {
            Some(token) => Ok((token.as_str().to_string(), self.line + 1)),
            None => Err(self.malformed(keyword)),
        }
    }

    /// Consume a balanced `<...>` block if one follows, returning its text
    fn skip_generic(&mut self, keyword: &'static str) -> Result<String, ParseError> {
        let mut block = String::new();
        if !self.tokens.front().is_some_and(|t| t == "<") {
            return Ok(block);
        }

        let mut depth = 0usize;
        loop {
            let token = self.next(keyword)?;
            if token.is_newline() || token.is_comment() {
                continue;
            }
            if token == "<" {
                depth += 1;
            } else if token == ">" {
                depth = depth.saturating_sub(1);
            }
            block.push_str(token.as_str());
            if depth == 0 {
                return Ok(block);
            }
        }
    }

    /// Consume newlines and comments ahead of a name
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        while self
            .tokens
            .front()
            .is_some_and(|t| t.is_newline() || t.is_comment())
        {
            self.advance()?;
        }
        Ok(())
    }

    /// Next token inside a declaration; running out is an error
    fn next(&mut self, keyword: &'static str) -> Result<Token, ParseError> {
        match self.advance()? {
            Some(token) => Ok(token),
            None => Err(self.malformed(keyword)),
        }
    }

    /// Only built once the token queue is empty
    fn malformed(&self, keyword: &'static str) -> ParseError {
        debug_assert!(self.tokens.is_empty());
        ParseError::MalformedDeclaration {
            keyword,
            line: self.line + 1,
        }
    }

    /// Pop a token, classify its line and emit one line per line break it
    /// accounts for
    fn advance(&mut self) -> Result<Option<Token>, ParseError> {
        let Some(token) = self.tokens.pop_front() else {
            return Ok(None);
        };

        // A comment only classifies the line if nothing precedes it. The
        // line-start flag stays set so code after `/* .. */` wins.
        if token.is_newline() {
            self.at_line_start = true;
        } else if self.at_line_start && token.is_comment() {
            self.in_comment = true;
        } else {
            self.in_comment = false;
            self.at_line_start = false;
        }

        let breaks = if token.is_newline() {
            1
        } else {
            token.embedded_line_breaks()
        };
        for _ in 0..breaks {
            self.emit_line()?;
        }
        Ok(Some(token))
    }

    fn emit_line(&mut self) -> Result<(), ParseError> {
        match self.lines.next() {
            Some(text) => self.push_event(text?),
            None => Err(ParseError::LineMismatch {
                line: self.line + 1,
            }),
        }
    }

    fn push_event(&mut self, text: String) -> Result<(), ParseError> {
        self.line += 1;
        if let Some(expected) = self.expected.as_mut() {
            if expected.next() != Some(text.as_str()) {
                return Err(ParseError::LineMismatch { line: self.line });
            }
        }

        let kind = if self.in_comment {
            LineKind::Comment
        } else {
            LineKind::Code
        };
        self.events.push(LineEvent {
            kind,
            text,
            line: self.line,
        });
        Ok(())
    }
}

/// Tokenize and parse in-memory source text
pub fn parse_source(
    source: &str,
    file: &str,
    registry: &mut TypeRegistry,
) -> Result<Vec<LineEvent>, ParseError> {
    let tokens = Lexer::tokenize(source)?;
    SectionParser::new(tokens, source.as_bytes(), file)
        .verify_against(source)
        .parse(registry)
}
