//! Token types for the Curtsy tokenizer

use logos::Logos;

/// Canonical line ending used for newline tokens, whatever the source used
pub const NEWLINE: &str = "\n";

/// A lexical token.
///
/// Tokens are plain text; their kind is inferred from the leading characters
/// (see [`Token::kind`]). String literals and comments are kept whole, so a
/// block comment or verbatim string may contain embedded line breaks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Create a token from its text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The canonical newline token
    #[must_use]
    pub fn newline() -> Self {
        Self(NEWLINE.to_string())
    }

    /// The source text of the token
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Infer the kind of this token from its text
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        let text = self.0.as_str();
        if text == NEWLINE {
            TokenKind::Newline
        } else if text.starts_with("//") {
            TokenKind::LineComment
        } else if text.starts_with("/*") {
            TokenKind::BlockComment
        } else if text.starts_with('"') || text.starts_with("@\"") {
            TokenKind::StringLiteral
        } else if text.starts_with('\'') {
            TokenKind::CharLiteral
        } else if matches!(text, "{" | "}" | "<" | ">" | "(" | ")" | "[" | "]") {
            TokenKind::Punct
        } else {
            TokenKind::Word
        }
    }

    /// Returns true for the canonical newline token
    #[must_use]
    pub fn is_newline(&self) -> bool {
        self.0 == NEWLINE
    }

    /// Returns true for line and block comments
    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.0.starts_with("//") || self.0.starts_with("/*")
    }

    /// Number of physical line breaks carried inside a non-newline token
    #[must_use]
    pub fn embedded_line_breaks(&self) -> usize {
        if self.is_newline() {
            0
        } else {
            self.0.matches('\n').count()
        }
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of a token, inferred from its text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Newline,
    Word,
    Punct,
    StringLiteral,
    CharLiteral,
    LineComment,
    BlockComment,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Newline => write!(f, "newline"),
            Self::Word => write!(f, "word"),
            Self::Punct => write!(f, "punctuation"),
            Self::StringLiteral => write!(f, "string literal"),
            Self::CharLiteral => write!(f, "character literal"),
            Self::LineComment => write!(f, "// comment"),
            Self::BlockComment => write!(f, "/* comment */"),
        }
    }
}

/// Raw lexemes recognized in normal mode.
///
/// Literal bodies are not matched here: the lexer sees the opening delimiter
/// and scans the rest by hand, since the closing delimiter depends on escapes.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lexeme {
    #[token("\n")]
    Newline,

    /// Unicode whitespace other than the line feed
    #[regex(r"[\t\x0B\x0C\r \u{85}\u{A0}\u{1680}\u{2000}-\u{200A}\u{2028}\u{2029}\u{202F}\u{205F}\u{3000}]+")]
    Whitespace,

    #[token("\"")]
    Quote,

    #[token("@\"")]
    VerbatimQuote,

    #[token("'")]
    Apostrophe,

    #[token("/*")]
    BlockCommentStart,

    #[token("//")]
    LineCommentStart,

    #[regex(r"[{}<>()\[\]]")]
    Bracket,

    /// Run of characters with no special meaning
    #[regex(r#"[^\s"'{}<>()\[\]/@]+"#)]
    Word,

    /// A slash that does not open a comment
    #[token("/")]
    Slash,

    /// An `@` that does not open a verbatim string
    #[token("@")]
    At,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_inferred_from_leading_characters() {
        assert_eq!(Token::newline().kind(), TokenKind::Newline);
        assert_eq!(Token::new("class").kind(), TokenKind::Word);
        assert_eq!(Token::new("<").kind(), TokenKind::Punct);
        assert_eq!(Token::new("\"a b\"").kind(), TokenKind::StringLiteral);
        assert_eq!(Token::new("@\"c:\\\"").kind(), TokenKind::StringLiteral);
        assert_eq!(Token::new("'x'").kind(), TokenKind::CharLiteral);
        assert_eq!(Token::new("// note").kind(), TokenKind::LineComment);
        assert_eq!(Token::new("/* a */").kind(), TokenKind::BlockComment);
        assert_eq!(Token::new("a/b").kind(), TokenKind::Word);
    }

    #[test]
    fn embedded_line_breaks_ignore_the_newline_token() {
        assert_eq!(Token::newline().embedded_line_breaks(), 0);
        assert_eq!(Token::new("/* a\nb\nc */").embedded_line_breaks(), 2);
        assert_eq!(Token::new("x").embedded_line_breaks(), 0);
    }

    #[test]
    fn lexemes_split_comment_openers_from_slashes() {
        let kinds: Vec<_> = Lexeme::lexer("a/b //c /*")
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(
            kinds,
            vec![
                Lexeme::Word,
                Lexeme::Slash,
                Lexeme::Word,
                Lexeme::Whitespace,
                Lexeme::LineCommentStart,
                Lexeme::Word,
                Lexeme::Whitespace,
                Lexeme::BlockCommentStart,
            ]
        );
    }
}
