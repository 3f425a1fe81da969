//! Grouping of classified lines into documentation sections

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::parser::{LineEvent, LineKind};

/// A run of prose and the code it describes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Comment text with comment markers removed
    pub docs: String,
    /// Raw code lines
    pub code: String,
    /// First code line, absent when the section has no code
    pub code_start_line: Option<usize>,
    /// First line covered by the section (1-indexed)
    pub start_line: usize,
    /// Last line covered by the section (inclusive)
    pub end_line: usize,
}

impl Section {
    /// Returns true if the section carries code
    #[must_use]
    pub fn has_code(&self) -> bool {
        self.code_start_line.is_some()
    }

    /// Number of physical lines covered
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.end_line + 1 - self.start_line
    }
}

/// How comment and code lines are grouped into sections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionLayout {
    /// Every change between comment and code starts a new section
    #[default]
    Alternating,
    /// Comments followed by the code below them form one section
    Paired,
}

impl std::str::FromStr for SectionLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alternating" => Ok(Self::Alternating),
            "paired" => Ok(Self::Paired),
            other => Err(format!(
                "unknown layout '{other}', expected 'alternating' or 'paired'"
            )),
        }
    }
}

impl std::fmt::Display for SectionLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alternating => write!(f, "alternating"),
            Self::Paired => write!(f, "paired"),
        }
    }
}

/// Options controlling how a file becomes sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub layout: SectionLayout,
    /// Drop preprocessor directives (`// #region`, `// #if`) from the docs
    pub discard_directives: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            layout: SectionLayout::Alternating,
            discard_directives: true,
        }
    }
}

fn directive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^\s*//\s*#(if|else|elif|endif|define|undef|warning|error|line|region|endregion|pragma|nullable)\b",
        )
        .unwrap_or_else(|e| unreachable!("directive pattern is valid: {e}"))
    })
}

/// Returns true for comment lines holding a preprocessor directive
#[must_use]
pub fn is_directive(line: &str) -> bool {
    directive_pattern().is_match(line)
}

/// Strip comment markers from one line of prose.
///
/// Other trailing whitespace is kept: two spaces end a markdown line.
#[must_use]
pub fn strip_comment_markers(line: &str) -> &str {
    let line = line.trim_start_matches([' ', '\t', '/', '*']);
    match line.trim_end().strip_suffix("*/") {
        Some(body) => body.trim_end(),
        None => line,
    }
}

/// Builds sections from the line events of one file
#[derive(Debug, Clone, Default)]
pub struct SectionBuilder {
    options: ParseOptions,
}

impl SectionBuilder {
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Group `events` into sections. Events must be in line order.
    #[must_use]
    pub fn build(&self, events: &[LineEvent]) -> Vec<Section> {
        let mut sections = Vec::new();
        let mut pending: Option<Pending> = None;
        let mut previous: Option<LineKind> = None;

        for event in events {
            let boundary = match (previous, event.kind) {
                (None, _) => false,
                (Some(before), now) if before == now => false,
                (Some(_), LineKind::Comment) => true,
                (Some(_), LineKind::Code) => self.options.layout == SectionLayout::Alternating,
            };
            if boundary {
                if let Some(done) = pending.take() {
                    sections.push(done.finish());
                }
            }

            let section = pending.get_or_insert_with(|| Pending::new(event.line));
            match event.kind {
                LineKind::Comment => {
                    if !(self.options.discard_directives && is_directive(&event.text)) {
                        section.docs.push(strip_comment_markers(&event.text));
                    }
                }
                LineKind::Code => {
                    section.code_start.get_or_insert(event.line);
                    section.code.push(&event.text);
                }
            }
            section.end = event.line;
            previous = Some(event.kind);
        }

        if let Some(done) = pending {
            sections.push(done.finish());
        }
        sections
    }
}

/// Section under construction
struct Pending<'a> {
    docs: Vec<&'a str>,
    code: Vec<&'a str>,
    code_start: Option<usize>,
    start: usize,
    end: usize,
}

impl Pending<'_> {
    fn new(start: usize) -> Self {
        Self {
            docs: Vec::new(),
            code: Vec::new(),
            code_start: None,
            start,
            end: start,
        }
    }

    fn finish(self) -> Section {
        Section {
            docs: self.docs.join("\n"),
            code: self.code.join("\n"),
            code_start_line: self.code_start,
            start_line: self.start,
            end_line: self.end,
        }
    }
}
