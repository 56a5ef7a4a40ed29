use std::fmt;

const EXCERPT_MAX_LEN: usize = 80;

/// The closed taxonomy of failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Value outside the supported set (depth overflow, serialize failure).
    EncodeValue,
    /// Malformed header, bad escape, bad number, stray characters.
    Syntax,
    /// Indent not a multiple of the step, tabs in indentation, depth jump.
    Indent,
    /// Strict-mode disagreement: counts, row widths, duplicate keys.
    Validation,
    /// Input ended while a structure was still open.
    Truncation,
    /// Out-of-range option.
    Config,
}

impl ErrorKind {
    fn label(self) -> &'static str {
        match self {
            ErrorKind::EncodeValue => "encode error",
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Indent => "indent error",
            ErrorKind::Validation => "validation error",
            ErrorKind::Truncation => "truncation error",
            ErrorKind::Config => "config error",
        }
    }
}

/// 1-based source position of a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

/// Error carrying the spec-mandated reporter metadata: kind, location,
/// a one-line excerpt of the offending input, and a remediation hint.
///
/// The rendered message is deterministic for a given input so that LLM
/// consumers can pattern-match on it.
#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub location: Option<Location>,
    pub excerpt: Option<String>,
    pub hint: Option<String>,
}

impl Error {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
            excerpt: None,
            hint: None,
        }
    }

    pub fn encode_value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EncodeValue, message)
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    pub fn indent(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Indent, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn truncation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Truncation, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.location = Some(Location { line, column });
        self
    }

    /// Attach a one-line excerpt of the offending line, truncated to a
    /// fixed width so the rendering stays single-line.
    pub fn with_excerpt(mut self, line: &str) -> Self {
        let mut excerpt: String = line.chars().take(EXCERPT_MAX_LEN).collect();
        if excerpt.len() < line.len() {
            excerpt.push('…');
        }
        self.excerpt = Some(excerpt);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn line(&self) -> Option<usize> {
        self.location.map(|loc| loc.line)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)?;
        if let Some(loc) = self.location {
            write!(f, " at line {}, column {}", loc.line, loc.column)?;
        }
        if let Some(excerpt) = &self.excerpt {
            write!(f, "\n  | {excerpt}")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "\n  = help: {hint}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

/// Fixed remediation hints keyed on the failure class (spec §4.G).
pub(crate) mod hints {
    pub fn indent_remainder(step: usize) -> String {
        format!("indent must be a multiple of step {step}")
    }

    pub fn depth_jump() -> &'static str {
        "each nesting level is exactly one indent step deeper than its parent"
    }

    pub fn tab_indent() -> &'static str {
        "use spaces for indentation; tabs are never accepted"
    }

    pub fn row_width(found: usize, declared: usize) -> String {
        format!("row has {found} fields, header declares {declared}")
    }

    pub fn count_mismatch(declared: usize, found: usize) -> String {
        format!("declared {declared}, found {found}")
    }

    pub fn quoting() -> &'static str {
        "check for unmatched quotes and escape sequences (\\\" \\\\ \\n \\r \\t \\uXXXX)"
    }

    pub fn header() -> &'static str {
        "array headers look like key[N]:, key[N]{fields}:, or key[N]: a,b,c"
    }

    pub fn duplicate_key(key: &str) -> String {
        format!("key '{key}' appears more than once in the same object")
    }

    pub fn unquoted_key() -> &'static str {
        "quote keys that are not identifiers"
    }

    pub fn strict_toggle() -> &'static str {
        "use strict=false to repair count and row-width disagreements"
    }
}
