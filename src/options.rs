use crate::constants::{DEFAULT_INDENT, MAX_INDENT, MIN_INDENT};
use crate::{Error, Result};

/// Delimiter separating inline values, tabular fields, and row cells.
///
/// # Examples
/// ```
/// use serde_tone::Delimiter;
///
/// assert_eq!(Delimiter::Pipe.as_char(), '|');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            ',' => Some(Delimiter::Comma),
            '\t' => Some(Delimiter::Tab),
            '|' => Some(Delimiter::Pipe),
            _ => None,
        }
    }
}

/// Indentation step used for nested structures.
///
/// # Examples
/// ```
/// use serde_tone::Indent;
///
/// assert_eq!(Indent::spaces(4).get_spaces(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    Spaces(usize),
}

impl Indent {
    pub fn spaces(count: usize) -> Self {
        Indent::Spaces(count)
    }

    pub fn get_spaces(self) -> usize {
        match self {
            Indent::Spaces(count) => count,
        }
    }

    fn validate(self) -> Result<()> {
        let Indent::Spaces(count) = self;
        if !(MIN_INDENT..=MAX_INDENT).contains(&count) {
            return Err(Error::config(format!(
                "indent must be between {MIN_INDENT} and {MAX_INDENT}, got {count}"
            )));
        }
        Ok(())
    }
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Spaces(DEFAULT_INDENT)
    }
}

/// Options for encoding a value tree to TONE text.
///
/// # Examples
/// ```
/// use serde_tone::{Delimiter, EncodeOptions, Indent};
///
/// let opts = EncodeOptions::new()
///     .with_indent(Indent::spaces(4))
///     .with_delimiter(Delimiter::Pipe)
///     .with_length_marker(true);
/// let _ = opts;
/// ```
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    pub indent: Indent,
    pub delimiter: Delimiter,
    pub length_marker: bool,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Render array lengths as `[#N]` instead of `[N]`. The marker is
    /// informational; decoders accept both forms regardless of this option.
    pub fn with_length_marker(mut self, length_marker: bool) -> Self {
        self.length_marker = length_marker;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.indent.validate()
    }
}

/// Options for decoding TONE text back into a value tree.
///
/// The indent step must match the producer's. The delimiter needs no option:
/// non-comma delimiters are carried in the array headers themselves.
///
/// # Examples
/// ```
/// use serde_tone::DecodeOptions;
///
/// let opts = DecodeOptions::new().with_strict(false);
/// assert!(!opts.strict);
/// ```
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    pub indent: Indent,
    pub strict: bool,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    /// Strict mode (the default) rejects `[N]` disagreements, row-width
    /// mismatches, duplicate keys, and trailing content. Non-strict mode
    /// repairs those by padding or truncating; indentation faults and bad
    /// escapes stay fatal either way.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.indent.validate()
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            indent: Indent::default(),
            strict: true,
        }
    }
}
