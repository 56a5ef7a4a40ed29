use memchr::memchr_iter;

use crate::error::hints;
use crate::{Error, Result};

/// One physical line of input: 1-based source number, indent measured in
/// columns and in whole steps, and the byte span of the content after the
/// indentation.
#[derive(Clone, Copy, Debug)]
pub struct ScanLine {
    pub number: usize,
    pub indent: usize,
    pub level: usize,
    pub start: usize,
    pub end: usize,
    pub is_blank: bool,
}

impl ScanLine {
    pub fn content<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }
}

/// Split input into lines and measure indentation. `\r\n` is accepted; a
/// single trailing newline is permitted. Tabs in indentation and indents
/// that are not whole multiples of the step are rejected outright — those
/// faults are never repaired, regardless of strict mode.
pub fn scan_lines(input: &str, indent_size: usize) -> Result<Vec<ScanLine>> {
    let bytes = input.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut number = 1;

    for idx in memchr_iter(b'\n', bytes) {
        let mut end = idx;
        if end > start && bytes[end - 1] == b'\r' {
            end -= 1;
        }
        lines.push(build_line(input, number, start, end, indent_size)?);
        start = idx + 1;
        number += 1;
    }

    let mut end = bytes.len();
    if end > start && bytes[end - 1] == b'\r' {
        end -= 1;
    }
    lines.push(build_line(input, number, start, end, indent_size)?);

    Ok(lines)
}

fn build_line(
    input: &str,
    number: usize,
    start: usize,
    end: usize,
    indent_size: usize,
) -> Result<ScanLine> {
    let bytes = input.as_bytes();
    let raw = &input[start..end];

    if raw.bytes().all(|byte| byte == b' ' || byte == b'\t') {
        return Ok(ScanLine {
            number,
            indent: 0,
            level: 0,
            start,
            end,
            is_blank: true,
        });
    }

    let mut indent = 0;
    let mut idx = start;
    while idx < end {
        match bytes[idx] {
            b' ' => {
                indent += 1;
                idx += 1;
            }
            b'\t' => {
                return Err(Error::indent("tabs are not allowed in indentation")
                    .at(number, indent + 1)
                    .with_excerpt(raw)
                    .with_hint(hints::tab_indent()));
            }
            _ => break,
        }
    }

    if !indent.is_multiple_of(indent_size) {
        return Err(Error::indent(format!(
            "indentation of {indent} spaces is not a multiple of {indent_size}"
        ))
        .at(number, indent + 1)
        .with_excerpt(raw)
        .with_hint(hints::indent_remainder(indent_size)));
    }

    Ok(ScanLine {
        number,
        indent,
        level: indent / indent_size,
        start: idx,
        end,
        is_blank: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[rstest::rstest]
    fn test_scan_basic() {
        let input = "a: 1\n  b: 2\n\n    c: 3";
        let lines = scan_lines(input, 2).unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].level, 0);
        assert_eq!(lines[0].content(input), "a: 1");
        assert_eq!(lines[1].level, 1);
        assert!(lines[2].is_blank);
        assert_eq!(lines[3].level, 2);
        assert_eq!(lines[3].number, 4);
    }

    #[rstest::rstest]
    fn test_scan_crlf() {
        let input = "a: 1\r\nb: 2";
        let lines = scan_lines(input, 2).unwrap();
        assert_eq!(lines[0].content(input), "a: 1");
        assert_eq!(lines[1].content(input), "b: 2");
    }

    #[rstest::rstest]
    fn test_scan_rejects_odd_indent() {
        let err = scan_lines("a:\n   b: 1", 2).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Indent);
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().contains("not a multiple of 2"));
    }

    #[rstest::rstest]
    fn test_scan_rejects_tabs() {
        let err = scan_lines("a:\n\tb: 1", 2).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Indent);
        assert_eq!(err.line(), Some(2));
    }

    #[rstest::rstest]
    fn test_scan_wider_step() {
        let input = "a:\n    b: 1";
        let lines = scan_lines(input, 4).unwrap();
        assert_eq!(lines[1].level, 1);

        assert!(scan_lines("a:\n  b: 1", 4).is_err());
    }

    #[rstest::rstest]
    fn test_blank_line_with_tabs_is_blank() {
        let lines = scan_lines("a: 1\n\t \nb: 2", 2).unwrap();
        assert!(lines[1].is_blank);
    }
}
