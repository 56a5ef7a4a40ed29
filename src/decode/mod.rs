mod scan;

use std::collections::HashSet;
use std::io::Read;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use smallvec::SmallVec;
use smol_str::SmolStr;

use self::scan::{scan_lines, ScanLine};
use crate::constants::{LIST_ITEM_PREFIX, MAX_DEPTH};
use crate::error::hints;
use crate::num::number::parse_number_token;
use crate::text::string::{find_closing_quote, is_valid_unquoted_key, unescape_string};
use crate::{DecodeOptions, Error, Result};

type TokenBuf<'a> = SmallVec<[&'a str; 16]>;

/// Decode TONE text into a value tree.
pub fn decode(input: &str, options: &DecodeOptions) -> Result<Value> {
    options.validate()?;
    let lines = scan_lines(input, options.indent.get_spaces())?;
    let decoder = Decoder {
        input,
        lines,
        strict: options.strict,
    };
    decoder.decode_document()
}

pub fn from_str<T: DeserializeOwned>(input: &str, options: &DecodeOptions) -> Result<T> {
    let value = decode(input, options)?;
    serde_json::from_value(value)
        .map_err(|err| Error::validation(format!("deserialize failed: {err}")))
}

pub fn from_slice<T: DeserializeOwned>(input: &[u8], options: &DecodeOptions) -> Result<T> {
    let text = std::str::from_utf8(input)
        .map_err(|err| Error::syntax(format!("invalid utf-8: {err}")))?;
    from_str(text, options)
}

pub fn from_reader<T: DeserializeOwned, R: Read>(mut reader: R, options: &DecodeOptions) -> Result<T> {
    let mut buf = String::new();
    reader
        .read_to_string(&mut buf)
        .map_err(|err| Error::syntax(format!("read failed: {err}")))?;
    from_str(&buf, options)
}

pub fn validate_str(input: &str, options: &DecodeOptions) -> Result<()> {
    decode(input, options).map(|_| ())
}

/// A parsed array header line: `key? [ #? N delimiter? ] {fields}? : inline?`.
#[derive(Debug)]
struct Header<'a> {
    key: Option<SmolStr>,
    len: usize,
    delimiter: char,
    fields: Option<Vec<SmolStr>>,
    inline: Option<&'a str>,
}

struct Decoder<'a> {
    input: &'a str,
    lines: Vec<ScanLine>,
    strict: bool,
}

impl<'a> Decoder<'a> {
    fn decode_document(&self) -> Result<Value> {
        let Some(first_idx) = self.next_non_blank(0) else {
            return Err(Error::truncation("no content to decode"));
        };
        let first = self.lines[first_idx];
        let content = first.content(self.input);

        let root_header = self.parse_array_header(content, &first)?;
        if let Some(header) = &root_header {
            if header.key.is_none() {
                if first.level != 0 {
                    return Err(self.depth_jump(&first));
                }
                let (value, next) = self.parse_array_body(header, first_idx + 1, 0, &first)?;
                self.ensure_no_trailing(next)?;
                return Ok(value);
            }
        }

        let sole_line = self.next_non_blank(first_idx + 1).is_none();
        if sole_line && root_header.is_none() && self.split_key_value(content, &first)?.is_none() {
            if first.level != 0 {
                return Err(self.depth_jump(&first));
            }
            return self.parse_value_token(content, &first);
        }

        let mut map = Map::new();
        let next = self.parse_object_entries(&mut map, first_idx, 0)?;
        self.ensure_no_trailing(next)?;
        Ok(Value::Object(map))
    }

    /// Consume `key: value` entries at exactly `base_level`, descending into
    /// nested structures. Returns the index of the first unconsumed line.
    fn parse_object_entries(
        &self,
        map: &mut Map<String, Value>,
        mut idx: usize,
        base_level: usize,
    ) -> Result<usize> {
        while idx < self.lines.len() {
            let line = self.lines[idx];
            if line.is_blank {
                idx += 1;
                continue;
            }
            if line.level < base_level {
                break;
            }
            if line.level > base_level {
                return Err(self.depth_jump(&line));
            }
            if base_level > MAX_DEPTH {
                return Err(self.located(Error::syntax("maximum nesting depth exceeded"), &line));
            }
            let content = line.content(self.input);

            if let Some(header) = self.parse_array_header(content, &line)? {
                let Some(key) = header.key.clone() else {
                    return Err(self
                        .located(Error::syntax("array header requires a key here"), &line)
                        .with_hint(hints::header()));
                };
                let (value, next) = self.parse_array_body(&header, idx + 1, base_level, &line)?;
                self.insert_entry(map, key, value, &line)?;
                idx = next;
                continue;
            }

            let Some((key_part, rest)) = self.split_key_value(content, &line)? else {
                return Err(self
                    .located(Error::syntax("expected a 'key: value' line"), &line)
                    .with_hint(hints::header()));
            };
            let key = self.parse_key_token(key_part, &line)?;
            let rest = rest.trim_ascii();

            if rest.is_empty() {
                // Bare `key:`. A deeper block is a nested object, anything
                // else leaves an empty object.
                match self.next_non_blank(idx + 1) {
                    Some(next_idx) if self.lines[next_idx].level > base_level => {
                        let mut child = Map::new();
                        let next = self.parse_object_entries(&mut child, idx + 1, base_level + 1)?;
                        self.insert_entry(map, key, Value::Object(child), &line)?;
                        idx = next;
                    }
                    _ => {
                        self.insert_entry(map, key, Value::Object(Map::new()), &line)?;
                        idx += 1;
                    }
                }
            } else {
                let value = self.parse_value_token(rest, &line)?;
                self.insert_entry(map, key, value, &line)?;
                idx += 1;
            }
        }
        Ok(idx)
    }

    fn parse_array_body(
        &self,
        header: &Header<'a>,
        idx: usize,
        base_level: usize,
        header_line: &ScanLine,
    ) -> Result<(Value, usize)> {
        if base_level > MAX_DEPTH {
            return Err(self.located(Error::syntax("maximum nesting depth exceeded"), header_line));
        }
        if let Some(inline) = header.inline {
            let tokens = self.split_delimited(inline, header.delimiter, header_line)?;
            let mut items = Vec::with_capacity(tokens.len());
            for token in tokens {
                items.push(if token.is_empty() {
                    Value::String(String::new())
                } else {
                    self.parse_value_token(token, header_line)?
                });
            }
            if self.strict && items.len() != header.len {
                return Err(self
                    .located(
                        Error::validation(format!(
                            "inline array declared {} values, found {}",
                            header.len,
                            items.len()
                        )),
                        header_line,
                    )
                    .with_hint(hints::count_mismatch(header.len, items.len())));
            }
            return Ok((Value::Array(items), idx));
        }
        if let Some(fields) = &header.fields {
            self.parse_tabular_body(header, fields, idx, base_level, header_line)
        } else {
            self.parse_list_body(header, idx, base_level, header_line)
        }
    }

    fn parse_tabular_body(
        &self,
        header: &Header<'a>,
        fields: &[SmolStr],
        mut idx: usize,
        base_level: usize,
        header_line: &ScanLine,
    ) -> Result<(Value, usize)> {
        let row_level = base_level + 1;
        let mut rows: Vec<Value> = Vec::with_capacity(header.len);
        let mut pending_blank: Option<ScanLine> = None;

        while idx < self.lines.len() && rows.len() < header.len {
            let line = self.lines[idx];
            if line.is_blank {
                if !rows.is_empty() {
                    pending_blank.get_or_insert(line);
                }
                idx += 1;
                continue;
            }
            if line.level < row_level {
                break;
            }
            if line.level > row_level {
                return Err(self.depth_jump(&line));
            }
            if let Some(blank) = pending_blank.take() {
                if self.strict {
                    return Err(Error::validation("blank line inside tabular rows")
                        .at(blank.number, 1)
                        .with_hint(hints::strict_toggle()));
                }
            }

            let content = line.content(self.input);
            let tokens = self.split_delimited(content, header.delimiter, &line)?;
            if self.strict && tokens.len() != fields.len() {
                return Err(self
                    .located(
                        Error::validation(format!(
                            "row has {} fields, header declares {}",
                            tokens.len(),
                            fields.len()
                        )),
                        &line,
                    )
                    .with_hint(hints::row_width(tokens.len(), fields.len())));
            }
            let mut row = Map::new();
            for (col, field) in fields.iter().enumerate() {
                // Missing cells pad with null, surplus cells fall off.
                let cell = match tokens.get(col) {
                    Some(token) if !token.is_empty() => self.parse_value_token(token, &line)?,
                    Some(_) => Value::String(String::new()),
                    None => Value::Null,
                };
                row.insert(field.to_string(), cell);
            }
            rows.push(Value::Object(row));
            idx += 1;
        }

        if self.strict && rows.len() < header.len {
            return Err(self
                .located(
                    Error::validation(format!(
                        "tabular array declared {} rows, found {}",
                        header.len,
                        rows.len()
                    )),
                    header_line,
                )
                .with_hint(hints::count_mismatch(header.len, rows.len())));
        }

        idx = self.consume_extra_rows(idx, row_level, header.len, header_line)?;
        Ok((Value::Array(rows), idx))
    }

    fn parse_list_body(
        &self,
        header: &Header<'a>,
        mut idx: usize,
        base_level: usize,
        header_line: &ScanLine,
    ) -> Result<(Value, usize)> {
        let item_level = base_level + 1;
        let mut items = Vec::with_capacity(header.len);
        let mut pending_blank: Option<ScanLine> = None;

        while idx < self.lines.len() && items.len() < header.len {
            let line = self.lines[idx];
            if line.is_blank {
                if !items.is_empty() {
                    pending_blank.get_or_insert(line);
                }
                idx += 1;
                continue;
            }
            if line.level < item_level {
                break;
            }
            if line.level > item_level {
                return Err(self.depth_jump(&line));
            }
            let content = line.content(self.input);
            if !is_list_item(content) {
                break;
            }
            if let Some(blank) = pending_blank.take() {
                if self.strict {
                    return Err(Error::validation("blank line inside list items")
                        .at(blank.number, 1)
                        .with_hint(hints::strict_toggle()));
                }
            }
            let (value, next) = self.parse_list_item(idx, item_level)?;
            items.push(value);
            idx = next;
        }

        if self.strict && items.len() < header.len {
            return Err(self
                .located(
                    Error::validation(format!(
                        "list array declared {} items, found {}",
                        header.len,
                        items.len()
                    )),
                    header_line,
                )
                .with_hint(hints::count_mismatch(header.len, items.len())));
        }

        idx = self.consume_extra_items(idx, item_level, header.len, header_line)?;
        Ok((Value::Array(items), idx))
    }

    /// Decode one `- ` item. The first field of an object item sits on the
    /// dash line; its sibling fields follow one level deeper than the dash,
    /// and composite bodies belonging to that first field two levels deeper.
    fn parse_list_item(&self, idx: usize, item_level: usize) -> Result<(Value, usize)> {
        let line = self.lines[idx];
        let content = line.content(self.input);

        if content == "-" {
            return Ok((Value::Object(Map::new()), idx + 1));
        }
        let after_dash = content[LIST_ITEM_PREFIX.len()..].trim_ascii_start();

        if let Some(header) = self.parse_array_header(after_dash, &line)? {
            match header.key.clone() {
                // `- [N]...:` — the element is itself an array.
                None => {
                    let (value, next) = self.parse_array_body(&header, idx + 1, item_level, &line)?;
                    return Ok((value, next));
                }
                // `- key[N]...:` — object element whose first field is an array.
                Some(key) => {
                    let (value, next) =
                        self.parse_array_body(&header, idx + 1, item_level + 1, &line)?;
                    let mut map = Map::new();
                    self.insert_entry(&mut map, key, value, &line)?;
                    let next = self.parse_object_entries(&mut map, next, item_level + 1)?;
                    return Ok((Value::Object(map), next));
                }
            }
        }

        if let Some((key_part, rest)) = self.split_key_value(after_dash, &line)? {
            let key = self.parse_key_token(key_part, &line)?;
            let rest = rest.trim_ascii();
            let mut map = Map::new();
            let mut next = idx + 1;
            if rest.is_empty() {
                match self.next_non_blank(idx + 1) {
                    Some(next_idx) if self.lines[next_idx].level > item_level + 1 => {
                        let mut child = Map::new();
                        next = self.parse_object_entries(&mut child, idx + 1, item_level + 2)?;
                        self.insert_entry(&mut map, key, Value::Object(child), &line)?;
                    }
                    _ => {
                        self.insert_entry(&mut map, key, Value::Object(Map::new()), &line)?;
                    }
                }
            } else {
                let value = self.parse_value_token(rest, &line)?;
                self.insert_entry(&mut map, key, value, &line)?;
            }
            let next = self.parse_object_entries(&mut map, next, item_level + 1)?;
            return Ok((Value::Object(map), next));
        }

        Ok((self.parse_value_token(after_dash, &line)?, idx + 1))
    }

    fn consume_extra_rows(
        &self,
        idx: usize,
        row_level: usize,
        declared: usize,
        header_line: &ScanLine,
    ) -> Result<usize> {
        let mut scan = idx;
        let mut extra = 0;
        while scan < self.lines.len() {
            let line = self.lines[scan];
            if line.is_blank {
                scan += 1;
                continue;
            }
            if line.level != row_level {
                break;
            }
            let content = line.content(self.input);
            if is_list_item(content) || find_unquoted_char(content, b':').is_some() {
                break;
            }
            extra += 1;
            scan += 1;
        }
        if extra > 0 {
            if self.strict {
                return Err(self
                    .located(
                        Error::validation(format!(
                            "tabular array declared {declared} rows, found {}",
                            declared + extra
                        )),
                        header_line,
                    )
                    .with_hint(hints::count_mismatch(declared, declared + extra)));
            }
            return Ok(scan);
        }
        Ok(idx)
    }

    fn consume_extra_items(
        &self,
        idx: usize,
        item_level: usize,
        declared: usize,
        header_line: &ScanLine,
    ) -> Result<usize> {
        let mut scan = idx;
        let mut extra = 0;
        while scan < self.lines.len() {
            let line = self.lines[scan];
            if line.is_blank {
                scan += 1;
                continue;
            }
            if line.level != item_level || !is_list_item(line.content(self.input)) {
                break;
            }
            extra += 1;
            scan += 1;
            // Skip the item's own nested lines.
            while scan < self.lines.len() {
                let nested = self.lines[scan];
                if !nested.is_blank && nested.level <= item_level {
                    break;
                }
                scan += 1;
            }
        }
        if extra > 0 {
            if self.strict {
                return Err(self
                    .located(
                        Error::validation(format!(
                            "list array declared {declared} items, found {}",
                            declared + extra
                        )),
                        header_line,
                    )
                    .with_hint(hints::count_mismatch(declared, declared + extra)));
            }
            return Ok(scan);
        }
        Ok(idx)
    }

    /// Recognize `key? [ #? N delimiter? ] {fields}? :` on a line. `Ok(None)`
    /// means the line is not header-shaped at all (no bracket before the
    /// first colon); malformed bracket or field segments are syntax errors.
    fn parse_array_header(&self, content: &'a str, line: &ScanLine) -> Result<Option<Header<'a>>> {
        let Some(bracket) = find_unquoted_char(content, b'[') else {
            return Ok(None);
        };
        if let Some(colon) = find_unquoted_char(content, b':') {
            if colon < bracket {
                return Ok(None);
            }
        }
        let Some(rel_end) = content[bracket + 1..].find(']') else {
            return Err(self
                .located(Error::syntax("unterminated array header"), line)
                .with_hint(hints::header()));
        };
        let bracket_end = bracket + 1 + rel_end;

        let key_part = content[..bracket].trim_ascii();
        let key = if key_part.is_empty() {
            None
        } else {
            Some(self.parse_key_token(key_part, line)?)
        };

        let segment = &content[bracket + 1..bracket_end];
        let mut digits = segment;
        if let Some(stripped) = digits.strip_prefix('#') {
            digits = stripped;
        }
        let delimiter = match digits.as_bytes().last() {
            Some(b',') => {
                digits = &digits[..digits.len() - 1];
                ','
            }
            Some(b'|') => {
                digits = &digits[..digits.len() - 1];
                '|'
            }
            Some(b'\t') => {
                digits = &digits[..digits.len() - 1];
                '\t'
            }
            _ => ',',
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self
                .located(
                    Error::syntax(format!("invalid array length '[{segment}]'")),
                    line,
                )
                .with_hint(hints::header()));
        }
        let len: usize = digits.parse().map_err(|_| {
            self.located(
                Error::syntax(format!("array length '[{segment}]' is out of range")),
                line,
            )
        })?;

        let mut rest = &content[bracket_end + 1..];
        let mut fields = None;
        if let Some(after_brace) = rest.strip_prefix('{') {
            let Some(close) = find_unquoted_char(after_brace, b'}') else {
                return Err(self
                    .located(Error::syntax("unterminated field list"), line)
                    .with_hint(hints::header()));
            };
            let field_segment = &after_brace[..close];
            let tokens = self.split_delimited(field_segment, delimiter, line)?;
            let mut parsed = Vec::with_capacity(tokens.len());
            for token in tokens {
                if token.is_empty() {
                    return Err(self
                        .located(Error::syntax("empty field name in header"), line)
                        .with_hint(hints::header()));
                }
                parsed.push(self.parse_key_token(token, line)?);
            }
            if parsed.is_empty() {
                return Err(self
                    .located(Error::syntax("empty field list in header"), line)
                    .with_hint(hints::header()));
            }
            if self.strict {
                let mut seen = HashSet::with_capacity(parsed.len());
                for field in &parsed {
                    if !seen.insert(field.as_str()) {
                        return Err(self
                            .located(
                                Error::validation(format!("duplicate field '{field}' in header")),
                                line,
                            )
                            .with_hint(hints::duplicate_key(field)));
                    }
                }
            }
            fields = Some(parsed);
            rest = &after_brace[close + 1..];
        }

        let Some(colon) = find_unquoted_char(rest, b':') else {
            return Err(self
                .located(Error::syntax("array header missing ':'"), line)
                .with_hint(hints::header()));
        };
        if !rest[..colon].trim_ascii().is_empty() {
            return Err(self
                .located(Error::syntax("unexpected characters in array header"), line)
                .with_hint(hints::header()));
        }
        let tail = rest[colon + 1..].trim_ascii();
        let inline = (!tail.is_empty()).then_some(tail);

        Ok(Some(Header {
            key,
            len,
            delimiter,
            fields,
            inline,
        }))
    }

    /// Split a line on its first unquoted colon.
    fn split_key_value(&self, content: &'a str, line: &ScanLine) -> Result<Option<(&'a str, &'a str)>> {
        let bytes = content.as_bytes();
        let mut in_quotes = false;
        let mut escape = false;
        for (idx, &byte) in bytes.iter().enumerate() {
            if escape {
                escape = false;
                continue;
            }
            if in_quotes {
                match byte {
                    b'\\' => escape = true,
                    b'"' => in_quotes = false,
                    _ => {}
                }
                continue;
            }
            match byte {
                b'"' => in_quotes = true,
                b':' => return Ok(Some((&content[..idx], &content[idx + 1..]))),
                _ => {}
            }
        }
        if in_quotes {
            return Err(self
                .located(Error::syntax("unterminated string"), line)
                .with_hint(hints::quoting()));
        }
        Ok(None)
    }

    fn split_delimited<'s>(
        &self,
        input: &'s str,
        delimiter: char,
        line: &ScanLine,
    ) -> Result<TokenBuf<'s>> {
        let mut tokens = TokenBuf::new();
        if input.is_empty() {
            return Ok(tokens);
        }
        let bytes = input.as_bytes();
        let delim = delimiter as u8;
        let mut in_quotes = false;
        let mut escape = false;
        let mut start = 0;
        for (idx, &byte) in bytes.iter().enumerate() {
            if escape {
                escape = false;
                continue;
            }
            if in_quotes {
                match byte {
                    b'\\' => escape = true,
                    b'"' => in_quotes = false,
                    _ => {}
                }
                continue;
            }
            if byte == b'"' {
                in_quotes = true;
            } else if byte == delim {
                tokens.push(input[start..idx].trim_ascii());
                start = idx + 1;
            }
        }
        if in_quotes {
            return Err(self
                .located(Error::syntax("unterminated string"), line)
                .with_hint(hints::quoting()));
        }
        tokens.push(input[start..].trim_ascii());
        Ok(tokens)
    }

    fn parse_key_token(&self, token: &str, line: &ScanLine) -> Result<SmolStr> {
        let token = token.trim_ascii();
        if token.starts_with('"') {
            let closing = find_closing_quote(token, 0).ok_or_else(|| {
                self.located(Error::syntax("unterminated quoted key"), line)
                    .with_hint(hints::quoting())
            })?;
            if closing != token.len() - 1 {
                return Err(self
                    .located(Error::syntax("unexpected characters after closing quote"), line));
            }
            let text = unescape_string(&token[1..closing])
                .map_err(|err| self.located(err, line))?;
            return Ok(SmolStr::new(text));
        }
        if self.strict && !is_valid_unquoted_key(token) {
            return Err(self
                .located(
                    Error::validation(format!("invalid unquoted key '{token}'")),
                    line,
                )
                .with_hint(hints::unquoted_key()));
        }
        Ok(SmolStr::new(token))
    }

    /// Turn a raw token into a scalar: quoted string, reserved word, number,
    /// or verbatim unquoted string, in that order.
    fn parse_value_token(&self, token: &str, line: &ScanLine) -> Result<Value> {
        let token = token.trim_ascii();
        if token.is_empty() {
            return Ok(Value::String(String::new()));
        }
        if token.starts_with('"') {
            let closing = find_closing_quote(token, 0).ok_or_else(|| {
                self.located(Error::syntax("unterminated string"), line)
                    .with_hint(hints::quoting())
            })?;
            if closing != token.len() - 1 {
                return Err(self
                    .located(Error::syntax("unexpected characters after closing quote"), line));
            }
            let text = unescape_string(&token[1..closing])
                .map_err(|err| self.located(err, line))?;
            return Ok(Value::String(text));
        }
        match token {
            "null" => return Ok(Value::Null),
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            _ => {}
        }
        if let Some(number) = parse_number_token(token) {
            return Ok(Value::Number(number));
        }
        Ok(Value::String(token.to_string()))
    }

    fn insert_entry(
        &self,
        map: &mut Map<String, Value>,
        key: SmolStr,
        value: Value,
        line: &ScanLine,
    ) -> Result<()> {
        if self.strict && map.contains_key(key.as_str()) {
            return Err(self
                .located(Error::validation(format!("duplicate key '{key}'")), line)
                .with_hint(hints::duplicate_key(&key)));
        }
        map.insert(key.to_string(), value);
        Ok(())
    }

    fn ensure_no_trailing(&self, idx: usize) -> Result<()> {
        if let Some(trailing) = self.next_non_blank(idx) {
            if self.strict {
                let line = self.lines[trailing];
                return Err(self
                    .located(Error::validation("unexpected content after the root value"), &line)
                    .with_hint(hints::strict_toggle()));
            }
        }
        Ok(())
    }

    fn next_non_blank(&self, from: usize) -> Option<usize> {
        self.lines[from.min(self.lines.len())..]
            .iter()
            .position(|line| !line.is_blank)
            .map(|offset| from + offset)
    }

    fn located(&self, err: Error, line: &ScanLine) -> Error {
        err.at(line.number, line.indent + 1)
            .with_excerpt(line.content(self.input))
    }

    fn depth_jump(&self, line: &ScanLine) -> Error {
        self.located(Error::indent("unexpected indentation"), line)
            .with_hint(hints::depth_jump())
    }
}

fn is_list_item(content: &str) -> bool {
    content == "-" || content.starts_with(LIST_ITEM_PREFIX)
}

fn find_unquoted_char(content: &str, target: u8) -> Option<usize> {
    let mut in_quotes = false;
    let mut escape = false;
    for (idx, &byte) in content.as_bytes().iter().enumerate() {
        if escape {
            escape = false;
            continue;
        }
        if in_quotes {
            match byte {
                b'\\' => escape = true,
                b'"' => in_quotes = false,
                _ => {}
            }
            continue;
        }
        if byte == b'"' {
            in_quotes = true;
        } else if byte == target {
            return Some(idx);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodeOptions, ErrorKind};
    use serde_json::json;

    fn decode_default(input: &str) -> Result<Value> {
        decode(input, &DecodeOptions::default())
    }

    #[rstest::rstest]
    fn test_header_recognition() {
        let options = DecodeOptions::default();
        let lines = scan_lines("items[3]: 1,2,3", 2).unwrap();
        let decoder = Decoder {
            input: "items[3]: 1,2,3",
            lines,
            strict: options.strict,
        };
        let line = decoder.lines[0];
        let header = decoder
            .parse_array_header(line.content(decoder.input), &line)
            .unwrap()
            .unwrap();
        assert_eq!(header.key.as_deref(), Some("items"));
        assert_eq!(header.len, 3);
        assert_eq!(header.delimiter, ',');
        assert!(header.fields.is_none());
        assert_eq!(header.inline, Some("1,2,3"));
    }

    #[rstest::rstest]
    #[case("k: v")]
    #[case("note: see [1]")]
    #[case("\"k[2]\": x")]
    fn test_not_a_header(#[case] input: &str) {
        let lines = scan_lines(input, 2).unwrap();
        let decoder = Decoder {
            input,
            lines,
            strict: true,
        };
        let line = decoder.lines[0];
        assert!(decoder
            .parse_array_header(line.content(input), &line)
            .unwrap()
            .is_none());
    }

    #[rstest::rstest]
    fn test_header_with_marker_and_delimiter() {
        let input = "tags[#2|]{a|b}:";
        let lines = scan_lines(input, 2).unwrap();
        let decoder = Decoder {
            input,
            lines,
            strict: true,
        };
        let line = decoder.lines[0];
        let header = decoder
            .parse_array_header(input, &line)
            .unwrap()
            .unwrap();
        assert_eq!(header.len, 2);
        assert_eq!(header.delimiter, '|');
        let fields = header.fields.unwrap();
        assert_eq!(fields, vec![SmolStr::new("a"), SmolStr::new("b")]);
    }

    #[rstest::rstest]
    #[case("k[x]:")]
    #[case("k[]:")]
    #[case("k[#]:")]
    #[case("k[2")]
    #[case("k[2]{a:")]
    #[case("k[2]junk:")]
    fn test_malformed_headers(#[case] input: &str) {
        let err = decode_default(input).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[rstest::rstest]
    fn test_split_delimited_respects_quotes() {
        let input = "\"a,b\",c";
        let lines = scan_lines(input, 2).unwrap();
        let decoder = Decoder {
            input,
            lines,
            strict: true,
        };
        let line = decoder.lines[0];
        let tokens = decoder.split_delimited(input, ',', &line).unwrap();
        assert_eq!(tokens.as_slice(), ["\"a,b\"", "c"]);
    }

    #[rstest::rstest]
    fn test_decode_empty_input_is_truncation() {
        let err = decode_default("").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Truncation);
        let err = decode_default("  \n\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Truncation);
    }

    #[rstest::rstest]
    fn test_decode_single_primitive_roots() {
        assert_eq!(decode_default("42").unwrap(), json!(42));
        assert_eq!(decode_default("hello world").unwrap(), json!("hello world"));
        assert_eq!(decode_default("\"a: b\"").unwrap(), json!("a: b"));
        assert_eq!(decode_default("null").unwrap(), json!(null));
    }

    #[rstest::rstest]
    fn test_duplicate_key_strictness() {
        let input = "a: 1\na: 2";
        let err = decode_default(input).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.line(), Some(2));

        let value = decode(input, &DecodeOptions::new().with_strict(false)).unwrap();
        assert_eq!(value, json!({"a": 2}));
    }
}
