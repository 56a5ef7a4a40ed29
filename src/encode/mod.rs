mod shape;

use std::io::Write;

use serde::Serialize;
use serde_json::{Map, Value};

use self::shape::{classify, ArrayShape};
use crate::constants::{LENGTH_MARKER, LIST_ITEM_PREFIX, MAX_DEPTH};
use crate::num::number::append_number;
use crate::text::string::{analyze_string, escape_string_into, is_valid_unquoted_key};
use crate::{EncodeOptions, Error, Result};

/// Encode a value tree to TONE text. Output ends with a single newline
/// unless the value is an empty root object, which encodes to nothing.
pub fn encode(value: &Value, options: &EncodeOptions) -> Result<String> {
    options.validate()?;
    let mut encoder = Encoder::new(options);
    encoder.encode_root(value)?;
    Ok(encoder.out)
}

pub fn to_string<T: Serialize>(value: &T, options: &EncodeOptions) -> Result<String> {
    let value = serde_json::to_value(value)
        .map_err(|err| Error::encode_value(format!("serialize failed: {err}")))?;
    encode(&value, options)
}

pub fn to_vec<T: Serialize>(value: &T, options: &EncodeOptions) -> Result<Vec<u8>> {
    to_string(value, options).map(String::into_bytes)
}

pub fn to_writer<T: Serialize, W: Write>(
    mut writer: W,
    value: &T,
    options: &EncodeOptions,
) -> Result<()> {
    let text = to_string(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|err| Error::encode_value(format!("write failed: {err}")))
}

struct Encoder {
    delimiter: char,
    length_marker: bool,
    indent_unit: String,
    out: String,
}

impl Encoder {
    fn new(options: &EncodeOptions) -> Self {
        Self {
            delimiter: options.delimiter.as_char(),
            length_marker: options.length_marker,
            indent_unit: " ".repeat(options.indent.get_spaces()),
            out: String::new(),
        }
    }

    fn encode_root(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Object(map) => self.encode_object(map, 0),
            Value::Array(array) => self.encode_array(None, array, 0, false),
            scalar => {
                self.begin_line(0, false);
                self.append_scalar(scalar)?;
                self.end_line();
                Ok(())
            }
        }
    }

    fn encode_object(&mut self, map: &Map<String, Value>, depth: usize) -> Result<()> {
        if depth > MAX_DEPTH {
            return Err(Error::encode_value("maximum nesting depth exceeded"));
        }
        for (key, value) in map {
            self.encode_entry(key, value, depth)?;
        }
        Ok(())
    }

    fn encode_entry(&mut self, key: &str, value: &Value, depth: usize) -> Result<()> {
        match value {
            Value::Array(array) => self.encode_array(Some(key), array, depth, false),
            Value::Object(map) => {
                self.begin_line(depth, false);
                self.append_key(key);
                self.out.push(':');
                self.end_line();
                self.encode_object(map, depth + 1)
            }
            scalar => {
                self.begin_line(depth, false);
                self.append_key(key);
                self.out.push_str(": ");
                self.append_scalar(scalar)?;
                self.end_line();
                Ok(())
            }
        }
    }

    /// Emit an array at `depth`, choosing the rendering per the shape
    /// classifier. With `dash` set the header line becomes a list item;
    /// a keyed header under a dash pushes its body one level further so the
    /// item's sibling fields keep the level right below the dash.
    fn encode_array(
        &mut self,
        key: Option<&str>,
        array: &[Value],
        depth: usize,
        dash: bool,
    ) -> Result<()> {
        if depth > MAX_DEPTH {
            return Err(Error::encode_value("maximum nesting depth exceeded"));
        }
        let body_depth = if dash && key.is_some() {
            depth + 2
        } else {
            depth + 1
        };
        match classify(array) {
            ArrayShape::Empty => {
                self.begin_line(depth, dash);
                self.append_header(key, 0, None);
                self.end_line();
                Ok(())
            }
            ArrayShape::InlinePrimitive => {
                self.begin_line(depth, dash);
                self.append_header(key, array.len(), None);
                self.out.push(' ');
                for (idx, item) in array.iter().enumerate() {
                    if idx > 0 {
                        self.out.push(self.delimiter);
                    }
                    self.append_scalar(item)?;
                }
                self.end_line();
                Ok(())
            }
            ArrayShape::Tabular(fields) => {
                self.begin_line(depth, dash);
                self.append_header(key, array.len(), Some(fields.as_slice()));
                self.end_line();
                for item in array {
                    let row = item
                        .as_object()
                        .ok_or_else(|| Error::encode_value("tabular row is not an object"))?;
                    self.begin_line(body_depth, false);
                    for (idx, field) in fields.iter().enumerate() {
                        if idx > 0 {
                            self.out.push(self.delimiter);
                        }
                        let cell = row
                            .get(*field)
                            .ok_or_else(|| Error::encode_value("tabular row missing field"))?;
                        self.append_scalar(cell)?;
                    }
                    self.end_line();
                }
                Ok(())
            }
            ArrayShape::List => {
                self.begin_line(depth, dash);
                self.append_header(key, array.len(), None);
                self.end_line();
                for item in array {
                    self.encode_list_item(item, body_depth)?;
                }
                Ok(())
            }
        }
    }

    fn encode_list_item(&mut self, value: &Value, depth: usize) -> Result<()> {
        match value {
            Value::Array(array) => self.encode_array(None, array, depth, true),
            Value::Object(map) => self.encode_object_item(map, depth),
            scalar => {
                self.begin_line(depth, true);
                self.append_scalar(scalar)?;
                self.end_line();
                Ok(())
            }
        }
    }

    /// An object list item carries its first field on the dash line and the
    /// remaining fields one level deeper.
    fn encode_object_item(&mut self, map: &Map<String, Value>, depth: usize) -> Result<()> {
        let mut entries = map.iter();
        let Some((first_key, first_value)) = entries.next() else {
            // Empty object element: a bare dash.
            self.begin_line(depth, false);
            self.out.push('-');
            self.end_line();
            return Ok(());
        };

        match first_value {
            Value::Array(array) => {
                self.encode_array(Some(first_key.as_str()), array, depth, true)?;
            }
            Value::Object(nested) => {
                self.begin_line(depth, true);
                self.append_key(first_key);
                self.out.push(':');
                self.end_line();
                self.encode_object(nested, depth + 2)?;
            }
            scalar => {
                self.begin_line(depth, true);
                self.append_key(first_key);
                self.out.push_str(": ");
                self.append_scalar(scalar)?;
                self.end_line();
            }
        }

        for (key, value) in entries {
            self.encode_entry(key, value, depth + 1)?;
        }
        Ok(())
    }

    fn append_header(&mut self, key: Option<&str>, len: usize, fields: Option<&[&str]>) {
        if let Some(key) = key {
            self.append_key(key);
        }
        self.out.push('[');
        if self.length_marker {
            self.out.push(LENGTH_MARKER);
        }
        let mut buffer = itoa::Buffer::new();
        self.out.push_str(buffer.format(len));
        if self.delimiter != ',' {
            self.out.push(self.delimiter);
        }
        self.out.push(']');
        if let Some(fields) = fields {
            self.out.push('{');
            for (idx, field) in fields.iter().enumerate() {
                if idx > 0 {
                    self.out.push(self.delimiter);
                }
                self.append_key(field);
            }
            self.out.push('}');
        }
        self.out.push(':');
    }

    fn append_scalar(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(true) => self.out.push_str("true"),
            Value::Bool(false) => self.out.push_str("false"),
            Value::Number(number) => append_number(&mut self.out, number),
            Value::String(value) => self.append_string_scalar(value),
            _ => return Err(Error::encode_value("non-scalar value in scalar position")),
        }
        Ok(())
    }

    fn append_string_scalar(&mut self, value: &str) {
        let (needs_quote, needs_escape) = analyze_string(value, self.delimiter);
        if !needs_quote {
            self.out.push_str(value);
            return;
        }
        self.out.push('"');
        if needs_escape {
            escape_string_into(&mut self.out, value);
        } else {
            self.out.push_str(value);
        }
        self.out.push('"');
    }

    fn append_key(&mut self, key: &str) {
        if is_valid_unquoted_key(key) {
            self.out.push_str(key);
            return;
        }
        self.out.push('"');
        escape_string_into(&mut self.out, key);
        self.out.push('"');
    }

    fn begin_line(&mut self, depth: usize, dash: bool) {
        for _ in 0..depth {
            self.out.push_str(&self.indent_unit);
        }
        if dash {
            self.out.push_str(LIST_ITEM_PREFIX);
        }
    }

    fn end_line(&mut self) {
        self.out.push('\n');
    }
}
