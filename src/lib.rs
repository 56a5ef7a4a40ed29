//! TONE encoder/decoder: an indentation-based text format for JSON-compatible
//! data that spends fewer LLM tokens than JSON by declaring array lengths up
//! front and collapsing uniform arrays of records into tabular rows.
//!
//! # Examples
//!
//! Quick encode/decode:
//!
//! ```rust
//! use serde::Serialize;
//! use serde_tone::tone;
//!
//! #[derive(Serialize)]
//! struct User {
//!     name: String,
//!     age: u32,
//! }
//!
//! let user = User {
//!     name: "Ada Lovelace".to_string(),
//!     age: 37,
//! };
//! let text = tone!(encode: user)?;
//! assert_eq!(text, "name: Ada Lovelace\nage: 37\n");
//!
//! let value = tone!("name: Ada Lovelace")?;
//! assert_eq!(value, serde_json::json!({"name": "Ada Lovelace"}));
//! # Ok::<(), serde_tone::Error>(())
//! ```
//!
//! Uniform arrays of records become tables:
//!
//! ```rust
//! use serde_json::json;
//! use serde_tone::{decode, encode, DecodeOptions, EncodeOptions};
//!
//! let value = json!({"users": [{"id": 1, "name": "Ada"}, {"id": 2, "name": "Grace"}]});
//! let text = encode(&value, &EncodeOptions::default())?;
//! assert_eq!(text, "users[2]{id,name}:\n  1,Ada\n  2,Grace\n");
//! assert_eq!(decode(&text, &DecodeOptions::default())?, value);
//! # Ok::<(), serde_tone::Error>(())
//! ```
//!
//! Typed decoding through serde:
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_tone::from_str;
//!
//! #[derive(Debug, Deserialize, PartialEq)]
//! struct User {
//!     name: String,
//!     age: u32,
//! }
//!
//! let user: User = from_str("name: Ada\nage: 37")?;
//! assert_eq!(
//!     user,
//!     User {
//!         name: "Ada".to_string(),
//!         age: 37
//!     }
//! );
//! # Ok::<(), serde_tone::Error>(())
//! ```
//!
//! Custom options:
//!
//! ```rust
//! use serde_tone::{Delimiter, EncodeOptions};
//!
//! let options = EncodeOptions::new().with_delimiter(Delimiter::Pipe);
//! let text = serde_tone::to_string_with_options(&serde_json::json!({"items": ["a", "b"]}), &options)?;
//! assert_eq!(text, "items[2|]: a|b\n");
//! # Ok::<(), serde_tone::Error>(())
//! ```
//!
//! Non-strict decoding repairs count disagreements instead of failing:
//!
//! ```rust
//! use serde_tone::{decode, DecodeOptions};
//!
//! let lenient = DecodeOptions::new().with_strict(false);
//! let value = decode("u[3]{id}:\n  1\n  2", &lenient)?;
//! assert_eq!(value, serde_json::json!({"u": [{"id": 1}, {"id": 2}]}));
//! # Ok::<(), serde_tone::Error>(())
//! ```

pub mod constants;
pub mod decode;
pub mod encode;
pub mod error;
pub mod num;
pub mod options;
pub mod parallel;
pub mod text;

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use crate::error::{Error, ErrorKind, Location};
pub use crate::options::{DecodeOptions, Delimiter, EncodeOptions, Indent};
pub use crate::parallel::{decode_batch, encode_batch};
pub use serde_json::Value;

pub type Result<T> = std::result::Result<T, Error>;

/// Encode a value tree to TONE text.
pub fn encode(value: &Value, options: &EncodeOptions) -> Result<String> {
    encode::encode(value, options)
}

/// Decode TONE text into a value tree.
pub fn decode(input: &str, options: &DecodeOptions) -> Result<Value> {
    decode::decode(input, options)
}

pub fn to_string<T: Serialize>(value: &T) -> Result<String> {
    to_string_with_options(value, &EncodeOptions::default())
}

pub fn to_string_with_options<T: Serialize>(value: &T, options: &EncodeOptions) -> Result<String> {
    encode::to_string(value, options)
}

pub fn to_string_from_json_str(input: &str) -> Result<String> {
    to_string_from_json_str_with_options(input, &EncodeOptions::default())
}

pub fn to_string_from_json_str_with_options(
    input: &str,
    options: &EncodeOptions,
) -> Result<String> {
    let value: Value = serde_json::from_str(input)
        .map_err(|err| Error::encode_value(format!("invalid json: {err}")))?;
    encode::encode(&value, options)
}

pub fn to_vec<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    to_vec_with_options(value, &EncodeOptions::default())
}

pub fn to_vec_with_options<T: Serialize>(value: &T, options: &EncodeOptions) -> Result<Vec<u8>> {
    encode::to_vec(value, options)
}

pub fn to_writer<T: Serialize, W: Write>(writer: W, value: &T) -> Result<()> {
    to_writer_with_options(writer, value, &EncodeOptions::default())
}

pub fn to_writer_with_options<T: Serialize, W: Write>(
    writer: W,
    value: &T,
    options: &EncodeOptions,
) -> Result<()> {
    encode::to_writer(writer, value, options)
}

pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    from_str_with_options(input, &DecodeOptions::default())
}

pub fn from_str_with_options<T: DeserializeOwned>(
    input: &str,
    options: &DecodeOptions,
) -> Result<T> {
    decode::from_str(input, options)
}

pub fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T> {
    from_slice_with_options(input, &DecodeOptions::default())
}

pub fn from_slice_with_options<T: DeserializeOwned>(
    input: &[u8],
    options: &DecodeOptions,
) -> Result<T> {
    decode::from_slice(input, options)
}

pub fn from_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T> {
    from_reader_with_options(reader, &DecodeOptions::default())
}

pub fn from_reader_with_options<T: DeserializeOwned, R: Read>(
    reader: R,
    options: &DecodeOptions,
) -> Result<T> {
    decode::from_reader(reader, options)
}

/// Decode input that may be either JSON or TONE, trying JSON first.
pub fn decode_to_value_auto<S: AsRef<str>>(input: S) -> Result<Value> {
    decode_to_value_auto_with_options(input, &DecodeOptions::default())
}

pub fn decode_to_value_auto_with_options<S: AsRef<str>>(
    input: S,
    options: &DecodeOptions,
) -> Result<Value> {
    let input = input.as_ref();
    match serde_json::from_str::<Value>(input) {
        Ok(value) => Ok(value),
        Err(json_err) => match decode(input, options) {
            Ok(value) => Ok(value),
            Err(tone_err) => Err(Error::syntax(format!(
                "input is neither valid JSON nor TONE: json error: {json_err}; tone error: {tone_err}"
            ))),
        },
    }
}

/// Check that input is well-formed TONE without keeping the value.
pub fn validate_str(input: &str) -> Result<()> {
    validate_str_with_options(input, &DecodeOptions::default())
}

pub fn validate_str_with_options(input: &str, options: &DecodeOptions) -> Result<()> {
    decode::validate_str(input, options)
}

#[macro_export]
/// Encode values into TONE, or parse a JSON/TONE string into a
/// `serde_tone::Value`.
///
/// # Examples
///
/// ```rust
/// use serde_tone::tone;
///
/// let value = tone!("name: \"Snoopy\"\nage: 5")?;
/// assert_eq!(value, serde_json::json!({"name": "Snoopy", "age": 5}));
/// # Ok::<(), serde_tone::Error>(())
/// ```
///
/// ```rust
/// use serde_tone::tone;
///
/// let text = tone!(encode_json: r#"{"name":"Grace Hopper"}"#)?;
/// assert_eq!(text, "name: Grace Hopper\n");
/// # Ok::<(), serde_tone::Error>(())
/// ```
macro_rules! tone {
    (encode: $input:expr) => {
        $crate::to_string(&$input)
    };
    (encode: $input:expr, $options:expr) => {
        $crate::to_string_with_options(&$input, $options)
    };
    (encode_json: $input:expr) => {
        $crate::to_string_from_json_str($input)
    };
    (encode_json: $input:expr, $options:expr) => {
        $crate::to_string_from_json_str_with_options($input, $options)
    };
    ($input:expr) => {
        $crate::decode_to_value_auto($input)
    };
    ($input:expr, $options:expr) => {
        $crate::decode_to_value_auto_with_options($input, $options)
    };
}
