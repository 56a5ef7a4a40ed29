//! Batch helpers over independent documents.
//!
//! Each document goes through a self-contained `encode`/`decode` call, so the
//! only thing the `parallel` feature changes is which threads do the work.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use serde_json::Value;

use crate::{decode, encode, DecodeOptions, EncodeOptions, Result};

/// Encode a batch of independent value trees.
///
/// # Examples
/// ```
/// use serde_tone::{encode_batch, EncodeOptions};
/// use serde_json::json;
///
/// let docs = vec![json!({"id": 1}), json!({"id": 2})];
/// let texts = encode_batch(&docs, &EncodeOptions::default())?;
/// assert_eq!(texts, vec!["id: 1\n", "id: 2\n"]);
/// # Ok::<(), serde_tone::Error>(())
/// ```
#[cfg(feature = "parallel")]
pub fn encode_batch(values: &[Value], options: &EncodeOptions) -> Result<Vec<String>> {
    values
        .par_iter()
        .map(|value| encode(value, options))
        .collect()
}

#[cfg(not(feature = "parallel"))]
pub fn encode_batch(values: &[Value], options: &EncodeOptions) -> Result<Vec<String>> {
    values.iter().map(|value| encode(value, options)).collect()
}

/// Decode a batch of independent documents. Fails on the first bad document.
#[cfg(feature = "parallel")]
pub fn decode_batch<S: AsRef<str> + Sync>(
    inputs: &[S],
    options: &DecodeOptions,
) -> Result<Vec<Value>> {
    inputs
        .par_iter()
        .map(|input| decode(input.as_ref(), options))
        .collect()
}

#[cfg(not(feature = "parallel"))]
pub fn decode_batch<S: AsRef<str>>(inputs: &[S], options: &DecodeOptions) -> Result<Vec<Value>> {
    inputs
        .iter()
        .map(|input| decode(input.as_ref(), options))
        .collect()
}
