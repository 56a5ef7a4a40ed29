use serde_json::Number;
use smallvec::SmallVec;

/// Token matches the integer grammar `-?(0|[1-9][0-9]*)`.
pub fn is_integer_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    let digits = match bytes.first() {
        Some(b'-') => &bytes[1..],
        _ => bytes,
    };
    match digits {
        [] => false,
        [b'0'] => true,
        [first, ..] => *first != b'0' && digits.iter().all(|b| b.is_ascii_digit()),
    }
}

/// Token matches the float grammar: the integer grammar followed by a
/// fraction, an exponent, or both.
pub fn is_float_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    let mut idx = 0;
    if bytes.first() == Some(&b'-') {
        idx += 1;
    }

    let int_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    let int_digits = idx - int_start;
    if int_digits == 0 {
        return false;
    }
    if int_digits > 1 && bytes[int_start] == b'0' {
        return false;
    }

    let mut has_fraction = false;
    if bytes.get(idx) == Some(&b'.') {
        idx += 1;
        let frac_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == frac_start {
            return false;
        }
        has_fraction = true;
    }

    let mut has_exponent = false;
    if matches!(bytes.get(idx), Some(b'e') | Some(b'E')) {
        idx += 1;
        if matches!(bytes.get(idx), Some(b'+') | Some(b'-')) {
            idx += 1;
        }
        let exp_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == exp_start {
            return false;
        }
        has_exponent = true;
    }

    idx == bytes.len() && (has_fraction || has_exponent)
}

pub fn is_numeric_like(token: &str) -> bool {
    is_integer_token(token) || is_float_token(token)
}

/// Parse a numeric token into a `Number`. `None` when the token does not
/// match the grammar or the host cannot represent it (e.g. an exponent that
/// overflows to infinity); callers fall back to treating it as a string.
pub fn parse_number_token(token: &str) -> Option<Number> {
    if is_integer_token(token) {
        if let Ok(value) = token.parse::<i64>() {
            return Some(Number::from(value));
        }
        if let Ok(value) = token.parse::<u64>() {
            return Some(Number::from(value));
        }
        // Wider than the host's integers: nearest float.
        let value = token.parse::<f64>().ok()?;
        return Number::from_f64(value);
    }
    if is_float_token(token) {
        let value = token.parse::<f64>().ok()?;
        if !value.is_finite() {
            return None;
        }
        return Number::from_f64(value);
    }
    None
}

/// Append the canonical rendering of a number: plain decimal integers and
/// shortest-round-trip floats with any exponent expanded.
pub fn append_number(out: &mut String, number: &Number) {
    if let Some(value) = number.as_i64() {
        let mut buffer = itoa::Buffer::new();
        out.push_str(buffer.format(value));
        return;
    }
    if let Some(value) = number.as_u64() {
        let mut buffer = itoa::Buffer::new();
        out.push_str(buffer.format(value));
        return;
    }
    if let Some(value) = number.as_f64() {
        append_f64(out, value);
        return;
    }
    out.push_str("null");
}

pub fn format_number(number: &Number) -> String {
    let mut out = String::with_capacity(24);
    append_number(&mut out, number);
    out
}

fn append_f64(out: &mut String, value: f64) {
    if value == 0.0 {
        // Covers -0.0: the sign is dropped, the floatness kept.
        out.push_str("0.0");
        return;
    }
    let mut buffer = ryu::Buffer::new();
    let raw = buffer.format_finite(value);
    let start = out.len();
    if raw.bytes().any(|byte| byte == b'e' || byte == b'E') {
        expand_exponent_into(out, raw);
    } else {
        out.push_str(raw);
    }
    if !out[start..].contains('.') {
        out.push_str(".0");
    }
}

// Rewrite ryu's exponent form as a plain decimal so the output never leaves
// the float grammar's simplest shape.
fn expand_exponent_into(out: &mut String, raw: &str) {
    let bytes = raw.as_bytes();
    let mut idx = 0;
    let negative = bytes.first() == Some(&b'-');
    if negative {
        idx += 1;
    }

    let mut digits: SmallVec<[u8; 32]> = SmallVec::new();
    let mut dot_pos = None;
    while idx < bytes.len() {
        match bytes[idx] {
            b'0'..=b'9' => digits.push(bytes[idx]),
            b'.' => dot_pos = Some(digits.len()),
            b'e' | b'E' => {
                idx += 1;
                break;
            }
            _ => {}
        }
        idx += 1;
    }

    let mut exp_sign = 1i64;
    match bytes.get(idx) {
        Some(b'-') => {
            exp_sign = -1;
            idx += 1;
        }
        Some(b'+') => idx += 1,
        _ => {}
    }
    let mut exp: i64 = 0;
    while idx < bytes.len() {
        if bytes[idx].is_ascii_digit() {
            exp = exp.saturating_mul(10).saturating_add((bytes[idx] - b'0') as i64);
        }
        idx += 1;
    }
    exp *= exp_sign;

    let dot_pos = dot_pos.unwrap_or(digits.len()) as i64;
    let new_pos = dot_pos + exp;

    if negative {
        out.push('-');
    }

    if new_pos <= 0 {
        out.push_str("0.");
        for _ in 0..(-new_pos) {
            out.push('0');
        }
        for &digit in &digits {
            out.push(digit as char);
        }
        return;
    }

    let new_pos = new_pos as usize;
    if new_pos >= digits.len() {
        for &digit in &digits {
            out.push(digit as char);
        }
        for _ in 0..(new_pos - digits.len()) {
            out.push('0');
        }
        return;
    }

    for &digit in &digits[..new_pos] {
        out.push(digit as char);
    }
    out.push('.');
    for &digit in &digits[new_pos..] {
        out.push(digit as char);
    }
}
