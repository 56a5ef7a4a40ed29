use serde_json::Value;

/// How an array is rendered. Decided per array during encode; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ArrayShape<'a> {
    Empty,
    InlinePrimitive,
    /// Field order is the insertion order of the first element.
    Tabular(Vec<&'a str>),
    List,
}

pub(crate) fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
    )
}

/// Classify in spec order: empty, then all-scalar inline, then uniform
/// objects with scalar leaves as tabular, list as the fallback. Arrays of
/// arrays always fall through to list.
pub(crate) fn classify(array: &[Value]) -> ArrayShape<'_> {
    if array.is_empty() {
        return ArrayShape::Empty;
    }
    if array.iter().all(is_scalar) {
        return ArrayShape::InlinePrimitive;
    }
    match tabular_fields(array) {
        Some(fields) => ArrayShape::Tabular(fields),
        None => ArrayShape::List,
    }
}

fn tabular_fields(array: &[Value]) -> Option<Vec<&str>> {
    let first = array.first()?.as_object()?;
    if first.is_empty() {
        return None;
    }
    let fields: Vec<&str> = first.keys().map(String::as_str).collect();
    for item in array {
        let row = item.as_object()?;
        if row.len() != fields.len() {
            return None;
        }
        for &field in &fields {
            if !is_scalar(row.get(field)?) {
                return None;
            }
        }
    }
    Some(fields)
}
