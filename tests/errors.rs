use rstest::rstest;
use serde_json::json;
use serde_tone::{
    decode, encode, DecodeOptions, EncodeOptions, Error, ErrorKind, Indent,
};

fn decode_err(input: &str) -> Error {
    decode(input, &DecodeOptions::default())
        .expect_err("expected a decode error")
}

fn decode_err_lenient(input: &str) -> Error {
    decode(input, &DecodeOptions::new().with_strict(false))
        .expect_err("expected a decode error")
}

#[rstest]
fn strict_count_mismatch_cites_header_line() {
    let err = decode_err("u[3]{id}:\n  1\n  2\n");
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.line(), Some(1));
    assert!(err.to_string().contains("declared 3"));
    assert!(err.to_string().contains("declared 3, found 2"));
}

#[rstest]
fn indent_remainder_cites_offending_line() {
    let err = decode_err("a:\n   b: 1\n");
    assert_eq!(err.kind, ErrorKind::Indent);
    assert_eq!(err.line(), Some(2));
    assert!(err.to_string().contains("multiple of"));
}

#[rstest]
#[case("a: 1\n  b: 2")]
#[case("a:\n    b: 1")]
#[case("u[1]{a}:\n    1")]
fn depth_jumps_are_indent_errors(#[case] input: &str) {
    let err = decode_err(input);
    assert_eq!(err.kind, ErrorKind::Indent);

    // Depth jumps are never repaired.
    let err = decode_err_lenient(input);
    assert_eq!(err.kind, ErrorKind::Indent);
}

#[rstest]
fn tab_indentation_is_always_fatal() {
    for options in [
        DecodeOptions::default(),
        DecodeOptions::new().with_strict(false),
    ] {
        let err = decode("a:\n\tb: 1", &options).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Indent);
    }
}

#[rstest]
fn row_width_mismatch() {
    let err = decode_err("u[2]{a,b}:\n  1,2\n  3\n");
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.line(), Some(3));
    assert!(err.to_string().contains("row has 1 fields, header declares 2"));
}

#[rstest]
#[case("items[2]: a", "declared 2 values, found 1")]
#[case("u[1]{a}:\n  1\n  2", "declared 1 rows, found 2")]
#[case("items[1]:\n  - 1\n  - 2", "declared 1 items, found 2")]
#[case("items[2]:\n  - 1", "declared 2 items, found 1")]
fn strict_count_disagreements(#[case] input: &str, #[case] needle: &str) {
    let err = decode_err(input);
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(
        err.to_string().contains(needle),
        "missing {needle:?} in {err}"
    );
}

#[rstest]
fn duplicate_keys_and_fields() {
    let err = decode_err("a: 1\na: 2");
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.line(), Some(2));

    let err = decode_err("u[1]{a,a}:\n  1,1");
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[rstest]
#[case("k: \"a\\qb\"")]
#[case("k: \"abc")]
#[case("\"open: 1")]
#[case("k[x]: 1")]
#[case("k[]: 1")]
#[case("k[2")]
#[case("k[1]{}:")]
#[case("k[1]{a:")]
#[case("k[1]stray:")]
#[case("a: 1\njust words")]
fn syntax_errors(#[case] input: &str) {
    let err = decode_err(input);
    assert_eq!(err.kind, ErrorKind::Syntax, "wrong kind for {input:?}: {err}");
}

#[rstest]
fn bad_escapes_are_fatal_even_lenient() {
    let err = decode_err_lenient("k: \"a\\qb\"");
    assert_eq!(err.kind, ErrorKind::Syntax);
}

#[rstest]
#[case("")]
#[case("   \n\n")]
fn empty_input_is_truncation(#[case] input: &str) {
    let err = decode_err(input);
    assert_eq!(err.kind, ErrorKind::Truncation);
}

#[rstest]
fn trailing_content_after_root_array() {
    let err = decode_err("[2]: 1,2\nx: 1");
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.line(), Some(2));
}

#[rstest]
fn blank_line_inside_array_body() {
    let err = decode_err("u[2]{a}:\n  1\n\n  2");
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.line(), Some(3));

    let repaired = decode("u[2]{a}:\n  1\n\n  2", &DecodeOptions::new().with_strict(false));
    assert_eq!(repaired.unwrap(), json!({"u": [{"a": 1}, {"a": 2}]}));
}

#[rstest]
#[case(0)]
#[case(9)]
fn indent_out_of_range_is_config(#[case] spaces: usize) {
    let err = encode(
        &json!({"a": 1}),
        &EncodeOptions::new().with_indent(Indent::spaces(spaces)),
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Config);

    let err = decode(
        "a: 1",
        &DecodeOptions::new().with_indent(Indent::spaces(spaces)),
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Config);
}

#[rstest]
fn non_finite_floats_normalize_to_null() {
    // The value tree cannot hold NaN or infinities; the serde path
    // normalizes them to null the way the reference implementation does.
    assert_eq!(serde_tone::to_string(&f64::NAN).unwrap(), "null\n");
    assert_eq!(serde_tone::to_string(&f64::INFINITY).unwrap(), "null\n");
}

#[rstest]
fn invalid_unquoted_key_in_strict_mode() {
    let err = decode_err("bad key: 1");
    assert_eq!(err.kind, ErrorKind::Validation);

    assert_eq!(
        decode("bad key: 1", &DecodeOptions::new().with_strict(false)).unwrap(),
        json!({"bad key": 1})
    );
}

#[rstest]
fn errors_carry_excerpt_and_hint() {
    let err = decode_err("u[3]{id}:\n  1\n  2\n");
    assert_eq!(err.excerpt.as_deref(), Some("u[3]{id}:"));
    assert!(err.hint.is_some());
    assert!(err.to_string().contains("help:"));
}

#[rstest]
fn error_output_is_deterministic() {
    let first = decode_err("u[2]{a,b}:\n  1\n").to_string();
    let second = decode_err("u[2]{a,b}:\n  1\n").to_string();
    assert_eq!(first, second);
}
