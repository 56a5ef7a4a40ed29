use rstest::rstest;
use serde_json::{json, Value};
use serde_tone::{encode, Delimiter, EncodeOptions, Indent};

fn encode_default(value: &Value) -> String {
    encode(value, &EncodeOptions::default()).unwrap()
}

#[rstest]
#[case(json!({"id": 1, "name": "Ada"}), "id: 1\nname: Ada\n")]
#[case(json!({"tags": ["a", "b", "c"]}), "tags[3]: a,b,c\n")]
#[case(
    json!({"u": [{"id": 1, "n": "A"}, {"id": 2, "n": "B"}]}),
    "u[2]{id,n}:\n  1,A\n  2,B\n"
)]
#[case(
    json!({"u": [{"id": 1}, {"id": 2, "x": true}]}),
    "u[2]:\n  - id: 1\n  - id: 2\n    x: true\n"
)]
#[case(json!([{"id": 1}, {"id": 2}]), "[2]{id}:\n  1\n  2\n")]
#[case(json!({"k": "a,b"}), "k: \"a,b\"\n")]
fn spec_scenarios(#[case] input: Value, #[case] expected: &str) {
    assert_eq!(encode_default(&input), expected);
}

#[rstest]
#[case(json!(null), "null\n")]
#[case(json!(true), "true\n")]
#[case(json!(42), "42\n")]
#[case(json!(-1.5), "-1.5\n")]
#[case(json!("plain text"), "plain text\n")]
#[case(json!(""), "\"\"\n")]
#[case(json!("null"), "\"null\"\n")]
#[case(json!("42"), "\"42\"\n")]
fn root_primitives(#[case] input: Value, #[case] expected: &str) {
    assert_eq!(encode_default(&input), expected);
}

#[rstest]
#[case(json!({"items": []}), "items[0]:\n")]
#[case(json!([]), "[0]:\n")]
#[case(json!({"a": {}}), "a:\n")]
#[case(json!({"a": {"b": {}}}), "a:\n  b:\n")]
fn empty_composites(#[case] input: Value, #[case] expected: &str) {
    assert_eq!(encode_default(&input), expected);
}

#[rstest]
#[case(json!({"items": [[1, 2]]}), "items[1]:\n  - [2]: 1,2\n")]
#[case(json!({"items": [[]]}), "items[1]:\n  - [0]:\n")]
#[case(
    json!({"items": [[[1], [2]]]}),
    "items[1]:\n  - [2]:\n    - [1]: 1\n    - [1]: 2\n"
)]
#[case(json!({"items": [[1], "x"]}), "items[2]:\n  - [1]: 1\n  - x\n")]
#[case(json!({"items": [1, {"a": 2}]}), "items[2]:\n  - 1\n  - a: 2\n")]
#[case(json!({"items": [{}]}), "items[1]:\n  -\n")]
fn list_arrays(#[case] input: Value, #[case] expected: &str) {
    assert_eq!(encode_default(&input), expected);
}

#[rstest]
// The first field rides the dash line; its composite body sits two levels
// under the dash while sibling fields sit one level under it.
#[case(
    json!({"items": [{"table": [{"a": 1, "b": 2}, {"a": 3, "b": 4}], "note": "x"}]}),
    "items[1]:\n  - table[2]{a,b}:\n      1,2\n      3,4\n    note: x\n"
)]
#[case(
    json!({"items": [{"a": {"b": 1}, "c": 2}]}),
    "items[1]:\n  - a:\n      b: 1\n    c: 2\n"
)]
#[case(
    json!({"items": [{"tags": [1, 2], "id": 7}]}),
    "items[1]:\n  - tags[2]: 1,2\n    id: 7\n"
)]
#[case(
    json!({"items": [{"a": {}, "b": 1}]}),
    "items[1]:\n  - a:\n    b: 1\n"
)]
fn object_list_items(#[case] input: Value, #[case] expected: &str) {
    assert_eq!(encode_default(&input), expected);
}

#[rstest]
// Tabular promotion needs identical key sets with scalar leaves only; field
// order follows the first element.
#[case(
    json!({"items": [{"b": 1, "a": 2}, {"a": 3, "b": 4}]}),
    "items[2]{b,a}:\n  1,2\n  4,3\n"
)]
#[case(
    json!({"items": [{"a-b": 1, "b": 2}, {"a-b": 3, "b": 4}]}),
    "items[2]{\"a-b\",b}:\n  1,2\n  3,4\n"
)]
#[case(
    json!({"items": [{"a": {"b": 1}}]}),
    "items[1]:\n  - a:\n      b: 1\n"
)]
fn tabular_boundaries(#[case] input: Value, #[case] expected: &str) {
    assert_eq!(encode_default(&input), expected);
}

#[rstest]
fn delimiter_appears_in_bracket_and_joins() {
    let value = json!({"items": [{"a": "x", "b": "y"}]});
    let options = EncodeOptions::new().with_delimiter(Delimiter::Pipe);
    assert_eq!(
        encode(&value, &options).unwrap(),
        "items[1|]{a|b}:\n  x|y\n"
    );

    let options = EncodeOptions::new().with_delimiter(Delimiter::Tab);
    assert_eq!(
        encode(&value, &options).unwrap(),
        "items[1\t]{a\tb}:\n  x\ty\n"
    );
}

#[rstest]
fn delimiter_drives_quoting() {
    let value = json!({"items": ["a,b", "c|d"]});
    assert_eq!(encode_default(&value), "items[2]: \"a,b\",c|d\n");

    let options = EncodeOptions::new().with_delimiter(Delimiter::Pipe);
    assert_eq!(
        encode(&value, &options).unwrap(),
        "items[2|]: a,b|\"c|d\"\n"
    );
}

#[rstest]
fn length_marker_renders_on_every_header() {
    let value = json!({"tags": [1, 2], "rows": [{"a": 1}], "empty": []});
    let options = EncodeOptions::new().with_length_marker(true);
    assert_eq!(
        encode(&value, &options).unwrap(),
        "tags[#2]: 1,2\nrows[#1]{a}:\n  1\nempty[#0]:\n"
    );
}

#[rstest]
#[case("a b", "a b")]
#[case("a  b", "a  b")]
#[case(" a", "\" a\"")]
#[case("a ", "\"a \"")]
#[case("a:b", "\"a:b\"")]
#[case("a#b", "\"a#b\"")]
#[case("[a]", "\"[a]\"")]
#[case("{a}", "\"{a}\"")]
#[case("a-b", "\"a-b\"")]
#[case("-", "\"-\"")]
#[case("true", "\"true\"")]
#[case("1e3", "\"1e3\"")]
#[case("05", "05")]
#[case("a\"b", "\"a\\\"b\"")]
#[case("a\nb", "\"a\\nb\"")]
#[case("a\u{1}b", "\"a\\u0001b\"")]
fn string_quoting(#[case] input: &str, #[case] expected_token: &str) {
    let value = json!({ "k": input });
    assert_eq!(encode_default(&value), format!("k: {expected_token}\n"));
}

#[rstest]
fn nested_objects_step_one_level() {
    let value = json!({"a": {"b": {"c": 1}}, "d": 2});
    assert_eq!(encode_default(&value), "a:\n  b:\n    c: 1\nd: 2\n");

    let options = EncodeOptions::new().with_indent(Indent::spaces(3));
    assert_eq!(
        encode(&value, &options).unwrap(),
        "a:\n   b:\n      c: 1\nd: 2\n"
    );
}

#[rstest]
fn numbers_render_canonically() {
    let value = json!({
        "int": 42,
        "neg": -7,
        "big": u64::MAX,
        "float": 1.5,
        "zero": 0.0,
        "exp": 1e16,
    });
    assert_eq!(
        encode_default(&value),
        "int: 42\nneg: -7\nbig: 18446744073709551615\nfloat: 1.5\nzero: 0.0\nexp: 10000000000000000.0\n"
    );
}
