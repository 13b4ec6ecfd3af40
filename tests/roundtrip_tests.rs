//! Grid ⇄ tree transcoding through the public API

use gridtree::encode::broadcast::broadcast_all;
use gridtree::{
    decode_sheet, encode_sheet, Cell, Grid, Node, Path, TranscodeConfig, TranscodeError,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn nodes(value: Value) -> Vec<Node> {
    value.as_array().unwrap().iter().map(Node::from).collect()
}

fn to_json(records: &[Node]) -> Value {
    Value::Array(records.iter().map(Value::from).collect())
}

fn t(s: &str) -> Option<Cell> {
    Some(Cell::text(s))
}

fn n(v: f64) -> Option<Cell> {
    Some(Cell::Number(v))
}

fn roundtrip(value: Value) {
    let config = TranscodeConfig::default();
    let records = nodes(value.clone());
    let grid = encode_sheet(&records, None, &config);
    let decoded = decode_sheet("sheet", &grid, &config.trace_id);
    assert!(decoded.errors.is_empty(), "errors: {:?}", decoded.errors);
    assert_eq!(to_json(&decoded.records), value);
    assert_eq!(decoded.records, records);
}

// ═══════════════════════════════════════════════════════════════════════════
// DOCUMENTED EXAMPLES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_decode_repeating_group_example() {
    let grid = Grid::with_rows(
        vec!["id".into(), "items[].sku".into(), "items[].qty".into()],
        vec![vec![t("A"), t("x"), n(1.0)], vec![t(""), t("y"), n(2.0)]],
    );
    let decoded = decode_sheet("order", &grid, "trace");
    assert_eq!(
        to_json(&decoded.records),
        json!([{"id": "A", "items": [{"sku": "x", "qty": 1}, {"sku": "y", "qty": 2}]}])
    );
}

#[test]
fn test_encode_derived_headers_example() {
    let records = nodes(json!([
        {"id": "A", "addr": {"city": "X"}, "items": [{"sku": "x"}, {"sku": "y"}]}
    ]));
    let grid = encode_sheet(&records, None, &TranscodeConfig::default());
    assert_eq!(grid.headers, vec!["id", "addr.city", "items[].sku"]);
    assert_eq!(
        grid.rows,
        vec![vec![t("A"), t("X"), t("x")], vec![None, None, t("y")]]
    );
}

#[test]
fn test_malformed_header_only_costs_its_cells() {
    let grid = Grid::with_rows(
        vec!["id".into(), "a..b".into(), "items[].sku".into()],
        vec![
            vec![t("A"), t("bad"), t("x")],
            vec![None, t("worse"), t("y")],
        ],
    );
    let decoded = decode_sheet("s", &grid, "trace");
    assert_eq!(decoded.errors.len(), 2);
    assert!(decoded
        .errors
        .iter()
        .all(|e| matches!(e.error, TranscodeError::PathSyntax { .. }) && e.header == "a..b"));
    assert_eq!(
        to_json(&decoded.records),
        json!([{"id": "A", "items": [{"sku": "x"}, {"sku": "y"}]}])
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// ROUND TRIPS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_roundtrip_flat_records() {
    roundtrip(json!([
        {"identifier": "A", "name": "alpha", "price": 9.5, "active": true},
        {"identifier": "B", "name": "beta", "price": 3, "active": false}
    ]));
}

#[test]
fn test_roundtrip_objects_inside_array_elements() {
    roundtrip(json!([{
        "identifier": "A",
        "dims": {"w": 1, "h": 2},
        "items": [
            {"sku": "x", "spec": {"color": "red"}},
            {"sku": "y", "spec": {"color": "blue"}}
        ],
        "tags": ["t1"]
    }]));
}

#[test]
fn test_roundtrip_nested_repeating_groups() {
    roundtrip(json!([
        {"id": "A", "orders": [
            {"ref": "R1", "lines": [{"sku": "a", "qty": 1}, {"sku": "b", "qty": 2}]},
            {"ref": "R2", "lines": [{"sku": "c", "qty": 3}]}
        ]},
        {"id": "B", "orders": [{"ref": "R3", "lines": [{"sku": "d", "qty": 4}]}]}
    ]));
}

#[test]
fn test_roundtrip_primitive_arrays() {
    roundtrip(json!([
        {"id": "A", "tags": ["red", "blue", "green"]},
        {"id": "B", "tags": ["plain"]}
    ]));
}

#[test]
fn test_roundtrip_irregular_records() {
    roundtrip(json!([
        {"id": "A", "note": "first", "items": [{"sku": "x"}, {"sku": "y", "qty": 2}]},
        {"id": "B", "addr": {"city": "Y"}},
        {"id": "C", "items": [{"qty": 7}]}
    ]));
}

#[test]
fn test_roundtrip_one_long_sibling_group() {
    roundtrip(json!([{"id": "A", "a": ["1"], "b": ["x", "y", "z"]}]));
    roundtrip(json!([{"id": "A", "a": ["1", "2"], "b": ["x"]}]));
}

#[test]
fn test_roundtrip_record_led_by_array_field() {
    let config = TranscodeConfig::default();
    let records = nodes(json!([{"items": [{"sku": "x"}, {"sku": "y"}], "id": "A"}]));
    let grid = encode_sheet(&records, None, &config);
    assert_eq!(grid.headers, vec!["id", "items[].sku"]);
    roundtrip(json!([
        {"items": [{"sku": "x"}, {"sku": "y"}], "id": "A"},
        {"tags": ["t1", "t2"], "id": "B"}
    ]));
}

#[test]
fn test_record_without_leading_value_joins_previous() {
    let config = TranscodeConfig::default();
    let records = nodes(json!([{"id": "A"}, {"items": [{"sku": "x"}]}]));
    let grid = encode_sheet(&records, None, &config);
    assert_eq!(grid.rows, vec![vec![t("A"), None], vec![None, t("x")]]);

    let decoded = decode_sheet("s", &grid, &config.trace_id);
    assert_eq!(
        to_json(&decoded.records),
        json!([{"id": "A", "items": [{"sku": "x"}]}])
    );
}

#[test]
fn test_roundtrip_normalises_nulls_and_empty_containers() {
    let config = TranscodeConfig::default();
    let records = nodes(json!([{"id": "A", "gone": null, "meta": {}, "list": [], "keep": "k"}]));
    let grid = encode_sheet(&records, None, &config);
    let decoded = decode_sheet("s", &grid, &config.trace_id);
    assert_eq!(to_json(&decoded.records), json!([{"id": "A", "keep": "k"}]));
}

// ═══════════════════════════════════════════════════════════════════════════
// ENCODER POLICIES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_sibling_groups_continue_from_furthest_row() {
    let records = nodes(json!([
        {"id": "A", "a": ["1", "2"], "b": ["x", "y", "z"]},
        {"id": "B", "a": ["3"], "b": ["w"]}
    ]));
    let grid = encode_sheet(&records, None, &TranscodeConfig::default());
    assert_eq!(grid.headers, vec!["id", "a[]", "b[]"]);
    assert_eq!(
        grid.rows,
        vec![
            vec![t("A"), t("1"), t("x")],
            vec![None, t("2"), t("y")],
            vec![None, None, t("z")],
            vec![t("B"), t("3"), t("w")],
        ]
    );
}

#[test]
fn test_values_without_header_are_dropped() {
    let headers = vec!["id".to_string(), "items[].sku".to_string()];
    let records = nodes(json!([{"id": "A", "secret": "s", "items": [{"sku": "x", "cost": 4}]}]));
    let grid = encode_sheet(&records, Some(headers.as_slice()), &TranscodeConfig::default());
    assert_eq!(grid.rows, vec![vec![t("A"), t("x")]]);
}

#[test]
fn test_identity_column_leads_derived_headers() {
    let records = nodes(json!([{"name": "n", "identifier": "A", "items": [{"sku": "x"}]}]));
    let grid = encode_sheet(&records, None, &TranscodeConfig::default());
    assert_eq!(grid.headers, vec!["identifier", "name", "items[].sku"]);
}

#[test]
fn test_broadcast_is_idempotent() {
    let paths: Vec<Path> = ["id", "addr.city", "items[].sku", "items[].dims.w", "tags[]"]
        .iter()
        .map(|p| Path::parse(p).unwrap())
        .collect();
    let refs: Vec<&Path> = paths.iter().collect();

    let mut once = nodes(json!([
        {"id": "A", "items": [{"sku": "x"}, {"dims": {"h": 1}}]},
        {"addr": {}}
    ]));
    broadcast_all(&mut once, &refs);
    let mut twice = once.clone();
    broadcast_all(&mut twice, &refs);
    assert_eq!(once, twice);
}

#[test]
fn test_encoded_grid_never_holds_placeholders() {
    let records = nodes(json!([
        {"id": "A", "orders": [{"ref": "R1", "lines": [{"sku": "a"}, {"sku": "b"}]}, {"ref": "R2"}]}
    ]));
    let grid = encode_sheet(&records, None, &TranscodeConfig::default());
    assert!(!grid.has_placeholders());
}
