//! Tests for table definition resolution

use super::*;
use crate::record::{ColumnKind, Record, RecordMap};
use crate::types::ColumnOrder;
use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;
use uuid::Uuid;

struct Reading {
    sensor: String,
    taken_at: DateTime<Utc>,
    value: f64,
    id: Uuid,
}

impl Record for Reading {
    fn describe(map: &mut RecordMap<Self>) {
        map.field("sensor", |r| &r.sensor)
            .field("taken_at", |r| &r.taken_at)
            .field("value", |r| &r.value)
            .field("id", |r| &r.id);
    }
}

fn catalog() -> StaticColumns {
    StaticColumns::new().with_table("readings", ["id", "Sensor", "TAKEN_AT", "value", "note"])
}

// ============================================================================
// Declared Order Tests
// ============================================================================

#[test]
fn test_declared_order() {
    let map = RecordMap::<Reading>::of();
    let definition = TableDefinition::from_record_map("readings", &map).unwrap();

    assert_eq!(definition.table(), "readings");
    assert_eq!(definition.names(), vec!["sensor", "taken_at", "value", "id"]);
    for (index, column) in definition.columns().iter().enumerate() {
        assert_eq!(column.ordinal, index);
        assert_eq!(column.field, index);
    }
    assert_eq!(definition.column("ID").unwrap().column_type.kind, ColumnKind::Uuid);
}

#[test]
fn test_empty_map_is_rejected() {
    let map = RecordMap::<Reading>::new();
    let err = TableDefinition::from_record_map("readings", &map).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_duplicate_names_are_rejected() {
    let mut map = RecordMap::<Reading>::new();
    map.field("value", |r| &r.value).field("VALUE", |r| &r.value);

    let err = TableDefinition::from_record_map("readings", &map).unwrap_err();
    assert!(err.to_string().contains("mapped more than once"));
}

#[test]
fn test_blank_table_is_rejected() {
    let map = RecordMap::<Reading>::of();
    let err = TableDefinition::from_record_map("  ", &map).unwrap_err();
    assert!(err.is_config());
}

// ============================================================================
// Schema-Aware Tests
// ============================================================================

#[tokio::test]
async fn test_schema_order_follows_table() {
    let map = RecordMap::<Reading>::of();
    let mut provider = catalog();

    let definition = resolve_with_schema("readings", &map, &mut provider)
        .await
        .unwrap();

    // Physical order, table spelling, unmapped "note" left out
    assert_eq!(definition.names(), vec!["id", "Sensor", "TAKEN_AT", "value"]);

    let fields: Vec<usize> = definition.columns().iter().map(|c| c.field).collect();
    assert_eq!(fields, vec![3, 0, 1, 2]);

    let ordinals: Vec<usize> = definition.columns().iter().map(|c| c.ordinal).collect();
    assert_eq!(ordinals, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn test_schema_unmatched_field_fails() {
    let map = RecordMap::<Reading>::of();
    let mut provider = StaticColumns::new().with_table("readings", ["id", "sensor", "value"]);

    let err = resolve_with_schema("readings", &map, &mut provider)
        .await
        .unwrap_err();

    assert!(err.is_config());
    assert!(err.to_string().contains("field 'taken_at'"));
}

#[tokio::test]
async fn test_schema_unknown_table_fails() {
    let map = RecordMap::<Reading>::of();
    let mut provider = catalog();

    let err = resolve_with_schema("missing", &map, &mut provider)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[tokio::test]
async fn test_resolve_dispatches_on_order() {
    let map = RecordMap::<Reading>::of();
    let mut provider = catalog();

    let declared = resolve("readings", &map, ColumnOrder::Declared, &mut provider)
        .await
        .unwrap();
    assert_eq!(declared.names(), vec!["sensor", "taken_at", "value", "id"]);

    let schema = resolve("readings", &map, ColumnOrder::Schema, &mut provider)
        .await
        .unwrap();
    assert_eq!(schema.names(), vec!["id", "Sensor", "TAKEN_AT", "value"]);
}

#[tokio::test]
async fn test_declared_order_skips_catalog() {
    let map = RecordMap::<Reading>::of();
    let mut empty = StaticColumns::new();

    let definition = resolve("readings", &map, ColumnOrder::Declared, &mut empty)
        .await
        .unwrap();
    assert_eq!(definition.len(), 4);
}
