//! Tests for load statement building

use super::*;
use crate::payload::{PayloadFormat, PayloadWriter};
use crate::record::{ColumnKind, ColumnType, Record, RecordMap};
use crate::schema::{ColumnDefinition, TableDefinition};
use crate::test_support::{read_payload, Field};
use crate::types::{BinaryEncoding, DateTimeFormat};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::path::Path;
use test_case::test_case;
use uuid::Uuid;

struct Upload {
    id: Uuid,
    parent: Option<Uuid>,
    name: String,
    data: Vec<u8>,
}

impl Record for Upload {
    fn describe(map: &mut RecordMap<Self>) {
        map.field("id", |u| &u.id)
            .field("parent", |u| &u.parent)
            .field("name", |u| u.name.as_str())
            .field("data", |u| &u.data);
    }
}

fn definition() -> TableDefinition {
    TableDefinition::from_record_map("uploads", &RecordMap::<Upload>::of()).unwrap()
}

fn unix_format() -> PayloadFormat {
    PayloadFormat::default().with_line_terminator("\n")
}

// ============================================================================
// Statement Text Tests
// ============================================================================

#[test]
fn test_plain_statement() {
    let definition = TableDefinition::new(
        "people",
        vec![
            ColumnDefinition::new("id", ColumnType::new(ColumnKind::Integer), 0, 0),
            ColumnDefinition::new("name", ColumnType::new(ColumnKind::Text), 1, 1),
        ],
    )
    .unwrap();
    let statement = LoadStatement::new(&definition, &unix_format());

    assert_eq!(
        statement.build(Path::new("/tmp/fast-insert-abc.csv")),
        [
            "LOAD DATA LOCAL INFILE '/tmp/fast-insert-abc.csv'",
            "INTO TABLE `people`",
            "CHARACTER SET utf8mb4",
            "FIELDS TERMINATED BY ';;' ENCLOSED BY '' ESCAPED BY '\\\\'",
            "LINES TERMINATED BY '\\n'",
            "IGNORE 1 LINES",
            "(`id`, `name`)",
        ]
        .join("\n")
    );
}

#[test]
fn test_default_transforms_bind_variables() {
    let definition = definition();
    let transforms = column_transforms(&definition, BinaryEncoding::Hex, &HashMap::new()).unwrap();
    let sql = LoadStatement::new(&definition, &unix_format())
        .with_transforms(transforms)
        .build(Path::new("/tmp/p.csv"));

    assert!(sql.contains("\n(@fi_0, @fi_1, `name`, @fi_3)\n"), "{sql}");
    assert!(sql.ends_with(
        "SET `id` = UNHEX(@fi_0), `parent` = UNHEX(NULLIF(@fi_1, '')), `data` = UNHEX(@fi_3)"
    ));
}

#[test]
fn test_escaped_binary_has_no_unhex() {
    let definition = definition();
    let transforms =
        column_transforms(&definition, BinaryEncoding::Escaped, &HashMap::new()).unwrap();
    let sql = LoadStatement::new(&definition, &unix_format())
        .with_transforms(transforms)
        .with_character_set(BINARY_CHARACTER_SET)
        .build(Path::new("/tmp/p.csv"));

    assert!(sql.contains("CHARACTER SET binary"));
    assert!(sql.contains("(@fi_0, @fi_1, `name`, `data`)"));
    assert!(!sql.contains("`data` = "));
}

#[test]
fn test_override_replaces_default() {
    let definition = definition();
    let overrides = HashMap::from([
        ("ID".to_string(), Transform::Expression("UUID_TO_BIN({}, 1)".to_string())),
        ("name".to_string(), Transform::NullIfEmpty),
    ]);
    let transforms = column_transforms(&definition, BinaryEncoding::Hex, &overrides).unwrap();
    let sql = LoadStatement::new(&definition, &unix_format())
        .with_transforms(transforms)
        .build(Path::new("/tmp/p.csv"));

    assert!(sql.contains("(@fi_0, @fi_1, @fi_2, @fi_3)"));
    assert!(sql.contains("`id` = UUID_TO_BIN(@fi_0, 1)"));
    assert!(sql.contains("`name` = NULLIF(@fi_2, '')"));
}

#[test]
fn test_override_for_unknown_column_fails() {
    let overrides = HashMap::from([("missing".to_string(), Transform::Unhex)]);
    let err = column_transforms(&definition(), BinaryEncoding::Hex, &overrides).unwrap_err();

    assert!(err.is_config());
    assert!(err.to_string().contains("'missing'"));
}

#[test]
fn test_with_transform_replaces_same_column() {
    let definition = definition();
    let statement = LoadStatement::new(&definition, &unix_format())
        .with_transform(ColumnTransform::new("name", 2, Transform::NullIfEmpty))
        .with_transform(ColumnTransform::new("NAME", 2, Transform::Unhex));

    assert_eq!(statement.transforms().len(), 1);
    assert!(statement.build(Path::new("/p")).contains("`name` = UNHEX(@fi_2)"));
}

#[test]
fn test_literals_and_identifiers_are_quoted() {
    let definition = TableDefinition::new(
        "shop.odd`name",
        vec![ColumnDefinition::new("we`ird", ColumnType::new(ColumnKind::Text), 0, 0)],
    )
    .unwrap();
    let format = PayloadFormat::default()
        .with_field_delimiter("\t")
        .with_line_terminator("\r\n")
        .with_enclosure(Some('\''));
    let sql = LoadStatement::new(&definition, &format).build(Path::new("C:\\tmp\\it's.csv"));

    assert!(sql.contains("INFILE 'C:\\\\tmp\\\\it\\'s.csv'"), "{sql}");
    assert!(sql.contains("INTO TABLE `shop`.`odd``name`"));
    assert!(sql.contains("FIELDS TERMINATED BY '\\t' ENCLOSED BY '\\'' ESCAPED BY '\\\\'"));
    assert!(sql.contains("LINES TERMINATED BY '\\r\\n'"));
    assert!(sql.contains("(`we``ird`)"));
}

#[test]
fn test_no_escape_character() {
    let definition = definition();
    let format = unix_format().with_escape(None);
    let sql = LoadStatement::new(&definition, &format).build(Path::new("/p"));
    assert!(sql.contains("ESCAPED BY ''"));
}

#[test_case("plain", "'plain'" ; "plain")]
#[test_case("a\0b\u{1a}", "'a\\0b\\Z'" ; "control characters")]
#[test_case("", "''" ; "empty")]
fn test_sql_literal(input: &str, expected: &str) {
    assert_eq!(sql_literal(input), expected);
}

#[test_case(Transform::Unhex, "UNHEX(@v)" ; "unhex")]
#[test_case(Transform::UnhexNullIfEmpty, "UNHEX(NULLIF(@v, ''))" ; "unhex null if empty")]
#[test_case(Transform::NullIfEmpty, "NULLIF(@v, '')" ; "null if empty")]
#[test_case(Transform::Expression("LOWER({})".into()), "LOWER(@v)" ; "expression")]
fn test_transform_expressions(transform: Transform, expected: &str) {
    assert_eq!(transform.expression("@v"), expected);
}

#[test]
fn test_transform_from_config() {
    let parse = |yaml: &str| -> Transform {
        serde_yaml::with::singleton_map::deserialize(serde_yaml::Deserializer::from_str(yaml))
            .unwrap()
    };

    assert_eq!(parse("unhex_null_if_empty"), Transform::UnhexNullIfEmpty);
    assert_eq!(
        parse("expression: \"TRIM({})\""),
        Transform::Expression("TRIM({})".into())
    );
}

// ============================================================================
// Statement and Payload Agreement
// ============================================================================

#[test]
fn test_column_list_matches_payload_header() {
    let map = RecordMap::<Upload>::of();
    let definition = definition();
    let format = unix_format();

    let payload = PayloadWriter::new(&definition, &format, BinaryEncoding::Hex, DateTimeFormat::Mysql)
        .write_batch(&map, &[])
        .unwrap();
    let header: Vec<String> = read_payload(&format, &payload)[0]
        .iter()
        .filter_map(Field::text)
        .collect();

    let sql = LoadStatement::new(&definition, &format).build(Path::new("/p"));
    let list = sql.lines().find(|line| line.starts_with('(')).unwrap();
    let listed: Vec<String> = list
        .trim_matches(|c| c == '(' || c == ')')
        .split(", ")
        .map(|name| name.trim_matches('`').to_string())
        .collect();

    assert_eq!(header, listed);
}
