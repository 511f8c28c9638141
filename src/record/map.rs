//! Record mappings
//!
//! A `RecordMap` lists the readable fields of a record type in declared
//! order, each with a column name, a declared type and an accessor.

use super::value::{ColumnType, ColumnValue, Value};
use std::fmt;

/// Reads one field of a record
pub type Accessor<R> = Box<dyn for<'a> Fn(&'a R) -> Value<'a> + Send + Sync>;

fn accessor<R, F>(read: F) -> Accessor<R>
where
    F: for<'a> Fn(&'a R) -> Value<'a> + Send + Sync + 'static,
{
    Box::new(read)
}

/// A record type that can be bulk loaded
///
/// ```
/// use fast_insert::record::{Record, RecordMap};
///
/// struct Order {
///     id: i64,
///     customer: String,
///     quantity: u32,
///     unit_price: f64,
/// }
///
/// impl Order {
///     fn total(&self) -> f64 {
///         f64::from(self.quantity) * self.unit_price
///     }
/// }
///
/// impl Record for Order {
///     fn describe(map: &mut RecordMap<Self>) {
///         map.field("id", |o| &o.id)
///             .field("customer", |o| &o.customer)
///             .field("quantity", |o| &o.quantity)
///             .field("unit_price", |o| &o.unit_price)
///             .computed("total", Order::total);
///     }
/// }
///
/// let map = RecordMap::<Order>::of();
/// assert_eq!(map.names(), vec!["id", "customer", "quantity", "unit_price", "total"]);
/// ```
pub trait Record: Sized {
    /// Name used to infer the destination table when none is configured
    fn type_name() -> &'static str {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Register the readable fields in declared order
    fn describe(map: &mut RecordMap<Self>);
}

/// One mapped field
pub struct FieldMapping<R> {
    name: String,
    column_type: ColumnType,
    read_only: bool,
    read: Accessor<R>,
}

impl<R> FieldMapping<R> {
    /// Column name of the field
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type of the field
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Whether the field is computed rather than stored
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Read the field from a record
    pub fn value<'a>(&self, record: &'a R) -> Value<'a> {
        (self.read)(record)
    }
}

impl<R> fmt::Debug for FieldMapping<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMapping")
            .field("name", &self.name)
            .field("column_type", &self.column_type)
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}

/// Ordered field mappings of a record type
pub struct RecordMap<R> {
    fields: Vec<FieldMapping<R>>,
}

impl<R> Default for RecordMap<R> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<R> fmt::Debug for RecordMap<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.fields).finish()
    }
}

impl<R> RecordMap<R> {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the mapping a record type describes
    pub fn of() -> Self
    where
        R: Record,
    {
        let mut map = Self::new();
        R::describe(&mut map);
        map
    }

    /// Map a stored field
    pub fn field<T, F>(&mut self, name: impl Into<String>, get: F) -> &mut Self
    where
        T: ColumnValue + ?Sized + 'static,
        F: for<'a> Fn(&'a R) -> &'a T + Send + Sync + 'static,
    {
        self.fields.push(FieldMapping {
            name: name.into(),
            column_type: T::COLUMN_TYPE,
            read_only: false,
            read: accessor(move |record| get(record).to_value()),
        });
        self
    }

    /// Map a read-only value computed from the record
    pub fn computed<T, F>(&mut self, name: impl Into<String>, get: F) -> &mut Self
    where
        T: ColumnValue,
        F: Fn(&R) -> T + Send + Sync + 'static,
    {
        self.fields.push(FieldMapping {
            name: name.into(),
            column_type: T::COLUMN_TYPE,
            read_only: true,
            read: accessor(move |record| get(record).to_value().into_owned()),
        });
        self
    }

    /// Mapped fields in declared order
    pub fn fields(&self) -> &[FieldMapping<R>] {
        &self.fields
    }

    /// Field at the given declared position
    pub fn get(&self, index: usize) -> Option<&FieldMapping<R>> {
        self.fields.get(index)
    }

    /// Field names in declared order
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(FieldMapping::name).collect()
    }

    /// Number of mapped fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is mapped
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
