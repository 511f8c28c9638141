//! Insert engine module
//!
//! Orchestrates a bulk insert from validation to cleanup.
//!
//! # Overview
//!
//! The engine module provides:
//! - `FastInserter` - Loads records through `LOAD DATA LOCAL INFILE`, batch by batch
//! - `InsertStats` - Counters returned by a completed insert
//! - `InsertPhase` - Phases reported in debug logs
//!
//! Every batch is encoded, written to its own payload file, loaded, echoed
//! to the diagnostic sink and deleted before the next batch starts. The
//! first failing batch stops the insert; earlier batches stay loaded.

mod types;

pub use types::{InsertPhase, InsertStats};

use crate::batch::{batch_count, slices, Batches};
use crate::config::{LoadConfig, TableNameStrategy, TypeName};
use crate::database::{BulkConnection, ConnectionSettings, MYSQL_DRIVER};
use crate::error::{Error, Result};
use crate::payload::{DiagnosticSink, PayloadFile, PayloadWriter};
use crate::record::{ColumnKind, Record, RecordMap};
use crate::schema::{self, TableDefinition};
use crate::statement::{column_transforms, LoadStatement, BINARY_CHARACTER_SET};
use crate::types::BinaryEncoding;
use std::time::Instant;

/// Bulk inserter for MySQL
pub struct FastInserter {
    config: LoadConfig,
    table_names: Box<dyn TableNameStrategy>,
    sink: DiagnosticSink,
}

impl std::fmt::Debug for FastInserter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastInserter")
            .field("config", &self.config)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

impl Default for FastInserter {
    fn default() -> Self {
        Self::new(LoadConfig::default())
    }
}

impl FastInserter {
    /// Create an inserter
    pub fn new(config: LoadConfig) -> Self {
        Self {
            config,
            table_names: Box::new(TypeName),
            sink: DiagnosticSink::default(),
        }
    }

    /// Derive table names with `strategy` when the config names no table
    #[must_use]
    pub fn with_table_name_strategy(mut self, strategy: impl TableNameStrategy + 'static) -> Self {
        self.table_names = Box::new(strategy);
        self
    }

    /// Echo every payload to `sink` after its batch
    #[must_use]
    pub fn with_diagnostic_sink(mut self, sink: DiagnosticSink) -> Self {
        self.sink = sink;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Destination table for records of type `R`
    pub fn table_name<R: Record>(&self) -> String {
        match &self.config.table {
            Some(table) => table.clone(),
            None => self.table_names.table_name(R::type_name()),
        }
    }

    /// Insert records from any iterator, pulling one batch at a time
    pub async fn insert<R, C, I>(&self, conn: &mut C, records: I) -> Result<InsertStats>
    where
        R: Record,
        C: BulkConnection + ?Sized,
        I: IntoIterator<Item = R>,
    {
        self.run(conn, Batches::new(records, self.config.batch_size))
            .await
    }

    /// Insert records from a slice without copying them
    pub async fn insert_slice<R, C>(&self, conn: &mut C, records: &[R]) -> Result<InsertStats>
    where
        R: Record,
        C: BulkConnection + ?Sized,
    {
        let size = self.config.batch_size;
        tracing::debug!(
            records = records.len(),
            batches = batch_count(records.len(), size),
            "Planned slice insert"
        );
        self.run(conn, slices(records, size)).await
    }

    async fn run<R, C, B, S>(&self, conn: &mut C, batches: B) -> Result<InsertStats>
    where
        R: Record,
        C: BulkConnection + ?Sized,
        B: Iterator<Item = S>,
        S: AsRef<[R]>,
    {
        let start = Instant::now();
        let table = self.table_name::<R>();
        tracing::debug!(phase = %InsertPhase::Idle, table = %table, "Starting bulk insert");

        let result = self.run_validated(conn, &table, batches).await;

        match result {
            Ok(mut stats) => {
                stats.set_duration(start.elapsed().as_millis() as u64);
                tracing::debug!(phase = %InsertPhase::Done, table = %table);
                tracing::info!(
                    table = %table,
                    batches = stats.batches,
                    records = stats.records,
                    rows_affected = stats.rows_affected,
                    duration_ms = stats.duration_ms,
                    "Bulk insert completed"
                );
                Ok(stats)
            }
            Err(err) => {
                tracing::debug!(phase = %InsertPhase::Failed, table = %table, error = %err);
                Err(err)
            }
        }
    }

    async fn run_validated<R, C, B, S>(
        &self,
        conn: &mut C,
        table: &str,
        batches: B,
    ) -> Result<InsertStats>
    where
        R: Record,
        C: BulkConnection + ?Sized,
        B: Iterator<Item = S>,
        S: AsRef<[R]>,
    {
        self.validate(conn)?;
        tracing::debug!(phase = %InsertPhase::Validated, table);

        let mut batches = batches.peekable();
        if batches.peek().is_none() {
            tracing::debug!(table, "No records to insert");
            return Ok(InsertStats::new());
        }

        let was_open = conn.is_open();
        if !was_open {
            conn.open().await?;
        }

        let result = self.load(conn, table, batches).await;

        if !was_open {
            if let Err(close_err) = conn.close().await {
                match result {
                    Ok(_) => return Err(close_err),
                    Err(_) => {
                        tracing::warn!(error = %close_err, "Failed to close connection after error");
                    }
                }
            }
        }

        result
    }

    /// Checks that must pass before any payload file exists
    fn validate<C: BulkConnection + ?Sized>(&self, conn: &C) -> Result<()> {
        self.config.validate()?;

        if conn.driver_name() != MYSQL_DRIVER {
            return Err(Error::UnsupportedDriver {
                driver: conn.driver_name().to_string(),
                expected: MYSQL_DRIVER.to_string(),
            });
        }

        ConnectionSettings::parse(conn.connection_string())?.require_local_infile()
    }

    async fn load<R, C, B, S>(&self, conn: &mut C, table: &str, batches: B) -> Result<InsertStats>
    where
        R: Record,
        C: BulkConnection + ?Sized,
        B: Iterator<Item = S>,
        S: AsRef<[R]>,
    {
        let config = &self.config;
        let map = RecordMap::<R>::of();
        let definition = schema::resolve(table, &map, config.column_order, conn).await?;
        config.payload.check_nulls(&definition)?;
        let statement = self.statement(&definition)?;
        let writer = PayloadWriter::new(
            &definition,
            &config.payload,
            config.binary_encoding,
            config.datetime_format,
        );

        let mut stats = InsertStats::new();
        for (index, batch) in batches.enumerate() {
            let records = batch.as_ref();
            let rows = self
                .load_batch(conn, &map, &writer, &statement, index, records)
                .await?;
            stats.add_batch(records.len(), rows);
        }
        Ok(stats)
    }

    fn statement<'d>(&self, definition: &'d TableDefinition) -> Result<LoadStatement<'d>> {
        let config = &self.config;
        let transforms = column_transforms(definition, config.binary_encoding, &config.transforms)?;
        let statement = LoadStatement::new(definition, &config.payload).with_transforms(transforms);

        let has_binary = definition
            .columns()
            .iter()
            .any(|column| column.column_type.kind == ColumnKind::Binary);
        if has_binary && config.binary_encoding == BinaryEncoding::Escaped {
            return Ok(statement.with_character_set(BINARY_CHARACTER_SET));
        }
        Ok(statement)
    }

    async fn load_batch<R, C>(
        &self,
        conn: &mut C,
        map: &RecordMap<R>,
        writer: &PayloadWriter<'_>,
        statement: &LoadStatement<'_>,
        index: usize,
        records: &[R],
    ) -> Result<u64>
    where
        C: BulkConnection + ?Sized,
    {
        tracing::debug!(phase = %InsertPhase::Writing, batch = index, records = records.len());
        let payload = writer.write_batch(map, records)?;
        let file = PayloadFile::create(self.config.temp_dir.as_deref())?;

        let executed = match file.write_all(&payload).await {
            Ok(()) => {
                tracing::debug!(
                    phase = %InsertPhase::Executing,
                    batch = index,
                    path = %file.path().display()
                );
                let sql = statement.build(file.path());
                conn.execute_load(&sql, file.path()).await
            }
            Err(err) => Err(err),
        };

        tracing::debug!(phase = %InsertPhase::CleaningUp, batch = index);
        let echoed = self.sink.echo(index, &payload);
        let removed = file.remove();

        match executed {
            Ok(rows) => {
                echoed?;
                removed?;
                tracing::debug!(batch = index, rows_affected = rows, "Batch loaded");
                Ok(rows)
            }
            Err(err) => {
                if let Err(echo_err) = echoed {
                    tracing::warn!(batch = index, error = %echo_err, "Failed to echo payload");
                }
                if let Err(remove_err) = removed {
                    tracing::warn!(batch = index, error = %remove_err, "Failed to delete payload file");
                }
                Err(err)
            }
        }
    }
}
