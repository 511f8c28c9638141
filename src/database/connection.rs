//! Bulk connection capability

use crate::error::Result;
use crate::schema::ColumnNameProvider;
use async_trait::async_trait;
use std::path::Path;

/// Driver name of connections that can run `LOAD DATA LOCAL INFILE`
pub const MYSQL_DRIVER: &str = "mysql";

/// A database connection that can bulk load payload files
///
/// The connection is owned by the caller; the insert engine only opens it
/// when it is closed and closes it again afterwards.
#[async_trait]
pub trait BulkConnection: ColumnNameProvider {
    /// Name of the underlying driver, `mysql` for supported connections
    fn driver_name(&self) -> &str;

    /// Connection string the connection was created from
    fn connection_string(&self) -> &str;

    /// Whether the connection is currently open
    fn is_open(&self) -> bool;

    /// Open the connection
    async fn open(&mut self) -> Result<()>;

    /// Close the connection
    async fn close(&mut self) -> Result<()>;

    /// Run a load statement that reads `payload_path`
    ///
    /// Returns the number of affected rows.
    async fn execute_load(&mut self, statement: &str, payload_path: &Path) -> Result<u64>;
}
