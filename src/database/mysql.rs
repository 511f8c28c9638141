//! MySQL connection over `mysql_async`

use super::connection::{BulkConnection, MYSQL_DRIVER};
use super::settings::ConnectionSettings;
use crate::error::{Error, Result};
use crate::schema::ColumnNameProvider;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Opts};
use std::fmt;
use std::path::Path;

const COLUMN_NAMES_SQL: &str = "SELECT column_name FROM information_schema.columns \
     WHERE table_schema = COALESCE(?, DATABASE()) AND table_name = ? \
     ORDER BY ordinal_position";

/// MySQL connection able to serve payload files to `LOAD DATA LOCAL INFILE`
pub struct MySqlConnection {
    connection_string: String,
    settings: ConnectionSettings,
    opts: Opts,
    conn: Option<Conn>,
}

impl fmt::Debug for MySqlConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlConnection")
            .field("connection", &self.settings.masked())
            .field("open", &self.conn.is_some())
            .finish()
    }
}

impl MySqlConnection {
    /// Create a closed connection, validating the connection string
    pub fn new(connection_string: impl Into<String>) -> Result<Self> {
        let connection_string = connection_string.into();
        let settings = ConnectionSettings::parse(&connection_string)?;
        let opts = Opts::from_url(&settings.driver_url())
            .map_err(|e| Error::MySql(mysql_async::Error::from(e)))?;

        Ok(Self {
            connection_string,
            settings,
            opts,
            conn: None,
        })
    }

    /// Create and open a connection
    pub async fn connect(connection_string: impl Into<String>) -> Result<Self> {
        let mut connection = Self::new(connection_string)?;
        connection.open().await?;
        Ok(connection)
    }

    /// Parsed connection settings
    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// The open driver connection, for statements outside bulk loads
    pub fn conn_mut(&mut self) -> Result<&mut Conn> {
        self.conn
            .as_mut()
            .ok_or_else(|| Error::config(format!("connection to {} is not open", self.settings)))
    }
}

#[async_trait]
impl ColumnNameProvider for MySqlConnection {
    async fn column_names(&mut self, table: &str) -> Result<Vec<String>> {
        let (schema, name) = match table.split_once('.') {
            Some((schema, name)) => (Some(schema.to_string()), name.to_string()),
            None => (None, table.to_string()),
        };

        let conn = self.conn_mut()?;
        let rows: Vec<(String,)> = conn.exec(COLUMN_NAMES_SQL, (schema, name)).await?;
        Ok(rows.into_iter().map(|(column,)| column).collect())
    }
}

#[async_trait]
impl BulkConnection for MySqlConnection {
    fn driver_name(&self) -> &str {
        MYSQL_DRIVER
    }

    fn connection_string(&self) -> &str {
        &self.connection_string
    }

    fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    async fn open(&mut self) -> Result<()> {
        if self.conn.is_none() {
            let conn = Conn::new(self.opts.clone()).await?;
            tracing::debug!(connection = %self.settings, "Opened MySQL connection");
            self.conn = Some(conn);
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.disconnect().await?;
            tracing::debug!(connection = %self.settings, "Closed MySQL connection");
        }
        Ok(())
    }

    async fn execute_load(&mut self, statement: &str, payload_path: &Path) -> Result<u64> {
        let payload = Bytes::from(tokio::fs::read(payload_path).await?);
        let conn = self.conn_mut()?;

        // The handler serves exactly this payload, whatever file name the server asks for.
        conn.set_infile_handler(async move {
            Ok(futures::stream::iter([Ok::<_, std::io::Error>(payload)]).boxed())
        });

        conn.query_drop(statement).await?;
        Ok(conn.affected_rows())
    }
}
