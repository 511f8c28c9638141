//! Database connectivity for bulk loads
//!
//! This module provides the connection capability the insert engine needs
//! and its MySQL implementation over `mysql_async`.
//!
//! A connection used for bulk loads must:
//! - report the `mysql` driver
//! - carry `allow_local_infile=true` in its connection string
//! - serve the payload file when the server asks for it

mod connection;
mod mysql;
mod settings;

pub use connection::{BulkConnection, MYSQL_DRIVER};
pub use mysql::MySqlConnection;
pub use settings::{ConnectionSettings, LOCAL_INFILE_FLAG};
