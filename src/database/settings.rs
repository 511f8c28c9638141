//! Connection string handling
//!
//! Connection strings are `mysql://` URLs. The crate's own flags live in the
//! query string and are stripped before the URL reaches the driver.

use super::connection::MYSQL_DRIVER;
use crate::error::{Error, Result};
use std::fmt;
use url::Url;

/// Query flag that must be `true` for `LOAD DATA LOCAL INFILE` to be used
pub const LOCAL_INFILE_FLAG: &str = "allow_local_infile";

const MASK: &str = "****";

/// Parsed and validated connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    url: Url,
    allow_local_infile: bool,
}

impl ConnectionSettings {
    /// Parse a `mysql://` connection string
    pub fn parse(connection_string: &str) -> Result<Self> {
        let url = Url::parse(connection_string)?;
        if url.scheme() != MYSQL_DRIVER {
            return Err(Error::UnsupportedDriver {
                driver: url.scheme().to_string(),
                expected: MYSQL_DRIVER.to_string(),
            });
        }

        let mut allow_local_infile = false;
        for (key, value) in url.query_pairs() {
            if key.eq_ignore_ascii_case(LOCAL_INFILE_FLAG) {
                allow_local_infile = parse_flag(&value)?;
            }
        }

        Ok(Self {
            url,
            allow_local_infile,
        })
    }

    /// Whether the connection string opts in to local infile loads
    pub fn allows_local_infile(&self) -> bool {
        self.allow_local_infile
    }

    /// Fail unless the connection string opts in to local infile loads
    pub fn require_local_infile(&self) -> Result<()> {
        if self.allow_local_infile {
            Ok(())
        } else {
            Err(Error::invalid_value(
                "connection_string",
                format!(
                    "'{}' must set {LOCAL_INFILE_FLAG}=true to use LOAD DATA LOCAL INFILE",
                    self.masked()
                ),
            ))
        }
    }

    /// Host name, if any
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Database named in the path, if any
    pub fn database(&self) -> Option<&str> {
        let database = self.url.path().trim_start_matches('/');
        (!database.is_empty()).then_some(database)
    }

    /// Connection string with the password hidden, for logging
    pub fn masked(&self) -> String {
        let mut url = self.url.clone();
        if url.password().is_some() {
            // Cannot fail: the URL already has a host.
            let _ = url.set_password(Some(MASK));
        }
        url.to_string()
    }

    /// Connection string for the driver, without this crate's flags
    pub fn driver_url(&self) -> String {
        let mut url = self.url.clone();
        let kept: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(key, _)| !key.eq_ignore_ascii_case(LOCAL_INFILE_FLAG))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
        url.to_string()
    }
}

impl fmt::Display for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(Error::invalid_value(
            LOCAL_INFILE_FLAG,
            format!("'{other}' is not a boolean"),
        )),
    }
}
