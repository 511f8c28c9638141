//! Diagnostic echo of payloads
//!
//! After every batch, successful or not, the payload content is echoed to
//! the configured sink for post-mortem debugging.

use crate::error::Result;
use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

/// Where payload content is echoed after each batch
#[derive(Clone, Default)]
pub enum DiagnosticSink {
    /// Drop the echo
    #[default]
    Discard,
    /// Emit the payload as a `tracing` debug event
    Log,
    /// Append the raw payload bytes to a writer
    Writer(Arc<Mutex<Box<dyn Write + Send>>>),
}

impl fmt::Debug for DiagnosticSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSink::Discard => f.write_str("Discard"),
            DiagnosticSink::Log => f.write_str("Log"),
            DiagnosticSink::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

impl DiagnosticSink {
    /// Echo into any writer
    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        DiagnosticSink::Writer(Arc::new(Mutex::new(Box::new(writer))))
    }

    /// Echo one batch's payload
    pub fn echo(&self, batch: usize, payload: &[u8]) -> Result<()> {
        match self {
            DiagnosticSink::Discard => {}
            DiagnosticSink::Log => {
                tracing::debug!(
                    target: "fast_insert::payload",
                    batch,
                    bytes = payload.len(),
                    payload = %String::from_utf8_lossy(payload),
                    "Payload echo"
                );
            }
            DiagnosticSink::Writer(writer) => {
                let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
                writer.write_all(payload)?;
                writer.flush()?;
            }
        }
        Ok(())
    }
}
