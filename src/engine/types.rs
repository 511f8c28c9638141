//! Engine types
//!
//! Statistics and phases of a bulk insert.

use std::fmt;

/// Phase of a bulk insert, as reported in debug logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPhase {
    /// Nothing checked yet
    Idle,
    /// Configuration, driver and connection string accepted
    Validated,
    /// Encoding a batch into its payload file
    Writing,
    /// Running the load statement for a batch
    Executing,
    /// Echoing and deleting a batch's payload file
    CleaningUp,
    /// All batches loaded
    Done,
    /// Stopped by an error
    Failed,
}

impl fmt::Display for InsertPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InsertPhase::Idle => "idle",
            InsertPhase::Validated => "validated",
            InsertPhase::Writing => "writing",
            InsertPhase::Executing => "executing",
            InsertPhase::CleaningUp => "cleaning_up",
            InsertPhase::Done => "done",
            InsertPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Statistics from a bulk insert
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertStats {
    /// Batches loaded
    pub batches: usize,
    /// Records written to payloads
    pub records: usize,
    /// Rows the server reported as affected
    pub rows_affected: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl InsertStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one loaded batch
    pub fn add_batch(&mut self, records: usize, rows_affected: u64) {
        self.batches += 1;
        self.records += records;
        self.rows_affected += rows_affected;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
