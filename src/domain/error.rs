use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("time_block.id must not be empty")]
    BlankId,
    #[error("time_block.end_time ({end}) must be after time_block.start_time ({start})")]
    EndNotAfterStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("invalid range: start {start} is after end {end}")]
pub struct InvalidRangeError {
    pub start: NaiveDate,
    pub end: NaiveDate,
}
