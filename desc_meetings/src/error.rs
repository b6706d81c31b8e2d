//! Failures that abort a crawl of the DESC public meetings pages.
//!
//! None of these are recoverable for a single entry; a crawl either produces
//! every meeting or none of them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The entry page no longer links to both the schedule PDF and the minutes page.
    #[error("Required links not found (schedule: {schedule}, minutes: {minutes})")]
    MissingLinks { schedule : bool, minutes : bool },
    #[error("No year found in schedule text")]
    NoYear,
    /// The canary address fragment is missing, so the schedule layout can no longer be trusted.
    #[error("Meeting location has changed")]
    LocationChanged,
    #[error("Not all dates can be matched with start and end time ({dates} dates, {times} time windows)")]
    Misaligned { dates : usize, times : usize },
    /// `source` is absent when the month is not written out in full, which chrono would otherwise accept.
    #[error("Could not parse date `{input}`")]
    DateParse { input : String, #[source] source : Option<chrono::ParseError> },
    #[error("Could not parse document date `{0}`")]
    BadDocumentDate(String),
}
