// Typed errors for the library surface.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    /// Caller supplied data that cannot be interpreted (bad date string,
    /// weekday outside 0..=6, day of month outside 1..=31, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read snapshot '{path}': {source}")]
    SnapshotIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse snapshot '{path}': {source}")]
    SnapshotFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported snapshot version {found} (expected at most {supported})")]
    SnapshotVersion { found: u32, supported: u32 },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
