use std::io::Error;

use derive_setters::Setters;
use polars::error::PolarsError;

#[derive(Debug)]
pub enum GridError {
    IoError(Error),
    PolarsError(PolarsError),
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
    UnknownFileType,
}

impl From<Error> for GridError {
    fn from(err: Error) -> Self {
        GridError::IoError(err)
    }
}

impl From<PolarsError> for GridError {
    fn from(err: PolarsError) -> Self {
        GridError::PolarsError(err)
    }
}

/// Host-side input intents. The controller maps key events onto these, the
/// app dispatches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Quit,
    CursorLeft,
    CursorRight,
    SortColumn,
    NextPage,
    PreviousPage,
    Refresh,
}

#[derive(Debug, Clone, Setters)]
pub struct GridConfig {
    /// Terminal event poll timeout in milliseconds.
    pub event_poll_time: u64,
    /// Records per page served by the file source.
    pub page_size: usize,
    /// Widest rendered column, longer cells are cut off by the layout.
    pub max_column_width: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            page_size: 25,
            max_column_width: 40,
        }
    }
}
