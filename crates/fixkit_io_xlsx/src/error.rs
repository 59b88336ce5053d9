//! Kernel error type.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for kernel operations.
pub type FixtureXlsxResult<T> = Result<T, FixtureXlsxError>;

/// Errors raised while writing or reading fixture workbooks.
#[derive(Debug, Error)]
pub enum FixtureXlsxError {
    /// Output directory could not be created.
    #[error("Failed to initialize directory {}: {source}", path.display())]
    DirectoryInit {
        /// Directory path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Cell/sheet write rejected by the workbook library.
    #[error("xlsx write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// Workbook could not be saved to disk.
    #[error("Failed to save workbook {}: {source}", path.display())]
    Save {
        /// Output workbook path.
        path: PathBuf,
        /// Underlying library error.
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// Write attempted after the workbook was closed.
    #[error("Cannot write after close().")]
    WriteAfterClose,

    /// Malformed A1 reference or column name.
    #[error("Invalid cell reference: {0:?}")]
    InvalidCellRef(String),

    /// Row/column index outside the worksheet grid.
    #[error("Index overflow: {0}")]
    IndexOverflow(String),

    /// Sheet name already written to this workbook.
    #[error("Sheet name already used in this workbook: {0:?}")]
    DuplicateSheet(String),

    /// Calendar date that does not exist.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Header labels are not unique.
    #[error("Duplicate column names detected: {0}")]
    DuplicateColumns(String),

    /// Workbook could not be opened for read-back.
    #[error("Failed to open workbook {}: {source}", path.display())]
    Open {
        /// Workbook path.
        path: PathBuf,
        /// Underlying reader error.
        #[source]
        source: calamine::XlsxError,
    },

    /// Requested sheet does not exist.
    #[error("Sheet '{sheet}' not found. Available sheets: {available}")]
    SheetNotFound {
        /// Requested sheet name.
        sheet: String,
        /// Comma-joined names present in the workbook.
        available: String,
    },

    /// Package-level error.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML part could not be parsed.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Plain IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
