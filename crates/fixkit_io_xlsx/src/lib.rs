//! `fixkit_io_xlsx` v1:
//! Rust-side XLSX kernel for fixture workbooks.
//!
//! Module layout:
//! - `conf`   : constants and named format presets
//! - `spec`   : specs/models/options
//! - `error`  : kernel error type
//! - `util`   : pure helper functions
//! - `writer` : workbook writer over `rust_xlsxwriter`
//! - `reader` : read-back of values and number formats
pub mod conf;
pub mod error;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_SHEET_NAME_DEFAULT, EnumFmtKey, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX,
    N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL, derive_default_xlsx_formats,
};
pub use error::{FixtureXlsxError, FixtureXlsxResult};
pub use reader::read_sheet;
pub use spec::{
    EnumCellValue, EnumColumnKind, EnumNumFormatKind, SpecCellAnnotation, SpecCellFormat,
    SpecCellReadback, SpecCellRef, SpecColumnWidth, SpecDataset, SpecDatasetRow, SpecSheetReadback,
    SpecXlsxReport,
};
pub use util::{
    cast_col_num, convert_excel_serial_to_datetime, derive_column_kind, derive_num_format_kind,
    parse_cell_ref, sanitize_header_name, sanitize_sheet_name,
};
pub use writer::{SpecXlsxSheetWriteOptions, XlsxWriter};
