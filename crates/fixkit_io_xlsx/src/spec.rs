//! Shared XLSX specification models.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::conf::EnumFmtKey;
use crate::error::{FixtureXlsxError, FixtureXlsxResult};
use crate::util::{derive_column_index, derive_column_name, derive_num_format_kind, parse_cell_ref};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification. Every field is optional so formats can be layered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Bold style.
    pub bold: Option<bool>,
    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Number format code.
    pub num_format: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellValueSpecification

/// Cell value as written to, or read back from, a worksheet.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value, including numeric-looking text and sentinels such as `#N/A`.
    String(String),
    /// Numeric value.
    Number(f64),
    /// Native boolean.
    Boolean(bool),
    /// Date or timestamp.
    DateTime(NaiveDateTime),
}

impl EnumCellValue {
    /// Shorthand for a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// True for a missing value or an empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::None => true,
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Short type label used in logs and inspection output.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::None => "blank",
            Self::String(_) => "text",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::DateTime(_) => "datetime",
        }
    }
}

impl fmt::Display for EnumCellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Zero-based cell coordinate, rendered in A1 notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecCellRef {
    /// Zero-based row index.
    pub row: u32,
    /// Zero-based column index.
    pub col: u16,
}

impl SpecCellRef {
    /// Build from zero-based row/column.
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for SpecCellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", derive_column_name(self.col), self.row + 1)
    }
}

impl FromStr for SpecCellRef {
    type Err = FixtureXlsxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cell_ref(s)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DatasetSpecification

/// One `(id, value)` row.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDatasetRow {
    /// One-based row id.
    pub id: i64,
    /// Row value.
    pub value: EnumCellValue,
}

/// Two-column in-memory table written below a header row.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDataset {
    /// Header labels (`id` plus the value column name).
    pub header: [String; 2],
    /// Data rows in output order.
    pub rows: Vec<SpecDatasetRow>,
}

impl SpecDataset {
    /// Build a dataset whose ids run `1..=values.len()`.
    pub fn from_values(col_value: &str, values: Vec<EnumCellValue>) -> Self {
        let rows = values
            .into_iter()
            .zip(1_i64..)
            .map(|(value, id)| SpecDatasetRow { id, value })
            .collect();
        Self {
            header: ["id".to_string(), col_value.to_string()],
            rows,
        }
    }

    /// Number of data rows (header excluded).
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Value stored at `cell`, if it addresses a data cell.
    pub fn value_at(&self, cell: SpecCellRef) -> Option<EnumCellValue> {
        let n_idx_row = usize::try_from(cell.row).ok()?.checked_sub(1)?;
        let row = self.rows.get(n_idx_row)?;
        match cell.col {
            0 => Some(EnumCellValue::Number(row.id as f64)),
            1 => Some(row.value.clone()),
            _ => None,
        }
    }
}

/// Format annotation: value plus named format written over one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecCellAnnotation {
    /// Target cell.
    pub cell: SpecCellRef,
    /// Value written with the format.
    pub value: EnumCellValue,
    /// Preset applied to the cell.
    pub fmt_key: EnumFmtKey,
}

impl SpecCellAnnotation {
    /// Build an annotation from an A1 reference such as `B5`.
    pub fn at(cell: &str, value: EnumCellValue, fmt_key: EnumFmtKey) -> FixtureXlsxResult<Self> {
        Ok(Self {
            cell: parse_cell_ref(cell)?,
            value,
            fmt_key,
        })
    }
}

/// Column width override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecColumnWidth {
    /// Zero-based column index.
    pub col: u16,
    /// Width in character units.
    pub width: f64,
}

impl SpecColumnWidth {
    /// Build from a column name such as `B`.
    pub fn at(col_name: &str, width: f64) -> FixtureXlsxResult<Self> {
        Ok(Self {
            col: derive_column_index(col_name)?,
            width,
        })
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-write call report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Workbook path the sheet belongs to.
    pub file_out: PathBuf,
    /// Actual sheet name in the workbook.
    pub sheet_name: String,
    /// Data rows written below the header.
    pub n_rows_data: usize,
    /// Cells that received a format annotation.
    pub n_cells_annotated: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

impl fmt::Display for SpecXlsxReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] rows={} annotated={} warnings={}",
            self.file_out.display(),
            self.sheet_name,
            self.n_rows_data,
            self.n_cells_annotated,
            self.warnings.len()
        )
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReadbackSpecification

/// Coarse classification of a number format code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumNumFormatKind {
    /// `General` or no format.
    General,
    /// Plain fixed-point number.
    Number,
    /// Percentage.
    Percentage,
    /// Accounting layout.
    Accounting,
    /// Scientific notation.
    Scientific,
    /// Date and/or time.
    DateTime,
    /// Boolean rendering.
    Boolean,
    /// Text (`@`).
    Text,
}

/// Column type deduced from read-back cells, named after SQL column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumColumnKind {
    /// Any date cell present.
    Date,
    /// Booleans only.
    Boolean,
    /// Numbers needing arbitrary precision.
    Numeric,
    /// Numbers that fit a double.
    DoublePrecision,
    /// Anything else.
    Text,
}

impl EnumColumnKind {
    /// SQL type name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Numeric => "numeric",
            Self::DoublePrecision => "double precision",
            Self::Text => "text",
        }
    }
}

/// One cell as read back from a workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecCellReadback {
    /// Cell coordinate.
    pub cell: SpecCellRef,
    /// Stored value.
    pub value: EnumCellValue,
    /// Resolved number format code; `None` for unstyled cells.
    pub num_format: Option<String>,
}

impl SpecCellReadback {
    /// Classification of [`Self::num_format`].
    pub fn num_format_kind(&self) -> EnumNumFormatKind {
        derive_num_format_kind(self.num_format.as_deref().unwrap_or("General"))
    }
}

/// One sheet as read back from a workbook.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecSheetReadback {
    /// Sheet name.
    pub sheet_name: String,
    /// First-row labels.
    pub header: Vec<String>,
    /// Rows below the header.
    pub rows: Vec<Vec<SpecCellReadback>>,
}

impl SpecSheetReadback {
    /// Number of data rows (header excluded).
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Look up a data cell by coordinate.
    pub fn cell(&self, cell: SpecCellRef) -> Option<&SpecCellReadback> {
        let n_idx_row = usize::try_from(cell.row).ok()?.checked_sub(1)?;
        self.rows.get(n_idx_row)?.get(usize::from(cell.col))
    }

    /// Values of one column, top to bottom.
    pub fn column_values(&self, col: u16) -> Vec<EnumCellValue> {
        self.rows
            .iter()
            .map(|row| {
                row.get(usize::from(col))
                    .map_or(EnumCellValue::None, |cell| cell.value.clone())
            })
            .collect()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
