//! Stateless helper utilities used by the XLSX writer and reader.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::error::{FixtureXlsxError, FixtureXlsxResult};
use crate::spec::{EnumCellValue, EnumColumnKind, EnumNumFormatKind, SpecCellRef};

static RE_CELL_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$?([A-Za-z]{1,3})\$?([0-9]{1,7})$").expect("valid cell-ref regex")
});
static RE_HEADER_ILLEGAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid header regex"));
static RE_NUMERIC_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,$\s]").expect("valid numeric-noise regex"));

////////////////////////////////////////////////////////////////////////////////
// #region CellAddressing

/// Parse an A1 reference (`B5`, `$B$5`) into a zero-based coordinate.
pub fn parse_cell_ref(cell_ref: &str) -> FixtureXlsxResult<SpecCellRef> {
    let Some(caps) = RE_CELL_REF.captures(cell_ref.trim()) else {
        return Err(FixtureXlsxError::InvalidCellRef(cell_ref.to_string()));
    };
    let col = derive_column_index(&caps[1])?;
    let n_row_1based: usize = caps[2]
        .parse()
        .map_err(|_| FixtureXlsxError::InvalidCellRef(cell_ref.to_string()))?;
    if n_row_1based == 0 || n_row_1based > N_NROWS_EXCEL_MAX {
        return Err(FixtureXlsxError::InvalidCellRef(cell_ref.to_string()));
    }
    Ok(SpecCellRef::new(cast_row_num(n_row_1based - 1)?, col))
}

/// Convert a column name (`A`, `AB`) to a zero-based index.
pub fn derive_column_index(col_name: &str) -> FixtureXlsxResult<u16> {
    if col_name.is_empty()
        || col_name.len() > 3
        || !col_name.chars().all(|chr| chr.is_ascii_alphabetic())
    {
        return Err(FixtureXlsxError::InvalidCellRef(col_name.to_string()));
    }
    let n_col_1based = col_name
        .to_ascii_uppercase()
        .bytes()
        .fold(0usize, |acc, byte| acc * 26 + usize::from(byte - b'A' + 1));
    if n_col_1based > N_NCOLS_EXCEL_MAX {
        return Err(FixtureXlsxError::InvalidCellRef(col_name.to_string()));
    }
    cast_col_num(n_col_1based - 1)
}

/// Convert a zero-based column index to its name.
pub fn derive_column_name(col: u16) -> String {
    let mut n_rest = usize::from(col) + 1;
    let mut l_chars = Vec::new();
    while n_rest > 0 {
        let n_rem = (n_rest - 1) % 26;
        l_chars.push(char::from(b'A' + n_rem as u8));
        n_rest = (n_rest - 1) / 26;
    }
    l_chars.iter().rev().collect()
}

/// Cast a row index to the worksheet row type.
pub fn cast_row_num(value: usize) -> FixtureXlsxResult<u32> {
    u32::try_from(value).map_err(|_| FixtureXlsxError::IndexOverflow(format!("row index {value}")))
}

/// Cast a column index to the worksheet column type.
pub fn cast_col_num(value: usize) -> FixtureXlsxResult<u16> {
    u16::try_from(value)
        .map_err(|_| FixtureXlsxError::IndexOverflow(format!("column index {value}")))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Validate that `columns` has no duplicated names.
pub fn validate_unique_columns(columns: &[String]) -> FixtureXlsxResult<()> {
    if columns.len() == columns.iter().collect::<BTreeSet<_>>().len() {
        return Ok(());
    }

    let mut dict_pos: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (n_idx, c_name) in columns.iter().enumerate() {
        dict_pos.entry(c_name).or_default().push(n_idx);
    }

    let c_msg = dict_pos
        .iter()
        .filter(|(_, l_pos)| l_pos.len() > 1)
        .map(|(c_name, l_pos)| format!("{c_name:?} x{} at indices {l_pos:?}", l_pos.len()))
        .collect::<Vec<_>>()
        .join("; ");

    Err(FixtureXlsxError::DuplicateColumns(c_msg))
}

/// Lower-case a header label into an identifier; blanks become `column_<n>`.
pub fn sanitize_header_name(name: Option<&str>, col_idx: usize) -> String {
    match name {
        Some(val) if !val.is_empty() => RE_HEADER_ILLEGAL.replace_all(val, "_").to_lowercase(),
        _ => format!("column_{}", col_idx + 1),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DateConversion

/// Convert a 1900-system serial date to a timestamp (millisecond resolution).
///
/// Serials below 60 fall before Excel's phantom 1900-02-29 and use a
/// one-day-later epoch.
pub fn convert_excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let date_epoch = if serial < 60.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let n_millis = (serial * 86_400_000.0).round() as i64;
    date_epoch
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::milliseconds(n_millis))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region NumberFormats

/// Built-in number format codes by id (ids without a fixed code return `None`).
pub fn derive_builtin_num_format(num_fmt_id: u32) -> Option<&'static str> {
    let code = match num_fmt_id {
        0 => "General",
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        5 => r"($#,##0_);($#,##0)",
        6 => r"($#,##0_);[Red]($#,##0)",
        7 => r"($#,##0.00_);($#,##0.00)",
        8 => r"($#,##0.00_);[Red]($#,##0.00)",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        12 => "# ?/?",
        13 => "# ??/??",
        14 => "m/d/yy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yy h:mm",
        37 => "#,##0 ;(#,##0)",
        38 => "#,##0 ;[Red](#,##0)",
        39 => "#,##0.00;(#,##0.00)",
        40 => "#,##0.00;[Red](#,##0.00)",
        41 => r#"_(* #,##0_);_(* \(#,##0\);_(* "-"_);_(@_)"#,
        42 => r#"_($* #,##0_);_($* \(#,##0\);_($* "-"_);_(@_)"#,
        43 => r#"_(* #,##0.00_);_(* \(#,##0.00\);_(* "-"??_);_(@_)"#,
        44 => r#"_($* #,##0.00_);_($* \(#,##0.00\);_($* "-"??_);_(@_)"#,
        45 => "mm:ss",
        46 => "[h]:mm:ss",
        47 => "mm:ss.0",
        48 => "##0.0E+0",
        49 => "@",
        _ => return None,
    };
    Some(code)
}

/// Drop quoted literals, escaped chars, padding/fill chars and `[...]` blocks.
fn strip_format_literals(code: &str) -> String {
    let mut c_out = String::with_capacity(code.len());
    let mut it_chars = code.chars();
    while let Some(chr) = it_chars.next() {
        match chr {
            '"' => {
                for chr_inner in it_chars.by_ref() {
                    if chr_inner == '"' {
                        break;
                    }
                }
            }
            '\\' | '_' | '*' => {
                it_chars.next();
            }
            '[' => {
                for chr_inner in it_chars.by_ref() {
                    if chr_inner == ']' {
                        break;
                    }
                }
            }
            _ => c_out.push(chr),
        }
    }
    c_out
}

/// Classify a number format code.
pub fn derive_num_format_kind(code: &str) -> EnumNumFormatKind {
    let c_code = code.trim();
    if c_code.is_empty() || c_code.eq_ignore_ascii_case("general") {
        return EnumNumFormatKind::General;
    }
    if c_code.eq_ignore_ascii_case("boolean") {
        return EnumNumFormatKind::Boolean;
    }
    if c_code.contains("_(") && c_code.contains('*') {
        return EnumNumFormatKind::Accounting;
    }

    let c_bare = strip_format_literals(c_code);
    let c_bare_lower = c_bare.to_ascii_lowercase();
    let if_has_placeholder = c_bare.contains(['0', '#', '?']);
    let if_has_date_token = c_bare_lower.contains(['y', 'm', 'd', 'h', 's']);

    if c_code.contains(';') && !if_has_placeholder && !if_has_date_token && !c_bare.contains('@') {
        return EnumNumFormatKind::Boolean;
    }
    if c_bare.contains('%') {
        return EnumNumFormatKind::Percentage;
    }
    if if_has_placeholder && (c_bare_lower.contains("e+") || c_bare_lower.contains("e-")) {
        return EnumNumFormatKind::Scientific;
    }
    if if_has_date_token {
        return EnumNumFormatKind::DateTime;
    }
    if if_has_placeholder {
        return EnumNumFormatKind::Number;
    }
    if c_bare.contains('@') {
        return EnumNumFormatKind::Text;
    }
    EnumNumFormatKind::General
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnKindDeduction

/// Parse text as a number after stripping `,`, `$` and whitespace.
pub fn parse_numeric_text(text: &str) -> Option<f64> {
    let c_clean = RE_NUMERIC_NOISE.replace_all(text, "");
    if c_clean.is_empty() {
        return None;
    }
    c_clean.parse::<f64>().ok().filter(|val| val.is_finite())
}

/// Whether a number should be stored as arbitrary-precision `numeric`.
pub fn check_needs_precision(value: f64) -> bool {
    let n_abs = value.abs();
    if n_abs > 1e15 || (n_abs > 0.0 && n_abs < 1e-6) {
        return true;
    }
    let c_repr = value.to_string();
    c_repr
        .split_once('.')
        .is_some_and(|(_, c_decimals)| c_decimals.len() > 6)
}

/// Deduce a column type; priority is dates, booleans, numbers, then text.
pub fn derive_column_kind(values: &[EnumCellValue]) -> EnumColumnKind {
    let l_values: Vec<&EnumCellValue> = values.iter().filter(|val| !val.is_blank()).collect();
    if l_values.is_empty() {
        return EnumColumnKind::Text;
    }

    if l_values
        .iter()
        .any(|val| matches!(val, EnumCellValue::DateTime(_)))
    {
        return EnumColumnKind::Date;
    }
    if l_values
        .iter()
        .all(|val| matches!(val, EnumCellValue::Boolean(_)))
    {
        return EnumColumnKind::Boolean;
    }

    let l_numbers: Option<Vec<f64>> = l_values
        .iter()
        .map(|val| match val {
            EnumCellValue::Number(n) => Some(*n),
            EnumCellValue::String(s) => parse_numeric_text(s),
            _ => None,
        })
        .collect();
    match l_numbers {
        Some(l_numbers) if l_numbers.iter().any(|n| check_needs_precision(*n)) => {
            EnumColumnKind::Numeric
        }
        Some(_) => EnumColumnKind::DoublePrecision,
        None => EnumColumnKind::Text,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
