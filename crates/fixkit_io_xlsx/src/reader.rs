//! Read-back of fixture workbooks: cell values plus resolved number formats.
//!
//! Values come from `calamine`; number formats are not exposed there, so
//! `xl/styles.xml` and the worksheet part are scanned directly.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek};
use std::path::Path;

use calamine::{Data, Reader as _, Xlsx, open_workbook};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{FixtureXlsxError, FixtureXlsxResult};
use crate::spec::{EnumCellValue, SpecCellReadback, SpecCellRef, SpecSheetReadback};
use crate::util::{
    cast_col_num, convert_excel_serial_to_datetime, derive_builtin_num_format, parse_cell_ref,
};

/// Read one sheet: first row as header, remaining rows as data cells.
pub fn read_sheet(path_file: &Path, sheet_name: &str) -> FixtureXlsxResult<SpecSheetReadback> {
    let mut workbook = open_xlsx(path_file)?;
    let l_sheet_names = workbook.sheet_names();
    let Some(n_idx_sheet) = l_sheet_names.iter().position(|name| name == sheet_name) else {
        return Err(FixtureXlsxError::SheetNotFound {
            sheet: sheet_name.to_string(),
            available: l_sheet_names.join(", "),
        });
    };

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|source| FixtureXlsxError::Open {
            path: path_file.to_path_buf(),
            source,
        })?;
    let dict_num_format_by_cell = read_cell_num_formats(path_file, n_idx_sheet)?;

    let mut readback = SpecSheetReadback {
        sheet_name: sheet_name.to_string(),
        ..Default::default()
    };
    let Some((n_row_end, n_col_end)) = range.end() else {
        return Ok(readback);
    };

    for n_row in 0..=n_row_end {
        let mut l_cells = Vec::with_capacity(n_col_end as usize + 1);
        for n_col in 0..=n_col_end {
            let cell = SpecCellRef::new(n_row, cast_col_num(n_col as usize)?);
            let value = range
                .get_value((n_row, n_col))
                .map_or(EnumCellValue::None, convert_data_to_cell_value);
            l_cells.push(SpecCellReadback {
                cell,
                value,
                num_format: dict_num_format_by_cell.get(&cell).cloned(),
            });
        }

        if n_row == 0 {
            readback.header = l_cells
                .into_iter()
                .map(|cell| match cell.value {
                    EnumCellValue::String(s) => s,
                    EnumCellValue::None => String::new(),
                    other => other.to_string(),
                })
                .collect();
        } else {
            readback.rows.push(l_cells);
        }
    }

    debug!(
        file = %path_file.display(),
        sheet = sheet_name,
        rows = readback.height(),
        "sheet read back"
    );
    Ok(readback)
}

fn open_xlsx(path_file: &Path) -> FixtureXlsxResult<Xlsx<BufReader<File>>> {
    open_workbook(path_file).map_err(|source| FixtureXlsxError::Open {
        path: path_file.to_path_buf(),
        source,
    })
}

fn convert_data_to_cell_value(data: &Data) -> EnumCellValue {
    match data {
        Data::Empty => EnumCellValue::None,
        Data::String(s) => EnumCellValue::String(s.clone()),
        Data::Float(n) => EnumCellValue::Number(*n),
        Data::Int(n) => EnumCellValue::Number(*n as f64),
        Data::Bool(b) => EnumCellValue::Boolean(*b),
        Data::DateTime(dt) => {
            let n_serial = dt.as_f64();
            convert_excel_serial_to_datetime(n_serial)
                .map_or(EnumCellValue::Number(n_serial), EnumCellValue::DateTime)
        }
        other => EnumCellValue::String(other.to_string()),
    }
}

////////////////////////////////////////////////////////////////////////////////
// #region StyleParts

/// Map each styled cell to its number format code.
///
/// Unstyled cells and `General` are left out. Worksheet parts are assumed to
/// follow workbook order (`sheet1.xml`, `sheet2.xml`, ...), as written by
/// `rust_xlsxwriter`.
fn read_cell_num_formats(
    path_file: &Path,
    n_idx_sheet: usize,
) -> FixtureXlsxResult<BTreeMap<SpecCellRef, String>> {
    let mut archive = ZipArchive::new(File::open(path_file)?)?;

    let l_xf_num_formats = read_package_num_formats(&mut archive)?;

    let c_part_sheet = format!("xl/worksheets/sheet{}.xml", n_idx_sheet + 1);
    let file_sheet = archive.by_name(&c_part_sheet)?;
    let l_cell_styles = read_cell_style_indices(BufReader::new(file_sheet))?;

    Ok(l_cell_styles
        .into_iter()
        .filter_map(|(cell, n_idx_xf)| {
            l_xf_num_formats
                .get(n_idx_xf)
                .cloned()
                .flatten()
                .map(|code| (cell, code))
        })
        .collect())
}

/// `cellXfs` number formats of a package; a package without a styles part has none.
fn read_package_num_formats<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> FixtureXlsxResult<Vec<Option<String>>> {
    match archive.by_name("xl/styles.xml") {
        Ok(file_styles) => read_xf_num_formats(BufReader::new(file_styles)),
        Err(ZipError::FileNotFound) => Ok(vec![]),
        Err(err) => Err(err.into()),
    }
}

/// Number format code per `cellXfs` entry, `None` for `General`.
fn read_xf_num_formats<R: BufRead>(reader: R) -> FixtureXlsxResult<Vec<Option<String>>> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut dict_custom: BTreeMap<u32, String> = BTreeMap::new();
    let mut l_xf_num_fmt_ids: Vec<u32> = Vec::new();
    let mut if_in_cell_xfs = false;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"cellXfs" => {
                if_in_cell_xfs = true;
            }
            Event::End(e) if e.name().as_ref() == b"cellXfs" => {
                if_in_cell_xfs = false;
            }
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"numFmt" => {
                    let n_id = derive_attr_value(&e, b"numFmtId").and_then(|v| v.parse().ok());
                    let c_code = derive_attr_value(&e, b"formatCode");
                    if let (Some(n_id), Some(c_code)) = (n_id, c_code) {
                        dict_custom.insert(n_id, c_code);
                    }
                }
                b"xf" if if_in_cell_xfs => {
                    l_xf_num_fmt_ids.push(
                        derive_attr_value(&e, b"numFmtId")
                            .and_then(|v| v.parse().ok())
                            .unwrap_or(0),
                    );
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(l_xf_num_fmt_ids
        .into_iter()
        .map(|n_id| {
            if n_id == 0 {
                return None;
            }
            dict_custom
                .get(&n_id)
                .cloned()
                .or_else(|| derive_builtin_num_format(n_id).map(ToString::to_string))
        })
        .collect())
}

/// `(cell, xf index)` for every `<c>` carrying an `s` attribute.
fn read_cell_style_indices<R: BufRead>(reader: R) -> FixtureXlsxResult<Vec<(SpecCellRef, usize)>> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut l_cell_styles = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"c" => {
                let n_idx_xf = derive_attr_value(&e, b"s").and_then(|v| v.parse::<usize>().ok());
                if let (Some(c_ref), Some(n_idx_xf)) = (derive_attr_value(&e, b"r"), n_idx_xf) {
                    l_cell_styles.push((parse_cell_ref(&c_ref)?, n_idx_xf));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(l_cell_styles)
}

fn derive_attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|val| val.into_owned()))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
