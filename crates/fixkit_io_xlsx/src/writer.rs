//! XLSX writer kernel that turns small datasets into formatted workbooks.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use chrono::{Datelike, NaiveDateTime, Timelike};
use rust_xlsxwriter::{ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::{debug, info};

use crate::conf::{EnumFmtKey, derive_default_xlsx_formats};
use crate::error::{FixtureXlsxError, FixtureXlsxResult};
use crate::spec::{
    EnumCellValue, SpecCellAnnotation, SpecCellFormat, SpecColumnWidth, SpecDataset, SpecXlsxReport,
};
use crate::util::{cast_row_num, sanitize_sheet_name, validate_unique_columns};

/// Per-sheet call options.
#[derive(Default, Debug, Clone)]
pub struct SpecXlsxSheetWriteOptions {
    /// Column width overrides.
    pub column_widths: Vec<SpecColumnWidth>,
    /// Cells rewritten with a named format after the rows are written.
    pub annotations: Vec<SpecCellAnnotation>,
}

/// Stateful workbook writer.
pub struct XlsxWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    dict_fmt: BTreeMap<EnumFmtKey, SpecCellFormat>,
    l_reports: Vec<SpecXlsxReport>,
    if_closed: bool,
}

impl XlsxWriter {
    /// Create writer bound to output path with the default format presets.
    ///
    /// The workbook is buffered in memory until [`Self::close`] is called.
    pub fn new(path_file_out: PathBuf) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            dict_fmt: derive_default_xlsx_formats(),
            l_reports: Vec::new(),
            if_closed: false,
        }
    }

    /// Return immutable snapshot of per-sheet write reports.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    /// Flush workbook to disk, overwriting any existing file. Idempotent.
    pub fn close(&mut self) -> FixtureXlsxResult<()> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook
            .save(&self.path_file_out)
            .map_err(|source| FixtureXlsxError::Save {
                path: self.path_file_out.clone(),
                source,
            })?;
        self.if_closed = true;
        info!(file = %self.path_file_out.display(), "workbook saved");
        Ok(())
    }

    /// Write header, rows, column widths and annotations into a new sheet.
    pub fn write_sheet(
        &mut self,
        dataset: &SpecDataset,
        sheet_name: &str,
        options: &SpecXlsxSheetWriteOptions,
    ) -> FixtureXlsxResult<()> {
        if self.if_closed {
            return Err(FixtureXlsxError::WriteAfterClose);
        }
        validate_unique_columns(&dataset.header)?;

        let dict_format: BTreeMap<EnumFmtKey, Format> = self
            .dict_fmt
            .iter()
            .map(|(fmt_key, fmt_spec)| (*fmt_key, derive_rust_xlsx_format(fmt_spec)))
            .collect();
        let fmt_header = &dict_format[&EnumFmtKey::Header];
        let fmt_timestamp = &dict_format[&EnumFmtKey::Timestamp];

        let sheet_name_clean = sanitize_sheet_name(sheet_name, "_");
        if self
            .l_reports
            .iter()
            .any(|report| report.sheet_name == sheet_name_clean)
        {
            return Err(FixtureXlsxError::DuplicateSheet(sheet_name_clean));
        }
        let mut report = SpecXlsxReport {
            file_out: self.path_file_out.clone(),
            sheet_name: sheet_name_clean.clone(),
            n_rows_data: dataset.height(),
            ..Default::default()
        };

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&sheet_name_clean)?;

        for (n_idx_col, c_label) in (0u16..).zip(dataset.header.iter()) {
            write_cell_with_format(
                worksheet,
                0,
                n_idx_col,
                &EnumCellValue::String(c_label.clone()),
                Some(fmt_header),
                fmt_timestamp,
            )?;
        }

        for (n_idx_row, row) in dataset.rows.iter().enumerate() {
            let n_row = cast_row_num(n_idx_row + 1)?;
            write_cell_with_format(
                worksheet,
                n_row,
                0,
                &EnumCellValue::Number(row.id as f64),
                None,
                fmt_timestamp,
            )?;
            write_cell_with_format(worksheet, n_row, 1, &row.value, None, fmt_timestamp)?;
        }
        debug!(
            sheet = %sheet_name_clean,
            rows = dataset.height(),
            "dataset rows written"
        );

        for col_width in &options.column_widths {
            worksheet.set_column_width(col_width.col, col_width.width)?;
        }

        let mut set_cells_annotated = BTreeSet::new();
        for annotation in &options.annotations {
            match dataset.value_at(annotation.cell) {
                Some(value) if value != annotation.value => report.warn(format!(
                    "{} replaced {} value {value} with {} {}",
                    annotation.cell,
                    value.kind_str(),
                    annotation.value.kind_str(),
                    annotation.value
                )),
                Some(_) => {}
                None => report.warn(format!("{} lies outside the dataset", annotation.cell)),
            }

            write_cell_with_format(
                worksheet,
                annotation.cell.row,
                annotation.cell.col,
                &annotation.value,
                Some(&dict_format[&annotation.fmt_key]),
                fmt_timestamp,
            )?;
            set_cells_annotated.insert(annotation.cell);
            debug!(
                cell = %annotation.cell,
                fmt = annotation.fmt_key.as_str(),
                "annotation applied"
            );
        }
        report.n_cells_annotated = set_cells_annotated.len();

        self.l_reports.push(report);
        Ok(())
    }
}

/// Write one value; unformatted blanks are skipped and timestamps fall back
/// to `fmt_timestamp` so they never render as bare serials.
fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &EnumCellValue,
    format: Option<&Format>,
    fmt_timestamp: &Format,
) -> FixtureXlsxResult<()> {
    match (value, format) {
        (EnumCellValue::None, Some(fmt)) => {
            worksheet.write_blank(row, col, fmt)?;
        }
        (EnumCellValue::None, None) => {}
        (EnumCellValue::String(val), Some(fmt)) => {
            worksheet.write_string_with_format(row, col, val, fmt)?;
        }
        (EnumCellValue::String(val), None) => {
            worksheet.write_string(row, col, val)?;
        }
        (EnumCellValue::Number(val), Some(fmt)) => {
            worksheet.write_number_with_format(row, col, *val, fmt)?;
        }
        (EnumCellValue::Number(val), None) => {
            worksheet.write_number(row, col, *val)?;
        }
        (EnumCellValue::Boolean(val), Some(fmt)) => {
            worksheet.write_boolean_with_format(row, col, *val, fmt)?;
        }
        (EnumCellValue::Boolean(val), None) => {
            worksheet.write_boolean(row, col, *val)?;
        }
        (EnumCellValue::DateTime(val), fmt) => {
            let excel_dt = derive_excel_datetime(val)?;
            worksheet.write_datetime_with_format(
                row,
                col,
                &excel_dt,
                fmt.unwrap_or(fmt_timestamp),
            )?;
        }
    }
    Ok(())
}

fn derive_excel_datetime(dt: &NaiveDateTime) -> FixtureXlsxResult<ExcelDateTime> {
    let n_year = u16::try_from(dt.year())
        .map_err(|_| FixtureXlsxError::IndexOverflow(format!("year {}", dt.year())))?;
    let n_seconds = f64::from(dt.second()) + f64::from(dt.nanosecond()) / 1e9;
    let excel_dt = ExcelDateTime::from_ymd(n_year, dt.month() as u8, dt.day() as u8)?.and_hms(
        dt.hour() as u16,
        dt.minute() as u8,
        n_seconds,
    )?;
    Ok(excel_dt)
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn derive_small_dataset() -> SpecDataset {
        SpecDataset::from_values(
            "value",
            vec![
                EnumCellValue::Number(0.5),
                EnumCellValue::text("TRUE"),
                EnumCellValue::None,
            ],
        )
    }

    #[test]
    fn test_write_sheet_records_report_and_saves() {
        let tmp = TempDir::new().expect("tempdir");
        let path_file_out = tmp.path().join("out.xlsx");

        let mut writer = XlsxWriter::new(path_file_out.clone());
        let value_true = EnumCellValue::Boolean(true);
        let options = SpecXlsxSheetWriteOptions {
            column_widths: vec![SpecColumnWidth::at("B", 15.0).expect("width")],
            annotations: vec![
                SpecCellAnnotation::at("B2", EnumCellValue::Number(0.5), EnumFmtKey::Percent)
                    .expect("annotation"),
                SpecCellAnnotation::at("B3", value_true, EnumFmtKey::BooleanYesNo)
                    .expect("annotation"),
            ],
        };
        writer
            .write_sheet(&derive_small_dataset(), "Sheet1", &options)
            .expect("write sheet");
        writer.close().expect("close");
        writer.close().expect("close is idempotent");

        assert!(path_file_out.is_file());
        let l_reports = writer.report();
        assert_eq!(l_reports.len(), 1);
        assert_eq!(l_reports[0].sheet_name, "Sheet1");
        assert_eq!(l_reports[0].n_rows_data, 3);
        assert_eq!(l_reports[0].n_cells_annotated, 2);
        assert_eq!(
            l_reports[0].warnings,
            vec!["B3 replaced text value \"TRUE\" with boolean TRUE".to_string()]
        );
    }

    #[test]
    fn test_write_after_close_is_rejected() {
        let tmp = TempDir::new().expect("tempdir");
        let mut writer = XlsxWriter::new(tmp.path().join("closed.xlsx"));
        writer
            .write_sheet(
                &derive_small_dataset(),
                "Sheet1",
                &SpecXlsxSheetWriteOptions::default(),
            )
            .expect("write sheet");
        writer.close().expect("close");

        let err = writer
            .write_sheet(
                &derive_small_dataset(),
                "Sheet1",
                &SpecXlsxSheetWriteOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, FixtureXlsxError::WriteAfterClose));
    }

    #[test]
    fn test_repeated_sheet_name_is_rejected() {
        let tmp = TempDir::new().expect("tempdir");
        let mut writer = XlsxWriter::new(tmp.path().join("multi.xlsx"));
        let options = SpecXlsxSheetWriteOptions::default();
        writer
            .write_sheet(&derive_small_dataset(), "Data", &options)
            .expect("write sheet");
        writer
            .write_sheet(&derive_small_dataset(), "Report", &options)
            .expect("write second sheet");

        let err = writer
            .write_sheet(&derive_small_dataset(), "Data", &options)
            .unwrap_err();
        match err {
            FixtureXlsxError::DuplicateSheet(name) => assert_eq!(name, "Data"),
            other => panic!("unexpected error: {other}"),
        }
        let l_names: Vec<String> = writer.report().into_iter().map(|r| r.sheet_name).collect();
        assert_eq!(l_names, vec!["Data".to_string(), "Report".to_string()]);
    }

    #[test]
    fn test_annotation_outside_dataset_warns() {
        let tmp = TempDir::new().expect("tempdir");
        let mut writer = XlsxWriter::new(tmp.path().join("outside.xlsx"));
        let options = SpecXlsxSheetWriteOptions {
            annotations: vec![
                SpecCellAnnotation::at("D9", EnumCellValue::Number(1.0), EnumFmtKey::Scientific)
                    .expect("annotation"),
            ],
            ..Default::default()
        };
        writer
            .write_sheet(&derive_small_dataset(), "Sheet1", &options)
            .expect("write sheet");
        assert_eq!(
            writer.report()[0].warnings,
            vec!["D9 lies outside the dataset".to_string()]
        );
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let tmp = TempDir::new().expect("tempdir");
        let mut writer = XlsxWriter::new(tmp.path().join("missing").join("out.xlsx"));
        writer
            .write_sheet(
                &derive_small_dataset(),
                "Sheet1",
                &SpecXlsxSheetWriteOptions::default(),
            )
            .expect("write sheet");
        assert!(matches!(writer.close(), Err(FixtureXlsxError::Save { .. })));
    }

    #[test]
    fn test_excel_datetime_conversion_accepts_midnight() {
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .expect("date")
            .and_hms_opt(0, 0, 0)
            .expect("time");
        assert!(derive_excel_datetime(&dt).is_ok());
    }
}
