//! Read fixtures back and deduce per-column types.

use std::fmt;
use std::path::Path;

use fixkit_io_xlsx::{
    C_SHEET_NAME_DEFAULT, EnumColumnKind, FixtureXlsxResult, SpecSheetReadback, cast_col_num,
    derive_column_kind, read_sheet, sanitize_header_name,
};
use tracing::debug;

use crate::conf::EnumScenario;

/// Deduced column: sanitized header plus type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecColumnInspection {
    /// Lowercased header with non-word characters replaced.
    pub name: String,
    /// Deduced type.
    pub kind: EnumColumnKind,
}

/// Read-back summary of one fixture file.
#[derive(Debug, Clone)]
pub struct SpecFixtureInspection {
    /// Fixture the file belongs to.
    pub scenario: EnumScenario,
    /// Raw read-back.
    pub sheet: SpecSheetReadback,
    /// Column types in sheet order.
    pub columns: Vec<SpecColumnInspection>,
}

impl SpecFixtureInspection {
    /// Whether the data row count matches the fixture definition.
    pub fn check_row_count(&self) -> bool {
        self.sheet.height() == self.scenario.n_rows_expected()
    }
}

impl fmt::Display for SpecFixtureInspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[INSPECT] {} rows={}/{}",
            self.scenario.file_name(),
            self.sheet.height(),
            self.scenario.n_rows_expected()
        )?;
        for column in &self.columns {
            write!(f, " {}:{}", column.name, column.kind.as_str())?;
        }
        Ok(())
    }
}

/// Inspect the fixture of `scenario` inside `path_dir`.
pub fn inspect_fixture(
    path_dir: &Path,
    scenario: EnumScenario,
) -> FixtureXlsxResult<SpecFixtureInspection> {
    let path_file = path_dir.join(scenario.file_name());
    let sheet = read_sheet(&path_file, C_SHEET_NAME_DEFAULT)?;

    let columns = sheet
        .header
        .iter()
        .enumerate()
        .map(|(n_idx_col, c_label)| -> FixtureXlsxResult<SpecColumnInspection> {
            let c_label = Some(c_label.as_str()).filter(|val| !val.is_empty());
            let l_values = sheet.column_values(cast_col_num(n_idx_col)?);
            Ok(SpecColumnInspection {
                name: sanitize_header_name(c_label, n_idx_col),
                kind: derive_column_kind(&l_values),
            })
        })
        .collect::<FixtureXlsxResult<Vec<_>>>()?;

    for cell in sheet.rows.iter().flatten() {
        debug!(
            file = scenario.file_stem(),
            cell = %cell.cell,
            kind = cell.value.kind_str(),
            num_format = cell.num_format.as_deref().unwrap_or("General"),
            "{}",
            cell.value
        );
    }

    Ok(SpecFixtureInspection {
        scenario,
        sheet,
        columns,
    })
}

/// Inspect every fixture in run order.
pub fn inspect_fixture_directory(
    path_dir: &Path,
) -> FixtureXlsxResult<Vec<SpecFixtureInspection>> {
    EnumScenario::RUN_ORDER
        .iter()
        .map(|scenario| inspect_fixture(path_dir, *scenario))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use fixkit_io_xlsx::{EnumCellValue, EnumFmtKey, EnumNumFormatKind, SpecCellRef};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::conf::SpecFixtureOptions;
    use crate::generate::generate_all;

    fn derive_generated_dir() -> TempDir {
        let tmp = TempDir::new().expect("tempdir");
        let options = SpecFixtureOptions {
            path_dir_out: tmp.path().to_path_buf(),
        };
        generate_all(&options).expect("generate");
        tmp
    }

    fn cell(c_ref: &str) -> SpecCellRef {
        c_ref.parse().expect("cell ref")
    }

    #[test]
    fn test_row_counts_and_headers() {
        let tmp = derive_generated_dir();
        for inspection in inspect_fixture_directory(tmp.path()).expect("inspect") {
            assert!(inspection.check_row_count(), "{inspection}");
            let c_value_header = if inspection.scenario == EnumScenario::DateFormats {
                "date"
            } else {
                "value"
            };
            assert_eq!(
                inspection.sheet.header,
                vec!["id".to_string(), c_value_header.to_string()]
            );
            let l_ids: Vec<EnumCellValue> = inspection.sheet.column_values(0);
            let l_expected: Vec<EnumCellValue> = (1..=inspection.scenario.n_rows_expected())
                .map(|n| EnumCellValue::Number(n as f64))
                .collect();
            assert_eq!(l_ids, l_expected);
        }
    }

    #[test]
    fn test_number_formats_readback() {
        let tmp = derive_generated_dir();
        let sheet = inspect_fixture(tmp.path(), EnumScenario::NumberFormats)
            .expect("inspect")
            .sheet;

        let b5 = sheet.cell(cell("B5")).expect("B5");
        assert_eq!(b5.value, EnumCellValue::Number(0.1234));
        assert_eq!(b5.num_format_kind(), EnumNumFormatKind::Percentage);

        let b6 = sheet.cell(cell("B6")).expect("B6");
        assert_eq!(b6.value, EnumCellValue::Number(-1234.56));
        assert_eq!(
            b6.num_format.as_deref(),
            EnumFmtKey::Accounting.num_format()
        );

        let b7 = sheet.cell(cell("B7")).expect("B7");
        assert_eq!(b7.value, EnumCellValue::Number(-1230.0));
        assert_eq!(b7.num_format_kind(), EnumNumFormatKind::Scientific);

        let b3 = sheet.cell(cell("B3")).expect("B3");
        assert_eq!(b3.value, EnumCellValue::text("1,234.56"));
        assert_eq!(b3.num_format, None);
    }

    #[test]
    fn test_date_formats_readback() {
        let tmp = derive_generated_dir();
        let sheet = inspect_fixture(tmp.path(), EnumScenario::DateFormats)
            .expect("inspect")
            .sheet;
        let dt_new_year = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("date");

        let l_expected = [
            ("B2", EnumFmtKey::DateIso),
            ("B3", EnumFmtKey::DateUs),
            ("B4", EnumFmtKey::DateExcel),
            ("B5", EnumFmtKey::DateExcel),
        ];
        for (c_ref, fmt_key) in l_expected {
            let readback = sheet.cell(cell(c_ref)).expect("cell");
            let value_expected = EnumCellValue::DateTime(dt_new_year);
            assert_eq!(readback.value, value_expected, "{c_ref}");
            assert_eq!(readback.num_format.as_deref(), fmt_key.num_format());
        }
    }

    #[test]
    fn test_special_values_readback() {
        let tmp = derive_generated_dir();
        let sheet = inspect_fixture(tmp.path(), EnumScenario::SpecialValues)
            .expect("inspect")
            .sheet;
        let l_values = sheet.column_values(1);
        assert!(l_values[0].is_blank());
        assert!(l_values[1].is_blank());
        assert_eq!(
            l_values[2..].to_vec(),
            vec![
                EnumCellValue::text("#N/A"),
                EnumCellValue::text("#DIV/0!"),
                EnumCellValue::text("-"),
            ]
        );
    }

    #[test]
    #[allow(clippy::excessive_precision)]
    fn test_precision_readback() {
        let tmp = derive_generated_dir();
        let sheet = inspect_fixture(tmp.path(), EnumScenario::Precision)
            .expect("inspect")
            .sheet;
        let l_expected = [
            1.234567890123456,
            12345678901234567890.0,
            -0.00000000123456,
            9.99999e20,
            -1.23456e-10,
            123456789.123456789,
            1234567890123456.789,
        ];
        for (n_idx_row, n_expected) in l_expected.iter().enumerate() {
            let readback = &sheet.rows[n_idx_row][1];
            assert_eq!(readback.value, EnumCellValue::Number(*n_expected));
            let fmt_expected = if matches!(n_idx_row, 3 | 4) {
                EnumFmtKey::ScientificPrecise
            } else {
                EnumFmtKey::DecimalPrecise
            };
            assert_eq!(
                readback.num_format.as_deref(),
                fmt_expected.num_format(),
                "{}",
                readback.cell
            );
        }
    }

    #[test]
    fn test_string_formats_readback() {
        let tmp = derive_generated_dir();
        let sheet = inspect_fixture(tmp.path(), EnumScenario::StringFormats)
            .expect("inspect")
            .sheet;
        let l_values = sheet.column_values(1);
        assert_eq!(l_values[1], EnumCellValue::text("Text with spaces   "));
        assert_eq!(l_values[2], EnumCellValue::text("   Text with spaces"));
        assert_eq!(l_values[3], EnumCellValue::text("Text with\nnewline"));
        assert_eq!(l_values[4], EnumCellValue::text("Text with \"quotes\""));
        let c_long = "Super long text ".repeat(100);
        assert_eq!(l_values[7], EnumCellValue::text(c_long));
    }

    #[test]
    fn test_boolean_formats_readback() {
        let tmp = derive_generated_dir();
        let sheet = inspect_fixture(tmp.path(), EnumScenario::BooleanFormats)
            .expect("inspect")
            .sheet;
        assert_eq!(
            sheet.column_values(1),
            vec![
                EnumCellValue::Boolean(true),
                EnumCellValue::Boolean(false),
                EnumCellValue::Boolean(true),
                EnumCellValue::Boolean(false),
            ]
        );
        assert_eq!(
            sheet.cell(cell("B2")).expect("B2").num_format.as_deref(),
            Some("BOOLEAN")
        );
        assert_eq!(
            sheet.cell(cell("B5")).expect("B5").num_format.as_deref(),
            EnumFmtKey::BooleanYesNo.num_format()
        );
    }

    #[test]
    fn test_deduced_column_kinds() {
        let tmp = derive_generated_dir();
        let l_kinds: Vec<(EnumScenario, EnumColumnKind)> = inspect_fixture_directory(tmp.path())
            .expect("inspect")
            .into_iter()
            .map(|inspection| (inspection.scenario, inspection.columns[1].kind))
            .collect();
        assert_eq!(
            l_kinds,
            vec![
                (EnumScenario::NumberFormats, EnumColumnKind::DoublePrecision),
                (EnumScenario::DateFormats, EnumColumnKind::Date),
                (EnumScenario::SpecialValues, EnumColumnKind::Text),
                (EnumScenario::Precision, EnumColumnKind::Numeric),
                (EnumScenario::StringFormats, EnumColumnKind::Text),
                (EnumScenario::BooleanFormats, EnumColumnKind::Boolean),
            ]
        );
    }

    #[test]
    fn test_summary_line() {
        let tmp = derive_generated_dir();
        let inspection =
            inspect_fixture(tmp.path(), EnumScenario::BooleanFormats).expect("inspect");
        assert_eq!(
            inspection.to_string(),
            "[INSPECT] boolean_formats.xlsx rows=4/4 id:double precision value:boolean"
        );
    }

    #[test]
    fn test_columns_follow_header_order() {
        let tmp = derive_generated_dir();
        let inspection = inspect_fixture(tmp.path(), EnumScenario::DateFormats).expect("inspect");
        let l_names: Vec<&str> = inspection
            .columns
            .iter()
            .map(|column| column.name.as_str())
            .collect();
        assert_eq!(l_names, vec!["id", "date"]);
        assert_eq!(inspection.columns[0].kind, EnumColumnKind::DoublePrecision);
    }

    #[test]
    fn test_missing_fixture_fails() {
        let tmp = TempDir::new().expect("tempdir");
        assert!(inspect_fixture(tmp.path(), EnumScenario::Precision).is_err());
    }
}
