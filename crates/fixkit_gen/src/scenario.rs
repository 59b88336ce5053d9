//! Literal datasets and format annotations for each fixture.

use chrono::{NaiveDate, NaiveDateTime};
use fixkit_io_xlsx::{
    EnumCellValue, EnumFmtKey, FixtureXlsxError, FixtureXlsxResult, SpecCellAnnotation,
    SpecColumnWidth, SpecDataset, SpecXlsxSheetWriteOptions,
};

use crate::conf::EnumScenario;

/// Data-row indices of the precision fixture that get scientific notation.
pub const TUP_PRECISION_ROWS_SCIENTIFIC: [usize; 2] = [3, 4];

/// Dataset plus sheet options for one fixture.
#[derive(Debug, Clone)]
pub struct SpecScenario {
    /// Which fixture this is.
    pub scenario: EnumScenario,
    /// Rows written below the header.
    pub dataset: SpecDataset,
    /// Column widths and format annotations.
    pub options: SpecXlsxSheetWriteOptions,
}

/// Build the dataset and options for `scenario`.
pub fn derive_scenario(scenario: EnumScenario) -> FixtureXlsxResult<SpecScenario> {
    match scenario {
        EnumScenario::NumberFormats => derive_number_formats_scenario(),
        EnumScenario::StringFormats => derive_string_formats_scenario(),
        EnumScenario::DateFormats => derive_date_formats_scenario(),
        EnumScenario::SpecialValues => Ok(derive_special_values_scenario()),
        EnumScenario::Precision => derive_precision_scenario(),
        EnumScenario::BooleanFormats => derive_boolean_formats_scenario(),
    }
}

/// Plain, text-with-separator, percent, accounting and scientific numbers.
pub fn derive_number_formats_scenario() -> FixtureXlsxResult<SpecScenario> {
    let dataset = SpecDataset::from_values(
        "value",
        vec![
            EnumCellValue::Number(1234.56),
            EnumCellValue::text("1,234.56"),
            EnumCellValue::Number(1234.5600),
            EnumCellValue::Number(0.1234),
            EnumCellValue::Number(-1234.56),
            EnumCellValue::Number(-1230.0),
        ],
    );
    let options = SpecXlsxSheetWriteOptions {
        column_widths: vec![SpecColumnWidth::at("B", 15.0)?],
        annotations: vec![
            SpecCellAnnotation::at("B5", EnumCellValue::Number(0.1234), EnumFmtKey::Percent)?,
            SpecCellAnnotation::at(
                "B6",
                EnumCellValue::Number(-1234.56),
                EnumFmtKey::Accounting,
            )?,
            SpecCellAnnotation::at("B7", EnumCellValue::Number(-1230.0), EnumFmtKey::Scientific)?,
        ],
    };
    Ok(SpecScenario {
        scenario: EnumScenario::NumberFormats,
        dataset,
        options,
    })
}

/// Whitespace, newline, quotes, special characters and long text.
pub fn derive_string_formats_scenario() -> FixtureXlsxResult<SpecScenario> {
    let dataset = SpecDataset::from_values(
        "value",
        vec![
            EnumCellValue::text("Simple text"),
            EnumCellValue::text("Text with spaces   "),
            EnumCellValue::text("   Text with spaces"),
            EnumCellValue::text("Text with\nnewline"),
            EnumCellValue::text("Text with \"quotes\""),
            EnumCellValue::text("Text with special chars: @#$%"),
            EnumCellValue::text("Very long text ".repeat(10)),
            EnumCellValue::text("Super long text ".repeat(100)),
        ],
    );
    Ok(SpecScenario {
        scenario: EnumScenario::StringFormats,
        dataset,
        options: SpecXlsxSheetWriteOptions {
            column_widths: vec![SpecColumnWidth::at("B", 50.0)?],
            annotations: vec![],
        },
    })
}

/// Midnight of a calendar day.
fn derive_midnight(n_year: i32, n_month: u32, n_day: u32) -> FixtureXlsxResult<NaiveDateTime> {
    NaiveDate::from_ymd_opt(n_year, n_month, n_day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            FixtureXlsxError::InvalidDate(format!("{n_year:04}-{n_month:02}-{n_day:02}"))
        })
}

/// The same date under ISO, US and Excel formats, plus a raw serial date.
pub fn derive_date_formats_scenario() -> FixtureXlsxResult<SpecScenario> {
    let dt_new_year = derive_midnight(2024, 1, 1)?;

    let dataset = SpecDataset::from_values(
        "date",
        vec![
            EnumCellValue::DateTime(dt_new_year),
            EnumCellValue::DateTime(dt_new_year),
            EnumCellValue::DateTime(dt_new_year),
            EnumCellValue::Number(45292.0),
        ],
    );
    let options = SpecXlsxSheetWriteOptions {
        column_widths: vec![SpecColumnWidth::at("B", 25.0)?],
        annotations: vec![
            SpecCellAnnotation::at(
                "B2",
                EnumCellValue::DateTime(dt_new_year),
                EnumFmtKey::DateIso,
            )?,
            SpecCellAnnotation::at(
                "B3",
                EnumCellValue::DateTime(dt_new_year),
                EnumFmtKey::DateUs,
            )?,
            SpecCellAnnotation::at(
                "B4",
                EnumCellValue::DateTime(dt_new_year),
                EnumFmtKey::DateExcel,
            )?,
            SpecCellAnnotation::at("B5", EnumCellValue::Number(45292.0), EnumFmtKey::DateExcel)?,
        ],
    };
    Ok(SpecScenario {
        scenario: EnumScenario::DateFormats,
        dataset,
        options,
    })
}

/// Null, empty string and common error/placeholder sentinels.
pub fn derive_special_values_scenario() -> SpecScenario {
    SpecScenario {
        scenario: EnumScenario::SpecialValues,
        dataset: SpecDataset::from_values(
            "value",
            vec![
                EnumCellValue::None,
                EnumCellValue::text(""),
                EnumCellValue::text("#N/A"),
                EnumCellValue::text("#DIV/0!"),
                EnumCellValue::text("-"),
            ],
        ),
        options: SpecXlsxSheetWriteOptions::default(),
    }
}

/// Format used for the precision fixture's data row `n_idx_row`.
pub fn select_precision_fmt_key(n_idx_row: usize) -> EnumFmtKey {
    if TUP_PRECISION_ROWS_SCIENTIFIC.contains(&n_idx_row) {
        EnumFmtKey::ScientificPrecise
    } else {
        EnumFmtKey::DecimalPrecise
    }
}

/// Magnitude and precision edge cases; every value cell is formatted.
#[allow(clippy::excessive_precision)]
pub fn derive_precision_scenario() -> FixtureXlsxResult<SpecScenario> {
    let l_values = vec![
        1.234567890123456,
        12345678901234567890.0,
        -0.00000000123456,
        9.99999e20,
        -1.23456e-10,
        123456789.123456789,
        1234567890123456.789,
    ];

    let mut annotations = Vec::with_capacity(l_values.len());
    for (n_idx_row, n_value) in l_values.iter().enumerate() {
        annotations.push(SpecCellAnnotation::at(
            &format!("B{}", n_idx_row + 2),
            EnumCellValue::Number(*n_value),
            select_precision_fmt_key(n_idx_row),
        )?);
    }

    Ok(SpecScenario {
        scenario: EnumScenario::Precision,
        dataset: SpecDataset::from_values(
            "value",
            l_values.into_iter().map(EnumCellValue::Number).collect(),
        ),
        options: SpecXlsxSheetWriteOptions {
            column_widths: vec![SpecColumnWidth::at("B", 20.0)?],
            annotations,
        },
    })
}

/// Native booleans and their text spellings.
///
/// The yes/no annotations write native booleans over the text rows.
pub fn derive_boolean_formats_scenario() -> FixtureXlsxResult<SpecScenario> {
    let dataset = SpecDataset::from_values(
        "value",
        vec![
            EnumCellValue::Boolean(true),
            EnumCellValue::Boolean(false),
            EnumCellValue::text("TRUE"),
            EnumCellValue::text("FALSE"),
        ],
    );
    let options = SpecXlsxSheetWriteOptions {
        column_widths: vec![SpecColumnWidth::at("B", 15.0)?],
        annotations: vec![
            SpecCellAnnotation::at("B2", EnumCellValue::Boolean(true), EnumFmtKey::Boolean)?,
            SpecCellAnnotation::at("B3", EnumCellValue::Boolean(false), EnumFmtKey::Boolean)?,
            SpecCellAnnotation::at("B4", EnumCellValue::Boolean(true), EnumFmtKey::BooleanYesNo)?,
            SpecCellAnnotation::at(
                "B5",
                EnumCellValue::Boolean(false),
                EnumFmtKey::BooleanYesNo,
            )?,
        ],
    };
    Ok(SpecScenario {
        scenario: EnumScenario::BooleanFormats,
        dataset,
        options,
    })
}

#[cfg(test)]
mod tests {
    use fixkit_io_xlsx::SpecCellRef;

    use super::*;

    #[test]
    fn test_every_scenario_matches_expected_height() {
        for scenario in EnumScenario::RUN_ORDER {
            let spec = derive_scenario(scenario).expect("scenario");
            assert_eq!(spec.scenario, scenario);
            assert_eq!(
                spec.dataset.height(),
                scenario.n_rows_expected(),
                "{}",
                scenario.file_stem()
            );
        }
    }

    #[test]
    fn test_value_header_names() {
        let date = derive_scenario(EnumScenario::DateFormats).expect("scenario");
        assert_eq!(date.dataset.header, ["id".to_string(), "date".to_string()]);
        let number = derive_scenario(EnumScenario::NumberFormats).expect("scenario");
        assert_eq!(
            number.dataset.header,
            ["id".to_string(), "value".to_string()]
        );
    }

    #[test]
    fn test_impossible_day_is_an_invalid_date() {
        let err = derive_midnight(2024, 2, 30).expect_err("no such day");
        assert!(matches!(err, FixtureXlsxError::InvalidDate(_)));
        assert_eq!(err.to_string(), "Invalid date: 2024-02-30");
        assert!(derive_midnight(2024, 2, 29).is_ok());
    }

    #[test]
    fn test_precision_row_mapping_is_literal() {
        let l_keys: Vec<EnumFmtKey> = (0..7).map(select_precision_fmt_key).collect();
        assert_eq!(
            l_keys,
            vec![
                EnumFmtKey::DecimalPrecise,
                EnumFmtKey::DecimalPrecise,
                EnumFmtKey::DecimalPrecise,
                EnumFmtKey::ScientificPrecise,
                EnumFmtKey::ScientificPrecise,
                EnumFmtKey::DecimalPrecise,
                EnumFmtKey::DecimalPrecise,
            ]
        );

        let spec = derive_precision_scenario().expect("scenario");
        let l_cells: Vec<String> = spec
            .options
            .annotations
            .iter()
            .filter(|ann| ann.fmt_key == EnumFmtKey::ScientificPrecise)
            .map(|ann| ann.cell.to_string())
            .collect();
        assert_eq!(l_cells, vec!["B5".to_string(), "B6".to_string()]);
    }

    #[test]
    fn test_number_annotations_match_dataset_values() {
        let spec = derive_number_formats_scenario().expect("scenario");
        for annotation in &spec.options.annotations {
            assert_eq!(
                spec.dataset.value_at(annotation.cell),
                Some(annotation.value.clone()),
                "{}",
                annotation.cell
            );
        }
        assert_eq!(spec.options.annotations[0].cell, SpecCellRef::new(4, 1));
    }

    #[test]
    fn test_string_literals_keep_edge_cases() {
        let spec = derive_string_formats_scenario().expect("scenario");
        let l_values: Vec<&EnumCellValue> =
            spec.dataset.rows.iter().map(|row| &row.value).collect();
        assert_eq!(*l_values[1], EnumCellValue::text("Text with spaces   "));
        assert_eq!(*l_values[3], EnumCellValue::text("Text with\nnewline"));
        match l_values[7] {
            EnumCellValue::String(s) => assert_eq!(s.len(), 1600),
            other => panic!("unexpected {other:?}"),
        }
    }
}
