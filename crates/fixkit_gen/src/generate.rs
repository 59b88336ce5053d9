//! Fixture generation: one workbook per scenario.

use std::fs;
use std::path::Path;

use fixkit_io_xlsx::{
    C_SHEET_NAME_DEFAULT, FixtureXlsxError, FixtureXlsxResult, SpecXlsxReport, XlsxWriter,
};
use tracing::{debug, info};

use crate::conf::{EnumScenario, SpecFixtureOptions};
use crate::scenario::derive_scenario;

/// Create the fixture directory if missing. Idempotent.
pub fn create_fixture_directory(path_dir: &Path) -> FixtureXlsxResult<()> {
    fs::create_dir_all(path_dir).map_err(|source| FixtureXlsxError::DirectoryInit {
        path: path_dir.to_path_buf(),
        source,
    })
}

/// Write the workbook for `scenario` into `path_dir`, overwriting any previous file.
pub fn generate_scenario(
    path_dir: &Path,
    scenario: EnumScenario,
) -> FixtureXlsxResult<SpecXlsxReport> {
    create_fixture_directory(path_dir)?;
    let spec = derive_scenario(scenario)?;

    let mut writer = XlsxWriter::new(path_dir.join(scenario.file_name()));
    writer.write_sheet(&spec.dataset, C_SHEET_NAME_DEFAULT, &spec.options)?;
    writer.close()?;

    let report = writer.report().into_iter().next().unwrap_or_default();
    for c_warning in &report.warnings {
        debug!(scenario = scenario.file_stem(), "{c_warning}");
    }
    info!(
        scenario = scenario.file_stem(),
        rows = report.n_rows_data,
        annotated = report.n_cells_annotated,
        "fixture written"
    );
    Ok(report)
}

/// Write `number_formats.xlsx`.
pub fn generate_number_formats(path_dir: &Path) -> FixtureXlsxResult<SpecXlsxReport> {
    generate_scenario(path_dir, EnumScenario::NumberFormats)
}

/// Write `string_formats.xlsx`.
pub fn generate_string_formats(path_dir: &Path) -> FixtureXlsxResult<SpecXlsxReport> {
    generate_scenario(path_dir, EnumScenario::StringFormats)
}

/// Write `date_formats.xlsx`.
pub fn generate_date_formats(path_dir: &Path) -> FixtureXlsxResult<SpecXlsxReport> {
    generate_scenario(path_dir, EnumScenario::DateFormats)
}

/// Write `special_values.xlsx`.
pub fn generate_special_values(path_dir: &Path) -> FixtureXlsxResult<SpecXlsxReport> {
    generate_scenario(path_dir, EnumScenario::SpecialValues)
}

/// Write `precision.xlsx`.
pub fn generate_precision(path_dir: &Path) -> FixtureXlsxResult<SpecXlsxReport> {
    generate_scenario(path_dir, EnumScenario::Precision)
}

/// Write `boolean_formats.xlsx`.
pub fn generate_boolean_formats(path_dir: &Path) -> FixtureXlsxResult<SpecXlsxReport> {
    generate_scenario(path_dir, EnumScenario::BooleanFormats)
}

/// Generate every fixture in run order. Stops at the first failure.
pub fn generate_all(options: &SpecFixtureOptions) -> FixtureXlsxResult<Vec<SpecXlsxReport>> {
    create_fixture_directory(&options.path_dir_out)?;
    EnumScenario::RUN_ORDER
        .iter()
        .map(|scenario| generate_scenario(&options.path_dir_out, *scenario))
        .collect()
}
