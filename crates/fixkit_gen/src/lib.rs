//! `fixkit_gen` v1:
//! Spreadsheet test-fixture generator.
//!
//! Module layout:
//! - `conf`     : scenario names, defaults and run options
//! - `scenario` : literal datasets and format annotations
//! - `generate` : per-scenario workbook generation and the full run
//! - `inspect`  : read-back and column type deduction
pub mod conf;
pub mod generate;
pub mod inspect;
pub mod scenario;

pub use conf::{C_DIR_FIXTURES_DEFAULT, C_FILE_EXTENSION, EnumScenario, SpecFixtureOptions};
pub use generate::{
    create_fixture_directory, generate_all, generate_boolean_formats, generate_date_formats,
    generate_number_formats, generate_precision, generate_scenario, generate_special_values,
    generate_string_formats,
};
pub use inspect::{
    SpecColumnInspection, SpecFixtureInspection, inspect_fixture, inspect_fixture_directory,
};
pub use scenario::{SpecScenario, derive_scenario, select_precision_fmt_key};
