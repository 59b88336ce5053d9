//! Fixture names, defaults and run options.

use std::path::PathBuf;

/// Directory the fixtures land in when no override is given.
pub const C_DIR_FIXTURES_DEFAULT: &str = "test_files";
/// Extension of every fixture file.
pub const C_FILE_EXTENSION: &str = "xlsx";

/// One fixture-generation unit producing one workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnumScenario {
    /// Percentage/accounting/scientific number formats.
    NumberFormats,
    /// Whitespace, newlines, quotes and very long strings.
    StringFormats,
    /// Dates, timestamps and a raw serial date.
    DateFormats,
    /// Blank cells and sentinel strings.
    SpecialValues,
    /// Very large, very small and high-precision numbers.
    Precision,
    /// Native and text booleans.
    BooleanFormats,
}

impl EnumScenario {
    /// Order in which the driver generates fixtures.
    pub const RUN_ORDER: [EnumScenario; 6] = [
        EnumScenario::NumberFormats,
        EnumScenario::DateFormats,
        EnumScenario::SpecialValues,
        EnumScenario::Precision,
        EnumScenario::StringFormats,
        EnumScenario::BooleanFormats,
    ];

    /// File name without extension.
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::NumberFormats => "number_formats",
            Self::StringFormats => "string_formats",
            Self::DateFormats => "date_formats",
            Self::SpecialValues => "special_values",
            Self::Precision => "precision",
            Self::BooleanFormats => "boolean_formats",
        }
    }

    /// File name including extension.
    pub fn file_name(self) -> String {
        format!("{}.{C_FILE_EXTENSION}", self.file_stem())
    }

    /// Data rows below the header.
    pub fn n_rows_expected(self) -> usize {
        match self {
            Self::NumberFormats => 6,
            Self::StringFormats => 8,
            Self::DateFormats => 4,
            Self::SpecialValues => 5,
            Self::Precision => 7,
            Self::BooleanFormats => 4,
        }
    }
}

/// Options for a full fixture run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFixtureOptions {
    /// Directory receiving the fixture files.
    pub path_dir_out: PathBuf,
}

impl Default for SpecFixtureOptions {
    fn default() -> Self {
        Self {
            path_dir_out: PathBuf::from(C_DIR_FIXTURES_DEFAULT),
        }
    }
}
