//! XLSX constants and named format presets.

use std::collections::BTreeMap;

use crate::spec::SpecCellFormat;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];
/// Sheet name used by every fixture workbook.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet1";

/// Canonical format preset keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnumFmtKey {
    /// Header cell format.
    Header,
    /// Default format for timestamp values in data rows.
    Timestamp,
    /// Two-decimal percentage.
    Percent,
    /// Accounting style with parenthesized negatives.
    Accounting,
    /// Two-decimal scientific notation.
    Scientific,
    /// Six-decimal scientific notation.
    ScientificPrecise,
    /// Fifteen-decimal fixed point.
    DecimalPrecise,
    /// `yyyy-mm-dd`.
    DateIso,
    /// `m/d/yyyy`.
    DateUs,
    /// `dd-mmm-yyyy`.
    DateExcel,
    /// Literal `BOOLEAN` number format.
    Boolean,
    /// `"YES";;NO` rendering.
    BooleanYesNo,
}

impl EnumFmtKey {
    /// All preset keys in declaration order.
    pub const ALL: [EnumFmtKey; 12] = [
        EnumFmtKey::Header,
        EnumFmtKey::Timestamp,
        EnumFmtKey::Percent,
        EnumFmtKey::Accounting,
        EnumFmtKey::Scientific,
        EnumFmtKey::ScientificPrecise,
        EnumFmtKey::DecimalPrecise,
        EnumFmtKey::DateIso,
        EnumFmtKey::DateUs,
        EnumFmtKey::DateExcel,
        EnumFmtKey::Boolean,
        EnumFmtKey::BooleanYesNo,
    ];

    /// Stable snake-case name of the preset.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Timestamp => "timestamp",
            Self::Percent => "percent",
            Self::Accounting => "accounting",
            Self::Scientific => "scientific",
            Self::ScientificPrecise => "scientific_precise",
            Self::DecimalPrecise => "decimal_precise",
            Self::DateIso => "date_iso",
            Self::DateUs => "date_us",
            Self::DateExcel => "date_excel",
            Self::Boolean => "boolean",
            Self::BooleanYesNo => "boolean_yes_no",
        }
    }

    /// Number format code carried by the preset, if any.
    pub fn num_format(self) -> Option<&'static str> {
        match self {
            Self::Header => None,
            Self::Timestamp => Some("yyyy-mm-dd hh:mm:ss"),
            Self::Percent => Some("0.00%"),
            Self::Accounting => Some(r#"_(* #,##0.00_);_(* (#,##0.00);_(* "-"??_);_(@_)"#),
            Self::Scientific => Some("0.00E+00"),
            Self::ScientificPrecise => Some("0.000000E+00"),
            Self::DecimalPrecise => Some("0.000000000000000"),
            Self::DateIso => Some("yyyy-mm-dd"),
            Self::DateUs => Some("m/d/yyyy"),
            Self::DateExcel => Some("dd-mmm-yyyy"),
            Self::Boolean => Some("BOOLEAN"),
            Self::BooleanYesNo => Some(r#""YES";;NO"#),
        }
    }
}

/// Build named format presets used by [`crate::writer::XlsxWriter`].
///
/// Data formats only carry a number format; the header preset mirrors the
/// bold, bordered, centered header that dataframe exporters emit.
pub fn derive_default_xlsx_formats() -> BTreeMap<EnumFmtKey, SpecCellFormat> {
    let cfg_base_fmt_spec = SpecCellFormat::default();

    let mut dict_fmt = BTreeMap::new();
    for fmt_key in EnumFmtKey::ALL {
        let fmt_spec = match fmt_key {
            EnumFmtKey::Header => cfg_base_fmt_spec.with_(SpecCellFormat {
                bold: Some(true),
                border: Some(1),
                align: Some("center".to_string()),
                valign: Some("top".to_string()),
                ..Default::default()
            }),
            _ => cfg_base_fmt_spec.with_(SpecCellFormat {
                num_format: fmt_key.num_format().map(ToString::to_string),
                ..Default::default()
            }),
        };
        dict_fmt.insert(fmt_key, fmt_spec);
    }

    dict_fmt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_formats_cover_every_key() {
        let dict_fmt = derive_default_xlsx_formats();
        assert_eq!(dict_fmt.len(), EnumFmtKey::ALL.len());
        for fmt_key in EnumFmtKey::ALL {
            assert_eq!(
                dict_fmt[&fmt_key].num_format.as_deref(),
                fmt_key.num_format(),
                "preset {}",
                fmt_key.as_str()
            );
        }
    }

    #[test]
    fn test_header_preset_is_bold_and_bordered() {
        let fmt_header = &derive_default_xlsx_formats()[&EnumFmtKey::Header];
        assert_eq!(fmt_header.bold, Some(true));
        assert_eq!(fmt_header.border, Some(1));
        assert_eq!(fmt_header.align.as_deref(), Some("center"));
        assert!(fmt_header.num_format.is_none());
    }
}
