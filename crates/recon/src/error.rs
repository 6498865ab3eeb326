use std::fmt;

use crate::layout::Layout;
use crate::model::Side;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty name, absurd skip_rows, etc.).
    ConfigValidation(String),
    /// Table has no non-empty rows or columns after cleanup.
    EmptyTable,
    /// Auto-detection found a non-empty column count outside 4..=6.
    UnsupportedLayout { columns: usize },
    /// A forced layout needs more columns than the table has.
    LayoutMismatch { layout: Layout, columns: usize },
    /// Amount cell present but not numeric (or not finite).
    AmountParse { side: Side, row: usize, value: String },
    /// Non-empty row with no amount cell at all.
    MissingAmount { side: Side, row: usize },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::EmptyTable => write!(f, "table has no usable rows or columns"),
            Self::UnsupportedLayout { columns } => {
                write!(f, "cannot interpret a {columns}-column table (expected 4, 5 or 6 columns)")
            }
            Self::LayoutMismatch { layout, columns } => {
                write!(
                    f,
                    "layout '{layout}' needs {} columns, table has {columns}",
                    layout.columns()
                )
            }
            Self::AmountParse { side, row, value } => {
                write!(f, "{side} side, row {row}: cannot parse amount '{value}'")
            }
            Self::MissingAmount { side, row } => {
                write!(f, "{side} side, row {row}: row has a name but no amount")
            }
        }
    }
}

impl std::error::Error for ReconError {}
