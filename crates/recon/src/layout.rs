use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::model::{Cell, Table};

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Recognized column arrangements. Code columns, when present, belong to the
/// left side only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// name1, amount1, name2, amount2
    FourColumn,
    /// code_number, name1, amount1, name2, amount2
    FiveColumn,
    /// code_type, code_number, name1, amount1, name2, amount2
    SixColumn,
}

impl Layout {
    pub fn detect(columns: usize) -> Result<Layout, ReconError> {
        match columns {
            4 => Ok(Layout::FourColumn),
            5 => Ok(Layout::FiveColumn),
            6 => Ok(Layout::SixColumn),
            _ => Err(ReconError::UnsupportedLayout { columns }),
        }
    }

    pub fn columns(self) -> usize {
        match self {
            Layout::FourColumn => 4,
            Layout::FiveColumn => 5,
            Layout::SixColumn => 6,
        }
    }

    /// Number of leading code columns before the left name column.
    fn code_columns(self) -> usize {
        self.columns() - 4
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-column", self.columns())
    }
}

impl std::str::FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "4" | "four" | "four_column" => Ok(Layout::FourColumn),
            "5" | "five" | "five_column" => Ok(Layout::FiveColumn),
            "6" | "six" | "six_column" => Ok(Layout::SixColumn),
            other => Err(format!("unknown layout '{other}' (use 4, 5 or 6)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// One side's share of a table row, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    /// Zero-based row index in the loaded table.
    pub row: usize,
    pub name: Cell,
    pub amount: Cell,
    pub code_type: Option<Cell>,
    pub code_number: Option<Cell>,
}

#[derive(Debug, Clone)]
pub struct SplitTable {
    pub layout: Layout,
    pub left: Vec<RawEntry>,
    pub right: Vec<RawEntry>,
}

/// Splits a loaded table into its left and right sides.
///
/// The first `skip_rows` rows are ignored outright. Columns that are empty
/// top to bottom across the remaining rows are discarded next, then rows
/// that are empty across every surviving column. The layout is detected from
/// the surviving column count unless `forced` overrides it; a forced layout
/// tolerates extra columns (the surplus is ignored) but not missing ones.
///
/// After the split each side independently drops rows whose name and amount
/// are both empty, so the sides may end up with different lengths. Entries
/// keep their row index in the loaded table through every drop.
pub fn split(
    table: &Table,
    forced: Option<Layout>,
    skip_rows: usize,
) -> Result<SplitTable, ReconError> {
    let kept_cols = occupied_columns(table, skip_rows);
    if kept_cols.is_empty() {
        return Err(ReconError::EmptyTable);
    }

    let mut rows: Vec<(usize, Vec<&Cell>)> = Vec::new();
    for i in skip_rows..table.rows.len() {
        let cells: Vec<&Cell> = kept_cols.iter().map(|&c| table.cell(i, c)).collect();
        if cells.iter().any(|c| !c.is_empty()) {
            rows.push((i, cells));
        }
    }
    if rows.is_empty() {
        return Err(ReconError::EmptyTable);
    }

    let layout = match forced {
        Some(layout) => {
            if kept_cols.len() < layout.columns() {
                return Err(ReconError::LayoutMismatch {
                    layout,
                    columns: kept_cols.len(),
                });
            }
            layout
        }
        None => Layout::detect(kept_cols.len())?,
    };

    let codes = layout.code_columns();
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (row, cells) in rows {
        let code_type = (codes == 2).then(|| cells[0].clone());
        let code_number = (codes >= 1).then(|| cells[codes - 1].clone());
        push_side(
            &mut left,
            RawEntry {
                row,
                name: cells[codes].clone(),
                amount: cells[codes + 1].clone(),
                code_type,
                code_number,
            },
        );
        push_side(
            &mut right,
            RawEntry {
                row,
                name: cells[codes + 2].clone(),
                amount: cells[codes + 3].clone(),
                code_type: None,
                code_number: None,
            },
        );
    }

    Ok(SplitTable { layout, left, right })
}

fn push_side(side: &mut Vec<RawEntry>, entry: RawEntry) {
    // Code cells alone don't make a row worth keeping.
    if !entry.name.is_empty() || !entry.amount.is_empty() {
        side.push(entry);
    }
}

/// Indices of columns holding at least one non-empty cell below the skip line.
fn occupied_columns(table: &Table, skip_rows: usize) -> Vec<usize> {
    let width = table
        .rows
        .iter()
        .skip(skip_rows)
        .map(Vec::len)
        .max()
        .unwrap_or(0);
    (0..width)
        .filter(|&c| (skip_rows..table.rows.len()).any(|r| !table.cell(r, c).is_empty()))
        .collect()
}
