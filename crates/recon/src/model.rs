use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::layout::Layout;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Monetary amount. Total-ordered float so amount equality gating and
/// sort-by-amount are both well defined.
pub type Amount = OrderedFloat<f64>;

/// One cell of a loaded sheet, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Whitespace-only text counts as empty, same as a blank cell.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Text rendering for pass-through fields. Integral floats print without
    /// the trailing `.0` Excel gives them.
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }
}

/// A sheet of cells, row-major. Rows may be ragged; cells past a row's end
/// read as empty.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&Cell::Empty)
    }
}

/// Which column block of the split sheet an entry came from. Left is the
/// first (sender) block and carries the code columns; right is the second
/// (receiver) block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// 1-based side number used in report file and sheet names.
    pub fn number(&self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Right => 2,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// A ledger entry prepared for matching.
#[derive(Debug, Clone)]
pub struct Entry {
    /// 0-based row index in the loaded table, before any cleanup drops.
    pub row: usize,
    pub amount: Amount,
    /// Normalized name tokens; may be empty.
    pub tokens: Vec<String>,
    pub code_type: Option<String>,
    pub code_number: Option<String>,
}

impl Entry {
    /// Output form: tokens joined back into one display string.
    pub fn to_record(&self) -> Record {
        Record {
            row: self.row,
            sender_name: self.tokens.join(" "),
            amount: self.amount,
            code_type: self.code_type.clone(),
            code_number: self.code_number.clone(),
        }
    }
}

/// An entry rendered for output.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub row: usize,
    pub sender_name: String,
    pub amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_number: Option<String>,
}

// ---------------------------------------------------------------------------
// Pass outputs
// ---------------------------------------------------------------------------

/// Which fuzzy stage accepted a potential pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyKind {
    TokenWise,
    WholeString,
}

impl std::fmt::Display for FuzzyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenWise => write!(f, "token_wise"),
            Self::WholeString => write!(f, "whole_string"),
        }
    }
}

/// Match diagnostics accumulated by the passes. Replaces nothing visible in
/// the outputs; surfaced in the summary for tuning and sanity checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    /// Pairs accepted by the exact pass.
    pub strict_pairs: u64,
    /// Individual right tokens that found a ≥80 partner during stage-1
    /// probing, counted across all probes including rejected pairs.
    pub fuzzy_token_hits: u64,
    /// Potential pairs accepted token-wise.
    pub fuzzy_token_pairs: u64,
    /// Potential pairs accepted by the whole-string fallback.
    pub fuzzy_joined_pairs: u64,
}

impl MatchStats {
    pub fn merge(&mut self, other: &MatchStats) {
        self.strict_pairs += other.strict_pairs;
        self.fuzzy_token_hits += other.fuzzy_token_hits;
        self.fuzzy_token_pairs += other.fuzzy_token_pairs;
        self.fuzzy_joined_pairs += other.fuzzy_joined_pairs;
    }
}

/// Exact-pass partitions, each in its side's input order.
#[derive(Debug)]
pub struct ExactPassOutput {
    pub matched_left: Vec<Entry>,
    pub matched_right: Vec<Entry>,
    pub unmatched_left: Vec<Entry>,
    pub unmatched_right: Vec<Entry>,
    pub stats: MatchStats,
}

/// One accepted fuzzy pairing, entries still in matching form.
#[derive(Debug, Clone)]
pub struct FuzzyPair {
    pub left: Entry,
    pub right: Entry,
    pub kind: FuzzyKind,
}

/// Fuzzy-pass output: pairs in acceptance order, leftovers in side order.
#[derive(Debug)]
pub struct FuzzyPassOutput {
    pub pairs: Vec<FuzzyPair>,
    pub unmatched_left: Vec<Entry>,
    pub unmatched_right: Vec<Entry>,
    pub stats: MatchStats,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Output bucket of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Matched,
    Potential,
    Unmatched,
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matched => write!(f, "matched"),
            Self::Potential => write!(f, "potential"),
            Self::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// Row-level reference for one potential pair, with the accepting stage.
#[derive(Debug, Clone, Serialize)]
pub struct PotentialPair {
    pub left_row: usize,
    pub right_row: usize,
    pub kind: FuzzyKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub left_total: usize,
    pub right_total: usize,
    /// Exact pairs; equals both matched side lengths.
    pub matched: usize,
    /// Potential pairs; equals both potential side lengths.
    pub potential: usize,
    pub unmatched_left: usize,
    pub unmatched_right: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub name: String,
    pub layout: Layout,
    pub engine_version: String,
    pub run_at: String,
}

/// Full reconciliation output. Every input entry appears in exactly one
/// bucket for its side. `potential_left[i]` pairs with `potential_right[i]`;
/// `potential_pairs` carries the same pairing by original row index.
#[derive(Debug, Serialize)]
pub struct ReconcileResult {
    pub meta: RunMeta,
    pub summary: Summary,
    pub stats: MatchStats,
    pub matched_left: Vec<Record>,
    pub matched_right: Vec<Record>,
    pub potential_left: Vec<Record>,
    pub potential_right: Vec<Record>,
    pub potential_pairs: Vec<PotentialPair>,
    pub unmatched_left: Vec<Record>,
    pub unmatched_right: Vec<Record>,
}

impl ReconcileResult {
    /// The six output sets in report order, tagged by bucket and side.
    pub fn buckets(&self) -> [(Bucket, Side, &[Record]); 6] {
        [
            (Bucket::Matched, Side::Left, self.matched_left.as_slice()),
            (Bucket::Matched, Side::Right, self.matched_right.as_slice()),
            (Bucket::Potential, Side::Left, self.potential_left.as_slice()),
            (Bucket::Potential, Side::Right, self.potential_right.as_slice()),
            (Bucket::Unmatched, Side::Left, self.unmatched_left.as_slice()),
            (Bucket::Unmatched, Side::Right, self.unmatched_right.as_slice()),
        ]
    }
}
