use crate::config::RunConfig;
use crate::error::ReconError;
use crate::layout::{self, Layout, RawEntry};
use crate::matcher::{exact_pass, fuzzy_pass};
use crate::model::{
    Amount, Cell, Entry, PotentialPair, ReconcileResult, Record, RunMeta, Side, Summary, Table,
};
use crate::normalize::NameNormalizer;

/// Run a full reconciliation over a loaded table: split into sides, prepare
/// entries, exact pass, fuzzy pass over the remainder, assemble the result.
pub fn reconcile(table: &Table, config: &RunConfig) -> Result<ReconcileResult, ReconError> {
    let split = layout::split(table, config.input.layout, config.input.skip_rows)?;
    let normalizer = NameNormalizer::new();
    let left = prepare(&split.left, Side::Left, &normalizer)?;
    let right = prepare(&split.right, Side::Right, &normalizer)?;
    Ok(reconcile_entries(left, right, split.layout, config))
}

/// Run the two passes over already-prepared entries.
pub fn reconcile_entries(
    left: Vec<Entry>,
    right: Vec<Entry>,
    layout: Layout,
    config: &RunConfig,
) -> ReconcileResult {
    let left_total = left.len();
    let right_total = right.len();

    let exact = exact_pass(&left, &right);
    let fuzzy = fuzzy_pass(&exact.unmatched_left, &exact.unmatched_right);

    let mut stats = exact.stats;
    stats.merge(&fuzzy.stats);

    // Potential sides are emitted pair-aligned: index i left goes with
    // index i right.
    let potential_left: Vec<Record> = fuzzy.pairs.iter().map(|p| p.left.to_record()).collect();
    let potential_right: Vec<Record> = fuzzy.pairs.iter().map(|p| p.right.to_record()).collect();
    let potential_pairs: Vec<PotentialPair> = fuzzy
        .pairs
        .iter()
        .map(|p| PotentialPair {
            left_row: p.left.row,
            right_row: p.right.row,
            kind: p.kind,
        })
        .collect();

    let summary = Summary {
        left_total,
        right_total,
        matched: exact.matched_left.len(),
        potential: fuzzy.pairs.len(),
        unmatched_left: fuzzy.unmatched_left.len(),
        unmatched_right: fuzzy.unmatched_right.len(),
    };

    ReconcileResult {
        meta: RunMeta {
            name: config
                .name
                .clone()
                .unwrap_or_else(|| "reconciliation".to_string()),
            layout,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        stats,
        matched_left: to_records(&exact.matched_left),
        matched_right: to_records(&exact.matched_right),
        potential_left,
        potential_right,
        potential_pairs,
        unmatched_left: to_records(&fuzzy.unmatched_left),
        unmatched_right: to_records(&fuzzy.unmatched_right),
    }
}

/// Turn one side's raw rows into matchable entries: parse amounts (absolute
/// value), normalize names, carry codes through.
fn prepare(
    raw: &[RawEntry],
    side: Side,
    normalizer: &NameNormalizer,
) -> Result<Vec<Entry>, ReconError> {
    raw.iter()
        .map(|r| {
            let amount = parse_amount(&r.amount, side, r.row)?;
            let name = match &r.name {
                Cell::Text(s) => s.as_str(),
                _ => "",
            };
            Ok(Entry {
                row: r.row,
                amount,
                tokens: normalizer.tokenize(name),
                code_type: cell_text(&r.code_type),
                code_number: cell_text(&r.code_number),
            })
        })
        .collect()
}

fn parse_amount(cell: &Cell, side: Side, row: usize) -> Result<Amount, ReconError> {
    match cell {
        Cell::Number(v) if v.is_finite() => Ok(Amount::from(v.abs())),
        Cell::Number(v) => Err(ReconError::AmountParse {
            side,
            row,
            value: v.to_string(),
        }),
        Cell::Text(s) => match s.trim().parse::<f64>() {
            // NaN parses but can never participate in amount equality.
            Ok(v) if v.is_finite() => Ok(Amount::from(v.abs())),
            _ => Err(ReconError::AmountParse {
                side,
                row,
                value: s.trim().to_string(),
            }),
        },
        Cell::Empty => Err(ReconError::MissingAmount { side, row }),
    }
}

fn cell_text(cell: &Option<Cell>) -> Option<String> {
    match cell {
        Some(c) if !c.is_empty() => Some(c.display()),
        _ => None,
    }
}

fn to_records(entries: &[Entry]) -> Vec<Record> {
    entries.iter().map(Entry::to_record).collect()
}
