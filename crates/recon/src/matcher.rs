use std::collections::BTreeSet;

use crate::model::{Entry, ExactPassOutput, FuzzyKind, FuzzyPair, FuzzyPassOutput, MatchStats};
use crate::similarity::{partial_ratio, partial_token_sort_ratio};

/// How many leading left tokens the matchers consult.
const LEAD_WINDOW: usize = 3;
/// Tokens shorter than this are noise for matching purposes.
const MIN_TOKEN_LEN: usize = 2;
/// Similarity threshold on the 0–100 scale.
const FUZZY_THRESHOLD: u32 = 80;

/// Strict containment match: every significant right token must appear
/// verbatim among the first three left tokens.
///
/// Asymmetric on purpose. Only the left lead window is consulted, so callers
/// must keep the (left, right) roles fixed; swapping them changes results.
pub fn is_strict_match(left: &[String], right: &[String]) -> bool {
    let significant: Vec<&String> = right
        .iter()
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .collect();
    if significant.is_empty() {
        return false;
    }
    let window = &left[..left.len().min(LEAD_WINDOW)];
    significant.iter().all(|t| window.contains(*t))
}

/// Fuzzy match in two stages.
///
/// Stage 1 walks every right token looking for a ≥80 partner in the left
/// lead window (both tokens at least two chars, first hit wins, first
/// partnerless right token aborts the stage). Stage 2 falls back to an
/// order-normalized whole-string comparison of the joined tokens.
///
/// Token-level stage-1 hits are tallied into `stats` whether or not the pair
/// as a whole is accepted.
pub fn fuzzy_match(left: &[String], right: &[String], stats: &mut MatchStats) -> Option<FuzzyKind> {
    if left.is_empty() || right.is_empty() {
        return None;
    }

    let window = &left[..left.len().min(LEAD_WINDOW)];
    let mut all_matched = true;
    for t2 in right {
        let mut matched = false;
        for t1 in window {
            if t1.chars().count() >= MIN_TOKEN_LEN
                && t2.chars().count() >= MIN_TOKEN_LEN
                && partial_ratio(t1, t2) >= FUZZY_THRESHOLD
            {
                stats.fuzzy_token_hits += 1;
                matched = true;
                break;
            }
        }
        if !matched {
            all_matched = false;
            break;
        }
    }
    if all_matched {
        stats.fuzzy_token_pairs += 1;
        return Some(FuzzyKind::TokenWise);
    }

    let joined_left = left.join(" ");
    let joined_right = right.join(" ");
    if partial_token_sort_ratio(&joined_left, &joined_right) >= FUZZY_THRESHOLD {
        stats.fuzzy_joined_pairs += 1;
        return Some(FuzzyKind::WholeString);
    }

    None
}

/// First greedy pass: amount equality plus strict name containment.
///
/// Right entries drive the outer loop in their given order; each scans left
/// entries in order and claims the first eligible one (first-fit, not
/// best-fit). Consumed indices are tracked per side; the partitions fall out
/// of the sets afterward, in side order.
pub fn exact_pass(left: &[Entry], right: &[Entry]) -> ExactPassOutput {
    let mut consumed_left: BTreeSet<usize> = BTreeSet::new();
    let mut consumed_right: BTreeSet<usize> = BTreeSet::new();
    let mut stats = MatchStats::default();

    for (ri, r) in right.iter().enumerate() {
        for (li, l) in left.iter().enumerate() {
            if consumed_left.contains(&li) {
                continue;
            }
            if l.amount == r.amount && is_strict_match(&l.tokens, &r.tokens) {
                consumed_left.insert(li);
                consumed_right.insert(ri);
                stats.strict_pairs += 1;
                break;
            }
        }
    }

    let (matched_left, unmatched_left) = partition_consumed(left, &consumed_left);
    let (matched_right, unmatched_right) = partition_consumed(right, &consumed_right);

    ExactPassOutput {
        matched_left,
        matched_right,
        unmatched_left,
        unmatched_right,
        stats,
    }
}

/// Second greedy pass over the exact-pass remainder: amount pre-filter plus
/// fuzzy name match. Pairs keep the stage that accepted them.
pub fn fuzzy_pass(left: &[Entry], right: &[Entry]) -> FuzzyPassOutput {
    let mut consumed_left: BTreeSet<usize> = BTreeSet::new();
    let mut consumed_right: BTreeSet<usize> = BTreeSet::new();
    let mut stats = MatchStats::default();
    let mut pairs = Vec::new();

    for (ri, r) in right.iter().enumerate() {
        for (li, l) in left.iter().enumerate() {
            if l.amount != r.amount {
                continue;
            }
            if consumed_left.contains(&li) {
                continue;
            }
            if let Some(kind) = fuzzy_match(&l.tokens, &r.tokens, &mut stats) {
                pairs.push(FuzzyPair {
                    left: l.clone(),
                    right: r.clone(),
                    kind,
                });
                consumed_left.insert(li);
                consumed_right.insert(ri);
                break;
            }
        }
    }

    let (_, unmatched_left) = partition_consumed(left, &consumed_left);
    let (_, unmatched_right) = partition_consumed(right, &consumed_right);

    FuzzyPassOutput {
        pairs,
        unmatched_left,
        unmatched_right,
        stats,
    }
}

fn partition_consumed(entries: &[Entry], consumed: &BTreeSet<usize>) -> (Vec<Entry>, Vec<Entry>) {
    let mut matched = Vec::new();
    let mut unmatched = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        if consumed.contains(&i) {
            matched.push(entry.clone());
        } else {
            unmatched.push(entry.clone());
        }
    }
    (matched, unmatched)
}
