// Property-based tests for the two-pass reconciliation core.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;

use matchbook_recon::matcher::{exact_pass, fuzzy_pass, is_strict_match};
use matchbook_recon::model::{Amount, Entry};
use matchbook_recon::normalize::NameNormalizer;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

// Small pools keep collisions frequent, so both passes actually fire.
const NAME_POOL: &[&str] = &[
    "john", "smith", "maria", "souza", "silva", "acme", "corp", "zenith",
];
const AMOUNT_POOL: &[f64] = &[10.0, 20.0, 35.5, 90.0];

fn arb_tokens() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(prop::sample::select(NAME_POOL.to_vec()), 0..4)
        .prop_map(|tokens| tokens.into_iter().map(|t| t.to_string()).collect())
}

fn arb_side(amounts: &'static [f64]) -> impl Strategy<Value = Vec<Entry>> {
    proptest::collection::vec(
        (arb_tokens(), prop::sample::select(amounts.to_vec())),
        0..10,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(row, (tokens, amount))| Entry {
                row,
                amount: Amount::from(amount),
                tokens,
                code_type: None,
                code_number: None,
            })
            .collect()
    })
}

fn rows(entries: &[Entry]) -> Vec<usize> {
    entries.iter().map(|e| e.row).collect()
}

fn sorted_amounts(entries: &[Entry]) -> Vec<Amount> {
    let mut amounts: Vec<Amount> = entries.iter().map(|e| e.amount).collect();
    amounts.sort_unstable();
    amounts
}

// ---------------------------------------------------------------------------
// Pass invariants
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn exact_pass_is_one_to_one_and_complete(
        left in arb_side(AMOUNT_POOL),
        right in arb_side(AMOUNT_POOL),
    ) {
        let out = exact_pass(&left, &right);

        prop_assert_eq!(out.matched_left.len(), out.matched_right.len(),
            "pairs must consume one entry per side");
        prop_assert_eq!(out.matched_left.len() + out.unmatched_left.len(), left.len());
        prop_assert_eq!(out.matched_right.len() + out.unmatched_right.len(), right.len());

        // Every pair is amount-equal, so the matched amount multisets agree.
        prop_assert_eq!(
            sorted_amounts(&out.matched_left),
            sorted_amounts(&out.matched_right)
        );

        prop_assert_eq!(out.stats.strict_pairs as usize, out.matched_left.len());
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn chained_passes_partition_every_entry(
        left in arb_side(AMOUNT_POOL),
        right in arb_side(AMOUNT_POOL),
    ) {
        let exact = exact_pass(&left, &right);
        let fuzzy = fuzzy_pass(&exact.unmatched_left, &exact.unmatched_right);

        prop_assert_eq!(
            exact.matched_left.len() + fuzzy.pairs.len() + fuzzy.unmatched_left.len(),
            left.len()
        );
        prop_assert_eq!(
            exact.matched_right.len() + fuzzy.pairs.len() + fuzzy.unmatched_right.len(),
            right.len()
        );

        // No row lands in two buckets on the same side.
        let mut left_rows: Vec<usize> = rows(&exact.matched_left);
        left_rows.extend(fuzzy.pairs.iter().map(|p| p.left.row));
        left_rows.extend(rows(&fuzzy.unmatched_left));
        left_rows.sort_unstable();
        left_rows.dedup();
        prop_assert_eq!(left_rows.len(), left.len(), "left row consumed twice");

        let mut right_rows: Vec<usize> = rows(&exact.matched_right);
        right_rows.extend(fuzzy.pairs.iter().map(|p| p.right.row));
        right_rows.extend(rows(&fuzzy.unmatched_right));
        right_rows.sort_unstable();
        right_rows.dedup();
        prop_assert_eq!(right_rows.len(), right.len(), "right row consumed twice");
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn fuzzy_pairs_are_amount_equal(
        left in arb_side(AMOUNT_POOL),
        right in arb_side(AMOUNT_POOL),
    ) {
        let out = fuzzy_pass(&left, &right);
        for pair in &out.pairs {
            prop_assert_eq!(pair.left.amount, pair.right.amount);
        }
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn disjoint_amounts_never_match(
        left in arb_side(&[1.0, 2.0]),
        right in arb_side(&[300.0, 400.0]),
    ) {
        let exact = exact_pass(&left, &right);
        prop_assert_eq!(exact.matched_left.len(), 0);

        let fuzzy = fuzzy_pass(&left, &right);
        prop_assert_eq!(fuzzy.pairs.len(), 0);
        prop_assert_eq!(fuzzy.unmatched_left.len(), left.len());
        prop_assert_eq!(fuzzy.unmatched_right.len(), right.len());
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn passes_are_deterministic(
        left in arb_side(AMOUNT_POOL),
        right in arb_side(AMOUNT_POOL),
    ) {
        let a = exact_pass(&left, &right);
        let b = exact_pass(&left, &right);
        prop_assert_eq!(rows(&a.matched_left), rows(&b.matched_left));
        prop_assert_eq!(rows(&a.unmatched_right), rows(&b.unmatched_right));

        let fa = fuzzy_pass(&a.unmatched_left, &a.unmatched_right);
        let fb = fuzzy_pass(&b.unmatched_left, &b.unmatched_right);
        let pair_rows = |out: &matchbook_recon::model::FuzzyPassOutput| -> Vec<(usize, usize)> {
            out.pairs.iter().map(|p| (p.left.row, p.right.row)).collect()
        };
        prop_assert_eq!(pair_rows(&fa), pair_rows(&fb));
    }
}

// ---------------------------------------------------------------------------
// Matcher + normalizer invariants
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn strict_needs_significant_right_tokens(
        left in arb_tokens(),
        short in proptest::collection::vec(prop::sample::select(vec!["a", "b", "x"]), 0..3),
    ) {
        prop_assert!(!is_strict_match(&left, &[]));

        let short: Vec<String> = short.into_iter().map(|t| t.to_string()).collect();
        prop_assert!(!is_strict_match(&left, &short),
            "single-char right tokens must never strict-match");
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn tokenize_is_idempotent(raw in ".{0,40}") {
        let normalizer = NameNormalizer::new();
        let once = normalizer.tokenize(&raw);
        let again = normalizer.tokenize(&once.join(" "));
        prop_assert_eq!(once, again);
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn tokens_never_keep_digits_or_separators(raw in ".{0,40}") {
        let normalizer = NameNormalizer::new();
        for token in normalizer.tokenize(&raw) {
            prop_assert!(!token.is_empty());
            prop_assert!(
                !token.chars().any(|c| c.is_ascii_digit()
                    || matches!(c, ' ' | '-' | '+' | '(' | ')' | '@' | ',')),
                "token {:?} kept a digit or separator", token
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Edge guards
// ---------------------------------------------------------------------------

#[test]
fn empty_sides_produce_empty_outputs() {
    let out = exact_pass(&[], &[]);
    assert!(out.matched_left.is_empty());
    assert!(out.unmatched_right.is_empty());

    let out = fuzzy_pass(&[], &[]);
    assert!(out.pairs.is_empty());
    assert!(out.unmatched_left.is_empty());
}
