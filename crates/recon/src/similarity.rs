//! Integer similarity scores on the 0–100 scale used by the fuzzy matcher.
//!
//! Callers pass already-normalized (lowercase, punctuation-free) text, so no
//! preprocessing happens here.

use strsim::normalized_levenshtein;

/// Plain similarity of two strings, 0–100.
///
/// Scores round to the nearest integer before any threshold comparison, so
/// borderline floats (1/5 distance gives 79.999…) land on the documented
/// scale.
pub fn ratio(a: &str, b: &str) -> u32 {
    (normalized_levenshtein(a, b) * 100.0).round() as u32
}

/// Best-aligning substring similarity: the shorter string is slid across
/// every same-length window of the longer, best window score wins.
pub fn partial_ratio(a: &str, b: &str) -> u32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (short, long) = if a_chars.len() <= b_chars.len() {
        (&a_chars, &b_chars)
    } else {
        (&b_chars, &a_chars)
    };

    if short.is_empty() {
        return if long.is_empty() { 100 } else { 0 };
    }
    if short.len() == long.len() {
        return ratio(a, b);
    }

    let needle: String = short.iter().collect();
    let mut best = 0;
    for start in 0..=(long.len() - short.len()) {
        let window: String = long[start..start + short.len()].iter().collect();
        let score = ratio(&needle, &window);
        if score > best {
            best = score;
            if best == 100 {
                break;
            }
        }
    }
    best
}

/// Partial ratio with token order normalized: each side's whitespace tokens
/// are sorted and re-joined first, so reordered names with extra words still
/// align on their common run.
pub fn partial_token_sort_ratio(a: &str, b: &str) -> u32 {
    partial_ratio(&sort_tokens(a), &sort_tokens(b))
}

fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_100() {
        assert_eq!(ratio("smith", "smith"), 100);
        assert_eq!(partial_ratio("smith", "smith"), 100);
    }

    #[test]
    fn substring_scores_100_partial() {
        assert_eq!(partial_ratio("john", "johnson"), 100);
        assert_eq!(partial_ratio("johnson", "john"), 100); // symmetric
    }

    #[test]
    fn one_edit_in_five_rounds_to_80() {
        // 1 - 1/5 = 0.7999… in floats; the integer scale must read 80.
        assert_eq!(ratio("smith", "smyth"), 80);
        assert_eq!(partial_ratio("smith", "smyth"), 80);
    }

    #[test]
    fn unrelated_tokens_score_low() {
        assert!(partial_ratio("corp", "john") < 80);
        assert!(partial_ratio("corp", "smith") < 80);
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(ratio("", ""), 100);
        assert_eq!(partial_ratio("", ""), 100);
        assert_eq!(partial_ratio("", "abc"), 0);
    }

    #[test]
    fn token_sort_aligns_reordered_names() {
        // Plain sliding overlap cannot line these up; sorting the tokens can.
        assert!(partial_ratio("john smith", "smith john corp") < 80);
        assert_eq!(partial_token_sort_ratio("john smith", "smith john corp"), 100);
    }

    #[test]
    fn token_sort_is_plain_partial_for_single_tokens() {
        assert_eq!(
            partial_token_sort_ratio("johnson", "john"),
            partial_ratio("johnson", "john")
        );
    }

    #[test]
    fn multibyte_windows_slide_by_chars() {
        // Window arithmetic is in chars; this must not panic or misalign.
        assert_eq!(partial_ratio("josé", "josé silva"), 100);
    }
}
