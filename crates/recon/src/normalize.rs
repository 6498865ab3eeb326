use regex::Regex;

/// Turns raw sender-name cells into ordered lowercase token sequences.
///
/// Built once per run so the fragment pattern compiles once.
pub struct NameNormalizer {
    amount_fragment: Regex,
}

impl NameNormalizer {
    pub fn new() -> Self {
        // Optional currency marker, optional single whitespace, digits with
        // up to two decimals, optional buy@<price> suffix. Applied to
        // already-lowercased text, hence the lowercase marker forms.
        let amount_fragment =
            Regex::new(r"(r\$|\$|usd)?\s?\d+(\.\d{1,2})?(buy@\d+(\.\d{1,2})?)?").unwrap();
        Self { amount_fragment }
    }

    /// Lowercase, strip embedded amount fragments, split on separator runs,
    /// drop empty tokens. Token order is preserved.
    pub fn tokenize(&self, raw: &str) -> Vec<String> {
        let lowered = raw.to_lowercase();
        let stripped = self.amount_fragment.replace_all(&lowered, "");
        stripped
            .split(is_separator)
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '-' | '+' | '(' | ')' | '@' | ',')
}
