/// Ordered `(terms, score)` table; the first bucket with a term contained in the text wins.
pub(crate) type KeywordTable = &'static [(&'static [&'static str], f64)];

pub(crate) fn first_match(text: &str, table: KeywordTable) -> Option<f64> {
    if text.is_empty() {
        return None;
    }

    table
        .iter()
        .find(|(terms, _)| terms.iter().any(|term| text.contains(term)))
        .map(|(_, score)| *score)
}

pub(crate) fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}
