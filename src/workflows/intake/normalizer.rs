/// Lowercases, trims, turns spaces into underscores and drops anything outside `[a-z0-9_]`.
pub(crate) fn normalize_column_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .trim()
        .to_lowercase()
        .chars()
        .map(|ch| if ch.is_whitespace() { '_' } else { ch })
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '_')
        .collect()
}
