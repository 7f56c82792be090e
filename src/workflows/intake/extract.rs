use super::domain::RawValue;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Scale {
    Billions,
    Millions,
    Thousands,
}

impl Scale {
    /// Converts a value in this unit to millions.
    fn to_millions(self, value: f64) -> f64 {
        match self {
            Scale::Billions => value * 1000.0,
            Scale::Millions => value,
            Scale::Thousands => value / 1000.0,
        }
    }
}

const UNIT_SUFFIXES: &[(&str, Scale)] = &[
    ("billion", Scale::Billions),
    ("bn", Scale::Billions),
    ("b", Scale::Billions),
    ("million", Scale::Millions),
    ("mm", Scale::Millions),
    ("mn", Scale::Millions),
    ("m", Scale::Millions),
    ("thousand", Scale::Thousands),
    ("k", Scale::Thousands),
];

const UNIT_WORDS: &[(&str, Scale)] = &[
    ("billion", Scale::Billions),
    ("million", Scale::Millions),
    ("thousand", Scale::Thousands),
];

/// Parses free-text market figures into millions of currency units.
///
/// A unit token directly after the number wins over a unit word elsewhere in the text;
/// a bare number is taken to already be in millions.
pub fn parse_magnitude(text: &str) -> Option<f64> {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }

    let cleaned: String = lowered
        .chars()
        .filter(|ch| !matches!(ch, '$' | '€' | '£' | '¥' | ','))
        .collect();

    let (start, end) = longest_numeric_run(&cleaned)?;
    let value: f64 = cleaned[start..end].parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    let scale = unit_after(&cleaned[end..])
        .or_else(|| unit_word(&lowered))
        .unwrap_or(Scale::Millions);

    Some(scale.to_millions(value))
}

fn longest_numeric_run(text: &str) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut current: Option<usize> = None;

    for (index, byte) in text.bytes().enumerate() {
        let numeric = byte.is_ascii_digit() || byte == b'.';
        match (numeric, current) {
            (true, None) => current = Some(index),
            (false, Some(start)) => {
                best = longer(best, (start, index));
                current = None;
            }
            _ => {}
        }
    }
    if let Some(start) = current {
        best = longer(best, (start, text.len()));
    }

    best
}

fn longer(best: Option<(usize, usize)>, candidate: (usize, usize)) -> Option<(usize, usize)> {
    match best {
        Some((start, end)) if end - start >= candidate.1 - candidate.0 => Some((start, end)),
        _ => Some(candidate),
    }
}

/// Unit token right after the number. Short tokens only count as whole words, so the `b` of
/// "500 business customers" is not a scale marker.
fn unit_after(rest: &str) -> Option<Scale> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(billion|bn|b|million|mm|mn|m|thousand|k)\b")
            .expect("valid unit regex")
    });

    let unit = pattern.captures(rest)?.get(1)?.as_str();
    UNIT_SUFFIXES
        .iter()
        .find(|(token, _)| *token == unit)
        .map(|(_, scale)| *scale)
}

fn unit_word(lowered: &str) -> Option<Scale> {
    let words: Vec<&str> = lowered
        .split(|ch: char| !ch.is_alphabetic())
        .filter(|word| !word.is_empty())
        .collect();

    UNIT_WORDS
        .iter()
        .find(|(unit, _)| {
            words
                .iter()
                .any(|word| word == unit || word.strip_suffix('s') == Some(unit))
        })
        .map(|(_, scale)| *scale)
}

const TRUE_WORDS: &[&str] = &["yes", "y", "true", "t", "1", "high", "strong", "positive"];
const FALSE_WORDS: &[&str] = &["no", "n", "false", "f", "0", "low", "weak", "negative"];

/// Three-valued boolean read of a cell; anything outside the vocabularies is unknown.
pub fn extract_boolean(value: &RawValue) -> Option<bool> {
    let token = match value {
        RawValue::Boolean(flag) => return Some(*flag),
        RawValue::Empty => return None,
        RawValue::Number(number) => number.to_string(),
        RawValue::Text(text) => text.trim().to_lowercase(),
    };

    if TRUE_WORDS.contains(&token.as_str()) {
        Some(true)
    } else if FALSE_WORDS.contains(&token.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn out_of_ten() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:/|out\s*of)\s*10\b").expect("valid rating regex")
    })
}

fn bare_number() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number regex"))
}

/// Reads a 1-10 rating from text such as `8/10`, `7 out of 10` or a bare `6`.
pub fn extract_rating(text: &str, default: Option<f64>) -> Option<f64> {
    if let Some(value) = out_of_ten()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|matched| matched.as_str().parse::<f64>().ok())
    {
        return Some(value);
    }

    bare_number()
        .find(text)
        .and_then(|matched| matched.as_str().parse::<f64>().ok())
        .filter(|value| (1.0..=10.0).contains(value))
        .or(default)
}

/// Plain numeric columns: drops currency symbols, thousands separators and spaces.
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|ch| !ch.is_whitespace() && !matches!(ch, '$' | '€' | '£' | '¥' | ','))
        .collect();
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Stored ratings are whole numbers inside the 1-10 scale.
pub(crate) fn to_rating(value: f64) -> Option<u8> {
    if value.is_finite() && (1.0..=10.0).contains(&value) {
        Some(value.round() as u8)
    } else {
        None
    }
}
