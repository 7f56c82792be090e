use regex::{NoExpand, Regex};
use std::sync::OnceLock;

/// Vocabulary a free-text field is folded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermDomain {
    Industry,
    BusinessModel,
}

// Multi-word phrases sit ahead of any shorter phrase they contain. Tokens never contain a
// phrase of another rule, so repeated passes settle once every phrase is folded.
const INDUSTRY_TERMS: &[(&str, &str)] = &[
    ("fintech", "fintech"),
    ("financial technology", "fintech"),
    ("financial tech", "fintech"),
    ("financial services", "fintech"),
    ("finance", "fintech"),
    ("healthtech", "healthtech"),
    ("health tech", "healthtech"),
    ("health care", "healthtech"),
    ("healthcare", "healthtech"),
    ("medical", "healthtech"),
    ("edtech", "edtech"),
    ("educational technology", "edtech"),
    ("education technology", "edtech"),
    ("education tech", "edtech"),
    ("e-commerce", "ecommerce"),
    ("e commerce", "ecommerce"),
    ("ecommerce", "ecommerce"),
    ("online retail", "ecommerce"),
    ("retail", "ecommerce"),
    ("b2b saas", "enterprise_saas"),
    ("b2b software", "enterprise_saas"),
    ("enterprise saas", "enterprise_saas"),
    ("enterprise software", "enterprise_saas"),
    ("saas", "enterprise_saas"),
    ("consumer apps", "consumer_apps"),
    ("consumer app", "consumer_apps"),
    ("mobile apps", "consumer_apps"),
    ("mobile app", "consumer_apps"),
    ("b2c app", "consumer_apps"),
    ("artificial intelligence", "ai_ml"),
    ("machine learning", "ai_ml"),
    ("deep learning", "ai_ml"),
    ("ai", "ai_ml"),
    ("ml", "ai_ml"),
    ("biotechnology", "biotech"),
    ("bio tech", "biotech"),
    ("biotech", "biotech"),
    ("clean technology", "cleantech"),
    ("green tech", "cleantech"),
    ("cleantech", "cleantech"),
    ("renewable", "cleantech"),
    ("sustainability", "cleantech"),
    ("internet of things", "iot"),
    ("connected devices", "iot"),
    ("iot", "iot"),
    ("cryptocurrency", "blockchain"),
    ("crypto", "blockchain"),
    ("blockchain", "blockchain"),
    ("web3", "blockchain"),
];

const BUSINESS_MODEL_TERMS: &[(&str, &str)] = &[
    ("saas", "saas"),
    ("software as a service", "saas"),
    ("software-as-a-service", "saas"),
    ("two-sided marketplace", "marketplace"),
    ("two sided marketplace", "marketplace"),
    ("market place", "marketplace"),
    ("marketplace", "marketplace"),
    ("consumer app", "consumer_app"),
    ("mobile app", "consumer_app"),
    ("app", "consumer_app"),
    ("e-commerce", "ecommerce"),
    ("e commerce", "ecommerce"),
    ("ecommerce", "ecommerce"),
    ("online store", "ecommerce"),
    ("recurring revenue", "subscription"),
    ("subscription model", "subscription"),
    ("subscription", "subscription"),
    ("free to paid", "freemium"),
    ("free tier", "freemium"),
    ("freemium", "freemium"),
    ("physical product", "hardware"),
    ("hardware", "hardware"),
    ("device", "hardware"),
    ("ad-supported", "advertising"),
    ("ad supported", "advertising"),
    ("ads", "advertising"),
    ("advertising", "advertising"),
    ("data monetization", "data_monetization"),
    ("data-monetization", "data_monetization"),
    ("license", "licensing"),
    ("ip licensing", "licensing"),
    ("data licensing", "data_monetization"),
    ("licensing", "licensing"),
];

struct CompiledTerm {
    pattern: Regex,
    token: &'static str,
}

fn compile(terms: &'static [(&'static str, &'static str)]) -> Vec<CompiledTerm> {
    terms
        .iter()
        .map(|(phrase, token)| CompiledTerm {
            pattern: Regex::new(&format!(r"\b{}\b", regex::escape(phrase)))
                .expect("escaped phrase is a valid regex"),
            token,
        })
        .collect()
}

fn compiled(domain: TermDomain) -> &'static [CompiledTerm] {
    static INDUSTRY: OnceLock<Vec<CompiledTerm>> = OnceLock::new();
    static BUSINESS_MODEL: OnceLock<Vec<CompiledTerm>> = OnceLock::new();

    match domain {
        TermDomain::Industry => INDUSTRY.get_or_init(|| compile(INDUSTRY_TERMS)),
        TermDomain::BusinessModel => BUSINESS_MODEL.get_or_init(|| compile(BUSINESS_MODEL_TERMS)),
    }
}

/// Lowercases `text` and rewrites known phrases to their canonical tokens, whole words only.
///
/// Passes repeat until nothing changes, so the result is always a fixed point. A folded
/// token can complete a phrase again ("two sided two-sided marketplace"), which one pass
/// would leave behind. Every changing pass consumes at least one character outside the
/// tokens, which bounds the loop by the input length.
pub fn standardize(text: &str, domain: TermDomain) -> String {
    let mut current = text.trim().to_lowercase();
    if current.is_empty() {
        return current;
    }

    for _ in 0..=current.len() {
        let next = fold_once(&current, domain);
        if next == current {
            break;
        }
        current = next;
    }

    current
}

fn fold_once(text: &str, domain: TermDomain) -> String {
    let mut current = text.to_string();
    for term in compiled(domain) {
        if term.pattern.is_match(&current) {
            current = term
                .pattern
                .replace_all(&current, NoExpand(term.token))
                .into_owned();
        }
    }
    current
}

#[cfg(test)]
pub(crate) fn phrases_for_tests(domain: TermDomain) -> &'static [(&'static str, &'static str)] {
    match domain {
        TermDomain::Industry => INDUSTRY_TERMS,
        TermDomain::BusinessModel => BUSINESS_MODEL_TERMS,
    }
}
