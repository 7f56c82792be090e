use super::domain::ScoreResult;
use tracing::warn;

const STRENGTH_THRESHOLD: f64 = 75.0;
const WEAKNESS_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExplanationError {
    #[error("explanation service unavailable: {0}")]
    Unavailable(String),
    #[error("explanation request failed: {0}")]
    Failed(String),
}

/// Narrative generator for a finished score. Implementations may be remote and may fail.
pub trait Explainer: Send + Sync {
    fn explain(&self, result: &ScoreResult) -> Result<String, ExplanationError>;
}

/// Builds a summary purely from the computed category scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryExplainer;

impl Explainer for SummaryExplainer {
    fn explain(&self, result: &ScoreResult) -> Result<String, ExplanationError> {
        Ok(fallback_summary(result))
    }
}

/// Stands in when no explanation backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledExplainer;

impl Explainer for DisabledExplainer {
    fn explain(&self, _result: &ScoreResult) -> Result<String, ExplanationError> {
        Err(ExplanationError::Unavailable(
            "no explanation backend configured".to_string(),
        ))
    }
}

pub fn fallback_summary(result: &ScoreResult) -> String {
    let tier = if result.total_score >= STRENGTH_THRESHOLD {
        "high"
    } else if result.total_score >= WEAKNESS_THRESHOLD {
        "medium"
    } else {
        "low"
    };

    let strengths = labels(result, |score| score >= STRENGTH_THRESHOLD);
    let improvements = labels(result, |score| score < WEAKNESS_THRESHOLD);

    format!(
        "Automated analysis: This business idea scored {}/100, ranking it as {tier} potential. \
Key strengths include {strengths}. Areas for improvement include {improvements}.",
        result.total_score
    )
}

fn labels(result: &ScoreResult, keep: impl Fn(f64) -> bool) -> String {
    let matched: Vec<&str> = result
        .category_scores
        .iter()
        .filter(|score| keep(score.score))
        .map(|score| score.category.as_str())
        .collect();

    if matched.is_empty() {
        "none identified".to_string()
    } else {
        matched.join(", ")
    }
}

/// Asks `explainer` first and falls back to the local summary when it fails.
pub fn explain_with_fallback(explainer: &dyn Explainer, result: &ScoreResult) -> String {
    match explainer.explain(result) {
        Ok(text) => text,
        Err(err) => {
            warn!(idea = %result.idea_name, error = %err, "explanation fallback used");
            fallback_summary(result)
        }
    }
}
