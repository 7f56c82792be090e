use chrono::{DateTime, Local};
use clap::Args;
use idea_scorer::error::AppError;
use idea_scorer::workflows::intake::{CanonicalRecord, IdeaImporter};
use idea_scorer::workflows::scoring::{
    explain_with_fallback, ScoreResult, ScoreSummary, ScoringEngine, SummaryExplainer,
    WeightConfiguration,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// CSV export of business ideas
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Six comma-separated category weights summing to 100
    #[arg(long, value_parser = crate::infra::parse_weights)]
    pub(crate) weights: Option<WeightConfiguration>,
    /// Emit the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Attach a narrative summary to every idea
    #[arg(long)]
    pub(crate) explain: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreReport {
    pub(crate) generated_at: DateTime<Local>,
    pub(crate) weights: WeightConfiguration,
    pub(crate) summary: ScoreSummary,
    pub(crate) ideas: Vec<RankedIdea>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RankedIdea {
    pub(crate) rank: usize,
    pub(crate) data_quality_issues: bool,
    #[serde(flatten)]
    pub(crate) result: ScoreResult,
}

pub(crate) fn run_score_report(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        csv,
        weights,
        json,
        explain,
    } = args;

    let engine = ScoringEngine::new(weights.unwrap_or_default())?;
    let records = IdeaImporter::from_path(&csv)?;
    let report = build_report(&engine, &records, explain, Local::now());

    if json {
        let rendered = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

/// Scores the batch and ranks it by total score, highest first. Ties keep input order.
pub(crate) fn build_report(
    engine: &ScoringEngine,
    records: &[CanonicalRecord],
    explain: bool,
    generated_at: DateTime<Local>,
) -> ScoreReport {
    let results = engine.score_batch(records);
    let summary = ScoreSummary::from_results(&results);

    let mut scored: Vec<(bool, ScoreResult)> = records
        .iter()
        .map(|record| record.data_quality_issues)
        .zip(results)
        .collect();
    scored.sort_by(|a, b| b.1.total_score.total_cmp(&a.1.total_score));

    let ideas = scored
        .into_iter()
        .enumerate()
        .map(|(index, (data_quality_issues, mut result))| {
            if explain {
                result.explanation = Some(explain_with_fallback(&SummaryExplainer, &result));
            }
            RankedIdea {
                rank: index + 1,
                data_quality_issues,
                result,
            }
        })
        .collect();

    ScoreReport {
        generated_at,
        weights: *engine.weights(),
        summary,
        ideas,
    }
}

pub(crate) fn render_text(report: &ScoreReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Idea scoring report ({})\n",
        report.generated_at.format("%Y-%m-%d %H:%M")
    ));
    out.push_str(&format!(
        "- {} ideas | average {:.2} | highest {:.2} | lowest {:.2}\n",
        report.summary.count,
        report.summary.average_score,
        report.summary.highest_score,
        report.summary.lowest_score
    ));
    let distribution: Vec<String> = report
        .summary
        .distribution
        .iter()
        .map(|(bucket, count)| format!("{bucket}: {count}"))
        .collect();
    out.push_str(&format!("- Distribution: {}\n", distribution.join(" | ")));

    out.push_str("\nRanking:\n");
    for idea in &report.ideas {
        out.push_str(&format!(
            "{:>3}. {} ({:.2}){}\n",
            idea.rank,
            idea.result.idea_name,
            idea.result.total_score,
            if idea.data_quality_issues {
                " [data quality issues]"
            } else {
                ""
            }
        ));
        for category in &idea.result.category_scores {
            out.push_str(&format!(
                "     - {}: {:.1} x {:.1}% = {:.2}\n",
                category.category, category.score, category.weight, category.weighted_score
            ));
        }
        if !idea.result.risk_flags.is_empty() {
            out.push_str(&format!(
                "     Risk flags: {}\n",
                idea.result.risk_flags.join(", ")
            ));
        }
        if let Some(explanation) = &idea.result.explanation {
            out.push_str(&format!("     {explanation}\n"));
        }
    }
    out
}
