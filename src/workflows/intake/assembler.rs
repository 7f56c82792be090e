use super::domain::{CanonicalRecord, QualitativeNotes, RawRow, RawValue};
use super::extract::{extract_boolean, extract_rating, parse_amount, parse_magnitude, to_rating};
use super::mapping::{aliases_for, role_for, CanonicalField, ColumnRole};
use super::normalizer::normalize_column_name;
use super::terms::standardize;
use super::IngestionError;
use rayon::prelude::*;
use std::collections::HashMap;

const MIN_CRITICAL_TEXT_CHARS: usize = 5;

#[derive(Debug, Clone)]
struct Column {
    role: ColumnRole,
    median: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
enum Parsed {
    Text(String),
    Number(Option<f64>),
    Flag(Option<bool>),
    Rating { value: Option<f64>, note: String },
}

type NormalizedRow<'a> = HashMap<String, &'a RawValue>;

/// Builds one canonical record per row. Medians are computed over the whole batch before any
/// row is assembled; everything after that runs per row in parallel and keeps input order.
pub(crate) fn assemble(rows: &[RawRow]) -> Result<Vec<CanonicalRecord>, IngestionError> {
    if rows.is_empty() {
        return Err(IngestionError::NoRows);
    }

    let normalized: Vec<NormalizedRow<'_>> = rows.iter().map(normalize_row).collect();
    let columns = catalog(&normalized);
    if columns.is_empty() {
        return Err(IngestionError::NoUsableColumns);
    }

    let records = normalized
        .par_iter()
        .enumerate()
        .map(|(index, row)| assemble_row(index, row, &columns))
        .collect();

    Ok(records)
}

fn normalize_row(row: &RawRow) -> NormalizedRow<'_> {
    let mut cells = HashMap::new();
    for (column, value) in row.cells() {
        let key = normalize_column_name(column);
        if key.is_empty() {
            continue;
        }
        cells.entry(key).or_insert(value);
    }
    cells
}

fn catalog(rows: &[NormalizedRow<'_>]) -> HashMap<String, Column> {
    let mut values: HashMap<&str, Vec<&RawValue>> = HashMap::new();
    for row in rows {
        for (key, value) in row {
            values.entry(key.as_str()).or_default().push(*value);
        }
    }

    values
        .into_iter()
        .map(|(key, cells)| {
            let role = role_for(key);
            let median = if role.fills_with_median() {
                numeric_median(&cells)
            } else {
                None
            };
            (key.to_string(), Column { role, median })
        })
        .collect()
}

/// Median over a column whose every present cell is numeric; mixed columns get no fill value.
fn numeric_median(cells: &[&RawValue]) -> Option<f64> {
    let mut numbers = Vec::with_capacity(cells.len());
    for cell in cells {
        match cell {
            RawValue::Number(value) if value.is_finite() => numbers.push(*value),
            other if other.is_missing() => {}
            _ => return None,
        }
    }

    if numbers.is_empty() {
        return None;
    }

    numbers.sort_by(f64::total_cmp);
    let middle = numbers.len() / 2;
    if numbers.len() % 2 == 0 {
        Some((numbers[middle - 1] + numbers[middle]) / 2.0)
    } else {
        Some(numbers[middle])
    }
}

fn parse_cell(column: &Column, value: Option<&RawValue>) -> Parsed {
    let value = value.filter(|value| !value.is_missing());

    match column.role {
        ColumnRole::Text(domain) => {
            let text = value.map(RawValue::as_text).unwrap_or_default();
            match domain {
                Some(domain) => Parsed::Text(standardize(&text, domain)),
                None => Parsed::Text(text),
            }
        }
        ColumnRole::Flag => Parsed::Flag(value.and_then(extract_boolean)),
        ColumnRole::Magnitude => Parsed::Number(match value {
            Some(RawValue::Number(number)) => Some(*number),
            Some(RawValue::Text(text)) => parse_magnitude(text),
            Some(_) => None,
            None => column.median,
        }),
        ColumnRole::Numeric => Parsed::Number(match value {
            Some(RawValue::Number(number)) => Some(*number),
            Some(RawValue::Text(text)) => parse_amount(text),
            Some(_) => None,
            None => column.median,
        }),
        ColumnRole::Rating => match value {
            Some(RawValue::Number(number)) => Parsed::Rating {
                value: Some(*number),
                note: String::new(),
            },
            Some(RawValue::Text(text)) => match extract_rating(text, None) {
                Some(rating) => Parsed::Rating {
                    value: Some(rating),
                    note: String::new(),
                },
                None => Parsed::Rating {
                    value: None,
                    note: text.trim().to_lowercase(),
                },
            },
            Some(_) => Parsed::Rating {
                value: None,
                note: String::new(),
            },
            None => Parsed::Rating {
                value: column.median,
                note: String::new(),
            },
        },
    }
}

struct ParsedRow {
    cells: HashMap<String, Parsed>,
}

impl ParsedRow {
    fn candidates(&self, field: CanonicalField) -> impl Iterator<Item = &Parsed> {
        aliases_for(field)
            .iter()
            .filter_map(|alias| self.cells.get(*alias))
    }

    fn text(&self, field: CanonicalField) -> Option<String> {
        self.candidates(field).find_map(|parsed| match parsed {
            Parsed::Text(text) if !text.is_empty() => Some(text.clone()),
            _ => None,
        })
    }

    fn number(&self, field: CanonicalField) -> Option<f64> {
        self.candidates(field).find_map(|parsed| match parsed {
            Parsed::Number(value) => value.filter(|value| value.is_finite()),
            _ => None,
        })
    }

    fn flag(&self, field: CanonicalField) -> Option<bool> {
        self.candidates(field).find_map(|parsed| match parsed {
            Parsed::Flag(value) => *value,
            _ => None,
        })
    }

    /// First alias carrying either a usable rating or a qualitative note.
    fn rating(&self, field: CanonicalField) -> (Option<u8>, String) {
        self.candidates(field)
            .find_map(|parsed| match parsed {
                Parsed::Rating {
                    value: Some(value), ..
                } => Some((to_rating(*value), String::new())),
                Parsed::Rating { value: None, note } if !note.is_empty() => {
                    Some((None, note.clone()))
                }
                _ => None,
            })
            .unwrap_or((None, String::new()))
    }
}

fn assemble_row(
    index: usize,
    row: &NormalizedRow<'_>,
    columns: &HashMap<String, Column>,
) -> CanonicalRecord {
    let cells = columns
        .iter()
        .map(|(key, column)| (key.clone(), parse_cell(column, row.get(key).copied())))
        .collect();
    let parsed = ParsedRow { cells };

    let name = parsed
        .text(CanonicalField::Name)
        .unwrap_or_else(|| format!("Business Idea {}", index + 1));

    let (competition_level, competition_note) = parsed.rating(CanonicalField::CompetitionLevel);
    let (founding_team_experience, founder_note) =
        parsed.rating(CanonicalField::FoundingTeamExperience);
    let (product_complexity, complexity_note) = parsed.rating(CanonicalField::ProductComplexity);
    let (regulatory_risk, regulatory_note) = parsed.rating(CanonicalField::RegulatoryRisk);
    let (social_impact_score, _) = parsed.rating(CanonicalField::SocialImpactScore);
    let (environmental_impact_score, _) = parsed.rating(CanonicalField::EnvironmentalImpactScore);

    let estimated_cac = parsed.number(CanonicalField::EstimatedCac);
    let estimated_ltv = parsed.number(CanonicalField::EstimatedLtv);

    let mut record = CanonicalRecord {
        name,
        description: parsed.text(CanonicalField::Description).unwrap_or_default(),
        industry: parsed.text(CanonicalField::Industry).unwrap_or_default(),
        business_model: parsed.text(CanonicalField::BusinessModel).unwrap_or_default(),
        problem_statement: parsed
            .text(CanonicalField::ProblemStatement)
            .unwrap_or_default(),
        solution_description: parsed
            .text(CanonicalField::SolutionDescription)
            .unwrap_or_default(),
        target_market: parsed.text(CanonicalField::TargetMarket).unwrap_or_default(),
        market_size_tam: parsed.number(CanonicalField::MarketSizeTam),
        market_size_sam: parsed.number(CanonicalField::MarketSizeSam),
        market_size_som: parsed.number(CanonicalField::MarketSizeSom),
        competition_level,
        founding_team_experience,
        product_complexity,
        regulatory_risk,
        has_network_effects: parsed.flag(CanonicalField::HasNetworkEffects),
        has_public_customers: parsed.flag(CanonicalField::HasPublicCustomers),
        has_recurring_revenue: parsed.flag(CanonicalField::HasRecurringRevenue),
        has_ip_patents: parsed.flag(CanonicalField::HasIpPatents),
        estimated_cac,
        estimated_ltv,
        ltv_cac_ratio: ltv_cac_ratio(estimated_ltv, estimated_cac),
        social_impact_score,
        environmental_impact_score,
        data_quality_issues: false,
        qualitative: QualitativeNotes {
            competition: competition_note,
            founder_experience: founder_note,
            product_complexity: complexity_note,
            regulatory_risk: regulatory_note,
        },
    };
    record.data_quality_issues = has_quality_issues(&record);
    record
}

fn ltv_cac_ratio(ltv: Option<f64>, cac: Option<f64>) -> Option<f64> {
    match (ltv, cac) {
        (Some(ltv), Some(cac)) if cac != 0.0 => Some(ltv / cac),
        _ => None,
    }
}

fn has_quality_issues(record: &CanonicalRecord) -> bool {
    let short_text = [
        &record.name,
        &record.description,
        &record.problem_statement,
        &record.solution_description,
    ]
    .iter()
    .any(|text| text.chars().count() < MIN_CRITICAL_TEXT_CHARS);

    let exceeds = |inner: Option<f64>, outer: Option<f64>| {
        matches!((inner, outer), (Some(inner), Some(outer)) if inner > outer)
    };

    short_text
        || exceeds(record.market_size_sam, record.market_size_tam)
        || exceeds(record.market_size_som, record.market_size_sam)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_row(name: &str) -> RawRow {
        RawRow::new()
            .with("Name", name)
            .with("Description", "Automated bookkeeping for freelancers")
            .with("Problem Statement", "Freelancers lose hours on admin")
            .with("Solution Description", "Bank feeds reconciled automatically")
    }

    #[test]
    fn empty_batch_is_a_structural_failure() {
        assert!(matches!(assemble(&[]), Err(IngestionError::NoRows)));
    }

    #[test]
    fn rows_without_usable_headers_are_rejected() {
        let rows = vec![RawRow::new().with("???", "value")];
        assert!(matches!(
            assemble(&rows),
            Err(IngestionError::NoUsableColumns)
        ));
    }

    #[test]
    fn absent_columns_become_nulls_and_empty_text() {
        let records = assemble(&[RawRow::new().with("Name", "Solo")]).expect("assembles");
        let record = &records[0];
        assert_eq!(record.description, "");
        assert_eq!(record.market_size_tam, None);
        assert_eq!(record.competition_level, None);
        assert_eq!(record.has_network_effects, None);
        assert_eq!(record.ltv_cac_ratio, None);
    }

    #[test]
    fn missing_numeric_cells_take_the_batch_median() {
        let rows = vec![
            complete_row("Alpha").with("TAM", 100.0),
            complete_row("Bravo").with("TAM", RawValue::Empty),
            complete_row("Charlie").with("TAM", 300.0),
            complete_row("Delta").with("TAM", 400.0),
        ];
        let records = assemble(&rows).expect("assembles");
        assert_eq!(records[1].market_size_tam, Some(300.0));
        assert_eq!(records[0].market_size_tam, Some(100.0));
    }

    #[test]
    fn mixed_text_columns_are_parsed_per_cell_without_median() {
        let rows = vec![
            complete_row("Alpha").with("Market Size", "$2B"),
            complete_row("Bravo").with("Market Size", RawValue::Empty),
            complete_row("Charlie").with("Market Size", "unknown"),
        ];
        let records = assemble(&rows).expect("assembles");
        assert_eq!(records[0].market_size_tam, Some(2000.0));
        assert_eq!(records[1].market_size_tam, None);
        assert_eq!(records[2].market_size_tam, None);
    }

    #[test]
    fn boolean_columns_stay_unknown_when_missing() {
        let rows = vec![
            complete_row("Alpha").with("Has Network Effects", 1.0),
            complete_row("Bravo").with("Has Network Effects", RawValue::Empty),
        ];
        let records = assemble(&rows).expect("assembles");
        assert_eq!(records[0].has_network_effects, Some(true));
        assert_eq!(records[1].has_network_effects, None);
    }

    #[test]
    fn rating_text_without_numbers_is_kept_as_a_note() {
        let rows = vec![complete_row("Alpha")
            .with("Competition", "Very crowded space")
            .with("Founder Experience", "8/10")];
        let record = &assemble(&rows).expect("assembles")[0];
        assert_eq!(record.competition_level, None);
        assert_eq!(record.qualitative.competition, "very crowded space");
        assert_eq!(record.founding_team_experience, Some(8));
        assert_eq!(record.qualitative.founder_experience, "");
    }

    #[test]
    fn name_follows_fallback_chain() {
        let rows = vec![
            RawRow::new().with("Idea", "Fallback idea").with("Title", "Title idea"),
            RawRow::new().with("Name", "").with("Title", "Title idea"),
            RawRow::new().with("Industry", "Fintech"),
        ];
        let records = assemble(&rows).expect("assembles");
        assert_eq!(records[0].name, "Fallback idea");
        assert_eq!(records[1].name, "Title idea");
        assert_eq!(records[2].name, "Business Idea 3");
        assert_eq!(records[2].industry, "fintech");
    }

    #[test]
    fn ltv_cac_ratio_requires_non_zero_cac() {
        let rows = vec![
            complete_row("Alpha").with("CAC", 100.0).with("LTV", 450.0),
            complete_row("Bravo").with("CAC", "$0").with("LTV", 450.0),
        ];
        let records = assemble(&rows).expect("assembles");
        assert_eq!(records[0].ltv_cac_ratio, Some(4.5));
        assert_eq!(records[1].ltv_cac_ratio, None);
    }

    #[test]
    fn data_quality_flags_short_text_and_inverted_market_sizes() {
        let sized = |name: &str, tam: f64, sam: f64, som: f64| {
            complete_row(name)
                .with("TAM", tam)
                .with("SAM", sam)
                .with("SOM", som)
        };
        let rows = vec![
            sized("Alpha", 100.0, 50.0, 10.0),
            sized("Bravo", 100.0, 500.0, 10.0),
            sized("Charlie", 100.0, 50.0, 60.0),
            sized("Tiny", 100.0, 50.0, 10.0),
        ];
        let records = assemble(&rows).expect("assembles");
        assert!(!records[0].data_quality_issues);
        assert!(records[1].data_quality_issues);
        assert!(records[2].data_quality_issues);
        assert!(records[3].data_quality_issues);
    }

    #[test]
    fn duplicate_normalized_headers_keep_the_first_cell() {
        let row = RawRow::new()
            .with("Industry", "Healthcare")
            .with(" industry ", "Retail");
        let record = &assemble(&[row]).expect("assembles")[0];
        assert_eq!(record.industry, "healthtech");
    }
}
