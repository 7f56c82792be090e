//! Normalization pipeline: raw tabular rows in, canonical idea records out.

mod assembler;
pub mod domain;
mod extract;
mod mapping;
mod normalizer;
mod parser;
mod terms;

pub use domain::{BusinessModel, CanonicalRecord, Industry, QualitativeNotes, RawRow, RawValue};
pub use extract::{extract_boolean, extract_rating, parse_amount, parse_magnitude};
pub use terms::{standardize, TermDomain};

use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("failed to read idea export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("input contains no rows")]
    NoRows,
    #[error("input contains no usable columns")]
    NoUsableColumns,
}

/// Normalizes an arbitrary column header the same way ingestion does.
pub fn normalize_column_name(value: &str) -> String {
    normalizer::normalize_column_name(value)
}

/// Runs the full normalization pipeline over an in-memory batch.
pub fn assemble_records(rows: &[RawRow]) -> Result<Vec<CanonicalRecord>, IngestionError> {
    let records = assembler::assemble(rows)?;
    let flagged = records
        .iter()
        .filter(|record| record.data_quality_issues)
        .count();
    info!(rows = records.len(), flagged, "idea batch normalized");
    Ok(records)
}

/// Entry point for CSV exports of idea portfolios.
pub struct IdeaImporter;

impl IdeaImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CanonicalRecord>, IngestionError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CanonicalRecord>, IngestionError> {
        let rows = Self::rows_from_reader(reader)?;
        assemble_records(&rows)
    }

    /// Parses without assembling, for callers that keep the raw rows around.
    pub fn rows_from_reader<R: Read>(reader: R) -> Result<Vec<RawRow>, IngestionError> {
        Ok(parser::parse_rows(reader)?)
    }
}
