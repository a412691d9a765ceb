//! Segment normalization
//!
//! Turns raw text rows (file upload or manual entry) into validated
//! `Segment` values. Coordinates may carry `.` or `,` grouping
//! separators ("1.234.567") and chromosome tokens may arrive as float
//! text with a trailing ".0" ("3.0"); both conventions come from the
//! spreadsheet exports this tool ingests.

use thiserror::Error;

use crate::types::{ChromosomeKey, GenomicPos, Segment};

/// Per-row normalization failure. Carries the offending field so the
/// caller can point the user at the exact cell.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid coordinate in field '{field}': {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },
    #[error("invalid chromosome: {value:?} (expected 1-22, X, or Y)")]
    InvalidChromosome { value: String },
    #[error("invalid range: end ({end}) must be greater than start ({start})")]
    InvalidRange { start: GenomicPos, end: GenomicPos },
    #[error("comparison label must not be empty")]
    EmptyLabel,
}

/// One raw input row with its 1-based source row number, fields still
/// as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub row: usize,
    pub chromosome: String,
    pub start: String,
    pub end: String,
    pub label: String,
}

/// A rejected row paired with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub row: usize,
    pub error: ValidationError,
}

/// Outcome of a batch normalization: valid rows survive, invalid rows
/// are collected. A bad row never aborts the batch.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub segments: Vec<Segment>,
    pub errors: Vec<RowError>,
}

/// Parse a base-pair coordinate, stripping `.` and `,` grouping
/// separators first. Anything left that is not a digit is an error.
pub fn parse_coordinate(field: &'static str, text: &str) -> Result<GenomicPos, ValidationError> {
    let invalid = || ValidationError::InvalidCoordinate {
        field,
        value: text.to_string(),
    };

    let digits: String = text
        .trim()
        .chars()
        .filter(|&c| c != '.' && c != ',')
        .collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    digits.parse::<GenomicPos>().map_err(|_| invalid())
}

/// Parse a chromosome token: 1-22, X, or Y. Numeric tokens arriving as
/// float text with a trailing ".0" are coerced ("3.0" -> 3); any other
/// fractional text is rejected.
pub fn parse_chromosome(token: &str) -> Result<ChromosomeKey, ValidationError> {
    let trimmed = token.trim();
    // Coerce only numeric float-text: "3.0" but never "X.0".
    let coerced = match trimmed.strip_suffix(".0") {
        Some(prefix) if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) => prefix,
        _ => trimmed,
    };

    coerced
        .parse()
        .map_err(|_| ValidationError::InvalidChromosome {
            value: token.to_string(),
        })
}

/// Normalize one raw row into a `Segment`. Pure: same input, same
/// output or same error.
pub fn normalize(raw: &RawRecord) -> Result<Segment, ValidationError> {
    let chromosome = parse_chromosome(&raw.chromosome)?;
    let start = parse_coordinate("Start", &raw.start)?;
    let end = parse_coordinate("End", &raw.end)?;

    if end <= start {
        return Err(ValidationError::InvalidRange { start, end });
    }

    let label = raw.label.trim();
    if label.is_empty() {
        return Err(ValidationError::EmptyLabel);
    }

    Ok(Segment {
        chromosome,
        start,
        end,
        label: label.to_string(),
    })
}

/// Normalize a batch of rows with partial-failure semantics.
pub fn normalize_batch<I>(records: I) -> BatchOutcome
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut outcome = BatchOutcome::default();
    for record in records {
        match normalize(&record) {
            Ok(segment) => outcome.segments.push(segment),
            Err(error) => outcome.errors.push(RowError {
                row: record.row,
                error,
            }),
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(chromosome: &str, start: &str, end: &str, label: &str) -> RawRecord {
        RawRecord {
            row: 1,
            chromosome: chromosome.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn coordinate_strips_grouping_separators() {
        assert_eq!(parse_coordinate("Start", "1.234.567"), Ok(1_234_567));
        assert_eq!(parse_coordinate("Start", "12,000"), Ok(12_000));
        assert_eq!(parse_coordinate("Start", " 42 "), Ok(42));
        assert_eq!(parse_coordinate("Start", "0"), Ok(0));
    }

    #[test]
    fn coordinate_rejects_residual_garbage() {
        for bad in ["", "  ", "12a", "1.2e6", "-5", "12 000", "."] {
            let err = parse_coordinate("End", bad).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidCoordinate { field: "End", .. }),
                "expected InvalidCoordinate for {:?}, got {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn chromosome_accepts_reference_tokens() {
        assert_eq!(parse_chromosome("1"), Ok(ChromosomeKey::Autosome(1)));
        assert_eq!(parse_chromosome("22"), Ok(ChromosomeKey::Autosome(22)));
        assert_eq!(parse_chromosome("x"), Ok(ChromosomeKey::X));
        assert_eq!(parse_chromosome("Y"), Ok(ChromosomeKey::Y));
    }

    #[test]
    fn chromosome_coerces_trailing_point_zero_only() {
        assert_eq!(parse_chromosome("3.0"), Ok(ChromosomeKey::Autosome(3)));
        assert!(parse_chromosome("3.5").is_err());
        assert!(parse_chromosome("3.00").is_err());
        // Coercion applies to numeric tokens only.
        assert!(parse_chromosome("X.0").is_err());
        assert!(parse_chromosome(".0").is_err());
        assert!(parse_chromosome("23").is_err());
        assert!(parse_chromosome("chr1").is_err());
    }

    #[test]
    fn normalize_valid_row() {
        let segment = normalize(&raw("7", "1.000.000", "2.500.000", "cousin A")).unwrap();
        assert_eq!(segment.chromosome, ChromosomeKey::Autosome(7));
        assert_eq!(segment.start, 1_000_000);
        assert_eq!(segment.end, 2_500_000);
        assert_eq!(segment.label, "cousin A");
    }

    #[test]
    fn normalize_rejects_inverted_range() {
        let err = normalize(&raw("1", "5000", "4000", "a")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidRange {
                start: 5000,
                end: 4000
            }
        );
        // Equal endpoints are just as invalid; never silently swapped.
        assert!(matches!(
            normalize(&raw("1", "5000", "5000", "a")),
            Err(ValidationError::InvalidRange { .. })
        ));
    }

    #[test]
    fn normalize_rejects_blank_label() {
        assert_eq!(
            normalize(&raw("1", "100", "200", "   ")),
            Err(ValidationError::EmptyLabel)
        );
    }

    #[test]
    fn batch_keeps_valid_rows_and_reports_bad_ones() {
        let records = vec![
            RawRecord {
                row: 2,
                ..raw("1", "100", "200", "a")
            },
            RawRecord {
                row: 3,
                ..raw("bad", "100", "200", "a")
            },
            RawRecord {
                row: 4,
                ..raw("2", "300", "900", "b")
            },
        ];

        let outcome = normalize_batch(records);
        assert_eq!(outcome.segments.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].row, 3);
        assert!(matches!(
            outcome.errors[0].error,
            ValidationError::InvalidChromosome { .. }
        ));
    }
}
