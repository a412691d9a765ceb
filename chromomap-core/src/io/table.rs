//! Delimited segment table reader and writer
//!
//! The expected header is `Chr;Start;End;Comparison` (semicolon by
//! default, matching the spreadsheet exports this tool ingests). Header
//! matching is case-insensitive and column order does not matter.
//! Gzipped files are read transparently. Row-level validation failures
//! are collected per row; only a missing column or an unreadable file
//! fails the whole import.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use thiserror::Error;

use crate::normalize::{normalize_batch, RawRecord, RowError};
use crate::types::Segment;

pub const COLUMN_CHR: &str = "Chr";
pub const COLUMN_START: &str = "Start";
pub const COLUMN_END: &str = "End";
pub const COLUMN_LABEL: &str = "Comparison";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("table has no header row")]
    EmptyTable,
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct TableOptions {
    pub delimiter: char,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self { delimiter: ';' }
    }
}

/// Outcome of a table import: normalized segments, per-row failures,
/// and the number of data rows seen.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub segments: Vec<Segment>,
    pub errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Column indices resolved from the header row.
struct ColumnMap {
    chr: usize,
    start: usize,
    end: usize,
    label: usize,
}

impl ColumnMap {
    fn resolve(header: &str, delimiter: char) -> Result<Self, TableError> {
        let names: Vec<&str> = header.split(delimiter).map(str::trim).collect();
        let find = |wanted: &'static str| {
            names
                .iter()
                .position(|name| name.eq_ignore_ascii_case(wanted))
                .ok_or(TableError::MissingColumn(wanted))
        };
        Ok(Self {
            chr: find(COLUMN_CHR)?,
            start: find(COLUMN_START)?,
            end: find(COLUMN_END)?,
            label: find(COLUMN_LABEL)?,
        })
    }
}

/// Read a delimited segment table from any `BufRead` source.
pub fn read_table<R: BufRead>(reader: R, options: &TableOptions) -> Result<ImportReport, TableError> {
    let mut lines = reader.lines().enumerate();

    // First non-empty, non-comment line is the header.
    let columns = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line?;
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                break ColumnMap::resolve(trimmed, options.delimiter)?;
            }
            None => return Err(TableError::EmptyTable),
        }
    };

    let mut records = Vec::new();
    for (index, line) in lines {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(options.delimiter).map(str::trim).collect();
        let field = |i: usize| fields.get(i).copied().unwrap_or_default().to_string();
        records.push(RawRecord {
            row: index + 1, // 1-based file line number
            chromosome: field(columns.chr),
            start: field(columns.start),
            end: field(columns.end),
            label: field(columns.label),
        });
    }

    let rows_read = records.len();
    let outcome = normalize_batch(records);
    if !outcome.errors.is_empty() {
        log::warn!(
            "{} of {} row(s) failed validation",
            outcome.errors.len(),
            rows_read
        );
    }

    Ok(ImportReport {
        segments: outcome.segments,
        errors: outcome.errors,
        rows_read,
    })
}

/// Read a segment table from a file, decompressing `.gz` transparently.
pub fn read_table_file<P: AsRef<Path>>(path: P, options: &TableOptions) -> Result<ImportReport> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    let report = if path.extension().is_some_and(|ext| ext == "gz") {
        read_table(BufReader::new(GzDecoder::new(file)), options)
    } else {
        read_table(BufReader::new(file), options)
    }
    .with_context(|| format!("reading {}", path.display()))?;

    Ok(report)
}

/// Write the normalized segment set as a plain four-column table, no
/// computed geometry.
pub fn write_segments<'a, W, I>(writer: W, segments: I, options: &TableOptions) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Segment>,
{
    let mut writer = BufWriter::new(writer);
    let d = options.delimiter;
    writeln!(
        writer,
        "{}{d}{}{d}{}{d}{}",
        COLUMN_CHR, COLUMN_START, COLUMN_END, COLUMN_LABEL
    )?;
    for segment in segments {
        writeln!(
            writer,
            "{}{d}{}{d}{}{d}{}",
            segment.chromosome, segment.start, segment.end, segment.label
        )?;
    }
    writer.flush()
}

pub fn write_segments_file<'a, P, I>(path: P, segments: I, options: &TableOptions) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a Segment>,
{
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_segments(file, segments, options)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
