//! Layout engine
//!
//! Takes the current segment set, the configured chromosome lengths,
//! and the active filters, and computes render-ready geometry: one
//! vertical slot per displayed chromosome, one rectangle per visible
//! segment, axis bounds, the legend color map, and per-(label,
//! chromosome) coverage statistics. The result is a pure value; drawing
//! and export are separate consumers.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

use crate::color::{Color, ColorAssignment};
use crate::types::{ChromosomeKey, ChromosomeLengths, GenomicPos, Segment, SegmentSet};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("configuration error: chromosome {chromosome} has a non-positive configured length")]
    Configuration { chromosome: ChromosomeKey },
}

/// Geometry parameters. Slot centers sit at
/// `slot_index * (slot_unit + slot_gap)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutParams {
    /// Height of one chromosome slot in layout units.
    pub slot_unit: f64,
    /// Vertical gap between adjacent slots.
    pub slot_gap: f64,
    /// Multiplier on the longest displayed chromosome for the x-axis
    /// upper bound.
    pub axis_margin: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            slot_unit: 1.0,
            slot_gap: 0.5,
            axis_margin: 1.05,
        }
    }
}

/// Presentation-time filters. `None` means "everything present".
/// Filtering never deletes segments from the working set.
#[derive(Debug, Clone, Default)]
pub struct LayoutFilter {
    pub chromosomes: Option<BTreeSet<ChromosomeKey>>,
    pub labels: Option<HashSet<String>>,
}

impl LayoutFilter {
    pub fn accepts(&self, segment: &Segment) -> bool {
        let chromosome_ok = self
            .chromosomes
            .as_ref()
            .map_or(true, |set| set.contains(&segment.chromosome));
        let label_ok = self
            .labels
            .as_ref()
            .map_or(true, |set| set.contains(&segment.label));
        chromosome_ok && label_ok
    }
}

/// One displayed chromosome and its vertical slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromosomeSlot {
    pub key: ChromosomeKey,
    pub slot_index: usize,
    pub length: GenomicPos,
    pub y_center: f64,
    pub y_bottom: f64,
    pub y_top: f64,
}

/// One visible segment rectangle in data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRect {
    pub chromosome: ChromosomeKey,
    pub label: String,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    /// Index of the source segment in the working set, for hit testing.
    pub segment_index: usize,
}

/// Legend entry, in color-assignment (first appearance) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

/// Coverage of one label on one chromosome. `coverage_pct` is the raw
/// sum of segment lengths over the chromosome length; overlapping
/// segments can push it past 100, which is surfaced as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageStat {
    pub label: String,
    pub chromosome: ChromosomeKey,
    pub segment_count: usize,
    pub total_length: GenomicPos,
    pub coverage_pct: f64,
}

/// Derived, render-ready view of the current state. Recomputed on every
/// render, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutResult {
    pub chromosomes: Vec<ChromosomeSlot>,
    pub rectangles: Vec<SegmentRect>,
    pub x_min: f64,
    pub x_max: f64,
    pub legend: Vec<LegendEntry>,
    pub stats: Vec<CoverageStat>,
    /// Segments excluded because their chromosome is absent from the
    /// length table. A warning-level tally, never fatal.
    pub dropped: usize,
}

impl LayoutResult {
    pub fn is_empty(&self) -> bool {
        self.rectangles.is_empty()
    }

    pub fn displayed_chromosomes(&self) -> impl Iterator<Item = ChromosomeKey> + '_ {
        self.chromosomes.iter().map(|slot| slot.key)
    }
}

/// Compute the layout for the current working set.
///
/// Empty input (or filters that exclude everything) yields an empty
/// `LayoutResult`, not an error. The only failure is a kept segment
/// referencing a chromosome configured with length zero.
pub fn compute_layout(
    segments: &SegmentSet,
    lengths: &ChromosomeLengths,
    filter: &LayoutFilter,
    colors: &mut ColorAssignment,
    params: &LayoutParams,
) -> Result<LayoutResult, LayoutError> {
    // Filter, dropping segments whose chromosome has no configured
    // length. Input order is preserved; it drives color assignment.
    let mut kept: Vec<(usize, &Segment)> = Vec::new();
    let mut dropped = 0usize;
    for (index, segment) in segments.iter().enumerate() {
        if !filter.accepts(segment) {
            continue;
        }
        if !lengths.contains(segment.chromosome) {
            dropped += 1;
            continue;
        }
        kept.push((index, segment));
    }

    if dropped > 0 {
        log::warn!(
            "{} segment(s) reference chromosomes absent from the length table and were dropped",
            dropped
        );
    }

    if kept.is_empty() {
        return Ok(LayoutResult {
            dropped,
            ..LayoutResult::default()
        });
    }

    // Displayed chromosomes: sorted distinct among kept segments. A
    // selected chromosome with no kept segments never gets a slot.
    let displayed: Vec<ChromosomeKey> = kept
        .iter()
        .map(|(_, s)| s.chromosome)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    for &key in &displayed {
        let length = lengths.get(key).unwrap_or(0);
        if length == 0 {
            return Err(LayoutError::Configuration { chromosome: key });
        }
    }

    // Vertical slots in chromosome order.
    let pitch = params.slot_unit + params.slot_gap;
    let slots: Vec<ChromosomeSlot> = displayed
        .iter()
        .enumerate()
        .map(|(slot_index, &key)| {
            let y_center = slot_index as f64 * pitch;
            ChromosomeSlot {
                key,
                slot_index,
                length: lengths.get(key).unwrap_or(0),
                y_center,
                y_bottom: y_center - params.slot_unit / 2.0,
                y_top: y_center + params.slot_unit / 2.0,
            }
        })
        .collect();

    // Colors in first-appearance order within the filtered set.
    let mut legend: Vec<LegendEntry> = Vec::new();
    for (_, segment) in &kept {
        if !legend.iter().any(|entry| entry.label == segment.label) {
            legend.push(LegendEntry {
                label: segment.label.clone(),
                color: colors.color_for(&segment.label),
            });
        }
    }

    // Rectangles: within each slot, one horizontal band per label
    // present on that chromosome, so different labels never overlap
    // vertically. Same-label segments share a band and may overlap in
    // x; they are drawn unmerged.
    let mut rectangles: Vec<SegmentRect> = Vec::new();
    let mut stats: Vec<CoverageStat> = Vec::new();

    for slot in &slots {
        let on_chromosome: Vec<&(usize, &Segment)> = kept
            .iter()
            .filter(|(_, s)| s.chromosome == slot.key)
            .collect();

        let mut band_labels: Vec<&str> = Vec::new();
        for (_, segment) in &on_chromosome {
            if !band_labels.contains(&segment.label.as_str()) {
                band_labels.push(segment.label.as_str());
            }
        }

        let band_height = params.slot_unit / band_labels.len() as f64;

        for &&(index, segment) in &on_chromosome {
            let band = band_labels
                .iter()
                .position(|&label| label == segment.label)
                .unwrap_or(0);
            let y0 = slot.y_bottom + band as f64 * band_height;
            rectangles.push(SegmentRect {
                chromosome: segment.chromosome,
                label: segment.label.clone(),
                x0: segment.start as f64,
                x1: segment.end as f64,
                y0,
                y1: y0 + band_height,
                segment_index: index,
            });
        }

        // Stats rows in chromosome order, labels in band order.
        for label in band_labels {
            let mut segment_count = 0usize;
            let mut total_length: GenomicPos = 0;
            for (_, segment) in &on_chromosome {
                if segment.label == label {
                    segment_count += 1;
                    total_length += segment.length();
                }
            }
            stats.push(CoverageStat {
                label: label.to_string(),
                chromosome: slot.key,
                segment_count,
                total_length,
                coverage_pct: total_length as f64 / slot.length as f64 * 100.0,
            });
        }
    }

    let max_length = slots.iter().map(|slot| slot.length).max().unwrap_or(0);
    let x_max = max_length as f64 * params.axis_margin;

    Ok(LayoutResult {
        chromosomes: slots,
        rectangles,
        x_min: 0.0,
        x_max,
        legend,
        stats,
        dropped,
    })
}
