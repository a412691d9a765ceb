//! Session context
//!
//! Owns everything that survives across renders: the working segment
//! set, the chromosome-length configuration, the layout parameters, and
//! the label color assignments. Created at session start, cleared on
//! explicit reset. Single-threaded: callers serialize mutations against
//! renders.

use crate::color::ColorAssignment;
use crate::layout::{compute_layout, LayoutError, LayoutFilter, LayoutParams, LayoutResult};
use crate::normalize::{normalize, normalize_batch, BatchOutcome, RawRecord, ValidationError};
use crate::types::{ChromosomeKey, ChromosomeLengths, GenomicPos, Segment, SegmentSet};

#[derive(Debug, Clone, Default)]
pub struct Session {
    segments: SegmentSet,
    lengths: ChromosomeLengths,
    colors: ColorAssignment,
    params: LayoutParams,
}

impl Session {
    /// Fresh session with the built-in reference length table.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lengths(lengths: ChromosomeLengths) -> Self {
        Self {
            lengths,
            ..Self::default()
        }
    }

    pub fn segments(&self) -> &SegmentSet {
        &self.segments
    }

    pub fn lengths(&self) -> &ChromosomeLengths {
        &self.lengths
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    pub fn set_params(&mut self, params: LayoutParams) {
        self.params = params;
    }

    /// Normalize one manually entered row and append it.
    pub fn add_record(&mut self, raw: &RawRecord) -> Result<(), ValidationError> {
        let segment = normalize(raw)?;
        self.segments.push(segment);
        Ok(())
    }

    pub fn add_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Import a batch of rows. Valid rows are appended; failures are
    /// returned for reporting and never abort the batch.
    pub fn import<I>(&mut self, records: I) -> BatchOutcome
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let outcome = normalize_batch(records);
        for segment in &outcome.segments {
            self.segments.push(segment.clone());
        }
        outcome
    }

    /// Clear-all: drops the working set and every color assignment.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.colors.reset();
    }

    /// Edit one entry of the chromosome-length configuration. Zero is
    /// rejected here so layout never sees it.
    pub fn set_length(
        &mut self,
        key: ChromosomeKey,
        length: GenomicPos,
    ) -> Result<(), LayoutError> {
        if length == 0 {
            return Err(LayoutError::Configuration { chromosome: key });
        }
        self.lengths.set(key, length);
        Ok(())
    }

    /// Replace the whole length table; fails if any entry is zero. On
    /// failure the previous table stays installed.
    pub fn set_lengths(&mut self, lengths: ChromosomeLengths) -> Result<(), LayoutError> {
        if let Err(chromosome) = lengths.validate() {
            return Err(LayoutError::Configuration { chromosome });
        }
        self.lengths = lengths;
        Ok(())
    }

    /// Recompute the layout for the current state. Color assignments
    /// for labels no longer in the working set are forgotten first, so
    /// a removed-and-readded label counts as a new first appearance;
    /// labels that are merely filtered out keep their colors.
    pub fn render(&mut self, filter: &LayoutFilter) -> Result<LayoutResult, LayoutError> {
        let present: Vec<String> = self
            .segments
            .labels()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.colors
            .retain(|label| present.iter().any(|p| p == label));

        compute_layout(
            &self.segments,
            &self.lengths,
            filter,
            &mut self.colors,
            &self.params,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(row: usize, chromosome: &str, start: &str, end: &str, label: &str) -> RawRecord {
        RawRecord {
            row,
            chromosome: chromosome.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn add_and_render() {
        let mut session = Session::new();
        session
            .add_record(&raw(1, "1", "1.000.000", "2.000.000", "cousin"))
            .unwrap();
        let result = session.render(&LayoutFilter::default()).unwrap();
        assert_eq!(result.rectangles.len(), 1);
        assert_eq!(result.legend[0].label, "cousin");
    }

    #[test]
    fn import_partial_failure_keeps_valid_rows() {
        let mut session = Session::new();
        let outcome = session.import(vec![
            raw(2, "1", "100", "200", "a"),
            raw(3, "1", "900", "200", "a"),
            raw(4, "2", "100", "200", "b"),
        ]);
        assert_eq!(outcome.segments.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(session.segments().len(), 2);
    }

    #[test]
    fn clear_resets_segments_and_colors() {
        let mut session = Session::new();
        session.add_record(&raw(1, "1", "100", "200", "a")).unwrap();
        let first = session.render(&LayoutFilter::default()).unwrap();
        session.clear();
        assert!(session.segments().is_empty());
        session.add_record(&raw(1, "1", "100", "200", "z")).unwrap();
        let second = session.render(&LayoutFilter::default()).unwrap();
        // New session contents restart the color sequence.
        assert_eq!(second.legend[0].color, first.legend[0].color);
    }

    #[test]
    fn set_length_rejects_zero_and_keeps_state() {
        let mut session = Session::new();
        let before = session.lengths().get(ChromosomeKey::Autosome(1));
        assert!(session.set_length(ChromosomeKey::Autosome(1), 0).is_err());
        assert_eq!(session.lengths().get(ChromosomeKey::Autosome(1)), before);
        session
            .set_length(ChromosomeKey::Autosome(1), 42)
            .unwrap();
        assert_eq!(session.lengths().get(ChromosomeKey::Autosome(1)), Some(42));
    }

    #[test]
    fn filtered_label_keeps_color_but_removed_label_does_not() {
        let mut session = Session::new();
        session.add_record(&raw(1, "1", "100", "200", "a")).unwrap();
        session.add_record(&raw(2, "1", "300", "400", "b")).unwrap();

        let all = session.render(&LayoutFilter::default()).unwrap();
        let b_color = all
            .legend
            .iter()
            .find(|e| e.label == "b")
            .unwrap()
            .color;

        // Filtering is presentation-time: "b" keeps its color.
        let only_a = LayoutFilter {
            chromosomes: None,
            labels: Some(["a".to_string()].into_iter().collect()),
        };
        session.render(&only_a).unwrap();
        let again = session.render(&LayoutFilter::default()).unwrap();
        assert_eq!(
            again.legend.iter().find(|e| e.label == "b").unwrap().color,
            b_color
        );

        // Clearing and re-adding "b" alone is a new first appearance:
        // it takes the first palette slot now.
        session.clear();
        session.add_record(&raw(3, "1", "100", "200", "b")).unwrap();
        let fresh = session.render(&LayoutFilter::default()).unwrap();
        assert_eq!(fresh.legend[0].label, "b");
        assert_ne!(fresh.legend[0].color, b_color);
    }
}
