use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub type GenomicPos = u64;

/// Ordered chromosome identifier: autosomes 1-22 sort numerically,
/// the sex chromosomes sort after all autosomes, X before Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ChromosomeKey {
    Autosome(u8),
    X,
    Y,
}

impl ChromosomeKey {
    /// Number of autosomes in the reference set.
    pub const AUTOSOME_COUNT: u8 = 22;

    pub fn autosome(n: u8) -> Option<Self> {
        if (1..=Self::AUTOSOME_COUNT).contains(&n) {
            Some(ChromosomeKey::Autosome(n))
        } else {
            None
        }
    }

    /// All keys of the reference set in display order.
    pub fn all() -> impl Iterator<Item = ChromosomeKey> {
        (1..=Self::AUTOSOME_COUNT)
            .map(ChromosomeKey::Autosome)
            .chain([ChromosomeKey::X, ChromosomeKey::Y])
    }
}

impl fmt::Display for ChromosomeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChromosomeKey::Autosome(n) => write!(f, "{}", n),
            ChromosomeKey::X => write!(f, "X"),
            ChromosomeKey::Y => write!(f, "Y"),
        }
    }
}

impl FromStr for ChromosomeKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" | "x" => Ok(ChromosomeKey::X),
            "Y" | "y" => Ok(ChromosomeKey::Y),
            other => other
                .parse::<u8>()
                .ok()
                .and_then(ChromosomeKey::autosome)
                .ok_or(()),
        }
    }
}

impl From<ChromosomeKey> for String {
    fn from(key: ChromosomeKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for ChromosomeKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .parse()
            .map_err(|_| format!("invalid chromosome: {:?}", value))
    }
}

/// One normalized DNA-match record. `end > start` is enforced by the
/// normalizer; a Segment is immutable once it enters the working set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub chromosome: ChromosomeKey,
    pub start: GenomicPos,
    pub end: GenomicPos,
    pub label: String,
}

impl Segment {
    pub fn length(&self) -> GenomicPos {
        self.end.saturating_sub(self.start)
    }

    pub fn overlaps(&self, start: GenomicPos, end: GenomicPos) -> bool {
        self.start < end && start < self.end
    }
}

/// Insertion-ordered collection of segments. Layout groups by chromosome
/// and label, but the stored order is what the user entered and is what
/// drives first-appearance color assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSet {
    segments: Vec<Segment>,
}

impl SegmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Distinct labels in order of first appearance.
    pub fn labels(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for segment in &self.segments {
            if !seen.contains(&segment.label.as_str()) {
                seen.push(segment.label.as_str());
            }
        }
        seen
    }

    /// Distinct chromosomes in key order.
    pub fn chromosomes(&self) -> Vec<ChromosomeKey> {
        let mut keys: Vec<ChromosomeKey> =
            self.segments.iter().map(|s| s.chromosome).collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}

impl<'a> IntoIterator for &'a SegmentSet {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl FromIterator<Segment> for SegmentSet {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

/// Configured base-pair length per chromosome. Defaults to the GRCh38
/// reference table; user-editable. A zero length is rejected by
/// `validate` at configuration time and is a hard layout error if it
/// slips through anyway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromosomeLengths {
    lengths: BTreeMap<ChromosomeKey, GenomicPos>,
}

/// GRCh38 chromosome lengths, autosomes 1-22 then X and Y.
const GRCH38_LENGTHS: [GenomicPos; 24] = [
    248_956_422,
    242_193_529,
    198_295_559,
    190_214_555,
    181_538_259,
    170_805_979,
    159_345_973,
    145_138_636,
    138_394_717,
    133_797_422,
    135_086_622,
    133_275_309,
    114_364_328,
    107_043_718,
    101_991_189,
    90_338_345,
    83_257_441,
    80_373_285,
    58_617_616,
    64_444_167,
    46_709_983,
    50_818_468,
    156_040_895,
    57_227_415,
];

impl Default for ChromosomeLengths {
    fn default() -> Self {
        let lengths = ChromosomeKey::all()
            .zip(GRCH38_LENGTHS)
            .collect();
        Self { lengths }
    }
}

impl ChromosomeLengths {
    /// Empty table, no reference defaults.
    pub fn empty() -> Self {
        Self {
            lengths: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: ChromosomeKey) -> Option<GenomicPos> {
        self.lengths.get(&key).copied()
    }

    pub fn contains(&self, key: ChromosomeKey) -> bool {
        self.lengths.contains_key(&key)
    }

    pub fn set(&mut self, key: ChromosomeKey, length: GenomicPos) {
        self.lengths.insert(key, length);
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChromosomeKey, GenomicPos)> + '_ {
        self.lengths.iter().map(|(&k, &v)| (k, v))
    }

    /// Rejects zero-length entries. Called when a user-supplied table is
    /// installed; layout cannot scale an axis against a zero length.
    pub fn validate(&self) -> Result<(), ChromosomeKey> {
        for (&key, &length) in &self.lengths {
            if length == 0 {
                return Err(key);
            }
        }
        Ok(())
    }
}

impl FromIterator<(ChromosomeKey, GenomicPos)> for ChromosomeLengths {
    fn from_iter<I: IntoIterator<Item = (ChromosomeKey, GenomicPos)>>(iter: I) -> Self {
        Self {
            lengths: iter.into_iter().collect(),
        }
    }
}
