//! ChromoMap Core Library
//!
//! Layout and rendering engine for chromosome maps: segment
//! normalization, slot/rectangle geometry, stable color assignment,
//! coverage statistics, and tabular import/export. Drawing and UI live
//! in external consumers of `LayoutResult`.

pub mod color;
pub mod io;
pub mod layout;
pub mod normalize;
pub mod session;
pub mod types;

// Re-export commonly used types and functions
pub use color::{Color, ColorAssignment};
pub use layout::{
    compute_layout, CoverageStat, LayoutError, LayoutFilter, LayoutParams, LayoutResult,
};
pub use normalize::{normalize, normalize_batch, RawRecord, RowError, ValidationError};
pub use session::Session;
pub use types::{ChromosomeKey, ChromosomeLengths, GenomicPos, Segment, SegmentSet};

/// Version information for the chromomap core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
