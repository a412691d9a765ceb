//! Tabular import and export for segment records.

pub mod table;

pub use table::{
    read_table, read_table_file, write_segments, write_segments_file, ImportReport, TableError,
    TableOptions,
};
