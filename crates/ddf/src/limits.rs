//! Limits and fixed constants of the DDF format.

/// Format version written when a document carries no version of its own.
pub const FORMAT_VERSION: f64 = 2.0;

/// Version value of a document that has not been given one.
pub const UNSET_VERSION: f64 = -1.0;

/// Maximum sequence nesting inspected before classification aborts.
pub const MAX_NESTING_DEPTH: usize = 10;

/// Deepest nesting that maps to a storable dimension (matrix).
pub const MAX_DIMENSION_DEPTH: usize = 2;

/// Description length shown by short variable summaries.
pub const DESCRIPTION_PREVIEW_LEN: usize = 20;

/// Cell width at which the summary table trims values and descriptions.
pub const SHOW_CELL_LEN: usize = 45;

/// Message returned by [`crate::Document::last_error`] when the log is empty.
pub const NO_ERRORS: &str = "No errors";

/// Characters separating tokens on a line.
pub const TOKEN_DELIMITERS: &str = " \t";

/// Minimum number of spaces between columns of a vertical block.
pub const VERTICAL_COLUMN_GAP: usize = 2;
