//! Pure source-text analyzers used by the analysis tools

pub mod duplicates;
pub mod metrics;

pub use duplicates::{
    DEFAULT_MIN_LINES, DISPLAY_LIMIT, DuplicateBlock, DuplicateError, DuplicateReport,
    find_duplicates, split_lines,
};
pub use metrics::{ComplexityRating, ComplexityReport, LineCounts, analyze_complexity, count_lines};
