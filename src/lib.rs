pub mod batch;
pub mod cli;
pub mod normalize;

pub use batch::{BatchOutcome, normalize_all, read_date_strings, write_error_log, write_results};
pub use normalize::{
    DateRange, NormalizationResult, NormalizeError, Normalizer, PatternRegistry, PatternSpec,
    RangeParser, SaneYearWindow, clean_date_text, normalize,
};
