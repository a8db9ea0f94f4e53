//! Core rate abstractions and transforms

pub mod config;
pub mod fetch;
pub mod log;
pub mod rate;
pub mod series;
pub mod source;
pub mod table;

// Re-export main types for cleaner imports
pub use fetch::{FetchOutcome, fetch_all};
pub use rate::{Rate, RateClass};
pub use series::{Observation, RateSeries};
pub use source::SeriesSource;
pub use table::RateTable;
