//! Boundary adapters from coder output files to a [`RatingTable`].
//!
//! [`RatingTable`]: crate::core::RatingTable

pub mod flatten;
pub mod loader;
pub mod parse;

pub use flatten::{flatten_csv_row, flatten_record, FlatRecord};
pub use loader::{build_table, load_rater_dir, RaterResults};
pub use parse::{parse_rating, parse_rating_str, ParsedRating};
