//! Label-variety quality checks.
//!
//! Counts unique labels per task, averages them over the project and flags
//! the tasks that fall below that average.

mod aggregator;
mod classifier;
mod counter;

pub use aggregator::LabelAggregator;
pub use classifier::{classify, OutputRecord};
pub use counter::count_unique_labels;
