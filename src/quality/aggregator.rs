//! Project-level average of unique label counts.

/// Accumulates per-task unique label counts for one project.
///
/// The average is the ceiling of the arithmetic mean, so it is always a
/// whole number of labels and never understates the mean.
#[derive(Debug, Clone, Default)]
pub struct LabelAggregator {
    sum: u64,
    count: u64,
}

impl LabelAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one task's unique label count.
    pub fn record(&mut self, num_unique_labels: u64) {
        self.sum += num_unique_labels;
        self.count += 1;
    }

    /// Number of tasks recorded.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of all recorded counts.
    pub fn sum(&self) -> u64 {
        self.sum
    }

    /// `ceil(sum / count)`, or 0 when nothing was recorded.
    pub fn average(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }
        self.sum.div_ceil(self.count)
    }
}

impl FromIterator<u64> for LabelAggregator {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut aggregator = Self::new();
        for n in iter {
            aggregator.record(n);
        }
        aggregator
    }
}
