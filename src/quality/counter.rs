//! Per-task label diversity.

use std::collections::HashSet;

use crate::provider::Annotation;

/// Count the distinct `label` values among a task's annotations.
///
/// Labels are compared exactly; no case folding or trimming.
pub fn count_unique_labels(annotations: &[Annotation]) -> usize {
    annotations
        .iter()
        .map(|a| a.label.as_str())
        .collect::<HashSet<_>>()
        .len()
}
