//! Facet result merging
//!
//! Facet counts are produced independently per requested dimension; merging
//! folds them into a single table ordered by dimension name, with counts of
//! the same label summed.

use crate::models::response::{FacetCount, FacetDimensionResult};
use std::collections::BTreeMap;

/// Merge per-dimension facet counts into one ordered result table
///
/// Counts within a dimension order by descending count, label as tiebreak.
pub fn merge_facets(results: Vec<(String, Vec<FacetCount>)>) -> Vec<FacetDimensionResult> {
    let mut merged: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
    for (dimension, counts) in results {
        let labels = merged.entry(dimension).or_default();
        for count in counts {
            *labels.entry(count.label).or_insert(0) += count.count;
        }
    }

    merged
        .into_iter()
        .map(|(dimension, labels)| {
            let mut counts: Vec<FacetCount> = labels
                .into_iter()
                .map(|(label, count)| FacetCount { label, count })
                .collect();
            counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
            FacetDimensionResult { dimension, counts }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_orders_by_dimension() {
        let merged = merge_facets(vec![
            ("year".to_string(), vec![FacetCount::new("2024", 3)]),
            ("category".to_string(), vec![FacetCount::new("books", 5)]),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].dimension, "category");
        assert_eq!(merged[1].dimension, "year");
    }

    #[test]
    fn test_merge_sums_duplicate_labels() {
        let merged = merge_facets(vec![
            ("category".to_string(), vec![FacetCount::new("books", 2)]),
            (
                "category".to_string(),
                vec![FacetCount::new("books", 3), FacetCount::new("music", 4)],
            ),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].counts[0], FacetCount::new("books", 5));
        assert_eq!(merged[0].counts[1], FacetCount::new("music", 4));
    }

    #[test]
    fn test_counts_order_descending_with_label_tiebreak() {
        let merged = merge_facets(vec![(
            "tag".to_string(),
            vec![
                FacetCount::new("b", 2),
                FacetCount::new("a", 2),
                FacetCount::new("c", 7),
            ],
        )]);
        let labels: Vec<&str> = merged[0].counts.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_facets(Vec::new()).is_empty());
    }
}
