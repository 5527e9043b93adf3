use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::corpus::ArticleRow;

/// Stratified train/test split on the grade label. Per-label row indices are
/// shuffled with a single seeded RNG and the rounded test fraction of each
/// label goes to the test table, so per-label proportions track the input and
/// membership is reproducible for identical input and seed. Rows keep their
/// input order inside each output table.
pub fn stratified_split(
    rows: Vec<ArticleRow>,
    test_fraction: f64,
    seed: u64,
) -> (Vec<ArticleRow>, Vec<ArticleRow>) {
    let mut by_label: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, row) in rows.iter().enumerate() {
        by_label.entry(row.grade).or_default().push(i);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut in_test = vec![false; rows.len()];
    for indices in by_label.values_mut() {
        indices.shuffle(&mut rng);
        let n_test = (indices.len() as f64 * test_fraction).round() as usize;
        for &i in indices.iter().take(n_test) {
            in_test[i] = true;
        }
    }

    let mut train = Vec::new();
    let mut test = Vec::new();
    for (i, row) in rows.into_iter().enumerate() {
        if in_test[i] {
            test.push(row);
        } else {
            train.push(row);
        }
    }
    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::value_counts;

    fn make_rows() -> Vec<ArticleRow> {
        let mut rows = Vec::new();
        for i in 0..100 {
            rows.push(ArticleRow {
                slug: format!("a-{}", i),
                text: String::new(),
                grade: 3,
                lexile: 500.0 + i as f64,
            });
        }
        for i in 0..50 {
            rows.push(ArticleRow {
                slug: format!("b-{}", i),
                text: String::new(),
                grade: 7,
                lexile: 900.0 + i as f64,
            });
        }
        rows
    }

    fn membership(rows: &[ArticleRow]) -> Vec<String> {
        let mut slugs: Vec<String> = rows.iter().map(|r| r.slug.clone()).collect();
        slugs.sort();
        slugs
    }

    #[test]
    fn per_label_test_counts_are_rounded_fraction() {
        let (train, test) = stratified_split(make_rows(), 0.2, 42);
        let train_counts = value_counts(&train);
        let test_counts = value_counts(&test);
        assert_eq!(test_counts[&3], 20);
        assert_eq!(test_counts[&7], 10);
        assert_eq!(train_counts[&3], 80);
        assert_eq!(train_counts[&7], 40);
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let (train_a, test_a) = stratified_split(make_rows(), 0.2, 42);
        let (train_b, test_b) = stratified_split(make_rows(), 0.2, 42);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
    }

    #[test]
    fn different_seed_changes_membership() {
        let (_, test_a) = stratified_split(make_rows(), 0.2, 42);
        let (_, test_b) = stratified_split(make_rows(), 0.2, 43);
        assert_ne!(membership(&test_a), membership(&test_b));
    }

    #[test]
    fn disjoint_and_union_equals_input() {
        let rows = make_rows();
        let all = membership(&rows);
        let (train, test) = stratified_split(rows, 0.2, 42);

        let train_slugs = membership(&train);
        let test_slugs = membership(&test);
        assert!(train_slugs.iter().all(|s| !test_slugs.contains(s)));

        let mut combined = [train_slugs, test_slugs].concat();
        combined.sort();
        assert_eq!(combined, all);
    }

    #[test]
    fn train_fraction_tracks_full_table() {
        let rows = make_rows();
        let full_counts = value_counts(&rows);
        let total: usize = full_counts.values().sum();
        let (train, _) = stratified_split(rows, 0.2, 42);
        let train_counts = value_counts(&train);
        let train_total: usize = train_counts.values().sum();

        for (label, &count) in &full_counts {
            let full_frac = count as f64 / total as f64;
            let train_frac = train_counts[label] as f64 / train_total as f64;
            assert!((full_frac - train_frac).abs() < 0.02);
        }
    }
}
