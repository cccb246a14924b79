//! Property-based tests using proptest.
//!
//! These tests verify invariants of compression and training.

use proptest::prelude::*;
use sketchtron::prelude::*;
use sketchtron::sketch::{centers_for, MIN_CENTERS_PER_LABEL};

/// Returns the first `k` bucket rows (wrapping), so every center is a real
/// sample of its label.
struct FirstRows;

impl ClusteringOracle for FirstRows {
    fn cluster(&self, x: &Matrix<f32>, k: usize) -> Result<Matrix<f32>> {
        let rows: Vec<usize> = (0..k).map(|i| i % x.n_rows()).collect();
        Ok(x.select_rows(&rows))
    }
}

/// `(row bits, label)` pairs in sorted order, i.e. the multiset of samples.
fn sorted_pairs(ds: &Dataset) -> Vec<(Vec<u32>, usize)> {
    let mut pairs: Vec<(Vec<u32>, usize)> = ds
        .features()
        .rows()
        .zip(ds.labels())
        .map(|(row, &label)| (row.iter().map(|v| v.to_bits()).collect(), label))
        .collect();
    pairs.sort();
    pairs
}

// Labels in 0..n_labels, every label present at least once
fn labeled_strategy(n_labels: usize) -> impl Strategy<Value = Dataset> {
    proptest::collection::vec((0..n_labels, -100.0f32..100.0), 0..40).prop_map(move |extra| {
        let mut y: Vec<usize> = (0..n_labels).collect();
        let mut x1: Vec<f32> = vec![0.0; n_labels];
        for (label, v) in extra {
            y.push(label);
            x1.push(v);
        }
        // first feature encodes the label so pairing can be checked
        let data: Vec<f32> = y
            .iter()
            .zip(&x1)
            .flat_map(|(&label, &v)| [label as f32, v])
            .collect();
        let n = y.len();
        Dataset::new(Matrix::from_vec(n, 2, data).expect("nx2"), y).expect("dataset")
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn centers_follow_floor_formula(len in 0usize..10_000, target in 1usize..5_000, extra in 0usize..10_000) {
        let total = len + extra + 1;
        let k = centers_for(len, target, total).expect("no overflow");
        prop_assert_eq!(k, (len * target / total).max(MIN_CENTERS_PER_LABEL));
    }

    #[test]
    fn compression_sizes_add_up(data in labeled_strategy(4), target in 1usize..60) {
        let sketch = StratifiedCompressor::new(LabelSet::range(4).expect("labels"), FirstRows)
            .compress(&data, target)
            .expect("compression");

        let counts = data.label_counts(&LabelSet::range(4).expect("labels")).expect("counts");
        prop_assert_eq!(&sketch.summary.bucket_sizes, &counts);
        for (&k, &len) in sketch.summary.centers_per_label.iter().zip(&counts) {
            prop_assert_eq!(k, centers_for(len, target, data.len()).expect("sizes"));
        }
        let expected: usize = sketch.summary.centers_per_label.iter().sum();
        prop_assert_eq!(sketch.dataset.len(), expected);
    }

    #[test]
    fn compression_keeps_rows_paired_with_labels(data in labeled_strategy(3), target in 1usize..30, seed in any::<u64>()) {
        let sketch = StratifiedCompressor::new(LabelSet::range(3).expect("labels"), FirstRows)
            .with_random_state(seed)
            .compress(&data, target)
            .expect("compression");
        for (row, &label) in sketch.dataset.features().rows().zip(sketch.dataset.labels()) {
            prop_assert_eq!(row[0], label as f32);
        }

        // same multiset of (row, label) as the centers before the shuffle
        let labels = LabelSet::range(3).expect("labels");
        let mut parts = Vec::new();
        let mut y = Vec::new();
        for (idx, bucket) in data.label_buckets(&labels).expect("buckets").iter().enumerate() {
            let k = centers_for(bucket.n_rows(), target, data.len()).expect("sizes");
            parts.push(FirstRows.cluster(bucket, k).expect("centers"));
            y.extend(std::iter::repeat(labels.label_at(idx)).take(k));
        }
        let unshuffled = Dataset::new(Matrix::vstack(2, &parts).expect("same width"), y)
            .expect("one label per center");
        prop_assert_eq!(sorted_pairs(&sketch.dataset), sorted_pairs(&unshuffled));
    }

    #[test]
    fn compression_is_deterministic(data in labeled_strategy(3), target in 1usize..30) {
        let compressor = StratifiedCompressor::new(LabelSet::range(3).expect("labels"), FirstRows);
        let a = compressor.compress(&data, target).expect("compression");
        let b = compressor.compress(&data, target).expect("compression");
        prop_assert_eq!(a, b);
    }

    #[test]
    fn predictions_are_known_labels(data in labeled_strategy(3), epochs in 0usize..4) {
        let labels = LabelSet::new(vec![0, 1, 2]).expect("labels");
        let mut model = Perceptron::new(labels.clone(), EpochLimit::Bounded(epochs));
        model.fit(data.features(), data.labels()).expect("fit");

        let first = model.predict(data.features()).expect("predict");
        prop_assert_eq!(first.len(), data.len());
        prop_assert!(first.iter().all(|l| labels.index_of(*l).is_some()));
        prop_assert_eq!(model.predict(data.features()).expect("predict"), first);

        let error = model.predict_error(data.features(), data.labels()).expect("error");
        prop_assert!((0.0..=1.0).contains(&error));
    }

    #[test]
    fn error_rate_counts_mismatches(pairs in proptest::collection::vec((0usize..3, 0usize..3), 1..50)) {
        let (pred, truth): (Vec<usize>, Vec<usize>) = pairs.into_iter().unzip();
        let wrong = pred.iter().zip(&truth).filter(|(p, t)| p != t).count();
        let rate = error_rate(&pred, &truth).expect("same length");
        prop_assert!((rate - wrong as f32 / pred.len() as f32).abs() < 1e-6);
    }
}
