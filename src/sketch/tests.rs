use super::*;
use crate::cluster::KMeans;
use std::sync::Mutex;

/// Returns bucket rows `0, 1, ..., k-1` (wrapping), recording every call.
#[derive(Default)]
struct CyclingOracle {
    calls: Mutex<Vec<(usize, usize)>>,
}

impl ClusteringOracle for CyclingOracle {
    fn cluster(&self, x: &Matrix<f32>, k: usize) -> Result<Matrix<f32>> {
        self.calls
            .lock()
            .expect("oracle mutex poisoned")
            .push((x.n_rows(), k));
        let rows: Vec<usize> = (0..k).map(|i| i % x.n_rows()).collect();
        Ok(x.select_rows(&rows))
    }
}

/// Ignores the requested count.
struct ShortOracle;

impl ClusteringOracle for ShortOracle {
    fn cluster(&self, x: &Matrix<f32>, _k: usize) -> Result<Matrix<f32>> {
        Ok(x.select_rows(&[0]))
    }
}

struct FailingOracle;

impl ClusteringOracle for FailingOracle {
    fn cluster(&self, _x: &Matrix<f32>, _k: usize) -> Result<Matrix<f32>> {
        Err("oracle exploded".into())
    }
}

/// Labels 0..3 with 6, 3 and 1 samples; feature = (label, row index).
fn skewed_dataset() -> Dataset {
    let y = vec![0, 1, 0, 0, 2, 1, 0, 0, 1, 0];
    let data: Vec<f32> = y
        .iter()
        .enumerate()
        .flat_map(|(i, &l)| [l as f32, i as f32])
        .collect();
    Dataset::new(Matrix::from_vec(10, 2, data).expect("10x2"), y).expect("10 labels")
}

fn separable_dataset() -> Dataset {
    let x = Matrix::from_vec(
        10,
        2,
        vec![
            1.0, 0.0, 2.0, 1.0, 3.0, -1.0, 4.0, 0.5, 5.0, -0.5, -1.0, 0.0, -2.0, 1.0, -3.0, -1.0,
            -4.0, 0.5, -5.0, -0.5,
        ],
    )
    .expect("10x2");
    Dataset::new(x, vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1]).expect("10 labels")
}

#[test]
fn test_centers_for_floor_and_minimum() {
    assert_eq!(centers_for(6, 10, 10).expect("sizes"), 6);
    assert_eq!(centers_for(6, 5, 10).expect("sizes"), 3);
    assert_eq!(centers_for(3, 5, 10).expect("sizes"), 2);
    assert_eq!(centers_for(1, 5, 10).expect("sizes"), 2);
    assert_eq!(centers_for(7, 3, 10).expect("sizes"), 2);
    assert_eq!(centers_for(9, 3, 10).expect("sizes"), 2);
    assert_eq!(centers_for(10, 3, 10).expect("sizes"), 3);
}

#[test]
fn test_centers_for_errors() {
    assert!(centers_for(1, 1, 0).is_err());
    assert!(centers_for(usize::MAX, 2, 10).is_err());
}

#[test]
fn test_end_to_end_two_centers_per_label() {
    let labels = LabelSet::range(2).expect("labels");
    let sketch = StratifiedCompressor::new(labels, KMeans::new())
        .compress(&separable_dataset(), 4)
        .expect("compression");

    assert_eq!(sketch.dataset.len(), 4);
    assert_eq!(sketch.summary.bucket_sizes, vec![5, 5]);
    assert_eq!(sketch.summary.centers_per_label, vec![2, 2]);

    // centers stay on their label's side of the x = 0 line
    for (row, &label) in sketch.dataset.features().rows().zip(sketch.dataset.labels()) {
        if label == 0 {
            assert!(row[0] > 0.0);
        } else {
            assert!(row[0] < 0.0);
        }
    }
}

#[test]
fn test_proportional_center_counts() {
    let oracle = CyclingOracle::default();
    let labels = LabelSet::range(3).expect("labels");
    let sketch = StratifiedCompressor::new(labels, &oracle)
        .compress(&skewed_dataset(), 5)
        .expect("compression");

    // 6*5/10 = 3, 3*5/10 = 1 -> 2, 1*5/10 = 0 -> 2
    assert_eq!(sketch.summary.centers_per_label, vec![3, 2, 2]);
    assert_eq!(sketch.dataset.len(), 7);
    let calls = oracle.calls.lock().expect("oracle mutex poisoned").clone();
    assert_eq!(calls, vec![(6, 3), (3, 2), (1, 2)]);
}

#[test]
fn test_conservation_and_labels_in_set() {
    let labels = LabelSet::range(3).expect("labels");
    let sketch = StratifiedCompressor::new(labels.clone(), CyclingOracle::default())
        .compress(&skewed_dataset(), 8)
        .expect("compression");

    let total: usize = sketch.summary.centers_per_label.iter().sum();
    assert_eq!(total, sketch.dataset.len());
    assert!(labels.validate(sketch.dataset.labels()).is_ok());
    let counts = sketch.dataset.label_counts(&labels).expect("labels in set");
    assert_eq!(counts, sketch.summary.centers_per_label);
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

/// Unshuffled result: each label's centers in label order.
fn centers_in_label_order(ds: &Dataset, labels: &LabelSet, target: usize) -> Dataset {
    let oracle = CyclingOracle::default();
    let mut parts = Vec::new();
    let mut y = Vec::new();
    for (idx, bucket) in ds.label_buckets(labels).expect("buckets").iter().enumerate() {
        let k = centers_for(bucket.n_rows(), target, ds.len()).expect("sizes");
        parts.push(oracle.cluster(bucket, k).expect("centers"));
        y.extend(std::iter::repeat(labels.label_at(idx)).take(k));
    }
    Dataset::new(Matrix::vstack(ds.n_features(), &parts).expect("same width"), y)
        .expect("one label per center")
}

#[test]
fn test_shuffle_preserves_pairing() {
    // every center carries its label in feature 0
    let labels = LabelSet::range(3).expect("labels");
    let sketch = StratifiedCompressor::new(labels.clone(), CyclingOracle::default())
        .with_random_state(9)
        .compress(&skewed_dataset(), 10)
        .expect("compression");

    for (row, &label) in sketch.dataset.features().rows().zip(sketch.dataset.labels()) {
        assert_eq!(row[0], label as f32);
    }

    let unshuffled = centers_in_label_order(&skewed_dataset(), &labels, 10);
    assert_eq!(sorted_pairs(&sketch.dataset), sorted_pairs(&unshuffled));
}

#[test]
fn test_sorted_pairs_catch_a_duplicated_row() {
    let ds = skewed_dataset();
    let mut permutation: Vec<usize> = (0..ds.len()).collect();
    let shuffled = ds.permuted(&permutation.iter().rev().copied().collect::<Vec<_>>());
    assert_eq!(sorted_pairs(&shuffled), sorted_pairs(&ds));

    // row 3 twice, row 0 gone: same labels per row, different multiset
    permutation[0] = 3;
    let broken = ds.permuted(&permutation);
    assert_ne!(sorted_pairs(&broken), sorted_pairs(&ds));
}

#[test]
fn test_shuffle_is_seeded() {
    let labels = LabelSet::range(3).expect("labels");
    let a = StratifiedCompressor::new(labels.clone(), CyclingOracle::default())
        .with_random_state(1)
        .compress(&skewed_dataset(), 10)
        .expect("compression");
    let b = StratifiedCompressor::new(labels, CyclingOracle::default())
        .with_random_state(1)
        .compress(&skewed_dataset(), 10)
        .expect("compression");
    assert_eq!(a, b);
}

#[test]
fn test_input_is_not_modified() {
    let ds = skewed_dataset();
    let before = ds.clone();
    let labels = LabelSet::range(3).expect("labels");
    StratifiedCompressor::new(labels, CyclingOracle::default())
        .compress(&ds, 4)
        .expect("compression");
    assert_eq!(ds, before);
}

#[test]
fn test_parallel_matches_sequential() {
    let labels = LabelSet::range(3).expect("labels");
    let seq = StratifiedCompressor::new(labels.clone(), CyclingOracle::default())
        .compress(&skewed_dataset(), 6)
        .expect("compression");
    let par = StratifiedCompressor::new(labels, CyclingOracle::default())
        .with_context(ComputeContext::cpu().with_parallel(true))
        .compress(&skewed_dataset(), 6)
        .expect("compression");
    assert_eq!(seq, par);
}

#[test]
fn test_empty_bucket_fails_by_default() {
    let labels = LabelSet::range(4).expect("labels");
    let err = StratifiedCompressor::new(labels, CyclingOracle::default())
        .compress(&skewed_dataset(), 5)
        .expect_err("label 3 has no samples");
    assert!(matches!(err, SketchError::EmptyPartition { label: 3 }));
}

#[test]
fn test_empty_bucket_skip_policy() {
    let labels = LabelSet::range(4).expect("labels");
    let sketch = StratifiedCompressor::new(labels, CyclingOracle::default())
        .with_empty_bucket_policy(EmptyBucketPolicy::Skip)
        .compress(&skewed_dataset(), 5)
        .expect("compression");
    assert_eq!(sketch.summary.skipped_labels, vec![3]);
    assert_eq!(sketch.summary.centers_per_label, vec![3, 2, 2, 0]);
    assert_eq!(sketch.dataset.len(), 7);
}

#[test]
fn test_zero_target_size() {
    let labels = LabelSet::range(3).expect("labels");
    let err = StratifiedCompressor::new(labels, CyclingOracle::default())
        .compress(&skewed_dataset(), 0)
        .expect_err("target must be positive");
    assert!(err.is_configuration_error());
}

#[test]
fn test_empty_dataset() {
    let labels = LabelSet::range(2).expect("labels");
    let empty = Dataset::new(Matrix::from_vec(0, 2, vec![]).expect("0x2"), vec![]).expect("empty");
    assert!(StratifiedCompressor::new(labels, CyclingOracle::default())
        .compress(&empty, 3)
        .is_err());
}

#[test]
fn test_unknown_label() {
    let labels = LabelSet::range(2).expect("labels");
    let err = StratifiedCompressor::new(labels, CyclingOracle::default())
        .compress(&skewed_dataset(), 5)
        .expect_err("label 2 is outside the set");
    assert!(matches!(err, SketchError::UnknownLabel { label: 2 }));
}

#[test]
fn test_wrong_center_count_from_oracle() {
    let labels = LabelSet::range(3).expect("labels");
    let err = StratifiedCompressor::new(labels, ShortOracle)
        .compress(&skewed_dataset(), 5)
        .expect_err("oracle ignored k");
    assert!(matches!(err, SketchError::DimensionMismatch { .. }));
}

#[test]
fn test_oracle_error_propagates() {
    let labels = LabelSet::range(3).expect("labels");
    let err = StratifiedCompressor::new(labels, FailingOracle)
        .compress(&skewed_dataset(), 5)
        .expect_err("oracle failure");
    assert_eq!(err.to_string(), "oracle exploded");
}
