use super::*;

fn sample_dataset() -> Dataset {
    let x = Matrix::from_vec(5, 2, vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0])
        .expect("5x2 matrix");
    Dataset::new(x, vec![1, 0, 1, 2, 1]).expect("one label per row")
}

#[test]
fn test_label_set_sorts() {
    let labels = LabelSet::new(vec![3, 1, 2]).expect("distinct labels");
    assert_eq!(labels.as_slice(), &[1, 2, 3]);
    assert_eq!(labels.len(), 3);
    assert_eq!(labels.label_at(0), 1);
    assert_eq!(labels.index_of(4), None);
}

#[test]
fn test_label_set_rejects_empty() {
    let err = LabelSet::new(vec![]).expect_err("empty set is invalid");
    assert!(err.is_configuration_error());
    assert!(LabelSet::range(0).is_err());
}

#[test]
fn test_label_set_rejects_duplicates() {
    let err = LabelSet::new(vec![0, 1, 1]).expect_err("duplicate label");
    assert!(err.to_string().contains("duplicate label 1"));
}

#[test]
fn test_validate_unknown_label() {
    let labels = LabelSet::range(2).expect("two labels");
    assert!(labels.validate(&[0, 1, 1]).is_ok());
    match labels.validate(&[0, 5, 1]) {
        Err(SketchError::UnknownLabel { label }) => assert_eq!(label, 5),
        other => panic!("expected UnknownLabel, got {other:?}"),
    }
}

#[test]
fn test_sign_targets() {
    let t = LabelSet::sign_targets(&[0, 1, 2, 1], 1);
    assert_eq!(t, vec![-1.0, 1.0, -1.0, 1.0]);
}

#[test]
fn test_dataset_length_mismatch() {
    let x = Matrix::from_vec(2, 1, vec![1.0, 2.0]).expect("2x1");
    assert!(Dataset::new(x, vec![0]).is_err());
}

#[test]
fn test_label_buckets_are_stable() {
    let ds = sample_dataset();
    let labels = LabelSet::range(4).expect("four labels");
    let buckets = ds.label_buckets(&labels).expect("labels in set");

    assert_eq!(buckets.len(), 4);
    assert_eq!(buckets[0].as_slice(), &[1.0, 1.0]);
    // rows 0, 2, 4 in original order
    assert_eq!(buckets[1].as_slice(), &[0.0, 0.0, 2.0, 2.0, 4.0, 4.0]);
    assert_eq!(buckets[2].n_rows(), 1);
    // label 3 never occurs but still gets a bucket
    assert!(buckets[3].is_empty());
    assert_eq!(buckets[3].n_cols(), 2);

    let total: usize = buckets.iter().map(Matrix::n_rows).sum();
    assert_eq!(total, ds.len());
}

#[test]
fn test_label_buckets_unknown_label() {
    let ds = sample_dataset();
    let labels = LabelSet::range(2).expect("two labels");
    assert!(matches!(
        ds.label_buckets(&labels),
        Err(SketchError::UnknownLabel { label: 2 })
    ));
}

#[test]
fn test_label_counts() {
    let ds = sample_dataset();
    let labels = LabelSet::range(3).expect("three labels");
    assert_eq!(ds.label_counts(&labels).expect("labels in set"), vec![1, 3, 1]);
}

#[test]
fn test_permuted_keeps_pairs() {
    let ds = sample_dataset();
    let p = ds.permuted(&[4, 3, 2, 1, 0]);
    assert_eq!(p.labels(), &[1, 2, 1, 0, 1]);
    assert_eq!(p.features().row_slice(1), &[3.0, 3.0]);
    assert_eq!(p.n_features(), 2);
}
