use super::*;

fn sample_data() -> Matrix<f32> {
    // Two well-separated clusters
    Matrix::from_vec(
        6,
        2,
        vec![1.0, 2.0, 1.5, 1.8, 1.0, 0.6, 8.0, 8.0, 9.0, 11.0, 8.5, 9.0],
    )
    .expect("Sample data matrix creation should succeed")
}

#[test]
fn test_fit_basic() {
    let fit = KMeans::new()
        .fit(&sample_data(), 2)
        .expect("KMeans fit should succeed");

    assert_eq!(fit.centroids.shape(), (2, 2));
    assert_eq!(fit.labels.len(), 6);
    assert!(fit.inertia >= 0.0);
    assert!(fit.labels.iter().all(|&l| l < 2));
}

#[test]
fn test_labels_consistency() {
    let fit = KMeans::new()
        .fit(&sample_data(), 2)
        .expect("KMeans fit should succeed");

    // First 3 points should be in one cluster, last 3 in another
    assert_eq!(fit.labels[0], fit.labels[1]);
    assert_eq!(fit.labels[1], fit.labels[2]);
    assert_eq!(fit.labels[3], fit.labels[4]);
    assert_eq!(fit.labels[4], fit.labels[5]);
    assert_ne!(fit.labels[0], fit.labels[3]);
}

#[test]
fn test_centroids_are_cluster_means() {
    let fit = KMeans::new()
        .fit(&sample_data(), 2)
        .expect("KMeans fit should succeed");

    let low = fit.labels[0];
    let c = fit.centroids.row_slice(low);
    // mean of (1.0, 2.0), (1.5, 1.8), (1.0, 0.6)
    assert!((c[0] - 3.5 / 3.0).abs() < 1e-5);
    assert!((c[1] - 4.4 / 3.0).abs() < 1e-5);
}

#[test]
fn test_nearest_centroid_assignment() {
    let data = Matrix::from_vec(
        6,
        2,
        vec![0.0, 0.0, 0.1, 0.1, 0.2, 0.2, 10.0, 10.0, 10.1, 10.1, 10.2, 10.2],
    )
    .expect("valid matrix");

    let fit = KMeans::new().with_random_state(7).fit(&data, 2).expect("fit succeeds");

    for (i, point) in data.rows().enumerate() {
        let assigned = squared_distance(point, fit.centroids.row_slice(fit.labels[i]));
        for centroid in fit.centroids.rows() {
            assert!(
                assigned <= squared_distance(point, centroid) + 1e-6,
                "row {i} not assigned to its nearest centroid"
            );
        }
    }
}

#[test]
fn test_reproducibility() {
    let a = KMeans::new().with_random_state(3).fit(&sample_data(), 2).expect("fit");
    let b = KMeans::new().with_random_state(3).fit(&sample_data(), 2).expect("fit");
    assert_eq!(a, b);
}

#[test]
fn test_inertia_decreases_with_more_clusters() {
    let one = KMeans::new().fit(&sample_data(), 1).expect("fit");
    let two = KMeans::new().fit(&sample_data(), 2).expect("fit");
    assert!(two.inertia <= one.inertia);
}

#[test]
fn test_k_equals_n_returns_the_points() {
    let data = sample_data();
    let fit = KMeans::new().fit(&data, 6).expect("one center per sample");
    let mut got: Vec<Vec<f32>> = fit.centroids.rows().map(<[f32]>::to_vec).collect();
    let mut want: Vec<Vec<f32>> = data.rows().map(<[f32]>::to_vec).collect();
    let key = |v: &Vec<f32>| (v[0].to_bits(), v[1].to_bits());
    got.sort_by_key(key);
    want.sort_by_key(key);
    assert_eq!(got, want);
    assert!(fit.inertia.abs() < 1e-6);
}

#[test]
fn test_convergence() {
    let fit = KMeans::new()
        .with_max_iter(1000)
        .fit(&sample_data(), 2)
        .expect("fit");
    assert!(fit.n_iter < 100);
}

#[test]
fn test_zero_max_iter_still_labels() {
    let fit = KMeans::new()
        .with_max_iter(0)
        .fit(&sample_data(), 2)
        .expect("fit");
    assert_eq!(fit.n_iter, 0);
    assert_eq!(fit.labels.len(), 6);
}

#[test]
fn test_empty_data_error() {
    let data = Matrix::from_vec(0, 2, vec![]).expect("empty matrix");
    let err = KMeans::new().fit(&data, 2).expect_err("cannot cluster nothing");
    assert!(matches!(err, SketchError::EmptyInput { .. }));
}

#[test]
fn test_too_many_clusters_error() {
    let data = Matrix::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("3x2");
    assert!(KMeans::new().fit(&data, 5).is_err());
    assert!(KMeans::new().fit(&data, 0).is_err());
}

#[test]
fn test_duplicate_points_cannot_fill_k() {
    let data = Matrix::from_vec(3, 2, vec![1.0; 6]).expect("3x2");
    let err = KMeans::new().fit(&data, 2).expect_err("only one distinct point");
    assert!(err.to_string().contains("distinct"));
}

#[test]
fn test_oracle_returns_centers() {
    let centers = KMeans::new().cluster(&sample_data(), 2).expect("oracle call");
    assert_eq!(centers.shape(), (2, 2));
}

#[test]
fn test_empty_cluster_keeps_previous_center() {
    let previous = Matrix::from_vec(2, 1, vec![0.0, 100.0]).expect("2x1");
    let x = Matrix::from_vec(2, 1, vec![1.0, 3.0]).expect("2x1");
    let updated = update_centroids(&x, &[0, 0], &previous);
    assert_eq!(updated.as_slice(), &[2.0, 100.0]);
}
