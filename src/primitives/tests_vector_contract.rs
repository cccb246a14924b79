use super::*;

#[test]
fn test_zeros() {
    let w = Vector::zeros(4);
    assert_eq!(w.as_slice(), &[0.0; 4]);
}

#[test]
fn test_axpy_adds_scaled_input() {
    let mut w = Vector::zeros(3);
    w.axpy(-1.0, &[1.0, 2.0, 3.0]);
    w.axpy(1.0, &[0.5, 0.5, 0.5]);
    assert_eq!(w.as_slice(), &[-0.5, -1.5, -2.5]);
}

#[test]
fn test_index_mut() {
    let mut c = Vector::zeros(3);
    c[1] += 1.0;
    c[1] -= 2.0;
    assert_eq!(c[1], -1.0);
    assert_eq!(c.as_slice(), &[0.0, -1.0, 0.0]);
}
