//! Dense coefficient vector operations used by the regression trainer.

use std::cmp::Ordering;

/// Creates a vector by applying a function to each index.
///
/// # Examples
///
/// ```
/// use sigma_taste_training::weights;
///
/// let values = weights::from_fn(|i| i as f64 * 0.5, 3);
/// assert_eq!(values, vec![0.0, 0.5, 1.0]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f64>
where
    F: FnMut(usize) -> f64,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Dot product of two equally sized vectors.
///
/// # Panics
///
/// Panics if the vectors have different lengths.
#[must_use]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Indices of `weights` ordered by descending absolute value.
///
/// The sort is stable, so equal magnitudes keep their original index order.
///
/// # Examples
///
/// ```
/// use sigma_taste_training::weights;
///
/// let order = weights::indices_by_magnitude(&[0.1, -0.9, 0.5]);
/// assert_eq!(order, vec![1, 2, 0]);
/// ```
#[must_use]
pub fn indices_by_magnitude(weights: &[f64]) -> Vec<usize> {
    let mut indices = (0..weights.len()).collect::<Vec<_>>();
    indices.sort_by(|&a, &b| {
        weights[b]
            .abs()
            .partial_cmp(&weights[a].abs())
            .unwrap_or(Ordering::Equal)
    });
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot() {
        assert!((dot(&[1.0, 2.0, 3.0], &[0.5, -1.0, 2.0]) - 4.5).abs() < 1e-12);
        assert_eq!(dot(&[], &[]), 0.0);
    }

    #[test]
    #[should_panic(expected = "assertion `left == right` failed")]
    fn test_dot_length_mismatch() {
        let _ = dot(&[1.0], &[1.0, 2.0]);
    }

    #[test]
    fn test_indices_by_magnitude_is_stable() {
        let order = indices_by_magnitude(&[0.2, -0.2, 0.0, 0.2]);
        assert_eq!(order, vec![0, 1, 3, 2]);
    }
}
