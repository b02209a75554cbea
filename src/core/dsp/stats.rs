//! Statistical helpers for spectrogram crops

/// Percentile with linear interpolation between closest ranks.
///
/// `p` is in percent and clamped to [0, 100]. Returns `None` for empty
/// input. NaN values sort last.
pub fn percentile(data: &[f64], p: f64) -> Option<f64> {
    if data.is_empty() {
        return None;
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = p.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    if lo == hi || sorted[lo] == sorted[hi] {
        Some(sorted[lo])
    } else {
        Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
    }
}

/// Clamp every value of a matrix into `[min, max]` in place
pub fn clip_matrix(matrix: &mut [Vec<f64>], min: f64, max: f64) {
    for value in matrix.iter_mut().flat_map(|row| row.iter_mut()) {
        *value = value.clamp(min, max);
    }
}

/// 1.0 where the value is strictly above `threshold`, else 0.0
pub fn binarize(matrix: &[Vec<f64>], threshold: f64) -> Vec<Vec<f64>> {
    matrix
        .iter()
        .map(|row| {
            row.iter()
                .map(|&v| if v > threshold { 1.0 } else { 0.0 })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolates() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&data, 50.0).unwrap() - 2.5).abs() < 1e-12);
        assert!((percentile(&data, 85.0).unwrap() - 3.55).abs() < 1e-12);
        assert_eq!(percentile(&data, 0.0), Some(1.0));
        assert_eq!(percentile(&data, 100.0), Some(4.0));
    }

    #[test]
    fn test_percentile_unsorted_input() {
        let data = vec![4.0, -40.0, 0.0, -40.0, -10.0];
        // sorted: -40, -40, -10, 0, 4 ; rank 0.85 * 4 = 3.4
        assert!((percentile(&data, 85.0).unwrap() - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&[], 85.0), None);
    }

    #[test]
    fn test_percentile_equal_neighbours_with_infinity() {
        let data = vec![f64::NEG_INFINITY, f64::NEG_INFINITY, 0.0];
        assert_eq!(percentile(&data, 25.0), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_clip_and_binarize() {
        let mut matrix = vec![vec![f64::NEG_INFINITY, -50.0, -20.0], vec![3.0, 0.0, -39.0]];
        clip_matrix(&mut matrix, -40.0, 0.0);
        assert_eq!(matrix, vec![vec![-40.0, -40.0, -20.0], vec![0.0, 0.0, -39.0]]);

        let binary = binarize(&matrix, -20.0);
        assert_eq!(binary, vec![vec![0.0, 0.0, 0.0], vec![1.0, 1.0, 0.0]]);
    }
}
