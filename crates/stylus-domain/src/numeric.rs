//! Numeric helpers shared by every layer
//!
//! All score arithmetic funnels through these so that NaN or overflowing
//! intermediates can never escape a documented interval.

/// Clamp a value into `[min, max]`; NaN maps to the bound closest to zero
pub fn clamp_range(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0_f64.clamp(min, max);
    }
    value.clamp(min, max)
}

/// Clamp a value into `[0, 1]`
pub fn clamp_unit(value: f64) -> f64 {
    clamp_range(value, 0.0, 1.0)
}

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance; 0.0 for an empty slice
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1); 0.0 with fewer than two values
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq = values.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_nan() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_range(f64::NAN, 0.2, 0.7), 0.2);
        assert_eq!(clamp_range(f64::NAN, -0.1, 0.1), 0.0);
    }

    #[test]
    fn test_clamp_infinite() {
        assert_eq!(clamp_unit(f64::INFINITY), 1.0);
        assert_eq!(clamp_unit(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_statistics() {
        let values = [0.1, 0.05, -0.02];
        assert!((mean(&values) - 0.043333).abs() < 1e-5);
        assert!(population_variance(&values) > 0.0);
        assert_eq!(sample_std_dev(&[0.5]), 0.0);
        assert!((sample_std_dev(&[1.0, 3.0]) - 2.0_f64.sqrt()).abs() < 1e-9);
    }
}
