//! Statistical Features Computation

use crate::error::FeatureError;

/// Central moments of a signal
#[derive(Debug, Clone, Default)]
pub struct StatisticalFeatures {
    /// Number of samples
    pub count: usize,
    /// Mean value
    pub mean: f64,
    /// Population variance (N denominator)
    pub variance: f64,
    /// Skewness (asymmetry), biased estimator
    pub skewness: f64,
    /// Excess kurtosis (tailedness), normal distribution = 0
    pub kurtosis: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
}

impl StatisticalFeatures {
    /// Compute moments from a slice of values.
    ///
    /// Skewness and kurtosis are left at 0 for zero-variance input and are
    /// NaN when a sample is not finite; use [`skewness`] / [`kurtosis`] to
    /// get an error instead.
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let mut m2 = 0.0;
        let mut m3 = 0.0;
        let mut m4 = 0.0;
        for &v in values {
            let d = v - mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }
        let variance = m2 / n;

        // E[(X-μ)³] / σ³ and E[(X-μ)⁴] / σ⁴ - 3
        let (skewness, kurtosis) = if variance == 0.0 {
            (0.0, 0.0)
        } else {
            (
                (m3 / n) / variance.powf(1.5),
                (m4 / n) / (variance * variance) - 3.0,
            )
        };

        Self {
            count: values.len(),
            mean,
            variance,
            skewness,
            kurtosis,
            min,
            max,
        }
    }
}

fn non_empty(values: &[f64]) -> Result<(), FeatureError> {
    if values.is_empty() {
        Err(FeatureError::EmptySignal)
    } else {
        Ok(())
    }
}

/// Root mean square
pub fn rms(values: &[f64]) -> Result<f64, FeatureError> {
    non_empty(values)?;
    Ok((values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt())
}

/// Sample standard deviation (N-1 denominator)
pub fn std_dev(values: &[f64]) -> Result<f64, FeatureError> {
    if values.len() < 2 {
        return Err(FeatureError::InsufficientSamples {
            required: 2,
            actual: values.len(),
        });
    }
    let stats = StatisticalFeatures::compute(values);
    let n = values.len() as f64;
    Ok((stats.variance * n / (n - 1.0)).sqrt())
}

/// Skewness; zero-variance input is an error
pub fn skewness(values: &[f64]) -> Result<f64, FeatureError> {
    non_empty(values)?;
    let stats = StatisticalFeatures::compute(values);
    if !stats.variance.is_finite() {
        return Err(FeatureError::NonFinite("skewness"));
    }
    if stats.variance <= 0.0 {
        return Err(FeatureError::ZeroVariance("skewness"));
    }
    Ok(stats.skewness)
}

/// Excess kurtosis; zero-variance input is an error
pub fn kurtosis(values: &[f64]) -> Result<f64, FeatureError> {
    non_empty(values)?;
    let stats = StatisticalFeatures::compute(values);
    if !stats.variance.is_finite() {
        return Err(FeatureError::NonFinite("kurtosis"));
    }
    if stats.variance <= 0.0 {
        return Err(FeatureError::ZeroVariance("kurtosis"));
    }
    Ok(stats.kurtosis)
}

/// Peak absolute amplitude over RMS; 0 when RMS is 0
pub fn crest_factor(values: &[f64]) -> Result<f64, FeatureError> {
    let rms = rms(values)?;
    if rms == 0.0 {
        return Ok(0.0);
    }
    let peak = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    Ok(peak / rms)
}

pub fn max(values: &[f64]) -> Result<f64, FeatureError> {
    non_empty(values)?;
    Ok(values.iter().cloned().fold(f64::NEG_INFINITY, f64::max))
}

pub fn min(values: &[f64]) -> Result<f64, FeatureError> {
    non_empty(values)?;
    Ok(values.iter().cloned().fold(f64::INFINITY, f64::min))
}

pub fn mean(values: &[f64]) -> Result<f64, FeatureError> {
    non_empty(values)?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median; even-length input averages the two middle values
pub fn median(values: &[f64]) -> Result<f64, FeatureError> {
    non_empty(values)?;
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_computation() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = StatisticalFeatures::compute(&values);
        assert!((stats.mean - 3.0).abs() < 0.001);
        assert_eq!(stats.count, 5);
    }

    #[test]
    fn test_std_dev_is_sample_estimate() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // Population std is 2.0, sample std is sqrt(32 / 7)
        assert!((std_dev(&values).unwrap() - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!(std_dev(&[1.0]).is_err());
    }

    #[test]
    fn test_rms_and_crest_factor_of_square_wave() {
        let values = vec![1.0, -1.0, 1.0, -1.0];
        assert!((rms(&values).unwrap() - 1.0).abs() < 1e-12);
        assert!((crest_factor(&values).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_crest_factor_zero_signal() {
        assert_eq!(crest_factor(&[0.0; 16]).unwrap(), 0.0);
    }

    #[test]
    fn test_skewness_sign() {
        let right_tailed = vec![1.0, 1.0, 1.0, 1.0, 10.0];
        assert!(skewness(&right_tailed).unwrap() > 0.0);
        let symmetric = vec![-2.0, -1.0, 0.0, 1.0, 2.0];
        assert!(skewness(&symmetric).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_kurtosis_of_uniform_grid() {
        // Discrete uniform on 1..=5: excess kurtosis = -1.3
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((kurtosis(&values).unwrap() + 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_moments_are_errors() {
        assert_eq!(skewness(&[3.0; 4]), Err(FeatureError::ZeroVariance("skewness")));
        assert_eq!(kurtosis(&[3.0; 4]), Err(FeatureError::ZeroVariance("kurtosis")));
    }

    #[test]
    fn test_order_statistics() {
        let values = vec![3.0, -1.0, 7.0, 2.0];
        assert_eq!(max(&values).unwrap(), 7.0);
        assert_eq!(min(&values).unwrap(), -1.0);
        assert_eq!(median(&values).unwrap(), 2.5);
        assert_eq!(median(&[5.0, 1.0, 3.0]).unwrap(), 3.0);
        assert!((mean(&values).unwrap() - 2.75).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_samples_are_errors() {
        let values = vec![f64::NAN, 1.0, 2.0, 3.0];
        assert_eq!(skewness(&values), Err(FeatureError::NonFinite("skewness")));
        assert_eq!(kurtosis(&values), Err(FeatureError::NonFinite("kurtosis")));
        assert!(StatisticalFeatures::compute(&values).kurtosis.is_nan());

        let values = vec![f64::INFINITY, 1.0, 2.0];
        assert_eq!(kurtosis(&values), Err(FeatureError::NonFinite("kurtosis")));
    }

    #[test]
    fn test_empty_values() {
        let stats = StatisticalFeatures::compute(&[]);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(rms(&[]), Err(FeatureError::EmptySignal));
        assert_eq!(median(&[]), Err(FeatureError::EmptySignal));
    }

    proptest::proptest! {
        #[test]
        fn prop_crest_factor_at_least_one(values in proptest::collection::vec(-1.0e3f64..1.0e3, 1..256)) {
            let cf = crest_factor(&values).unwrap();
            proptest::prop_assert!(cf == 0.0 || cf >= 1.0 - 1e-9);
        }

        #[test]
        fn prop_median_within_range(values in proptest::collection::vec(-1.0e3f64..1.0e3, 1..256)) {
            let m = median(&values).unwrap();
            proptest::prop_assert!(m >= min(&values).unwrap() && m <= max(&values).unwrap());
        }
    }
}
