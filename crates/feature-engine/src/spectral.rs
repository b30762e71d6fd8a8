//! Welch Power Spectral Density and Spectral Features

use crate::error::FeatureError;
use crate::features::FeatureKind;
use crate::statistics;
use rustfft::{num_complex::Complex, FftPlanner};
use std::f64::consts::PI;
use tracing::debug;

/// Blade count used for speed estimation when none is configured
pub const DEFAULT_BLADE_COUNT: u32 = 6;

/// One-sided power spectral density
#[derive(Debug, Clone, Default)]
pub struct Psd {
    /// Bin centre frequencies (Hz)
    pub frequencies: Vec<f64>,
    /// Power density per bin (unit²/Hz)
    pub power: Vec<f64>,
}

impl Psd {
    /// Index of the bin with maximum power (first one on ties)
    pub fn peak_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &p) in self.power.iter().enumerate() {
            if best.map_or(true, |(_, bp)| p > bp) {
                best = Some((i, p));
            }
        }
        best.map(|(i, _)| i)
    }
}

/// Welch estimator: Hann-windowed, 50% overlapping segments, constant
/// detrend, density scaling, mean averaging.
pub struct WelchEstimator {
    /// FFT planner for efficient computation
    planner: FftPlanner<f64>,
    /// Sampling frequency (Hz)
    sample_rate: f64,
    /// Samples per segment
    segment_len: usize,
}

impl WelchEstimator {
    /// Estimator with segment length `fs / 2`
    pub fn new(sample_rate: f64) -> Self {
        Self {
            planner: FftPlanner::new(),
            sample_rate,
            segment_len: ((sample_rate / 2.0) as usize).max(1),
        }
    }

    /// Periodic Hann window
    fn hann(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / n as f64).cos())
            .collect()
    }

    /// Estimate the PSD of `signal`.
    ///
    /// A signal shorter than one segment is analysed as a single segment.
    pub fn estimate(&mut self, signal: &[f64]) -> Result<Psd, FeatureError> {
        if !(self.sample_rate > 0.0 && self.sample_rate.is_finite()) {
            return Err(FeatureError::InvalidSampleRate(self.sample_rate));
        }
        if signal.is_empty() {
            return Err(FeatureError::EmptySignal);
        }
        if signal.iter().any(|v| !v.is_finite()) {
            return Err(FeatureError::NonFinite("signal"));
        }

        let nperseg = self.segment_len.min(signal.len());
        let step = nperseg - nperseg / 2;
        let window = Self::hann(nperseg);
        let window_power: f64 = window.iter().map(|w| w * w).sum();
        if window_power == 0.0 {
            return Err(FeatureError::InsufficientSamples {
                required: 2,
                actual: signal.len(),
            });
        }
        let scale = 1.0 / (self.sample_rate * window_power);
        let bins = nperseg / 2 + 1;

        let fft = self.planner.plan_fft_forward(nperseg);
        let mut power = vec![0.0; bins];
        let mut segments = 0usize;
        let mut buffer: Vec<Complex<f64>> = Vec::with_capacity(nperseg);

        let mut start = 0;
        while start + nperseg <= signal.len() {
            let segment = &signal[start..start + nperseg];
            let seg_mean = segment.iter().sum::<f64>() / nperseg as f64;

            buffer.clear();
            buffer.extend(
                segment
                    .iter()
                    .zip(&window)
                    .map(|(&v, &w)| Complex::new((v - seg_mean) * w, 0.0)),
            );
            fft.process(&mut buffer);

            for (acc, c) in power.iter_mut().zip(&buffer) {
                *acc += c.norm_sqr() * scale;
            }
            segments += 1;
            start += step;
        }

        // One-sided: double every bin except DC and (even length) Nyquist
        let last_doubled = if nperseg % 2 == 0 { bins - 1 } else { bins };
        for (k, p) in power.iter_mut().enumerate() {
            *p /= segments as f64;
            if k > 0 && k < last_doubled {
                *p *= 2.0;
            }
        }

        let frequencies = (0..bins)
            .map(|k| k as f64 * self.sample_rate / nperseg as f64)
            .collect();

        debug!("Welch PSD: {} segments of {} samples, {} bins", segments, nperseg, bins);
        Ok(Psd { frequencies, power })
    }
}

/// Spectral descriptors of one signal
#[derive(Debug, Clone)]
pub struct SpectralFeatures {
    /// Maximum PSD value
    pub peak_psd: f64,
    /// Frequency of the maximum PSD bin (Hz)
    pub peak_frequency: f64,
    /// `peak_frequency * 60 / blade_count`
    pub estimated_speed_rpm: f64,
    /// Skewness of the PSD values
    pub spectrum_skewness: Result<f64, FeatureError>,
    /// Excess kurtosis of the PSD values
    pub spectrum_kurtosis: Result<f64, FeatureError>,
}

/// Compute peak, speed and spectral-shape features
pub fn compute_spectral_features(
    estimator: &mut WelchEstimator,
    samples: &[f64],
    blade_count: u32,
) -> Result<SpectralFeatures, FeatureError> {
    if blade_count == 0 {
        return Err(FeatureError::InvalidBladeCount);
    }

    let psd = estimator.estimate(samples)?;
    let peak = psd.peak_index().ok_or(FeatureError::EmptySignal)?;
    let peak_frequency = psd.frequencies[peak];

    Ok(SpectralFeatures {
        peak_psd: psd.power[peak],
        peak_frequency,
        estimated_speed_rpm: peak_frequency * 60.0 / f64::from(blade_count),
        spectrum_skewness: statistics::skewness(&psd.power),
        spectrum_kurtosis: statistics::kurtosis(&psd.power),
    })
}

/// Whether any requested name triggers spectral estimation
pub fn wants_spectral(features: &[String]) -> bool {
    features
        .iter()
        .filter_map(|name| FeatureKind::parse(name))
        .any(|kind| kind.is_spectral())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| (2.0 * PI * freq * i as f64 / fs).sin()).collect()
    }

    #[test]
    fn test_welch_bins_and_resolution() {
        let mut welch = WelchEstimator::new(10240.0);
        let psd = welch.estimate(&sine(1000.0, 10240.0, 10240)).unwrap();
        assert_eq!(psd.power.len(), 2561);
        assert!((psd.frequencies[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_peak_frequency_of_sine() {
        let mut welch = WelchEstimator::new(10240.0);
        let features = compute_spectral_features(&mut welch, &sine(600.0, 10240.0, 10240), 6).unwrap();
        assert!((features.peak_frequency - 600.0).abs() < 1e-9);
        assert!((features.estimated_speed_rpm - 6000.0).abs() < 1e-6);
        assert!(features.peak_psd > 0.0);
        // A single tone concentrates power in a few bins
        assert!(*features.spectrum_skewness.as_ref().unwrap() > 1.0);
    }

    #[test]
    fn test_psd_integrates_to_variance() {
        let fs = 1024.0;
        let x = sine(100.0, fs, 4096);
        let mut welch = WelchEstimator::new(fs);
        let psd = welch.estimate(&x).unwrap();
        let df = psd.frequencies[1];
        let total: f64 = psd.power.iter().sum::<f64>() * df;
        // Unit-amplitude sine has variance 0.5
        assert!((total - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_short_signal_single_segment() {
        let mut welch = WelchEstimator::new(10240.0);
        let psd = welch.estimate(&sine(1000.0, 10240.0, 100)).unwrap();
        assert_eq!(psd.power.len(), 51);
    }

    #[test]
    fn test_zero_signal_shape_features_are_errors() {
        let mut welch = WelchEstimator::new(1000.0);
        let features = compute_spectral_features(&mut welch, &[0.0; 1000], 6).unwrap();
        assert_eq!(features.peak_psd, 0.0);
        assert!(features.spectrum_skewness.is_err());
    }

    #[test]
    fn test_invalid_inputs() {
        let mut welch = WelchEstimator::new(1000.0);
        assert_eq!(
            compute_spectral_features(&mut welch, &[1.0, 2.0], 0).unwrap_err(),
            FeatureError::InvalidBladeCount
        );
        assert_eq!(welch.estimate(&[]).unwrap_err(), FeatureError::EmptySignal);
    }

    #[test]
    fn test_non_finite_signal_rejected() {
        let mut welch = WelchEstimator::new(1000.0);
        let mut x = sine(50.0, 1000.0, 1000);
        x[10] = f64::NAN;
        assert_eq!(welch.estimate(&x).unwrap_err(), FeatureError::NonFinite("signal"));
        assert!(compute_spectral_features(&mut welch, &x, 6).is_err());
    }

    #[test]
    fn test_trigger_vocabulary() {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert!(!wants_spectral(&names(&["RMS", "Kurtosis"])));
        assert!(wants_spectral(&names(&["RMS", "estimated speed"])));
        assert!(wants_spectral(&names(&["Peak Frequency (Hz)"])));
        assert!(wants_spectral(&names(&["spectrum_kurtosis"])));
    }
}
