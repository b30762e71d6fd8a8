//! Zero-phase Butterworth Filtering
//!
//! Filters are designed from the analog Butterworth prototype, mapped with a
//! pre-warped bilinear transform and stored as cascaded second-order
//! sections (biquads) for numerical stability. Application is forward then
//! backward (`filtfilt`), with odd-extension padding and steady-state
//! initial conditions so edges do not ring.

use crate::error::SignalError;
use instruction_model::{defaults, FilterMethod, ProcessingSpec};
use rustfft::num_complex::Complex;
use std::f64::consts::PI;
use tracing::debug;

/// Butterworth prototype order used by the filter stage
pub const FILTER_ORDER: usize = 4;

/// Resolved filter request with defaults applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterKind {
    PassThrough,
    Bandpass { low: f64, high: f64 },
    Lowpass { cutoff: f64 },
    Highpass { cutoff: f64 },
}

impl FilterKind {
    /// Resolve a processing spec, filling missing params with defaults
    pub fn from_processing(spec: &ProcessingSpec) -> Self {
        match spec.method {
            FilterMethod::None => FilterKind::PassThrough,
            FilterMethod::Bandpass => FilterKind::Bandpass {
                low: spec.param_or("low", defaults::BANDPASS_LOW_HZ),
                high: spec.param_or("high", defaults::BANDPASS_HIGH_HZ),
            },
            FilterMethod::Lowpass => FilterKind::Lowpass {
                cutoff: spec.param_or("cutoff", defaults::LOWPASS_CUTOFF_HZ),
            },
            FilterMethod::Highpass => FilterKind::Highpass {
                cutoff: spec.param_or("cutoff", defaults::HIGHPASS_CUTOFF_HZ),
            },
        }
    }

    /// Method this request was resolved from
    pub fn method(&self) -> FilterMethod {
        match self {
            FilterKind::PassThrough => FilterMethod::None,
            FilterKind::Bandpass { .. } => FilterMethod::Bandpass,
            FilterKind::Lowpass { .. } => FilterMethod::Lowpass,
            FilterKind::Highpass { .. } => FilterMethod::Highpass,
        }
    }
}

/// One second-order section, `a0` normalized to 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    pub b: [f64; 3],
    pub a: [f64; 3],
}

impl Biquad {
    /// Section with the given numerator and a conjugate digital pole pair
    fn from_pole(b: [f64; 3], pole: Complex<f64>) -> Self {
        Self {
            b,
            a: [1.0, -2.0 * pole.re, pole.norm_sqr()],
        }
    }

    fn scaled(mut self, gain: f64) -> Self {
        for coeff in &mut self.b {
            *coeff *= gain;
        }
        self
    }

    /// Gain at DC
    fn dc_gain(&self) -> f64 {
        let den = self.a.iter().sum::<f64>();
        if den == 0.0 {
            0.0
        } else {
            self.b.iter().sum::<f64>() / den
        }
    }

    /// Complex response at normalized angular frequency `omega` (rad/sample)
    fn response(&self, omega: f64) -> Complex<f64> {
        let z1 = Complex::from_polar(1.0, -omega);
        let z2 = z1 * z1;
        let num = self.b[0] + z1 * self.b[1] + z2 * self.b[2];
        let den = self.a[0] + z1 * self.a[1] + z2 * self.a[2];
        num / den
    }

    /// Steady-state state for a unit step (direct form II transposed)
    fn step_state(&self) -> [f64; 2] {
        let g = self.dc_gain();
        [g - self.b[0], self.b[2] - self.a[2] * g]
    }

    fn run(&self, samples: &mut [f64], mut state: [f64; 2]) {
        let [b0, b1, b2] = self.b;
        let [_, a1, a2] = self.a;
        for x in samples.iter_mut() {
            let input = *x;
            let y = b0 * input + state[0];
            state[0] = b1 * input - a1 * y + state[1];
            state[1] = b2 * input - a2 * y;
            *x = y;
        }
    }
}

/// Cascade of second-order sections
#[derive(Debug, Clone, PartialEq)]
pub struct SosFilter {
    sections: Vec<Biquad>,
}

/// Pre-warp a corner frequency for the bilinear transform
fn prewarp(freq: f64, fs: f64) -> f64 {
    2.0 * fs * (PI * freq / fs).tan()
}

/// Map an analog pole to the z-plane
fn bilinear(pole: Complex<f64>, fs: f64) -> Complex<f64> {
    let k = 2.0 * fs;
    (k + pole) / (k - pole)
}

/// Upper-half-plane poles of the normalized analog prototype
fn prototype_poles(order: usize) -> Vec<Complex<f64>> {
    (0..order / 2)
        .map(|k| {
            let theta = PI * (2 * k + 1 + order) as f64 / (2 * order) as f64;
            Complex::from_polar(1.0, theta)
        })
        .collect()
}

fn check_order(order: usize) -> Result<(), SignalError> {
    if order == 0 || order % 2 != 0 {
        return Err(SignalError::InvalidOrder(order));
    }
    Ok(())
}

fn check_corner(param: &'static str, value: f64, fs: f64) -> Result<(), SignalError> {
    if fs <= 0.0 || !fs.is_finite() {
        return Err(SignalError::InvalidSampleRate(fs));
    }
    let nyquist = fs / 2.0;
    if !(value > 0.0 && value < nyquist) {
        return Err(SignalError::FilterParameter { param, value, nyquist });
    }
    Ok(())
}

impl SosFilter {
    /// Sections in cascade order
    pub fn sections(&self) -> &[Biquad] {
        &self.sections
    }

    /// Butterworth low-pass at `cutoff` Hz
    pub fn lowpass(order: usize, cutoff: f64, fs: f64) -> Result<Self, SignalError> {
        check_order(order)?;
        check_corner("cutoff", cutoff, fs)?;
        let wc = prewarp(cutoff, fs);

        let sections = prototype_poles(order)
            .into_iter()
            .map(|p| {
                let section = Biquad::from_pole([1.0, 2.0, 1.0], bilinear(p * wc, fs));
                let gain = section.a.iter().sum::<f64>() / 4.0;
                section.scaled(gain)
            })
            .collect();
        Ok(Self { sections })
    }

    /// Butterworth high-pass at `cutoff` Hz
    pub fn highpass(order: usize, cutoff: f64, fs: f64) -> Result<Self, SignalError> {
        check_order(order)?;
        check_corner("cutoff", cutoff, fs)?;
        let wc = prewarp(cutoff, fs);

        let sections = prototype_poles(order)
            .into_iter()
            .map(|p| {
                let section = Biquad::from_pole([1.0, -2.0, 1.0], bilinear(wc / p, fs));
                let [_, a1, a2] = section.a;
                section.scaled((1.0 - a1 + a2) / 4.0)
            })
            .collect();
        Ok(Self { sections })
    }

    /// Butterworth band-pass between `low` and `high` Hz.
    ///
    /// `order` is the prototype order; the resulting filter has twice as
    /// many poles, as with the usual band transformation.
    pub fn bandpass(order: usize, low: f64, high: f64, fs: f64) -> Result<Self, SignalError> {
        check_order(order)?;
        check_corner("low", low, fs)?;
        check_corner("high", high, fs)?;
        if low >= high {
            return Err(SignalError::InvalidBand { low, high });
        }

        let w1 = prewarp(low, fs);
        let w2 = prewarp(high, fs);
        let w0_sq = w1 * w2;
        let bw = w2 - w1;

        let mut sections = Vec::with_capacity(order);
        for p in prototype_poles(order) {
            let pb = p * bw;
            let disc = (pb * pb - 4.0 * w0_sq).sqrt();
            for root in [(pb + disc) / 2.0, (pb - disc) / 2.0] {
                sections.push(Biquad::from_pole([1.0, 0.0, -1.0], bilinear(root, fs)));
            }
        }

        // Unity gain at the digital centre frequency
        let omega0 = 2.0 * (w0_sq.sqrt() / (2.0 * fs)).atan();
        let magnitude: f64 = sections.iter().map(|s| s.response(omega0).norm()).product();
        if magnitude > 0.0 && magnitude.is_finite() {
            let per_section = magnitude.powf(-1.0 / sections.len() as f64);
            sections = sections.into_iter().map(|s| s.scaled(per_section)).collect();
        }
        Ok(Self { sections })
    }

    /// Design the filter for a resolved request; `None` for pass-through
    pub fn design(kind: FilterKind, fs: f64) -> Result<Option<Self>, SignalError> {
        let filter = match kind {
            FilterKind::PassThrough => return Ok(None),
            FilterKind::Bandpass { low, high } => Self::bandpass(FILTER_ORDER, low, high, fs)?,
            FilterKind::Lowpass { cutoff } => Self::lowpass(FILTER_ORDER, cutoff, fs)?,
            FilterKind::Highpass { cutoff } => Self::highpass(FILTER_ORDER, cutoff, fs)?,
        };
        debug!("Designed {:?} with {} sections", kind, filter.sections.len());
        Ok(Some(filter))
    }

    /// Magnitude response at `freq` Hz
    pub fn magnitude_at(&self, freq: f64, fs: f64) -> f64 {
        let omega = 2.0 * PI * freq / fs;
        self.sections.iter().map(|s| s.response(omega).norm()).product()
    }

    /// Steady-state initial conditions for a unit step through the cascade
    fn initial_states(&self) -> Vec<[f64; 2]> {
        let mut scale = 1.0;
        self.sections
            .iter()
            .map(|s| {
                let [z0, z1] = s.step_state();
                let state = [z0 * scale, z1 * scale];
                scale *= s.dc_gain();
                state
            })
            .collect()
    }

    /// Single causal pass, starting from steady state for `samples[0]`
    fn forward(&self, samples: &mut [f64], states: &[[f64; 2]]) {
        let Some(&x0) = samples.first() else {
            return;
        };
        for (section, zi) in self.sections.iter().zip(states) {
            section.run(samples, [zi[0] * x0, zi[1] * x0]);
        }
    }

    /// Forward-backward (zero-phase) filtering
    pub fn filtfilt(&self, samples: &[f64]) -> Vec<f64> {
        let n = samples.len();
        if n < 2 {
            return samples.to_vec();
        }

        let padlen = (3 * (2 * self.sections.len() + 1)).min(n - 1);
        let first = samples[0];
        let last = samples[n - 1];

        // Odd extension on both ends
        let mut ext = Vec::with_capacity(n + 2 * padlen);
        ext.extend((1..=padlen).rev().map(|i| 2.0 * first - samples[i]));
        ext.extend_from_slice(samples);
        ext.extend((1..=padlen).map(|i| 2.0 * last - samples[n - 1 - i]));

        let states = self.initial_states();
        self.forward(&mut ext, &states);
        ext.reverse();
        self.forward(&mut ext, &states);
        ext.reverse();

        ext[padlen..padlen + n].to_vec()
    }
}

/// Apply the filter named by `spec` with zero phase; unfiltered when the
/// method is `none`.
pub fn apply_filter(samples: &[f64], fs: f64, spec: &ProcessingSpec) -> Result<Vec<f64>, SignalError> {
    let kind = FilterKind::from_processing(spec);
    match SosFilter::design(kind, fs)? {
        Some(filter) => Ok(filter.filtfilt(samples)),
        None => Ok(samples.to_vec()),
    }
}
