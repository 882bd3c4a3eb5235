use crate::features::{FeatureVector, FEATURE_DIM};
use bristle_core::{BristleError, BristleResult};
use std::collections::VecDeque;
use tracing::debug;

/// Mean |z| of 4 across the features maps to magnitude 1.0.
const Z_SATURATION: f64 = 4.0;

const VAR_EPS: f64 = 1e-6;

/// Per-feature baseline fitted over the training buffer. Scoring is a
/// mean absolute z-score against it, squashed by `Z_SATURATION` so that
/// in-distribution vectors land well under the trigger threshold.
#[derive(Debug, Clone)]
pub struct BaselineModel {
    means: [f64; FEATURE_DIM],
    stds: [f64; FEATURE_DIM],
    trained_on: usize,
}

impl BaselineModel {
    fn fit(samples: &[[f64; FEATURE_DIM]]) -> BristleResult<Self> {
        if samples.is_empty() {
            return Err(BristleError::Detector("no training samples".to_string()));
        }

        let n = samples.len() as f64;
        let mut means = [0.0; FEATURE_DIM];
        let mut stds = [0.0; FEATURE_DIM];

        for dim in 0..FEATURE_DIM {
            means[dim] = samples.iter().map(|s| s[dim]).sum::<f64>() / n;
        }
        for dim in 0..FEATURE_DIM {
            let var = samples
                .iter()
                .map(|s| (s[dim] - means[dim]).powi(2))
                .sum::<f64>()
                / n;
            stds[dim] = var.sqrt();
        }

        if stds.iter().all(|s| *s < VAR_EPS) {
            return Err(BristleError::Detector(
                "degenerate training buffer: zero variance on every feature".to_string(),
            ));
        }

        Ok(Self {
            means,
            stds,
            trained_on: samples.len(),
        })
    }

    /// Anomaly magnitude of one vector against the baseline. Larger means
    /// less like the training buffer; values pushing past ~0.5 are worth a
    /// look, which is where the engine's trigger threshold sits.
    pub fn score(&self, fv: &FeatureVector) -> BristleResult<f64> {
        let x = fv.as_array();
        let mut total = 0.0;
        for dim in 0..FEATURE_DIM {
            total += (x[dim] - self.means[dim]).abs() / (self.stds[dim] + VAR_EPS);
        }
        let magnitude = total / FEATURE_DIM as f64 / Z_SATURATION;

        if !magnitude.is_finite() {
            return Err(BristleError::Detector(
                "non-finite anomaly magnitude".to_string(),
            ));
        }
        Ok(magnitude)
    }

    pub fn trained_on(&self) -> usize {
        self.trained_on
    }
}

/// Detector capability state. Scoring dispatches on the variant instead of
/// probing a maybe-present model.
#[derive(Debug, Clone)]
pub enum NoveltyDetector {
    Unavailable,
    Ready(BaselineModel),
}

/// Owns the rolling training buffer and the detector state. Refitting is
/// an explicit maintenance call, never part of the scoring path.
pub struct AnomalyGate {
    buffer: VecDeque<FeatureVector>,
    detector: NoveltyDetector,
    buffer_cap: usize,
    min_samples: usize,
}

impl AnomalyGate {
    pub fn new(buffer_cap: usize, min_samples: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(buffer_cap),
            detector: NoveltyDetector::Unavailable,
            buffer_cap,
            min_samples,
        }
    }

    pub fn record(&mut self, fv: &FeatureVector) {
        self.buffer.push_back(*fv);
        if self.buffer.len() > self.buffer_cap {
            self.buffer.pop_front();
        }
    }

    /// Fits a fresh baseline over the buffer. `Ok(false)` when the buffer
    /// has not yet passed `min_samples`; an error leaves the previous
    /// detector state untouched.
    pub fn refit(&mut self) -> BristleResult<bool> {
        if self.buffer.len() <= self.min_samples {
            debug!(
                samples = self.buffer.len(),
                needed = self.min_samples + 1,
                "not enough samples to fit baseline"
            );
            return Ok(false);
        }

        let samples: Vec<[f64; FEATURE_DIM]> = self.buffer.iter().map(|f| f.as_array()).collect();
        let model = BaselineModel::fit(&samples)?;
        self.detector = NoveltyDetector::Ready(model);
        Ok(true)
    }

    pub fn detector(&self) -> &NoveltyDetector {
        &self.detector
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.detector, NoveltyDetector::Ready(_))
    }

    pub fn training_samples(&self) -> usize {
        self.buffer.len()
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.detector = NoveltyDetector::Unavailable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // spread across every feature so the baseline has variance
    fn sample(i: usize) -> FeatureVector {
        let v = i as f64;
        FeatureVector {
            velocity: 0.2 + v * 0.01,
            length_deviation: 0.5 + v * 0.02,
            caps_ratio: 0.05 + v * 0.001,
            punct_ratio: 0.1 + v * 0.002,
            emoji_ratio: 0.01 + v * 0.001,
            url_count: (i % 2) as f64,
            distinct_word_ratio: 0.8 - v * 0.005,
            timing_ratio: 1.0 + v * 0.01,
        }
    }

    fn fitted_gate(n: usize) -> AnomalyGate {
        let mut gate = AnomalyGate::new(100, 10);
        for i in 0..n {
            gate.record(&sample(i));
        }
        gate.refit().unwrap();
        gate
    }

    #[test]
    fn starts_unavailable() {
        let gate = AnomalyGate::new(100, 10);
        assert!(!gate.is_ready());
        assert!(matches!(gate.detector(), NoveltyDetector::Unavailable));
    }

    #[test]
    fn refit_needs_more_than_min_samples() {
        let mut gate = AnomalyGate::new(100, 10);
        for i in 0..10 {
            gate.record(&sample(i));
        }
        assert!(!gate.refit().unwrap());
        assert!(!gate.is_ready());

        gate.record(&sample(10));
        assert!(gate.refit().unwrap());
        assert!(gate.is_ready());
    }

    #[test]
    fn refit_rejects_constant_buffer() {
        let mut gate = AnomalyGate::new(100, 10);
        for _ in 0..12 {
            gate.record(&sample(5));
        }
        assert!(gate.refit().is_err());
        assert!(!gate.is_ready());
    }

    #[test]
    fn buffer_is_ring_bounded() {
        let mut gate = AnomalyGate::new(100, 10);
        for i in 0..150 {
            gate.record(&sample(i));
        }
        assert_eq!(gate.training_samples(), 100);
    }

    #[test]
    fn in_distribution_vector_scores_low() {
        let gate = fitted_gate(20);
        let NoveltyDetector::Ready(model) = gate.detector() else {
            panic!("expected fitted detector");
        };
        let magnitude = model.score(&sample(10)).unwrap();
        assert!(magnitude < 0.5, "magnitude {magnitude} should be quiet");
    }

    #[test]
    fn outlier_vector_scores_high() {
        let gate = fitted_gate(20);
        let NoveltyDetector::Ready(model) = gate.detector() else {
            panic!("expected fitted detector");
        };
        let outlier = FeatureVector {
            velocity: 50.0,
            length_deviation: 20.0,
            caps_ratio: 0.9,
            punct_ratio: 0.8,
            emoji_ratio: 0.7,
            url_count: 12.0,
            distinct_word_ratio: 0.05,
            timing_ratio: 40.0,
        };
        let magnitude = model.score(&outlier).unwrap();
        assert!(magnitude > 0.5, "magnitude {magnitude} should flag");
    }

    #[test]
    fn reset_returns_to_unavailable() {
        let mut gate = fitted_gate(20);
        gate.reset();
        assert!(!gate.is_ready());
        assert_eq!(gate.training_samples(), 0);
    }

    #[test]
    fn trained_on_reflects_buffer_size() {
        let gate = fitted_gate(25);
        let NoveltyDetector::Ready(model) = gate.detector() else {
            panic!("expected fitted detector");
        };
        assert_eq!(model.trained_on(), 25);
    }
}
