use crate::shared::constants::TARGET_SAMPLE_RATE;

/// Decoded audio ready for inference: single channel, f32 samples at the
/// model's 16 kHz rate. Produced once per run, immutable after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / f64::from(TARGET_SAMPLE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_keeps_samples() {
        let buffer = AudioBuffer::new(vec![0.5, -0.5]);
        assert_eq!(buffer.samples(), &[0.5, -0.5]);
        assert_eq!(buffer.len(), 2);
        assert!(!buffer.is_empty());
    }

    #[test]
    fn test_duration_at_target_rate() {
        let buffer = AudioBuffer::new(vec![0.0; 48_000]);
        assert_relative_eq!(buffer.duration(), 3.0, epsilon = 1e-9);
    }
}
