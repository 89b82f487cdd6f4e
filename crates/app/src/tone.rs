use std::f32::consts::TAU;

/// Synthetic stand-in for a decoded track: a mix of sine partials with a
/// slow swell so the visualisation has something to move with.
#[derive(Debug, Clone)]
pub struct ToneSource {
    frequencies: Vec<f32>,
    sample_rate: f32,
    position: u64,
}

const SWELL_HZ: f32 = 0.5;

impl ToneSource {
    pub fn new(frequencies: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            frequencies,
            sample_rate: sample_rate as f32,
            position: 0,
        }
    }

    /// Produces the next `len` samples in `[-1, 1]`.
    pub fn next_block(&mut self, len: usize) -> Vec<f32> {
        let gain = if self.frequencies.is_empty() {
            0.0
        } else {
            1.0 / self.frequencies.len() as f32
        };

        (0..len)
            .map(|_| {
                let t = self.position as f32 / self.sample_rate;
                self.position += 1;
                let swell = 0.5 * (1.0 + (TAU * SWELL_HZ * t).sin());
                let mix: f32 = self
                    .frequencies
                    .iter()
                    .map(|frequency| (TAU * frequency * t).sin())
                    .sum();
                mix * gain * swell
            })
            .collect()
    }
}
