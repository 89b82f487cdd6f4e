use std::{f32::consts::TAU, fmt, sync::Arc};

use realfft::{num_complex::Complex32, RealFftPlanner, RealToComplex};

use crate::{AnalyserConfig, Result};

/// Source of sample frames for the render loop.
///
/// Implementations never fail: when no audio is available they hand out
/// all-zero frames.
pub trait SampleProvider {
    /// Length of every frame this provider produces. Constant for the
    /// lifetime of the provider.
    fn bin_count(&self) -> usize;

    /// Fills `frame` with the current spectrum. Bins past
    /// [`SampleProvider::bin_count`] are zeroed.
    fn read_frame(&mut self, frame: &mut [u8]);
}

/// Provider that always yields silence, used before any audio is wired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SilentProvider {
    bins: usize,
}

impl SilentProvider {
    pub fn new(bins: usize) -> Self {
        Self { bins }
    }
}

impl SampleProvider for SilentProvider {
    fn bin_count(&self) -> usize {
        self.bins
    }

    fn read_frame(&mut self, frame: &mut [u8]) {
        frame.fill(0);
    }
}

/// Byte spectrum analyser modelled on the browser analyser node: a Blackman
/// windowed FFT over the most recent `fft_size` samples, smoothed over time
/// and mapped from a decibel window onto `0..=255`.
pub struct SpectrumAnalyser {
    config: AnalyserConfig,
    history: Vec<f32>,
    write_pos: usize,
    window: Vec<f32>,
    smoothed: Vec<f32>,
    plan: Arc<dyn RealToComplex<f32>>,
    input: Vec<f32>,
    spectrum: Vec<Complex32>,
    scratch: Vec<Complex32>,
}

impl SpectrumAnalyser {
    pub fn new(config: AnalyserConfig) -> Result<Self> {
        config.validate()?;

        let size = config.fft_size;
        let plan = RealFftPlanner::<f32>::new().plan_fft_forward(size);
        let input = plan.make_input_vec();
        let spectrum = plan.make_output_vec();
        let scratch = plan.make_scratch_vec();

        Ok(Self {
            history: vec![0.0; size],
            write_pos: 0,
            window: blackman(size),
            smoothed: vec![0.0; size / 2],
            plan,
            input,
            spectrum,
            scratch,
            config,
        })
    }

    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    pub fn fft_size(&self) -> usize {
        self.config.fft_size
    }

    /// Clears the sample history and the smoothing state.
    pub fn reset(&mut self) {
        self.history.fill(0.0);
        self.smoothed.fill(0.0);
        self.write_pos = 0;
    }

    /// Appends time-domain samples, keeping only the newest `fft_size`.
    pub fn push_samples(&mut self, samples: &[f32]) {
        let size = self.history.len();
        let samples = &samples[samples.len().saturating_sub(size)..];
        for &sample in samples {
            self.history[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % size;
        }
    }

    /// Computes the current magnitude spectrum into `out` as bytes.
    ///
    /// Each call advances the smoothing state, so calling it twice without
    /// new samples yields a slightly different second frame.
    pub fn byte_frequency_data(&mut self, out: &mut [u8]) -> Result<()> {
        let size = self.history.len();
        for (i, value) in self.input.iter_mut().enumerate() {
            let sample = self.history[(self.write_pos + i) % size];
            *value = sample * self.window[i];
        }

        self.plan
            .process_with_scratch(&mut self.input, &mut self.spectrum, &mut self.scratch)?;

        let tau = self.config.smoothing;
        let scale = 1.0 / size as f32;
        for (smoothed, bin) in self.smoothed.iter_mut().zip(&self.spectrum) {
            let magnitude = bin.norm() * scale;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;
        }

        let floor = self.config.min_decibels;
        let range = self.config.max_decibels - floor;
        out.fill(0);
        for (byte, &magnitude) in out.iter_mut().zip(&self.smoothed) {
            let db = if magnitude > 0.0 {
                20.0 * magnitude.log10()
            } else {
                f32::NEG_INFINITY
            };
            *byte = (255.0 / range * (db - floor)).floor().clamp(0.0, 255.0) as u8;
        }

        Ok(())
    }

    /// Copies the current waveform into `out` as bytes centred on 128.
    pub fn byte_time_domain_data(&self, out: &mut [u8]) {
        let size = self.history.len();
        out.fill(128);
        for (i, byte) in out.iter_mut().take(size).enumerate() {
            let sample = self.history[(self.write_pos + i) % size];
            *byte = (128.0 * (1.0 + sample)).floor().clamp(0.0, 255.0) as u8;
        }
    }
}

impl SampleProvider for SpectrumAnalyser {
    fn bin_count(&self) -> usize {
        self.config.bin_count()
    }

    fn read_frame(&mut self, frame: &mut [u8]) {
        if let Err(err) = self.byte_frequency_data(frame) {
            tracing::warn!(%err, "spectrum analysis failed, emitting silence");
            frame.fill(0);
        }
    }
}

impl fmt::Debug for SpectrumAnalyser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectrumAnalyser")
            .field("config", &self.config)
            .field("write_pos", &self.write_pos)
            .finish()
    }
}

fn blackman(size: usize) -> Vec<f32> {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;

    (0..size)
        .map(|n| {
            let phase = TAU * n as f32 / size as f32;
            A0 - A1 * phase.cos() + A2 * (2.0 * phase).cos()
        })
        .collect()
}
