use std::sync::{Arc, Mutex, MutexGuard};

use crate::{AnalyserConfig, FreqVizError, Result, SampleProvider, SpectrumAnalyser};

type SharedAnalyser = Arc<Mutex<Option<SpectrumAnalyser>>>;

/// Audio graph façade: a playback source optionally routed through a
/// spectrum analyser.
///
/// The analyser only exists while the graph is connected. Handles obtained
/// from [`AudioGraph::handle`] stay valid across reconnects and read
/// silence while disconnected.
#[derive(Debug)]
pub struct AudioGraph {
    config: AnalyserConfig,
    analyser: SharedAnalyser,
}

impl AudioGraph {
    /// Creates a disconnected graph. The frame length is fixed here, from
    /// the configured transform size.
    pub fn new(config: AnalyserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            analyser: Arc::new(Mutex::new(None)),
        })
    }

    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    pub fn bin_count(&self) -> usize {
        self.config.bin_count()
    }

    /// Routes the source through the analyser. Reconnecting keeps the
    /// transform plan but discards the previous analysis history.
    pub fn connect(&self) -> Result<()> {
        let mut slot = self.lock()?;
        match slot.as_mut() {
            Some(analyser) => analyser.reset(),
            None => *slot = Some(SpectrumAnalyser::new(self.config.clone())?),
        }
        tracing::debug!(fft_size = self.config.fft_size, "audio graph connected");
        Ok(())
    }

    pub fn disconnect(&self) -> Result<()> {
        *self.lock()? = None;
        tracing::debug!("audio graph disconnected");
        Ok(())
    }

    pub fn is_connected(&self) -> Result<bool> {
        Ok(self.lock()?.is_some())
    }

    /// Feeds decoded playback samples into the analyser. Samples pushed
    /// while disconnected are dropped.
    pub fn push_samples(&self, samples: &[f32]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        if let Some(analyser) = self.lock()?.as_mut() {
            analyser.push_samples(samples);
        }
        Ok(())
    }

    /// Returns a provider view over the shared analyser.
    pub fn handle(&self) -> AnalyserHandle {
        AnalyserHandle {
            bins: self.bin_count(),
            shared: self.analyser.clone(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<SpectrumAnalyser>>> {
        self.analyser
            .lock()
            .map_err(|_| FreqVizError::msg("analyser has been poisoned"))
    }
}

/// Shared, thread-safe [`SampleProvider`] over the analyser managed by
/// [`AudioGraph`].
#[derive(Clone)]
pub struct AnalyserHandle {
    bins: usize,
    shared: SharedAnalyser,
}

impl SampleProvider for AnalyserHandle {
    fn bin_count(&self) -> usize {
        self.bins
    }

    fn read_frame(&mut self, frame: &mut [u8]) {
        match self.shared.lock() {
            Ok(mut slot) => match slot.as_mut() {
                Some(analyser) => analyser.read_frame(frame),
                None => frame.fill(0),
            },
            Err(_) => {
                tracing::warn!("analyser has been poisoned, emitting silence");
                frame.fill(0);
            }
        }
    }
}

impl std::fmt::Debug for AnalyserHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyserHandle")
            .field("bins", &self.bins)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::TAU;

    use super::*;

    fn tone(len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| (TAU * 3_000.0 * n as f32 / 48_000.0).sin())
            .collect()
    }

    #[test]
    fn disconnected_graph_reads_silence() {
        let graph = AudioGraph::new(AnalyserConfig::default()).unwrap();
        let mut handle = graph.handle();

        graph.push_samples(&tone(512)).unwrap();

        let mut frame = vec![1u8; handle.bin_count()];
        handle.read_frame(&mut frame);
        assert_eq!(frame.len(), 256);
        assert!(frame.iter().all(|&b| b == 0));
        assert!(!graph.is_connected().unwrap());
    }

    #[test]
    fn pushes_samples_into_shared_analyser() {
        let graph = AudioGraph::new(AnalyserConfig::default()).unwrap();
        let mut handle = graph.handle();
        graph.connect().unwrap();

        graph.push_samples(&tone(512)).unwrap();

        let mut frame = vec![0u8; handle.bin_count()];
        handle.read_frame(&mut frame);
        assert!(frame[32] > 0);

        graph.disconnect().unwrap();
        handle.read_frame(&mut frame);
        assert!(frame.iter().all(|&b| b == 0));
    }

    #[test]
    fn reconnecting_discards_analysis_history() {
        let graph = AudioGraph::new(AnalyserConfig::default()).unwrap();
        let mut handle = graph.handle();
        graph.connect().unwrap();
        graph.push_samples(&tone(512)).unwrap();

        graph.connect().unwrap();
        assert!(graph.is_connected().unwrap());

        let mut frame = vec![1u8; handle.bin_count()];
        handle.read_frame(&mut frame);
        assert!(frame.iter().all(|&b| b == 0));
    }

    #[test]
    fn handles_share_one_analyser_across_threads() {
        let graph = AudioGraph::new(AnalyserConfig::default()).unwrap();
        graph.connect().unwrap();
        let handle = graph.handle();

        let producer = std::thread::spawn(move || {
            graph.push_samples(&tone(1024)).unwrap();
            graph
        });
        let _graph = producer.join().unwrap();

        let mut reader = handle.clone();
        let mut frame = vec![0u8; reader.bin_count()];
        reader.read_frame(&mut frame);
        assert!(frame.iter().any(|&b| b > 0));
    }

    #[test]
    fn rejects_invalid_configuration() {
        let config = AnalyserConfig {
            fft_size: 100,
            ..AnalyserConfig::default()
        };
        assert!(AudioGraph::new(config).is_err());
    }
}
