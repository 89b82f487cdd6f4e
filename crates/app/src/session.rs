use freqviz_core::{
    AnalyserHandle, AppConfig, AudioGraph, DrawingSurface, FreqVizError, PlaybackClock,
    PlaybackEvent, PlaybackMachine, Result, TickOutcome, TrackCatalog, VisualizerLoop,
};

use crate::tone::ToneSource;

/// Host-side settings for one simulated playback session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub track: String,
    pub frames: u64,
    pub fps: u32,
    pub tones: Vec<f32>,
    pub duration_seconds: f32,
}

pub type Visualizer<S> = VisualizerLoop<S, AnalyserHandle>;

/// Plays the role of the browser page: loads a track, pushes synthetic
/// audio through the analyser and fires one tick per display refresh until
/// the frame budget or the track runs out. `on_frame` sees the loop after
/// every rendered frame.
pub fn run<S, F>(
    config: &AppConfig,
    options: &SessionOptions,
    viz: &mut Visualizer<S>,
    graph: &AudioGraph,
    mut on_frame: F,
) -> Result<u64>
where
    S: DrawingSurface,
    F: FnMut(&Visualizer<S>, u64) -> Result<()>,
{
    if options.fps == 0 {
        return Err(FreqVizError::InvalidConfig("fps must be positive".to_string()));
    }

    let catalog = TrackCatalog::builtin();
    let track = catalog.resolve(&options.track)?;
    let mut machine = PlaybackMachine::new();
    let mut clock = PlaybackClock::new(Some(options.duration_seconds));
    let mut source = ToneSource::new(options.tones.clone(), config.analyser.sample_rate);
    let block_len = (config.analyser.sample_rate / options.fps).max(1) as usize;
    let frame_seconds = 1.0 / options.fps as f32;

    tracing::info!(track = %track.display_label(), path = %track.path, "loading track");
    step(&mut machine, viz, PlaybackEvent::Load)?;
    if let Err(err) = graph.connect() {
        step(&mut machine, viz, PlaybackEvent::Error(err.to_string()))?;
        return Err(err);
    }
    step(&mut machine, viz, PlaybackEvent::Ready)?;
    step(&mut machine, viz, PlaybackEvent::Play)?;

    let mut rendered = 0;
    let mut play = || -> Result<()> {
        for _ in 0..options.frames {
            if clock.is_finished() {
                step(&mut machine, viz, PlaybackEvent::Ended)?;
                break;
            }

            graph.push_samples(&source.next_block(block_len))?;
            if let Some(TickOutcome::Rendered { .. }) = viz.tick_pending() {
                on_frame(&*viz, rendered)?;
                rendered += 1;
            }
            clock.advance(frame_seconds);
        }
        Ok(())
    };
    let played = play();

    // Stop and disconnect on every exit path, then report the first error.
    let stopped = if machine.state().is_playing() {
        step(&mut machine, viz, PlaybackEvent::Stop)
    } else {
        Ok(())
    };
    let disconnected = graph.disconnect();
    played?;
    stopped?;
    disconnected?;

    tracing::info!(
        frames = rendered,
        position = %clock.time_label(),
        progress = clock.progress_percent(),
        "session finished"
    );
    Ok(rendered)
}

fn step<S: DrawingSurface>(
    machine: &mut PlaybackMachine,
    viz: &mut Visualizer<S>,
    event: PlaybackEvent,
) -> Result<()> {
    let transition = machine.apply(event)?;
    if let Some(signal) = transition.loop_signal() {
        viz.apply_signal(signal);
    }
    Ok(())
}
