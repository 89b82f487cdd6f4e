//! Core library for the Freqviz audio visualiser.
//!
//! Turns live spectrum frames into bars, waveform or radial renderings on a
//! pluggable drawing surface, driven by an explicit frame loop that follows
//! playback state. Each module owns one concern: the analyser producing
//! frames, the renderer and its algorithms, the surfaces it paints on, the
//! playback lifecycle and the loop that ties them together.

pub mod analysis;
pub mod assets;
pub mod audio;
pub mod color;
pub mod config;
pub mod driver;
pub mod error;
pub mod playback;
pub mod record;
pub mod render;
pub mod surface;
pub mod theme;
pub mod timeline;

pub use analysis::{SampleProvider, SilentProvider, SpectrumAnalyser};
pub use assets::{TrackCatalog, TrackInfo};
pub use audio::{AnalyserHandle, AudioGraph};
pub use color::Color;
pub use config::{AnalyserConfig, AppConfig, SurfaceConfig, VisualConfig};
pub use driver::{LoopState, TickOutcome, VisualizerLoop};
pub use error::{FreqVizError, Result};
pub use playback::{LoopSignal, PlaybackEvent, PlaybackMachine, PlaybackState, Transition};
pub use record::{DisplayList, DrawCommand};
pub use render::{render_frame, RenderContext, VisualizationStyle};
pub use surface::{DrawingSurface, PixelCanvas};
pub use theme::{resolve_theme, Theme, ThemeName};
pub use timeline::{format_time, FrameScheduler, PlaybackClock, TickHandle};
