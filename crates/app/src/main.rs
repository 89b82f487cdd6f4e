mod session;
mod tone;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use freqviz_core::{
    AppConfig, AudioGraph, DisplayList, DrawingSurface, FreqVizError, PixelCanvas, ThemeName,
    VisualizationStyle, VisualizerLoop,
};
use tracing_subscriber::EnvFilter;

use session::SessionOptions;

fn main() -> freqviz_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render { session, output, every } => run_render(&session, &output, every),
        Commands::Trace { session, output } => run_trace(&session, output.as_deref()),
        Commands::Themes => {
            print_themes();
            Ok(())
        }
    }
}

fn run_render(args: &SessionArgs, output: &Path, every: u64) -> freqviz_core::Result<()> {
    let config = args.resolve_config()?;
    tracing::info!(?output, style = %config.visual.style, theme = %config.visual.theme, "rendering frames");

    std::fs::create_dir_all(output)?;
    let graph = AudioGraph::new(config.analyser.clone())?;
    let canvas = PixelCanvas::new(config.surface.width, config.surface.height);
    let mut viz = VisualizerLoop::new(canvas, graph.handle(), config.visual.style, config.visual.theme);

    let every = every.max(1);
    let mut written = 0;
    session::run(&config, &args.options(), &mut viz, &graph, |viz, index| {
        if index % every == 0 {
            let path = output.join(format!("frame_{index:05}.png"));
            save_png(viz.surface(), &path)?;
            written += 1;
        }
        Ok(())
    })?;

    tracing::info!(written, "frames written");
    Ok(())
}

fn run_trace(args: &SessionArgs, output: Option<&Path>) -> freqviz_core::Result<()> {
    let config = args.resolve_config()?;
    let graph = AudioGraph::new(config.analyser.clone())?;
    let list = DisplayList::new(config.surface.width, config.surface.height);
    let mut viz = VisualizerLoop::new(list, graph.handle(), config.visual.style, config.visual.theme);

    // The loop clears the surface on stop, so snapshot the last frame while
    // it is still visible. The list only ever holds the current frame.
    let mut last = None;
    session::run(&config, &args.options(), &mut viz, &graph, |viz, index| {
        last = Some(serde_json::json!({
            "frame": index,
            "style": viz.style(),
            "theme": viz.theme_name(),
            "samples": viz.last_frame(),
            "surface": viz.surface(),
        }));
        Ok(())
    })?;

    let last = last.ok_or_else(|| FreqVizError::msg("no frame was rendered"))?;
    let json = serde_json::to_string_pretty(&last)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(?path, "trace written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn save_png(canvas: &PixelCanvas, path: &Path) -> freqviz_core::Result<()> {
    let image = image::RgbaImage::from_raw(canvas.width(), canvas.height(), canvas.composited_rgba())
        .ok_or_else(|| FreqVizError::msg("canvas buffer does not match its size"))?;
    image
        .save(path)
        .map_err(|err| FreqVizError::msg(format!("failed to write {}: {err}", path.display())))
}

fn print_themes() {
    for name in ThemeName::ALL {
        let theme = name.theme();
        println!(
            "{:<8} primary {}  secondary {}  tertiary {}  background {}",
            name, theme.primary, theme.secondary, theme.tertiary, theme.background
        );
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Spectrum visualiser for a tiny audio player", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a synthetic track and write the visualisation as PNG frames.
    Render {
        #[command(flatten)]
        session: SessionArgs,
        /// Directory receiving `frame_NNNNN.png` files.
        #[arg(short, long, default_value = "frames")]
        output: PathBuf,
        /// Only keep every n-th frame.
        #[arg(long, default_value_t = 1)]
        every: u64,
    },
    /// Play a synthetic track and dump the draw calls of the last frame as JSON.
    Trace {
        #[command(flatten)]
        session: SessionArgs,
        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the built-in colour themes.
    Themes,
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Visualisation style (bars, wave, circle). Unknown names draw bars.
    #[arg(short, long)]
    style: Option<String>,
    /// Colour theme (default, neon, retro).
    #[arg(short, long)]
    theme: Option<String>,
    /// Track key from the catalog.
    #[arg(long, default_value = "track1")]
    track: String,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Number of display refreshes to simulate.
    #[arg(long, default_value_t = 120)]
    frames: u64,
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Partial frequency in Hz; repeat for a chord.
    #[arg(long = "tone", default_values_t = [110.0, 440.0, 3_000.0])]
    tones: Vec<f32>,
    /// Length of the simulated track in seconds.
    #[arg(long, default_value_t = 30.0)]
    duration: f32,
}

impl SessionArgs {
    /// Configuration file (or defaults) with command line overrides applied.
    fn resolve_config(&self) -> freqviz_core::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(style) = &self.style {
            config.visual.style = VisualizationStyle::from_name(style);
        }
        if let Some(theme) = &self.theme {
            config.visual.theme = theme.parse::<ThemeName>()?;
        }
        if let Some(width) = self.width {
            config.surface.width = width;
        }
        if let Some(height) = self.height {
            config.surface.height = height;
        }

        config.validate()?;
        Ok(config)
    }

    fn options(&self) -> SessionOptions {
        SessionOptions {
            track: self.track.clone(),
            frames: self.frames,
            fps: self.fps,
            tones: self.tones.clone(),
            duration_seconds: self.duration,
        }
    }
}
