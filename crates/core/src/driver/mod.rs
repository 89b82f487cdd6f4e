//! Frame loop tying playback state, the sample provider and the renderer
//! together.

use crate::{
    render::{render_frame, RenderContext, VisualizationStyle},
    surface::DrawingSurface,
    timeline::{FrameScheduler, TickHandle},
    LoopSignal, Result, SampleProvider, Theme, ThemeName,
};

/// Whether the loop is currently producing frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Stopped,
    Playing,
}

/// Result of handing a tick to [`VisualizerLoop::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was drawn and the next tick is scheduled.
    Rendered { next: TickHandle },
    /// The tick was cancelled or superseded, or playback has stopped.
    /// Nothing was drawn.
    Stale,
}

/// Playback loop driver.
///
/// Owns the drawing surface, the sample provider and the active style and
/// theme. The host fires the ticks handed out by the loop, once per display
/// refresh.
#[derive(Debug)]
pub struct VisualizerLoop<S, P> {
    surface: S,
    provider: P,
    style: VisualizationStyle,
    theme_name: ThemeName,
    theme: Theme,
    state: LoopState,
    scheduler: FrameScheduler,
    frame: Vec<u8>,
    frames_rendered: u64,
}

impl<S, P> VisualizerLoop<S, P>
where
    S: DrawingSurface,
    P: SampleProvider,
{
    /// Creates a stopped loop and paints the theme background onto the
    /// surface.
    pub fn new(mut surface: S, provider: P, style: VisualizationStyle, theme: ThemeName) -> Self {
        let palette = theme.theme();
        surface.set_background(palette.background);
        Self {
            surface,
            provider,
            style,
            theme_name: theme,
            theme: palette,
            state: LoopState::Stopped,
            scheduler: FrameScheduler::new(),
            frame: Vec::new(),
            frames_rendered: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn style(&self) -> VisualizationStyle {
        self.style
    }

    pub fn theme_name(&self) -> ThemeName {
        self.theme_name
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Sample frame drawn by the most recent tick.
    pub fn last_frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Tick the host should fire next, if any.
    pub fn pending_tick(&self) -> Option<TickHandle> {
        self.scheduler.pending()
    }

    /// Enters the playing state and schedules the first tick. Calling it
    /// while already playing keeps the pending tick.
    pub fn on_playback_started(&mut self) -> TickHandle {
        if self.state == LoopState::Playing {
            if let Some(handle) = self.scheduler.pending() {
                return handle;
            }
        } else {
            // Frame length is fixed for the session.
            self.frame = vec![0; self.provider.bin_count()];
            self.state = LoopState::Playing;
            tracing::info!(
                style = %self.style,
                theme = %self.theme_name,
                bins = self.frame.len(),
                "visualisation started"
            );
        }
        self.scheduler.request_frame()
    }

    /// Cancels the pending tick and clears the surface once.
    pub fn on_playback_stopped(&mut self) {
        self.scheduler.cancel();
        if self.state == LoopState::Playing {
            tracing::info!(frames = self.frames_rendered, "visualisation stopped");
        }
        self.state = LoopState::Stopped;
        self.surface.clear();
    }

    /// Routes a playback transition to the matching loop operation.
    pub fn apply_signal(&mut self, signal: LoopSignal) {
        match signal {
            LoopSignal::Start => {
                self.on_playback_started();
            }
            LoopSignal::Stop => self.on_playback_stopped(),
        }
    }

    /// Takes effect on the next tick.
    pub fn on_style_changed(&mut self, style: VisualizationStyle) {
        if style != self.style {
            tracing::debug!(from = %self.style, to = %style, "visualisation style changed");
        }
        self.style = style;
    }

    /// Switches the palette by name. Unknown names leave the current theme
    /// untouched.
    pub fn on_theme_changed(&mut self, name: &str) -> Result<()> {
        let theme: ThemeName = name.parse()?;
        self.set_theme(theme);
        Ok(())
    }

    /// Takes effect on the next tick; the surface background updates now.
    pub fn set_theme(&mut self, theme: ThemeName) {
        if theme != self.theme_name {
            tracing::debug!(from = %self.theme_name, to = %theme, "colour theme changed");
        }
        self.theme_name = theme;
        self.theme = theme.theme();
        self.surface.set_background(self.theme.background);
    }

    /// Follows a container or viewport size change.
    pub fn resize(&mut self, width: u32, height: u32) {
        tracing::debug!(width, height, "surface resized");
        self.surface.resize(width, height);
    }

    /// Runs one render step for `handle`.
    ///
    /// Stale handles (cancelled by a stop, superseded by a newer request, or
    /// fired twice) and ticks arriving while stopped draw nothing.
    pub fn tick(&mut self, handle: TickHandle) -> TickOutcome {
        if !self.scheduler.fire(handle) {
            tracing::trace!(sequence = handle.sequence(), "dropping stale tick");
            return TickOutcome::Stale;
        }
        if self.state != LoopState::Playing {
            return TickOutcome::Stale;
        }

        self.provider.read_frame(&mut self.frame);
        let ctx = RenderContext::new(self.style, &self.theme, &self.frame);
        render_frame(&mut self.surface, &ctx);
        self.frames_rendered += 1;

        TickOutcome::Rendered {
            next: self.scheduler.request_frame(),
        }
    }

    /// Fires the pending tick, if any. Convenience for hosts that drive the
    /// loop from their own refresh callback.
    pub fn tick_pending(&mut self) -> Option<TickOutcome> {
        self.pending_tick().map(|handle| self.tick(handle))
    }
}
