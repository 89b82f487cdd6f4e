//! Per-frame rendering of a sample frame onto a [`DrawingSurface`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{surface::DrawingSurface, FreqVizError, Result, Theme};

mod bars;
mod radial;
mod wave;

pub use bars::bar_width;
pub use radial::{circle_radius, CIRCLE_MARGIN};

/// Selects the algorithm that turns a sample frame into geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationStyle {
    #[default]
    Bars,
    Wave,
    Circle,
}

impl VisualizationStyle {
    pub const ALL: [VisualizationStyle; 3] = [
        VisualizationStyle::Bars,
        VisualizationStyle::Wave,
        VisualizationStyle::Circle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisualizationStyle::Bars => "bars",
            VisualizationStyle::Wave => "wave",
            VisualizationStyle::Circle => "circle",
        }
    }

    /// Lenient lookup: unrecognised names fall back to [`VisualizationStyle::Bars`].
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(style = name, "unknown visualisation style, falling back to bars");
            VisualizationStyle::Bars
        })
    }
}

impl fmt::Display for VisualizationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualizationStyle {
    type Err = FreqVizError;

    fn from_str(name: &str) -> Result<Self> {
        VisualizationStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == name)
            .ok_or_else(|| FreqVizError::InvalidConfig(format!("unknown visualisation style `{name}`")))
    }
}

/// Everything a single frame needs. Built fresh for every tick so a style or
/// theme change is adopted wholesale by the next frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub style: VisualizationStyle,
    pub theme: &'a Theme,
    pub samples: &'a [u8],
}

impl<'a> RenderContext<'a> {
    pub fn new(style: VisualizationStyle, theme: &'a Theme, samples: &'a [u8]) -> Self {
        Self {
            style,
            theme,
            samples,
        }
    }
}

/// Clears the surface and draws one frame with the selected algorithm.
///
/// Accepts frames of any length, including empty ones.
pub fn render_frame<S: DrawingSurface + ?Sized>(surface: &mut S, ctx: &RenderContext<'_>) {
    surface.clear();

    match ctx.style {
        VisualizationStyle::Bars => bars::draw(surface, ctx.samples, ctx.theme),
        VisualizationStyle::Wave => wave::draw(surface, ctx.samples, ctx.theme),
        VisualizationStyle::Circle => radial::draw(surface, ctx.samples, ctx.theme),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        record::{DisplayList, DrawCommand},
        surface::PixelCanvas,
        ThemeName,
    };

    fn ramp(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 % 256) as u8).collect()
    }

    #[test]
    fn renders_edge_lengths_for_every_style_and_theme() {
        for style in VisualizationStyle::ALL {
            for theme in ThemeName::ALL {
                for len in [0, 1, 3, 256] {
                    let samples = ramp(len);
                    let theme = theme.theme();
                    let ctx = RenderContext::new(style, &theme, &samples);

                    let mut list = DisplayList::new(640, 360);
                    render_frame(&mut list, &ctx);
                    assert_eq!(list.commands().first(), Some(&DrawCommand::Clear));

                    let mut canvas = PixelCanvas::new(64, 36);
                    render_frame(&mut canvas, &ctx);
                }
            }
        }
    }

    #[test]
    fn unknown_style_renders_like_bars() {
        let theme = ThemeName::Retro.theme();
        let samples = ramp(32);

        let mut fallback = DisplayList::new(300, 200);
        render_frame(
            &mut fallback,
            &RenderContext::new(VisualizationStyle::from_name("triangle"), &theme, &samples),
        );

        let mut bars = DisplayList::new(300, 200);
        render_frame(
            &mut bars,
            &RenderContext::new(VisualizationStyle::Bars, &theme, &samples),
        );

        assert_eq!(fallback.commands(), bars.commands());
    }

    #[test]
    fn strict_parse_rejects_unknown_styles() {
        assert_eq!("wave".parse::<VisualizationStyle>().unwrap(), VisualizationStyle::Wave);
        assert!("triangle".parse::<VisualizationStyle>().is_err());
    }

    #[test]
    fn clears_with_transparency_not_background() {
        let theme = ThemeName::Neon.theme();
        let mut canvas = PixelCanvas::new(20, 20);
        canvas.set_background(theme.background);

        render_frame(
            &mut canvas,
            &RenderContext::new(VisualizationStyle::Bars, &theme, &[255; 4]),
        );
        assert!(canvas.painted_pixels() > 0);

        render_frame(
            &mut canvas,
            &RenderContext::new(VisualizationStyle::Bars, &theme, &[]),
        );
        assert_eq!(canvas.painted_pixels(), 0);
        assert_eq!(canvas.background(), theme.background);
    }

    #[test]
    fn frames_only_use_theme_foreground_colours() {
        for style in VisualizationStyle::ALL {
            let theme = ThemeName::Default.theme();
            let samples = ramp(64);
            let mut list = DisplayList::new(400, 400);
            render_frame(&mut list, &RenderContext::new(style, &theme, &samples));

            let colors = list.colors_since_clear();
            assert!(!colors.is_empty());
            assert!(colors.iter().all(|color| theme.foreground().contains(color)));
        }
    }
}
