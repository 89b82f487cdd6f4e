use crate::{
    surface::{DrawingSurface, GradientStop, Paint, Point, Rect},
    Theme,
};

const WIDTH_SCALE: f32 = 2.5;
const HEIGHT_SCALE: f32 = 1.5;
const GAP: f32 = 1.0;

/// Width of a single bar when `bins` bars share `surface_width`. Zero bins
/// yield a zero width.
pub fn bar_width(surface_width: f32, bins: usize) -> f32 {
    if bins == 0 {
        return 0.0;
    }
    surface_width / bins as f32 * WIDTH_SCALE
}

/// Vertical gradient spanning the whole surface: primary at the bottom,
/// tertiary at the top.
fn gradient(height: f32, theme: &Theme) -> Paint {
    Paint::LinearGradient {
        start: Point::new(0.0, height),
        end: Point::new(0.0, 0.0),
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: theme.primary,
            },
            GradientStop {
                offset: 0.5,
                color: theme.secondary,
            },
            GradientStop {
                offset: 1.0,
                color: theme.tertiary,
            },
        ],
    }
}

pub(super) fn draw<S: DrawingSurface + ?Sized>(surface: &mut S, samples: &[u8], theme: &Theme) {
    if samples.is_empty() {
        return;
    }

    let width = surface.width() as f32;
    let height = surface.height() as f32;
    let bar_width = bar_width(width, samples.len());
    let paint = gradient(height, theme);

    // Heights are not clamped; tall bars are clipped by the surface.
    let mut x = 0.0;
    for &sample in samples {
        let bar_height = sample as f32 * HEIGHT_SCALE;
        surface.fill_rect(
            Rect::new(x, height - bar_height, bar_width, bar_height),
            &paint,
        );
        x += bar_width + GAP;
    }
}
