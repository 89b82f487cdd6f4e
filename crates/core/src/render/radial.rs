use std::f32::consts::TAU;

use crate::{
    surface::{DrawingSurface, Paint, Path, Point, Stroke},
    Theme,
};

/// Gap between the reference circle and the nearest surface edge.
pub const CIRCLE_MARGIN: f32 = 50.0;

const AMPLITUDE_SCALE: f32 = 0.7;
const DOT_RADIUS: f32 = 3.0;
const RING_WIDTH: f32 = 2.0;
const SPOKE_WIDTH: f32 = 1.0;
const SPOKE_STRIDE: usize = 3;

/// Radius of the reference circle. May be zero or negative on small
/// surfaces.
pub fn circle_radius(width: f32, height: f32) -> f32 {
    (width / 2.0).min(height / 2.0) - CIRCLE_MARGIN
}

fn project(center: Point, radius: f32, sample: u8, index: usize, bins: usize) -> Point {
    let amplitude = sample as f32 * AMPLITUDE_SCALE;
    let angle = index as f32 * TAU / bins as f32;
    Point::new(
        center.x + (radius + amplitude) * angle.cos(),
        center.y + (radius + amplitude) * angle.sin(),
    )
}

pub(super) fn draw<S: DrawingSurface + ?Sized>(surface: &mut S, samples: &[u8], theme: &Theme) {
    let width = surface.width() as f32;
    let height = surface.height() as f32;
    let center = Point::new(width / 2.0, height / 2.0);
    let radius = circle_radius(width, height);

    if radius > 0.0 {
        surface.stroke_circle(center, radius, &Stroke::new(theme.secondary, RING_WIDTH));
    } else {
        tracing::trace!(radius, "surface too small for the reference circle");
    }

    let dot = Paint::Solid(theme.primary);
    let spoke = Stroke::new(theme.tertiary, SPOKE_WIDTH);
    let bins = samples.len();

    for (i, &sample) in samples.iter().enumerate() {
        let point = project(center, radius, sample, i, bins);
        surface.fill_circle(point, DOT_RADIUS, &dot);

        // Decimated skeleton: each third point links back to the one three
        // indices earlier, using that point's own amplitude.
        if i > 0 && i % SPOKE_STRIDE == 0 {
            let previous = i - SPOKE_STRIDE;
            let mut path = Path::with_capacity(2);
            path.move_to(project(center, radius, samples[previous], previous, bins));
            path.line_to(point);
            surface.stroke_path(&path, &spoke);
        }
    }
}
