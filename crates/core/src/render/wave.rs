use crate::{
    surface::{DrawingSurface, Path, Point, Stroke},
    Theme,
};

const LINE_WIDTH: f32 = 3.0;

/// Oscilloscope-style polyline. Bytes are centred on 128 even though the
/// frame carries frequency magnitudes, so energetic frames sit in the
/// lower half of the surface in screen coordinates.
pub(super) fn draw<S: DrawingSurface + ?Sized>(surface: &mut S, samples: &[u8], theme: &Theme) {
    let path = trace(surface.width() as f32, surface.height() as f32, samples);
    surface.stroke_path(&path, &Stroke::new(theme.primary, LINE_WIDTH));
}

fn trace(width: f32, height: f32, samples: &[u8]) -> Path {
    let mut path = Path::with_capacity(samples.len() + 1);
    let slice_width = if samples.is_empty() {
        0.0
    } else {
        width / samples.len() as f32
    };

    let mut x = 0.0;
    for (i, &sample) in samples.iter().enumerate() {
        let v = sample as f32 / 128.0;
        let point = Point::new(x, v * height / 2.0);
        if i == 0 {
            path.move_to(point);
        } else {
            path.line_to(point);
        }
        x += slice_width;
    }

    path.line_to(Point::new(width, height / 2.0));
    path
}
