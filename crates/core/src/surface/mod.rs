//! Drawing surface abstraction consumed by the renderer.
//!
//! The renderer only issues draw calls; who owns the pixels (a raster
//! buffer, a command recorder, a browser canvas) is decided by the host.

use serde::{Deserialize, Serialize};

use crate::Color;

mod raster;

pub use raster::PixelCanvas;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

/// Fill style for rectangles and discs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paint {
    Solid(Color),
    /// Gradient along the `start -> end` axis in surface coordinates. Stops
    /// must be sorted by offset.
    LinearGradient {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    /// Colour of the paint at `point`. Positions before the first or after
    /// the last stop take the colour of that stop.
    pub fn color_at(&self, point: Point) -> Color {
        match self {
            Paint::Solid(color) => *color,
            Paint::LinearGradient { start, end, stops } => {
                let axis = (end.x - start.x, end.y - start.y);
                let length_sq = axis.0 * axis.0 + axis.1 * axis.1;
                let t = if length_sq > 0.0 {
                    ((point.x - start.x) * axis.0 + (point.y - start.y) * axis.1) / length_sq
                } else {
                    0.0
                };
                gradient_color(stops, t)
            }
        }
    }

    /// Every colour that may appear when this paint is used.
    pub fn colors(&self) -> Vec<Color> {
        match self {
            Paint::Solid(color) => vec![*color],
            Paint::LinearGradient { stops, .. } => stops.iter().map(|stop| stop.color).collect(),
        }
    }
}

fn gradient_color(stops: &[GradientStop], t: f32) -> Color {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Color::TRANSPARENT;
    };

    if t <= first.offset {
        return first.color;
    }
    if t >= last.offset {
        return last.color;
    }

    for pair in stops.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if t <= to.offset {
            let span = to.offset - from.offset;
            let local = if span > 0.0 { (t - from.offset) / span } else { 1.0 };
            return from.color.lerp(to.color, local);
        }
    }

    last.color
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

/// Single open polyline. The first point acts as the pen-down position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Starts the polyline over at `point`.
    pub fn move_to(&mut self, point: Point) {
        self.points.clear();
        self.points.push(point);
    }

    /// Extends the polyline. On an empty path this behaves like
    /// [`Path::move_to`].
    pub fn line_to(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Number of straight segments the path strokes.
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

/// 2D raster target the renderer paints onto.
///
/// Implementations clip natively: geometry outside the surface bounds is
/// simply not visible, and degenerate geometry is a no-op rather than an
/// error.
pub trait DrawingSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn resize(&mut self, width: u32, height: u32);

    /// Background shown behind the drawn content. Not affected by
    /// [`DrawingSurface::clear`].
    fn background(&self) -> Color;
    fn set_background(&mut self, color: Color);

    /// Resets every pixel to fully transparent.
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);
    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint);
    fn stroke_circle(&mut self, center: Point, radius: f32, stroke: &Stroke);
    fn stroke_path(&mut self, path: &Path, stroke: &Stroke);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_stop() -> Paint {
        Paint::LinearGradient {
            start: Point::new(0.0, 100.0),
            end: Point::new(0.0, 0.0),
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: Color::rgb(255, 0, 0),
                },
                GradientStop {
                    offset: 0.5,
                    color: Color::rgb(0, 255, 0),
                },
                GradientStop {
                    offset: 1.0,
                    color: Color::rgb(0, 0, 255),
                },
            ],
        }
    }

    #[test]
    fn vertical_gradient_runs_bottom_to_top() {
        let paint = three_stop();
        assert_eq!(paint.color_at(Point::new(10.0, 100.0)), Color::rgb(255, 0, 0));
        assert_eq!(paint.color_at(Point::new(10.0, 50.0)), Color::rgb(0, 255, 0));
        assert_eq!(paint.color_at(Point::new(10.0, 0.0)), Color::rgb(0, 0, 255));
        // Beyond the axis the end stops are extended.
        assert_eq!(paint.color_at(Point::new(0.0, -40.0)), Color::rgb(0, 0, 255));
        assert_eq!(paint.color_at(Point::new(0.0, 400.0)), Color::rgb(255, 0, 0));
    }

    #[test]
    fn degenerate_gradient_axis_uses_first_stop() {
        let paint = Paint::LinearGradient {
            start: Point::new(5.0, 5.0),
            end: Point::new(5.0, 5.0),
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: Color::rgb(1, 2, 3),
                },
                GradientStop {
                    offset: 1.0,
                    color: Color::rgb(9, 9, 9),
                },
            ],
        };
        assert_eq!(paint.color_at(Point::new(0.0, 0.0)), Color::rgb(1, 2, 3));
    }

    #[test]
    fn line_to_on_empty_path_starts_it() {
        let mut path = Path::new();
        path.line_to(Point::new(3.0, 4.0));
        assert_eq!(path.points(), &[Point::new(3.0, 4.0)]);
        assert_eq!(path.segment_count(), 0);

        path.line_to(Point::new(5.0, 6.0));
        assert_eq!(path.segment_count(), 1);

        path.move_to(Point::new(0.0, 0.0));
        assert_eq!(path.segment_count(), 0);
    }
}
