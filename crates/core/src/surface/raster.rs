use std::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point as PixelPoint, Size},
    pixelcolor::PixelColor,
    primitives::{Circle, PointsIter, Polyline, Primitive, PrimitiveStyle, Rectangle},
    Drawable, Pixel,
};

use super::{DrawingSurface, Paint, Path, Point, Rect, Stroke};
use crate::Color;

/// Coordinates are clamped to this many pixels either side of the origin
/// before they reach the rasteriser.
const COORD_LIMIT: f32 = 65_536.0;

// The buffer stores RGBA bytes directly, so colours carry no raw encoding.
impl PixelColor for Color {
    type Raw = ();
}

/// RGBA8 pixel buffer implementing [`DrawingSurface`].
///
/// Shapes are rasterised by `embedded-graphics`; pixels are straight alpha
/// and composited source-over as they land in the buffer.
#[derive(Clone)]
pub struct PixelCanvas {
    background: Color,
    buffer: RgbaBuffer,
}

#[derive(Clone)]
struct RgbaBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbaBuffer {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

impl OriginDimensions for RgbaBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for RgbaBuffer {
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if x >= self.width || y >= self.height {
                continue;
            }
            let offset = self.offset(x, y);
            let px = &mut self.pixels[offset..offset + 4];
            let dst = Color::rgba(px[0], px[1], px[2], px[3]);
            px.copy_from_slice(&over(dst, color).to_array());
        }
        Ok(())
    }
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            background: Color::TRANSPARENT,
            buffer: RgbaBuffer::new(width, height),
        }
    }

    /// Raw drawn pixels, without the background.
    pub fn as_rgba(&self) -> &[u8] {
        &self.buffer.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.buffer.width || y >= self.buffer.height {
            return None;
        }
        let offset = self.buffer.offset(x, y);
        let px = &self.buffer.pixels[offset..offset + 4];
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Pixels composited over the background colour, ready for export.
    pub fn composited_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.buffer.pixels.len());
        for px in self.buffer.pixels.chunks_exact(4) {
            let drawn = Color::rgba(px[0], px[1], px[2], px[3]);
            out.extend_from_slice(&over(self.background, drawn).to_array());
        }
        out
    }

    /// Number of pixels with non-zero alpha.
    pub fn painted_pixels(&self) -> usize {
        self.buffer.pixels.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    /// Pixel-aligned area covering every pixel whose centre lies in `rect`,
    /// clipped to the canvas.
    fn pixel_area(&self, rect: Rect) -> Option<Rectangle> {
        let finite = [rect.x, rect.y, rect.width, rect.height]
            .iter()
            .all(|v| v.is_finite());
        if rect.is_empty() || !finite {
            return None;
        }

        let span = |start: f32, len: f32, limit: u32| {
            let limit = limit as f32;
            let first = (start.clamp(0.0, limit) - 0.5).ceil().max(0.0);
            let end = ((start + len).clamp(0.0, limit) - 0.5).floor() + 1.0;
            (end > first).then(|| (first as i32, (end - first) as u32))
        };
        let (x, width) = span(rect.x, rect.width, self.buffer.width)?;
        let (y, height) = span(rect.y, rect.height, self.buffer.height)?;
        Some(Rectangle::new(PixelPoint::new(x, y), Size::new(width, height)))
    }
}

impl std::fmt::Debug for PixelCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelCanvas")
            .field("width", &self.buffer.width)
            .field("height", &self.buffer.height)
            .field("background", &self.background)
            .finish()
    }
}

impl DrawingSurface for PixelCanvas {
    fn width(&self) -> u32 {
        self.buffer.width
    }

    fn height(&self) -> u32 {
        self.buffer.height
    }

    /// Resizing discards the current pixels, like a canvas element does.
    fn resize(&mut self, width: u32, height: u32) {
        self.buffer = RgbaBuffer::new(width, height);
    }

    fn background(&self) -> Color {
        self.background
    }

    fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    fn clear(&mut self) {
        self.buffer.pixels.fill(0);
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        let Some(area) = self.pixel_area(rect) else {
            return;
        };
        let drawn = match paint {
            Paint::Solid(color) => self.buffer.fill_solid(&area, *color),
            gradient => self.buffer.draw_iter(shade(area.points(), gradient)),
        };
        settle(drawn);
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        if !(radius > 0.0) || !center.is_finite() {
            return;
        }
        let circle = Circle::with_center(to_pixel(center), diameter(radius));
        let drawn = match paint {
            Paint::Solid(color) => circle
                .into_styled(PrimitiveStyle::with_fill(*color))
                .draw(&mut self.buffer),
            gradient => self.buffer.draw_iter(shade(circle.points(), gradient)),
        };
        settle(drawn);
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, stroke: &Stroke) {
        let Some(width) = stroke_width(stroke) else {
            return;
        };
        if !(radius > 0.0) || !center.is_finite() {
            return;
        }
        settle(
            Circle::with_center(to_pixel(center), diameter(radius))
                .into_styled(PrimitiveStyle::with_stroke(stroke.color, width))
                .draw(&mut self.buffer),
        );
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke) {
        let Some(width) = stroke_width(stroke) else {
            return;
        };
        let style = PrimitiveStyle::with_stroke(stroke.color, width);
        for run in path.points().split(|point| !point.is_finite()) {
            if run.len() < 2 {
                continue;
            }
            let vertices: Vec<PixelPoint> = run.iter().copied().map(to_pixel).collect();
            settle(Polyline::new(&vertices).into_styled(style).draw(&mut self.buffer));
        }
    }
}

fn to_pixel(point: Point) -> PixelPoint {
    PixelPoint::new(
        point.x.clamp(-COORD_LIMIT, COORD_LIMIT).floor() as i32,
        point.y.clamp(-COORD_LIMIT, COORD_LIMIT).floor() as i32,
    )
}

fn diameter(radius: f32) -> u32 {
    (radius.min(COORD_LIMIT) * 2.0).round() as u32
}

fn stroke_width(stroke: &Stroke) -> Option<u32> {
    (stroke.width > 0.0).then(|| stroke.width.min(COORD_LIMIT).round().max(1.0) as u32)
}

/// Evaluates a paint at the centre of every pixel of a shape.
fn shade<'a>(
    points: impl Iterator<Item = PixelPoint> + 'a,
    paint: &'a Paint,
) -> impl Iterator<Item = Pixel<Color>> + 'a {
    points.map(move |p| {
        let centre = Point::new(p.x as f32 + 0.5, p.y as f32 + 0.5);
        Pixel(p, paint.color_at(centre))
    })
}

fn settle(drawn: Result<(), Infallible>) {
    if let Err(never) = drawn {
        match never {}
    }
}

/// Source-over compositing of straight-alpha colours.
fn over(dst: Color, src: Color) -> Color {
    if src.a == 255 || dst.a == 0 {
        return src;
    }
    if src.a == 0 {
        return dst;
    }
    let coverage = src.a as f32 / 255.0;
    let alpha = dst.a as f32 + (255.0 - dst.a as f32) * coverage;
    Color {
        a: alpha.round() as u8,
        ..dst.lerp(src, coverage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::GradientStop;

    const RED: Color = Color::rgb(255, 0, 0);

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut canvas = PixelCanvas::new(10, 10);
        canvas.fill_rect(Rect::new(-5.0, -5.0, 8.0, 100.0), &Paint::Solid(RED));

        assert_eq!(canvas.pixel(0, 0), Some(RED));
        assert_eq!(canvas.pixel(2, 9), Some(RED));
        assert_eq!(canvas.pixel(3, 0), Some(Color::TRANSPARENT));
        assert_eq!(canvas.painted_pixels(), 30);
    }

    #[test]
    fn fill_rect_with_gradient_shades_each_row() {
        let mut canvas = PixelCanvas::new(2, 10);
        let paint = Paint::LinearGradient {
            start: Point::new(0.0, 10.0),
            end: Point::new(0.0, 0.0),
            stops: vec![
                GradientStop { offset: 0.0, color: RED },
                GradientStop { offset: 1.0, color: Color::rgb(0, 0, 255) },
            ],
        };
        canvas.fill_rect(Rect::new(0.0, 0.0, 2.0, 10.0), &paint);

        let top = canvas.pixel(0, 0).unwrap();
        let bottom = canvas.pixel(0, 9).unwrap();
        assert!(top.b > 200 && top.r < 50, "{top:?}");
        assert!(bottom.r > 200 && bottom.b < 50, "{bottom:?}");
        assert_eq!(canvas.pixel(1, 0), Some(top));
        assert_eq!(canvas.painted_pixels(), 20);
    }

    #[test]
    fn clear_keeps_background() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.set_background(Color::rgb(1, 2, 3));
        canvas.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &Paint::Solid(RED));
        canvas.clear();

        assert_eq!(canvas.painted_pixels(), 0);
        assert_eq!(canvas.background(), Color::rgb(1, 2, 3));
        assert_eq!(&canvas.composited_rgba()[..4], &[1, 2, 3, 255]);
    }

    #[test]
    fn degenerate_geometry_is_a_no_op() {
        let mut canvas = PixelCanvas::new(8, 8);
        let stroke = Stroke::new(RED, 2.0);
        canvas.stroke_circle(Point::new(4.0, 4.0), -10.0, &stroke);
        canvas.fill_circle(Point::new(4.0, 4.0), 0.0, &Paint::Solid(RED));
        canvas.fill_circle(Point::new(f32::NAN, 4.0), 3.0, &Paint::Solid(RED));
        canvas.fill_rect(Rect::new(0.0, 0.0, 0.0, 5.0), &Paint::Solid(RED));
        canvas.fill_rect(Rect::new(0.0, 0.0, f32::INFINITY, 5.0), &Paint::Solid(RED));

        let mut single = Path::new();
        single.move_to(Point::new(1.0, 1.0));
        canvas.stroke_path(&single, &stroke);

        let mut line = Path::new();
        line.move_to(Point::new(0.0, 4.0));
        line.line_to(Point::new(8.0, 4.0));
        canvas.stroke_path(&line, &Stroke::new(RED, 0.0));

        assert_eq!(canvas.painted_pixels(), 0);
    }

    #[test]
    fn strokes_paths_and_circles() {
        let mut canvas = PixelCanvas::new(20, 20);
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 10.0));
        path.line_to(Point::new(19.0, 10.0));
        canvas.stroke_path(&path, &Stroke::new(RED, 2.0));
        let column: Vec<_> = (0..20).filter(|&y| canvas.pixel(5, y) == Some(RED)).collect();
        assert!(column.len() >= 2, "{column:?}");
        assert!(column.iter().all(|y| (8..=12).contains(y)), "{column:?}");

        canvas.clear();
        canvas.stroke_circle(Point::new(10.0, 10.0), 6.0, &Stroke::new(RED, 2.0));
        assert!((14..=17).any(|x| canvas.pixel(x, 10) == Some(RED)));
        assert!((3..=6).any(|x| canvas.pixel(x, 10) == Some(RED)));
        assert_eq!(canvas.pixel(10, 10), Some(Color::TRANSPARENT));
    }

    #[test]
    fn fills_discs_around_the_centre() {
        let mut canvas = PixelCanvas::new(20, 20);
        canvas.fill_circle(Point::new(10.0, 10.0), 3.0, &Paint::Solid(RED));
        assert_eq!(canvas.pixel(10, 10), Some(RED));
        assert_eq!(canvas.pixel(0, 0), Some(Color::TRANSPARENT));
        assert!(canvas.painted_pixels() >= 20 && canvas.painted_pixels() <= 40);
    }

    #[test]
    fn paths_with_non_finite_points_draw_their_finite_runs() {
        let mut canvas = PixelCanvas::new(20, 20);
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 2.0));
        path.line_to(Point::new(19.0, 2.0));
        path.line_to(Point::new(f32::NAN, 10.0));
        path.line_to(Point::new(0.0, 15.0));
        path.line_to(Point::new(19.0, 15.0));
        canvas.stroke_path(&path, &Stroke::new(RED, 1.0));

        assert_eq!(canvas.pixel(10, 2), Some(RED));
        assert_eq!(canvas.pixel(10, 15), Some(RED));
        assert_eq!(canvas.pixel(10, 8), Some(Color::TRANSPARENT));
    }

    #[test]
    fn resize_discards_pixels() {
        let mut canvas = PixelCanvas::new(2, 2);
        canvas.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), &Paint::Solid(RED));
        canvas.resize(3, 5);
        assert_eq!(canvas.as_rgba().len(), 3 * 5 * 4);
        assert_eq!(canvas.painted_pixels(), 0);
    }

    #[test]
    fn translucent_paint_blends_over_existing_pixels() {
        let mut canvas = PixelCanvas::new(1, 1);
        canvas.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), &Paint::Solid(Color::rgb(0, 0, 255)));
        canvas.fill_rect(
            Rect::new(0.0, 0.0, 1.0, 1.0),
            &Paint::Solid(Color::rgba(255, 0, 0, 128)),
        );
        let px = canvas.pixel(0, 0).unwrap();
        assert_eq!(px.a, 255);
        assert!(px.r > 120 && px.b > 120);
    }
}
