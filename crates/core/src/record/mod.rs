use serde::{Deserialize, Serialize};

use crate::{
    surface::{DrawingSurface, Paint, Path, Point, Rect, Stroke},
    Color,
};

/// Single draw call captured by [`DisplayList`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Resize { width: u32, height: u32 },
    SetBackground { color: Color },
    Clear,
    FillRect { rect: Rect, paint: Paint },
    FillCircle { center: Point, radius: f32, paint: Paint },
    StrokeCircle { center: Point, radius: f32, stroke: Stroke },
    StrokePath { path: Path, stroke: Stroke },
}

impl DrawCommand {
    /// Whether the command puts pixels on the surface.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            DrawCommand::FillRect { .. }
                | DrawCommand::FillCircle { .. }
                | DrawCommand::StrokeCircle { .. }
                | DrawCommand::StrokePath { .. }
        )
    }

    /// Colours the command paints with.
    pub fn colors(&self) -> Vec<Color> {
        match self {
            DrawCommand::FillRect { paint, .. } | DrawCommand::FillCircle { paint, .. } => {
                paint.colors()
            }
            DrawCommand::StrokeCircle { stroke, .. } | DrawCommand::StrokePath { stroke, .. } => {
                vec![stroke.color]
            }
            _ => Vec::new(),
        }
    }
}

/// Drawing surface that records draw calls instead of rasterising them.
///
/// Only the current frame is kept: a clear drops everything recorded
/// before it, so a list driven for a whole session stays bounded. Useful
/// for inspecting what a frame would paint, and for dumping frames as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayList {
    width: u32,
    height: u32,
    background: Color,
    #[serde(default)]
    clears: u64,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Color::TRANSPARENT,
            clears: 0,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of clears issued over the lifetime of the list.
    pub fn clear_count(&self) -> u64 {
        self.clears
    }

    /// Commands recorded after the most recent clear, i.e. the visible
    /// frame.
    pub fn commands_since_clear(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|command| matches!(command, DrawCommand::Clear))
            .map(|index| index + 1)
            .unwrap_or(0);
        &self.commands[start..]
    }

    pub fn draw_commands_since_clear(&self) -> Vec<&DrawCommand> {
        self.commands_since_clear()
            .iter()
            .filter(|command| command.is_draw())
            .collect()
    }

    /// Distinct colours painted since the most recent clear.
    pub fn colors_since_clear(&self) -> Vec<Color> {
        let mut colors = Vec::new();
        for color in self
            .commands_since_clear()
            .iter()
            .flat_map(DrawCommand::colors)
        {
            if !colors.contains(&color) {
                colors.push(color);
            }
        }
        colors
    }
}

impl DrawingSurface for DisplayList {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.push(DrawCommand::Resize { width, height });
    }

    fn background(&self) -> Color {
        self.background
    }

    fn set_background(&mut self, color: Color) {
        self.background = color;
        self.commands.push(DrawCommand::SetBackground { color });
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            paint: paint.clone(),
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            paint: paint.clone(),
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, stroke: &Stroke) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            stroke: *stroke,
        });
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            stroke: *stroke,
        });
    }
}
