//! Recording draw surface.
//!
//! Drawables paint into a [`Canvas`], which records [`DrawCommand`]s instead
//! of rasterizing. The host renderer consumes the command list; tests inspect
//! it directly.

use std::sync::Arc;

use image::RgbaImage;

use crate::color::Color;
use crate::geometry::RectF;

/// Stroke definition for shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Stroke width in pixels
    pub width: f32,
    /// Stroke color
    pub color: Color,
}

impl Stroke {
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}

/// A single recorded draw operation.
///
/// Coordinates are in canvas space: the translation active when the command
/// was recorded has already been applied.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Fill an axis-aligned rectangle.
    Rect {
        rect: RectF,
        color: Color,
        clip: Option<RectF>,
    },

    /// Fill a rounded rectangle, optionally stroked.
    RoundRect {
        rect: RectF,
        /// Corner radii: top-left, top-right, bottom-right, bottom-left
        radii: [f32; 4],
        color: Color,
        stroke: Option<Stroke>,
        clip: Option<RectF>,
    },

    /// Fill a circle (ripples and focus highlights).
    Circle {
        center: (f32, f32),
        radius: f32,
        color: Color,
        clip: Option<RectF>,
    },

    /// Draw a decoded image frame scaled into `rect`.
    Image {
        frame: Arc<RgbaImage>,
        rect: RectF,
        /// Opacity multiplier (0.0-1.0)
        opacity: f32,
        clip: Option<RectF>,
    },
}

impl DrawCommand {
    pub fn clip(&self) -> Option<RectF> {
        match self {
            DrawCommand::Rect { clip, .. }
            | DrawCommand::RoundRect { clip, .. }
            | DrawCommand::Circle { clip, .. }
            | DrawCommand::Image { clip, .. } => *clip,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Layer {
    translate: (f32, f32),
    clip: Option<RectF>,
}

/// Records draw commands with a save/restore stack of translation and clip.
#[derive(Debug, Default)]
pub struct Canvas {
    commands: Vec<DrawCommand>,
    current: Layer,
    saved: Vec<Layer>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a canvas with pre-allocated command capacity.
    pub fn with_capacity(commands: usize) -> Self {
        Self {
            commands: Vec::with_capacity(commands),
            ..Self::default()
        }
    }

    /// Clear recorded commands and state, preserving allocated capacity.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.saved.clear();
        self.current = Layer::default();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Push the current translation and clip. Returns the save depth to pass
    /// to [`Canvas::restore_to_count`].
    pub fn save(&mut self) -> usize {
        self.saved.push(self.current);
        self.saved.len()
    }

    pub fn restore(&mut self) {
        if let Some(layer) = self.saved.pop() {
            self.current = layer;
        }
    }

    /// Pop saved layers until only `count - 1` remain.
    pub fn restore_to_count(&mut self, count: usize) {
        while self.saved.len() >= count.max(1) {
            self.restore();
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.current.translate.0 += dx;
        self.current.translate.1 += dy;
    }

    /// Intersect the clip with `rect` (given in current coordinates).
    pub fn clip_rect(&mut self, rect: RectF) {
        let rect = self.map_rect(rect);
        self.current.clip = Some(match self.current.clip {
            Some(clip) => RectF::new(
                clip.left.max(rect.left),
                clip.top.max(rect.top),
                clip.right.min(rect.right),
                clip.bottom.min(rect.bottom),
            ),
            None => rect,
        });
    }

    pub fn draw_rect(&mut self, rect: RectF, color: Color) {
        let rect = self.map_rect(rect);
        self.commands.push(DrawCommand::Rect {
            rect,
            color,
            clip: self.current.clip,
        });
    }

    pub fn draw_round_rect(
        &mut self,
        rect: RectF,
        radii: [f32; 4],
        color: Color,
        stroke: Option<Stroke>,
    ) {
        let rect = self.map_rect(rect);
        self.commands.push(DrawCommand::RoundRect {
            rect,
            radii,
            color,
            stroke,
            clip: self.current.clip,
        });
    }

    pub fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        let (tx, ty) = self.current.translate;
        self.commands.push(DrawCommand::Circle {
            center: (cx + tx, cy + ty),
            radius,
            color,
            clip: self.current.clip,
        });
    }

    pub fn draw_image(&mut self, frame: Arc<RgbaImage>, rect: RectF, opacity: f32) {
        let rect = self.map_rect(rect);
        self.commands.push(DrawCommand::Image {
            frame,
            rect,
            opacity,
            clip: self.current.clip,
        });
    }

    fn map_rect(&self, rect: RectF) -> RectF {
        let (tx, ty) = self.current.translate;
        rect.offset(tx, ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_applies_to_commands() {
        let mut canvas = Canvas::new();
        canvas.translate(10.0, 5.0);
        canvas.draw_circle(1.0, 2.0, 3.0, Color::WHITE);
        match &canvas.commands()[0] {
            DrawCommand::Circle { center, radius, .. } => {
                assert_eq!(*center, (11.0, 7.0));
                assert_eq!(*radius, 3.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_save_restore_resets_translation_and_clip() {
        let mut canvas = Canvas::new();
        let count = canvas.save();
        canvas.translate(4.0, 4.0);
        canvas.clip_rect(RectF::new(0.0, 0.0, 10.0, 10.0));
        canvas.draw_rect(RectF::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        canvas.restore_to_count(count);
        canvas.draw_rect(RectF::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);

        let commands = canvas.commands();
        assert_eq!(commands[0].clip(), Some(RectF::new(4.0, 4.0, 14.0, 14.0)));
        assert_eq!(commands[1].clip(), None);
        match &commands[1] {
            DrawCommand::Rect { rect, .. } => assert_eq!(*rect, RectF::new(0.0, 0.0, 1.0, 1.0)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_nested_clips_intersect() {
        let mut canvas = Canvas::new();
        canvas.clip_rect(RectF::new(0.0, 0.0, 10.0, 10.0));
        canvas.clip_rect(RectF::new(5.0, -5.0, 20.0, 8.0));
        canvas.draw_rect(RectF::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        assert_eq!(
            canvas.commands()[0].clip(),
            Some(RectF::new(5.0, 0.0, 10.0, 8.0))
        );
    }

    #[test]
    fn test_clear_keeps_nothing() {
        let mut canvas = Canvas::with_capacity(4);
        canvas.draw_rect(RectF::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        canvas.clear();
        assert!(canvas.commands().is_empty());
    }
}
