use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::canvas::Canvas;
use crate::color::{Color, ColorInt};
use crate::drawable::InvalidateHandle;
use crate::geometry::Rect;

use super::{RippleComponent, RippleEffect};

const FOCUSED_OPACITY: f32 = 0.6;
const HOVERED_OPACITY: f32 = 0.2;
const OPACITY_DURATION: Duration = Duration::from_millis(80);

/// Focus and hover highlight filling the whole ripple area.
pub struct RippleBackground {
    component: RippleComponent,
    focused: bool,
    hovered: bool,
    opacity: f32,
    from_opacity: f32,
    target_opacity: f32,
    animation_start: Option<Instant>,
}

impl RippleBackground {
    pub fn new(owner: InvalidateHandle, hotspot_bounds: Rc<Cell<Rect>>) -> Self {
        Self {
            component: RippleComponent::new(owner, hotspot_bounds),
            focused: false,
            hovered: false,
            opacity: 0.0,
            from_opacity: 0.0,
            target_opacity: 0.0,
            animation_start: None,
        }
    }

    /// Update the highlight. Pressing never turns a highlight on.
    pub fn set_state(&mut self, focused: bool, hovered: bool, pressed: bool) {
        let focused = if self.focused { focused } else { focused && !pressed };
        let hovered = if self.hovered { hovered } else { hovered && !pressed };
        if self.focused != focused || self.hovered != hovered {
            self.focused = focused;
            self.hovered = hovered;
            self.start_opacity_animation(Instant::now());
        }
    }

    fn start_opacity_animation(&mut self, now: Instant) {
        self.from_opacity = self.opacity;
        self.target_opacity = if self.focused {
            FOCUSED_OPACITY
        } else if self.hovered {
            HOVERED_OPACITY
        } else {
            0.0
        };
        self.animation_start = Some(now);
        self.invalidate_self();
    }

    /// Advance to `now`. Returns true while still animating.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(start) = self.animation_start else {
            return false;
        };
        let t = (now.saturating_duration_since(start).as_secs_f32()
            / OPACITY_DURATION.as_secs_f32())
        .min(1.0);
        self.opacity = self.from_opacity + (self.target_opacity - self.from_opacity) * t;
        if t >= 1.0 {
            self.animation_start = None;
        }
        self.invalidate_self();
        self.animation_start.is_some()
    }

    /// Jump to the target opacity.
    pub fn end(&mut self) {
        self.opacity = self.target_opacity;
        self.animation_start = None;
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    /// Paint in a canvas translated to the hotspot centre.
    pub fn draw(&self, canvas: &mut Canvas, color: ColorInt) {
        let color = Color::from_argb(color).with_opacity(self.opacity);
        if color.a <= 0.0 {
            return;
        }
        canvas.draw_circle(0.0, 0.0, self.component.target_radius(), color);
    }
}

impl RippleEffect for RippleBackground {
    fn component(&self) -> &RippleComponent {
        &self.component
    }

    fn component_mut(&mut self) -> &mut RippleComponent {
        &mut self.component
    }
}
