use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::canvas::Canvas;
use crate::color::{Color, ColorInt};
use crate::drawable::InvalidateHandle;
use crate::geometry::Rect;

use super::{RippleComponent, RippleConfig, RippleEffect};

/// Press ripple: a circle growing from the touch point while drifting
/// toward the centre of the hotspot bounds.
pub struct RippleForeground {
    component: RippleComponent,
    config: RippleConfig,
    /// Touch point in drawable coordinates
    starting: (f32, f32),
    /// Touch point pulled inside the target radius
    clamped_starting: (f32, f32),
    start_radius: f32,
    /// Expansion progress, eased (0.0 = at touch point, 1.0 = full size)
    tween: f32,
    opacity: f32,
    enter_start: Option<Instant>,
    exit_start: Option<Instant>,
    exit_from_opacity: f32,
    finished_exit: bool,
}

impl RippleForeground {
    pub fn new(
        owner: InvalidateHandle,
        hotspot_bounds: Rc<Cell<Rect>>,
        x: f32,
        y: f32,
        config: RippleConfig,
    ) -> Self {
        let mut ripple = Self {
            component: RippleComponent::new(owner, hotspot_bounds),
            config,
            starting: (x, y),
            clamped_starting: (x, y),
            start_radius: 0.0,
            tween: 0.0,
            opacity: 0.0,
            enter_start: None,
            exit_start: None,
            exit_from_opacity: 0.0,
            finished_exit: false,
        };
        ripple.update_start_radius();
        ripple.clamp_starting_position();
        ripple
    }

    /// Follow the touch point.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.starting = (x, y);
        self.clamp_starting_position();
    }

    /// Start expanding from the touch point.
    pub fn enter(&mut self, now: Instant) {
        self.enter_start = Some(now);
        self.exit_start = None;
        self.finished_exit = false;
        self.tween = 0.0;
        self.opacity = 1.0;
        self.invalidate_self();
    }

    /// Start fading out. Expansion keeps running.
    pub fn exit(&mut self, now: Instant) {
        if self.exit_start.is_none() && !self.finished_exit {
            self.exit_start = Some(now);
            self.exit_from_opacity = self.opacity;
        }
    }

    /// Jump every running animation to its end.
    pub fn end(&mut self) {
        self.tween = 1.0;
        self.enter_start = None;
        if self.exit_start.take().is_some() {
            self.opacity = 0.0;
            self.finished_exit = true;
        }
    }

    pub fn has_finished_exit(&self) -> bool {
        self.finished_exit
    }

    pub fn is_animating(&self) -> bool {
        self.enter_start.is_some() || self.exit_start.is_some()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Advance to `now`. Returns true while still animating.
    pub fn advance(&mut self, now: Instant) -> bool {
        if !self.is_animating() {
            return false;
        }

        if let Some(start) = self.enter_start {
            let duration = self.config.expand_duration().as_secs_f32();
            let t = (now.saturating_duration_since(start).as_secs_f32() / duration).min(1.0);
            // Ease-out: fast start, settles at full size
            self.tween = 1.0 - (1.0 - t).powi(3);
            if t >= 1.0 {
                self.enter_start = None;
            }
        }

        if let Some(start) = self.exit_start {
            let duration = self.config.fade_duration().as_secs_f32();
            let t = (now.saturating_duration_since(start).as_secs_f32() / duration).min(1.0);
            // Ease-in: accelerates as it disappears
            let eased = t * t;
            self.opacity = (self.exit_from_opacity * (1.0 - eased)).max(0.0);
            if t >= 1.0 {
                self.exit_start = None;
                self.opacity = 0.0;
                self.finished_exit = true;
            }
        }

        self.invalidate_self();
        self.is_animating()
    }

    /// Centre relative to the hotspot centre.
    pub fn current_center(&self) -> (f32, f32) {
        let bounds = self.component.hotspot_bounds();
        let start_x = self.clamped_starting.0 - bounds.exact_center_x();
        let start_y = self.clamped_starting.1 - bounds.exact_center_y();
        (start_x * (1.0 - self.tween), start_y * (1.0 - self.tween))
    }

    pub fn current_radius(&self) -> f32 {
        let target = self.component.target_radius();
        self.start_radius + (target - self.start_radius) * self.tween
    }

    /// Paint in a canvas translated to the hotspot centre.
    pub fn draw(&self, canvas: &mut Canvas, color: ColorInt) {
        let color = Color::from_argb(color).with_opacity(self.opacity);
        if color.a <= 0.0 {
            return;
        }
        let (x, y) = self.current_center();
        canvas.draw_circle(x, y, self.current_radius(), color);
    }

    fn update_start_radius(&mut self) {
        let bounds = self.component.hotspot_bounds();
        self.start_radius = bounds.width().max(bounds.height()) as f32 * 0.3;
    }

    fn clamp_starting_position(&mut self) {
        let bounds = self.component.hotspot_bounds();
        let (cx, cy) = (bounds.exact_center_x(), bounds.exact_center_y());
        let dx = self.starting.0 - cx;
        let dy = self.starting.1 - cy;
        let r = (self.component.target_radius() - self.start_radius).max(0.0);
        if dx * dx + dy * dy > r * r {
            let angle = dy.atan2(dx);
            self.clamped_starting = (cx + angle.cos() * r, cy + angle.sin() * r);
        } else {
            self.clamped_starting = self.starting;
        }
    }
}

impl RippleEffect for RippleForeground {
    fn component(&self) -> &RippleComponent {
        &self.component
    }

    fn component_mut(&mut self) -> &mut RippleComponent {
        &mut self.component
    }

    fn on_target_radius_changed(&mut self, _target_radius: f32) {
        self.update_start_radius();
        self.clamp_starting_position();
        self.invalidate_self();
    }
}
