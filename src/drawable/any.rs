use std::rc::Rc;
use std::time::Instant;

use crate::blend::BlendMode;
use crate::canvas::Canvas;
use crate::color::ColorInt;
use crate::color_state_list::ColorStateList;
use crate::geometry::{Insets, Rect};
use crate::state::StateSet;

use super::{
    AnimatedImageDrawable, Callback, ColorDrawable, ColorStateListDrawable, ConstantState,
    Drawable, DrawableBase, DrawableId, LevelListDrawable, RippleDrawable, ShapeDrawable,
};

/// Any drawable variant, used where drawables are stored heterogeneously
/// (container children, ripple content).
pub enum AnyDrawable {
    Color(ColorDrawable),
    ColorStateList(ColorStateListDrawable),
    LevelList(LevelListDrawable),
    Shape(ShapeDrawable),
    Ripple(RippleDrawable),
    AnimatedImage(AnimatedImageDrawable),
}

macro_rules! dispatch {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            AnyDrawable::Color($inner) => $body,
            AnyDrawable::ColorStateList($inner) => $body,
            AnyDrawable::LevelList($inner) => $body,
            AnyDrawable::Shape($inner) => $body,
            AnyDrawable::Ripple($inner) => $body,
            AnyDrawable::AnimatedImage($inner) => $body,
        }
    };
}

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for AnyDrawable {
                fn from(drawable: $ty) -> Self {
                    AnyDrawable::$variant(drawable)
                }
            }
        )*
    };
}

impl_from!(
    Color(ColorDrawable),
    ColorStateList(ColorStateListDrawable),
    LevelList(LevelListDrawable),
    Shape(ShapeDrawable),
    Ripple(RippleDrawable),
    AnimatedImage(AnimatedImageDrawable),
);

impl AnyDrawable {
    /// Variant name, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            AnyDrawable::Color(_) => "color",
            AnyDrawable::ColorStateList(_) => "color-state-list",
            AnyDrawable::LevelList(_) => "level-list",
            AnyDrawable::Shape(_) => "shape",
            AnyDrawable::Ripple(_) => "ripple",
            AnyDrawable::AnimatedImage(_) => "animated-image",
        }
    }
}

impl Drawable for AnyDrawable {
    fn base(&self) -> &DrawableBase {
        dispatch!(self, d => d.base())
    }

    fn base_mut(&mut self) -> &mut DrawableBase {
        dispatch!(self, d => d.base_mut())
    }

    fn draw(&mut self, canvas: &mut Canvas) {
        dispatch!(self, d => d.draw(canvas))
    }

    fn mutate(&mut self) -> &mut Self {
        dispatch!(self, d => {
            d.mutate();
        });
        self
    }

    fn clear_mutated(&mut self) {
        dispatch!(self, d => d.clear_mutated())
    }

    fn constant_state(&self) -> Option<ConstantState> {
        dispatch!(self, d => d.constant_state())
    }

    fn id(&self) -> DrawableId {
        dispatch!(self, d => d.id())
    }

    fn set_callback(&mut self, callback: Option<&Rc<dyn Callback>>) {
        dispatch!(self, d => d.set_callback(callback))
    }

    fn invalidate_self(&self) {
        dispatch!(self, d => d.invalidate_self())
    }

    fn bounds(&self) -> Rect {
        dispatch!(self, d => d.bounds())
    }

    fn set_bounds(&mut self, bounds: Rect) {
        dispatch!(self, d => d.set_bounds(bounds))
    }

    fn on_bounds_change(&mut self, bounds: Rect) {
        dispatch!(self, d => d.on_bounds_change(bounds))
    }

    fn state(&self) -> StateSet {
        dispatch!(self, d => d.state())
    }

    fn set_state(&mut self, state: StateSet) -> bool {
        dispatch!(self, d => d.set_state(state))
    }

    fn on_state_change(&mut self, state: StateSet) -> bool {
        dispatch!(self, d => d.on_state_change(state))
    }

    fn level(&self) -> i32 {
        dispatch!(self, d => d.level())
    }

    fn set_level(&mut self, level: i32) -> bool {
        dispatch!(self, d => d.set_level(level))
    }

    fn on_level_change(&mut self, level: i32) -> bool {
        dispatch!(self, d => d.on_level_change(level))
    }

    fn is_visible(&self) -> bool {
        dispatch!(self, d => d.is_visible())
    }

    fn set_visible(&mut self, visible: bool, restart: bool) -> bool {
        dispatch!(self, d => d.set_visible(visible, restart))
    }

    fn alpha(&self) -> u8 {
        dispatch!(self, d => d.alpha())
    }

    fn set_alpha(&mut self, alpha: u8) {
        dispatch!(self, d => d.set_alpha(alpha))
    }

    fn set_tint(&mut self, color: ColorInt) {
        dispatch!(self, d => d.set_tint(color))
    }

    fn set_tint_list(&mut self, tint: Option<Rc<ColorStateList>>) {
        dispatch!(self, d => d.set_tint_list(tint))
    }

    fn set_tint_blend_mode(&mut self, mode: BlendMode) {
        dispatch!(self, d => d.set_tint_blend_mode(mode))
    }

    fn set_hotspot(&mut self, x: f32, y: f32) {
        dispatch!(self, d => d.set_hotspot(x, y))
    }

    fn set_hotspot_bounds(&mut self, bounds: Rect) {
        dispatch!(self, d => d.set_hotspot_bounds(bounds))
    }

    fn hotspot_bounds(&self) -> Rect {
        dispatch!(self, d => d.hotspot_bounds())
    }

    fn is_stateful(&self) -> bool {
        dispatch!(self, d => d.is_stateful())
    }

    fn has_focus_state_specified(&self) -> bool {
        dispatch!(self, d => d.has_focus_state_specified())
    }

    fn jump_to_current_state(&mut self) {
        dispatch!(self, d => d.jump_to_current_state())
    }

    fn intrinsic_width(&self) -> i32 {
        dispatch!(self, d => d.intrinsic_width())
    }

    fn intrinsic_height(&self) -> i32 {
        dispatch!(self, d => d.intrinsic_height())
    }

    fn padding(&self) -> Option<Insets> {
        dispatch!(self, d => d.padding())
    }

    fn minimum_width(&self) -> i32 {
        dispatch!(self, d => d.minimum_width())
    }

    fn minimum_height(&self) -> i32 {
        dispatch!(self, d => d.minimum_height())
    }

    fn advance_animations(&mut self, now: Instant) -> bool {
        dispatch!(self, d => d.advance_animations(now))
    }
}

impl std::fmt::Debug for AnyDrawable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyDrawable")
            .field("kind", &self.kind())
            .field("id", &self.id())
            .field("bounds", &self.bounds())
            .finish()
    }
}
