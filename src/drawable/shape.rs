use std::cell::RefCell;
use std::rc::Rc;

use crate::blend::BlendMode;
use crate::canvas::{Canvas, Stroke};
use crate::color::{alpha, modulate_alpha, with_alpha, Color, ColorInt};
use crate::color_state_list::ColorStateList;
use crate::geometry::Insets;
use crate::state::StateSet;

use super::{ConstantState, Drawable, DrawableBase};

/// Rectangle with independently rounded corners.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RoundRectShape {
    /// Corner radii: top-left, top-right, bottom-right, bottom-left
    pub radii: [f32; 4],
}

impl RoundRectShape {
    pub fn new(radii: [f32; 4]) -> Self {
        Self { radii }
    }

    /// Same radius on every corner.
    pub fn uniform(radius: f32) -> Self {
        Self {
            radii: [radius; 4],
        }
    }

    /// Radii clamped so opposite corners never overlap.
    pub fn resolve_radii(&self, width: f32, height: f32) -> [f32; 4] {
        let max = (width.min(height) * 0.5).max(0.0);
        self.radii.map(|r| r.clamp(0.0, max))
    }
}

/// Shared configuration of a [`ShapeDrawable`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeState {
    pub shape: RoundRectShape,
    pub fill_color: ColorInt,
    /// Stroke width and color
    pub stroke: Option<(f32, ColorInt)>,
    pub tint: Option<Rc<ColorStateList>>,
    pub blend_mode: BlendMode,
    pub intrinsic_width: i32,
    pub intrinsic_height: i32,
    pub padding: Option<Insets>,
}

impl Default for ShapeState {
    fn default() -> Self {
        Self {
            shape: RoundRectShape::default(),
            fill_color: 0xFF00_0000,
            stroke: None,
            tint: None,
            blend_mode: BlendMode::default(),
            intrinsic_width: -1,
            intrinsic_height: -1,
            padding: None,
        }
    }
}

/// Fills a [`RoundRectShape`] over its bounds, optionally stroked.
pub struct ShapeDrawable {
    base: DrawableBase,
    state: Rc<RefCell<ShapeState>>,
    alpha: u8,
    tint_filter: Option<ColorInt>,
    mutated: bool,
}

impl ShapeDrawable {
    pub fn new(shape: RoundRectShape, fill_color: ColorInt) -> Self {
        Self::from_state(Rc::new(RefCell::new(ShapeState {
            shape,
            fill_color,
            ..ShapeState::default()
        })))
    }

    pub(crate) fn from_state(state: Rc<RefCell<ShapeState>>) -> Self {
        let mut drawable = Self {
            base: DrawableBase::new(),
            state,
            alpha: 0xFF,
            tint_filter: None,
            mutated: false,
        };
        drawable.update_tint_filter();
        drawable
    }

    pub fn shape(&self) -> RoundRectShape {
        self.state.borrow().shape
    }

    pub fn set_shape(&mut self, shape: RoundRectShape) {
        self.state.borrow_mut().shape = shape;
        self.invalidate_self();
    }

    pub fn set_corner_radius(&mut self, radius: f32) {
        self.set_shape(RoundRectShape::uniform(radius));
    }

    pub fn fill_color(&self) -> ColorInt {
        self.state.borrow().fill_color
    }

    pub fn set_fill_color(&mut self, color: ColorInt) {
        self.state.borrow_mut().fill_color = color;
        self.invalidate_self();
    }

    /// Stroke the outline; a width of zero removes the stroke.
    pub fn set_stroke(&mut self, width: f32, color: ColorInt) {
        self.state.borrow_mut().stroke = (width > 0.0).then_some((width, color));
        self.invalidate_self();
    }

    pub fn set_intrinsic_size(&mut self, width: i32, height: i32) {
        let mut state = self.state.borrow_mut();
        state.intrinsic_width = width;
        state.intrinsic_height = height;
    }

    /// Insets reported to hosts laying out content over this shape.
    pub fn set_padding(&mut self, padding: Option<Insets>) {
        self.state.borrow_mut().padding = padding;
    }

    fn update_tint_filter(&mut self) {
        let state_set = self.base.state();
        self.tint_filter = self
            .state
            .borrow()
            .tint
            .as_ref()
            .map(|tint| tint.color_for_state(state_set, 0));
    }

    fn filtered(&self, color: ColorInt, blend_mode: BlendMode) -> ColorInt {
        let color = with_alpha(color, modulate_alpha(alpha(color), self.alpha));
        match self.tint_filter {
            Some(tint) => blend_mode.blend(tint, color),
            None => color,
        }
    }
}

impl Drawable for ShapeDrawable {
    fn base(&self) -> &DrawableBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DrawableBase {
        &mut self.base
    }

    fn draw(&mut self, canvas: &mut Canvas) {
        let state = self.state.borrow().clone();
        let mut rect = self.base.bounds().to_rect_f();
        let stroke = state
            .stroke
            .map(|(width, color)| Stroke::new(width, Color::from_argb(self.filtered(color, state.blend_mode))))
            .filter(|stroke| stroke.color.a > 0.0);
        if let Some(stroke) = stroke {
            let half = stroke.width * 0.5;
            rect = rect.inset(half, half);
        }
        if rect.is_empty() {
            return;
        }

        let fill = self.filtered(state.fill_color, state.blend_mode);
        if alpha(fill) == 0 && stroke.is_none() {
            return;
        }
        let radii = state.shape.resolve_radii(rect.width(), rect.height());
        canvas.draw_round_rect(rect, radii, Color::from_argb(fill), stroke);
    }

    fn mutate(&mut self) -> &mut Self {
        if !self.mutated {
            let private = self.state.borrow().clone();
            self.state = Rc::new(RefCell::new(private));
            self.mutated = true;
        }
        self
    }

    fn clear_mutated(&mut self) {
        self.mutated = false;
    }

    fn constant_state(&self) -> Option<ConstantState> {
        Some(ConstantState::Shape(self.state.clone()))
    }

    fn alpha(&self) -> u8 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: u8) {
        if self.alpha != alpha {
            self.alpha = alpha;
            self.invalidate_self();
        }
    }

    fn set_tint_list(&mut self, tint: Option<Rc<ColorStateList>>) {
        self.state.borrow_mut().tint = tint;
        self.update_tint_filter();
        self.invalidate_self();
    }

    fn set_tint_blend_mode(&mut self, mode: BlendMode) {
        self.state.borrow_mut().blend_mode = mode;
        self.update_tint_filter();
        self.invalidate_self();
    }

    fn on_state_change(&mut self, _state: StateSet) -> bool {
        if self.state.borrow().tint.is_some() {
            self.update_tint_filter();
            return true;
        }
        false
    }

    fn is_stateful(&self) -> bool {
        self.state
            .borrow()
            .tint
            .as_ref()
            .is_some_and(|tint| tint.is_stateful())
    }

    fn intrinsic_width(&self) -> i32 {
        self.state.borrow().intrinsic_width
    }

    fn intrinsic_height(&self) -> i32 {
        self.state.borrow().intrinsic_height
    }

    fn padding(&self) -> Option<Insets> {
        self.state.borrow().padding.filter(|padding| !padding.is_zero())
    }
}
