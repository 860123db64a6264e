use std::cell::RefCell;
use std::rc::Rc;

use crate::blend::BlendMode;
use crate::canvas::Canvas;
use crate::color::{alpha, with_alpha, Color, ColorInt};
use crate::color_state_list::ColorStateList;
use crate::state::StateSet;

use super::{ConstantState, Drawable, DrawableBase};

/// Shared configuration of a [`ColorDrawable`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColorState {
    /// Color as set by the user
    pub base_color: ColorInt,
    /// Base color with the drawable alpha applied
    pub use_color: ColorInt,
    pub tint: Option<Rc<ColorStateList>>,
    pub blend_mode: BlendMode,
}

impl ColorState {
    pub fn new(color: ColorInt) -> Self {
        Self {
            base_color: color,
            use_color: color,
            tint: None,
            blend_mode: BlendMode::default(),
        }
    }
}

/// Fills its bounds with a single color.
pub struct ColorDrawable {
    base: DrawableBase,
    state: Rc<RefCell<ColorState>>,
    /// Tint color resolved for the current state set
    tint_filter: Option<ColorInt>,
    mutated: bool,
}

impl ColorDrawable {
    pub fn new(color: ColorInt) -> Self {
        Self::from_state(Rc::new(RefCell::new(ColorState::new(color))))
    }

    /// Transparent black.
    pub fn transparent() -> Self {
        Self::new(0)
    }

    pub(crate) fn from_state(state: Rc<RefCell<ColorState>>) -> Self {
        let mut drawable = Self {
            base: DrawableBase::new(),
            state,
            tint_filter: None,
            mutated: false,
        };
        drawable.update_tint_filter();
        drawable
    }

    /// The color drawn, including the drawable alpha.
    pub fn color(&self) -> ColorInt {
        self.state.borrow().use_color
    }

    pub fn set_color(&mut self, color: ColorInt) {
        let changed = {
            let mut state = self.state.borrow_mut();
            if state.base_color != color || state.use_color != color {
                state.base_color = color;
                state.use_color = color;
                true
            } else {
                false
            }
        };
        if changed {
            self.invalidate_self();
        }
    }

    /// The color that reaches the canvas: the use color filtered by the tint.
    pub fn painted_color(&self) -> ColorInt {
        let state = self.state.borrow();
        match self.tint_filter {
            Some(tint) => state.blend_mode.blend(tint, state.use_color),
            None => state.use_color,
        }
    }

    pub(crate) fn shares_state_with(&self, other: &ColorDrawable) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
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
}

impl Drawable for ColorDrawable {
    fn base(&self) -> &DrawableBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DrawableBase {
        &mut self.base
    }

    fn draw(&mut self, canvas: &mut Canvas) {
        let use_color = self.color();
        if alpha(use_color) != 0 || self.tint_filter.is_some() {
            let color = Color::from_argb(self.painted_color());
            canvas.draw_rect(self.base.bounds().to_rect_f(), color);
        }
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
        Some(ConstantState::Color(self.state.clone()))
    }

    fn alpha(&self) -> u8 {
        alpha(self.color())
    }

    /// Scale the base color's alpha by `alpha`.
    fn set_alpha(&mut self, value: u8) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let scale = value as u32 + (value as u32 >> 7);
            let use_alpha = (alpha(state.base_color) as u32 * scale) >> 8;
            let use_color = with_alpha(state.base_color, use_alpha as u8);
            if state.use_color != use_color {
                state.use_color = use_color;
                true
            } else {
                false
            }
        };
        if changed {
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

    fn has_focus_state_specified(&self) -> bool {
        self.state
            .borrow()
            .tint
            .as_ref()
            .is_some_and(|tint| tint.has_focus_state_specified())
    }
}
