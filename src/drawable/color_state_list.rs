use std::cell::RefCell;
use std::rc::Rc;

use crate::blend::BlendMode;
use crate::canvas::Canvas;
use crate::color::with_alpha;
use crate::color_state_list::ColorStateList;
use crate::geometry::Rect;
use crate::state::StateSet;

use super::{ChildRelay, ColorDrawable, ConstantState, Drawable, DrawableBase};

/// Shared configuration of a [`ColorStateListDrawable`].
#[derive(Debug, Clone, Default)]
pub struct ColorStateListDrawableState {
    pub color: Option<Rc<ColorStateList>>,
    pub tint: Option<Rc<ColorStateList>>,
    /// Alpha replacing the resolved color's alpha channel
    pub alpha: Option<u8>,
    pub blend_mode: BlendMode,
}

impl ColorStateListDrawableState {
    pub fn is_stateful(&self) -> bool {
        self.color.as_ref().is_some_and(|c| c.is_stateful())
            || self.tint.as_ref().is_some_and(|t| t.is_stateful())
    }

    pub fn has_focus_state_specified(&self) -> bool {
        self.color
            .as_ref()
            .is_some_and(|c| c.has_focus_state_specified())
            || self
                .tint
                .as_ref()
                .is_some_and(|t| t.has_focus_state_specified())
    }
}

/// Fills its bounds with the color a [`ColorStateList`] resolves for the
/// current state.
///
/// Painting is delegated to an inner [`ColorDrawable`]; only events coming
/// from that inner drawable are forwarded to this drawable's callback.
///
/// # Example
/// ```
/// use std::rc::Rc;
/// use drawables::{ColorStateList, ColorStateListDrawable, Drawable};
///
/// let mut fill = ColorStateListDrawable::with_color_state_list(Rc::new(
///     ColorStateList::value_of(0x11223344),
/// ));
/// fill.set_alpha(0x99);
/// assert_eq!(fill.current().color(), 0x99223344);
/// ```
pub struct ColorStateListDrawable {
    base: DrawableBase,
    state: Rc<RefCell<ColorStateListDrawableState>>,
    color_drawable: ColorDrawable,
    relay: Rc<ChildRelay>,
    mutated: bool,
}

impl ColorStateListDrawable {
    pub fn new() -> Self {
        Self::from_state(Rc::new(RefCell::new(
            ColorStateListDrawableState::default(),
        )))
    }

    pub fn with_color_state_list(colors: Rc<ColorStateList>) -> Self {
        let mut drawable = Self::new();
        drawable.set_color_state_list(Some(colors));
        drawable
    }

    pub(crate) fn from_state(state: Rc<RefCell<ColorStateListDrawableState>>) -> Self {
        let base = DrawableBase::new();
        let relay = ChildRelay::new(&base);
        let mut drawable = Self {
            base,
            state,
            color_drawable: ColorDrawable::transparent(),
            relay,
            mutated: false,
        };
        drawable.initialize_color_drawable();
        let state_set = drawable.base.state();
        drawable.on_state_change(state_set);
        drawable
    }

    fn initialize_color_drawable(&mut self) {
        self.relay.set_source(Some(self.color_drawable.id()));
        self.color_drawable
            .set_callback(Some(&self.relay.as_callback()));
        let (tint, blend_mode) = {
            let state = self.state.borrow();
            (state.tint.clone(), state.blend_mode)
        };
        if tint.is_some() {
            self.color_drawable.set_tint_list(tint);
        }
        if blend_mode != BlendMode::default() {
            self.color_drawable.set_tint_blend_mode(blend_mode);
        }
    }

    /// The inner fill doing the painting.
    pub fn current(&self) -> &ColorDrawable {
        &self.color_drawable
    }

    /// The configured list, or a single-color list of the painted color.
    pub fn color_state_list(&self) -> Rc<ColorStateList> {
        self.state
            .borrow()
            .color
            .clone()
            .unwrap_or_else(|| Rc::new(ColorStateList::value_of(self.color_drawable.color())))
    }

    pub fn set_color_state_list(&mut self, colors: Option<Rc<ColorStateList>>) {
        self.state.borrow_mut().color = colors;
        let state_set = self.base.state();
        self.on_state_change(state_set);
    }

    /// Stop overriding the resolved color's alpha.
    pub fn clear_alpha(&mut self) {
        self.state.borrow_mut().alpha = None;
        let state_set = self.base.state();
        self.on_state_change(state_set);
    }

    pub(crate) fn state_handle(&self) -> &Rc<RefCell<ColorStateListDrawableState>> {
        &self.state
    }
}

impl Default for ColorStateListDrawable {
    fn default() -> Self {
        Self::new()
    }
}

impl Drawable for ColorStateListDrawable {
    fn base(&self) -> &DrawableBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DrawableBase {
        &mut self.base
    }

    fn draw(&mut self, canvas: &mut Canvas) {
        self.color_drawable.draw(canvas);
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
        Some(ConstantState::ColorStateList(self.state.clone()))
    }

    fn alpha(&self) -> u8 {
        self.color_drawable.alpha()
    }

    fn set_alpha(&mut self, alpha: u8) {
        self.state.borrow_mut().alpha = Some(alpha);
        let state_set = self.base.state();
        self.on_state_change(state_set);
    }

    fn set_tint_list(&mut self, tint: Option<Rc<ColorStateList>>) {
        self.state.borrow_mut().tint = tint.clone();
        self.color_drawable.set_tint_list(tint);
        let state_set = self.base.state();
        self.on_state_change(state_set);
    }

    fn set_tint_blend_mode(&mut self, mode: BlendMode) {
        self.state.borrow_mut().blend_mode = mode;
        self.color_drawable.set_tint_blend_mode(mode);
        let state_set = self.base.state();
        self.on_state_change(state_set);
    }

    fn on_bounds_change(&mut self, bounds: Rect) {
        self.color_drawable.set_bounds(bounds);
    }

    fn on_state_change(&mut self, state_set: StateSet) -> bool {
        let resolved = {
            let state = self.state.borrow();
            state.color.as_ref().map(|colors| {
                let color = colors.color_for_state(state_set, colors.default_color());
                match state.alpha {
                    Some(alpha) => with_alpha(color, alpha),
                    None => color,
                }
            })
        };
        let Some(color) = resolved else {
            return false;
        };
        if color != self.color_drawable.color() {
            self.color_drawable.set_color(color);
            self.color_drawable.set_state(state_set);
            true
        } else {
            self.color_drawable.set_state(state_set)
        }
    }

    fn is_stateful(&self) -> bool {
        self.state.borrow().is_stateful()
    }

    fn has_focus_state_specified(&self) -> bool {
        self.state.borrow().has_focus_state_specified()
    }
}
