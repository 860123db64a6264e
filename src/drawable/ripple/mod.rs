//! Touch feedback: a press ripple plus a focus/hover highlight, drawn over
//! an optional content drawable.

mod background;
mod component;
mod config;
mod foreground;

pub use background::RippleBackground;
pub use component::{RippleComponent, RippleEffect};
pub use config::RippleConfig;
pub use foreground::RippleForeground;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

use crate::blend::BlendMode;
use crate::canvas::Canvas;
use crate::color::{alpha, modulate_alpha, with_alpha, ColorInt};
use crate::color_state_list::ColorStateList;
use crate::geometry::{Insets, Rect};
use crate::resources::Resources;
use crate::state::StateSet;

use super::{AnyDrawable, ChildRelay, ConstantState, Drawable, DrawableBase};

/// Radius value meaning "derive from the bounds".
pub const RADIUS_AUTO: i32 = -1;

/// Upper bound on ripples still fading out.
pub const MAX_RIPPLES: usize = 10;

const DEFAULT_RIPPLE_COLOR: ColorInt = 0xFF00_0000;

/// Shared configuration of a [`RippleDrawable`].
#[derive(Clone)]
pub struct RippleState {
    pub color: Rc<ColorStateList>,
    /// Fully expanded radius in pixels, or [`RADIUS_AUTO`]
    pub max_radius: i32,
    pub config: RippleConfig,
    /// Configuration of the content layer
    pub content: Option<ConstantState>,
    /// Configuration of the mask layer
    pub mask: Option<ConstantState>,
}

impl RippleState {
    pub fn new(color: Rc<ColorStateList>) -> Self {
        Self {
            color,
            max_radius: RADIUS_AUTO,
            config: RippleConfig::default(),
            content: None,
            mask: None,
        }
    }
}

/// Draws its content, then a highlight while hovered or focused and an
/// expanding ripple while pressed.
///
/// A content or mask layer bounds the ripple: effects are clipped to the
/// drawable's bounds. The mask is laid out like the content but never
/// drawn. With neither layer the ripple is unbounded: nothing is clipped
/// and [`dirty_bounds`](Self::dirty_bounds) covers every live effect.
pub struct RippleDrawable {
    base: DrawableBase,
    state: Rc<RefCell<RippleState>>,
    content: Option<Box<AnyDrawable>>,
    mask: Option<Box<AnyDrawable>>,
    relay: Rc<ChildRelay>,
    hotspot_bounds: Rc<Cell<Rect>>,
    override_bounds: bool,
    ripple: Option<RippleForeground>,
    exiting: Vec<RippleForeground>,
    background: Option<RippleBackground>,
    ripple_active: bool,
    pending_hotspot: Option<(f32, f32)>,
    /// Area covered by effects at the previous dirty-bounds query
    drawing_bounds: Rect,
    density_dpi: u32,
    alpha: u8,
    mutated: bool,
}

impl RippleDrawable {
    pub fn new(color: Rc<ColorStateList>, content: Option<AnyDrawable>) -> Self {
        Self::with_mask(color, content, None)
    }

    /// Ripple over `content`, clipped to the bounds whenever `mask` is set.
    pub fn with_mask(
        color: Rc<ColorStateList>,
        content: Option<AnyDrawable>,
        mask: Option<AnyDrawable>,
    ) -> Self {
        let mut state = RippleState::new(color);
        state.content = content.as_ref().and_then(|content| content.constant_state());
        state.mask = mask.as_ref().and_then(|mask| mask.constant_state());
        Self::build(
            Rc::new(RefCell::new(state)),
            content,
            mask,
            Resources::default().display_metrics().density_dpi,
        )
    }

    pub(crate) fn from_state(state: Rc<RefCell<RippleState>>, resources: &Resources) -> Self {
        let (content, mask) = {
            let state = state.borrow();
            let instantiate = |layer: &Option<ConstantState>| {
                layer
                    .as_ref()
                    .map(|layer| layer.new_drawable_with_resources(resources))
            };
            (instantiate(&state.content), instantiate(&state.mask))
        };
        Self::build(state, content, mask, resources.display_metrics().density_dpi)
    }

    fn build(
        state: Rc<RefCell<RippleState>>,
        content: Option<AnyDrawable>,
        mask: Option<AnyDrawable>,
        density_dpi: u32,
    ) -> Self {
        let base = DrawableBase::new();
        let relay = ChildRelay::new(&base);
        let content = content.map(|mut content| {
            relay.set_source(Some(content.id()));
            content.set_callback(Some(&relay.as_callback()));
            Box::new(content)
        });
        Self {
            base,
            state,
            content,
            mask: mask.map(Box::new),
            relay,
            hotspot_bounds: Rc::new(Cell::new(Rect::EMPTY)),
            override_bounds: false,
            ripple: None,
            exiting: Vec::new(),
            background: None,
            ripple_active: false,
            pending_hotspot: None,
            drawing_bounds: Rect::EMPTY,
            density_dpi,
            alpha: 0xFF,
            mutated: false,
        }
    }

    pub fn content(&self) -> Option<&AnyDrawable> {
        self.content.as_deref()
    }

    pub fn mask(&self) -> Option<&AnyDrawable> {
        self.mask.as_deref()
    }

    /// Effects are clipped to the bounds.
    pub fn is_bounded(&self) -> bool {
        self.content.is_some() || self.mask.is_some()
    }

    /// Content and mask, in that order.
    fn layers_mut(&mut self) -> impl Iterator<Item = &mut AnyDrawable> {
        self.content
            .as_deref_mut()
            .into_iter()
            .chain(self.mask.as_deref_mut())
    }

    pub fn set_color(&mut self, color: Rc<ColorStateList>) {
        self.state.borrow_mut().color = color;
        self.invalidate_self();
    }

    pub fn color(&self) -> Rc<ColorStateList> {
        self.state.borrow().color.clone()
    }

    /// Fully expanded radius in pixels, or [`RADIUS_AUTO`].
    pub fn set_radius(&mut self, radius: i32) {
        self.state.borrow_mut().max_radius = radius;
        self.invalidate_self();
    }

    pub fn radius(&self) -> i32 {
        self.state.borrow().max_radius
    }

    pub fn set_config(&mut self, config: RippleConfig) {
        self.state.borrow_mut().config = config;
    }

    pub fn is_ripple_active(&self) -> bool {
        self.ripple_active
    }

    pub fn active_ripple(&self) -> Option<&RippleForeground> {
        self.ripple.as_ref()
    }

    pub fn exiting_ripple_count(&self) -> usize {
        self.exiting.len()
    }

    pub fn background(&self) -> Option<&RippleBackground> {
        self.background.as_ref()
    }

    /// Area to repaint: the bounds when the ripple is bounded, otherwise the
    /// union of the bounds with the effects' current and previous areas.
    pub fn dirty_bounds(&mut self) -> Rect {
        let bounds = self.base.bounds();
        if self.is_bounded() {
            return bounds;
        }

        let hotspot = self.hotspot_bounds.get();
        let (cx, cy) = (
            hotspot.exact_center_x() as i32,
            hotspot.exact_center_y() as i32,
        );
        let mut drawing = Rect::EMPTY;
        for ripple in self.exiting.iter().chain(self.ripple.iter()) {
            drawing = drawing.union(&ripple.bounds().offset(cx, cy));
        }
        if let Some(background) = &self.background {
            drawing = drawing.union(&background.bounds().offset(cx, cy));
        }

        let dirty = self.drawing_bounds.union(&drawing).union(&bounds);
        self.drawing_bounds = drawing;
        dirty
    }

    fn max_radius(&self) -> f32 {
        self.state.borrow().max_radius as f32
    }

    fn set_ripple_active(&mut self, active: bool) {
        if self.ripple_active != active {
            self.ripple_active = active;
            if active {
                self.try_ripple_enter();
            } else {
                self.try_ripple_exit();
            }
        }
    }

    fn set_background_active(&mut self, hovered: bool, focused: bool, pressed: bool) {
        if self.background.is_none() && (hovered || focused) {
            let mut background =
                RippleBackground::new(self.base.invalidate_handle(), self.hotspot_bounds.clone());
            background.setup(self.max_radius(), self.density_dpi);
            self.background = Some(background);
        }
        if let Some(background) = &mut self.background {
            background.set_state(focused, hovered, pressed);
        }
    }

    fn try_ripple_enter(&mut self) {
        if self.exiting.len() >= MAX_RIPPLES {
            log::trace!("ripple {:?} skipped: too many exiting ripples", self.base.id());
            return;
        }
        let max_radius = self.max_radius();
        let config = self.state.borrow().config;
        if self.ripple.is_none() {
            let hotspot = self.hotspot_bounds.get();
            let (x, y) = self
                .pending_hotspot
                .take()
                .unwrap_or((hotspot.exact_center_x(), hotspot.exact_center_y()));
            self.ripple = Some(RippleForeground::new(
                self.base.invalidate_handle(),
                self.hotspot_bounds.clone(),
                x,
                y,
                config,
            ));
        }
        if let Some(ripple) = &mut self.ripple {
            ripple.setup(max_radius, self.density_dpi);
            ripple.enter(Instant::now());
        }
    }

    fn try_ripple_exit(&mut self) {
        if let Some(mut ripple) = self.ripple.take() {
            ripple.exit(Instant::now());
            self.exiting.push(ripple);
        }
    }

    /// Drop every effect; nothing ripple-related is drawn afterwards.
    fn clear_hotspots(&mut self) {
        if let Some(mut ripple) = self.ripple.take() {
            ripple.end();
            self.ripple_active = false;
        }
        if let Some(background) = &mut self.background {
            background.set_state(false, false, false);
        }
        self.cancel_exiting_ripples();
    }

    fn cancel_exiting_ripples(&mut self) {
        for ripple in &mut self.exiting {
            ripple.end();
        }
        self.exiting.clear();
        self.invalidate_self();
    }

    fn on_hotspot_bounds_changed(&mut self) {
        for ripple in &mut self.exiting {
            ripple.on_hotspot_bounds_changed();
        }
        if let Some(ripple) = &mut self.ripple {
            ripple.on_hotspot_bounds_changed();
        }
        if let Some(background) = &mut self.background {
            background.on_hotspot_bounds_changed();
        }
    }

    fn prune_ripples(&mut self) {
        self.exiting.retain(|ripple| !ripple.has_finished_exit());
    }

    fn draw_background_and_ripples(&self, canvas: &mut Canvas) {
        let background = self.background.as_ref().filter(|b| b.is_visible());
        if self.ripple.is_none() && self.exiting.is_empty() && background.is_none() {
            return;
        }

        let color = {
            let color = self
                .state
                .borrow()
                .color
                .color_for_state(self.base.state(), DEFAULT_RIPPLE_COLOR);
            with_alpha(color, modulate_alpha(alpha(color), self.alpha))
        };
        let hotspot = self.hotspot_bounds.get();
        let (x, y) = (hotspot.exact_center_x(), hotspot.exact_center_y());
        canvas.translate(x, y);

        if let Some(background) = background {
            background.draw(canvas, color);
        }
        for ripple in &self.exiting {
            ripple.draw(canvas, color);
        }
        if let Some(ripple) = &self.ripple {
            ripple.draw(canvas, color);
        }

        canvas.translate(-x, -y);
    }
}

impl Drawable for RippleDrawable {
    fn base(&self) -> &DrawableBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DrawableBase {
        &mut self.base
    }

    fn draw(&mut self, canvas: &mut Canvas) {
        self.prune_ripples();

        let save_count = canvas.save();
        if self.is_bounded() {
            canvas.clip_rect(self.base.bounds().to_rect_f());
        }
        if let Some(content) = &mut self.content {
            content.draw(canvas);
        }
        self.draw_background_and_ripples(canvas);
        canvas.restore_to_count(save_count);
    }

    fn mutate(&mut self) -> &mut Self {
        if !self.mutated {
            let mut private = self.state.borrow().clone();
            if let Some(content) = &mut self.content {
                content.mutate();
                private.content = content.constant_state();
            }
            if let Some(mask) = &mut self.mask {
                mask.mutate();
                private.mask = mask.constant_state();
            }
            self.state = Rc::new(RefCell::new(private));
            self.mutated = true;
        }
        self
    }

    fn clear_mutated(&mut self) {
        self.mutated = false;
        for layer in self.layers_mut() {
            layer.clear_mutated();
        }
    }

    fn constant_state(&self) -> Option<ConstantState> {
        Some(ConstantState::Ripple(self.state.clone()))
    }

    fn on_bounds_change(&mut self, bounds: Rect) {
        for layer in self.layers_mut() {
            layer.set_bounds(bounds);
        }
        if !self.override_bounds {
            self.hotspot_bounds.set(bounds);
            self.on_hotspot_bounds_changed();
        } else {
            for ripple in &mut self.exiting {
                ripple.on_bounds_change();
            }
            if let Some(background) = &mut self.background {
                background.on_bounds_change();
            }
            if let Some(ripple) = &mut self.ripple {
                ripple.on_bounds_change();
            }
        }
        self.invalidate_self();
    }

    fn on_state_change(&mut self, state: StateSet) -> bool {
        let mut changed = false;
        for layer in self.layers_mut() {
            changed |= layer.set_state(state);
        }

        let enabled = state.contains(StateSet::ENABLED);
        let pressed = state.contains(StateSet::PRESSED);
        let focused = state.contains(StateSet::FOCUSED);
        let hovered = state.contains(StateSet::HOVERED);
        self.set_ripple_active(enabled && pressed);
        self.set_background_active(hovered, focused, pressed);
        changed
    }

    fn on_level_change(&mut self, level: i32) -> bool {
        let mut changed = false;
        for layer in self.layers_mut() {
            changed |= layer.set_level(level);
        }
        changed
    }

    fn set_visible(&mut self, visible: bool, restart: bool) -> bool {
        let changed = self.base.is_visible() != visible;
        if changed {
            self.base.visible = visible;
            self.invalidate_self();
        }
        for layer in self.layers_mut() {
            layer.set_visible(visible, restart);
        }

        if !visible {
            self.clear_hotspots();
        } else if changed {
            if self.ripple_active {
                self.try_ripple_enter();
            }
            self.jump_to_current_state();
        }
        changed
    }

    fn alpha(&self) -> u8 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: u8) {
        if self.alpha != alpha {
            self.alpha = alpha;
            if let Some(content) = &mut self.content {
                content.set_alpha(alpha);
            }
            self.invalidate_self();
        }
    }

    fn set_tint_list(&mut self, tint: Option<Rc<ColorStateList>>) {
        if let Some(content) = &mut self.content {
            content.set_tint_list(tint);
        }
    }

    fn set_tint_blend_mode(&mut self, mode: BlendMode) {
        if let Some(content) = &mut self.content {
            content.set_tint_blend_mode(mode);
        }
    }

    fn set_hotspot(&mut self, x: f32, y: f32) {
        self.pending_hotspot = Some((x, y));
        if let Some(ripple) = &mut self.ripple {
            ripple.move_to(x, y);
        }
        if let Some(content) = &mut self.content {
            content.set_hotspot(x, y);
        }
    }

    fn set_hotspot_bounds(&mut self, bounds: Rect) {
        self.override_bounds = true;
        self.hotspot_bounds.set(bounds);
        self.on_hotspot_bounds_changed();
    }

    fn hotspot_bounds(&self) -> Rect {
        self.hotspot_bounds.get()
    }

    fn is_stateful(&self) -> bool {
        true
    }

    fn has_focus_state_specified(&self) -> bool {
        true
    }

    fn jump_to_current_state(&mut self) {
        if let Some(content) = &mut self.content {
            content.jump_to_current_state();
        }
        if let Some(ripple) = &mut self.ripple {
            ripple.end();
        }
        if let Some(background) = &mut self.background {
            background.end();
        }
        self.cancel_exiting_ripples();
    }

    fn intrinsic_width(&self) -> i32 {
        self.content
            .as_ref()
            .map_or(-1, |content| content.intrinsic_width())
    }

    fn intrinsic_height(&self) -> i32 {
        self.content
            .as_ref()
            .map_or(-1, |content| content.intrinsic_height())
    }

    fn padding(&self) -> Option<Insets> {
        self.content.as_ref().and_then(|content| content.padding())
    }

    fn advance_animations(&mut self, now: Instant) -> bool {
        let mut animating = false;
        if let Some(ripple) = &mut self.ripple {
            animating |= ripple.advance(now);
        }
        for ripple in &mut self.exiting {
            animating |= ripple.advance(now);
        }
        if let Some(background) = &mut self.background {
            animating |= background.advance(now);
        }
        if let Some(content) = &mut self.content {
            animating |= content.advance_animations(now);
        }
        animating
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawCommand;
    use crate::drawable::testing::RecordingCallback;
    use crate::drawable::{ColorDrawable, RoundRectShape, ShapeDrawable};
    use std::time::Duration;

    fn white() -> Rc<ColorStateList> {
        Rc::new(ColorStateList::value_of(0x80FFFFFF))
    }

    fn later() -> Instant {
        Instant::now() + Duration::from_secs(2)
    }

    #[test]
    fn test_press_requires_enabled() {
        let mut ripple = RippleDrawable::new(white(), None);
        ripple.set_bounds(Rect::from_size(40, 40));
        ripple.set_state(StateSet::PRESSED);
        assert!(!ripple.is_ripple_active());
        assert!(ripple.active_ripple().is_none());

        ripple.set_state(StateSet::PRESSED | StateSet::ENABLED);
        assert!(ripple.is_ripple_active());
        assert!(ripple.active_ripple().is_some());
    }

    #[test]
    fn test_release_moves_ripple_to_exiting() {
        let mut ripple = RippleDrawable::new(white(), None);
        ripple.set_bounds(Rect::from_size(40, 40));
        ripple.set_state(StateSet::PRESSED | StateSet::ENABLED);
        ripple.set_state(StateSet::ENABLED);
        assert!(ripple.active_ripple().is_none());
        assert_eq!(ripple.exiting_ripple_count(), 1);

        assert!(!ripple.advance_animations(later()));
        ripple.draw(&mut Canvas::new());
        assert_eq!(ripple.exiting_ripple_count(), 0);
    }

    #[test]
    fn test_exiting_ripples_are_capped() {
        let mut ripple = RippleDrawable::new(white(), None);
        ripple.set_bounds(Rect::from_size(40, 40));
        for _ in 0..(MAX_RIPPLES + 3) {
            ripple.set_state(StateSet::PRESSED | StateSet::ENABLED);
            ripple.set_state(StateSet::ENABLED);
        }
        assert_eq!(ripple.exiting_ripple_count(), MAX_RIPPLES);
    }

    #[test]
    fn test_hover_and_focus_start_background() {
        let mut ripple = RippleDrawable::new(white(), None);
        ripple.set_bounds(Rect::from_size(40, 40));
        assert!(ripple.background().is_none());

        ripple.set_state(StateSet::HOVERED);
        ripple.advance_animations(later());
        assert_eq!(ripple.background().map(|b| b.opacity()), Some(0.2));

        ripple.set_state(StateSet::FOCUSED);
        ripple.advance_animations(later());
        let opacity = ripple.background().map_or(0.0, |b| b.opacity());
        assert!((opacity - 0.6).abs() < 1e-4);
    }

    #[test]
    fn test_draws_circle_at_hotspot_centre() {
        let mut ripple = RippleDrawable::new(white(), None);
        ripple.set_bounds(Rect::new(10, 10, 50, 30));
        ripple.set_state(StateSet::PRESSED | StateSet::ENABLED);

        let mut canvas = Canvas::new();
        ripple.draw(&mut canvas);
        match &canvas.commands()[0] {
            DrawCommand::Circle { center, color, clip, .. } => {
                assert_eq!(*center, (30.0, 20.0));
                assert_eq!(color.to_argb(), 0x80FFFFFF);
                assert!(clip.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_hotspot_sets_ripple_origin() {
        let mut ripple = RippleDrawable::new(white(), None);
        ripple.set_bounds(Rect::from_size(100, 100));
        ripple.set_hotspot(60.0, 40.0);
        ripple.set_state(StateSet::PRESSED | StateSet::ENABLED);
        let origin = ripple.active_ripple().map(|r| r.current_center());
        assert_eq!(origin, Some((10.0, -10.0)));
    }

    #[test]
    fn test_content_clips_and_draws_first() {
        let content: AnyDrawable = ColorDrawable::new(0xFF0000FF).into();
        let mut ripple = RippleDrawable::new(white(), Some(content));
        ripple.set_bounds(Rect::from_size(20, 20));
        ripple.set_state(StateSet::PRESSED | StateSet::ENABLED);

        let mut canvas = Canvas::new();
        ripple.draw(&mut canvas);
        let commands = canvas.commands();
        assert!(matches!(commands[0], DrawCommand::Rect { .. }));
        assert!(matches!(commands[1], DrawCommand::Circle { .. }));
        assert!(commands.iter().all(|c| c.clip().is_some()));
        assert_eq!(ripple.dirty_bounds(), Rect::from_size(20, 20));
    }

    #[test]
    fn test_mask_bounds_ripple_without_being_drawn() {
        let mask: AnyDrawable = ColorDrawable::new(0xFFFFFFFF).into();
        let mut ripple = RippleDrawable::with_mask(white(), None, Some(mask));
        assert!(ripple.is_bounded());
        ripple.set_radius(30);
        ripple.set_bounds(Rect::from_size(20, 20));
        ripple.set_level(40);
        ripple.set_state(StateSet::PRESSED | StateSet::ENABLED);

        let mask = ripple.mask().expect("mask");
        assert_eq!(mask.bounds(), Rect::from_size(20, 20));
        assert_eq!(mask.level(), 40);
        assert_eq!(mask.state(), StateSet::PRESSED | StateSet::ENABLED);

        let mut canvas = Canvas::new();
        ripple.draw(&mut canvas);
        let commands = canvas.commands();
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], DrawCommand::Circle { .. }));
        assert_eq!(commands[0].clip(), Some(Rect::from_size(20, 20).to_rect_f()));

        ripple.set_state(StateSet::ENABLED);
        assert_eq!(ripple.dirty_bounds(), Rect::from_size(20, 20));
    }

    #[test]
    fn test_mask_survives_new_drawable_and_mutate() {
        let mask: AnyDrawable = ColorDrawable::new(0xFFFFFFFF).into();
        let mut first = RippleDrawable::with_mask(white(), None, Some(mask));
        let AnyDrawable::Ripple(second) = first.constant_state().expect("state").new_drawable()
        else {
            panic!("expected a ripple");
        };
        assert!(second.is_bounded());
        assert!(second.content().is_none());
        assert_ne!(
            second.mask().map(|m| m.id()),
            first.mask().map(|m| m.id())
        );

        first.mutate();
        let private = first.state.borrow();
        let mask_state = first.mask().and_then(|m| m.constant_state()).expect("mask");
        assert!(private.mask.as_ref().is_some_and(|m| m.ptr_eq(&mask_state)));
    }

    #[test]
    fn test_bounds_change_updates_auto_radius_only_without_override() {
        let mut ripple = RippleDrawable::new(white(), None);
        ripple.set_bounds(Rect::from_size(6, 8));
        ripple.set_state(StateSet::PRESSED | StateSet::ENABLED);
        let recorder = RecordingCallback::install(&mut ripple);
        ripple.set_bounds(Rect::from_size(10, 24));
        // Old area, the ripple's radius change, then the new area
        assert_eq!(recorder.invalidation_count(), 3);
        let radius = ripple.active_ripple().map(|r| r.component().target_radius());
        assert_eq!(radius, Some(13.0));

        ripple.set_hotspot_bounds(Rect::from_size(6, 8));
        ripple.set_bounds(Rect::from_size(100, 100));
        let radius = ripple.active_ripple().map(|r| r.component().target_radius());
        assert_eq!(radius, Some(5.0));
    }

    #[test]
    fn test_sizing_comes_from_content() {
        let mut shape = ShapeDrawable::new(RoundRectShape::default(), 0xFF000000);
        shape.set_padding(Some(Insets::uniform(3)));
        shape.set_intrinsic_size(16, 8);
        let ripple = RippleDrawable::new(white(), Some(shape.into()));
        assert_eq!(ripple.padding(), Some(Insets::uniform(3)));
        assert_eq!((ripple.minimum_width(), ripple.minimum_height()), (16, 8));

        let bare = RippleDrawable::new(white(), None);
        assert_eq!(bare.padding(), None);
        assert_eq!(bare.minimum_width(), 0);
    }

    #[test]
    fn test_unbounded_dirty_bounds_cover_effects() {
        let mut ripple = RippleDrawable::new(white(), None);
        ripple.set_radius(30);
        ripple.set_bounds(Rect::from_size(20, 20));
        ripple.set_state(StateSet::PRESSED | StateSet::ENABLED);
        ripple.set_state(StateSet::ENABLED);
        assert_eq!(ripple.dirty_bounds(), Rect::new(-20, -20, 40, 40));
    }

    #[test]
    fn test_hotspot_bounds_override() {
        let mut ripple = RippleDrawable::new(white(), None);
        ripple.set_hotspot_bounds(Rect::new(0, 0, 6, 8));
        ripple.set_bounds(Rect::from_size(100, 100));
        assert_eq!(ripple.hotspot_bounds(), Rect::new(0, 0, 6, 8));

        ripple.set_state(StateSet::PRESSED | StateSet::ENABLED);
        let bounds = ripple.active_ripple().map(|r| r.bounds());
        assert_eq!(bounds, Some(Rect::new(-5, -5, 5, 5)));
    }

    #[test]
    fn test_hiding_clears_effects() {
        let mut ripple = RippleDrawable::new(white(), None);
        ripple.set_bounds(Rect::from_size(40, 40));
        ripple.set_state(StateSet::PRESSED | StateSet::ENABLED);
        ripple.set_state(StateSet::ENABLED);
        ripple.set_state(StateSet::PRESSED | StateSet::ENABLED);

        ripple.set_visible(false, false);
        assert!(!ripple.is_ripple_active());
        assert!(ripple.active_ripple().is_none());
        assert_eq!(ripple.exiting_ripple_count(), 0);
    }

    #[test]
    fn test_ripple_invalidates_through_owner() {
        let mut ripple = RippleDrawable::new(white(), None);
        ripple.set_bounds(Rect::from_size(40, 40));
        let recorder = RecordingCallback::install(&mut ripple);
        ripple.set_state(StateSet::PRESSED | StateSet::ENABLED);
        assert!(recorder.invalidation_count() > 0);
        assert!(recorder
            .invalidated
            .borrow()
            .iter()
            .all(|id| *id == ripple.id()));
    }

    #[test]
    fn test_new_drawable_shares_state_and_rebuilds_content() {
        let content: AnyDrawable = ColorDrawable::new(0xFF0000FF).into();
        let first = RippleDrawable::new(white(), Some(content));
        let AnyDrawable::Ripple(second) = first
            .constant_state()
            .expect("state")
            .new_drawable_with_resources(&Resources::with_density_dpi(320))
        else {
            panic!("expected a ripple");
        };
        assert_eq!(second.density_dpi, 320);
        assert!(second.content().is_some());
        assert_ne!(
            second.content().map(|c| c.id()),
            first.content().map(|c| c.id())
        );
        assert!(Rc::ptr_eq(&first.state, &second.state));
    }
}
