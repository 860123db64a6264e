//! The drawable model: identity, upward callbacks, and the capability trait
//! every drawable variant implements.
//!
//! A drawable is a visual node that knows how to paint itself into a
//! [`Canvas`] within its bounds. Hosts push bounds, state sets and levels
//! into drawables; drawables answer with "did my appearance change" booleans
//! and request redraws through the [`Callback`] installed on them.
//!
//! Configuration lives in a shared [`ConstantState`]. Several drawables can
//! reference the same constant state; [`Drawable::mutate`] gives a drawable
//! its own private copy before it is customised.

mod animated_image;
mod any;
mod color;
mod color_state_list;
mod constant_state;
mod container;
mod level_list;
mod ripple;
mod shape;

pub use animated_image::{AnimatedImageDrawable, AnimatedImageState, AnimationCallback, REPEAT_INFINITE};
pub use any::AnyDrawable;
pub use color::{ColorDrawable, ColorState};
pub use color_state_list::{ColorStateListDrawable, ColorStateListDrawableState};
pub use constant_state::ConstantState;
pub use container::{
    ContainerState, DrawableContainer, DrawableContainerState, CHILD_CAPACITY_STEP,
};
pub use level_list::{LevelListDrawable, LevelListState};
pub use ripple::{
    RippleBackground, RippleComponent, RippleConfig, RippleDrawable, RippleEffect,
    RippleForeground, RippleState, RADIUS_AUTO,
};
pub use shape::{RoundRectShape, ShapeDrawable, ShapeState};

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::blend::BlendMode;
use crate::canvas::Canvas;
use crate::color::ColorInt;
use crate::color_state_list::ColorStateList;
use crate::geometry::{Insets, Rect};
use crate::state::StateSet;

/// Maximum level a drawable is expected to be set to.
pub const MAX_LEVEL: i32 = 10_000;

/// Unique identifier for a drawable instance.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct DrawableId(u64);

static NEXT_DRAWABLE_ID: AtomicU64 = AtomicU64::new(1);

impl DrawableId {
    /// Generate a new unique drawable ID
    pub fn next() -> Self {
        DrawableId(NEXT_DRAWABLE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Work scheduled through [`Callback::schedule_drawable`]. Compared by
/// pointer identity when unscheduling.
pub type Runnable = Rc<dyn Fn()>;

/// Upward notifications from a drawable to whoever displays it.
pub trait Callback {
    /// `who` needs to be redrawn.
    fn invalidate_drawable(&self, who: DrawableId);

    /// Run `what` at `when` on the render thread.
    fn schedule_drawable(&self, who: DrawableId, what: &Runnable, when: Instant);

    /// Cancel a previously scheduled `what`.
    fn unschedule_drawable(&self, who: DrawableId, what: &Runnable);
}

/// Weak reference to a drawable's callback, shareable with helpers that
/// invalidate on the drawable's behalf.
#[derive(Clone, Default)]
pub(crate) struct CallbackSlot(Rc<RefCell<Option<Weak<dyn Callback>>>>);

impl CallbackSlot {
    pub(crate) fn set(&self, callback: Option<&Rc<dyn Callback>>) {
        *self.0.borrow_mut() = callback.map(Rc::downgrade);
    }

    pub(crate) fn get(&self) -> Option<Rc<dyn Callback>> {
        self.0.borrow().as_ref().and_then(Weak::upgrade)
    }
}

/// Lets a helper object request invalidation of the drawable that owns it.
#[derive(Clone)]
pub struct InvalidateHandle {
    owner: DrawableId,
    slot: CallbackSlot,
}

impl InvalidateHandle {
    pub fn invalidate(&self) {
        if let Some(callback) = self.slot.get() {
            callback.invalidate_drawable(self.owner);
        }
    }
}

/// Presentation state every drawable instance owns for itself.
pub struct DrawableBase {
    id: DrawableId,
    bounds: Rect,
    state: StateSet,
    level: i32,
    visible: bool,
    callback: CallbackSlot,
}

impl DrawableBase {
    pub fn new() -> Self {
        Self {
            id: DrawableId::next(),
            bounds: Rect::EMPTY,
            state: StateSet::WILDCARD,
            level: 0,
            visible: true,
            callback: CallbackSlot::default(),
        }
    }

    pub fn id(&self) -> DrawableId {
        self.id
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn state(&self) -> StateSet {
        self.state
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_callback(&mut self, callback: Option<&Rc<dyn Callback>>) {
        self.callback.set(callback);
    }

    pub fn callback(&self) -> Option<Rc<dyn Callback>> {
        self.callback.get()
    }

    pub fn invalidate_handle(&self) -> InvalidateHandle {
        InvalidateHandle {
            owner: self.id,
            slot: self.callback.clone(),
        }
    }

    pub fn invalidate_self(&self) {
        if let Some(callback) = self.callback() {
            callback.invalidate_drawable(self.id);
        }
    }

    pub fn schedule_self(&self, what: &Runnable, when: Instant) {
        if let Some(callback) = self.callback() {
            callback.schedule_drawable(self.id, what, when);
        }
    }

    pub fn unschedule_self(&self, what: &Runnable) {
        if let Some(callback) = self.callback() {
            callback.unschedule_drawable(self.id, what);
        }
    }
}

impl Default for DrawableBase {
    fn default() -> Self {
        Self::new()
    }
}

/// Callback installed on the child of a wrapper or container drawable.
///
/// Events are forwarded upward, re-attributed to the owner, only when they
/// come from the child currently tracked as the source. While blocked,
/// invalidations are dropped (schedules still pass).
pub(crate) struct ChildRelay {
    owner: DrawableId,
    upstream: CallbackSlot,
    source: Cell<Option<DrawableId>>,
    blocked: Cell<bool>,
}

impl ChildRelay {
    pub(crate) fn new(owner: &DrawableBase) -> Rc<Self> {
        Rc::new(Self {
            owner: owner.id,
            upstream: owner.callback.clone(),
            source: Cell::new(None),
            blocked: Cell::new(false),
        })
    }

    pub(crate) fn set_source(&self, source: Option<DrawableId>) {
        self.source.set(source);
    }

    pub(crate) fn set_blocked(&self, blocked: bool) {
        self.blocked.set(blocked);
    }

    pub(crate) fn as_callback(self: &Rc<Self>) -> Rc<dyn Callback> {
        self.clone()
    }

    fn forwards(&self, who: DrawableId) -> Option<Rc<dyn Callback>> {
        if self.source.get() == Some(who) {
            self.upstream.get()
        } else {
            None
        }
    }
}

impl Callback for ChildRelay {
    fn invalidate_drawable(&self, who: DrawableId) {
        if self.blocked.get() {
            return;
        }
        if let Some(callback) = self.forwards(who) {
            callback.invalidate_drawable(self.owner);
        }
    }

    fn schedule_drawable(&self, who: DrawableId, what: &Runnable, when: Instant) {
        if let Some(callback) = self.forwards(who) {
            callback.schedule_drawable(self.owner, what, when);
        }
    }

    fn unschedule_drawable(&self, who: DrawableId, what: &Runnable) {
        if let Some(callback) = self.forwards(who) {
            callback.unschedule_drawable(self.owner, what);
        }
    }
}

/// Capability set shared by every drawable variant.
///
/// Provided methods implement the common template (change detection for
/// bounds, state and level); variants hook in through the `on_*` methods.
pub trait Drawable {
    fn base(&self) -> &DrawableBase;

    fn base_mut(&mut self) -> &mut DrawableBase;

    /// Paint into `canvas` within the current bounds.
    fn draw(&mut self, canvas: &mut Canvas);

    /// Give this drawable a private copy of its constant state. Only the
    /// first call clones; later calls return immediately.
    fn mutate(&mut self) -> &mut Self;

    /// Allow the next [`Drawable::mutate`] to clone again.
    fn clear_mutated(&mut self);

    /// The shared configuration backing this drawable.
    fn constant_state(&self) -> Option<ConstantState>;

    fn id(&self) -> DrawableId {
        self.base().id()
    }

    fn set_callback(&mut self, callback: Option<&Rc<dyn Callback>>) {
        self.base_mut().set_callback(callback);
    }

    fn invalidate_self(&self) {
        self.base().invalidate_self();
    }

    fn bounds(&self) -> Rect {
        self.base().bounds()
    }

    /// Move the drawable. The previous area is invalidated first when it was
    /// non-empty.
    fn set_bounds(&mut self, bounds: Rect) {
        let old = self.base().bounds();
        if old != bounds {
            if !old.is_empty() {
                self.invalidate_self();
            }
            self.base_mut().bounds = bounds;
            self.on_bounds_change(bounds);
        }
    }

    fn on_bounds_change(&mut self, _bounds: Rect) {}

    fn state(&self) -> StateSet {
        self.base().state()
    }

    /// Returns true when the new state changed the appearance.
    fn set_state(&mut self, state: StateSet) -> bool {
        if self.base().state() != state {
            self.base_mut().state = state;
            return self.on_state_change(state);
        }
        false
    }

    fn on_state_change(&mut self, _state: StateSet) -> bool {
        false
    }

    fn level(&self) -> i32 {
        self.base().level()
    }

    /// Returns true when the new level changed the appearance. Levels run
    /// from 0 to [`MAX_LEVEL`] by convention; no clamping is applied.
    fn set_level(&mut self, level: i32) -> bool {
        if self.base().level() != level {
            self.base_mut().level = level;
            return self.on_level_change(level);
        }
        false
    }

    fn on_level_change(&mut self, _level: i32) -> bool {
        false
    }

    fn is_visible(&self) -> bool {
        self.base().is_visible()
    }

    fn set_visible(&mut self, visible: bool, _restart: bool) -> bool {
        let changed = self.base().is_visible() != visible;
        if changed {
            self.base_mut().visible = visible;
            self.invalidate_self();
        }
        changed
    }

    fn alpha(&self) -> u8 {
        0xFF
    }

    fn set_alpha(&mut self, _alpha: u8) {}

    fn set_tint(&mut self, color: ColorInt) {
        self.set_tint_list(Some(Rc::new(ColorStateList::value_of(color))));
    }

    fn set_tint_list(&mut self, _tint: Option<Rc<ColorStateList>>) {}

    fn set_tint_blend_mode(&mut self, _mode: BlendMode) {}

    fn set_hotspot(&mut self, _x: f32, _y: f32) {}

    fn set_hotspot_bounds(&mut self, _bounds: Rect) {}

    fn hotspot_bounds(&self) -> Rect {
        self.bounds()
    }

    fn is_stateful(&self) -> bool {
        false
    }

    fn has_focus_state_specified(&self) -> bool {
        false
    }

    /// Skip any running transition to its end state.
    fn jump_to_current_state(&mut self) {}

    /// Intrinsic width, or -1 when the drawable has none.
    fn intrinsic_width(&self) -> i32 {
        -1
    }

    fn intrinsic_height(&self) -> i32 {
        -1
    }

    /// Insets for content placed inside the bounds, or `None` when the
    /// drawable asks for none.
    fn padding(&self) -> Option<Insets> {
        None
    }

    /// Smallest width a host should give this drawable, padding included.
    fn minimum_width(&self) -> i32 {
        self.intrinsic_width().max(0)
    }

    fn minimum_height(&self) -> i32 {
        self.intrinsic_height().max(0)
    }

    /// Advance time-driven effects to `now`. Returns true while still
    /// animating.
    fn advance_animations(&mut self, _now: Instant) -> bool {
        false
    }
}

/// Compare optional shared color lists by identity.
pub(crate) fn same_list(a: &Option<Rc<ColorStateList>>, b: &Option<Rc<ColorStateList>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Callback that records every event it receives.
    #[derive(Default)]
    pub(crate) struct RecordingCallback {
        pub invalidated: RefCell<Vec<DrawableId>>,
        pub scheduled: RefCell<Vec<(DrawableId, Instant)>>,
        pub unscheduled: RefCell<Vec<DrawableId>>,
    }

    impl RecordingCallback {
        pub(crate) fn install<D: Drawable>(drawable: &mut D) -> Rc<RecordingCallback> {
            let recorder = Rc::new(RecordingCallback::default());
            let callback: Rc<dyn Callback> = recorder.clone();
            drawable.set_callback(Some(&callback));
            recorder
        }

        pub(crate) fn invalidation_count(&self) -> usize {
            self.invalidated.borrow().len()
        }
    }

    impl Callback for RecordingCallback {
        fn invalidate_drawable(&self, who: DrawableId) {
            self.invalidated.borrow_mut().push(who);
        }

        fn schedule_drawable(&self, who: DrawableId, _what: &Runnable, when: Instant) {
            self.scheduled.borrow_mut().push((who, when));
        }

        fn unschedule_drawable(&self, who: DrawableId, _what: &Runnable) {
            self.unscheduled.borrow_mut().push(who);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingCallback;
    use super::*;

    #[test]
    fn test_drawable_ids_are_unique() {
        assert_ne!(DrawableId::next(), DrawableId::next());
    }

    #[test]
    fn test_callback_is_weak() {
        let mut drawable = ColorDrawable::new(0xFF000000);
        {
            let callback: Rc<dyn Callback> = Rc::new(RecordingCallback::default());
            drawable.set_callback(Some(&callback));
            assert!(drawable.base().callback().is_some());
        }
        assert!(drawable.base().callback().is_none());
    }

    #[test]
    fn test_set_bounds_invalidates_previous_area_only_when_non_empty() {
        let mut drawable = ColorDrawable::new(0xFF000000);
        let recorder = RecordingCallback::install(&mut drawable);

        drawable.set_bounds(Rect::new(0, 0, 10, 10));
        assert_eq!(recorder.invalidation_count(), 0);

        drawable.set_bounds(Rect::new(0, 0, 20, 20));
        assert_eq!(recorder.invalidation_count(), 1);

        drawable.set_bounds(Rect::new(0, 0, 20, 20));
        assert_eq!(recorder.invalidation_count(), 1);
    }

    #[test]
    fn test_set_level_only_reports_on_change() {
        let mut drawable = ColorDrawable::new(0xFF000000);
        assert!(!drawable.set_level(0));
        drawable.set_level(5);
        assert_eq!(drawable.level(), 5);
    }

    #[test]
    fn test_set_visible_invalidates_on_change() {
        let mut drawable = ColorDrawable::new(0xFF000000);
        let recorder = RecordingCallback::install(&mut drawable);
        assert!(!drawable.set_visible(true, false));
        assert!(drawable.set_visible(false, false));
        assert_eq!(recorder.invalidation_count(), 1);
    }

    #[test]
    fn test_child_relay_filters_by_source() {
        let mut owner = DrawableBase::new();
        let recorder = Rc::new(RecordingCallback::default());
        let callback: Rc<dyn Callback> = recorder.clone();
        owner.set_callback(Some(&callback));

        let relay = ChildRelay::new(&owner);
        let child = DrawableId::next();
        let stranger = DrawableId::next();
        relay.set_source(Some(child));

        relay.invalidate_drawable(stranger);
        relay.invalidate_drawable(child);
        relay.set_blocked(true);
        relay.invalidate_drawable(child);

        assert_eq!(*recorder.invalidated.borrow(), vec![owner.id()]);
    }
}
