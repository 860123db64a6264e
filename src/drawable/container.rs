//! Drawables that hold several children and display one of them at a time.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::blend::BlendMode;
use crate::canvas::Canvas;
use crate::color_state_list::ColorStateList;
use crate::geometry::{Insets, Rect};
use crate::resources::{Resources, DENSITY_DEFAULT};
use crate::state::StateSet;

use super::{same_list, AnyDrawable, ChildRelay, ConstantState, Drawable, DrawableBase, Runnable};

/// Number of child slots allocated up front and added on each growth.
pub const CHILD_CAPACITY_STEP: usize = 10;

/// Interval between fade frames requested through the callback.
const FADE_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Children and shared configuration of a [`DrawableContainer`].
///
/// The child array is allocated by capacity; slots past
/// [`child_count`](Self::child_count) are empty.
pub struct DrawableContainerState {
    children: Vec<Option<AnyDrawable>>,
    count: usize,
    tint: Option<Rc<ColorStateList>>,
    blend_mode: Option<BlendMode>,
    enter_fade_duration: Duration,
    exit_fade_duration: Duration,
    constant_size: bool,
    variable_padding: bool,
    density_dpi: u32,
}

impl DrawableContainerState {
    pub fn new(resources: &Resources) -> Self {
        let mut children = Vec::with_capacity(CHILD_CAPACITY_STEP);
        children.resize_with(CHILD_CAPACITY_STEP, || None);
        Self {
            children,
            count: 0,
            tint: None,
            blend_mode: None,
            enter_fade_duration: Duration::ZERO,
            exit_fade_duration: Duration::ZERO,
            constant_size: false,
            variable_padding: false,
            density_dpi: resources.display_metrics().density_dpi,
        }
    }

    pub fn child_count(&self) -> usize {
        self.count
    }

    /// Number of allocated child slots.
    pub fn capacity(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, index: usize) -> Option<&AnyDrawable> {
        self.children.get(index).and_then(Option::as_ref)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut AnyDrawable> {
        self.children.get_mut(index).and_then(Option::as_mut)
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = (usize, &mut AnyDrawable)> {
        self.children
            .iter_mut()
            .enumerate()
            .filter_map(|(index, child)| child.as_mut().map(|child| (index, child)))
    }

    fn push_child(&mut self, child: AnyDrawable) -> usize {
        let pos = self.count;
        self.children[pos] = Some(child);
        self.count += 1;
        pos
    }

    /// Reallocate the child array to `new_size` slots, keeping the first
    /// `old_size`.
    pub fn grow_array(&mut self, old_size: usize, new_size: usize) {
        log::debug!("growing container children from {old_size} to {new_size} slots");
        let mut children = Vec::with_capacity(new_size);
        children.extend(self.children.drain(..old_size.min(self.children.len())));
        children.resize_with(new_size, || None);
        self.children = children;
    }

    pub fn enter_fade_duration(&self) -> Duration {
        self.enter_fade_duration
    }

    pub fn set_enter_fade_duration(&mut self, duration: Duration) {
        self.enter_fade_duration = duration;
    }

    pub fn exit_fade_duration(&self) -> Duration {
        self.exit_fade_duration
    }

    pub fn set_exit_fade_duration(&mut self, duration: Duration) {
        self.exit_fade_duration = duration;
    }

    pub fn is_constant_size(&self) -> bool {
        self.constant_size
    }

    /// Report the largest child size instead of the current child's size.
    pub fn set_constant_size(&mut self, constant: bool) {
        self.constant_size = constant;
    }

    /// Largest intrinsic width and height over all children.
    pub fn constant_size(&self) -> (i32, i32) {
        self.children
            .iter()
            .flatten()
            .fold((-1, -1), |(width, height), child| {
                (
                    width.max(child.intrinsic_width()),
                    height.max(child.intrinsic_height()),
                )
            })
    }

    /// Largest minimum width and height over all children.
    pub fn constant_minimum_size(&self) -> (i32, i32) {
        self.children
            .iter()
            .flatten()
            .fold((0, 0), |(width, height), child| {
                (
                    width.max(child.minimum_width()),
                    height.max(child.minimum_height()),
                )
            })
    }

    pub fn is_variable_padding(&self) -> bool {
        self.variable_padding
    }

    /// Report the current child's padding instead of the largest padding
    /// over all children.
    pub fn set_variable_padding(&mut self, variable: bool) {
        self.variable_padding = variable;
    }

    /// Largest inset per edge over the children that have padding. `None`
    /// in variable-padding mode or when no child has padding.
    pub fn constant_padding(&self) -> Option<Insets> {
        if self.variable_padding {
            return None;
        }
        self.children
            .iter()
            .flatten()
            .filter_map(|child| child.padding())
            .reduce(|acc, padding| acc.max(&padding))
    }

    /// True when any child reacts to state changes.
    pub fn is_stateful(&self) -> bool {
        self.children.iter().flatten().any(|child| child.is_stateful())
    }

    pub fn density_dpi(&self) -> u32 {
        self.density_dpi
    }

    /// Copy for a new owning container. Children are re-instantiated from
    /// their own constant states and mutated.
    pub fn copy_for_owner(&self, resources: &Resources) -> Self {
        let children = self
            .children
            .iter()
            .map(|child| {
                let state = child.as_ref()?.constant_state()?;
                let mut copy = state.new_drawable_with_resources(resources);
                copy.mutate();
                Some(copy)
            })
            .collect();
        Self {
            children,
            count: self.count,
            tint: self.tint.clone(),
            blend_mode: self.blend_mode,
            enter_fade_duration: self.enter_fade_duration,
            exit_fade_duration: self.exit_fade_duration,
            constant_size: self.constant_size,
            variable_padding: self.variable_padding,
            density_dpi: resources.display_metrics().density_dpi,
        }
    }

    pub(crate) fn mutate_children(&mut self) {
        for (_, child) in self.children_mut() {
            child.mutate();
        }
    }
}

impl Default for DrawableContainerState {
    fn default() -> Self {
        Self::new(&Resources::with_density_dpi(DENSITY_DEFAULT))
    }
}

/// Constant state of a concrete container kind.
///
/// Wraps a [`DrawableContainerState`] and adds whatever the kind needs to
/// choose a child.
pub trait ContainerState: Sized {
    fn container(&self) -> &DrawableContainerState;

    fn container_mut(&mut self) -> &mut DrawableContainerState;

    /// Copy for a new owning container. See
    /// [`DrawableContainerState::copy_for_owner`].
    fn copy_for_owner(&self, resources: &Resources) -> Self;

    fn into_constant_state(state: Rc<RefCell<Self>>) -> ConstantState;

    /// Detach anything still shared with copies.
    fn mutate(&mut self) {
        self.container_mut().mutate_children();
    }

    fn grow_array(&mut self, old_size: usize, new_size: usize) {
        self.container_mut().grow_array(old_size, new_size);
    }

    /// Child index to display at `level` (-1 for none), or `None` when the
    /// kind does not select by level.
    fn index_for_level(&self, _level: i32) -> Option<i32> {
        None
    }

    /// Append a child, growing every per-child array when full. Returns the
    /// child's index.
    fn add_child(&mut self, child: AnyDrawable) -> usize {
        let pos = self.container().child_count();
        if pos >= self.container().capacity() {
            self.grow_array(pos, pos + CHILD_CAPACITY_STEP);
        }
        self.container_mut().push_child(child)
    }
}

/// Displays one child at a time, optionally cross-fading on selection.
///
/// Children report to the container through a relay that only forwards
/// events from the selected child.
pub struct DrawableContainer<S: ContainerState> {
    base: DrawableBase,
    state: Rc<RefCell<S>>,
    relay: Rc<ChildRelay>,
    current: i32,
    /// Child still fading out after a selection change
    last: i32,
    alpha: u8,
    has_alpha: bool,
    enter_fade_end: Option<Instant>,
    exit_fade_end: Option<Instant>,
    hotspot_bounds: Option<Rect>,
    fade_tick: Runnable,
    mutated: bool,
}

impl<S: ContainerState + Default> DrawableContainer<S> {
    pub fn new() -> Self {
        Self::from_state(Rc::new(RefCell::new(S::default())))
    }
}

impl<S: ContainerState + Default> Default for DrawableContainer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ContainerState> DrawableContainer<S> {
    pub(crate) fn from_state(state: Rc<RefCell<S>>) -> Self {
        let base = DrawableBase::new();
        let relay = ChildRelay::new(&base);
        let handle = base.invalidate_handle();
        let fade_tick: Runnable = Rc::new(move || handle.invalidate());
        let mut container = Self {
            base,
            state,
            relay,
            current: -1,
            last: -1,
            alpha: 0xFF,
            has_alpha: false,
            enter_fade_end: None,
            exit_fade_end: None,
            hotspot_bounds: None,
            fade_tick,
            mutated: false,
        };
        container.attach_children();
        let level = container.base.level();
        container.on_level_change(level);
        container
    }

    pub(crate) fn state_handle(&self) -> &Rc<RefCell<S>> {
        &self.state
    }

    /// Index of the displayed child, or -1.
    pub fn current_index(&self) -> i32 {
        self.current
    }

    pub fn child_count(&self) -> usize {
        self.state.borrow().container().child_count()
    }

    /// Append a child. It is mutated, hidden and attached to this container.
    pub fn add_child(&mut self, mut drawable: AnyDrawable) -> usize {
        self.prepare_child(&mut drawable);
        self.state.borrow_mut().add_child(drawable)
    }

    pub(crate) fn prepare_child(&self, drawable: &mut AnyDrawable) {
        drawable.mutate();
        drawable.set_visible(false, true);
        drawable.set_callback(Some(&self.relay.as_callback()));
    }

    /// Run `f` on the child at `index`, if there is one.
    pub fn with_child<R>(&self, index: i32, f: impl FnOnce(&mut AnyDrawable) -> R) -> Option<R> {
        let index = usize::try_from(index).ok()?;
        let mut state = self.state.borrow_mut();
        state.container_mut().child_mut(index).map(f)
    }

    pub fn set_enter_fade_duration(&mut self, duration: Duration) {
        self.state
            .borrow_mut()
            .container_mut()
            .set_enter_fade_duration(duration);
    }

    pub fn set_exit_fade_duration(&mut self, duration: Duration) {
        self.state
            .borrow_mut()
            .container_mut()
            .set_exit_fade_duration(duration);
    }

    pub fn set_constant_size(&mut self, constant: bool) {
        self.state
            .borrow_mut()
            .container_mut()
            .set_constant_size(constant);
    }

    pub fn set_variable_padding(&mut self, variable: bool) {
        self.state
            .borrow_mut()
            .container_mut()
            .set_variable_padding(variable);
    }

    /// Display the child at `index`; an out-of-range index clears the
    /// selection. Returns false when `index` is already selected.
    pub fn select_drawable(&mut self, index: i32) -> bool {
        if index == self.current {
            return false;
        }

        let now = Instant::now();
        let (count, enter_fade, exit_fade) = {
            let state = self.state.borrow();
            let container = state.container();
            (
                container.child_count(),
                container.enter_fade_duration(),
                container.exit_fade_duration(),
            )
        };

        if !exit_fade.is_zero() {
            self.with_child(self.last, |child| child.set_visible(false, false));
            if self.current >= 0 {
                self.last = self.current;
                self.exit_fade_end = Some(now + exit_fade);
            } else {
                self.last = -1;
                self.exit_fade_end = None;
            }
        } else {
            self.with_child(self.current, |child| child.set_visible(false, false));
        }

        let in_range = usize::try_from(index).is_ok_and(|index| index < count);
        if in_range {
            self.current = index;
            let id = self.with_child(index, |child| child.id());
            self.relay.set_source(id);
            if !enter_fade.is_zero() {
                self.enter_fade_end = Some(now + enter_fade);
            }
            self.initialize_child_for_display(index);
        } else {
            self.current = -1;
            self.relay.set_source(None);
        }

        if self.enter_fade_end.is_some() || self.exit_fade_end.is_some() {
            self.base.unschedule_self(&self.fade_tick);
            self.animate(now, true);
        }
        self.invalidate_self();
        true
    }

    /// Push this container's presentation state into a newly displayed
    /// child, without letting the child invalidate.
    fn initialize_child_for_display(&mut self, index: i32) {
        let (enter_fade, tint, blend_mode) = {
            let state = self.state.borrow();
            let container = state.container();
            (
                container.enter_fade_duration(),
                container.tint.clone(),
                container.blend_mode,
            )
        };
        let alpha = (enter_fade.is_zero() && self.has_alpha).then_some(self.alpha);
        let visible = self.base.is_visible();
        let state_set = self.base.state();
        let level = self.base.level();
        let bounds = self.base.bounds();
        let hotspot_bounds = self.hotspot_bounds;

        self.relay.set_blocked(true);
        self.with_child(index, |child| {
            if let Some(alpha) = alpha {
                child.set_alpha(alpha);
            }
            if tint.is_some() {
                child.set_tint_list(tint);
            }
            if let Some(mode) = blend_mode {
                child.set_tint_blend_mode(mode);
            }
            child.set_visible(visible, true);
            child.set_state(state_set);
            child.set_level(level);
            child.set_bounds(bounds);
            if let Some(hotspot_bounds) = hotspot_bounds {
                child.set_hotspot_bounds(hotspot_bounds);
            }
        });
        self.relay.set_blocked(false);
    }

    /// Step the enter and exit fades to `now`. Returns true while fading.
    fn animate(&mut self, now: Instant, schedule: bool) -> bool {
        self.has_alpha = true;
        let (enter_fade, exit_fade) = {
            let state = self.state.borrow();
            (
                state.container().enter_fade_duration(),
                state.container().exit_fade_duration(),
            )
        };
        let alpha = self.alpha;
        let mut animating = false;

        match self.enter_fade_end {
            Some(end) if self.current >= 0 => {
                if end <= now {
                    self.with_child(self.current, |child| child.set_alpha(alpha));
                    self.enter_fade_end = None;
                } else {
                    let remaining = fade_alpha(end - now, enter_fade);
                    let faded = ((255 - remaining) * alpha as u32 / 255) as u8;
                    self.with_child(self.current, |child| child.set_alpha(faded));
                    animating = true;
                }
            }
            _ => self.enter_fade_end = None,
        }

        match self.exit_fade_end {
            Some(end) if self.last >= 0 => {
                if end <= now {
                    self.with_child(self.last, |child| child.set_visible(false, false));
                    self.last = -1;
                    self.exit_fade_end = None;
                } else {
                    let remaining = fade_alpha(end - now, exit_fade);
                    let faded = (remaining * alpha as u32 / 255) as u8;
                    self.with_child(self.last, |child| child.set_alpha(faded));
                    animating = true;
                }
            }
            _ => self.exit_fade_end = None,
        }

        if schedule && animating {
            self.base
                .schedule_self(&self.fade_tick, now + FADE_FRAME_INTERVAL);
        }
        animating
    }

    /// Install the relay on every child and hide all but the current one.
    fn attach_children(&mut self) {
        let callback = self.relay.as_callback();
        let current = usize::try_from(self.current).ok();
        let mut state = self.state.borrow_mut();
        for (index, child) in state.container_mut().children_mut() {
            child.set_callback(Some(&callback));
            if Some(index) != current {
                child.set_visible(false, false);
            }
        }
    }

    fn set_constant_state(&mut self, state: S) {
        self.state = Rc::new(RefCell::new(state));
        self.attach_children();
        if self.current >= 0 {
            let id = self.with_child(self.current, |child| child.id());
            self.relay.set_source(id);
            self.initialize_child_for_display(self.current);
        }
        self.last = -1;
        self.exit_fade_end = None;
    }
}

/// Alpha (0-255) proportional to the time left in a fade.
fn fade_alpha(remaining: Duration, duration: Duration) -> u32 {
    if duration.is_zero() {
        return 0;
    }
    let fraction = remaining.as_secs_f32() / duration.as_secs_f32();
    ((fraction * 255.0) as u32).min(255)
}

impl<S: ContainerState> Drawable for DrawableContainer<S> {
    fn base(&self) -> &DrawableBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DrawableBase {
        &mut self.base
    }

    fn draw(&mut self, canvas: &mut Canvas) {
        self.with_child(self.current, |child| child.draw(canvas));
        self.with_child(self.last, |child| child.draw(canvas));
    }

    fn mutate(&mut self) -> &mut Self {
        if !self.mutated {
            let density_dpi = self.state.borrow().container().density_dpi();
            let mut copy = self
                .state
                .borrow()
                .copy_for_owner(&Resources::with_density_dpi(density_dpi));
            copy.mutate();
            self.set_constant_state(copy);
            self.mutated = true;
        }
        self
    }

    fn clear_mutated(&mut self) {
        self.mutated = false;
        let mut state = self.state.borrow_mut();
        for (_, child) in state.container_mut().children_mut() {
            child.clear_mutated();
        }
    }

    fn constant_state(&self) -> Option<ConstantState> {
        Some(S::into_constant_state(self.state.clone()))
    }

    fn on_bounds_change(&mut self, bounds: Rect) {
        self.with_child(self.last, |child| child.set_bounds(bounds));
        self.with_child(self.current, |child| child.set_bounds(bounds));
    }

    fn on_state_change(&mut self, state: StateSet) -> bool {
        let last = self.with_child(self.last, |child| child.set_state(state));
        let current = self.with_child(self.current, |child| child.set_state(state));
        last.unwrap_or(false) | current.unwrap_or(false)
    }

    fn on_level_change(&mut self, level: i32) -> bool {
        let selection = self.state.borrow().index_for_level(level);
        if let Some(index) = selection {
            if self.select_drawable(index) {
                return true;
            }
        }
        let last = self.with_child(self.last, |child| child.set_level(level));
        let current = self.with_child(self.current, |child| child.set_level(level));
        last.unwrap_or(false) | current.unwrap_or(false)
    }

    fn set_visible(&mut self, visible: bool, restart: bool) -> bool {
        let changed = self.base.is_visible() != visible;
        if changed {
            self.base.visible = visible;
            self.invalidate_self();
        }
        self.with_child(self.last, |child| child.set_visible(visible, restart));
        self.with_child(self.current, |child| child.set_visible(visible, restart));
        changed
    }

    fn alpha(&self) -> u8 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: u8) {
        if !self.has_alpha || self.alpha != alpha {
            self.has_alpha = true;
            self.alpha = alpha;
            if self.current >= 0 {
                if self.enter_fade_end.is_none() {
                    self.with_child(self.current, |child| child.set_alpha(alpha));
                } else {
                    self.animate(Instant::now(), false);
                }
            }
        }
    }

    fn set_tint_list(&mut self, tint: Option<Rc<ColorStateList>>) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let container = state.container_mut();
            if same_list(&container.tint, &tint) {
                false
            } else {
                container.tint = tint.clone();
                true
            }
        };
        if changed {
            self.with_child(self.current, |child| child.set_tint_list(tint));
        }
    }

    fn set_tint_blend_mode(&mut self, mode: BlendMode) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let container = state.container_mut();
            let changed = container.blend_mode != Some(mode);
            container.blend_mode = Some(mode);
            changed
        };
        if changed {
            self.with_child(self.current, |child| child.set_tint_blend_mode(mode));
        }
    }

    fn set_hotspot(&mut self, x: f32, y: f32) {
        self.with_child(self.current, |child| child.set_hotspot(x, y));
    }

    fn set_hotspot_bounds(&mut self, bounds: Rect) {
        self.hotspot_bounds = Some(bounds);
        self.with_child(self.current, |child| child.set_hotspot_bounds(bounds));
    }

    fn hotspot_bounds(&self) -> Rect {
        self.hotspot_bounds.unwrap_or_else(|| self.base.bounds())
    }

    fn is_stateful(&self) -> bool {
        self.state.borrow().container().is_stateful()
    }

    fn has_focus_state_specified(&self) -> bool {
        self.with_child(self.current, |child| child.has_focus_state_specified())
            .unwrap_or(false)
    }

    fn jump_to_current_state(&mut self) {
        let mut changed = false;
        if self.last >= 0 {
            self.with_child(self.last, |child| {
                child.jump_to_current_state();
                child.set_visible(false, false);
            });
            self.last = -1;
            changed = true;
        }
        let alpha = self.has_alpha.then_some(self.alpha);
        self.with_child(self.current, |child| {
            child.jump_to_current_state();
            if let Some(alpha) = alpha {
                child.set_alpha(alpha);
            }
        });
        if self.exit_fade_end.take().is_some() {
            changed = true;
        }
        if self.enter_fade_end.take().is_some() {
            changed = true;
        }
        if changed {
            self.base.unschedule_self(&self.fade_tick);
            self.invalidate_self();
        }
    }

    fn intrinsic_width(&self) -> i32 {
        if self.state.borrow().container().is_constant_size() {
            return self.state.borrow().container().constant_size().0;
        }
        self.with_child(self.current, |child| child.intrinsic_width())
            .unwrap_or(-1)
    }

    fn intrinsic_height(&self) -> i32 {
        if self.state.borrow().container().is_constant_size() {
            return self.state.borrow().container().constant_size().1;
        }
        self.with_child(self.current, |child| child.intrinsic_height())
            .unwrap_or(-1)
    }

    fn padding(&self) -> Option<Insets> {
        let constant = self.state.borrow().container().constant_padding();
        match constant {
            Some(padding) => (!padding.is_zero()).then_some(padding),
            None => self
                .with_child(self.current, |child| child.padding())
                .flatten(),
        }
    }

    fn minimum_width(&self) -> i32 {
        if self.state.borrow().container().is_constant_size() {
            return self.state.borrow().container().constant_minimum_size().0;
        }
        self.with_child(self.current, |child| child.minimum_width())
            .unwrap_or(0)
    }

    fn minimum_height(&self) -> i32 {
        if self.state.borrow().container().is_constant_size() {
            return self.state.borrow().container().constant_minimum_size().1;
        }
        self.with_child(self.current, |child| child.minimum_height())
            .unwrap_or(0)
    }

    fn advance_animations(&mut self, now: Instant) -> bool {
        let fading = if self.enter_fade_end.is_some() || self.exit_fade_end.is_some() {
            self.animate(now, true)
        } else {
            false
        };
        let current = self.with_child(self.current, |child| child.advance_animations(now));
        let last = self.with_child(self.last, |child| child.advance_animations(now));
        fading | current.unwrap_or(false) | last.unwrap_or(false)
    }
}
