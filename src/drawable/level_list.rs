use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::resources::Resources;

use super::{
    AnyDrawable, ConstantState, ContainerState, Drawable, DrawableContainer,
    DrawableContainerState,
};

/// Level range storage. Shared between copies of a state until one of
/// them mutates.
type Ranges = Rc<[Cell<i32>]>;

fn zeroed(len: usize) -> Ranges {
    (0..len).map(|_| Cell::new(0)).collect()
}

fn resized(ranges: &Ranges, old_size: usize, new_size: usize) -> Ranges {
    ranges
        .iter()
        .take(old_size)
        .map(|value| Cell::new(value.get()))
        .chain(std::iter::repeat_with(|| Cell::new(0)))
        .take(new_size)
        .collect()
}

/// Children of a [`LevelListDrawable`] and the inclusive level range each
/// one covers.
///
/// `lows[i]` and `highs[i]` always belong to child `i`; the three arrays
/// have the same length and grow together.
pub struct LevelListState {
    container: DrawableContainerState,
    lows: Ranges,
    highs: Ranges,
}

impl LevelListState {
    pub fn new(resources: &Resources) -> Self {
        let container = DrawableContainerState::new(resources);
        let capacity = container.capacity();
        Self {
            container,
            lows: zeroed(capacity),
            highs: zeroed(capacity),
        }
    }

    pub(crate) fn add_level(&mut self, low: i32, high: i32, drawable: AnyDrawable) -> usize {
        let pos = self.add_child(drawable);
        self.lows[pos].set(low);
        self.highs[pos].set(high);
        pos
    }

    /// First child, in insertion order, whose range contains `level`, or -1.
    pub fn index_of_level(&self, level: i32) -> i32 {
        let count = self.container.child_count();
        self.lows
            .iter()
            .zip(self.highs.iter())
            .take(count)
            .position(|(low, high)| level >= low.get() && level <= high.get())
            .map_or(-1, |index| index as i32)
    }

    /// Stored `(low, high)` at `index`, for any allocated slot.
    pub fn range(&self, index: usize) -> Option<(i32, i32)> {
        Some((self.lows.get(index)?.get(), self.highs.get(index)?.get()))
    }

    /// True when both states still read the same range arrays.
    pub fn shares_ranges_with(&self, other: &LevelListState) -> bool {
        Rc::ptr_eq(&self.lows, &other.lows) && Rc::ptr_eq(&self.highs, &other.highs)
    }
}

impl Default for LevelListState {
    fn default() -> Self {
        Self::new(&Resources::default())
    }
}

impl ContainerState for LevelListState {
    fn container(&self) -> &DrawableContainerState {
        &self.container
    }

    fn container_mut(&mut self) -> &mut DrawableContainerState {
        &mut self.container
    }

    fn copy_for_owner(&self, resources: &Resources) -> Self {
        Self {
            container: self.container.copy_for_owner(resources),
            lows: self.lows.clone(),
            highs: self.highs.clone(),
        }
    }

    fn into_constant_state(state: Rc<RefCell<Self>>) -> ConstantState {
        ConstantState::LevelList(state)
    }

    fn mutate(&mut self) {
        self.container.mutate_children();
        let len = self.lows.len();
        self.lows = resized(&self.lows, len, len);
        self.highs = resized(&self.highs, len, len);
    }

    fn grow_array(&mut self, old_size: usize, new_size: usize) {
        self.container.grow_array(old_size, new_size);
        self.lows = resized(&self.lows, old_size, new_size);
        self.highs = resized(&self.highs, old_size, new_size);
    }

    fn index_for_level(&self, level: i32) -> Option<i32> {
        Some(self.index_of_level(level))
    }
}

/// Container choosing its displayed child from the current level.
///
/// # Example
/// ```
/// use drawables::{ColorDrawable, Drawable, LevelListDrawable};
///
/// let mut battery = LevelListDrawable::new();
/// battery.add_level(0, 20, Some(ColorDrawable::new(0xFFFF0000).into()));
/// battery.add_level(21, 100, Some(ColorDrawable::new(0xFF00FF00).into()));
///
/// battery.set_level(15);
/// assert_eq!(battery.current_index(), 0);
/// battery.set_level(80);
/// assert_eq!(battery.current_index(), 1);
/// ```
pub type LevelListDrawable = DrawableContainer<LevelListState>;

impl DrawableContainer<LevelListState> {
    /// Show `drawable` for levels in `low..=high`. `None` is ignored.
    pub fn add_level(&mut self, low: i32, high: i32, drawable: Option<AnyDrawable>) {
        let Some(mut drawable) = drawable else {
            return;
        };
        self.prepare_child(&mut drawable);
        self.state_handle()
            .borrow_mut()
            .add_level(low, high, drawable);
        let level = self.level();
        self.on_level_change(level);
    }

    pub fn index_of_level(&self, level: i32) -> i32 {
        self.state_handle().borrow().index_of_level(level)
    }

    /// Stored `(low, high)` range of child `index`.
    pub fn level_range(&self, index: usize) -> Option<(i32, i32)> {
        if index >= self.child_count() {
            return None;
        }
        self.state_handle().borrow().range(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::testing::RecordingCallback;
    use crate::drawable::{ColorDrawable, MAX_LEVEL};

    fn color(argb: u32) -> Option<AnyDrawable> {
        Some(ColorDrawable::new(argb).into())
    }

    fn current_color(list: &LevelListDrawable) -> Option<u32> {
        list.with_child(list.current_index(), |child| match child {
            AnyDrawable::Color(color) => color.color(),
            _ => 0,
        })
    }

    #[test]
    fn test_first_matching_range_wins() {
        let mut list = LevelListDrawable::new();
        list.add_level(0, 10, color(0xFFAA0000));
        list.add_level(5, 15, color(0xFF00BB00));

        list.set_level(7);
        assert_eq!(list.current_index(), 0);
        assert_eq!(current_color(&list), Some(0xFFAA0000));

        assert!(list.set_level(12));
        assert_eq!(list.current_index(), 1);
        assert_eq!(current_color(&list), Some(0xFF00BB00));

        assert!(list.set_level(20));
        assert_eq!(list.current_index(), -1);
        assert_eq!(current_color(&list), None);
    }

    #[test]
    fn test_full_level_range() {
        let mut list = LevelListDrawable::new();
        list.add_level(0, MAX_LEVEL / 2, color(0xFF000001));
        list.add_level(MAX_LEVEL / 2 + 1, MAX_LEVEL, color(0xFF000002));

        list.set_level(MAX_LEVEL);
        assert_eq!(current_color(&list), Some(0xFF000002));
        list.set_level(MAX_LEVEL + 1);
        assert_eq!(list.current_index(), -1);
    }

    #[test]
    fn test_none_is_ignored() {
        let mut list = LevelListDrawable::new();
        list.add_level(0, 10, None);
        assert_eq!(list.child_count(), 0);
        assert_eq!(list.current_index(), -1);
    }

    #[test]
    fn test_add_level_selects_for_current_level() {
        let mut list = LevelListDrawable::new();
        list.set_level(50);
        list.add_level(0, 10, color(0xFF000001));
        assert_eq!(list.current_index(), -1);
        list.add_level(40, 60, color(0xFF000002));
        assert_eq!(list.current_index(), 1);
    }

    #[test]
    fn test_ranges_stay_aligned_after_growth() {
        let mut list = LevelListDrawable::new();
        for i in 0..25 {
            list.add_level(i * 10, i * 10 + 9, color(0xFF000000 | i as u32));
        }
        assert_eq!(list.child_count(), 25);
        assert_eq!(list.state_handle().borrow().container().capacity(), 30);

        for i in 0..25 {
            assert_eq!(list.level_range(i as usize), Some((i * 10, i * 10 + 9)));
            assert_eq!(list.index_of_level(i * 10 + 5), i);
        }

        list.set_level(245);
        assert_eq!(current_color(&list), Some(0xFF000018));
        assert_eq!(list.level_range(25), None);
    }

    #[test]
    fn test_ranges_shared_until_mutate() {
        let mut first = LevelListDrawable::new();
        first.add_level(0, 10, color(0xFF000001));
        let AnyDrawable::LevelList(mut second) =
            first.constant_state().expect("state").new_drawable()
        else {
            panic!("expected a level list");
        };
        assert!(first
            .state_handle()
            .borrow()
            .shares_ranges_with(&second.state_handle().borrow()));

        first.add_level(20, 30, color(0xFF000002));
        assert_eq!(second.state_handle().borrow().range(1), Some((20, 30)));

        second.mutate();
        first.add_level(40, 50, color(0xFF000003));
        assert_eq!(second.state_handle().borrow().range(2), Some((0, 0)));
        assert_eq!(second.state_handle().borrow().range(0), Some((0, 10)));
    }

    #[test]
    fn test_copy_has_own_children() {
        let mut first = LevelListDrawable::new();
        first.add_level(0, 10, color(0xFF000001));
        let AnyDrawable::LevelList(second) =
            first.constant_state().expect("state").new_drawable()
        else {
            panic!("expected a level list");
        };
        assert_eq!(second.child_count(), 1);
        assert_eq!(second.current_index(), 0);

        let first_child = first.with_child(0, |child| child.id());
        let second_child = second.with_child(0, |child| child.id());
        assert_ne!(first_child, second_child);
    }

    #[test]
    fn test_mutate_is_idempotent() {
        let mut list = LevelListDrawable::new();
        list.add_level(0, 10, color(0xFF000001));
        list.mutate();
        let state = list.state_handle().clone();
        list.mutate();
        assert!(Rc::ptr_eq(&state, list.state_handle()));
        assert_eq!(list.current_index(), 0);
    }

    #[test]
    fn test_level_change_inside_range_keeps_selection() {
        let mut list = LevelListDrawable::new();
        list.add_level(0, 10, color(0xFF000001));
        let recorder = RecordingCallback::install(&mut list);
        assert!(!list.set_level(3));
        assert_eq!(recorder.invalidation_count(), 0);
        assert_eq!(list.with_child(0, |child| child.level()), Some(3));
    }
}
