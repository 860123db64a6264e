use std::cell::RefCell;
use std::rc::Rc;

use crate::resources::Resources;

use super::{
    AnimatedImageDrawable, AnimatedImageState, AnyDrawable, ColorDrawable, ColorState,
    ColorStateListDrawable, ColorStateListDrawableState, ContainerState, LevelListDrawable,
    LevelListState, RippleDrawable, RippleState, ShapeDrawable, ShapeState,
};

/// Shared configuration of a drawable, able to create further drawables.
///
/// Cloning a `ConstantState` clones the handle, not the configuration.
/// Drawables created from a leaf state (color, shape, ripple, animated
/// image) reference that same configuration until they are mutated.
/// Container states are copied for the new owner instead: the children are
/// re-instantiated from their own constant states while the level ranges
/// stay shared.
#[derive(Clone)]
pub enum ConstantState {
    Color(Rc<RefCell<ColorState>>),
    ColorStateList(Rc<RefCell<ColorStateListDrawableState>>),
    LevelList(Rc<RefCell<LevelListState>>),
    Shape(Rc<RefCell<ShapeState>>),
    Ripple(Rc<RefCell<RippleState>>),
    AnimatedImage(Rc<RefCell<AnimatedImageState>>),
}

impl ConstantState {
    /// Create a drawable for the baseline display density.
    pub fn new_drawable(&self) -> AnyDrawable {
        self.new_drawable_with_resources(&Resources::default())
    }

    /// Create a drawable for the display described by `resources`.
    pub fn new_drawable_with_resources(&self, resources: &Resources) -> AnyDrawable {
        match self {
            ConstantState::Color(state) => ColorDrawable::from_state(state.clone()).into(),
            ConstantState::ColorStateList(state) => {
                ColorStateListDrawable::from_state(state.clone()).into()
            }
            ConstantState::LevelList(state) => {
                let copy = state.borrow().copy_for_owner(resources);
                LevelListDrawable::from_state(Rc::new(RefCell::new(copy))).into()
            }
            ConstantState::Shape(state) => ShapeDrawable::from_state(state.clone()).into(),
            ConstantState::Ripple(state) => {
                RippleDrawable::from_state(state.clone(), resources).into()
            }
            ConstantState::AnimatedImage(state) => {
                AnimatedImageDrawable::from_state(state.clone()).into()
            }
        }
    }

    /// True when both handles point at the same configuration.
    pub fn ptr_eq(&self, other: &ConstantState) -> bool {
        match (self, other) {
            (ConstantState::Color(a), ConstantState::Color(b)) => Rc::ptr_eq(a, b),
            (ConstantState::ColorStateList(a), ConstantState::ColorStateList(b)) => {
                Rc::ptr_eq(a, b)
            }
            (ConstantState::LevelList(a), ConstantState::LevelList(b)) => Rc::ptr_eq(a, b),
            (ConstantState::Shape(a), ConstantState::Shape(b)) => Rc::ptr_eq(a, b),
            (ConstantState::Ripple(a), ConstantState::Ripple(b)) => Rc::ptr_eq(a, b),
            (ConstantState::AnimatedImage(a), ConstantState::AnimatedImage(b)) => {
                Rc::ptr_eq(a, b)
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for ConstantState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            ConstantState::Color(_) => "Color",
            ConstantState::ColorStateList(_) => "ColorStateList",
            ConstantState::LevelList(_) => "LevelList",
            ConstantState::Shape(_) => "Shape",
            ConstantState::Ripple(_) => "Ripple",
            ConstantState::AnimatedImage(_) => "AnimatedImage",
        };
        f.debug_tuple("ConstantState").field(&kind).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::Drawable;

    #[test]
    fn test_leaf_drawables_share_state() {
        let first = ColorDrawable::new(0xFF000000);
        let state = first.constant_state().expect("state");
        let second = state.new_drawable();
        let second_state = second.constant_state().expect("state");
        assert!(state.ptr_eq(&second_state));
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_mutate_detaches_from_shared_state() {
        let mut first = ColorDrawable::new(0xFF000000);
        let before = first.constant_state().expect("state");
        first.mutate();
        let after = first.constant_state().expect("state");
        assert!(!before.ptr_eq(&after));
    }

    #[test]
    fn test_different_kinds_never_compare_equal() {
        let color = ColorDrawable::new(0).constant_state().expect("state");
        let list = ColorStateListDrawable::new().constant_state().expect("state");
        assert!(!color.ptr_eq(&list));
        assert_eq!(format!("{color:?}"), "ConstantState(\"Color\")");
    }
}
