use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use drawables::drawable::{RippleEffect, RoundRectShape, ShapeDrawable};
use drawables::prelude::*;

#[derive(Default)]
struct Recorder {
    invalidated: RefCell<Vec<DrawableId>>,
}

impl Callback for Recorder {
    fn invalidate_drawable(&self, who: DrawableId) {
        self.invalidated.borrow_mut().push(who);
    }

    fn schedule_drawable(&self, _who: DrawableId, _what: &Runnable, _when: Instant) {}

    fn unschedule_drawable(&self, _who: DrawableId, _what: &Runnable) {}
}

fn install(drawable: &mut impl Drawable) -> Rc<Recorder> {
    let recorder = Rc::new(Recorder::default());
    let callback: Rc<dyn Callback> = recorder.clone();
    drawable.set_callback(Some(&callback));
    recorder
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn color_of(drawable: &AnyDrawable) -> Option<ColorInt> {
    match drawable {
        AnyDrawable::Color(color) => Some(color.color()),
        _ => None,
    }
}

#[test]
fn test_siblings_share_until_mutate() {
    init_logger();
    let mut first = ColorDrawable::new(0xFF112233);
    let state = first.constant_state().expect("state");
    let second = state.new_drawable();

    first.set_color(0xFF445566);
    assert_eq!(color_of(&second), Some(0xFF445566));

    first.mutate();
    first.set_color(0xFF778899);
    assert_eq!(color_of(&second), Some(0xFF445566));
    assert!(!first.constant_state().expect("state").ptr_eq(&state));
}

#[test]
fn test_second_mutate_keeps_state() {
    let mut shape = ShapeDrawable::new(RoundRectShape::uniform(4.0), 0xFF000000);
    shape.mutate();
    let state = shape.constant_state().expect("state");
    shape.mutate();
    assert!(shape.constant_state().expect("state").ptr_eq(&state));

    shape.clear_mutated();
    shape.mutate();
    assert!(!shape.constant_state().expect("state").ptr_eq(&state));
}

#[test]
fn test_alpha_override_replaces_alpha_channel() {
    let mut drawable =
        ColorStateListDrawable::with_color_state_list(Rc::new(ColorStateList::value_of(0x11223344)));
    assert_eq!(drawable.current().color(), 0x11223344);

    drawable.set_alpha(0x99);
    assert_eq!(drawable.current().color(), 0x99223344);

    drawable.clear_alpha();
    assert_eq!(drawable.current().color(), 0x11223344);
}

#[test]
fn test_state_changes_pick_colors() {
    let colors = ColorStateList::new(vec![
        (StateSpec::with(StateSet::PRESSED), 0xFF0000FF),
        (StateSpec::ANY, 0xFF00FF00),
    ]);
    let mut drawable = ColorStateListDrawable::with_color_state_list(Rc::new(colors));
    drawable.set_bounds(Rect::new(0, 0, 10, 10));
    let recorder = install(&mut drawable);

    assert!(drawable.set_state(StateSet::ENABLED | StateSet::PRESSED));
    assert_eq!(drawable.current().color(), 0xFF0000FF);
    assert!(!drawable.set_state(StateSet::ENABLED | StateSet::PRESSED));
    assert!(drawable.set_state(StateSet::ENABLED));
    assert_eq!(drawable.current().color(), 0xFF00FF00);

    let invalidated = recorder.invalidated.borrow();
    assert!(!invalidated.is_empty());
    assert!(invalidated.iter().all(|id| *id == drawable.id()));
}

#[test]
fn test_level_list_selection() {
    let mut list = LevelListDrawable::new();
    list.add_level(0, 10, Some(ColorDrawable::new(0xFFAA0000).into()));
    list.add_level(5, 15, Some(ColorDrawable::new(0xFF00BB00).into()));
    list.set_bounds(Rect::new(0, 0, 16, 16));

    for (level, index, color) in [(7, 0, Some(0xFFAA0000)), (12, 1, Some(0xFF00BB00)), (20, -1, None)] {
        list.set_level(level);
        assert_eq!(list.current_index(), index);
        assert_eq!(list.with_child(index, |child| color_of(child)).flatten(), color);
    }

    let mut canvas = Canvas::new();
    list.draw(&mut canvas);
    assert!(canvas.commands().is_empty());
}

#[test]
fn test_reselecting_invalidates_once() {
    let mut list = LevelListDrawable::new();
    list.set_level(100);
    list.add_level(0, 10, Some(ColorDrawable::new(0xFFAA0000).into()));
    list.add_level(11, 20, Some(ColorDrawable::new(0xFF00BB00).into()));
    let recorder = install(&mut list);
    assert_eq!(list.current_index(), -1);

    assert!(list.select_drawable(1));
    assert!(!list.select_drawable(1));
    assert_eq!(recorder.invalidated.borrow().len(), 1);
}

#[test]
fn test_level_list_copy_survives_original_mutation() {
    let mut first = LevelListDrawable::new();
    first.add_level(0, 10, Some(ColorDrawable::new(0xFFAA0000).into()));
    let AnyDrawable::LevelList(mut second) = first.constant_state().expect("state").new_drawable()
    else {
        panic!("expected a level list");
    };
    second.mutate();
    first.mutate();
    first.add_level(11, 20, Some(ColorDrawable::new(0xFF00BB00).into()));

    assert_eq!(second.child_count(), 1);
    assert_eq!(second.index_of_level(15), -1);
    assert_eq!(first.index_of_level(15), 1);
}

#[test]
fn test_ripple_geometry_from_hotspot_bounds() {
    let mut ripple = RippleDrawable::new(Rc::new(ColorStateList::value_of(0x40000000)), None);
    ripple.set_bounds(Rect::new(0, 0, 6, 8));
    ripple.set_state(StateSet::ENABLED | StateSet::PRESSED);

    let foreground = ripple.active_ripple().expect("ripple");
    assert_eq!(foreground.component().target_radius(), 5.0);
    assert_eq!(foreground.bounds(), Rect::new(-5, -5, 5, 5));
}

#[test]
fn test_ripple_fades_after_release() {
    let mut ripple = RippleDrawable::new(Rc::new(ColorStateList::value_of(0x40000000)), None);
    ripple.set_config(RippleConfig::new().expand_speed(2.0).fade_speed(2.0));
    ripple.set_bounds(Rect::new(0, 0, 40, 40));

    ripple.set_state(StateSet::ENABLED | StateSet::PRESSED);
    ripple.set_state(StateSet::ENABLED);
    assert_eq!(ripple.exiting_ripple_count(), 1);

    let later = Instant::now() + Duration::from_secs(1);
    assert!(!ripple.advance_animations(later));

    let mut canvas = Canvas::new();
    ripple.draw(&mut canvas);
    assert!(canvas.commands().is_empty());
    assert_eq!(ripple.exiting_ripple_count(), 0);
}

#[test]
fn test_rounded_shape_clamps_radii() {
    let mut shape = ShapeDrawable::new(RoundRectShape::uniform(50.0), 0xFF336699);
    shape.set_bounds(Rect::new(0, 0, 40, 20));

    let mut canvas = Canvas::new();
    shape.draw(&mut canvas);
    match &canvas.commands()[0] {
        DrawCommand::RoundRect { radii, .. } => assert_eq!(*radii, [10.0; 4]),
        other => panic!("unexpected command {other:?}"),
    }
}
