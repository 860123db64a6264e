//! Level List Example
//!
//! A battery indicator built from a level list of rounded shapes, with a
//! ripple on top reacting to presses. Draw commands are logged per step.
//! Run with: RUST_LOG=debug cargo run --example level_list

use std::rc::Rc;
use std::time::{Duration, Instant};

use drawables::drawable::{RoundRectShape, ShapeDrawable, MAX_LEVEL};
use drawables::prelude::*;

/// Host side of the callback protocol: just logs what drawables ask for.
struct LoggingHost;

impl Callback for LoggingHost {
    fn invalidate_drawable(&self, who: DrawableId) {
        log::debug!("invalidate {who:?}");
    }

    fn schedule_drawable(&self, who: DrawableId, _what: &Runnable, when: Instant) {
        log::debug!("schedule {who:?} in {:?}", when.saturating_duration_since(Instant::now()));
    }

    fn unschedule_drawable(&self, who: DrawableId, _what: &Runnable) {
        log::debug!("unschedule {who:?}");
    }
}

fn cell(color: ColorInt) -> Option<AnyDrawable> {
    Some(ShapeDrawable::new(RoundRectShape::uniform(6.0), color).into())
}

/// Level for a charge percentage.
fn level(percent: i32) -> i32 {
    percent * MAX_LEVEL / 100
}

fn paint(label: &str, drawable: &mut impl Drawable) {
    let mut canvas = Canvas::new();
    drawable.draw(&mut canvas);
    log::info!("{label}:");
    for command in canvas.commands() {
        log::info!("  {command:?}");
    }
}

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let host: Rc<dyn Callback> = Rc::new(LoggingHost);

    let mut battery = LevelListDrawable::new();
    battery.add_level(0, level(15), cell(0xFFD32F2F));
    battery.add_level(level(15) + 1, level(50), cell(0xFFFBC02D));
    battery.add_level(level(50) + 1, MAX_LEVEL, cell(0xFF388E3C));
    battery.set_exit_fade_duration(Duration::from_millis(150));
    battery.set_bounds(Rect::new(0, 0, 48, 24));
    battery.set_callback(Some(&host));

    for percent in [90, 40, 10] {
        battery.set_level(level(percent));
        paint(&format!("{percent}% -> child {}", battery.current_index()), &mut battery);
    }

    // A second indicator sharing the configuration, then customised
    let Some(state) = battery.constant_state() else {
        return;
    };
    let mut copy = state.new_drawable();
    copy.mutate();
    copy.set_bounds(Rect::new(0, 0, 96, 48));
    copy.set_level(level(75));
    paint("mutated copy at 75%", &mut copy);

    let colors = Rc::new(ColorStateList::value_of(0x33000000));
    let mut ripple = RippleDrawable::new(colors, Some(battery.into()));
    ripple.set_callback(Some(&host));
    ripple.set_bounds(Rect::new(0, 0, 48, 24));
    ripple.set_hotspot(12.0, 12.0);
    ripple.set_state(StateSet::ENABLED | StateSet::PRESSED);

    let start = Instant::now();
    for step in 0..4 {
        ripple.advance_animations(start + Duration::from_millis(step * 100));
        paint(&format!("ripple after {}ms", step * 100), &mut ripple);
    }
    ripple.set_state(StateSet::ENABLED);
    ripple.jump_to_current_state();
    paint("released", &mut ripple);
}
