use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use calloop::ping::make_ping;
use drawables::prelude::*;
use drawables::ExecutorError;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Rgba, RgbaImage};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn gif(frames: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut bytes);
        encoder.set_repeat(Repeat::Infinite).expect("repeat");
        for i in 0..frames {
            let shade = (i * 60) as u8;
            let buffer = RgbaImage::from_pixel(6, 4, Rgba([shade, shade, shade, 255]));
            let frame = image::Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(40, 1));
            encoder.encode_frame(frame).expect("encode");
        }
    }
    bytes
}

fn pump(drawable: &mut AnimatedImageDrawable, done: impl Fn(&AnimatedImageDrawable) -> bool) {
    let mut now = Instant::now();
    for _ in 0..5000 {
        now += Duration::from_secs(1);
        drawable.advance_animations(now);
        if done(drawable) {
            return;
        }
        thread::sleep(Duration::from_millis(1));
    }
    panic!("condition not reached");
}

#[test]
fn test_plays_through_every_frame() {
    init_logger();
    let executor = Arc::new(DecodeExecutor::new().expect("spawn"));
    let mut drawable = AnimatedImageDrawable::new(gif(3), executor);
    drawable.set_repeat_count(0);
    drawable.set_bounds(Rect::new(0, 0, 6, 4));
    assert_eq!(
        (drawable.intrinsic_width(), drawable.intrinsic_height()),
        (6, 4)
    );

    drawable.start();
    pump(&mut drawable, |d| !d.is_running());
    assert_eq!(drawable.current_frame_index(), Some(2));

    let mut canvas = Canvas::new();
    drawable.draw(&mut canvas);
    assert!(matches!(canvas.commands()[0], DrawCommand::Image { .. }));
}

#[test]
fn test_worker_pings_event_loop() {
    init_logger();
    let (ping, source) = make_ping().expect("ping");
    let mut event_loop: calloop::EventLoop<bool> = calloop::EventLoop::try_new().expect("loop");
    event_loop
        .handle()
        .insert_source(source, |_, _, woken| *woken = true)
        .expect("insert");

    let executor = DecodeExecutor::with_waker(ExecutorConfig::default(), ping).expect("spawn");
    executor.submit(|| {}).expect("submit");

    let mut woken = false;
    event_loop
        .dispatch(Some(Duration::from_secs(5)), &mut woken)
        .expect("dispatch");
    assert!(woken);
}

#[test]
fn test_shut_down_executor_rejects_new_work() {
    let executor = DecodeExecutor::with_config(ExecutorConfig::new().stack_size(256 * 1024))
        .expect("spawn");
    executor.shutdown();
    assert!(matches!(executor.submit(|| {}), Err(ExecutorError::ShutDown)));
}
