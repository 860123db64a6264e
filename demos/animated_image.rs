//! Animated Image Example
//!
//! Encodes a small GIF in memory and plays it once on a calloop event loop.
//! The decode thread pings the loop whenever a frame is ready.
//! Run with: RUST_LOG=debug cargo run --example animated_image

use std::sync::Arc;
use std::time::Duration;

use calloop::ping::make_ping;
use calloop::timer::{TimeoutAction, Timer};
use calloop::EventLoop;
use drawables::prelude::*;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Rgba, RgbaImage};

fn encode_gif() -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut bytes);
        encoder.set_repeat(Repeat::Infinite)?;
        for shade in [40u8, 120, 200, 255] {
            let buffer = RgbaImage::from_pixel(32, 32, Rgba([shade, 64, 255 - shade, 255]));
            encoder.encode_frame(image::Frame::from_parts(
                buffer,
                0,
                0,
                Delay::from_numer_denom_ms(120, 1),
            ))?;
        }
    }
    Ok(bytes)
}

struct Host {
    drawable: AnimatedImageDrawable,
    frames_seen: Vec<usize>,
}

impl Host {
    fn frame(&mut self) {
        let mut canvas = Canvas::new();
        self.drawable.draw(&mut canvas);
        if let Some(index) = self.drawable.current_frame_index() {
            if self.frames_seen.last() != Some(&index) {
                log::info!("showing frame {index}");
                self.frames_seen.push(index);
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let mut event_loop: EventLoop<Host> = EventLoop::try_new()?;
    let (ping, ping_source) = make_ping()?;
    event_loop
        .handle()
        .insert_source(ping_source, |_, _, host| host.frame())
        .map_err(|err| err.error)?;
    event_loop
        .handle()
        .insert_source(Timer::immediate(), |_, _, host| {
            host.frame();
            TimeoutAction::ToDuration(Duration::from_millis(16))
        })
        .map_err(|err| err.error)?;

    let executor = Arc::new(DecodeExecutor::with_waker(
        ExecutorConfig::new().thread_name("demo-decode"),
        ping,
    )?);

    let mut drawable = AnimatedImageDrawable::new(encode_gif()?, executor);
    drawable.set_repeat_count(0);
    drawable.set_bounds(Rect::new(0, 0, 32, 32));
    drawable.start();

    let mut host = Host {
        drawable,
        frames_seen: Vec::new(),
    };
    while host.drawable.is_running() {
        event_loop.dispatch(Some(Duration::from_millis(16)), &mut host)?;
    }
    log::info!("animation finished after frames {:?}", host.frames_seen);
    Ok(())
}
