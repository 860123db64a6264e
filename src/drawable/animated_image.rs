//! Frame-by-frame animation of encoded images.
//!
//! Frames are decoded on a shared [`DecodeExecutor`]. Results travel back
//! over a per-drawable channel that the render thread drains without
//! blocking at the start of [`Drawable::draw`] and
//! [`Drawable::advance_animations`]. A decoded frame replaces the visible
//! one only while the animation runs and once the visible frame's delay has
//! elapsed.
//!
//! Stopping never interrupts the decode thread: the in-flight job finishes
//! and its result is dropped on arrival because its generation is stale.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::canvas::Canvas;
use crate::decode::{self, DecodeError, Frame, FrameSource, ImageFrameSource};
use crate::executor::DecodeExecutor;

use super::{ConstantState, Drawable, DrawableBase, DrawableId, Runnable};

/// Repeat count that loops forever.
pub const REPEAT_INFINITE: i32 = -1;

/// Notified when an [`AnimatedImageDrawable`] starts or finishes animating.
pub trait AnimationCallback {
    fn on_animation_start(&self, _drawable: DrawableId) {}

    fn on_animation_end(&self, _drawable: DrawableId) {}
}

/// Shared configuration of an [`AnimatedImageDrawable`].
#[derive(Debug, Clone)]
pub struct AnimatedImageState {
    pub bytes: Arc<[u8]>,
    /// Extra plays after the first, or [`REPEAT_INFINITE`]
    pub repeat_count: i32,
    pub intrinsic_width: i32,
    pub intrinsic_height: i32,
    pub executor: Arc<DecodeExecutor>,
}

impl AnimatedImageState {
    pub fn new(bytes: Arc<[u8]>, executor: Arc<DecodeExecutor>) -> Self {
        let (width, height) = decode::intrinsic_size(&bytes)
            .map_or((-1, -1), |(w, h)| (w as i32, h as i32));
        Self {
            bytes,
            repeat_count: REPEAT_INFINITE,
            intrinsic_width: width,
            intrinsic_height: height,
            executor,
        }
    }
}

struct Decoded {
    generation: u64,
    index: usize,
    result: Result<Option<Frame>, DecodeError>,
}

/// Plays the frames of an animated image (GIF), or shows a still image.
pub struct AnimatedImageDrawable {
    base: DrawableBase,
    state: Rc<RefCell<AnimatedImageState>>,
    source: Arc<Mutex<Box<dyn FrameSource>>>,
    sender: Sender<Decoded>,
    receiver: Receiver<Decoded>,
    generation: u64,
    /// Index of the frame a job is decoding for the current generation
    pending: Option<usize>,
    current: Option<(usize, Frame)>,
    next: Option<(usize, Frame)>,
    /// When the current frame has been shown for its full delay
    next_frame_at: Option<Instant>,
    running: bool,
    /// Set once decoding failed; no more frames are requested
    failed: bool,
    /// Plays are used up; stop once the visible frame's delay has run
    ending: bool,
    plays: i32,
    alpha: u8,
    callbacks: Vec<Rc<dyn AnimationCallback>>,
    tick: Runnable,
    mutated: bool,
}

impl AnimatedImageDrawable {
    pub fn new(bytes: impl Into<Arc<[u8]>>, executor: Arc<DecodeExecutor>) -> Self {
        let state = AnimatedImageState::new(bytes.into(), executor);
        Self::from_state(Rc::new(RefCell::new(state)))
    }

    pub(crate) fn from_state(state: Rc<RefCell<AnimatedImageState>>) -> Self {
        let source: Box<dyn FrameSource> =
            Box::new(ImageFrameSource::new(state.borrow().bytes.clone()));
        Self::with_source(state, source)
    }

    /// Play frames from a custom source instead of the state's bytes.
    pub fn with_source(
        state: Rc<RefCell<AnimatedImageState>>,
        source: Box<dyn FrameSource>,
    ) -> Self {
        let base = DrawableBase::new();
        let handle = base.invalidate_handle();
        let (sender, receiver) = mpsc::channel();
        Self {
            base,
            state,
            source: Arc::new(Mutex::new(source)),
            sender,
            receiver,
            generation: 0,
            pending: None,
            current: None,
            next: None,
            next_frame_at: None,
            running: false,
            failed: false,
            ending: false,
            plays: 0,
            alpha: 0xFF,
            callbacks: Vec::new(),
            tick: Rc::new(move || handle.invalidate()),
            mutated: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin advancing frames. No-op when already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.plays = 0;
        log::debug!("animated image {:?} started", self.base.id());
        self.dispatch(|callback, id| callback.on_animation_start(id));

        if let Some((index, frame)) = &self.current {
            let (index, delay) = (*index, frame.delay);
            self.next_frame_at = Some(Instant::now() + delay);
            self.schedule_tick();
            self.request_frame(index + 1);
        } else {
            self.request_frame(0);
        }
        self.invalidate_self();
    }

    /// Freeze on the visible frame. The decode in flight is discarded.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.halt();
        log::debug!("animated image {:?} stopped", self.base.id());
        self.dispatch(|callback, id| callback.on_animation_end(id));
    }

    pub fn repeat_count(&self) -> i32 {
        self.state.borrow().repeat_count
    }

    /// Extra plays after the first, or [`REPEAT_INFINITE`].
    pub fn set_repeat_count(&mut self, count: i32) {
        self.state.borrow_mut().repeat_count = count.max(REPEAT_INFINITE);
    }

    pub fn register_animation_callback(&mut self, callback: Rc<dyn AnimationCallback>) {
        self.callbacks.push(callback);
    }

    /// Returns false when `callback` was not registered.
    pub fn unregister_animation_callback(&mut self, callback: &Rc<dyn AnimationCallback>) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|c| !Rc::ptr_eq(c, callback));
        self.callbacks.len() != before
    }

    pub fn clear_animation_callbacks(&mut self) {
        self.callbacks.clear();
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.current.as_ref().map(|(_, frame)| frame)
    }

    pub fn current_frame_index(&self) -> Option<usize> {
        self.current.as_ref().map(|(index, _)| *index)
    }

    fn halt(&mut self) {
        self.running = false;
        self.ending = false;
        self.generation += 1;
        self.pending = None;
        self.next = None;
        self.next_frame_at = None;
        self.base.unschedule_self(&self.tick);
    }

    fn dispatch(&self, notify: impl Fn(&dyn AnimationCallback, DrawableId)) {
        let id = self.base.id();
        for callback in self.callbacks.clone() {
            notify(callback.as_ref(), id);
        }
    }

    fn request_frame(&mut self, index: usize) {
        if self.pending.is_some() {
            return;
        }
        if self.failed {
            self.stop();
            return;
        }
        let source = self.source.clone();
        let sender = self.sender.clone();
        let generation = self.generation;
        let executor = self.state.borrow().executor.clone();
        let submitted = executor.submit(move || {
            let result = source
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .frame_at(index);
            // The drawable may be gone; nothing to report to
            let _ = sender.send(Decoded {
                generation,
                index,
                result,
            });
        });
        match submitted {
            Ok(()) => self.pending = Some(index),
            Err(err) => {
                log::warn!("animated image {:?}: {err}", self.base.id());
                self.stop();
            }
        }
    }

    fn schedule_tick(&self) {
        if let Some(when) = self.next_frame_at {
            self.base.schedule_self(&self.tick, when);
        }
    }

    /// Apply finished decodes, then swap frames when due.
    fn update(&mut self, now: Instant) {
        while let Ok(decoded) = self.receiver.try_recv() {
            if decoded.generation != self.generation {
                log::trace!("animated image {:?}: dropped stale frame", self.base.id());
                continue;
            }
            self.pending = None;
            self.on_decoded(decoded.index, decoded.result, now);
        }

        if self.current.is_none() && self.pending.is_none() && !self.running && !self.failed {
            self.request_frame(0);
        }

        if !self.running {
            return;
        }
        let due = self.next_frame_at.map_or(true, |at| now >= at);
        if due {
            if let Some((index, frame)) = self.next.take() {
                self.show(index, frame, now);
            } else if self.ending {
                self.stop();
            }
        }
    }

    fn on_decoded(&mut self, index: usize, result: Result<Option<Frame>, DecodeError>, now: Instant) {
        match result {
            Ok(Some(frame)) if self.current.is_none() => self.show(index, frame, now),
            Ok(Some(frame)) => self.next = Some((index, frame)),
            Ok(None) if index == 0 => self.fail(DecodeError::NoFrames),
            Ok(None) => self.on_end_of_stream(),
            Err(err) => self.fail(err),
        }
    }

    fn on_end_of_stream(&mut self) {
        let repeat_count = self.repeat_count();
        if repeat_count == REPEAT_INFINITE || self.plays < repeat_count {
            self.plays += 1;
            self.request_frame(0);
        } else {
            self.ending = true;
        }
    }

    fn fail(&mut self, err: DecodeError) {
        log::warn!("animated image {:?}: {err}", self.base.id());
        self.failed = true;
        self.stop();
    }

    fn show(&mut self, index: usize, frame: Frame, now: Instant) {
        let delay = frame.delay;
        self.current = Some((index, frame));
        self.invalidate_self();
        if self.running {
            self.next_frame_at = Some(now + delay);
            self.schedule_tick();
            self.request_frame(index + 1);
        }
    }

    /// Time left before the visible frame is due to change.
    pub fn time_to_next_frame(&self, now: Instant) -> Option<Duration> {
        self.next_frame_at
            .map(|at| at.saturating_duration_since(now))
    }
}

impl Drawable for AnimatedImageDrawable {
    fn base(&self) -> &DrawableBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DrawableBase {
        &mut self.base
    }

    fn draw(&mut self, canvas: &mut Canvas) {
        self.update(Instant::now());
        if let Some((_, frame)) = &self.current {
            let opacity = self.alpha as f32 / 255.0;
            canvas.draw_image(frame.image.clone(), self.base.bounds().to_rect_f(), opacity);
        }
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
        Some(ConstantState::AnimatedImage(self.state.clone()))
    }

    fn alpha(&self) -> u8 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: u8) {
        if self.alpha != alpha {
            self.alpha = alpha;
            self.invalidate_self();
        }
    }

    fn intrinsic_width(&self) -> i32 {
        self.state.borrow().intrinsic_width
    }

    fn intrinsic_height(&self) -> i32 {
        self.state.borrow().intrinsic_height
    }

    fn advance_animations(&mut self, now: Instant) -> bool {
        self.update(now);
        self.running
    }
}

impl Drop for AnimatedImageDrawable {
    fn drop(&mut self) {
        if self.running {
            self.base.unschedule_self(&self.tick);
        }
    }
}
