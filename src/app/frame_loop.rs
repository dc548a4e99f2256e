use crate::field::ParticleField;
use crate::profile_scope;
use crate::surface::RenderTarget;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use super::commands::{CancelToken, FieldCommand, FieldHandle};

/// Cooperative driver that runs one field frame at a time on the caller's thread.
pub struct FrameLoop<T: RenderTarget> {
    field: ParticleField<T>,
    rx: Receiver<FieldCommand>,
    token: CancelToken,
    epoch: Instant,
    virtual_now: Duration,
    frames: usize,
}

impl<T: RenderTarget> FrameLoop<T> {
    pub fn new(field: ParticleField<T>) -> (Self, FieldHandle) {
        let (tx, rx) = channel();
        let token = CancelToken::new();
        let handle = FieldHandle::new(tx, token.clone());
        let frame_loop = Self {
            field,
            rx,
            token,
            epoch: Instant::now(),
            virtual_now: Duration::ZERO,
            frames: 0,
        };
        (frame_loop, handle)
    }

    /// Run one frame at time `now`. Returns whether another frame should be scheduled.
    pub fn frame(&mut self, now: Duration) -> bool {
        if self.token.is_cancelled() {
            self.field.teardown();
            return false;
        }
        profile_scope!("frame");

        loop {
            match self.rx.try_recv() {
                Ok(cmd) => {
                    if !self.handle_command(cmd, now) {
                        return false;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        self.field.poll_timers(now);
        self.field.tick();
        self.frames += 1;
        !self.token.is_cancelled()
    }

    fn handle_command(&mut self, cmd: FieldCommand, now: Duration) -> bool {
        match cmd {
            FieldCommand::PointerMove { screen, rect } => {
                self.field.on_pointer_move(screen, rect);
            }
            FieldCommand::Resize { size, pixel_ratio } => {
                self.field.notify_resize(size, pixel_ratio, now);
            }
            FieldCommand::Reseed(signal) => {
                self.field.reseed(signal);
            }
            FieldCommand::Refresh => self.field.refresh(),
            FieldCommand::Teardown => {
                self.teardown();
                return false;
            }
        }
        true
    }

    /// Drive frames in real time, sleeping out the rest of each interval.
    /// Stops after `max_frames` (if given) or on teardown.
    pub fn run(&mut self, max_frames: Option<usize>, interval: Duration) {
        let mut run = 0;
        while max_frames.map_or(true, |max| run < max) {
            let frame_start = Instant::now();
            if !self.frame(self.epoch.elapsed()) {
                break;
            }
            run += 1;
            if let Some(rest) = interval.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
        log::debug!("frame loop ran {} frames", run);
    }

    /// Advance `frames` frames on a virtual clock, `interval` apart, without sleeping.
    pub fn run_headless(&mut self, frames: usize, interval: Duration) -> usize {
        let mut run = 0;
        while run < frames {
            if !self.frame(self.virtual_now) {
                break;
            }
            self.virtual_now = self.virtual_now.saturating_add(interval);
            run += 1;
        }
        run
    }

    /// Stop the loop and the field synchronously: the token is cancelled and
    /// the pending debounce is dropped before this returns. No frame or
    /// rebuild runs afterwards.
    pub fn teardown(&mut self) {
        self.token.cancel();
        self.field.teardown();
    }

    /// Current position of the headless virtual clock.
    pub fn virtual_now(&self) -> Duration {
        self.virtual_now
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn field(&self) -> &ParticleField<T> {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut ParticleField<T> {
        &mut self.field
    }

    pub fn into_field(self) -> ParticleField<T> {
        self.field
    }
}
