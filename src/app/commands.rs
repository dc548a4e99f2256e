// app/commands.rs
// Host-to-loop commands and the handle the host uses to send them

use crate::surface::{SurfaceRect, SurfaceSize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use ultraviolet::Vec2;

/// Events forwarded from the hosting environment into the frame loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldCommand {
    PointerMove { screen: Vec2, rect: SurfaceRect },
    Resize { size: SurfaceSize, pixel_ratio: f32 },
    Reseed(u64),
    Refresh,
    Teardown,
}

/// Shared stop flag checked before every frame.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Host side of a running frame loop.
#[derive(Clone, Debug)]
pub struct FieldHandle {
    sender: Sender<FieldCommand>,
    token: CancelToken,
}

impl FieldHandle {
    pub(crate) fn new(sender: Sender<FieldCommand>, token: CancelToken) -> Self {
        Self { sender, token }
    }

    /// Queue a command. Returns false once the loop has gone away.
    pub fn send(&self, cmd: FieldCommand) -> bool {
        self.sender.send(cmd).is_ok()
    }

    pub fn pointer_move(&self, screen: Vec2, rect: SurfaceRect) -> bool {
        self.send(FieldCommand::PointerMove { screen, rect })
    }

    pub fn resize(&self, size: SurfaceSize, pixel_ratio: f32) -> bool {
        self.send(FieldCommand::Resize { size, pixel_ratio })
    }

    pub fn reseed(&self, signal: u64) -> bool {
        self.send(FieldCommand::Reseed(signal))
    }

    /// Cancel the loop from the host side.
    ///
    /// The token is set before this returns, so no further frame runs. The
    /// field itself, including any pending debounced resize, is torn down by
    /// the loop thread on its next `frame()` call. Owners of the loop use
    /// [`FrameLoop::teardown`](super::FrameLoop::teardown) for a fully
    /// synchronous stop.
    pub fn teardown(&self) {
        self.token.cancel();
        let _ = self.sender.send(FieldCommand::Teardown);
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
