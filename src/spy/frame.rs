//! FrameLoop: a cooperative task that re-arms itself every frame
//!
//! The host calls `begin_frame` from its frame callback and only requests the
//! next frame while the loop reports `Continue`. Cancelling is sticky.

/// What the host should do after running one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    /// Request another frame
    Continue,
    /// Do not re-arm
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Idle,
    Running,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct FrameLoop {
    state: LoopState,
    frames: u64,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            frames: 0,
        }
    }

    /// Idle -> Running. A cancelled loop stays cancelled.
    pub fn start(&mut self) {
        if self.state == LoopState::Idle {
            self.state = LoopState::Running;
        }
    }

    pub fn cancel(&mut self) {
        self.state = LoopState::Cancelled;
    }

    /// Account for one frame. Returns false if no work should run.
    pub fn begin_frame(&mut self) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        self.frames += 1;
        true
    }

    pub fn control(&self) -> FrameControl {
        match self.state {
            LoopState::Running => FrameControl::Continue,
            _ => FrameControl::Stop,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == LoopState::Cancelled
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}
