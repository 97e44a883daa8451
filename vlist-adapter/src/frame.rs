/// A single-slot "run on the next frame" request.
///
/// Any number of requests made before the slot is taken collapse into one. The slot carries no
/// payload: whoever takes it reads the latest state at that point, so the last write wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSlot {
    pending: bool,
}

impl FrameSlot {
    pub const fn new() -> Self {
        Self { pending: false }
    }

    /// Arms the slot.
    ///
    /// Returns `true` for the first request since the slot was last taken, i.e. when the host
    /// needs to actually schedule a frame.
    pub fn schedule(&mut self) -> bool {
        !core::mem::replace(&mut self.pending, true)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Disarms the slot, returning whether it was armed.
    pub fn take(&mut self) -> bool {
        core::mem::replace(&mut self.pending, false)
    }
}
