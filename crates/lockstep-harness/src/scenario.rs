//! Pad script builder.

use lockstep_app::PadState;
use lockstep_proto::Buttons;

/// Sequence of pad states, one per frame read.
///
/// ```ignore
/// let script = PadScript::new().tap(Buttons::START).idle(3).tap_pad2(Buttons::A);
/// driver.push_pads(script);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PadScript {
    frames: Vec<PadState>,
}

impl PadScript {
    /// Empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// One frame with both pads as given.
    #[must_use]
    pub fn frame(mut self, pad1: Buttons, pad2: Buttons) -> Self {
        self.frames.push(PadState { pad1, pad2 });
        self
    }

    /// Press and release `buttons` on pad 1.
    #[must_use]
    pub fn tap(self, buttons: Buttons) -> Self {
        self.frame(buttons, Buttons::NONE).idle(1)
    }

    /// Press and release `buttons` on pad 2.
    #[must_use]
    pub fn tap_pad2(self, buttons: Buttons) -> Self {
        self.frame(Buttons::NONE, buttons).idle(1)
    }

    /// `count` frames of `buttons` held on pad 1.
    #[must_use]
    pub fn hold(mut self, buttons: Buttons, count: usize) -> Self {
        for _ in 0..count {
            self = self.frame(buttons, Buttons::NONE);
        }
        self
    }

    /// `count` frames with nothing held.
    #[must_use]
    pub fn idle(self, count: usize) -> Self {
        self.hold(Buttons::NONE, count)
    }

    /// Frames in order.
    pub fn into_frames(self) -> Vec<PadState> {
        self.frames
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if no frames were added.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl IntoIterator for PadScript {
    type Item = PadState;
    type IntoIter = std::vec::IntoIter<PadState>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}
