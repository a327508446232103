//! Pad edge tracking.

use lockstep_proto::Buttons;

/// Both pads for one advanced frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Master pad, held buttons
    pub master: Buttons,
    /// Slave pad, held buttons
    pub slave: Buttons,
    /// Master buttons that went down since the previous frame
    pub master_pressed: Buttons,
    /// Slave buttons that went down since the previous frame
    pub slave_pressed: Buttons,
    /// Tick at which the frame was produced
    pub tick: u64,
}

impl FrameInput {
    /// Held on either pad.
    pub fn both(&self) -> Buttons {
        self.master | self.slave
    }

    /// Pressed on either pad.
    pub fn both_pressed(&self) -> Buttons {
        self.master_pressed | self.slave_pressed
    }
}

/// Remembers the previous frame's pads to derive presses.
#[derive(Debug, Clone, Copy, Default)]
pub struct PadTracker {
    master: Buttons,
    slave: Buttons,
}

impl PadTracker {
    /// Tracker with nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this frame's pads and return the edge-triggered input.
    pub fn update(&mut self, master: Buttons, slave: Buttons, tick: u64) -> FrameInput {
        let input = FrameInput {
            master,
            slave,
            master_pressed: master.pressed_since(self.master),
            slave_pressed: slave.pressed_since(self.slave),
            tick,
        };
        self.master = master;
        self.slave = slave;
        input
    }
}
