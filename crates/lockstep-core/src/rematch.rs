//! Rematch negotiation.
//!
//! Each side owns one [`Choice`], mutated only by that side's pad. Both peers
//! see both pads every frame, so both compute both choices identically; the
//! leaning state of the remote side is never shown, only its final answer
//! drives transitions.
//!
//! ```text
//!            RIGHT                START
//! LeaningNo ───────> LeaningYes ───────> FinalYes
//!     │     <───────
//!     │      LEFT
//!     │ START / countdown expiry
//!     ↓
//!  FinalNo   <─── LeaningYes on countdown expiry
//! ```

use lockstep_proto::Buttons;

use crate::role::Role;

/// Blink phase mask over the tick counter.
pub const BLINK_MASK: u64 = 0x20;

/// One side's answer to "play again?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Undecided, "No" highlighted
    LeaningNo,
    /// Undecided, "Yes" highlighted
    LeaningYes,
    /// Declined
    FinalNo,
    /// Accepted
    FinalYes,
}

impl Choice {
    /// Apply this frame's pressed buttons.
    ///
    /// Only a lone LEFT, RIGHT or START press counts.
    fn step(self, pressed: Buttons) -> Self {
        match (self, pressed) {
            (Self::LeaningYes, p) if p == Buttons::LEFT => Self::LeaningNo,
            (Self::LeaningNo, p) if p == Buttons::RIGHT => Self::LeaningYes,
            (Self::LeaningYes, p) if p == Buttons::START => Self::FinalYes,
            (Self::LeaningNo, p) if p == Buttons::START => Self::FinalNo,
            (choice, _) => choice,
        }
    }

    /// Undecided choices become `FinalNo`.
    fn expire(self) -> Self {
        match self {
            Self::LeaningNo | Self::LeaningYes => Self::FinalNo,
            settled => settled,
        }
    }

    /// True once the choice can no longer change.
    pub fn is_final(self) -> bool {
        matches!(self, Self::FinalNo | Self::FinalYes)
    }
}

/// How a rematch frame resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RematchOutcome {
    /// Still negotiating
    Pending,
    /// Both sides said yes
    Accepted,
    /// The local side said no
    LocalDeclined,
    /// The remote side said no
    RemoteDeclined,
}

/// Which of the two options is lit this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChoiceDisplay {
    /// "No" visible
    pub no: bool,
    /// "Yes" visible
    pub yes: bool,
}

/// Negotiation state for one rematch prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rematch {
    master: Choice,
    slave: Choice,
    remaining_ticks: u32,
}

impl Rematch {
    /// Both sides leaning no, countdown full.
    pub fn new(countdown_ticks: u32) -> Self {
        Self {
            master: Choice::LeaningNo,
            slave: Choice::LeaningNo,
            remaining_ticks: countdown_ticks,
        }
    }

    /// Master's current choice.
    pub fn master(&self) -> Choice {
        self.master
    }

    /// Slave's current choice.
    pub fn slave(&self) -> Choice {
        self.slave
    }

    /// Ticks until undecided sides are frozen to no.
    pub fn remaining_ticks(&self) -> u32 {
        self.remaining_ticks
    }

    /// The local role's choice.
    pub fn local(&self, role: Role) -> Choice {
        match role {
            Role::Master => self.master,
            Role::Slave => self.slave,
        }
    }

    /// The remote role's choice.
    pub fn remote(&self, role: Role) -> Choice {
        self.local(role.remote())
    }

    /// Advance one frame.
    ///
    /// Choices update from each pad's presses, then the countdown drains by
    /// `elapsed_ticks`; reaching zero freezes undecided choices to
    /// [`Choice::FinalNo`]. A remote no is checked before a local no.
    pub fn advance(
        &mut self,
        role: Role,
        master_pressed: Buttons,
        slave_pressed: Buttons,
        elapsed_ticks: u32,
    ) -> RematchOutcome {
        self.master = self.master.step(master_pressed);
        self.slave = self.slave.step(slave_pressed);

        if self.remaining_ticks > 0 {
            self.remaining_ticks = self.remaining_ticks.saturating_sub(elapsed_ticks);
            if self.remaining_ticks == 0 {
                self.master = self.master.expire();
                self.slave = self.slave.expire();
            }
        }

        match (self.local(role), self.remote(role)) {
            (_, Choice::FinalNo) => RematchOutcome::RemoteDeclined,
            (Choice::FinalNo, _) => RematchOutcome::LocalDeclined,
            (Choice::FinalYes, Choice::FinalYes) => RematchOutcome::Accepted,
            _ => RematchOutcome::Pending,
        }
    }

    /// What to draw for the local side at `tick`.
    ///
    /// Both options stay drawn while leaning and only the leaning one blinks.
    /// A final choice hides the other option.
    pub fn local_display(&self, role: Role, tick: u64) -> ChoiceDisplay {
        let lit = tick & BLINK_MASK != 0;
        match self.local(role) {
            Choice::LeaningNo => ChoiceDisplay { no: lit, yes: true },
            Choice::LeaningYes => ChoiceDisplay { no: true, yes: lit },
            Choice::FinalNo => ChoiceDisplay { no: true, yes: false },
            Choice::FinalYes => ChoiceDisplay { no: false, yes: true },
        }
    }
}
