//! Input bitmask.

use std::ops::{BitAnd, BitOr, BitOrAssign};

/// 16-bit controller state, one bit per button.
///
/// Bits are set while a button is held. Edge-triggered "pressed this tick"
/// masks are derived with [`Buttons::pressed_since`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Buttons(u16);

impl Buttons {
    /// No buttons held.
    pub const NONE: Self = Self(0);
    /// D-pad right.
    pub const RIGHT: Self = Self(1 << 15);
    /// D-pad left.
    pub const LEFT: Self = Self(1 << 14);
    /// D-pad down.
    pub const DOWN: Self = Self(1 << 13);
    /// D-pad up.
    pub const UP: Self = Self(1 << 12);
    /// Start (confirm).
    pub const START: Self = Self(1 << 11);
    /// A button.
    pub const A: Self = Self(1 << 10);
    /// C button.
    pub const C: Self = Self(1 << 9);
    /// B button.
    pub const B: Self = Self(1 << 8);
    /// Right shoulder.
    pub const R: Self = Self(1 << 7);
    /// X button.
    pub const X: Self = Self(1 << 6);
    /// Y button.
    pub const Y: Self = Self(1 << 5);
    /// Z button.
    pub const Z: Self = Self(1 << 4);
    /// Left shoulder.
    pub const L: Self = Self(1 << 3);

    /// Wrap a raw bitmask.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw bitmask.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// True if no bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any bit of `other` is set.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Bits set now that were clear in `previous`.
    pub const fn pressed_since(self, previous: Self) -> Self {
        Self(self.0 & !previous.0)
    }
}

impl BitOr for Buttons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Buttons {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Buttons {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_since_reports_only_new_bits() {
        let previous = Buttons::A | Buttons::LEFT;
        let current = Buttons::A | Buttons::B;

        assert_eq!(current.pressed_since(previous), Buttons::B);
    }

    #[test]
    fn contains_requires_all_bits() {
        let held = Buttons::L | Buttons::R;

        assert!(held.contains(Buttons::L | Buttons::R));
        assert!(!Buttons::L.contains(Buttons::L | Buttons::R));
        assert!(Buttons::L.intersects(Buttons::L | Buttons::R));
    }
}
