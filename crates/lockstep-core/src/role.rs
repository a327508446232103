//! Local role in the game.

/// Which peer this process is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Dials out; owns pad 1 in the exchanged pair
    Master,
    /// Answers; owns pad 2 in the exchanged pair
    Slave,
}

impl Role {
    /// The other peer's role.
    pub fn remote(self) -> Self {
        match self {
            Self::Master => Self::Slave,
            Self::Slave => Self::Master,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Slave => "slave",
        }
    }
}

/// How the game was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participation {
    /// Both pads on this machine, no transport
    Local,
    /// One pad here, one at the peer
    Networked {
        /// Local side
        role: Role,
    },
}

impl Participation {
    /// Local role when networked.
    pub fn role(self) -> Option<Role> {
        match self {
            Self::Local => None,
            Self::Networked { role } => Some(role),
        }
    }

    /// True if a transport is involved.
    pub fn is_networked(self) -> bool {
        matches!(self, Self::Networked { .. })
    }
}
