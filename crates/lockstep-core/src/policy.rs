//! Error policy.
//!
//! Every result code returned by a transport call passes through
//! [`classify`] exactly once, before any other logic sees it. The returned
//! [`Disposition`] tells the exchange loop what to do next and which status
//! line to show.
//!
//! | Outcome                     | Open          | Exchange             | Close  |
//! |-----------------------------|---------------|----------------------|--------|
//! | `RemoteDataInTransit`       | ignore        | ignore               | ignore |
//! | `OutOfSync`                 | silent retry  | reopen, resync text  | fatal  |
//! | `SessionClosed`             | fatal         | reopen, peer text    | fatal  |
//! | `ConnectionLost`            | reopen, dial  | reopen, dial         | fatal  |
//! | `BadPacket`                 | retry, noise  | retry, noise         | fatal  |
//! | `NoData`                    | retry, wait   | retry, wait          | fatal  |
//! | anything else               | fatal         | fatal                | fatal  |

use std::fmt;

use lockstep_proto::ErrorKind;

use crate::role::Role;

/// Transport call that produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `open_session`
    Open,
    /// `exchange`
    Exchange,
    /// `close_session`
    Close,
}

/// User-facing status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Opening a session
    Measuring,
    /// Master re-establishing a dropped link
    Redialing,
    /// Slave waiting for the master to call back
    WaitingForCall,
    /// Corrupted packet, transport recovering
    LineNoise,
    /// Peer's packet has not arrived yet
    WaitingForData,
    /// Peer reset its session
    PeerClosed,
    /// Peers disagree about the session, reopening
    Resynchronizing,
    /// Transport reported an error during its own recovery
    Recovering(ErrorKind),
}

impl Status {
    /// Text shown on the status line.
    pub fn text(self) -> String {
        match self {
            Self::Measuring => "Measuring line connection quality...".to_string(),
            Self::Redialing => "Redialing...".to_string(),
            Self::WaitingForCall => "Waiting for call...".to_string(),
            Self::LineNoise => "Line noise, hang on...".to_string(),
            Self::WaitingForData => "Waiting for data...".to_string(),
            Self::PeerClosed => "Opponent reset the session...".to_string(),
            Self::Resynchronizing => "Resynchronizing...".to_string(),
            Self::Recovering(kind) => {
                format!("Error code {}: trying to recover...", kind.code())
            },
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// What the exchange loop does with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Drop the outcome silently. A failed open or exchange still skips the
    /// rest of the frame; a failed flush close still reopens.
    Ignore,
    /// Show the status and try again next tick
    Retry(Status),
    /// Show the status, raise the reopen flag, try again next tick
    Reopen(Status),
    /// Try the open again next tick without touching any other state
    RetryOpen,
    /// Report, show the fatal screen, and stop
    Fatal(ErrorKind),
}

impl Disposition {
    /// True for [`Disposition::Fatal`].
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

/// Classify the outcome of `op` for the local `role`.
pub fn classify(kind: ErrorKind, op: Operation, role: Role) -> Disposition {
    match (kind, op) {
        (ErrorKind::RemoteDataInTransit, _) => Disposition::Ignore,
        (_, Operation::Close) => Disposition::Fatal(kind),
        (ErrorKind::OutOfSync, Operation::Open) => Disposition::RetryOpen,
        (ErrorKind::OutOfSync, Operation::Exchange) => {
            Disposition::Reopen(Status::Resynchronizing)
        },
        (ErrorKind::SessionClosed, Operation::Exchange) => Disposition::Reopen(Status::PeerClosed),
        (ErrorKind::ConnectionLost, _) => Disposition::Reopen(link_status(role)),
        (ErrorKind::BadPacket, _) => Disposition::Retry(Status::LineNoise),
        (ErrorKind::NoData, _) => Disposition::Retry(Status::WaitingForData),
        _ => Disposition::Fatal(kind),
    }
}

/// Status for an error the transport observed during its own recovery.
///
/// These never change control flow. `None` means nothing worth showing.
pub fn notice_status(kind: ErrorKind, role: Role) -> Option<Status> {
    match kind {
        ErrorKind::RemoteDataInTransit => None,
        ErrorKind::ConnectionLost => Some(link_status(role)),
        ErrorKind::BadPacket => Some(Status::LineNoise),
        ErrorKind::NoData => Some(Status::WaitingForData),
        other => Some(Status::Recovering(other)),
    }
}

fn link_status(role: Role) -> Status {
    match role {
        Role::Master => Status::Redialing,
        Role::Slave => Status::WaitingForCall,
    }
}
