//! Game mode state machine.
//!
//! Uses the action pattern: [`Game::advance`] consumes one frame of
//! reconciled input and returns the side effects for the runtime to execute.
//! The game never touches the transport.
//!
//! # Modes
//!
//! ```text
//! ┌──────┐  START   ┌──────┐  match won  ┌────────┐  countdown  ┌─────────┐
//! │ Demo │─────────>│ Play │────────────>│ Ending │────────────>│ Rematch │
//! └──────┘          └──────┘             └────────┘ (networked) └─────────┘
//!     ↑                 ↑                    │                       │
//!     │                 └────────────────────┼───────────────────────┘
//!     │                                      │             both yes
//!     └──────────────────────────────────────┘
//!                 countdown (local)
//! ```
//!
//! A declined rematch is terminal and reported as an action, not a mode.

use lockstep_proto::{Buttons, GameResults};

use crate::{
    config::{ConfigChange, GameRules},
    input::FrameInput,
    rematch::{Rematch, RematchOutcome},
    role::{Participation, Role},
    round::{RoundOutcome, RoundState},
};

/// Active mode. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Attract screen, waiting for START
    Demo,
    /// A match in progress
    Play,
    /// "Game over" countdown
    Ending {
        /// Ticks left before leaving Ending
        remaining_ticks: u32,
    },
    /// "Play again?" prompt
    Rematch(Rematch),
}

/// Side effects requested by the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameAction {
    /// Hand the match result to the ranking service
    ReportGameOver(GameResults),
    /// Change the session configuration and reopen
    Reconfigure(ConfigChange),
    /// Reopen the session with the current configuration
    Reopen,
    /// Close the session now, then reopen
    Flush,
    /// Corrupt the local link for a moment
    InjectLineNoise,
    /// Leave the game back to the host
    ReturnToHost,
    /// Local player declined the rematch
    LocalDeclined,
    /// Remote player declined the rematch
    RemoteDeclined,
}

/// The whole game simulation.
///
/// Both peers run identical copies fed with identical inputs.
#[derive(Debug, Clone)]
pub struct Game {
    mode: Mode,
    round: RoundState,
    rules: GameRules,
    participation: Participation,
    allow_return_to_host: bool,
}

impl Game {
    /// New game. Local games start in Demo, networked games in Play.
    pub fn new(participation: Participation, rules: GameRules, allow_return_to_host: bool) -> Self {
        let mode = if participation.is_networked() { Mode::Play } else { Mode::Demo };
        Self { mode, round: RoundState::default(), rules, participation, allow_return_to_host }
    }

    /// Active mode.
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Scores and wins.
    pub fn round(&self) -> &RoundState {
        &self.round
    }

    /// Thresholds in use.
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Local or networked, and as which role.
    pub fn participation(&self) -> Participation {
        self.participation
    }

    /// Whether Demo offers the L+R exit.
    pub fn allow_return_to_host(&self) -> bool {
        self.allow_return_to_host
    }

    /// Digest carried in the next outgoing packet.
    pub fn checksum(&self) -> u8 {
        self.round.checksum()
    }

    /// Advance one frame.
    ///
    /// `elapsed_ticks` drains the Ending and Rematch countdowns.
    pub fn advance(&mut self, input: &FrameInput, elapsed_ticks: u32) -> Vec<GameAction> {
        match self.mode {
            Mode::Demo => self.advance_demo(input),
            Mode::Play => self.advance_play(input),
            Mode::Ending { remaining_ticks } => {
                self.advance_ending(remaining_ticks, elapsed_ticks);
                Vec::new()
            },
            Mode::Rematch(rematch) => self.advance_rematch(rematch, input, elapsed_ticks),
        }
    }

    fn advance_demo(&mut self, input: &FrameInput) -> Vec<GameAction> {
        let exit = Buttons::L | Buttons::R;
        if self.allow_return_to_host && (input.master.contains(exit) || input.slave.contains(exit))
        {
            tracing::info!("returning to host from demo");
            return vec![GameAction::ReturnToHost];
        }

        if input.both_pressed().contains(Buttons::START) {
            self.start_play();
        }
        Vec::new()
    }

    fn advance_play(&mut self, input: &FrameInput) -> Vec<GameAction> {
        let mut actions = Vec::new();

        self.round.apply_points(input.master_pressed, input.slave_pressed);
        // Settling clears the scores; the game-over report carries them.
        let closing = self.round.results();
        match self.round.settle(&self.rules) {
            RoundOutcome::None => {},
            RoundOutcome::RoundWon(side) => {
                tracing::info!(
                    ?side,
                    wins_a = self.round.wins_a,
                    wins_b = self.round.wins_b,
                    "round won"
                );
            },
            RoundOutcome::MatchWon(side) => {
                tracing::info!(
                    ?side,
                    wins_a = self.round.wins_a,
                    wins_b = self.round.wins_b,
                    "match won"
                );
                if self.participation.is_networked() {
                    actions.push(GameAction::ReportGameOver(closing));
                }
                self.mode = Mode::Ending { remaining_ticks: self.rules.ending_countdown_ticks };
            },
        }

        let Some(role) = self.participation.role() else {
            return actions;
        };

        let own_pressed = match role {
            Role::Master => input.master_pressed,
            Role::Slave => input.slave_pressed,
        };
        if own_pressed.contains(Buttons::C) {
            actions.push(GameAction::InjectLineNoise);
        }
        if role == Role::Master && input.master_pressed.contains(Buttons::START) {
            actions.push(GameAction::Reopen);
        }

        let both = input.both_pressed();
        if both.contains(Buttons::Z) {
            actions.push(GameAction::Flush);
        }
        for (button, change) in [
            (Buttons::L, ConfigChange::DecreaseInterval),
            (Buttons::R, ConfigChange::IncreaseInterval),
            (Buttons::X, ConfigChange::DecreasePacketSize),
            (Buttons::Y, ConfigChange::IncreasePacketSize),
        ] {
            if both.contains(button) {
                actions.push(GameAction::Reconfigure(change));
            }
        }

        actions
    }

    fn advance_ending(&mut self, remaining_ticks: u32, elapsed_ticks: u32) {
        let remaining_ticks = remaining_ticks.saturating_sub(elapsed_ticks);
        if remaining_ticks > 0 {
            self.mode = Mode::Ending { remaining_ticks };
            return;
        }

        self.mode = if self.participation.is_networked() {
            Mode::Rematch(Rematch::new(self.rules.rematch_countdown_ticks))
        } else {
            Mode::Demo
        };
        tracing::info!(mode = ?self.mode, "ending finished");
    }

    fn advance_rematch(
        &mut self,
        mut rematch: Rematch,
        input: &FrameInput,
        elapsed_ticks: u32,
    ) -> Vec<GameAction> {
        let Some(role) = self.participation.role() else {
            self.mode = Mode::Demo;
            return Vec::new();
        };

        let outcome =
            rematch.advance(role, input.master_pressed, input.slave_pressed, elapsed_ticks);
        self.mode = Mode::Rematch(rematch);

        match outcome {
            RematchOutcome::Pending => Vec::new(),
            RematchOutcome::Accepted => {
                tracing::info!("rematch accepted");
                self.start_play();
                Vec::new()
            },
            RematchOutcome::LocalDeclined => {
                tracing::info!("local player declined rematch");
                vec![GameAction::LocalDeclined]
            },
            RematchOutcome::RemoteDeclined => {
                tracing::info!("remote player declined rematch");
                vec![GameAction::RemoteDeclined]
            },
        }
    }

    fn start_play(&mut self) {
        self.round = RoundState::default();
        self.mode = Mode::Play;
        tracing::info!("new game");
    }
}
