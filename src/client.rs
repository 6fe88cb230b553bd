//! Client driver: applies relay actions to the game state and resolves shots
//! against the fleet.

use log::{debug, info};
use rand::Rng;

use crate::boat::Coord;
use crate::common::FleetError;
use crate::fleet::Fleet;
use crate::game::{GameEvent, GameState, GameStatus};
use crate::protocol::{GameAction, GameStateEvent};
use crate::snapshot::BoardSnapshot;

/// Result of resolving a pending shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    Miss(Coord),
    Hit(Coord),
    /// The shot hit and finished off a boat.
    Sunk(Coord),
    /// The cell had been shot before; nothing changed.
    Repeat(Coord),
}

pub struct GameClient<R: Rng> {
    state: GameState,
    fleet: Fleet,
    board: BoardSnapshot,
    rng: R,
    last_shot: Option<ShotOutcome>,
}

impl<R: Rng> GameClient<R> {
    /// Start a game against a randomly placed fleet of `fleet_size` boats.
    pub fn new(fleet_size: usize, mut rng: R) -> Result<Self, FleetError> {
        let fleet = Fleet::place(fleet_size, &mut rng)?;
        Ok(Self::with_fleet(fleet, rng))
    }

    /// Start a game against an existing fleet. Later resets draw new fleets
    /// of the same size from `rng`.
    pub fn with_fleet(fleet: Fleet, rng: R) -> Self {
        Self {
            state: GameState::initial(fleet.size()),
            fleet,
            board: BoardSnapshot::new(),
            rng,
            last_shot: None,
        }
    }

    /// Apply one action received from the relay. Returns the event to report
    /// back, if the action changed the outcome of the game.
    pub fn handle_action(
        &mut self,
        action: GameAction,
    ) -> Result<Option<GameStateEvent>, FleetError> {
        match action {
            GameAction::Left => self.dispatch(GameEvent::MoveLeft),
            GameAction::Right => self.dispatch(GameEvent::MoveRight),
            GameAction::Up => self.dispatch(GameEvent::MoveUp),
            GameAction::Down => self.dispatch(GameEvent::MoveDown),
            GameAction::Fire => {
                self.dispatch(GameEvent::FireRequested);
                return Ok(self.resolve_fire());
            }
            GameAction::ResetGame => self.restart()?,
        }
        Ok(None)
    }

    /// Resolve a pending shot at the cursor, if one is pending.
    pub fn resolve_fire(&mut self) -> Option<GameStateEvent> {
        if !self.state.fire_pending {
            return None;
        }
        let target = self.state.cursor.position();
        if self.board.is_shot(target) {
            debug!("cell {} already shot, ignoring", target);
            self.dispatch(GameEvent::FireDiscarded);
            self.last_shot = Some(ShotOutcome::Repeat(target));
            return None;
        }

        let before = self.fleet.remaining_count();
        let hit = self.fleet.record_shot(target);
        self.board.record(target, hit);
        self.dispatch(GameEvent::ShotResolved);
        let after = self.fleet.remaining_count();

        if after < before {
            self.dispatch(GameEvent::BoatSunk);
            self.last_shot = Some(ShotOutcome::Sunk(target));
            if after == 0 {
                info!("fleet destroyed after {} shots", self.state.shots_fired);
                return Some(GameStateEvent::Win);
            }
            info!("boat sunk at {}, {} remaining", target, after);
            return Some(GameStateEvent::Sunk);
        }
        self.last_shot = Some(if hit {
            ShotOutcome::Hit(target)
        } else {
            ShotOutcome::Miss(target)
        });
        None
    }

    /// Draw a new fleet and flag the reset. The state keeps its counters
    /// until [`GameClient::finish_reset`].
    pub fn begin_reset(&mut self) -> Result<(), FleetError> {
        self.fleet.reset(&mut self.rng)?;
        self.dispatch(GameEvent::ResetRequested);
        Ok(())
    }

    /// Clear the board to the neutral grid and restore the initial state.
    pub fn finish_reset(&mut self) {
        if !self.state.reset_in_progress {
            return;
        }
        self.board.clear();
        self.last_shot = None;
        self.dispatch(GameEvent::ResetFinished);
    }

    /// Full reset, as triggered by the controller or locally by the player.
    pub fn restart(&mut self) -> Result<(), FleetError> {
        self.begin_reset()?;
        self.finish_reset();
        info!("new game against {} boats", self.fleet.size());
        Ok(())
    }

    fn dispatch(&mut self, event: GameEvent) {
        self.state = self.state.apply(event);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn board(&self) -> &BoardSnapshot {
        &self.board
    }

    /// Outcome of the most recent fire action since the last reset.
    pub fn last_shot(&self) -> Option<ShotOutcome> {
        self.last_shot
    }
}
