//! Client-side game state, reduced from a stream of [`GameEvent`]s.

use crate::boat::Coord;
use crate::config::{CURSOR_START, GRID_SIZE};

/// Targeting cursor. Moves one cell at a time and stops at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Cursor {
    pos: Coord,
}

impl Cursor {
    const MAX: u8 = GRID_SIZE - 1;

    /// Cursor at `pos`, clamped into the grid.
    pub fn at(pos: Coord) -> Self {
        Self {
            pos: Coord::new(pos.row.min(Self::MAX), pos.col.min(Self::MAX)),
        }
    }

    pub fn position(&self) -> Coord {
        self.pos
    }

    pub fn left(self) -> Self {
        Self::at(Coord::new(self.pos.row, self.pos.col.saturating_sub(1)))
    }

    pub fn right(self) -> Self {
        Self::at(Coord::new(self.pos.row, self.pos.col.saturating_add(1)))
    }

    pub fn up(self) -> Self {
        Self::at(Coord::new(self.pos.row.saturating_sub(1), self.pos.col))
    }

    pub fn down(self) -> Self {
        Self::at(Coord::new(self.pos.row.saturating_add(1), self.pos.col))
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::at(Coord::from(CURSOR_START))
    }
}

/// Transitions of the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    /// The player asked to fire at the cursor; resolution happens downstream.
    FireRequested,
    /// A pending shot was resolved against the fleet.
    ShotResolved,
    /// A pending shot targeted a cell already shot and was dropped.
    FireDiscarded,
    BoatSunk,
    /// The view must return to a neutral grid before the reset completes.
    ResetRequested,
    ResetFinished,
}

/// Current status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    InProgress,
    Won,
}

/// The whole session state as a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub shots_fired: u32,
    pub boats_remaining: usize,
    pub cursor: Cursor,
    pub reset_in_progress: bool,
    pub fire_pending: bool,
    /// Boats in a fresh fleet; `boats_remaining` starts here.
    fleet_size: usize,
}

impl GameState {
    /// State at the start of a game against `fleet_size` boats.
    pub fn initial(fleet_size: usize) -> Self {
        Self {
            shots_fired: 0,
            boats_remaining: fleet_size,
            cursor: Cursor::default(),
            reset_in_progress: false,
            fire_pending: false,
            fleet_size,
        }
    }

    /// Apply one event and return the next state.
    #[must_use]
    pub fn apply(self, event: GameEvent) -> Self {
        match event {
            GameEvent::MoveLeft => Self {
                cursor: self.cursor.left(),
                ..self
            },
            GameEvent::MoveRight => Self {
                cursor: self.cursor.right(),
                ..self
            },
            GameEvent::MoveUp => Self {
                cursor: self.cursor.up(),
                ..self
            },
            GameEvent::MoveDown => Self {
                cursor: self.cursor.down(),
                ..self
            },
            GameEvent::FireRequested => Self {
                fire_pending: true,
                ..self
            },
            GameEvent::ShotResolved => Self {
                fire_pending: false,
                shots_fired: self.shots_fired.saturating_add(1),
                ..self
            },
            GameEvent::FireDiscarded => Self {
                fire_pending: false,
                ..self
            },
            GameEvent::BoatSunk => Self {
                boats_remaining: self.boats_remaining.saturating_sub(1),
                ..self
            },
            GameEvent::ResetRequested => Self {
                reset_in_progress: true,
                ..self
            },
            GameEvent::ResetFinished => Self::initial(self.fleet_size),
        }
    }

    pub fn status(&self) -> GameStatus {
        if self.boats_remaining == 0 {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        }
    }

    pub fn fleet_size(&self) -> usize {
        self.fleet_size
    }
}
