#![cfg(feature = "std")]

use std::fmt::Write;

use crate::boat::Coord;
use crate::client::{GameClient, ShotOutcome};
use crate::config::GRID_SIZE;
use crate::game::{Cursor, GameStatus};
use crate::protocol::ControllerAction;
use crate::snapshot::{BoardSnapshot, CellState};
use rand::Rng;

/// Render the enemy board with the cursor shown in brackets.
pub fn render_board(board: &BoardSnapshot, cursor: Cursor) -> String {
    let mut out = String::new();
    let target = cursor.position();
    out.push_str("   ");
    for c in 0..GRID_SIZE {
        let ch = (b'A' + c) as char;
        let _ = write!(out, " {} ", ch);
    }
    out.push('\n');
    for (r, row) in board.rows().enumerate() {
        let _ = write!(out, "{:2} ", r + 1);
        for (c, cell) in row.iter().enumerate() {
            let ch = match cell {
                CellState::Hit => 'X',
                CellState::Miss => 'o',
                CellState::Unknown => '.',
            };
            if Coord::new(r as u8, c as u8) == target {
                let _ = write!(out, "[{}]", ch);
            } else {
                let _ = write!(out, " {} ", ch);
            }
        }
        out.push('\n');
    }
    out
}

/// One status line under the board. `attached` tells whether the relay has
/// the client in its slot.
pub fn status_line<R: Rng>(client: &GameClient<R>, attached: bool) -> String {
    let state = client.state();
    let last = match client.last_shot() {
        Some(ShotOutcome::Miss(at)) => format!("miss at {}", at),
        Some(ShotOutcome::Hit(at)) => format!("hit at {}", at),
        Some(ShotOutcome::Sunk(at)) => format!("sunk at {}", at),
        Some(ShotOutcome::Repeat(at)) => format!("{} already shot", at),
        None => "no shot yet".to_string(),
    };
    let link = if attached { "connected" } else { "disconnected" };
    match client.status() {
        GameStatus::Won => format!(
            "All boats sunk in {} shots!  [{}]",
            state.shots_fired, link
        ),
        GameStatus::InProgress => format!(
            "Boats left: {}/{}  shots: {}  cursor: {}  ({})  [{}]",
            state.boats_remaining,
            state.fleet_size(),
            state.shots_fired,
            state.cursor.position(),
            last,
            link
        ),
    }
}

pub fn print_game<R: Rng>(client: &GameClient<R>, attached: bool) {
    std::print!("{}", render_board(client.board(), client.state().cursor));
    std::println!("{}", status_line(client, attached));
}

/// Keyboard stand-in for the controller: `w a s d` move, `f` fires, `r`
/// resets. Space fires too.
pub fn key_to_action(key: char) -> Option<ControllerAction> {
    match key.to_ascii_lowercase() {
        'w' => Some(ControllerAction::Up),
        'a' => Some(ControllerAction::Left),
        's' => Some(ControllerAction::Down),
        'd' => Some(ControllerAction::Right),
        'f' | ' ' => Some(ControllerAction::Fire),
        'r' => Some(ControllerAction::ResetGame),
        _ => None,
    }
}
