use fleetlink::{Coord, Cursor, GameEvent, GameState, GameStatus};

/// Fresh three-boat state with the cursor walked to (row, col).
fn at(row: u8, col: u8) -> GameState {
    let mut state = GameState::initial(3);
    for _ in 0..8 {
        state = state.apply(GameEvent::MoveUp).apply(GameEvent::MoveLeft);
    }
    for _ in 0..row {
        state = state.apply(GameEvent::MoveDown);
    }
    for _ in 0..col {
        state = state.apply(GameEvent::MoveRight);
    }
    assert_eq!(state.cursor.position(), Coord::new(row, col));
    state
}

#[test]
fn initial_state() {
    let state = GameState::initial(3);
    assert_eq!(state.shots_fired, 0);
    assert_eq!(state.boats_remaining, 3);
    assert_eq!(state.cursor.position(), Coord::new(3, 3));
    assert!(!state.reset_in_progress);
    assert!(!state.fire_pending);
    assert_eq!(state.status(), GameStatus::InProgress);
}

#[test]
fn cursor_moves_one_cell() {
    let start = GameState::initial(3);
    assert_eq!(start.apply(GameEvent::MoveLeft).cursor.position(), Coord::new(3, 2));
    assert_eq!(start.apply(GameEvent::MoveRight).cursor.position(), Coord::new(3, 4));
    assert_eq!(start.apply(GameEvent::MoveUp).cursor.position(), Coord::new(2, 3));
    assert_eq!(start.apply(GameEvent::MoveDown).cursor.position(), Coord::new(4, 3));
}

#[test]
fn cursor_clamps_at_the_edges() {
    let corner = at(0, 0)
        .apply(GameEvent::MoveUp)
        .apply(GameEvent::MoveLeft);
    assert_eq!(corner.cursor.position(), Coord::new(0, 0));

    let corner = at(7, 7)
        .apply(GameEvent::MoveDown)
        .apply(GameEvent::MoveRight);
    assert_eq!(corner.cursor.position(), Coord::new(7, 7));
}

#[test]
fn cursor_at_clamps_out_of_grid_positions() {
    assert_eq!(Cursor::at(Coord::new(12, 200)).position(), Coord::new(7, 7));
}

#[test]
fn fire_flow() {
    let state = GameState::initial(3).apply(GameEvent::FireRequested);
    assert!(state.fire_pending);
    assert_eq!(state.shots_fired, 0);

    let resolved = state.apply(GameEvent::ShotResolved);
    assert!(!resolved.fire_pending);
    assert_eq!(resolved.shots_fired, 1);

    let discarded = state.apply(GameEvent::FireDiscarded);
    assert!(!discarded.fire_pending);
    assert_eq!(discarded.shots_fired, 0);
}

#[test]
fn sinking_every_boat_wins() {
    let mut state = GameState::initial(2);
    state = state.apply(GameEvent::BoatSunk);
    assert_eq!(state.boats_remaining, 1);
    assert_eq!(state.status(), GameStatus::InProgress);
    state = state.apply(GameEvent::BoatSunk);
    assert_eq!(state.status(), GameStatus::Won);
    // Never underflows.
    assert_eq!(state.apply(GameEvent::BoatSunk).boats_remaining, 0);
}

#[test]
fn reset_requested_only_sets_the_flag() {
    let played = at(5, 6)
        .apply(GameEvent::FireRequested)
        .apply(GameEvent::ShotResolved)
        .apply(GameEvent::BoatSunk);
    let requested = played.apply(GameEvent::ResetRequested);
    assert!(requested.reset_in_progress);
    assert_eq!(requested.shots_fired, played.shots_fired);
    assert_eq!(requested.boats_remaining, played.boats_remaining);
    assert_eq!(requested.cursor, played.cursor);
    assert_eq!(requested.fire_pending, played.fire_pending);
}

#[test]
fn reset_finished_restores_initial_values() {
    let finished = at(5, 6)
        .apply(GameEvent::FireRequested)
        .apply(GameEvent::ShotResolved)
        .apply(GameEvent::BoatSunk)
        .apply(GameEvent::ResetRequested)
        .apply(GameEvent::ResetFinished);
    assert_eq!(finished, GameState::initial(3));
}
