use fleetlink::{Boat, Coord, Fleet, FleetError, Orientation, MAX_BOAT_LEN, MIN_BOAT_LEN};
use rand::{rngs::SmallRng, SeedableRng};

#[test]
fn horizontal_boat_cells() {
    let boat = Boat::new(Coord::new(0, 0), 2, Orientation::Horizontal).unwrap();
    let coords: Vec<_> = boat.coords().collect();
    assert_eq!(coords, vec![Coord::new(0, 0), Coord::new(0, 1)]);
    assert!(!boat.is_sunk());
}

#[test]
fn vertical_boat_grows_along_rows() {
    let boat = Boat::new(Coord::new(1, 5), 3, Orientation::Vertical).unwrap();
    let coords: Vec<_> = boat.coords().collect();
    assert_eq!(
        coords,
        vec![Coord::new(1, 5), Coord::new(2, 5), Coord::new(3, 5)]
    );
}

#[test]
fn boat_rejects_bad_length_and_bounds() {
    assert_eq!(
        Boat::new(Coord::new(0, 0), MIN_BOAT_LEN - 1, Orientation::Horizontal),
        Err(FleetError::InvalidBoatLength(MIN_BOAT_LEN - 1))
    );
    assert_eq!(
        Boat::new(Coord::new(0, 0), MAX_BOAT_LEN + 1, Orientation::Horizontal),
        Err(FleetError::InvalidBoatLength(MAX_BOAT_LEN + 1))
    );
    assert_eq!(
        Boat::new(Coord::new(0, 7), 2, Orientation::Horizontal),
        Err(FleetError::BoatOutOfBounds)
    );
    assert_eq!(
        Boat::new(Coord::new(6, 0), 3, Orientation::Vertical),
        Err(FleetError::BoatOutOfBounds)
    );
    // Touching the last row and column is fine.
    assert!(Boat::new(Coord::new(0, 6), 2, Orientation::Horizontal).is_ok());
    assert!(Boat::new(Coord::new(1, 7), 7, Orientation::Vertical).is_ok());
}

#[test]
fn single_boat_fleet_sinks_after_both_hits() {
    let boat = Boat::new(Coord::new(0, 0), 2, Orientation::Horizontal).unwrap();
    let mut fleet = Fleet::from_boats(vec![boat]).unwrap();

    assert!(fleet.record_shot(Coord::new(0, 0)));
    assert_eq!(fleet.remaining_boats().len(), 1);

    assert!(fleet.record_shot(Coord::new(0, 1)));
    assert!(fleet.remaining_boats().is_empty());
    assert!(fleet.all_sunk());
}

#[test]
fn miss_does_not_touch_the_fleet() {
    let boat = Boat::new(Coord::new(4, 4), 2, Orientation::Vertical).unwrap();
    let mut fleet = Fleet::from_boats(vec![boat]).unwrap();
    let before = fleet.clone();
    assert!(!fleet.record_shot(Coord::new(0, 0)));
    assert_eq!(fleet, before);
}

#[test]
fn from_boats_rejects_overlap_and_empty() {
    let a = Boat::new(Coord::new(2, 2), 3, Orientation::Horizontal).unwrap();
    let b = Boat::new(Coord::new(1, 3), 3, Orientation::Vertical).unwrap();
    assert_eq!(Fleet::from_boats(vec![a, b]), Err(FleetError::BoatOverlaps));
    assert_eq!(Fleet::from_boats(Vec::new()), Err(FleetError::InvalidFleetSize(0)));
}

#[test]
fn place_draws_requested_number_of_boats() {
    let mut rng = SmallRng::seed_from_u64(42);
    let fleet = Fleet::place(3, &mut rng).unwrap();
    assert_eq!(fleet.size(), 3);
    assert_eq!(fleet.boats().len(), 3);
    assert_eq!(fleet.remaining_count(), 3);
    for boat in fleet.boats() {
        assert!((MIN_BOAT_LEN as usize..=MAX_BOAT_LEN as usize).contains(&boat.len()));
    }
    let cells: usize = fleet.boats().iter().map(Boat::len).sum();
    assert_eq!(fleet.occupancy().count_ones(), cells);
}

#[test]
fn place_is_reproducible_for_a_seed() {
    let a = Fleet::place(3, &mut SmallRng::seed_from_u64(9)).unwrap();
    let b = Fleet::place(3, &mut SmallRng::seed_from_u64(9)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn place_rejects_empty_fleet() {
    let mut rng = SmallRng::seed_from_u64(1);
    assert_eq!(Fleet::place(0, &mut rng), Err(FleetError::InvalidFleetSize(0)));
}

#[test]
fn place_gives_up_when_the_grid_is_full() {
    // 64 cells cannot hold 40 boats of at least two cells each.
    let mut rng = SmallRng::seed_from_u64(3);
    match Fleet::place(40, &mut rng) {
        Err(FleetError::PlacementInfeasible { boat, attempts }) => {
            assert!(boat < 40);
            assert!(attempts > 0);
        }
        other => panic!("expected PlacementInfeasible, got {:?}", other),
    }
}

#[test]
fn reset_keeps_size_and_clears_hits() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut fleet = Fleet::place(2, &mut rng).unwrap();
    let target = fleet.boats()[0].origin();
    assert!(fleet.record_shot(target));
    assert!(!fleet.hit_mask().is_empty());

    fleet.reset(&mut rng).unwrap();
    assert_eq!(fleet.size(), 2);
    assert_eq!(fleet.remaining_count(), 2);
    assert!(fleet.hit_mask().is_empty());
}
