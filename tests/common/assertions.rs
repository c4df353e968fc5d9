use racesim::{RaceState, Track};

/// The invariants that must hold after every tick, straight from the
/// engine's contract.
pub fn assert_state_valid(state: &RaceState, track: &Track) {
    let n = state.vehicles.len();
    let mut seen_positions = vec![false; n];

    for vehicle in &state.vehicles {
        let id = &vehicle.driver_id;
        assert!(
            (0.0..=100.0).contains(&vehicle.tyre_wear),
            "{}: tyre wear {}",
            id,
            vehicle.tyre_wear
        );
        assert!(
            (0.0..=100.0).contains(&vehicle.fuel_load),
            "{}: fuel {}",
            id,
            vehicle.fuel_load
        );
        assert!(
            (0.0..=100.0).contains(&vehicle.ers_level),
            "{}: ers {}",
            id,
            vehicle.ers_level
        );
        assert!(
            (0.0..=100.0).contains(&vehicle.morale),
            "{}: morale {}",
            id,
            vehicle.morale
        );
        assert!(
            (0.0..=100.0).contains(&vehicle.concentration),
            "{}: concentration {}",
            id,
            vehicle.concentration
        );
        assert!(
            (0.0..=150.0).contains(&vehicle.speed),
            "{}: speed {}",
            id,
            vehicle.speed
        );
        assert!(
            vehicle.distance_on_lap >= 0.0 && vehicle.distance_on_lap < track.total_distance,
            "{}: distance {} outside [0, {})",
            id,
            vehicle.distance_on_lap,
            track.total_distance
        );
        assert!(
            vehicle.position >= 1 && vehicle.position <= n,
            "{}: position {}",
            id,
            vehicle.position
        );
        assert!(
            !seen_positions[vehicle.position - 1],
            "duplicate position {}",
            vehicle.position
        );
        seen_positions[vehicle.position - 1] = true;
    }

    // Running order matches cumulative race distance for cars still racing.
    // Positions are assigned before the physics substep moves the field, so
    // a freshly completed pass may lag the leaderboard by one substep; 15 m
    // is the largest ground any car can make up in 0.1 s.
    let mut running: Vec<&racesim::VehicleState> = state
        .vehicles
        .iter()
        .filter(|v| v.finish_rank.is_none())
        .collect();
    running.sort_by_key(|v| v.position);
    for pair in running.windows(2) {
        let ahead = pair[0].race_distance(track.total_distance);
        let behind = pair[1].race_distance(track.total_distance);
        assert!(
            ahead >= behind - 15.0,
            "{} (P{}) behind {} (P{}) on distance: {} < {}",
            pair[0].driver_id,
            pair[0].position,
            pair[1].driver_id,
            pair[1].position,
            ahead,
            behind
        );
    }

    if state.checkered_flag {
        let p1 = state
            .vehicles
            .iter()
            .find(|v| v.position == 1)
            .expect("leader");
        if let Some(winner) = &state.winner_id {
            assert_eq!(
                &p1.driver_id, winner,
                "after the flag only the winner holds P1"
            );
        }
    }
}
