use std::cmp::Ordering;

use crate::resources::race::RaceState;
use crate::resources::track::Track;
use crate::utils::math::forward_gap;

/// Speed floor for gap math so stationary cars do not produce infinite gaps.
const GAP_SPEED_FLOOR: f64 = 20.0;

const DIRTY_AIR_GAP: f64 = 1.5;
const BATTLE_GAP: f64 = 0.4;
const BLUE_FLAG_GAP: f64 = 1.2;

/// Leaderboard ordering and gap bookkeeping. Finished cars keep their frozen
/// classification ahead of everyone still running; the rest sort on
/// cumulative race distance.
pub fn update_positions(state: &mut RaceState, track: &Track) {
    let total = track.total_distance;
    let mut order: Vec<usize> = (0..state.vehicles.len()).collect();
    order.sort_by(|&a, &b| {
        let va = &state.vehicles[a];
        let vb = &state.vehicles[b];
        match (va.finish_rank, vb.finish_rank) {
            (Some(ra), Some(rb)) => ra.cmp(&rb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => vb
                .race_distance(total)
                .partial_cmp(&va.race_distance(total))
                .unwrap_or(Ordering::Equal),
        }
    });

    for (rank, &i) in order.iter().enumerate() {
        let vehicle = &mut state.vehicles[i];
        let new_position = rank + 1;
        vehicle.last_position = vehicle.position;
        vehicle.position = new_position;
        if vehicle.last_position != 0 && new_position != vehicle.last_position {
            if new_position < vehicle.last_position {
                vehicle.morale = (vehicle.morale + 10.0).min(100.0);
                vehicle.concentration = (vehicle.concentration - 5.0).max(0.0);
            } else {
                vehicle.morale = (vehicle.morale - 10.0).max(0.0);
                vehicle.concentration = (vehicle.concentration - 10.0).max(0.0);
            }
        }
    }

    let leader_distance = state.vehicles[order[0]].race_distance(total);
    let mut ahead_distance = leader_distance;
    for (rank, &i) in order.iter().enumerate() {
        let own_distance = state.vehicles[i].race_distance(total);
        let vehicle = &mut state.vehicles[i];
        if rank == 0 {
            vehicle.gap_to_leader = 0.0;
            vehicle.gap_to_ahead = 0.0;
        } else {
            let speed = vehicle.speed.max(GAP_SPEED_FLOOR);
            vehicle.gap_to_leader = ((leader_distance - own_distance) / speed).max(0.0);
            vehicle.gap_to_ahead = ((ahead_distance - own_distance) / speed).max(0.0);
        }
        ahead_distance = own_distance;
    }

    if let Some(leader) = state.vehicles.get(order[0]) {
        state.current_lap = leader.lap_count.max(1).min(state.total_laps);
    }
}

/// Physical proximity flags, blind to lap counts: the strip of tarmac is a
/// circle and only the car directly ahead or behind on it matters.
pub fn update_spatial_awareness(state: &mut RaceState, track: &Track) {
    let total = track.total_distance;

    for vehicle in &mut state.vehicles {
        vehicle.in_dirty_air = false;
        vehicle.is_battling = false;
        vehicle.blue_flag = false;
    }

    let mut on_track: Vec<usize> = (0..state.vehicles.len())
        .filter(|&i| {
            let v = &state.vehicles[i];
            v.is_active() && !v.is_in_pit
        })
        .collect();
    if on_track.len() < 2 {
        return;
    }
    on_track.sort_by(|&a, &b| {
        state.vehicles[b]
            .distance_on_lap
            .partial_cmp(&state.vehicles[a].distance_on_lap)
            .unwrap_or(Ordering::Equal)
    });

    let n = on_track.len();
    for k in 0..n {
        let i = on_track[k];
        let ahead = on_track[(k + n - 1) % n];
        let behind = on_track[(k + 1) % n];

        let own = &state.vehicles[i];
        let gap_ahead = forward_gap(
            own.distance_on_lap,
            state.vehicles[ahead].distance_on_lap,
            total,
        ) / own.speed.max(GAP_SPEED_FLOOR);

        let behind_vehicle = &state.vehicles[behind];
        let gap_behind = forward_gap(
            behind_vehicle.distance_on_lap,
            own.distance_on_lap,
            total,
        ) / behind_vehicle.speed.max(GAP_SPEED_FLOOR);
        let lapped_by_behind = behind_vehicle.lap_count > own.lap_count;

        let vehicle = &mut state.vehicles[i];
        vehicle.in_dirty_air = gap_ahead < DIRTY_AIR_GAP;
        vehicle.is_battling = gap_ahead < BATTLE_GAP;
        vehicle.blue_flag = lapped_by_behind && gap_behind < BLUE_FLAG_GAP;
    }
}

/// Slow drifts of the mind: morale settles toward 80, dirty air grinds it
/// down, an attack within half a second feeds it. Concentration recovers
/// between stress spikes, except through the lap-one opening chaos.
pub fn update_mental_state(state: &mut RaceState, dt: f64) {
    let opening_lap = state.current_lap == 1;
    for vehicle in &mut state.vehicles {
        if !vehicle.is_active() || vehicle.is_in_pit {
            continue;
        }

        let mut morale = vehicle.morale + 0.01 * dt * (80.0 - vehicle.morale);
        if vehicle.in_dirty_air {
            morale -= 0.5 * dt;
        }
        if vehicle.position > 1 && vehicle.gap_to_ahead < 0.5 {
            morale += 0.2 * dt;
        }
        vehicle.morale = morale.clamp(0.0, 100.0);

        let mut concentration_rate = 5.0;
        if opening_lap && vehicle.current_sector == 1 {
            concentration_rate = -10.0;
        }
        if vehicle.is_battling {
            concentration_rate -= 2.0;
        }
        if vehicle.in_dirty_air {
            concentration_rate -= 1.0;
        }
        vehicle.concentration = (vehicle.concentration + concentration_rate * dt).clamp(0.0, 100.0);

        let stress_rate = if vehicle.is_battling {
            2.0
        } else if vehicle.in_dirty_air {
            1.0
        } else {
            -1.0
        };
        vehicle.stress = (vehicle.stress + stress_rate * dt).clamp(0.0, 100.0);
    }
}
