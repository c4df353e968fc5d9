use tracing::debug;

use crate::resources::driver::Driver;
use crate::resources::race::RaceState;
use crate::resources::track::Track;
use crate::utils::rng::RaceRng;

/// A move only goes in from point-blank range.
const ATTACK_GAP: f64 = 0.2;

/// Probabilistic wheel-to-wheel resolution. A battling car within two tenths
/// of the one ahead rolls a per-second success probability built from skill,
/// speed, DRS, and tyre-age deltas; racing chaos replaces the score entirely
/// on 30% of ticks. Success gives the attacker a burst of speed and releases
/// the battle flag so the integration completes the pass naturally.
pub fn attempt_overtakes(
    state: &mut RaceState,
    track: &Track,
    drivers: &[Driver],
    rng: &mut RaceRng,
    dt: f64,
) {
    for i in 0..state.vehicles.len() {
        let attacker = &state.vehicles[i];
        if !attacker.is_active()
            || attacker.is_in_pit
            || !attacker.is_battling
            || attacker.position <= 1
            || attacker.gap_to_ahead > ATTACK_GAP
        {
            continue;
        }
        let Some(j) = state
            .vehicles
            .iter()
            .position(|v| v.position + 1 == attacker.position)
        else {
            continue;
        };
        let defender = &state.vehicles[j];
        if !defender.is_active() || defender.is_in_pit {
            continue;
        }

        let probability_per_second = if rng.chance(0.3) {
            // A lunge, a lockup, a half-open door: pure coin flip.
            0.5
        } else {
            let score = attack_score(
                &drivers[i],
                &drivers[j],
                attacker.speed - defender.speed,
                attacker.drs_open,
                f64::from(defender.tyre_age_laps) - f64::from(attacker.tyre_age_laps),
                track.overtaking_difficulty,
            );
            success_probability(score)
        };

        if rng.chance(probability_per_second * dt) {
            let attacker_id = state.vehicles[i].driver_id.clone();
            let defender_id = state.vehicles[j].driver_id.clone();
            let vehicle = &mut state.vehicles[i];
            vehicle.speed = (vehicle.speed + 5.0).min(150.0);
            vehicle.is_battling = false;
            debug!(attacker = %attacker_id, defender = %defender_id, "overtake completed");
        } else if rng.chance(0.1) {
            // Botched attempt; scrubbed speed off the racing line.
            let vehicle = &mut state.vehicles[i];
            vehicle.speed *= 0.95;
        }
    }
}

fn attack_score(
    attacker: &Driver,
    defender: &Driver,
    speed_delta: f64,
    drs_open: bool,
    tyre_age_delta: f64,
    overtaking_difficulty: f64,
) -> f64 {
    20.0 + 0.5 * (attacker.skills.racecraft - defender.skills.racecraft)
        + 2.0 * speed_delta
        + if drs_open { 30.0 } else { 0.0 }
        + 1.5 * tyre_age_delta
        - 20.0 * overtaking_difficulty
}

/// Per-second success probability from the raw attack score.
fn success_probability(score: f64) -> f64 {
    (0.20 + 0.5 * score / 100.0).clamp(0.05, 0.95)
}
