use tracing::{info, warn};

use crate::resources::driver::Driver;
use crate::resources::race::{RaceState, SafetyCarStatus};
use crate::resources::track::{SectorType, Track};
use crate::resources::vehicle::VehicleState;
use crate::utils::rng::RaceRng;

const BASE_RISK_PER_SECOND: f64 = 1e-5;

/// Ticks the active neutralization timer or, under green running, samples at
/// most one new incident across the field.
pub fn update_neutralization(
    state: &mut RaceState,
    track: &Track,
    drivers: &[Driver],
    timer: &mut f64,
    rng: &mut RaceRng,
    dt: f64,
) {
    match state.safety_car {
        SafetyCarStatus::None => sample_incident(state, track, drivers, timer, rng, dt),
        SafetyCarStatus::RedFlag => {
            *timer -= dt;
            if *timer <= 0.0 {
                red_flag_restart(state, track);
                state.safety_car = SafetyCarStatus::None;
                info!("red flag lifted, field re-gridded for the restart");
            }
        }
        SafetyCarStatus::Sc | SafetyCarStatus::Vsc => {
            *timer -= dt;
            if *timer <= 0.0 {
                state.safety_car = SafetyCarStatus::None;
                info!("green flag, racing resumes");
            }
        }
    }
}

fn sample_incident(
    state: &mut RaceState,
    track: &Track,
    drivers: &[Driver],
    timer: &mut f64,
    rng: &mut RaceRng,
    dt: f64,
) {
    let rain = state.rain_intensity_level;
    for i in 0..state.vehicles.len() {
        let vehicle = &state.vehicles[i];
        if !vehicle.is_active() || vehicle.is_in_pit {
            continue;
        }
        let risk = BASE_RISK_PER_SECOND * dt * risk_factor(vehicle, &drivers[i], rain, track);
        if rng.chance(risk) {
            trigger_incident(state, track, timer, rng, i);
            // One incident per tick at most.
            break;
        }
    }
}

/// Context multipliers on the base incident risk. Everything that loads a
/// driver up makes the number bigger.
fn risk_factor(vehicle: &VehicleState, driver: &Driver, rain: f64, track: &Track) -> f64 {
    let mut factor = 1.0;
    factor *= 1.0 + (100.0 - vehicle.concentration) / 100.0 * 9.0;
    if vehicle.is_battling {
        factor *= 4.0;
        if driver.personality.aggression > 70.0 {
            factor *= 1.5;
        }
    }
    if vehicle.in_dirty_air {
        factor *= 1.5;
    }
    if vehicle.tyre_wear > 70.0 {
        factor *= 1.0 + (vehicle.tyre_wear - 70.0) / 30.0 * 2.0;
    }
    if vehicle.tyre_compound.is_slick() && rain > 10.0 {
        factor *= 10.0;
    } else if vehicle.tyre_compound.is_rain() && rain > 5.0 {
        factor *= 2.0;
    }
    factor *= 1.0 + (100.0 - driver.skills.consistency) / 100.0 * 3.0;
    factor *= 1.0
        + (vehicle.stress / 100.0) * (1.0 - driver.personality.stress_resistance / 100.0) * 2.0;
    factor *= 1.0 + track.track_difficulty * 0.5;
    factor
}

fn sector_severity_weight(sector_type: SectorType) -> f64 {
    match sector_type {
        SectorType::Straight => 10.0,
        SectorType::CornerHighSpeed => 20.0,
        SectorType::CornerMediumSpeed => 15.0,
        SectorType::CornerLowSpeed => 5.0,
    }
}

fn trigger_incident(
    state: &mut RaceState,
    track: &Track,
    timer: &mut f64,
    rng: &mut RaceRng,
    index: usize,
) {
    let sector_type = track
        .sector_at(state.vehicles[index].distance_on_lap)
        .1
        .sector_type;
    let vehicle = &mut state.vehicles[index];
    let severity =
        vehicle.speed / 150.0 * 50.0 + sector_severity_weight(sector_type) + rng.range(0.0, 30.0);

    if severity > 80.0 {
        vehicle.damage = 100.0;
        vehicle.speed = 0.0;
        state.safety_car = SafetyCarStatus::RedFlag;
        *timer = rng.range(15.0, 45.0);
        warn!(driver = %state.vehicles[index].driver_id, severity, "major crash, red flag");
    } else if severity > 50.0 {
        if rng.chance(0.7) {
            vehicle.damage = 100.0;
            vehicle.speed = 0.0;
        } else {
            vehicle.damage = (vehicle.damage + rng.range(30.0, 60.0)).min(100.0);
        }
        state.safety_car = SafetyCarStatus::Sc;
        *timer = rng.range(180.0, 400.0);
        warn!(driver = %state.vehicles[index].driver_id, severity, "incident, safety car deployed");
    } else {
        vehicle.damage = (vehicle.damage + rng.range(5.0, 20.0)).min(100.0);
        vehicle.speed *= 0.3;
        state.safety_car = SafetyCarStatus::Vsc;
        *timer = rng.range(45.0, 120.0);
        info!(driver = %state.vehicles[index].driver_id, severity, "minor incident, virtual safety car");
    }
}

/// Standing restart after a red flag: survivors re-grid by current position
/// at 16 m spacing short of the line, everyone unlapped onto the leader's
/// lap, transient flags wiped.
pub fn red_flag_restart(state: &mut RaceState, track: &Track) {
    let mut order: Vec<usize> = (0..state.vehicles.len())
        .filter(|&i| {
            let v = &state.vehicles[i];
            v.is_active()
        })
        .collect();
    order.sort_by_key(|&i| state.vehicles[i].position);

    let leader_lap = order
        .iter()
        .map(|&i| state.vehicles[i].lap_count)
        .max()
        .unwrap_or(0);

    for (slot, &i) in order.iter().enumerate() {
        let vehicle = &mut state.vehicles[i];
        vehicle.distance_on_lap = track.total_distance - (slot as f64 + 1.0) * 16.0;
        vehicle.lap_count = leader_lap;
        vehicle.speed = 0.0;
        vehicle.gap_to_leader = 0.0;
        vehicle.gap_to_ahead = 0.0;
        vehicle.drs_open = false;
        vehicle.in_dirty_air = false;
        vehicle.is_battling = false;
        vehicle.blue_flag = false;
        vehicle.is_in_pit = false;
        vehicle.pit_phase = None;
        vehicle.box_this_lap = false;
        vehicle.current_lap_time = 0.0;
        vehicle.current_sector = track.sector_at(vehicle.distance_on_lap).0;
    }
}
