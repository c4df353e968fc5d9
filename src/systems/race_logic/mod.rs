pub mod awareness;
pub mod incidents;
pub mod overtake;
pub mod pit;

use tracing::info;

use crate::resources::driver::Driver;
use crate::resources::race::{
    RaceState, RaceStatus, SafetyCarStatus, SectorConditions, WeatherCondition, WeatherMode,
};
use crate::resources::track::Track;
use crate::resources::vehicle::VehicleState;
use crate::systems::strategy::planner;
use crate::systems::weather::WeatherSystem;
use crate::utils::math::in_span;
use crate::utils::rng::RaceRng;

const GRID_SLOT_SPACING: f64 = 16.0;

/// Everything about the race that is not weather, strategy, or raw physics:
/// neutralizations, the pit machine, DRS, overtakes, the leaderboard, the
/// drivers' heads, and the flag at the end.
pub struct RaceLogicSystem {
    neutralization_timer: f64,
}

impl RaceLogicSystem {
    pub fn new() -> Self {
        Self {
            neutralization_timer: 0.0,
        }
    }

    /// Pre-vehicle pass, in the contract order: safety car and incidents,
    /// pit machines, DRS, overtakes, positions, mental state, spatial
    /// awareness, finish detection.
    pub fn update(
        &mut self,
        state: &mut RaceState,
        track: &Track,
        drivers: &[Driver],
        rng: &mut RaceRng,
        dt: f64,
    ) {
        incidents::update_neutralization(
            state,
            track,
            drivers,
            &mut self.neutralization_timer,
            rng,
            dt,
        );
        pit::update_pit_vehicles(state, track, rng, dt);
        update_drs(state, track);
        overtake::attempt_overtakes(state, track, drivers, rng, dt);
        awareness::update_positions(state, track);
        awareness::update_mental_state(state, dt);
        awareness::update_spatial_awareness(state, track);
        check_finish(state);
    }
}

impl Default for RaceLogicSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the complete starting state: qualifying order, grid slots, day
/// form, initial weather, starting tyres, and stint plans. The draw order
/// from the shared stream is fixed and part of the replay contract.
pub fn initialize_race(
    track: &Track,
    drivers: &[Driver],
    rng: &mut RaceRng,
    weather: &mut WeatherSystem,
    seed: u32,
) -> RaceState {
    // Qualifying simulation, one draw per driver in roster order.
    let mut qualifying: Vec<(usize, f64)> = drivers
        .iter()
        .enumerate()
        .map(|(i, driver)| {
            let lap_time = driver.base_pace
                + (100.0 - driver.skills.consistency) * 0.005
                + rng.range(-0.4, 0.4);
            (i, lap_time)
        })
        .collect();
    qualifying.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut vehicles: Vec<VehicleState> = drivers.iter().map(VehicleState::new).collect();

    // Grid slots behind the line, front row first.
    for (slot, (driver_index, _)) in qualifying.iter().enumerate() {
        let vehicle = &mut vehicles[*driver_index];
        vehicle.distance_on_lap =
            track.total_distance - (slot as f64 + 1.0) * GRID_SLOT_SPACING + rng.range(-1.0, 1.0);
        vehicle.position = slot + 1;
        vehicle.last_position = slot + 1;
        vehicle.current_sector = track.sector_at(vehicle.distance_on_lap).0;
    }

    // Day form, one draw per driver in roster order.
    for vehicle in &mut vehicles {
        vehicle.condition = rng.range(0.99, 1.01);
    }

    let mut state = RaceState {
        id: format!("{}-{}", track.id, seed),
        track_id: track.id.clone(),
        current_lap: 1,
        total_laps: track.default_laps,
        weather: WeatherCondition::Dry,
        weather_mode: WeatherMode::Simulation,
        weather_forecast: Vec::new(),
        cloud_cover: 0.0,
        rain_intensity_level: 0.0,
        wind_speed: 0.0,
        wind_direction: 0.0,
        track_temp: track.base_temperature,
        air_temp: track.base_temperature,
        rubber_level: 50.0,
        track_water_depth: 0.0,
        sector_conditions: vec![
            SectorConditions {
                water_depth: 0.0,
                rubber_level: 50.0,
            };
            track.sectors.len()
        ],
        safety_car: SafetyCarStatus::None,
        vehicles,
        status: RaceStatus::PreRace,
        checkered_flag: false,
        winner_id: None,
        elapsed_time: 0.0,
    };

    weather.initialize(&mut state, track, rng);

    // Starting tyres from the opening weather, then the stint plans.
    let rain = state.rain_intensity_level;
    for (i, driver) in drivers.iter().enumerate() {
        state.vehicles[i].tyre_compound = planner::initial_compound(rain, driver, rng);
    }
    for (i, driver) in drivers.iter().enumerate() {
        let plan = planner::plan_for_driver(driver, track, state.total_laps, rng);
        if let Some(mode) = plan.first().and_then(|s| s.pace_mode) {
            state.vehicles[i].pace_mode = mode;
        }
        state.vehicles[i].stint_plan = plan;
    }

    info!(
        race = %state.id,
        drivers = drivers.len(),
        laps = state.total_laps,
        "race initialized"
    );
    state
}

/// DRS opens from lap three, in the dry, under green running, inside an
/// activation span, within a second of the car ahead, and never for the
/// leader.
fn update_drs(state: &mut RaceState, track: &Track) {
    let enabled = state.current_lap >= 3
        && state.weather == WeatherCondition::Dry
        && state.safety_car == SafetyCarStatus::None;
    for vehicle in &mut state.vehicles {
        if !enabled || !vehicle.is_active() || vehicle.is_in_pit {
            vehicle.drs_open = false;
            continue;
        }
        let in_zone = track.drs_zones.iter().any(|zone| {
            in_span(
                vehicle.distance_on_lap,
                zone.activation_distance,
                zone.end_distance,
                track.total_distance,
            )
        });
        vehicle.drs_open = in_zone && vehicle.position > 1 && vehicle.gap_to_ahead < 1.0;
    }
}

/// Raises the checkered flag on the leader's final line crossing and settles
/// the classification as the rest of the field comes home.
fn check_finish(state: &mut RaceState) {
    if !state.checkered_flag {
        let winner = state
            .vehicles
            .iter()
            .find(|v| v.position == 1 && v.is_active() && v.lap_count > state.total_laps)
            .map(|v| v.driver_id.clone());
        if let Some(winner_id) = winner {
            state.checkered_flag = true;
            state.winner_id = Some(winner_id.clone());
            info!(winner = %winner_id, "checkered flag");
        }
    }

    if state.checkered_flag {
        // Anyone over the full distance is home, whether physics flagged the
        // crossing or it happened on the very tick the flag came out.
        let total_laps = state.total_laps;
        for vehicle in &mut state.vehicles {
            if !vehicle.is_dnf() && vehicle.lap_count > total_laps {
                vehicle.has_finished = true;
            }
        }

        // Hand out classification ranks in current running order.
        let mut next_rank = state
            .vehicles
            .iter()
            .filter(|v| v.finish_rank.is_some())
            .count();
        let mut order: Vec<usize> = (0..state.vehicles.len())
            .filter(|&i| state.vehicles[i].has_finished && state.vehicles[i].finish_rank.is_none())
            .collect();
        order.sort_by_key(|&i| state.vehicles[i].position);
        for i in order {
            next_rank += 1;
            state.vehicles[i].finish_rank = Some(next_rank);
            info!(driver = %state.vehicles[i].driver_id, rank = next_rank, "finished");
        }
    }

    if state.status == RaceStatus::Racing
        && state
            .vehicles
            .iter()
            .all(|v| v.is_dnf() || v.has_finished)
    {
        state.status = RaceStatus::Finished;
        info!(winner = ?state.winner_id, "race complete");
    }
}
