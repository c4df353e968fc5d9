pub mod integrator;
pub mod target_speed;

use tracing::debug;

use crate::resources::driver::Driver;
use crate::resources::race::RaceState;
use crate::resources::track::{SectorType, Track};
use crate::resources::vehicle::{ErsMode, SpeedSample};
use crate::systems::tyres;
use crate::utils::math::forward_gap;
use crate::utils::rng::RaceRng;

use target_speed::{AheadInfo, SectorInfo, SpeedContext};

const FUEL_BURN_RATE: f64 = 0.016;
const TELEMETRY_SAMPLE_SPACING: f64 = 50.0;
const PIT_ENTRY_WINDOW: f64 = 50.0;

/// Longitudinal dynamics, motion integration, and resource consumption for
/// one vehicle per tick. Vehicles in the pit lane, retired, or across the
/// finish line are not passed here.
pub struct PhysicsSystem;

impl PhysicsSystem {
    pub fn new() -> Self {
        Self
    }

    pub fn update_vehicle(
        &self,
        state: &mut RaceState,
        track: &Track,
        drivers: &[Driver],
        rng: &mut RaceRng,
        index: usize,
        dt: f64,
    ) {
        let (sector_info, ahead, water, noise) = {
            let vehicle = &state.vehicles[index];
            let (number, sector) = track.sector_at(vehicle.distance_on_lap);
            let info = SectorInfo {
                number,
                sector_type: sector.sector_type,
                difficulty: sector.difficulty,
                max_speed: sector.max_speed,
            };
            let ahead = if vehicle.position > 1 {
                state
                    .vehicles
                    .iter()
                    .enumerate()
                    .find(|(_, other)| other.position + 1 == vehicle.position)
                    .map(|(j, other)| AheadInfo {
                        speed: other.speed,
                        base_pace: drivers[j].base_pace,
                    })
            } else {
                None
            };
            let water = state.sector_water(number);
            let amplitude =
                target_speed::noise_amplitude(&drivers[index], info.sector_type, state.safety_car);
            (info, ahead, water, rng.range(-amplitude, amplitude))
        };

        let ctx = SpeedContext {
            driver: &drivers[index],
            sector: sector_info,
            ahead,
            track_temp: state.track_temp,
            safety_car: state.safety_car,
            race_lap: state.current_lap,
            noise,
        };
        let target = target_speed::compute(&state.vehicles[index], track, &ctx);

        let checkered = state.checkered_flag;
        let vehicle = &mut state.vehicles[index];

        let grip = tyres::grip_factor(vehicle.tyre_compound, vehicle.tyre_wear, water);
        let slipstream_gap = if sector_info.sector_type == SectorType::Straight
            && vehicle.position > 1
        {
            Some(vehicle.gap_to_ahead)
        } else {
            None
        };
        let acceleration =
            integrator::max_acceleration(vehicle.speed, grip, vehicle.drs_open, slipstream_gap);
        let braking = integrator::max_braking(vehicle.speed, grip);
        vehicle.speed = integrator::step_speed(vehicle.speed, target, acceleration, braking, dt);

        // Motion along the lap, wrapping at the line
        let travelled = vehicle.speed * dt;
        vehicle.distance_on_lap += travelled;
        vehicle.total_distance += travelled;
        vehicle.current_lap_time += dt;
        if vehicle.distance_on_lap >= track.total_distance {
            vehicle.distance_on_lap -= track.total_distance;
            integrator::complete_lap(vehicle, checkered);
        }

        // Pit entry is position gated; the pit machine owns the car afterwards
        if vehicle.box_this_lap && !vehicle.is_in_pit {
            let past_entry = forward_gap(
                track.pit_lane.entry_distance,
                vehicle.distance_on_lap,
                track.total_distance,
            );
            if past_entry <= PIT_ENTRY_WINDOW {
                vehicle.is_in_pit = true;
                vehicle.speed = vehicle.speed.min(track.pit_lane.speed_limit);
                debug!(driver = %vehicle.driver_id, "entering the pit lane");
            }
        }

        vehicle.current_sector = track.sector_at(vehicle.distance_on_lap).0;

        if vehicle.total_distance - vehicle.last_sample_odometer > TELEMETRY_SAMPLE_SPACING {
            vehicle.current_lap_trace.push(SpeedSample {
                distance: vehicle.distance_on_lap,
                speed: vehicle.speed,
            });
            vehicle.last_sample_odometer = vehicle.total_distance;
        }

        // Consumables
        let wear = tyres::wear_rate(vehicle.tyre_compound, track, vehicle.pace_mode, vehicle.tyre_wear);
        vehicle.tyre_wear = (vehicle.tyre_wear + wear * dt).min(100.0);
        vehicle.fuel_load =
            (vehicle.fuel_load - FUEL_BURN_RATE * vehicle.pace_mode.consumption_factor() * dt).max(0.0);
        match vehicle.ers_mode {
            ErsMode::Deploy => vehicle.ers_level -= 2.0 * dt,
            ErsMode::Harvest => vehicle.ers_level += 1.5 * dt,
            ErsMode::Balanced => vehicle.ers_level += 0.1 * dt,
        }
        if vehicle.ers_level <= 0.0 {
            vehicle.ers_level = 0.0;
            vehicle.ers_mode = ErsMode::Balanced;
        }
        vehicle.ers_level = vehicle.ers_level.min(100.0);
    }
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::new()
    }
}
