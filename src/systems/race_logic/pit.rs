use tracing::{debug, info};

use crate::resources::race::RaceState;
use crate::resources::track::Track;
use crate::resources::vehicle::{PitPhase, VehicleState};
use crate::systems::physics::integrator::complete_lap;
use crate::systems::strategy;
use crate::utils::rng::RaceRng;

/// Drives every in-pit vehicle one tick through the lane machine:
/// `DrivingIn` → `Stopped` → `DrivingOut` → release. The car keeps moving
/// along the pit path during the driving phases so it renders continuously;
/// the odometer only accrues while it moves.
pub fn update_pit_vehicles(state: &mut RaceState, track: &Track, rng: &mut RaceRng, dt: f64) {
    let lane_time = track.pit_lane_time();
    let total_laps = state.total_laps;
    let rain = state.rain_intensity_level;
    let checkered = state.checkered_flag;

    for i in 0..state.vehicles.len() {
        let vehicle = &mut state.vehicles[i];
        if !vehicle.is_in_pit || vehicle.is_dnf() {
            continue;
        }
        vehicle.current_lap_time += dt;

        match vehicle.pit_phase {
            None => {
                vehicle.pit_phase = Some(PitPhase::DrivingIn {
                    remaining: lane_time / 2.0,
                });
                vehicle.speed = track.pit_lane.speed_limit;
            }
            Some(PitPhase::DrivingIn { remaining }) => {
                advance_along_lane(vehicle, track, checkered, dt);
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    let duration = stop_duration(vehicle, rng);
                    vehicle.speed = 0.0;
                    vehicle.pit_phase = Some(PitPhase::Stopped {
                        remaining: duration,
                    });
                    debug!(driver = %vehicle.driver_id, duration, "stationary in the box");
                } else {
                    vehicle.pit_phase = Some(PitPhase::DrivingIn { remaining });
                }
            }
            Some(PitPhase::Stopped { remaining }) => {
                vehicle.speed = 0.0;
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    vehicle.pit_phase = Some(PitPhase::DrivingOut {
                        remaining: lane_time / 2.0,
                    });
                    vehicle.speed = track.pit_lane.speed_limit;
                } else {
                    vehicle.pit_phase = Some(PitPhase::Stopped { remaining });
                }
            }
            Some(PitPhase::DrivingOut { remaining }) => {
                advance_along_lane(vehicle, track, checkered, dt);
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    release(vehicle, track, rain, total_laps, checkered);
                } else {
                    vehicle.pit_phase = Some(PitPhase::DrivingOut { remaining });
                }
            }
        }
    }
}

/// Base service takes 2.0-2.8 s; one stop in a hundred goes badly wrong, and
/// bodywork repairs add a fixed ten seconds.
fn stop_duration(vehicle: &VehicleState, rng: &mut RaceRng) -> f64 {
    let mut duration = rng.range(2.0, 2.8);
    if rng.chance(0.01) {
        duration += rng.range(4.0, 10.0);
    }
    if vehicle.damage > 10.0 {
        duration += 10.0;
    }
    duration
}

fn advance_along_lane(vehicle: &mut VehicleState, track: &Track, checkered: bool, dt: f64) {
    use crate::utils::math::forward_gap;
    vehicle.speed = track.pit_lane.speed_limit;
    // Never drive past the lane exit; a generous configured lane time means
    // waiting at the exit light instead of lapping the track.
    let to_exit = forward_gap(
        vehicle.distance_on_lap,
        track.pit_lane.exit_distance,
        track.total_distance,
    );
    let travelled = (vehicle.speed * dt).min(to_exit);
    vehicle.distance_on_lap += travelled;
    vehicle.total_distance += travelled;
    if vehicle.distance_on_lap >= track.total_distance {
        vehicle.distance_on_lap -= track.total_distance;
        complete_lap(vehicle, checkered);
    }
}

fn release(vehicle: &mut VehicleState, track: &Track, rain: f64, total_laps: u32, checkered: bool) {
    // If the configured lane time ran out before the car physically reached
    // the exit, account for the line crossing the snap would otherwise skip.
    // The car is still on the pre-line side exactly when it sits at or past
    // the lane entry of a line-spanning lane.
    if track.pit_lane.exit_distance < track.pit_lane.entry_distance
        && vehicle.distance_on_lap >= track.pit_lane.entry_distance
    {
        complete_lap(vehicle, checkered);
    }
    vehicle.distance_on_lap = track.pit_lane.exit_distance;
    vehicle.is_in_pit = false;
    vehicle.pit_phase = None;
    vehicle.pit_stop_count += 1;
    vehicle.box_this_lap = false;
    vehicle.tyre_wear = 0.0;
    vehicle.tyre_age_laps = 0;
    vehicle.damage = 0.0;
    vehicle.tyre_compound = strategy::replacement_compound(rain, vehicle, total_laps);
    vehicle.current_stint = (vehicle.current_stint + 1).min(vehicle.stint_plan.len());
    if let Some(mode) = vehicle.planned_stint().and_then(|s| s.pace_mode) {
        vehicle.pace_mode = mode;
    }
    vehicle.speed = track.pit_lane.speed_limit;
    info!(
        driver = %vehicle.driver_id,
        stop = vehicle.pit_stop_count,
        compound = ?vehicle.tyre_compound,
        "released from the pit lane"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::driver::{Driver, PerformanceSet, Personality, SkillSet};
    use crate::resources::race::{
        RaceStatus, SafetyCarStatus, SectorConditions, WeatherCondition, WeatherMode,
    };
    use crate::resources::track::{PitLane, Sector, SectorType, WeatherParams};
    use crate::resources::vehicle::TyreCompound;

    fn test_driver() -> Driver {
        Driver {
            id: "d1".into(),
            name: "D".into(),
            team: "T".into(),
            color: "#fff".into(),
            base_pace: 88.0,
            skills: SkillSet {
                racecraft: 80.0,
                consistency: 80.0,
                tyre_management: 80.0,
                wet_weather: 80.0,
            },
            performance: PerformanceSet {
                cornering_high: 85.0,
                cornering_medium: 85.0,
                cornering_low: 85.0,
                straight: 85.0,
                temperature_adaptability: 85.0,
            },
            personality: Personality {
                aggression: 50.0,
                stress_resistance: 60.0,
                team_player: 50.0,
            },
            morale: 80.0,
            trust: 80.0,
        }
    }

    fn test_track() -> Track {
        Track {
            id: "t".into(),
            name: "T".into(),
            total_distance: 5000.0,
            default_laps: 50,
            tire_degradation_factor: 1.0,
            overtaking_difficulty: 0.5,
            track_difficulty: 0.5,
            base_temperature: 25.0,
            latitude: None,
            longitude: None,
            weather: WeatherParams {
                volatility: 0.3,
                rain_probability: 0.1,
            },
            sectors: vec![Sector {
                id: 1,
                name: "lap".into(),
                start_distance: 0.0,
                end_distance: 5000.0,
                sector_type: SectorType::Straight,
                difficulty: 0.2,
                max_speed: None,
            }],
            drs_zones: vec![],
            pit_lane: PitLane {
                entry_distance: 4800.0,
                exit_distance: 200.0,
                speed_limit: 22.0,
                lane_time: 23.0,
            },
        }
    }

    fn pitting_state(driver: &Driver) -> RaceState {
        let mut vehicle = VehicleState::new(driver);
        vehicle.is_in_pit = true;
        vehicle.box_this_lap = true;
        vehicle.distance_on_lap = 4810.0;
        vehicle.lap_count = 10;
        vehicle.tyre_wear = 70.0;
        vehicle.tyre_age_laps = 14;
        vehicle.speed = 22.0;
        RaceState {
            id: "race".into(),
            track_id: "t".into(),
            current_lap: 10,
            total_laps: 50,
            weather: WeatherCondition::Dry,
            weather_mode: WeatherMode::Simulation,
            weather_forecast: Vec::new(),
            cloud_cover: 0.0,
            rain_intensity_level: 0.0,
            wind_speed: 0.0,
            wind_direction: 0.0,
            track_temp: 30.0,
            air_temp: 24.0,
            rubber_level: 50.0,
            track_water_depth: 0.0,
            sector_conditions: vec![SectorConditions {
                water_depth: 0.0,
                rubber_level: 50.0,
            }],
            safety_car: SafetyCarStatus::None,
            vehicles: vec![vehicle],
            status: RaceStatus::Racing,
            checkered_flag: false,
            winner_id: None,
            elapsed_time: 900.0,
        }
    }

    fn run_until_released(state: &mut RaceState, track: &Track, rng: &mut RaceRng) -> usize {
        let mut ticks = 0;
        while state.vehicles[0].is_in_pit {
            update_pit_vehicles(state, track, rng, 0.1);
            ticks += 1;
            assert!(ticks < 10_000, "pit stop never completed");
        }
        ticks
    }

    #[test]
    fn test_full_stop_sequence() {
        let driver = test_driver();
        let track = test_track();
        let mut state = pitting_state(&driver);
        let mut rng = RaceRng::new(7);

        let ticks = run_until_released(&mut state, &track, &mut rng);
        let vehicle = &state.vehicles[0];
        assert_eq!(vehicle.pit_stop_count, 1);
        assert!(!vehicle.box_this_lap);
        assert_eq!(vehicle.tyre_wear, 0.0);
        assert_eq!(vehicle.tyre_age_laps, 0);
        assert_eq!(vehicle.damage, 0.0);
        approx::assert_relative_eq!(vehicle.distance_on_lap, 200.0);
        // 23 s of lane plus at least 2 s stationary.
        let elapsed = ticks as f64 * 0.1;
        assert!((25.0..40.0).contains(&elapsed), "took {} s", elapsed);
    }

    #[test]
    fn test_lane_crosses_the_finish_line() {
        let driver = test_driver();
        let track = test_track();
        let mut state = pitting_state(&driver);
        let mut rng = RaceRng::new(7);
        let lap_before = state.vehicles[0].lap_count;

        run_until_released(&mut state, &track, &mut rng);
        assert_eq!(state.vehicles[0].lap_count, lap_before + 1);
    }

    #[test]
    fn test_odometer_frozen_while_stationary() {
        let driver = test_driver();
        let track = test_track();
        let mut state = pitting_state(&driver);
        let mut rng = RaceRng::new(7);

        // Drive in for half the lane time.
        for _ in 0..120 {
            update_pit_vehicles(&mut state, &track, &mut rng, 0.1);
            if matches!(state.vehicles[0].pit_phase, Some(PitPhase::Stopped { .. })) {
                break;
            }
        }
        assert!(matches!(
            state.vehicles[0].pit_phase,
            Some(PitPhase::Stopped { .. })
        ));
        let odo = state.vehicles[0].total_distance;
        update_pit_vehicles(&mut state, &track, &mut rng, 0.1);
        if matches!(state.vehicles[0].pit_phase, Some(PitPhase::Stopped { .. })) {
            assert_eq!(state.vehicles[0].total_distance, odo);
            assert_eq!(state.vehicles[0].speed, 0.0);
        }
    }

    #[test]
    fn test_damage_adds_repair_time() {
        let driver = test_driver();
        let track = test_track();

        let mut clean = pitting_state(&driver);
        let mut rng_a = RaceRng::new(3);
        let clean_ticks = run_until_released(&mut clean, &track, &mut rng_a);

        let mut damaged = pitting_state(&driver);
        damaged.vehicles[0].damage = 40.0;
        let mut rng_b = RaceRng::new(3);
        let damaged_ticks = run_until_released(&mut damaged, &track, &mut rng_b);

        assert!(
            damaged_ticks >= clean_ticks + 95,
            "repairs should add ~10 s: {} vs {}",
            damaged_ticks,
            clean_ticks
        );
        assert_eq!(damaged.vehicles[0].damage, 0.0);
    }

    #[test]
    fn test_release_compound_in_rain() {
        let driver = test_driver();
        let track = test_track();
        let mut state = pitting_state(&driver);
        state.rain_intensity_level = 80.0;
        let mut rng = RaceRng::new(9);

        run_until_released(&mut state, &track, &mut rng);
        assert_eq!(state.vehicles[0].tyre_compound, TyreCompound::Wet);
    }

    #[test]
    fn test_stint_index_advances_on_release() {
        use crate::resources::vehicle::StrategyStint;
        let driver = test_driver();
        let track = test_track();
        let mut state = pitting_state(&driver);
        state.vehicles[0].stint_plan = vec![
            StrategyStint {
                compound: TyreCompound::Soft,
                start_lap: 1,
                end_lap: 14,
                pace_mode: None,
            },
            StrategyStint {
                compound: TyreCompound::Hard,
                start_lap: 15,
                end_lap: 50,
                pace_mode: Some(crate::resources::vehicle::PaceMode::Conservative),
            },
        ];
        let mut rng = RaceRng::new(11);

        run_until_released(&mut state, &track, &mut rng);
        let vehicle = &state.vehicles[0];
        assert_eq!(vehicle.current_stint, 1);
        assert_eq!(vehicle.tyre_compound, TyreCompound::Hard);
        assert_eq!(
            vehicle.pace_mode,
            crate::resources::vehicle::PaceMode::Conservative
        );
    }
}
