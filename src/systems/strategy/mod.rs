pub mod planner;

use tracing::debug;

use crate::resources::driver::Driver;
use crate::resources::race::RaceState;
use crate::resources::track::Track;
use crate::resources::vehicle::{TyreCompound, VehicleState};
use crate::utils::math::forward_gap;
use crate::utils::rng::RaceRng;

/// The decision window opens 1000 m before pit entry and closes 50 m before
/// it, leaving room to actually make the entry.
const DECISION_WINDOW_FAR: f64 = 1000.0;
const DECISION_WINDOW_NEAR: f64 = 50.0;

/// In-race pit decisions. The pre-race plan lives in [`planner`]; this pass
/// only sets `box_this_lap` while a car approaches the pit entry.
pub struct StrategySystem;

impl StrategySystem {
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
    ) {
        let rain = state.rain_intensity_level;
        let forecast_rain = forecast_mean_rain(state);
        let vehicle = &state.vehicles[index];
        if !vehicle.is_active() || vehicle.is_in_pit || vehicle.box_this_lap {
            return;
        }

        let to_entry = forward_gap(
            vehicle.distance_on_lap,
            track.pit_lane.entry_distance,
            track.total_distance,
        );
        if !(DECISION_WINDOW_NEAR..=DECISION_WINDOW_FAR).contains(&to_entry) {
            return;
        }
        // One evaluation per lap; the window is several seconds wide.
        if vehicle.pit_check_lap == vehicle.lap_count {
            return;
        }

        let driver = &drivers[index];
        let call_box = should_box(vehicle, driver, rain, forecast_rain, rng);

        let vehicle = &mut state.vehicles[index];
        vehicle.pit_check_lap = vehicle.lap_count;
        if call_box {
            vehicle.box_this_lap = true;
            debug!(driver = %vehicle.driver_id, lap = vehicle.lap_count, "boxing this lap");
        }
    }
}

impl Default for StrategySystem {
    fn default() -> Self {
        Self::new()
    }
}

fn should_box(
    vehicle: &VehicleState,
    driver: &Driver,
    rain: f64,
    forecast_rain: f64,
    rng: &mut RaceRng,
) -> bool {
    let compound = vehicle.tyre_compound;
    let mismatch = (compound.is_slick() && rain > 10.0) || (compound.is_rain() && rain < 10.0);
    if mismatch {
        // Forecast override: when the short-term forecast already calls for
        // the fitted compound, ride the shower out. Drowning slicks overrule.
        let forecast_agrees = forecast_agrees_with_current(compound, forecast_rain);
        if !forecast_agrees || (compound.is_slick() && rain > 40.0) {
            return true;
        }
    }
    if vehicle.damage > 15.0 || vehicle.tyre_wear > 85.0 {
        return true;
    }

    // Planned stop, with a probability ramp around the stint end lap.
    if vehicle.next_planned_stint().is_none() {
        return false;
    }
    let Some(stint) = vehicle.planned_stint() else {
        return false;
    };
    let delta = i64::from(vehicle.lap_count) - i64::from(stint.end_lap);
    if delta.abs() > 2 {
        return false;
    }
    let proximity = (2 - delta.abs()) as f64 / 2.0;
    let mut p = 0.2 + 0.2 * proximity + 0.3 * vehicle.tyre_wear / 100.0;
    if driver.personality.aggression > 60.0 {
        // The undercut call.
        p += 0.3;
    }
    rng.chance(p.min(0.95))
}

/// Mean forecast rain over the next five minutes, falling back to the live
/// intensity when the horizon is empty.
fn forecast_mean_rain(state: &RaceState) -> f64 {
    let now = state.elapsed_time;
    let mut sum = 0.0;
    let mut count = 0;
    for node in &state.weather_forecast {
        if node.time_offset >= now && node.time_offset <= now + 300.0 {
            sum += node.rain_intensity;
            count += 1;
        }
    }
    if count == 0 {
        state.rain_intensity_level
    } else {
        sum / f64::from(count)
    }
}

fn ideal_rain_compound(forecast_rain: f64) -> Option<TyreCompound> {
    if forecast_rain > 60.0 {
        Some(TyreCompound::Wet)
    } else if forecast_rain > 10.0 {
        Some(TyreCompound::Intermediate)
    } else {
        None
    }
}

/// Whether the currently fitted compound already matches what the short-term
/// forecast calls for.
fn forecast_agrees_with_current(current: TyreCompound, forecast_rain: f64) -> bool {
    match ideal_rain_compound(forecast_rain) {
        Some(ideal) => current == ideal,
        None => current.is_slick(),
    }
}

/// Compound fitted at pit release.
pub fn replacement_compound(rain: f64, vehicle: &VehicleState, total_laps: u32) -> TyreCompound {
    if rain > 60.0 {
        return TyreCompound::Wet;
    }
    if rain > 10.0 {
        return TyreCompound::Intermediate;
    }
    if let Some(next) = vehicle.next_planned_stint() {
        return next.compound;
    }
    let remaining = total_laps.saturating_sub(vehicle.lap_count);
    if remaining < 15 {
        TyreCompound::Soft
    } else if remaining < 30 {
        TyreCompound::Medium
    } else {
        TyreCompound::Hard
    }
}
