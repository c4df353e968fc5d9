use crate::resources::vehicle::VehicleState;

pub const ENGINE_POWER: f64 = 750_000.0;
pub const VEHICLE_MASS: f64 = 800.0;
pub const AIR_DENSITY: f64 = 1.225;
pub const DRAG_AREA: f64 = 1.6;
pub const GRAVITY: f64 = 9.81;
pub const MAX_SPEED: f64 = 150.0;

const ROLLING_RESISTANCE: f64 = 0.1;

/// Maximum forward acceleration at the current speed: engine power against
/// the traction circle, minus aero drag and rolling resistance. Negative when
/// drag-limited.
pub fn max_acceleration(speed: f64, grip: f64, drs_open: bool, slipstream_gap: Option<f64>) -> f64 {
    let engine = ENGINE_POWER / (VEHICLE_MASS * speed.max(10.0));
    let traction_limit = GRAVITY * 1.3;

    let mut drag = 0.5 * AIR_DENSITY * DRAG_AREA * speed * speed;
    if drs_open {
        drag *= 0.75;
    }
    if let Some(gap) = slipstream_gap {
        if gap < 1.0 {
            let max_reduction = if drs_open { 0.08 } else { 0.15 };
            drag *= 1.0 - max_reduction * (1.0 - gap).clamp(0.0, 1.0);
        }
    }

    engine.min(traction_limit) * grip - drag / VEHICLE_MASS - ROLLING_RESISTANCE
}

/// Maximum deceleration: mechanical braking plus aerodynamic contribution,
/// scaled by grip.
pub fn max_braking(speed: f64, grip: f64) -> f64 {
    (15.0 + 0.005 * speed * speed) * grip
}

/// One speed step toward `target`. Acceleration may be negative (drag
/// limited) and still counts as the "accelerating" branch; clamping never
/// overshoots the target from either side.
pub fn step_speed(speed: f64, target: f64, acceleration: f64, braking: f64, dt: f64) -> f64 {
    let next = if speed < target {
        (speed + acceleration * dt).min(target)
    } else {
        let braked = speed - braking * dt;
        braked.max(target)
    };
    sanitize_speed(next)
}

/// NaN and runaway protection; does not abort the tick.
pub fn sanitize_speed(speed: f64) -> f64 {
    if !speed.is_finite() {
        return 0.0;
    }
    speed.clamp(0.0, MAX_SPEED)
}

/// Finish-line bookkeeping shared by track running and pit-lane transit. The
/// very first crossing is the start of lap one and commits nothing.
pub fn complete_lap(vehicle: &mut VehicleState, checkered_flag: bool) {
    vehicle.lap_count += 1;
    if vehicle.lap_count > 1 {
        vehicle.last_lap_time = vehicle.current_lap_time;
        if vehicle.current_lap_time < vehicle.best_lap_time {
            vehicle.best_lap_time = vehicle.current_lap_time;
        }
        vehicle.tyre_age_laps += 1;
        vehicle.last_lap_trace = std::mem::take(&mut vehicle.current_lap_trace);
    }
    vehicle.current_lap_time = 0.0;
    if checkered_flag {
        vehicle.has_finished = true;
    }
}
