use crate::resources::driver::Driver;
use crate::resources::race::SafetyCarStatus;
use crate::resources::track::{SectorType, Track};
use crate::resources::vehicle::VehicleState;
use crate::systems::tyres;

/// Sector-type base speeds in m/s. The straight figure is aspirational; drag
/// keeps real top speed below it.
pub const BASE_SPEED_STRAIGHT: f64 = 105.0;
pub const BASE_SPEED_CORNER_HIGH: f64 = 72.0;
pub const BASE_SPEED_CORNER_MEDIUM: f64 = 50.0;
pub const BASE_SPEED_CORNER_LOW: f64 = 25.0;

/// Copyable view of the sector a vehicle currently occupies.
#[derive(Debug, Clone, Copy)]
pub struct SectorInfo {
    pub number: usize,
    pub sector_type: SectorType,
    pub difficulty: f64,
    pub max_speed: Option<f64>,
}

/// What the car ahead looks like from the cockpit.
#[derive(Debug, Clone, Copy)]
pub struct AheadInfo {
    pub speed: f64,
    pub base_pace: f64,
}

pub struct SpeedContext<'a> {
    pub driver: &'a Driver,
    pub sector: SectorInfo,
    pub ahead: Option<AheadInfo>,
    pub track_temp: f64,
    pub safety_car: SafetyCarStatus,
    pub race_lap: u32,
    /// Pre-drawn symmetric noise term, already scaled.
    pub noise: f64,
}

fn sector_base_speed(sector: &SectorInfo) -> f64 {
    sector.max_speed.unwrap_or(match sector.sector_type {
        SectorType::Straight => BASE_SPEED_STRAIGHT,
        SectorType::CornerHighSpeed => BASE_SPEED_CORNER_HIGH,
        SectorType::CornerMediumSpeed => BASE_SPEED_CORNER_MEDIUM,
        SectorType::CornerLowSpeed => BASE_SPEED_CORNER_LOW,
    })
}

fn sector_performance_score(driver: &Driver, sector_type: SectorType) -> f64 {
    match sector_type {
        SectorType::Straight => driver.performance.straight,
        SectorType::CornerHighSpeed => driver.performance.cornering_high,
        SectorType::CornerMediumSpeed => driver.performance.cornering_medium,
        SectorType::CornerLowSpeed => driver.performance.cornering_low,
    }
}

fn dirty_air_scale(sector_type: SectorType) -> f64 {
    match sector_type {
        SectorType::CornerHighSpeed => 0.05,
        SectorType::CornerMediumSpeed => 0.03,
        SectorType::CornerLowSpeed => 0.01,
        SectorType::Straight => 0.0,
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Assembles the per-tick target speed as a product of multiplicative factors
/// on the sector base speed, then applies battle, blue-flag, noise, and
/// neutralization terms in that order.
pub fn compute(vehicle: &VehicleState, track: &Track, ctx: &SpeedContext) -> f64 {
    let driver = ctx.driver;
    let mut target = sector_base_speed(&ctx.sector);

    // Driver/car form
    let perf = sector_performance_score(driver, ctx.sector.sector_type);
    target *= 1.0 + (perf - 90.0) * 0.0005;
    target *= 1.0 + (88.0 - driver.base_pace) * 0.0008;
    target *= 1.0 + (vehicle.morale - 80.0) * 0.0005;
    target *= vehicle.condition;

    // Environment
    let temp_penalty = (ctx.track_temp - 25.0).abs()
        * 0.005
        * (1.0 - driver.performance.temperature_adaptability / 100.0);
    target *= 1.0 - temp_penalty;
    target *= 1.0 - track.track_difficulty * 0.08 * (1.0 - driver.skills.consistency / 100.0);

    // Car state
    target *= tyres::grip_factor(vehicle.tyre_compound, vehicle.tyre_wear, 0.0);
    target *= 1.0 - (vehicle.fuel_load / 100.0) * 0.033;
    target *= vehicle.pace_mode.speed_factor();
    target *= vehicle.ers_mode.speed_factor();
    if vehicle.drs_open {
        target *= 1.05;
    }

    // Aero wake from the car ahead, once the field has spread out
    if ctx.race_lap > 1 && vehicle.position > 1 && ctx.ahead.is_some() {
        let gap = vehicle.gap_to_ahead;
        if ctx.sector.sector_type == SectorType::Straight {
            let boost = (0.05 * (1.0 - gap / 1.5)).clamp(0.0, 0.05);
            target *= 1.0 + boost;
        } else {
            let penalty = (dirty_air_scale(ctx.sector.sector_type) * (1.0 - gap / 2.0)).max(0.0);
            target *= 1.0 - penalty;
        }
    }

    // Wheel-to-wheel battle: blend between being stuck behind and breaking free
    if vehicle.is_battling {
        if let Some(ahead) = ctx.ahead {
            let pace_delta = ahead.base_pace - driver.base_pace;
            let s = sigmoid(
                pace_delta + 2.5 * (driver.personality.aggression / 100.0)
                    + 1.5 * (driver.skills.racecraft / 100.0)
                    - 3.0,
            );
            let stuck = ahead.speed * 0.98;
            let mut free = target;
            if ctx.sector.sector_type.is_corner() {
                free *= 1.0 - 0.05 * s;
            }
            target = stuck * (1.0 - s) + free * s;
        }
    }

    if vehicle.blue_flag {
        target *= 1.0 - 0.2 * driver.blue_flag_compliance();
    }

    target *= 1.0 + ctx.noise;

    match ctx.safety_car {
        SafetyCarStatus::Vsc => {
            // Converges onto the 44 m/s delta-speed regime from above.
            target = target.min((vehicle.speed * 0.7).max(44.0));
        }
        SafetyCarStatus::Sc => {
            let cap = if vehicle.position <= 1 {
                35.0
            } else {
                let gap = vehicle.gap_to_ahead;
                let factor = if gap < 0.3 {
                    0.8
                } else {
                    (1.0 + 0.5 * (gap - 0.5)).clamp(0.8, 1.6)
                };
                35.0 * factor
            };
            target = target.min(cap);
        }
        SafetyCarStatus::RedFlag => target = 0.0,
        SafetyCarStatus::None => {}
    }

    target.max(0.0)
}

/// Symmetric noise amplitude for a driver in a sector under the current
/// neutralization state.
pub fn noise_amplitude(
    driver: &Driver,
    sector_type: SectorType,
    safety_car: SafetyCarStatus,
) -> f64 {
    let mut amplitude = 0.05 * (1.0 - driver.skills.consistency / 100.0 + 0.3);
    if sector_type == SectorType::CornerLowSpeed {
        amplitude *= 3.0;
    }
    if matches!(safety_car, SafetyCarStatus::Sc | SafetyCarStatus::Vsc) {
        amplitude *= 0.1;
    }
    amplitude
}
