use crate::resources::track::Track;
use crate::resources::vehicle::{PaceMode, TyreCompound};

/// Static per-compound characteristics.
///
/// `base_wear_rate` is percent per second at balanced pace on a
/// standard-abrasion track. `rain_performance` is the residual grip fraction
/// a compound keeps in deep standing water.
#[derive(Debug, Clone, Copy)]
pub struct CompoundSpec {
    pub base_pace_delta: f64,
    pub base_wear_rate: f64,
    pub grip: f64,
    pub optimal_temp_window: [f64; 2],
    pub rain_performance: f64,
}

const SOFT: CompoundSpec = CompoundSpec {
    base_pace_delta: -0.40,
    base_wear_rate: 0.060,
    grip: 1.02,
    optimal_temp_window: [90.0, 110.0],
    rain_performance: 0.10,
};

const MEDIUM: CompoundSpec = CompoundSpec {
    base_pace_delta: 0.0,
    base_wear_rate: 0.040,
    grip: 1.00,
    optimal_temp_window: [85.0, 105.0],
    rain_performance: 0.12,
};

const HARD: CompoundSpec = CompoundSpec {
    base_pace_delta: 0.50,
    base_wear_rate: 0.026,
    grip: 0.98,
    optimal_temp_window: [80.0, 100.0],
    rain_performance: 0.15,
};

const INTERMEDIATE: CompoundSpec = CompoundSpec {
    base_pace_delta: 5.0,
    base_wear_rate: 0.045,
    grip: 0.96,
    optimal_temp_window: [40.0, 70.0],
    rain_performance: 0.75,
};

const WET: CompoundSpec = CompoundSpec {
    base_pace_delta: 9.0,
    base_wear_rate: 0.050,
    grip: 0.94,
    optimal_temp_window: [30.0, 60.0],
    rain_performance: 0.95,
};

impl TyreCompound {
    pub fn spec(self) -> &'static CompoundSpec {
        match self {
            TyreCompound::Soft => &SOFT,
            TyreCompound::Medium => &MEDIUM,
            TyreCompound::Hard => &HARD,
            TyreCompound::Intermediate => &INTERMEDIATE,
            TyreCompound::Wet => &WET,
        }
    }
}

/// Wear accrual in percent per second.
pub fn wear_rate(compound: TyreCompound, track: &Track, pace: PaceMode, current_wear: f64) -> f64 {
    let mut rate =
        compound.spec().base_wear_rate * track.tire_degradation_factor * pace.consumption_factor();
    if current_wear > 60.0 {
        rate *= 1.1;
    }
    if current_wear > 80.0 {
        rate *= 1.2;
    }
    rate
}

/// Fractional grip loss from wear; piecewise with a cliff past 70%.
fn wear_penalty(wear: f64) -> f64 {
    let wear = wear.clamp(0.0, 100.0);
    if wear <= 40.0 {
        wear / 40.0 * 0.02
    } else if wear <= 70.0 {
        0.02 + (wear - 40.0) / 30.0 * 0.05
    } else {
        0.07 + (wear - 70.0) / 30.0 * 0.15
    }
}

/// Water-depth multiplier, compound specific. Slicks drown exponentially,
/// intermediates peak around 1.5 mm, full wets plateau but give up grip when
/// run dry.
fn water_multiplier(compound: TyreCompound, water: f64) -> f64 {
    let water = water.max(0.0);
    let spec = compound.spec();
    if compound.is_slick() {
        spec.rain_performance + (1.0 - spec.rain_performance) * (-2.0 * water).exp()
    } else if compound == TyreCompound::Intermediate {
        let offset = water - 1.5;
        0.88 + 0.14 * (-(offset * offset) / (2.0 * 0.8 * 0.8)).exp()
    } else {
        0.72 + 0.26 / (1.0 + (-3.0 * (water - 1.0)).exp())
    }
}

/// Effective grip for a compound at a given wear and water depth.
/// Floored at 0.1 so the integrator never loses authority entirely.
pub fn grip_factor(compound: TyreCompound, wear: f64, water_depth: f64) -> f64 {
    let base = compound.spec().grip;
    let gripped = base * (1.0 - wear_penalty(wear));
    (gripped * water_multiplier(compound, water_depth)).max(0.1)
}
