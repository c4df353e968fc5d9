use serde::{Deserialize, Serialize};

use crate::resources::driver::Driver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TyreCompound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
}

impl TyreCompound {
    pub fn is_slick(self) -> bool {
        matches!(
            self,
            TyreCompound::Soft | TyreCompound::Medium | TyreCompound::Hard
        )
    }

    pub fn is_rain(self) -> bool {
        !self.is_slick()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaceMode {
    Conservative,
    Balanced,
    Aggressive,
}

impl PaceMode {
    /// Multiplier applied to tyre wear and fuel burn.
    pub fn consumption_factor(self) -> f64 {
        match self {
            PaceMode::Aggressive => 1.3,
            PaceMode::Balanced => 1.0,
            PaceMode::Conservative => 0.7,
        }
    }

    /// Target-speed adjustment, ±1.5%.
    pub fn speed_factor(self) -> f64 {
        match self {
            PaceMode::Aggressive => 1.015,
            PaceMode::Balanced => 1.0,
            PaceMode::Conservative => 0.985,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErsMode {
    Harvest,
    Balanced,
    Deploy,
}

impl ErsMode {
    /// Target-speed adjustment, ±2%.
    pub fn speed_factor(self) -> f64 {
        match self {
            ErsMode::Deploy => 1.02,
            ErsMode::Balanced => 1.0,
            ErsMode::Harvest => 0.98,
        }
    }
}

/// One planned stint: run `compound` from `start_lap` until boxing around
/// `end_lap`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StrategyStint {
    pub compound: TyreCompound,
    pub start_lap: u32,
    pub end_lap: u32,
    pub pace_mode: Option<PaceMode>,
}

/// Telemetry sample on the speed trace.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpeedSample {
    pub distance: f64,
    pub speed: f64,
}

/// Position in the pit-stop sequence; `remaining` counts down in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum PitPhase {
    DrivingIn { remaining: f64 },
    Stopped { remaining: f64 },
    DrivingOut { remaining: f64 },
}

/// Mutable per-driver race state. Kinematics and resources belong to the
/// physics pass, race flags and positions to race logic, pit intent to
/// strategy; nothing else writes these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleState {
    pub driver_id: String,

    // Kinematics
    pub distance_on_lap: f64,
    /// Odometer, monotone non-decreasing.
    pub total_distance: f64,
    pub speed: f64,
    pub lap_count: u32,
    /// 1-indexed sector number.
    pub current_sector: usize,
    pub current_lap_time: f64,
    pub last_lap_time: f64,
    pub best_lap_time: f64,

    // Race
    pub position: usize,
    pub last_position: usize,
    pub gap_to_leader: f64,
    pub gap_to_ahead: f64,
    pub is_in_pit: bool,
    pub pit_phase: Option<PitPhase>,
    pub pit_stop_count: u32,
    pub box_this_lap: bool,
    /// Classification order once finished; keeps post-checkered positions
    /// frozen.
    pub finish_rank: Option<usize>,

    // Consumables
    pub tyre_compound: TyreCompound,
    pub tyre_wear: f64,
    pub tyre_age_laps: u32,
    pub fuel_load: f64,
    pub ers_level: f64,
    pub ers_mode: ErsMode,
    pub pace_mode: PaceMode,

    // Dynamic
    pub condition: f64,
    pub damage: f64,
    pub stress: f64,
    pub morale: f64,
    pub concentration: f64,
    pub drs_open: bool,
    pub in_dirty_air: bool,
    pub is_battling: bool,
    pub blue_flag: bool,
    pub has_finished: bool,

    // Strategy plan
    pub stint_plan: Vec<StrategyStint>,
    pub current_stint: usize,
    /// Lap on which the planned-stop dice were last rolled.
    pub pit_check_lap: u32,

    // Telemetry
    pub current_lap_trace: Vec<SpeedSample>,
    pub last_lap_trace: Vec<SpeedSample>,
    pub last_sample_odometer: f64,
}

impl VehicleState {
    pub fn new(driver: &Driver) -> Self {
        Self {
            driver_id: driver.id.clone(),
            distance_on_lap: 0.0,
            total_distance: 0.0,
            speed: 0.0,
            lap_count: 0,
            current_sector: 1,
            current_lap_time: 0.0,
            last_lap_time: 0.0,
            best_lap_time: f64::INFINITY,
            position: 0,
            last_position: 0,
            gap_to_leader: 0.0,
            gap_to_ahead: 0.0,
            is_in_pit: false,
            pit_phase: None,
            pit_stop_count: 0,
            box_this_lap: false,
            finish_rank: None,
            tyre_compound: TyreCompound::Medium,
            tyre_wear: 0.0,
            tyre_age_laps: 0,
            fuel_load: 100.0,
            ers_level: 100.0,
            ers_mode: ErsMode::Balanced,
            pace_mode: PaceMode::Balanced,
            condition: 1.0,
            damage: 0.0,
            stress: 20.0,
            morale: driver.morale,
            concentration: 100.0,
            drs_open: false,
            in_dirty_air: false,
            is_battling: false,
            blue_flag: false,
            has_finished: false,
            stint_plan: Vec::new(),
            current_stint: 0,
            pit_check_lap: u32::MAX,
            current_lap_trace: Vec::new(),
            last_lap_trace: Vec::new(),
            last_sample_odometer: 0.0,
        }
    }

    /// Cumulative race distance used for ordering and gap math.
    pub fn race_distance(&self, lap_length: f64) -> f64 {
        f64::from(self.lap_count) * lap_length + self.distance_on_lap
    }

    pub fn is_dnf(&self) -> bool {
        self.damage >= 100.0
    }

    /// Still racing: neither retired nor across the final line.
    pub fn is_active(&self) -> bool {
        !self.is_dnf() && !self.has_finished
    }

    /// The stint the plan says the car is currently on, if any remains.
    pub fn planned_stint(&self) -> Option<&StrategyStint> {
        self.stint_plan.get(self.current_stint)
    }

    pub fn next_planned_stint(&self) -> Option<&StrategyStint> {
        self.stint_plan.get(self.current_stint + 1)
    }
}
