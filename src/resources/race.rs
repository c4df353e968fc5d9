use serde::{Deserialize, Serialize};

use crate::resources::vehicle::VehicleState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCondition {
    Dry,
    LightRain,
    HeavyRain,
}

impl WeatherCondition {
    /// Discrete bucket from the interpolated rain intensity.
    pub fn from_rain_intensity(rain: f64) -> Self {
        if rain > 50.0 {
            WeatherCondition::HeavyRain
        } else if rain > 5.0 {
            WeatherCondition::LightRain
        } else {
            WeatherCondition::Dry
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherMode {
    Simulation,
    Real,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyCarStatus {
    None,
    Vsc,
    Sc,
    RedFlag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceStatus {
    PreRace,
    Racing,
    Finished,
}

/// One node of the rolling forecast. `time_offset` is absolute race time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForecastNode {
    pub time_offset: f64,
    pub cloud_cover: f64,
    pub rain_intensity: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SectorConditions {
    pub water_depth: f64,
    pub rubber_level: f64,
}

/// Payload pushed by an external weather source while in `Real` mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RealWeatherData {
    pub cloud_cover: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub temp: f64,
    /// mm/h
    pub precipitation: f64,
}

/// The complete shared race state. Sub-systems receive it mutably, one at a
/// time, in the engine's fixed phase order; the published snapshot is a clone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceState {
    pub id: String,
    pub track_id: String,
    pub current_lap: u32,
    pub total_laps: u32,

    pub weather: WeatherCondition,
    pub weather_mode: WeatherMode,
    pub weather_forecast: Vec<ForecastNode>,
    pub cloud_cover: f64,
    pub rain_intensity_level: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub track_temp: f64,
    pub air_temp: f64,
    pub rubber_level: f64,
    pub track_water_depth: f64,
    pub sector_conditions: Vec<SectorConditions>,

    pub safety_car: SafetyCarStatus,
    pub vehicles: Vec<VehicleState>,
    pub status: RaceStatus,
    pub checkered_flag: bool,
    pub winner_id: Option<String>,
    pub elapsed_time: f64,
}

impl RaceState {
    pub fn vehicle(&self, driver_id: &str) -> Option<&VehicleState> {
        self.vehicles.iter().find(|v| v.driver_id == driver_id)
    }

    pub fn vehicle_mut(&mut self, driver_id: &str) -> Option<&mut VehicleState> {
        self.vehicles.iter_mut().find(|v| v.driver_id == driver_id)
    }

    pub fn leader(&self) -> Option<&VehicleState> {
        self.vehicles.iter().find(|v| v.position == 1)
    }

    /// Water depth of the sector holding `sector_number` (1-indexed).
    pub fn sector_water(&self, sector_number: usize) -> f64 {
        self.sector_conditions
            .get(sector_number.saturating_sub(1))
            .map(|c| c.water_depth)
            .unwrap_or(0.0)
    }
}
