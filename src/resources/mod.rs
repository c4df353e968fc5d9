pub mod driver;
pub mod race;
pub mod track;
pub mod vehicle;

pub use driver::{load_roster, save_roster, Driver, PerformanceSet, Personality, SkillSet};
pub use race::{
    ForecastNode, RaceState, RaceStatus, RealWeatherData, SafetyCarStatus, SectorConditions,
    WeatherCondition, WeatherMode,
};
pub use track::{DrsZone, PitLane, Sector, SectorType, Track, WeatherParams};
pub use vehicle::{
    ErsMode, PaceMode, PitPhase, SpeedSample, StrategyStint, TyreCompound, VehicleState,
};
