pub mod engine;
pub mod resources;
pub mod systems;
pub mod utils;

pub use engine::{RaceEngine, StrategyInput};
pub use resources::{
    Driver, DrsZone, ErsMode, PaceMode, PerformanceSet, Personality, PitLane, RaceState,
    RaceStatus, RealWeatherData, SafetyCarStatus, Sector, SectorType, SkillSet, StrategyStint,
    Track, TyreCompound, VehicleState, WeatherCondition, WeatherMode, WeatherParams,
};
pub use utils::errors::RaceError;
pub use utils::rng::RaceRng;
