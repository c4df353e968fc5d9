pub mod physics;
pub mod race_logic;
pub mod strategy;
pub mod tyres;
pub mod weather;

pub use physics::PhysicsSystem;
pub use race_logic::RaceLogicSystem;
pub use strategy::StrategySystem;
pub use weather::WeatherSystem;
