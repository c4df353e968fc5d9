use tracing::{debug, info, warn};

use crate::resources::driver::Driver;
use crate::resources::race::{RaceState, RaceStatus, RealWeatherData, WeatherMode};
use crate::resources::track::Track;
use crate::resources::vehicle::{ErsMode, PaceMode};
use crate::systems::race_logic::{self, RaceLogicSystem};
use crate::systems::{PhysicsSystem, StrategySystem, WeatherSystem};
use crate::utils::errors::RaceError;
use crate::utils::rng::RaceRng;

/// One strategy instruction from the pit wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyInput {
    Pace(PaceMode),
    Ers(ErsMode),
    Pit(bool),
}

/// The orchestrator. Owns the race state, the sub-systems, and the shared
/// RNG, and advances everything by fixed substeps in a contract phase order:
/// weather, race logic, then per-vehicle strategy and physics.
///
/// Callers own the clock: batches of simulated time must be clamped to 2.0 s
/// and subdivided into substeps of at most 0.1 s before being fed to
/// [`RaceEngine::update`].
pub struct RaceEngine {
    track: Track,
    drivers: Vec<Driver>,
    state: RaceState,
    rng: RaceRng,
    weather: WeatherSystem,
    physics: PhysicsSystem,
    strategy: StrategySystem,
    race_logic: RaceLogicSystem,
}

impl RaceEngine {
    /// Validates the inputs, runs qualifying, and assembles the grid. The
    /// same `(track, drivers, seed)` triple always produces the same race.
    pub fn new(track: Track, drivers: Vec<Driver>, seed: u32) -> Result<Self, RaceError> {
        track.validate()?;
        if drivers.is_empty() {
            return Err(RaceError::InvalidRoster("no drivers".into()));
        }
        for (i, driver) in drivers.iter().enumerate() {
            driver.validate()?;
            if drivers[..i].iter().any(|other| other.id == driver.id) {
                return Err(RaceError::InvalidRoster(format!(
                    "duplicate driver id '{}'",
                    driver.id
                )));
            }
        }

        let mut rng = RaceRng::new(seed);
        let mut weather = WeatherSystem::new();
        let state = race_logic::initialize_race(&track, &drivers, &mut rng, &mut weather, seed);

        Ok(Self {
            track,
            drivers,
            state,
            rng,
            weather,
            physics: PhysicsSystem::new(),
            strategy: StrategySystem::new(),
            race_logic: RaceLogicSystem::new(),
        })
    }

    pub fn start_race(&mut self) {
        if self.state.status == RaceStatus::PreRace {
            self.state.status = RaceStatus::Racing;
            info!(race = %self.state.id, "lights out");
        }
    }

    /// Advances the simulation by one substep of at most 0.1 s and returns
    /// the published snapshot. A no-op unless the race is running.
    pub fn update(&mut self, dt: f64) -> RaceState {
        if self.state.status != RaceStatus::Racing || dt <= 0.0 {
            return self.state.clone();
        }
        self.state.elapsed_time += dt;

        self.weather
            .update(&mut self.state, &self.track, &mut self.rng, dt);
        self.race_logic.update(
            &mut self.state,
            &self.track,
            &self.drivers,
            &mut self.rng,
            dt,
        );
        for i in 0..self.state.vehicles.len() {
            let vehicle = &self.state.vehicles[i];
            if !vehicle.is_active() {
                continue;
            }
            if !vehicle.is_in_pit {
                self.strategy.update_vehicle(
                    &mut self.state,
                    &self.track,
                    &self.drivers,
                    &mut self.rng,
                    i,
                );
            }
            if !self.state.vehicles[i].is_in_pit {
                self.physics.update_vehicle(
                    &mut self.state,
                    &self.track,
                    &self.drivers,
                    &mut self.rng,
                    i,
                    dt,
                );
            }
        }

        self.state.clone()
    }

    pub fn state(&self) -> &RaceState {
        &self.state
    }

    /// Fully materialized immutable snapshot.
    pub fn snapshot(&self) -> RaceState {
        self.state.clone()
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    /// Direct mutable access for tooling and test setups. Sub-systems never
    /// go through this.
    pub fn state_mut(&mut self) -> &mut RaceState {
        &mut self.state
    }

    /// Pit-wall channel: pace mode, ERS mode, or a pit call for one driver.
    pub fn update_strategy(
        &mut self,
        driver_id: &str,
        input: StrategyInput,
    ) -> Result<(), RaceError> {
        let vehicle = self
            .state
            .vehicle_mut(driver_id)
            .ok_or_else(|| RaceError::UnknownDriver(driver_id.to_string()))?;
        match input {
            StrategyInput::Pace(mode) => vehicle.pace_mode = mode,
            StrategyInput::Ers(mode) => {
                // An empty battery cannot be deployed.
                if !(mode == ErsMode::Deploy && vehicle.ers_level <= 0.0) {
                    vehicle.ers_mode = mode;
                }
            }
            StrategyInput::Pit(call) => {
                if !vehicle.is_in_pit {
                    vehicle.box_this_lap = call;
                }
            }
        }
        debug!(driver = driver_id, ?input, "strategy input applied");
        Ok(())
    }

    /// Switching to the same mode twice is a no-op on state.
    pub fn set_weather_mode(&mut self, mode: WeatherMode) {
        if self.state.weather_mode != mode {
            self.state.weather_mode = mode;
            info!(?mode, "weather mode switched");
        }
    }

    /// Adopts an external observation; ignored while simulating weather.
    pub fn set_real_weather_data(&mut self, data: RealWeatherData) {
        if self.state.weather_mode != WeatherMode::Real {
            warn!("real weather push ignored in simulation mode");
            return;
        }
        WeatherSystem::apply_real_data(&mut self.state, &data);
    }
}
