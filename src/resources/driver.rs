use serde::{Deserialize, Serialize};

use crate::utils::errors::RaceError;

/// Race-craft skill sub-scores, each in [0, 100].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SkillSet {
    pub racecraft: f64,
    pub consistency: f64,
    pub tyre_management: f64,
    pub wet_weather: f64,
}

/// Car/driver performance sub-scores by track feature, each in [0, 100].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PerformanceSet {
    pub cornering_high: f64,
    pub cornering_medium: f64,
    pub cornering_low: f64,
    pub straight: f64,
    pub temperature_adaptability: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Personality {
    pub aggression: f64,
    pub stress_resistance: f64,
    pub team_player: f64,
}

/// Static driver definition for a race. `base_pace` is the reference lap time
/// in seconds; lower is faster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub team: String,
    pub color: String,
    pub base_pace: f64,
    pub skills: SkillSet,
    pub performance: PerformanceSet,
    pub personality: Personality,
    pub morale: f64,
    pub trust: f64,
}

impl Driver {
    /// Blue-flag compliance in [0, 1]: team players who are not aggressive
    /// yield more ground.
    pub fn blue_flag_compliance(&self) -> f64 {
        (self.personality.team_player + (100.0 - self.personality.aggression)) / 200.0
    }

    /// Rejects malformed definitions at construction time.
    pub fn validate(&self) -> Result<(), RaceError> {
        if self.id.is_empty() {
            return Err(RaceError::InvalidRoster("driver with empty id".into()));
        }
        if !(20.0..=200.0).contains(&self.base_pace) {
            return Err(RaceError::InvalidRoster(format!(
                "driver '{}' has implausible base pace {}",
                self.id, self.base_pace
            )));
        }
        let scores = [
            ("racecraft", self.skills.racecraft),
            ("consistency", self.skills.consistency),
            ("tyre_management", self.skills.tyre_management),
            ("wet_weather", self.skills.wet_weather),
            ("cornering_high", self.performance.cornering_high),
            ("cornering_medium", self.performance.cornering_medium),
            ("cornering_low", self.performance.cornering_low),
            ("straight", self.performance.straight),
            (
                "temperature_adaptability",
                self.performance.temperature_adaptability,
            ),
            ("aggression", self.personality.aggression),
            ("stress_resistance", self.personality.stress_resistance),
            ("team_player", self.personality.team_player),
            ("morale", self.morale),
            ("trust", self.trust),
        ];
        for (name, value) in scores {
            if !(0.0..=100.0).contains(&value) {
                return Err(RaceError::InvalidRoster(format!(
                    "driver '{}': {} = {} is outside [0, 100]",
                    self.id, name, value
                )));
            }
        }
        Ok(())
    }
}

/// Loads a full roster from a YAML sequence of drivers.
pub fn load_roster(path: &str) -> Result<Vec<Driver>, RaceError> {
    let file = std::fs::File::open(path)?;
    let roster: Vec<Driver> = serde_yaml::from_reader(file)?;
    for driver in &roster {
        driver.validate()?;
    }
    Ok(roster)
}

pub fn save_roster(roster: &[Driver], path: &str) -> Result<(), RaceError> {
    let file = std::fs::File::create(path)?;
    serde_yaml::to_writer(file, roster)?;
    Ok(())
}
