use serde::{Deserialize, Serialize};

use crate::utils::errors::RaceError;
use crate::utils::math::wrap_distance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectorType {
    Straight,
    CornerHighSpeed,
    CornerMediumSpeed,
    CornerLowSpeed,
}

impl SectorType {
    pub fn is_corner(self) -> bool {
        !matches!(self, SectorType::Straight)
    }
}

/// One contiguous stretch of track, [start_distance, end_distance).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sector {
    pub id: u32,
    pub name: String,
    pub start_distance: f64,
    pub end_distance: f64,
    pub sector_type: SectorType,
    pub difficulty: f64,
    pub max_speed: Option<f64>,
}

/// DRS zone boundaries in lap-distance coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DrsZone {
    pub detection_distance: f64,
    pub activation_distance: f64,
    pub end_distance: f64,
}

/// * `entry_distance` - (m) Where the pit lane leaves the track
/// * `exit_distance` - (m) Where it rejoins, possibly past the finish line
/// * `speed_limit` - (m/s) Enforced while driving the lane
/// * `lane_time` - (s) Total transit time through the lane, excluding the stop
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PitLane {
    pub entry_distance: f64,
    pub exit_distance: f64,
    pub speed_limit: f64,
    pub lane_time: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeatherParams {
    pub volatility: f64,
    pub rain_probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub total_distance: f64,
    pub default_laps: u32,
    pub tire_degradation_factor: f64,
    pub overtaking_difficulty: f64,
    pub track_difficulty: f64,
    pub base_temperature: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub weather: WeatherParams,
    pub sectors: Vec<Sector>,
    pub drs_zones: Vec<DrsZone>,
    pub pit_lane: PitLane,
}

impl Track {
    pub fn load(path: &str) -> Result<Self, RaceError> {
        let file = std::fs::File::open(path)?;
        let track: Track = serde_yaml::from_reader(file)?;
        track.validate()?;
        Ok(track)
    }

    pub fn save(&self, path: &str) -> Result<(), RaceError> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }

    /// Rejects malformed definitions at construction time; the engine never
    /// re-checks these invariants afterwards.
    pub fn validate(&self) -> Result<(), RaceError> {
        if self.total_distance <= 0.0 {
            return Err(RaceError::InvalidTrack(format!(
                "total distance must be positive, got {}",
                self.total_distance
            )));
        }
        if self.sectors.is_empty() {
            return Err(RaceError::InvalidTrack("no sectors defined".into()));
        }
        let mut cursor = 0.0;
        for sector in &self.sectors {
            if (sector.start_distance - cursor).abs() > 1e-6 {
                return Err(RaceError::InvalidTrack(format!(
                    "sector '{}' starts at {} but previous sector ends at {}",
                    sector.name, sector.start_distance, cursor
                )));
            }
            if sector.end_distance <= sector.start_distance {
                return Err(RaceError::InvalidTrack(format!(
                    "sector '{}' has non-positive length",
                    sector.name
                )));
            }
            cursor = sector.end_distance;
        }
        if (cursor - self.total_distance).abs() > 1e-6 {
            return Err(RaceError::InvalidTrack(format!(
                "sectors cover [0, {}) but the lap is {} m",
                cursor, self.total_distance
            )));
        }
        if self.pit_lane.speed_limit <= 0.0 {
            return Err(RaceError::InvalidTrack(
                "pit lane speed limit must be positive".into(),
            ));
        }
        if self.tire_degradation_factor <= 0.0 {
            return Err(RaceError::InvalidTrack(
                "tire degradation factor must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Sector containing `distance`, with its 1-indexed number.
    pub fn sector_at(&self, distance: f64) -> (usize, &Sector) {
        let d = wrap_distance(distance, self.total_distance);
        for (i, sector) in self.sectors.iter().enumerate() {
            if d >= sector.start_distance && d < sector.end_distance {
                return (i + 1, sector);
            }
        }
        // d == total_distance can only slip through on float edge cases
        (self.sectors.len(), self.sectors.last().unwrap())
    }

    /// Track distance covered while driving the pit lane, wrap-aware.
    pub fn pit_lane_track_distance(&self) -> f64 {
        let lane = &self.pit_lane;
        if lane.exit_distance > lane.entry_distance {
            lane.exit_distance - lane.entry_distance
        } else {
            self.total_distance - lane.entry_distance + lane.exit_distance
        }
    }

    /// Transit time through the lane: configured value when positive, else
    /// derived from lane length at the speed limit. Floor 5 s.
    pub fn pit_lane_time(&self) -> f64 {
        let configured = self.pit_lane.lane_time;
        let derived = self.pit_lane_track_distance() / self.pit_lane.speed_limit;
        let lane_time = if configured > 0.0 { configured } else { derived };
        lane_time.max(5.0)
    }
}
