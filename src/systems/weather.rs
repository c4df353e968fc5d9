use std::f64::consts::TAU;

use tracing::debug;

use crate::resources::race::{ForecastNode, RaceState, RealWeatherData, WeatherCondition};
use crate::resources::track::Track;
use crate::utils::rng::RaceRng;

const FORECAST_NODE_SPACING: f64 = 120.0;
const FORECAST_INITIAL_NODES: usize = 16;
const FORECAST_HORIZON: f64 = 1800.0;
const FORECAST_REFRESH_INTERVAL: f64 = 60.0;

// mm per second
const RAIN_ACCUMULATION_FULL: f64 = 10.0 / 3600.0;
const DRAINAGE: f64 = 2.0 / 3600.0;
const EVAPORATION: f64 = 0.5 / 3600.0;

/// Maintains the rolling forecast, interpolates the live weather scalars from
/// it, and evolves standing water, rubber, wind, and temperatures.
#[derive(Debug)]
pub struct WeatherSystem {
    last_refresh: f64,
}

impl WeatherSystem {
    pub fn new() -> Self {
        Self { last_refresh: 0.0 }
    }

    /// Builds the initial forecast and weather scalars at race creation.
    pub fn initialize(&mut self, state: &mut RaceState, track: &Track, rng: &mut RaceRng) {
        state.weather_forecast = (0..FORECAST_INITIAL_NODES)
            .map(|i| forecast_node(i as f64 * FORECAST_NODE_SPACING, track, rng))
            .collect();
        state.wind_speed = rng.range(0.0, 8.0);
        state.wind_direction = rng.range(0.0, 360.0);
        interpolate(state);
        update_temperatures(state, track);
    }

    pub fn update(&mut self, state: &mut RaceState, track: &Track, rng: &mut RaceRng, dt: f64) {
        if state.weather_mode == crate::resources::race::WeatherMode::Simulation {
            self.maintain_forecast(state, track, rng);
            interpolate(state);
            state.wind_speed = (state.wind_speed + rng.range(-0.5, 0.5) * dt).clamp(0.0, 25.0);
            state.wind_direction =
                (state.wind_direction + rng.range(-5.0, 5.0) * dt).rem_euclid(360.0);
            update_temperatures(state, track);
        }
        evolve_water(state, dt);
    }

    /// Adopts an external observation. The engine only routes this here while
    /// the race is in `Real` weather mode.
    pub fn apply_real_data(state: &mut RaceState, data: &RealWeatherData) {
        state.cloud_cover = data.cloud_cover.clamp(0.0, 100.0);
        state.wind_speed = data.wind_speed.max(0.0);
        state.wind_direction = data.wind_direction.rem_euclid(360.0);
        state.air_temp = data.temp;
        state.rain_intensity_level = (data.precipitation / 5.0 * 100.0).min(100.0).max(0.0);
        state.weather = WeatherCondition::from_rain_intensity(state.rain_intensity_level);
        state.track_temp = if state.rain_intensity_level > 5.0 {
            state.air_temp + 1.0
        } else {
            state.air_temp + 15.0 * (1.0 - state.cloud_cover / 100.0)
        };
        debug!(
            rain = state.rain_intensity_level,
            cloud = state.cloud_cover,
            "adopted external weather observation"
        );
    }

    /// Every 60 s of race time: drop consumed nodes (keeping one behind the
    /// clock for interpolation) and extend the horizon to 1800 s ahead.
    fn maintain_forecast(&mut self, state: &mut RaceState, track: &Track, rng: &mut RaceRng) {
        if state.elapsed_time - self.last_refresh < FORECAST_REFRESH_INTERVAL
            && !state.weather_forecast.is_empty()
        {
            return;
        }
        self.last_refresh = state.elapsed_time;

        let now = state.elapsed_time;
        while state.weather_forecast.len() >= 2 && state.weather_forecast[1].time_offset <= now {
            state.weather_forecast.remove(0);
        }
        let mut last = state
            .weather_forecast
            .last()
            .map(|n| n.time_offset)
            .unwrap_or(0.0);
        while last < now + FORECAST_HORIZON {
            last += FORECAST_NODE_SPACING;
            let node = forecast_node(last, track, rng);
            state.weather_forecast.push(node);
        }
    }
}

impl Default for WeatherSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Synthetic forecast value at timestamp `t`: one slow front wave, a
/// volatility-scaled meso wave with a randomized phase, and a fast ripple.
fn forecast_node(t: f64, track: &Track, rng: &mut RaceRng) -> ForecastNode {
    let volatility = track.weather.volatility;
    let macro_wave = (TAU * t / 5000.0).sin();
    let phase = rng.range(0.0, TAU);
    let meso_wave = (TAU * t / 1000.0 + phase).sin();
    let micro_wave = (TAU * t / 160.0).sin();
    let combined = 0.5 * macro_wave + 0.3 * volatility * meso_wave + 0.2 * volatility * micro_wave;

    let center = if track.weather.rain_probability <= 0.5 {
        30.0
    } else {
        60.0
    };
    let cloud_cover = (center + 50.0 * combined).clamp(0.0, 100.0);
    let rain_intensity = if cloud_cover <= 70.0 {
        0.0
    } else {
        ((cloud_cover - 70.0) / 30.0).powi(2) * 100.0
    };
    ForecastNode {
        time_offset: t,
        cloud_cover,
        rain_intensity,
    }
}

/// Linear interpolation between the two forecast nodes bracketing the race
/// clock. At a node's own timestamp this reproduces the node exactly.
fn interpolate(state: &mut RaceState) {
    let now = state.elapsed_time;
    let nodes = &state.weather_forecast;
    let (cloud, rain) = match nodes.len() {
        0 => (state.cloud_cover, state.rain_intensity_level),
        1 => (nodes[0].cloud_cover, nodes[0].rain_intensity),
        _ => {
            if now <= nodes[0].time_offset {
                (nodes[0].cloud_cover, nodes[0].rain_intensity)
            } else if now >= nodes[nodes.len() - 1].time_offset {
                let last = &nodes[nodes.len() - 1];
                (last.cloud_cover, last.rain_intensity)
            } else {
                let idx = nodes
                    .windows(2)
                    .position(|w| w[0].time_offset <= now && now < w[1].time_offset)
                    .unwrap_or(0);
                let (a, b) = (&nodes[idx], &nodes[idx + 1]);
                let f = (now - a.time_offset) / (b.time_offset - a.time_offset);
                (
                    a.cloud_cover + f * (b.cloud_cover - a.cloud_cover),
                    a.rain_intensity + f * (b.rain_intensity - a.rain_intensity),
                )
            }
        }
    };
    state.cloud_cover = cloud;
    state.rain_intensity_level = rain;
    state.weather = WeatherCondition::from_rain_intensity(rain);
}

fn update_temperatures(state: &mut RaceState, track: &Track) {
    let rain = state.rain_intensity_level;
    let cloud = state.cloud_cover;
    state.air_temp = track.base_temperature - 5.0 * (rain / 100.0) - 3.0 * (cloud / 100.0);
    state.track_temp = if rain > 5.0 {
        state.air_temp + 1.0
    } else {
        state.air_temp + 15.0 * (1.0 - cloud / 100.0)
    };
}

/// Standing water balance, applied uniformly across sectors and mirrored to
/// the race-wide scalar. Wet sectors slowly lose laid rubber; dry green track
/// rubbers in.
fn evolve_water(state: &mut RaceState, dt: f64) {
    let rain = state.rain_intensity_level;
    let accumulation = rain / 100.0 * RAIN_ACCUMULATION_FULL;
    let evaporation = if rain < 5.0 {
        EVAPORATION * 4.0
    } else {
        EVAPORATION
    };
    let net_per_second = if rain > 0.0 {
        accumulation - DRAINAGE
    } else {
        -(DRAINAGE + evaporation)
    };
    let delta = net_per_second * dt;

    for conditions in &mut state.sector_conditions {
        conditions.water_depth = (conditions.water_depth + delta).max(0.0);
        if conditions.water_depth > 0.5 {
            conditions.rubber_level = (conditions.rubber_level - 0.02 * dt).max(0.0);
        } else if rain == 0.0 {
            conditions.rubber_level = (conditions.rubber_level + 0.005 * dt).min(100.0);
        }
    }
    state.track_water_depth = state
        .sector_conditions
        .first()
        .map(|c| c.water_depth)
        .unwrap_or((state.track_water_depth + delta).max(0.0));
    if state.track_water_depth > 0.5 {
        state.rubber_level = (state.rubber_level - 0.02 * dt).max(0.0);
    } else if rain == 0.0 {
        state.rubber_level = (state.rubber_level + 0.005 * dt).min(100.0);
    }
}
