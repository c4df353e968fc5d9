use crate::resources::driver::Driver;
use crate::resources::track::Track;
use crate::resources::vehicle::{StrategyStint, TyreCompound};
use crate::utils::rng::RaceRng;

/// Effective dry-compound lives in laps before management, abrasion, and
/// form variance are applied.
const BASE_LIFE_SOFT: f64 = 15.0;
const BASE_LIFE_MEDIUM: f64 = 25.0;
const BASE_LIFE_HARD: f64 = 40.0;

/// Starting compound before the race. Wet conditions dictate the choice; in
/// the dry it is an aggression-weighted draw.
pub fn initial_compound(rain_intensity: f64, driver: &Driver, rng: &mut RaceRng) -> TyreCompound {
    if rain_intensity > 60.0 {
        return TyreCompound::Wet;
    }
    if rain_intensity > 10.0 {
        return TyreCompound::Intermediate;
    }
    let roll = rng.next();
    if driver.personality.aggression > 60.0 {
        if roll < 0.6 {
            TyreCompound::Soft
        } else if roll < 0.9 {
            TyreCompound::Medium
        } else {
            TyreCompound::Hard
        }
    } else if roll < 0.3 {
        TyreCompound::Soft
    } else if roll < 0.8 {
        TyreCompound::Medium
    } else {
        TyreCompound::Hard
    }
}

/// Pre-race stint plan. A wet race gets the fixed wet→intermediate split;
/// otherwise four candidate sequences are generated from effective compound
/// lives and one is picked with a weight following the driver's aggression.
pub fn plan_for_driver(
    driver: &Driver,
    track: &Track,
    total_laps: u32,
    rng: &mut RaceRng,
) -> Vec<StrategyStint> {
    if track.weather.rain_probability > 0.6 {
        return wet_plan(total_laps);
    }
    dry_plan(driver, track, total_laps, rng)
}

fn wet_plan(total_laps: u32) -> Vec<StrategyStint> {
    if total_laps <= 1 {
        return vec![StrategyStint {
            compound: TyreCompound::Wet,
            start_lap: 1,
            end_lap: total_laps.max(1),
            pace_mode: None,
        }];
    }
    let switch = ((f64::from(total_laps) * 0.4).round() as u32).clamp(1, total_laps - 1);
    vec![
        StrategyStint {
            compound: TyreCompound::Wet,
            start_lap: 1,
            end_lap: switch,
            pace_mode: None,
        },
        StrategyStint {
            compound: TyreCompound::Intermediate,
            start_lap: switch + 1,
            end_lap: total_laps,
            pace_mode: None,
        },
    ]
}

fn effective_life(base: f64, track: &Track, driver: &Driver, rng: &mut RaceRng) -> f64 {
    let management = 1.0 - (driver.skills.tyre_management - 50.0) / 200.0;
    let divisor = track.tire_degradation_factor * management * rng.range(0.9, 1.1);
    base / divisor.max(0.1)
}

fn dry_plan(
    driver: &Driver,
    track: &Track,
    total_laps: u32,
    rng: &mut RaceRng,
) -> Vec<StrategyStint> {
    let soft_life = effective_life(BASE_LIFE_SOFT, track, driver, rng);
    let medium_life = effective_life(BASE_LIFE_MEDIUM, track, driver, rng);
    let hard_life = effective_life(BASE_LIFE_HARD, track, driver, rng);

    // Stop laps land at 80-90% of cumulative compound life.
    let mut candidates: Vec<Vec<TyreCompound>> = vec![
        vec![TyreCompound::Soft, TyreCompound::Hard],
        vec![TyreCompound::Medium, TyreCompound::Hard],
        vec![TyreCompound::Soft, TyreCompound::Medium, TyreCompound::Medium],
        vec![TyreCompound::Soft, TyreCompound::Medium, TyreCompound::Soft],
    ];
    let mut candidate_stops: Vec<Vec<u32>> = Vec::with_capacity(candidates.len());
    for sequence in &candidates {
        let mut stops = Vec::new();
        let mut cumulative = 0.0;
        for compound in &sequence[..sequence.len() - 1] {
            let life = match compound {
                TyreCompound::Soft => soft_life,
                TyreCompound::Medium => medium_life,
                _ => hard_life,
            };
            cumulative += life * rng.range(0.8, 0.9);
            stops.push((cumulative.round() as u32).clamp(1, total_laps.saturating_sub(1)));
        }
        candidate_stops.push(stops);
    }

    // Two-stoppers on softer rubber are the aggressive pool.
    let aggressive = driver.personality.aggression > 60.0;
    let p_aggressive = if aggressive { 0.6 } else { 0.4 };
    let pick_aggressive = rng.chance(p_aggressive);
    let pool = if pick_aggressive { [2usize, 3] } else { [0, 1] };
    let choice = pool[rng.range_int(0, 1) as usize];

    let sequence = candidates.swap_remove(choice);
    let mut stops = candidate_stops.swap_remove(choice);

    // Scatter the early stops a little, then restore monotonic ordering.
    for stop in stops.iter_mut() {
        let jitter = rng.range_int(-2, 2);
        let shifted = i64::from(*stop) + jitter;
        *stop = shifted.clamp(1, i64::from(total_laps.saturating_sub(1))) as u32;
    }
    for i in 1..stops.len() {
        if stops[i] <= stops[i - 1] {
            stops[i] = (stops[i - 1] + 1).min(total_laps.saturating_sub(1).max(1));
        }
    }

    let mut plan = Vec::with_capacity(sequence.len());
    let mut start = 1;
    for (i, compound) in sequence.iter().enumerate() {
        let end = if i < stops.len() {
            stops[i].max(start)
        } else {
            total_laps
        };
        plan.push(StrategyStint {
            compound: *compound,
            start_lap: start,
            end_lap: end,
            pace_mode: None,
        });
        start = end + 1;
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::driver::{PerformanceSet, Personality, SkillSet};
    use crate::resources::track::{PitLane, Sector, SectorType, WeatherParams};

    fn driver_with_aggression(aggression: f64) -> Driver {
        Driver {
            id: "d".into(),
            name: "D".into(),
            team: "T".into(),
            color: "#fff".into(),
            base_pace: 88.0,
            skills: SkillSet {
                racecraft: 80.0,
                consistency: 80.0,
                tyre_management: 50.0,
                wet_weather: 80.0,
            },
            performance: PerformanceSet {
                cornering_high: 85.0,
                cornering_medium: 85.0,
                cornering_low: 85.0,
                straight: 85.0,
                temperature_adaptability: 85.0,
            },
            personality: Personality {
                aggression,
                stress_resistance: 60.0,
                team_player: 50.0,
            },
            morale: 80.0,
            trust: 80.0,
        }
    }

    fn track_with_rain(rain_probability: f64) -> Track {
        Track {
            id: "t".into(),
            name: "T".into(),
            total_distance: 5000.0,
            default_laps: 50,
            tire_degradation_factor: 1.0,
            overtaking_difficulty: 0.5,
            track_difficulty: 0.5,
            base_temperature: 25.0,
            latitude: None,
            longitude: None,
            weather: WeatherParams {
                volatility: 0.3,
                rain_probability,
            },
            sectors: vec![Sector {
                id: 1,
                name: "lap".into(),
                start_distance: 0.0,
                end_distance: 5000.0,
                sector_type: SectorType::Straight,
                difficulty: 0.2,
                max_speed: None,
            }],
            drs_zones: vec![],
            pit_lane: PitLane {
                entry_distance: 4800.0,
                exit_distance: 200.0,
                speed_limit: 22.0,
                lane_time: 23.0,
            },
        }
    }

    #[test]
    fn test_wet_forecast_forces_wet_plan() {
        let driver = driver_with_aggression(50.0);
        let track = track_with_rain(0.8);
        let mut rng = RaceRng::new(1);
        let plan = plan_for_driver(&driver, &track, 50, &mut rng);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].compound, TyreCompound::Wet);
        assert_eq!(plan[1].compound, TyreCompound::Intermediate);
        assert_eq!(plan[0].end_lap, 20);
        assert_eq!(plan[1].end_lap, 50);
    }

    #[test]
    fn test_dry_plan_is_well_formed() {
        let track = track_with_rain(0.1);
        for seed in 0..200u32 {
            let driver = driver_with_aggression(if seed % 2 == 0 { 30.0 } else { 80.0 });
            let mut rng = RaceRng::new(seed);
            let plan = plan_for_driver(&driver, &track, 50, &mut rng);
            assert!(plan.len() == 2 || plan.len() == 3);
            assert_eq!(plan[0].start_lap, 1);
            assert_eq!(plan.last().unwrap().end_lap, 50);
            for pair in plan.windows(2) {
                assert!(pair[1].end_lap > pair[0].end_lap, "end laps must increase");
                assert_eq!(pair[1].start_lap, pair[0].end_lap + 1);
            }
            for stint in &plan[..plan.len() - 1] {
                assert!(stint.end_lap >= 1 && stint.end_lap < 50);
            }
        }
    }

    #[test]
    fn test_aggression_biases_toward_two_stops() {
        let track = track_with_rain(0.1);
        let count_multi = |aggression: f64| -> usize {
            (0..300u32)
                .filter(|seed| {
                    let driver = driver_with_aggression(aggression);
                    let mut rng = RaceRng::new(*seed);
                    plan_for_driver(&driver, &track, 50, &mut rng).len() == 3
                })
                .count()
        };
        let aggressive = count_multi(90.0);
        let conservative = count_multi(20.0);
        assert!(
            aggressive > conservative,
            "aggressive drivers should favour multi-stop plans ({} vs {})",
            aggressive,
            conservative
        );
    }

    #[test]
    fn test_better_management_stretches_stints() {
        let track = track_with_rain(0.1);
        let mut saver = driver_with_aggression(30.0);
        saver.skills.tyre_management = 100.0;
        let mut burner = driver_with_aggression(30.0);
        burner.skills.tyre_management = 0.0;

        let mut rng_a = RaceRng::new(5);
        let mut rng_b = RaceRng::new(5);
        let life_saver = effective_life(BASE_LIFE_SOFT, &track, &saver, &mut rng_a);
        let life_burner = effective_life(BASE_LIFE_SOFT, &track, &burner, &mut rng_b);
        assert!(life_saver > life_burner);
    }

    #[test]
    fn test_initial_compound_in_rain() {
        let driver = driver_with_aggression(50.0);
        let mut rng = RaceRng::new(2);
        assert_eq!(
            initial_compound(80.0, &driver, &mut rng),
            TyreCompound::Wet
        );
        assert_eq!(
            initial_compound(30.0, &driver, &mut rng),
            TyreCompound::Intermediate
        );
    }

    #[test]
    fn test_initial_compound_dry_distribution() {
        let aggressive = driver_with_aggression(90.0);
        let mut rng = RaceRng::new(3);
        let mut softs = 0;
        for _ in 0..300 {
            if initial_compound(0.0, &aggressive, &mut rng) == TyreCompound::Soft {
                softs += 1;
            }
        }
        // 60% weighting, generous tolerance.
        assert!((120..=240).contains(&softs), "soft count {}", softs);
    }
}
