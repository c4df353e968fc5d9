use racesim::{Driver, PerformanceSet, Personality, SkillSet};

/// A single mid-grid reference driver.
pub fn reference_driver(id: &str) -> Driver {
    Driver {
        id: id.to_string(),
        name: format!("Driver {}", id),
        team: "Reference Racing".into(),
        color: "#3366cc".into(),
        base_pace: 88.0,
        skills: SkillSet {
            racecraft: 85.0,
            consistency: 85.0,
            tyre_management: 80.0,
            wet_weather: 75.0,
        },
        performance: PerformanceSet {
            cornering_high: 85.0,
            cornering_medium: 85.0,
            cornering_low: 85.0,
            straight: 85.0,
            temperature_adaptability: 85.0,
        },
        personality: Personality {
            aggression: 50.0,
            stress_resistance: 70.0,
            team_player: 50.0,
        },
        morale: 80.0,
        trust: 80.0,
    }
}

/// A deterministic 20-car grid with a realistic spread of pace and
/// temperament, derived from the index alone.
pub fn full_grid(count: usize) -> Vec<Driver> {
    (0..count)
        .map(|i| {
            let f = i as f64;
            let mut driver = reference_driver(&format!("driver-{:02}", i + 1));
            driver.name = format!("Driver {:02}", i + 1);
            driver.team = format!("Team {:02}", i / 2 + 1);
            driver.base_pace = 86.8 + f * 0.12;
            driver.skills.racecraft = 95.0 - f * 1.1;
            driver.skills.consistency = 92.0 - f * 0.9;
            driver.skills.tyre_management = 90.0 - (f * 7.0) % 25.0;
            driver.skills.wet_weather = 88.0 - (f * 11.0) % 30.0;
            driver.performance.cornering_high = 92.0 - f * 0.8;
            driver.performance.cornering_medium = 91.0 - f * 0.7;
            driver.performance.cornering_low = 90.0 - f * 0.6;
            driver.performance.straight = 93.0 - f * 0.7;
            driver.performance.temperature_adaptability = 85.0 - (f * 5.0) % 20.0;
            driver.personality.aggression = 30.0 + (f * 13.0) % 60.0;
            driver.personality.stress_resistance = 60.0 + (f * 9.0) % 35.0;
            driver.personality.team_player = 40.0 + (f * 17.0) % 50.0;
            driver
        })
        .collect()
}

/// Two identical cars, for controlled head-to-head scenarios.
pub fn twins() -> Vec<Driver> {
    vec![reference_driver("twin-a"), reference_driver("twin-b")]
}
