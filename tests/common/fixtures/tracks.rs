use racesim::{DrsZone, PitLane, Sector, SectorType, Track, WeatherParams};

/// Silverstone GP layout, 5891 m, reduced to the sector granularity the
/// engine works at.
pub fn silverstone() -> Track {
    let sector = |id: u32, name: &str, start: f64, end: f64, t: SectorType, difficulty: f64| {
        Sector {
            id,
            name: name.to_string(),
            start_distance: start,
            end_distance: end,
            sector_type: t,
            difficulty,
            max_speed: None,
        }
    };
    Track {
        id: "silverstone".into(),
        name: "Silverstone".into(),
        total_distance: 5891.0,
        default_laps: 52,
        tire_degradation_factor: 1.0,
        overtaking_difficulty: 0.55,
        track_difficulty: 0.5,
        base_temperature: 22.0,
        latitude: Some(52.0786),
        longitude: Some(-1.0169),
        weather: WeatherParams {
            volatility: 0.3,
            rain_probability: 0.25,
        },
        sectors: vec![
            sector(1, "Hamilton Straight", 0.0, 250.0, SectorType::Straight, 0.1),
            sector(2, "Abbey", 250.0, 500.0, SectorType::CornerHighSpeed, 0.5),
            sector(3, "Farm Curve", 500.0, 700.0, SectorType::CornerHighSpeed, 0.4),
            sector(4, "Village", 700.0, 900.0, SectorType::CornerLowSpeed, 0.6),
            sector(5, "The Loop", 900.0, 1100.0, SectorType::CornerLowSpeed, 0.6),
            sector(6, "Wellington Straight", 1100.0, 1870.0, SectorType::Straight, 0.1),
            sector(7, "Brooklands", 1870.0, 2100.0, SectorType::CornerMediumSpeed, 0.5),
            sector(8, "Luffield", 2100.0, 2350.0, SectorType::CornerLowSpeed, 0.6),
            sector(9, "Woodcote", 2350.0, 2550.0, SectorType::CornerHighSpeed, 0.4),
            sector(10, "National Straight", 2550.0, 3150.0, SectorType::Straight, 0.1),
            sector(11, "Copse", 3150.0, 3400.0, SectorType::CornerHighSpeed, 0.7),
            sector(12, "Maggotts", 3400.0, 3700.0, SectorType::CornerHighSpeed, 0.7),
            sector(13, "Becketts", 3700.0, 4100.0, SectorType::CornerMediumSpeed, 0.7),
            sector(14, "Hangar Straight", 4100.0, 4900.0, SectorType::Straight, 0.1),
            sector(15, "Stowe", 4900.0, 5150.0, SectorType::CornerHighSpeed, 0.6),
            sector(16, "Vale", 5150.0, 5400.0, SectorType::CornerLowSpeed, 0.5),
            sector(17, "Club", 5400.0, 5650.0, SectorType::CornerMediumSpeed, 0.4),
            sector(18, "Pit Straight Approach", 5650.0, 5891.0, SectorType::Straight, 0.1),
        ],
        drs_zones: vec![
            DrsZone {
                detection_distance: 900.0,
                activation_distance: 1150.0,
                end_distance: 1850.0,
            },
            DrsZone {
                detection_distance: 3750.0,
                activation_distance: 4150.0,
                end_distance: 4850.0,
            },
        ],
        pit_lane: PitLane {
            entry_distance: 5700.0,
            exit_distance: 200.0,
            speed_limit: 22.2,
            lane_time: 23.0,
        },
    }
}

/// A short, flat test loop for focused scenarios.
pub fn short_loop() -> Track {
    Track {
        id: "loop".into(),
        name: "Test Loop".into(),
        total_distance: 2000.0,
        default_laps: 20,
        tire_degradation_factor: 1.0,
        overtaking_difficulty: 0.4,
        track_difficulty: 0.2,
        base_temperature: 25.0,
        latitude: None,
        longitude: None,
        weather: WeatherParams {
            volatility: 0.2,
            rain_probability: 0.1,
        },
        sectors: vec![
            Sector {
                id: 1,
                name: "Front Straight".into(),
                start_distance: 0.0,
                end_distance: 1000.0,
                sector_type: SectorType::Straight,
                difficulty: 0.1,
                max_speed: None,
            },
            Sector {
                id: 2,
                name: "Back Corner".into(),
                start_distance: 1000.0,
                end_distance: 2000.0,
                sector_type: SectorType::CornerMediumSpeed,
                difficulty: 0.4,
                max_speed: None,
            },
        ],
        drs_zones: vec![DrsZone {
            detection_distance: 1800.0,
            activation_distance: 100.0,
            end_distance: 900.0,
        }],
        pit_lane: PitLane {
            entry_distance: 1800.0,
            exit_distance: 100.0,
            speed_limit: 20.0,
            lane_time: 16.0,
        },
    }
}
