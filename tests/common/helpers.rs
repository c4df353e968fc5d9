use racesim::{RaceEngine, RaceState};

/// Advances the engine by whole seconds in the contract 0.1 s substeps.
pub fn run_for(engine: &mut RaceEngine, seconds: f64) {
    let steps = (seconds / 0.1).round() as usize;
    for _ in 0..steps {
        engine.update(0.1);
    }
}

/// The driver currently shown in P1.
pub fn leader_id(state: &RaceState) -> String {
    state
        .vehicles
        .iter()
        .find(|v| v.position == 1)
        .map(|v| v.driver_id.clone())
        .expect("a race always has a leader")
}

pub fn odometer(state: &RaceState, driver_id: &str) -> f64 {
    state
        .vehicle(driver_id)
        .expect("driver exists")
        .total_distance
}
