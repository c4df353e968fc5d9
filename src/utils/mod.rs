pub mod errors;
pub mod math;
pub mod rng;

pub use errors::RaceError;
pub use rng::RaceRng;
