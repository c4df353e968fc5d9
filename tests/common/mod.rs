mod assertions;
mod fixtures;
mod helpers;

// Re-export
pub use assertions::assert_state_valid;
pub use fixtures::*;
pub use helpers::*;
