mod drivers;
mod tracks;

pub use drivers::{full_grid, reference_driver, twins};
pub use tracks::{short_loop, silverstone};
