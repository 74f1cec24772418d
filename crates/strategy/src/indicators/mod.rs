// Streaming indicators in the style of the `ta` crate: feed one bar at a time
// through `Next`, read `None` until the warm-up is complete.
pub mod dmi;
pub mod momentum;

pub use dmi::{DirectionalMovementIndex, DmiOutput};
pub use momentum::Momentum;
