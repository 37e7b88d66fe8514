pub mod appliance;
pub mod results;

pub use appliance::*;
pub use results::*;

/// Round to two decimal places, the precision every monetary and energy
/// figure in the public records carries.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to one decimal place, used for coarse equivalence figures.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
