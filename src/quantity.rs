#[macro_use]
mod macros;

pub mod currency;
pub mod energy;
pub mod mass;
pub mod price;
pub mod time;

/// Round half away from zero to the given number of decimals.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    // Avoid reporting `-0.0`:
    if rounded == 0.0 { 0.0 } else { rounded }
}
