//! Currency utilities.
//!
//! - `rounding` - `round2`, even shares, and the 0.01 comparison tolerance
//! - `text` - parsing user-typed amounts and rendering them for display

pub mod rounding;
pub mod text;

#[cfg(test)]
mod props;

pub use rounding::{TOLERANCE, exceeds, round2, share};
pub use text::{DisplayFormat, format_amount, format_currency, format_input, parse};
