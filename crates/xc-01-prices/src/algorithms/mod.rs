//! # Algorithms
//!
//! Pure integer arithmetic shared by the keeper and the proposer path.

pub mod median;
pub mod price_change;

pub use median::median;
pub use price_change::{is_above_min_price_change, price_change_ppm};
