//! # Price Change Threshold
//!
//! Relative change in parts-per-million, computed in `u128` so that
//! `u64 * 1_000_000` cannot overflow.

/// Parts-per-million scale.
pub const ONE_MILLION: u128 = 1_000_000;

/// Relative change of `new` against `old` in ppm, rounded down.
///
/// `None` when `old` is zero, where a relative change is undefined.
pub fn price_change_ppm(old: u64, new: u64) -> Option<u128> {
    if old == 0 {
        return None;
    }
    let delta = u128::from(old.abs_diff(new));
    Some(delta * ONE_MILLION / u128::from(old))
}

/// Whether `new` moves far enough from `old` to be written.
///
/// Evaluates `|new - old| * 1_000_000 >= old * min_ppm` without division.
/// From a zero price any nonzero price is accepted.
pub fn is_above_min_price_change(old: u64, new: u64, min_ppm: u32) -> bool {
    if old == 0 {
        return new != 0;
    }
    let delta = u128::from(old.abs_diff(new));
    delta * ONE_MILLION >= u128::from(old) * u128::from(min_ppm)
}
