//! Monotonic boundary search on a quantized grid

use tracing::trace;

/// Largest value on the grid `min, min + step, min + 2*step, ... <= max` for
/// which `fits` holds.
///
/// `fits` must be monotone over the grid: true up to some boundary and false
/// after it. Returns `min` when `fits(min)` is false or `max < min`. A `step`
/// of zero is treated as one.
pub fn max_satisfying<F>(min: u64, max: u64, step: u64, mut fits: F) -> u64
where
    F: FnMut(u64) -> bool,
{
    let step = step.max(1);
    if max <= min || !fits(min) {
        return min;
    }

    // Search over grid indices; fits(min + lo * step) always holds
    let mut lo = 0u64;
    let mut hi = (max - min) / step;
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        let candidate = min + mid * step;
        if fits(candidate) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
        trace!(lo, hi, candidate, "boundary search step");
    }
    min + lo * step
}
