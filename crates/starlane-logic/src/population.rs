//! Population pressure math: how many agents a sector's wealth attracts.
//!
//! The engine-side spawner owns the timers and the RNG; the arithmetic lives
//! here.

use crate::items::Credits;

/// Pirates attracted by a wealth increase of `delta` credits since the last
/// check. Zero unless `delta` exceeds `threshold`; never more than `cap`.
pub fn pirates_for_wealth_delta(delta: Credits, threshold: Credits, cap: u32) -> u32 {
    if threshold <= 0 || delta <= threshold {
        return 0;
    }
    let raw = delta / threshold;
    u32::try_from(raw).unwrap_or(u32::MAX).min(cap)
}

/// Check interval for one sector: `base ± jitter`, with `roll` in `[0, 1)`.
pub fn jittered_interval(base_ms: f64, jitter_ms: f64, roll: f64) -> f64 {
    (base_ms + (roll * 2.0 - 1.0) * jitter_ms).max(0.0)
}

/// How many of `requested` spawns fit under a global cap.
pub fn spawn_allowance(requested: u32, current: usize, cap: usize) -> u32 {
    let room = cap.saturating_sub(current);
    requested.min(u32::try_from(room).unwrap_or(u32::MAX))
}
