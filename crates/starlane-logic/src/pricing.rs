//! Stock-relative price curve.
//!
//! `price = base × (2.0 − stock / target)`, clamped to `[0.1×base, 2.0×base]`,
//! rounded, and floored at 1. Scarcity doubles the price; a station holding
//! twice its target stock dumps at a tenth of base.

use crate::items::Credits;

/// Target stock used when the archetype defines none (or defines zero).
pub const FALLBACK_TARGET_STOCK: u32 = 100;

/// Lower bound of the price multiplier.
pub const MIN_MULTIPLIER: f64 = 0.1;

/// Upper bound of the price multiplier.
pub const MAX_MULTIPLIER: f64 = 2.0;

/// Price multiplier for a stock level, before clamping.
fn raw_multiplier(stock: u32, target: u32) -> f64 {
    2.0 - f64::from(stock) / f64::from(target)
}

/// Price of an item with `base_price` at a station currently holding `stock`
/// units and targeting `target` units.
pub fn price(base_price: f64, stock: u32, target: Option<u32>) -> Credits {
    let target = match target {
        Some(t) if t > 0 => t,
        _ => FALLBACK_TARGET_STOCK,
    };
    let multiplier = raw_multiplier(stock, target).clamp(MIN_MULTIPLIER, MAX_MULTIPLIER);
    ((base_price * multiplier).round() as Credits).max(1)
}

/// Cheapest price the curve can produce for `base_price`.
pub fn floor_price(base_price: f64) -> Credits {
    ((base_price * MIN_MULTIPLIER).round() as Credits).max(1)
}

/// Highest price the curve can produce for `base_price`.
pub fn ceiling_price(base_price: f64) -> Credits {
    ((base_price * MAX_MULTIPLIER).round() as Credits).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stock_doubles() {
        assert_eq!(price(10.0, 0, Some(100)), 20);
        assert_eq!(price(2000.0, 0, Some(1)), 4000);
    }

    #[test]
    fn test_at_target_is_base() {
        assert_eq!(price(40.0, 50, Some(50)), 40);
    }

    #[test]
    fn test_flooded_hits_floor() {
        assert_eq!(price(10.0, 200, Some(100)), 1);
        assert_eq!(price(50.0, 200, Some(100)), 5);
        assert_eq!(price(50.0, 10_000, Some(100)), 5);
    }

    #[test]
    fn test_fallback_target() {
        // No target and zero target both fall back to 100.
        assert_eq!(price(10.0, 100, None), 10);
        assert_eq!(price(10.0, 100, Some(0)), 10);
    }

    #[test]
    fn test_never_below_one() {
        assert_eq!(price(1.0, 1000, Some(10)), 1);
        assert_eq!(floor_price(1.0), 1);
    }

    #[test]
    fn test_bounds_helpers() {
        assert_eq!(floor_price(200.0), 20);
        assert_eq!(ceiling_price(200.0), 400);
    }
}
