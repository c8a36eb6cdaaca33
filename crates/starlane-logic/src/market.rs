//! Trade route scoring.
//!
//! A route is "buy item X at producer A, sell it at consumer B". Routes are
//! ranked by expected profit per unit of travel.

use crate::items::Credits;

/// Travel cost charged per gate jump when the two stations sit in different
/// sectors.
pub const CROSS_SECTOR_HOP_COST: f32 = 5000.0;

/// Added to the distance before dividing, so adjacent stations do not score
/// infinitely.
pub const DISTANCE_BIAS: f32 = 100.0;

/// Expected profit of hauling `cargo_unit` units bought at `buy_price` and
/// sold at `sell_price`. `None` unless the sell price is strictly higher.
pub fn route_profit(buy_price: Credits, sell_price: Credits, cargo_unit: u32) -> Option<Credits> {
    let per_unit = sell_price - buy_price;
    (per_unit > 0).then(|| per_unit * Credits::from(cargo_unit))
}

/// Travel cost estimate between two stations.
///
/// Same sector: straight-line distance. Different sectors: hop count times
/// [`CROSS_SECTOR_HOP_COST`].
pub fn route_distance(euclidean: f32, hops: usize) -> f32 {
    if hops == 0 {
        euclidean
    } else {
        hops as f32 * CROSS_SECTOR_HOP_COST
    }
}

/// Profit per unit of travel.
pub fn route_score(expected_profit: Credits, distance: f32) -> f64 {
    expected_profit as f64 / (f64::from(distance) + f64::from(DISTANCE_BIAS))
}
