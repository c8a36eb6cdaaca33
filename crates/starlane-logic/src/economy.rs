//! Pure economy logic - production cycles and purchase quotes.

use crate::items::{quantity, Credits, ItemId, Stock};
use crate::stations::ProductionRule;

/// Result of one production attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductionOutcome {
    /// Inputs consumed and outputs produced.
    Produced,
    /// The first input found below its rate; nothing changed.
    Starved(ItemId),
}

/// Whether a station's production interval has elapsed.
///
/// Strictly greater than, so a station that produced at `t` next runs after
/// `t + interval`.
pub fn production_due(now_ms: f64, last_tick_ms: f64, interval_ms: u64) -> bool {
    now_ms - last_tick_ms > interval_ms as f64
}

/// Run one production cycle against `stock`.
///
/// All-or-nothing: every consumed item must be at or above its rate, otherwise
/// the stock is left untouched.
pub fn run_production(rule: &ProductionRule, stock: &mut Stock) -> ProductionOutcome {
    if let Some(short) = rule
        .consumes
        .iter()
        .find(|input| quantity(stock, input.item) < input.rate)
    {
        return ProductionOutcome::Starved(short.item);
    }

    for input in &rule.consumes {
        if let Some(held) = stock.get_mut(&input.item) {
            *held -= input.rate;
        }
    }
    for output in &rule.produces {
        *stock.entry(output.item).or_insert(0) += output.rate;
    }
    ProductionOutcome::Produced
}

/// What an agent can buy at a station right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseQuote {
    pub amount: u32,
    pub unit_price: Credits,
    pub total: Credits,
}

/// Quote a purchase of up to `free_capacity` units from `available` stock.
///
/// Returns `None` when nothing can be bought or the buyer cannot afford it.
pub fn quote_purchase(
    available: u32,
    free_capacity: u32,
    unit_price: Credits,
    wallet: Credits,
) -> Option<PurchaseQuote> {
    let amount = available.min(free_capacity);
    if amount == 0 {
        return None;
    }
    let total = unit_price * Credits::from(amount);
    if wallet < total {
        return None;
    }
    Some(PurchaseQuote {
        amount,
        unit_price,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stations::ItemRate;

    fn smelter() -> ProductionRule {
        ProductionRule {
            consumes: vec![
                ItemRate::new(ItemId::Energy, 10),
                ItemRate::new(ItemId::Ore, 5),
            ],
            produces: vec![ItemRate::new(ItemId::Steel, 2)],
            interval_ms: 3000,
        }
    }

    #[test]
    fn test_production_consumes_and_produces() {
        let mut stock: Stock = [(ItemId::Energy, 25), (ItemId::Ore, 5)].into_iter().collect();
        assert_eq!(run_production(&smelter(), &mut stock), ProductionOutcome::Produced);
        assert_eq!(quantity(&stock, ItemId::Energy), 15);
        assert_eq!(quantity(&stock, ItemId::Ore), 0);
        assert_eq!(quantity(&stock, ItemId::Steel), 2);
    }

    #[test]
    fn test_starved_production_changes_nothing() {
        let mut stock: Stock = [(ItemId::Energy, 0), (ItemId::Ore, 50)].into_iter().collect();
        let before = stock.clone();
        assert_eq!(
            run_production(&smelter(), &mut stock),
            ProductionOutcome::Starved(ItemId::Energy)
        );
        assert_eq!(stock, before);
    }

    #[test]
    fn test_missing_input_counts_as_zero() {
        let mut stock: Stock = [(ItemId::Energy, 100)].into_iter().collect();
        assert_eq!(
            run_production(&smelter(), &mut stock),
            ProductionOutcome::Starved(ItemId::Ore)
        );
    }

    #[test]
    fn test_production_due_is_strict() {
        assert!(!production_due(3000.0, 0.0, 3000));
        assert!(production_due(3001.0, 0.0, 3000));
    }

    #[test]
    fn test_quote_limits_to_capacity() {
        let q = quote_purchase(1000, 100, 5, 10_000).unwrap();
        assert_eq!(q.amount, 100);
        assert_eq!(q.total, 500);
    }

    #[test]
    fn test_quote_rejects_unaffordable_or_empty() {
        assert_eq!(quote_purchase(0, 100, 5, 10_000), None);
        assert_eq!(quote_purchase(100, 0, 5, 10_000), None);
        assert_eq!(quote_purchase(100, 100, 5, 499), None);
    }
}
