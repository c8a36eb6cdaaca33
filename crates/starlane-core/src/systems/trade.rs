//! Trade FSM - route planning, travel, buying and selling for traders.
//!
//! ```text
//! Planning ──route──▶ Trading(MovingToBuy) ──buy──▶ Trading(MovingToSell) ──sell──▶ Planning
//!     ▲                       │ abort                        │ abort
//!     └───────────────────────┴──────────────────────────────┘
//! ```
//!
//! Agents in `Combat` mode are left to the combat system.

use hecs::{Entity, World};
use rand::Rng;

use super::analytics::Analytics;
use super::market::{
    best_local_route, best_sale_route, compute_routes, station_location, RouteMarket,
};
use super::movement::{steer, stop};
use super::navigation::{jump, Navigator};
use crate::components::{
    ActivityMode, Cargo, CargoCapacity, Faction, InSector, Inventory, Ledger, Pilot,
    PlayerControl, Station, TradeLeg, TradeRoute, Transform, Wallet,
};
use starlane_logic::catalog::Catalog;
use starlane_logic::config::TradeConfig;
use starlane_logic::economy::{quote_purchase, PurchaseQuote};
use starlane_logic::geometry::Vec2;
use starlane_logic::items::{quantity, Credits, ItemId};
use starlane_logic::movement::arrived;
use starlane_logic::universe::SectorId;

/// Shared read-only inputs of the trade system.
pub struct TradeContext<'a> {
    pub catalog: &'a Catalog,
    pub navigator: &'a Navigator,
    pub market: &'a RouteMarket,
    pub config: &'a TradeConfig,
}

/// Advance every AI trader by one tick.
pub fn trade_system(
    world: &mut World,
    ctx: &TradeContext,
    analytics: &mut Analytics,
    rng: &mut impl Rng,
    now_ms: f64,
) {
    let traders: Vec<Entity> = world
        .query::<(&Faction, &Pilot)>()
        .without::<&PlayerControl>()
        .iter()
        .filter(|(_, (faction, pilot))| **faction == Faction::Trader && !pilot.is_in_combat())
        .map(|(e, _)| e)
        .collect();

    // Filled on first use while the shared market is empty.
    let mut fallback: Option<Vec<TradeRoute>> = None;
    for entity in traders {
        let Ok(mode) = world.get::<&Pilot>(entity).map(|p| p.mode) else {
            continue;
        };
        match mode {
            ActivityMode::Planning => plan(world, ctx, rng, &mut fallback, entity),
            ActivityMode::Trading(leg) => travel(world, ctx, analytics, entity, leg, now_ms),
            ActivityMode::Combat => {}
        }
    }
}

fn location(world: &World, entity: Entity) -> Option<(SectorId, Vec2)> {
    let sector = world.get::<&InSector>(entity).ok()?.0;
    let pos = world.get::<&Transform>(entity).ok()?.pos;
    Some((sector, pos))
}

fn abort(world: &mut World, entity: Entity) {
    if let Ok(mut pilot) = world.get::<&mut Pilot>(entity) {
        pilot.reset();
    }
    stop(world, entity);
}

fn plan(
    world: &mut World,
    ctx: &TradeContext,
    rng: &mut impl Rng,
    fallback: &mut Option<Vec<TradeRoute>>,
    entity: Entity,
) {
    if unload_plan(world, ctx, entity) {
        return;
    }

    let route = if ctx.market.is_empty() {
        let view: &World = world;
        let routes = fallback.get_or_insert_with(|| {
            compute_routes(view, ctx.catalog, ctx.navigator.paths(), ctx.market.cargo_unit())
        });
        location(view, entity)
            .and_then(|here| best_local_route(view, ctx.navigator.paths(), routes, here))
    } else {
        ctx.market.get_best_route(rng)
    };

    match route {
        Some(route) => {
            log::debug!(
                "{:?} committed to {} route ({:?} → {:?}, expected {})",
                entity,
                route.item,
                route.buy_station,
                route.sell_station,
                route.expected_profit
            );
            if let Ok(mut pilot) = world.get::<&mut Pilot>(entity) {
                pilot.route = Some(route);
                pilot.mode = ActivityMode::Trading(TradeLeg::MovingToBuy);
            }
        }
        None => stop(world, entity),
    }
}

/// Cargo left aboard after an aborted leg goes to the best buyer before any
/// new route is taken. Returns true if a sale was planned.
fn unload_plan(world: &mut World, ctx: &TradeContext, entity: Entity) -> bool {
    let held = world
        .get::<&Cargo>(entity)
        .ok()
        .and_then(|c| c.0.iter().next().map(|(&item, &amount)| (item, amount)));
    let Some((item, amount)) = held else {
        return false;
    };
    let Some(here) = location(world, entity) else {
        return false;
    };
    let Some(route) =
        best_sale_route(world, ctx.catalog, ctx.navigator.paths(), here, item, amount)
    else {
        return false;
    };
    log::debug!("{:?} unloading {} {} at {:?}", entity, amount, item, route.sell_station);
    if let Ok(mut pilot) = world.get::<&mut Pilot>(entity) {
        pilot.route = Some(route);
        pilot.mode = ActivityMode::Trading(TradeLeg::MovingToSell);
    }
    true
}

fn travel(
    world: &mut World,
    ctx: &TradeContext,
    analytics: &mut Analytics,
    entity: Entity,
    leg: TradeLeg,
    now_ms: f64,
) {
    let Some(route) = world.get::<&Pilot>(entity).ok().and_then(|p| p.route) else {
        abort(world, entity);
        return;
    };
    let station = match leg {
        TradeLeg::MovingToBuy => route.buy_station,
        TradeLeg::MovingToSell => route.sell_station,
    };
    let (Some((station_sector, station_pos)), Some((sector, pos))) =
        (station_location(world, station), location(world, entity))
    else {
        abort(world, entity);
        return;
    };

    if station_sector != sector {
        let Some(gate) = ctx.navigator.next_gate(sector, station_sector).copied() else {
            log::debug!("{:?} has no way from {} to {}", entity, sector, station_sector);
            abort(world, entity);
            return;
        };
        if arrived(pos, gate.pos, ctx.config.arrival_radius) {
            let exit = ctx
                .navigator
                .gate(gate.destination_gate)
                .map(|g| g.pos)
                .or_else(|| world.get::<&Transform>(gate.destination_gate).ok().map(|t| t.pos));
            let Some(exit) = exit else {
                abort(world, entity);
                return;
            };
            let offset = ctx.config.gate_exit_offset;
            jump(world, entity, gate.destination_sector, exit + Vec2::new(offset, offset));
        } else {
            steer(world, entity, gate.pos);
        }
        return;
    }

    if !arrived(pos, station_pos, ctx.config.arrival_radius) {
        steer(world, entity, station_pos);
        return;
    }

    stop(world, entity);
    match leg {
        TradeLeg::MovingToBuy => {
            let bought = buy(world, ctx.catalog, entity, station, route.item);
            analytics.record_trade(route.item, bought.is_some(), now_ms);
            match bought {
                Some(quote) => {
                    log::debug!(
                        "{:?} bought {} {} for {}",
                        entity,
                        quote.amount,
                        route.item,
                        quote.total
                    );
                    if let Ok(mut pilot) = world.get::<&mut Pilot>(entity) {
                        pilot.cost_basis = quote.total;
                        pilot.mode = ActivityMode::Trading(TradeLeg::MovingToSell);
                    }
                }
                None => abort(world, entity),
            }
        }
        TradeLeg::MovingToSell => {
            sell(world, ctx.catalog, entity, &route);
            abort(world, entity);
        }
    }
}

/// Quote what `buyer` could buy of `item` at `station` right now.
pub fn quote_at(
    world: &World,
    catalog: &Catalog,
    buyer: Entity,
    station: Entity,
    item: ItemId,
) -> Option<PurchaseQuote> {
    let kind = world.get::<&Station>(station).ok()?.kind;
    let available = quantity(&world.get::<&Inventory>(station).ok()?.0, item);
    let capacity = world.get::<&CargoCapacity>(buyer).ok()?.0;
    let held = world.get::<&Cargo>(buyer).ok()?.total();
    let wallet = world.get::<&Wallet>(buyer).ok()?.0;
    quote_purchase(
        available,
        capacity.saturating_sub(held),
        catalog.price(kind, item, available),
        wallet,
    )
}

/// Buy as much of `item` as fits and is affordable. Returns the executed
/// quote, or `None` if nothing changed hands.
pub fn buy(
    world: &mut World,
    catalog: &Catalog,
    buyer: Entity,
    station: Entity,
    item: ItemId,
) -> Option<PurchaseQuote> {
    let quote = quote_at(world, catalog, buyer, station, item)?;
    transfer_goods(world, station, buyer, item, quote.amount, quote.total);
    Some(quote)
}

/// Sell everything of the route item aboard. Returns the revenue.
fn sell(world: &mut World, catalog: &Catalog, seller: Entity, route: &TradeRoute) -> Credits {
    let cost_basis = world.get::<&Pilot>(seller).map_or(0, |p| p.cost_basis);
    let revenue = sell_all(world, catalog, seller, route.sell_station, route.item).unwrap_or(0);
    if let Ok(mut ledger) = world.get::<&mut Ledger>(seller) {
        ledger.realized_profit += revenue - cost_basis;
    }
    if let Ok(mut pilot) = world.get::<&mut Pilot>(seller) {
        pilot.cost_basis = 0;
    }
    log::debug!(
        "{:?} sold {} for {} (profit {})",
        seller,
        route.item,
        revenue,
        revenue - cost_basis
    );
    revenue
}

/// Sell every unit of `item` held by `seller` at the station's current price.
///
/// Returns `None` when the seller holds none. Stations pay even if that
/// takes their wallet below zero.
pub fn sell_all(
    world: &mut World,
    catalog: &Catalog,
    seller: Entity,
    station: Entity,
    item: ItemId,
) -> Option<Credits> {
    let amount = quantity(&world.get::<&Cargo>(seller).ok()?.0, item);
    if amount == 0 {
        return None;
    }
    let kind = world.get::<&Station>(station).ok()?.kind;
    let stock = quantity(&world.get::<&Inventory>(station).ok()?.0, item);
    let revenue = catalog.price(kind, item, stock) * Credits::from(amount);
    transfer_goods(world, seller, station, item, amount, revenue);
    Some(revenue)
}

/// Move `amount` of `item` from `from` to `to`, paying `price` the other way.
///
/// Either side may be a station (`Inventory`) or a ship (`Cargo`).
pub(crate) fn transfer_goods(
    world: &mut World,
    from: Entity,
    to: Entity,
    item: ItemId,
    amount: u32,
    price: Credits,
) {
    take_stock(world, from, item, amount);
    give_stock(world, to, item, amount);
    if let Ok(mut wallet) = world.get::<&mut Wallet>(to) {
        wallet.0 -= price;
    }
    if let Ok(mut wallet) = world.get::<&mut Wallet>(from) {
        wallet.0 += price;
    }
}

fn stock_mut(stock: &mut starlane_logic::items::Stock, item: ItemId, f: impl FnOnce(u32) -> u32) {
    let next = f(quantity(stock, item));
    if next == 0 {
        stock.remove(&item);
    } else {
        stock.insert(item, next);
    }
}

fn take_stock(world: &mut World, entity: Entity, item: ItemId, amount: u32) {
    if let Ok(mut inventory) = world.get::<&mut Inventory>(entity) {
        // Stations keep zero entries so their listing stays stable.
        let held = inventory.0.entry(item).or_insert(0);
        *held = held.saturating_sub(amount);
    } else if let Ok(mut cargo) = world.get::<&mut Cargo>(entity) {
        stock_mut(&mut cargo.0, item, |held| held.saturating_sub(amount));
    }
}

fn give_stock(world: &mut World, entity: Entity, item: ItemId, amount: u32) {
    if let Ok(mut inventory) = world.get::<&mut Inventory>(entity) {
        *inventory.0.entry(item).or_insert(0) += amount;
    } else if let Ok(mut cargo) = world.get::<&mut Cargo>(entity) {
        stock_mut(&mut cargo.0, item, |held| held + amount);
    }
}
