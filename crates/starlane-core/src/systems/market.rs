//! Route market - periodically rebuilt cache of the most profitable
//! producer → consumer hauls.

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{InSector, Inventory, Station, TradeRoute, Transform};
use starlane_logic::catalog::Catalog;
use starlane_logic::config::MarketConfig;
use starlane_logic::geometry::Vec2;
use starlane_logic::items::{quantity, Credits, ItemId};
use starlane_logic::market::{route_distance, route_profit, route_score};
use starlane_logic::pathfinding::PathTable;
use starlane_logic::stations::StationKind;
use starlane_logic::universe::SectorId;

/// Read-only view of a station used while scoring routes.
#[derive(Debug, Clone)]
struct StationView {
    entity: Entity,
    kind: StationKind,
    sector: SectorId,
    pos: Vec2,
    inventory: starlane_logic::items::Stock,
}

fn collect_stations(world: &World) -> Vec<StationView> {
    world
        .query::<(&Station, &InSector, &Transform, &Inventory)>()
        .iter()
        .map(|(entity, (station, sector, transform, inventory))| StationView {
            entity,
            kind: station.kind,
            sector: sector.0,
            pos: transform.pos,
            inventory: inventory.0.clone(),
        })
        .collect()
}

/// Travel cost between two points, or `None` if no path joins their sectors.
pub fn travel_distance(
    paths: &PathTable,
    from: (SectorId, Vec2),
    to: (SectorId, Vec2),
) -> Option<f32> {
    let hops = paths.hop_distance(from.0, to.0)?;
    Some(route_distance(from.1.distance(&to.1), hops))
}

/// Every profitable route in the world, best first.
///
/// Equal scores keep discovery order, so two calls over an unchanged world
/// return identical lists.
pub fn compute_routes(
    world: &World,
    catalog: &Catalog,
    paths: &PathTable,
    cargo_unit: u32,
) -> Vec<TradeRoute> {
    let stations = collect_stations(world);
    let mut routes = Vec::new();

    for producer in &stations {
        let Some(rule) = catalog.archetype(producer.kind).and_then(|a| a.production.as_ref())
        else {
            continue;
        };

        for output in &rule.produces {
            let item = output.item;
            let stock = quantity(&producer.inventory, item);
            if stock == 0 {
                continue;
            }
            let buy_price = catalog.price(producer.kind, item, stock);

            for consumer in &stations {
                if consumer.entity == producer.entity {
                    continue;
                }
                let consumes = catalog
                    .archetype(consumer.kind)
                    .is_some_and(|a| a.consumes(item));
                if !consumes {
                    continue;
                }
                let sell_price =
                    catalog.price(consumer.kind, item, quantity(&consumer.inventory, item));
                let Some(expected_profit) = route_profit(buy_price, sell_price, cargo_unit) else {
                    continue;
                };
                let Some(distance) = travel_distance(
                    paths,
                    (producer.sector, producer.pos),
                    (consumer.sector, consumer.pos),
                ) else {
                    continue;
                };

                routes.push(TradeRoute {
                    buy_station: producer.entity,
                    sell_station: consumer.entity,
                    item,
                    expected_profit,
                    score: route_score(expected_profit, distance),
                    distance,
                });
            }
        }
    }

    routes.sort_by(|a, b| b.score.total_cmp(&a.score));
    routes
}

/// Shared, throttled route cache.
#[derive(Debug, Clone)]
pub struct RouteMarket {
    config: MarketConfig,
    routes: Vec<TradeRoute>,
    last_refresh_ms: f64,
}

impl RouteMarket {
    pub fn new(config: MarketConfig) -> Self {
        Self {
            config,
            routes: Vec::new(),
            last_refresh_ms: 0.0,
        }
    }

    /// Rebuild the cache if the refresh interval has passed.
    pub fn update(
        &mut self,
        world: &World,
        catalog: &Catalog,
        paths: &PathTable,
        now_ms: f64,
    ) -> bool {
        if now_ms - self.last_refresh_ms < self.config.refresh_interval_ms {
            return false;
        }
        self.last_refresh_ms = now_ms;
        self.rebuild(world, catalog, paths);
        true
    }

    /// Unconditionally rebuild the cache.
    pub fn rebuild(&mut self, world: &World, catalog: &Catalog, paths: &PathTable) {
        let mut routes = compute_routes(world, catalog, paths, self.config.cargo_unit);
        let found = routes.len();
        routes.truncate(self.config.max_routes);
        log::trace!(
            "Route market rebuilt: {} candidates, best score {:.3}",
            found,
            routes.first().map_or(0.0, |r| r.score)
        );
        self.routes = routes;
    }

    /// A route drawn uniformly from the best few, or `None` if the cache is
    /// empty. Spreading picks keeps agents from convoying onto one route.
    pub fn get_best_route(&self, rng: &mut impl Rng) -> Option<TradeRoute> {
        if self.routes.is_empty() {
            return None;
        }
        let k = self.config.top_k.clamp(1, self.routes.len());
        Some(self.routes[rng.gen_range(0..k)])
    }

    pub fn routes(&self) -> &[TradeRoute] {
        &self.routes
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn cargo_unit(&self) -> u32 {
        self.config.cargo_unit
    }
}

/// Best route for one agent when no shared cache is available.
///
/// `routes` is the output of [`compute_routes`]; the agent's approach to the
/// buy station is added to each route's travel cost before ranking.
pub fn best_local_route(
    world: &World,
    paths: &PathTable,
    routes: &[TradeRoute],
    agent: (SectorId, Vec2),
) -> Option<TradeRoute> {
    let mut best: Option<TradeRoute> = None;
    for route in routes {
        let Some(buy_at) = station_location(world, route.buy_station) else {
            continue;
        };
        let Some(approach) = travel_distance(paths, agent, buy_at) else {
            continue;
        };
        let mut route = *route;
        route.distance += approach;
        route.score = route_score(route.expected_profit, route.distance);
        if best.map_or(true, |b| route.score > b.score) {
            best = Some(route);
        }
    }
    best
}

/// Where to unload `amount` of `item` already aboard.
///
/// Stations that consume the item are preferred; any reachable station will
/// do otherwise. The whole sale counts as profit when scoring, and the
/// returned route starts and ends at the chosen station.
pub fn best_sale_route(
    world: &World,
    catalog: &Catalog,
    paths: &PathTable,
    agent: (SectorId, Vec2),
    item: ItemId,
    amount: u32,
) -> Option<TradeRoute> {
    let stations = collect_stations(world);
    let best_among = |consumers_only: bool| {
        let mut best: Option<TradeRoute> = None;
        for station in &stations {
            let consumes = catalog
                .archetype(station.kind)
                .is_some_and(|a| a.consumes(item));
            if consumers_only && !consumes {
                continue;
            }
            let Some(distance) = travel_distance(paths, agent, (station.sector, station.pos))
            else {
                continue;
            };
            let unit_price =
                catalog.price(station.kind, item, quantity(&station.inventory, item));
            let revenue = unit_price * Credits::from(amount);
            let route = TradeRoute {
                buy_station: station.entity,
                sell_station: station.entity,
                item,
                expected_profit: revenue,
                score: route_score(revenue, distance),
                distance,
            };
            if best.map_or(true, |b| route.score > b.score) {
                best = Some(route);
            }
        }
        best
    };
    best_among(true).or_else(|| best_among(false))
}

/// Sector and position of a live station.
pub fn station_location(world: &World, station: Entity) -> Option<(SectorId, Vec2)> {
    let mut query = world.query_one::<(&Station, &InSector, &Transform)>(station).ok()?;
    let (_, sector, transform) = query.get()?;
    Some((sector.0, transform.pos))
}
