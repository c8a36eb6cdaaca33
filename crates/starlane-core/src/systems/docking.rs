//! Docking and the station trade menu for the player ship.

use hecs::{Entity, World};
use serde::Serialize;
use thiserror::Error;

use super::movement::stop;
use super::navigation::Navigator;
use super::trade::transfer_goods;
use crate::components::{
    Cargo, CargoCapacity, Docked, InSector, InteractionRadius, Inventory, Station, Transform,
    Wallet,
};
use starlane_logic::catalog::Catalog;
use starlane_logic::items::{quantity, Credits, ItemId};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DockError {
    #[error("{0:?} is not a station")]
    UnknownStation(Entity),
    #[error("station is in another sector")]
    WrongSector,
    #[error("station is out of docking range")]
    OutOfRange,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TradeError {
    #[error("ship is not docked")]
    NotDocked,
    #[error("docked station no longer exists")]
    UnknownStation,
    #[error("station has no {0} in stock")]
    OutOfStock(ItemId),
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Credits, available: Credits },
    #[error("cargo hold is full")]
    CargoFull,
    #[error("no {0} aboard to sell")]
    NothingToSell(ItemId),
}

/// One row of a station's trade menu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeListing {
    pub item: ItemId,
    pub name: String,
    pub count: u32,
    pub price: Credits,
    pub base_price: f64,
}

/// A completed player trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TradeReceipt {
    pub item: ItemId,
    pub amount: u32,
    pub unit_price: Credits,
    pub total: Credits,
}

fn station_in_reach(world: &World, ship: Entity, station: Entity) -> Result<(), DockError> {
    let (ship_sector, ship_pos) =
        match (world.get::<&InSector>(ship), world.get::<&Transform>(ship)) {
            (Ok(s), Ok(t)) => (s.0, t.pos),
            _ => return Err(DockError::OutOfRange),
        };
    if world.get::<&Station>(station).is_err() {
        return Err(DockError::UnknownStation(station));
    }
    let sector = world
        .get::<&InSector>(station)
        .map_err(|_| DockError::UnknownStation(station))?
        .0;
    if sector != ship_sector {
        return Err(DockError::WrongSector);
    }
    let pos = world
        .get::<&Transform>(station)
        .map_err(|_| DockError::UnknownStation(station))?
        .pos;
    let radius = world.get::<&InteractionRadius>(station).map_or(0.0, |r| r.0);
    if ship_pos.distance(&pos) >= radius {
        return Err(DockError::OutOfRange);
    }
    Ok(())
}

/// Nearest station the ship could dock at right now.
pub fn dockable_station(world: &World, navigator: &Navigator, ship: Entity) -> Option<Entity> {
    let sector = world.get::<&InSector>(ship).ok()?.0;
    let pos = world.get::<&Transform>(ship).ok()?.pos;
    navigator
        .stations_in(sector)
        .iter()
        .copied()
        .filter(|&station| station_in_reach(world, ship, station).is_ok())
        .filter_map(|station| {
            let distance = pos.distance(&world.get::<&Transform>(station).ok()?.pos);
            Some((station, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(station, _)| station)
}

/// Dock at `station`: the ship stops and stays put until it undocks.
pub fn dock(world: &mut World, ship: Entity, station: Entity) -> Result<(), DockError> {
    station_in_reach(world, ship, station)?;
    stop(world, ship);
    let _ = world.insert_one(ship, Docked(station));
    log::debug!("{:?} docked at {:?}", ship, station);
    Ok(())
}

/// Leave the current station. Returns false if the ship was not docked.
pub fn undock(world: &mut World, ship: Entity) -> bool {
    world.remove_one::<Docked>(ship).is_ok()
}

/// Trade menu of `station`, sorted by item, or `None` if it is not a station.
pub fn trade_listing(
    world: &World,
    catalog: &Catalog,
    station: Entity,
) -> Option<Vec<TradeListing>> {
    let kind = world.get::<&Station>(station).ok()?.kind;
    let inventory = world.get::<&Inventory>(station).ok()?;
    Some(
        inventory
            .0
            .iter()
            .map(|(&item, &count)| TradeListing {
                item,
                name: catalog.item(item).map_or_else(|| item.key().to_string(), |d| d.name.clone()),
                count,
                price: catalog.price(kind, item, count),
                base_price: catalog.base_price(item),
            })
            .collect(),
    )
}

fn docked_station(world: &World, ship: Entity) -> Result<Entity, TradeError> {
    let station = world.get::<&Docked>(ship).map_err(|_| TradeError::NotDocked)?.0;
    if world.get::<&Station>(station).is_err() {
        return Err(TradeError::UnknownStation);
    }
    Ok(station)
}

/// Buy up to `amount` units of `item` from the docked station.
pub fn player_buy(
    world: &mut World,
    catalog: &Catalog,
    ship: Entity,
    item: ItemId,
    amount: u32,
) -> Result<TradeReceipt, TradeError> {
    let station = docked_station(world, ship)?;
    let kind = world.get::<&Station>(station).map_err(|_| TradeError::UnknownStation)?.kind;
    let available = world
        .get::<&Inventory>(station)
        .map(|inv| quantity(&inv.0, item))
        .unwrap_or(0);
    if available == 0 || amount == 0 {
        return Err(TradeError::OutOfStock(item));
    }
    let capacity = world.get::<&CargoCapacity>(ship).map_or(0, |c| c.0);
    let held = world.get::<&Cargo>(ship).map_or(0, |c| c.total());
    let free = capacity.saturating_sub(held);
    if free == 0 {
        return Err(TradeError::CargoFull);
    }

    let amount = amount.min(available).min(free);
    let unit_price = catalog.price(kind, item, available);
    let total = unit_price * Credits::from(amount);
    let wallet = world.get::<&Wallet>(ship).map_or(0, |w| w.0);
    if wallet < total {
        return Err(TradeError::InsufficientFunds {
            needed: total,
            available: wallet,
        });
    }

    transfer_goods(world, station, ship, item, amount, total);
    Ok(TradeReceipt {
        item,
        amount,
        unit_price,
        total,
    })
}

/// Sell up to `amount` units of `item` to the docked station.
pub fn player_sell(
    world: &mut World,
    catalog: &Catalog,
    ship: Entity,
    item: ItemId,
    amount: u32,
) -> Result<TradeReceipt, TradeError> {
    let station = docked_station(world, ship)?;
    let held = world.get::<&Cargo>(ship).map_or(0, |c| quantity(&c.0, item));
    if held == 0 || amount == 0 {
        return Err(TradeError::NothingToSell(item));
    }
    let kind = world.get::<&Station>(station).map_err(|_| TradeError::UnknownStation)?.kind;
    let stock = world
        .get::<&Inventory>(station)
        .map(|inv| quantity(&inv.0, item))
        .unwrap_or(0);

    let amount = amount.min(held);
    let unit_price = catalog.price(kind, item, stock);
    let total = unit_price * Credits::from(amount);
    transfer_goods(world, ship, station, item, amount, total);
    Ok(TradeReceipt {
        item,
        amount,
        unit_price,
        total,
    })
}
