//! Resource catalog - item definitions plus station archetypes.
//!
//! Loaded once before the simulation starts and treated as immutable.

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::items::{builtin_items, Credits, ItemDef, ItemId, Stock};
use crate::pricing;
use crate::stations::{builtin_archetypes, Archetype, StationKind};

/// Errors raised while loading or validating a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("item {0} is defined more than once")]
    DuplicateItem(ItemId),
    #[error("item {0} has a non-positive base price")]
    InvalidPrice(ItemId),
    #[error("archetype {0:?} is defined more than once")]
    DuplicateArchetype(StationKind),
    #[error("archetype {kind:?} references undefined item {item}")]
    UnknownItem { kind: StationKind, item: ItemId },
    #[error("archetype {0:?} has a zero production interval")]
    ZeroInterval(StationKind),
}

#[derive(Deserialize)]
struct CatalogFile {
    items: Vec<ItemDef>,
    archetypes: Vec<Archetype>,
}

/// Immutable item + archetype table.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: BTreeMap<ItemId, ItemDef>,
    archetypes: BTreeMap<StationKind, Archetype>,
}

impl Catalog {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        // The built-in tables are validated by tests; construct directly.
        Self {
            items: builtin_items().into_iter().map(|i| (i.id, i)).collect(),
            archetypes: builtin_archetypes()
                .into_iter()
                .map(|a| (a.kind, a))
                .collect(),
        }
    }

    /// Build a catalog from explicit tables, validating cross references.
    pub fn new(items: Vec<ItemDef>, archetypes: Vec<Archetype>) -> Result<Self, CatalogError> {
        let mut item_map = BTreeMap::new();
        for item in items {
            if item.base_price <= 0.0 {
                return Err(CatalogError::InvalidPrice(item.id));
            }
            let id = item.id;
            if item_map.insert(id, item).is_some() {
                return Err(CatalogError::DuplicateItem(id));
            }
        }

        let mut archetype_map = BTreeMap::new();
        for archetype in archetypes {
            let kind = archetype.kind;
            if let Some(rule) = &archetype.production {
                if rule.interval_ms == 0 {
                    return Err(CatalogError::ZeroInterval(kind));
                }
                for rate in rule.consumes.iter().chain(rule.produces.iter()) {
                    if !item_map.contains_key(&rate.item) {
                        return Err(CatalogError::UnknownItem {
                            kind,
                            item: rate.item,
                        });
                    }
                }
            }
            for item in archetype.init_inventory.keys() {
                if !item_map.contains_key(item) {
                    return Err(CatalogError::UnknownItem { kind, item: *item });
                }
            }
            if archetype_map.insert(kind, archetype).is_some() {
                return Err(CatalogError::DuplicateArchetype(kind));
            }
        }

        Ok(Self {
            items: item_map,
            archetypes: archetype_map,
        })
    }

    /// Parse a catalog from JSON of the form `{"items": [...], "archetypes": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let catalog = Self::new(file.items, file.archetypes)?;
        log::debug!(
            "Loaded catalog: {} items, {} archetypes",
            catalog.items.len(),
            catalog.archetypes.len()
        );
        Ok(catalog)
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemDef> {
        self.items.values()
    }

    pub fn archetype(&self, kind: StationKind) -> Option<&Archetype> {
        self.archetypes.get(&kind)
    }

    pub fn archetypes(&self) -> impl Iterator<Item = &Archetype> {
        self.archetypes.values()
    }

    /// Base price of an item, or 0 when the item is unknown.
    pub fn base_price(&self, id: ItemId) -> f64 {
        self.items.get(&id).map(|i| i.base_price).unwrap_or(0.0)
    }

    /// Current price of `item` at a station of `kind` holding `stock` units.
    ///
    /// Unknown items are priced at 0.
    pub fn price(&self, kind: StationKind, item: ItemId, stock: u32) -> Credits {
        let Some(def) = self.items.get(&item) else {
            return 0;
        };
        let target = self.archetype(kind).and_then(|a| a.target_stock(item));
        pricing::price(def.base_price, stock, target)
    }

    /// Value of a stock map at base prices (used for wealth accounting).
    pub fn stock_value(&self, stock: &Stock) -> Credits {
        stock
            .iter()
            .map(|(item, count)| (self.base_price(*item) * f64::from(*count)).round() as Credits)
            .sum()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
