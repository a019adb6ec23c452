use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use cubehub_core::{
    Content, GameConfig, HandRule, JokerDef, JokerRarity, ShopId, UpgradeDef, UpgradeEffect,
};

/// Shape of `catalog.json`. Every section is optional; a present joker list
/// replaces the built-in pool and a present shop replaces that shop's catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    pub jokers: Option<Vec<JokerDef>>,
    pub shops: BTreeMap<ShopId, Vec<UpgradeDef>>,
}

impl CatalogFile {
    pub fn apply(self, mut content: Content) -> Content {
        if let Some(jokers) = self.jokers {
            content.jokers = jokers;
        }
        for (shop, defs) in self.shops {
            content.shops.insert(shop, defs);
        }
        content
    }
}
