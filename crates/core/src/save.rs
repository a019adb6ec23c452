use crate::{Currency, Feature, ShopId, UpgradeState, SNAKE_BASE_HEALTH};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const SAVE_VERSION: u32 = 1;

fn default_version() -> u32 {
    SAVE_VERSION
}

/// Cube and unlock parameters that live outside the upgrade trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreParams {
    pub health: i64,
    pub max_health: i64,
    pub click_value: i64,
    pub cooldown_reduction: u32,
    pub cooldown: Option<u32>,
    pub shop_revealed: bool,
    pub bomb_count: usize,
    pub features: BTreeSet<Feature>,
    pub snake_max_health: i64,
    pub snake_extra_lives: u32,
}

impl Default for CoreParams {
    fn default() -> Self {
        Self {
            health: 10,
            max_health: 10,
            click_value: 1,
            cooldown_reduction: 0,
            cooldown: None,
            shop_revealed: false,
            bomb_count: 1,
            features: BTreeSet::new(),
            snake_max_health: SNAKE_BASE_HEALTH,
            snake_extra_lives: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub clicks: u64,
    pub card_runs: u32,
    pub rounds_cleared: u32,
    pub best_card_score: i64,
    pub words_scored: u32,
    pub best_word_score: i64,
    pub wagers: u32,
    pub snake_games: u32,
    pub tetris_games: u32,
}

/// Flat snapshot of everything that persists between sessions. Missing
/// fields take their defaults, so older saves keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    #[serde(default = "default_version")]
    pub version: u32,
    pub currencies: BTreeMap<Currency, i64>,
    pub upgrades: BTreeMap<ShopId, BTreeMap<String, UpgradeState>>,
    pub core: CoreParams,
    pub stats: Statistics,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            currencies: BTreeMap::new(),
            upgrades: BTreeMap::new(),
            core: CoreParams::default(),
            stats: Statistics::default(),
        }
    }
}

impl SaveData {
    pub fn currency(&self, currency: Currency) -> i64 {
        self.currencies.get(&currency).copied().unwrap_or(0)
    }

    pub fn upgrade_count(&self, shop: ShopId, id: &str) -> u32 {
        self.upgrades
            .get(&shop)
            .and_then(|states| states.get(id))
            .map_or(0, |state| state.purchase_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_loads_defaults() {
        let save: SaveData = serde_json::from_str("{}").expect("parse");
        assert_eq!(save, SaveData::default());
        assert_eq!(save.core.max_health, 10);
        assert_eq!(save.core.bomb_count, 1);
    }

    #[test]
    fn partial_save_merges_with_defaults() {
        let body = r#"{
            "version": 1,
            "currencies": { "money": 42, "tiles": 7 },
            "upgrades": { "main": { "heal-on-purchase": { "purchased": true, "purchase_count": 1, "maxed": true } } },
            "core": { "click_value": 3 }
        }"#;
        let save: SaveData = serde_json::from_str(body).expect("parse");
        assert_eq!(save.currency(Currency::Money), 42);
        assert_eq!(save.currency(Currency::Diamonds), 0);
        assert_eq!(save.upgrade_count(ShopId::Main, "heal-on-purchase"), 1);
        assert_eq!(save.upgrade_count(ShopId::Snake, "snakeskin"), 0);
        assert_eq!(save.core.click_value, 3);
        assert_eq!(save.core.health, 10);
        assert_eq!(save.stats, Statistics::default());
    }
}
