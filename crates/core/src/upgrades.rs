use crate::{apply_effect, Currency, CurrencyPort, Event, EventBus, ProgressionPort, UpgradeEffect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopId {
    Main,
    Diamond,
    Snake,
    Tetris,
    Tile,
    Letter,
}

impl ShopId {
    pub const ALL: [ShopId; 6] = [
        ShopId::Main,
        ShopId::Diamond,
        ShopId::Snake,
        ShopId::Tetris,
        ShopId::Tile,
        ShopId::Letter,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ShopId::Main => "main",
            ShopId::Diamond => "diamond",
            ShopId::Snake => "snake",
            ShopId::Tetris => "tetris",
            ShopId::Tile => "tile",
            ShopId::Letter => "letter",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|shop| shop.id() == id)
    }

    pub fn currency(self) -> Currency {
        match self {
            ShopId::Main => Currency::Money,
            ShopId::Diamond => Currency::Diamonds,
            ShopId::Snake => Currency::Emeralds,
            ShopId::Tetris => Currency::Sapphires,
            ShopId::Tile | ShopId::Letter => Currency::Tiles,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpgradeDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_cost: i64,
    pub max_purchases: u32,
    #[serde(default)]
    pub price_multiplier: Option<f64>,
    #[serde(default)]
    pub requires: Option<String>,
    pub effect: UpgradeEffect,
}

impl UpgradeDef {
    /// `floor(base * multiplier^count)`, or the flat base without a multiplier.
    pub fn price_at(&self, count: u32) -> i64 {
        match self.price_multiplier {
            Some(multiplier) => {
                let exponent = i32::try_from(count).unwrap_or(i32::MAX);
                (self.base_cost as f64 * multiplier.powi(exponent)).floor() as i64
            }
            None => self.base_cost,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeState {
    pub purchased: bool,
    pub purchase_count: u32,
    pub maxed: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("unknown upgrade {0}")]
    Unknown(String),
    #[error("upgrade {id} needs {requires} first")]
    Locked { id: String, requires: String },
    #[error("upgrade {0} is maxed")]
    Maxed(String),
    #[error("need {price} {currency:?}, have {balance}")]
    NotEnough {
        currency: Currency,
        price: i64,
        balance: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub shop: ShopId,
    pub id: String,
    pub price: i64,
    pub count: u32,
    pub maxed: bool,
}

/// One shop's upgrade DAG and the purchase state of every node.
#[derive(Debug, Clone)]
pub struct UpgradeTree {
    shop: ShopId,
    defs: Vec<UpgradeDef>,
    states: BTreeMap<String, UpgradeState>,
}

impl UpgradeTree {
    pub fn new(shop: ShopId, defs: Vec<UpgradeDef>) -> Self {
        let states = defs
            .iter()
            .map(|def| (def.id.clone(), UpgradeState::default()))
            .collect();
        Self { shop, defs, states }
    }

    pub fn shop(&self) -> ShopId {
        self.shop
    }

    pub fn currency(&self) -> Currency {
        self.shop.currency()
    }

    pub fn defs(&self) -> &[UpgradeDef] {
        &self.defs
    }

    pub fn def(&self, id: &str) -> Option<&UpgradeDef> {
        self.defs.iter().find(|def| def.id == id)
    }

    pub fn state(&self, id: &str) -> UpgradeState {
        self.states.get(id).copied().unwrap_or_default()
    }

    pub fn states(&self) -> &BTreeMap<String, UpgradeState> {
        &self.states
    }

    pub fn count(&self, id: &str) -> u32 {
        self.state(id).purchase_count
    }

    pub fn is_purchased(&self, id: &str) -> bool {
        self.state(id).purchased
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        match self.def(id) {
            Some(def) => match &def.requires {
                Some(requires) => self.is_purchased(requires),
                None => true,
            },
            None => false,
        }
    }

    pub fn current_price(&self, id: &str) -> Option<i64> {
        self.def(id).map(|def| def.price_at(self.count(id)))
    }

    /// Validates, debits and applies one purchase. A rejection changes
    /// nothing.
    pub fn try_purchase(
        &mut self,
        id: &str,
        wallet: &mut dyn CurrencyPort,
        progression: &mut dyn ProgressionPort,
        events: &mut EventBus,
    ) -> Result<PurchaseReceipt, PurchaseError> {
        let def = self
            .def(id)
            .cloned()
            .ok_or_else(|| PurchaseError::Unknown(id.to_string()))?;
        if let Some(requires) = &def.requires {
            if !self.is_purchased(requires) {
                return Err(PurchaseError::Locked {
                    id: def.id.clone(),
                    requires: requires.clone(),
                });
            }
        }
        let state = self.state(id);
        if state.maxed || state.purchase_count >= def.max_purchases {
            return Err(PurchaseError::Maxed(def.id.clone()));
        }
        let currency = self.currency();
        let price = def.price_at(state.purchase_count);
        if !wallet.spend(currency, price) {
            return Err(PurchaseError::NotEnough {
                currency,
                price,
                balance: wallet.balance(currency),
            });
        }

        let count = state.purchase_count + 1;
        let next = UpgradeState {
            purchased: true,
            purchase_count: count,
            maxed: count >= def.max_purchases,
        };
        self.states.insert(def.id.clone(), next);
        apply_effect(&def.effect, count, progression, events);

        info!(shop = self.shop.id(), upgrade = %def.id, price, count, "upgrade purchased");
        events.push(Event::CurrencyChanged {
            currency,
            delta: -price,
            balance: wallet.balance(currency),
        });
        events.push(Event::UpgradePurchased {
            shop: self.shop,
            id: def.id.clone(),
            price,
            count,
        });
        Ok(PurchaseReceipt {
            shop: self.shop,
            id: def.id,
            price,
            count,
            maxed: next.maxed,
        })
    }

    pub fn purchase(
        &mut self,
        id: &str,
        wallet: &mut dyn CurrencyPort,
        progression: &mut dyn ProgressionPort,
        events: &mut EventBus,
    ) -> bool {
        match self.try_purchase(id, wallet, progression, events) {
            Ok(_) => true,
            Err(err) => {
                debug!(shop = self.shop.id(), upgrade = id, %err, "purchase rejected");
                false
            }
        }
    }

    /// Loads saved states. Unknown ids are dropped and `maxed` is recomputed
    /// against the current catalog.
    pub fn restore(&mut self, saved: &BTreeMap<String, UpgradeState>) {
        for def in &self.defs {
            let Some(state) = saved.get(&def.id) else {
                continue;
            };
            let count = state.purchase_count.min(def.max_purchases);
            self.states.insert(
                def.id.clone(),
                UpgradeState {
                    purchased: count > 0,
                    purchase_count: count,
                    maxed: count >= def.max_purchases,
                },
            );
        }
    }

    pub fn reset(&mut self) {
        for state in self.states.values_mut() {
            *state = UpgradeState::default();
        }
    }
}
