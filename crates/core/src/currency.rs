use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Money,
    Diamonds,
    Emeralds,
    Sapphires,
    Spades,
    Tiles,
}

impl Currency {
    pub const ALL: [Currency; 6] = [
        Currency::Money,
        Currency::Diamonds,
        Currency::Emeralds,
        Currency::Sapphires,
        Currency::Spades,
        Currency::Tiles,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Currency::Money => "money",
            Currency::Diamonds => "diamonds",
            Currency::Emeralds => "emeralds",
            Currency::Sapphires => "sapphires",
            Currency::Spades => "spades",
            Currency::Tiles => "tiles",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|currency| currency.id() == id)
    }
}

/// Balance access handed to shops and minigames.
pub trait CurrencyPort {
    fn balance(&self, currency: Currency) -> i64;
    fn add(&mut self, currency: Currency, amount: i64);
    /// Debits only when the balance covers `amount`.
    fn spend(&mut self, currency: Currency, amount: i64) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyPool {
    balances: BTreeMap<Currency, i64>,
}

impl CurrencyPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, currency: Currency) -> i64 {
        self.balances.get(&currency).copied().unwrap_or(0)
    }

    /// Restores a saved balance. Negative values clamp to zero.
    pub fn set(&mut self, currency: Currency, amount: i64) {
        self.balances.insert(currency, amount.max(0));
    }

    pub fn can_afford(&self, currency: Currency, amount: i64) -> bool {
        amount >= 0 && self.get(currency) >= amount
    }

    /// Debits every entry or none of them.
    pub fn spend_all(&mut self, costs: &[(Currency, i64)]) -> bool {
        let mut totals: BTreeMap<Currency, i64> = BTreeMap::new();
        for (currency, amount) in costs {
            if *amount < 0 {
                return false;
            }
            *totals.entry(*currency).or_insert(0) += amount;
        }
        if totals
            .iter()
            .any(|(currency, amount)| !self.can_afford(*currency, *amount))
        {
            debug!(?costs, "atomic spend rejected");
            return false;
        }
        for (currency, amount) in totals {
            self.set(currency, self.get(currency) - amount);
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (Currency, i64)> + '_ {
        Currency::ALL.into_iter().map(|currency| (currency, self.get(currency)))
    }
}

impl CurrencyPort for CurrencyPool {
    fn balance(&self, currency: Currency) -> i64 {
        self.get(currency)
    }

    fn add(&mut self, currency: Currency, amount: i64) {
        if amount <= 0 {
            return;
        }
        let next = self.get(currency).saturating_add(amount);
        self.balances.insert(currency, next);
    }

    fn spend(&mut self, currency: Currency, amount: i64) -> bool {
        if !self.can_afford(currency, amount) {
            debug!(currency = currency.id(), amount, balance = self.get(currency), "spend rejected");
            return false;
        }
        self.set(currency, self.get(currency) - amount);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_checks_balance() {
        let mut pool = CurrencyPool::new();
        pool.add(Currency::Money, 15);
        assert!(!pool.spend(Currency::Money, 20));
        assert_eq!(pool.get(Currency::Money), 15);
        assert!(pool.spend(Currency::Money, 15));
        assert_eq!(pool.get(Currency::Money), 0);
    }

    #[test]
    fn negative_amounts_are_ignored() {
        let mut pool = CurrencyPool::new();
        pool.add(Currency::Tiles, -5);
        assert_eq!(pool.get(Currency::Tiles), 0);
        assert!(!pool.spend(Currency::Tiles, -1));
    }

    #[test]
    fn spend_all_is_atomic() {
        let mut pool = CurrencyPool::new();
        pool.add(Currency::Money, 10);
        pool.add(Currency::Diamonds, 1);
        let before = pool.clone();
        assert!(!pool.spend_all(&[(Currency::Money, 5), (Currency::Diamonds, 2)]));
        assert_eq!(pool, before);
        assert!(pool.spend_all(&[(Currency::Money, 5), (Currency::Diamonds, 1)]));
        assert_eq!(pool.get(Currency::Money), 5);
        assert_eq!(pool.get(Currency::Diamonds), 0);
    }

    #[test]
    fn spend_all_sums_repeated_currencies() {
        let mut pool = CurrencyPool::new();
        pool.add(Currency::Money, 10);
        assert!(!pool.spend_all(&[(Currency::Money, 6), (Currency::Money, 6)]));
        assert_eq!(pool.get(Currency::Money), 10);
    }
}
