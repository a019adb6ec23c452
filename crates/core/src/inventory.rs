use crate::JokerDef;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JokerInstance {
    pub def: JokerDef,
    #[serde(default)]
    pub buy_price: i64,
}

/// Jokers owned during one card run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub joker_slots: usize,
    pub jokers: Vec<JokerInstance>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("no joker slots")]
    NoJokerSlots,
    #[error("joker {0} already owned")]
    AlreadyOwned(String),
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self::with_slots(5)
    }

    pub fn with_slots(joker_slots: usize) -> Self {
        Self {
            joker_slots,
            jokers: Vec::new(),
        }
    }

    pub fn add_joker(&mut self, def: JokerDef, buy_price: i64) -> Result<(), InventoryError> {
        if self.jokers.len() >= self.joker_slots {
            return Err(InventoryError::NoJokerSlots);
        }
        if self.owns(&def.id) {
            return Err(InventoryError::AlreadyOwned(def.id));
        }
        self.jokers.push(JokerInstance { def, buy_price });
        Ok(())
    }

    pub fn owns(&self, id: &str) -> bool {
        self.jokers.iter().any(|joker| joker.def.id == id)
    }

    /// Definitions in slot order, as the scorer wants them.
    pub fn defs(&self) -> Vec<JokerDef> {
        self.jokers.iter().map(|joker| joker.def.clone()).collect()
    }

    pub fn clear(&mut self) {
        self.jokers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin_jokers;

    #[test]
    fn slots_cap_ownership() {
        let pool = builtin_jokers();
        let mut inventory = Inventory::with_slots(2);
        inventory.add_joker(pool[0].clone(), 4).expect("first");
        inventory.add_joker(pool[1].clone(), 5).expect("second");
        assert_eq!(
            inventory.add_joker(pool[2].clone(), 5),
            Err(InventoryError::NoJokerSlots)
        );
    }

    #[test]
    fn duplicates_are_rejected() {
        let pool = builtin_jokers();
        let mut inventory = Inventory::new();
        inventory.add_joker(pool[0].clone(), 4).expect("first");
        assert!(matches!(
            inventory.add_joker(pool[0].clone(), 4),
            Err(InventoryError::AlreadyOwned(_))
        ));
    }
}
