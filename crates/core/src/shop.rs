use crate::{Content, JokerDef, RngState};

#[derive(Debug, Clone, PartialEq)]
pub struct JokerOffer {
    pub def: JokerDef,
    pub price: i64,
}

/// Joker interstitial shown between card rounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopState {
    pub offers: Vec<JokerOffer>,
}

impl ShopState {
    pub fn generate(content: &Content, count: usize, owned: &[String], rng: &mut RngState) -> Self {
        let offers = content
            .pick_jokers(count, owned, rng)
            .into_iter()
            .map(|def| JokerOffer {
                price: def.price,
                def,
            })
            .collect();
        Self { offers }
    }

    pub fn take(&mut self, index: usize) -> Option<JokerOffer> {
        if index < self.offers.len() {
            Some(self.offers.remove(index))
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}
