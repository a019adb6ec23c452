use super::*;
use crate::*;
use tracing::info;

impl CardRun {
    pub(super) fn open_shop(&mut self) -> usize {
        if self.rules.joker_offers == 0 {
            self.shop = None;
            return 0;
        }
        let owned: Vec<String> = self
            .inventory
            .jokers
            .iter()
            .map(|joker| joker.def.id.clone())
            .collect();
        let shop = ShopState::generate(&self.content, self.rules.joker_offers, &owned, &mut self.rng);
        let offers = shop.offers.len();
        self.shop = if shop.is_empty() { None } else { Some(shop) };
        offers
    }

    /// Buys offer `index` with the run's banked spades.
    pub fn buy_joker(&mut self, index: usize, events: &mut EventBus) -> Result<JokerDef, RunError> {
        if self.state.phase != RunPhase::Active {
            return Err(RunError::InvalidPhase(self.state.phase));
        }
        let shop = self.shop.as_ref().ok_or(RunError::ShopNotAvailable)?;
        let offer = shop
            .offers
            .get(index)
            .cloned()
            .ok_or(RunError::InvalidOfferIndex)?;
        if self.state.pending_reward < offer.price {
            return Err(RunError::NotEnoughSpades);
        }
        self.inventory.add_joker(offer.def.clone(), offer.price)?;
        self.state.pending_reward -= offer.price;
        if let Some(shop) = self.shop.as_mut() {
            shop.take(index);
            if shop.is_empty() {
                self.shop = None;
            }
        }
        info!(joker = %offer.def.id, cost = offer.price, "joker bought");
        events.push(Event::JokerBought {
            id: offer.def.id.clone(),
            cost: offer.price,
        });
        Ok(offer.def)
    }

    pub fn skip_shop(&mut self) -> Result<(), RunError> {
        if self.shop.take().is_none() {
            return Err(RunError::ShopNotAvailable);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop_run() -> CardRun {
        let mut run = CardRun::new(GameConfig::default(), Content::builtin(), 99);
        run.state.phase = RunPhase::RoundComplete;
        let mut events = EventBus::default();
        run.advance(&mut events).expect("advance");
        run
    }

    #[test]
    fn advancing_opens_joker_offers() {
        let run = shop_run();
        let shop = run.shop.as_ref().expect("shop");
        assert_eq!(shop.offers.len(), 2);
    }

    #[test]
    fn buying_spends_banked_spades() {
        let mut run = shop_run();
        let mut events = EventBus::default();
        let price = run.shop.as_ref().expect("shop").offers[0].price;
        assert!(price <= run.state.pending_reward);
        let def = run.buy_joker(0, &mut events).expect("buy");
        assert!(run.inventory.owns(&def.id));
        assert_eq!(run.state.pending_reward, 10 - price);
        assert_eq!(run.shop.as_ref().map(|shop| shop.offers.len()), Some(1));
    }

    #[test]
    fn cannot_buy_without_spades() {
        let mut run = shop_run();
        let mut events = EventBus::default();
        run.state.pending_reward = 0;
        assert_eq!(run.buy_joker(0, &mut events), Err(RunError::NotEnoughSpades));
        assert!(run.inventory.jokers.is_empty());
    }

    #[test]
    fn skip_and_play_close_the_shop() {
        let mut run = shop_run();
        run.skip_shop().expect("skip");
        assert_eq!(run.skip_shop(), Err(RunError::ShopNotAvailable));
        let mut events = EventBus::default();
        assert_eq!(run.buy_joker(0, &mut events), Err(RunError::ShopNotAvailable));

        let mut run = shop_run();
        run.select_indices(&[0]).expect("select");
        run.play_hand(&mut events).expect("play");
        assert!(run.shop.is_none());
    }
}
