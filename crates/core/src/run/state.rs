use super::*;
use crate::*;
use tracing::info;

impl CardRun {
    pub fn new(config: GameConfig, content: Content, seed: u64) -> Self {
        let rules = config.run.clone();
        let scheme = config.chip_scheme;
        let mut run = Self {
            table: HandTable::from_rules(&config.hands),
            inventory: Inventory::with_slots(rules.joker_slots),
            rng: RngState::from_seed(seed),
            deck: Deck::default(),
            hand: Vec::new(),
            selected: Vec::new(),
            state: RoundState::new(&rules),
            shop: None,
            next_card_id: 1,
            rules,
            scheme,
            config,
            content,
        };
        run.reset_deck();
        let mut events = EventBus::default();
        run.draw_to_hand(&mut events);
        run
    }

    fn reset_deck(&mut self) {
        self.deck = Deck::standard52(self.scheme, self.next_card_id);
        self.next_card_id = self.next_card_id.saturating_add(52);
        self.deck.shuffle(&mut self.rng);
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn scoring_context(&self) -> ScoringContext {
        ScoringContext {
            money: self.state.pending_reward,
            hands_left: self.state.hands_left,
            discards_left: self.state.discards_left,
        }
    }

    /// Leaves game over: hands back the run's spades and starts over with a
    /// fresh deck, base hand levels and no jokers.
    pub fn restart(&mut self, events: &mut EventBus) -> Result<i64, RunError> {
        if self.state.phase != RunPhase::GameOver {
            return Err(RunError::InvalidPhase(self.state.phase));
        }
        let payout = self.state.pending_reward;
        self.table = HandTable::from_rules(&self.config.hands);
        self.inventory.clear();
        self.hand.clear();
        self.selected.clear();
        self.shop = None;
        self.state = RoundState::new(&self.rules);
        self.reset_deck();
        info!(payout, "card run restarted");
        events.push(Event::RunRestarted { payout });
        self.draw_to_hand(events);
        Ok(payout)
    }
}
