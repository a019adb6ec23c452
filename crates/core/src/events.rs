use crate::{Currency, HandKind, ShopId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    CubeClicked {
        value: i64,
        health: i64,
    },
    CooldownStarted {
        seconds: u32,
    },
    CubeHealed {
        health: i64,
    },
    CurrencyChanged {
        currency: Currency,
        delta: i64,
        balance: i64,
    },
    UpgradePurchased {
        shop: ShopId,
        id: String,
        price: i64,
        count: u32,
    },
    HandDealt {
        count: usize,
    },
    HandScored {
        hand: HandKind,
        chips: i64,
        mult: f64,
        total: i64,
    },
    CardsDiscarded {
        count: usize,
    },
    RoundCompleted {
        round: u32,
        score: i64,
        reward: i64,
        next_target: i64,
    },
    HandLevelled {
        hand: HandKind,
        level: u32,
    },
    JokerBought {
        id: String,
        cost: i64,
    },
    GameOver {
        score: i64,
        rounds: u32,
        reward: i64,
    },
    RunRestarted {
        payout: i64,
    },
    WordScored {
        word: String,
        score: i64,
    },
    TilesRerolled {
        count: usize,
    },
    WagerOpened {
        bombs: usize,
    },
    SquareRevealed {
        index: usize,
        bomb: bool,
    },
    WagerCashedOut {
        money: i64,
        diamonds: i64,
        emeralds: i64,
        tiles: i64,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
