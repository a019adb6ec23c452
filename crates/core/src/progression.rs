use crate::{ClickerRules, Cube, EventBus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const SNAKE_BASE_HEALTH: i64 = 20;

/// Unlock flags flipped by upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    HealOnPurchase,
    DegenDiamonds,
    BombSlider,
    Snake,
    BorderPortals,
    LetterGame,
    DiscardZone,
    FourLetterWords,
    FiveLetterWords,
    SixLetterWords,
    Tetris,
    CardGame,
}

impl Feature {
    pub fn id(self) -> &'static str {
        match self {
            Feature::HealOnPurchase => "heal_on_purchase",
            Feature::DegenDiamonds => "degen_diamonds",
            Feature::BombSlider => "bomb_slider",
            Feature::Snake => "snake",
            Feature::BorderPortals => "border_portals",
            Feature::LetterGame => "letter_game",
            Feature::DiscardZone => "discard_zone",
            Feature::FourLetterWords => "four_letter_words",
            Feature::FiveLetterWords => "five_letter_words",
            Feature::SixLetterWords => "six_letter_words",
            Feature::Tetris => "tetris",
            Feature::CardGame => "card_game",
        }
    }
}

/// Global parameters upgrade effects write to.
pub trait ProgressionPort {
    fn heal_cube(&mut self, events: &mut EventBus);
    fn add_click_value(&mut self, amount: i64);
    fn add_max_health(&mut self, amount: i64, events: &mut EventBus);
    fn reduce_cooldown(&mut self, seconds: u32);
    fn unlock(&mut self, feature: Feature);
    fn is_unlocked(&self, feature: Feature) -> bool;
    fn add_snake_max_health(&mut self, amount: i64);
    fn set_snake_extra_lives(&mut self, lives: u32);
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Progression {
    pub cube: Cube,
    pub features: BTreeSet<Feature>,
    pub snake_max_health: i64,
    pub snake_extra_lives: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(&ClickerRules::default())
    }
}

impl Progression {
    pub fn new(rules: &ClickerRules) -> Self {
        Self {
            cube: Cube::new(rules),
            features: BTreeSet::new(),
            snake_max_health: SNAKE_BASE_HEALTH,
            snake_extra_lives: 0,
        }
    }
}

impl ProgressionPort for Progression {
    fn heal_cube(&mut self, events: &mut EventBus) {
        self.cube.heal_to_full(events);
    }

    fn add_click_value(&mut self, amount: i64) {
        self.cube.click_value = self.cube.click_value.saturating_add(amount);
    }

    fn add_max_health(&mut self, amount: i64, events: &mut EventBus) {
        self.cube.increase_max_health(amount, events);
    }

    fn reduce_cooldown(&mut self, seconds: u32) {
        self.cube.cooldown_reduction = self.cube.cooldown_reduction.saturating_add(seconds);
    }

    fn unlock(&mut self, feature: Feature) {
        self.features.insert(feature);
    }

    fn is_unlocked(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    fn add_snake_max_health(&mut self, amount: i64) {
        self.snake_max_health = self.snake_max_health.saturating_add(amount);
    }

    fn set_snake_extra_lives(&mut self, lives: u32) {
        self.snake_extra_lives = lives;
    }
}
