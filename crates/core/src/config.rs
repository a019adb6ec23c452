use crate::{ChipScheme, HandKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandRule {
    pub kind: HandKind,
    pub chips: i64,
    pub mult: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunRules {
    pub hand_size: usize,
    pub hands: u8,
    pub discards: u8,
    pub max_selected: usize,
    pub starting_target: i64,
    pub target_growth: f64,
    pub round_reward: i64,
    pub joker_offers: usize,
    pub joker_slots: usize,
}

impl Default for RunRules {
    fn default() -> Self {
        Self {
            hand_size: 8,
            hands: 4,
            discards: 3,
            max_selected: 5,
            starting_target: 300,
            target_growth: 1.5,
            round_reward: 10,
            joker_offers: 2,
            joker_slots: 5,
        }
    }
}

impl RunRules {
    pub fn next_target(&self, target: i64) -> i64 {
        (target as f64 * self.target_growth).floor() as i64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClickerRules {
    pub health: i64,
    pub click_value: i64,
    pub cooldown_secs: u32,
}

impl Default for ClickerRules {
    fn default() -> Self {
        Self {
            health: 10,
            click_value: 1,
            cooldown_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LetterRules {
    pub hand_size: usize,
    pub word_slots: usize,
    pub max_word_slots: usize,
    pub discard_slots: usize,
    pub min_word_len: usize,
}

impl Default for LetterRules {
    fn default() -> Self {
        Self {
            hand_size: 7,
            word_slots: 3,
            max_word_slots: 6,
            discard_slots: 5,
            min_word_len: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WagerRules {
    pub squares: usize,
    /// Percent bonus per safe reveal, indexed by `bombs - 1`.
    pub bonus_percent: Vec<f64>,
    pub fallback_percent: f64,
}

impl Default for WagerRules {
    fn default() -> Self {
        Self {
            squares: 25,
            bonus_percent: vec![
                5.0, 10.0, 15.0, 20.0, 25.0, 32.0, 40.0, 47.0, 56.0, 67.0, 78.0, 93.0, 109.0,
                128.0, 150.0, 178.0, 212.0, 257.0, 317.0, 400.0, 550.0, 750.0, 1250.0, 2500.0,
            ],
            fallback_percent: 5.0,
        }
    }
}

impl WagerRules {
    pub fn max_bombs(&self) -> usize {
        self.squares.saturating_sub(1)
    }

    /// Fraction added per safe reveal.
    pub fn bonus_rate(&self, bombs: usize) -> f64 {
        let percent = bombs
            .checked_sub(1)
            .and_then(|idx| self.bonus_percent.get(idx))
            .copied()
            .unwrap_or(self.fallback_percent);
        percent / 100.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub hands: Vec<HandRule>,
    pub chip_scheme: ChipScheme,
    pub run: RunRules,
    pub clicker: ClickerRules,
    pub letters: LetterRules,
    pub wager: WagerRules,
}
