use crate::{ClickerRules, Currency, CurrencyPort, Event, EventBus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClickError {
    #[error("cube is recovering ({0}s left)")]
    CoolingDown(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOutcome {
    pub earned: i64,
    pub health: i64,
    pub cooldown: Option<u32>,
    /// Set on the click that first empties the cube.
    pub shop_revealed: bool,
}

/// The central cube. Each click pays out and costs one health; an empty cube
/// cools down before it can be clicked again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cube {
    pub health: i64,
    pub max_health: i64,
    pub click_value: i64,
    pub base_cooldown: u32,
    pub cooldown_reduction: u32,
    /// Seconds until the cube recovers. `None` when not cooling down.
    pub cooldown: Option<u32>,
    pub shop_revealed: bool,
    pub clicks: u64,
}

impl Default for Cube {
    fn default() -> Self {
        Self::new(&ClickerRules::default())
    }
}

impl Cube {
    pub fn new(rules: &ClickerRules) -> Self {
        Self {
            health: rules.health,
            max_health: rules.health,
            click_value: rules.click_value,
            base_cooldown: rules.cooldown_secs,
            cooldown_reduction: 0,
            cooldown: None,
            shop_revealed: false,
            clicks: 0,
        }
    }

    pub fn cooldown_duration(&self) -> u32 {
        self.base_cooldown.saturating_sub(self.cooldown_reduction)
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown.is_some()
    }

    pub fn click(
        &mut self,
        wallet: &mut dyn CurrencyPort,
        events: &mut EventBus,
    ) -> Result<ClickOutcome, ClickError> {
        if let Some(remaining) = self.cooldown {
            return Err(ClickError::CoolingDown(remaining));
        }
        wallet.add(Currency::Money, self.click_value);
        self.health = (self.health - 1).max(0);
        self.clicks = self.clicks.saturating_add(1);
        events.push(Event::CubeClicked {
            value: self.click_value,
            health: self.health,
        });

        let mut outcome = ClickOutcome {
            earned: self.click_value,
            health: self.health,
            cooldown: None,
            shop_revealed: false,
        };
        if self.health == 0 {
            if !self.shop_revealed {
                self.shop_revealed = true;
                outcome.shop_revealed = true;
            }
            let seconds = self.cooldown_duration();
            events.push(Event::CooldownStarted { seconds });
            if seconds == 0 {
                self.heal_to_full(events);
            } else {
                self.cooldown = Some(seconds);
                outcome.cooldown = Some(seconds);
            }
        }
        Ok(outcome)
    }

    /// Advances the recovery timer. Returns true when the cube recovered.
    pub fn tick(&mut self, seconds: u32, events: &mut EventBus) -> bool {
        let Some(remaining) = self.cooldown else {
            return false;
        };
        let remaining = remaining.saturating_sub(seconds);
        if remaining == 0 {
            self.heal_to_full(events);
            true
        } else {
            self.cooldown = Some(remaining);
            false
        }
    }

    /// Restores health and cancels any pending recovery.
    pub fn heal_to_full(&mut self, events: &mut EventBus) {
        self.health = self.max_health;
        self.cooldown = None;
        events.push(Event::CubeHealed {
            health: self.health,
        });
    }

    pub fn increase_max_health(&mut self, amount: i64, events: &mut EventBus) {
        self.max_health = self.max_health.saturating_add(amount);
        self.heal_to_full(events);
    }
}
