use crate::{EventBus, Feature, ProgressionPort};
use serde::{Deserialize, Serialize};

/// What an upgrade does when bought. Effects that only matter as a level
/// (read back from the purchase count) use `Level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum UpgradeEffect {
    Level,
    HealCube,
    IncreaseClickValue(i64),
    IncreaseMaxHealth(i64),
    ReduceCooldown(u32),
    Unlock(Feature),
    IncreaseSnakeMaxHealth(i64),
    SetSnakeExtraLives,
    Sequence(Vec<UpgradeEffect>),
}

/// Applies `effect` for the purchase that brought the count to `count`.
pub fn apply_effect(
    effect: &UpgradeEffect,
    count: u32,
    port: &mut dyn ProgressionPort,
    events: &mut EventBus,
) {
    match effect {
        UpgradeEffect::Level => {}
        UpgradeEffect::HealCube => port.heal_cube(events),
        UpgradeEffect::IncreaseClickValue(amount) => port.add_click_value(*amount),
        UpgradeEffect::IncreaseMaxHealth(amount) => port.add_max_health(*amount, events),
        UpgradeEffect::ReduceCooldown(seconds) => port.reduce_cooldown(*seconds),
        UpgradeEffect::Unlock(feature) => port.unlock(*feature),
        UpgradeEffect::IncreaseSnakeMaxHealth(amount) => port.add_snake_max_health(*amount),
        UpgradeEffect::SetSnakeExtraLives => port.set_snake_extra_lives(count),
        UpgradeEffect::Sequence(effects) => {
            for inner in effects {
                apply_effect(inner, count, port, events);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Progression;

    #[test]
    fn sequence_applies_in_order() {
        let mut progression = Progression::default();
        progression.cube.health = 3;
        let mut events = EventBus::default();
        let effect = UpgradeEffect::Sequence(vec![
            UpgradeEffect::Unlock(Feature::HealOnPurchase),
            UpgradeEffect::HealCube,
        ]);
        apply_effect(&effect, 1, &mut progression, &mut events);
        assert!(progression.is_unlocked(Feature::HealOnPurchase));
        assert_eq!(progression.cube.health, 10);
    }

    #[test]
    fn extra_lives_track_the_purchase_count() {
        let mut progression = Progression::default();
        let mut events = EventBus::default();
        apply_effect(&UpgradeEffect::SetSnakeExtraLives, 3, &mut progression, &mut events);
        assert_eq!(progression.snake_extra_lives, 3);
    }

    #[test]
    fn max_health_heals_to_the_new_cap() {
        let mut progression = Progression::default();
        progression.cube.health = 2;
        let mut events = EventBus::default();
        apply_effect(&UpgradeEffect::IncreaseMaxHealth(1), 1, &mut progression, &mut events);
        assert_eq!(progression.cube.max_health, 11);
        assert_eq!(progression.cube.health, 11);
    }
}
