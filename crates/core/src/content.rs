use crate::{builtin_jokers, Feature, JokerDef, RngState, ShopId, UpgradeDef, UpgradeEffect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every shop catalog plus the joker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub jokers: Vec<JokerDef>,
    pub shops: BTreeMap<ShopId, Vec<UpgradeDef>>,
}

impl Default for Content {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Content {
    pub fn builtin() -> Self {
        let shops = ShopId::ALL
            .into_iter()
            .map(|shop| (shop, builtin_catalog(shop)))
            .collect();
        Self {
            jokers: builtin_jokers(),
            shops,
        }
    }

    pub fn catalog(&self, shop: ShopId) -> Vec<UpgradeDef> {
        self.shops.get(&shop).cloned().unwrap_or_default()
    }

    /// Up to `count` distinct jokers the player does not already own.
    pub fn pick_jokers(
        &self,
        count: usize,
        owned: &[String],
        rng: &mut RngState,
    ) -> Vec<JokerDef> {
        let mut pool: Vec<&JokerDef> = self
            .jokers
            .iter()
            .filter(|joker| !owned.contains(&joker.id))
            .collect();
        rng.shuffle(&mut pool);
        pool.into_iter().take(count).cloned().collect()
    }
}

#[allow(clippy::too_many_arguments)]
fn upgrade(
    id: &str,
    name: &str,
    description: &str,
    base_cost: i64,
    max_purchases: u32,
    price_multiplier: Option<f64>,
    requires: Option<&str>,
    effect: UpgradeEffect,
) -> UpgradeDef {
    UpgradeDef {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        base_cost,
        max_purchases,
        price_multiplier,
        requires: requires.map(str::to_string),
        effect,
    }
}

pub fn builtin_catalog(shop: ShopId) -> Vec<UpgradeDef> {
    match shop {
        ShopId::Main => main_shop(),
        ShopId::Diamond => diamond_shop(),
        ShopId::Snake => snake_shop(),
        ShopId::Tetris => tetris_shop(),
        ShopId::Tile => tile_shop(),
        ShopId::Letter => letter_shop(),
    }
}

fn main_shop() -> Vec<UpgradeDef> {
    use UpgradeEffect::*;
    let root = Some("heal-on-purchase");
    vec![
        upgrade(
            "heal-on-purchase",
            "Heal on Purchase",
            "Every purchase restores the cube to full health",
            10,
            1,
            None,
            None,
            Sequence(vec![Unlock(Feature::HealOnPurchase), HealCube]),
        ),
        upgrade("boost-payout", "Boost Payout", "+1 money per click", 30, 20, Some(2.5), root, IncreaseClickValue(1)),
        upgrade("health-boost", "Health Boost", "+1 cube max health", 10, 30, Some(2.0), root, IncreaseMaxHealth(1)),
        upgrade("shorten-timer", "Shorten Timer", "Cube recovers 5s sooner", 5, 5, Some(3.0), root, ReduceCooldown(5)),
        upgrade("placeholder-upgrade-1", "Coming Soon", "", 100, 1, None, Some("boost-payout"), Level),
        upgrade("placeholder-upgrade-2", "Coming Soon", "", 150, 1, None, Some("boost-payout"), Level),
        upgrade(
            "unlock-degen-diamonds",
            "Unlock Degen Diamonds",
            "Opens the diamond wagering game",
            15,
            1,
            None,
            Some("health-boost"),
            Unlock(Feature::DegenDiamonds),
        ),
        upgrade("unlock-snake", "Unlock Snake", "Opens the snake game", 10, 1, None, Some("health-boost"), Unlock(Feature::Snake)),
        upgrade(
            "unlock-letter-game",
            "Unlock Letter Game",
            "Opens the word game",
            5,
            1,
            None,
            Some("shorten-timer"),
            Unlock(Feature::LetterGame),
        ),
        upgrade("placeholder-upgrade-6", "Coming Soon", "", 200, 1, None, Some("shorten-timer"), Level),
    ]
}

fn diamond_shop() -> Vec<UpgradeDef> {
    use UpgradeEffect::*;
    vec![
        upgrade("bomb-slider", "Bomb Slider", "Choose how many bombs hide in the grid", 5, 1, None, None, Unlock(Feature::BombSlider)),
        upgrade("unlock-tetris", "Unlock Tetris", "Opens the block game", 25, 1, None, Some("bomb-slider"), Unlock(Feature::Tetris)),
        upgrade("unlock-card-game", "Unlock Card Game", "Opens the poker game", 40, 1, None, Some("bomb-slider"), Unlock(Feature::CardGame)),
    ]
}

fn snake_shop() -> Vec<UpgradeDef> {
    use UpgradeEffect::*;
    let root = Some("border-portals");
    vec![
        upgrade("border-portals", "Border Portals", "Walls wrap around", 7, 1, None, None, Unlock(Feature::BorderPortals)),
        upgrade("snakeskin", "Snakeskin", "+10 snake max health", 40, 20, Some(2.0), root, IncreaseSnakeMaxHealth(10)),
        upgrade("extra-food", "Extra Food", "+1 emerald per food per level", 15, 10, Some(2.0), root, Level),
        upgrade("extra-lives", "Extra Lives", "+1 life per level", 40, 5, Some(2.0), root, SetSnakeExtraLives),
    ]
}

fn tetris_shop() -> Vec<UpgradeDef> {
    use UpgradeEffect::Level;
    vec![
        upgrade("level-bonus", "Level Bonus", "+20% sapphires per level", 10, 10, Some(1.8), None, Level),
        upgrade("line-clear-master", "Line Clear Master", "", 15, 5, Some(2.2), Some("level-bonus"), Level),
        upgrade("speed-demon", "Speed Demon", "", 25, 3, Some(2.5), Some("level-bonus"), Level),
        upgrade("ghost-vision", "Ghost Vision", "", 20, 1, None, Some("level-bonus"), Level),
        upgrade("tetris-master", "Tetris Master", "", 50, 3, Some(2.0), Some("line-clear-master"), Level),
        upgrade("combo-king", "Combo King", "", 40, 1, None, Some("line-clear-master"), Level),
        upgrade("lightning-reflexes", "Lightning Reflexes", "", 60, 5, Some(2.0), Some("speed-demon"), Level),
        upgrade("crystal-clarity", "Crystal Clarity", "", 45, 1, None, Some("ghost-vision"), Level),
        upgrade("sapphire-cascade", "Sapphire Cascade", "", 200, 1, None, Some("tetris-master"), Level),
    ]
}

fn tile_shop() -> Vec<UpgradeDef> {
    vec![upgrade(
        "trash-bucket",
        "Trash Bucket",
        "Adds a discard zone to the letter game",
        100,
        1,
        None,
        None,
        UpgradeEffect::Unlock(Feature::DiscardZone),
    )]
}

fn letter_shop() -> Vec<UpgradeDef> {
    use UpgradeEffect::*;
    vec![
        upgrade("bigger-hand", "Bigger Hand", "+1 tile in hand", 50, 5, Some(2.0), None, Level),
        upgrade(
            "four-letter-words",
            "Four Letter Words",
            "Adds a fourth word slot",
            100,
            1,
            None,
            Some("bigger-hand"),
            Unlock(Feature::FourLetterWords),
        ),
        upgrade(
            "five-letter-words",
            "Five Letter Words",
            "Adds a fifth word slot",
            200,
            1,
            None,
            Some("four-letter-words"),
            Unlock(Feature::FiveLetterWords),
        ),
        upgrade(
            "six-letter-words",
            "Six Letter Words",
            "Adds a sixth word slot",
            400,
            1,
            None,
            Some("five-letter-words"),
            Unlock(Feature::SixLetterWords),
        ),
        upgrade("letter-boost", "Letter Boost", "+1 chip on every tile", 150, 5, Some(2.5), Some("bigger-hand"), Level),
        upgrade("multiplier-madness", "Multiplier Madness", "+0.5 mult on every tile", 100, 10, Some(1.8), Some("letter-boost"), Level),
        upgrade("vowel-power", "Vowel Power", "Vowels get +2 chips and +1 mult", 300, 1, None, Some("letter-boost"), Level),
        upgrade("consonant-king", "Consonant King", "J, Q, X, Z get +3 chips and +2 mult", 500, 1, None, Some("multiplier-madness"), Level),
        upgrade("word-wizard", "Word Wizard", "Every tile gets +5 chips and +3 mult", 1000, 1, None, Some("consonant-king"), Level),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_requirement_names_an_upgrade_in_the_same_shop() {
        let content = Content::builtin();
        for (shop, defs) in &content.shops {
            for def in defs {
                if let Some(requires) = &def.requires {
                    assert!(
                        defs.iter().any(|other| &other.id == requires),
                        "{} in {:?} requires missing {}",
                        def.id,
                        shop,
                        requires
                    );
                }
            }
        }
    }

    #[test]
    fn catalog_roots_have_no_requirement() {
        for shop in ShopId::ALL {
            let defs = builtin_catalog(shop);
            assert!(!defs.is_empty());
            assert!(defs[0].requires.is_none(), "{shop:?} root is gated");
        }
    }

    #[test]
    fn joker_offers_skip_owned() {
        let content = Content::builtin();
        let owned: Vec<String> = content.jokers.iter().skip(1).map(|joker| joker.id.clone()).collect();
        let mut rng = RngState::from_seed(1);
        let offers = content.pick_jokers(3, &owned, &mut rng);
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].id, content.jokers[0].id);
    }
}
