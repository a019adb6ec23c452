use crate::{Card, HandKind, ScoringContext, Suit};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum JokerRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// What a joker counts when it scores. The count scales both of its flat
/// bonuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JokerCondition {
    Always,
    SuitInHand { suit: Suit },
    HandIs { hand: HandKind },
    PerMoney { step: i64 },
    PerDiscardRemaining,
    PerHandRemaining,
}

impl JokerCondition {
    pub fn factor(&self, hand: HandKind, cards: &[Card], context: &ScoringContext) -> i64 {
        match *self {
            JokerCondition::Always => 1,
            JokerCondition::SuitInHand { suit } => {
                cards.iter().filter(|card| card.suit == suit).count() as i64
            }
            JokerCondition::HandIs { hand: wanted } => i64::from(wanted == hand),
            JokerCondition::PerMoney { step } => {
                if step <= 0 {
                    0
                } else {
                    context.money.max(0) / step
                }
            }
            JokerCondition::PerDiscardRemaining => i64::from(context.discards_left),
            JokerCondition::PerHandRemaining => i64::from(context.hands_left),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JokerDef {
    pub id: String,
    pub name: String,
    pub rarity: JokerRarity,
    #[serde(default)]
    pub chips: i64,
    #[serde(default)]
    pub mult: f64,
    pub condition: JokerCondition,
    pub price: i64,
}

impl JokerDef {
    /// Chip and mult bonus for one scoring event.
    pub fn bonus(&self, hand: HandKind, cards: &[Card], context: &ScoringContext) -> (i64, f64) {
        let factor = self.condition.factor(hand, cards, context);
        (
            self.chips.saturating_mul(factor),
            self.mult * factor as f64,
        )
    }
}

fn joker(
    id: &str,
    name: &str,
    rarity: JokerRarity,
    chips: i64,
    mult: f64,
    condition: JokerCondition,
    price: i64,
) -> JokerDef {
    JokerDef {
        id: id.to_string(),
        name: name.to_string(),
        rarity,
        chips,
        mult,
        condition,
        price,
    }
}

pub fn builtin_jokers() -> Vec<JokerDef> {
    use JokerCondition::*;
    use JokerRarity::*;
    vec![
        joker("joker", "Joker", Common, 0, 4.0, Always, 4),
        joker("greedy_joker", "Greedy Joker", Common, 0, 3.0, SuitInHand { suit: Suit::Diamonds }, 5),
        joker("lusty_joker", "Lusty Joker", Common, 0, 3.0, SuitInHand { suit: Suit::Hearts }, 5),
        joker("wrathful_joker", "Wrathful Joker", Common, 0, 3.0, SuitInHand { suit: Suit::Spades }, 5),
        joker("gluttonous_joker", "Gluttonous Joker", Common, 0, 3.0, SuitInHand { suit: Suit::Clubs }, 5),
        joker("sly_joker", "Sly Joker", Common, 50, 0.0, HandIs { hand: HandKind::Pair }, 3),
        joker("crafty_joker", "Crafty Joker", Common, 80, 0.0, HandIs { hand: HandKind::Flush }, 4),
        joker("banner", "Banner", Common, 30, 0.0, PerDiscardRemaining, 5),
        joker("mystic_summit", "Mystic Summit", Uncommon, 0, 5.0, PerHandRemaining, 6),
        joker("bull", "Bull", Uncommon, 2, 0.0, PerMoney { step: 1 }, 6),
        joker("bootstraps", "Bootstraps", Uncommon, 0, 2.0, PerMoney { step: 5 }, 7),
        joker("the_family", "The Family", Rare, 0, 20.0, HandIs { hand: HandKind::Quads }, 8),
    ]
}
