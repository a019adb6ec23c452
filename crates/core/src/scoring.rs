use crate::{Card, Enhancement, HandEvaluation, HandKind, JokerDef};
use serde::{Deserialize, Serialize};

/// Run state a joker may read while scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringContext {
    pub money: i64,
    pub hands_left: u8,
    pub discards_left: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub hand: HandKind,
    pub base_chips: i64,
    pub base_mult: f64,
    pub card_chips: i64,
    pub card_mult: f64,
    pub joker_chips: i64,
    pub joker_mult: f64,
    pub total_chips: i64,
    pub total_mult: f64,
    pub total: i64,
}

/// Steel and glass scale chips before flooring.
pub fn card_chips(card: &Card) -> i64 {
    let factor = match card.enhancement {
        Some(Enhancement::Steel) => 1.5,
        Some(Enhancement::Glass) => 2.0,
        _ => 1.0,
    };
    (card.chips as f64 * factor).floor() as i64
}

pub fn card_mult(card: &Card) -> f64 {
    let mult = card.mult as f64;
    match card.enhancement {
        Some(Enhancement::Foil) => mult + 2.0,
        Some(Enhancement::Holographic) => mult + 10.0,
        Some(Enhancement::Polychrome) => mult * 1.5,
        _ => mult,
    }
}

/// Pure: safe to call for a live preview. Every selected card scores.
pub fn score_hand(
    eval: &HandEvaluation,
    cards: &[Card],
    jokers: &[JokerDef],
    context: &ScoringContext,
) -> ScoreBreakdown {
    let card_chips_total: i64 = cards.iter().map(card_chips).sum();
    let card_mult_total: f64 = cards.iter().map(card_mult).sum();

    let mut joker_chips = 0i64;
    let mut joker_mult = 0.0f64;
    for joker in jokers {
        let (chips, mult) = joker.bonus(eval.kind, cards, context);
        joker_chips = joker_chips.saturating_add(chips);
        joker_mult += mult;
    }

    let total_chips = eval
        .base_chips
        .saturating_add(card_chips_total)
        .saturating_add(joker_chips);
    let total_mult = eval.base_mult + card_mult_total + joker_mult;
    let total = (total_chips as f64 * total_mult.max(1.0)).floor() as i64;

    ScoreBreakdown {
        hand: eval.kind,
        base_chips: eval.base_chips,
        base_mult: eval.base_mult,
        card_chips: card_chips_total,
        card_mult: card_mult_total,
        joker_chips,
        joker_mult,
        total_chips,
        total_mult,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChipScheme, HandTable, JokerCondition, JokerRarity, Rank, Suit};

    fn quads(scheme: ChipScheme) -> Vec<Card> {
        [
            (Suit::Hearts, Rank::Ten),
            (Suit::Diamonds, Rank::Ten),
            (Suit::Clubs, Rank::Ten),
            (Suit::Spades, Rank::Ten),
            (Suit::Hearts, Rank::Two),
        ]
        .iter()
        .enumerate()
        .map(|(idx, (suit, rank))| Card::new(idx as u32, *suit, *rank, scheme))
        .collect()
    }

    #[test]
    fn quads_score_under_half_value_chips() {
        let table = HandTable::default();
        let cards = quads(ChipScheme::HalfValue);
        let eval = table.evaluate(&cards);
        let breakdown = score_hand(&eval, &cards, &[], &ScoringContext::default());
        assert_eq!(breakdown.hand, HandKind::Quads);
        assert_eq!(breakdown.total_chips, 60 + 5 * 4 + 1);
        assert_eq!(breakdown.total_mult, 12.0);
        assert_eq!(breakdown.total, 972);
    }

    #[test]
    fn quads_score_under_face_value_chips() {
        let table = HandTable::default();
        let cards = quads(ChipScheme::FaceValue);
        let eval = table.evaluate(&cards);
        let breakdown = score_hand(&eval, &cards, &[], &ScoringContext::default());
        assert_eq!(breakdown.total_chips, 102);
        assert_eq!(breakdown.total, 1224);
    }

    #[test]
    fn enhancements_adjust_card_values() {
        let card = Card::new(1, Suit::Hearts, Rank::Seven, ChipScheme::FaceValue);
        assert_eq!(card_chips(&card.with_enhancement(Enhancement::Steel)), 10);
        assert_eq!(card_chips(&card.with_enhancement(Enhancement::Glass)), 14);
        assert_eq!(card_mult(&card.with_enhancement(Enhancement::Foil)), 3.0);
        assert_eq!(card_mult(&card.with_enhancement(Enhancement::Holographic)), 11.0);
        assert_eq!(card_mult(&card.with_enhancement(Enhancement::Polychrome)), 1.5);
        assert_eq!(card_mult(&card), 1.0);
    }

    #[test]
    fn seals_do_not_change_the_score() {
        let table = HandTable::default();
        let plain = vec![Card::standard(Suit::Clubs, Rank::King)];
        let sealed = vec![Card::standard(Suit::Clubs, Rank::King).with_seal(crate::Seal::Gold)];
        let ctx = ScoringContext::default();
        let left = score_hand(&table.evaluate(&plain), &plain, &[], &ctx);
        let right = score_hand(&table.evaluate(&sealed), &sealed, &[], &ctx);
        assert_eq!(left.total, right.total);
    }

    #[test]
    fn mult_never_drops_below_one() {
        let eval = HandEvaluation {
            kind: HandKind::HighCard,
            base_chips: 10,
            base_mult: 0.0,
        };
        let breakdown = score_hand(&eval, &[], &[], &ScoringContext::default());
        assert_eq!(breakdown.total, 10);
    }

    #[test]
    fn jokers_add_to_totals() {
        let table = HandTable::default();
        let cards = vec![
            Card::standard(Suit::Hearts, Rank::Four),
            Card::standard(Suit::Spades, Rank::Four),
        ];
        let eval = table.evaluate(&cards);
        let jokers = vec![
            JokerDef {
                id: "banner".into(),
                name: "Banner".into(),
                rarity: JokerRarity::Common,
                chips: 30,
                mult: 0.0,
                condition: JokerCondition::PerDiscardRemaining,
                price: 5,
            },
            JokerDef {
                id: "joker".into(),
                name: "Joker".into(),
                rarity: JokerRarity::Common,
                chips: 0,
                mult: 4.0,
                condition: JokerCondition::Always,
                price: 4,
            },
        ];
        let ctx = ScoringContext {
            money: 0,
            hands_left: 3,
            discards_left: 2,
        };
        let breakdown = score_hand(&eval, &cards, &jokers, &ctx);
        // pair: 10 chips x2, two fours at 2 chips each
        assert_eq!(breakdown.total_chips, 10 + 4 + 60);
        assert_eq!(breakdown.total_mult, 2.0 + 2.0 + 4.0);
        assert_eq!(breakdown.total, 74 * 8);
    }
}
