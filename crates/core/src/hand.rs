use crate::{Card, HandRule, Rank, RngState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandKind {
    HighCard,
    Pair,
    TwoPair,
    Trips,
    Straight,
    Flush,
    FullHouse,
    Quads,
    StraightFlush,
    RoyalFlush,
}

impl HandKind {
    pub const ALL: [HandKind; 10] = [
        HandKind::HighCard,
        HandKind::Pair,
        HandKind::TwoPair,
        HandKind::Trips,
        HandKind::Straight,
        HandKind::Flush,
        HandKind::FullHouse,
        HandKind::Quads,
        HandKind::StraightFlush,
        HandKind::RoyalFlush,
    ];

    pub fn id(self) -> &'static str {
        match self {
            HandKind::HighCard => "high_card",
            HandKind::Pair => "pair",
            HandKind::TwoPair => "two_pair",
            HandKind::Trips => "trips",
            HandKind::Straight => "straight",
            HandKind::Flush => "flush",
            HandKind::FullHouse => "full_house",
            HandKind::Quads => "quads",
            HandKind::StraightFlush => "straight_flush",
            HandKind::RoyalFlush => "royal_flush",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            HandKind::HighCard => "High Card",
            HandKind::Pair => "Pair",
            HandKind::TwoPair => "Two Pair",
            HandKind::Trips => "Three of a Kind",
            HandKind::Straight => "Straight",
            HandKind::Flush => "Flush",
            HandKind::FullHouse => "Full House",
            HandKind::Quads => "Four of a Kind",
            HandKind::StraightFlush => "Straight Flush",
            HandKind::RoyalFlush => "Royal Flush",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }
}

pub const EMPTY_HAND_BASE: (i64, f64) = (5, 1.0);

pub fn default_hand_base(kind: HandKind) -> (i64, f64) {
    match kind {
        HandKind::HighCard => (5, 1.0),
        HandKind::Pair => (10, 2.0),
        HandKind::TwoPair => (20, 2.0),
        HandKind::Trips => (30, 3.0),
        HandKind::Straight => (30, 4.0),
        HandKind::Flush => (35, 4.0),
        HandKind::FullHouse => (40, 4.0),
        HandKind::Quads => (60, 7.0),
        HandKind::StraightFlush | HandKind::RoyalFlush => (100, 8.0),
    }
}

/// Classifies a selection. Flushes and straights need exactly five cards.
pub fn evaluate_hand(cards: &[Card]) -> HandKind {
    if cards.is_empty() {
        return HandKind::HighCard;
    }

    let mut rank_counts: HashMap<Rank, usize> = HashMap::new();
    for card in cards {
        *rank_counts.entry(card.rank).or_insert(0) += 1;
    }
    let mut counts: Vec<usize> = rank_counts.values().copied().collect();
    counts.sort_by(|a, b| b.cmp(a));
    let first = counts.first().copied().unwrap_or(0);
    let second = counts.get(1).copied().unwrap_or(0);

    let is_flush = cards.len() == 5 && cards.iter().all(|card| card.suit == cards[0].suit);
    let is_straight = cards.len() == 5 && is_straight(cards);

    if is_flush && is_straight {
        return if is_royal(cards) {
            HandKind::RoyalFlush
        } else {
            HandKind::StraightFlush
        };
    }
    if first == 4 {
        return HandKind::Quads;
    }
    if first == 3 && second == 2 {
        return HandKind::FullHouse;
    }
    if is_flush {
        return HandKind::Flush;
    }
    if is_straight {
        return HandKind::Straight;
    }
    if first == 3 {
        return HandKind::Trips;
    }
    if first == 2 && second == 2 {
        return HandKind::TwoPair;
    }
    if first == 2 {
        return HandKind::Pair;
    }
    HandKind::HighCard
}

fn sorted_values(cards: &[Card]) -> Vec<u8> {
    let mut values: Vec<u8> = cards.iter().map(|card| card.rank.value()).collect();
    values.sort_unstable();
    values
}

const BROADWAY: [u8; 5] = [1, 10, 11, 12, 13];

fn is_straight(cards: &[Card]) -> bool {
    let values = sorted_values(cards);
    if values == BROADWAY {
        return true;
    }
    values.windows(2).all(|pair| pair[1] == pair[0] + 1)
}

fn is_royal(cards: &[Card]) -> bool {
    sorted_values(cards) == BROADWAY
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandEvaluation {
    pub kind: HandKind,
    pub base_chips: i64,
    pub base_mult: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandLevel {
    pub level: u32,
    pub chips: i64,
    pub mult: f64,
}

/// Per-category base values, grown by level-ups over a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandTable {
    levels: HashMap<HandKind, HandLevel>,
}

impl Default for HandTable {
    fn default() -> Self {
        Self::from_rules(&[])
    }
}

impl HandTable {
    /// Missing categories fall back to the built-in table.
    pub fn from_rules(rules: &[HandRule]) -> Self {
        let mut levels = HashMap::new();
        for kind in HandKind::ALL {
            let (chips, mult) = rules
                .iter()
                .find(|rule| rule.kind == kind)
                .map(|rule| (rule.chips, rule.mult))
                .unwrap_or_else(|| default_hand_base(kind));
            levels.insert(
                kind,
                HandLevel {
                    level: 1,
                    chips,
                    mult,
                },
            );
        }
        Self { levels }
    }

    pub fn get(&self, kind: HandKind) -> HandLevel {
        self.levels.get(&kind).copied().unwrap_or_else(|| {
            let (chips, mult) = default_hand_base(kind);
            HandLevel {
                level: 1,
                chips,
                mult,
            }
        })
    }

    pub fn level(&self, kind: HandKind) -> u32 {
        self.get(kind).level
    }

    /// Chips grow by a fifth (floored) and mult by one.
    pub fn level_up(&mut self, kind: HandKind) -> HandLevel {
        let mut entry = self.get(kind);
        entry.level = entry.level.saturating_add(1);
        entry.chips = (entry.chips as f64 * 1.2).floor() as i64;
        entry.mult += 1.0;
        self.levels.insert(kind, entry);
        entry
    }

    pub fn level_up_random(&mut self, rng: &mut RngState) -> (HandKind, HandLevel) {
        let kind = HandKind::ALL[rng.index(HandKind::ALL.len())];
        (kind, self.level_up(kind))
    }

    /// Classifies `cards` and looks up the current base. An empty selection
    /// always scores the fixed default regardless of level.
    pub fn evaluate(&self, cards: &[Card]) -> HandEvaluation {
        if cards.is_empty() {
            return HandEvaluation {
                kind: HandKind::HighCard,
                base_chips: EMPTY_HAND_BASE.0,
                base_mult: EMPTY_HAND_BASE.1,
            };
        }
        let kind = evaluate_hand(cards);
        let entry = self.get(kind);
        HandEvaluation {
            kind,
            base_chips: entry.chips,
            base_mult: entry.mult,
        }
    }
}
