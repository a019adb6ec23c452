use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Numeric value used for straights. Aces are low.
    pub fn value(self) -> u8 {
        match self {
            Rank::Ace => 1,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    pub fn is_face(self) -> bool {
        matches!(self, Rank::Jack | Rank::Queen | Rank::King)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Enhancement {
    Foil,
    Holographic,
    Polychrome,
    Steel,
    Glass,
}

/// Seals ride along with a card but never change its score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Seal {
    Red,
    Blue,
    Gold,
    Purple,
}

/// How a rank maps to base chips. The two card minigames disagree, so each
/// picks one.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChipScheme {
    /// `max(1, value / 2)` with aces low.
    #[default]
    HalfValue,
    /// Aces 11, faces 10, pips at face value.
    FaceValue,
}

impl ChipScheme {
    pub fn chips_for(self, rank: Rank) -> i64 {
        match self {
            ChipScheme::HalfValue => (i64::from(rank.value()) / 2).max(1),
            ChipScheme::FaceValue => match rank {
                Rank::Ace => 11,
                Rank::Jack | Rank::Queen | Rank::King => 10,
                other => i64::from(other.value()),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub struct Card {
    pub id: u32,
    pub suit: Suit,
    pub rank: Rank,
    pub chips: i64,
    #[serde(default = "default_card_mult")]
    pub mult: i64,
    #[serde(default)]
    pub enhancement: Option<Enhancement>,
    #[serde(default)]
    pub seal: Option<Seal>,
}

fn default_card_mult() -> i64 {
    1
}

impl Card {
    pub fn new(id: u32, suit: Suit, rank: Rank, scheme: ChipScheme) -> Self {
        Self {
            id,
            suit,
            rank,
            chips: scheme.chips_for(rank),
            mult: 1,
            enhancement: None,
            seal: None,
        }
    }

    /// A card with id 0 and half-value chips, handy for previews and tests.
    pub fn standard(suit: Suit, rank: Rank) -> Self {
        Self::new(0, suit, rank, ChipScheme::HalfValue)
    }

    pub fn with_enhancement(mut self, enhancement: Enhancement) -> Self {
        self.enhancement = Some(enhancement);
        self
    }

    pub fn with_seal(mut self, seal: Seal) -> Self {
        self.seal = Some(seal);
        self
    }

    pub fn label(&self) -> String {
        format!("{}{}", self.rank.label(), self.suit.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_value_chips_follow_rank_value() {
        let scheme = ChipScheme::HalfValue;
        assert_eq!(scheme.chips_for(Rank::Ace), 1);
        assert_eq!(scheme.chips_for(Rank::Two), 1);
        assert_eq!(scheme.chips_for(Rank::Three), 1);
        assert_eq!(scheme.chips_for(Rank::Four), 2);
        assert_eq!(scheme.chips_for(Rank::Ten), 5);
        assert_eq!(scheme.chips_for(Rank::Jack), 5);
        assert_eq!(scheme.chips_for(Rank::King), 6);
    }

    #[test]
    fn face_value_chips_score_aces_high() {
        let scheme = ChipScheme::FaceValue;
        assert_eq!(scheme.chips_for(Rank::Ace), 11);
        assert_eq!(scheme.chips_for(Rank::Seven), 7);
        assert_eq!(scheme.chips_for(Rank::Queen), 10);
    }

    #[test]
    fn card_defaults_to_unit_mult() {
        let card = Card::new(7, Suit::Clubs, Rank::Nine, ChipScheme::HalfValue);
        assert_eq!(card.mult, 1);
        assert_eq!(card.chips, 4);
        assert_eq!(card.label(), "9♣");
    }
}
