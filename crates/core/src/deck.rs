use crate::{is_vowel, Card, ChipScheme, LetterTile, Rank, RngState, Suit};

#[derive(Debug, Default, Clone)]
pub struct Deck {
    pub draw: Vec<Card>,
    pub discard: Vec<Card>,
}

impl Deck {
    /// Fresh 52-card deck with ids `first_id..first_id + 52`.
    pub fn standard52(scheme: ChipScheme, first_id: u32) -> Self {
        let mut draw = Vec::with_capacity(52);
        let mut id = first_id;
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                draw.push(Card::new(id, suit, rank, scheme));
                id = id.saturating_add(1);
            }
        }
        Self {
            draw,
            discard: Vec::new(),
        }
    }

    pub fn shuffle(&mut self, rng: &mut RngState) {
        rng.shuffle(&mut self.draw);
    }

    /// Draws up to `count` cards. An empty deck yields a short draw.
    pub fn draw_cards(&mut self, count: usize) -> Vec<Card> {
        let mut cards = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(card) = self.draw.pop() {
                cards.push(card);
            } else {
                break;
            }
        }
        cards
    }

    pub fn discard(&mut self, mut cards: Vec<Card>) {
        self.discard.append(&mut cards);
    }

    pub fn remaining(&self) -> usize {
        self.draw.len()
    }
}

const CONSONANTS: [char; 21] = [
    'B', 'C', 'D', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W',
    'X', 'Y', 'Z',
];

/// Letter tiles waiting to be drawn.
#[derive(Debug, Default, Clone)]
pub struct TileBag {
    pub tiles: Vec<LetterTile>,
    next_id: u32,
}

impl TileBag {
    pub fn new(rng: &mut RngState) -> Self {
        let mut bag = Self::default();
        bag.regenerate(rng);
        bag
    }

    /// Replaces the contents with two of each vowel and one of each
    /// consonant, shuffled. Ids keep counting up so they never collide with
    /// tiles still in play.
    pub fn regenerate(&mut self, rng: &mut RngState) {
        self.tiles.clear();
        for letter in ('A'..='Z').filter(|letter| is_vowel(*letter)) {
            for _ in 0..2 {
                self.push_tile(letter);
            }
        }
        for letter in CONSONANTS {
            self.push_tile(letter);
        }
        rng.shuffle(&mut self.tiles);
    }

    fn push_tile(&mut self, letter: char) {
        self.next_id = self.next_id.saturating_add(1);
        self.tiles.push(LetterTile::new(self.next_id, letter));
    }

    pub fn draw(&mut self, count: usize) -> Vec<LetterTile> {
        let keep = self.tiles.len().saturating_sub(count);
        self.tiles.split_off(keep)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
