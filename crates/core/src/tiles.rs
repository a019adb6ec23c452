use serde::{Deserialize, Serialize};

pub const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];

/// Scrabble face value for an uppercase letter. Anything else scores 0.
pub fn letter_chips(letter: char) -> i64 {
    match letter {
        'A' | 'E' | 'I' | 'O' | 'U' | 'L' | 'N' | 'R' | 'S' | 'T' => 1,
        'D' | 'G' => 2,
        'B' | 'C' | 'M' | 'P' => 3,
        'F' | 'H' | 'V' | 'W' | 'Y' => 4,
        'K' => 5,
        'J' | 'X' => 8,
        'Q' | 'Z' => 10,
        _ => 0,
    }
}

pub fn is_vowel(letter: char) -> bool {
    VOWELS.contains(&letter)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LetterTile {
    pub id: u32,
    pub letter: char,
    pub chips: i64,
    pub mult: f64,
}

impl LetterTile {
    pub fn new(id: u32, letter: char) -> Self {
        let letter = letter.to_ascii_uppercase();
        Self {
            id,
            letter,
            chips: letter_chips(letter),
            mult: 1.0,
        }
    }
}
