use crate::{
    is_vowel, Currency, CurrencyPort, DictionaryError, Event, EventBus, Feature, LetterRules,
    LetterTile, ProgressionPort, RngState, TileBag, UpgradeTree, WordValidator,
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LetterError {
    #[error("tile {0} is not in hand")]
    TileNotInHand(u32),
    #[error("no {0} tile in hand")]
    LetterNotInHand(char),
    #[error("tile {0} is not in the discard zone")]
    TileNotDiscarded(u32),
    #[error("word slots are full")]
    SlotsFull,
    #[error("invalid word slot {0}")]
    InvalidSlot(usize),
    #[error("word slot {0} is taken")]
    SlotTaken(usize),
    #[error("discard zone is locked")]
    DiscardLocked,
    #[error("discard zone is full")]
    DiscardFull,
    #[error("words need at least {0} letters")]
    TooShort(usize),
    #[error("{0} is not a word")]
    NotAWord(String),
    #[error("dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),
}

/// Letter-shop levels that change tile scoring and table size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LetterBonuses {
    pub bigger_hand: usize,
    pub extra_word_slots: usize,
    pub letter_boost: i64,
    pub multiplier_madness: u32,
    pub vowel_power: bool,
    pub consonant_king: bool,
    pub word_wizard: bool,
    pub discard_zone: bool,
}

impl LetterBonuses {
    pub fn from_progress(tree: &UpgradeTree, progression: &dyn ProgressionPort) -> Self {
        let extra_word_slots = [
            Feature::FourLetterWords,
            Feature::FiveLetterWords,
            Feature::SixLetterWords,
        ]
        .into_iter()
        .filter(|feature| progression.is_unlocked(*feature))
        .count();
        Self {
            bigger_hand: tree.count("bigger-hand") as usize,
            extra_word_slots,
            letter_boost: i64::from(tree.count("letter-boost")),
            multiplier_madness: tree.count("multiplier-madness"),
            vowel_power: tree.is_purchased("vowel-power"),
            consonant_king: tree.is_purchased("consonant-king"),
            word_wizard: tree.is_purchased("word-wizard"),
            discard_zone: progression.is_unlocked(Feature::DiscardZone),
        }
    }

    pub fn tile_value(&self, tile: &LetterTile) -> (i64, f64) {
        let mut chips = tile.chips + self.letter_boost;
        let mut mult = tile.mult + 0.5 * f64::from(self.multiplier_madness);
        if self.vowel_power && is_vowel(tile.letter) {
            chips += 2;
            mult += 1.0;
        }
        if self.consonant_king && matches!(tile.letter, 'J' | 'Q' | 'X' | 'Z') {
            chips += 3;
            mult += 2.0;
        }
        if self.word_wizard {
            chips += 5;
            mult += 3.0;
        }
        (chips, mult)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordOutcome {
    pub word: String,
    pub chips: i64,
    pub mult: f64,
    pub score: i64,
}

/// Letter-tile word game: build a word in the slots from the tiles in hand.
#[derive(Debug, Clone)]
pub struct LetterGame {
    pub rules: LetterRules,
    pub bonuses: LetterBonuses,
    pub bag: TileBag,
    pub hand: Vec<LetterTile>,
    pub slots: Vec<Option<LetterTile>>,
    pub discards: Vec<LetterTile>,
    pub games_played: u32,
    pub best_score: i64,
    rng: RngState,
}

impl LetterGame {
    pub fn new(rules: LetterRules, seed: u64) -> Self {
        let mut rng = RngState::from_seed(seed);
        let bag = TileBag::new(&mut rng);
        let mut game = Self {
            slots: vec![None; rules.word_slots],
            rules,
            bonuses: LetterBonuses::default(),
            bag,
            hand: Vec::new(),
            discards: Vec::new(),
            games_played: 0,
            best_score: 0,
            rng,
        };
        let mut events = EventBus::default();
        game.new_hand(&mut events);
        game
    }

    pub fn hand_size(&self) -> usize {
        self.rules.hand_size + self.bonuses.bigger_hand
    }

    pub fn word_slot_count(&self) -> usize {
        (self.rules.word_slots + self.bonuses.extra_word_slots).min(self.rules.max_word_slots)
    }

    /// Takes new bonuses. Extra slots appear immediately; a bigger hand waits
    /// for the next deal.
    pub fn set_bonuses(&mut self, bonuses: LetterBonuses) {
        self.bonuses = bonuses;
        let count = self.word_slot_count();
        while self.slots.len() < count {
            self.slots.push(None);
        }
        if !bonuses.discard_zone {
            let returned: Vec<LetterTile> = self.discards.drain(..).collect();
            self.hand.extend(returned);
        }
    }

    fn take_from_hand(&mut self, tile_id: u32) -> Result<LetterTile, LetterError> {
        let pos = self
            .hand
            .iter()
            .position(|tile| tile.id == tile_id)
            .ok_or(LetterError::TileNotInHand(tile_id))?;
        Ok(self.hand.remove(pos))
    }

    pub fn place_tile(&mut self, tile_id: u32) -> Result<usize, LetterError> {
        let slot = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(LetterError::SlotsFull)?;
        self.place_tile_at(tile_id, slot)?;
        Ok(slot)
    }

    pub fn place_tile_at(&mut self, tile_id: u32, slot: usize) -> Result<(), LetterError> {
        match self.slots.get(slot) {
            None => return Err(LetterError::InvalidSlot(slot)),
            Some(Some(_)) => return Err(LetterError::SlotTaken(slot)),
            Some(None) => {}
        }
        let tile = self.take_from_hand(tile_id)?;
        self.slots[slot] = Some(tile);
        Ok(())
    }

    /// Places the first hand tile showing `letter`.
    pub fn place_letter(&mut self, letter: char) -> Result<usize, LetterError> {
        let letter = letter.to_ascii_uppercase();
        let tile_id = self
            .hand
            .iter()
            .find(|tile| tile.letter == letter)
            .map(|tile| tile.id)
            .ok_or(LetterError::LetterNotInHand(letter))?;
        self.place_tile(tile_id)
    }

    pub fn remove_slot(&mut self, slot: usize) -> Result<LetterTile, LetterError> {
        let tile = self
            .slots
            .get_mut(slot)
            .ok_or(LetterError::InvalidSlot(slot))?
            .take()
            .ok_or(LetterError::InvalidSlot(slot))?;
        self.hand.push(tile);
        Ok(tile)
    }

    pub fn remove_last(&mut self) -> Option<LetterTile> {
        let slot = self.slots.iter().rposition(Option::is_some)?;
        self.remove_slot(slot).ok()
    }

    pub fn clear_slots(&mut self) {
        for slot in self.slots.iter_mut() {
            if let Some(tile) = slot.take() {
                self.hand.push(tile);
            }
        }
    }

    pub fn discard_tile(&mut self, tile_id: u32) -> Result<(), LetterError> {
        if !self.bonuses.discard_zone {
            return Err(LetterError::DiscardLocked);
        }
        if self.discards.len() >= self.rules.discard_slots {
            return Err(LetterError::DiscardFull);
        }
        let tile = self.take_from_hand(tile_id)?;
        self.discards.push(tile);
        Ok(())
    }

    pub fn return_discard(&mut self, tile_id: u32) -> Result<(), LetterError> {
        let pos = self
            .discards
            .iter()
            .position(|tile| tile.id == tile_id)
            .ok_or(LetterError::TileNotDiscarded(tile_id))?;
        let tile = self.discards.remove(pos);
        self.hand.push(tile);
        Ok(())
    }

    /// Throws away the discard zone and draws replacements while the bag
    /// still has tiles.
    pub fn reroll(&mut self, events: &mut EventBus) -> usize {
        let wanted = self.discards.len();
        self.discards.clear();
        let mut drawn = self.bag.draw(wanted);
        let count = drawn.len();
        self.hand.append(&mut drawn);
        events.push(Event::TilesRerolled { count });
        count
    }

    /// Drops every tile on the table and deals a fresh hand, refilling the
    /// bag first when it is short.
    pub fn new_hand(&mut self, events: &mut EventBus) {
        self.hand.clear();
        self.discards.clear();
        self.slots = vec![None; self.word_slot_count()];
        let size = self.hand_size();
        if self.bag.len() < size {
            debug!(remaining = self.bag.len(), "tile bag regenerated");
            self.bag.regenerate(&mut self.rng);
        }
        self.hand = self.bag.draw(size);
        events.push(Event::HandDealt {
            count: self.hand.len(),
        });
    }

    pub fn current_word(&self) -> String {
        self.slots.iter().flatten().map(|tile| tile.letter).collect()
    }

    pub fn preview(&self) -> WordOutcome {
        let mut chips = 0i64;
        let mut mult = 0.0f64;
        for tile in self.slots.iter().flatten() {
            let (c, m) = self.bonuses.tile_value(tile);
            chips += c;
            mult += m;
        }
        WordOutcome {
            word: self.current_word(),
            chips,
            mult,
            score: (chips as f64 * mult).floor() as i64,
        }
    }

    /// Scores the word in the slots, pays it out in tiles and deals again.
    pub fn submit(
        &mut self,
        validator: &WordValidator,
        wallet: &mut dyn CurrencyPort,
        events: &mut EventBus,
    ) -> Result<WordOutcome, LetterError> {
        let outcome = self.preview();
        if outcome.word.len() < self.rules.min_word_len {
            return Err(LetterError::TooShort(self.rules.min_word_len));
        }
        if !validator.is_valid(&outcome.word)? {
            return Err(LetterError::NotAWord(outcome.word));
        }
        wallet.add(Currency::Tiles, outcome.score);
        self.games_played = self.games_played.saturating_add(1);
        self.best_score = self.best_score.max(outcome.score);
        info!(word = %outcome.word, score = outcome.score, "word scored");
        events.push(Event::WordScored {
            word: outcome.word.clone(),
            score: outcome.score,
        });
        self.new_hand(events);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CurrencyPool;

    fn game_with(letters: &str) -> LetterGame {
        let mut game = LetterGame::new(LetterRules::default(), 5);
        game.hand = letters
            .chars()
            .enumerate()
            .map(|(idx, letter)| LetterTile::new(500 + idx as u32, letter))
            .collect();
        game
    }

    fn spell(game: &mut LetterGame, word: &str) {
        for letter in word.chars() {
            game.place_letter(letter).expect("place");
        }
    }

    #[test]
    fn deals_seven_tiles() {
        let game = LetterGame::new(LetterRules::default(), 5);
        assert_eq!(game.hand.len(), 7);
        assert_eq!(game.bag.len(), 24);
        assert_eq!(game.slots.len(), 3);
    }

    #[test]
    fn submit_pays_tiles_and_redeals() {
        let mut game = game_with("CATSXYZ");
        let words = WordValidator::from_word_list("cat\n").expect("words");
        let mut pool = CurrencyPool::new();
        let mut events = EventBus::default();
        spell(&mut game, "CAT");
        let outcome = game.submit(&words, &mut pool, &mut events).expect("submit");
        // C=3, A=1, T=1 chips; three tiles at mult 1
        assert_eq!(outcome.score, 15);
        assert_eq!(pool.get(Currency::Tiles), 15);
        assert_eq!(game.games_played, 1);
        assert_eq!(game.hand.len(), 7);
        assert!(game.slots.iter().all(Option::is_none));
    }

    #[test]
    fn invalid_words_keep_the_table() {
        let mut game = game_with("CATSXYZ");
        let words = WordValidator::from_word_list("cat\n").expect("words");
        let mut pool = CurrencyPool::new();
        let mut events = EventBus::default();
        spell(&mut game, "TAC");
        assert_eq!(
            game.submit(&words, &mut pool, &mut events),
            Err(LetterError::NotAWord("TAC".into()))
        );
        assert_eq!(game.current_word(), "TAC");
        assert_eq!(pool.get(Currency::Tiles), 0);

        game.clear_slots();
        spell(&mut game, "C");
        assert_eq!(
            game.submit(&words, &mut pool, &mut events),
            Err(LetterError::TooShort(2))
        );
    }

    #[test]
    fn unloaded_dictionary_is_an_error() {
        let mut game = game_with("CATSXYZ");
        let mut pool = CurrencyPool::new();
        let mut events = EventBus::default();
        spell(&mut game, "CAT");
        assert_eq!(
            game.submit(&WordValidator::new(), &mut pool, &mut events),
            Err(LetterError::Dictionary(DictionaryError::NotLoaded))
        );
    }

    #[test]
    fn slots_fill_in_order_and_cap() {
        let mut game = game_with("ABCDEFG");
        spell(&mut game, "ABC");
        assert_eq!(game.place_letter('D'), Err(LetterError::SlotsFull));
        let removed = game.remove_last().expect("remove");
        assert_eq!(removed.letter, 'C');
        assert_eq!(game.current_word(), "AB");
        assert_eq!(game.hand.len(), 5);
    }

    #[test]
    fn discard_zone_needs_unlock() {
        let mut game = game_with("ABCDEFG");
        let id = game.hand[0].id;
        assert_eq!(game.discard_tile(id), Err(LetterError::DiscardLocked));
        game.set_bonuses(LetterBonuses {
            discard_zone: true,
            ..LetterBonuses::default()
        });
        for _ in 0..5 {
            let id = game.hand[0].id;
            game.discard_tile(id).expect("discard");
        }
        let id = game.hand[0].id;
        assert_eq!(game.discard_tile(id), Err(LetterError::DiscardFull));
        let back = game.discards[0].id;
        game.return_discard(back).expect("return");
        assert_eq!(game.discards.len(), 4);
    }

    #[test]
    fn reroll_replaces_discards_from_the_bag() {
        let mut game = game_with("ABCDEFG");
        game.set_bonuses(LetterBonuses {
            discard_zone: true,
            ..LetterBonuses::default()
        });
        let ids: Vec<u32> = game.hand.iter().take(3).map(|tile| tile.id).collect();
        for id in ids {
            game.discard_tile(id).expect("discard");
        }
        let before = game.bag.len();
        let mut events = EventBus::default();
        assert_eq!(game.reroll(&mut events), 3);
        assert_eq!(game.hand.len(), 7);
        assert_eq!(game.bag.len(), before - 3);
        assert!(game.discards.is_empty());
    }

    #[test]
    fn reroll_stops_when_bag_is_empty() {
        let mut game = game_with("ABCDEFG");
        game.set_bonuses(LetterBonuses {
            discard_zone: true,
            ..LetterBonuses::default()
        });
        game.bag.tiles.truncate(1);
        let ids: Vec<u32> = game.hand.iter().take(2).map(|tile| tile.id).collect();
        for id in ids {
            game.discard_tile(id).expect("discard");
        }
        let mut events = EventBus::default();
        assert_eq!(game.reroll(&mut events), 1);
        assert_eq!(game.hand.len(), 6);
    }

    #[test]
    fn short_bag_regenerates_on_new_hand() {
        let mut game = game_with("ABCDEFG");
        game.bag.tiles.truncate(3);
        let mut events = EventBus::default();
        game.new_hand(&mut events);
        assert_eq!(game.hand.len(), 7);
        assert_eq!(game.bag.len(), 24);
    }

    #[test]
    fn bonuses_stack_on_tiles() {
        let bonuses = LetterBonuses {
            letter_boost: 2,
            multiplier_madness: 3,
            vowel_power: true,
            consonant_king: true,
            word_wizard: true,
            ..LetterBonuses::default()
        };
        let vowel = LetterTile::new(1, 'E');
        assert_eq!(bonuses.tile_value(&vowel), (1 + 2 + 2 + 5, 1.0 + 1.5 + 1.0 + 3.0));
        let zed = LetterTile::new(2, 'Z');
        assert_eq!(bonuses.tile_value(&zed), (10 + 2 + 3 + 5, 1.0 + 1.5 + 2.0 + 3.0));
    }

    #[test]
    fn word_unlocks_add_slots_and_bigger_hand_waits() {
        let mut game = LetterGame::new(LetterRules::default(), 5);
        game.set_bonuses(LetterBonuses {
            bigger_hand: 2,
            extra_word_slots: 5,
            ..LetterBonuses::default()
        });
        assert_eq!(game.slots.len(), 6);
        assert_eq!(game.hand.len(), 7);
        let mut events = EventBus::default();
        game.new_hand(&mut events);
        assert_eq!(game.hand.len(), 9);
    }
}
