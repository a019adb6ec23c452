use crate::{
    snake_emeralds, snake_lives, tetris_sapphires, CardRun, ClickError, ClickOutcome, Content,
    CoreParams, Currency, CurrencyPool, CurrencyPort, DictionaryError, Event, EventBus, Feature,
    GameConfig, HookRegistry, JokerDef, LetterBonuses, LetterError, LetterGame, Payout,
    PlayOutcome, Progression, ProgressionPort, PurchaseError, PurchaseHook, PurchaseReceipt,
    Reveal, RngState, RoundSummary, RunError, SaveData, ShopId, Stake, Statistics, UpgradeTree,
    WagerError, WagerSession, WordOutcome, WordValidator, SAVE_VERSION,
};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

/// Games reachable from the hub once their unlock is bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Minigame {
    Cards,
    Letters,
    Wager,
    Snake,
    Tetris,
}

impl Minigame {
    pub const ALL: [Minigame; 5] = [
        Minigame::Cards,
        Minigame::Letters,
        Minigame::Wager,
        Minigame::Snake,
        Minigame::Tetris,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Minigame::Cards => "cards",
            Minigame::Letters => "letters",
            Minigame::Wager => "wager",
            Minigame::Snake => "snake",
            Minigame::Tetris => "tetris",
        }
    }

    pub fn feature(self) -> Feature {
        match self {
            Minigame::Cards => Feature::CardGame,
            Minigame::Letters => Feature::LetterGame,
            Minigame::Wager => Feature::DegenDiamonds,
            Minigame::Snake => Feature::Snake,
            Minigame::Tetris => Feature::Tetris,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HubError {
    #[error("{} is locked", .0.id())]
    MinigameLocked(Minigame),
    #[error("unknown shop {0}")]
    UnknownShop(String),
    #[error("no card run in progress")]
    NoCardRun,
    #[error("no wager in progress")]
    NoWager,
    #[error("a wager is already in progress")]
    WagerInProgress,
    #[error(transparent)]
    Click(#[from] ClickError),
    #[error(transparent)]
    Purchase(#[from] PurchaseError),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error(transparent)]
    Letter(#[from] LetterError),
    #[error(transparent)]
    Wager(#[from] WagerError),
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}

/// Owns every subsystem and routes actions between them. Minigames only see
/// the hub through the currency and progression ports.
#[derive(Debug)]
pub struct GameHub {
    pub config: GameConfig,
    pub content: Content,
    pub currencies: CurrencyPool,
    pub progression: Progression,
    pub events: EventBus,
    pub card_run: Option<CardRun>,
    pub letters: LetterGame,
    pub words: WordValidator,
    pub wager: Option<WagerSession>,
    pub bomb_count: usize,
    pub stats: Statistics,
    trees: BTreeMap<ShopId, UpgradeTree>,
    hooks: HookRegistry,
    rng: RngState,
}

impl GameHub {
    pub fn new(config: GameConfig, content: Content, seed: u64) -> Self {
        let mut rng = RngState::from_seed(seed);
        let trees = ShopId::ALL
            .into_iter()
            .map(|shop| (shop, UpgradeTree::new(shop, content.catalog(shop))))
            .collect();
        let letters = LetterGame::new(config.letters.clone(), rng.next_u64());
        Self {
            currencies: CurrencyPool::new(),
            progression: Progression::new(&config.clicker),
            events: EventBus::default(),
            card_run: None,
            letters,
            words: WordValidator::new(),
            wager: None,
            bomb_count: 1,
            stats: Statistics::default(),
            trees,
            hooks: HookRegistry::with_defaults(),
            rng,
            config,
            content,
        }
    }

    pub fn with_words(mut self, words: WordValidator) -> Self {
        self.words = words;
        self
    }

    pub fn register_hook(&mut self, hook: Box<dyn PurchaseHook>) {
        self.hooks.register(hook);
    }

    pub fn balance(&self, currency: Currency) -> i64 {
        self.currencies.get(currency)
    }

    pub fn add_currency(&mut self, currency: Currency, amount: i64) {
        if amount <= 0 {
            return;
        }
        self.currencies.add(currency, amount);
        self.events.push(Event::CurrencyChanged {
            currency,
            delta: amount,
            balance: self.currencies.get(currency),
        });
    }

    pub fn click(&mut self) -> Result<ClickOutcome, HubError> {
        let outcome = self
            .progression
            .cube
            .click(&mut self.currencies, &mut self.events)?;
        self.stats.clicks = self.progression.cube.clicks;
        Ok(outcome)
    }

    pub fn tick(&mut self, seconds: u32) -> bool {
        self.progression.cube.tick(seconds, &mut self.events)
    }

    pub fn tree(&self, shop: ShopId) -> Option<&UpgradeTree> {
        self.trees.get(&shop)
    }

    pub fn trees(&self) -> impl Iterator<Item = &UpgradeTree> + '_ {
        self.trees.values()
    }

    fn upgrade_count(&self, shop: ShopId, id: &str) -> u32 {
        self.trees.get(&shop).map_or(0, |tree| tree.count(id))
    }

    /// Buys one upgrade, then lets every purchase hook react.
    pub fn try_purchase(&mut self, shop: ShopId, id: &str) -> Result<PurchaseReceipt, HubError> {
        let tree = self
            .trees
            .get_mut(&shop)
            .ok_or_else(|| HubError::UnknownShop(shop.id().to_string()))?;
        let receipt = tree.try_purchase(
            id,
            &mut self.currencies,
            &mut self.progression,
            &mut self.events,
        )?;
        self.hooks
            .invoke(&receipt, &mut self.progression, &mut self.events);
        self.refresh_letter_bonuses();
        Ok(receipt)
    }

    pub fn purchase(&mut self, shop: ShopId, id: &str) -> bool {
        match self.try_purchase(shop, id) {
            Ok(_) => true,
            Err(err) => {
                debug!(shop = shop.id(), upgrade = id, %err, "purchase rejected");
                false
            }
        }
    }

    fn refresh_letter_bonuses(&mut self) {
        if let Some(tree) = self.trees.get(&ShopId::Letter) {
            let bonuses = LetterBonuses::from_progress(tree, &self.progression);
            self.letters.set_bonuses(bonuses);
        }
    }

    pub fn is_unlocked(&self, game: Minigame) -> bool {
        self.progression.is_unlocked(game.feature())
    }

    fn require(&self, game: Minigame) -> Result<(), HubError> {
        if self.is_unlocked(game) {
            Ok(())
        } else {
            debug!(game = game.id(), "minigame locked");
            Err(HubError::MinigameLocked(game))
        }
    }

    /// Opens the card table, reusing a run already in progress.
    pub fn start_card_run(&mut self) -> Result<&mut CardRun, HubError> {
        self.require(Minigame::Cards)?;
        if self.card_run.is_none() {
            let seed = self.rng.next_u64();
            info!(seed, "card run started");
            self.stats.card_runs = self.stats.card_runs.saturating_add(1);
            self.card_run = Some(CardRun::new(self.config.clone(), self.content.clone(), seed));
        }
        self.card_run.as_mut().ok_or(HubError::NoCardRun)
    }

    pub fn card_run_mut(&mut self) -> Result<&mut CardRun, HubError> {
        self.require(Minigame::Cards)?;
        self.card_run.as_mut().ok_or(HubError::NoCardRun)
    }

    pub fn card_play(&mut self) -> Result<PlayOutcome, HubError> {
        self.require(Minigame::Cards)?;
        let run = self.card_run.as_mut().ok_or(HubError::NoCardRun)?;
        let outcome = run.play_hand(&mut self.events)?;
        self.stats.best_card_score = self.stats.best_card_score.max(run.state.score);
        Ok(outcome)
    }

    pub fn card_advance(&mut self) -> Result<RoundSummary, HubError> {
        self.require(Minigame::Cards)?;
        let run = self.card_run.as_mut().ok_or(HubError::NoCardRun)?;
        let summary = run.advance(&mut self.events)?;
        self.stats.rounds_cleared = self.stats.rounds_cleared.saturating_add(1);
        Ok(summary)
    }

    pub fn card_discard(&mut self) -> Result<usize, HubError> {
        self.require(Minigame::Cards)?;
        let run = self.card_run.as_mut().ok_or(HubError::NoCardRun)?;
        Ok(run.discard(&mut self.events)?)
    }

    pub fn card_buy_joker(&mut self, index: usize) -> Result<JokerDef, HubError> {
        self.require(Minigame::Cards)?;
        let run = self.card_run.as_mut().ok_or(HubError::NoCardRun)?;
        Ok(run.buy_joker(index, &mut self.events)?)
    }

    /// Leaves game over and pays the run's spades into the pool.
    pub fn card_restart(&mut self) -> Result<i64, HubError> {
        self.require(Minigame::Cards)?;
        let run = self.card_run.as_mut().ok_or(HubError::NoCardRun)?;
        let payout = run.restart(&mut self.events)?;
        self.stats.card_runs = self.stats.card_runs.saturating_add(1);
        self.add_currency(Currency::Spades, payout);
        Ok(payout)
    }

    pub fn letters_mut(&mut self) -> Result<&mut LetterGame, HubError> {
        self.require(Minigame::Letters)?;
        Ok(&mut self.letters)
    }

    pub fn letters_submit(&mut self) -> Result<WordOutcome, HubError> {
        self.require(Minigame::Letters)?;
        let outcome = self
            .letters
            .submit(&self.words, &mut self.currencies, &mut self.events)?;
        self.stats.words_scored = self.stats.words_scored.saturating_add(1);
        self.stats.best_word_score = self.stats.best_word_score.max(outcome.score);
        Ok(outcome)
    }

    pub fn letters_reroll(&mut self) -> Result<usize, HubError> {
        self.require(Minigame::Letters)?;
        Ok(self.letters.reroll(&mut self.events))
    }

    pub fn letters_new_hand(&mut self) -> Result<(), HubError> {
        self.require(Minigame::Letters)?;
        self.letters.new_hand(&mut self.events);
        Ok(())
    }

    pub fn wager_open(&mut self, stake: Stake, bombs: usize) -> Result<(), HubError> {
        self.require(Minigame::Wager)?;
        if self.wager.as_ref().is_some_and(WagerSession::is_open) {
            return Err(HubError::WagerInProgress);
        }
        let slider = self.progression.is_unlocked(Feature::BombSlider);
        let session = WagerSession::open(
            stake,
            bombs,
            slider,
            &self.config.wager,
            &mut self.currencies,
            &mut self.rng,
            &mut self.events,
        )?;
        self.wager = Some(session);
        self.bomb_count = bombs;
        self.stats.wagers = self.stats.wagers.saturating_add(1);
        Ok(())
    }

    pub fn wager_reveal(&mut self, index: usize) -> Result<Reveal, HubError> {
        let session = self.wager.as_mut().ok_or(HubError::NoWager)?;
        Ok(session.reveal(index, &mut self.events)?)
    }

    /// Settles and closes the current session. A busted session closes with
    /// an empty payout.
    pub fn wager_cash_out(&mut self) -> Result<Payout, HubError> {
        let session = self.wager.as_mut().ok_or(HubError::NoWager)?;
        let payout = session.cash_out(&mut self.currencies, &mut self.events)?;
        self.wager = None;
        Ok(payout)
    }

    /// Credits a finished snake game and returns the emeralds earned.
    pub fn snake_finished(&mut self, foods: i64) -> Result<i64, HubError> {
        self.require(Minigame::Snake)?;
        let emeralds = snake_emeralds(foods, self.upgrade_count(ShopId::Snake, "extra-food"));
        self.add_currency(Currency::Emeralds, emeralds);
        self.stats.snake_games = self.stats.snake_games.saturating_add(1);
        info!(foods, emeralds, "snake game settled");
        Ok(emeralds)
    }

    pub fn snake_lives(&self) -> u32 {
        snake_lives(self.progression.snake_extra_lives)
    }

    pub fn tetris_finished(&mut self, score: i64) -> Result<i64, HubError> {
        self.require(Minigame::Tetris)?;
        let sapphires = tetris_sapphires(score, self.upgrade_count(ShopId::Tetris, "level-bonus"));
        self.add_currency(Currency::Sapphires, sapphires);
        self.stats.tetris_games = self.stats.tetris_games.saturating_add(1);
        info!(score, sapphires, "tetris game settled");
        Ok(sapphires)
    }

    pub fn snapshot(&self) -> SaveData {
        let cube = &self.progression.cube;
        let mut stats = self.stats.clone();
        stats.clicks = cube.clicks;
        SaveData {
            version: SAVE_VERSION,
            currencies: self.currencies.iter().collect(),
            upgrades: self
                .trees
                .iter()
                .map(|(shop, tree)| (*shop, tree.states().clone()))
                .collect(),
            core: CoreParams {
                health: cube.health,
                max_health: cube.max_health,
                click_value: cube.click_value,
                cooldown_reduction: cube.cooldown_reduction,
                cooldown: cube.cooldown,
                shop_revealed: cube.shop_revealed,
                bomb_count: self.bomb_count,
                features: self.progression.features.clone(),
                snake_max_health: self.progression.snake_max_health,
                snake_extra_lives: self.progression.snake_extra_lives,
            },
            stats,
        }
    }

    /// Replaces persistent state with `save`. Minigames in progress are
    /// dropped.
    pub fn restore(&mut self, save: &SaveData) {
        self.currencies = CurrencyPool::new();
        for (currency, amount) in &save.currencies {
            self.currencies.set(*currency, *amount);
        }
        for (shop, tree) in self.trees.iter_mut() {
            tree.reset();
            if let Some(states) = save.upgrades.get(shop) {
                tree.restore(states);
            }
        }

        let core = &save.core;
        let mut progression = Progression::new(&self.config.clicker);
        let cube = &mut progression.cube;
        cube.max_health = core.max_health.max(1);
        cube.health = core.health.clamp(0, cube.max_health);
        cube.click_value = core.click_value;
        cube.cooldown_reduction = core.cooldown_reduction;
        cube.cooldown = core.cooldown;
        cube.shop_revealed = core.shop_revealed;
        cube.clicks = save.stats.clicks;
        progression.features = core.features.clone();
        progression.snake_max_health = core.snake_max_health;
        progression.snake_extra_lives = core.snake_extra_lives;
        self.progression = progression;

        self.bomb_count = core.bomb_count.clamp(1, self.config.wager.max_bombs().max(1));
        self.stats = save.stats.clone();
        self.card_run = None;
        self.wager = None;
        self.refresh_letter_bonuses();
        let mut events = EventBus::default();
        self.letters.new_hand(&mut events);
        info!(version = save.version, "save restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hub() -> GameHub {
        GameHub::new(GameConfig::default(), Content::builtin(), 17)
    }

    #[test]
    fn locked_games_are_rejected() {
        let mut hub = hub();
        for game in Minigame::ALL {
            assert!(!hub.is_unlocked(game));
        }
        assert_eq!(
            hub.start_card_run().map(|_| ()),
            Err(HubError::MinigameLocked(Minigame::Cards))
        );
        assert_eq!(
            hub.snake_finished(3),
            Err(HubError::MinigameLocked(Minigame::Snake))
        );
        assert_eq!(hub.wager_reveal(0), Err(HubError::NoWager));
    }

    #[test]
    fn purchase_routes_through_the_right_wallet() {
        let mut hub = hub();
        hub.currencies.set(Currency::Money, 100);
        assert!(hub.purchase(ShopId::Main, "heal-on-purchase"));
        assert_eq!(hub.balance(Currency::Money), 90);
        assert!(!hub.purchase(ShopId::Diamond, "bomb-slider"));
        assert_eq!(
            hub.try_purchase(ShopId::Main, "heal-on-purchase"),
            Err(HubError::Purchase(PurchaseError::Maxed("heal-on-purchase".into())))
        );
    }

    #[test]
    fn heal_hook_covers_other_shops() {
        let mut hub = hub();
        hub.currencies.set(Currency::Money, 10);
        hub.currencies.set(Currency::Emeralds, 10);
        hub.try_purchase(ShopId::Main, "heal-on-purchase").expect("heal");
        hub.progression.cube.health = 2;
        hub.progression.cube.cooldown = Some(40);
        hub.try_purchase(ShopId::Snake, "border-portals").expect("portals");
        assert_eq!(hub.progression.cube.health, hub.progression.cube.max_health);
        assert_eq!(hub.progression.cube.cooldown, None);
    }

    #[test]
    fn letter_upgrades_reach_the_letter_game() {
        let mut hub = hub();
        hub.currencies.set(Currency::Tiles, 500);
        hub.try_purchase(ShopId::Letter, "bigger-hand").expect("hand");
        hub.try_purchase(ShopId::Letter, "four-letter-words").expect("four");
        assert_eq!(hub.letters.hand_size(), 8);
        assert_eq!(hub.letters.word_slot_count(), 4);
    }

    #[test]
    fn restart_pays_spades() {
        let mut hub = hub();
        hub.progression.unlock(Feature::CardGame);
        let run = hub.start_card_run().expect("run");
        run.state.phase = crate::RunPhase::GameOver;
        run.state.pending_reward = 25;
        assert_eq!(hub.card_restart(), Ok(25));
        assert_eq!(hub.balance(Currency::Spades), 25);
        assert_eq!(hub.stats.card_runs, 2);
    }

    #[test]
    fn second_wager_waits_for_cash_out() {
        let mut hub = hub();
        hub.progression.unlock(Feature::DegenDiamonds);
        hub.currencies.set(Currency::Money, 20);
        let stake = Stake {
            money: 10,
            ..Stake::default()
        };
        hub.wager_open(stake, 1).expect("open");
        assert_eq!(hub.wager_open(stake, 1), Err(HubError::WagerInProgress));
        assert_eq!(hub.wager_open(stake, 3), Err(HubError::WagerInProgress));
        let payout = hub.wager_cash_out().expect("cash out");
        assert_eq!(payout.money, 10);
        assert!(hub.wager.is_none());
        assert_eq!(hub.balance(Currency::Money), 20);
    }

    #[test]
    fn snapshot_round_trips() {
        let mut hub = hub();
        hub.currencies.set(Currency::Money, 60);
        hub.try_purchase(ShopId::Main, "heal-on-purchase").expect("heal");
        hub.try_purchase(ShopId::Main, "health-boost").expect("health");
        hub.click().expect("click");
        let save = hub.snapshot();

        let mut other = GameHub::new(GameConfig::default(), Content::builtin(), 3);
        other.restore(&save);
        assert_eq!(other.snapshot(), save);
        assert_eq!(other.progression.cube.max_health, 11);
        assert!(other.progression.is_unlocked(Feature::HealOnPurchase));
        assert_eq!(other.tree(ShopId::Main).map(|t| t.count("health-boost")), Some(1));
    }
}
