use crate::{
    Card, ChipScheme, Content, Deck, GameConfig, HandTable, Inventory, InventoryError,
    RngState, RoundState, RunPhase, RunRules, ShopState,
};
use thiserror::Error;

mod hand;
mod shop;
mod state;

pub use hand::{PlayOutcome, RoundSummary};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("invalid phase: {0:?}")]
    InvalidPhase(RunPhase),
    #[error("no cards selected")]
    NothingSelected,
    #[error("no hands left")]
    NoHandsLeft,
    #[error("no discards left")]
    NoDiscardsLeft,
    #[error("card {0} is not in hand")]
    InvalidSelection(u32),
    #[error("at most {0} cards can be selected")]
    SelectionFull(usize),
    #[error("not enough spades")]
    NotEnoughSpades,
    #[error("shop not available")]
    ShopNotAvailable,
    #[error("invalid shop offer index")]
    InvalidOfferIndex,
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),
}

/// One poker-style run: rounds of limited hands against a growing target.
#[derive(Debug)]
pub struct CardRun {
    pub rules: RunRules,
    pub scheme: ChipScheme,
    pub config: GameConfig,
    pub content: Content,
    pub table: HandTable,
    pub inventory: Inventory,
    pub rng: RngState,
    pub deck: Deck,
    pub hand: Vec<Card>,
    /// Selected card ids in selection order.
    pub selected: Vec<u32>,
    pub state: RoundState,
    pub shop: Option<ShopState>,
    next_card_id: u32,
}
