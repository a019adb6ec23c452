use crate::{Currency, CurrencyPool, CurrencyPort, Event, EventBus, RngState, WagerRules};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WagerError {
    #[error("bomb count must be between 1 and {max}, got {got}")]
    InvalidBombCount { got: usize, max: usize },
    #[error("bomb count is fixed at 1 until the bomb slider is bought")]
    BombSliderLocked,
    #[error("not enough currency to cover the stake")]
    InsufficientFunds,
    #[error("invalid square {0}")]
    InvalidSquare(usize),
    #[error("session is over")]
    Finished,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    pub money: i64,
    pub diamonds: i64,
    pub emeralds: i64,
    pub tiles: i64,
}

impl Stake {
    fn entries(&self) -> [(Currency, i64); 4] {
        [
            (Currency::Money, self.money),
            (Currency::Diamonds, self.diamonds),
            (Currency::Emeralds, self.emeralds),
            (Currency::Tiles, self.tiles),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    pub money: f64,
    pub diamonds: f64,
    pub emeralds: f64,
    pub tiles: f64,
}

/// Credited amounts per currency.
pub type Payout = Stake;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    Diamond,
    Bomb,
    AlreadyRevealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Open,
    Busted,
    CashedOut,
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One round of the diamond grid. The stake is debited when the session
/// opens and is only returned through a cash-out.
#[derive(Debug, Clone)]
pub struct WagerSession {
    pub stake: Stake,
    pub bombs: usize,
    pub bonus: Bonus,
    rate: f64,
    mines: Vec<bool>,
    revealed: Vec<bool>,
    state: SessionState,
}

impl WagerSession {
    pub fn open(
        stake: Stake,
        bombs: usize,
        slider_unlocked: bool,
        rules: &WagerRules,
        wallet: &mut CurrencyPool,
        rng: &mut RngState,
        events: &mut EventBus,
    ) -> Result<Self, WagerError> {
        let max = rules.max_bombs();
        if bombs == 0 || bombs > max {
            return Err(WagerError::InvalidBombCount { got: bombs, max });
        }
        if bombs != 1 && !slider_unlocked {
            return Err(WagerError::BombSliderLocked);
        }
        if stake.entries().iter().any(|(_, amount)| *amount < 0)
            || !wallet.spend_all(&stake.entries())
        {
            debug!(?stake, "wager stake rejected");
            return Err(WagerError::InsufficientFunds);
        }
        for (currency, amount) in stake.entries() {
            if amount > 0 {
                events.push(Event::CurrencyChanged {
                    currency,
                    delta: -amount,
                    balance: wallet.get(currency),
                });
            }
        }

        let mut mines = vec![false; rules.squares];
        for pos in rng.sample_positions(rules.squares, bombs) {
            mines[pos] = true;
        }
        info!(bombs, ?stake, "wager opened");
        events.push(Event::WagerOpened { bombs });
        Ok(Self {
            stake,
            bombs,
            bonus: Bonus::default(),
            rate: rules.bonus_rate(bombs),
            mines,
            revealed: vec![false; rules.squares],
            state: SessionState::Open,
        })
    }

    pub fn squares(&self) -> usize {
        self.mines.len()
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn is_busted(&self) -> bool {
        self.state == SessionState::Busted
    }

    /// Mine layout, only shown once the session is over.
    pub fn mines(&self) -> Option<&[bool]> {
        if self.is_open() {
            None
        } else {
            Some(&self.mines)
        }
    }

    pub fn diamonds_found(&self) -> usize {
        self.revealed
            .iter()
            .zip(&self.mines)
            .filter(|(revealed, mine)| **revealed && !**mine)
            .count()
    }

    pub fn reveal(&mut self, index: usize, events: &mut EventBus) -> Result<Reveal, WagerError> {
        if !self.is_open() {
            return Err(WagerError::Finished);
        }
        let mine = *self.mines.get(index).ok_or(WagerError::InvalidSquare(index))?;
        if self.revealed[index] {
            return Ok(Reveal::AlreadyRevealed);
        }
        self.revealed[index] = true;
        events.push(Event::SquareRevealed { index, bomb: mine });
        if mine {
            self.state = SessionState::Busted;
            self.bonus = Bonus::default();
            info!(index, stake = ?self.stake, "wager busted");
            return Ok(Reveal::Bomb);
        }
        let p = self.rate;
        self.bonus.money += self.stake.money as f64 * p;
        self.bonus.diamonds += self.stake.diamonds as f64 * p + 1.0;
        if self.stake.emeralds > 0 {
            self.bonus.emeralds += self.stake.emeralds as f64 * p + 0.5;
        }
        if self.stake.tiles > 0 {
            self.bonus.tiles += self.stake.tiles as f64 * p + 0.25;
        }
        Ok(Reveal::Diamond)
    }

    /// What a cash-out would credit right now.
    pub fn payout(&self) -> Payout {
        if self.is_busted() {
            return Payout::default();
        }
        let credit = |stake: i64, bonus: f64| (stake as f64 + round_cents(bonus)).floor() as i64;
        Payout {
            money: credit(self.stake.money, self.bonus.money),
            diamonds: credit(self.stake.diamonds, self.bonus.diamonds),
            emeralds: credit(self.stake.emeralds, self.bonus.emeralds),
            tiles: credit(self.stake.tiles, self.bonus.tiles),
        }
    }

    /// Ends the session and credits the payout. A busted session pays nothing.
    pub fn cash_out(
        &mut self,
        wallet: &mut dyn CurrencyPort,
        events: &mut EventBus,
    ) -> Result<Payout, WagerError> {
        match self.state {
            SessionState::CashedOut => return Err(WagerError::Finished),
            SessionState::Busted => return Ok(Payout::default()),
            SessionState::Open => {}
        }
        let payout = self.payout();
        for (currency, amount) in payout.entries() {
            if amount > 0 {
                wallet.add(currency, amount);
                events.push(Event::CurrencyChanged {
                    currency,
                    delta: amount,
                    balance: wallet.balance(currency),
                });
            }
        }
        self.state = SessionState::CashedOut;
        info!(?payout, "wager cashed out");
        events.push(Event::WagerCashedOut {
            money: payout.money,
            diamonds: payout.diamonds,
            emeralds: payout.emeralds,
            tiles: payout.tiles,
        });
        Ok(payout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn funded() -> CurrencyPool {
        let mut pool = CurrencyPool::new();
        pool.add(Currency::Money, 100);
        pool.add(Currency::Diamonds, 10);
        pool.add(Currency::Emeralds, 4);
        pool
    }

    fn first_safe(session: &WagerSession) -> usize {
        session.mines.iter().position(|mine| !*mine).expect("safe square")
    }

    fn first_mine(session: &WagerSession) -> usize {
        session.mines.iter().position(|mine| *mine).expect("mine")
    }

    #[test]
    fn open_debits_the_stake_up_front() {
        let mut pool = funded();
        let mut rng = RngState::from_seed(11);
        let mut events = EventBus::default();
        let stake = Stake {
            money: 40,
            diamonds: 5,
            ..Stake::default()
        };
        let session = WagerSession::open(stake, 1, false, &WagerRules::default(), &mut pool, &mut rng, &mut events)
            .expect("open");
        assert_eq!(pool.get(Currency::Money), 60);
        assert_eq!(pool.get(Currency::Diamonds), 5);
        assert_eq!(session.mines.iter().filter(|mine| **mine).count(), 1);
    }

    #[test]
    fn short_balance_debits_nothing() {
        let mut pool = funded();
        let before = pool.clone();
        let mut rng = RngState::from_seed(11);
        let mut events = EventBus::default();
        let stake = Stake {
            money: 40,
            tiles: 1,
            ..Stake::default()
        };
        let err = WagerSession::open(stake, 1, false, &WagerRules::default(), &mut pool, &mut rng, &mut events)
            .expect_err("no tiles");
        assert_eq!(err, WagerError::InsufficientFunds);
        assert_eq!(pool, before);
    }

    #[test]
    fn bomb_count_is_gated_and_bounded() {
        let mut pool = funded();
        let mut rng = RngState::from_seed(11);
        let mut events = EventBus::default();
        let rules = WagerRules::default();
        let open = |bombs, slider, pool: &mut CurrencyPool, rng: &mut RngState, events: &mut EventBus| {
            WagerSession::open(Stake::default(), bombs, slider, &rules, pool, rng, events).map(|s| s.bombs)
        };
        assert_eq!(open(3, false, &mut pool, &mut rng, &mut events), Err(WagerError::BombSliderLocked));
        assert_eq!(open(3, true, &mut pool, &mut rng, &mut events), Ok(3));
        assert_eq!(
            open(25, true, &mut pool, &mut rng, &mut events),
            Err(WagerError::InvalidBombCount { got: 25, max: 24 })
        );
        assert_eq!(
            open(0, true, &mut pool, &mut rng, &mut events),
            Err(WagerError::InvalidBombCount { got: 0, max: 24 })
        );
    }

    #[test]
    fn safe_reveals_then_cash_out() {
        let mut pool = funded();
        let mut rng = RngState::from_seed(5);
        let mut events = EventBus::default();
        let stake = Stake {
            money: 100,
            diamonds: 10,
            emeralds: 4,
            tiles: 0,
        };
        let mut session =
            WagerSession::open(stake, 1, false, &WagerRules::default(), &mut pool, &mut rng, &mut events)
                .expect("open");
        let safe = first_safe(&session);
        assert_eq!(session.reveal(safe, &mut events), Ok(Reveal::Diamond));
        assert_eq!(session.reveal(safe, &mut events), Ok(Reveal::AlreadyRevealed));
        assert_eq!(session.diamonds_found(), 1);

        let payout = session.cash_out(&mut pool, &mut events).expect("cash out");
        // 5% per reveal: money 100 + 5, diamonds 10 + 0.5 + 1, emeralds 4 + 0.2 + 0.5
        assert_eq!(payout.money, 105);
        assert_eq!(payout.diamonds, 11);
        assert_eq!(payout.emeralds, 4);
        assert_eq!(payout.tiles, 0);
        assert_eq!(pool.get(Currency::Money), 105);
        assert_eq!(pool.get(Currency::Diamonds), 11);
        assert_eq!(pool.get(Currency::Emeralds), 4);
        assert_eq!(session.cash_out(&mut pool, &mut events), Err(WagerError::Finished));
    }

    #[test]
    fn bomb_forfeits_everything() {
        let mut pool = funded();
        let mut rng = RngState::from_seed(5);
        let mut events = EventBus::default();
        let stake = Stake {
            money: 50,
            ..Stake::default()
        };
        let mut session =
            WagerSession::open(stake, 1, false, &WagerRules::default(), &mut pool, &mut rng, &mut events)
                .expect("open");
        let safe = first_safe(&session);
        session.reveal(safe, &mut events).expect("reveal");
        let mine = first_mine(&session);
        assert_eq!(session.reveal(mine, &mut events), Ok(Reveal::Bomb));
        assert!(session.mines().is_some());
        assert_eq!(session.reveal(safe, &mut events), Err(WagerError::Finished));
        assert_eq!(session.cash_out(&mut pool, &mut events), Ok(Payout::default()));
        assert_eq!(pool.get(Currency::Money), 50);
    }

    #[test]
    fn free_diamonds_accrue_without_a_diamond_stake() {
        let mut pool = funded();
        let mut rng = RngState::from_seed(8);
        let mut events = EventBus::default();
        let mut session = WagerSession::open(
            Stake::default(),
            1,
            false,
            &WagerRules::default(),
            &mut pool,
            &mut rng,
            &mut events,
        )
        .expect("open");
        let safe: Vec<usize> = (0..session.squares())
            .filter(|idx| !session.mines[*idx])
            .take(3)
            .collect();
        for idx in safe {
            session.reveal(idx, &mut events).expect("reveal");
        }
        let payout = session.cash_out(&mut pool, &mut events).expect("cash out");
        assert_eq!(payout.diamonds, 3);
        assert_eq!(payout.money, 0);
        assert_eq!(pool.get(Currency::Diamonds), 13);
    }
}
