use crate::{HandKind, RunRules};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunPhase {
    Active,
    RoundComplete,
    GameOver,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundState {
    pub phase: RunPhase,
    pub round: u32,
    pub rounds_completed: u32,
    pub hands_left: u8,
    pub discards_left: u8,
    pub score: i64,
    pub target: i64,
    /// Spades earned this run, paid out on restart. Jokers are bought with it.
    pub pending_reward: i64,
    #[serde(default)]
    pub last_hand: Option<HandKind>,
    #[serde(default)]
    pub hands_played: u32,
}

impl RoundState {
    pub fn new(rules: &RunRules) -> Self {
        Self {
            phase: RunPhase::Active,
            round: 1,
            rounds_completed: 0,
            hands_left: rules.hands,
            discards_left: rules.discards,
            score: 0,
            target: rules.starting_target,
            pending_reward: 0,
            last_hand: None,
            hands_played: 0,
        }
    }

    /// Moves to the next round: counters reset and the target grows. The
    /// score is cumulative across the whole run.
    pub fn next_round(&mut self, rules: &RunRules) {
        self.round = self.round.saturating_add(1);
        self.rounds_completed = self.rounds_completed.saturating_add(1);
        self.hands_left = rules.hands;
        self.discards_left = rules.discards;
        self.target = rules.next_target(self.target);
        self.phase = RunPhase::Active;
    }
}
