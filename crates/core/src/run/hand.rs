use super::*;
use crate::*;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayOutcome {
    pub breakdown: ScoreBreakdown,
    pub phase: RunPhase,
    pub drawn: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub round: u32,
    pub reward: i64,
    pub next_target: i64,
    pub levelled: HandKind,
    pub level: u32,
    pub offers: usize,
}

impl CardRun {
    fn ensure_active(&self) -> Result<(), RunError> {
        if self.state.phase != RunPhase::Active {
            return Err(RunError::InvalidPhase(self.state.phase));
        }
        Ok(())
    }

    /// Flips selection of the card with `card_id`. Returns whether it is now
    /// selected.
    pub fn toggle_select(&mut self, card_id: u32) -> Result<bool, RunError> {
        self.ensure_active()?;
        if !self.hand.iter().any(|card| card.id == card_id) {
            return Err(RunError::InvalidSelection(card_id));
        }
        if let Some(pos) = self.selected.iter().position(|id| *id == card_id) {
            self.selected.remove(pos);
            return Ok(false);
        }
        if self.selected.len() >= self.rules.max_selected {
            return Err(RunError::SelectionFull(self.rules.max_selected));
        }
        self.selected.push(card_id);
        Ok(true)
    }

    /// Replaces the selection with the cards at `indices` in hand order.
    pub fn select_indices(&mut self, indices: &[usize]) -> Result<(), RunError> {
        self.ensure_active()?;
        if indices.len() > self.rules.max_selected {
            return Err(RunError::SelectionFull(self.rules.max_selected));
        }
        let mut ids = Vec::with_capacity(indices.len());
        for idx in indices {
            let card = self
                .hand
                .get(*idx)
                .ok_or(RunError::InvalidSelection(*idx as u32))?;
            if !ids.contains(&card.id) {
                ids.push(card.id);
            }
        }
        self.selected = ids;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected_cards(&self) -> Vec<Card> {
        self.selected
            .iter()
            .filter_map(|id| self.hand.iter().find(|card| card.id == *id).copied())
            .collect()
    }

    /// Scores the current selection without touching run state.
    pub fn preview(&self) -> ScoreBreakdown {
        let cards = self.selected_cards();
        let eval = self.table.evaluate(&cards);
        score_hand(&eval, &cards, &self.inventory.defs(), &self.scoring_context())
    }

    fn take_selected(&mut self) -> Vec<Card> {
        let ids = std::mem::take(&mut self.selected);
        let (taken, kept): (Vec<Card>, Vec<Card>) = std::mem::take(&mut self.hand)
            .into_iter()
            .partition(|card| ids.contains(&card.id));
        self.hand = kept;
        taken
    }

    pub fn play_hand(&mut self, events: &mut EventBus) -> Result<PlayOutcome, RunError> {
        self.ensure_active()?;
        if self.selected.is_empty() {
            return Err(RunError::NothingSelected);
        }
        if self.state.hands_left == 0 {
            return Err(RunError::NoHandsLeft);
        }
        self.shop = None;

        let breakdown = self.preview();
        self.state.hands_left -= 1;
        self.state.hands_played = self.state.hands_played.saturating_add(1);
        self.state.score = self.state.score.saturating_add(breakdown.total);
        self.state.last_hand = Some(breakdown.hand);
        events.push(Event::HandScored {
            hand: breakdown.hand,
            chips: breakdown.total_chips,
            mult: breakdown.total_mult,
            total: breakdown.total,
        });

        let played = self.take_selected();
        self.deck.discard(played);
        let drawn = self.draw_to_hand(events);

        if self.state.score >= self.state.target {
            self.state.phase = RunPhase::RoundComplete;
            info!(round = self.state.round, score = self.state.score, "round complete");
        } else if self.state.hands_left == 0 {
            self.state.phase = RunPhase::GameOver;
            info!(
                score = self.state.score,
                rounds = self.state.rounds_completed,
                reward = self.state.pending_reward,
                "card run over"
            );
            events.push(Event::GameOver {
                score: self.state.score,
                rounds: self.state.rounds_completed,
                reward: self.state.pending_reward,
            });
        }
        Ok(PlayOutcome {
            breakdown,
            phase: self.state.phase,
            drawn,
        })
    }

    pub fn discard(&mut self, events: &mut EventBus) -> Result<usize, RunError> {
        self.ensure_active()?;
        if self.selected.is_empty() {
            return Err(RunError::NothingSelected);
        }
        if self.state.discards_left == 0 {
            return Err(RunError::NoDiscardsLeft);
        }
        self.state.discards_left -= 1;
        let discarded = self.take_selected();
        let count = discarded.len();
        self.deck.discard(discarded);
        events.push(Event::CardsDiscarded { count });
        self.draw_to_hand(events);
        Ok(count)
    }

    /// Refills the hand from the deck. An exhausted deck leaves it short.
    pub fn draw_to_hand(&mut self, events: &mut EventBus) -> usize {
        let needed = self.rules.hand_size.saturating_sub(self.hand.len());
        if needed == 0 {
            return 0;
        }
        let mut drawn = self.deck.draw_cards(needed);
        let count = drawn.len();
        if count < needed {
            debug!(needed, count, "deck exhausted");
        }
        self.hand.append(&mut drawn);
        if count > 0 {
            events.push(Event::HandDealt { count });
        }
        count
    }

    /// Banks the round reward, raises the target, levels one random hand and
    /// opens the joker interstitial.
    pub fn advance(&mut self, events: &mut EventBus) -> Result<RoundSummary, RunError> {
        if self.state.phase != RunPhase::RoundComplete {
            return Err(RunError::InvalidPhase(self.state.phase));
        }
        let round = self.state.round;
        let score = self.state.score;
        let reward = self.rules.round_reward;
        self.state.pending_reward = self.state.pending_reward.saturating_add(reward);
        self.state.next_round(&self.rules);
        self.selected.clear();

        let (levelled, entry) = self.table.level_up_random(&mut self.rng);
        events.push(Event::HandLevelled {
            hand: levelled,
            level: entry.level,
        });
        events.push(Event::RoundCompleted {
            round,
            score,
            reward,
            next_target: self.state.target,
        });

        let offers = self.open_shop();
        self.draw_to_hand(events);
        Ok(RoundSummary {
            round,
            reward,
            next_target: self.state.target,
            levelled,
            level: entry.level,
            offers,
        })
    }
}
