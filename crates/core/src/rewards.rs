//! Payout formulas for the arcade minigames. The games themselves run in the
//! frontend; the hub only settles their results.

pub const SNAKE_FOOD_DAMAGE: i64 = 2;
pub const TETRIS_LINE_SCORES: [i64; 5] = [0, 100, 300, 500, 800];

/// Emeralds for a finished snake game with `foods` eaten.
pub fn snake_emeralds(foods: i64, extra_food_level: u32) -> i64 {
    let foods = foods.max(0);
    foods + foods * i64::from(extra_food_level)
}

pub fn snake_lives(extra_lives: u32) -> u32 {
    1 + extra_lives
}

pub fn tetris_level(lines: u32) -> u32 {
    lines / 10 + 1
}

/// Points for clearing `cleared` lines at once. More than four counts as four.
pub fn tetris_line_score(cleared: usize, level: u32) -> i64 {
    let idx = cleared.min(TETRIS_LINE_SCORES.len() - 1);
    TETRIS_LINE_SCORES[idx] * i64::from(level)
}

pub fn tetris_drop_interval_ms(level: u32) -> u64 {
    let slowdown = u64::from(level.saturating_sub(1)) * 50;
    1000u64.saturating_sub(slowdown).max(50)
}

/// Sapphires for a finished game: one per hundred points plus 20% of that
/// per level-bonus level.
pub fn tetris_sapphires(score: i64, level_bonus: u32) -> i64 {
    let base = score.max(0) / 100;
    let bonus = (base as f64 * 0.2 * f64::from(level_bonus)).floor() as i64;
    base + bonus
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_rewards_scale_with_extra_food() {
        assert_eq!(snake_emeralds(7, 0), 7);
        assert_eq!(snake_emeralds(7, 2), 21);
        assert_eq!(snake_emeralds(-3, 2), 0);
        assert_eq!(snake_lives(0), 1);
        assert_eq!(snake_lives(3), 4);
    }

    #[test]
    fn tetris_levels_and_speed() {
        assert_eq!(tetris_level(0), 1);
        assert_eq!(tetris_level(19), 2);
        assert_eq!(tetris_drop_interval_ms(1), 1000);
        assert_eq!(tetris_drop_interval_ms(5), 800);
        assert_eq!(tetris_drop_interval_ms(40), 50);
    }

    #[test]
    fn tetris_scores() {
        assert_eq!(tetris_line_score(4, 2), 1600);
        assert_eq!(tetris_line_score(0, 9), 0);
        assert_eq!(tetris_line_score(6, 1), 800);
        assert_eq!(tetris_sapphires(1250, 0), 12);
        assert_eq!(tetris_sapphires(1250, 3), 12 + 7);
    }
}
