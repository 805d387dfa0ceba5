// Line-of-fire scoring
//
// Scans the four rays from a tank's cell, scoring each by the enemies,
// friendlies and bait it would hit, and authorises a shot only when the best
// ray clearly dominates.

use serde::Deserialize;

use crate::board::Board;
use crate::types::{Direction, Position};

/// When a scan ray stops before the range bound
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RayTermination {
    /// Stop at the board edge, or immediately if the shooter's own cell is a wall
    Origin,
    /// Stop at the board edge or at the first wall along the ray
    Obstacle,
}

/// Per-round scoring parameters
#[derive(Debug, Clone, Copy)]
pub struct FireScorer {
    /// Base score of a hit; the board's play radius
    pub board_width: i32,
    /// Shell speed minus tank speed; distance decay divisor
    pub speed_offset: i32,
    pub min_fire_score: i32,
    pub termination: RayTermination,
}

/// What a ray can see
pub struct Targets<'a> {
    pub enemies: &'a [Position],
    pub friendlies: &'a [Position],
    pub bait: Option<Position>,
}

impl FireScorer {
    /// Furthest step a ray walks (exclusive)
    fn range(&self) -> i32 {
        self.board_width.saturating_mul(self.speed_offset)
    }

    /// Scores of the Up, Down, Left, Right rays
    pub fn score_rays(&self, board: &Board, from: Position, targets: &Targets) -> [i32; 4] {
        let mut scores = [0; 4];
        let decay = self.speed_offset.max(1);

        for (slot, dir) in Direction::all().iter().enumerate() {
            for step in 1..self.range() {
                let cell = from.offset(*dir, step);
                if !board.in_bounds(&cell) {
                    break;
                }
                let stop = match self.termination {
                    RayTermination::Origin => board.is_wall(&from),
                    RayTermination::Obstacle => board.is_wall(&cell),
                };
                if stop {
                    break;
                }

                let falloff = step / decay;
                if targets.enemies.contains(&cell) {
                    scores[slot] += self.board_width - falloff;
                }
                if targets.friendlies.contains(&cell) {
                    scores[slot] += -self.board_width + falloff;
                }
                if targets.bait == Some(cell) {
                    let half = ((step as f32 / decay as f32) * 0.5) as i32;
                    scores[slot] += self.board_width / 2 - half;
                }
            }
        }

        scores
    }

    /// Scans and decides in one go
    pub fn pick(&self, board: &Board, from: Position, targets: &Targets) -> Option<Direction> {
        let scores = self.score_rays(board, from, targets);
        select_fire_direction(scores, self.board_width, self.min_fire_score)
    }
}

/// Picks the firing direction from ray scores, if any.
///
/// The best ray must reach `min_score` and either outweigh the other three
/// combined or clear `board_width - 1` on its own. Ties go to the earlier ray
/// in Up, Down, Left, Right order.
pub fn select_fire_direction(scores: [i32; 4], board_width: i32, min_score: i32) -> Option<Direction> {
    let mut best = 0;
    for i in 1..scores.len() {
        if scores[i] > scores[best] {
            best = i;
        }
    }
    let value = scores[best];
    let total: i32 = scores.iter().sum();

    if value >= min_score && (value >= total - value || value >= board_width - 1) {
        Some(Direction::all()[best])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_board(size: usize) -> Board {
        Board::load(&vec![vec![0; size]; size], size).unwrap()
    }

    fn scorer(board_width: i32, speed_offset: i32) -> FireScorer {
        FireScorer {
            board_width,
            speed_offset,
            min_fire_score: 6,
            termination: RayTermination::Origin,
        }
    }

    #[test]
    fn test_best_below_minimum_never_fires() {
        assert_eq!(select_fire_direction([5, 0, 0, 0], 25, 6), None);
        assert_eq!(select_fire_direction([5, -20, -20, -20], 25, 6), None);
    }

    #[test]
    fn test_best_equal_to_rest_fires() {
        // total 12, best 6 == 12 - 6
        assert_eq!(select_fire_direction([6, 6, 0, 0], 25, 6), Some(Direction::Up));
    }

    #[test]
    fn test_best_below_rest_and_absolute_bar_holds_fire() {
        // total 13, 6 < 7 and 6 < 24
        assert_eq!(select_fire_direction([6, 6, 1, 0], 25, 6), None);
    }

    #[test]
    fn test_absolute_bar_overrides_dominance() {
        assert_eq!(
            select_fire_direction([9, 20, 24, 0], 25, 6),
            Some(Direction::Left)
        );
    }

    #[test]
    fn test_ties_go_to_first_direction() {
        assert_eq!(select_fire_direction([0, 0, 9, 9], 10, 6), Some(Direction::Left));
        assert_eq!(select_fire_direction([0, 9, 0, 9], 5, 6), Some(Direction::Down));
    }

    #[test]
    fn test_enemy_to_the_right_scores_with_floor_decay() {
        let board = open_board(10);
        let enemies = [Position::new(2, 5)];
        let friendlies = [Position::new(2, 2)];
        let targets = Targets {
            enemies: &enemies,
            friendlies: &friendlies,
            bait: None,
        };
        let scores = scorer(10, 2).score_rays(&board, Position::new(2, 2), &targets);
        assert_eq!(scores, [0, 0, 0, 9]);
        assert_eq!(
            scorer(10, 2).pick(&board, Position::new(2, 2), &targets),
            Some(Direction::Right)
        );
    }

    #[test]
    fn test_friendly_in_line_penalised() {
        let board = open_board(10);
        let enemies = [Position::new(6, 4)];
        let friendlies = [Position::new(4, 4)];
        let targets = Targets {
            enemies: &enemies,
            friendlies: &friendlies,
            bait: None,
        };
        let scores = scorer(10, 1).score_rays(&board, Position::new(2, 4), &targets);
        // friendly at step 2: -10 + 2, enemy at step 4: 10 - 4
        assert_eq!(scores[1], -2);
        assert_eq!(scorer(10, 1).pick(&board, Position::new(2, 4), &targets), None);
    }

    #[test]
    fn test_bait_scores_half_weight() {
        let board = open_board(10);
        let targets = Targets {
            enemies: &[],
            friendlies: &[],
            bait: Some(Position::new(0, 3)),
        };
        let scores = scorer(10, 2).score_rays(&board, Position::new(3, 3), &targets);
        // step 3: 5 - floor(1.5 * 0.5)
        assert_eq!(scores[0], 5);
    }

    #[test]
    fn test_obstacle_termination_stops_at_wall() {
        let mut map = vec![vec![0; 10]; 10];
        map[2][4] = 1;
        let board = Board::load(&map, 10).unwrap();
        let enemies = [Position::new(2, 6)];
        let targets = Targets {
            enemies: &enemies,
            friendlies: &[],
            bait: None,
        };

        let through = scorer(10, 2).score_rays(&board, Position::new(2, 2), &targets);
        assert_eq!(through[3], 8);

        let blocked = FireScorer {
            termination: RayTermination::Obstacle,
            ..scorer(10, 2)
        };
        assert_eq!(blocked.score_rays(&board, Position::new(2, 2), &targets)[3], 0);
    }

    #[test]
    fn test_rays_stop_at_board_edge() {
        let board = open_board(5);
        let enemies = [Position::new(0, 4)];
        let targets = Targets {
            enemies: &enemies,
            friendlies: &[],
            bait: None,
        };
        let scores = scorer(25, 2).score_rays(&board, Position::new(0, 0), &targets);
        assert_eq!(scores, [0, 0, 0, 23]);
    }

    #[test]
    fn test_huge_speed_offset_does_not_overflow_range() {
        let board = open_board(20);
        let enemies = [Position::new(2, 5)];
        let targets = Targets {
            enemies: &enemies,
            friendlies: &[],
            bait: None,
        };
        let scores = scorer(10, i32::MAX).score_rays(&board, Position::new(2, 2), &targets);
        assert_eq!(scores, [0, 0, 0, 10]);
    }
}
