/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

use maze_escape_logic::Direction;
use serde::Serialize;

use crate::config::ScoringConfig;

/// What one move would do across every candidate position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveTally {
    pub direction: Direction,

    /// Number of consistent candidate positions.
    pub candidates: usize,

    /// Candidates from which the move does not hit a wall.
    pub feasible: usize,

    /// Feasible candidates for which the move gets closer to the exit.
    pub progress: usize,

    /// Distinct windows the bot could see after the move.
    pub outcomes: usize,

    /// Expected number of candidates still indistinguishable after the move: the sum of squared
    /// group sizes over the feasible count. Zero when nothing is feasible.
    pub expected_remaining: f64,
}

/// Rates a move from its tally; higher is better.
pub trait MoveScorer {
    fn score(&self, tally: &MoveTally) -> f64;
}

impl<F> MoveScorer for F
where
    F: Fn(&MoveTally) -> f64,
{
    fn score(&self, tally: &MoveTally) -> f64 {
        self(tally)
    }
}

/// Weighted sum of three ratios, each between 0 and 1:
///
/// - feasibility: feasible / candidates
/// - progress: progress / feasible
/// - disambiguation: 1 - expected_remaining / feasible
///
/// A move that is infeasible for every candidate scores negative infinity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedScorer {
    pub feasibility: f64,
    pub progress: f64,
    pub disambiguation: f64,
}

impl WeightedScorer {
    pub fn new(feasibility: f64, progress: f64, disambiguation: f64) -> Self {
        Self {
            feasibility,
            progress,
            disambiguation,
        }
    }
}

impl Default for WeightedScorer {
    fn default() -> Self {
        ScoringConfig::default().into()
    }
}

impl From<ScoringConfig> for WeightedScorer {
    fn from(config: ScoringConfig) -> Self {
        Self::new(config.feasibility, config.progress, config.disambiguation)
    }
}

impl MoveScorer for WeightedScorer {
    fn score(&self, tally: &MoveTally) -> f64 {
        if tally.feasible == 0 || tally.candidates == 0 {
            return f64::NEG_INFINITY;
        }
        let feasible = tally.feasible as f64;
        self.feasibility * feasible / tally.candidates as f64
            + self.progress * tally.progress as f64 / feasible
            + self.disambiguation * (1.0 - tally.expected_remaining / feasible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn tally(feasible: usize, progress: usize, expected_remaining: f64) -> MoveTally {
        MoveTally {
            direction: Direction::Up,
            candidates: 4,
            feasible,
            progress,
            outcomes: 1,
            expected_remaining,
        }
    }

    #[test]
    fn test_weighted_scorer_defaults() {
        let scorer = WeightedScorer::default();
        assert_abs_diff_eq!(scorer.feasibility, 1.0);
        assert_abs_diff_eq!(scorer.progress, 2.0);
        assert_abs_diff_eq!(scorer.disambiguation, 1.0);
    }

    #[test]
    fn test_weighted_scorer_combines_ratios() {
        let scorer = WeightedScorer::default();
        // 2/4 feasible, 1/2 progress, 1 - 1/2 disambiguation
        assert_abs_diff_eq!(scorer.score(&tally(2, 1, 1.0)), 0.5 + 1.0 + 0.5);
    }

    #[test]
    fn test_weighted_scorer_perfect_split() {
        let scorer = WeightedScorer::new(0.0, 0.0, 1.0);
        // Four candidates, each leading to its own window.
        assert_abs_diff_eq!(scorer.score(&tally(4, 0, 1.0)), 0.75);
        // Four candidates, all leading to the same window.
        assert_abs_diff_eq!(scorer.score(&tally(4, 0, 4.0)), 0.0);
    }

    #[test]
    fn test_weighted_scorer_infeasible_is_worst() {
        let scorer = WeightedScorer::default();
        assert_eq!(scorer.score(&tally(0, 0, 0.0)), f64::NEG_INFINITY);
    }

    #[test]
    fn test_closure_scorer() {
        let prefer_progress = |tally: &MoveTally| tally.progress as f64;
        assert_abs_diff_eq!(prefer_progress.score(&tally(3, 2, 1.0)), 2.0);
    }

    fn feasible_tally() -> impl Strategy<Value = MoveTally> {
        (1usize..20, 0usize..20).prop_flat_map(|(feasible, extra)| {
            (0..=feasible, 1..=feasible).prop_map(move |(progress, remaining)| MoveTally {
                direction: Direction::Up,
                candidates: feasible + extra,
                feasible,
                progress,
                outcomes: 1,
                expected_remaining: remaining as f64,
            })
        })
    }

    proptest! {
        #[test]
        fn test_weighted_scorer_is_bounded(tally in feasible_tally()) {
            let score = WeightedScorer::default().score(&tally);
            prop_assert!(score >= 0.0);
            prop_assert!(score <= 4.0 + 1e-9);
        }

        #[test]
        fn test_more_progress_never_scores_lower(tally in feasible_tally()) {
            prop_assume!(tally.progress < tally.feasible);
            let scorer = WeightedScorer::default();
            let better = MoveTally {
                progress: tally.progress + 1,
                ..tally.clone()
            };
            prop_assert!(scorer.score(&better) > scorer.score(&tally));
        }
    }
}
