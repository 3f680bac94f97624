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

use log::{debug, trace, warn};
use maze_escape_logic::{find_nearest, find_path, merge, Cell, Direction, Grid, Observation};
use serde::Serialize;

use crate::config::{AgentConfig, ConfigError};
use crate::localizer::Localizer;
use crate::scoring::{MoveScorer, WeightedScorer};
use crate::state::AccumulatedState;
use crate::TurnError;

/// Why a move was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    /// The map shows a route to the exit this many moves long.
    Escape { steps: usize },

    /// Ranked against the master maze.
    Localized { candidates: usize },

    /// Heading for the nearest unexplored square.
    Explore,

    /// Nothing better to go on; the first open neighbour.
    Wander,
}

/// The result of one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub direction: Direction,

    /// Text to hand back on the next turn.
    pub state: String,

    pub decision: Decision,
}

pub struct TurnController<S = WeightedScorer> {
    localizer: Option<Localizer<S>>,
}

impl TurnController<WeightedScorer> {
    /// A controller that can only explore.
    pub fn new() -> Self {
        Self { localizer: None }
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self, ConfigError> {
        let localizer = config
            .load_master()?
            .map(|master| Localizer::new(master, WeightedScorer::from(config.scoring)));
        Ok(Self { localizer })
    }
}

impl Default for TurnController<WeightedScorer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> TurnController<S>
where
    S: MoveScorer,
{
    pub fn with_localizer(localizer: Localizer<S>) -> Self {
        Self {
            localizer: Some(localizer),
        }
    }

    /// Play one turn: rebuild the map from `previous` (the `state` of the last turn, if any),
    /// merge in the observation and pick a move.
    pub fn take_turn(&self, observation: &str, previous: Option<&str>) -> Result<Turn, TurnError> {
        let observation = Observation::parse(observation)?;
        let mut accumulated = self.load(&observation, previous)?;
        merge(&mut accumulated, observation.window())?;
        trace!("map after merge\n{}", accumulated);

        let (direction, decision) = self.decide(&accumulated, observation.view_radius())?;
        debug!("moving {} ({:?})", direction, decision);

        let state = AccumulatedState::new(direction, accumulated).to_text();
        Ok(Turn {
            direction,
            state,
            decision,
        })
    }

    fn load(&self, observation: &Observation, previous: Option<&str>) -> Result<Grid, TurnError> {
        let previous = match previous.filter(|text| !text.trim().is_empty()) {
            Some(text) => AccumulatedState::parse(text)?,
            None => return Ok(observation.window().clone()),
        };
        let moved = match observation.direction() {
            Some(direction) if direction != previous.last_move => {
                warn!(
                    "observation says the last move was {} but the saved state says {}",
                    direction, previous.last_move
                );
                direction
            }
            Some(direction) => direction,
            None => previous.last_move,
        };
        previous.advance(moved)
    }

    fn decide(&self, accumulated: &Grid, view_radius: usize) -> Result<(Direction, Decision), TurnError> {
        let path = find_path(accumulated, Cell::Exit);
        if let Some(first) = path.first() {
            return Ok((*first, Decision::Escape { steps: path.len() }));
        }

        if let Some(localizer) = &self.localizer {
            if let Some((direction, localization)) = localizer.choose_move(accumulated, view_radius)? {
                trace!(
                    "candidates\n{}",
                    localizer.candidate_map(&localization.candidates)?
                );
                return Ok((
                    direction,
                    Decision::Localized {
                        candidates: localization.candidates.len(),
                    },
                ));
            }
        }

        // Nothing past the edge of the map has been seen, so ring it with unknown squares.
        let mut frontier = accumulated.fork();
        for direction in Direction::ALL {
            frontier.pad(direction);
        }
        if let Some((_, path)) = find_nearest(&frontier, Cell::Unknown) {
            if let Some(first) = path.first() {
                return Ok((*first, Decision::Explore));
            }
        }

        let agent = accumulated.agent()?;
        Direction::ALL
            .iter()
            .copied()
            .find(|direction| accumulated.can_step(agent, *direction))
            .map(|direction| (direction, Decision::Wander))
            .ok_or(TurnError::BoxedIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_escape_logic::MazeError;

    const MASTER: &str = "\
#######
#--#--#
#--#--#
#--#--#
e-----#
#-----#
#######";

    fn controller() -> TurnController {
        TurnController::with_localizer(Localizer::with_default_scorer(
            Grid::from_text(MASTER).unwrap(),
        ))
    }

    #[test]
    fn test_exit_in_view_is_taken() {
        let turn = TurnController::new()
            .take_turn("1\n-e-\n-b-\n---", None)
            .expect("turn failed");
        assert_eq!(turn.direction, Direction::Up);
        assert_eq!(turn.decision, Decision::Escape { steps: 1 });
        assert_eq!(turn.state, "UP\n-e-\n-b-\n---");
    }

    #[test]
    fn test_first_turn_localizes() {
        let turn = controller()
            .take_turn("1\n#--\n#--\n#--", None)
            .expect("turn failed");
        assert_eq!(turn.direction, Direction::Right);
        assert_eq!(turn.decision, Decision::Localized { candidates: 9 });
        assert_eq!(turn.state, "RIGHT\n#--\n#b-\n#--");
    }

    #[test]
    fn test_second_turn_merges_and_escapes() {
        let first = TurnController::new()
            .take_turn("1\n###\n#b-\n###", None)
            .expect("first turn failed");
        assert_eq!(first.direction, Direction::Right);
        assert_eq!(first.decision, Decision::Explore);

        let second = TurnController::new()
            .take_turn("1\n#e#\n#b#\n#-#", Some(&first.state))
            .expect("second turn failed");
        assert_eq!(second.direction, Direction::Up);
        assert_eq!(second.decision, Decision::Escape { steps: 1 });
        assert_eq!(second.state, "UP\n#e#\n#b#\n#-#\n###");
    }

    #[test]
    fn test_merge_with_saved_state() {
        let turn = TurnController::new()
            .take_turn("2\n###\n#e#\n---", Some("LEFT\n#--\neb-\n#--\n###"))
            .expect("turn failed");
        assert_eq!(turn.state.split_once('\n').unwrap().1, "o###\n##b#\n#---\n#---");
    }

    #[test]
    fn test_observation_direction_overrides_saved_move() {
        let turn = TurnController::new()
            .take_turn("UP\n1\n###\n#b#\n#-#", Some("RIGHT\n#-#\n#b#\n#-#"))
            .expect("turn failed");
        // Moving UP keeps the saved map's orientation.
        assert_eq!(turn.state, "DOWN\n###\n#b#\n#-#\n#-#");
    }

    #[test]
    fn test_explores_towards_unknown() {
        let turn = TurnController::new()
            .take_turn("1\n#-#\n#b#\n#-#", Some("UP\nooo\nooo\n#-#\n#b#\n###"))
            .expect("turn failed");
        assert_eq!(turn.decision, Decision::Explore);
        assert_eq!(turn.direction, Direction::Up);
        assert_eq!(turn.state, "UP\nooo\n#-#\n#b#\n#-#\n###");
    }

    #[test]
    fn test_explores_past_the_edge_of_the_map() {
        // Up is a dead end; the open squares at the bottom edge lead somewhere unseen.
        let turn = TurnController::new()
            .take_turn("2\n#####\n##-##\n##b##\n##-##\n##---", None)
            .expect("turn failed");
        assert_eq!(turn.decision, Decision::Explore);
        assert_eq!(turn.direction, Direction::Down);
        assert_eq!(turn.state, "DOWN\n#####\n##-##\n##b##\n##-##\n##---");
    }

    #[test]
    fn test_localize_then_escape() {
        let controller = controller();
        let first = controller
            .take_turn("1\n---\n-b-\n--#", None)
            .expect("first turn failed");
        assert_eq!(first.direction, Direction::Up);
        assert_eq!(first.decision, Decision::Localized { candidates: 2 });

        let second = controller
            .take_turn("1\n#e#\n-b-\n---", Some(&first.state))
            .expect("second turn failed");
        assert_eq!(second.direction, Direction::Up);
        assert_eq!(second.decision, Decision::Escape { steps: 1 });
        assert_eq!(second.state, "UP\n#e#\n-b-\n---\n--#");
    }

    #[test]
    fn test_boxed_in() {
        assert_eq!(
            TurnController::new().take_turn("1\n###\n#b#\n###", None),
            Err(TurnError::BoxedIn)
        );
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            TurnController::new().take_turn("1\n###\n#b\n###", None),
            Err(TurnError::Maze(MazeError::MalformedGrid { .. }))
        ));
        assert!(matches!(
            TurnController::new().take_turn("1\n###\n#b#\n#-#", Some("NOWHERE\n#b#")),
            Err(TurnError::MalformedState(_))
        ));
    }

    #[test]
    fn test_from_config_without_master_explores() {
        let controller =
            TurnController::from_config(&AgentConfig::default()).expect("config failed");
        let turn = controller
            .take_turn("1\n#--\n#b-\n#--", None)
            .expect("turn failed");
        assert_eq!(turn.decision, Decision::Explore);
        assert_eq!(turn.direction, Direction::Up);
    }

    #[test]
    fn test_wanders_when_nothing_is_left_to_explore() {
        let turn = TurnController::new()
            .take_turn("1\n###\n#b#\n#-#", Some("UP\n###\n#-#\n#b#\n###"))
            .expect("turn failed");
        assert_eq!(turn.decision, Decision::Wander);
        assert_eq!(turn.direction, Direction::Down);
    }
}
