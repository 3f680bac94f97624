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

use intelligent_agents::Agent;
use maze_escape_logic::Direction;

use crate::controller::{Decision, TurnController};
use crate::scoring::{MoveScorer, WeightedScorer};
use crate::TurnError;

/// Plays whole games in-process. Keeps the saved state in memory instead of on disk; otherwise
/// each call to `act` is exactly one turn of the bot.
pub struct MazeEscapeAgent<S = WeightedScorer> {
    controller: TurnController<S>,
    state: Option<String>,
    decisions: Vec<Decision>,
}

impl MazeEscapeAgent<WeightedScorer> {
    pub fn new() -> Self {
        Self::from_controller(TurnController::new())
    }
}

impl Default for MazeEscapeAgent<WeightedScorer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> MazeEscapeAgent<S>
where
    S: MoveScorer,
{
    pub fn from_controller(controller: TurnController<S>) -> Self {
        Self {
            controller,
            state: None,
            decisions: vec![],
        }
    }

    /// The state text the next turn will load.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Why each move so far was chosen.
    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }
}

impl<S> Agent for MazeEscapeAgent<S>
where
    S: MoveScorer,
{
    type Action = Direction;
    type Percept = String;
    type Error = TurnError;

    fn act(&mut self, percept: &Self::Percept) -> Result<Self::Action, Self::Error> {
        let turn = self.controller.take_turn(percept, self.state.as_deref())?;
        self.state = Some(turn.state);
        self.decisions.push(turn.decision);
        Ok(turn.direction)
    }
}
