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

// PEAS - Performance, Environment, Action, Sensing
//
// See:
// -  Chapter 2: Intelligent Agents, page 40

use num_traits::Zero;
use serde::Serialize;

/// An Agent acts in a Performance, Environment, Action, Sensing (PEAS) cycle.
/// For a given Perception, the Agent will return an Action.
///
/// Agents that keep a model of the world (e.g. a map built from partial views) store it
/// themselves between calls to `act`. An agent may also fail to find any action at all, which is
/// reported through `Error` rather than by inventing an action.
///
/// Notice that the Agent is not aware of an Environment, it's only interface
/// is the Perception coming in then the Action going out.
pub trait Agent {
    type Action;
    type Percept;
    type Error;

    fn act(&mut self, percept: &Self::Percept) -> Result<Self::Action, Self::Error>;
}

/// An Environment runs a single Agent in a Performance, Environment, Action, Sensing (PEAS) cycle.
///
/// Notice that the Environment is not aware of an Agent.
pub trait Environment {
    type Action;
    type Percept;
    type Score: num_traits::NumAssign + Copy;

    fn percept(&self) -> Self::Percept;
    fn execute_action(&mut self, action: &Self::Action);

    /// Whether the episode is over, e.g. the agent escaped or crashed. A Simulation stops
    /// stepping a terminal Environment.
    fn is_terminal(&self) -> bool;

    /// Returns the score of the Environment. This is not cumulative or stateful. This is the score
    /// of the Environment at the current state.
    fn score(&self) -> Self::Score;
}

/// One recorded PEAS cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step<_Percept, _Action> {
    pub index: i32,
    pub percept: _Percept,
    pub action: _Action,
}

/// A Simulation runs a single Agent in multiple Performance, Environment, Action, Sensing (PEAS)
/// cycles. The Agent's score (Performance) is continually kept up to date.
///
/// The Simulation is aware of both the Environment and the single Agent. Notice that the Agent's
/// generic Action and Percept come from the Environment. The Agent still does not need to know that
/// the Environment exists, but the Agent definitely needs the Environment's Action and Percept
/// types.
pub struct Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    environment: _Environment,
    agent: _Agent,
    time_steps: i32,
    steps_taken: i32,
    score: _Environment::Score,
    history: Option<Vec<Step<_Environment::Percept, _Environment::Action>>>,
}

impl<_Environment, _Agent> Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Environment::Percept: Clone,
    _Environment::Action: Clone,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    pub fn new(environment: _Environment, agent: _Agent, time_steps: i32) -> Self {
        Self {
            environment,
            agent,
            time_steps,
            steps_taken: 0,
            score: _Environment::Score::zero(),
            history: None,
        }
    }

    /// Keep every percept and action so the run can be replayed later.
    pub fn with_history(mut self) -> Self {
        self.history = Some(Vec::new());
        self
    }

    /// Run until the Environment is terminal or the time steps are used up. If the Agent fails to
    /// act the run stops there and the error is returned; the score so far is kept.
    pub fn run(&mut self) -> Result<(), _Agent::Error> {
        while self.steps_taken < self.time_steps && !self.environment.is_terminal() {
            let percept = self.environment.percept();
            let action = self.agent.act(&percept)?;
            self.environment.execute_action(&action);
            if let Some(history) = self.history.as_mut() {
                history.push(Step {
                    index: self.steps_taken,
                    percept,
                    action,
                });
            }
            self.steps_taken += 1;
            self.score += self.environment.score();
        }
        Ok(())
    }

    pub fn score(&self) -> <_Environment as Environment>::Score {
        self.score
    }

    pub fn steps_taken(&self) -> i32 {
        self.steps_taken
    }

    pub fn environment(&self) -> &_Environment {
        &self.environment
    }

    pub fn history(&self) -> &[Step<_Environment::Percept, _Environment::Action>] {
        self.history.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A corridor of `length` squares. The agent starts at 0 and the goal is the last square.
    struct Corridor {
        length: i32,
        position: i32,
    }

    impl Environment for Corridor {
        type Action = i32;
        type Percept = i32;
        type Score = i32;

        fn percept(&self) -> Self::Percept {
            self.position
        }

        fn execute_action(&mut self, action: &Self::Action) {
            self.position = (self.position + action).clamp(0, self.length - 1);
        }

        fn is_terminal(&self) -> bool {
            self.position == self.length - 1
        }

        fn score(&self) -> Self::Score {
            i32::from(self.is_terminal())
        }
    }

    struct WalkRight;

    impl Agent for WalkRight {
        type Action = i32;
        type Percept = i32;
        type Error = String;

        fn act(&mut self, _percept: &Self::Percept) -> Result<Self::Action, Self::Error> {
            Ok(1)
        }
    }

    // Gives up once it reaches a given square.
    struct GiveUpAt(i32);

    impl Agent for GiveUpAt {
        type Action = i32;
        type Percept = i32;
        type Error = String;

        fn act(&mut self, percept: &Self::Percept) -> Result<Self::Action, Self::Error> {
            if *percept == self.0 {
                Err(format!("stuck at {}", percept))
            } else {
                Ok(1)
            }
        }
    }

    #[test]
    fn test_simulation_stops_when_environment_is_terminal() {
        let environment = Corridor {
            length: 4,
            position: 0,
        };
        let mut simulation = Simulation::new(environment, WalkRight, 100);
        simulation.run().expect("run failed");
        assert_eq!(simulation.steps_taken(), 3);
        assert_eq!(simulation.score(), 1);
    }

    #[test]
    fn test_simulation_stops_at_time_steps() {
        let environment = Corridor {
            length: 10,
            position: 0,
        };
        let mut simulation = Simulation::new(environment, WalkRight, 2);
        simulation.run().expect("run failed");
        assert_eq!(simulation.steps_taken(), 2);
        assert_eq!(simulation.score(), 0);
        assert_eq!(simulation.environment().position, 2);
    }

    #[test]
    fn test_simulation_records_history() {
        let environment = Corridor {
            length: 3,
            position: 0,
        };
        let mut simulation = Simulation::new(environment, WalkRight, 10).with_history();
        simulation.run().expect("run failed");
        assert_eq!(
            simulation.history(),
            &[
                Step {
                    index: 0,
                    percept: 0,
                    action: 1
                },
                Step {
                    index: 1,
                    percept: 1,
                    action: 1
                },
            ]
        );
    }

    #[test]
    fn test_simulation_without_history_records_nothing() {
        let environment = Corridor {
            length: 3,
            position: 0,
        };
        let mut simulation = Simulation::new(environment, WalkRight, 10);
        simulation.run().expect("run failed");
        assert!(simulation.history().is_empty());
    }

    #[test]
    fn test_simulation_returns_agent_error() {
        let environment = Corridor {
            length: 10,
            position: 0,
        };
        let mut simulation = Simulation::new(environment, GiveUpAt(2), 100);
        assert_eq!(simulation.run(), Err("stuck at 2".to_string()));
        assert_eq!(simulation.steps_taken(), 2);
    }
}
