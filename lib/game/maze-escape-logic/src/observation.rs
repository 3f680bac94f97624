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

//! One turn's input.
//!
//! ```text
//! RIGHT      optional: the move the bot just made
//! 1          view radius
//! #e#        the window, already turned so the bot faces up
//! #b#
//! #-#
//! ```

use std::str::FromStr;

use log::debug;

use crate::{Cell, Coord, Direction, Grid, MazeError};

/// A parsed turn input. The window always holds exactly one [`Cell::Agent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    direction: Option<Direction>,
    radius: usize,
    window: Grid,
}

impl Observation {
    /// Build an observation from a window. When the window has no bot marker one is placed at
    /// its centre, which fails for a window with no cells.
    pub fn new(
        direction: Option<Direction>,
        radius: usize,
        mut window: Grid,
    ) -> Result<Self, MazeError> {
        if window.agent().is_err() {
            let centre = Coord::new(
                (window.height().saturating_sub(1) / 2) as i32,
                (window.width().saturating_sub(1) / 2) as i32,
            );
            window.set(centre, Cell::Agent)?;
        }
        let view_radius = window.height().min(window.width()).saturating_sub(1) / 2;
        if radius != view_radius {
            debug!(
                "observation header says radius {} but the window implies {}",
                radius, view_radius
            );
        }
        Ok(Self {
            direction,
            radius,
            window,
        })
    }

    /// Parse turn input: an optional direction label, the radius line, then the window rows.
    pub fn parse(text: &str) -> Result<Self, MazeError> {
        let mut lines = text
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .peekable();

        let direction = match lines.peek() {
            Some(first) => first.parse::<Direction>().ok(),
            None => return Err(MazeError::MalformedObservation("input is empty".to_string())),
        };
        if direction.is_some() {
            lines.next();
        }

        let radius = lines
            .next()
            .ok_or_else(|| MazeError::MalformedObservation("missing radius line".to_string()))?;
        let radius = radius.parse::<usize>().map_err(|_| {
            MazeError::MalformedObservation(format!("radius {:?} is not a number", radius))
        })?;

        let window = lines.collect::<Vec<_>>().join("\n");
        if window.is_empty() {
            return Err(MazeError::MalformedObservation(
                "missing observation window".to_string(),
            ));
        }
        let window = Grid::from_text(&window)?;

        Self::new(direction, radius, window)
    }

    /// The move the bot just made, if the input said so.
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Radius from the header line.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// How far the window reaches from its centre, from the window itself.
    pub fn view_radius(&self) -> usize {
        self.window.height().min(self.window.width()).saturating_sub(1) / 2
    }

    /// The window, facing up, with the bot marked.
    pub fn window(&self) -> &Grid {
        &self.window
    }

    /// Take the window.
    pub fn into_window(self) -> Grid {
        self.window
    }

    /// Render in the input format, without a direction label.
    pub fn to_text(&self) -> String {
        format!("{}\n{}", self.radius, self.window)
    }
}

impl FromStr for Observation {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Observation::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_radius_and_window() {
        let observation = Observation::parse("1\n#e#\n#b#\n#-#\n").expect("parse failed");
        assert_eq!(observation.direction(), None);
        assert_eq!(observation.radius(), 1);
        assert_eq!(observation.view_radius(), 1);
        assert_eq!(observation.window().to_text(), "#e#\n#b#\n#-#");
        assert_eq!(observation.window().agent(), Ok(Coord::new(1, 1)));
    }

    #[test]
    fn test_parse_with_direction_label() {
        let observation = Observation::parse("LEFT\n1\n###\n#b-\n#--").expect("parse failed");
        assert_eq!(observation.direction(), Some(Direction::Left));
        assert_eq!(observation.window().to_text(), "###\n#b-\n#--");
    }

    #[test]
    fn test_parse_places_agent_at_centre_when_missing() {
        let observation = Observation::parse("2\n###\n#e#\n---").expect("parse failed");
        assert_eq!(observation.window().to_text(), "###\n#b#\n---");

        let observation =
            Observation::parse("2\n#####\n#---#\n#---#\n#---#\n#####").expect("parse failed");
        assert_eq!(observation.window().agent(), Ok(Coord::new(2, 2)));
        assert_eq!(observation.view_radius(), 2);
    }

    #[test]
    fn test_parse_keeps_existing_agent() {
        let observation = Observation::parse("1\n#b#\n#-#\n#-#").expect("parse failed");
        assert_eq!(observation.window().agent(), Ok(Coord::new(0, 1)));
        assert_eq!(observation.window().get(Coord::new(1, 1)).unwrap().value, Cell::Open);
    }

    #[test]
    fn test_new_marks_centre_of_window() {
        let window = Grid::new(3, 5, Cell::Open).expect("grid failed");
        let observation = Observation::new(Some(Direction::Up), 1, window).expect("new failed");
        assert_eq!(observation.window().agent(), Ok(Coord::new(1, 2)));
        assert_eq!(observation.window().to_text(), "-----\n--b--\n-----");
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        assert!(matches!(
            Observation::parse("x\n###\n#b#\n###"),
            Err(MazeError::MalformedObservation(_))
        ));
        assert!(matches!(
            Observation::parse("-1\n###\n#b#\n###"),
            Err(MazeError::MalformedObservation(_))
        ));
        assert!(matches!(
            Observation::parse(""),
            Err(MazeError::MalformedObservation(_))
        ));
        assert!(matches!(
            Observation::parse("UP\n1"),
            Err(MazeError::MalformedObservation(_))
        ));
    }

    #[test]
    fn test_parse_rejects_ragged_window() {
        assert_eq!(
            Observation::parse("1\n###\n#b\n###"),
            Err(MazeError::MalformedGrid {
                row: 1,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_to_text() {
        let observation: Observation = "RIGHT\n1\n###\n#b-\n###".parse().expect("parse failed");
        assert_eq!(observation.to_text(), "1\n###\n#b-\n###");
    }
}
