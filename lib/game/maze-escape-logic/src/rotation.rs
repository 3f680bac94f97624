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

//! Turning grids between the four orientations.
//!
//! Rotating by a direction re-expresses a grid as seen by someone facing that direction, so that
//! their facing becomes "up":
//!
//! ```text
//!  123      RIGHT     369      LEFT     741      DOWN     987
//!  456   --------->   258   ------->   852   ------->    654
//!  789                147              963               321
//! ```
//!
//! UP leaves the grid alone. RIGHT and LEFT swap height and width. Undoing a rotation swaps
//! RIGHT and LEFT; UP and DOWN are their own inverses. Only positions move: characters are
//! carried as they are, so arrow glyphs keep pointing the way they were drawn.

use crate::{Direction, MazeError};

/// Rotate a row-major buffer of `height` rows and `width` columns. Returns the new buffer with
/// its height and width.
pub(crate) fn rotate_buffer<T: Copy>(
    cells: &[T],
    height: usize,
    width: usize,
    direction: Direction,
    undo: bool,
) -> (Vec<T>, usize, usize) {
    let direction = match (direction, undo) {
        (Direction::Right, true) => Direction::Left,
        (Direction::Left, true) => Direction::Right,
        (direction, _) => direction,
    };
    let at = |row: usize, col: usize| cells[row * width + col];

    match direction {
        Direction::Up => (cells.to_vec(), height, width),
        Direction::Down => {
            let rotated = (0..height)
                .flat_map(|i| (0..width).map(move |j| (i, j)))
                .map(|(i, j)| at(height - 1 - i, width - 1 - j))
                .collect();
            (rotated, height, width)
        }
        Direction::Right => {
            let rotated = (0..width)
                .flat_map(|i| (0..height).map(move |j| (i, j)))
                .map(|(i, j)| at(j, width - 1 - i))
                .collect();
            (rotated, width, height)
        }
        Direction::Left => {
            let rotated = (0..width)
                .flat_map(|i| (0..height).map(move |j| (i, j)))
                .map(|(i, j)| at(height - 1 - j, i))
                .collect();
            (rotated, width, height)
        }
    }
}

/// Rotate grid text. Any characters are accepted; rows must be of equal length and blank lines
/// are skipped. The result has no trailing newline.
pub fn rotate(text: &str, direction: Direction, undo: bool) -> Result<String, MazeError> {
    let rows: Vec<Vec<char>> = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(|line| line.chars().collect())
        .collect();
    let width = rows.first().map(Vec::len).ok_or(MazeError::EmptyGrid)?;
    if let Some((row, found)) = rows
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|(_, len)| *len != width)
    {
        return Err(MazeError::MalformedGrid {
            row,
            expected: width,
            found,
        });
    }

    let cells: Vec<char> = rows.into_iter().flatten().collect();
    let (rotated, _, width) = rotate_buffer(&cells, cells.len() / width, width, direction, undo);

    Ok(rotated
        .chunks(width)
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grid;
    use proptest::prelude::*;

    const SQUARE: &str = "123\n456\n789";
    const RECTANGLE: &str = "abcd\nefgh\nijkl";

    #[test]
    fn test_rotate_up_is_identity() {
        assert_eq!(rotate(SQUARE, Direction::Up, false), Ok(SQUARE.to_string()));
        assert_eq!(rotate(SQUARE, Direction::Up, true), Ok(SQUARE.to_string()));
    }

    #[test]
    fn test_rotate_square() {
        assert_eq!(
            rotate(SQUARE, Direction::Right, false),
            Ok("369\n258\n147".to_string())
        );
        assert_eq!(
            rotate(SQUARE, Direction::Left, false),
            Ok("741\n852\n963".to_string())
        );
        assert_eq!(
            rotate(SQUARE, Direction::Down, false),
            Ok("987\n654\n321".to_string())
        );
    }

    #[test]
    fn test_rotate_undo_swaps_left_and_right() {
        assert_eq!(
            rotate(SQUARE, Direction::Right, true),
            rotate(SQUARE, Direction::Left, false)
        );
        assert_eq!(
            rotate(SQUARE, Direction::Left, true),
            rotate(SQUARE, Direction::Right, false)
        );
        assert_eq!(
            rotate(SQUARE, Direction::Down, true),
            rotate(SQUARE, Direction::Down, false)
        );
    }

    #[test]
    fn test_rotate_rectangle() {
        assert_eq!(
            rotate(RECTANGLE, Direction::Right, false),
            Ok("dhl\ncgk\nbfj\naei".to_string())
        );
        assert_eq!(
            rotate(RECTANGLE, Direction::Left, false),
            Ok("iea\njfb\nkgc\nlhd".to_string())
        );
        assert_eq!(
            rotate(RECTANGLE, Direction::Down, false),
            Ok("lkji\nhgfe\ndcba".to_string())
        );
    }

    #[test]
    fn test_rotate_single_row() {
        assert_eq!(
            rotate("#b-", Direction::Right, false),
            Ok("-\nb\n#".to_string())
        );
    }

    #[test]
    fn test_rotate_keeps_glyphs() {
        assert_eq!(
            rotate("^>\nv<", Direction::Right, false),
            Ok("><\n^v".to_string())
        );
    }

    #[test]
    fn test_rotate_malformed_text() {
        assert_eq!(
            rotate("123\n45", Direction::Right, false),
            Err(MazeError::MalformedGrid {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(rotate("", Direction::Up, false), Err(MazeError::EmptyGrid));
    }

    #[test]
    fn test_grid_rotation_matches_text_rotation() {
        let text = "#--#\n#-b#\ne--#";
        let grid = Grid::from_text(text).expect("parse failed");
        for direction in Direction::ALL {
            for undo in [false, true] {
                assert_eq!(
                    grid.rotated(direction, undo).to_text(),
                    rotate(text, direction, undo).expect("rotate failed")
                );
            }
        }
    }

    fn grid_text() -> impl Strategy<Value = String> {
        (1..7usize, 1..7usize).prop_flat_map(|(height, width)| {
            prop::collection::vec(
                prop::collection::vec(
                    prop_oneof![
                        Just('#'),
                        Just('-'),
                        Just('e'),
                        Just('o'),
                        Just('b'),
                        Just('^')
                    ],
                    width,
                ),
                height,
            )
            .prop_map(|rows| {
                rows.into_iter()
                    .map(|row| row.into_iter().collect::<String>())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        })
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Right),
            Just(Direction::Down),
            Just(Direction::Left),
        ]
    }

    proptest! {
        #[test]
        fn test_rotate_then_undo_is_identity(text in grid_text(), direction in direction()) {
            let rotated = rotate(&text, direction, false).expect("rotate failed");
            let restored = rotate(&rotated, direction, true).expect("undo failed");
            assert_eq!(restored, text);
        }

        #[test]
        fn test_rotate_preserves_characters(text in grid_text(), direction in direction()) {
            let rotated = rotate(&text, direction, false).expect("rotate failed");
            let mut before: Vec<char> = text.chars().filter(|c| *c != '\n').collect();
            let mut after: Vec<char> = rotated.chars().filter(|c| *c != '\n').collect();
            before.sort_unstable();
            after.sort_unstable();
            assert_eq!(before, after);
        }

        #[test]
        fn test_rotate_four_quarter_turns_is_identity(text in grid_text()) {
            let mut rotated = text.clone();
            for _ in 0..4 {
                rotated = rotate(&rotated, Direction::Right, false).expect("rotate failed");
            }
            assert_eq!(rotated, text);
        }
    }
}
