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

//! The maze grid and the small value types around it.

use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::rotation::rotate_buffer;
use crate::MazeError;

/// A (row, column) position. Rows grow downwards and columns grow to the right. Signed, so that
/// stepping off the edge of a grid gives a coordinate that is invalid rather than one that wraps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Coord {
    /// Row, 0 at the top.
    pub row: i32,

    /// Column, 0 at the left.
    pub col: i32,
}

impl Coord {
    /// Create a coordinate.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighbouring coordinate in a direction.
    pub fn step(self, direction: Direction) -> Self {
        self + direction.delta()
    }

    /// Number of single steps between two coordinates, ignoring walls.
    pub fn manhattan_distance(self, other: Coord) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four moves. Declared in exploration priority order, which is also clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Towards row 0.
    Up,

    /// Towards the last column.
    Right,

    /// Towards the last row.
    Down,

    /// Towards column 0.
    Left,
}

impl Direction {
    /// All directions in exploration priority order: UP, RIGHT, DOWN, LEFT.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit step for this direction.
    pub const fn delta(self) -> Coord {
        match self {
            Direction::Up => Coord::new(-1, 0),
            Direction::Right => Coord::new(0, 1),
            Direction::Down => Coord::new(1, 0),
            Direction::Left => Coord::new(0, -1),
        }
    }

    /// The token printed for this move.
    pub const fn label(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Right => "RIGHT",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
        }
    }

    /// The direction pointing the other way.
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// Arrow glyph used when marking a direction on a map.
    pub const fn glyph(self) -> char {
        match self {
            Direction::Up => '^',
            Direction::Right => '>',
            Direction::Down => 'v',
            Direction::Left => '<',
        }
    }

    /// Inverse of [`Direction::glyph`].
    pub const fn from_glyph(c: char) -> Option<Self> {
        match c {
            '^' => Some(Direction::Up),
            '>' => Some(Direction::Right),
            'v' => Some(Direction::Down),
            '<' => Some(Direction::Left),
            _ => None,
        }
    }

    /// Compose a move made relative to this facing into an absolute direction. Facing RIGHT, a
    /// relative UP is RIGHT and a relative RIGHT is DOWN.
    pub fn turn(self, relative: Direction) -> Self {
        Direction::ALL[(self.index() + relative.index()) % 4]
    }

    fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Direction {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "UP" => Ok(Direction::Up),
            "RIGHT" => Ok(Direction::Right),
            "DOWN" => Ok(Direction::Down),
            "LEFT" => Ok(Direction::Left),
            other => Err(MazeError::UnknownDirection(other.to_string())),
        }
    }
}

/// The value of one square of the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// `#`
    Wall,

    /// `-`
    Open,

    /// `e`
    Exit,

    /// `o`, not seen yet.
    Unknown,

    /// `b`
    Agent,

    /// Reached by a search, holding the move that reached it. Only appears on search forks and
    /// renders as `.`.
    Visited(Direction),

    /// An arrow drawn on a scratch map: `^`, `>`, `v`, `<`.
    DirectionMark(Direction),
}

impl Cell {
    /// Anything but [`Cell::Unknown`].
    pub fn is_known(self) -> bool {
        self != Cell::Unknown
    }

    /// Squares the bot can stand on.
    pub fn is_traversable(self) -> bool {
        matches!(self, Cell::Open | Cell::Exit | Cell::Agent)
    }
}

impl TryFrom<char> for Cell {
    type Error = MazeError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '#' => Ok(Cell::Wall),
            '-' => Ok(Cell::Open),
            'e' => Ok(Cell::Exit),
            'o' => Ok(Cell::Unknown),
            'b' => Ok(Cell::Agent),
            other => Direction::from_glyph(other)
                .map(Cell::DirectionMark)
                .ok_or(MazeError::UnknownCell(other)),
        }
    }
}

impl From<Cell> for char {
    fn from(cell: Cell) -> char {
        match cell {
            Cell::Wall => '#',
            Cell::Open => '-',
            Cell::Exit => 'e',
            Cell::Unknown => 'o',
            Cell::Agent => 'b',
            Cell::Visited(_) => '.',
            Cell::DirectionMark(direction) => direction.glyph(),
        }
    }
}

/// A cell value together with where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// Position in the grid.
    pub coord: Coord,

    /// Value at that position.
    pub value: Cell,
}

/// Height and width of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Number of rows.
    pub height: usize,

    /// Number of columns.
    pub width: usize,
}

/// What to look for in a grid: the first cell holding a value, or a specific position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// First cell with this value, in row-major order.
    Value(Cell),

    /// The cell at this position.
    Coord(Coord),
}

impl From<Cell> for Target {
    fn from(value: Cell) -> Self {
        Target::Value(value)
    }
}

impl From<Coord> for Target {
    fn from(coord: Coord) -> Self {
        Target::Coord(coord)
    }
}

/// Where a move goes: one step in a direction, or straight to a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// One step from the start.
    Step(Direction),

    /// An absolute position.
    Coord(Coord),
}

impl From<Direction> for Destination {
    fn from(direction: Direction) -> Self {
        Destination::Step(direction)
    }
}

impl From<Coord> for Destination {
    fn from(coord: Coord) -> Self {
        Destination::Coord(coord)
    }
}

/// Maze grid, stored row-major. Every row has the same width; a cell's coordinate is its position
/// in the buffer, so coordinates stay correct through padding and rotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    cells: Vec<Cell>,
    height: usize,
    width: usize,
}

impl Grid {
    /// Create a grid filled with one value. A grid always has at least one cell.
    pub fn new(height: usize, width: usize, fill: Cell) -> Result<Self, MazeError> {
        if height == 0 || width == 0 {
            return Err(MazeError::EmptyGrid);
        }
        Ok(Self {
            cells: vec![fill; height * width],
            height,
            width,
        })
    }

    /// Parse a block of text, one row per line. Blank lines are skipped.
    pub fn from_text(text: &str) -> Result<Self, MazeError> {
        let rows: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .collect();
        let width = match rows.first() {
            Some(first) => first.chars().count(),
            None => return Err(MazeError::EmptyGrid),
        };

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(MazeError::MalformedGrid {
                    row,
                    expected: width,
                    found,
                });
            }
            for c in line.chars() {
                cells.push(Cell::try_from(c)?);
            }
        }

        Ok(Self {
            cells,
            height: rows.len(),
            width,
        })
    }

    pub(crate) fn from_parts(cells: Vec<Cell>, height: usize, width: usize) -> Self {
        debug_assert_eq!(cells.len(), height * width);
        Self {
            cells,
            height,
            width,
        }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height and width.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            height: self.height,
            width: self.width,
        }
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if self.is_valid(coord) {
            Some(coord.row as usize * self.width + coord.col as usize)
        } else {
            None
        }
    }

    fn coord_of(&self, index: usize) -> Coord {
        Coord::new((index / self.width) as i32, (index % self.width) as i32)
    }

    /// Bounds check only.
    pub fn is_valid(&self, coord: Coord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && (coord.row as usize) < self.height
            && (coord.col as usize) < self.width
    }

    /// The cell at a position.
    pub fn get(&self, coord: Coord) -> Result<GridCell, MazeError> {
        let index = self
            .index(coord)
            .ok_or_else(|| MazeError::InvalidTarget(format!("{} is outside the grid", coord)))?;
        Ok(GridCell {
            coord,
            value: self.cells[index],
        })
    }

    /// Find a cell by value (first match in row-major order) or by position. Looking up a
    /// position outside the grid is an error; a value that is nowhere in the grid is `None`.
    pub fn find(&self, target: impl Into<Target>) -> Result<Option<GridCell>, MazeError> {
        match target.into() {
            Target::Coord(coord) => self.get(coord).map(Some),
            Target::Value(value) => Ok(self.cells().find(|cell| cell.value == value)),
        }
    }

    /// Position of the bot marker.
    pub fn agent(&self) -> Result<Coord, MazeError> {
        self.find(Cell::Agent)?
            .map(|cell| cell.coord)
            .ok_or(MazeError::MissingAgent)
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, value)| GridCell {
                coord: self.coord_of(index),
                value: *value,
            })
    }

    /// Cells matching a predicate, lazily, in row-major order.
    pub fn filter<'a, P>(&'a self, mut predicate: P) -> impl Iterator<Item = GridCell> + 'a
    where
        P: FnMut(&GridCell) -> bool + 'a,
    {
        self.cells().filter(move |cell| predicate(cell))
    }

    /// Overwrite the cell at a position.
    pub fn set(&mut self, coord: Coord, value: Cell) -> Result<(), MazeError> {
        let index = self
            .index(coord)
            .ok_or_else(|| MazeError::InvalidTarget(format!("{} is outside the grid", coord)))?;
        self.cells[index] = value;
        Ok(())
    }

    /// Deep copy. Changes to the fork never show up in this grid.
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// Move whatever is at `start` to the destination, leaving `trail` behind. Moving into a wall
    /// or off the grid fails and leaves the grid untouched. Returns where the value ended up.
    pub fn move_cell(
        &mut self,
        start: Coord,
        destination: impl Into<Destination>,
        trail: Cell,
    ) -> Result<Coord, MazeError> {
        let moving = self.get(start)?;
        let end = match destination.into() {
            Destination::Step(direction) => start.step(direction),
            Destination::Coord(coord) => coord,
        };
        let end_cell = self.get(end)?;
        if end_cell.value == Cell::Wall {
            return Err(MazeError::InvalidTarget(format!(
                "cannot move from {} into the wall at {}",
                start, end
            )));
        }
        self.set(end, moving.value)?;
        self.set(start, trail)?;
        Ok(end)
    }

    /// Whether the square next to `from` is open floor or the exit.
    pub fn can_step(&self, from: Coord, direction: Direction) -> bool {
        self.get(from.step(direction))
            .map_or(false, |cell| matches!(cell.value, Cell::Open | Cell::Exit))
    }

    /// Replace every `from` with `to`, returning how many cells changed.
    pub fn replace(&mut self, from: Cell, to: Cell) -> usize {
        let mut replaced = 0;
        for cell in self.cells.iter_mut().filter(|cell| **cell == from) {
            *cell = to;
            replaced += 1;
        }
        replaced
    }

    /// The square of side `2 * radius + 1` centred on `centre`. Squares beyond the edge of the
    /// grid read as `outside`.
    pub fn window(&self, centre: Coord, radius: usize, outside: Cell) -> Grid {
        let side = 2 * radius + 1;
        let radius = radius as i32;
        let cells = (-radius..=radius)
            .flat_map(|row| (-radius..=radius).map(move |col| Coord::new(row, col)))
            .map(|delta| {
                self.get(centre + delta)
                    .map_or(outside, |cell| cell.value)
            })
            .collect();
        Self::from_parts(cells, side, side)
    }

    /// Grow the grid by one row or column of [`Cell::Unknown`] on one side.
    pub fn pad(&mut self, direction: Direction) {
        let (height, width) = match direction {
            Direction::Up | Direction::Down => (self.height + 1, self.width),
            Direction::Left | Direction::Right => (self.height, self.width + 1),
        };
        let mut cells = Vec::with_capacity(height * width);
        match direction {
            Direction::Up => {
                cells.extend(std::iter::repeat(Cell::Unknown).take(width));
                cells.extend_from_slice(&self.cells);
            }
            Direction::Down => {
                cells.extend_from_slice(&self.cells);
                cells.extend(std::iter::repeat(Cell::Unknown).take(width));
            }
            Direction::Left => {
                for row in self.cells.chunks(self.width) {
                    cells.push(Cell::Unknown);
                    cells.extend_from_slice(row);
                }
            }
            Direction::Right => {
                for row in self.cells.chunks(self.width) {
                    cells.extend_from_slice(row);
                    cells.push(Cell::Unknown);
                }
            }
        }
        *self = Self::from_parts(cells, height, width);
    }

    /// Rotated copy; see [`crate::rotation`] for what each direction means.
    pub fn rotated(&self, direction: Direction, undo: bool) -> Self {
        let (cells, height, width) =
            rotate_buffer(&self.cells, self.height, self.width, direction, undo);
        Self::from_parts(cells, height, width)
    }

    /// Number of cells that are not [`Cell::Unknown`].
    pub fn count_known(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_known()).count()
    }

    /// Rows joined by line breaks, no trailing newline.
    pub fn to_text(&self) -> String {
        let mut s = String::with_capacity((self.width + 1) * self.height);
        for (row, chunk) in self.cells.chunks(self.width.max(1)).enumerate() {
            if row > 0 {
                s.push('\n');
            }
            s.extend(chunk.iter().map(|cell| char::from(*cell)));
        }
        s
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for Grid {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grid::from_text(s)
    }
}
