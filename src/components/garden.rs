//! Grid world shared by the gardener components.
//!
//! The gardener robot starts in the top-left cell (0, 0) facing south. Cells
//! are either empty, walls, or planted with a flower kind. The `Sensor`,
//! `Mover`, `Flower` and `Compass` components all act on the same garden.

use super::error::ComponentError;
use serde::{Deserialize, Serialize};

pub const EMPTY: i64 = 0;
pub const ROSE: i64 = 1;
pub const MINT: i64 = 2;
pub const VASILEK: i64 = 3;
const WALL: i64 = -1;

/// Cell coordinates, `x` to the east and `y` to the south.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

/// A flower present before the run starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planting {
    pub x: usize,
    pub y: usize,
    pub kind: i64,
}

/// Garden layout supplied with the simulation parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GardenConfig {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub walls: Vec<Cell>,
    #[serde(default)]
    pub flowers: Vec<Planting>,
}

impl GardenConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn wall(mut self, x: usize, y: usize) -> Self {
        self.walls.push(Cell { x, y });
        self
    }

    pub fn flower(mut self, x: usize, y: usize, kind: i64) -> Self {
        self.flowers.push(Planting { x, y, kind });
        self
    }
}

/// Compass direction. The numeric codes are what guards compare against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    South,
    North,
    West,
    East,
}

impl Orientation {
    pub fn code(self) -> i64 {
        match self {
            Self::South => 0,
            Self::North => 1,
            Self::West => 2,
            Self::East => 3,
        }
    }

    /// Counter-clockwise quarter turn.
    pub fn left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// Clockwise quarter turn.
    pub fn right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    pub fn back(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    fn delta(self) -> (i64, i64) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::West => (-1, 0),
            Self::East => (1, 0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Garden {
    width: usize,
    height: usize,
    field: Vec<i64>,
    x: usize,
    y: usize,
    orientation: Orientation,
    wall_left: i64,
    wall_right: i64,
    wall_straight: i64,
    wall_back: i64,
}

impl Garden {
    pub fn new(config: &GardenConfig) -> Result<Self, ComponentError> {
        if config.width == 0 || config.height == 0 {
            return Err(ComponentError::InvalidGarden(format!(
                "field {}x{} has no cells",
                config.width, config.height
            )));
        }
        let mut garden = Self {
            width: config.width,
            height: config.height,
            field: vec![EMPTY; config.width * config.height],
            x: 0,
            y: 0,
            orientation: Orientation::South,
            wall_left: 0,
            wall_right: 0,
            wall_straight: 0,
            wall_back: 0,
        };

        for cell in &config.walls {
            if (cell.x, cell.y) == (0, 0) {
                return Err(ComponentError::InvalidGarden(
                    "start cell (0, 0) cannot be a wall".to_string(),
                ));
            }
            let index = garden.index_of(cell.x, cell.y)?;
            garden.field[index] = WALL;
        }
        for planting in &config.flowers {
            if !(EMPTY..=VASILEK).contains(&planting.kind) {
                return Err(ComponentError::InvalidGarden(format!(
                    "unknown flower kind {}",
                    planting.kind
                )));
            }
            let index = garden.index_of(planting.x, planting.y)?;
            if garden.field[index] == WALL {
                return Err(ComponentError::InvalidGarden(format!(
                    "flower planted in wall ({}, {})",
                    planting.x, planting.y
                )));
            }
            garden.field[index] = planting.kind;
        }
        Ok(garden)
    }

    fn index_of(&self, x: usize, y: usize) -> Result<usize, ComponentError> {
        if x < self.width && y < self.height {
            Ok(y * self.width + x)
        } else {
            Err(ComponentError::InvalidGarden(format!(
                "cell ({x}, {y}) outside {}x{} field",
                self.width, self.height
            )))
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Cell content: `-1` wall, `0` empty, `1..=3` flower kind.
    pub fn cell(&self, x: usize, y: usize) -> Option<i64> {
        self.index_of(x, y).ok().map(|index| self.field[index])
    }

    pub fn current_flower(&self) -> i64 {
        self.field[self.y * self.width + self.x]
    }

    fn neighbor(&self, direction: Orientation) -> Option<(usize, usize)> {
        let (dx, dy) = direction.delta();
        let nx = usize::try_from(self.x as i64 + dx).ok()?;
        let ny = usize::try_from(self.y as i64 + dy).ok()?;
        (nx < self.width && ny < self.height).then_some((nx, ny))
    }

    /// The field border counts as a wall.
    pub fn wall_in(&self, direction: Orientation) -> bool {
        match self.neighbor(direction) {
            Some((nx, ny)) => self.field[ny * self.width + nx] == WALL,
            None => true,
        }
    }

    /// Refresh the cached wall readings relative to the current heading.
    pub fn update_walls(&mut self) {
        let heading = self.orientation;
        self.wall_left = i64::from(self.wall_in(heading.left()));
        self.wall_right = i64::from(self.wall_in(heading.right()));
        self.wall_straight = i64::from(self.wall_in(heading));
        self.wall_back = i64::from(self.wall_in(heading.back()));
    }

    pub fn wall_left(&self) -> i64 {
        self.wall_left
    }

    pub fn wall_right(&self) -> i64 {
        self.wall_right
    }

    pub fn wall_straight(&self) -> i64 {
        self.wall_straight
    }

    pub fn wall_back(&self) -> i64 {
        self.wall_back
    }

    fn step(&mut self, direction: Orientation) -> Result<(), ComponentError> {
        let (nx, ny) = self
            .neighbor(direction)
            .ok_or(ComponentError::Crash("out of bounds!"))?;
        if self.field[ny * self.width + nx] == WALL {
            return Err(ComponentError::Crash("hit a wall!"));
        }
        self.x = nx;
        self.y = ny;
        Ok(())
    }

    pub fn move_forward(&mut self) -> Result<(), ComponentError> {
        self.step(self.orientation)
    }

    pub fn move_backward(&mut self) -> Result<(), ComponentError> {
        self.step(self.orientation.back())
    }

    pub fn turn_left(&mut self) {
        self.orientation = self.orientation.left();
    }

    pub fn turn_right(&mut self) {
        self.orientation = self.orientation.right();
    }

    /// Plant `kind` in the current cell. Only `EMPTY..=VASILEK` are
    /// flower kinds.
    pub fn plant(&mut self, kind: i64) -> Result<(), ComponentError> {
        if !(EMPTY..=VASILEK).contains(&kind) {
            return Err(ComponentError::BadArgument {
                method: "plant".to_string(),
                value: kind.to_string(),
                expected: "a flower kind from 0 to 3",
            });
        }
        let index = self.y * self.width + self.x;
        self.field[index] = kind;
        Ok(())
    }
}
