// Tank battle wire types
// Mirrors the game server's player service: arguments, state, orders

use serde::{Deserialize, Serialize};

/// Board cell coordinate. `x` is the row, `y` is the column.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Cell reached by travelling `distance` cells in `dir`
    pub fn offset(&self, dir: Direction, distance: i32) -> Position {
        let (dx, dy) = dir.delta();
        Position {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }

    pub fn manhattan(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// The four facings a tank or shell can have
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all directions in scan order
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Row/column delta of one step. Up decreases the row, Right increases the column.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Direction of the single step from `from` to an orthogonally adjacent `to`.
    /// Same row means a horizontal step, otherwise vertical.
    pub fn between(from: &Position, to: &Position) -> Direction {
        if to.x == from.x {
            if to.y > from.y {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if to.x > from.x {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    pub fn parse(s: &str) -> Result<Direction, String> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

/// Game constants uploaded once per game
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GameArguments {
    pub tank_speed: i32,
    pub shell_speed: i32,
    #[serde(rename = "tankHP")]
    pub tank_hp: i32,
    pub tank_score: i32,
    pub flag_score: i32,
    pub max_round: i32,
    pub round_timeout_in_ms: i32,
}

impl GameArguments {
    /// Extra cells a shell covers per tank move
    pub fn speed_offset(&self) -> i32 {
        self.shell_speed - self.tank_speed
    }
}

/// A live tank, own or enemy
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tank {
    pub id: i32,
    pub pos: Position,
    pub dir: Direction,
    pub hp: i32,
}

/// A live shell in flight
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shell {
    pub id: i32,
    pub pos: Position,
    pub dir: Direction,
}

/// Battlefield snapshot pushed by the server every round
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub tanks: Vec<Tank>,
    #[serde(default)]
    pub shells: Vec<Shell>,
    #[serde(default)]
    pub your_flag_no: i32,
    #[serde(default)]
    pub enemy_flag_no: i32,
    #[serde(default)]
    pub flag_pos: Option<Position>,
}

impl GameState {
    pub fn tank(&self, id: i32) -> Option<&Tank> {
        self.tanks.iter().find(|t| t.id == id)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderKind {
    #[serde(rename = "move")]
    Move,
    #[serde(rename = "turnTo")]
    TurnTo,
    #[serde(rename = "fire")]
    Fire,
}

impl OrderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Move => "move",
            OrderKind::TurnTo => "turnTo",
            OrderKind::Fire => "fire",
        }
    }
}

/// One command for one of our tanks
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub tank_id: i32,
    pub order: OrderKind,
    pub dir: Direction,
}

impl Order {
    pub fn move_to(tank_id: i32, dir: Direction) -> Self {
        Order { tank_id, order: OrderKind::Move, dir }
    }

    pub fn turn_to(tank_id: i32, dir: Direction) -> Self {
        Order { tank_id, order: OrderKind::TurnTo, dir }
    }

    pub fn fire(tank_id: i32, dir: Direction) -> Self {
        Order { tank_id, order: OrderKind::Fire, dir }
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.tank_id, self.order.as_str(), self.dir.as_str())
    }
}
