use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::Millis;
use super::action::Direction;
use super::effects::{Effect, EffectRegistry};
use super::grid::Grid;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    pub body: VecDeque<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction.
    ///
    /// Segments are laid out behind the head, wrapped onto the grid.
    pub fn new(head: Position, direction: Direction, length: usize, grid: &Grid) -> Self {
        let mut body = VecDeque::with_capacity(length);
        body.push_back(head);

        let (dx, dy) = direction.delta();
        let mut prev = head;
        for _ in 1..length {
            prev = grid.wrap(prev.moved_by(-dx, -dy));
            body.push_back(prev);
        }

        Self { body, direction }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments<I>(segments: I, direction: Direction) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        Self {
            body: segments.into_iter().collect(),
            direction,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Check whether a head moving onto `pos` would hit the body.
    ///
    /// When `tail_vacates` is set the last segment is skipped, because it
    /// leaves its cell in the same tick the head arrives.
    pub fn would_collide(&self, pos: Position, tail_vacates: bool) -> bool {
        let len = if tail_vacates {
            self.body.len().saturating_sub(1)
        } else {
            self.body.len()
        };
        self.body.iter().take(len).any(|&segment| segment == pos)
    }

    pub fn push_head(&mut self, pos: Position) {
        self.body.push_front(pos);
    }

    pub fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop_back()
    }

    /// Remove up to `cut` tail segments without going below `min_len`.
    ///
    /// Returns the number of segments removed.
    pub fn shrink(&mut self, cut: usize, min_len: usize) -> usize {
        let removed = cut.min(self.body.len().saturating_sub(min_len));
        for _ in 0..removed {
            self.body.pop_back();
        }
        removed
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// A pickup lying on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: Effect,
    pub position: Position,
    pub expires_at: Millis,
}

impl PowerUp {
    pub fn is_expired(&self, now: Millis) -> bool {
        now > self.expires_at
    }
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    NotStarted,
    Running,
    Paused,
    Ended,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub grid: Grid,
    pub snake: Snake,
    pub food: Position,
    pub power_ups: Vec<PowerUp>,
    pub effects: EffectRegistry,
    pub score: u32,
    pub ticks: u32,
    pub status: SessionStatus,
}

impl GameState {
    /// Create a new game state with no power-ups and no active effects
    pub fn new(snake: Snake, food: Position, grid: Grid) -> Self {
        Self {
            grid,
            snake,
            food,
            power_ups: Vec::new(),
            effects: EffectRegistry::new(),
            score: 0,
            ticks: 0,
            status: SessionStatus::NotStarted,
        }
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    pub fn power_up_at(&self, pos: Position) -> Option<&PowerUp> {
        self.power_ups.iter().find(|p| p.position == pos)
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    pub fn is_over(&self) -> bool {
        self.status == SessionStatus::Ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_by(0, 1), Position::new(5, 6));
        assert_eq!(pos.moved_by(0, -1), Position::new(5, 4));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_snake_creation() {
        let grid = Grid::new(10, 10);
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 4, &grid);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.body[1], Position::new(4, 5));
        assert_eq!(snake.body[2], Position::new(3, 5));
        assert_eq!(snake.body.back(), Some(&Position::new(2, 5)));
    }

    #[test]
    fn test_snake_creation_wraps_behind_edge() {
        let grid = Grid::new(10, 10);
        let snake = Snake::new(Position::new(1, 0), Direction::Right, 3, &grid);
        assert_eq!(snake.body[2], Position::new(9, 0));
    }

    #[test]
    fn test_collision_ignores_vacating_tail() {
        let grid = Grid::new(10, 10);
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 4, &grid);
        let tail = Position::new(2, 5);

        assert!(snake.would_collide(Position::new(4, 5), true));
        assert!(!snake.would_collide(tail, true));
        assert!(snake.would_collide(tail, false));
        assert!(!snake.would_collide(Position::new(8, 8), false));
    }

    #[test]
    fn test_shrink_respects_minimum() {
        let grid = Grid::new(20, 20);

        let mut snake = Snake::new(Position::new(10, 5), Direction::Right, 5, &grid);
        assert_eq!(snake.shrink(4, 3), 2);
        assert_eq!(snake.len(), 3);

        let mut snake = Snake::new(Position::new(10, 5), Direction::Right, 9, &grid);
        assert_eq!(snake.shrink(4, 3), 4);
        assert_eq!(snake.len(), 5);

        let mut snake = Snake::new(Position::new(10, 5), Direction::Right, 3, &grid);
        assert_eq!(snake.shrink(4, 3), 0);
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn test_power_up_expiry_is_strict() {
        let power_up = PowerUp {
            kind: Effect::Ghost,
            position: Position::new(1, 1),
            expires_at: 500,
        };
        assert!(!power_up.is_expired(500));
        assert!(power_up.is_expired(501));
    }

    #[test]
    fn test_occupancy_queries() {
        let grid = Grid::new(10, 10);
        let mut state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3, &grid),
            Position::new(8, 8),
            grid,
        );
        state.power_ups.push(PowerUp {
            kind: Effect::Slow,
            position: Position::new(1, 1),
            expires_at: 100,
        });

        assert!(state.is_occupied_by_snake(Position::new(4, 5)));
        assert!(!state.is_occupied_by_snake(Position::new(8, 8)));
        assert_eq!(
            state.power_up_at(Position::new(1, 1)).map(|p| p.kind),
            Some(Effect::Slow)
        );
        assert_eq!(state.status, SessionStatus::NotStarted);
    }
}
