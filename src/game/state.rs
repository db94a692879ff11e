use log::debug;

use super::direction::Direction;

/// A tile on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Top-left pixel corner of this tile for a surface with square cells of
    /// `cell_size` pixels.
    pub fn to_pixels(&self, cell_size: f64) -> (f64, f64) {
        (self.x as f64 * cell_size, self.y as f64 * cell_size)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: Vec<Position>,
}

impl Snake {
    /// Lay out a straight snake of `length` cells whose head is at `head`,
    /// with the body trailing behind the direction of travel.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = Vec::with_capacity(length);
        body.push(head);

        let (dx, dy) = direction.delta();
        for i in 1..length {
            let prev = body[i - 1];
            body.push(Position::new(prev.x - dx, prev.y - dy));
        }

        Self { body }
    }

    /// Build a snake from explicit cells, head first.
    pub fn from_cells(cells: Vec<Position>) -> Self {
        debug_assert!(!cells.is_empty(), "a snake needs at least a head");
        Self { body: cells }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn cells(&self) -> &[Position] {
        &self.body
    }

    /// True if any segment, head and tail included, sits on `pos`.
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Put a new head in front. Drops the tail unless `grow` is set.
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Everything one game owns. Recreated on every start.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    /// Velocity applied on the tick that is running now
    pub velocity: Direction,
    /// Velocity requested by input, picked up at the start of the next tick
    pub pending_velocity: Direction,
    pub score: u32,
    pub tile_count: usize,
}

impl GameState {
    pub fn new(snake: Snake, food: Position, velocity: Direction, tile_count: usize) -> Self {
        Self {
            snake,
            food,
            velocity,
            pending_velocity: velocity,
            score: 0,
            tile_count,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        let n = self.tile_count as i32;
        (0..n).contains(&pos.x) && (0..n).contains(&pos.y)
    }

    /// Record a turn request for the next tick.
    ///
    /// The request is compared against the *current* velocity, not the pending
    /// one, so a reversal into the neck can never be applied within a single
    /// tick. Returns whether the request was accepted.
    pub fn request_turn(&mut self, direction: Direction) -> bool {
        if self.velocity.is_opposite(direction) {
            debug!("rejected turn {:?} while moving {:?}", direction, self.velocity);
            return false;
        }

        self.pending_velocity = direction;
        true
    }
}
