//! Open positions and the FIFO position book.

use std::collections::VecDeque;

/// An open, unmatched buy awaiting a closing trade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub entry_price: f64,
}

/// Open positions in the order they were opened. Closing always takes the
/// oldest one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionBook {
    positions: VecDeque<Position>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, entry_price: f64) {
        self.positions.push_back(Position { entry_price });
    }

    /// Remove and return the oldest open position, or `None` if the book is empty.
    pub fn close_oldest(&mut self) -> Option<Position> {
        self.positions.pop_front()
    }

    pub fn size(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter()
    }
}
