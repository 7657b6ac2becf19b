//! Per-direction input pacing.
//!
//! Held keys repeat at the frame rate, which would let the runner sprint
//! across the field on fast displays. The pacer normalises that: each
//! direction carries its own cooldown stamp, and a move is granted only once
//! the stamp has expired. Time is passed in explicitly as a monotonic
//! duration so the pacer stays pure and frame-rate independent.

use std::time::Duration;

use grid_rush_core::Direction;

/// Default cooldown between accepted moves in one direction.
pub const DEFAULT_MOVE_DELAY: Duration = Duration::from_millis(200);

/// Rate limiter granting at most one move per direction per cooldown window.
#[derive(Clone, Debug)]
pub struct InputPacer {
    delay: Duration,
    next_allowed: [Duration; 4],
}

impl Default for InputPacer {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_DELAY)
    }
}

impl InputPacer {
    /// Creates a pacer with the provided per-direction cooldown.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_allowed: [Duration::ZERO; 4],
        }
    }

    /// Grants or denies a move in `direction` at monotonic instant `now`.
    ///
    /// A granted move arms the cooldown; denied moves leave it untouched.
    pub fn try_move(&mut self, direction: Direction, now: Duration) -> bool {
        let slot = Self::slot(direction);
        if now < self.next_allowed[slot] {
            return false;
        }
        self.next_allowed[slot] = now.saturating_add(self.delay);
        true
    }

    /// Clears every cooldown, e.g. when a session restarts.
    pub fn reset(&mut self) {
        self.next_allowed = [Duration::ZERO; 4];
    }

    const fn slot(direction: Direction) -> usize {
        match direction {
            Direction::Left => 0,
            Direction::Right => 1,
            Direction::Up => 2,
            Direction::Down => 3,
        }
    }
}
