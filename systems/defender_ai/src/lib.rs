#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic defender steering system.
//!
//! Once per elapsed tick interval the system rolls one weighted action per
//! defender — chase the runner, hold position, wander, or retreat — and
//! emits [`Command::StepDefender`] batches in ascending defender id. The
//! world resolves those steps in arrival order, so the id ordering here is
//! part of the deterministic-resolution contract.

use std::time::Duration;

use grid_rush_core::{CellCoord, Command, Direction, Event, GridGeometry};
use grid_rush_world::query::DefenderView;
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

/// Percentage points added to the chase weight while a defender stands
/// orthogonally adjacent to the runner.
pub const ADJACENCY_BONUS: f32 = 50.0;

/// Configuration parameters required to construct the steering system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    residual: ResidualSplit,
}

impl Config {
    /// Creates a new configuration using the provided seed and the default
    /// residual split.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            residual: ResidualSplit::DEFAULT,
        }
    }

    /// Overrides how the non-chase probability mass is partitioned.
    #[must_use]
    pub const fn with_residual_split(mut self, residual: ResidualSplit) -> Self {
        self.residual = residual;
        self
    }
}

/// How the probability mass left after the chase share is divided.
///
/// The three weights are relative shares, normalised at roll time, so any
/// non-negative values work. A zero sum degrades to holding position.
#[derive(Clone, Copy, Debug)]
pub struct ResidualSplit {
    /// Relative weight of standing still for the tick.
    pub hold: f32,
    /// Relative weight of a uniformly random single-cell wander.
    pub random: f32,
    /// Relative weight of retreating away from the runner.
    pub away: f32,
}

impl ResidualSplit {
    /// Canonical split: mostly wandering, some lurking, rare retreats.
    pub const DEFAULT: Self = Self {
        hold: 25.0,
        random: 65.0,
        away: 10.0,
    };
}

/// Pure system that consumes world events and emits defender step commands.
#[derive(Debug)]
pub struct DefenderAi {
    accumulator: Duration,
    residual: ResidualSplit,
    rng: ChaCha8Rng,
}

impl DefenderAi {
    /// Creates a new steering system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            accumulator: Duration::ZERO,
            residual: config.residual,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and immutable views to emit step commands.
    ///
    /// `toward_chance` is the percentage chance of chasing the runner before
    /// the adjacency bonus; `interval` is the cadence between AI passes. At
    /// most one pass runs per call, and leftover accumulated time is
    /// discarded so a stalled frame cannot trigger a burst of passes against
    /// a stale snapshot.
    pub fn handle(
        &mut self,
        events: &[Event],
        grid: GridGeometry,
        player: CellCoord,
        defenders: &DefenderView,
        toward_chance: f32,
        interval: Duration,
        out: &mut Vec<Command>,
    ) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        if self.accumulator < interval {
            return;
        }
        self.accumulator = Duration::ZERO;

        let toward_chance = toward_chance.clamp(0.0, 100.0);
        for defender in defenders.iter() {
            let destination =
                self.choose_destination(grid, defender.cell, player, toward_chance);
            if destination != defender.cell {
                out.push(Command::StepDefender {
                    defender_id: defender.id,
                    to: destination,
                });
            }
        }
    }

    fn choose_destination(
        &mut self,
        grid: GridGeometry,
        cell: CellCoord,
        player: CellCoord,
        toward_chance: f32,
    ) -> CellCoord {
        let mut chase = toward_chance;
        if cell.is_adjacent_to(player) {
            chase = (chase + ADJACENCY_BONUS).min(100.0);
        }

        let roll = self.rng.gen_range(0.0..100.0);
        if roll < chase {
            return step_toward(cell, player);
        }

        let residual_roll = (roll - chase) / (100.0 - chase);
        let total = self.residual.hold + self.residual.random + self.residual.away;
        if total <= 0.0 {
            return cell;
        }

        let hold_share = self.residual.hold / total;
        let random_share = self.residual.random / total;
        if residual_roll < hold_share {
            cell
        } else if residual_roll < hold_share + random_share {
            let direction = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
            // An out-of-bounds wander wastes the tick, matching the edge
            // behaviour the game balances around.
            grid.step(cell, direction).unwrap_or(cell)
        } else {
            step_away(grid, cell, player)
        }
    }
}

/// Computes the greedy single-cell step that closes the gap to the target on
/// each misaligned axis independently; diagonals are therefore possible.
#[must_use]
pub fn step_toward(cell: CellCoord, target: CellCoord) -> CellCoord {
    CellCoord::new(
        axis_toward(cell.column(), target.column()),
        axis_toward(cell.row(), target.row()),
    )
}

/// Mirror of [`step_toward`]: widens the gap on each misaligned axis, clamped
/// to the grid bounds. Aligned axes stay put.
#[must_use]
pub fn step_away(grid: GridGeometry, cell: CellCoord, target: CellCoord) -> CellCoord {
    CellCoord::new(
        axis_away(cell.column(), target.column(), grid.columns()),
        axis_away(cell.row(), target.row(), grid.rows()),
    )
}

fn axis_toward(from: u32, to: u32) -> u32 {
    use std::cmp::Ordering;
    match from.cmp(&to) {
        Ordering::Less => from.saturating_add(1),
        Ordering::Greater => from.saturating_sub(1),
        Ordering::Equal => from,
    }
}

fn axis_away(from: u32, to: u32, bound: u32) -> u32 {
    use std::cmp::Ordering;
    match from.cmp(&to) {
        Ordering::Less => from.saturating_sub(1),
        Ordering::Greater => from.saturating_add(1).min(bound.saturating_sub(1)),
        Ordering::Equal => from,
    }
}

#[cfg(test)]
mod tests {
    use super::{step_away, step_toward};
    use grid_rush_core::{CellCoord, GridGeometry};

    #[test]
    fn step_toward_moves_both_axes_independently() {
        let from = CellCoord::new(8, 2);
        let target = CellCoord::new(3, 7);
        assert_eq!(step_toward(from, target), CellCoord::new(7, 3));

        let aligned = CellCoord::new(3, 2);
        assert_eq!(step_toward(aligned, target), CellCoord::new(3, 3));
        assert_eq!(step_toward(target, target), target);
    }

    #[test]
    fn step_away_clamps_to_the_grid() {
        let grid = GridGeometry::new(18, 10, 1.0);
        let corner = CellCoord::new(17, 0);
        let target = CellCoord::new(16, 1);
        assert_eq!(step_away(grid, corner, target), corner);

        let interior = CellCoord::new(9, 5);
        let chased_from = CellCoord::new(8, 5);
        assert_eq!(
            step_away(grid, interior, chased_from),
            CellCoord::new(10, 5)
        );
    }
}
