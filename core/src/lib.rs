#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Rush engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Grid Rush.";

/// Describes the lifecycle phase of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The simulation is live: ticks advance defenders and input moves the runner.
    Playing,
    /// The simulation is suspended; ticks and input are ignored until resume.
    Paused,
    /// The runner is out of lives; only a restart returns to [`Phase::Playing`].
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the world's cell grid using the provided dimensions.
    ConfigureGrid {
        /// Number of cell columns laid out in the grid.
        columns: u32,
        /// Number of cell rows laid out in the grid.
        rows: u32,
        /// Length of each square cell measured in render units.
        cell_length: f32,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the runner advance a single cell in the given direction.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that a defender relocate to the provided destination cell.
    StepDefender {
        /// Identifier of the defender attempting to move.
        defender_id: DefenderId,
        /// Destination cell chosen by the defender AI.
        to: CellCoord,
    },
    /// Updates the number of defenders the world maintains on the field.
    SetDefenderTarget {
        /// Desired roster size after the change.
        count: u32,
    },
    /// Suspends the simulation until a matching [`Command::Resume`].
    Pause,
    /// Resumes a previously paused simulation.
    Resume,
    /// Reinitialises the session from game over back to the initial state.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the runner moved between two cells.
    PlayerMoved {
        /// Cell the runner occupied before moving.
        from: CellCoord,
        /// Cell the runner occupies after completing the move.
        to: CellCoord,
    },
    /// Announces that the runner crossed into the goal column.
    GoalReached {
        /// Score total after awarding the crossing.
        score: u32,
    },
    /// Reports that a defender occupied the runner's cell.
    PlayerCaptured {
        /// Identifier of the defender that made the capture.
        defender_id: DefenderId,
        /// Lives remaining after the capture was resolved.
        lives_remaining: u32,
    },
    /// Confirms that a defender committed a move between two cells.
    DefenderStepped {
        /// Identifier of the defender that moved.
        defender_id: DefenderId,
        /// Cell the defender occupied before moving.
        from: CellCoord,
        /// Cell the defender occupies after completing the move.
        to: CellCoord,
    },
    /// Reports that a defender's move was rejected and reverted.
    DefenderHeld {
        /// Identifier of the defender that stayed in place.
        defender_id: DefenderId,
        /// Cell the defender continues to occupy.
        at: CellCoord,
    },
    /// Reports the outcome of a wholesale roster regeneration.
    RosterSpawned {
        /// Number of defenders the world attempted to place.
        requested: u32,
        /// Number of defenders that found a valid cell.
        placed: u32,
    },
    /// Confirms that the target roster size changed.
    DefenderTargetChanged {
        /// Roster size the world now maintains.
        count: u32,
    },
    /// Announces that the session entered a new lifecycle phase.
    PhaseChanged {
        /// Phase that became active after processing commands.
        phase: Phase,
    },
    /// Reports that the runner ran out of lives.
    GameOver {
        /// Final score captured at the moment the session ended.
        score: u32,
    },
    /// Confirms that a full session reinitialisation completed.
    SessionRestarted,
}

/// Cardinal movement directions available to the runner and defenders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
}

impl Direction {
    /// All four directions in a fixed, documented order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];
}

/// Unique identifier assigned to a defender for the duration of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefenderId(u32);

impl DefenderId {
    /// Creates a new defender identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Reports whether the other cell sits exactly one orthogonal step away.
    #[must_use]
    pub fn is_adjacent_to(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Enumerates the 4-directional neighbours of the cell.
    ///
    /// Neighbours below the coordinate origin are omitted; callers filter
    /// the far edges through [`GridGeometry::contains`].
    #[must_use]
    pub fn neighbors(self) -> impl Iterator<Item = CellCoord> {
        let column = self.column;
        let row = self.row;
        [
            column.checked_sub(1).map(|c| CellCoord::new(c, row)),
            Some(CellCoord::new(column.saturating_add(1), row)),
            row.checked_sub(1).map(|r| CellCoord::new(column, r)),
            Some(CellCoord::new(column, row.saturating_add(1))),
        ]
        .into_iter()
        .flatten()
    }
}

/// Immutable description of the playing field.
///
/// All gameplay logic works in discrete cell indices; the cell length exists
/// solely so rendering adapters can project cells into pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    columns: u32,
    rows: u32,
    cell_length: f32,
}

impl GridGeometry {
    /// Creates a new grid description with the provided dimensions.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, cell_length: f32) -> Self {
        Self {
            columns,
            rows,
            cell_length,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square cell expressed in render units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Total width of the grid measured in render units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Total height of the grid measured in render units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// Reports whether the provided cell lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Computes the destination one cell away in the given direction.
    ///
    /// Returns `None` when the step would leave the grid.
    #[must_use]
    pub fn step(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        let destination = match direction {
            Direction::Left => CellCoord::new(cell.column().checked_sub(1)?, cell.row()),
            Direction::Right => CellCoord::new(cell.column().checked_add(1)?, cell.row()),
            Direction::Up => CellCoord::new(cell.column(), cell.row().checked_sub(1)?),
            Direction::Down => CellCoord::new(cell.column(), cell.row().checked_add(1)?),
        };

        self.contains(destination).then_some(destination)
    }

    /// Cell where the runner spawns: the left edge, vertically centred.
    #[must_use]
    pub const fn player_spawn(&self) -> CellCoord {
        CellCoord::new(0, self.rows / 2)
    }

    /// Rightmost column; entering it scores a point and resets the round.
    #[must_use]
    pub const fn goal_column(&self) -> u32 {
        self.columns.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, DefenderId, Direction, GridGeometry, Phase};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn adjacency_requires_exactly_one_step() {
        let cell = CellCoord::new(5, 5);
        assert!(cell.is_adjacent_to(CellCoord::new(5, 4)));
        assert!(cell.is_adjacent_to(CellCoord::new(4, 5)));
        assert!(!cell.is_adjacent_to(CellCoord::new(4, 4)));
        assert!(!cell.is_adjacent_to(cell));
    }

    #[test]
    fn neighbors_clip_at_the_origin() {
        let corner: Vec<_> = CellCoord::new(0, 0).neighbors().collect();
        assert_eq!(corner, vec![CellCoord::new(1, 0), CellCoord::new(0, 1)]);

        let interior: Vec<_> = CellCoord::new(3, 3).neighbors().collect();
        assert_eq!(interior.len(), 4);
    }

    #[test]
    fn step_stays_within_bounds() {
        let grid = GridGeometry::new(3, 2, 1.0);
        let corner = CellCoord::new(0, 0);

        assert_eq!(grid.step(corner, Direction::Left), None);
        assert_eq!(grid.step(corner, Direction::Up), None);
        assert_eq!(
            grid.step(corner, Direction::Right),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(
            grid.step(corner, Direction::Down),
            Some(CellCoord::new(0, 1))
        );
        assert_eq!(grid.step(CellCoord::new(2, 1), Direction::Right), None);
        assert_eq!(grid.step(CellCoord::new(2, 1), Direction::Down), None);
    }

    #[test]
    fn player_spawn_sits_on_the_left_edge() {
        let grid = GridGeometry::new(18, 10, 20.0);
        assert_eq!(grid.player_spawn(), CellCoord::new(0, 5));
        assert_eq!(grid.goal_column(), 17);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn defender_id_round_trips_through_bincode() {
        assert_round_trip(&DefenderId::new(42));
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(17, 9));
    }

    #[test]
    fn direction_round_trips_through_bincode() {
        assert_round_trip(&Direction::Right);
    }

    #[test]
    fn phase_round_trips_through_bincode() {
        assert_round_trip(&Phase::GameOver);
    }
}
