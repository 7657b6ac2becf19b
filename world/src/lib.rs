#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Grid Rush.
//!
//! The world owns the runner, the defender roster, the dense occupancy grid,
//! the score and the lives counter. Adapters and systems never mutate this
//! state directly; they submit [`Command`] values through [`apply`] and
//! observe the resulting [`Event`] stream. Defender step commands are
//! resolved in arrival order against the live occupancy set, which makes the
//! resolution order-dependent by design: callers emit steps in ascending
//! defender id, and that ordering is part of the contract.

use grid_rush_core::{
    CellCoord, Command, DefenderId, Direction, Event, GridGeometry, Phase, WELCOME_BANNER,
};
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

const SPAWN_SEED: u64 = 0x9d3c_a2f1_7b54_e806;

const DEFAULT_GRID_COLUMNS: u32 = 18;
const DEFAULT_GRID_ROWS: u32 = 10;
const DEFAULT_CELL_LENGTH: f32 = 20.0;

/// Number of defenders fielded when a session begins.
pub const INITIAL_DEFENDERS: u32 = 5;
/// Number of lives the runner starts a session with.
pub const STARTING_LIVES: u32 = 3;
/// Left-hand columns reserved for the runner's spawn and approach.
pub const SPAWN_MARGIN_COLUMNS: u32 = 3;

const PLACEMENT_ATTEMPT_CAP: u32 = 64;

/// Represents the authoritative Grid Rush world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: GridGeometry,
    player: Player,
    defenders: Vec<Defender>,
    occupancy: OccupancyGrid,
    next_defender_id: u32,
    defender_target: u32,
    score: u32,
    phase: Phase,
    tick_index: u64,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a new Grid Rush world ready for simulation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(SPAWN_SEED)
    }

    /// Creates a world whose defender placements derive from the given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let grid = GridGeometry::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS, DEFAULT_CELL_LENGTH);
        let mut world = Self {
            banner: WELCOME_BANNER,
            player: Player::at_spawn(&grid),
            defenders: Vec::new(),
            occupancy: OccupancyGrid::new(grid.columns(), grid.rows()),
            next_defender_id: 0,
            defender_target: INITIAL_DEFENDERS,
            score: 0,
            phase: Phase::Playing,
            tick_index: 0,
            grid,
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        let mut boot_events = Vec::new();
        world.respawn_roster(world.defender_target, &mut boot_events);
        world
    }

    fn respawn_roster(&mut self, requested: u32, out_events: &mut Vec<Event>) {
        self.defenders.clear();
        self.occupancy.clear();

        let mut placed = 0;
        for _ in 0..requested {
            if self.spawn_defender() {
                placed += 1;
            }
        }

        if placed < requested {
            log::warn!(
                "defender placement exhausted after {PLACEMENT_ATTEMPT_CAP} attempts; \
                 fielding {placed} of {requested}"
            );
        }
        out_events.push(Event::RosterSpawned { requested, placed });
    }

    fn spawn_defender(&mut self) -> bool {
        let columns = self.grid.columns();
        let rows = self.grid.rows();
        if columns == 0 || rows == 0 {
            return false;
        }

        let margin = SPAWN_MARGIN_COLUMNS.min(columns.saturating_sub(1));
        for _ in 0..PLACEMENT_ATTEMPT_CAP {
            let column = self.rng.gen_range(margin..columns);
            let row = self.rng.gen_range(0..rows);
            let candidate = CellCoord::new(column, row);

            if candidate == self.player.cell {
                continue;
            }
            if !self.placement_allows(candidate, None) {
                continue;
            }

            let id = DefenderId::new(self.next_defender_id);
            self.next_defender_id = self.next_defender_id.wrapping_add(1);
            self.defenders.push(Defender {
                id,
                cell: candidate,
            });
            self.occupancy.occupy(id, candidate);
            return true;
        }

        false
    }

    /// Spacing rule shared by spawning and stepping: the candidate cell and
    /// its 4-directional neighbourhood must be free of other defenders. The
    /// runner's cell never counts as occupied, so defenders may close in on
    /// its neighbourhood freely.
    fn placement_allows(&self, candidate: CellCoord, exempt: Option<DefenderId>) -> bool {
        if !self.grid.contains(candidate) {
            return false;
        }

        let blocked = |cell: CellCoord| match self.occupancy.occupant(cell) {
            Some(id) => Some(id) != exempt,
            None => false,
        };

        if blocked(candidate) {
            return false;
        }
        !candidate.neighbors().any(blocked)
    }

    fn defender_index(&self, defender_id: DefenderId) -> Option<usize> {
        self.defenders
            .iter()
            .position(|defender| defender.id == defender_id)
    }

    fn resolve_capture(&mut self, defender_id: DefenderId, out_events: &mut Vec<Event>) {
        self.player.lives = self.player.lives.saturating_sub(1);
        out_events.push(Event::PlayerCaptured {
            defender_id,
            lives_remaining: self.player.lives,
        });

        if self.player.lives == 0 {
            self.phase = Phase::GameOver;
            out_events.push(Event::GameOver { score: self.score });
            out_events.push(Event::PhaseChanged {
                phase: Phase::GameOver,
            });
        } else {
            self.player.cell = self.grid.player_spawn();
        }
    }

    fn resolve_goal(&mut self, out_events: &mut Vec<Event>) {
        self.score = self.score.saturating_add(1);
        out_events.push(Event::GoalReached { score: self.score });
        self.player.cell = self.grid.player_spawn();
        self.respawn_roster(self.defender_target, out_events);
    }

    fn step_defender(&mut self, defender_id: DefenderId, to: CellCoord, out_events: &mut Vec<Event>) {
        let Some(index) = self.defender_index(defender_id) else {
            return;
        };
        let from = self.defenders[index].cell;

        // Destinations are recomputed defensively: the AI works from a
        // snapshot, the world trusts only what it can verify.
        if !self.grid.contains(to)
            || from == to
            || from.column().abs_diff(to.column()) > 1
            || from.row().abs_diff(to.row()) > 1
        {
            return;
        }

        if to == self.player.cell {
            // Capture short-circuits validation; the move itself stands.
            self.occupancy.vacate(from);
            self.occupancy.occupy(defender_id, to);
            self.defenders[index].cell = to;
            self.resolve_capture(defender_id, out_events);
            return;
        }

        if !self.placement_allows(to, Some(defender_id)) {
            out_events.push(Event::DefenderHeld {
                defender_id,
                at: from,
            });
            return;
        }

        self.occupancy.vacate(from);
        self.occupancy.occupy(defender_id, to);
        self.defenders[index].cell = to;
        out_events.push(Event::DefenderStepped {
            defender_id,
            from,
            to,
        });
    }

    fn move_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let Some(destination) = self.grid.step(self.player.cell, direction) else {
            return;
        };

        if let Some(occupant) = self.occupancy.occupant(destination) {
            self.resolve_capture(occupant, out_events);
            return;
        }

        let from = self.player.cell;
        self.player.cell = destination;
        out_events.push(Event::PlayerMoved {
            from,
            to: destination,
        });

        if destination.column() == self.grid.goal_column() {
            self.resolve_goal(out_events);
        }
    }

    fn reset_session(&mut self, out_events: &mut Vec<Event>) {
        self.score = 0;
        self.defender_target = INITIAL_DEFENDERS;
        self.next_defender_id = 0;
        self.tick_index = 0;
        self.player = Player::at_spawn(&self.grid);
        self.phase = Phase::Playing;
        self.respawn_roster(self.defender_target, out_events);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid {
            columns,
            rows,
            cell_length,
        } => {
            // Degenerate dimensions would strand the runner outside the
            // grid; two columns is the smallest field with a distinct goal.
            let columns = columns.max(2);
            let rows = rows.max(1);
            world.grid = GridGeometry::new(columns, rows, cell_length);
            world.occupancy = OccupancyGrid::new(columns, rows);
            world.score = 0;
            world.next_defender_id = 0;
            world.tick_index = 0;
            world.player = Player::at_spawn(&world.grid);
            world.phase = Phase::Playing;
            world.respawn_roster(world.defender_target, out_events);
        }
        Command::Tick { dt } => {
            if world.phase != Phase::Playing {
                return;
            }
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::MovePlayer { direction } => {
            if world.phase != Phase::Playing {
                return;
            }
            world.move_player(direction, out_events);
        }
        Command::StepDefender { defender_id, to } => {
            if world.phase != Phase::Playing {
                return;
            }
            world.step_defender(defender_id, to, out_events);
        }
        Command::SetDefenderTarget { count } => {
            let count = count.max(1);
            if count == world.defender_target {
                return;
            }
            world.defender_target = count;
            out_events.push(Event::DefenderTargetChanged { count });

            // Rosters only grow mid-session; shrinkage waits for the next
            // wholesale respawn.
            let fielded = world.defenders.len() as u32;
            if world.phase == Phase::Playing && fielded < count {
                let deficit = count - fielded;
                let mut placed = 0;
                for _ in 0..deficit {
                    if world.spawn_defender() {
                        placed += 1;
                    }
                }
                if placed < deficit {
                    log::warn!(
                        "roster growth exhausted after {PLACEMENT_ATTEMPT_CAP} attempts; \
                         added {placed} of {deficit}"
                    );
                }
                out_events.push(Event::RosterSpawned {
                    requested: deficit,
                    placed,
                });
            }
        }
        Command::Pause => {
            if world.phase != Phase::Playing {
                return;
            }
            world.phase = Phase::Paused;
            out_events.push(Event::PhaseChanged {
                phase: Phase::Paused,
            });
        }
        Command::Resume => {
            if world.phase != Phase::Paused {
                return;
            }
            world.phase = Phase::Playing;
            out_events.push(Event::PhaseChanged {
                phase: Phase::Playing,
            });
        }
        Command::Restart => {
            if world.phase != Phase::GameOver {
                return;
            }
            world.reset_session(out_events);
            out_events.push(Event::PhaseChanged {
                phase: Phase::Playing,
            });
            out_events.push(Event::SessionRestarted);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{OccupancyGrid, World};
    use grid_rush_core::{CellCoord, DefenderId, GridGeometry, Phase};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides the world's grid geometry.
    #[must_use]
    pub fn grid(world: &World) -> GridGeometry {
        world.grid
    }

    /// Current lifecycle phase of the session.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Points scored by the runner this session.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Lives remaining before the session ends.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.player.lives
    }

    /// Cell currently occupied by the runner.
    #[must_use]
    pub fn player_cell(world: &World) -> CellCoord {
        world.player.cell
    }

    /// Roster size the world maintains across respawns.
    #[must_use]
    pub fn defender_target(world: &World) -> u32 {
        world.defender_target
    }

    /// Number of ticks the session has processed while playing.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Reports whether a cell satisfies the defender spacing rule.
    #[must_use]
    pub fn placement_valid(world: &World, candidate: CellCoord) -> bool {
        world.placement_allows(candidate, None)
    }

    /// Captures a read-only view of the fielded defenders.
    #[must_use]
    pub fn defender_view(world: &World) -> DefenderView {
        let mut snapshots: Vec<DefenderSnapshot> = world
            .defenders
            .iter()
            .map(|defender| DefenderSnapshot {
                id: defender.id,
                cell: defender.cell,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        DefenderView { snapshots }
    }

    /// Exposes a read-only view of the dense occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        OccupancyView {
            grid: &world.occupancy,
        }
    }

    /// Read-only snapshot describing all fielded defenders.
    #[derive(Clone, Debug)]
    pub struct DefenderView {
        snapshots: Vec<DefenderSnapshot>,
    }

    impl DefenderView {
        /// Iterator over the captured snapshots in ascending id order.
        pub fn iter(&self) -> impl Iterator<Item = &DefenderSnapshot> {
            self.snapshots.iter()
        }

        /// Number of defenders captured by the view.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether the view holds no defenders.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<DefenderSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single defender's state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DefenderSnapshot {
        /// Unique identifier assigned to the defender.
        pub id: DefenderId,
        /// Grid cell currently occupied by the defender.
        pub cell: CellCoord,
    }

    /// Read-only view into the dense occupancy grid.
    #[derive(Clone, Copy, Debug)]
    pub struct OccupancyView<'a> {
        grid: &'a OccupancyGrid,
    }

    impl OccupancyView<'_> {
        /// Returns the defender occupying the provided cell, if any.
        #[must_use]
        pub fn occupant(&self, cell: CellCoord) -> Option<DefenderId> {
            self.grid.occupant(cell)
        }

        /// Reports whether the cell is currently free of defenders.
        #[must_use]
        pub fn is_free(&self, cell: CellCoord) -> bool {
            self.grid.occupant(cell).is_none()
        }
    }
}

/// Scenario scaffolding that positions entities directly, bypassing random
/// placement. Compiled only for test harnesses that opt in.
#[cfg(feature = "scenario_scaffolding")]
pub mod scaffolding {
    use super::World;
    use grid_rush_core::{CellCoord, DefenderId};

    /// Moves the runner to an exact cell.
    pub fn place_player(world: &mut World, cell: CellCoord) {
        world.player.cell = cell;
    }

    /// Moves a defender to an exact cell, keeping occupancy consistent.
    pub fn place_defender(world: &mut World, defender_id: DefenderId, cell: CellCoord) {
        if let Some(index) = world.defender_index(defender_id) {
            world.occupancy.vacate(world.defenders[index].cell);
            world.defenders[index].cell = cell;
            world.occupancy.occupy(defender_id, cell);
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    cell: CellCoord,
    lives: u32,
}

impl Player {
    fn at_spawn(grid: &GridGeometry) -> Self {
        Self {
            cell: grid.player_spawn(),
            lives: STARTING_LIVES,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Defender {
    id: DefenderId,
    cell: CellCoord,
}

#[derive(Clone, Debug)]
struct OccupancyGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<DefenderId>>,
}

impl OccupancyGrid {
    fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    fn clear(&mut self) {
        self.cells.fill(None);
    }

    fn occupant(&self, cell: CellCoord) -> Option<DefenderId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    fn occupy(&mut self, defender_id: DefenderId, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(defender_id);
            }
        }
    }

    fn vacate(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = None;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
