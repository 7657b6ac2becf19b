//! Headless session orchestration.
//!
//! One [`GameSession`] wires the authoritative world to the defender AI and
//! the difficulty controller and drives them with a fixed frame cadence. The
//! runner is steered by a deliberately naive autopilot that sprints straight
//! for the goal column at the paced input rate; the point of the binary is
//! to exercise and observe the simulation, not to win it.

use std::time::Duration;

use grid_rush_core::{Command, Direction, Event, Phase};
use grid_rush_rendering::Scene;
use grid_rush_system_defender_ai::{Config as AiConfig, DefenderAi};
use grid_rush_system_difficulty::Difficulty;
use grid_rush_world::{self as world, query, World};

use crate::input::InputPacer;

/// Fixed frame duration the headless loop advances by.
pub const FRAME_DT: Duration = Duration::from_millis(16);

/// Parameters controlling a headless session.
#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Seed shared by defender placement and steering rolls.
    pub seed: u64,
    /// Number of cell columns in the field.
    pub columns: u32,
    /// Number of cell rows in the field.
    pub rows: u32,
    /// Pixel length of one square cell.
    pub cell_length: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            columns: 18,
            rows: 10,
            cell_length: 20.0,
        }
    }
}

/// Outcome of a bounded headless run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    /// Final score of the session.
    pub score: u32,
    /// Difficulty level reached.
    pub level: u32,
    /// Number of times the runner was captured.
    pub captures: u32,
    /// Frames actually simulated before the run ended.
    pub frames: u64,
    /// Lifecycle phase at the end of the run.
    pub phase: Phase,
}

/// A fully wired game: world, systems, and input pacing.
#[derive(Debug)]
pub struct GameSession {
    world: World,
    ai: DefenderAi,
    difficulty: Difficulty,
    pacer: InputPacer,
    clock: Duration,
}

impl GameSession {
    /// Boots a session with the provided configuration.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let mut world = World::with_seed(config.seed);
        let difficulty = Difficulty::default();

        let mut boot_events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureGrid {
                columns: config.columns,
                rows: config.rows,
                cell_length: config.cell_length,
            },
            &mut boot_events,
        );
        world::apply(
            &mut world,
            Command::SetDefenderTarget {
                count: difficulty.defender_target(),
            },
            &mut boot_events,
        );

        Self {
            world,
            ai: DefenderAi::new(AiConfig::new(config.seed)),
            difficulty,
            pacer: InputPacer::default(),
            clock: Duration::ZERO,
        }
    }

    /// Advances the session by one frame and returns the events it produced.
    pub fn advance_frame(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.clock = self.clock.saturating_add(FRAME_DT);

        if query::phase(&self.world) == Phase::Playing
            && self.pacer.try_move(Direction::Right, self.clock)
        {
            world::apply(
                &mut self.world,
                Command::MovePlayer {
                    direction: Direction::Right,
                },
                &mut events,
            );
        }

        world::apply(
            &mut self.world,
            Command::Tick { dt: FRAME_DT },
            &mut events,
        );

        let mut commands = Vec::new();
        self.ai.handle(
            &events,
            query::grid(&self.world),
            query::player_cell(&self.world),
            &query::defender_view(&self.world),
            self.difficulty.toward_chance(),
            self.difficulty.tick_interval(),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        let mut commands = Vec::new();
        self.difficulty.handle(&events, &mut commands);
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        events
    }

    /// Runs up to `frames` frames, stopping early at game over.
    ///
    /// The observer sees the session and the fresh event batch after every
    /// frame; adapters print from it, tests assert from it.
    pub fn run(
        &mut self,
        frames: u64,
        mut observer: impl FnMut(&GameSession, &[Event]),
    ) -> SessionSummary {
        let mut captures = 0;
        let mut simulated = 0;

        for _ in 0..frames {
            let events = self.advance_frame();
            simulated += 1;
            captures += events
                .iter()
                .filter(|event| matches!(event, Event::PlayerCaptured { .. }))
                .count() as u32;
            observer(self, &events);

            if query::phase(&self.world) == Phase::GameOver {
                break;
            }
        }

        SessionSummary {
            score: query::score(&self.world),
            level: self.difficulty.level(),
            captures,
            frames: simulated,
            phase: query::phase(&self.world),
        }
    }

    /// Captures the current frame for presentation.
    #[must_use]
    pub fn scene(&self) -> Scene {
        Scene::capture(&self.world, self.difficulty.level())
    }

    /// Read-only access to the underlying world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }
}

#[cfg(test)]
mod tests {
    use super::{GameSession, SessionConfig};
    use grid_rush_core::Phase;
    use grid_rush_world::query;

    #[test]
    fn boot_fields_the_configured_roster() {
        let session = GameSession::new(SessionConfig::default());
        assert_eq!(query::phase(session.world()), Phase::Playing);
        assert_eq!(query::defender_view(session.world()).len(), 5);
        assert_eq!(query::lives(session.world()), 3);
    }

    #[test]
    fn autopilot_eventually_moves_the_runner() {
        let mut session = GameSession::new(SessionConfig::default());
        let spawn = query::player_cell(session.world());
        let _ = session.advance_frame();
        let moved = query::player_cell(session.world()) != spawn;
        let captured = query::lives(session.world()) < 3;
        assert!(moved || captured);
    }
}
