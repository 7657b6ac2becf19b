#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Difficulty scaling system for Grid Rush.
//!
//! The controller listens for goal events and ratchets the pressure: the
//! level counter climbs on a fixed scoring cadence, the tick interval decays
//! toward a hard floor, the chase weight grows toward its cap, and every few
//! levels the roster gains a defender — paired with a temporary slowdown so
//! the larger roster does not spike the difficulty. All bounds are hard
//! clamps and the roster only ever grows within a session.

use std::time::Duration;

use grid_rush_core::{Command, Event};

/// Tuning knobs controlling every adjustable aspect of difficulty scaling.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Points the runner must score per level increase.
    pub level_cadence: u32,
    /// Levels between roster growth steps.
    pub growth_period: u32,
    /// Hard ceiling on the roster size.
    pub roster_cap: u32,
    /// Number of defenders fielded at level 1.
    pub initial_defenders: u32,
    /// Tick interval at level 1.
    pub base_interval: Duration,
    /// Hard floor the tick interval never drops below.
    pub min_interval: Duration,
    /// Multiplier applied to the interval on every level increase.
    pub interval_decay: f64,
    /// Multiplier applied to the interval when the roster grows; values
    /// above 1 trade speed for the harder roster.
    pub growth_slowdown: f64,
    /// Chase weight, in percentage points, at level 1.
    pub initial_toward_chance: f32,
    /// Hard ceiling on the chase weight.
    pub max_toward_chance: f32,
    /// Percentage points added to the chase weight per level.
    pub toward_chance_step: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level_cadence: 2,
            growth_period: 12,
            roster_cap: 11,
            initial_defenders: 5,
            base_interval: Duration::from_millis(500),
            min_interval: Duration::from_millis(100),
            interval_decay: 0.99,
            growth_slowdown: 1.1,
            initial_toward_chance: 50.0,
            max_toward_chance: 100.0,
            toward_chance_step: 0.9,
        }
    }
}

/// Pure system that tracks the difficulty curve and emits roster commands.
#[derive(Debug)]
pub struct Difficulty {
    config: Config,
    level: u32,
    interval_ms: f64,
    toward_chance: f32,
    defender_target: u32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Difficulty {
    /// Creates a new controller from the provided tuning surface.
    ///
    /// Out-of-range tuning values are clamped here rather than trusted, so a
    /// misconfigured upstream cannot stall or runaway the curve.
    #[must_use]
    pub fn new(mut config: Config) -> Self {
        config.level_cadence = config.level_cadence.max(1);
        config.growth_period = config.growth_period.max(1);
        config.initial_defenders = config.initial_defenders.clamp(1, config.roster_cap.max(1));
        if config.min_interval > config.base_interval {
            config.min_interval = config.base_interval;
        }
        if !(0.0..=1.0).contains(&config.interval_decay) {
            config.interval_decay = 1.0;
        }
        if config.growth_slowdown < 1.0 {
            config.growth_slowdown = 1.0;
        }
        config.initial_toward_chance = config.initial_toward_chance.clamp(0.0, 100.0);
        config.max_toward_chance = config
            .max_toward_chance
            .clamp(config.initial_toward_chance, 100.0);
        config.toward_chance_step = config.toward_chance_step.max(0.0);

        Self {
            level: 1,
            interval_ms: config.base_interval.as_secs_f64() * 1_000.0,
            toward_chance: config.initial_toward_chance,
            defender_target: config.initial_defenders,
            config,
        }
    }

    /// Consumes world events, raising the difficulty on the scoring cadence
    /// and resetting it when the session restarts.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::GoalReached { score } => {
                    if score % self.config.level_cadence == 0 {
                        self.raise(out);
                    }
                }
                Event::SessionRestarted => self.reset(out),
                _ => {}
            }
        }
    }

    fn raise(&mut self, out: &mut Vec<Command>) {
        self.level = self.level.saturating_add(1);

        if self.level % self.config.growth_period == 0
            && self.defender_target < self.config.roster_cap
        {
            self.defender_target += 1;
            self.interval_ms *= self.config.growth_slowdown;
            out.push(Command::SetDefenderTarget {
                count: self.defender_target,
            });
        }

        let floor_ms = self.config.min_interval.as_secs_f64() * 1_000.0;
        self.interval_ms = (self.interval_ms * self.config.interval_decay).max(floor_ms);

        self.toward_chance = (self.config.initial_toward_chance
            + (self.level - 1) as f32 * self.config.toward_chance_step)
            .min(self.config.max_toward_chance);
    }

    fn reset(&mut self, out: &mut Vec<Command>) {
        self.level = 1;
        self.interval_ms = self.config.base_interval.as_secs_f64() * 1_000.0;
        self.toward_chance = self.config.initial_toward_chance;
        if self.defender_target != self.config.initial_defenders {
            self.defender_target = self.config.initial_defenders;
            out.push(Command::SetDefenderTarget {
                count: self.defender_target,
            });
        }
    }

    /// Current difficulty level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Cadence between defender AI passes at the current level.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_ms / 1_000.0)
    }

    /// Chase weight, in percentage points, at the current level.
    #[must_use]
    pub const fn toward_chance(&self) -> f32 {
        self.toward_chance
    }

    /// Roster size the controller currently targets.
    #[must_use]
    pub const fn defender_target(&self) -> u32 {
        self.defender_target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(score: u32) -> Vec<Event> {
        vec![Event::GoalReached { score }]
    }

    #[test]
    fn level_rises_only_on_the_scoring_cadence() {
        let mut difficulty = Difficulty::default();
        let mut commands = Vec::new();

        difficulty.handle(&goal(1), &mut commands);
        assert_eq!(difficulty.level(), 1);

        difficulty.handle(&goal(2), &mut commands);
        assert_eq!(difficulty.level(), 2);

        difficulty.handle(&goal(3), &mut commands);
        assert_eq!(difficulty.level(), 2);
    }

    #[test]
    fn interval_never_drops_below_the_floor() {
        let mut difficulty = Difficulty::default();
        let mut commands = Vec::new();

        for score in 1..=4_000 {
            difficulty.handle(&goal(score), &mut commands);
        }

        assert_eq!(
            difficulty.tick_interval(),
            Config::default().min_interval
        );
    }

    #[test]
    fn interval_is_monotone_outside_growth_bumps() {
        let mut difficulty = Difficulty::default();
        let mut previous = difficulty.tick_interval();

        for score in 1..=200 {
            let mut commands = Vec::new();
            difficulty.handle(&goal(score), &mut commands);
            let grew = !commands.is_empty();
            let current = difficulty.tick_interval();
            if !grew {
                assert!(
                    current <= previous,
                    "interval rose without a roster growth bump"
                );
            }
            previous = current;
        }
    }

    #[test]
    fn roster_growth_emits_a_target_command_and_slows_the_pace() {
        let mut difficulty = Difficulty::default();
        let mut commands = Vec::new();

        // Eleven raises land on level 12, the first growth step.
        for score in 1..=22 {
            difficulty.handle(&goal(score), &mut commands);
        }

        assert_eq!(difficulty.level(), 12);
        assert_eq!(difficulty.defender_target(), 6);
        assert_eq!(commands, vec![Command::SetDefenderTarget { count: 6 }]);
    }

    #[test]
    fn roster_stops_growing_at_the_cap() {
        let mut difficulty = Difficulty::default();
        let mut commands = Vec::new();

        for score in 1..=4_000 {
            difficulty.handle(&goal(score), &mut commands);
        }

        assert_eq!(difficulty.defender_target(), Config::default().roster_cap);
    }

    #[test]
    fn chase_weight_steps_per_level_and_clamps_at_the_cap() {
        let mut difficulty = Difficulty::default();
        let mut commands = Vec::new();
        assert_eq!(difficulty.toward_chance(), 50.0);

        difficulty.handle(&goal(1), &mut commands);
        assert_eq!(difficulty.toward_chance(), 50.0);

        difficulty.handle(&goal(2), &mut commands);
        assert!((difficulty.toward_chance() - 50.9).abs() < 1e-4);

        for score in 3..=4_000 {
            difficulty.handle(&goal(score), &mut commands);
        }
        assert_eq!(difficulty.toward_chance(), 100.0);
    }

    #[test]
    fn restart_resets_the_whole_curve() {
        let mut difficulty = Difficulty::default();
        let mut commands = Vec::new();
        for score in 1..=40 {
            difficulty.handle(&goal(score), &mut commands);
        }
        assert!(difficulty.level() > 1);

        commands.clear();
        difficulty.handle(&[Event::SessionRestarted], &mut commands);

        assert_eq!(difficulty.level(), 1);
        assert_eq!(difficulty.tick_interval(), Config::default().base_interval);
        assert_eq!(difficulty.toward_chance(), 50.0);
        assert_eq!(
            commands,
            vec![Command::SetDefenderTarget {
                count: Config::default().initial_defenders
            }]
        );
    }

    #[test]
    fn hostile_tuning_is_clamped_at_construction() {
        let difficulty = Difficulty::new(Config {
            level_cadence: 0,
            interval_decay: -3.0,
            growth_slowdown: 0.2,
            initial_toward_chance: 400.0,
            min_interval: Duration::from_secs(10),
            ..Config::default()
        });

        assert_eq!(difficulty.toward_chance(), 100.0);
        assert_eq!(difficulty.tick_interval(), Duration::from_millis(500));
    }
}
