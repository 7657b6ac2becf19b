use std::time::Duration;

use grid_rush_core::{CellCoord, Command, Event};
use grid_rush_system_defender_ai::{Config, DefenderAi, ResidualSplit};
use grid_rush_world::{self as world, query, scaffolding, World};

const TICK: Duration = Duration::from_millis(500);

fn tick_events(world: &mut World, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);
    events
}

fn run_pass(
    world: &World,
    ai: &mut DefenderAi,
    events: &[Event],
    toward_chance: f32,
) -> Vec<Command> {
    let mut commands = Vec::new();
    ai.handle(
        events,
        query::grid(world),
        query::player_cell(world),
        &query::defender_view(world),
        toward_chance,
        TICK,
        &mut commands,
    );
    commands
}

#[test]
fn full_chase_weight_always_closes_the_gap() {
    let mut world = World::with_seed(41);
    let mut ai = DefenderAi::new(Config::new(1));

    let events = tick_events(&mut world, TICK);
    let player = query::player_cell(&world);
    let before = query::defender_view(&world).into_vec();
    let commands = run_pass(&world, &mut ai, &events, 100.0);

    assert_eq!(commands.len(), before.len());
    for command in &commands {
        let Command::StepDefender { defender_id, to } = command else {
            panic!("unexpected command {command:?}");
        };
        let snapshot = before
            .iter()
            .find(|snapshot| snapshot.id == *defender_id)
            .expect("command references a fielded defender");
        assert!(
            to.manhattan_distance(player) < snapshot.cell.manhattan_distance(player),
            "defender {} did not close on the runner",
            defender_id.get()
        );
    }
}

#[test]
fn commands_arrive_in_ascending_defender_id_order() {
    let mut world = World::with_seed(41);
    let mut ai = DefenderAi::new(Config::new(1));

    let events = tick_events(&mut world, TICK);
    let commands = run_pass(&world, &mut ai, &events, 100.0);

    let ids: Vec<_> = commands
        .iter()
        .map(|command| match command {
            Command::StepDefender { defender_id, .. } => defender_id.get(),
            other => panic!("unexpected command {other:?}"),
        })
        .collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}

#[test]
fn all_hold_residual_emits_nothing() {
    let mut world = World::with_seed(41);
    let mut ai = DefenderAi::new(Config::new(1).with_residual_split(ResidualSplit {
        hold: 1.0,
        random: 0.0,
        away: 0.0,
    }));

    let events = tick_events(&mut world, TICK);
    let commands = run_pass(&world, &mut ai, &events, 0.0);
    assert!(commands.is_empty());
}

#[test]
fn adjacency_bonus_turns_an_even_roll_into_a_capture() {
    let mut world = World::with_seed(41);
    let defender = query::defender_view(&world)
        .into_vec()
        .into_iter()
        .next()
        .expect("roster holds a defender");

    let runner = CellCoord::new(5, 4);
    scaffolding::place_player(&mut world, runner);
    scaffolding::place_defender(&mut world, defender.id, CellCoord::new(5, 5));

    // Base chance 50 plus the +50 adjacency bonus saturates the chase
    // weight, so every seed must produce the capturing step.
    let mut ai = DefenderAi::new(Config::new(99));
    let events = tick_events(&mut world, TICK);
    let commands = run_pass(&world, &mut ai, &events, 50.0);

    let step = commands
        .iter()
        .find_map(|command| match command {
            Command::StepDefender { defender_id, to } if *defender_id == defender.id => Some(*to),
            _ => None,
        })
        .expect("adjacent defender must commit to the chase");
    assert_eq!(step, runner);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::StepDefender {
            defender_id: defender.id,
            to: step,
        },
        &mut events,
    );
    assert!(events.contains(&Event::PlayerCaptured {
        defender_id: defender.id,
        lives_remaining: 2,
    }));
}

#[test]
fn no_pass_runs_before_the_interval_elapses() {
    let mut world = World::with_seed(41);
    let mut ai = DefenderAi::new(Config::new(1));

    let half = tick_events(&mut world, TICK / 2);
    let commands = run_pass(&world, &mut ai, &half, 100.0);
    assert!(commands.is_empty());

    let rest = tick_events(&mut world, TICK / 2);
    let commands = run_pass(&world, &mut ai, &rest, 100.0);
    assert!(!commands.is_empty());
}

#[test]
fn all_away_residual_never_closes_the_gap() {
    let mut world = World::with_seed(41);
    let mut ai = DefenderAi::new(Config::new(7).with_residual_split(ResidualSplit {
        hold: 0.0,
        random: 0.0,
        away: 1.0,
    }));

    let events = tick_events(&mut world, TICK);
    let player = query::player_cell(&world);
    let before = query::defender_view(&world).into_vec();
    let commands = run_pass(&world, &mut ai, &events, 0.0);

    for command in &commands {
        let Command::StepDefender { defender_id, to } = command else {
            panic!("unexpected command {command:?}");
        };
        let snapshot = before
            .iter()
            .find(|snapshot| snapshot.id == *defender_id)
            .expect("command references a fielded defender");
        assert!(
            to.manhattan_distance(player) >= snapshot.cell.manhattan_distance(player),
            "retreating defender {} moved closer",
            defender_id.get()
        );
    }
}
