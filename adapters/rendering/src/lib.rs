#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Grid Rush adapters.
//!
//! Frontends never query the world directly; they consume an immutable
//! [`Scene`] built from read-only world queries once per frame. All pixel
//! mathematics lives here, so gameplay code stays in cell space.

use glam::Vec2;
use grid_rush_core::{CellCoord, Phase};
use grid_rush_world::{query, World};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Background fill behind the playing field.
pub const BACKGROUND_COLOR: Color = Color::from_rgb_u8(0x00, 0x00, 0x00);
/// Fill used for the runner's sprite.
pub const PLAYER_COLOR: Color = Color::from_rgb_u8(0xff, 0x00, 0x00);
/// Fill used for defender sprites.
pub const DEFENDER_COLOR: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
/// Stroke used for the grid lines.
pub const GRID_LINE_COLOR: Color = Color::from_rgb_u8(0x80, 0x80, 0x80);
/// Fill used for HUD text.
pub const TEXT_COLOR: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);

/// Axis-aligned rectangle expressed in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRect {
    /// Upper-left corner of the rectangle.
    pub origin: Vec2,
    /// Width and height of the rectangle.
    pub size: Vec2,
}

/// A filled cell-sized square ready for presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    /// Grid cell the sprite occupies.
    pub cell: CellCoord,
    /// Pixel-space rectangle covering the cell.
    pub rect: PixelRect,
    /// Fill color for the rectangle.
    pub color: Color,
}

/// Score, lives, and session status rendered alongside the field.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    /// Points scored this session.
    pub score: u32,
    /// Lives remaining before the session ends.
    pub lives: u32,
    /// Current difficulty level.
    pub level: u32,
    /// Lifecycle phase of the session.
    pub phase: Phase,
}

/// Immutable description of a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of cell columns in the field.
    pub columns: u32,
    /// Number of cell rows in the field.
    pub rows: u32,
    /// Pixel length of one square cell.
    pub cell_length: f32,
    /// Total pixel size of the field.
    pub field_size: Vec2,
    /// The runner's sprite.
    pub player: Sprite,
    /// Defender sprites in ascending id order.
    pub defenders: Vec<Sprite>,
    /// HUD contents for the frame.
    pub hud: Hud,
}

impl Scene {
    /// Captures a frame from the world's current state.
    ///
    /// The difficulty level lives outside the world, so the orchestrator
    /// passes it in alongside the queries.
    #[must_use]
    pub fn capture(world: &World, level: u32) -> Self {
        let grid = query::grid(world);
        let cell_length = grid.cell_length();

        let defenders = query::defender_view(world)
            .iter()
            .map(|snapshot| sprite_at(snapshot.cell, cell_length, DEFENDER_COLOR))
            .collect();

        Self {
            columns: grid.columns(),
            rows: grid.rows(),
            cell_length,
            field_size: Vec2::new(grid.width(), grid.height()),
            player: sprite_at(query::player_cell(world), cell_length, PLAYER_COLOR),
            defenders,
            hud: Hud {
                score: query::score(world),
                lives: query::lives(world),
                level,
                phase: query::phase(world),
            },
        }
    }

    /// Renders the scene as one terminal line per grid row.
    ///
    /// `R` marks the runner, `D` marks defenders, `.` marks empty cells.
    /// Intended for the CLI adapter and for diffing frames in tests.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let columns = self.columns as usize;
        let rows = self.rows as usize;
        let mut field = vec![vec!['.'; columns]; rows];

        for sprite in &self.defenders {
            if let Some(slot) = slot_mut(&mut field, sprite.cell) {
                *slot = 'D';
            }
        }
        if let Some(slot) = slot_mut(&mut field, self.player.cell) {
            *slot = 'R';
        }

        let mut lines: Vec<String> = field.into_iter().map(String::from_iter).collect();
        lines.push(format!(
            "score {}  lives {}  level {}  {:?}",
            self.hud.score, self.hud.lives, self.hud.level, self.hud.phase
        ));
        lines.join("\n")
    }
}

fn sprite_at(cell: CellCoord, cell_length: f32, color: Color) -> Sprite {
    Sprite {
        cell,
        rect: PixelRect {
            origin: Vec2::new(
                cell.column() as f32 * cell_length,
                cell.row() as f32 * cell_length,
            ),
            size: Vec2::splat(cell_length),
        },
        color,
    }
}

fn slot_mut(field: &mut [Vec<char>], cell: CellCoord) -> Option<&mut char> {
    field
        .get_mut(cell.row() as usize)?
        .get_mut(cell.column() as usize)
}
