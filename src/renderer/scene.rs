//! Draw-list generation
//!
//! Turns a `Game` into a flat list of primitives in screen space. Whatever
//! owns the drawing surface replays the list in order.

use glam::Vec2;

use crate::consts::SCALE;
use crate::sim::entities::{AnchorKind, WandKind};
use crate::sim::geom::Rect;
use crate::sim::{Game, GamePhase, LevelState, WandId};

/// RGBA, each channel 0.0 - 1.0
pub type Color = [f32; 4];

/// Build an opaque color from 0-255 channels
const fn rgb(r: u8, g: u8, b: u8) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

pub mod palette {
    use super::{Color, rgb};

    pub const WAND_WHITE: Color = rgb(255, 255, 255);
    pub const WAND_RED: Color = rgb(240, 180, 180);
    pub const WAND_BLUE: Color = rgb(180, 180, 240);
    pub const WAND_GREEN: Color = rgb(180, 240, 180);
    pub const ANCHOR_WHITE: Color = rgb(200, 200, 200);
    pub const ANCHOR_RED: Color = rgb(220, 160, 160);
    pub const ANCHOR_BLUE: Color = rgb(160, 160, 220);
    pub const ANCHOR_GREEN: Color = rgb(160, 220, 160);
    pub const ANCHOR_PURPLE: Color = rgb(220, 160, 220);
    pub const EXIT: Color = rgb(240, 240, 160);
    pub const GATE_RED: Color = rgb(210, 80, 80);
    pub const GATE_BLUE: Color = rgb(80, 80, 210);
    pub const WALL: Color = rgb(100, 100, 100);
    pub const SPIKE: Color = rgb(200, 40, 40);
    pub const ERROR: Color = rgb(0, 0, 255);
}

/// Anchor dot radius (px)
pub const ANCHOR_RADIUS: f32 = 4.0;
/// Wall and gate stroke width (px)
pub const BARRIER_WIDTH: f32 = 3.0;

/// A single drawing primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCmd {
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Color>,
    },
    Rect {
        rect: Rect,
        color: Color,
        filled: bool,
    },
}

/// World → screen: a one-cell margin around the grid
#[inline]
pub fn to_screen(world: Vec2) -> Vec2 {
    world + Vec2::splat(SCALE)
}

/// Canvas size needed for a grid of the given dimensions
pub fn canvas_size(width: usize, height: usize) -> Vec2 {
    Vec2::new((width + 1) as f32, (height + 1) as f32) * SCALE
}

fn wand_color(kind: WandKind) -> Color {
    match kind {
        WandKind::Player => palette::WAND_WHITE,
        WandKind::Red => palette::WAND_RED,
        WandKind::Blue => palette::WAND_BLUE,
        WandKind::Green => palette::WAND_GREEN,
    }
}

fn anchor_color(kind: AnchorKind) -> Color {
    match kind {
        AnchorKind::Plain => palette::ANCHOR_WHITE,
        AnchorKind::Red => palette::ANCHOR_RED,
        AnchorKind::Blue => palette::ANCHOR_BLUE,
        AnchorKind::Green => palette::ANCHOR_GREEN,
        AnchorKind::Teleport => palette::ANCHOR_PURPLE,
        AnchorKind::Exit => palette::EXIT,
    }
}

fn gate_color(kind: u8) -> Color {
    match kind {
        1 => palette::GATE_RED,
        2 => palette::GATE_BLUE,
        _ => palette::ERROR,
    }
}

fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Player stroke while dying. `fade` runs 1 → 0; the wand pales to red then
/// vanishes.
pub fn death_stroke(fade: f32, base_width: f32) -> (Color, f32) {
    let fade = fade.clamp(0.0, 1.0);
    let t = 1.0 - fade;
    let r = if fade > 0.5 { 1.0 } else { 1.0 - t * 100.0 / 255.0 };
    let gb = 1.0 - t * 200.0 / 255.0;
    let width = ((base_width + 2.0) * fade).floor();
    ([r, gb, gb, fade], width)
}

/// Everything in the level, back to front
pub fn level_scene(state: &LevelState, player_fade: Option<f32>) -> Vec<DrawCmd> {
    let mut cmds = Vec::with_capacity(
        state.walls.len()
            + state.gates.len()
            + state.fields.len()
            + state.spikes.len()
            + state.wands().len()
            + state.anchor_count(),
    );

    for wall in &state.walls {
        cmds.push(DrawCmd::Line {
            from: to_screen(wall.start),
            to: to_screen(wall.end),
            width: BARRIER_WIDTH,
            color: palette::WALL,
        });
    }

    for gate in &state.gates {
        if gate.alpha() <= 0.0 {
            continue;
        }
        cmds.push(DrawCmd::Line {
            from: to_screen(gate.start),
            to: to_screen(gate.end),
            width: BARRIER_WIDTH,
            color: with_alpha(gate_color(gate.kind), gate.alpha()),
        });
    }

    for field in &state.fields {
        cmds.push(DrawCmd::Rect {
            rect: Rect::new(to_screen(field.rect.min), to_screen(field.rect.max)),
            color: gate_color(field.kind),
            filled: field.is_locked(),
        });
    }

    for spike in &state.spikes {
        cmds.push(DrawCmd::Rect {
            rect: Rect::new(to_screen(spike.rect.min), to_screen(spike.rect.max)),
            color: palette::SPIKE,
            filled: true,
        });
    }

    for (index, wand) in state.wands().iter().enumerate() {
        let (color, width) = match player_fade {
            Some(fade) if WandId(index).is_player() => death_stroke(fade, wand.kind.width()),
            _ => (wand_color(wand.kind), wand.kind.width()),
        };
        cmds.push(DrawCmd::Line {
            from: to_screen(wand.pivot()),
            to: to_screen(wand.destination()),
            width,
            color,
        });
    }

    for (_, anchor) in state.anchors() {
        let color = anchor_color(anchor.kind);
        let (fill, stroke) = match (anchor.ephemeral, anchor.ephemeral_locked) {
            (false, _) => (Some(color), None),
            (true, false) => (None, Some(color)),
            (true, true) => (Some(palette::WALL), Some(color)),
        };
        cmds.push(DrawCmd::Circle {
            center: to_screen(anchor.pos),
            radius: ANCHOR_RADIUS,
            fill,
            stroke,
        });
    }

    cmds
}

/// Draw list for the current frame of a game
pub fn build_scene(game: &Game) -> Vec<DrawCmd> {
    let fade = match game.phase {
        GamePhase::Dying { .. } => game.death_fade(),
        _ => None,
    };
    level_scene(&game.state, fade)
}
