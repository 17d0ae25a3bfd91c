//! Entity models: anchors, wands and the static obstacles around them

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::consts::*;
use crate::{polar_offset, wrap_degrees};

/// Stable handle into the level's wand list. Wand 0 is always the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WandId(pub usize);

impl WandId {
    pub const PLAYER: WandId = WandId(0);

    #[inline]
    pub fn is_player(self) -> bool {
        self == Self::PLAYER
    }
}

/// Stable handle into the level's anchor arena (slots are never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId(pub usize);

/// Anchor color/behavior class, as encoded in the low bits of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorKind {
    Plain,
    Red,
    Blue,
    Green,
    Teleport,
    Exit,
}

impl AnchorKind {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Plain),
            2 => Some(Self::Red),
            3 => Some(Self::Blue),
            4 => Some(Self::Green),
            5 => Some(Self::Teleport),
            9 => Some(Self::Exit),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Plain => 1,
            Self::Red => 2,
            Self::Blue => 3,
            Self::Green => 4,
            Self::Teleport => 5,
            Self::Exit => 9,
        }
    }
}

/// How a wand reacts when its tip lands on an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Control {
    /// Pass over anchors
    #[default]
    Free,
    /// Latch, then immediately reverse (pendulum)
    Swing,
    /// Latch and keep turning the same way
    Latch,
    /// Reverse in place without moving pivot
    Bounce,
}

/// Wand class. Drives width/color and, for enemies, the control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WandKind {
    Player,
    Red,
    Blue,
    Green,
}

impl WandKind {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Player),
            2 => Some(Self::Red),
            3 => Some(Self::Blue),
            4 => Some(Self::Green),
            _ => None,
        }
    }

    /// Shares the anchor code space: a wand only snaps to anchors of its own code
    pub fn code(self) -> u8 {
        match self {
            Self::Player => 1,
            Self::Red => 2,
            Self::Blue => 3,
            Self::Green => 4,
        }
    }

    pub fn default_control(self) -> Control {
        match self {
            Self::Player => Control::Free,
            Self::Red => Control::Swing,
            Self::Blue => Control::Latch,
            Self::Green => Control::Bounce,
        }
    }

    /// Stroke width in pixels
    pub fn width(self) -> f32 {
        match self {
            Self::Player => 4.0,
            _ => 2.0,
        }
    }
}

/// A fixed pivot point wands latch onto
#[derive(Debug, Clone)]
pub struct Anchor {
    pub cell: IVec2,
    pub pos: Vec2,
    pub kind: AnchorKind,
    /// Single-use anchor
    pub ephemeral: bool,
    /// Used once already; removed when the player leaves
    pub ephemeral_locked: bool,
    /// Pairs with other anchors sharing `teleport_id % 10`
    pub teleport_id: u32,
    /// Unclaimed bonus for the player
    pub points: u32,
    wands: Vec<WandId>,
}

impl Anchor {
    pub fn new(cell: IVec2, kind: AnchorKind, ephemeral: bool) -> Self {
        Self {
            cell,
            pos: cell.as_vec2() * SCALE,
            kind,
            ephemeral,
            ephemeral_locked: false,
            teleport_id: 0,
            points: 0,
            wands: Vec::new(),
        }
    }

    /// Attach a wand. Returns the bonus points claimed (player only).
    pub fn attach_wand(&mut self, wand: WandId) -> u32 {
        if !self.wands.contains(&wand) {
            self.wands.push(wand);
        }
        if self.ephemeral && !self.ephemeral_locked {
            self.ephemeral_locked = true;
        }
        if wand.is_player() && self.points > 0 {
            return std::mem::take(&mut self.points);
        }
        0
    }

    /// Returns false if the wand wasn't attached
    pub fn detach_wand(&mut self, wand: WandId) -> bool {
        match self.wands.iter().position(|&w| w == wand) {
            Some(i) => {
                self.wands.swap_remove(i);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn has_wand(&self, wand: WandId) -> bool {
        self.wands.contains(&wand)
    }

    pub fn wands(&self) -> &[WandId] {
        &self.wands
    }

    #[inline]
    pub fn teleport_channel(&self) -> u32 {
        self.teleport_id % 10
    }
}

/// A rotating segment pivoting around its current anchor
#[derive(Debug, Clone)]
pub struct Wand {
    pub kind: WandKind,
    pub control: Control,
    pivot: Vec2,
    /// Degrees, [0, 360)
    angle: f32,
    /// Degrees per tick; sign is direction
    speed: f32,
    length: f32,
    dest: Vec2,
}

impl Wand {
    pub fn new(kind: WandKind, pivot: Vec2, angle: f32, speed: f32) -> Self {
        let mut wand = Self {
            kind,
            control: kind.default_control(),
            pivot,
            angle: wrap_degrees(angle),
            speed,
            length: WAND_LENGTH,
            dest: pivot,
        };
        wand.refresh_dest();
        wand
    }

    #[inline]
    fn refresh_dest(&mut self) {
        self.dest = polar_offset(self.pivot, self.angle, self.length);
    }

    pub fn pivot(&self) -> Vec2 {
        self.pivot
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    /// Tip of the wand
    pub fn destination(&self) -> Vec2 {
        self.dest
    }

    /// Tip of the wand as if it were `shorten` units shorter
    pub fn tip(&self, shorten: f32) -> Vec2 {
        polar_offset(self.pivot, self.angle, self.length - shorten)
    }

    pub fn segment(&self) -> (Vec2, Vec2) {
        (self.pivot, self.dest)
    }

    pub fn set_pivot(&mut self, pivot: Vec2) {
        self.pivot = pivot;
        self.refresh_dest();
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = wrap_degrees(angle);
        self.refresh_dest();
    }

    pub fn advance_angle(&mut self, ticks: u32) {
        self.angle = wrap_degrees(self.angle + self.speed * ticks as f32 + 360.0);
        self.refresh_dest();
    }

    /// Flip direction and immediately step `ticks` the new way, which pulls
    /// the wand off whatever it just hit.
    pub fn reverse(&mut self, ticks: u32) {
        self.speed = -self.speed;
        self.advance_angle(ticks);
    }

    /// Point back at the anchor just left, as if the swing carried over to
    /// the new pivot.
    pub fn snap_to_opposite_angle(&mut self) {
        let flipped = if self.angle <= 180.0 {
            self.angle + 180.0
        } else {
            self.angle - 180.0
        };
        self.set_angle(flipped);
    }

    /// True when the truncated angle sits strictly inside (5, 85) mod 90,
    /// i.e. well away from any axis. Enemy wands only try to snap outside
    /// this window.
    pub fn is_between_right_angles(&self) -> bool {
        let quadrant = self.angle.trunc() as i32 % 90;
        quadrant > 5 && quadrant < 85
    }
}

/// Immovable bounce segment
#[derive(Debug, Clone)]
pub struct Wall {
    pub start: Vec2,
    pub end: Vec2,
}

/// Segment obstacle that eases open/closed when its field is pressed
#[derive(Debug, Clone)]
pub struct Gate {
    pub kind: u8,
    pub start: Vec2,
    pub end: Vec2,
    /// 0 = open, 1 = closed
    alpha: f32,
    target: f32,
}

impl Gate {
    pub fn new(kind: u8, start: Vec2, end: Vec2, open: bool) -> Self {
        let alpha = if open { 0.0 } else { 1.0 };
        Self {
            kind,
            start,
            end,
            alpha,
            target: alpha,
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_moving(&self) -> bool {
        self.alpha != self.target
    }

    /// Only a fully open gate lets wands through
    pub fn is_solid(&self) -> bool {
        self.alpha != 0.0
    }

    /// Start toward the opposite state. Ignored while already moving.
    pub fn trigger(&mut self) -> bool {
        if self.is_moving() {
            return false;
        }
        self.target = if self.alpha > 0.0 { 0.0 } else { 1.0 };
        true
    }

    pub fn ease(&mut self, step: f32) {
        if self.alpha < self.target {
            self.alpha = (self.alpha + step).min(self.target);
        } else if self.alpha > self.target {
            self.alpha = (self.alpha - step).max(self.target);
        }
    }
}

/// Pressure plate that triggers gates of the same kind
#[derive(Debug, Clone)]
pub struct Field {
    pub kind: u8,
    pub rect: Rect,
    locked: bool,
    countdown: u32,
}

impl Field {
    pub fn new(kind: u8, center: Vec2) -> Self {
        Self {
            kind,
            rect: Rect::around(center, FIELD_HALF_EXTENT),
            locked: false,
            countdown: 0,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Lock for `release_ticks`. False if already locked.
    pub fn press(&mut self, release_ticks: u32) -> bool {
        if self.locked {
            return false;
        }
        self.locked = true;
        self.countdown = release_ticks;
        true
    }

    /// Count down; true on the tick the field releases
    pub fn tick(&mut self) -> bool {
        if !self.locked {
            return false;
        }
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.locked = false;
            return true;
        }
        false
    }
}

/// Static hazard
#[derive(Debug, Clone)]
pub struct Spike {
    pub rect: Rect,
}

impl Spike {
    pub fn new(center: Vec2) -> Self {
        Self {
            rect: Rect::around(center, SPIKE_HALF_EXTENT),
        }
    }
}
