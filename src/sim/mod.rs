//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` per timer interval)
//! - Stable iteration order (arena order for anchors and wands)
//! - No rendering, audio or platform dependencies; effects are queued as events

pub mod entities;
pub mod geom;
pub mod level;
pub mod state;
pub mod tick;

pub use entities::{
    Anchor, AnchorId, AnchorKind, Control, Field, Gate, Spike, Wall, Wand, WandId, WandKind,
};
pub use geom::Rect;
pub use level::{LevelDescriptor, LoadError};
pub use state::{GameEvent, LevelState};
pub use tick::{Game, GamePhase, TickInput, tick};
