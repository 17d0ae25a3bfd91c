//! Declarative level descriptors
//!
//! Levels are authored as JSON. Coordinates are in grid units; the state
//! loader scales them to world space. Grid cells pack the anchor kind in the
//! low four bits and the single-use flag in bit value 16.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::WAND_SPEED;

/// Errors raised while turning a descriptor into a playable level.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("level JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level grid is empty")]
    EmptyGrid,
    #[error("grid row {row} has {actual} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("cell ({x}, {y}) has unknown anchor type {code}")]
    UnknownAnchorType { x: usize, y: usize, code: u8 },
    #[error("anchor override at ({x}, {y}) does not sit on an anchor")]
    OverrideWithoutAnchor { x: i32, y: i32 },
    #[error("teleport anchor at ({x}, {y}) with id {teleport_id} has no partner")]
    UnpairedTeleport { x: i32, y: i32, teleport_id: u32 },
    #[error("level has no wands; the first wand is the player")]
    NoPlayerWand,
    #[error("wand {index} has unknown type {code}")]
    UnknownWandType { index: usize, code: u8 },
    #[error("wand {index} starts at ({x}, {y}) where there is no anchor")]
    WandWithoutAnchor { index: usize, x: i32, y: i32 },
    #[error("gate {index} of type {kind} has no field of the same type")]
    GateWithoutField { index: usize, kind: u8 },
    #[error("no built-in level named '{0}'")]
    UnknownLevel(String),
}

/// Sparse per-anchor extras keyed by grid cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnchorOverride {
    pub x: i32,
    pub y: i32,
    #[serde(default, alias = "teleId", skip_serializing_if = "Option::is_none")]
    pub teleport_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
}

fn default_speed() -> f32 {
    WAND_SPEED
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WandPlacement {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub kind: u8,
    /// Starting angle in degrees
    #[serde(default)]
    pub angle: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallPlacement {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPlacement {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type")]
    pub kind: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatePlacement {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    #[serde(rename = "type")]
    pub kind: u8,
    /// Start fully open instead of closed
    #[serde(default)]
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikePlacement {
    pub x: f32,
    pub y: f32,
}

/// Everything needed to (re)build a level from scratch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    #[serde(default)]
    pub name: String,
    pub grid: Vec<Vec<u8>>,
    #[serde(default)]
    pub anchors: Vec<AnchorOverride>,
    pub wands: Vec<WandPlacement>,
    #[serde(default)]
    pub walls: Vec<WallPlacement>,
    #[serde(default)]
    pub fields: Vec<FieldPlacement>,
    #[serde(default)]
    pub gates: Vec<GatePlacement>,
    #[serde(default)]
    pub spikes: Vec<SpikePlacement>,
}

impl LevelDescriptor {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn height(&self) -> usize {
        self.grid.len()
    }

    pub fn width(&self) -> usize {
        self.grid.first().map(Vec::len).unwrap_or(0)
    }

    /// Check the grid is non-empty and rectangular; returns its width
    pub fn validate_grid(&self) -> Result<usize, LoadError> {
        let width = self.width();
        if width == 0 {
            return Err(LoadError::EmptyGrid);
        }
        for (row, cells) in self.grid.iter().enumerate() {
            if cells.len() != width {
                return Err(LoadError::RaggedGrid {
                    row,
                    expected: width,
                    actual: cells.len(),
                });
            }
        }
        Ok(width)
    }
}
