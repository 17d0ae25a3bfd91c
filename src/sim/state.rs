//! Live level state and the rules that react to wand geometry
//!
//! Wands and anchors live in arenas addressed by `WandId`/`AnchorId`. Wand
//! slots never change during a level. Anchor slots are tombstoned when a
//! single-use anchor is consumed, so no handle is ever invalidated mid-tick.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::entities::*;
use super::geom::{close_enough, segment_rect_intersects, segments_intersect, too_far};
use super::level::{LevelDescriptor, LoadError};
use crate::audio::SoundEffect;
use crate::cell_to_world;
use crate::consts::*;

/// Things collaborators react to (sound, HUD, menus)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundEffect),
    ScoreChanged { score: u64 },
    AnchorRemoved(AnchorId),
    Won { score: u64 },
    Lost,
    Reloaded,
}

/// Entities of the level currently being played
#[derive(Debug, Clone)]
pub struct LevelState {
    anchors: Vec<Option<Anchor>>,
    wands: Vec<Wand>,
    pub walls: Vec<Wall>,
    pub gates: Vec<Gate>,
    pub fields: Vec<Field>,
    pub spikes: Vec<Spike>,
    /// Points collected on this attempt
    pub score: u64,
    events: Vec<GameEvent>,
}

impl LevelState {
    /// Build a level, rejecting malformed descriptors up front
    pub fn load(desc: &LevelDescriptor) -> Result<Self, LoadError> {
        desc.validate_grid()?;

        // Row-major scan; this order is also the latch tie-break order
        let mut anchors = Vec::new();
        for (y, row) in desc.grid.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                if cell == 0 {
                    continue;
                }
                let code = cell & MASK_TYPE;
                let kind = AnchorKind::from_code(code)
                    .ok_or(LoadError::UnknownAnchorType { x, y, code })?;
                let ephemeral = cell & MASK_EPHEMERAL != 0;
                anchors.push(Anchor::new(IVec2::new(x as i32, y as i32), kind, ephemeral));
            }
        }

        for extra in &desc.anchors {
            let cell = IVec2::new(extra.x, extra.y);
            let anchor = anchors
                .iter_mut()
                .find(|a| a.cell == cell)
                .ok_or(LoadError::OverrideWithoutAnchor {
                    x: extra.x,
                    y: extra.y,
                })?;
            if let Some(teleport_id) = extra.teleport_id {
                anchor.teleport_id = teleport_id;
            }
            if let Some(points) = extra.points {
                anchor.points = points;
            }
        }

        for (i, anchor) in anchors.iter().enumerate() {
            if anchor.kind != AnchorKind::Teleport {
                continue;
            }
            let paired = anchors.iter().enumerate().any(|(j, other)| {
                j != i
                    && other.kind == AnchorKind::Teleport
                    && other.teleport_channel() == anchor.teleport_channel()
            });
            if !paired {
                return Err(LoadError::UnpairedTeleport {
                    x: anchor.cell.x,
                    y: anchor.cell.y,
                    teleport_id: anchor.teleport_id,
                });
            }
        }

        if desc.wands.is_empty() {
            return Err(LoadError::NoPlayerWand);
        }
        let mut wands = Vec::with_capacity(desc.wands.len());
        let mut starts = Vec::with_capacity(desc.wands.len());
        for (index, placement) in desc.wands.iter().enumerate() {
            let kind = WandKind::from_code(placement.kind).ok_or(LoadError::UnknownWandType {
                index,
                code: placement.kind,
            })?;
            let cell = IVec2::new(placement.x, placement.y);
            let start = anchors
                .iter()
                .position(|a| a.cell == cell)
                .ok_or(LoadError::WandWithoutAnchor {
                    index,
                    x: placement.x,
                    y: placement.y,
                })?;
            wands.push(Wand::new(
                kind,
                anchors[start].pos,
                placement.angle,
                placement.speed,
            ));
            starts.push(AnchorId(start));
        }

        // Wall endpoints snap toward zero to whole world units
        let walls = desc
            .walls
            .iter()
            .map(|w| Wall {
                start: cell_to_world(w.x1, w.y1).trunc(),
                end: cell_to_world(w.x2, w.y2).trunc(),
            })
            .collect();

        let fields: Vec<Field> = desc
            .fields
            .iter()
            .map(|f| Field::new(f.kind, cell_to_world(f.x, f.y)))
            .collect();

        let mut gates = Vec::with_capacity(desc.gates.len());
        for (index, g) in desc.gates.iter().enumerate() {
            if !fields.iter().any(|f| f.kind == g.kind) {
                return Err(LoadError::GateWithoutField {
                    index,
                    kind: g.kind,
                });
            }
            gates.push(Gate::new(
                g.kind,
                cell_to_world(g.x1, g.y1),
                cell_to_world(g.x2, g.y2),
                g.open,
            ));
        }
        for field in &fields {
            if !gates.iter().any(|g| g.kind == field.kind) {
                log::warn!("Field of type {} has no gate to switch", field.kind);
            }
        }

        let spikes = desc
            .spikes
            .iter()
            .map(|s| Spike::new(cell_to_world(s.x, s.y)))
            .collect();

        let mut state = Self {
            anchors: anchors.into_iter().map(Some).collect(),
            wands,
            walls,
            gates,
            fields,
            spikes,
            score: 0,
            events: Vec::new(),
        };

        for (index, anchor) in starts.into_iter().enumerate() {
            state.attach(WandId(index), anchor);
        }

        log::info!(
            "Loaded level '{}': {} anchors, {} wands, {} walls, {} gates, {} spikes",
            desc.name,
            state.anchor_count(),
            state.wands.len(),
            state.walls.len(),
            state.gates.len(),
            state.spikes.len()
        );

        Ok(state)
    }

    // --- Accessors ---

    /// Live anchors in arena order
    pub fn anchors(&self) -> impl Iterator<Item = (AnchorId, &Anchor)> {
        self.anchors
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|a| (AnchorId(i), a)))
    }

    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(id.0).and_then(Option::as_ref)
    }

    fn anchor_mut(&mut self, id: AnchorId) -> Option<&mut Anchor> {
        self.anchors.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.iter().flatten().count()
    }

    pub fn wands(&self) -> &[Wand] {
        &self.wands
    }

    pub fn wand(&self, id: WandId) -> Option<&Wand> {
        self.wands.get(id.0)
    }

    pub fn wand_mut(&mut self, id: WandId) -> Option<&mut Wand> {
        self.wands.get_mut(id.0)
    }

    /// The player's wand (always present once loaded)
    pub fn player(&self) -> &Wand {
        &self.wands[WandId::PLAYER.0]
    }

    pub fn player_mut(&mut self) -> &mut Wand {
        &mut self.wands[WandId::PLAYER.0]
    }

    // --- Events ---

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play(&mut self, effect: SoundEffect) {
        self.emit(GameEvent::Sound(effect));
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Simulation ---

    /// One step of rotation, gate easing and field countdowns
    pub fn tick(&mut self) {
        for wand in &mut self.wands {
            wand.advance_angle(1);
        }
        for gate in &mut self.gates {
            gate.ease(GATE_ALPHA_STEP);
        }
        for field in &mut self.fields {
            if field.tick() {
                log::debug!("Field of type {} released", field.kind);
            }
        }
    }

    /// Has the player touched anything deadly?
    pub fn player_hits_bad(&self) -> bool {
        let player = self.player();

        // Same pivot: any two wands on the player's anchor too close together
        if let Some(shared) = self
            .current_anchor_id_for(WandId::PLAYER)
            .and_then(|id| self.anchor(id))
        {
            let on_anchor = shared.wands();
            for (i, &a) in on_anchor.iter().enumerate() {
                for &b in &on_anchor[i + 1..] {
                    let gap = (self.wands[a.0].angle() - self.wands[b.0].angle()).abs();
                    if gap < SHARED_ANCHOR_MIN_SEPARATION
                        || gap > 360.0 - SHARED_ANCHOR_MIN_SEPARATION
                    {
                        return true;
                    }
                }
            }
        }

        let (start, end) = player.segment();
        let short_end = player.tip(WAND_SHORTEN);
        for other in self.wands.iter().skip(1) {
            if too_far(start, other.pivot()) {
                continue;
            }
            if segments_intersect(start, short_end, other.pivot(), other.tip(WAND_SHORTEN)) {
                return true;
            }
            // Head-on from adjacent anchors: collinear, so the crossing test misses it
            if close_enough(start, other.destination()) && close_enough(end, other.pivot()) {
                return true;
            }
        }

        self.spikes
            .iter()
            .any(|s| segment_rect_intersects(start, end, s.rect.min, s.rect.max))
    }

    /// Player against walls and closed gates; a hit pushes the wand back
    pub fn player_hits_bounceable(&mut self) -> bool {
        let (start, end) = self.player().segment();
        let hit = self
            .walls
            .iter()
            .any(|w| segments_intersect(start, end, w.start, w.end))
            || self
                .gates
                .iter()
                .any(|g| g.is_solid() && segments_intersect(start, end, g.start, g.end));

        if hit {
            self.player_mut().reverse(BOUNCE_BACKOFF_TICKS);
        }
        hit
    }

    /// Press the first unlocked field the player overlaps, switching its gates
    pub fn player_enters_field(&mut self) -> bool {
        let (start, end) = self.player().segment();
        let Some(index) = self.fields.iter().position(|f| {
            !f.is_locked() && segment_rect_intersects(start, end, f.rect.min, f.rect.max)
        }) else {
            return false;
        };

        let field = &mut self.fields[index];
        field.press(FIELD_RELEASE_TICKS);
        let kind = field.kind;
        self.events.push(GameEvent::Sound(SoundEffect::ButtonClick));

        for gate in self.gates.iter_mut().filter(|g| g.kind == kind) {
            if gate.trigger() {
                self.events.push(GameEvent::Sound(SoundEffect::GateSwitch));
            }
        }
        log::debug!("Field {} pressed (type {})", index, kind);
        true
    }

    /// First anchor (arena order) under the wand's tip
    pub fn latchable_anchor_id_for(&self, wand: WandId) -> Option<AnchorId> {
        let tip = self.wand(wand)?.destination();
        self.anchors()
            .find(|(_, a)| close_enough(a.pos, tip))
            .map(|(id, _)| id)
    }

    /// Anchor the wand is attached to
    pub fn current_anchor_id_for(&self, wand: WandId) -> Option<AnchorId> {
        self.anchors()
            .find(|(_, a)| a.has_wand(wand))
            .map(|(id, _)| id)
    }

    /// Other live teleport anchor on the same channel
    pub fn teleport_partner(&self, id: AnchorId) -> Option<AnchorId> {
        let channel = self.anchor(id)?.teleport_channel();
        self.anchors()
            .find(|&(other, a)| {
                other != id && a.kind == AnchorKind::Teleport && a.teleport_channel() == channel
            })
            .map(|(other, _)| other)
    }

    fn attach(&mut self, wand: WandId, id: AnchorId) {
        let Some(anchor) = self.anchor_mut(id) else {
            return;
        };
        let pos = anchor.pos;
        let awarded = anchor.attach_wand(wand);
        self.wands[wand.0].set_pivot(pos);

        if awarded > 0 {
            self.score += u64::from(awarded);
            self.play(SoundEffect::Points);
            let score = self.score;
            self.emit(GameEvent::ScoreChanged { score });
        }
    }

    /// Transfer a wand from `origin` to `target` (following teleports).
    /// Returns the anchor the wand actually ended up on.
    pub fn move_wand(&mut self, wand: WandId, origin: AnchorId, target: AnchorId) -> Option<AnchorId> {
        if wand.0 >= self.wands.len() {
            return None;
        }
        let mut target = target;
        if self.anchor(target)?.kind == AnchorKind::Teleport {
            target = self.teleport_partner(target).unwrap_or(target);
        }

        if let Some(anchor) = self.anchor_mut(origin) {
            anchor.detach_wand(wand);
        }
        self.attach(wand, target);

        let consumed = wand.is_player()
            && origin != target
            && self
                .anchor(origin)
                .is_some_and(|a| a.ephemeral && a.ephemeral_locked);
        if consumed {
            self.anchors[origin.0] = None;
            self.emit(GameEvent::AnchorRemoved(origin));
            log::debug!("Single-use anchor {:?} consumed", origin);
        }

        let moved = &mut self.wands[wand.0];
        moved.snap_to_opposite_angle();
        if moved.control == Control::Swing {
            moved.reverse(1);
        }
        Some(target)
    }

    /// Autonomous wands: snap or bounce on anchors of their own kind
    pub fn process_wands(&mut self) {
        for index in 1..self.wands.len() {
            let id = WandId(index);
            let wand = &self.wands[index];
            if wand.is_between_right_angles() {
                continue;
            }
            let (code, control) = (wand.kind.code(), wand.control);

            let Some(target) = self.latchable_anchor_id_for(id) else {
                continue;
            };
            if self.anchor(target).map(|a| a.kind.code()) != Some(code) {
                continue;
            }

            match control {
                Control::Swing | Control::Latch => {
                    let Some(origin) = self.current_anchor_id_for(id) else {
                        log::debug!("Wand {} has no anchor to leave", index);
                        continue;
                    };
                    self.move_wand(id, origin, target);
                }
                Control::Bounce => self.wands[index].reverse(1),
                Control::Free => {}
            }
        }
    }
}
