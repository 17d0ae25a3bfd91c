//! Fixed-interval game loop
//!
//! One call to `tick` is one timer callback. The normal update loop and the
//! death fade are two phases of the same `Game`, so only one of them can ever
//! be running; loading a level replaces the phase outright.

use serde::{Deserialize, Serialize};

use super::entities::{AnchorKind, Control, WandId};
use super::level::{LevelDescriptor, LoadError};
use super::state::{GameEvent, LevelState};
use crate::audio::SoundEffect;
use crate::scores::ScoreBook;
use crate::settings::Settings;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Flip the player's direction (one-shot)
    pub reverse: bool,
    /// Held control mode
    pub control: Control,
}

/// Which loop is live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal update loop
    Playing,
    /// Death fade; the level reloads when `frame` reaches the fade maximum
    Dying { frame: u32 },
    /// Exit reached, waiting for the next level
    Won,
}

/// Level state plus everything the loop needs around it
#[derive(Debug, Clone)]
pub struct Game {
    descriptor: LevelDescriptor,
    /// Freshly loaded copy, restored on death
    pristine: LevelState,
    pub state: LevelState,
    pub phase: GamePhase,
    pub scores: ScoreBook,
    /// Ticks since the current level was loaded
    pub time_ticks: u64,
    fade_max: u32,
    fade_step: u32,
}

impl Game {
    pub fn new(descriptor: LevelDescriptor, settings: &Settings) -> Result<Self, LoadError> {
        let state = LevelState::load(&descriptor)?;
        Ok(Self {
            descriptor,
            pristine: quiet_copy(&state),
            state,
            phase: GamePhase::Playing,
            scores: ScoreBook::new(),
            time_ticks: 0,
            fade_max: settings.death_fade_max.max(1),
            fade_step: settings.death_fade_step.max(1),
        })
    }

    /// Switch to another level, abandoning whatever was running
    pub fn load_level(&mut self, descriptor: LevelDescriptor) -> Result<(), LoadError> {
        let state = LevelState::load(&descriptor)?;
        self.descriptor = descriptor;
        self.pristine = quiet_copy(&state);
        self.state = state;
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        Ok(())
    }

    /// Start the current level over (score for this attempt is lost)
    pub fn restart(&mut self) {
        self.state = self.pristine.clone();
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
    }

    pub fn level_name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &LevelDescriptor {
        &self.descriptor
    }

    /// Remaining opacity of the dying wand (1 → 0), if dying
    pub fn death_fade(&self) -> Option<f32> {
        match self.phase {
            GamePhase::Dying { frame } => {
                let left = self.fade_max - frame.min(self.fade_max);
                Some(left as f32 / self.fade_max as f32)
            }
            _ => None,
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}

/// Copy of a freshly loaded level without its load-time events, so a reload
/// replays nothing
fn quiet_copy(state: &LevelState) -> LevelState {
    let mut copy = state.clone();
    copy.drain_events();
    copy
}

/// Advance the game by one timer interval
pub fn tick(game: &mut Game, input: &TickInput) {
    match game.phase {
        GamePhase::Won => {}
        GamePhase::Dying { frame } => {
            game.time_ticks += 1;
            if frame >= game.fade_max {
                log::info!("Reloading level '{}'", game.level_name());
                game.restart();
                game.state.emit(GameEvent::Reloaded);
            } else {
                game.phase = GamePhase::Dying {
                    frame: frame + game.fade_step,
                };
            }
        }
        GamePhase::Playing => {
            game.time_ticks += 1;
            play_step(game, input);
        }
    }
}

fn play_step(game: &mut Game, input: &TickInput) {
    let state = &mut game.state;

    if input.reverse {
        state.play(SoundEffect::Switch);
        state.player_mut().reverse(1);
    }
    state.player_mut().control = input.control;

    state.tick();

    if state.player_hits_bad() {
        state.play(SoundEffect::Lose);
        state.emit(GameEvent::Lost);
        game.phase = GamePhase::Dying { frame: 0 };
        log::info!("Player hit a hazard after {} ticks", game.time_ticks);
        return;
    }

    if state.player_hits_bounceable() {
        state.play(SoundEffect::Bounce);
    }

    state.player_enters_field();

    if resolve_player_target(state) {
        let score = state.score;
        state.emit(GameEvent::Won { score });
        let best = game.scores.bank(&game.descriptor.name, score);
        game.phase = GamePhase::Won;
        log::info!(
            "Level '{}' cleared with {} points{}",
            game.descriptor.name,
            score,
            if best { " (new best)" } else { "" }
        );
        return;
    }

    state.process_wands();
}

/// React to the player's tip landing on an anchor. True if it was the exit.
fn resolve_player_target(state: &mut LevelState) -> bool {
    let Some(target) = state.latchable_anchor_id_for(WandId::PLAYER) else {
        return false;
    };
    let Some(kind) = state.anchor(target).map(|a| a.kind) else {
        return false;
    };

    match state.player().control {
        Control::Swing | Control::Latch => {
            if kind == AnchorKind::Exit {
                state.play(SoundEffect::Win);
                return true;
            }
            state.play(if kind == AnchorKind::Teleport {
                SoundEffect::Teleport
            } else {
                SoundEffect::Latch
            });
            match state.current_anchor_id_for(WandId::PLAYER) {
                Some(origin) => {
                    state.move_wand(WandId::PLAYER, origin, target);
                }
                None => log::warn!("Player wand is not attached to any anchor"),
            }
        }
        Control::Bounce => {
            state.play(SoundEffect::Bounce);
            state.player_mut().reverse(1);
        }
        Control::Free => state.play(SoundEffect::Pass),
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::AnchorId;
    use glam::Vec2;

    fn game(json: &str) -> Game {
        Game::new(LevelDescriptor::from_json(json).unwrap(), &Settings::default()).unwrap()
    }

    fn held(control: Control) -> TickInput {
        TickInput {
            control,
            ..Default::default()
        }
    }

    fn sounds(events: &[GameEvent]) -> Vec<SoundEffect> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Sound(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_latch_onto_exit_wins() {
        let mut game = game(
            r#"{ "name": "first", "grid": [[1, 9]],
                 "wands": [{ "x": 0, "y": 0, "type": 1, "angle": 357 }] }"#,
        );
        let input = held(Control::Latch);

        tick(&mut game, &input);
        assert_eq!(game.phase, GamePhase::Playing);
        tick(&mut game, &input);
        assert_eq!(game.phase, GamePhase::Won);

        let events = game.drain_events();
        assert!(sounds(&events).contains(&SoundEffect::Win));
        assert!(events.contains(&GameEvent::Won { score: 0 }));
        assert_eq!(game.scores.best("first"), Some(0));

        // Nothing moves once won
        let angle = game.state.player().angle();
        tick(&mut game, &input);
        assert_eq!(game.state.player().angle(), angle);
        assert_eq!(game.phase, GamePhase::Won);
    }

    #[test]
    fn test_free_control_passes_over() {
        let mut game = game(
            r#"{ "grid": [[1, 9]], "wands": [{ "x": 0, "y": 0, "type": 1, "angle": 358.5 }] }"#,
        );
        tick(&mut game, &held(Control::Free));
        assert_eq!(game.phase, GamePhase::Playing);
        assert_eq!(sounds(&game.drain_events()), vec![SoundEffect::Pass]);
        assert_eq!(game.state.player().pivot(), Vec2::ZERO);
    }

    #[test]
    fn test_latch_moves_pivot() {
        let mut game = game(
            r#"{ "grid": [[1, 1]], "wands": [{ "x": 0, "y": 0, "type": 1, "angle": 358.5 }] }"#,
        );
        tick(&mut game, &held(Control::Swing));
        assert_eq!(sounds(&game.drain_events()), vec![SoundEffect::Latch]);
        assert_eq!(game.state.player().pivot(), Vec2::new(64.0, 0.0));
        assert!(game.state.player().speed() < 0.0);
        assert_eq!(
            game.state.current_anchor_id_for(WandId::PLAYER),
            Some(AnchorId(1))
        );
    }

    #[test]
    fn test_teleport_sound_and_relocation() {
        let mut game = game(
            r#"{ "grid": [[1, 5, 0, 5]],
                 "anchors": [{ "x": 1, "y": 0, "teleId": 1 }, { "x": 3, "y": 0, "teleId": 11 }],
                 "wands": [{ "x": 0, "y": 0, "type": 1, "angle": 358.5 }] }"#,
        );
        tick(&mut game, &held(Control::Latch));
        assert_eq!(sounds(&game.drain_events()), vec![SoundEffect::Teleport]);
        assert_eq!(game.state.player().pivot(), Vec2::new(192.0, 0.0));
    }

    #[test]
    fn test_bounce_control_reverses_in_place() {
        let mut game = game(
            r#"{ "grid": [[1, 1]], "wands": [{ "x": 0, "y": 0, "type": 1, "angle": 358.5 }] }"#,
        );
        tick(&mut game, &held(Control::Bounce));
        assert_eq!(sounds(&game.drain_events()), vec![SoundEffect::Bounce]);
        assert_eq!(game.state.player().pivot(), Vec2::ZERO);
        assert!(game.state.player().speed() < 0.0);
    }

    #[test]
    fn test_reverse_command() {
        let mut game = game(r#"{ "grid": [[1]], "wands": [{ "x": 0, "y": 0, "type": 1, "angle": 90 }] }"#);
        let input = TickInput {
            reverse: true,
            control: Control::Free,
        };
        tick(&mut game, &input);
        assert_eq!(sounds(&game.drain_events()), vec![SoundEffect::Switch]);
        assert!(game.state.player().speed() < 0.0);
        // reverse(1) then the regular tick step
        assert!((game.state.player().angle() - 87.0).abs() < 1e-4);
    }

    #[test]
    fn test_death_fades_then_reloads() {
        let mut game = game(
            r#"{ "grid": [[1]],
                 "wands": [{ "x": 0, "y": 0, "type": 1, "angle": 0 },
                           { "x": 0, "y": 0, "type": 2, "angle": 30 }] }"#,
        );
        tick(&mut game, &TickInput::default());
        assert_eq!(game.phase, GamePhase::Dying { frame: 0 });
        assert_eq!(game.death_fade(), Some(1.0));
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::Lost));
        assert!(sounds(&events).contains(&SoundEffect::Lose));

        let mut fade_ticks = 0;
        while game.phase != GamePhase::Playing {
            tick(&mut game, &TickInput::default());
            fade_ticks += 1;
            assert!(fade_ticks < 200, "death fade never finished");
        }
        assert!(game.drain_events().contains(&GameEvent::Reloaded));
        assert_eq!(game.state.player().angle(), 0.0);
        assert_eq!(game.death_fade(), None);
    }

    #[test]
    fn test_reload_resets_score() {
        let mut game = game(
            r#"{ "grid": [[1, 1]], "anchors": [{ "x": 1, "y": 0, "points": 1000 }],
                 "wands": [{ "x": 0, "y": 0, "type": 1, "angle": 358.5 }],
                 "spikes": [{ "x": 1, "y": 1 }] }"#,
        );
        tick(&mut game, &held(Control::Latch));
        assert_eq!(game.state.score, 1000);

        // Swing the latched wand straight down into the spike
        game.state.player_mut().set_angle(88.5);
        tick(&mut game, &held(Control::Latch));
        assert!(matches!(game.phase, GamePhase::Dying { .. }));

        while game.phase != GamePhase::Playing {
            tick(&mut game, &TickInput::default());
        }
        assert_eq!(game.state.score, 0);
        assert_eq!(game.state.player().pivot(), Vec2::ZERO);
        assert_eq!(game.state.anchor(AnchorId(1)).unwrap().points, 1000);
    }

    #[test]
    fn test_reload_is_silent() {
        let mut game = game(
            r#"{ "grid": [[1]], "anchors": [{ "x": 0, "y": 0, "points": 500 }],
                 "wands": [{ "x": 0, "y": 0, "type": 1 }, { "x": 0, "y": 0, "type": 2, "angle": 20 }] }"#,
        );
        let loaded = game.drain_events();
        assert!(loaded.contains(&GameEvent::Sound(SoundEffect::Points)));
        assert!(loaded.contains(&GameEvent::ScoreChanged { score: 500 }));

        tick(&mut game, &TickInput::default());
        assert!(matches!(game.phase, GamePhase::Dying { .. }));
        game.drain_events();

        let mut during_fade = Vec::new();
        while game.phase != GamePhase::Playing {
            tick(&mut game, &TickInput::default());
            during_fade.extend(game.drain_events());
        }
        assert_eq!(during_fade, vec![GameEvent::Reloaded]);
        assert_eq!(game.state.score, 500);
    }

    #[test]
    fn test_load_level_cancels_death() {
        let mut game = game(
            r#"{ "grid": [[1]],
                 "wands": [{ "x": 0, "y": 0, "type": 1 }, { "x": 0, "y": 0, "type": 2, "angle": 10 }] }"#,
        );
        tick(&mut game, &TickInput::default());
        assert!(matches!(game.phase, GamePhase::Dying { .. }));

        let next = LevelDescriptor::from_json(
            r#"{ "name": "next", "grid": [[1, 9]], "wands": [{ "x": 0, "y": 0, "type": 1 }] }"#,
        )
        .unwrap();
        game.load_level(next).unwrap();
        assert_eq!(game.phase, GamePhase::Playing);
        assert_eq!(game.level_name(), "next");
        assert_eq!(game.time_ticks, 0);
    }

    #[test]
    fn test_load_level_error_keeps_current() {
        let mut game = game(r#"{ "name": "keep", "grid": [[1]], "wands": [{ "x": 0, "y": 0, "type": 1 }] }"#);
        let broken = LevelDescriptor::from_json(
            r#"{ "grid": [[1]], "wands": [{ "x": 3, "y": 3, "type": 1 }] }"#,
        )
        .unwrap();
        assert!(game.load_level(broken).is_err());
        assert_eq!(game.level_name(), "keep");
    }

    #[test]
    fn test_enemies_move_during_play() {
        let mut game = game(
            r#"{ "grid": [[2, 2, 0, 0, 1]],
                 "wands": [{ "x": 4, "y": 0, "type": 1, "angle": 90 },
                           { "x": 0, "y": 0, "type": 2, "angle": 358.5 }] }"#,
        );
        tick(&mut game, &TickInput::default());
        assert_eq!(
            game.state.current_anchor_id_for(WandId(1)),
            Some(AnchorId(1))
        );
        // Enemy latching is silent
        assert!(game.drain_events().is_empty());
    }
}
