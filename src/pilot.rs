//! Idle/demo input driver
//!
//! Holds Latch and now and then flips direction. Seeded, so a run with the
//! same seed replays tick for tick.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{Control, Game, GamePhase, TickInput};

/// Chance per tick of a reverse command
pub const REVERSE_CHANCE: f64 = 0.02;
/// Minimum ticks between two reverses
pub const REVERSE_COOLDOWN_TICKS: u32 = 30;

#[derive(Debug, Clone)]
pub struct IdlePilot {
    rng: Pcg32,
    cooldown: u32,
}

impl IdlePilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            cooldown: REVERSE_COOLDOWN_TICKS,
        }
    }

    /// Input for the next tick of `game`
    pub fn next_input(&mut self, game: &Game) -> TickInput {
        let mut input = TickInput {
            reverse: false,
            control: Control::Latch,
        };
        if game.phase != GamePhase::Playing {
            return input;
        }

        if self.cooldown > 0 {
            self.cooldown -= 1;
        } else if self.rng.random_bool(REVERSE_CHANCE) {
            input.reverse = true;
            self.cooldown = REVERSE_COOLDOWN_TICKS;
            log::debug!("Pilot reversing at tick {}", game.time_ticks);
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels;
    use crate::settings::Settings;
    use crate::sim::tick;

    fn intro() -> Game {
        Game::new(levels::builtin("intro").unwrap(), &Settings::default()).unwrap()
    }

    fn record(seed: u64, ticks: usize) -> Vec<TickInput> {
        let mut game = intro();
        let mut pilot = IdlePilot::new(seed);
        (0..ticks)
            .map(|_| {
                let input = pilot.next_input(&game);
                tick(&mut game, &input);
                input
            })
            .collect()
    }

    #[test]
    fn test_same_seed_same_inputs() {
        assert_eq!(record(7, 600), record(7, 600));
    }

    #[test]
    fn test_always_latches_and_respects_cooldown() {
        let inputs = record(99, 2000);
        assert!(inputs.iter().all(|i| i.control == Control::Latch));
        let reverses: Vec<usize> = inputs
            .iter()
            .enumerate()
            .filter(|(_, i)| i.reverse)
            .map(|(n, _)| n)
            .collect();
        for pair in reverses.windows(2) {
            assert!(pair[1] - pair[0] > REVERSE_COOLDOWN_TICKS as usize);
        }
        if let Some(&first) = reverses.first() {
            assert!(first >= REVERSE_COOLDOWN_TICKS as usize);
        }
    }

    #[test]
    fn test_no_reverse_outside_play() {
        let mut game = intro();
        game.phase = GamePhase::Won;
        let mut pilot = IdlePilot {
            rng: Pcg32::seed_from_u64(1),
            cooldown: 0,
        };
        for _ in 0..500 {
            assert!(!pilot.next_input(&game).reverse);
        }
    }
}
