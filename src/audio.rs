//! Sound effect triggers
//!
//! The simulation never plays audio itself. It queues `SoundEffect`s as
//! events; whoever owns the speakers implements `AudioSink`.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player wand hit a wall/gate, or bounced off an anchor
    Bounce,
    /// Player wand latched onto an anchor
    Latch,
    /// Player wand swept over an anchor without latching
    Pass,
    /// Player reversed direction
    Switch,
    /// Player reached the exit
    Win,
    /// Player hit something bad
    Lose,
    /// Player arrived on a teleport anchor
    Teleport,
    /// Bonus points collected
    Points,
    /// Field pressed
    ButtonClick,
    /// Gate started moving
    GateSwitch,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 10] = [
        SoundEffect::Bounce,
        SoundEffect::Latch,
        SoundEffect::Pass,
        SoundEffect::Switch,
        SoundEffect::Win,
        SoundEffect::Lose,
        SoundEffect::Teleport,
        SoundEffect::Points,
        SoundEffect::ButtonClick,
        SoundEffect::GateSwitch,
    ];

    /// Asset key, matching the `snd/<key>.ogg` files
    pub fn key(&self) -> &'static str {
        match self {
            SoundEffect::Bounce => "bounce",
            SoundEffect::Latch => "latch",
            SoundEffect::Pass => "pass",
            SoundEffect::Switch => "switch",
            SoundEffect::Win => "win",
            SoundEffect::Lose => "lose",
            SoundEffect::Teleport => "teleport",
            SoundEffect::Points => "points",
            SoundEffect::ButtonClick => "buttonclick",
            SoundEffect::GateSwitch => "gateswitch",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.key() == key)
    }
}

/// Anything that can play sound effects
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Sink that writes each effect to the log (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio {
    muted: bool,
    played: u64,
}

impl LogAudio {
    pub fn new(muted: bool) -> Self {
        Self { muted, played: 0 }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Effects played since creation (muted ones excluded)
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        self.played += 1;
        log::info!("♪ {}", effect.key());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_unique_and_reversible() {
        for effect in SoundEffect::ALL {
            assert_eq!(SoundEffect::from_key(effect.key()), Some(effect));
        }
        assert_eq!(SoundEffect::from_key("explode"), None);
    }

    #[test]
    fn test_log_audio_mute() {
        let mut sink = LogAudio::new(false);
        sink.play(SoundEffect::Latch);
        sink.set_muted(true);
        sink.play(SoundEffect::Win);
        assert_eq!(sink.played(), 1);
    }
}
