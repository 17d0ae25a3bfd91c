//! Spin Doctor headless runner
//!
//! Usage: `spin-doctor [level.json | builtin-name] [ticks] [seed]`
//!
//! Plays a level with the idle pilot, logging sounds and game events.
//! Set `RUST_LOG=info` (or `debug`) to see them.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::path::Path;

    use spin_doctor::audio::LogAudio;
    use spin_doctor::levels;
    use spin_doctor::pilot::IdlePilot;
    use spin_doctor::renderer::build_scene;
    use spin_doctor::sim::{Game, GameEvent, GamePhase, LevelDescriptor, tick};
    use spin_doctor::{AudioSink, Settings};

    const SETTINGS_FILE: &str = "spin-doctor.json";
    const DEFAULT_TICKS: u64 = 3000;
    const DEFAULT_SEED: u64 = 0x5eed;

    fn load_descriptor(arg: &str) -> Result<LevelDescriptor, Box<dyn Error>> {
        if arg.ends_with(".json") || Path::new(arg).is_file() {
            let json = std::fs::read_to_string(arg)?;
            let mut desc = LevelDescriptor::from_json(&json)?;
            if desc.name.is_empty() {
                desc.name = arg.to_string();
            }
            Ok(desc)
        } else {
            Ok(levels::builtin(arg)?)
        }
    }

    fn load_settings() -> Settings {
        if !Path::new(SETTINGS_FILE).exists() {
            return Settings::default();
        }
        match Settings::load_from(SETTINGS_FILE) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", SETTINGS_FILE);
                settings
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Settings::default()
            }
        }
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let mut level_key = args.next().unwrap_or_else(|| levels::first().to_string());
        let ticks: u64 = match args.next() {
            Some(n) => n.parse()?,
            None => DEFAULT_TICKS,
        };
        let seed: u64 = match args.next() {
            Some(n) => n.parse()?,
            None => DEFAULT_SEED,
        };

        let settings = load_settings();
        let mut game = Game::new(load_descriptor(&level_key)?, &settings)?;
        let mut audio = LogAudio::new(settings.muted);
        let mut pilot = IdlePilot::new(seed);

        log::info!(
            "Spin Doctor starting: level '{}', {} ticks at {} ms, seed {}",
            game.level_name(),
            ticks,
            settings.tick_interval_ms,
            seed
        );
        log::debug!("Death fade lasts {} ticks", settings.death_fade_ticks());

        let mut deaths = 0u32;
        for _ in 0..ticks {
            let input = pilot.next_input(&game);
            tick(&mut game, &input);

            for event in game.drain_events() {
                match event {
                    GameEvent::Sound(effect) => audio.play(effect),
                    GameEvent::Lost => {
                        deaths += 1;
                        log::info!("Lost (death #{})", deaths);
                    }
                    other => log::debug!("{:?}", other),
                }
            }

            if game.phase == GamePhase::Won {
                let Some(next) = levels::next_after(&level_key) else {
                    log::info!("No more levels");
                    break;
                };
                level_key = next.to_string();
                game.load_level(levels::builtin(next)?)?;
            }
        }

        log::info!(
            "Finished on '{}' after {} ticks: {} deaths, {} sounds, {} draw commands in last frame",
            game.level_name(),
            game.time_ticks,
            deaths,
            audio.played(),
            build_scene(&game).len()
        );
        for entry in &game.scores.entries {
            log::info!(
                "  {}: best {} ({} clears)",
                entry.level,
                entry.best,
                entry.clears
            );
        }
        log::info!("Total score: {}", game.scores.total());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    match native::run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("spin-doctor: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; a front end drives `sim::tick` itself
}
