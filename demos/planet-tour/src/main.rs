//! Headless tour of the home-to-planet flow on the in-memory engine.
//!
//! Run with `RUST_LOG=debug` to see every lookup step.

use log::{error, info};
use scene_nav::{NavConfig, NavError, NavInput, NavRunner, SceneCatalog, SceneId, SimEngine};

const CATALOG: &str = include_str!("../assets/catalog.json");
const NAV_CONFIG: &str = include_str!("../assets/nav.json");
const MAX_TICKS: u32 = 120;

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Err(err) = run() {
        error!("planet-tour failed: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), NavError> {
    let catalog = SceneCatalog::from_json(CATALOG)?;
    let config = NavConfig::from_json(NAV_CONFIG)?;

    let mut engine = SimEngine::new(catalog).with_latency(3).with_session();
    engine.boot(config.home_scene.clone());

    let mut runner = NavRunner::new(engine, config);
    runner.init();

    let steps = [
        NavInput::Planet(SceneId::from("Mars")),
        NavInput::Planet(SceneId::from("Venus")),
        NavInput::Back,
        NavInput::Planet(SceneId::from("Neptune")),
        NavInput::KeyDown { key_code: runner.config().back_key_code },
        NavInput::Planet(SceneId::from("Mars")),
        NavInput::Home,
    ];

    for input in steps {
        info!("> {:?}", input);
        runner.push_input(input);
        let ticks = runner.run_until_idle(MAX_TICKS);

        let controller = runner.controller_mut()?;
        for report in controller.take_reports() {
            error!("  reported: {}", report);
        }
        let planet = controller.current_planet().cloned();
        let phase = controller.phase();
        let loaded: Vec<&str> = runner.host().loaded_scenes().iter().map(|s| s.as_str()).collect();
        info!(
            "  {:?} after {:?} ticks, planet {:?}, loaded {:?}",
            phase, ticks, planet, loaded
        );
    }

    info!("tour finished in {} frames", runner.frame());
    Ok(())
}
