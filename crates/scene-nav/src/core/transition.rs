// core/transition.rs
//
// Transition sequences as explicit state machines.
// Each `advance` call runs steps until the sequence must wait: for an engine
// operation to complete, or for the next tick. Steps never run out of order.

use std::task::Poll;
use log::{error, info, warn};
use crate::api::config::NavConfig;
use crate::api::host::Host;
use crate::api::types::{LoadMode, OpId, OpStatus, SceneId, UiHandle, UiRole};
use crate::core::resolve::resolve_ui;
use crate::error::{NavError, SceneOpKind};

/// Navigation state owned by the controller.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    /// The additively loaded planet scene. At most one at a time.
    pub current_planet: Option<SceneId>,
    /// Home UI root, resolved lazily.
    pub home_ui: Option<UiHandle>,
    /// Planet UI root. Only set while `current_planet` is set.
    pub planet_ui: Option<UiHandle>,
    /// Planet whose load timed out. The engine may still finish it, so it is
    /// unloaded along with `current_planet` once it shows up.
    pub stray_planet: Option<SceneId>,
}

/// What a caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Show a planet scene on top of home.
    Planet(SceneId),
    /// Unload the planet and show home again.
    Home,
    /// Full reset: exclusive reload of the home scene.
    Reset,
}

/// An engine operation being waited on.
#[derive(Debug, Clone)]
pub(crate) struct PendingOp {
    op: OpId,
    scene: SceneId,
    kind: SceneOpKind,
    waited: u32,
}

impl PendingOp {
    fn new(op: OpId, scene: SceneId, kind: SceneOpKind) -> Self {
        Self { op, scene, kind, waited: 0 }
    }

    /// Poll the engine once. Counts pending polls against the timeout.
    fn poll<H: Host + ?Sized>(&mut self, host: &mut H, timeout: Option<u32>) -> Poll<Result<(), NavError>> {
        match host.poll(self.op) {
            OpStatus::Done => Poll::Ready(Ok(())),
            OpStatus::Failed(reason) => Poll::Ready(Err(NavError::SceneOp {
                scene: self.scene.clone(),
                op: self.kind,
                reason,
            })),
            OpStatus::Pending => {
                self.waited += 1;
                match timeout {
                    Some(limit) if self.waited >= limit => Poll::Ready(Err(NavError::Timeout {
                        scene: self.scene.clone(),
                        op: self.kind,
                        ticks: self.waited,
                    })),
                    _ => Poll::Pending,
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum PlanetStep {
    Begin,
    Unload,
    Unloading(PendingOp),
    Load,
    Loading(PendingOp),
    /// One tick so the new scene's objects can finish initializing.
    Settling,
}

#[derive(Debug, Clone)]
pub(crate) enum HomeStep {
    Begin,
    Unload,
    Unloading(PendingOp),
}

#[derive(Debug, Clone)]
pub(crate) enum ResetStep {
    Begin,
    /// One tick so the AR session can shut down before the reload.
    Settling,
    Loading(PendingOp),
}

/// Result of one `advance` call.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Advance {
    /// Wait for the next tick.
    Suspend,
    /// The sequence is over.
    Finished,
}

/// An in-flight transition sequence.
#[derive(Debug, Clone)]
pub(crate) enum Transition {
    ToPlanet { target: SceneId, step: PlanetStep },
    ToHome { step: HomeStep },
    Reset { step: ResetStep },
}

impl Transition {
    pub(crate) fn new(request: Request) -> Self {
        match request {
            Request::Planet(target) => Transition::ToPlanet { target, step: PlanetStep::Begin },
            Request::Home => Transition::ToHome { step: HomeStep::Begin },
            Request::Reset => Transition::Reset { step: ResetStep::Begin },
        }
    }

    /// Run steps until the sequence suspends or finishes.
    /// Non-fatal errors are logged and pushed to `reports`.
    pub(crate) fn advance<H: Host + ?Sized>(
        &mut self,
        state: &mut NavigationState,
        config: &NavConfig,
        host: &mut H,
        reports: &mut Vec<NavError>,
    ) -> Advance {
        let timeout = config.op_timeout_ticks;
        match self {
            Transition::ToPlanet { target, step } => loop {
                match step {
                    PlanetStep::Begin => {
                        ensure_home_ui(state, config, host);
                        if let Some(home) = state.home_ui {
                            host.set_visible(home, false);
                            info!("home UI hidden");
                        }
                        // The previous planet's UI goes away with its scene.
                        state.planet_ui = None;
                        *step = PlanetStep::Unload;
                    }
                    PlanetStep::Unload => {
                        *step = match loaded_planet(state, host) {
                            Some(previous) => {
                                info!("unloading previous planet {}", previous);
                                let op = host.unload(&previous);
                                PlanetStep::Unloading(PendingOp::new(op, previous, SceneOpKind::Unload))
                            }
                            None => PlanetStep::Load,
                        };
                    }
                    PlanetStep::Unloading(pending) => match pending.poll(host, timeout) {
                        Poll::Pending => return Advance::Suspend,
                        Poll::Ready(Ok(())) => {
                            forget_planet(state, &pending.scene);
                            *step = PlanetStep::Unload;
                        }
                        Poll::Ready(Err(err)) => return fail(err, state, config, host, reports),
                    },
                    PlanetStep::Load => {
                        info!("loading {} additively", target);
                        let op = host.load(target, LoadMode::Additive);
                        *step = PlanetStep::Loading(PendingOp::new(op, target.clone(), SceneOpKind::Load));
                    }
                    PlanetStep::Loading(pending) => match pending.poll(host, timeout) {
                        Poll::Pending => return Advance::Suspend,
                        Poll::Ready(Ok(())) => {
                            if state.stray_planet.as_ref() == Some(&*target) {
                                state.stray_planet = None;
                            }
                            state.current_planet = Some(target.clone());
                            *step = PlanetStep::Settling;
                            return Advance::Suspend;
                        }
                        Poll::Ready(Err(err)) => {
                            if matches!(err, NavError::Timeout { .. }) {
                                warn!("gave up waiting for {}; it is unloaded if it loads later", target);
                                state.stray_planet = Some(target.clone());
                            }
                            return fail(err, state, config, host, reports);
                        }
                    },
                    PlanetStep::Settling => {
                        show_planet_ui(target, state, config, host, reports);
                        return Advance::Finished;
                    }
                }
            },

            Transition::ToHome { step } => loop {
                match step {
                    HomeStep::Begin => {
                        if let Some(planet_ui) = state.planet_ui.take() {
                            host.set_visible(planet_ui, false);
                            info!("planet UI hidden");
                        }
                        *step = HomeStep::Unload;
                    }
                    HomeStep::Unload => match loaded_planet(state, host) {
                        Some(planet) => {
                            info!("unloading planet {}", planet);
                            let op = host.unload(&planet);
                            *step = HomeStep::Unloading(PendingOp::new(op, planet, SceneOpKind::Unload));
                        }
                        None => {
                            state.current_planet = None;
                            show_home_ui(state, config, host, reports);
                            return Advance::Finished;
                        }
                    },
                    HomeStep::Unloading(pending) => match pending.poll(host, timeout) {
                        Poll::Pending => return Advance::Suspend,
                        Poll::Ready(Ok(())) => {
                            forget_planet(state, &pending.scene);
                            *step = HomeStep::Unload;
                        }
                        Poll::Ready(Err(err)) => return fail(err, state, config, host, reports),
                    },
                }
            },

            Transition::Reset { step } => loop {
                match step {
                    ResetStep::Begin => {
                        if host.disable_session() {
                            info!("AR session disabled");
                        }
                        *step = ResetStep::Settling;
                        return Advance::Suspend;
                    }
                    ResetStep::Settling => {
                        info!("reloading {} exclusively", config.home_scene);
                        let op = host.load(&config.home_scene, LoadMode::Exclusive);
                        *step = ResetStep::Loading(PendingOp::new(op, config.home_scene.clone(), SceneOpKind::Load));
                    }
                    ResetStep::Loading(pending) => match pending.poll(host, timeout) {
                        Poll::Pending => return Advance::Suspend,
                        Poll::Ready(Ok(())) => {
                            // Every previous object is gone; the scene-loaded
                            // notification re-acquires the home UI. A stray load
                            // can still land on top of the fresh home scene.
                            let stray = state.stray_planet.take();
                            *state = NavigationState { stray_planet: stray, ..NavigationState::default() };
                            return Advance::Finished;
                        }
                        Poll::Ready(Err(err)) => return fail(err, state, config, host, reports),
                    },
                }
            },
        }
    }
}

/// The next planet scene that must go before another one loads: the recorded
/// planet first, then a stray one. Entries the engine no longer has are skipped.
fn loaded_planet<H: Host + ?Sized>(state: &NavigationState, host: &H) -> Option<SceneId> {
    [state.current_planet.as_ref(), state.stray_planet.as_ref()]
        .into_iter()
        .flatten()
        .find(|scene| host.is_loaded(scene))
        .cloned()
}

fn forget_planet(state: &mut NavigationState, scene: &SceneId) {
    if state.current_planet.as_ref() == Some(scene) {
        state.current_planet = None;
    }
    if state.stray_planet.as_ref() == Some(scene) {
        state.stray_planet = None;
    }
}

/// Resolve the home UI if it is unset or its handle went stale.
pub(crate) fn ensure_home_ui<H: Host + ?Sized>(state: &mut NavigationState, config: &NavConfig, host: &H) {
    let stale = state.home_ui.map_or(true, |h| host.name(h).is_none());
    if stale {
        state.home_ui = resolve_ui(host, config, &config.home_lookup, &config.home_scene);
    }
}

fn show_home_ui<H: Host + ?Sized>(
    state: &mut NavigationState,
    config: &NavConfig,
    host: &mut H,
    reports: &mut Vec<NavError>,
) {
    ensure_home_ui(state, config, host);
    match state.home_ui {
        Some(home) => {
            host.set_visible(home, true);
            info!("home UI shown");
        }
        None => report(reports, NavError::MissingUi {
            role: UiRole::Home,
            scene: config.home_scene.clone(),
        }),
    }
}

fn show_planet_ui<H: Host + ?Sized>(
    planet: &SceneId,
    state: &mut NavigationState,
    config: &NavConfig,
    host: &mut H,
    reports: &mut Vec<NavError>,
) {
    state.planet_ui = resolve_ui(host, config, &config.planet_lookup, planet);
    match state.planet_ui {
        Some(ui) => {
            host.set_visible(ui, true);
            let name = host.name(ui).unwrap_or_default();
            info!("planet UI {} shown for {}", name, planet);
        }
        None => report(reports, NavError::MissingUi {
            role: UiRole::Planet,
            scene: planet.clone(),
        }),
    }
}

/// Abandon the sequence and leave the user with a usable view:
/// the planet UI if a planet is still loaded, otherwise the home UI.
fn fail<H: Host + ?Sized>(
    err: NavError,
    state: &mut NavigationState,
    config: &NavConfig,
    host: &mut H,
    reports: &mut Vec<NavError>,
) -> Advance {
    report(reports, err);
    match state.current_planet.clone() {
        Some(planet) if host.is_loaded(&planet) => {
            if state.planet_ui.is_none() {
                show_planet_ui(&planet, state, config, host, reports);
            }
        }
        Some(planet) => {
            warn!("recorded planet {} is no longer loaded", planet);
            state.current_planet = None;
            state.planet_ui = None;
            show_home_ui(state, config, host, reports);
        }
        None => show_home_ui(state, config, host, reports),
    }
    Advance::Finished
}

fn report(reports: &mut Vec<NavError>, err: NavError) {
    match &err {
        NavError::MissingUi { .. } => warn!("{}", err),
        _ => error!("{}", err),
    }
    reports.push(err);
}
