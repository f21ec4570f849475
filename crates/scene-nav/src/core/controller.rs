use std::collections::VecDeque;
use log::{debug, info, warn};
use crate::api::config::{NavConfig, OverlapPolicy};
use crate::api::host::Host;
use crate::api::types::{LoadMode, SceneId, UiHandle};
use crate::core::transition::{Advance, NavigationState, Request, Transition};
use crate::error::{NavError, NavResult};

/// Identifies one controller instance. Assigned by `ControllerSlot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(pub u32);

/// Where the navigation flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Home,
    TransitioningToPlanet,
    PlanetActive,
    TransitioningToHome,
    Resetting,
}

/// How a request was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepted {
    /// The transition starts on the next tick.
    Started,
    /// The transition waits behind the one in flight.
    Queued,
}

/// Drives transitions between the home view and one planet view.
///
/// Requests are serialized: at most one transition runs at a time, and a
/// request arriving mid-transition is rejected or queued per `NavConfig::overlap`.
/// Nothing happens until `tick` is called.
pub struct NavigationController {
    id: InstanceId,
    config: NavConfig,
    state: NavigationState,
    phase: Phase,
    transition: Option<Transition>,
    pending: Option<Request>,
    queue: VecDeque<Request>,
    subscribed: bool,
    reports: Vec<NavError>,
}

impl NavigationController {
    pub fn new(id: InstanceId, config: NavConfig) -> Self {
        Self {
            id,
            config,
            state: NavigationState::default(),
            phase: Phase::Home,
            transition: None,
            pending: None,
            queue: VecDeque::new(),
            subscribed: false,
            reports: Vec::new(),
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current_planet(&self) -> Option<&SceneId> {
        self.state.current_planet.as_ref()
    }

    pub fn home_ui(&self) -> Option<UiHandle> {
        self.state.home_ui
    }

    pub fn planet_ui(&self) -> Option<UiHandle> {
        self.state.planet_ui
    }

    /// Whether a transition is running or about to start.
    pub fn is_busy(&self) -> bool {
        self.transition.is_some() || self.pending.is_some()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub(crate) fn subscribe(&mut self) {
        self.subscribed = true;
    }

    pub(crate) fn unsubscribe(&mut self) {
        self.subscribed = false;
    }

    /// Drain the non-fatal errors raised by finished or running transitions.
    pub fn take_reports(&mut self) -> Vec<NavError> {
        std::mem::take(&mut self.reports)
    }

    /// Show a planet scene: hide home, swap out any previous planet, load, show its UI.
    pub fn navigate_to_planet(&mut self, scene: impl Into<SceneId>) -> NavResult<Accepted> {
        self.request(Request::Planet(scene.into()))
    }

    /// Go back: hide the planet UI, unload the planet, show home.
    pub fn navigate_home(&mut self) -> NavResult<Accepted> {
        self.request(Request::Home)
    }

    /// Full reset: disable the AR session and reload the home scene exclusively.
    pub fn reset(&mut self) -> NavResult<Accepted> {
        self.request(Request::Reset)
    }

    pub fn request(&mut self, request: Request) -> NavResult<Accepted> {
        if !self.is_busy() {
            debug!("accepted {:?}", request);
            self.begin(request);
            return Ok(Accepted::Started);
        }
        match self.config.overlap {
            OverlapPolicy::Queue if self.queue.len() < self.config.max_queued => {
                info!("transition in flight, queued {:?}", request);
                self.queue.push_back(request);
                Ok(Accepted::Queued)
            }
            _ => {
                warn!("transition in flight, rejected {:?}", request);
                Err(NavError::TransitionInFlight)
            }
        }
    }

    fn begin(&mut self, request: Request) {
        self.phase = match request {
            Request::Planet(_) => Phase::TransitioningToPlanet,
            Request::Home => Phase::TransitioningToHome,
            Request::Reset => Phase::Resetting,
        };
        self.pending = Some(request);
    }

    /// Advance the running transition by one scheduling tick.
    pub fn tick<H: Host + ?Sized>(&mut self, host: &mut H) {
        loop {
            if self.transition.is_none() {
                match self.pending.take() {
                    Some(request) => self.transition = Some(Transition::new(request)),
                    None => return,
                }
            }
            let Some(mut transition) = self.transition.take() else {
                return;
            };
            match transition.advance(&mut self.state, &self.config, host, &mut self.reports) {
                Advance::Suspend => {
                    self.transition = Some(transition);
                    return;
                }
                Advance::Finished => self.finish(),
            }
            // A queued request starts right away, in the same tick.
            if self.pending.is_none() {
                return;
            }
        }
    }

    fn finish(&mut self) {
        self.phase = if self.state.current_planet.is_some() {
            Phase::PlanetActive
        } else {
            Phase::Home
        };
        info!("transition finished, now {:?}", self.phase);
        if let Some(next) = self.queue.pop_front() {
            self.begin(next);
        }
    }

    /// Scene-loaded notification: re-acquire the home UI when the home scene comes back.
    pub fn on_scene_loaded<H: Host + ?Sized>(&mut self, host: &H, scene: &SceneId, mode: LoadMode) {
        debug!("scene loaded: {} ({:?})", scene, mode);
        if !self.subscribed || scene != &self.config.home_scene {
            return;
        }
        // A handle into an unloaded scene no longer names anything.
        let stale = self.state.home_ui.map_or(true, |h| host.name(h).is_none());
        if !stale {
            return;
        }
        if let Some(tag) = self.config.home_tag() {
            self.state.home_ui = host.find_by_tag(tag);
            if self.state.home_ui.is_some() {
                info!("re-acquired home UI after {} loaded", scene);
            }
        }
    }
}
