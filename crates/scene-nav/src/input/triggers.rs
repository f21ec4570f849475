use log::debug;
use crate::core::transition::Request;
use super::queue::NavInput;

/// Map one tick's input events to controller requests, in arrival order.
///
/// Back requests come from the UI back control or the platform back key;
/// both collapse into at most one `Request::Home` per tick. The home control
/// asks for a full reset, planet buttons ask for their scene.
pub fn requests_for_tick(events: &[NavInput], back_key_code: u32) -> Vec<Request> {
    let mut requests = Vec::with_capacity(events.len());
    let mut back_seen = false;
    for event in events {
        let request = match event {
            NavInput::Back => Some(Request::Home),
            NavInput::KeyDown { key_code } if *key_code == back_key_code => Some(Request::Home),
            NavInput::Home => Some(Request::Reset),
            NavInput::Planet(scene) => Some(Request::Planet(scene.clone())),
            NavInput::KeyDown { .. } => None,
        };
        match request {
            Some(Request::Home) if back_seen => debug!("extra back request this tick ignored"),
            Some(request) => {
                back_seen |= request == Request::Home;
                requests.push(request);
            }
            None => {}
        }
    }
    requests
}
