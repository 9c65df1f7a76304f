use crate::app::{AppState, SelectedNetwork, SessionState};
use crate::event::Event;
use crate::wifi::{ConnectionStatus, Radio};
use tracing::{debug, info, warn};

/// Apply one event to the session.
///
/// Rescan is honoured from every state; everything else is routed to the
/// handler for the current state. Events a state does not react to are
/// dropped without touching the redraw flag.
pub fn step(state: &mut AppState, event: Event, radio: &mut dyn Radio) {
    let before = state.state.name();

    match event {
        Event::Quit => {}
        Event::Rescan => rescan(state, radio),
        _ => match state.state {
            SessionState::SelectingNetwork { .. } => handle_network_list(state, event),
            SessionState::EnteringPassword { .. } => handle_password_entry(state, event, radio),
            SessionState::Connecting { .. } => handle_connecting(state, event, radio),
            SessionState::NoNetworksFound
            | SessionState::Connected { .. }
            | SessionState::ConnectFailed { .. } => {}
        },
    }

    let after = state.state.name();
    if before != after {
        debug!(from = before, to = after, "session transition");
    }
}

/// Drop any link, rebuild the ranking from a fresh scan
fn rescan(state: &mut AppState, radio: &mut dyn Radio) {
    if let Err(e) = radio.disconnect(true) {
        warn!(error = %e, "disconnect before scan failed");
    }

    state.networks.reset();
    match radio.scan() {
        Ok(observations) => {
            let seen = observations.len();
            let mut hidden = 0;
            for observation in observations {
                if observation.is_hidden() {
                    hidden += 1;
                    continue;
                }
                state.networks.offer(observation);
            }
            info!(seen, hidden, kept = state.networks.len(), "scan complete");
        }
        Err(e) => warn!(error = %e, "scan failed"),
    }

    let next = if state.networks.is_empty() {
        SessionState::NoNetworksFound
    } else {
        SessionState::SelectingNetwork { index: 0 }
    };
    state.set_state(next);
}

fn handle_network_list(state: &mut AppState, event: Event) {
    match event {
        Event::Up => state.previous(),
        Event::Down => state.next(),
        Event::Confirm => {
            if let Some(index) = state.selected_index()
                && let Some(target) = state.selected_network().map(SelectedNetwork::from_observation)
            {
                state.set_state(SessionState::EnteringPassword { target, index });
            }
        }
        _ => {}
    }
}

fn handle_password_entry(state: &mut AppState, event: Event, radio: &mut dyn Radio) {
    let SessionState::EnteringPassword { target, index } = &mut state.state else {
        return;
    };

    match event {
        Event::Back => {
            let index = *index;
            state.set_state(SessionState::SelectingNetwork { index });
        }
        Event::Confirm => {
            let target = target.clone();
            begin_connection(state, target, radio);
        }
        Event::Char(c) if !target.is_open => {
            target.password.push(c);
            state.mark_dirty();
        }
        Event::Delete if !target.is_open => {
            if target.password.pop().is_some() {
                state.mark_dirty();
            }
        }
        _ => {}
    }
}

fn begin_connection(state: &mut AppState, target: SelectedNetwork, radio: &mut dyn Radio) {
    // Keep whatever configuration the radio already has
    if let Err(e) = radio.disconnect(false) {
        warn!(error = %e, "disconnect before join failed");
    }

    let password = target.password_secret();
    match radio.begin_connect(&target.ssid, password.as_ref()) {
        Ok(()) => {
            info!(ssid = %target.ssid, security = %target.security, "joining");
            state.set_state(SessionState::Connecting { target });
        }
        Err(e) => {
            warn!(ssid = %target.ssid, error = %e, "join request rejected");
            state.set_state(SessionState::ConnectFailed { target });
        }
    }
}

fn handle_connecting(state: &mut AppState, event: Event, radio: &mut dyn Radio) {
    let SessionState::Connecting { target } = &state.state else {
        return;
    };

    match event {
        Event::ConnectionPoll(ConnectionStatus::Connected) => {
            let target = target.clone();
            let link = radio.link_info();
            info!(ssid = %target.ssid, ?link, "connected");
            state.set_state(SessionState::Connected { target, link });
        }
        Event::ConnectionPoll(ConnectionStatus::Failed) => {
            let target = target.clone();
            info!(ssid = %target.ssid, "connection failed");
            state.set_state(SessionState::ConnectFailed { target });
        }
        _ => {}
    }
}
