//! Event handling module for wifipick
//!
//! One tick of the control loop: drain key events into the state machine,
//! poll an outstanding join, redraw if anything changed.

mod handlers;

pub use handlers::step;

use crate::{app::AppState, input::InputSource, wifi::ConnectionStatus, wifi::Radio};
use color_eyre::eyre::Result;
use tracing::{info, warn};

/// Everything the state machine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Rescan,
    Up,
    Down,
    Confirm,
    Delete,
    Back,
    Char(char),
    ConnectionPoll(ConnectionStatus),
    /// Leave the program. Consumed by the loop, never stepped.
    Quit,
}

/// Draws the session on the device screen
pub trait Renderer {
    fn draw(&mut self, state: &AppState) -> Result<()>;

    /// Shown while a blocking scan is in progress
    fn draw_scanning(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run one loop iteration
pub fn tick(
    state: &mut AppState,
    input: &mut dyn InputSource,
    radio: &mut dyn Radio,
    renderer: &mut dyn Renderer,
) -> Result<Flow> {
    for event in input.poll_events(state.accepts_text())? {
        match event {
            Event::Quit => return Ok(Flow::Quit),
            Event::Rescan => {
                renderer.draw_scanning()?;
                step(state, event, radio);
            }
            other => step(state, other, radio),
        }
    }

    if state.is_connecting() {
        let status = radio.poll_status().unwrap_or_else(|e| {
            warn!(error = %e, "status poll failed");
            ConnectionStatus::Pending
        });
        step(state, Event::ConnectionPoll(status), radio);
    }

    if state.take_redraw() {
        renderer.draw(state)?;
    }
    Ok(Flow::Continue)
}

/// Scan once, then tick until the user quits
pub fn run(
    state: &mut AppState,
    input: &mut dyn InputSource,
    radio: &mut dyn Radio,
    renderer: &mut dyn Renderer,
) -> Result<()> {
    renderer.draw_scanning()?;
    step(state, Event::Rescan, radio);

    while tick(state, input, radio, renderer)? == Flow::Continue {}

    info!("quit requested");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SessionState;
    use crate::error::WifiResult;
    use crate::wifi::{Connector, LinkInfo, NetworkObservation, Scanner, SecurityClass};
    use secrecy::SecretString;
    use std::collections::VecDeque;

    struct ScriptedInput {
        ticks: VecDeque<Vec<Event>>,
        text_entry_seen: Vec<bool>,
    }

    impl ScriptedInput {
        fn new(ticks: Vec<Vec<Event>>) -> Self {
            Self {
                ticks: ticks.into(),
                text_entry_seen: Vec::new(),
            }
        }
    }

    impl InputSource for ScriptedInput {
        fn poll_events(&mut self, text_entry: bool) -> Result<Vec<Event>> {
            self.text_entry_seen.push(text_entry);
            Ok(self.ticks.pop_front().unwrap_or_else(|| vec![Event::Quit]))
        }
    }

    #[derive(Default)]
    struct CountingRenderer {
        draws: Vec<&'static str>,
        scans: usize,
    }

    impl Renderer for CountingRenderer {
        fn draw(&mut self, state: &AppState) -> Result<()> {
            self.draws.push(state.state.name());
            Ok(())
        }

        fn draw_scanning(&mut self) -> Result<()> {
            self.scans += 1;
            Ok(())
        }
    }

    struct PendingThenConnected {
        polls_left: u32,
        polls: u32,
    }

    impl Scanner for PendingThenConnected {
        fn scan(&mut self) -> WifiResult<Vec<NetworkObservation>> {
            Ok(vec![NetworkObservation::new("Cafe", -50, SecurityClass::Open)])
        }
    }

    impl Connector for PendingThenConnected {
        fn disconnect(&mut self, _erase_config: bool) -> WifiResult<()> {
            Ok(())
        }

        fn begin_connect(&mut self, _ssid: &str, _pw: Option<&SecretString>) -> WifiResult<()> {
            Ok(())
        }

        fn poll_status(&mut self) -> WifiResult<ConnectionStatus> {
            self.polls += 1;
            if self.polls_left == 0 {
                return Ok(ConnectionStatus::Connected);
            }
            self.polls_left -= 1;
            Ok(ConnectionStatus::Pending)
        }

        fn link_info(&mut self) -> Option<LinkInfo> {
            None
        }
    }

    #[test]
    fn startup_scans_and_draws_once_per_dirty_tick() {
        let mut state = AppState::new();
        let mut input = ScriptedInput::new(vec![vec![], vec![], vec![Event::Down]]);
        let mut radio = PendingThenConnected {
            polls_left: 0,
            polls: 0,
        };
        let mut renderer = CountingRenderer::default();

        run(&mut state, &mut input, &mut radio, &mut renderer).unwrap();

        assert_eq!(renderer.scans, 1);
        // initial list, then Down over a single entry wraps onto itself
        assert_eq!(renderer.draws, ["selecting", "selecting"]);
        assert_eq!(radio.polls, 0);
    }

    #[test]
    fn polls_every_tick_while_connecting() {
        let mut state = AppState::new();
        let mut input = ScriptedInput::new(vec![
            vec![Event::Confirm],
            vec![Event::Char('x'), Event::Confirm],
            vec![],
            vec![],
            vec![],
        ]);
        let mut radio = PendingThenConnected {
            polls_left: 2,
            polls: 0,
        };
        let mut renderer = CountingRenderer::default();

        run(&mut state, &mut input, &mut radio, &mut renderer).unwrap();

        assert!(matches!(state.state, SessionState::Connected { .. }));
        assert_eq!(radio.polls, 3);
        // the list from startup is superseded by Confirm before the first draw
        assert_eq!(renderer.draws, ["password", "connecting", "connected"]);
        // open network never switches the keyboard into text entry
        assert!(input.text_entry_seen.iter().all(|t| !t));
    }

    #[test]
    fn rescan_shows_the_scanning_splash() {
        let mut state = AppState::new();
        let mut input = ScriptedInput::new(vec![vec![Event::Rescan], vec![Event::Rescan]]);
        let mut radio = PendingThenConnected {
            polls_left: 0,
            polls: 0,
        };
        let mut renderer = CountingRenderer::default();

        run(&mut state, &mut input, &mut radio, &mut renderer).unwrap();

        assert_eq!(renderer.scans, 3);
    }
}
