use crate::ranking::RankedNetworkSet;
use crate::wifi::{LinkInfo, NetworkObservation, SecurityClass};
use secrecy::SecretString;

/// The network the user picked from the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedNetwork {
    pub ssid: String,
    pub security: SecurityClass,
    pub is_open: bool,
    /// Typed passphrase. Only ever appended to or shortened from the end.
    pub password: String,
}

impl SelectedNetwork {
    pub fn from_observation(observation: &NetworkObservation) -> Self {
        Self {
            ssid: observation.ssid.clone(),
            security: observation.security,
            is_open: observation.security.is_open(),
            password: String::new(),
        }
    }

    /// Snapshot handed to the connector; later edits do not reach it
    pub fn password_secret(&self) -> Option<SecretString> {
        if self.is_open {
            None
        } else {
            Some(SecretString::from(self.password.clone()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NoNetworksFound,
    SelectingNetwork {
        index: usize,
    },
    EnteringPassword {
        target: SelectedNetwork,
        /// List position to return to on Back
        index: usize,
    },
    Connecting {
        target: SelectedNetwork,
    },
    Connected {
        target: SelectedNetwork,
        link: Option<LinkInfo>,
    },
    ConnectFailed {
        target: SelectedNetwork,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::NoNetworksFound => "no-networks",
            SessionState::SelectingNetwork { .. } => "selecting",
            SessionState::EnteringPassword { .. } => "password",
            SessionState::Connecting { .. } => "connecting",
            SessionState::Connected { .. } => "connected",
            SessionState::ConnectFailed { .. } => "failed",
        }
    }
}

/// Everything the control loop owns between ticks
#[derive(Debug)]
pub struct AppState {
    pub networks: RankedNetworkSet,
    pub state: SessionState,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> AppState {
        AppState {
            networks: RankedNetworkSet::new(),
            state: SessionState::NoNetworksFound,
            dirty: true,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[cfg(test)]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether a redraw is due and clears the flag
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn set_state(&mut self, state: SessionState) {
        self.state = state;
        self.dirty = true;
    }

    /// True while printable keys should be typed into the password
    pub fn accepts_text(&self) -> bool {
        matches!(&self.state, SessionState::EnteringPassword { target, .. } if !target.is_open)
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self.state, SessionState::Connecting { .. })
    }

    pub fn selected_index(&self) -> Option<usize> {
        match self.state {
            SessionState::SelectingNetwork { index } => Some(index),
            _ => None,
        }
    }

    pub fn selected_network(&self) -> Option<&NetworkObservation> {
        self.selected_index().and_then(|i| self.networks.get(i))
    }

    pub fn next(&mut self) {
        let count = self.networks.len();
        if let SessionState::SelectingNetwork { index } = &mut self.state
            && count > 0
        {
            *index = (*index + 1) % count;
            self.dirty = true;
        }
    }

    pub fn previous(&mut self) {
        let count = self.networks.len();
        if let SessionState::SelectingNetwork { index } = &mut self.state
            && count > 0
        {
            *index = if *index == 0 { count - 1 } else { *index - 1 };
            self.dirty = true;
        }
    }
}
