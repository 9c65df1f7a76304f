//! In-memory radio used for demos, development on machines without a
//! supported adapter, and tests.

use crate::error::{WifiError, WifiResult};
use crate::wifi::types::{ConnectionStatus, LinkInfo, NetworkObservation, SecurityClass};
use crate::wifi::{Connector, Scanner};
use secrecy::{ExposeSecret, SecretString};
use std::net::Ipv4Addr;
use std::str::FromStr;
use tracing::debug;

/// A network the simulated radio can see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimNetwork {
    pub observation: NetworkObservation,
    /// Passphrase accepted by a protected network. `None` accepts any.
    pub password: Option<String>,
}

impl SimNetwork {
    pub fn new(ssid: &str, rssi: i32, security: SecurityClass, password: Option<&str>) -> Self {
        Self {
            observation: NetworkObservation::new(ssid, rssi, security),
            password: password.map(str::to_string),
        }
    }

    fn accepts(&self, password: Option<&SecretString>) -> bool {
        if self.observation.security.is_open() {
            return true;
        }
        match (&self.password, password) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(expected), Some(given)) => expected == given.expose_secret(),
        }
    }
}

/// Parses `NAME:DBM:CLASS[:PASSWORD]`. An empty name is a hidden network.
impl FromStr for SimNetwork {
    type Err = WifiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| WifiError::InvalidNetwork {
            arg: s.to_string(),
            reason,
        };

        let mut parts = s.splitn(4, ':');
        let ssid = parts.next().unwrap_or_default();
        let rssi = parts
            .next()
            .ok_or_else(|| invalid("missing signal strength".to_string()))?;
        let rssi: i32 = rssi
            .trim()
            .parse()
            .map_err(|e| invalid(format!("signal strength {rssi:?}: {e}")))?;
        let class = parts
            .next()
            .ok_or_else(|| invalid("missing security class".to_string()))?;
        let security = SecurityClass::parse(class.trim())
            .ok_or_else(|| invalid(format!("unknown security class {class:?}")))?;
        let password = parts.next().filter(|p| !p.is_empty());

        Ok(SimNetwork::new(ssid, rssi, security, password))
    }
}

#[derive(Debug)]
struct Attempt {
    index: Option<usize>,
    accepted: bool,
    remaining_polls: u32,
}

/// Radio that serves a fixed list of networks and settles joins after a
/// number of status polls.
#[derive(Debug)]
pub struct SimulatedRadio {
    networks: Vec<SimNetwork>,
    settle_polls: u32,
    attempt: Option<Attempt>,
    link: Option<LinkInfo>,
}

impl SimulatedRadio {
    pub fn new(networks: Vec<SimNetwork>, settle_polls: u32) -> Self {
        Self {
            networks,
            settle_polls,
            attempt: None,
            link: None,
        }
    }

    /// A neighbourhood with more networks than fit on screen, one hidden
    pub fn demo(settle_polls: u32) -> Self {
        let networks = vec![
            SimNetwork::new("Apartment 4B", -67, SecurityClass::Wpa2, Some("hunter22")),
            SimNetwork::new("CoffeeHouse_Guest", -48, SecurityClass::Open, None),
            SimNetwork::new("NETGEAR-5G", -81, SecurityClass::Wpa2, None),
            SimNetwork::new("", -39, SecurityClass::Wpa2, None),
            SimNetwork::new("Home", -42, SecurityClass::Wpa3, Some("correct horse")),
            SimNetwork::new("Printer-Direct", -73, SecurityClass::Wep, Some("12345")),
            SimNetwork::new("Corp-Secure", -58, SecurityClass::Enterprise, None),
            SimNetwork::new("Library", -88, SecurityClass::Open, None),
            SimNetwork::new("FRITZ!Box 7590", -62, SecurityClass::Mixed, Some("fritz")),
            SimNetwork::new("Neighbour", -77, SecurityClass::Wpa, Some("letmein")),
            SimNetwork::new("IoT-Bridge", -91, SecurityClass::Unknown, None),
            SimNetwork::new("Hotspot", -55, SecurityClass::Wpa2, Some("phone123")),
            SimNetwork::new("Lobby", -95, SecurityClass::Open, None),
        ];
        Self::new(networks, settle_polls)
    }

    fn link_for(&self, index: usize) -> LinkInfo {
        let host = u8::try_from(10 + index).unwrap_or(u8::MAX);
        let octet = u8::try_from(index).unwrap_or(u8::MAX);
        LinkInfo {
            ssid: self.networks[index].observation.ssid.clone(),
            ip: Some(Ipv4Addr::new(192, 168, 4, host)),
            bssid: Some([0x02, 0x00, 0x5e, 0x10, 0x00, octet]),
            link_speed: Some(72),
        }
    }
}

impl Scanner for SimulatedRadio {
    fn scan(&mut self) -> WifiResult<Vec<NetworkObservation>> {
        debug!(count = self.networks.len(), "simulated scan");
        Ok(self
            .networks
            .iter()
            .map(|n| n.observation.clone())
            .collect())
    }
}

impl Connector for SimulatedRadio {
    fn disconnect(&mut self, erase_config: bool) -> WifiResult<()> {
        debug!(erase_config, "simulated disconnect");
        self.attempt = None;
        self.link = None;
        Ok(())
    }

    fn begin_connect(&mut self, ssid: &str, password: Option<&SecretString>) -> WifiResult<()> {
        let index = self
            .networks
            .iter()
            .position(|n| !n.observation.is_hidden() && n.observation.ssid == ssid);
        if let Some(i) = index
            && self.networks[i].observation.security == SecurityClass::Enterprise
        {
            return Err(WifiError::UnsupportedSecurity(SecurityClass::Enterprise));
        }
        let accepted = index.is_some_and(|i| self.networks[i].accepts(password));
        debug!(ssid, in_range = index.is_some(), accepted, "simulated join requested");

        self.attempt = Some(Attempt {
            index,
            accepted,
            remaining_polls: self.settle_polls,
        });
        Ok(())
    }

    fn poll_status(&mut self) -> WifiResult<ConnectionStatus> {
        if self.link.is_some() {
            return Ok(ConnectionStatus::Connected);
        }
        let Some(attempt) = self.attempt.as_mut() else {
            return Err(WifiError::NoJoinInProgress);
        };
        if attempt.remaining_polls > 0 {
            attempt.remaining_polls -= 1;
            return Ok(ConnectionStatus::Pending);
        }

        match (attempt.index, attempt.accepted) {
            (Some(index), true) => {
                self.attempt = None;
                self.link = Some(self.link_for(index));
                Ok(ConnectionStatus::Connected)
            }
            _ => {
                self.attempt = None;
                Ok(ConnectionStatus::Failed)
            }
        }
    }

    fn link_info(&mut self) -> Option<LinkInfo> {
        self.link.clone()
    }
}
