//! Radio collaborators for wifipick
//!
//! The session only talks to the radio through [`Scanner`] and [`Connector`].
//! A simulated radio is always available; on Windows the native WLAN API
//! backs a real one.

mod sim;
mod types;

#[cfg(windows)]
mod connection;
#[cfg(windows)]
mod handle;
#[cfg(windows)]
mod listener;
#[cfg(windows)]
mod profile;
#[cfg(windows)]
mod scanning;
#[cfg(windows)]
mod wlan;

use crate::error::WifiResult;
use secrecy::SecretString;

// Re-export public API
pub use sim::{SimNetwork, SimulatedRadio};
pub use types::{ConnectionStatus, LinkInfo, NetworkObservation, SecurityClass};
#[cfg(windows)]
pub use wlan::WlanRadio;

/// Discovers nearby networks. Blocks until the scan completes.
pub trait Scanner {
    /// Raw scan results in radio order; hidden networks have an empty name.
    fn scan(&mut self) -> WifiResult<Vec<NetworkObservation>>;
}

/// Joins and leaves networks.
pub trait Connector {
    /// Drop the current association. With `erase_config` the stored
    /// configuration for it is discarded as well.
    fn disconnect(&mut self, erase_config: bool) -> WifiResult<()>;

    /// Request a join. Returns once the request is issued, not when the
    /// link is up; progress is observed through [`Connector::poll_status`].
    fn begin_connect(&mut self, ssid: &str, password: Option<&SecretString>) -> WifiResult<()>;

    fn poll_status(&mut self) -> WifiResult<ConnectionStatus>;

    /// Address details of the current link, if any
    fn link_info(&mut self) -> Option<LinkInfo>;
}

/// A radio that can both scan and connect
pub trait Radio: Scanner + Connector {}

impl<T: Scanner + Connector> Radio for T {}
