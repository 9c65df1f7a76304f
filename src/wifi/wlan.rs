use crate::config;
use crate::error::WifiResult;
use crate::wifi::connection::{connect_profile, current_link, disconnect};
use crate::wifi::handle::WlanHandle;
use crate::wifi::listener::{WifiListener, start_wifi_listener};
use crate::wifi::profile::{
    ProfileLedger, create_profile_xml, delete_profile, set_profile, temporary_profile_name,
};
use crate::wifi::scanning::scan_observations;
use crate::wifi::types::{
    ConnectionEvent, ConnectionStatus, LinkInfo, NetworkObservation, SecurityClass,
};
use crate::wifi::{Connector, Scanner};
use secrecy::SecretString;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, warn};

/// Native Windows radio built on the WLAN API
#[derive(Debug)]
pub struct WlanRadio {
    handle: WlanHandle,
    _listener: WifiListener,
    events: UnboundedReceiver<ConnectionEvent>,
    /// Security class per name from the last scan, needed to write profiles
    last_scan: Vec<NetworkObservation>,
    target: Option<String>,
    profiles: ProfileLedger,
}

impl WlanRadio {
    pub fn open() -> WifiResult<Self> {
        let handle = WlanHandle::open()?;
        let (tx, rx) = mpsc::unbounded_channel();
        let listener = start_wifi_listener(tx)?;
        Ok(Self {
            handle,
            _listener: listener,
            events: rx,
            last_scan: Vec::new(),
            target: None,
            profiles: ProfileLedger::default(),
        })
    }

    fn security_of(&self, ssid: &str) -> SecurityClass {
        self.last_scan
            .iter()
            .filter(|o| o.ssid == ssid)
            .max_by_key(|o| o.rssi)
            .map(|o| o.security)
            .unwrap_or_default()
    }
}

impl Scanner for WlanRadio {
    fn scan(&mut self) -> WifiResult<Vec<NetworkObservation>> {
        let observations = scan_observations(&self.handle)?;
        self.last_scan = observations.clone();
        Ok(observations)
    }
}

impl Connector for WlanRadio {
    fn disconnect(&mut self, erase_config: bool) -> WifiResult<()> {
        self.target = None;
        let result = disconnect(&self.handle);

        if erase_config {
            for name in self.profiles.take_all() {
                if let Err(e) = delete_profile(&self.handle, &name) {
                    warn!(profile = %name, error = %e, "could not remove profile");
                }
            }
        }
        result
    }

    fn begin_connect(&mut self, ssid: &str, password: Option<&SecretString>) -> WifiResult<()> {
        // Stale notifications from the previous link must not settle this attempt
        while self.events.try_recv().is_ok() {}

        let security = self.security_of(ssid);
        let profile = temporary_profile_name(ssid);
        let xml = create_profile_xml(&profile, ssid, security, password)?;
        set_profile(&self.handle, &xml)?;
        self.profiles.record(&profile);

        // Give the service a moment to register the profile
        std::thread::sleep(Duration::from_millis(config::PROFILE_REGISTRATION_DELAY_MS));

        connect_profile(&self.handle, &profile)?;
        info!(ssid, %profile, %security, "join requested");
        self.target = Some(ssid.to_string());
        Ok(())
    }

    fn poll_status(&mut self) -> WifiResult<ConnectionStatus> {
        let Some(target) = self.target.clone() else {
            return Ok(ConnectionStatus::Pending);
        };

        while let Ok(event) = self.events.try_recv() {
            match event {
                ConnectionEvent::Connected(ssid) if ssid == target => {
                    return Ok(ConnectionStatus::Connected);
                }
                ConnectionEvent::Failed {
                    ssid,
                    reason_code,
                    reason_str,
                } if ssid == target => {
                    warn!(ssid, reason_code, reason = %reason_str, "join failed");
                    self.target = None;
                    return Ok(ConnectionStatus::Failed);
                }
                other => debug!(?other, "ignoring connection event"),
            }
        }

        // Notifications can be missed if the join completed very quickly
        match current_link(&self.handle) {
            Some(link) if link.ssid == target => Ok(ConnectionStatus::Connected),
            _ => Ok(ConnectionStatus::Pending),
        }
    }

    fn link_info(&mut self) -> Option<LinkInfo> {
        current_link(&self.handle)
    }
}
