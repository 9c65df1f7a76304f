use std::fmt;
use std::net::Ipv4Addr;

/// Security classification reported by the radio for a network
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityClass {
    Open,
    Wep,
    Wpa,
    Wpa2,
    Wpa3,
    Enterprise,
    Mixed,
    #[default]
    Unknown,
}

impl SecurityClass {
    pub fn is_open(self) -> bool {
        self == SecurityClass::Open
    }

    /// Short label used in the network list
    pub fn label(self) -> &'static str {
        match self {
            SecurityClass::Open => "Open",
            SecurityClass::Wep => "WEP",
            SecurityClass::Wpa => "WPA",
            SecurityClass::Wpa2 => "WPA2",
            SecurityClass::Wpa3 => "WPA3",
            SecurityClass::Enterprise => "WPA2-ENT",
            SecurityClass::Mixed => "WPA/WPA2",
            SecurityClass::Unknown => "Unknown",
        }
    }

    /// Parse the names accepted on the command line (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let class = match s.to_ascii_lowercase().as_str() {
            "open" | "none" => SecurityClass::Open,
            "wep" => SecurityClass::Wep,
            "wpa" => SecurityClass::Wpa,
            "wpa2" => SecurityClass::Wpa2,
            "wpa3" => SecurityClass::Wpa3,
            "enterprise" | "ent" | "wpa2-ent" => SecurityClass::Enterprise,
            "mixed" | "wpa/wpa2" | "wpa2/wpa3" => SecurityClass::Mixed,
            "unknown" => SecurityClass::Unknown,
            _ => return None,
        };
        Some(class)
    }
}

impl fmt::Display for SecurityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One network seen during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkObservation {
    pub ssid: String,
    /// Signal strength in dBm, higher is stronger
    pub rssi: i32,
    pub security: SecurityClass,
}

impl NetworkObservation {
    pub fn new(ssid: impl Into<String>, rssi: i32, security: SecurityClass) -> Self {
        Self {
            ssid: ssid.into(),
            rssi,
            security,
        }
    }

    /// Hidden networks broadcast an empty name and are never listed
    pub fn is_hidden(&self) -> bool {
        self.ssid.is_empty()
    }
}

/// Result of polling an outstanding connection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Failed,
    Pending,
}

/// Address details of an established link
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkInfo {
    pub ssid: String,
    pub ip: Option<Ipv4Addr>,
    pub bssid: Option<[u8; 6]>,
    pub link_speed: Option<u32>,
}

impl LinkInfo {
    pub fn bssid_string(&self) -> Option<String> {
        self.bssid.map(|b| {
            format!(
                "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
                b[0], b[1], b[2], b[3], b[4], b[5]
            )
        })
    }
}

/// Connection events from the WiFi listener
#[cfg(windows)]
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    Connected(String),
    Disconnected(String),
    Failed {
        ssid: String,
        reason_code: u32,
        reason_str: String,
    },
}
