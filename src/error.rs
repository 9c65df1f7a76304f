//! Errors raised by the radio backends

use crate::wifi::SecurityClass;
use thiserror::Error;

pub type WifiResult<T> = Result<T, WifiError>;

#[derive(Error, Debug)]
pub enum WifiError {
    /// Status was polled while no join was outstanding
    #[error("no join in progress")]
    NoJoinInProgress,

    #[error("cannot join {0} networks without 802.1X credentials")]
    UnsupportedSecurity(SecurityClass),

    /// A `--network` argument that does not parse
    #[error("invalid network {arg:?}: {reason}")]
    InvalidNetwork { arg: String, reason: String },

    #[cfg(any(windows, test))]
    #[error("scan request failed (code {code})")]
    ScanFailed { code: u32 },

    #[cfg(windows)]
    #[error("join request failed (code {code})")]
    ConnectionFailed { code: u32 },

    #[cfg(windows)]
    #[error("WLAN service unavailable (code {code})")]
    HandleOpenFailed { code: u32 },

    #[cfg(windows)]
    #[error("could not list wireless interfaces (code {code})")]
    InterfaceEnumFailed { code: u32 },

    #[cfg(windows)]
    #[error("no wireless interface")]
    NoInterface,

    #[cfg(windows)]
    #[error("could not read scan results (code {code})")]
    NetworkListFailed { code: u32 },

    #[cfg(windows)]
    #[error("could not subscribe to connection events (code {code})")]
    NotificationRegistrationFailed { code: u32 },

    #[cfg(windows)]
    #[error("profile rejected (code {code}, reason {reason:#x})")]
    ProfileRejected { code: u32, reason: u32 },

    #[cfg(windows)]
    #[error("profile {name:?} could not be removed (code {code})")]
    ProfileDeleteFailed { name: String, code: u32 },

    #[cfg(windows)]
    #[error("disconnect failed (code {code})")]
    DisconnectFailed { code: u32 },

    #[cfg(windows)]
    #[error("profile XML is not UTF-8")]
    ProfileXml(#[from] std::string::FromUtf8Error),
}

/// Text for the reason codes a failed join reports
#[cfg(windows)]
pub fn wlan_reason_text(code: u32) -> &'static str {
    match code {
        0 => "ok",
        0x0001_0001 => "network not compatible",
        0x0001_0002 => "profile not compatible",
        0x0002_8002 => "association failed",
        0x0002_8003 => "association timed out",
        0x0002_8006 | 0x0005_0004 => "wrong password",
        0x0002_8007 | 0x0004_8005 | 0x0004_8014 => "authentication timed out, check the password",
        0x0002_800B => "driver dropped the link, check the password",
        0x0003_8002 => "network not available",
        0x0003_8003 => "profile not found",
        0x0003_8006 => "profile invalid",
        _ => "unknown failure",
    }
}
