/// Centralized configuration constants for wifipick

// Ranking
pub const MAX_NETWORKS: usize = 10;

// UI Dimensions (the handheld screen, in terminal cells)
pub const SCREEN_HEIGHT: u16 = 18;
pub const SCREEN_WIDTH: u16 = 48;

// Timing
pub const EVENT_POLL_MS: u64 = 10;
#[cfg(windows)]
pub const WLAN_SCAN_SETTLE_MS: u64 = 3000;
#[cfg(windows)]
pub const PROFILE_REGISTRATION_DELAY_MS: u64 = 1500;
pub const DEFAULT_SIM_SETTLE_POLLS: u32 = 150;

// Signal thresholds (dBm) for the strength bar
pub const RSSI_GOOD: i32 = -60;
pub const RSSI_FAIR: i32 = -75;

// Icons - Nerd Fonts
pub mod icons {
    pub mod nerd {
        pub const OPEN: &str = " "; // nf-fa-rss
        pub const LOCKED: &str = " "; // nf-fa-lock
        pub const CONNECTED: &str = "󰖩 "; // nf-md-wifi_check
        pub const FAILED: &str = "󰖪 "; // nf-md-wifi_off
        pub const HIGHLIGHT: &str = "> ";
        pub const ENTER: &str = "󰌑"; // nf-md-keyboard_return
    }

    pub mod ascii {
        pub const OPEN: &str = "[O] ";
        pub const LOCKED: &str = "[*] ";
        pub const CONNECTED: &str = "[+] ";
        pub const FAILED: &str = "[x] ";
        pub const HIGHLIGHT: &str = "> ";
        pub const ENTER: &str = "Enter";
    }
}

/// Icon set to use based on configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconSet {
    #[default]
    Nerd,
    Ascii,
}

impl IconSet {
    pub fn open(&self) -> &'static str {
        match self {
            IconSet::Nerd => icons::nerd::OPEN,
            IconSet::Ascii => icons::ascii::OPEN,
        }
    }

    pub fn locked(&self) -> &'static str {
        match self {
            IconSet::Nerd => icons::nerd::LOCKED,
            IconSet::Ascii => icons::ascii::LOCKED,
        }
    }

    pub fn connected(&self) -> &'static str {
        match self {
            IconSet::Nerd => icons::nerd::CONNECTED,
            IconSet::Ascii => icons::ascii::CONNECTED,
        }
    }

    pub fn failed(&self) -> &'static str {
        match self {
            IconSet::Nerd => icons::nerd::FAILED,
            IconSet::Ascii => icons::ascii::FAILED,
        }
    }

    pub fn highlight(&self) -> &'static str {
        match self {
            IconSet::Nerd => icons::nerd::HIGHLIGHT,
            IconSet::Ascii => icons::ascii::HIGHLIGHT,
        }
    }

    pub fn enter(&self) -> &'static str {
        match self {
            IconSet::Nerd => icons::nerd::ENTER,
            IconSet::Ascii => icons::ascii::ENTER,
        }
    }
}
