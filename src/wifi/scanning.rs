use crate::config;
use crate::error::{WifiError, WifiResult};
use crate::wifi::handle::{WlanHandle, ssid_to_string};
use crate::wifi::types::{NetworkObservation, SecurityClass};
use std::time::Duration;
use tracing::{debug, warn};
use windows::Win32::{Foundation::ERROR_SUCCESS, NetworkManagement::WiFi::*};

/// Trigger a scan, wait for the driver to refresh its list, then read it
pub fn scan_observations(handle: &WlanHandle) -> WifiResult<Vec<NetworkObservation>> {
    unsafe {
        let result = WlanScan(handle.as_raw(), handle.interface(), None, None, None);
        if result != ERROR_SUCCESS.0 {
            return Err(WifiError::ScanFailed { code: result });
        }
    }

    // WlanScan only requests a scan; results land a few seconds later
    std::thread::sleep(Duration::from_millis(config::WLAN_SCAN_SETTLE_MS));

    available_networks(handle)
}

#[allow(non_upper_case_globals)]
fn available_networks(handle: &WlanHandle) -> WifiResult<Vec<NetworkObservation>> {
    let mut observations = Vec::new();

    unsafe {
        let mut available_network_list: *mut WLAN_AVAILABLE_NETWORK_LIST = std::ptr::null_mut();
        let result = WlanGetAvailableNetworkList(
            handle.as_raw(),
            handle.interface(),
            0,
            None,
            &mut available_network_list,
        );
        if result != ERROR_SUCCESS.0 {
            return Err(WifiError::NetworkListFailed { code: result });
        }

        // BSS list carries the real RSSI in dBm
        let mut bss_list: *mut WLAN_BSS_LIST = std::ptr::null_mut();
        let result_bss = WlanGetNetworkBssList(
            handle.as_raw(),
            handle.interface(),
            None,
            dot11_BSS_type_any,
            false,
            None,
            &mut bss_list,
        );

        let mut bss_entries: &[WLAN_BSS_ENTRY] = &[];
        if result_bss == ERROR_SUCCESS.0 && !bss_list.is_null() {
            let num_bss = (*bss_list).dwNumberOfItems;
            bss_entries =
                std::slice::from_raw_parts((*bss_list).wlanBssEntries.as_ptr(), num_bss as usize);
        } else {
            warn!(code = result_bss, "BSS list unavailable, estimating RSSI from quality");
        }

        let num_items = (*available_network_list).dwNumberOfItems;
        let items = std::slice::from_raw_parts(
            (*available_network_list).Network.as_ptr(),
            num_items as usize,
        );

        for item in items {
            let ssid = ssid_to_string(&item.dot11Ssid);
            let ssid_len = item.dot11Ssid.uSSIDLength as usize;

            let best_rssi = bss_entries
                .iter()
                .filter(|bss| {
                    ssid_len > 0
                        && bss.dot11Ssid.uSSIDLength as usize == ssid_len
                        && bss.dot11Ssid.ucSSID[..ssid_len] == item.dot11Ssid.ucSSID[..ssid_len]
                })
                .map(|bss| bss.lRssi)
                .max();

            let rssi = best_rssi.unwrap_or_else(|| quality_to_dbm(item.wlanSignalQuality));
            let security = classify(item.dot11DefaultAuthAlgorithm, item.dot11DefaultCipherAlgorithm);

            observations.push(NetworkObservation::new(ssid, rssi, security));
        }

        if !bss_list.is_null() {
            WlanFreeMemory(bss_list as *mut _);
        }
        WlanFreeMemory(available_network_list as *mut _);
    }

    debug!(count = observations.len(), "WLAN scan complete");
    Ok(observations)
}

/// Signal quality 0..=100 maps linearly onto -100..=-50 dBm
fn quality_to_dbm(quality: u32) -> i32 {
    (quality.min(100) as i32) / 2 - 100
}

#[allow(non_upper_case_globals)]
fn classify(auth: DOT11_AUTH_ALGORITHM, cipher: DOT11_CIPHER_ALGORITHM) -> SecurityClass {
    match auth {
        DOT11_AUTH_ALGO_80211_OPEN if cipher == DOT11_CIPHER_ALGO_NONE => SecurityClass::Open,
        DOT11_AUTH_ALGO_80211_OPEN | DOT11_AUTH_ALGO_80211_SHARED_KEY => SecurityClass::Wep,
        DOT11_AUTH_ALGO_WPA_PSK | DOT11_AUTH_ALGO_WPA_NONE => SecurityClass::Wpa,
        DOT11_AUTH_ALGO_RSNA_PSK if cipher == DOT11_CIPHER_ALGO_TKIP => SecurityClass::Mixed,
        DOT11_AUTH_ALGO_RSNA_PSK => SecurityClass::Wpa2,
        DOT11_AUTH_ALGO_WPA3_SAE => SecurityClass::Wpa3,
        DOT11_AUTH_ALGO_WPA | DOT11_AUTH_ALGO_RSNA | DOT11_AUTH_ALGO_WPA3 => {
            SecurityClass::Enterprise
        }
        _ => SecurityClass::Unknown,
    }
}
