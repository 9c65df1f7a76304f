use crate::error::{WifiError, WifiResult};
use windows::{
    Win32::{
        Foundation::{ERROR_SUCCESS, HANDLE},
        NetworkManagement::WiFi::*,
    },
    core::GUID,
};

/// WLAN client handle bound to the first wireless interface.
/// Closed automatically on drop.
#[derive(Debug)]
pub struct WlanHandle {
    handle: HANDLE,
    interface: GUID,
}

impl WlanHandle {
    /// Open a client handle and pick the first interface
    pub fn open() -> WifiResult<Self> {
        let mut negotiated_version = 0;
        let mut handle = HANDLE::default();
        unsafe {
            let result = WlanOpenHandle(2, None, &mut negotiated_version, &mut handle);
            if result != ERROR_SUCCESS.0 {
                return Err(WifiError::HandleOpenFailed { code: result });
            }
        }

        // Construct first so the handle is closed if enumeration fails
        let mut opened = Self {
            handle,
            interface: GUID::zeroed(),
        };
        opened.interface = opened.first_interface()?;
        Ok(opened)
    }

    pub fn as_raw(&self) -> HANDLE {
        self.handle
    }

    pub fn interface(&self) -> &GUID {
        &self.interface
    }

    fn first_interface(&self) -> WifiResult<GUID> {
        unsafe {
            let mut interface_list: *mut WLAN_INTERFACE_INFO_LIST = std::ptr::null_mut();
            let result = WlanEnumInterfaces(self.handle, None, &mut interface_list);
            if result != ERROR_SUCCESS.0 {
                return Err(WifiError::InterfaceEnumFailed { code: result });
            }

            if (*interface_list).dwNumberOfItems == 0 {
                WlanFreeMemory(interface_list as *mut _);
                return Err(WifiError::NoInterface);
            }

            let guid = (*interface_list).InterfaceInfo[0].InterfaceGuid;
            WlanFreeMemory(interface_list as *mut _);
            Ok(guid)
        }
    }
}

impl Drop for WlanHandle {
    fn drop(&mut self) {
        unsafe {
            let _ = WlanCloseHandle(self.handle, None);
        }
    }
}

/// Encode a string as a NUL-terminated UTF-16 buffer for PCWSTR arguments
pub fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Decode a DOT11_SSID into a String
pub fn ssid_to_string(ssid: &DOT11_SSID) -> String {
    let len = (ssid.uSSIDLength as usize).min(ssid.ucSSID.len());
    String::from_utf8_lossy(&ssid.ucSSID[..len]).to_string()
}

/// Registry form of an interface GUID, as IP Helper reports adapter names
pub fn guid_string(guid: &GUID) -> String {
    let d = guid.data4;
    format!(
        "{{{:08X}-{:04X}-{:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}}}",
        guid.data1, guid.data2, guid.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_matches_adapter_name_format() {
        let guid = GUID::from_values(
            0x4d36e972,
            0xe325,
            0x11ce,
            [0xbf, 0xc1, 0x08, 0x00, 0x2b, 0xe1, 0x03, 0x18],
        );
        assert_eq!(guid_string(&guid), "{4D36E972-E325-11CE-BFC1-08002BE10318}");
    }
}
